// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Orgchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use serde::Serialize;
use smallvec::SmallVec;

use crate::model::{NodeId, Point, Rect};

use super::{CellHandle, CellRole, NodeSpec, Surface};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeCell {
    pub spec: NodeSpec,
    pub opacity: f64,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeCell {
    pub source: CellHandle,
    pub target: CellHandle,
    pub vertices: SmallVec<[Point; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Cell {
    Node(NodeCell),
    Edge(EdgeCell),
}

/// Headless [`Surface`] that keeps every cell in memory.
///
/// Used by tests and the demo binary. Client coordinates map to model space as
/// `(client - translate) / zoom`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemorySurface {
    cells: BTreeMap<CellHandle, Cell>,
    next_handle: u64,
    zoom: f64,
    translate: Point,
    panning: bool,
    label_editor: Option<(CellHandle, String)>,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self {
            cells: BTreeMap::new(),
            next_handle: 1,
            zoom: 1.0,
            translate: Point::default(),
            panning: true,
            label_editor: None,
        }
    }
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom > 0.0 {
            self.zoom = zoom;
        }
    }

    pub fn set_translate(&mut self, translate: Point) {
        self.translate = translate;
    }

    pub fn is_panning(&self) -> bool {
        self.panning
    }

    pub fn cell(&self, handle: CellHandle) -> Option<&Cell> {
        self.cells.get(&handle)
    }

    pub fn node_cell(&self, handle: CellHandle) -> Option<&NodeCell> {
        match self.cells.get(&handle)? {
            Cell::Node(node) => Some(node),
            Cell::Edge(_) => None,
        }
    }

    pub fn edge_cell(&self, handle: CellHandle) -> Option<&EdgeCell> {
        match self.cells.get(&handle)? {
            Cell::Edge(edge) => Some(edge),
            Cell::Node(_) => None,
        }
    }

    /// Node cells with the given role.
    pub fn nodes_with_role(&self, role: CellRole) -> Vec<CellHandle> {
        self.cells
            .iter()
            .filter_map(|(handle, cell)| match cell {
                Cell::Node(node) if node.spec.role == role => Some(*handle),
                _ => None,
            })
            .collect()
    }

    /// The unit cell showing `node_id`.
    pub fn unit_for(&self, node_id: &NodeId) -> Option<CellHandle> {
        self.cells.iter().find_map(|(handle, cell)| match cell {
            Cell::Node(node)
                if node.spec.role == CellRole::Unit && node.spec.node_id.as_ref() == Some(node_id) =>
            {
                Some(*handle)
            }
            _ => None,
        })
    }

    /// Simulates typing into the open label text box.
    pub fn type_label(&mut self, text: &str) {
        if let Some((_, current)) = self.label_editor.as_mut() {
            *current = text.to_owned();
        }
    }

    pub fn label_editor_target(&self) -> Option<CellHandle> {
        self.label_editor.as_ref().map(|(handle, _)| *handle)
    }

    fn node_mut(&mut self, handle: CellHandle) -> Option<&mut NodeCell> {
        match self.cells.get_mut(&handle)? {
            Cell::Node(node) => Some(node),
            Cell::Edge(_) => None,
        }
    }
}

impl Surface for MemorySurface {
    fn create_node(&mut self, spec: NodeSpec) -> CellHandle {
        let handle = CellHandle::new(self.next_handle);
        self.next_handle += 1;
        self.cells.insert(handle, Cell::Node(NodeCell { spec, opacity: 1.0, selected: false }));
        handle
    }

    fn create_edge(&mut self, source: CellHandle, target: CellHandle) -> CellHandle {
        let handle = CellHandle::new(self.next_handle);
        self.next_handle += 1;
        self.cells
            .insert(handle, Cell::Edge(EdgeCell { source, target, vertices: SmallVec::new() }));
        handle
    }

    fn remove_cell(&mut self, handle: CellHandle) {
        let Some(cell) = self.cells.remove(&handle) else {
            return;
        };
        if matches!(cell, Cell::Node(_)) {
            // Edges never outlive their endpoints.
            self.cells.retain(|_, cell| match cell {
                Cell::Edge(edge) => edge.source != handle && edge.target != handle,
                Cell::Node(_) => true,
            });
            if self.label_editor_target() == Some(handle) {
                self.label_editor = None;
            }
        }
    }

    fn bounding_box(&self, handle: CellHandle) -> Option<Rect> {
        self.node_cell(handle).map(|node| node.spec.bounds)
    }

    fn set_position(&mut self, handle: CellHandle, origin: Point) {
        if let Some(node) = self.node_mut(handle) {
            node.spec.bounds.x = origin.x;
            node.spec.bounds.y = origin.y;
        }
    }

    fn set_edge_vertices(&mut self, edge: CellHandle, vertices: &[Point]) {
        if let Some(Cell::Edge(cell)) = self.cells.get_mut(&edge) {
            cell.vertices = vertices.iter().copied().collect();
        }
    }

    fn set_label(&mut self, handle: CellHandle, label: &str) {
        if let Some(node) = self.node_mut(handle) {
            node.spec.label = label.to_owned();
        }
    }

    fn set_opacity(&mut self, handle: CellHandle, opacity: f64) {
        if let Some(node) = self.node_mut(handle) {
            node.opacity = opacity;
        }
    }

    fn set_selected(&mut self, handle: CellHandle, selected: bool) {
        if let Some(node) = self.node_mut(handle) {
            node.selected = selected;
        }
    }

    fn incoming_edges(&self, handle: CellHandle) -> Vec<CellHandle> {
        self.cells
            .iter()
            .filter_map(|(edge_handle, cell)| match cell {
                Cell::Edge(edge) if edge.target == handle => Some(*edge_handle),
                _ => None,
            })
            .collect()
    }

    fn outgoing_edges(&self, handle: CellHandle) -> Vec<CellHandle> {
        self.cells
            .iter()
            .filter_map(|(edge_handle, cell)| match cell {
                Cell::Edge(edge) if edge.source == handle => Some(*edge_handle),
                _ => None,
            })
            .collect()
    }

    fn all_nodes(&self) -> Vec<CellHandle> {
        self.cells
            .iter()
            .filter_map(|(handle, cell)| matches!(cell, Cell::Node(_)).then_some(*handle))
            .collect()
    }

    fn all_edges(&self) -> Vec<CellHandle> {
        self.cells
            .iter()
            .filter_map(|(handle, cell)| matches!(cell, Cell::Edge(_)).then_some(*handle))
            .collect()
    }

    fn zoom_factor(&self) -> f64 {
        self.zoom
    }

    fn client_to_model(&self, client: Point) -> Point {
        Point::new(
            (client.x - self.translate.x) / self.zoom,
            (client.y - self.translate.y) / self.zoom,
        )
    }

    fn set_panning(&mut self, enabled: bool) {
        self.panning = enabled;
    }

    fn show_label_editor(&mut self, handle: CellHandle, text: &str) {
        self.label_editor = Some((handle, text.to_owned()));
    }

    fn label_editor_text(&self) -> Option<String> {
        self.label_editor.as_ref().map(|(_, text)| text.clone())
    }

    fn hide_label_editor(&mut self) {
        self.label_editor = None;
    }
}
