// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Orgchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Rendering surface seam.
//!
//! The editor never draws. It drives a [`Surface`] that owns cells, hit boxes,
//! pan/zoom and the label text box, and only reads geometry back from it.

mod memory;

pub use memory::{Cell, EdgeCell, MemorySurface, NodeCell};

use serde::Serialize;

use crate::model::{NodeId, Point, Rect};

/// Opaque handle of a node or edge cell owned by the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CellHandle(u64);

impl CellHandle {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellRole {
    /// A real organizational unit.
    Unit,
    /// Stand-in that follows the pointer while dragging.
    Ghost,
    /// Marker of the slot a drop would land in.
    Preview,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSpec {
    pub role: CellRole,
    /// Set for [`CellRole::Unit`] and for the ghost of a unit.
    pub node_id: Option<NodeId>,
    pub label: String,
    pub bounds: Rect,
}

impl NodeSpec {
    pub fn unit(node_id: NodeId, label: impl Into<String>, bounds: Rect) -> Self {
        Self { role: CellRole::Unit, node_id: Some(node_id), label: label.into(), bounds }
    }

    pub fn ghost(node_id: NodeId, label: impl Into<String>, bounds: Rect) -> Self {
        Self { role: CellRole::Ghost, node_id: Some(node_id), label: label.into(), bounds }
    }

    pub fn preview(bounds: Rect) -> Self {
        Self { role: CellRole::Preview, node_id: None, label: String::new(), bounds }
    }
}

/// Operations the editor needs from the rendering/scene library, plus the
/// topology and coordinate queries a host uses to inspect the scene.
///
/// Calls with a handle the surface no longer knows are ignored (or answer
/// `None`); the editor treats a missing cell as a no-op, never as an error.
pub trait Surface {
    fn create_node(&mut self, spec: NodeSpec) -> CellHandle;
    fn create_edge(&mut self, source: CellHandle, target: CellHandle) -> CellHandle;
    fn remove_cell(&mut self, handle: CellHandle);

    fn bounding_box(&self, handle: CellHandle) -> Option<Rect>;
    fn position(&self, handle: CellHandle) -> Option<Point> {
        self.bounding_box(handle).map(|bounds| bounds.origin())
    }
    fn set_position(&mut self, handle: CellHandle, origin: Point);
    /// Replaces the intermediate points of an edge; empty means a straight line.
    fn set_edge_vertices(&mut self, edge: CellHandle, vertices: &[Point]);
    fn set_label(&mut self, handle: CellHandle, label: &str);
    fn set_opacity(&mut self, handle: CellHandle, opacity: f64);
    fn set_selected(&mut self, handle: CellHandle, selected: bool);

    // Host-facing queries. The editor keeps its own node and edge maps and
    // never calls these.
    fn incoming_edges(&self, handle: CellHandle) -> Vec<CellHandle>;
    fn outgoing_edges(&self, handle: CellHandle) -> Vec<CellHandle>;
    fn all_nodes(&self) -> Vec<CellHandle>;
    fn all_edges(&self) -> Vec<CellHandle>;

    /// Divides client-space pointer deltas while dragging.
    fn zoom_factor(&self) -> f64;
    /// Host-facing: maps an absolute client point into model space. Drag math
    /// only needs deltas and uses [`Surface::zoom_factor`] instead.
    fn client_to_model(&self, client: Point) -> Point;
    fn set_panning(&mut self, enabled: bool);

    /// Opens the in-place text box over `handle`, seeded with `text`.
    fn show_label_editor(&mut self, handle: CellHandle, text: &str);
    /// Current contents of the open text box.
    fn label_editor_text(&self) -> Option<String>;
    fn hide_label_editor(&mut self);
}
