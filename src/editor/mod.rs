// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Orgchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Editor context object.
//!
//! One [`Editor`] owns the tree, the rendering surface and all gesture state of
//! one chart. Surface events come in through the `on_*` handlers; structural
//! edits go through [`crate::ops`] and are followed by a cell resync and a
//! layout pass. Time is passed in explicitly, so the host drives the click and
//! debounce timers by calling [`Editor::tick`].

use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use crate::config::EditorConfig;
use crate::drag::{
    detect_intersection, resolve_drop, ClickDiscriminator, ClickKind, DragSession, DragState,
    DropIntent, MoveCoalescer, PendingMove, PreviewCells, Release,
};
use crate::layout::{layout_tree, place_preview, TreeLayout};
use crate::model::{ChartData, NodeId, OrgTree, Point, Rect, TreeLoadError};
use crate::ops::{self, ApplyError, ApplyResult, TreeOp};
use crate::surface::{CellHandle, NodeSpec, Surface};

/// Keys the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Delete,
    Backspace,
    Enter,
    Escape,
    Other,
}

/// Result of feeding one surface event to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Handled,
    Noop { reason: NoopReason },
}

/// Why an event was safely ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoopReason {
    EditingLabel,
    NotEditing,
    UnknownNode,
    GestureInProgress,
    NoActiveGesture,
    NothingSelected,
    UnhandledKey,
}

impl EventOutcome {
    fn noop(reason: NoopReason) -> Self {
        Self::Noop { reason }
    }

    /// Whether the host must keep the event away from the surface's own
    /// handlers (native drag, shortcuts).
    pub fn stops_propagation(&self) -> bool {
        matches!(
            self,
            Self::Handled | Self::Noop { reason: NoopReason::GestureInProgress }
        )
    }
}

pub struct Editor<S: Surface> {
    tree: OrgTree,
    surface: S,
    config: EditorConfig,
    session: DragSession,
    clicks: ClickDiscriminator,
    moves: MoveCoalescer,
    selection: BTreeSet<NodeId>,
    editing: Option<NodeId>,
    node_cells: BTreeMap<NodeId, CellHandle>,
    edge_cells: BTreeMap<(NodeId, NodeId), CellHandle>,
    layout: TreeLayout,
    id_counter: u64,
}

impl<S: Surface> Editor<S> {
    /// Creates cells for every node and edge and runs the first layout pass.
    pub fn new(tree: OrgTree, surface: S, config: EditorConfig) -> Self {
        let mut editor = Self {
            session: DragSession::default(),
            clicks: ClickDiscriminator::new(config.drag.click_delay()),
            moves: MoveCoalescer::new(config.drag.move_debounce()),
            selection: BTreeSet::new(),
            editing: None,
            node_cells: BTreeMap::new(),
            edge_cells: BTreeMap::new(),
            layout: TreeLayout::default(),
            id_counter: tree.len() as u64,
            tree,
            surface,
            config,
        };
        editor.sync_cells();
        editor.run_layout();
        editor
    }

    pub fn from_chart(chart: &ChartData, surface: S, config: EditorConfig) -> Result<Self, TreeLoadError> {
        Ok(Self::new(OrgTree::from_chart(chart)?, surface, config))
    }

    pub fn tree(&self) -> &OrgTree {
        &self.tree
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn layout(&self) -> &TreeLayout {
        &self.layout
    }

    pub fn session(&self) -> &DragSession {
        &self.session
    }

    pub fn selection(&self) -> &BTreeSet<NodeId> {
        &self.selection
    }

    /// Node whose label is being edited.
    pub fn editing(&self) -> Option<&NodeId> {
        self.editing.as_ref()
    }

    pub fn cell_of(&self, node_id: &NodeId) -> Option<CellHandle> {
        self.node_cells.get(node_id).copied()
    }

    pub fn edge_cell(&self, source: &NodeId, target: &NodeId) -> Option<CellHandle> {
        self.edge_cells.get(&(source.clone(), target.clone())).copied()
    }

    /// Move staged by the current drag, if any.
    pub fn pending_move(&self) -> Option<&PendingMove> {
        self.session.dragging().and_then(|state| state.pending.as_ref())
    }

    /// Earliest instant at which [`Editor::tick`] has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.clicks.deadline(), self.moves.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    // ---- surface events ------------------------------------------------------

    /// Pointer went down on a unit cell. `pointer` is in client coordinates.
    ///
    /// A running click timer is suspended until the pointer comes up again.
    pub fn on_node_pressed(&mut self, node_id: &NodeId, pointer: Point) -> EventOutcome {
        if self.editing.is_some() {
            return EventOutcome::noop(NoopReason::EditingLabel);
        }
        if !self.session.is_idle() {
            return EventOutcome::noop(NoopReason::GestureInProgress);
        }
        let Some(origin_node) = self.cell_of(node_id).and_then(|cell| self.surface.position(cell))
        else {
            return EventOutcome::noop(NoopReason::UnknownNode);
        };

        self.clicks.press();
        self.session.press(node_id.clone(), pointer, origin_node);
        self.surface.set_panning(false);
        tracing::trace!(node_id = %node_id, "node pressed");
        EventOutcome::Handled
    }

    pub fn on_pointer_move(&mut self, pointer: Point, now: Instant) -> EventOutcome {
        if self.session.is_idle() {
            return EventOutcome::noop(NoopReason::NoActiveGesture);
        }
        if let Some(pointer) = self.moves.push(pointer, now) {
            self.process_move(pointer);
        }
        EventOutcome::Handled
    }

    /// Ends the gesture: commits a staged move, tears down drag artifacts and
    /// re-runs layout after any drag. A release without a drag is a click.
    pub fn on_pointer_up(&mut self, now: Instant) -> EventOutcome {
        if let Some(pointer) = self.moves.flush() {
            self.process_move(pointer);
        }
        self.surface.set_panning(true);

        match self.session.release() {
            Release::None => EventOutcome::noop(NoopReason::NoActiveGesture),
            Release::Click { node_id } => {
                if let ClickKind::Double(node_id) = self.clicks.release(&node_id, now) {
                    self.begin_label_edit(&node_id);
                }
                EventOutcome::Handled
            }
            Release::Drop(state) => {
                let pending = self.teardown_drag(state);
                if let Some(pending) = pending {
                    let result = ops::reparent(
                        &mut self.tree,
                        &pending.node_id,
                        &pending.new_parent_id,
                        Some(pending.insert_index),
                    );
                    match result {
                        Ok(result) => {
                            tracing::debug!(
                                node_id = %pending.node_id,
                                new_parent_id = %pending.new_parent_id,
                                insert_index = pending.insert_index,
                                rev = result.new_rev,
                                "drop committed"
                            );
                            self.sync_cells();
                        }
                        Err(err) => tracing::debug!(%err, "drop discarded"),
                    }
                }
                self.run_layout();
                EventOutcome::Handled
            }
        }
    }

    /// Surface-level double activation of a node: open the label editor.
    pub fn on_node_double_activated(&mut self, node_id: &NodeId) -> EventOutcome {
        if !self.tree.contains(node_id) {
            return EventOutcome::noop(NoopReason::UnknownNode);
        }
        self.begin_label_edit(node_id);
        EventOutcome::Handled
    }

    /// Click on empty canvas: clear selection, drop any open label edit.
    pub fn on_blank_activated(&mut self) -> EventOutcome {
        self.clear_selection();
        self.cancel_label_edit();
        EventOutcome::Handled
    }

    pub fn on_key_pressed(&mut self, key: Key) -> EventOutcome {
        match key {
            Key::Enter => {
                if self.editing.is_none() {
                    return EventOutcome::noop(NoopReason::NotEditing);
                }
                self.commit_label_edit();
                EventOutcome::Handled
            }
            Key::Escape => {
                if self.editing.is_none() {
                    return EventOutcome::noop(NoopReason::NotEditing);
                }
                self.cancel_label_edit();
                EventOutcome::Handled
            }
            Key::Delete | Key::Backspace => {
                if self.editing.is_some() {
                    return EventOutcome::noop(NoopReason::EditingLabel);
                }
                if self.selection.is_empty() {
                    return EventOutcome::noop(NoopReason::NothingSelected);
                }
                self.delete_selected();
                EventOutcome::Handled
            }
            Key::Other => EventOutcome::noop(NoopReason::UnhandledKey),
        }
    }

    /// Fires due timers: buffered pointer moves, then a pending single click.
    ///
    /// Returns the node selected by a resolved single click.
    pub fn tick(&mut self, now: Instant) -> Option<NodeId> {
        if let Some(pointer) = self.moves.poll(now) {
            self.process_move(pointer);
        }
        let clicked = self.clicks.poll(now)?;
        if self.editing.is_some() || !self.tree.contains(&clicked) {
            return None;
        }
        self.select_only(&clicked);
        Some(clicked)
    }

    // ---- structural operations -----------------------------------------------

    /// Appends a new child labelled with the configured default label.
    pub fn add_child(&mut self, parent_id: &NodeId) -> Result<NodeId, ApplyError> {
        let node_id = self.fresh_id();
        let label = self.config.default_child_label.clone();
        self.apply(&TreeOp::AddChild { parent_id: parent_id.clone(), node_id: node_id.clone(), label })?;
        Ok(node_id)
    }

    pub fn delete(&mut self, node_id: &NodeId) -> Result<ApplyResult, ApplyError> {
        self.apply(&TreeOp::Delete { node_id: node_id.clone() })
    }

    pub fn reparent(
        &mut self,
        node_id: &NodeId,
        new_parent_id: &NodeId,
        insert_index: Option<usize>,
    ) -> Result<ApplyResult, ApplyError> {
        self.apply(&TreeOp::Reparent {
            node_id: node_id.clone(),
            new_parent_id: new_parent_id.clone(),
            insert_index,
        })
    }

    pub fn rename(&mut self, node_id: &NodeId, label: impl Into<String>) -> Result<ApplyResult, ApplyError> {
        self.apply(&TreeOp::Rename { node_id: node_id.clone(), label: label.into() })
    }

    /// Applies one op, then brings the surface up to date.
    pub fn apply(&mut self, op: &TreeOp) -> Result<ApplyResult, ApplyError> {
        let result = ops::apply_op(&mut self.tree, op)?;
        for node_id in &result.delta.updated {
            if let (Some(cell), Some(node)) = (self.cell_of(node_id), self.tree.node(node_id)) {
                self.surface.set_label(cell, node.label());
            }
        }
        if result.delta.is_structural() {
            self.sync_cells();
            self.run_layout();
        }
        Ok(result)
    }

    /// Recomputes the layout and pushes positions and edge bends to the surface.
    pub fn run_layout(&mut self) {
        let layout = layout_tree(&self.tree, &self.config.layout);
        for (node_id, rect) in layout.positions() {
            if let Some(cell) = self.cell_of(node_id) {
                self.surface.set_position(cell, rect.origin());
            }
        }
        for route in layout.edges() {
            if let Some(cell) = self.edge_cell(&route.source, &route.target) {
                self.surface.set_edge_vertices(cell, &route.bends);
            }
        }
        self.layout = layout;
    }

    /// Reconciles unit and edge cells with the tree.
    pub fn sync_cells(&mut self) {
        let stale_nodes = self
            .node_cells
            .keys()
            .filter(|node_id| !self.tree.contains(node_id))
            .cloned()
            .collect::<Vec<_>>();
        for node_id in stale_nodes {
            if let Some(cell) = self.node_cells.remove(&node_id) {
                self.surface.remove_cell(cell);
            }
            self.selection.remove(&node_id);
            if self.editing.as_ref() == Some(&node_id) {
                self.cancel_label_edit();
            }
        }

        let (width, height) = (self.config.layout.node_width, self.config.layout.node_height);
        let missing = self
            .tree
            .node_ids()
            .filter(|node_id| !self.node_cells.contains_key(*node_id))
            .cloned()
            .collect::<Vec<_>>();
        for node_id in missing {
            let label = self.tree.node(&node_id).map(|node| node.label().to_owned()).unwrap_or_default();
            let cell = self.surface.create_node(NodeSpec::unit(
                node_id.clone(),
                label,
                Rect::new(0.0, 0.0, width, height),
            ));
            self.node_cells.insert(node_id, cell);
        }

        let live_edges = self
            .tree
            .edges()
            .iter()
            .map(|edge| (edge.source.clone(), edge.target.clone()))
            .collect::<BTreeSet<_>>();
        let stale_edges = self
            .edge_cells
            .keys()
            .filter(|key| !live_edges.contains(*key))
            .cloned()
            .collect::<Vec<_>>();
        for key in stale_edges {
            if let Some(cell) = self.edge_cells.remove(&key) {
                self.surface.remove_cell(cell);
            }
        }
        for (source, target) in live_edges {
            if self.edge_cells.contains_key(&(source.clone(), target.clone())) {
                continue;
            }
            let (Some(source_cell), Some(target_cell)) = (self.cell_of(&source), self.cell_of(&target))
            else {
                continue;
            };
            let cell = self.surface.create_edge(source_cell, target_cell);
            self.edge_cells.insert((source, target), cell);
        }
    }

    // ---- gesture internals -------------------------------------------------

    fn process_move(&mut self, pointer: Point) {
        if self.session.dragging().is_none() && !self.start_drag() {
            return;
        }
        let zoom = self.surface.zoom_factor();
        let Some((dragged, ghost, origin)) = self
            .session
            .dragging()
            .map(|state| (state.node_id.clone(), state.ghost, state.ghost_origin(pointer, zoom)))
        else {
            return;
        };
        self.surface.set_position(ghost, origin);
        let Some(ghost_box) = self.surface.bounding_box(ghost) else {
            return;
        };

        let candidates = self
            .node_cells
            .iter()
            .filter_map(|(node_id, cell)| Some((node_id, self.surface.bounding_box(*cell)?)))
            .collect::<Vec<_>>();
        let staged = detect_intersection(&ghost_box, candidates, &[&dragged])
            .and_then(|hit| resolve_drop(&self.tree, &dragged, &hit));

        let current = self.session.dragging().and_then(|state| state.pending.clone());
        if current == staged {
            return;
        }
        let old_preview = self.session.dragging_mut().and_then(|state| state.preview.take());
        if let Some(preview) = old_preview {
            self.remove_preview(preview);
        }
        let preview = staged.as_ref().and_then(|pending| self.show_preview(pending));
        if let Some(state) = self.session.dragging_mut() {
            state.pending = staged;
            state.preview = preview;
        }
    }

    /// `Pressed -> Dragging`: cancels the click, closes the label editor,
    /// dims the node and creates its ghost.
    fn start_drag(&mut self) -> bool {
        let Some(node_id) = self.session.pressed_node().cloned() else {
            return false;
        };
        let Some(cell) = self.cell_of(&node_id) else {
            self.session.release();
            return false;
        };
        let bounds = self.surface.bounding_box(cell).unwrap_or_default();
        let label = self.tree.node(&node_id).map(|node| node.label().to_owned()).unwrap_or_default();

        self.clicks.cancel();
        self.cancel_label_edit();
        let ghost = self.surface.create_node(NodeSpec::ghost(node_id.clone(), label, bounds));
        self.surface.set_opacity(cell, self.config.drag.dimmed_opacity);
        self.session.begin_drag(ghost);
        tracing::debug!(node_id = %node_id, "drag started");
        true
    }

    fn show_preview(&mut self, pending: &PendingMove) -> Option<PreviewCells> {
        let candidate_cell = self.cell_of(&pending.candidate_id)?;
        let parent_cell = self.cell_of(&pending.new_parent_id)?;
        let candidate = self.surface.bounding_box(candidate_cell)?;
        let parent = self.surface.bounding_box(parent_cell)?;
        let first_child = match pending.intent {
            DropIntent::FirstChild | DropIntent::LastChild => self
                .tree
                .children(&pending.candidate_id)
                .into_iter()
                .find(|child| child != &pending.node_id)
                .and_then(|child| self.cell_of(&child))
                .and_then(|cell| self.surface.bounding_box(cell)),
            DropIntent::SiblingAfter | DropIntent::SiblingBefore => None,
        };

        let placement =
            place_preview(pending.intent, &candidate, &parent, first_child.as_ref(), &self.config.drag);
        let marker = self.surface.create_node(NodeSpec::preview(placement.marker));
        let edge = self.surface.create_edge(parent_cell, marker);
        self.surface.set_edge_vertices(edge, &placement.bends);
        Some(PreviewCells { marker, edge })
    }

    /// Removes the ghost and preview cells and restores the dragged node.
    /// Returns the staged move, which the caller commits or drops.
    fn teardown_drag(&mut self, state: DragState) -> Option<PendingMove> {
        self.surface.remove_cell(state.ghost);
        if let Some(preview) = state.preview {
            self.remove_preview(preview);
        }
        if let Some(cell) = self.cell_of(&state.node_id) {
            self.surface.set_opacity(cell, 1.0);
        }
        state.pending
    }

    fn abort_gesture(&mut self) {
        if self.session.is_idle() {
            return;
        }
        self.moves.flush();
        self.surface.set_panning(true);
        if let Release::Drop(state) = self.session.release() {
            if let Some(pending) = self.teardown_drag(state) {
                tracing::debug!(node_id = %pending.node_id, "staged drop discarded");
            }
            self.run_layout();
        }
    }

    fn remove_preview(&mut self, preview: PreviewCells) {
        self.surface.remove_cell(preview.edge);
        self.surface.remove_cell(preview.marker);
    }

    // ---- selection and label editing ---------------------------------------

    fn select_only(&mut self, node_id: &NodeId) {
        self.clear_selection();
        if let Some(cell) = self.cell_of(node_id) {
            self.surface.set_selected(cell, true);
        }
        self.selection.insert(node_id.clone());
    }

    fn clear_selection(&mut self) {
        for node_id in std::mem::take(&mut self.selection) {
            if let Some(cell) = self.cell_of(&node_id) {
                self.surface.set_selected(cell, false);
            }
        }
    }

    /// Entering label edit ends any running gesture; a staged drop is discarded.
    fn begin_label_edit(&mut self, node_id: &NodeId) {
        self.abort_gesture();
        self.clicks.cancel();
        self.clear_selection();
        self.cancel_label_edit();
        let Some(cell) = self.cell_of(node_id) else {
            return;
        };
        let label = self.tree.node(node_id).map(|node| node.label().to_owned()).unwrap_or_default();
        self.surface.show_label_editor(cell, &label);
        self.editing = Some(node_id.clone());
    }

    fn commit_label_edit(&mut self) {
        let Some(node_id) = self.editing.take() else {
            return;
        };
        let text = self.surface.label_editor_text();
        self.surface.hide_label_editor();
        if let Some(text) = text {
            if let Err(err) = self.rename(&node_id, text) {
                tracing::debug!(%err, "label edit discarded");
            }
        }
    }

    fn cancel_label_edit(&mut self) {
        if self.editing.take().is_some() {
            self.surface.hide_label_editor();
        }
    }

    fn delete_selected(&mut self) {
        let doomed = std::mem::take(&mut self.selection);
        let mut changed = false;
        for node_id in &doomed {
            // An earlier deletion may already have removed it with its ancestor.
            if !self.tree.contains(node_id) {
                continue;
            }
            match ops::delete(&mut self.tree, node_id) {
                Ok(_) => changed = true,
                Err(err) => tracing::debug!(%err, "delete discarded"),
            }
        }
        if changed {
            self.sync_cells();
            self.run_layout();
        }
    }

    fn fresh_id(&mut self) -> NodeId {
        loop {
            let node_id = NodeId::numbered("n", self.id_counter);
            self.id_counter += 1;
            if !self.tree.contains(&node_id) {
                return node_id;
            }
        }
    }
}

#[cfg(test)]
mod tests;
