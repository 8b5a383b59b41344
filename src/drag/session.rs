// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Orgchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::{Duration, Instant};

use crate::model::{NodeId, Point};
use crate::surface::CellHandle;

use super::quadrant::PendingMove;

/// Lifecycle of one pointer gesture.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    /// Pointer is down on a node and has not moved yet.
    Pressed {
        node_id: NodeId,
        origin_pointer: Point,
        origin_node: Point,
    },
    Dragging(DragState),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    pub node_id: NodeId,
    pub origin_pointer: Point,
    pub origin_node: Point,
    pub ghost: CellHandle,
    pub pending: Option<PendingMove>,
    pub preview: Option<PreviewCells>,
}

impl DragState {
    /// Ghost origin for the given client pointer: the client delta scaled into
    /// model space by the zoom factor.
    pub fn ghost_origin(&self, pointer: Point, zoom: f64) -> Point {
        let zoom = if zoom > 0.0 { zoom } else { 1.0 };
        self.origin_node.offset(
            (pointer.x - self.origin_pointer.x) / zoom,
            (pointer.y - self.origin_pointer.y) / zoom,
        )
    }
}

/// Cells drawn for the staged drop slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewCells {
    pub marker: CellHandle,
    pub edge: CellHandle,
}

/// How a gesture ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Release {
    /// Nothing was pressed.
    None,
    /// Released without moving; the click timer decides what it was.
    Click { node_id: NodeId },
    Drop(DragState),
}

/// State of the current pointer gesture. Created idle, reset on release.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DragSession {
    phase: DragPhase,
}

impl DragSession {
    pub fn phase(&self) -> &DragPhase {
        &self.phase
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.phase, DragPhase::Idle)
    }

    pub fn dragging(&self) -> Option<&DragState> {
        match &self.phase {
            DragPhase::Dragging(state) => Some(state),
            _ => None,
        }
    }

    pub fn dragging_mut(&mut self) -> Option<&mut DragState> {
        match &mut self.phase {
            DragPhase::Dragging(state) => Some(state),
            _ => None,
        }
    }

    /// `Idle -> Pressed`. Returns `false` if a gesture is already running.
    pub fn press(&mut self, node_id: NodeId, origin_pointer: Point, origin_node: Point) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.phase = DragPhase::Pressed { node_id, origin_pointer, origin_node };
        true
    }

    /// `Pressed -> Dragging` with the freshly created ghost cell.
    ///
    /// Returns the dragged node, or `None` if nothing was pressed.
    pub fn begin_drag(&mut self, ghost: CellHandle) -> Option<NodeId> {
        let DragPhase::Pressed { node_id, origin_pointer, origin_node } =
            std::mem::take(&mut self.phase)
        else {
            return None;
        };
        self.phase = DragPhase::Dragging(DragState {
            node_id: node_id.clone(),
            origin_pointer,
            origin_node,
            ghost,
            pending: None,
            preview: None,
        });
        Some(node_id)
    }

    /// The node the current gesture started on.
    pub fn pressed_node(&self) -> Option<&NodeId> {
        match &self.phase {
            DragPhase::Idle => None,
            DragPhase::Pressed { node_id, .. } => Some(node_id),
            DragPhase::Dragging(state) => Some(&state.node_id),
        }
    }

    /// Ends the gesture and resets the session to idle.
    pub fn release(&mut self) -> Release {
        match std::mem::take(&mut self.phase) {
            DragPhase::Idle => Release::None,
            DragPhase::Pressed { node_id, .. } => Release::Click { node_id },
            DragPhase::Dragging(state) => Release::Drop(state),
        }
    }
}

/// Last-wins pointer-move buffer.
///
/// With a zero debounce every move passes straight through. Otherwise moves are
/// held until the deadline set by the first buffered move; nothing is dropped,
/// only merged.
#[derive(Debug, Clone)]
pub struct MoveCoalescer {
    debounce: Duration,
    latest: Option<Point>,
    due: Option<Instant>,
}

impl MoveCoalescer {
    pub fn new(debounce: Duration) -> Self {
        Self { debounce, latest: None, due: None }
    }

    /// Buffers `pointer`; returns it right away when it is due now.
    pub fn push(&mut self, pointer: Point, now: Instant) -> Option<Point> {
        if self.debounce.is_zero() {
            return Some(pointer);
        }
        self.latest = Some(pointer);
        let due = *self.due.get_or_insert(now + self.debounce);
        if now >= due {
            return self.flush();
        }
        None
    }

    pub fn poll(&mut self, now: Instant) -> Option<Point> {
        match self.due {
            Some(due) if now >= due => self.flush(),
            _ => None,
        }
    }

    pub fn flush(&mut self) -> Option<Point> {
        self.due = None;
        self.latest.take()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.due
    }
}
