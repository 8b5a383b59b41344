// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Orgchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::{Duration, Instant};

use crate::model::NodeId;

/// What a completed click means once the click timer has been consulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickKind {
    /// First click; the single click fires later unless cancelled.
    Single,
    /// Second click on the same node before the timer ran out.
    Double(NodeId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingClick {
    node_id: NodeId,
    deadline: Instant,
}

/// Single-click vs double-click discrimination with one authoritative timer.
///
/// The timer is armed on release and is a deadline that the host polls. A
/// press suspends it: while the pointer is down nothing fires, and the
/// suspended click only serves to recognize a double click on release.
/// Starting a drag drops both.
#[derive(Debug, Clone)]
pub struct ClickDiscriminator {
    delay: Duration,
    pending: Option<PendingClick>,
    suspended: Option<PendingClick>,
}

impl ClickDiscriminator {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None, suspended: None }
    }

    /// Pointer went down: the running timer stops firing.
    pub fn press(&mut self) {
        if let Some(pending) = self.pending.take() {
            self.suspended = Some(pending);
        }
    }

    /// Pointer came up without a drag on `node_id`.
    pub fn release(&mut self, node_id: &NodeId, now: Instant) -> ClickKind {
        match self.suspended.take() {
            Some(previous) if &previous.node_id == node_id && now < previous.deadline => {
                self.pending = None;
                ClickKind::Double(previous.node_id)
            }
            _ => {
                self.pending =
                    Some(PendingClick { node_id: node_id.clone(), deadline: now + self.delay });
                ClickKind::Single
            }
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
        self.suspended = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.deadline)
    }

    /// Returns the clicked node once its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<NodeId> {
        if self.pending.as_ref().is_some_and(|pending| now >= pending.deadline) {
            return self.pending.take().map(|pending| pending.node_id);
        }
        None
    }
}
