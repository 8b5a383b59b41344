// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Orgchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Tree mutation engine.
//!
//! This is the only writer of an [`OrgTree`]. Every operation validates before it
//! touches the tree, so a rejected operation leaves the store exactly as it was.
//! Applied operations bump the tree revision and report a minimal delta the
//! editor uses to resync the rendering surface.

use std::collections::BTreeSet;
use std::fmt;

use crate::model::{NodeId, NodeIndex, OrgNode, OrgTree};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeOp {
    AddChild {
        parent_id: NodeId,
        node_id: NodeId,
        label: String,
    },
    /// Moves `node_id` (with its whole subtree) under `new_parent_id`.
    ///
    /// `insert_index` is a position in the new parent's child list *without*
    /// the moved node; it is clamped to the list length. `None` keeps the
    /// current slot when the parent does not change and appends otherwise.
    Reparent {
        node_id: NodeId,
        new_parent_id: NodeId,
        insert_index: Option<usize>,
    },
    /// Deletes `node_id` and every descendant.
    Delete {
        node_id: NodeId,
    },
    Rename {
        node_id: NodeId,
        label: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyResult {
    pub new_rev: u64,
    /// Number of ops that changed the tree (no-ops are not counted).
    pub applied: usize,
    pub delta: Delta,
}

/// Minimal delta describing which nodes changed as the result of applying ops.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Delta {
    pub added: Vec<NodeId>,
    pub removed: Vec<NodeId>,
    /// Reparented or reordered nodes.
    pub moved: Vec<NodeId>,
    /// Nodes whose label changed.
    pub updated: Vec<NodeId>,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.removed.is_empty()
            && self.moved.is_empty()
            && self.updated.is_empty()
    }

    /// Whether parent/child links changed (as opposed to labels only).
    pub fn is_structural(&self) -> bool {
        !(self.added.is_empty() && self.removed.is_empty() && self.moved.is_empty())
    }
}

#[derive(Debug, Default)]
struct DeltaBuilder {
    added: BTreeSet<NodeId>,
    removed: BTreeSet<NodeId>,
    moved: BTreeSet<NodeId>,
    updated: BTreeSet<NodeId>,
}

impl DeltaBuilder {
    fn record_added(&mut self, node_id: NodeId) {
        self.removed.remove(&node_id);
        self.added.insert(node_id);
    }

    fn record_removed(&mut self, node_id: NodeId) {
        self.moved.remove(&node_id);
        self.updated.remove(&node_id);
        // Added and removed within one batch cancels out.
        if !self.added.remove(&node_id) {
            self.removed.insert(node_id);
        }
    }

    fn record_moved(&mut self, node_id: NodeId) {
        if self.added.contains(&node_id) || self.removed.contains(&node_id) {
            return;
        }
        self.moved.insert(node_id);
    }

    fn record_updated(&mut self, node_id: NodeId) {
        if self.added.contains(&node_id) || self.removed.contains(&node_id) {
            return;
        }
        self.updated.insert(node_id);
    }

    fn finish(self) -> Delta {
        Delta {
            added: self.added.into_iter().collect(),
            removed: self.removed.into_iter().collect(),
            moved: self.moved.into_iter().collect(),
            updated: self.updated.into_iter().collect(),
        }
    }
}

/// Applies a single op. On `Err` the tree is untouched.
pub fn apply_op(tree: &mut OrgTree, op: &TreeOp) -> Result<ApplyResult, ApplyError> {
    let mut delta = DeltaBuilder::default();
    let changed = apply_tree_op(tree, op, &mut delta).map_err(|err| {
        tracing::debug!(%err, "tree op rejected");
        err
    })?;
    if !changed {
        tracing::trace!(?op, "tree op was a no-op");
        return Ok(ApplyResult { new_rev: tree.rev(), applied: 0, delta: Delta::default() });
    }
    tree.bump_rev();
    Ok(ApplyResult { new_rev: tree.rev(), applied: 1, delta: delta.finish() })
}

/// Applies a batch of ops atomically against `base_rev`.
///
/// Either every op is applied (one revision bump for the whole batch) or none
/// is and the first error is returned.
pub fn apply_ops(
    tree: &mut OrgTree,
    base_rev: u64,
    ops: &[TreeOp],
) -> Result<ApplyResult, ApplyError> {
    let current_rev = tree.rev();
    if base_rev != current_rev {
        return Err(ApplyError::Conflict { base_rev, current_rev });
    }

    let mut staged = tree.clone();
    let mut delta = DeltaBuilder::default();
    let mut applied = 0usize;
    for op in ops {
        if apply_tree_op(&mut staged, op, &mut delta)? {
            applied += 1;
        }
    }

    if applied == 0 {
        return Ok(ApplyResult { new_rev: current_rev, applied, delta: Delta::default() });
    }

    staged.bump_rev();
    *tree = staged;
    Ok(ApplyResult { new_rev: tree.rev(), applied, delta: delta.finish() })
}

/// `reparent(nodeId, newParentId, insertIndex)`.
pub fn reparent(
    tree: &mut OrgTree,
    node_id: &NodeId,
    new_parent_id: &NodeId,
    insert_index: Option<usize>,
) -> Result<ApplyResult, ApplyError> {
    apply_op(
        tree,
        &TreeOp::Reparent {
            node_id: node_id.clone(),
            new_parent_id: new_parent_id.clone(),
            insert_index,
        },
    )
}

/// `delete(nodeId)`, cascading to the whole subtree.
pub fn delete(tree: &mut OrgTree, node_id: &NodeId) -> Result<ApplyResult, ApplyError> {
    apply_op(tree, &TreeOp::Delete { node_id: node_id.clone() })
}

/// `addChild(parentId)`: appends a new last child.
pub fn add_child(
    tree: &mut OrgTree,
    parent_id: &NodeId,
    node_id: NodeId,
    label: impl Into<String>,
) -> Result<ApplyResult, ApplyError> {
    apply_op(
        tree,
        &TreeOp::AddChild { parent_id: parent_id.clone(), node_id, label: label.into() },
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyError {
    Conflict { base_rev: u64, current_rev: u64 },
    NotFound { node_id: NodeId },
    AlreadyExists { node_id: NodeId },
    SelfParent { node_id: NodeId },
    WouldCycle { node_id: NodeId, new_parent_id: NodeId },
}

impl fmt::Display for ApplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflict { base_rev, current_rev } => {
                write!(f, "stale base_rev (base_rev={base_rev}, current_rev={current_rev})")
            }
            Self::NotFound { node_id } => write!(f, "node not found (id={node_id})"),
            Self::AlreadyExists { node_id } => write!(f, "node already exists (id={node_id})"),
            Self::SelfParent { node_id } => {
                write!(f, "node {node_id} cannot become its own parent")
            }
            Self::WouldCycle { node_id, new_parent_id } => write!(
                f,
                "moving {node_id} under {new_parent_id} would create a cycle \
                 ({new_parent_id} is inside the subtree of {node_id})"
            ),
        }
    }
}

impl std::error::Error for ApplyError {}

// Per-op mutation helpers used by `apply_op`/`apply_ops`.
include!("ops_impl.rs");

#[cfg(test)]
mod tests;
