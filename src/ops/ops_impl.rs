// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Orgchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Tree mutation helpers used by `apply_op`/`apply_ops`.
/// Each helper validates first and returns `Ok(false)` for a no-op, so callers
/// only bump the revision when something actually changed.
fn apply_tree_op(
    tree: &mut OrgTree,
    op: &TreeOp,
    delta: &mut DeltaBuilder,
) -> Result<bool, ApplyError> {
    match op {
        TreeOp::AddChild { parent_id, node_id, label } => {
            let parent = lookup(tree, parent_id)?;
            if tree.contains(node_id) {
                return Err(ApplyError::AlreadyExists { node_id: node_id.clone() });
            }
            let index = tree.insert_slot(node_id.clone(), OrgNode::new(label.clone()));
            tree.attach(index, parent, None);
            tree.rebuild_derived();
            delta.record_added(node_id.clone());
            Ok(true)
        }
        TreeOp::Reparent { node_id, new_parent_id, insert_index } => {
            apply_reparent(tree, node_id, new_parent_id, *insert_index, delta)
        }
        TreeOp::Delete { node_id } => {
            let index = lookup(tree, node_id)?;
            let doomed = tree.subtree_indices(index);
            tree.detach(index);
            // Deepest nodes first: every child is gone before its parent.
            for index in doomed.into_iter().rev() {
                if let Some((removed_id, _)) = tree.remove_slot(index) {
                    delta.record_removed(removed_id);
                }
            }
            tree.rebuild_derived();
            Ok(true)
        }
        TreeOp::Rename { node_id, label } => {
            let index = lookup(tree, node_id)?;
            let Some(node) = tree.node_mut(index) else {
                return Err(ApplyError::NotFound { node_id: node_id.clone() });
            };
            if node.label() == label {
                return Ok(false);
            }
            node.set_label(label.clone());
            delta.record_updated(node_id.clone());
            Ok(true)
        }
    }
}

fn apply_reparent(
    tree: &mut OrgTree,
    node_id: &NodeId,
    new_parent_id: &NodeId,
    insert_index: Option<usize>,
    delta: &mut DeltaBuilder,
) -> Result<bool, ApplyError> {
    if node_id == new_parent_id {
        return Err(ApplyError::SelfParent { node_id: node_id.clone() });
    }
    let index = lookup(tree, node_id)?;
    let new_parent = lookup(tree, new_parent_id)?;
    if tree.subtree_indices(index).contains(&new_parent) {
        return Err(ApplyError::WouldCycle {
            node_id: node_id.clone(),
            new_parent_id: new_parent_id.clone(),
        });
    }

    if tree.parent_index(index) == Some(new_parent) {
        let Some(target) = insert_index else {
            return Ok(false);
        };
        let siblings = tree.child_indices(new_parent);
        let current = siblings.iter().position(|child| *child == index);
        // Position after removal is clamped to the list without the node.
        let resolved = target.min(siblings.len().saturating_sub(1));
        if current == Some(resolved) {
            return Ok(false);
        }
    }

    tree.detach(index);
    tree.attach(index, new_parent, insert_index);
    tree.rebuild_derived();
    delta.record_moved(node_id.clone());
    Ok(true)
}

fn lookup(tree: &OrgTree, node_id: &NodeId) -> Result<NodeIndex, ApplyError> {
    tree.index_of(node_id).ok_or_else(|| ApplyError::NotFound { node_id: node_id.clone() })
}
