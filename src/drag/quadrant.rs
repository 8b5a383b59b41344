// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Orgchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Maps overlap geometry to a structural edit and validates it against the
//! current tree.

use serde::Serialize;

use crate::model::{NodeId, OrgTree, Point};

use super::intersect::Intersection;

/// Structural intent of a drop, picked by the quadrant the overlap center falls
/// into relative to the candidate's center (y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropIntent {
    /// Upper right: sibling after the candidate.
    SiblingAfter,
    /// Upper left: sibling before the candidate.
    SiblingBefore,
    /// Lower left: first child of the candidate.
    FirstChild,
    /// Lower right: last child of the candidate.
    LastChild,
}

impl DropIntent {
    /// Strict sign test; a zero component on either axis resolves to nothing.
    pub fn from_delta(dx: f64, dy: f64) -> Option<Self> {
        match (dx.partial_cmp(&0.0)?, dy.partial_cmp(&0.0)?) {
            (std::cmp::Ordering::Greater, std::cmp::Ordering::Less) => Some(Self::SiblingAfter),
            (std::cmp::Ordering::Less, std::cmp::Ordering::Less) => Some(Self::SiblingBefore),
            (std::cmp::Ordering::Less, std::cmp::Ordering::Greater) => Some(Self::FirstChild),
            (std::cmp::Ordering::Greater, std::cmp::Ordering::Greater) => Some(Self::LastChild),
            _ => None,
        }
    }

    pub fn is_sibling(self) -> bool {
        matches!(self, Self::SiblingAfter | Self::SiblingBefore)
    }
}

/// A staged, not yet committed, reparent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingMove {
    pub node_id: NodeId,
    pub new_parent_id: NodeId,
    /// Index in the new parent's child list with `node_id` left out.
    pub insert_index: usize,
    pub intent: DropIntent,
    /// The node the ghost was dropped on.
    pub candidate_id: NodeId,
}

/// Resolves a drop of `dragged` onto the hit candidate.
///
/// Returns `None` when the geometry is ambiguous, a sibling drop targets a
/// root, the would-be parent sits inside the dragged subtree, or the move would
/// leave the tree as it is. Indices come from ChildrenOrder, never from screen
/// coordinates.
pub fn resolve_drop(tree: &OrgTree, dragged: &NodeId, hit: &Intersection) -> Option<PendingMove> {
    let center = hit.bounds.center();
    let intent = quadrant_intent(center, hit.overlap_center)?;
    let candidate = &hit.node_id;
    if candidate == dragged {
        return None;
    }

    let (new_parent_id, insert_index) = match intent {
        DropIntent::SiblingAfter | DropIntent::SiblingBefore => {
            let Some(parent) = tree.parent(candidate) else {
                tracing::debug!(candidate = %candidate, "sibling drop on a root dropped");
                return None;
            };
            let siblings = siblings_without(tree, parent, dragged);
            let at = siblings.iter().position(|sibling| sibling == candidate)?;
            let index = if intent == DropIntent::SiblingAfter { at + 1 } else { at };
            (parent.clone(), index)
        }
        DropIntent::FirstChild => (candidate.clone(), 0),
        DropIntent::LastChild => {
            (candidate.clone(), siblings_without(tree, candidate, dragged).len())
        }
    };

    if tree.is_in_subtree(dragged, &new_parent_id) {
        tracing::debug!(
            node_id = %dragged,
            new_parent_id = %new_parent_id,
            "drop inside own subtree dropped"
        );
        return None;
    }

    let unchanged = tree.parent(dragged) == Some(&new_parent_id)
        && tree.sibling_index(dragged) == Some(insert_index);
    if unchanged {
        tracing::trace!(node_id = %dragged, "drop would not move the node");
        return None;
    }

    Some(PendingMove {
        node_id: dragged.clone(),
        new_parent_id,
        insert_index,
        intent,
        candidate_id: candidate.clone(),
    })
}

fn quadrant_intent(candidate_center: Point, overlap_center: Point) -> Option<DropIntent> {
    DropIntent::from_delta(
        overlap_center.x - candidate_center.x,
        overlap_center.y - candidate_center.y,
    )
}

fn siblings_without(tree: &OrgTree, parent: &NodeId, dragged: &NodeId) -> Vec<NodeId> {
    let mut children = tree.children(parent);
    children.retain(|child| child != dragged);
    children
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{resolve_drop, DropIntent};
    use crate::drag::intersect::Intersection;
    use crate::model::fixtures::{chain_with_branch, nid, siblings_fixture};
    use crate::model::{Point, Rect};

    /// A hit on a 200x200 candidate centered at (100, 100).
    fn hit_on(id: &str, overlap_center: Point) -> Intersection {
        Intersection {
            node_id: nid(id),
            bounds: Rect::new(0.0, 0.0, 200.0, 200.0),
            overlap_area: 1.0,
            overlap_center,
        }
    }

    #[rstest]
    #[case(50.0, -50.0, Some(DropIntent::SiblingAfter))]
    #[case(-50.0, -50.0, Some(DropIntent::SiblingBefore))]
    #[case(-50.0, 50.0, Some(DropIntent::FirstChild))]
    #[case(50.0, 50.0, Some(DropIntent::LastChild))]
    #[case(0.0, 50.0, None)]
    #[case(50.0, 0.0, None)]
    #[case(0.0, 0.0, None)]
    #[case(f64::NAN, 1.0, None)]
    fn quadrant_table(#[case] dx: f64, #[case] dy: f64, #[case] expected: Option<DropIntent>) {
        assert_eq!(DropIntent::from_delta(dx, dy), expected);
    }

    #[test]
    fn upper_right_overlap_inserts_after_candidate() {
        let tree = siblings_fixture();
        let pending =
            resolve_drop(&tree, &nid("a"), &hit_on("b", Point::new(150.0, 50.0))).expect("move");

        assert_eq!(pending.intent, DropIntent::SiblingAfter);
        assert_eq!(pending.new_parent_id, nid("P"));
        assert_eq!(pending.insert_index, 1);
    }

    #[test]
    fn slot_already_held_is_not_staged() {
        let tree = siblings_fixture();
        // `a` already sits right before `b`.
        assert!(resolve_drop(&tree, &nid("a"), &hit_on("b", Point::new(50.0, 50.0))).is_none());
        // `c` already sits right after `b`.
        assert!(resolve_drop(&tree, &nid("c"), &hit_on("b", Point::new(150.0, 50.0))).is_none());
        // `x` is already the first and last child of `c`.
        assert!(resolve_drop(&tree, &nid("x"), &hit_on("c", Point::new(50.0, 150.0))).is_none());
        assert!(resolve_drop(&tree, &nid("x"), &hit_on("c", Point::new(150.0, 150.0))).is_none());
    }

    #[test]
    fn child_intents_index_into_candidate_children() {
        let tree = siblings_fixture();

        let first = resolve_drop(&tree, &nid("a"), &hit_on("c", Point::new(50.0, 150.0)))
            .expect("first child");
        assert_eq!((first.new_parent_id.as_str(), first.insert_index), ("c", 0));

        let last = resolve_drop(&tree, &nid("a"), &hit_on("c", Point::new(150.0, 150.0)))
            .expect("last child");
        assert_eq!((last.new_parent_id.as_str(), last.insert_index), ("c", 1));
    }

    #[test]
    fn sibling_drop_on_root_is_dropped() {
        let tree = siblings_fixture();
        assert!(resolve_drop(&tree, &nid("x"), &hit_on("P", Point::new(150.0, 50.0))).is_none());
    }

    #[test]
    fn drop_into_own_subtree_is_dropped() {
        let tree = chain_with_branch();
        assert!(resolve_drop(&tree, &nid("A"), &hit_on("C", Point::new(150.0, 150.0))).is_none());
        // Sibling of `C` means parent `B`, still inside `A`'s subtree.
        assert!(resolve_drop(&tree, &nid("A"), &hit_on("C", Point::new(150.0, 50.0))).is_none());
        // `B` as a sibling of its own child `C` would make `B` its own parent.
        assert!(resolve_drop(&tree, &nid("B"), &hit_on("C", Point::new(150.0, 50.0))).is_none());
    }

    #[test]
    fn moving_next_to_a_cousin_uses_its_parent() {
        let tree = siblings_fixture();
        let pending =
            resolve_drop(&tree, &nid("a"), &hit_on("x", Point::new(50.0, 50.0))).expect("move");
        assert_eq!(pending.new_parent_id, nid("c"));
        assert_eq!(pending.insert_index, 0);
        assert_eq!(pending.candidate_id, nid("x"));
    }
}
