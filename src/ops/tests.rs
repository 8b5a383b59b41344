// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Orgchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;

use rstest::rstest;

use crate::model::fixtures::{chain_with_branch, chart_sample, nid, siblings_fixture};
use crate::model::{NodeId, OrgTree};

use super::{add_child, apply_op, apply_ops, delete, reparent, ApplyError, TreeOp};

fn ids(values: &[&str]) -> Vec<NodeId> {
    values.iter().map(|value| nid(value)).collect()
}

/// Checks the structural invariants every tree must hold after any op:
/// one parent per node, no cycles, ChildrenOrder agrees with the edges and
/// the node order lists every node once.
fn assert_tree_invariants(tree: &OrgTree) {
    let mut incoming = BTreeSet::new();
    for edge in tree.edges() {
        assert!(incoming.insert(edge.target.clone()), "{} has two parents", edge.target);
        assert_eq!(tree.parent(&edge.target), Some(&edge.source));
    }

    for (parent, children) in tree.children_order() {
        for child in &children {
            assert!(tree
                .edges()
                .iter()
                .any(|edge| edge.source == parent && &edge.target == child));
        }
        let unique = children.iter().collect::<BTreeSet<_>>();
        assert_eq!(unique.len(), children.len(), "duplicate child under {parent}");
    }
    let listed = tree.children_order().values().map(Vec::len).sum::<usize>();
    assert_eq!(listed, tree.edges().len());

    let order = tree.node_ids().cloned().collect::<Vec<_>>();
    assert_eq!(order.len(), tree.len());
    assert_eq!(order.iter().collect::<BTreeSet<_>>().len(), tree.len());

    for node_id in tree.node_ids() {
        let mut seen = BTreeSet::new();
        let mut cursor = Some(node_id.clone());
        while let Some(current) = cursor {
            assert!(seen.insert(current.clone()), "cycle through {current}");
            cursor = tree.parent(&current).cloned();
        }
    }
}

#[test]
fn reparent_moves_subtree_and_bumps_rev() {
    let mut tree = chart_sample();

    let result = reparent(&mut tree, &nid("2"), &nid("1"), None).expect("reparent");
    assert_eq!(result.new_rev, 1);
    assert_eq!(result.applied, 1);
    assert_eq!(result.delta.moved, ids(&["2"]));
    assert!(result.delta.added.is_empty());

    assert_eq!(tree.parent(&nid("2")), Some(&nid("1")));
    assert_eq!(tree.children(&nid("0")), ids(&["1"]));
    assert_eq!(tree.children(&nid("1")), ids(&["2"]));
    assert_eq!(tree.children(&nid("2")), ids(&["3", "4"]));
    assert_eq!(
        tree.node_ids().cloned().collect::<Vec<_>>(),
        ids(&["0", "1", "2", "3", "4"])
    );
    assert_tree_invariants(&tree);
}

#[test]
fn reparent_into_own_subtree_is_rejected() {
    let mut tree = chain_with_branch();
    let before = tree.clone();

    let err = reparent(&mut tree, &nid("A"), &nid("C"), None).unwrap_err();
    assert_eq!(
        err,
        ApplyError::WouldCycle { node_id: nid("A"), new_parent_id: nid("C") }
    );
    assert_eq!(tree, before);
    assert_eq!(tree.rev(), 0);
}

#[test]
fn reparent_onto_itself_is_rejected() {
    let mut tree = chain_with_branch();
    let before = tree.clone();

    let err = reparent(&mut tree, &nid("B"), &nid("B"), Some(0)).unwrap_err();
    assert_eq!(err, ApplyError::SelfParent { node_id: nid("B") });
    assert_eq!(tree, before);
}

#[test]
fn reparent_unknown_nodes_are_not_found() {
    let mut tree = chain_with_branch();

    let err = reparent(&mut tree, &nid("zzz"), &nid("A"), None).unwrap_err();
    assert_eq!(err, ApplyError::NotFound { node_id: nid("zzz") });
    let err = reparent(&mut tree, &nid("C"), &nid("zzz"), None).unwrap_err();
    assert_eq!(err, ApplyError::NotFound { node_id: nid("zzz") });
    assert_eq!(tree.rev(), 0);
}

#[test]
fn same_parent_without_index_is_a_noop() {
    let mut tree = siblings_fixture();

    let result = reparent(&mut tree, &nid("b"), &nid("P"), None).expect("noop");
    assert_eq!(result.applied, 0);
    assert!(result.delta.is_empty());
    assert_eq!(tree.rev(), 0);
    assert_eq!(tree.children(&nid("P")), ids(&["a", "b", "c"]));
}

#[rstest]
#[case("a", 0, &["a", "b", "c"])]
#[case("a", 1, &["b", "a", "c"])]
#[case("a", 2, &["b", "c", "a"])]
#[case("a", 99, &["b", "c", "a"])]
#[case("c", 0, &["c", "a", "b"])]
#[case("b", 0, &["b", "a", "c"])]
fn same_parent_with_index_reorders(
    #[case] node: &str,
    #[case] insert_index: usize,
    #[case] expected: &[&str],
) {
    let mut tree = siblings_fixture();

    reparent(&mut tree, &nid(node), &nid("P"), Some(insert_index)).expect("reorder");

    assert_eq!(tree.children(&nid("P")), ids(expected));
    assert_eq!(tree.parent(&nid(node)), Some(&nid("P")));
    assert_tree_invariants(&tree);
}

#[test]
fn reorder_to_current_slot_does_not_bump_rev() {
    let mut tree = siblings_fixture();

    let result = reparent(&mut tree, &nid("b"), &nid("P"), Some(1)).expect("noop");
    assert_eq!(result.applied, 0);
    assert_eq!(tree.rev(), 0);
}

#[test]
fn insert_index_is_clamped_under_new_parent() {
    let mut tree = siblings_fixture();

    reparent(&mut tree, &nid("a"), &nid("c"), Some(10)).expect("reparent");
    assert_eq!(tree.children(&nid("c")), ids(&["x", "a"]));

    reparent(&mut tree, &nid("b"), &nid("c"), Some(0)).expect("reparent");
    assert_eq!(tree.children(&nid("c")), ids(&["b", "x", "a"]));
    assert_eq!(tree.children(&nid("P")), ids(&["c"]));
    assert_tree_invariants(&tree);
}

#[test]
fn delete_cascades_to_descendants() {
    let mut tree = chart_sample();

    let result = delete(&mut tree, &nid("2")).expect("delete");
    assert_eq!(result.delta.removed, ids(&["2", "3", "4"]));
    assert_eq!(tree.len(), 2);
    assert!(!tree.contains(&nid("3")));
    assert_eq!(tree.children(&nid("0")), ids(&["1"]));
    assert!(tree.edges().iter().all(|edge| edge.target != nid("2")));
    assert_tree_invariants(&tree);
}

#[test]
fn delete_root_empties_tree() {
    let mut tree = chart_sample();

    delete(&mut tree, &nid("0")).expect("delete");
    assert!(tree.is_empty());
    assert!(tree.edges().is_empty());
    assert!(tree.children_order().is_empty());
}

#[test]
fn add_child_appends_last_and_rejects_duplicates() {
    let mut tree = chart_sample();

    let result = add_child(&mut tree, &nid("2"), nid("5"), "Subsidiary").expect("add");
    assert_eq!(result.delta.added, ids(&["5"]));
    assert_eq!(tree.children(&nid("2")), ids(&["3", "4", "5"]));
    assert_eq!(tree.node(&nid("5")).map(|node| node.label()), Some("Subsidiary"));

    let err = add_child(&mut tree, &nid("1"), nid("5"), "again").unwrap_err();
    assert_eq!(err, ApplyError::AlreadyExists { node_id: nid("5") });
    let err = add_child(&mut tree, &nid("missing"), nid("6"), "orphan").unwrap_err();
    assert_eq!(err, ApplyError::NotFound { node_id: nid("missing") });
    assert_tree_invariants(&tree);
}

#[test]
fn rename_updates_label_only_when_changed() {
    let mut tree = chart_sample();
    let op = TreeOp::Rename { node_id: nid("1"), label: "Holding".to_owned() };

    let result = apply_op(&mut tree, &op).expect("rename");
    assert_eq!(result.delta.updated, ids(&["1"]));
    assert!(!result.delta.is_structural());
    assert_eq!(tree.node(&nid("1")).map(|node| node.label()), Some("Holding"));

    let result = apply_op(&mut tree, &op).expect("rename again");
    assert_eq!(result.applied, 0);
    assert_eq!(tree.rev(), 1);
}

#[test]
fn batch_is_atomic_and_checks_base_rev() {
    let mut tree = chart_sample();
    let before = tree.clone();

    let ops = [
        TreeOp::Reparent { node_id: nid("3"), new_parent_id: nid("1"), insert_index: None },
        TreeOp::Reparent { node_id: nid("0"), new_parent_id: nid("3"), insert_index: None },
    ];
    let err = apply_ops(&mut tree, 0, &ops).unwrap_err();
    assert!(matches!(err, ApplyError::WouldCycle { .. }));
    assert_eq!(tree, before);

    let err = apply_ops(&mut tree, 7, &ops[..1]).unwrap_err();
    assert_eq!(err, ApplyError::Conflict { base_rev: 7, current_rev: 0 });
}

#[test]
fn batch_add_then_delete_cancels_out_in_delta() {
    let mut tree = chart_sample();
    let ops = [
        TreeOp::AddChild { parent_id: nid("1"), node_id: nid("tmp"), label: "tmp".to_owned() },
        TreeOp::Rename { node_id: nid("tmp"), label: "renamed".to_owned() },
        TreeOp::Delete { node_id: nid("tmp") },
        TreeOp::Reparent { node_id: nid("4"), new_parent_id: nid("1"), insert_index: Some(0) },
    ];

    let result = apply_ops(&mut tree, 0, &ops).expect("batch");
    assert_eq!(result.applied, 4);
    assert_eq!(result.new_rev, 1);
    assert!(result.delta.added.is_empty());
    assert!(result.delta.removed.is_empty());
    assert!(result.delta.updated.is_empty());
    assert_eq!(result.delta.moved, ids(&["4"]));
}

#[rstest]
#[case(&[("3", "1", None), ("1", "4", Some(0)), ("2", "0", Some(0))])]
#[case(&[("4", "3", None), ("3", "1", Some(5)), ("1", "2", None), ("2", "0", Some(0))])]
#[case(&[("2", "1", None), ("0", "4", None), ("1", "0", Some(1)), ("4", "1", None)])]
fn invariants_hold_over_move_sequences(#[case] moves: &[(&str, &str, Option<usize>)]) {
    let mut tree = chart_sample();

    for (node, parent, index) in moves {
        // Rejections are fine here; the tree must stay valid either way.
        let _ = reparent(&mut tree, &nid(node), &nid(parent), *index);
        assert_tree_invariants(&tree);
    }
    assert_eq!(tree.len(), 5);
}
