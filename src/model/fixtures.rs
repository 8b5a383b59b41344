// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Orgchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Deterministic sample charts shared by tests, benches and the demo binary.

use super::ids::NodeId;
use super::tree::{ChartData, ChartNode, TreeEdge};
#[cfg(test)]
use super::tree::{OrgNode, OrgTree};

#[cfg(test)]
fn node_id(value: &str) -> NodeId {
    NodeId::new(value).expect("fixture ids are non-empty")
}

/// A parent company with two subsidiaries, the second one owning two more.
///
/// ```text
///        0
///      /   \
///     1     2
///          / \
///         3   4
/// ```
pub fn sample_chart() -> ChartData {
    let labels =
        ["Parent company", "Subsidiary 1", "Subsidiary 2", "Subsidiary 2-1", "Subsidiary 2-2"];
    let nodes = labels
        .into_iter()
        .enumerate()
        .map(|(index, label)| ChartNode {
            id: NodeId::numbered("", index),
            label: label.to_owned(),
        })
        .collect();

    let edges = [(0, 1), (0, 2), (2, 3), (2, 4)]
        .into_iter()
        .map(|(source, target)| {
            TreeEdge::new(NodeId::numbered("", source), NodeId::numbered("", target))
        })
        .collect();

    ChartData { nodes, edges }
}

/// A balanced tree with `fanout` children per node, `depth` levels below the
/// root. Ids are `n<counter>` in pre-order.
pub fn balanced_chart(fanout: usize, depth: usize) -> ChartData {
    fn grow(
        parent: &NodeId,
        fanout: usize,
        remaining: usize,
        counter: &mut usize,
        chart: &mut ChartData,
    ) {
        if remaining == 0 {
            return;
        }
        for _ in 0..fanout {
            *counter += 1;
            let child = NodeId::numbered("n", *counter);
            chart.nodes.push(ChartNode { id: child.clone(), label: format!("Unit {counter}") });
            chart.edges.push(TreeEdge::new(parent.clone(), child.clone()));
            grow(&child, fanout, remaining - 1, counter, chart);
        }
    }

    let root = NodeId::numbered("n", 0);
    let mut chart = ChartData {
        nodes: vec![ChartNode { id: root.clone(), label: "Unit 0".to_owned() }],
        edges: Vec::new(),
    };
    let mut counter = 0usize;
    grow(&root, fanout, depth, &mut counter, &mut chart);
    chart
}

#[cfg(test)]
pub(crate) fn nid(value: &str) -> NodeId {
    node_id(value)
}

#[cfg(test)]
pub(crate) fn chart_sample() -> OrgTree {
    OrgTree::from_chart(&sample_chart()).expect("sample chart")
}

/// `A -> B -> C` plus `B -> D`.
#[cfg(test)]
pub(crate) fn chain_with_branch() -> OrgTree {
    let nodes = ["A", "B", "C", "D"].map(|id| (node_id(id), OrgNode::new(id)));
    let edges = [("A", "B"), ("B", "C"), ("B", "D")]
        .map(|(source, target)| TreeEdge::new(node_id(source), node_id(target)));
    OrgTree::from_parts(nodes, edges).expect("chain fixture")
}

/// A root `P` with children `a`, `b`, `c` (in that order), and `c` owning `x`.
#[cfg(test)]
pub(crate) fn siblings_fixture() -> OrgTree {
    let nodes = ["P", "a", "b", "c", "x"].map(|id| (node_id(id), OrgNode::new(id)));
    let edges = [("P", "a"), ("P", "b"), ("P", "c"), ("c", "x")]
        .map(|(source, target)| TreeEdge::new(node_id(source), node_id(target)));
    OrgTree::from_parts(nodes, edges).expect("siblings fixture")
}
