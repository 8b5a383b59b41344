// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Orgchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use smallvec::SmallVec;

use crate::config::LayoutConfig;
use crate::model::{NodeId, OrgTree, Point, Rect, TreeEdge};

use super::rank::{LayeredRanker, RankLayout};

/// Final node boxes and edge bend points for one tree.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TreeLayout {
    positions: BTreeMap<NodeId, Rect>,
    ranks: BTreeMap<NodeId, usize>,
    edges: Vec<EdgeRoute>,
}

impl TreeLayout {
    pub fn positions(&self) -> &BTreeMap<NodeId, Rect> {
        &self.positions
    }

    pub fn position(&self, node_id: &NodeId) -> Option<&Rect> {
        self.positions.get(node_id)
    }

    pub fn rank(&self, node_id: &NodeId) -> Option<usize> {
        self.ranks.get(node_id).copied()
    }

    pub fn edges(&self) -> &[EdgeRoute] {
        &self.edges
    }

    pub fn route(&self, source: &NodeId, target: &NodeId) -> Option<&EdgeRoute> {
        self.edges.iter().find(|route| &route.source == source && &route.target == target)
    }
}

/// Orthogonal path of one parent -> child edge.
///
/// `bends` is empty when both ends share a horizontal center, otherwise it holds
/// the two elbow points (source x, then target x) at the same y.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeRoute {
    pub source: NodeId,
    pub target: NodeId,
    pub bends: SmallVec<[Point; 2]>,
}

/// Lays out a tree with the default [`LayeredRanker`].
pub fn layout_tree(tree: &OrgTree, config: &LayoutConfig) -> TreeLayout {
    let nodes = tree.node_ids().cloned().collect::<Vec<_>>();
    layout_with(&LayeredRanker, &nodes, tree.edges(), &tree.children_order(), config)
}

/// Runs the rank pass, the centering pass and edge routing.
///
/// Edges naming a node outside `nodes` are skipped, so are ChildrenOrder
/// entries for unknown ids. Layout never fails.
pub fn layout_with(
    ranker: &dyn RankLayout,
    nodes: &[NodeId],
    edges: &[TreeEdge],
    children_order: &BTreeMap<NodeId, Vec<NodeId>>,
    config: &LayoutConfig,
) -> TreeLayout {
    let known = nodes.iter().collect::<BTreeSet<_>>();
    let live_edges = edges
        .iter()
        .filter(|edge| {
            let live = known.contains(&edge.source) && known.contains(&edge.target);
            if !live {
                tracing::warn!(
                    source = %edge.source,
                    target = %edge.target,
                    "skipping edge with a missing endpoint"
                );
            }
            live
        })
        .cloned()
        .collect::<Vec<_>>();

    let placements = ranker.rank(nodes, &live_edges, config);
    let mut positions = BTreeMap::new();
    let mut ranks = BTreeMap::new();
    for node_id in nodes {
        let Some(placement) = placements.get(node_id) else {
            tracing::warn!(node_id = %node_id, "rank pass returned no placement");
            continue;
        };
        positions.insert(
            node_id.clone(),
            Rect::at(placement.origin, config.node_width, config.node_height),
        );
        ranks.insert(node_id.clone(), placement.rank);
    }

    center_children(nodes, children_order, &mut positions, config);

    let edges = live_edges
        .into_iter()
        .filter_map(|edge| {
            let source = positions.get(&edge.source)?;
            let target = positions.get(&edge.target)?;
            let bends = route_edge(source, target);
            Some(EdgeRoute { source: edge.source, target: edge.target, bends })
        })
        .collect();

    TreeLayout { positions, ranks, edges }
}

/// Places every sibling group as one block centered under its parent.
///
/// Parents are visited in `nodes` order (pre-order for a tree), so a parent's x
/// is final before its own children are placed. Roots keep the rank-pass x.
fn center_children(
    nodes: &[NodeId],
    children_order: &BTreeMap<NodeId, Vec<NodeId>>,
    positions: &mut BTreeMap<NodeId, Rect>,
    config: &LayoutConfig,
) {
    for parent in nodes {
        let Some(children) = children_order.get(parent) else {
            continue;
        };
        let Some(parent_rect) = positions.get(parent).copied() else {
            continue;
        };
        let children =
            children.iter().filter(|child| positions.contains_key(*child)).collect::<Vec<_>>();
        if children.is_empty() {
            continue;
        }

        let count = children.len() as f64;
        let block_width = count * config.node_width + (count - 1.0) * config.sibling_gap;
        let left = parent_rect.center_x() - block_width / 2.0;
        for (slot, child) in children.into_iter().enumerate() {
            if let Some(rect) = positions.get_mut(child) {
                rect.x = left + slot as f64 * (config.node_width + config.sibling_gap);
            }
        }
    }
}

/// Single-elbow orthogonal route from the bottom of `source` to the top of
/// `target`.
pub fn route_edge(source: &Rect, target: &Rect) -> SmallVec<[Point; 2]> {
    let (source_x, target_x) = (source.center_x(), target.center_x());
    if (source_x - target_x).abs() < f64::EPSILON {
        return SmallVec::new();
    }
    let mid_y = (source.bottom() + target.y) / 2.0;
    SmallVec::from_buf([Point::new(source_x, mid_y), Point::new(target_x, mid_y)])
}
