// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Orgchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use crate::config::LayoutConfig;
use crate::model::{NodeId, Point, TreeEdge};

/// Where the rank pass put one node.
///
/// Only `rank` and `origin.y` are trusted downstream; the centering pass
/// replaces `origin.x` for every non-root node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankPlacement {
    pub rank: usize,
    pub origin: Point,
}

/// Hierarchical top-to-bottom rank assignment.
///
/// Implementations receive `nodes` in deterministic order and `edges` that
/// only reference ids from `nodes`. They must return a placement for every
/// node and never fail.
pub trait RankLayout {
    fn rank(
        &self,
        nodes: &[NodeId],
        edges: &[TreeEdge],
        config: &LayoutConfig,
    ) -> BTreeMap<NodeId, RankPlacement>;
}

/// Deterministic layered ranker.
///
/// - Orders nodes topologically, preferring input order among ready nodes.
/// - Assigns ranks via longest-path layering.
/// - Orders each rank with one downward barycenter sweep.
/// - Packs each rank left to right with `node_separation` and centers it
///   against the widest rank.
///
/// Nodes stuck on a cycle get rank 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayeredRanker;

impl RankLayout for LayeredRanker {
    fn rank(
        &self,
        nodes: &[NodeId],
        edges: &[TreeEdge],
        config: &LayoutConfig,
    ) -> BTreeMap<NodeId, RankPlacement> {
        let position = nodes
            .iter()
            .enumerate()
            .map(|(idx, node_id)| (node_id, idx))
            .collect::<BTreeMap<_, _>>();

        let mut outgoing = vec![Vec::<usize>::new(); nodes.len()];
        let mut predecessors = vec![Vec::<usize>::new(); nodes.len()];
        for edge in edges {
            let (Some(&from), Some(&to)) = (position.get(&edge.source), position.get(&edge.target))
            else {
                continue;
            };
            outgoing[from].push(to);
            predecessors[to].push(from);
        }
        for tos in outgoing.iter_mut() {
            tos.sort_unstable();
        }

        let (topo, residual) = topo_sort(&outgoing);
        if !residual.is_empty() {
            tracing::warn!(
                nodes = ?residual.iter().map(|idx| nodes[*idx].as_str()).collect::<Vec<_>>(),
                "rank pass found a cycle; placing its nodes on rank 0"
            );
        }
        let mut node_ranks = assign_ranks(nodes.len(), &topo, &outgoing);
        for idx in &residual {
            node_ranks[*idx] = 0;
        }

        let max_rank = node_ranks.iter().copied().max().unwrap_or(0);
        let mut ranks = vec![Vec::<usize>::new(); max_rank + 1];
        for (idx, rank) in node_ranks.iter().enumerate() {
            ranks[*rank].push(idx);
        }

        for rank_idx in 1..ranks.len() {
            let prev_positions = ranks[rank_idx - 1]
                .iter()
                .enumerate()
                .map(|(slot, node)| (*node, slot))
                .collect::<BTreeMap<_, _>>();
            sort_rank_by_barycenter(&mut ranks[rank_idx], &prev_positions, &predecessors);
        }

        let step_x = config.node_width + config.node_separation;
        let step_y = config.node_height + config.rank_separation;
        let rank_width = |count: usize| {
            if count == 0 {
                0.0
            } else {
                count as f64 * config.node_width + (count - 1) as f64 * config.node_separation
            }
        };
        let widest = ranks.iter().map(|rank| rank_width(rank.len())).fold(0.0, f64::max);

        let mut placements = BTreeMap::new();
        for (rank, members) in ranks.iter().enumerate() {
            let offset = (widest - rank_width(members.len())) / 2.0;
            for (slot, idx) in members.iter().enumerate() {
                let origin = Point::new(offset + slot as f64 * step_x, rank as f64 * step_y);
                placements.insert(nodes[*idx].clone(), RankPlacement { rank, origin });
            }
        }
        placements
    }
}

/// Kahn's algorithm over node positions. Returns the topological order and the
/// nodes that could not be ordered (they sit on or below a cycle).
fn topo_sort(outgoing: &[Vec<usize>]) -> (Vec<usize>, Vec<usize>) {
    let mut indegree = vec![0usize; outgoing.len()];
    for tos in outgoing {
        for to in tos {
            indegree[*to] += 1;
        }
    }

    let mut ready = indegree
        .iter()
        .enumerate()
        .filter_map(|(idx, degree)| (*degree == 0).then_some(idx))
        .collect::<BTreeSet<_>>();

    let mut topo = Vec::with_capacity(outgoing.len());
    while let Some(next) = ready.pop_first() {
        topo.push(next);
        for to in &outgoing[next] {
            let degree = &mut indegree[*to];
            *degree = degree.saturating_sub(1);
            if *degree == 0 {
                ready.insert(*to);
            }
        }
    }

    let residual = indegree
        .iter()
        .enumerate()
        .filter_map(|(idx, degree)| (*degree > 0).then_some(idx))
        .collect();
    (topo, residual)
}

fn assign_ranks(len: usize, topo: &[usize], outgoing: &[Vec<usize>]) -> Vec<usize> {
    let mut ranks = vec![0usize; len];
    for from in topo {
        let from_rank = ranks[*from];
        for to in &outgoing[*from] {
            ranks[*to] = ranks[*to].max(from_rank + 1);
        }
    }
    ranks
}

fn sort_rank_by_barycenter(
    rank_nodes: &mut [usize],
    prev_positions: &BTreeMap<usize, usize>,
    predecessors: &[Vec<usize>],
) {
    let barycenter = |node: usize| {
        let (sum, count) = predecessors[node]
            .iter()
            .filter_map(|pred| prev_positions.get(pred).copied())
            .fold((0usize, 0usize), |(sum, count), pos| (sum + pos, count + 1));
        (count > 0).then_some((sum, count))
    };

    rank_nodes.sort_by(|a, b| match (barycenter(*a), barycenter(*b)) {
        (None, None) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (Some((sum_a, count_a)), Some((sum_b, count_b))) => {
            // sum_a/count_a vs sum_b/count_b without floats.
            let left = (sum_a as u128) * (count_b as u128);
            let right = (sum_b as u128) * (count_a as u128);
            left.cmp(&right).then_with(|| a.cmp(b))
        }
    });
}
