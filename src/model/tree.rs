// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Orgchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::ids::{NodeId, NodeIndex};

/// An organizational unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgNode {
    label: String,
}

impl OrgNode {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }
}

/// Directed parent -> child membership.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TreeEdge {
    pub source: NodeId,
    pub target: NodeId,
}

impl TreeEdge {
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self { source, target }
    }
}

/// Initial chart contents handed over by whoever loads the chart.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChartData {
    pub nodes: Vec<ChartNode>,
    #[serde(default)]
    pub edges: Vec<TreeEdge>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartNode {
    pub id: NodeId,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Slot {
    id: NodeId,
    node: OrgNode,
    parent: Option<NodeIndex>,
    children: Vec<NodeIndex>,
}

/// The canonical tree store.
///
/// Nodes live in an arena; every slot keeps its parent link (the single incoming
/// edge) and its ordered child list (the ChildrenOrder entry). Edges and the
/// deterministic node order are derived from those two and rebuilt after each
/// structural change, so they can never drift from the parent/child links.
///
/// Only [`crate::ops`] mutates a tree; everything else reads it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrgTree {
    slots: Vec<Option<Slot>>,
    free: Vec<usize>,
    by_id: BTreeMap<NodeId, NodeIndex>,
    order: Vec<NodeIndex>,
    edges: Vec<TreeEdge>,
    rev: u64,
}

impl OrgTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a tree from an initial node list and edge list.
    ///
    /// Each parent's child order follows the children's position in `nodes`.
    pub fn from_parts<N, E>(nodes: N, edges: E) -> Result<Self, TreeLoadError>
    where
        N: IntoIterator<Item = (NodeId, OrgNode)>,
        E: IntoIterator<Item = TreeEdge>,
    {
        let mut tree = Self::new();
        for (node_id, node) in nodes {
            if tree.by_id.contains_key(&node_id) {
                return Err(TreeLoadError::DuplicateNode { node_id });
            }
            tree.insert_slot(node_id, node);
        }

        for edge in edges {
            let Some(source) = tree.index_of(&edge.source) else {
                return Err(TreeLoadError::UnknownNode { node_id: edge.source.clone(), edge });
            };
            let Some(target) = tree.index_of(&edge.target) else {
                return Err(TreeLoadError::UnknownNode { node_id: edge.target.clone(), edge });
            };
            if source == target {
                return Err(TreeLoadError::SelfEdge { node_id: edge.source });
            }
            if let Some(existing) = tree.slot(target).and_then(|slot| slot.parent) {
                let first_parent = tree.slot_id(existing).clone();
                return Err(TreeLoadError::MultipleParents {
                    node_id: edge.target,
                    first_parent,
                    second_parent: edge.source,
                });
            }
            if let Some(slot) = tree.slot_mut(target) {
                slot.parent = Some(source);
            }
            if let Some(slot) = tree.slot_mut(source) {
                slot.children.push(target);
            }
        }

        // Slots were filled in list order, so slot index == list position.
        for slot in tree.slots.iter_mut().flatten() {
            slot.children.sort();
        }

        let reachable = tree.reachable_from_roots();
        if reachable.len() != tree.by_id.len() {
            let nodes = tree
                .by_id
                .iter()
                .filter(|(_, index)| !reachable.contains(index))
                .map(|(node_id, _)| node_id.clone())
                .collect();
            return Err(TreeLoadError::CycleDetected { nodes });
        }
        tree.rebuild_derived();
        Ok(tree)
    }

    pub fn from_chart(chart: &ChartData) -> Result<Self, TreeLoadError> {
        Self::from_parts(
            chart
                .nodes
                .iter()
                .map(|node| (node.id.clone(), OrgNode::new(node.label.clone()))),
            chart.edges.iter().cloned(),
        )
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Incremented once per applied operation.
    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub fn contains(&self, node_id: &NodeId) -> bool {
        self.by_id.contains_key(node_id)
    }

    pub fn index_of(&self, node_id: &NodeId) -> Option<NodeIndex> {
        self.by_id.get(node_id).copied()
    }

    pub fn id_at(&self, index: NodeIndex) -> Option<&NodeId> {
        self.slot(index).map(|slot| &slot.id)
    }

    pub fn node(&self, node_id: &NodeId) -> Option<&OrgNode> {
        self.slot_by_id(node_id).map(|slot| &slot.node)
    }

    pub fn parent(&self, node_id: &NodeId) -> Option<&NodeId> {
        let parent = self.slot_by_id(node_id)?.parent?;
        self.id_at(parent)
    }

    /// Children of `node_id` in ChildrenOrder sequence.
    pub fn children(&self, node_id: &NodeId) -> Vec<NodeId> {
        self.slot_by_id(node_id)
            .map(|slot| slot.children.iter().map(|child| self.slot_id(*child).clone()).collect())
            .unwrap_or_default()
    }

    pub fn child_count(&self, node_id: &NodeId) -> usize {
        self.slot_by_id(node_id).map_or(0, |slot| slot.children.len())
    }

    /// Position of `node_id` inside its parent's ChildrenOrder entry.
    pub fn sibling_index(&self, node_id: &NodeId) -> Option<usize> {
        let index = self.index_of(node_id)?;
        let parent = self.slot(index)?.parent?;
        self.slot(parent)?.children.iter().position(|child| *child == index)
    }

    pub fn roots(&self) -> Vec<NodeId> {
        self.order
            .iter()
            .filter_map(|index| self.slot(*index))
            .filter(|slot| slot.parent.is_none())
            .map(|slot| slot.id.clone())
            .collect()
    }

    /// All node ids in deterministic pre-order (roots first, children by
    /// ChildrenOrder).
    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> + '_ {
        self.order.iter().map(move |index| self.slot_id(*index))
    }

    /// Edge collection derived from the parent/child links, in node order.
    pub fn edges(&self) -> &[TreeEdge] {
        &self.edges
    }

    /// ChildrenOrder view: one entry per node that currently has children.
    pub fn children_order(&self) -> BTreeMap<NodeId, Vec<NodeId>> {
        self.slots
            .iter()
            .flatten()
            .filter(|slot| !slot.children.is_empty())
            .map(|slot| {
                let children =
                    slot.children.iter().map(|child| self.slot_id(*child).clone()).collect();
                (slot.id.clone(), children)
            })
            .collect()
    }

    /// `node_id` and every descendant, pre-order.
    pub fn subtree(&self, node_id: &NodeId) -> Vec<NodeId> {
        self.index_of(node_id)
            .map(|index| {
                self.subtree_indices(index)
                    .into_iter()
                    .map(|index| self.slot_id(index).clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether `candidate` is `root` or one of its descendants.
    pub fn is_in_subtree(&self, root: &NodeId, candidate: &NodeId) -> bool {
        match (self.index_of(root), self.index_of(candidate)) {
            (Some(root), Some(candidate)) => self.subtree_indices(root).contains(&candidate),
            _ => false,
        }
    }

    pub(crate) fn subtree_indices(&self, root: NodeIndex) -> Vec<NodeIndex> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(index) = stack.pop() {
            let Some(slot) = self.slot(index) else {
                continue;
            };
            out.push(index);
            stack.extend(slot.children.iter().rev().copied());
        }
        out
    }

    pub(crate) fn parent_index(&self, index: NodeIndex) -> Option<NodeIndex> {
        self.slot(index)?.parent
    }

    pub(crate) fn child_indices(&self, index: NodeIndex) -> &[NodeIndex] {
        self.slot(index).map(|slot| slot.children.as_slice()).unwrap_or(&[])
    }

    pub(crate) fn node_mut(&mut self, index: NodeIndex) -> Option<&mut OrgNode> {
        self.slot_mut(index).map(|slot| &mut slot.node)
    }

    pub(crate) fn insert_slot(&mut self, node_id: NodeId, node: OrgNode) -> NodeIndex {
        let slot = Slot { id: node_id.clone(), node, parent: None, children: Vec::new() };
        let index = match self.free.pop() {
            Some(raw) => {
                self.slots[raw] = Some(slot);
                NodeIndex(raw)
            }
            None => {
                self.slots.push(Some(slot));
                NodeIndex(self.slots.len() - 1)
            }
        };
        self.by_id.insert(node_id, index);
        index
    }

    /// Drops the slot itself. The caller detaches it and its children first.
    pub(crate) fn remove_slot(&mut self, index: NodeIndex) -> Option<(NodeId, OrgNode)> {
        let slot = self.slots.get_mut(index.0)?.take()?;
        self.by_id.remove(&slot.id);
        self.free.push(index.0);
        Some((slot.id, slot.node))
    }

    /// Removes the incoming edge of `index` and its ChildrenOrder entry under the
    /// previous parent. Outgoing links are untouched.
    pub(crate) fn detach(&mut self, index: NodeIndex) -> Option<NodeIndex> {
        let parent = self.slot_mut(index)?.parent.take()?;
        if let Some(parent_slot) = self.slot_mut(parent) {
            parent_slot.children.retain(|child| *child != index);
        }
        Some(parent)
    }

    /// Links `index` under `parent` at `min(insert_index, len)`; `None` appends.
    pub(crate) fn attach(&mut self, index: NodeIndex, parent: NodeIndex, insert_index: Option<usize>) {
        let Some(parent_slot) = self.slot_mut(parent) else {
            return;
        };
        let at = insert_index
            .unwrap_or(parent_slot.children.len())
            .min(parent_slot.children.len());
        parent_slot.children.insert(at, index);
        if let Some(slot) = self.slot_mut(index) {
            slot.parent = Some(parent);
        }
    }

    pub(crate) fn bump_rev(&mut self) {
        self.rev = self.rev.saturating_add(1);
    }

    /// Recomputes the pre-order node list and the edge collection.
    pub(crate) fn rebuild_derived(&mut self) {
        let previous = std::mem::take(&mut self.order);
        let live = (0..self.slots.len()).map(NodeIndex).filter(|index| self.slot(*index).is_some());

        let mut visited = BTreeSet::new();
        let mut order = Vec::with_capacity(self.by_id.len());
        let candidates = previous.iter().copied().chain(live.clone()).collect::<Vec<_>>();
        for index in &candidates {
            let is_root = self.slot(*index).is_some_and(|slot| slot.parent.is_none());
            if is_root && !visited.contains(index) {
                self.preorder_into(*index, &mut visited, &mut order);
            }
        }

        for index in live {
            if visited.insert(index) {
                tracing::warn!(node_id = %self.slot_id(index), "node unreachable from any root");
                order.push(index);
            }
        }

        let mut seen = BTreeSet::new();
        let mut edges = Vec::with_capacity(order.len());
        for index in &order {
            let Some(slot) = self.slot(*index) else {
                continue;
            };
            for child in &slot.children {
                let Some(child_slot) = self.slot(*child) else {
                    continue;
                };
                if seen.insert((*index, *child)) {
                    edges.push(TreeEdge::new(slot.id.clone(), child_slot.id.clone()));
                }
            }
        }

        self.order = order;
        self.edges = edges;
    }

    fn preorder_into(
        &self,
        root: NodeIndex,
        visited: &mut BTreeSet<NodeIndex>,
        order: &mut Vec<NodeIndex>,
    ) {
        let mut stack = vec![root];
        while let Some(index) = stack.pop() {
            if !visited.insert(index) {
                continue;
            }
            order.push(index);
            stack.extend(self.child_indices(index).iter().rev().copied());
        }
    }

    fn reachable_from_roots(&self) -> BTreeSet<NodeIndex> {
        let mut visited = BTreeSet::new();
        let mut order = Vec::new();
        for index in self.by_id.values() {
            if self.parent_index(*index).is_none() {
                self.preorder_into(*index, &mut visited, &mut order);
            }
        }
        visited
    }

    fn slot(&self, index: NodeIndex) -> Option<&Slot> {
        self.slots.get(index.0).and_then(Option::as_ref)
    }

    fn slot_mut(&mut self, index: NodeIndex) -> Option<&mut Slot> {
        self.slots.get_mut(index.0).and_then(Option::as_mut)
    }

    fn slot_by_id(&self, node_id: &NodeId) -> Option<&Slot> {
        self.slot(self.index_of(node_id)?)
    }

    fn slot_id(&self, index: NodeIndex) -> &NodeId {
        match self.slot(index) {
            Some(slot) => &slot.id,
            None => unreachable!("derived indices always point at live slots"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeLoadError {
    DuplicateNode { node_id: NodeId },
    UnknownNode { node_id: NodeId, edge: TreeEdge },
    SelfEdge { node_id: NodeId },
    MultipleParents { node_id: NodeId, first_parent: NodeId, second_parent: NodeId },
    CycleDetected { nodes: Vec<NodeId> },
}

impl fmt::Display for TreeLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateNode { node_id } => write!(f, "duplicate node id {node_id}"),
            Self::UnknownNode { node_id, edge } => write!(
                f,
                "edge {} -> {} references unknown node {node_id}",
                edge.source, edge.target
            ),
            Self::SelfEdge { node_id } => write!(f, "node {node_id} cannot be its own parent"),
            Self::MultipleParents { node_id, first_parent, second_parent } => write!(
                f,
                "node {node_id} has more than one parent ({first_parent}, {second_parent})"
            ),
            Self::CycleDetected { nodes } => {
                write!(f, "chart contains a cycle involving nodes: ")?;
                for (idx, node_id) in nodes.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{node_id}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for TreeLoadError {}
