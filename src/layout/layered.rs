// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dotlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dotlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use smallvec::SmallVec;

use crate::model::{DotGraph, NodeId};

const ORDERING_SWEEPS: usize = 4;

/// One cell of a layer: a real node (by index into [`DotGraph::nodes`]) or a dummy that carries
/// a long edge (by index into [`DotGraph::edges`]) through an intermediate layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LayoutSlot {
    Node(usize),
    Dummy { edge: usize, step: usize },
}

impl LayoutSlot {
    pub fn is_dummy(self) -> bool {
        matches!(self, Self::Dummy { .. })
    }
}

/// How one graph edge travels through the layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgePath {
    slots: SmallVec<[LayoutSlot; 4]>,
    reversed: bool,
}

impl EdgePath {
    /// Slots from the lower layer to the higher one, one per layer.
    ///
    /// Empty for self loops.
    pub fn slots(&self) -> &[LayoutSlot] {
        &self.slots
    }

    /// True when the edge's head sits in the lower layer (the path runs against the edge).
    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    pub fn is_self_loop(&self) -> bool {
        self.slots.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphLayout {
    layers: Vec<Vec<LayoutSlot>>,
    positions: BTreeMap<LayoutSlot, (usize, usize)>,
    edge_paths: Vec<EdgePath>,
}

impl GraphLayout {
    pub fn layers(&self) -> &[Vec<LayoutSlot>] {
        &self.layers
    }

    /// `(layer, index_in_layer)` of a slot.
    pub fn position(&self, slot: LayoutSlot) -> Option<(usize, usize)> {
        self.positions.get(&slot).copied()
    }

    /// Paths indexed like [`DotGraph::edges`].
    pub fn edge_paths(&self) -> &[EdgePath] {
        &self.edge_paths
    }

    pub fn dummy_count(&self) -> usize {
        self.positions.keys().filter(|slot| slot.is_dummy()).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    UnknownNode { edge_index: usize, node_id: NodeId },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownNode { edge_index, node_id } => {
                write!(f, "edge #{edge_index} references undeclared node {node_id}")
            }
        }
    }
}

impl std::error::Error for LayoutError {}

/// Deterministic layered layout.
///
/// - Cycles are broken by reversing DFS back edges (visiting nodes in declaration order).
/// - Nodes get longest-path layers; edges spanning several layers get one dummy per
///   intermediate layer.
/// - Layers are ordered by alternating barycenter sweeps, keeping the order with the fewest
///   crossings.
/// - `rankdir=RL|BT` mirrors the layer order.
pub fn layout_graph(graph: &DotGraph) -> Result<GraphLayout, LayoutError> {
    let node_count = graph.nodes().len();
    let mut endpoints = Vec::<(usize, usize)>::with_capacity(graph.edges().len());
    for (edge_index, edge) in graph.edges().iter().enumerate() {
        let from = graph.node_position(edge.from_node_id()).ok_or_else(|| {
            LayoutError::UnknownNode { edge_index, node_id: edge.from_node_id().clone() }
        })?;
        let to = graph.node_position(edge.to_node_id()).ok_or_else(|| {
            LayoutError::UnknownNode { edge_index, node_id: edge.to_node_id().clone() }
        })?;
        endpoints.push((from, to));
    }

    let back_edges = find_back_edges(node_count, &endpoints);
    let oriented = endpoints
        .iter()
        .enumerate()
        .map(|(idx, &(from, to))| if back_edges.contains(&idx) { (to, from) } else { (from, to) })
        .collect::<Vec<_>>();

    let node_layers = assign_layers(node_count, &oriented);
    let layer_count = node_layers.iter().copied().max().map_or(0, |max| max + 1);

    let mut layers = vec![Vec::<LayoutSlot>::new(); layer_count];
    for (node_idx, &layer) in node_layers.iter().enumerate() {
        layers[layer].push(LayoutSlot::Node(node_idx));
    }

    let mut edge_paths = Vec::<EdgePath>::with_capacity(oriented.len());
    for (edge_idx, &(from, to)) in oriented.iter().enumerate() {
        if from == to {
            edge_paths.push(EdgePath { slots: SmallVec::new(), reversed: false });
            continue;
        }

        let from_layer = node_layers[from];
        let to_layer = node_layers[to];
        let mut slots = SmallVec::<[LayoutSlot; 4]>::new();
        slots.push(LayoutSlot::Node(from));
        for (step, layer) in (from_layer + 1..to_layer).enumerate() {
            let dummy = LayoutSlot::Dummy { edge: edge_idx, step };
            layers[layer].push(dummy);
            slots.push(dummy);
        }
        slots.push(LayoutSlot::Node(to));
        edge_paths.push(EdgePath { slots, reversed: back_edges.contains(&edge_idx) });
    }

    order_layers(&mut layers, &edge_paths);

    if graph.rank_dir().is_reversed() {
        layers.reverse();
        for path in &mut edge_paths {
            path.slots.reverse();
            if !path.slots.is_empty() {
                path.reversed = !path.reversed;
            }
        }
    }

    let mut positions = BTreeMap::<LayoutSlot, (usize, usize)>::new();
    for (layer_idx, layer) in layers.iter().enumerate() {
        for (index_in_layer, slot) in layer.iter().enumerate() {
            positions.insert(*slot, (layer_idx, index_in_layer));
        }
    }

    Ok(GraphLayout { layers, positions, edge_paths })
}

/// Returns indices of edges that close a cycle during an iterative DFS.
fn find_back_edges(node_count: usize, endpoints: &[(usize, usize)]) -> BTreeSet<usize> {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Mark {
        Unvisited,
        OnStack,
        Done,
    }

    let mut outgoing = vec![Vec::<usize>::new(); node_count];
    for (edge_idx, &(from, to)) in endpoints.iter().enumerate() {
        if from != to {
            outgoing[from].push(edge_idx);
        }
    }

    let mut marks = vec![Mark::Unvisited; node_count];
    let mut back_edges = BTreeSet::new();

    for root in 0..node_count {
        if marks[root] != Mark::Unvisited {
            continue;
        }

        // (node, next outgoing edge cursor)
        let mut stack = vec![(root, 0usize)];
        marks[root] = Mark::OnStack;

        while let Some((node, cursor)) = stack.last_mut() {
            let node = *node;
            let Some(&edge_idx) = outgoing[node].get(*cursor) else {
                marks[node] = Mark::Done;
                stack.pop();
                continue;
            };
            *cursor += 1;

            let (_, to) = endpoints[edge_idx];
            match marks[to] {
                Mark::Unvisited => {
                    marks[to] = Mark::OnStack;
                    stack.push((to, 0));
                }
                Mark::OnStack => {
                    back_edges.insert(edge_idx);
                }
                Mark::Done => {}
            }
        }
    }

    back_edges
}

/// Longest-path layering over an acyclic edge list (self loops are ignored).
fn assign_layers(node_count: usize, oriented: &[(usize, usize)]) -> Vec<usize> {
    let mut indegree = vec![0usize; node_count];
    let mut outgoing = vec![Vec::<usize>::new(); node_count];
    for &(from, to) in oriented {
        if from != to {
            outgoing[from].push(to);
            indegree[to] += 1;
        }
    }

    let mut ready = (0..node_count).filter(|&idx| indegree[idx] == 0).collect::<BTreeSet<_>>();
    let mut layers = vec![0usize; node_count];

    while let Some(next) = ready.pop_first() {
        for &to in &outgoing[next] {
            layers[to] = layers[to].max(layers[next] + 1);
            indegree[to] -= 1;
            if indegree[to] == 0 {
                ready.insert(to);
            }
        }
    }

    layers
}

type Neighbors = BTreeMap<LayoutSlot, Vec<LayoutSlot>>;

fn order_layers(layers: &mut [Vec<LayoutSlot>], edge_paths: &[EdgePath]) {
    if layers.len() < 2 {
        return;
    }

    let mut predecessors = Neighbors::new();
    let mut successors = Neighbors::new();
    for path in edge_paths {
        for pair in path.slots.windows(2) {
            successors.entry(pair[0]).or_default().push(pair[1]);
            predecessors.entry(pair[1]).or_default().push(pair[0]);
        }
    }

    let mut best = layers.to_vec();
    let mut best_crossings = count_crossings(layers, &successors);

    for sweep in 0..ORDERING_SWEEPS {
        if best_crossings == 0 {
            break;
        }

        if sweep % 2 == 0 {
            for layer_idx in 1..layers.len() {
                let (fixed, moving) = layers.split_at_mut(layer_idx);
                sort_by_barycenter(&mut moving[0], &fixed[layer_idx - 1], &predecessors);
            }
        } else {
            for layer_idx in (0..layers.len() - 1).rev() {
                let (moving, fixed) = layers.split_at_mut(layer_idx + 1);
                sort_by_barycenter(&mut moving[layer_idx], &fixed[0], &successors);
            }
        }

        let crossings = count_crossings(layers, &successors);
        if crossings < best_crossings {
            best_crossings = crossings;
            best = layers.to_vec();
        }
    }

    layers.clone_from_slice(&best);
}

fn sort_by_barycenter(moving: &mut [LayoutSlot], fixed: &[LayoutSlot], neighbors: &Neighbors) {
    let fixed_positions = fixed
        .iter()
        .enumerate()
        .map(|(idx, slot)| (*slot, idx))
        .collect::<BTreeMap<_, _>>();

    // Slots without neighbors keep their current index as barycenter so they stay put.
    let keyed = moving
        .iter()
        .enumerate()
        .map(|(current, slot)| {
            let (sum, count) = neighbors
                .get(slot)
                .map(|adjacent| {
                    adjacent
                        .iter()
                        .filter_map(|neighbor| fixed_positions.get(neighbor).copied())
                        .fold((0usize, 0usize), |(sum, count), pos| (sum + pos, count + 1))
                })
                .unwrap_or((0, 0));
            if count == 0 {
                (current, 1, current, *slot)
            } else {
                (sum, count, current, *slot)
            }
        })
        .collect::<Vec<_>>();

    let mut sorted = keyed;
    sorted.sort_by(|(sum_a, count_a, idx_a, _), (sum_b, count_b, idx_b, _)| {
        // Compare sum_a/count_a vs sum_b/count_b without floats.
        let left = (*sum_a as u128) * (*count_b as u128);
        let right = (*sum_b as u128) * (*count_a as u128);
        left.cmp(&right).then_with(|| idx_a.cmp(idx_b))
    });

    for (target, (_, _, _, slot)) in moving.iter_mut().zip(sorted) {
        *target = slot;
    }
}

fn count_crossings(layers: &[Vec<LayoutSlot>], successors: &Neighbors) -> usize {
    let mut total = 0usize;
    for pair in layers.windows(2) {
        let upper = pair[0]
            .iter()
            .enumerate()
            .map(|(idx, slot)| (*slot, idx))
            .collect::<BTreeMap<_, _>>();
        let lower = pair[1]
            .iter()
            .enumerate()
            .map(|(idx, slot)| (*slot, idx))
            .collect::<BTreeMap<_, _>>();

        let mut segments = Vec::<(usize, usize)>::new();
        for (slot, &from_pos) in &upper {
            for to in successors.get(slot).map(Vec::as_slice).unwrap_or(&[]) {
                if let Some(&to_pos) = lower.get(to) {
                    segments.push((from_pos, to_pos));
                }
            }
        }

        for (idx, a) in segments.iter().enumerate() {
            for b in &segments[idx + 1..] {
                if (a.0.cmp(&b.0) == Ordering::Less && a.1 > b.1)
                    || (a.0.cmp(&b.0) == Ordering::Greater && a.1 < b.1)
                {
                    total += 1;
                }
            }
        }
    }
    total
}
