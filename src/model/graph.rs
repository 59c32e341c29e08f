// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dotlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dotlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::ids::{ClusterId, NodeId};

pub type Attributes = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphKind {
    Graph,
    #[default]
    Digraph,
}

impl GraphKind {
    pub fn is_directed(self) -> bool {
        matches!(self, Self::Digraph)
    }

    pub fn edge_op(self) -> &'static str {
        match self {
            Self::Graph => "--",
            Self::Digraph => "->",
        }
    }
}

impl fmt::Display for GraphKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Graph => f.write_str("graph"),
            Self::Digraph => f.write_str("digraph"),
        }
    }
}

/// Flow direction requested through the `rankdir` graph attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankDir {
    #[default]
    TopBottom,
    LeftRight,
    BottomTop,
    RightLeft,
}

impl RankDir {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "TB" => Some(Self::TopBottom),
            "LR" => Some(Self::LeftRight),
            "BT" => Some(Self::BottomTop),
            "RL" => Some(Self::RightLeft),
            _ => None,
        }
    }

    /// Whether layers are laid out against the natural reading order.
    pub fn is_reversed(self) -> bool {
        matches!(self, Self::BottomTop | Self::RightLeft)
    }
}

/// A parsed dot graph.
///
/// Nodes and edges keep their declaration order, which seeds the layout's initial ordering.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DotGraph {
    name: Option<String>,
    kind: GraphKind,
    strict: bool,
    attributes: Attributes,
    nodes: Vec<GraphNode>,
    node_index: BTreeMap<NodeId, usize>,
    edges: Vec<GraphEdge>,
    clusters: BTreeMap<ClusterId, Cluster>,
}

impl DotGraph {
    pub fn new(kind: GraphKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name<T: Into<String>>(&mut self, name: Option<T>) {
        self.name = name.map(Into::into);
    }

    pub fn kind(&self) -> GraphKind {
        self.kind
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    pub fn rank_dir(&self) -> RankDir {
        self.attributes.get("rankdir").and_then(|value| RankDir::parse(value)).unwrap_or_default()
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn node(&self, node_id: &NodeId) -> Option<&GraphNode> {
        self.node_index.get(node_id).map(|&idx| &self.nodes[idx])
    }

    pub fn node_position(&self, node_id: &NodeId) -> Option<usize> {
        self.node_index.get(node_id).copied()
    }

    /// Declares `node_id` if needed and merges `attributes` into it.
    ///
    /// `defaults` are applied only when the node is created, mirroring dot's scoping rules where
    /// `node [...]` statements affect nodes declared after them.
    pub fn upsert_node(&mut self, node_id: NodeId, defaults: &Attributes, attributes: &Attributes) {
        let idx = match self.node_index.get(&node_id) {
            Some(&idx) => idx,
            None => {
                let idx = self.nodes.len();
                let mut node = GraphNode::new(node_id.clone());
                node.attributes.extend(defaults.iter().map(|(k, v)| (k.clone(), v.clone())));
                self.nodes.push(node);
                self.node_index.insert(node_id, idx);
                idx
            }
        };

        let node = &mut self.nodes[idx];
        node.attributes.extend(attributes.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// Adds an edge between two declared nodes.
    ///
    /// In strict graphs a repeated edge merges its attributes into the existing one instead.
    pub fn add_edge(&mut self, edge: GraphEdge) {
        if self.strict {
            let directed = self.kind.is_directed();
            if let Some(existing) = self.edges.iter_mut().find(|existing| {
                existing.connects(&edge.from_node_id, &edge.to_node_id, directed)
            }) {
                existing.attributes.extend(edge.attributes);
                return;
            }
        }
        self.edges.push(edge);
    }

    pub fn clusters(&self) -> &BTreeMap<ClusterId, Cluster> {
        &self.clusters
    }

    pub fn clusters_mut(&mut self) -> &mut BTreeMap<ClusterId, Cluster> {
        &mut self.clusters
    }

    pub fn cluster_of(&self, node_id: &NodeId) -> Option<&ClusterId> {
        self.clusters
            .iter()
            .find(|(_, cluster)| cluster.nodes().contains(node_id))
            .map(|(cluster_id, _)| cluster_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    id: NodeId,
    attributes: Attributes,
}

impl GraphNode {
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            attributes: Attributes::new(),
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Display label: the `label` attribute with `\N` expanded, or the node id.
    pub fn label(&self) -> String {
        match self.attribute("label") {
            Some(label) => label.replace("\\N", self.id.as_str()),
            None => self.id.to_string(),
        }
    }

    pub fn shape(&self) -> &str {
        self.attribute("shape").unwrap_or("ellipse")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdge {
    from_node_id: NodeId,
    to_node_id: NodeId,
    attributes: Attributes,
}

impl GraphEdge {
    pub fn new(from_node_id: NodeId, to_node_id: NodeId) -> Self {
        Self {
            from_node_id,
            to_node_id,
            attributes: Attributes::new(),
        }
    }

    pub fn new_with(from_node_id: NodeId, to_node_id: NodeId, attributes: Attributes) -> Self {
        Self {
            from_node_id,
            to_node_id,
            attributes,
        }
    }

    pub fn from_node_id(&self) -> &NodeId {
        &self.from_node_id
    }

    pub fn to_node_id(&self) -> &NodeId {
        &self.to_node_id
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn label(&self) -> Option<&str> {
        self.attribute("label").filter(|label| !label.is_empty())
    }

    pub fn is_self_loop(&self) -> bool {
        self.from_node_id == self.to_node_id
    }

    fn connects(&self, from: &NodeId, to: &NodeId, directed: bool) -> bool {
        (self.from_node_id == *from && self.to_node_id == *to)
            || (!directed && self.from_node_id == *to && self.to_node_id == *from)
    }
}

/// A `subgraph cluster…` block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cluster {
    label: Option<String>,
    nodes: Vec<NodeId>,
}

impl Cluster {
    pub fn new<T: Into<String>>(label: Option<T>) -> Self {
        Self {
            label: label.map(Into::into),
            nodes: Vec::new(),
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_label<T: Into<String>>(&mut self, label: Option<T>) {
        self.label = label.map(Into::into);
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn add_node(&mut self, node_id: NodeId) {
        if !self.nodes.contains(&node_id) {
            self.nodes.push(node_id);
        }
    }
}
