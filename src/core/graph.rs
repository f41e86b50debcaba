//! Validated, indexed code graph.
//!
//! A [`CodeGraph`] can only be built through [`CodeGraph::new`], which checks
//! that node and edge ids are unique and that every edge endpoint names a node
//! in the same graph. Everything downstream of the decoder relies on that.
//!
//! The topology lives in a petgraph [`DiGraph`] whose node and edge weights are
//! positions in engine order, so `NodeIndex::index()` is the node's position.

use crate::core::errors::GraphIntegrityError;
use crate::core::types::{EdgeType, GraphEdge, GraphNode, NodeType};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Default, Serialize)]
pub struct CodeGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    #[serde(skip)]
    node_index: HashMap<String, NodeIndex>,
    #[serde(skip)]
    topology: DiGraph<usize, usize>,
}

impl CodeGraph {
    pub fn new(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Result<Self, GraphIntegrityError> {
        let mut topology = DiGraph::with_capacity(nodes.len(), edges.len());
        let mut node_index = HashMap::with_capacity(nodes.len());
        for (position, node) in nodes.iter().enumerate() {
            if node_index.contains_key(&node.id) {
                return Err(GraphIntegrityError::DuplicateNodeId(node.id.clone()));
            }
            node_index.insert(node.id.clone(), topology.add_node(position));
        }

        let mut edge_ids = HashSet::with_capacity(edges.len());
        for (position, edge) in edges.iter().enumerate() {
            if !edge_ids.insert(edge.id.as_str()) {
                return Err(GraphIntegrityError::DuplicateEdgeId(edge.id.clone()));
            }
            let endpoint = |name: &'static str, node: &String| {
                node_index
                    .get(node)
                    .copied()
                    .ok_or_else(|| GraphIntegrityError::DanglingEdge {
                        edge: edge.id.clone(),
                        endpoint: name,
                        node: node.clone(),
                    })
            };
            let source = endpoint("source", &edge.source)?;
            let target = endpoint("target", &edge.target)?;
            topology.add_edge(source, target, position);
        }

        Ok(Self {
            nodes,
            edges,
            node_index,
            topology,
        })
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.node_index.get(id).map(|ix| &self.nodes[ix.index()])
    }

    /// Position of the node in engine order.
    pub fn node_position(&self, id: &str) -> Option<usize> {
        self.node_index.get(id).map(|ix| ix.index())
    }

    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.node_index.get(id).copied()
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    /// Directed topology; weights are positions into [`nodes`](Self::nodes)
    /// and [`edges`](Self::edges).
    pub fn topology(&self) -> &DiGraph<usize, usize> {
        &self.topology
    }

    pub fn nodes_of_type(&self, node_type: NodeType) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(move |n| n.node_type == node_type)
    }

    pub fn edges_of_type(&self, edge_type: EdgeType) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter().filter(move |e| e.edge_type == edge_type)
    }

    pub fn outgoing(&self, id: &str) -> impl Iterator<Item = &GraphEdge> {
        self.directed(id, Direction::Outgoing)
    }

    pub fn incoming(&self, id: &str) -> impl Iterator<Item = &GraphEdge> {
        self.directed(id, Direction::Incoming)
    }

    /// Every edge with `id` at either end, each listed once.
    pub fn incident<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a GraphEdge> + 'a {
        let self_loops_once = self.incoming(id).filter(move |e| e.source != id);
        self.outgoing(id).chain(self_loops_once)
    }

    /// Edges at `id` in `direction`, in engine order.
    fn directed(&self, id: &str, direction: Direction) -> impl Iterator<Item = &GraphEdge> {
        let mut positions: Vec<usize> = self
            .node_index
            .get(id)
            .map(|&ix| {
                self.topology
                    .edges_directed(ix, direction)
                    .map(|edge| *edge.weight())
                    .collect()
            })
            .unwrap_or_default();
        positions.sort_unstable();
        positions.into_iter().map(move |position| &self.edges[position])
    }
}
