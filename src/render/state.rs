//! Derived visual state: which elements are hidden and which are faded.
//!
//! Both are recomputed from scratch against the current graph; nothing here
//! is patched incrementally.

use crate::core::CodeGraph;
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityMask {
    pub hidden_nodes: BTreeSet<String>,
    pub hidden_edges: BTreeSet<String>,
}

impl VisibilityMask {
    /// Collapsed hides member nodes (methods, constructors) and every edge
    /// touching a hidden node. Expanded hides nothing.
    pub fn compute(graph: &CodeGraph, collapsed: bool) -> Self {
        if !collapsed {
            return Self::default();
        }

        let hidden_nodes: BTreeSet<String> = graph
            .nodes()
            .iter()
            .filter(|node| node.node_type.is_member())
            .map(|node| node.id.clone())
            .collect();
        let hidden_edges = graph
            .edges()
            .iter()
            .filter(|edge| {
                hidden_nodes.contains(&edge.source) || hidden_nodes.contains(&edge.target)
            })
            .map(|edge| edge.id.clone())
            .collect();

        Self {
            hidden_nodes,
            hidden_edges,
        }
    }

    pub fn is_node_hidden(&self, id: &str) -> bool {
        self.hidden_nodes.contains(id)
    }

    pub fn is_edge_hidden(&self, id: &str) -> bool {
        self.hidden_edges.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.hidden_nodes.is_empty() && self.hidden_edges.is_empty()
    }
}

/// Hover emphasis. `focus == None` means nothing is faded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    pub focus: Option<String>,
    pub faded_nodes: BTreeSet<String>,
    pub faded_edges: BTreeSet<String>,
}

impl Highlight {
    /// Fade everything outside the one-hop neighborhood of `hovered`.
    ///
    /// An id that is not in the graph clears the highlight.
    pub fn compute(graph: &CodeGraph, hovered: Option<&str>) -> Self {
        let Some(focus) = hovered.filter(|id| graph.contains_node(id)) else {
            return Self::default();
        };

        let mut kept_nodes = BTreeSet::new();
        let mut kept_edges = BTreeSet::new();
        kept_nodes.insert(focus);
        for edge in graph.incident(focus) {
            kept_edges.insert(edge.id.as_str());
            kept_nodes.insert(edge.source.as_str());
            kept_nodes.insert(edge.target.as_str());
        }

        Self {
            focus: Some(focus.to_string()),
            faded_nodes: graph
                .nodes()
                .iter()
                .filter(|node| !kept_nodes.contains(node.id.as_str()))
                .map(|node| node.id.clone())
                .collect(),
            faded_edges: graph
                .edges()
                .iter()
                .filter(|edge| !kept_edges.contains(edge.id.as_str()))
                .map(|edge| edge.id.clone())
                .collect(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.focus.is_some()
    }

    pub fn is_node_faded(&self, id: &str) -> bool {
        self.faded_nodes.contains(id)
    }

    pub fn is_edge_faded(&self, id: &str) -> bool {
        self.faded_edges.contains(id)
    }
}
