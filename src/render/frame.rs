use crate::core::{EdgeType, NodeType};
use crate::render::layout::{LayoutAlgorithm, Point};
use crate::render::style::{EdgeStyle, NodeStyle};
use crate::render::tooltip::Tooltip;
use serde::Serialize;

/// Complete snapshot of what a presentation layer should draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderFrame {
    pub layout: LayoutAlgorithm,
    pub collapsed: bool,
    pub stats: String,
    pub nodes: Vec<FrameNode>,
    pub edges: Vec<FrameEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub style: NodeStyle,
    pub position: Point,
    pub tooltip: Tooltip,
    pub hidden: bool,
    pub faded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub edge_type: EdgeType,
    pub style: EdgeStyle,
    pub hidden: bool,
    pub faded: bool,
}

impl RenderFrame {
    pub fn visible_nodes(&self) -> impl Iterator<Item = &FrameNode> {
        self.nodes.iter().filter(|n| !n.hidden)
    }

    pub fn visible_edges(&self) -> impl Iterator<Item = &FrameEdge> {
        self.edges.iter().filter(|e| !e.hidden)
    }

    pub fn node(&self, id: &str) -> Option<&FrameNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}
