//! Graphviz DOT export of the current view.

use crate::render::frame::{FrameEdge, FrameNode, RenderFrame};
use crate::render::style::{LineStyle, NodeShape};
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, EdgeReference, NodeIndex};
use std::collections::HashMap;

const FADED_COLOR: &str = "#e0e0e0";

/// Render visible nodes and edges of `frame` as a `digraph`.
///
/// Hidden elements are skipped; faded ones are drawn grey. Graphviz node ids
/// are positions among the visible nodes, the element label carries the name.
pub fn to_dot(frame: &RenderFrame, name: &str) -> String {
    let mut view: DiGraph<&FrameNode, &FrameEdge> = DiGraph::new();
    let mut index: HashMap<&str, NodeIndex> = HashMap::new();
    for node in frame.visible_nodes() {
        index.insert(node.id.as_str(), view.add_node(node));
    }
    for edge in frame.visible_edges() {
        if let (Some(&source), Some(&target)) =
            (index.get(edge.source.as_str()), index.get(edge.target.as_str()))
        {
            view.add_edge(source, target, edge);
        }
    }

    let node_attrs = |_, (_, node): (NodeIndex, &&FrameNode)| {
        let mut style = String::from("filled");
        if node.style.shape == NodeShape::RoundRectangle {
            style.push_str(",rounded");
        }
        let color = if node.faded { FADED_COLOR } else { node.style.color };
        format!(
            "label=\"{}\", shape={}, style=\"{}\", fillcolor=\"{}\", tooltip=\"{}\"",
            escape(&node.label),
            node.style.shape.dot_shape(),
            style,
            color,
            escape(&node.tooltip.to_text())
        )
    };
    let edge_attrs = |_, edge: EdgeReference<'_, &FrameEdge>| {
        let edge = *edge.weight();
        let color = if edge.faded { FADED_COLOR } else { edge.style.color };
        let style = match edge.style.line_style {
            LineStyle::Dashed => "dashed",
            LineStyle::Solid => "solid",
        };
        format!("label=\"{}\", color=\"{}\", style={}", edge.edge_type, color, style)
    };
    let body = Dot::with_attr_getters(
        &view,
        &[Config::NodeNoLabel, Config::EdgeNoLabel, Config::GraphContentOnly],
        &edge_attrs,
        &node_attrs,
    );

    let mut dot = format!("digraph \"{}\" {{\n", escape(name));
    dot.push_str("    rankdir=TB;\n");
    dot.push_str("    nodesep=0.7;\n    ranksep=1.1;\n");
    dot.push_str("    node [style=\"filled\", fontname=\"Helvetica\"];\n");
    dot.push_str("    edge [fontname=\"Helvetica\", fontsize=10];\n");
    dot.push_str(&format!("{body:?}"));
    dot.push_str("}\n");
    dot
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
