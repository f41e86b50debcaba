//! Fixed visual mapping from node/edge type to color and shape.

use crate::core::{EdgeType, NodeType};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeShape {
    RoundRectangle,
    Diamond,
    Hexagon,
    Ellipse,
    Rectangle,
}

impl NodeShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeShape::RoundRectangle => "round-rectangle",
            NodeShape::Diamond => "diamond",
            NodeShape::Hexagon => "hexagon",
            NodeShape::Ellipse => "ellipse",
            NodeShape::Rectangle => "rectangle",
        }
    }

    /// Closest Graphviz shape.
    pub fn dot_shape(&self) -> &'static str {
        match self {
            NodeShape::RoundRectangle | NodeShape::Rectangle => "box",
            NodeShape::Diamond => "diamond",
            NodeShape::Hexagon => "hexagon",
            NodeShape::Ellipse => "ellipse",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    Solid,
    Dashed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeStyle {
    pub color: &'static str,
    pub shape: NodeShape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStyle {
    pub color: &'static str,
    pub line_style: LineStyle,
}

pub fn node_style(node_type: NodeType) -> NodeStyle {
    let (color, shape) = match node_type {
        NodeType::Class => ("#4fc3f7", NodeShape::RoundRectangle),
        NodeType::Interface => ("#81c784", NodeShape::Diamond),
        NodeType::Enum => ("#ffb74d", NodeShape::Hexagon),
        NodeType::Method => ("#ce93d8", NodeShape::Ellipse),
        NodeType::Constructor => ("#f48fb1", NodeShape::Ellipse),
        NodeType::Package => ("#90a4ae", NodeShape::Rectangle),
    };
    NodeStyle { color, shape }
}

pub fn edge_style(edge_type: EdgeType) -> EdgeStyle {
    let color = match edge_type {
        EdgeType::Calls => "#aaaaaa",
        EdgeType::Extends => "#4fc3f7",
        EdgeType::Implements => "#81c784",
        EdgeType::Dependency => "#ffb74d",
        EdgeType::Contains => "#555555",
        EdgeType::Imports => "#666666",
        EdgeType::Overrides => "#ce93d8",
    };
    let line_style = if edge_type == EdgeType::Implements {
        LineStyle::Dashed
    } else {
        LineStyle::Solid
    };
    EdgeStyle { color, line_style }
}
