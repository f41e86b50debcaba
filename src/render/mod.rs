//! Render Engine: per-surface view state over the current graph.
//!
//! Every operation runs synchronously against in-memory state and answers
//! with the [`RenderCommand`]s a presentation layer needs to apply. The
//! received graph is never mutated; visibility, highlight and positions are
//! derived from it.

pub mod dot;
pub mod events;
pub mod frame;
pub mod layout;
pub mod state;
pub mod style;
pub mod tooltip;

pub use events::{RenderCommand, UiEvent};
pub use frame::{FrameEdge, FrameNode, RenderFrame};
pub use layout::{Bounds, LayoutAlgorithm, Point, Positions};
pub use state::{Highlight, VisibilityMask};
pub use style::{edge_style, node_style, EdgeStyle, LineStyle, NodeShape, NodeStyle};
pub use tooltip::Tooltip;

use crate::core::constants::layout::FIT_PADDING;
use crate::core::{AnalysisResult, CodeGraph, NavigationIntent};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// User-chosen view settings; the only state that survives a graph
/// replacement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderSettings {
    pub layout: LayoutAlgorithm,
    pub collapsed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct RenderEngine {
    settings: RenderSettings,
    current: Option<AnalysisResult>,
    positions: Positions,
    visibility: VisibilityMask,
    highlight: Highlight,
}

impl RenderEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: RenderSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Install a freshly decoded result, discarding everything derived from
    /// the previous one.
    pub fn replace_graph(&mut self, result: AnalysisResult) -> Vec<RenderCommand> {
        debug!(
            "Replacing graph: {} nodes, {} edges ({})",
            result.graph().node_count(),
            result.graph().edge_count(),
            result.command()
        );

        self.highlight = Highlight::default();
        self.visibility = VisibilityMask::compute(result.graph(), self.settings.collapsed);
        self.positions = layout::compute(result.graph(), self.settings.layout);
        let text = stats_line(&result);
        self.current = Some(result);

        vec![
            RenderCommand::Rebuild {
                frame: self.frame(),
            },
            RenderCommand::Stats { text },
        ]
    }

    /// Re-position nodes. Membership and visibility are untouched.
    pub fn set_layout(&mut self, algorithm: LayoutAlgorithm) -> Vec<RenderCommand> {
        self.settings.layout = algorithm;
        let Some(result) = &self.current else {
            return Vec::new();
        };

        self.positions = layout::compute(result.graph(), algorithm);
        vec![RenderCommand::Positions {
            layout: algorithm,
            positions: self.positions.clone(),
        }]
    }

    /// Hide or reveal member nodes. Positions are kept as they are.
    pub fn set_collapse(&mut self, collapsed: bool) -> Vec<RenderCommand> {
        self.settings.collapsed = collapsed;
        let Some(result) = &self.current else {
            return Vec::new();
        };

        self.visibility = VisibilityMask::compute(result.graph(), collapsed);
        vec![RenderCommand::Visibility(self.visibility.clone())]
    }

    pub fn toggle_collapse(&mut self) -> Vec<RenderCommand> {
        self.set_collapse(!self.settings.collapsed)
    }

    /// Recompute the fade set for `node_id`; `None` clears it.
    pub fn on_hover(&mut self, node_id: Option<&str>) -> Vec<RenderCommand> {
        let Some(result) = &self.current else {
            return Vec::new();
        };

        self.highlight = Highlight::compute(result.graph(), node_id);
        vec![RenderCommand::Highlight(self.highlight.clone())]
    }

    /// Navigation target for `node_id`, when it carries both a file and a line.
    pub fn on_select(&self, node_id: &str) -> Option<NavigationIntent> {
        let node = self.graph()?.node(node_id)?;
        match (&node.file_path, node.line_number) {
            (Some(file_path), Some(line_number)) => Some(NavigationIntent {
                file_path: file_path.clone(),
                line_number,
            }),
            _ => {
                debug!("Node {} has no source location", node_id);
                None
            }
        }
    }

    pub fn handle(&mut self, event: UiEvent) -> Vec<RenderCommand> {
        match event {
            UiEvent::Hover { node_id } => self.on_hover(node_id.as_deref()),
            UiEvent::Select { node_id } => self
                .on_select(&node_id)
                .map(RenderCommand::Navigate)
                .into_iter()
                .collect(),
            UiEvent::SetLayout { layout } => self.set_layout(layout),
            UiEvent::SetCollapse { collapsed } => self.set_collapse(collapsed),
            UiEvent::ToggleCollapse => self.toggle_collapse(),
            UiEvent::Fit => self
                .fit_bounds()
                .map(|bounds| RenderCommand::Fit { bounds })
                .into_iter()
                .collect(),
            UiEvent::Reset => vec![RenderCommand::ResetView],
        }
    }

    /// Box around the visible nodes, padded for a fit-to-view.
    pub fn fit_bounds(&self) -> Option<Bounds> {
        let visible = self
            .positions
            .iter()
            .filter(|(id, _)| !self.visibility.is_node_hidden(id))
            .map(|(_, point)| point);
        Bounds::around(visible, FIT_PADDING)
    }

    pub fn tooltip(&self, node_id: &str) -> Option<Tooltip> {
        self.graph()?.node(node_id).map(Tooltip::for_node)
    }

    pub fn stats_line(&self) -> Option<String> {
        self.current.as_ref().map(stats_line)
    }

    pub fn frame(&self) -> RenderFrame {
        let Some(result) = &self.current else {
            return RenderFrame {
                layout: self.settings.layout,
                collapsed: self.settings.collapsed,
                stats: String::new(),
                nodes: Vec::new(),
                edges: Vec::new(),
            };
        };
        let graph = result.graph();

        let nodes = graph
            .nodes()
            .iter()
            .map(|node| FrameNode {
                id: node.id.clone(),
                label: node.name.clone(),
                node_type: node.node_type,
                style: node_style(node.node_type),
                position: self.positions.get(&node.id).copied().unwrap_or_default(),
                tooltip: Tooltip::for_node(node),
                hidden: self.visibility.is_node_hidden(&node.id),
                faded: self.highlight.is_node_faded(&node.id),
            })
            .collect();
        let edges = graph
            .edges()
            .iter()
            .map(|edge| FrameEdge {
                id: edge.id.clone(),
                source: edge.source.clone(),
                target: edge.target.clone(),
                edge_type: edge.edge_type,
                style: edge_style(edge.edge_type),
                hidden: self.visibility.is_edge_hidden(&edge.id),
                faded: self.highlight.is_edge_faded(&edge.id),
            })
            .collect();

        RenderFrame {
            layout: self.settings.layout,
            collapsed: self.settings.collapsed,
            stats: stats_line(result),
            nodes,
            edges,
        }
    }

    pub fn current(&self) -> Option<&AnalysisResult> {
        self.current.as_ref()
    }

    pub fn graph(&self) -> Option<&CodeGraph> {
        self.current.as_ref().map(AnalysisResult::graph)
    }

    pub fn settings(&self) -> RenderSettings {
        self.settings
    }

    pub fn layout(&self) -> LayoutAlgorithm {
        self.settings.layout
    }

    pub fn is_collapsed(&self) -> bool {
        self.settings.collapsed
    }

    pub fn positions(&self) -> &Positions {
        &self.positions
    }

    pub fn visibility(&self) -> &VisibilityMask {
        &self.visibility
    }

    pub fn highlight(&self) -> &Highlight {
        &self.highlight
    }
}

/// `"{nodes} nodes · {edges} edges · {classes} classes · {ms}ms"`.
///
/// Uses the engine-reported stats; without them the graph's own counts are
/// shown with zero classes.
pub fn stats_line(result: &AnalysisResult) -> String {
    let (nodes, edges, classes) = match result.stats() {
        Some(stats) => (stats.graph_nodes, stats.graph_edges, stats.total_classes_parsed),
        None => (
            result.graph().node_count() as u64,
            result.graph().edge_count() as u64,
            0,
        ),
    };
    format!(
        "{nodes} nodes · {edges} edges · {classes} classes · {}ms",
        result.analysis_time_ms().unwrap_or(0)
    )
}
