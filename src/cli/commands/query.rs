use anyhow::{Context, Result};
use async_trait::async_trait;
use colored::Colorize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::info;

use crate::bridge::{resolve_source_root, EngineBridge};
use crate::cli::args::OutputFormat;
use crate::cli::commands::utils::{project_base, write_output};
use crate::cli::commands::Command;
use crate::config::BridgeConfig;
use crate::core::{AnalysisResult, EngineCommand};
use crate::host::surface_title;
use crate::render::dot::to_dot;
use crate::render::{LayoutAlgorithm, RenderEngine};

pub struct QueryArgs {
    pub command: EngineCommand,
    pub target: Option<String>,
    pub depth: Option<u32>,
    pub project: Option<PathBuf>,
    pub layout: Option<LayoutAlgorithm>,
    pub collapsed: bool,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
}

pub struct QueryCommand {
    args: QueryArgs,
}

impl QueryCommand {
    pub fn new(args: QueryArgs) -> Self {
        Self { args }
    }
}

#[async_trait]
impl Command for QueryCommand {
    async fn execute(&self) -> Result<()> {
        let args = &self.args;
        let base = project_base(args.project.as_deref())?;
        let config = BridgeConfig::load(Some(&base)).context("Failed to load configuration")?;
        let source_root = resolve_source_root(&base)?;

        let bridge = EngineBridge::from_config(&base, &config.engine);
        let result = bridge
            .execute(args.command, &source_root, args.target.as_deref(), args.depth)
            .await?;
        info!(
            "Query returned {} nodes and {} edges",
            result.graph().node_count(),
            result.graph().edge_count()
        );

        let mut settings = config.render.settings();
        if let Some(layout) = args.layout {
            settings.layout = layout;
        }
        settings.collapsed |= args.collapsed;

        let title = surface_title(args.command, args.target.as_deref());
        let content = match args.format {
            OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(&result)?),
            OutputFormat::Frame => {
                let mut engine = RenderEngine::with_settings(settings);
                engine.replace_graph(result);
                format!("{}\n", serde_json::to_string_pretty(&engine.frame())?)
            }
            OutputFormat::Dot => {
                let mut engine = RenderEngine::with_settings(settings);
                engine.replace_graph(result);
                to_dot(&engine.frame(), &title)
            }
            OutputFormat::Summary => summarize(&title, &result),
        };

        write_output(&content, args.output.as_deref()).await
    }
}

/// Terminal overview of a result: headline, statistics and type breakdown.
pub fn summarize(title: &str, result: &AnalysisResult) -> String {
    let graph = result.graph();
    let mut out = String::new();

    out.push_str(&format!("{}\n", title.bold()));
    out.push_str(&format!("{}\n", crate::render::stats_line(result).dimmed()));
    if let Some(ts) = result.timestamp_utc() {
        out.push_str(&format!("Analyzed at {}\n", ts.format("%Y-%m-%d %H:%M:%S UTC")));
    }
    if let Some(((nodes, edges), (actual_nodes, actual_edges))) = result.stats_mismatch() {
        out.push_str(&format!(
            "{} engine reported {nodes} nodes / {edges} edges, graph has {actual_nodes} / {actual_edges}\n",
            "!".yellow()
        ));
    }

    if graph.is_empty() {
        out.push_str(&format!("{}\n", "No nodes found.".yellow()));
        return out;
    }

    let mut node_counts = BTreeMap::new();
    for node in graph.nodes() {
        *node_counts.entry(node.node_type).or_insert(0usize) += 1;
    }
    let mut edge_counts = BTreeMap::new();
    for edge in graph.edges() {
        *edge_counts.entry(edge.edge_type).or_insert(0usize) += 1;
    }

    out.push_str(&format!("\n{}\n", "Nodes".cyan()));
    for (node_type, count) in node_counts {
        out.push_str(&format!("  {:<12} {}\n", node_type.as_str(), count));
    }
    if !edge_counts.is_empty() {
        out.push_str(&format!("{}\n", "Edges".cyan()));
        for (edge_type, count) in edge_counts {
            out.push_str(&format!("  {:<12} {}\n", edge_type.as_str(), count));
        }
    }

    out
}
