use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::ConfigAction;
use crate::core::EngineCommand;
use crate::render::LayoutAlgorithm;

/// Command line for codemap-bridge: run code-graph queries against the
/// analysis engine and render the result.
///
/// # Examples
///
/// ```bash
/// # Forward call graph of a method, as a terminal summary
/// codemap-bridge query callgraph --target "com.acme.Main.main" --depth 3
///
/// # Class dependencies as Graphviz, without member nodes
/// codemap-bridge query dependencies --target com.acme.OrderService --collapsed --format dot
///
/// # Serve an editor over stdin/stdout
/// codemap-bridge session --project ~/work/shop
/// ```
#[derive(Parser)]
#[command(name = "codemap-bridge")]
#[command(about = "Code call/dependency graphs from the CodeMap analysis engine")]
#[command(version)]
pub struct Cli {
    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one engine query and print the result
    Query {
        /// callgraph, incoming-calls, dependencies, impact, circular-deps or fullgraph
        command: EngineCommand,

        /// Method signature or class name to analyze
        #[arg(short, long)]
        target: Option<String>,

        /// Call graph depth (callgraph only)
        #[arg(short, long)]
        depth: Option<u32>,

        /// Project base directory (default: current directory)
        #[arg(short, long)]
        project: Option<PathBuf>,

        /// Layout for frame and dot output
        #[arg(short, long)]
        layout: Option<LayoutAlgorithm>,

        /// Hide method and constructor nodes
        #[arg(long)]
        collapsed: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "summary")]
        format: OutputFormat,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Serve JSON-lines requests on stdin, answering on stdout
    Session {
        /// Project base directory (default: current directory)
        #[arg(short, long)]
        project: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Raw analysis result
    Json,
    /// Human-readable overview
    Summary,
    /// Rendered frame with styles, positions and visibility
    Frame,
    /// Graphviz DOT
    Dot,
}
