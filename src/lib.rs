//! # codemap-bridge
//!
//! Overlays call and dependency graphs computed by the CodeMap analysis
//! engine onto an interactive, event-driven graph view.
//!
//! The engine is an external Java process. This crate invokes it, decodes
//! its single JSON document into a validated graph, and keeps per-surface
//! view state (layout, collapse, hover highlight, navigation) consistent
//! with user interaction and newly arrived results.
//!
//! ## Quick Start
//!
//! ```no_run
//! use codemap_bridge::{EngineBridge, EngineConfig, RenderEngine};
//! use std::path::Path;
//!
//! # async fn demo() -> Result<(), codemap_bridge::BridgeError> {
//! let project = Path::new("/work/shop");
//! let bridge = EngineBridge::from_config(project, &EngineConfig::default());
//! let result = bridge.class_dependencies(project, "com.shop.OrderService").await?;
//!
//! let mut view = RenderEngine::new();
//! for command in view.replace_graph(result) {
//!     println!("{}", serde_json::to_string(&command).unwrap_or_default());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`core`] - Graph data model, error taxonomy and process/host seams
//! - [`bridge`] - Engine invocation, path resolution and strict decoding
//! - [`render`] - Render state, layouts, styling and the UI event/command stream
//! - [`surface`] - Per-surface ownership with last-request-wins generations
//! - [`host`] - Cursor symbol extraction and the JSON-lines host session
//! - [`config`] - Layered TOML configuration
//! - [`cli`] - Command-line interface

/// Engine invocation, path resolution and output decoding
pub mod bridge;
/// Command-line interface and argument parsing
pub mod cli;
/// Configuration loading and platform paths
pub mod config;
/// Graph data model, errors, constants and trait seams
pub mod core;
/// Host shim: cursor symbols, titles and the JSON-lines session
pub mod host;
/// Event-driven render engine
pub mod render;
/// Surface registry with generation tokens
pub mod surface;

// Re-export core functionality for easy access
pub use bridge::{AnalysisRequest, EngineBridge, EngineLocator, TokioProcessRunner};
pub use config::{BridgeConfig, EngineConfig, RenderConfig};
pub use core::{
    AnalysisResult, AnalysisStats, BridgeError, BridgeResult, CodeGraph, EdgeType, EngineCommand,
    GraphEdge, GraphIntegrityError, GraphNode, NavigationIntent, NodeType,
};
pub use render::{LayoutAlgorithm, RenderCommand, RenderEngine, RenderSettings, UiEvent};
pub use surface::{ApplyOutcome, RequestTicket, SurfaceId, SurfaceRegistry};
