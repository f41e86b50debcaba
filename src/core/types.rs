use crate::core::errors::{BridgeError, GraphIntegrityError};
use crate::core::graph::CodeGraph;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Free-form annotations attached to nodes and edges by the engine.
pub type Metadata = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    Class,
    Interface,
    Enum,
    Method,
    Constructor,
    Package,
}

impl NodeType {
    pub const ALL: [NodeType; 6] = [
        NodeType::Class,
        NodeType::Interface,
        NodeType::Enum,
        NodeType::Method,
        NodeType::Constructor,
        NodeType::Package,
    ];

    /// Wire name, e.g. `CLASS`.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Class => "CLASS",
            NodeType::Interface => "INTERFACE",
            NodeType::Enum => "ENUM",
            NodeType::Method => "METHOD",
            NodeType::Constructor => "CONSTRUCTOR",
            NodeType::Package => "PACKAGE",
        }
    }

    /// Member nodes are the ones hidden when a view is collapsed.
    pub fn is_member(&self) -> bool {
        matches!(self, NodeType::Method | NodeType::Constructor)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeType {
    Calls,
    Extends,
    Implements,
    Dependency,
    Imports,
    Overrides,
    Contains,
}

impl EdgeType {
    pub const ALL: [EdgeType; 7] = [
        EdgeType::Calls,
        EdgeType::Extends,
        EdgeType::Implements,
        EdgeType::Dependency,
        EdgeType::Imports,
        EdgeType::Overrides,
        EdgeType::Contains,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeType::Calls => "CALLS",
            EdgeType::Extends => "EXTENDS",
            EdgeType::Implements => "IMPLEMENTS",
            EdgeType::Dependency => "DEPENDENCY",
            EdgeType::Imports => "IMPORTS",
            EdgeType::Overrides => "OVERRIDES",
            EdgeType::Contains => "CONTAINS",
        }
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub qualified_name: Option<String>,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default)]
    pub file_path: Option<String>,
    /// 1-based; the engine's 0 means "unknown" and decodes as `None`.
    #[serde(default, deserialize_with = "one_based_line")]
    pub line_number: Option<u32>,
    #[serde(default, deserialize_with = "nullable_metadata")]
    pub metadata: Metadata,
}

impl GraphNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            qualified_name: None,
            node_type,
            file_path: None,
            line_number: None,
            metadata: Metadata::new(),
        }
    }

    pub fn with_qualified_name(mut self, qualified_name: impl Into<String>) -> Self {
        self.qualified_name = Some(qualified_name.into());
        self
    }

    pub fn with_location(mut self, file_path: impl Into<String>, line_number: u32) -> Self {
        self.file_path = Some(file_path.into());
        self.line_number = Some(line_number).filter(|&line| line > 0);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Label used in tooltips: the qualified name when known.
    pub fn display_name(&self) -> &str {
        self.qualified_name.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub edge_type: EdgeType,
    #[serde(default, deserialize_with = "nullable_metadata")]
    pub metadata: Metadata,
}

impl GraphEdge {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        edge_type: EdgeType,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            edge_type,
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

/// `"metadata": null` and a missing key both mean "no annotations".
fn one_based_line<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.filter(|&line| line > 0))
}

fn nullable_metadata<'de, D>(deserializer: D) -> Result<Metadata, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Metadata>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisStats {
    pub total_classes_parsed: u64,
    pub total_methods_parsed: u64,
    pub graph_nodes: u64,
    pub graph_edges: u64,
}

/// Graph section of the engine output, before integrity checks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Exact shape of one engine response on stdout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDocument {
    pub command: String,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub analysis_time_ms: Option<u64>,
    #[serde(default)]
    pub stats: Option<AnalysisStats>,
    pub graph: GraphDocument,
}

/// A decoded engine response whose graph passed integrity checks.
///
/// Instances are immutable; a new query produces a new value.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    command: String,
    target: Option<String>,
    timestamp: Option<String>,
    analysis_time_ms: Option<u64>,
    stats: Option<AnalysisStats>,
    graph: CodeGraph,
}

impl AnalysisResult {
    pub fn new(command: impl Into<String>, graph: CodeGraph) -> Self {
        Self {
            command: command.into(),
            target: None,
            timestamp: None,
            analysis_time_ms: None,
            stats: None,
            graph,
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    pub fn with_analysis_time_ms(mut self, ms: u64) -> Self {
        self.analysis_time_ms = Some(ms);
        self
    }

    pub fn with_stats(mut self, stats: AnalysisStats) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.timestamp.as_deref()
    }

    /// Parsed timestamp, when the engine sent an RFC 3339 instant.
    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        self.timestamp
            .as_deref()
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
            .map(|ts| ts.with_timezone(&Utc))
    }

    pub fn analysis_time_ms(&self) -> Option<u64> {
        self.analysis_time_ms
    }

    pub fn stats(&self) -> Option<&AnalysisStats> {
        self.stats.as_ref()
    }

    pub fn graph(&self) -> &CodeGraph {
        &self.graph
    }

    /// Reported vs. actual `(nodes, edges)` when the engine's stats disagree
    /// with the graph it sent.
    pub fn stats_mismatch(&self) -> Option<((u64, u64), (u64, u64))> {
        let stats = self.stats.as_ref()?;
        let reported = (stats.graph_nodes, stats.graph_edges);
        let actual = (self.graph.node_count() as u64, self.graph.edge_count() as u64);
        (reported != actual).then_some((reported, actual))
    }
}

impl TryFrom<AnalysisDocument> for AnalysisResult {
    type Error = GraphIntegrityError;

    fn try_from(doc: AnalysisDocument) -> Result<Self, Self::Error> {
        let graph = CodeGraph::new(doc.graph.nodes, doc.graph.edges)?;
        Ok(Self {
            command: doc.command,
            target: doc.target,
            timestamp: doc.timestamp,
            analysis_time_ms: doc.analysis_time_ms,
            stats: doc.stats,
            graph,
        })
    }
}

/// Query kinds understood by the analysis engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EngineCommand {
    #[serde(rename = "callgraph")]
    CallGraph,
    IncomingCalls,
    Dependencies,
    Impact,
    CircularDeps,
    #[serde(rename = "fullgraph")]
    FullGraph,
}

impl EngineCommand {
    pub const ALL: [EngineCommand; 6] = [
        EngineCommand::CallGraph,
        EngineCommand::IncomingCalls,
        EngineCommand::Dependencies,
        EngineCommand::Impact,
        EngineCommand::CircularDeps,
        EngineCommand::FullGraph,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EngineCommand::CallGraph => "callgraph",
            EngineCommand::IncomingCalls => "incoming-calls",
            EngineCommand::Dependencies => "dependencies",
            EngineCommand::Impact => "impact",
            EngineCommand::CircularDeps => "circular-deps",
            EngineCommand::FullGraph => "fullgraph",
        }
    }

    pub fn requires_target(&self) -> bool {
        !matches!(self, EngineCommand::CircularDeps | EngineCommand::FullGraph)
    }

    pub fn uses_depth(&self) -> bool {
        matches!(self, EngineCommand::CallGraph)
    }
}

impl fmt::Display for EngineCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EngineCommand {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|command| command.as_str() == wanted)
            .ok_or_else(|| BridgeError::InvalidRequest {
                reason: format!(
                    "unknown command '{s}' (available: callgraph, incoming-calls, dependencies, impact, circular-deps, fullgraph)"
                ),
            })
    }
}

/// Where the host should jump when a node is selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationIntent {
    pub file_path: String,
    /// 1-based.
    pub line_number: u32,
}
