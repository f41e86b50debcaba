//! Error taxonomy for engine queries and graph installation, using thiserror.
//!
//! Every failure of a query is classified into one of these variants so the
//! host can decide what to show: a remediation hint for missing engine pieces,
//! the engine's own diagnostic text for failed runs, and a decode or integrity
//! message when the engine broke its output contract.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("{component} not found (searched: {}). {hint}", display_paths(.searched))]
    EngineNotFound {
        component: EngineComponent,
        searched: Vec<PathBuf>,
        hint: String,
    },

    #[error("No source root found under {base:?} (searched: {})", display_paths(.searched))]
    NoSourceRoot { base: PathBuf, searched: Vec<PathBuf> },

    #[error("Engine exited with {}: {stderr}", display_exit(.exit_code))]
    EngineExecution {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("Failed to decode engine output: {message}")]
    Decode {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("Failed to encode {message}: {source}")]
    Encode {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Engine returned an inconsistent graph: {0}")]
    GraphIntegrity(#[from] GraphIntegrityError),

    #[error("Invalid analysis request: {reason}")]
    InvalidRequest { reason: String },

    #[error("Configuration error: {message}")]
    Config { message: String, path: Option<PathBuf> },

    /// The task running a query died before producing a result.
    #[error("Query did not complete: {0}")]
    QueryTask(String),

    #[error("IO error during {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: io::Error,
    },
}

/// Which external piece could not be located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineComponent {
    /// The engine jar.
    Artifact,
    /// The Java runtime that runs it.
    Runtime,
}

impl std::fmt::Display for EngineComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineComponent::Artifact => f.write_str("codemap-core engine JAR"),
            EngineComponent::Runtime => f.write_str("Java runtime"),
        }
    }
}

/// Contract violations in an engine graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphIntegrityError {
    #[error("duplicate node id '{0}'")]
    DuplicateNodeId(String),

    #[error("duplicate edge id '{0}'")]
    DuplicateEdgeId(String),

    #[error("edge '{edge}' {endpoint} references missing node '{node}'")]
    DanglingEdge {
        edge: String,
        endpoint: &'static str,
        node: String,
    },
}

impl BridgeError {
    pub fn decode(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            message: message.into(),
            source: Some(source),
        }
    }

    pub fn encode(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Encode {
            message: message.into(),
            source,
        }
    }

    pub fn io(operation: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }

    /// What the user can do about it, when there is something to do.
    pub fn remediation(&self) -> Option<&str> {
        match self {
            Self::EngineNotFound { hint, .. } => Some(hint),
            Self::NoSourceRoot { .. } => {
                Some("Open the project folder that contains the Java sources (src/main/java or src).")
            }
            _ => None,
        }
    }

    /// Engine stderr, for failures that carry it.
    pub fn engine_diagnostics(&self) -> Option<&str> {
        match self {
            Self::EngineExecution { stderr, .. } => Some(stderr),
            _ => None,
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "nothing".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn display_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {code}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

pub type BridgeResult<T> = Result<T, BridgeError>;
