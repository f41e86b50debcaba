//! Analysis requests and the discrete argument vector they turn into.

use crate::bridge::resolver::ResolvedEngine;
use crate::core::{BridgeError, BridgeResult, EngineCommand, EngineInvocation};
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub command: EngineCommand,
    /// Resolved source root; also the engine's working directory.
    pub project_path: PathBuf,
    pub target: Option<String>,
    pub depth: Option<u32>,
}

impl AnalysisRequest {
    pub fn new(command: EngineCommand, project_path: impl Into<PathBuf>) -> Self {
        Self {
            command,
            project_path: project_path.into(),
            target: None,
            depth: None,
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = Some(depth);
        self
    }

    pub fn validate(&self) -> BridgeResult<()> {
        let has_target = self
            .target
            .as_deref()
            .map(|t| !t.trim().is_empty())
            .unwrap_or(false);
        if self.command.requires_target() && !has_target {
            return Err(BridgeError::InvalidRequest {
                reason: format!("--target is required for command: {}", self.command),
            });
        }
        if self.depth == Some(0) {
            return Err(BridgeError::InvalidRequest {
                reason: "depth must be a positive integer".to_string(),
            });
        }
        Ok(())
    }
}

/// `<java> -jar <jar> --project <path> --command <name> [--target <t>] [--depth <n>]`
///
/// Every value is its own argument; nothing goes through a shell.
pub fn build_invocation(
    engine: &ResolvedEngine,
    request: &AnalysisRequest,
    default_depth: u32,
) -> EngineInvocation {
    let mut args: Vec<OsString> = vec![
        "-jar".into(),
        engine.artifact.clone().into(),
        "--project".into(),
        request.project_path.clone().into(),
        "--command".into(),
        request.command.as_str().into(),
    ];

    if let Some(target) = &request.target {
        args.push("--target".into());
        args.push(target.into());
    }

    if request.command.uses_depth() {
        let depth = request.depth.unwrap_or(default_depth);
        args.push("--depth".into());
        args.push(depth.to_string().into());
    }

    EngineInvocation {
        program: engine.runtime.clone(),
        args,
        working_dir: request.project_path.clone(),
    }
}
