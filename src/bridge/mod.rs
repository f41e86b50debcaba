//! Engine Bridge: runs one query against the out-of-process analysis engine
//! and returns a typed [`AnalysisResult`] or a classified [`BridgeError`].

pub mod decode;
pub mod invocation;
pub mod process;
pub mod resolver;

pub use decode::decode_analysis_result;
pub use invocation::{build_invocation, AnalysisRequest};
pub use process::TokioProcessRunner;
pub use resolver::{resolve_source_root, source_root_candidates, EngineLocator, ResolvedEngine};

use crate::config::EngineConfig;
use crate::core::constants::engine;
use crate::core::{
    AnalysisResult, BridgeError, BridgeResult, EngineCommand, EngineProcess, ProcessOutput,
};
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub struct EngineBridge<P: EngineProcess = TokioProcessRunner> {
    locator: EngineLocator,
    process: P,
    default_depth: u32,
}

impl EngineBridge<TokioProcessRunner> {
    /// Bridge that searches for the engine below `project_base` using `config`
    /// overrides first.
    pub fn from_config(project_base: impl Into<PathBuf>, config: &EngineConfig) -> Self {
        let locator = EngineLocator::new(project_base)
            .with_core_jar(config.core_jar_path.clone())
            .with_java_home(config.java_home.clone());
        Self::new(locator, TokioProcessRunner).with_default_depth(config.default_depth)
    }
}

impl<P: EngineProcess> EngineBridge<P> {
    pub fn new(locator: EngineLocator, process: P) -> Self {
        Self {
            locator,
            process,
            default_depth: engine::DEFAULT_DEPTH,
        }
    }

    pub fn with_default_depth(mut self, depth: u32) -> Self {
        self.default_depth = depth.max(1);
        self
    }

    pub fn default_depth(&self) -> u32 {
        self.default_depth
    }

    pub fn locator(&self) -> &EngineLocator {
        &self.locator
    }

    /// Run `command` against the source root at `project_path`.
    pub async fn execute(
        &self,
        command: EngineCommand,
        project_path: &Path,
        target: Option<&str>,
        depth: Option<u32>,
    ) -> BridgeResult<AnalysisResult> {
        let request = AnalysisRequest {
            command,
            project_path: project_path.to_path_buf(),
            target: target.map(str::to_string),
            depth,
        };
        self.run(&request).await
    }

    pub async fn run(&self, request: &AnalysisRequest) -> BridgeResult<AnalysisResult> {
        request.validate()?;
        if !request.project_path.is_dir() {
            return Err(BridgeError::NoSourceRoot {
                base: request.project_path.clone(),
                searched: vec![request.project_path.clone()],
            });
        }

        let resolved = self.locator.resolve()?;
        let invocation = build_invocation(&resolved, request, self.default_depth);
        info!(
            "Executing engine command '{}' (target: {}) in {}",
            request.command,
            request.target.as_deref().unwrap_or("-"),
            request.project_path.display()
        );

        let output = self.process.run(&invocation).await?;
        interpret_output(output)
    }

    /// Calls out of `method_signature`; `None` falls back to the bridge's
    /// default depth.
    pub async fn call_graph(
        &self,
        project_path: &Path,
        method_signature: &str,
        depth: Option<u32>,
    ) -> BridgeResult<AnalysisResult> {
        self.execute(EngineCommand::CallGraph, project_path, Some(method_signature), depth)
            .await
    }

    pub async fn incoming_calls(
        &self,
        project_path: &Path,
        method_signature: &str,
    ) -> BridgeResult<AnalysisResult> {
        self.execute(EngineCommand::IncomingCalls, project_path, Some(method_signature), None)
            .await
    }

    pub async fn class_dependencies(
        &self,
        project_path: &Path,
        class_name: &str,
    ) -> BridgeResult<AnalysisResult> {
        self.execute(EngineCommand::Dependencies, project_path, Some(class_name), None)
            .await
    }

    pub async fn impact_analysis(
        &self,
        project_path: &Path,
        class_name: &str,
    ) -> BridgeResult<AnalysisResult> {
        self.execute(EngineCommand::Impact, project_path, Some(class_name), None)
            .await
    }

    pub async fn circular_dependencies(&self, project_path: &Path) -> BridgeResult<AnalysisResult> {
        self.execute(EngineCommand::CircularDeps, project_path, None, None)
            .await
    }
}

/// Map a finished process onto the success/failure contract.
///
/// A non-zero exit never looks at stdout. Stderr from a successful run is
/// only logged.
pub fn interpret_output(output: ProcessOutput) -> BridgeResult<AnalysisResult> {
    let stderr = output.stderr_text();

    if !output.success() {
        error!("Engine failed (code {:?}): {}", output.exit_code, stderr);
        return Err(BridgeError::EngineExecution {
            exit_code: output.exit_code,
            stderr,
        });
    }

    if !stderr.trim().is_empty() {
        info!("Engine logs: {}", stderr);
    }

    decode_analysis_result(&output.stdout)
}
