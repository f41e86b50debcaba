use crate::core::constants::engine;
use crate::core::{
    BridgeError, BridgeResult, EngineComponent, EngineInvocation, EngineProcess, ProcessOutput,
};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Spawns the engine with `tokio::process`.
///
/// Both output streams are piped and drained concurrently until exit, so a
/// chatty stderr can never block stdout. Superseded runs are not killed; the
/// caller drops their results instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessRunner;

#[async_trait]
impl EngineProcess for TokioProcessRunner {
    async fn run(&self, invocation: &EngineInvocation) -> BridgeResult<ProcessOutput> {
        debug!(
            "Spawning {} {:?} in {}",
            invocation.program.display(),
            invocation.args,
            invocation.working_dir.display()
        );

        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound | ErrorKind::PermissionDenied => BridgeError::EngineNotFound {
                    component: EngineComponent::Runtime,
                    searched: vec![invocation.program.clone()],
                    hint: format!("Failed to start engine: {e}. {}", engine::RUNTIME_HINT),
                },
                _ => BridgeError::io(
                    format!("spawning {}", invocation.program.display()),
                    e,
                ),
            })?;

        Ok(ProcessOutput {
            exit_code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}
