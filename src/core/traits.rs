use crate::core::errors::BridgeResult;
use crate::core::types::NavigationIntent;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::PathBuf;

/// One fully-resolved engine run: program, discrete arguments, working dir.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineInvocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub working_dir: PathBuf,
}

/// Everything a finished engine process produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim_end().to_string()
    }
}

/// Runs engine subprocesses
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EngineProcess: Send + Sync {
    /// Spawn the invocation, wait for exit and capture both streams.
    async fn run(&self, invocation: &EngineInvocation) -> BridgeResult<ProcessOutput>;
}

/// Host-native presentation hooks (progress, error dialogs, editor navigation).
pub trait HostUi {
    fn show_progress(&mut self, surface: &str, title: &str);

    fn show_error(&mut self, surface: &str, message: &str);

    fn open_location(&mut self, intent: &NavigationIntent);
}
