use anyhow::Result;
use async_trait::async_trait;

pub mod config;
pub mod query;
pub mod session;

/// Trait for CLI command implementations
#[async_trait]
pub trait Command {
    /// Execute the command with the given arguments
    async fn execute(&self) -> Result<()>;
}

/// Common utilities for command implementations
pub mod utils {
    use anyhow::{Context, Result};
    use colored::Colorize;
    use std::path::{Path, PathBuf};
    use tokio::fs;

    /// Project base: the given directory, or the current one.
    pub fn project_base(project: Option<&Path>) -> Result<PathBuf> {
        match project {
            Some(path) => Ok(path.to_path_buf()),
            None => std::env::current_dir().context("Unable to determine current directory"),
        }
    }

    /// Write `content` to `output`, or stdout when no file is given.
    pub async fn write_output(content: &str, output: Option<&Path>) -> Result<()> {
        match output {
            Some(path) => {
                fs::write(path, content)
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                eprintln!("{} Written to {}", "✓".green(), path.display());
            }
            None => print!("{content}"),
        }
        Ok(())
    }

    pub fn print_success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    pub fn print_warning(message: &str) {
        println!("{} {}", "!".yellow(), message);
    }
}
