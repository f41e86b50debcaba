pub mod args;
pub mod commands;

pub use args::{Cli, Commands, OutputFormat};

use anyhow::Result;
use clap::Parser;

use commands::config::ConfigCommand;
use commands::query::{QueryArgs, QueryCommand};
use commands::session::SessionCommand;
use commands::Command;

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries results and session messages.
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(format!("codemap_bridge={log_level}"))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Query {
            command,
            target,
            depth,
            project,
            layout,
            collapsed,
            format,
            output,
        } => {
            QueryCommand::new(QueryArgs {
                command,
                target,
                depth,
                project,
                layout,
                collapsed,
                format,
                output,
            })
            .execute()
            .await?;
        }

        Commands::Session { project } => {
            SessionCommand::new(project).execute().await?;
        }

        Commands::Config { action } => {
            ConfigCommand::new(action).execute().await?;
        }
    }

    Ok(())
}
