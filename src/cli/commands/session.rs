use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::io::{self, BufReader};

use crate::bridge::EngineBridge;
use crate::cli::commands::utils::project_base;
use crate::cli::commands::Command;
use crate::config::BridgeConfig;
use crate::host::Session;

pub struct SessionCommand {
    project: Option<PathBuf>,
}

impl SessionCommand {
    pub fn new(project: Option<PathBuf>) -> Self {
        Self { project }
    }
}

#[async_trait]
impl Command for SessionCommand {
    async fn execute(&self) -> Result<()> {
        let base = project_base(self.project.as_deref())?;
        let config = BridgeConfig::load(Some(&base)).context("Failed to load configuration")?;

        let bridge = EngineBridge::from_config(&base, &config.engine);
        let mut session = Session::new(bridge, base, config.render.settings());
        session
            .run(BufReader::new(io::stdin()), io::stdout())
            .await
            .context("Session terminated")
    }
}
