use anyhow::Result;
use async_trait::async_trait;

use crate::cli::commands::utils::{print_success, print_warning, project_base};
use crate::cli::commands::Command;
use crate::config::{project_config_file, user_config_file, BridgeConfig, ConfigAction};

pub struct ConfigCommand {
    action: ConfigAction,
}

impl ConfigCommand {
    pub fn new(action: ConfigAction) -> Self {
        Self { action }
    }
}

#[async_trait]
impl Command for ConfigCommand {
    async fn execute(&self) -> Result<()> {
        let base = project_base(None)?;

        match &self.action {
            ConfigAction::Init { force } => {
                let config_path = project_config_file(&base);
                if config_path.exists() && !force {
                    print_warning(&format!(
                        "{} already exists. Use --force to overwrite.",
                        config_path.display()
                    ));
                    return Ok(());
                }
                BridgeConfig::default().save(&config_path)?;
                print_success(&format!("Configuration initialized at {}", config_path.display()));
            }

            ConfigAction::Show => {
                let config = BridgeConfig::load(Some(&base))?;
                print!("{}", config.to_toml()?);
            }

            ConfigAction::Path => {
                println!("{}", user_config_file()?.display());
            }
        }

        Ok(())
    }
}
