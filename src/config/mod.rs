//! Layered configuration: built-in defaults, then the user file, then the
//! project's `.codemap.toml`, then environment overrides. Later layers win
//! key by key.

pub mod paths;

pub use paths::{config_dir, project_config_file, user_config_file};

use crate::core::constants::{engine, env_vars};
use crate::core::{BridgeError, BridgeResult};
use crate::render::{LayoutAlgorithm, RenderSettings};
use clap::Subcommand;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration actions
#[derive(Debug, Clone, Subcommand)]
pub enum ConfigAction {
    /// Write a default .codemap.toml into the project
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Show the effective configuration
    Show,
    /// Print the user configuration file path
    Path,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub engine: EngineConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Engine jar; skips the candidate search when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub core_jar_path: Option<PathBuf>,
    /// JDK home whose `bin/java` runs the engine.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub java_home: Option<PathBuf>,
    pub default_depth: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            core_jar_path: None,
            java_home: None,
            default_depth: engine::DEFAULT_DEPTH,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub default_layout: LayoutAlgorithm,
    pub collapsed: bool,
}

impl RenderConfig {
    pub fn settings(&self) -> RenderSettings {
        RenderSettings {
            layout: self.default_layout,
            collapsed: self.collapsed,
        }
    }
}

impl BridgeConfig {
    /// Effective configuration for a project rooted at `project_base`.
    pub fn load(project_base: Option<&Path>) -> BridgeResult<Self> {
        let mut files = Vec::new();
        if let Ok(user) = user_config_file() {
            files.push(user);
        }
        if let Some(base) = project_base {
            files.push(project_config_file(base));
        }
        Self::load_layers(&files, |key| std::env::var(key).ok())
    }

    /// Merge the existing files among `files` in order, then apply
    /// environment overrides looked up through `env`.
    pub fn load_layers(
        files: &[PathBuf],
        env: impl Fn(&str) -> Option<String>,
    ) -> BridgeResult<Self> {
        let mut merged = toml::Value::Table(toml::map::Map::new());
        for path in files.iter().filter(|p| p.is_file()) {
            debug!("Loading configuration from {}", path.display());
            merge_toml(&mut merged, read_toml(path)?);
        }

        let mut config: BridgeConfig = merged.try_into().map_err(|e: toml::de::Error| {
            BridgeError::Config {
                message: e.to_string(),
                path: None,
            }
        })?;
        config.apply_env_overrides(env)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> BridgeResult<Self> {
        let value = read_toml(path)?;
        let config: BridgeConfig = value.try_into().map_err(|e: toml::de::Error| {
            BridgeError::Config {
                message: e.to_string(),
                path: Some(path.to_path_buf()),
            }
        })?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self, env: impl Fn(&str) -> Option<String>) -> BridgeResult<()> {
        if let Some(jar) = env(env_vars::CORE_JAR).filter(|v| !v.is_empty()) {
            self.engine.core_jar_path = Some(PathBuf::from(jar));
        }
        if let Some(home) = env(env_vars::JAVA_HOME_OVERRIDE).filter(|v| !v.is_empty()) {
            self.engine.java_home = Some(PathBuf::from(home));
        }
        if let Some(depth) = env(env_vars::DEFAULT_DEPTH) {
            self.engine.default_depth = depth.trim().parse().map_err(|_| BridgeError::Config {
                message: format!("{} must be a positive integer, got '{depth}'", env_vars::DEFAULT_DEPTH),
                path: None,
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> BridgeResult<()> {
        if self.engine.default_depth == 0 {
            return Err(BridgeError::Config {
                message: "engine.default_depth must be at least 1".to_string(),
                path: None,
            });
        }
        Ok(())
    }

    pub fn to_toml(&self) -> BridgeResult<String> {
        toml::to_string_pretty(self).map_err(|e| BridgeError::Config {
            message: e.to_string(),
            path: None,
        })
    }

    pub fn save(&self, path: &Path) -> BridgeResult<()> {
        let contents = self.to_toml()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| BridgeError::io(format!("creating {}", parent.display()), e))?;
        }
        fs::write(path, contents)
            .map_err(|e| BridgeError::io(format!("writing {}", path.display()), e))
    }
}

fn read_toml(path: &Path) -> BridgeResult<toml::Value> {
    let contents = fs::read_to_string(path)
        .map_err(|e| BridgeError::io(format!("reading {}", path.display()), e))?;
    toml::from_str(&contents).map_err(|e| BridgeError::Config {
        message: e.to_string(),
        path: Some(path.to_path_buf()),
    })
}

/// Overlay tables key by key; any other value replaces what was there.
fn merge_toml(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
