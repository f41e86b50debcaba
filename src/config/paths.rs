//! Platform-aware configuration paths

use crate::core::constants::{config_files, env_vars};
use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Per-user configuration directory, overridable with `CODEMAP_CONFIG_DIR`.
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(custom_dir) = env::var(env_vars::CONFIG_DIR) {
        return Ok(PathBuf::from(custom_dir));
    }

    dirs::config_dir()
        .map(|p| p.join(config_files::APP_DIR))
        .context("Unable to determine config directory for the current platform")
}

pub fn user_config_file() -> Result<PathBuf> {
    Ok(config_dir()?.join(config_files::USER_CONFIG))
}

pub fn project_config_file(project_base: &Path) -> PathBuf {
    project_base.join(config_files::PROJECT_CONFIG)
}
