//! Prioritized path probing for the engine jar, the Java runtime and the
//! project source root. The first existing candidate wins.

use crate::core::constants::{engine, env_vars, source_roots};
use crate::core::{BridgeError, BridgeResult, EngineComponent};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Runtime + artifact pair the engine is launched with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEngine {
    pub runtime: PathBuf,
    pub artifact: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct EngineLocator {
    search_base: PathBuf,
    core_jar_override: Option<PathBuf>,
    java_home_override: Option<PathBuf>,
    java_home_env: Option<PathBuf>,
    home_dir: Option<PathBuf>,
}

impl EngineLocator {
    /// Locator probing relative to `search_base` (usually the project base).
    pub fn new(search_base: impl Into<PathBuf>) -> Self {
        Self {
            search_base: search_base.into(),
            core_jar_override: None,
            java_home_override: None,
            java_home_env: env::var_os(env_vars::JAVA_HOME)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            home_dir: dirs::home_dir(),
        }
    }

    pub fn with_core_jar(mut self, path: Option<PathBuf>) -> Self {
        self.core_jar_override = path;
        self
    }

    pub fn with_java_home(mut self, path: Option<PathBuf>) -> Self {
        self.java_home_override = path;
        self
    }

    /// Replace the `JAVA_HOME` captured at construction.
    pub fn with_java_home_env(mut self, path: Option<PathBuf>) -> Self {
        self.java_home_env = path;
        self
    }

    pub fn with_home_dir(mut self, path: Option<PathBuf>) -> Self {
        self.home_dir = path;
        self
    }

    pub fn search_base(&self) -> &Path {
        &self.search_base
    }

    pub fn artifact_candidates(&self) -> Vec<PathBuf> {
        if let Some(explicit) = &self.core_jar_override {
            return vec![explicit.clone()];
        }

        let in_module = Path::new(engine::CORE_MODULE_DIR)
            .join("target")
            .join(engine::JAR_FILE_NAME);
        let mut candidates = vec![
            self.search_base.join(&in_module),
            self.search_base.join("..").join(&in_module),
        ];
        if let Some(home) = &self.home_dir {
            candidates.push(
                home.join(engine::USER_ENGINE_DIR)
                    .join(engine::INSTALLED_JAR_FILE_NAME),
            );
        }
        candidates
    }

    pub fn resolve_artifact(&self) -> BridgeResult<PathBuf> {
        let candidates = self.artifact_candidates();
        first_existing(&candidates, Path::is_file).ok_or_else(|| BridgeError::EngineNotFound {
            component: EngineComponent::Artifact,
            searched: candidates,
            hint: engine::ARTIFACT_HINT.to_string(),
        })
    }

    pub fn resolve_runtime(&self) -> BridgeResult<PathBuf> {
        if let Some(java_home) = &self.java_home_override {
            let java = java_binary(java_home);
            return if java.is_file() {
                Ok(java)
            } else {
                Err(BridgeError::EngineNotFound {
                    component: EngineComponent::Runtime,
                    searched: vec![java],
                    hint: engine::RUNTIME_HINT.to_string(),
                })
            };
        }

        let mut searched = Vec::new();
        if let Some(java_home) = &self.java_home_env {
            let java = java_binary(java_home);
            debug!("Probing JAVA_HOME runtime {}", java.display());
            if java.is_file() {
                return Ok(java);
            }
            searched.push(java);
        }

        match which::which(engine::JAVA_BINARY) {
            Ok(java) => {
                debug!("Using {} from PATH", java.display());
                Ok(java)
            }
            Err(_) => {
                searched.push(PathBuf::from(engine::JAVA_BINARY));
                Err(BridgeError::EngineNotFound {
                    component: EngineComponent::Runtime,
                    searched,
                    hint: engine::RUNTIME_HINT.to_string(),
                })
            }
        }
    }

    /// Resolve the artifact first: a missing jar is the more common problem.
    pub fn resolve(&self) -> BridgeResult<ResolvedEngine> {
        let artifact = self.resolve_artifact()?;
        let runtime = self.resolve_runtime()?;
        Ok(ResolvedEngine { runtime, artifact })
    }
}

fn java_binary(java_home: &Path) -> PathBuf {
    let binary = if cfg!(windows) { "java.exe" } else { engine::JAVA_BINARY };
    java_home.join("bin").join(binary)
}

pub fn source_root_candidates(base: &Path) -> Vec<PathBuf> {
    source_roots::CANDIDATES
        .iter()
        .map(|candidate| base.join(candidate))
        .chain(std::iter::once(base.to_path_buf()))
        .collect()
}

/// Pick the Java source root below a project base directory.
pub fn resolve_source_root(base: &Path) -> BridgeResult<PathBuf> {
    let candidates = source_root_candidates(base);
    first_existing(&candidates, Path::is_dir).ok_or_else(|| BridgeError::NoSourceRoot {
        base: base.to_path_buf(),
        searched: candidates,
    })
}

fn first_existing(candidates: &[PathBuf], exists: impl Fn(&Path) -> bool) -> Option<PathBuf> {
    candidates
        .iter()
        .find(|candidate| {
            let found = exists(candidate.as_path());
            debug!("Probing {} -> {}", candidate.display(), found);
            found
        })
        .cloned()
}
