//! Fixed values shared by the bridge, the render engine and the CLI.

/// Engine query defaults
pub mod engine {
    /// Traversal depth used for call graphs when none is configured.
    pub const DEFAULT_DEPTH: u32 = 5;
    pub const JAR_FILE_NAME: &str = "codemap-core-1.0.0-SNAPSHOT.jar";
    pub const INSTALLED_JAR_FILE_NAME: &str = "codemap-core.jar";
    pub const CORE_MODULE_DIR: &str = "codemap-core";
    pub const USER_ENGINE_DIR: &str = ".codemap";
    pub const JAVA_BINARY: &str = "java";
    pub const ARTIFACT_HINT: &str =
        "Build the core engine with 'mvn package' or set engine.core_jar_path in .codemap.toml.";
    pub const RUNTIME_HINT: &str =
        "Install Java, set JAVA_HOME, or set engine.java_home in .codemap.toml.";
}

/// Candidate source roots, tried in order below the project base
pub mod source_roots {
    pub const CANDIDATES: &[&str] = &["src/main/java", "src"];
}

/// Environment variable names
pub mod env_vars {
    pub const JAVA_HOME: &str = "JAVA_HOME";
    pub const CORE_JAR: &str = "CODEMAP_CORE_JAR";
    pub const JAVA_HOME_OVERRIDE: &str = "CODEMAP_JAVA_HOME";
    pub const DEFAULT_DEPTH: &str = "CODEMAP_DEFAULT_DEPTH";
    pub const CONFIG_DIR: &str = "CODEMAP_CONFIG_DIR";
}

/// Configuration file names
pub mod config_files {
    pub const PROJECT_CONFIG: &str = ".codemap.toml";
    pub const USER_CONFIG: &str = "config.toml";
    pub const APP_DIR: &str = "codemap";
}

/// Layout geometry
pub mod layout {
    /// Vertical distance between hierarchical ranks.
    pub const RANK_SEPARATION: f64 = 80.0;
    /// Horizontal gap between sibling nodes.
    pub const NODE_SEPARATION: f64 = 50.0;
    /// Nominal node footprint used for spacing.
    pub const NODE_WIDTH: f64 = 120.0;
    pub const NODE_HEIGHT: f64 = 32.0;
    pub const CIRCLE_MIN_RADIUS: f64 = 100.0;
    pub const FORCE_ITERATIONS: usize = 300;
    /// Graphs up to this size get the full force schedule.
    pub const FORCE_FULL_SCHEDULE_NODES: usize = 500;
    pub const FORCE_MIN_ITERATIONS: usize = 50;
    pub const FORCE_IDEAL_EDGE_LENGTH: f64 = 140.0;
    pub const FIT_PADDING: f64 = 30.0;
}
