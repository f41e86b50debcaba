use crate::common::write_file;
use codemap_bridge::config::{project_config_file, BridgeConfig};
use codemap_bridge::core::BridgeError;
use codemap_bridge::render::LayoutAlgorithm;
use serial_test::serial;
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_project_file_overrides_user_file_per_key() {
    let dir = TempDir::new().unwrap();
    let user = dir.path().join("user/config.toml");
    let project = dir.path().join("project/.codemap.toml");
    write_file(
        &user,
        "[engine]\ncore_jar_path = \"/opt/codemap/core.jar\"\ndefault_depth = 8\n\n[render]\ncollapsed = true\n",
    );
    write_file(&project, "[engine]\ndefault_depth = 3\n\n[render]\ndefault_layout = \"circle\"\n");

    let config = BridgeConfig::load_layers(&[user, project], env_from(&[])).unwrap();

    assert_eq!(config.engine.core_jar_path, Some(PathBuf::from("/opt/codemap/core.jar")));
    assert_eq!(config.engine.default_depth, 3);
    assert_eq!(config.render.default_layout, LayoutAlgorithm::Circle);
    assert!(config.render.collapsed);
}

#[test]
fn test_environment_beats_files() {
    let dir = TempDir::new().unwrap();
    let project = dir.path().join(".codemap.toml");
    write_file(&project, "[engine]\ndefault_depth = 3\njava_home = \"/usr/lib/jvm/17\"\n");

    let config = BridgeConfig::load_layers(
        &[project],
        env_from(&[
            ("CODEMAP_DEFAULT_DEPTH", "9"),
            ("CODEMAP_JAVA_HOME", "/usr/lib/jvm/21"),
        ]),
    )
    .unwrap();

    assert_eq!(config.engine.default_depth, 9);
    assert_eq!(config.engine.java_home, Some(PathBuf::from("/usr/lib/jvm/21")));
}

#[test]
fn test_zero_depth_rejected_from_any_layer() {
    let dir = TempDir::new().unwrap();
    let project = dir.path().join(".codemap.toml");
    write_file(&project, "[engine]\ndefault_depth = 0\n");

    let err = BridgeConfig::load_layers(&[project], env_from(&[])).unwrap_err();
    assert!(matches!(err, BridgeError::Config { .. }));

    let err = BridgeConfig::load_layers(&[], env_from(&[("CODEMAP_DEFAULT_DEPTH", "deep")])).unwrap_err();
    assert!(err.to_string().contains("CODEMAP_DEFAULT_DEPTH"));
}

#[test]
fn test_missing_files_give_defaults() {
    let dir = TempDir::new().unwrap();
    let config =
        BridgeConfig::load_layers(&[dir.path().join("absent.toml")], env_from(&[])).unwrap();

    assert_eq!(config, BridgeConfig::default());
    assert_eq!(config.engine.default_depth, 5);
}

#[test]
fn test_saved_config_loads_back() {
    let dir = TempDir::new().unwrap();
    let path = project_config_file(dir.path());
    let mut config = BridgeConfig::default();
    config.engine.core_jar_path = Some(PathBuf::from("/tmp/engine.jar"));
    config.render.default_layout = LayoutAlgorithm::ForceDirected;

    config.save(&path).unwrap();

    assert_eq!(BridgeConfig::from_file(&path).unwrap(), config);
}

#[test]
#[serial]
fn test_load_reads_user_dir_from_environment() {
    let dir = TempDir::new().unwrap();
    let user_dir = dir.path().join("user");
    write_file(&user_dir.join("config.toml"), "[engine]\ndefault_depth = 7\n");
    let project = dir.path().join("project");
    write_file(&project.join(".codemap.toml"), "[render]\ncollapsed = true\n");

    env::set_var("CODEMAP_CONFIG_DIR", &user_dir);
    env::remove_var("CODEMAP_DEFAULT_DEPTH");
    let loaded = BridgeConfig::load(Some(&project));
    env::remove_var("CODEMAP_CONFIG_DIR");

    let config = loaded.unwrap();
    assert_eq!(config.engine.default_depth, 7);
    assert!(config.render.collapsed);
}
