#![cfg(unix)]

use crate::common::{test_helpers, FakeEngine};
use codemap_bridge::bridge::{resolve_source_root, EngineBridge, TokioProcessRunner};
use codemap_bridge::core::{BridgeError, EngineCommand, EngineComponent};
use codemap_bridge::render::RenderEngine;
use serial_test::serial;

fn bridge_for(engine: &FakeEngine) -> EngineBridge<TokioProcessRunner> {
    EngineBridge::new(engine.locator(), TokioProcessRunner)
}

#[tokio::test]
#[serial]
async fn test_successful_run_decodes_stdout() {
    let engine = FakeEngine::new();
    engine.respond(
        &test_helpers::engine_response("dependencies", "Job"),
        "INFO parsed 1 file\n",
        0,
    );
    let bridge = bridge_for(&engine);

    let result = bridge
        .class_dependencies(&engine.source_root(), "Job")
        .await
        .unwrap();

    assert_eq!(result.command(), "dependencies");
    assert_eq!(result.graph().node_count(), 2);
    assert_eq!(result.graph().edge_count(), 1);
    assert_eq!(result.analysis_time_ms(), Some(42));
}

#[tokio::test]
#[serial]
async fn test_arguments_reach_engine_intact() {
    let engine = FakeEngine::new();
    engine.respond(&test_helpers::engine_response("callgraph", "A b"), "", 0);
    let bridge = bridge_for(&engine);

    bridge
        .call_graph(&engine.source_root(), "com.example.Foo.bar; rm -rf /", Some(3))
        .await
        .unwrap();

    let args = engine.recorded_args();
    let target = args.iter().position(|a| a == "--target").unwrap();
    assert_eq!(args[target + 1], "com.example.Foo.bar; rm -rf /");
    let depth = args.iter().position(|a| a == "--depth").unwrap();
    assert_eq!(args[depth + 1], "3");
    assert!(args.contains(&"-jar".to_string()));
    assert!(args.contains(&engine.jar.display().to_string()));
}

#[tokio::test]
#[serial]
async fn test_engine_runs_in_source_root() {
    let engine = FakeEngine::new();
    engine.respond(&test_helpers::engine_response("cycles", ""), "", 0);
    let bridge = bridge_for(&engine);
    let root = resolve_source_root(&engine.project).unwrap();

    bridge.circular_dependencies(&root).await.unwrap();

    assert_eq!(
        engine.recorded_cwd().canonicalize().unwrap(),
        engine.source_root().canonicalize().unwrap()
    );
    assert!(!engine.recorded_args().contains(&"--target".to_string()));
}

#[tokio::test]
#[serial]
async fn test_nonzero_exit_reports_stderr_and_leaves_view_untouched() {
    let engine = FakeEngine::new();
    engine.respond(
        &test_helpers::engine_response("dependencies", "Good"),
        "",
        0,
    );
    let bridge = bridge_for(&engine);
    let mut view = RenderEngine::new();
    let good = bridge
        .class_dependencies(&engine.source_root(), "Good")
        .await
        .unwrap();
    view.replace_graph(good);
    let before = view.frame();

    engine.respond("", "parse error at line 10", 2);
    let err = bridge
        .execute(EngineCommand::Dependencies, &engine.source_root(), Some("Bad"), None)
        .await
        .unwrap_err();

    match &err {
        BridgeError::EngineExecution { exit_code, stderr } => {
            assert_eq!(*exit_code, Some(2));
            assert!(stderr.contains("parse error at line 10"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(view.frame(), before);
}

#[tokio::test]
#[serial]
async fn test_garbage_stdout_is_decode_error() {
    let engine = FakeEngine::new();
    engine.respond("Picked up JAVA_TOOL_OPTIONS\n{not json", "", 0);
    let bridge = bridge_for(&engine);

    let err = bridge
        .impact_analysis(&engine.source_root(), "Job")
        .await
        .unwrap_err();
    assert!(matches!(err, BridgeError::Decode { .. }));
}

#[tokio::test]
#[serial]
async fn test_dangling_edge_is_integrity_error() {
    let engine = FakeEngine::new();
    engine.respond(
        r#"{"command":"callgraph","graph":{"nodes":[{"id":"A","name":"A","type":"CLASS"}],
            "edges":[{"id":"e","source":"A","target":"Z","type":"CALLS"}]}}"#,
        "",
        0,
    );
    let bridge = bridge_for(&engine);

    let err = bridge
        .call_graph(&engine.source_root(), "A.run", None)
        .await
        .unwrap_err();
    assert!(matches!(err, BridgeError::GraphIntegrity(_)));
}

#[tokio::test]
#[serial]
async fn test_missing_runtime_never_spawns() {
    let engine = FakeEngine::new();
    let locator = engine
        .locator()
        .with_java_home(Some(engine.dir.path().join("no-such-jdk")));
    let bridge = EngineBridge::new(locator, TokioProcessRunner);

    let err = bridge
        .incoming_calls(&engine.source_root(), "A.run")
        .await
        .unwrap_err();

    match err {
        BridgeError::EngineNotFound { component, .. } => {
            assert_eq!(component, EngineComponent::Runtime)
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(engine.recorded_args().is_empty());
}
