use crate::common::{resolvable_project, DelayedEngine};
use codemap_bridge::bridge::EngineBridge;
use codemap_bridge::core::{BridgeError, EngineCommand};
use codemap_bridge::render::{LayoutAlgorithm, RenderSettings, UiEvent};
use codemap_bridge::surface::{ApplyOutcome, SurfaceId, SurfaceRegistry};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

#[tokio::test]
async fn test_results_applied_in_arrival_order_keep_latest() {
    let (dir, locator) = resolvable_project();
    let engine = DelayedEngine::new()
        .with_delay("R1", Duration::from_millis(150))
        .with_delay("R2", Duration::from_millis(10));
    let bridge = Arc::new(EngineBridge::new(locator, engine));
    let mut registry = SurfaceRegistry::new();
    let surface = SurfaceId::from("graph");
    let (tx, mut rx) = mpsc::unbounded_channel();

    for target in ["R1", "R2"] {
        let ticket = registry.begin_request(surface.clone(), target);
        let bridge = Arc::clone(&bridge);
        let root = dir.path().to_path_buf();
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = bridge
                .execute(EngineCommand::Dependencies, &root, Some(target), None)
                .await;
            tx.send((ticket, result)).unwrap();
        });
    }
    drop(tx);

    let mut outcomes = Vec::new();
    while let Some((ticket, result)) = rx.recv().await {
        let applied = matches!(registry.complete(&ticket, result), ApplyOutcome::Applied(_));
        outcomes.push((ticket.generation, applied));
    }

    assert_eq!(outcomes, vec![(2, true), (1, false)]);
    let shown = registry.get(&surface).unwrap().engine().current().unwrap();
    assert_eq!(shown.target(), Some("R2"));
}

#[tokio::test]
async fn test_failure_after_success_keeps_graph_and_settings() {
    let (dir, locator) = resolvable_project();
    let engine = DelayedEngine::new().failing("Bad", 2, "parse error at line 10");
    let bridge = EngineBridge::new(locator, engine);
    let mut registry = SurfaceRegistry::new();
    let surface = SurfaceId::from("graph");

    let ticket = registry.begin_request(surface.clone(), "Good");
    let good = bridge
        .execute(EngineCommand::Dependencies, dir.path(), Some("Good"), None)
        .await;
    assert!(matches!(registry.complete(&ticket, good), ApplyOutcome::Applied(_)));
    registry.handle_event(&surface, UiEvent::SetLayout { layout: LayoutAlgorithm::Circle });
    let before = registry.get(&surface).unwrap().engine().frame();

    let ticket = registry.begin_request(surface.clone(), "Bad");
    let bad = bridge
        .execute(EngineCommand::Dependencies, dir.path(), Some("Bad"), None)
        .await;
    match registry.complete(&ticket, bad) {
        ApplyOutcome::Failed(BridgeError::EngineExecution { exit_code, stderr }) => {
            assert_eq!(exit_code, Some(2));
            assert_eq!(stderr, "parse error at line 10");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    let view = registry.get(&surface).unwrap();
    assert_eq!(view.engine().frame(), before);
    assert_eq!(view.engine().layout(), LayoutAlgorithm::Circle);
    assert!(view.last_error().unwrap().contains("parse error at line 10"));
}

#[tokio::test]
async fn test_new_surfaces_use_registry_defaults() {
    let (dir, locator) = resolvable_project();
    let bridge = EngineBridge::new(locator, DelayedEngine::new());
    let mut registry = SurfaceRegistry::with_defaults(RenderSettings {
        layout: LayoutAlgorithm::BreadthFirst,
        collapsed: true,
    });
    let surface = SurfaceId::from("tab-1");

    let ticket = registry.begin_request(surface.clone(), "Dependencies: Job");
    let result = bridge
        .execute(EngineCommand::Dependencies, dir.path(), Some("Job"), None)
        .await;
    registry.complete(&ticket, result);

    let engine = registry.get(&surface).unwrap().engine();
    assert_eq!(engine.layout(), LayoutAlgorithm::BreadthFirst);
    assert!(engine.visibility().is_node_hidden("Job#run"));
    assert!(!engine.visibility().is_node_hidden("Job#class"));
}
