use crate::common::test_helpers;
use codemap_bridge::core::{
    AnalysisResult, AnalysisStats, CodeGraph, EdgeType, GraphEdge, GraphNode, NavigationIntent,
    NodeType,
};
use codemap_bridge::render::{
    stats_line, Highlight, LayoutAlgorithm, RenderCommand, RenderEngine, UiEvent,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::BTreeSet;

fn node_type() -> impl Strategy<Value = NodeType> {
    prop::sample::select(NodeType::ALL.to_vec())
}

fn edge_type() -> impl Strategy<Value = EdgeType> {
    prop::sample::select(EdgeType::ALL.to_vec())
}

/// Graphs of 1..12 nodes with edges between arbitrary (possibly equal) endpoints.
fn arb_result() -> impl Strategy<Value = AnalysisResult> {
    prop::collection::vec(node_type(), 1..12)
        .prop_flat_map(|types| {
            let n = types.len();
            let edges = prop::collection::vec((0..n, 0..n, edge_type()), 0..20);
            (Just(types), edges)
        })
        .prop_map(|(types, edges)| {
            let nodes = types
                .into_iter()
                .enumerate()
                .map(|(i, t)| GraphNode::new(format!("n{i}"), format!("node{i}"), t))
                .collect();
            let edges = edges
                .into_iter()
                .enumerate()
                .map(|(i, (s, t, ty))| GraphEdge::new(format!("e{i}"), format!("n{s}"), format!("n{t}"), ty))
                .collect();
            AnalysisResult::new("fullgraph", CodeGraph::new(nodes, edges).unwrap())
        })
}

proptest! {
    #[test]
    fn collapse_then_expand_restores_everything(result in arb_result()) {
        let mut engine = RenderEngine::new();
        engine.replace_graph(result);
        let positions = engine.positions().clone();

        engine.set_collapse(true);
        prop_assert_eq!(engine.positions(), &positions);
        engine.set_collapse(false);

        prop_assert!(engine.visibility().is_empty());
        prop_assert_eq!(engine.positions(), &positions);
    }

    #[test]
    fn collapsed_view_hides_only_members(result in arb_result()) {
        let mut engine = RenderEngine::new();
        engine.replace_graph(result.clone());
        engine.set_collapse(true);
        let mask = engine.visibility();

        for node in result.graph().nodes() {
            prop_assert_eq!(mask.is_node_hidden(&node.id), node.node_type.is_member());
        }
        for edge in result.graph().edges() {
            let touches_hidden = mask.is_node_hidden(&edge.source) || mask.is_node_hidden(&edge.target);
            prop_assert_eq!(mask.is_edge_hidden(&edge.id), touches_hidden);
        }
    }

    #[test]
    fn hover_then_leave_clears_highlight(result in arb_result(), pick in any::<prop::sample::Index>()) {
        let mut engine = RenderEngine::new();
        let ids: Vec<String> = result.graph().nodes().iter().map(|n| n.id.clone()).collect();
        engine.replace_graph(result);

        engine.on_hover(Some(pick.get(&ids).as_str()));
        engine.on_hover(None);

        prop_assert_eq!(engine.highlight(), &Highlight::default());
        prop_assert!(engine.frame().nodes.iter().all(|n| !n.faded));
    }

    #[test]
    fn hover_never_fades_the_neighbourhood(result in arb_result(), pick in any::<prop::sample::Index>()) {
        let graph = result.graph().clone();
        let focus = pick.get(graph.nodes()).id.clone();
        let mut engine = RenderEngine::new();
        engine.replace_graph(result);
        engine.on_hover(Some(&focus));
        let highlight = engine.highlight();

        let mut kept: BTreeSet<&str> = BTreeSet::from([focus.as_str()]);
        for edge in graph.incident(&focus) {
            prop_assert!(!highlight.is_edge_faded(&edge.id));
            kept.insert(&edge.source);
            kept.insert(&edge.target);
        }
        for node in graph.nodes() {
            prop_assert_eq!(highlight.is_node_faded(&node.id), !kept.contains(node.id.as_str()));
        }
    }

    #[test]
    fn every_layout_places_every_node_once(result in arb_result()) {
        let ids: BTreeSet<String> = result.graph().nodes().iter().map(|n| n.id.clone()).collect();
        let mut engine = RenderEngine::new();
        engine.replace_graph(result);

        for algorithm in LayoutAlgorithm::ALL {
            engine.set_layout(algorithm);
            let placed: BTreeSet<String> = engine.positions().keys().cloned().collect();
            prop_assert_eq!(&placed, &ids);
            prop_assert!(engine.positions().values().all(|p| p.x.is_finite() && p.y.is_finite()));
        }
    }
}

#[test]
fn test_select_navigates_only_located_nodes() {
    let mut engine = RenderEngine::new();
    engine.replace_graph(test_helpers::class_and_method());

    assert_eq!(
        engine.handle(UiEvent::Select { node_id: "B".to_string() }),
        vec![RenderCommand::Navigate(NavigationIntent {
            file_path: "/x.java".to_string(),
            line_number: 12,
        })]
    );
    assert!(engine.handle(UiEvent::Select { node_id: "A".to_string() }).is_empty());
    assert!(engine.handle(UiEvent::Select { node_id: "missing".to_string() }).is_empty());
}

#[test]
fn test_stats_line_matches_engine_stats() {
    let result = test_helpers::class_and_method()
        .with_analysis_time_ms(42)
        .with_stats(AnalysisStats {
            total_classes_parsed: 1,
            total_methods_parsed: 1,
            graph_nodes: 3,
            graph_edges: 2,
        });

    assert_eq!(stats_line(&result), "3 nodes · 2 edges · 1 classes · 42ms");
}

#[test]
fn test_replace_graph_twice_gives_same_frame() {
    let mut first = RenderEngine::new();
    first.replace_graph(test_helpers::class_and_method());
    let once = first.frame();
    first.replace_graph(test_helpers::class_and_method());

    assert_eq!(first.frame(), once);
}

#[test]
fn test_ui_events_from_host_json() {
    let mut engine = RenderEngine::new();
    engine.replace_graph(test_helpers::class_and_method());

    let event: UiEvent = serde_json::from_str(r#"{"type":"setLayout","layout":"circle"}"#).unwrap();
    let commands = engine.handle(event);
    assert!(matches!(
        commands.as_slice(),
        [RenderCommand::Positions { layout: LayoutAlgorithm::Circle, .. }]
    ));

    let event: UiEvent = serde_json::from_str(r#"{"type":"toggleCollapse"}"#).unwrap();
    engine.handle(event);
    assert!(engine.is_collapsed());
    assert!(engine.visibility().is_node_hidden("B"));
}
