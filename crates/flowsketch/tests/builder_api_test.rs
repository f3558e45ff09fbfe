//! Integration tests for the FlowchartBuilder API

use flowsketch::{
    FlowchartBuilder, FlowsketchError,
    config::AppConfig,
    layout::{Direction, EdgeKind},
};
use flowsketch_parser::error::ErrorKind;

const BEGIN_DONE: &str = r#"{
    "nodes": [
        {"id": "1", "type": "start", "label": "Begin"},
        {"id": "2", "type": "end", "label": "Done"}
    ],
    "edges": [{"id": "e1", "source": "1", "target": "2"}]
}"#;

const DECISION: &str = r#"{
    "nodes": [
        {"id": "start", "type": "start", "label": "Start"},
        {"id": "check", "type": "decision", "label": "Valid?"},
        {"id": "save", "type": "process", "label": "Save"},
        {"id": "reject", "type": "process", "label": "Reject"}
    ],
    "edges": [
        {"id": "e1", "source": "start", "target": "check"},
        {"id": "e2", "source": "check", "target": "save", "label": "Yes"},
        {"id": "e3", "source": "check", "target": "reject", "label": "No"}
    ]
}"#;

#[test]
fn test_builder_api_exists() {
    let _builder = FlowchartBuilder::default();
}

#[test]
fn test_begin_done_is_two_ranks() {
    let builder = FlowchartBuilder::default();
    let graph = builder.parse(BEGIN_DONE).expect("Failed to parse");
    let layout = builder.layout(&graph);

    let begin = layout.node("1").unwrap();
    let done = layout.node("2").unwrap();
    assert_eq!(begin.rank(), 0);
    assert_eq!(done.rank(), 1);
    assert!(begin.position().y() < done.position().y());
}

#[test]
fn test_decision_branches() {
    let builder = FlowchartBuilder::default();
    let graph = builder.parse(DECISION).expect("Failed to parse");
    let layout = builder.layout(&graph);

    let check = layout.node("check").unwrap();
    let yes = layout.edge("e2").unwrap();
    let no = layout.edge("e3").unwrap();

    assert_eq!(layout.edges().len(), 3);
    assert_ne!(yes.source_anchor(), no.source_anchor());
    assert!(layout.node("save").unwrap().rank() > check.rank());
    assert!(layout.node("reject").unwrap().rank() > check.rank());
    assert_eq!(yes.label(), Some("Yes"));
}

#[test]
fn test_empty_graph() {
    let builder = FlowchartBuilder::default();
    let graph = builder
        .parse(r#"{"nodes": [], "edges": []}"#)
        .expect("Empty graph should parse");
    let layout = builder.layout(&graph);

    assert!(layout.is_empty());
    assert!(layout.edges().is_empty());
    assert!(layout.size().is_zero());
}

#[test]
fn test_dangling_edge_is_parse_error() {
    let source = r#"{
        "nodes": [{"id": "1", "type": "start", "label": "Begin"}],
        "edges": [{"id": "e1", "source": "1", "target": "9"}]
    }"#;

    let err = FlowchartBuilder::default().parse(source).unwrap_err();
    match err {
        FlowsketchError::Parse { err, src } => {
            assert_eq!(err.kind(), Some(ErrorKind::DanglingEdge));
            assert_eq!(src, source);
        }
        other => panic!("Expected parse error, got {other:?}"),
    }
}

#[test]
fn test_render_svg() {
    let builder = FlowchartBuilder::default();
    let graph = builder.parse(DECISION).expect("Failed to parse");
    let svg = builder.render_svg(&graph).expect("Failed to render");

    assert!(svg.contains("<svg"), "Output should contain SVG tag");
    assert!(svg.contains("</svg>"), "Output should be complete SVG");
    assert!(svg.contains("Valid?"));
}

#[test]
fn test_render_json() {
    let builder = FlowchartBuilder::default();
    let graph = builder.parse(BEGIN_DONE).expect("Failed to parse");
    let json = builder.render_json(&graph).expect("Failed to render");

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["nodes"].as_array().unwrap().len(), 2);
    assert_eq!(value["edges"][0]["id"], "e1");
}

#[test]
fn test_config_from_json_source() {
    let config: AppConfig = serde_json::from_str(
        r#"{
            "layout": {"direction": "LR", "rank_spacing": 80},
            "style": {"background_color": "white"}
        }"#,
    )
    .unwrap();
    assert_eq!(config.layout().direction(), Direction::LeftToRight);

    let builder = FlowchartBuilder::new(config);
    let graph = builder.parse(BEGIN_DONE).expect("Failed to parse");
    let layout = builder.layout(&graph);

    let begin = layout.node("1").unwrap();
    let done = layout.node("2").unwrap();
    assert!(begin.position().x() < done.position().x());
    assert_eq!(begin.position().y(), done.position().y());

    let svg = builder.render_svg(&graph).expect("Failed to render");
    assert!(svg.contains(r#"data-layer="background""#));
}

#[test]
fn test_invalid_background_is_config_error() {
    let config: AppConfig =
        serde_json::from_str(r#"{"style": {"background_color": "nope"}}"#).unwrap();
    let builder = FlowchartBuilder::new(config);
    let graph = builder.parse(BEGIN_DONE).expect("Failed to parse");

    assert!(matches!(
        builder.render_svg(&graph),
        Err(FlowsketchError::Config(_))
    ));
}

#[test]
fn test_default_background_and_transparent_override() {
    let builder = FlowchartBuilder::default();
    let graph = builder.parse(BEGIN_DONE).expect("Failed to parse");
    let svg = builder.render_svg(&graph).expect("Failed to render");
    assert!(svg.contains(r#"data-layer="background""#));

    let config: AppConfig =
        serde_json::from_str(r#"{"style": {"background_color": "none"}}"#).unwrap();
    let svg = FlowchartBuilder::new(config)
        .render_svg(&graph)
        .expect("Failed to render");
    assert!(!svg.contains(r#"data-layer="background""#));
}

#[test]
fn test_negative_spacing_is_rejected_by_renderers() {
    let config: AppConfig =
        serde_json::from_str(r#"{"layout": {"node_spacing": -100}}"#).unwrap();
    let builder = FlowchartBuilder::new(config);
    let graph = builder.parse(DECISION).expect("Failed to parse");

    assert!(matches!(
        builder.render_svg(&graph),
        Err(FlowsketchError::Config(message)) if message.contains("node_spacing")
    ));
    assert!(matches!(
        builder.render_json(&graph),
        Err(FlowsketchError::Config(_))
    ));

    let layout = builder.layout(&graph);
    let nodes = layout.nodes();
    for (i, a) in nodes.iter().enumerate() {
        for b in &nodes[i + 1..] {
            assert!(!a.bounds().intersects(&b.bounds()));
        }
    }
}

#[test]
fn test_retry_loop_is_back_edge() {
    let source = r#"```json
    {
      "nodes": [
        {"id": "a", "type": "start", "label": "Start"},
        {"id": "b", "type": "process", "label": "Try"},
        {"id": "c", "type": "decision", "label": "Worked?"},
        {"id": "d", "type": "end", "label": "Done"}
      ],
      "edges": [
        {"id": "e1", "source": "a", "target": "b"},
        {"id": "e2", "source": "b", "target": "c"},
        {"id": "e3", "source": "c", "target": "b", "label": "No"},
        {"id": "e4", "source": "c", "target": "d", "label": "Yes"}
      ]
    }
    ```"#;

    let builder = FlowchartBuilder::default();
    let graph = builder.parse(source).expect("Failed to parse");
    let layout = builder.layout(&graph);

    assert_eq!(layout.edge("e3").unwrap().kind(), EdgeKind::Back);
    assert_eq!(layout.node("d").unwrap().rank(), 3);
}

#[test]
fn test_builder_reusability() {
    let builder = FlowchartBuilder::default();

    let first = builder.parse(BEGIN_DONE).expect("Failed to parse first");
    let second = builder.parse(DECISION).expect("Failed to parse second");

    assert_eq!(builder.layout(&first), builder.layout(&first));
    assert_eq!(builder.layout(&second).nodes().len(), 4);
}
