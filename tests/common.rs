//! Common test utilities for building templates, diagrams and documents.
use nodeflow::prelude::*;

/// `Source{outputs: [["val", "number"]]}`
#[allow(dead_code)]
pub fn source_template() -> Template {
    Template::new(160.0, 80.0).with_output("val", "number")
}

/// `Sink{inputs: [["val", "number"]]}`
#[allow(dead_code)]
pub fn sink_template() -> Template {
    Template::new(160.0, 80.0).with_input("val", "number")
}

/// One string input, one string output.
#[allow(dead_code)]
pub fn text_template() -> Template {
    Template::new(200.0, 100.0)
        .with_input("text", "string")
        .with_output("text", "string")
}

/// Two number inputs, one number output and two parameters.
#[allow(dead_code)]
pub fn mixer_template() -> Template {
    Template::new(220.0, 140.0)
        .with_input("a", "number")
        .with_input("b", "number")
        .with_output("sum", "number")
        .with_parameter(
            Parameter::new(
                "Gain",
                ParameterKind::NumField {
                    default: Some(1.0),
                    min: Some(0.0),
                    max: Some(2.0),
                    step: Some(0.1),
                },
            )
            .with_tooltip("Output gain"),
        )
        .with_parameter(Parameter::new(
            "Mode",
            ParameterKind::Dropdown {
                options: vec!["add".to_string(), "mul".to_string()],
                default: None,
            },
        ))
}

/// A diagram with `Source`, `Sink`, `Text` and `Mixer` registered and no nodes.
#[allow(dead_code)]
pub fn create_test_diagram() -> Diagram {
    Diagram::builder()
        .with_template("Source", source_template())
        .with_template("Sink", sink_template())
        .with_template("Text", text_template())
        .with_template("Mixer", mixer_template())
        .build()
}

/// A `Source` at the origin and a `Sink` to its right, unlinked.
#[allow(dead_code)]
pub fn create_source_and_sink() -> (Diagram, NodeId, NodeId) {
    let mut diagram = create_test_diagram();
    let source = diagram
        .create_node("Source", Point::new(0.0, 0.0))
        .expect("Failed to create source");
    let sink = diagram
        .create_node("Sink", Point::new(300.0, 0.0))
        .expect("Failed to create sink");
    diagram.drain_events();
    (diagram, source, sink)
}

/// Panics with the broken invariant if the diagram's edges are not mirrored.
#[allow(dead_code)]
pub fn assert_mirrored(diagram: &Diagram) {
    if let Err(e) = diagram.verify_integrity() {
        panic!("Mirror invariant violated: {}", e);
    }
}

/// Source -> Mixer.a, Source -> Mixer.b, Mixer.sum -> Sink.
#[allow(dead_code)]
pub const CHAIN_JSON: &str = r#"{
    "templates": {
        "Source": {"dimensions": [160, 80], "parameters": [], "inputs": [], "outputs": [["val", "number"]]},
        "Sink": {"dimensions": [160, 80], "parameters": [], "inputs": [["val", "number"]], "outputs": []},
        "Mixer": {
            "dimensions": [220, 140],
            "parameters": [{"name": "Gain", "type": "num_field", "default": 1, "tooltip": "Output gain"}],
            "inputs": [["a", "number"], ["b", "number"]],
            "outputs": [["sum", "number"]]
        }
    },
    "nodes": [
        {"coordinates": [0, 0], "template": "Source", "is_template": 0,
         "state": {"parameters": [], "inputs": [], "outputs": [[[1, 0], [1, 1]]]}},
        {"coordinates": [250, 0], "template": "Mixer", "is_template": 0,
         "state": {"parameters": [0.25], "inputs": [[0, 0], [0, 0]], "outputs": [[[2, 0]]]}},
        {"coordinates": [550, 0], "template": "Sink", "is_template": 1,
         "state": {"parameters": [], "inputs": [[1, 0]], "outputs": []}}
    ]
}"#;

/// Like `CHAIN_JSON`, but the sink's input references node index 5.
#[allow(dead_code)]
pub const DANGLING_EDGE_JSON: &str = r#"{
    "templates": {
        "Source": {"dimensions": [160, 80], "inputs": [], "outputs": [["val", "number"]]},
        "Sink": {"dimensions": [160, 80], "inputs": [["val", "number"]], "outputs": []}
    },
    "nodes": [
        {"coordinates": [0, 0], "template": "Source", "is_template": 0,
         "state": {"parameters": [], "inputs": [], "outputs": [[[1, 0]]]}},
        {"coordinates": [300, 0], "template": "Sink", "is_template": 0,
         "state": {"parameters": [], "inputs": [[0, 0]], "outputs": []}},
        {"coordinates": [300, 200], "template": "Sink", "is_template": 0,
         "state": {"parameters": [], "inputs": [[5, 0]], "outputs": []}}
    ]
}"#;
