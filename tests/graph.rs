//! Graph model tests
//!
//! Linking, unlinking, deletion and template edits, checked against the mirror
//! invariant after every mutation.
//!
mod common;
use common::*;
use nodeflow::prelude::*;
use serde_json::json;

#[cfg(test)]
mod link_tests {
    use super::*;

    #[test]
    fn test_link_then_delete_source() {
        let (mut diagram, source, sink) = create_source_and_sink();

        diagram
            .link_nodes(source, 0, sink, 0)
            .expect("Compatible terminals should link");
        assert_eq!(diagram.input_source(sink, 0), Some((source, 0)));
        assert_eq!(diagram.output_targets(source, 0), vec![(sink, 0)]);
        assert_mirrored(&diagram);

        diagram.delete_node(source).expect("Failed to delete source");
        assert_eq!(diagram.input_source(sink, 0), None);
        assert_eq!(diagram.edge_count(), 0);
        assert_eq!(diagram.node_count(), 1);
        assert_mirrored(&diagram);
    }

    #[test]
    fn test_incompatible_link_is_rejected() {
        let mut diagram = create_test_diagram();
        let source = diagram.create_node("Source", Point::default()).unwrap();
        let text = diagram.create_node("Text", Point::new(300.0, 0.0)).unwrap();
        diagram.drain_events();

        let result = diagram.link_nodes(source, 0, text, 0);
        assert_eq!(
            result,
            Err(GraphError::IncompatibleTypes {
                source_type: "number".to_string(),
                destination_type: "string".to_string(),
            })
        );
        assert_eq!(diagram.edge_count(), 0);
        assert_eq!(diagram.input_source(text, 0), None);
        assert!(diagram.output_targets(source, 0).is_empty());
        assert!(diagram.drain_events().is_empty());
    }

    #[test]
    fn test_compatibility_entry_allows_conversion() {
        let mut diagram = create_test_diagram();
        diagram.set_compatibility_table(CompatibilityTable::new().allow("string", ["string", "number"]));
        let source = diagram.create_node("Source", Point::default()).unwrap();
        let text = diagram.create_node("Text", Point::new(300.0, 0.0)).unwrap();

        diagram.link_nodes(source, 0, text, 0).expect("number -> string is allowed");
        // The entry is directed: string does not feed number.
        let sink = diagram.create_node("Sink", Point::new(600.0, 0.0)).unwrap();
        assert!(diagram.link_nodes(text, 0, sink, 0).is_err());
    }

    #[test]
    fn test_relinking_an_input_replaces_the_old_edge() {
        let (mut diagram, first, sink) = create_source_and_sink();
        let second = diagram.create_node("Source", Point::new(0.0, 200.0)).unwrap();

        diagram.link_nodes(first, 0, sink, 0).unwrap();
        diagram.link_nodes(second, 0, sink, 0).unwrap();

        assert_eq!(diagram.input_source(sink, 0), Some((second, 0)));
        assert!(diagram.output_targets(first, 0).is_empty());
        assert_eq!(diagram.edge_count(), 1);
        assert_mirrored(&diagram);
    }

    #[test]
    fn test_fan_out_and_target_deletion() {
        let (mut diagram, source, sink) = create_source_and_sink();
        let other = diagram.create_node("Sink", Point::new(300.0, 200.0)).unwrap();

        diagram.link_nodes(source, 0, sink, 0).unwrap();
        diagram.link_nodes(source, 0, other, 0).unwrap();
        assert_eq!(diagram.output_targets(source, 0), vec![(sink, 0), (other, 0)]);
        assert_eq!(diagram.node(source).unwrap().degree(Side::Output, 0), 2);

        diagram.delete_node(sink).unwrap();
        assert_eq!(diagram.output_targets(source, 0), vec![(other, 0)]);
        assert_mirrored(&diagram);
    }

    #[test]
    fn test_missing_terminal_and_node_errors() {
        let (mut diagram, source, sink) = create_source_and_sink();

        assert_eq!(
            diagram.link_nodes(source, 3, sink, 0),
            Err(GraphError::TerminalNotFound {
                node: source,
                side: Side::Output,
                index: 3
            })
        );
        diagram.delete_node(source).unwrap();
        assert_eq!(
            diagram.link_nodes(source, 0, sink, 0),
            Err(GraphError::NodeNotFound(source))
        );
        assert_eq!(diagram.delete_node(source).err(), Some(GraphError::NodeNotFound(source)));
    }

    #[test]
    fn test_unlink_input_and_output() {
        let (mut diagram, source, sink) = create_source_and_sink();
        let other = diagram.create_node("Sink", Point::new(300.0, 200.0)).unwrap();
        diagram.link_nodes(source, 0, sink, 0).unwrap();
        diagram.link_nodes(source, 0, other, 0).unwrap();

        let removed = diagram.unlink_input(sink, 0).unwrap().expect("An edge was linked");
        assert_eq!(removed.source, source);
        assert_eq!(diagram.output_targets(source, 0), vec![(other, 0)]);
        assert_eq!(diagram.unlink_input(sink, 0).unwrap(), None);

        let removed = diagram.unlink_output(source, 0).unwrap();
        assert_eq!(removed.len(), 1);
        assert_eq!(diagram.edge_count(), 0);
        assert_mirrored(&diagram);
    }

    #[test]
    fn test_events_accumulate_until_drained() {
        let (mut diagram, source, sink) = create_source_and_sink();
        diagram.link_nodes(source, 0, sink, 0).unwrap();
        diagram.move_node(sink, Point::new(320.0, 10.0)).unwrap();
        let queued = diagram.pending_events().len();
        assert!(queued >= 2);

        diagram.move_node(sink, Point::new(340.0, 10.0)).unwrap();
        assert!(diagram.pending_events().len() > queued);

        let drained = diagram.drain_events();
        assert!(matches!(drained.first(), Some(DiagramEvent::EdgeChanged { .. })));
        assert!(diagram.pending_events().is_empty());
        assert!(diagram.drain_events().is_empty());
    }

    #[test]
    fn test_self_loop_survives_deletion() {
        let mut diagram = create_test_diagram();
        let mixer = diagram.create_node("Mixer", Point::default()).unwrap();
        diagram.link_nodes(mixer, 0, mixer, 1).unwrap();
        assert_mirrored(&diagram);

        diagram.delete_node(mixer).unwrap();
        assert_eq!(diagram.edge_count(), 0);
        assert_mirrored(&diagram);
    }

    #[test]
    fn test_edge_events_are_queued() {
        let (mut diagram, source, sink) = create_source_and_sink();
        let edge = diagram.link_nodes(source, 0, sink, 0).unwrap();
        let linked = *diagram.edge(edge).unwrap();
        diagram.delete_node(sink).unwrap();

        let events = diagram.drain_events();
        assert!(events.contains(&DiagramEvent::EdgeChanged {
            edge: linked,
            change: EdgeChange::Added
        }));
        assert!(events.contains(&DiagramEvent::EdgeChanged {
            edge: linked,
            change: EdgeChange::Removed
        }));
        assert_eq!(events.last(), Some(&DiagramEvent::Redraw(RedrawScope::All)));
        assert!(diagram.pending_events().is_empty());
    }
}

#[cfg(test)]
mod template_tests {
    use super::*;

    #[test]
    fn test_new_node_gets_parameter_defaults() {
        let mut diagram = create_test_diagram();
        let mixer = diagram.create_node("Mixer", Point::default()).unwrap();
        let node = diagram.node(mixer).unwrap();

        assert_eq!(node.parameter(0), Some(&json!(1.0)));
        assert_eq!(node.parameter(1), Some(&json!("add")));
        assert_eq!(node.state().inputs().len(), 2);
        assert_eq!(node.state().outputs().len(), 1);
    }

    #[test]
    fn test_unknown_template_is_rejected() {
        let mut diagram = create_test_diagram();
        assert_eq!(
            diagram.create_node("Nope", Point::default()),
            Err(GraphError::UnknownTemplate("Nope".to_string()))
        );
        assert_eq!(diagram.node_count(), 0);
    }

    #[test]
    fn test_set_parameter_checks_slot_only() {
        let mut diagram = create_test_diagram();
        let mixer = diagram.create_node("Mixer", Point::default()).unwrap();

        // Values are not validated against the declared type.
        let previous = diagram.set_parameter(mixer, 0, json!("loud")).unwrap();
        assert_eq!(previous, Some(json!(1.0)));
        assert_eq!(diagram.node(mixer).unwrap().parameter(0), Some(&json!("loud")));
        assert_eq!(
            diagram.set_parameter(mixer, 5, json!(1)),
            Err(GraphError::ParameterNotFound { node: mixer, index: 5 })
        );
    }

    #[test]
    fn test_change_template_drops_edges_on_both_sides() {
        let mut diagram = create_test_diagram();
        let source = diagram.create_node("Source", Point::default()).unwrap();
        let mixer = diagram.create_node("Mixer", Point::new(250.0, 0.0)).unwrap();
        let sink = diagram.create_node("Sink", Point::new(550.0, 0.0)).unwrap();
        diagram.link_nodes(source, 0, mixer, 0).unwrap();
        diagram.link_nodes(mixer, 0, sink, 0).unwrap();

        assert_eq!(diagram.change_template(mixer, "Mixer"), Ok(false));
        assert_eq!(diagram.change_template(mixer, "Nope"), Ok(false));
        assert_eq!(diagram.edge_count(), 2);

        assert_eq!(diagram.change_template(mixer, "Text"), Ok(true));
        assert_eq!(diagram.edge_count(), 0);
        assert!(diagram.output_targets(source, 0).is_empty());
        assert_eq!(diagram.input_source(sink, 0), None);

        let node = diagram.node(mixer).unwrap();
        assert_eq!(node.template_name(), "Text");
        assert!(node.state().parameters().is_empty());
        assert_eq!(node.state().inputs().to_vec(), vec![None]);
        assert_mirrored(&diagram);
    }

    #[test]
    fn test_rename_keeps_instances_and_edges() {
        let (mut diagram, source, sink) = create_source_and_sink();
        diagram.link_nodes(source, 0, sink, 0).unwrap();
        diagram.drain_events();

        diagram.rename_template("Sink", "Drain").expect("Rename should succeed");
        assert!(diagram.template("Sink").is_none());
        assert_eq!(diagram.node(sink).unwrap().template_name(), "Drain");
        assert_eq!(diagram.input_source(sink, 0), Some((source, 0)));
        assert!(
            diagram
                .drain_events()
                .contains(&DiagramEvent::TemplateChanged("Drain".to_string()))
        );
    }

    #[test]
    fn test_rename_to_taken_name_is_rejected_with_notice() {
        let (mut diagram, _source, sink) = create_source_and_sink();

        assert_eq!(
            diagram.rename_template("Sink", "Source"),
            Err(GraphError::TemplateNameTaken("Source".to_string()))
        );
        assert_eq!(diagram.node(sink).unwrap().template_name(), "Sink");
        assert!(diagram.template("Sink").is_some());
        assert!(matches!(
            diagram.drain_events().as_slice(),
            [DiagramEvent::Notice(_)]
        ));
    }

    #[test]
    fn test_new_template_node_picks_unused_names() {
        let mut diagram = create_test_diagram();
        let first = diagram.new_template_node(Point::default()).unwrap();
        let second = diagram.new_template_node(Point::new(0.0, 200.0)).unwrap();

        assert_eq!(diagram.node(first).unwrap().template_name(), "Template");
        assert_eq!(diagram.node(second).unwrap().template_name(), "Template_0");
        assert!(diagram.node(first).unwrap().is_template());
        assert_eq!(diagram.template("Template").unwrap().dimensions, (160.0, 100.0));
    }

    #[test]
    fn test_user_templates_can_be_disabled() {
        let config = EditorConfig {
            allow_user_templates: false,
            ..EditorConfig::default()
        };
        let mut diagram = Diagram::builder().with_config(config).build();
        assert_eq!(
            diagram.new_template_node(Point::default()),
            Err(GraphError::UserTemplatesDisabled)
        );
        assert!(diagram.templates().is_empty());
    }

    #[test]
    fn test_terminal_toggle_severs_attached_edges() {
        let mut diagram = create_test_diagram();
        diagram.set_compatibility_table(CompatibilityTable::new().allow("any", ["number"]));
        let editor = diagram.new_template_node(Point::new(300.0, 0.0)).unwrap();
        let source = diagram.create_node("Source", Point::default()).unwrap();

        assert_eq!(diagram.add_remove_terminal(editor, Side::Input, 0, SlotOp::Add), Ok(true));
        assert_eq!(diagram.add_remove_terminal(editor, Side::Input, 0, SlotOp::Add), Ok(false));
        let template = diagram.template_of(editor).unwrap();
        assert_eq!(template.inputs.get(0), Some(&Terminal::new("Input", "any")));

        diagram.link_nodes(source, 0, editor, 0).unwrap();
        assert_eq!(diagram.add_remove_terminal(editor, Side::Input, 0, SlotOp::Toggle), Ok(true));
        assert_eq!(diagram.edge_count(), 0);
        assert!(diagram.output_targets(source, 0).is_empty());
        assert_mirrored(&diagram);
    }

    #[test]
    fn test_removed_slot_leaves_a_hole() {
        let mut diagram = create_test_diagram();
        let editor = diagram.new_template_node(Point::default()).unwrap();
        for index in 0..3 {
            diagram
                .add_remove_terminal(editor, Side::Output, index, SlotOp::Add)
                .unwrap();
        }
        diagram
            .add_remove_terminal(editor, Side::Output, 1, SlotOp::Remove)
            .unwrap();

        let outputs = &diagram.template_of(editor).unwrap().outputs;
        assert_eq!(outputs.len(), 3);
        assert!(outputs.get(1).is_none());
        assert!(outputs.get(2).is_some());
    }

    #[test]
    fn test_parameter_toggle_fills_placeholder() {
        let mut diagram = create_test_diagram();
        let editor = diagram.new_template_node(Point::default()).unwrap();

        assert_eq!(diagram.add_remove_parameter(editor, 1, SlotOp::Toggle), Ok(true));
        let template = diagram.template_of(editor).unwrap();
        assert_eq!(template.parameters.get(1), Some(&Parameter::placeholder()));
        assert_eq!(diagram.node(editor).unwrap().parameter(1), Some(&json!("")));
    }

    #[test]
    fn test_template_edits_require_a_template_node() {
        let (mut diagram, source, _) = create_source_and_sink();
        assert_eq!(
            diagram.add_remove_terminal(source, Side::Input, 0, SlotOp::Add),
            Err(GraphError::NotATemplateNode(source))
        );

        diagram.set_as_template(source).unwrap();
        assert_eq!(diagram.add_remove_terminal(source, Side::Input, 0, SlotOp::Add), Ok(true));
    }

    #[test]
    fn test_template_changes_reach_every_instance() {
        let mut diagram = create_test_diagram();
        let a = diagram.create_node("Mixer", Point::default()).unwrap();
        let b = diagram.create_node("Mixer", Point::new(0.0, 200.0)).unwrap();
        diagram.link_nodes(a, 0, b, 1).unwrap();

        let trimmed = Template::new(220.0, 140.0).with_output("sum", "number");
        diagram.update_template("Mixer", trimmed).unwrap();

        assert_eq!(diagram.edge_count(), 0);
        for id in [a, b] {
            let node = diagram.node(id).unwrap();
            assert!(node.state().inputs().is_empty());
            assert!(node.state().parameters().is_empty());
        }
        assert_mirrored(&diagram);
    }

    #[test]
    fn test_remove_template_strands_nodes() {
        let (mut diagram, source, sink) = create_source_and_sink();
        diagram.link_nodes(source, 0, sink, 0).unwrap();

        let removed = diagram.remove_template("Sink").unwrap();
        assert_eq!(removed, sink_template());
        assert!(diagram.contains_node(sink));
        assert!(diagram.template_of(sink).is_none());
        assert_eq!(diagram.edge_count(), 0);
        assert!(diagram.node(sink).unwrap().state().inputs().is_empty());

        // A stranded node can be moved to another template.
        assert_eq!(diagram.change_template(sink, "Source"), Ok(true));
        assert!(diagram.template_of(sink).is_some());
        assert_mirrored(&diagram);
    }

    #[test]
    fn test_rename_onto_stranded_nodes_rebuilds_their_state() {
        let mut diagram = create_test_diagram();
        let stranded = diagram.create_node("Mixer", Point::default()).unwrap();
        let source = diagram.create_node("Source", Point::new(-300.0, 0.0)).unwrap();
        diagram.remove_template("Mixer").unwrap();
        assert!(diagram.node(stranded).unwrap().state().inputs().is_empty());
        diagram.drain_events();

        diagram.rename_template("Text", "Mixer").unwrap();

        let node = diagram.node(stranded).unwrap();
        assert_eq!(diagram.template_of(stranded), Some(&text_template()));
        assert_eq!(node.state().inputs().len(), 1);
        assert_eq!(node.state().outputs().len(), 1);
        assert!(
            diagram
                .drain_events()
                .contains(&DiagramEvent::Redraw(RedrawScope::Nodes(vec![stranded])))
        );

        diagram.set_compatibility_table(CompatibilityTable::new().allow("string", ["number"]));
        diagram.link_nodes(source, 0, stranded, 0).expect("Rebuilt slot should accept a link");
        assert_mirrored(&diagram);
    }

    #[test]
    fn test_dimensions_move_output_terminals() {
        let (mut diagram, source, _) = create_source_and_sink();
        let before = diagram.terminal_position(TerminalRef::output(source, 0)).unwrap();
        assert_eq!(before, Point::new(160.0, 35.0));

        diagram.set_template_dimensions("Source", 240.0, 80.0).unwrap();
        let after = diagram.terminal_position(TerminalRef::output(source, 0)).unwrap();
        assert_eq!(after, Point::new(240.0, 35.0));
    }
}

#[cfg(test)]
mod query_tests {
    use super::*;

    #[test]
    fn test_label_queries_use_last_matching_slot() {
        let mut diagram = Diagram::builder()
            .with_template("Source", source_template())
            .with_template(
                "Split",
                Template::new(160.0, 120.0)
                    .with_input("in", "number")
                    .with_output("out", "number")
                    .with_output("out", "number"),
            )
            .with_template("Sink", sink_template())
            .build();
        let source = diagram.create_node("Source", Point::default()).unwrap();
        let split = diagram.create_node("Split", Point::new(200.0, 0.0)).unwrap();
        let sink = diagram.create_node("Sink", Point::new(400.0, 0.0)).unwrap();
        diagram.link_nodes(source, 0, split, 0).unwrap();
        diagram.link_nodes(split, 1, sink, 0).unwrap();

        assert_eq!(diagram.input_source_by_label(split, "in"), Some((source, 0)));
        assert_eq!(diagram.output_targets_by_label(split, "out"), Some(vec![(sink, 0)]));
        assert_eq!(diagram.output_targets_by_label(split, "missing"), None);
    }

    #[test]
    fn test_edge_path_runs_between_terminals() {
        let (mut diagram, source, sink) = create_source_and_sink();
        let edge = diagram.link_nodes(source, 0, sink, 0).unwrap();

        let path = diagram.edge_path(edge).unwrap();
        assert_eq!(path.from, Point::new(160.0, 35.0));
        assert_eq!(path.to, Point::new(300.0, 35.0));
        assert_eq!(path.to_svg(), "M 160 35 C 260 35 200 35 300 35");

        // The control offset follows the zoom factor.
        diagram.view_mut().set_scale(1.0);
        let zoomed = diagram.edge_path(edge).unwrap();
        assert_eq!(zoomed.control_from.x - zoomed.from.x, 200.0);
    }

    #[test]
    fn test_nodes_keep_insertion_order() {
        let mut diagram = create_test_diagram();
        let ids: Vec<NodeId> = ["Sink", "Source", "Mixer"]
            .iter()
            .map(|name| diagram.create_node(name, Point::default()).unwrap())
            .collect();
        diagram.delete_node(ids[1]).unwrap();

        let names: Vec<&str> = diagram.nodes().map(|n| n.template_name()).collect();
        assert_eq!(names, vec!["Sink", "Mixer"]);
        assert_eq!(diagram.index_of(ids[2]), Some(1));
    }

    #[test]
    fn test_compatibility_getter_returns_a_copy() {
        let mut diagram = create_test_diagram();
        diagram.set_compatibility_table(CompatibilityTable::new().allow("string", ["number"]));

        let mut copy = diagram.compatibility_table();
        copy.remove_entry("string");
        assert!(diagram.are_compatible("number", "string"));
        assert!(!diagram.are_compatible("string", "string"));
    }
}
