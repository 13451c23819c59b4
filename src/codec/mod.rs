//! JSON persistence of diagrams.
//!
//! In memory, edges are ids shared by both endpoints. In a document, a node's
//! `inputs` hold `[source index, source output]` pairs and its `outputs` hold lists
//! of `[target index, target input]` pairs, where an index is the node's position
//! in the exported `nodes` array. Import rebuilds the edges from the `inputs` side
//! alone, so a document whose `outputs` disagree still loads consistently.

mod document;
mod import;

pub use document::{DiagramDocument, NodeRecord, StateRecord};

use crate::error::CodecError;
use crate::graph::{Diagram, NodeId};
use ahash::AHashMap;
use serde_json::Value;
use std::fmt;
use std::fs;

/// What an import kept and what it dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub templates_loaded: usize,
    pub templates_skipped: usize,
    /// Parameter definitions left as holes inside otherwise loaded templates.
    pub parameters_skipped: usize,
    pub nodes_loaded: usize,
    pub nodes_skipped: usize,
    pub edges_loaded: usize,
    pub edges_skipped: usize,
}

impl LoadReport {
    pub fn skipped(&self) -> usize {
        self.templates_skipped + self.parameters_skipped + self.nodes_skipped + self.edges_skipped
    }

    pub fn is_clean(&self) -> bool {
        self.skipped() == 0
    }
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} templates, {} nodes, {} edges loaded ({} templates, {} parameters, {} nodes, {} edges skipped)",
            self.templates_loaded,
            self.nodes_loaded,
            self.edges_loaded,
            self.templates_skipped,
            self.parameters_skipped,
            self.nodes_skipped,
            self.edges_skipped
        )
    }
}

/// Snapshot of a diagram in document form.
pub fn export_document(diagram: &Diagram) -> DiagramDocument {
    let positions: AHashMap<NodeId, usize> = diagram
        .node_ids()
        .iter()
        .enumerate()
        .map(|(index, id)| (*id, index))
        .collect();
    let position = |id: NodeId| positions.get(&id).copied();

    let nodes = diagram
        .nodes()
        .map(|node| {
            let template = diagram.template_of(node.id());
            let state = node.state();

            let inputs: Vec<Option<(usize, usize)>> = state
                .inputs()
                .iter()
                .map(|slot| {
                    let edge = diagram.edge((*slot)?)?;
                    Some((position(edge.source)?, edge.source_output))
                })
                .collect();
            let outputs: Vec<Option<Vec<(usize, usize)>>> = state
                .outputs()
                .iter()
                .enumerate()
                .map(|(index, fan_out)| {
                    let declared = template.is_some_and(|t| t.outputs.is_occupied(index));
                    if !declared && fan_out.is_empty() {
                        return None;
                    }
                    Some(
                        fan_out
                            .iter()
                            .filter_map(|id| diagram.edge(*id))
                            .filter_map(|e| Some((position(e.target)?, e.target_input)))
                            .collect::<Vec<_>>(),
                    )
                })
                .collect();

            NodeRecord {
                coordinates: [node.position().x, node.position().y],
                template: node.template_name().to_string(),
                is_template: u8::from(node.is_template()),
                state: StateRecord {
                    parameters: state.parameters().raw().to_vec(),
                    inputs,
                    outputs,
                },
            }
        })
        .collect();

    DiagramDocument {
        templates: diagram
            .templates()
            .iter()
            .map(|(name, template)| (name.clone(), template.clone()))
            .collect(),
        nodes,
    }
}

pub fn export_value(diagram: &Diagram) -> Result<Value, CodecError> {
    serde_json::to_value(export_document(diagram))
        .map_err(|e| CodecError::JsonParseError(e.to_string()))
}

/// Pretty-printed JSON document of a diagram.
pub fn export_json(diagram: &Diagram) -> Result<String, CodecError> {
    serde_json::to_string_pretty(&export_document(diagram))
        .map_err(|e| CodecError::JsonParseError(e.to_string()))
}

/// Loads a document into `diagram`.
///
/// With `should_overwrite`, the registry and node list are replaced. Otherwise
/// templates are merged (the document wins on name clashes) and its nodes are
/// appended. A document without a `templates` object keeps the current registry;
/// one without a `nodes` array keeps the current nodes. Malformed templates,
/// parameters, nodes and edges are skipped and counted.
pub fn load_json(
    diagram: &mut Diagram,
    json: &str,
    should_overwrite: bool,
) -> Result<LoadReport, CodecError> {
    let document: Value =
        serde_json::from_str(json).map_err(|e| CodecError::JsonParseError(e.to_string()))?;
    import::load_value(diagram, &document, should_overwrite)
}

pub fn load_value(
    diagram: &mut Diagram,
    document: &Value,
    should_overwrite: bool,
) -> Result<LoadReport, CodecError> {
    import::load_value(diagram, document, should_overwrite)
}

pub fn load_file(
    diagram: &mut Diagram,
    path: &str,
    should_overwrite: bool,
) -> Result<LoadReport, CodecError> {
    let content = fs::read_to_string(path).map_err(|e| CodecError::Io(format!("{}: {}", path, e)))?;
    load_json(diagram, &content, should_overwrite)
}

pub fn save_file(diagram: &Diagram, path: &str) -> Result<(), CodecError> {
    let json = export_json(diagram)?;
    fs::write(path, json).map_err(|e| CodecError::Io(format!("{}: {}", path, e)))
}

impl Diagram {
    /// Builds a fresh diagram from a document.
    pub fn from_json(json: &str) -> Result<(Self, LoadReport), CodecError> {
        let mut diagram = Diagram::new();
        let report = load_json(&mut diagram, json, true)?;
        Ok((diagram, report))
    }

    pub fn to_json(&self) -> Result<String, CodecError> {
        export_json(self)
    }

    pub fn load_json(&mut self, json: &str, should_overwrite: bool) -> Result<LoadReport, CodecError> {
        load_json(self, json, should_overwrite)
    }
}
