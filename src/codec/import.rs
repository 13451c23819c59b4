use super::LoadReport;
use crate::error::CodecError;
use crate::graph::{Diagram, DiagramEvent, Edge, NodeId, RedrawScope, Side};
use crate::template::{Parameter, Slots, Template, TemplateRegistry};
use crate::transform::Point;
use serde_json::{Map, Value};
use tracing::{info, warn};

/// Best-effort import. Only a non-object root aborts; anything malformed below it
/// is skipped at the smallest granularity (one template, one node or one edge).
pub(crate) fn load_value(
    diagram: &mut Diagram,
    document: &Value,
    should_overwrite: bool,
) -> Result<LoadReport, CodecError> {
    let root = document.as_object().ok_or_else(|| {
        CodecError::JsonParseError("the document root must be a JSON object".to_string())
    })?;
    let mut report = LoadReport::default();

    // A missing key leaves that part of the diagram alone, even when overwriting.
    let loaded = root
        .get("templates")
        .and_then(Value::as_object)
        .map(|entries| read_templates(entries, &mut report));
    let records = root.get("nodes").and_then(Value::as_array);

    if should_overwrite && records.is_some() {
        diagram.clear();
    }
    if let Some(loaded) = loaded {
        let loaded_names = loaded.names();
        if should_overwrite {
            diagram.templates = loaded;
        } else {
            diagram.templates.merge(loaded);
        }
        diagram.refresh_all();
        for name in loaded_names {
            diagram.emit(DiagramEvent::TemplateChanged(name));
        }
    }
    let records = records.map(Vec::as_slice).unwrap_or(&[]);

    // Pass 1: every record keeps its slot, dropped ones as `None`, so the
    // index references of pass 2 stay aligned.
    let placed: Vec<Option<NodeId>> = records
        .iter()
        .enumerate()
        .map(|(index, record)| place_node(diagram, index, record, &mut report))
        .collect();

    // Pass 2: edges, read from the input side only.
    for (index, (record, target)) in records.iter().zip(&placed).enumerate() {
        let Some(target) = *target else {
            continue;
        };
        let inputs = record
            .pointer("/state/inputs")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        for (input, entry) in inputs.iter().enumerate() {
            if entry.is_null() {
                continue;
            }
            match resolve_edge(diagram, &placed, target, input, entry) {
                Ok(edge) => {
                    diagram.connect(edge);
                    report.edges_loaded += 1;
                }
                Err(reason) => {
                    warn!(node = index, input, entry = %entry, reason, "skipped edge");
                    report.edges_skipped += 1;
                }
            }
        }
    }

    diagram.emit(DiagramEvent::Redraw(RedrawScope::All));
    diagram.debug_check();
    info!(
        templates = report.templates_loaded,
        nodes = report.nodes_loaded,
        edges = report.edges_loaded,
        skipped = report.skipped(),
        overwrite = should_overwrite,
        "loaded diagram"
    );
    Ok(report)
}

fn read_templates(entries: &Map<String, Value>, report: &mut LoadReport) -> TemplateRegistry {
    entries
        .iter()
        .filter_map(|(name, value)| match read_template(name, value, report) {
            Ok(template) => {
                report.templates_loaded += 1;
                Some((name.clone(), template))
            }
            Err(e) => {
                warn!(template = %name, error = %e, "skipped template");
                report.templates_skipped += 1;
                None
            }
        })
        .collect()
}

/// Parameters are read one by one; one that does not parse is left as a hole so
/// the rest of the template and its nodes still load.
fn read_template(
    name: &str,
    value: &Value,
    report: &mut LoadReport,
) -> Result<Template, serde_json::Error> {
    let mut value = value.clone();
    if let Some(parameters) = value.get_mut("parameters").and_then(Value::as_array_mut) {
        for (index, slot) in parameters.iter_mut().enumerate() {
            if slot.is_null() {
                continue;
            }
            if let Err(e) = serde_json::from_value::<Parameter>(slot.clone()) {
                warn!(template = %name, parameter = index, error = %e, "skipped parameter");
                report.parameters_skipped += 1;
                *slot = Value::Null;
            }
        }
    }
    serde_json::from_value(value)
}

fn place_node(
    diagram: &mut Diagram,
    index: usize,
    record: &Value,
    report: &mut LoadReport,
) -> Option<NodeId> {
    let position = record
        .get("coordinates")
        .and_then(Value::as_array)
        .filter(|c| c.len() == 2)
        .and_then(|c| Some(Point::new(c[0].as_f64()?, c[1].as_f64()?)));
    let Some(position) = position else {
        warn!(node = index, "skipped node with non-numeric coordinates");
        report.nodes_skipped += 1;
        return None;
    };

    let template = record.get("template").and_then(Value::as_str);
    let Some(template) = template.filter(|name| diagram.templates.contains(name)) else {
        warn!(node = index, template = ?template, "skipped node with unregistered template");
        report.nodes_skipped += 1;
        return None;
    };

    let is_template = match record.get("is_template") {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        _ => false,
    };
    let parameters: Option<Slots<Value>> = record
        .pointer("/state/parameters")
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .map(|v| (!v.is_null()).then(|| v.clone()))
                .collect()
        });

    let id = diagram.instantiate(template, position);
    if let Some(node) = diagram.node_mut(id) {
        node.is_template = is_template;
        if let Some(parameters) = parameters {
            node.state.parameters = parameters;
        }
    }
    diagram.refresh_node(id);
    report.nodes_loaded += 1;
    Some(id)
}

fn resolve_edge(
    diagram: &Diagram,
    placed: &[Option<NodeId>],
    target: NodeId,
    target_input: usize,
    entry: &Value,
) -> Result<Edge, &'static str> {
    let pair = entry
        .as_array()
        .filter(|p| p.len() == 2)
        .ok_or("entry is not a [node, output] pair")?;
    let (source_index, source_output) = match (pair[0].as_u64(), pair[1].as_u64()) {
        (Some(node), Some(output)) => (node as usize, output as usize),
        _ => return Err("entry indices are not non-negative integers"),
    };
    let source = placed
        .get(source_index)
        .copied()
        .flatten()
        .ok_or("source node index does not resolve")?;

    let declared = |node: NodeId, side: Side, index: usize| {
        diagram
            .template_of(node)
            .and_then(|t| t.terminal(side, index))
            .is_some()
    };
    if !declared(source, Side::Output, source_output) {
        return Err("source output slot has no terminal");
    }
    if !declared(target, Side::Input, target_input) {
        return Err("target input slot has no terminal");
    }

    Ok(Edge {
        source,
        source_output,
        target,
        target_input,
    })
}
