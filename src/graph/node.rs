use super::{EdgeId, NodeId, Side};
use crate::template::Slots;
use crate::transform::Point;
use serde_json::Value;

/// Per-node values, index-aligned with the slots of the node's template.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeState {
    pub(crate) parameters: Slots<Value>,
    pub(crate) inputs: Vec<Option<EdgeId>>,
    pub(crate) outputs: Vec<Vec<EdgeId>>,
}

impl NodeState {
    pub fn parameters(&self) -> &Slots<Value> {
        &self.parameters
    }

    /// Incoming edge of each input slot (fan-in is capped at one).
    pub fn inputs(&self) -> &[Option<EdgeId>] {
        &self.inputs
    }

    /// Outgoing edges of each output slot, in connection order.
    pub fn outputs(&self) -> &[Vec<EdgeId>] {
        &self.outputs
    }

    /// Every edge id attached to this node, inputs first.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.inputs
            .iter()
            .flatten()
            .copied()
            .chain(self.outputs.iter().flatten().copied())
    }

    pub(crate) fn input_mut(&mut self, index: usize) -> &mut Option<EdgeId> {
        if index >= self.inputs.len() {
            self.inputs.resize(index + 1, None);
        }
        &mut self.inputs[index]
    }

    pub(crate) fn output_mut(&mut self, index: usize) -> &mut Vec<EdgeId> {
        if index >= self.outputs.len() {
            self.outputs.resize_with(index + 1, Vec::new);
        }
        &mut self.outputs[index]
    }
}

/// An instance of a template placed on the canvas.
///
/// The template is referenced by name only; the diagram owns the definition.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowNode {
    pub(crate) id: NodeId,
    pub(crate) template_name: String,
    pub(crate) position: Point,
    pub(crate) is_template: bool,
    pub(crate) state: NodeState,
}

impl FlowNode {
    pub(crate) fn new(id: NodeId, template_name: &str, position: Point) -> Self {
        Self {
            id,
            template_name: template_name.to_string(),
            position,
            is_template: false,
            state: NodeState::default(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn template_name(&self) -> &str {
        &self.template_name
    }

    /// Top-left corner in node space.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Whether this node is the live editor of its own template.
    pub fn is_template(&self) -> bool {
        self.is_template
    }

    pub fn state(&self) -> &NodeState {
        &self.state
    }

    pub fn parameter(&self, index: usize) -> Option<&Value> {
        self.state.parameters.get(index)
    }

    pub fn input_edge(&self, index: usize) -> Option<EdgeId> {
        self.state.inputs.get(index).copied().flatten()
    }

    pub fn output_edges(&self, index: usize) -> &[EdgeId] {
        self.state
            .outputs
            .get(index)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of edges attached to the given terminal.
    pub fn degree(&self, side: Side, index: usize) -> usize {
        match side {
            Side::Input => usize::from(self.input_edge(index).is_some()),
            Side::Output => self.output_edges(index).len(),
        }
    }
}
