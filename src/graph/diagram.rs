use super::event::{DiagramEvent, EdgeChange, RedrawScope};
use super::node::{FlowNode, NodeState};
use super::{Edge, EdgeId, NodeId, Side, SlotOp, TerminalRef};
use crate::compat::CompatibilityTable;
use crate::config::EditorConfig;
use crate::error::GraphError;
use crate::template::{Parameter, Slots, Template, TemplateRegistry, Terminal};
use crate::transform::{EdgePath, Point, TerminalLayout, ViewTransform};
use ahash::AHashMap;
use itertools::Itertools;
use serde_json::Value;
use tracing::{debug, warn};

/// A node-flow diagram: the sole owner of its nodes, edges, templates,
/// compatibility table and view state.
///
/// Every mutation goes through a method on this type, which keeps the input and
/// output sides of each connection in agreement and queues the matching
/// [`DiagramEvent`]s for the renderer.
#[derive(Debug, Clone)]
pub struct Diagram {
    pub(crate) config: EditorConfig,
    pub(crate) templates: TemplateRegistry,
    pub(crate) compatibility: CompatibilityTable,
    pub(crate) nodes: AHashMap<NodeId, FlowNode>,
    pub(crate) order: Vec<NodeId>,
    pub(crate) edges: AHashMap<EdgeId, Edge>,
    view: ViewTransform,
    next_node: u32,
    next_edge: u32,
    events: Vec<DiagramEvent>,
}

/// Builder for [`Diagram`].
#[derive(Debug, Clone, Default)]
pub struct DiagramBuilder {
    config: EditorConfig,
    templates: TemplateRegistry,
    compatibility: CompatibilityTable,
}

impl DiagramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: EditorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_template(mut self, name: &str, template: Template) -> Self {
        self.templates.insert(name, template);
        self
    }

    pub fn with_compatibility(mut self, table: CompatibilityTable) -> Self {
        self.compatibility = table;
        self
    }

    pub fn build(self) -> Diagram {
        Diagram {
            view: ViewTransform::new(self.config.scale_speed),
            config: self.config,
            templates: self.templates,
            compatibility: self.compatibility,
            nodes: AHashMap::new(),
            order: Vec::new(),
            edges: AHashMap::new(),
            next_node: 0,
            next_edge: 0,
            events: Vec::new(),
        }
    }
}

impl Default for Diagram {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagram {
    pub fn builder() -> DiagramBuilder {
        DiagramBuilder::new()
    }

    pub fn new() -> Self {
        DiagramBuilder::new().build()
    }

    // --- Read access ---

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    /// Mutable view state, e.g. to report a new pan surface position.
    pub fn view_mut(&mut self) -> &mut ViewTransform {
        &mut self.view
    }

    pub fn layout(&self) -> &TerminalLayout {
        &self.config.terminal_layout
    }

    pub fn templates(&self) -> &TemplateRegistry {
        &self.templates
    }

    pub fn template(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    /// The template a node instantiates; `None` for a stranded node.
    pub fn template_of(&self, node: NodeId) -> Option<&Template> {
        self.nodes
            .get(&node)
            .and_then(|n| self.templates.get(&n.template_name))
    }

    /// A copy of the compatibility table. Changes to it only take effect through
    /// [`set_compatibility_table`](Self::set_compatibility_table).
    pub fn compatibility_table(&self) -> CompatibilityTable {
        self.compatibility.clone()
    }

    pub fn set_compatibility_table(&mut self, table: CompatibilityTable) {
        self.compatibility = table;
    }

    pub fn are_compatible(&self, source: &str, destination: &str) -> bool {
        self.compatibility.are_compatible(source, destination)
    }

    pub fn node(&self, id: NodeId) -> Option<&FlowNode> {
        self.nodes.get(&id)
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &FlowNode> + '_ {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    pub fn node_ids(&self) -> &[NodeId] {
        &self.order
    }

    pub fn node_count(&self) -> usize {
        self.order.len()
    }

    /// Current position of a node in the node list.
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.order.iter().position(|n| *n == id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    /// Edges in creation order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> + '_ {
        self.edges
            .iter()
            .sorted_by_key(|(id, _)| **id)
            .map(|(id, edge)| (*id, edge))
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Source `(node, output slot)` feeding an input slot.
    pub fn input_source(&self, node: NodeId, index: usize) -> Option<(NodeId, usize)> {
        let edge_id = self.nodes.get(&node)?.input_edge(index)?;
        self.edges
            .get(&edge_id)
            .map(|e| (e.source, e.source_output))
    }

    /// Targets `(node, input slot)` fed by an output slot, in connection order.
    pub fn output_targets(&self, node: NodeId, index: usize) -> Vec<(NodeId, usize)> {
        let Some(node) = self.nodes.get(&node) else {
            return Vec::new();
        };
        node.output_edges(index)
            .iter()
            .filter_map(|id| self.edges.get(id))
            .map(|e| (e.target, e.target_input))
            .collect()
    }

    /// [`input_source`](Self::input_source) addressed by terminal label.
    /// `None` if the template has no input with that label.
    pub fn input_source_by_label(&self, node: NodeId, label: &str) -> Option<(NodeId, usize)> {
        let index = self.template_of(node)?.input_index_by_label(label)?;
        self.input_source(node, index)
    }

    /// [`output_targets`](Self::output_targets) addressed by terminal label.
    /// `None` if the template has no output with that label.
    pub fn output_targets_by_label(
        &self,
        node: NodeId,
        label: &str,
    ) -> Option<Vec<(NodeId, usize)>> {
        let index = self.template_of(node)?.output_index_by_label(label)?;
        Some(self.output_targets(node, index))
    }

    // --- Events ---

    /// Takes every queued render command, oldest first.
    ///
    /// The queue is unbounded: a host must drain it after each batch of input
    /// (typically once per frame), or it grows with every mutation.
    pub fn drain_events(&mut self) -> Vec<DiagramEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_events(&self) -> &[DiagramEvent] {
        &self.events
    }

    pub(crate) fn emit(&mut self, event: DiagramEvent) {
        self.events.push(event);
    }

    fn redraw_nodes(&mut self, nodes: Vec<NodeId>) {
        if !nodes.is_empty() {
            self.emit(DiagramEvent::Redraw(RedrawScope::Nodes(nodes)));
        }
    }

    // --- Nodes ---

    /// Places a new node of a registered template at a node-space position.
    pub fn create_node(&mut self, template_name: &str, position: Point) -> Result<NodeId, GraphError> {
        if !self.templates.contains(template_name) {
            return Err(GraphError::UnknownTemplate(template_name.to_string()));
        }
        Ok(self.instantiate(template_name, position))
    }

    /// Registers a fresh empty template under the first free `Template*` name and
    /// spawns a template node editing it.
    pub fn new_template_node(&mut self, position: Point) -> Result<NodeId, GraphError> {
        if !self.config.allow_user_templates {
            return Err(GraphError::UserTemplatesDisabled);
        }
        let name = self.templates.unused_name("Template");
        let (width, height) = self.config.default_dimensions;
        self.templates.insert(name.clone(), Template::new(width, height));

        let id = self.instantiate(&name, position);
        if let Some(node) = self.nodes.get_mut(&id) {
            node.is_template = true;
        }
        debug!(template = %name, node = %id, "created template node");
        self.emit(DiagramEvent::TemplateChanged(name));
        Ok(id)
    }

    /// Turns a node into the live editor of its template. A stranded node gets an
    /// empty template registered under its name.
    pub fn set_as_template(&mut self, id: NodeId) -> Result<(), GraphError> {
        let name = self
            .nodes
            .get(&id)
            .map(|n| n.template_name.clone())
            .ok_or(GraphError::NodeNotFound(id))?;
        if !self.templates.contains(&name) {
            let (width, height) = self.config.default_dimensions;
            self.templates.insert(name.clone(), Template::new(width, height));
            self.emit(DiagramEvent::TemplateChanged(name));
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.is_template = true;
        }
        self.redraw_nodes(vec![id]);
        Ok(())
    }

    /// Severs every edge of the node on both ends, then removes it.
    pub fn delete_node(&mut self, id: NodeId) -> Result<FlowNode, GraphError> {
        let attached: Vec<EdgeId> = self
            .nodes
            .get(&id)
            .ok_or(GraphError::NodeNotFound(id))?
            .state
            .edge_ids()
            .collect();

        for edge_id in attached {
            self.detach_edge(edge_id);
        }
        let node = self.nodes.remove(&id).ok_or(GraphError::NodeNotFound(id))?;
        self.order.retain(|n| *n != id);

        debug!(node = %id, template = %node.template_name, "deleted node");
        self.emit(DiagramEvent::Redraw(RedrawScope::All));
        self.debug_check();
        Ok(node)
    }

    /// Removes every node and edge. Templates are kept.
    pub fn clear(&mut self) {
        let ids = self.order.clone();
        for id in ids {
            let _ = self.delete_node(id);
        }
        self.emit(DiagramEvent::Redraw(RedrawScope::All));
    }

    /// Moves a node to a node-space position.
    pub fn move_node(&mut self, id: NodeId, position: Point) -> Result<(), GraphError> {
        let node = self.nodes.get_mut(&id).ok_or(GraphError::NodeNotFound(id))?;
        node.position = position;
        self.emit(DiagramEvent::NodeMoved(id));
        self.redraw_nodes(vec![id]);
        Ok(())
    }

    /// Shifts a node by a node-space delta.
    pub fn translate_node(&mut self, id: NodeId, dx: f64, dy: f64) -> Result<(), GraphError> {
        let position = self
            .nodes
            .get(&id)
            .ok_or(GraphError::NodeNotFound(id))?
            .position
            .offset(dx, dy);
        self.move_node(id, position)
    }

    /// Switches a node to another template. Returns `Ok(false)` without touching
    /// anything if the template is unknown or already in use by the node.
    ///
    /// All edges of the node are dropped and its state is rebuilt from the new
    /// template's defaults.
    pub fn change_template(&mut self, id: NodeId, template_name: &str) -> Result<bool, GraphError> {
        let node = self.nodes.get(&id).ok_or(GraphError::NodeNotFound(id))?;
        if node.template_name == template_name || !self.templates.contains(template_name) {
            return Ok(false);
        }

        let attached: Vec<EdgeId> = node.state.edge_ids().collect();
        for edge_id in attached {
            self.detach_edge(edge_id);
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.template_name = template_name.to_string();
            node.state = NodeState::default();
        }
        self.refresh_node(id);

        debug!(node = %id, template = %template_name, "changed node template");
        self.redraw_nodes(vec![id]);
        self.debug_check();
        Ok(true)
    }

    /// Writes a parameter value. Only the slot's existence is checked.
    pub fn set_parameter(
        &mut self,
        id: NodeId,
        index: usize,
        value: Value,
    ) -> Result<Option<Value>, GraphError> {
        let template = self.template_for(id)?;
        if !template.parameters.is_occupied(index) {
            return Err(GraphError::ParameterNotFound { node: id, index });
        }
        let previous = self
            .nodes
            .get_mut(&id)
            .ok_or(GraphError::NodeNotFound(id))?
            .state
            .parameters
            .set(index, value);
        self.redraw_nodes(vec![id]);
        Ok(previous)
    }

    // --- Edges ---

    /// Connects output `out_index` of `out_node` to input `in_index` of `in_node`.
    ///
    /// The terminal types must be compatible. An existing connection into the
    /// input slot is removed first, since an input takes a single source.
    pub fn link_nodes(
        &mut self,
        out_node: NodeId,
        out_index: usize,
        in_node: NodeId,
        in_index: usize,
    ) -> Result<EdgeId, GraphError> {
        let source_type = self.terminal_type(TerminalRef::output(out_node, out_index))?;
        let destination_type = self.terminal_type(TerminalRef::input(in_node, in_index))?;
        if !self.compatibility.are_compatible(source_type, destination_type) {
            debug!(
                source = %source_type,
                destination = %destination_type,
                "rejected link between incompatible terminals"
            );
            return Err(GraphError::IncompatibleTypes {
                source_type: source_type.to_string(),
                destination_type: destination_type.to_string(),
            });
        }

        Ok(self.connect(Edge {
            source: out_node,
            source_output: out_index,
            target: in_node,
            target_input: in_index,
        }))
    }

    /// Removes the connection feeding an input slot, if any.
    pub fn unlink_input(&mut self, id: NodeId, index: usize) -> Result<Option<Edge>, GraphError> {
        let edge_id = self
            .nodes
            .get(&id)
            .ok_or(GraphError::NodeNotFound(id))?
            .input_edge(index);
        let removed = edge_id.and_then(|e| self.detach_edge(e));
        self.debug_check();
        Ok(removed)
    }

    /// Removes every connection leaving an output slot.
    pub fn unlink_output(&mut self, id: NodeId, index: usize) -> Result<Vec<Edge>, GraphError> {
        let edge_ids = self
            .nodes
            .get(&id)
            .ok_or(GraphError::NodeNotFound(id))?
            .output_edges(index)
            .to_vec();
        let removed = edge_ids
            .into_iter()
            .filter_map(|e| self.detach_edge(e))
            .collect();
        self.debug_check();
        Ok(removed)
    }

    /// Writes both sides of an edge whose endpoints are known to exist.
    pub(crate) fn connect(&mut self, edge: Edge) -> EdgeId {
        let previous = self
            .nodes
            .get(&edge.target)
            .and_then(|n| n.input_edge(edge.target_input));
        if let Some(previous) = previous {
            self.detach_edge(previous);
        }

        let id = EdgeId(self.next_edge);
        self.next_edge += 1;
        self.edges.insert(id, edge);
        if let Some(target) = self.nodes.get_mut(&edge.target) {
            *target.state.input_mut(edge.target_input) = Some(id);
        }
        if let Some(source) = self.nodes.get_mut(&edge.source) {
            source.state.output_mut(edge.source_output).push(id);
        }

        debug!(edge = %edge, id = %id, "linked terminals");
        self.emit(DiagramEvent::EdgeChanged {
            edge,
            change: EdgeChange::Added,
        });
        self.debug_check();
        id
    }

    /// Removes an edge from the arena and from both of its endpoints.
    fn detach_edge(&mut self, id: EdgeId) -> Option<Edge> {
        let edge = self.edges.remove(&id)?;
        if let Some(slot) = self
            .nodes
            .get_mut(&edge.target)
            .and_then(|n| n.state.inputs.get_mut(edge.target_input))
        {
            if *slot == Some(id) {
                *slot = None;
            }
        }
        if let Some(fan_out) = self
            .nodes
            .get_mut(&edge.source)
            .and_then(|n| n.state.outputs.get_mut(edge.source_output))
        {
            fan_out.retain(|e| *e != id);
        }

        debug!(edge = %edge, id = %id, "unlinked terminals");
        self.emit(DiagramEvent::EdgeChanged {
            edge,
            change: EdgeChange::Removed,
        });
        Some(edge)
    }

    // --- Templates ---

    /// Registers a new template. Names are unique.
    pub fn add_template(&mut self, name: &str, template: Template) -> Result<(), GraphError> {
        if self.templates.contains(name) {
            return Err(GraphError::TemplateNameTaken(name.to_string()));
        }
        self.templates.insert(name, template);
        self.emit(DiagramEvent::TemplateChanged(name.to_string()));
        Ok(())
    }

    /// Replaces the definition of an existing template and refreshes its instances.
    pub fn update_template(&mut self, name: &str, template: Template) -> Result<(), GraphError> {
        if !self.templates.contains(name) {
            return Err(GraphError::UnknownTemplate(name.to_string()));
        }
        self.templates.insert(name, template);
        self.on_template_modified(name);
        Ok(())
    }

    pub fn set_template_dimensions(
        &mut self,
        name: &str,
        width: f64,
        height: f64,
    ) -> Result<(), GraphError> {
        let template = self
            .templates
            .get_mut(name)
            .ok_or_else(|| GraphError::UnknownTemplate(name.to_string()))?;
        template.dimensions = (width, height);
        self.on_template_modified(name);
        Ok(())
    }

    /// Renames a template in place; every node referencing it follows along and
    /// keeps its state. Stranded nodes that carry the new name pick the template
    /// up and get their state rebuilt. Renaming to the current name refreshes the instances.
    ///
    /// A name that is already taken is rejected with a [`DiagramEvent::Notice`].
    pub fn rename_template(&mut self, old: &str, new: &str) -> Result<(), GraphError> {
        if old == new {
            if !self.templates.contains(old) {
                return Err(GraphError::UnknownTemplate(old.to_string()));
            }
            self.on_template_modified(old);
            return Ok(());
        }
        if let Err(e) = self.templates.rename(old, new) {
            if matches!(e, GraphError::TemplateNameTaken(_)) {
                self.emit(DiagramEvent::Notice("That name already exists.".to_string()));
            }
            return Err(e);
        }

        let mut retargeted = Vec::new();
        for id in &self.order {
            if let Some(node) = self.nodes.get_mut(id) {
                if node.template_name == old {
                    node.template_name = new.to_string();
                    retargeted.push(*id);
                }
            }
        }

        // Stranded nodes already named `new` resolve again and need their state rebuilt.
        let instances = self.instances_of(new);
        for id in &instances {
            self.refresh_node(*id);
        }

        debug!(
            old = %old,
            new = %new,
            retargeted = retargeted.len(),
            nodes = instances.len(),
            "renamed template"
        );
        self.emit(DiagramEvent::TemplateChanged(new.to_string()));
        self.redraw_nodes(instances);
        self.debug_check();
        Ok(())
    }

    /// Unregisters a template. Nodes still using it are stranded: their edges are
    /// severed and their state cleared, but they stay in the diagram and can be
    /// moved to another template with [`change_template`](Self::change_template).
    pub fn remove_template(&mut self, name: &str) -> Result<Template, GraphError> {
        let template = self
            .templates
            .remove(name)
            .ok_or_else(|| GraphError::UnknownTemplate(name.to_string()))?;
        let stranded = self.instances_of(name);
        if !stranded.is_empty() {
            warn!(template = %name, nodes = stranded.len(), "removed template still in use");
        }
        for id in &stranded {
            self.refresh_node(*id);
        }
        self.emit(DiagramEvent::TemplateChanged(name.to_string()));
        self.redraw_nodes(stranded);
        self.debug_check();
        Ok(template)
    }

    /// Adds, removes or toggles a terminal slot of the template edited by a
    /// template node. Returns whether the template changed.
    pub fn add_remove_terminal(
        &mut self,
        id: NodeId,
        side: Side,
        index: usize,
        op: SlotOp,
    ) -> Result<bool, GraphError> {
        let name = self.editable_template(id)?;
        let template = self
            .templates
            .get_mut(&name)
            .ok_or_else(|| GraphError::UnknownTemplate(name.clone()))?;
        let changed = apply_slot_op(template.terminals_mut(side), index, op, || match side {
            Side::Input => Terminal::new("Input", "any"),
            Side::Output => Terminal::new("Output", "any"),
        });
        if changed {
            self.on_template_modified(&name);
        }
        Ok(changed)
    }

    /// Adds, removes or toggles a parameter slot of the template edited by a
    /// template node. Returns whether the template changed.
    pub fn add_remove_parameter(
        &mut self,
        id: NodeId,
        index: usize,
        op: SlotOp,
    ) -> Result<bool, GraphError> {
        let name = self.editable_template(id)?;
        let template = self
            .templates
            .get_mut(&name)
            .ok_or_else(|| GraphError::UnknownTemplate(name.clone()))?;
        let changed = apply_slot_op(&mut template.parameters, index, op, Parameter::placeholder);
        if changed {
            self.on_template_modified(&name);
        }
        Ok(changed)
    }

    fn editable_template(&self, id: NodeId) -> Result<String, GraphError> {
        let node = self.nodes.get(&id).ok_or(GraphError::NodeNotFound(id))?;
        if !node.is_template {
            return Err(GraphError::NotATemplateNode(id));
        }
        Ok(node.template_name.clone())
    }

    fn on_template_modified(&mut self, name: &str) {
        let instances = self.instances_of(name);
        for id in &instances {
            self.refresh_node(*id);
        }
        self.emit(DiagramEvent::TemplateChanged(name.to_string()));
        self.redraw_nodes(instances);
        self.debug_check();
    }

    pub(crate) fn refresh_all(&mut self) {
        let ids = self.order.clone();
        for id in ids {
            self.refresh_node(id);
        }
    }

    fn instances_of(&self, name: &str) -> Vec<NodeId> {
        self.nodes()
            .filter(|n| n.template_name == name)
            .map(FlowNode::id)
            .collect()
    }

    /// Re-aligns a node's state with its template: edges on slots that no longer
    /// declare a terminal are severed, vectors are resized to the slot counts and
    /// missing parameter values are filled with defaults. A node whose template is
    /// gone loses all edges and state.
    pub(crate) fn refresh_node(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        let template = self.templates.get(&node.template_name);

        let stale: Vec<EdgeId> = match template {
            None => node.state.edge_ids().collect(),
            Some(t) => {
                let inputs = node
                    .state
                    .inputs
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| !t.inputs.is_occupied(*i))
                    .filter_map(|(_, e)| *e);
                let outputs = node
                    .state
                    .outputs
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| !t.outputs.is_occupied(*i))
                    .flat_map(|(_, fan_out)| fan_out.iter().copied());
                inputs.chain(outputs).collect()
            }
        };
        for edge_id in stale {
            self.detach_edge(edge_id);
        }

        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        let Some(template) = self.templates.get(&node.template_name) else {
            node.state = NodeState::default();
            return;
        };

        node.state.inputs.resize(template.inputs.len(), None);
        node.state.outputs.resize_with(template.outputs.len(), Vec::new);

        let mut parameters = Slots::new();
        for (index, parameter) in template.parameters.iter() {
            let value = node
                .state
                .parameters
                .get(index)
                .cloned()
                .or_else(|| parameter.default_value());
            if let Some(value) = value {
                parameters.set(index, value);
            }
        }
        node.state.parameters = parameters;
    }

    /// Creates a node without checking the template name.
    pub(crate) fn instantiate(&mut self, template_name: &str, position: Point) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        self.nodes.insert(id, FlowNode::new(id, template_name, position));
        self.order.push(id);
        self.refresh_node(id);

        debug!(node = %id, template = %template_name, "created node");
        self.redraw_nodes(vec![id]);
        id
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut FlowNode> {
        self.nodes.get_mut(&id)
    }

    fn template_for(&self, id: NodeId) -> Result<&Template, GraphError> {
        let node = self.nodes.get(&id).ok_or(GraphError::NodeNotFound(id))?;
        self.templates
            .get(&node.template_name)
            .ok_or_else(|| GraphError::UnknownTemplate(node.template_name.clone()))
    }

    /// Declared type of an existing terminal.
    pub fn terminal_type(&self, terminal: TerminalRef) -> Result<&str, GraphError> {
        self.template_for(terminal.node)?
            .terminal(terminal.side, terminal.index)
            .map(|t| t.data_type.as_str())
            .ok_or(GraphError::TerminalNotFound {
                node: terminal.node,
                side: terminal.side,
                index: terminal.index,
            })
    }

    // --- Geometry ---

    /// Node-space anchor of a terminal: inputs on the left edge, outputs on the
    /// right edge, rows spaced by the terminal layout.
    pub fn terminal_position(&self, terminal: TerminalRef) -> Option<Point> {
        let node = self.nodes.get(&terminal.node)?;
        let template = self.templates.get(&node.template_name)?;
        template.terminal(terminal.side, terminal.index)?;

        let x = match terminal.side {
            Side::Input => node.position.x,
            Side::Output => node.position.x + template.width(),
        };
        let y = node.position.y + self.config.terminal_layout.offset(terminal.index);
        Some(Point::new(x, y))
    }

    pub fn terminal_view_position(&self, terminal: TerminalRef) -> Option<Point> {
        self.terminal_position(terminal)
            .map(|p| self.view.node_to_view(p))
    }

    /// Horizontal bezier control offset in view pixels at the current zoom.
    pub fn edge_control_offset(&self) -> f64 {
        self.config.edge_control_distance * self.view.zoom_factor()
    }

    /// View-space curve of an edge.
    pub fn edge_path(&self, id: EdgeId) -> Option<EdgePath> {
        let edge = self.edges.get(&id)?;
        let from = self.terminal_view_position(edge.source_terminal())?;
        let to = self.terminal_view_position(edge.target_terminal())?;
        Some(EdgePath::between(from, to, self.edge_control_offset()))
    }

    /// Zooms around a view-space cursor position.
    pub fn zoom(&mut self, delta_y: f64, cursor: Point) {
        self.view.zoom_at(delta_y, cursor);
        self.emit(DiagramEvent::Redraw(RedrawScope::All));
    }

    /// Moves the pan surface during a pan drag. Hosts place the surface at
    /// `view().pan_box()` on the queued redraw.
    pub(crate) fn shift_pan(&mut self, dx: f64, dy: f64) {
        self.view.shift_pan(dx, dy);
        self.emit(DiagramEvent::Redraw(RedrawScope::All));
    }

    pub(crate) fn commit_pan(&mut self) {
        self.view.commit_pan();
        self.emit(DiagramEvent::Redraw(RedrawScope::All));
    }
}

fn apply_slot_op<T>(slots: &mut Slots<T>, index: usize, op: SlotOp, fill: impl FnOnce() -> T) -> bool {
    match (slots.is_occupied(index), op) {
        (false, SlotOp::Add | SlotOp::Toggle) => {
            slots.set(index, fill());
            true
        }
        (true, SlotOp::Remove | SlotOp::Toggle) => {
            slots.clear(index);
            true
        }
        _ => false,
    }
}
