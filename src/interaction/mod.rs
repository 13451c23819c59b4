//! Pointer-driven editing on top of a [`Diagram`].
//!
//! The host feeds normalized pointer events (view-space coordinates plus the
//! identity of whatever is under the pointer) into an [`Editor`]. The editor owns
//! the diagram for the lifetime of the widget and is the only path that mutates
//! it while a drag is open: a drag begins on pointer-down, is shifted on every
//! pointer-move and completed exactly once on pointer-up.

mod drag;
mod menu;

pub use drag::{DragOutcome, DragSession, DragTarget, EdgeDraft};
pub use menu::{ContextMenu, MenuAction};

use crate::error::GraphError;
use crate::graph::{Diagram, NodeId, Side, SlotOp, TerminalRef};
use crate::transform::{EdgePath, Point};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// What is under the pointer when a button goes down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// Empty canvas.
    Canvas,
    /// A node's title bar.
    NodeHandle(NodeId),
    /// A node's body, where parameter widgets live.
    NodeBody(NodeId),
    Terminal(TerminalRef),
}

/// Interaction state machine around a diagram.
#[derive(Debug, Clone)]
pub struct Editor {
    diagram: Diagram,
    drag: Option<DragSession>,
    hovered: Option<TerminalRef>,
    selected: Option<NodeId>,
    menu: Option<ContextMenu>,
}

impl Editor {
    pub fn new(diagram: Diagram) -> Self {
        Self {
            diagram,
            drag: None,
            hovered: None,
            selected: None,
            menu: None,
        }
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    /// Direct access to the diagram. Unavailable while a drag is open.
    pub fn diagram_mut(&mut self) -> Option<&mut Diagram> {
        if self.drag.is_some() {
            return None;
        }
        Some(&mut self.diagram)
    }

    pub fn into_diagram(self) -> Diagram {
        self.diagram
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn drag(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn hovered(&self) -> Option<TerminalRef> {
        self.hovered
    }

    pub fn menu(&self) -> Option<&ContextMenu> {
        self.menu.as_ref()
    }

    pub fn close_menu(&mut self) {
        self.menu = None;
    }

    /// Curve of the edge draft in flight, if any.
    pub fn active_draft_path(&self) -> Option<EdgePath> {
        match self.drag.as_ref()?.target() {
            DragTarget::EdgeDraft(draft) => draft.path(&self.diagram),
            _ => None,
        }
    }

    /// Handles a button press. Returns the context menu it opened, if any.
    pub fn pointer_down(
        &mut self,
        at: Point,
        button: PointerButton,
        target: PointerTarget,
    ) -> Option<&ContextMenu> {
        // A press without a matching release still completes the previous drag.
        if let Some(stale) = self.drag.take() {
            stale.finish(&mut self.diagram, None);
        }
        self.menu = None;

        match button {
            PointerButton::Primary => self.primary_down(at, target),
            PointerButton::Middle => self.drag = Some(DragSession::begin(DragTarget::Pan, at)),
            PointerButton::Secondary => self.secondary_down(at, target),
        }
        self.menu.as_ref()
    }

    fn primary_down(&mut self, at: Point, target: PointerTarget) {
        let drag = match target {
            PointerTarget::Canvas => {
                self.selected = None;
                Some(DragTarget::Pan)
            }
            PointerTarget::NodeHandle(node) if self.diagram.contains_node(node) => {
                self.selected = Some(node);
                Some(DragTarget::MoveNode(node))
            }
            PointerTarget::NodeHandle(_) => None,
            PointerTarget::NodeBody(node) => {
                self.selected = Some(node);
                None
            }
            PointerTarget::Terminal(terminal) => {
                Some(DragTarget::EdgeDraft(EdgeDraft::new(terminal, at)))
            }
        };
        self.drag = drag.map(|target| DragSession::begin(target, at));
    }

    fn secondary_down(&mut self, at: Point, target: PointerTarget) {
        match target {
            PointerTarget::Canvas => {
                self.selected = None;
                let mut items = vec![MenuAction::NewNode];
                if self.diagram.config().allow_user_templates {
                    items.push(MenuAction::NewTemplateNode);
                }
                self.menu = Some(ContextMenu::new(at, None, items));
            }
            PointerTarget::NodeHandle(node) | PointerTarget::NodeBody(node) => {
                let Some(flow_node) = self.diagram.node(node) else {
                    return;
                };
                self.selected = Some(node);
                let items = if flow_node.is_template() {
                    vec![
                        MenuAction::AddTerminal,
                        MenuAction::RemoveTerminal,
                        MenuAction::AddParameter,
                        MenuAction::RemoveParameter,
                        MenuAction::Delete,
                    ]
                } else {
                    vec![MenuAction::Delete]
                };
                self.menu = Some(ContextMenu::new(at, Some(node), items));
            }
            PointerTarget::Terminal(terminal) => {
                let result = match terminal.side {
                    Side::Input => self
                        .diagram
                        .unlink_input(terminal.node, terminal.index)
                        .map(|removed| usize::from(removed.is_some())),
                    Side::Output => self
                        .diagram
                        .unlink_output(terminal.node, terminal.index)
                        .map(|removed| removed.len()),
                };
                if let Ok(count) = result {
                    debug!(node = %terminal.node, side = %terminal.side, index = terminal.index, count, "unlinked terminal");
                }
            }
        }
    }

    /// Handles pointer motion. `hovered` is the terminal under the pointer, if any.
    pub fn pointer_move(&mut self, at: Point, hovered: Option<TerminalRef>) {
        self.hovered = hovered;
        if let Some(session) = self.drag.as_mut() {
            session.update(&mut self.diagram, at);
        }
    }

    /// Handles the button release, completing the open drag exactly once.
    pub fn pointer_up(&mut self, at: Point) -> Option<DragOutcome> {
        let mut session = self.drag.take()?;
        session.update(&mut self.diagram, at);
        let outcome = session.finish(&mut self.diagram, self.hovered);
        debug!(?outcome, "drag completed");
        Some(outcome)
    }

    /// Handles a double click. On the canvas it opens the template picker; on the
    /// body of a template node it toggles the slot under the pointer. Returns
    /// whether a template was edited.
    pub fn double_click(&mut self, at: Point, target: PointerTarget) -> Result<bool, GraphError> {
        match target {
            PointerTarget::Canvas => {
                self.selected = None;
                self.menu = self.template_picker(at);
                Ok(false)
            }
            PointerTarget::NodeBody(node) => {
                let is_template = self
                    .diagram
                    .node(node)
                    .ok_or(GraphError::NodeNotFound(node))?
                    .is_template();
                if !is_template {
                    return Ok(false);
                }
                let (local, width) = self.local_point(node, at)?;
                if local.x > width / 3.0 && local.x < 2.0 * width / 3.0 {
                    self.edit_parameter_at(node, at, SlotOp::Toggle)
                } else {
                    self.edit_terminal_at(node, at, SlotOp::Toggle)
                }
            }
            _ => Ok(false),
        }
    }

    /// Zooms around the pointer.
    pub fn wheel(&mut self, delta_y: f64, at: Point) {
        self.diagram.zoom(delta_y, at);
    }

    /// Runs an entry of the open context menu against its anchor and node.
    /// Returns the node it created, if any.
    pub fn select(&mut self, action: &MenuAction) -> Result<Option<NodeId>, GraphError> {
        let Some(menu) = self.menu.take() else {
            return Ok(None);
        };
        if !menu.contains(action) {
            return Ok(None);
        }
        debug!(action = %action, "menu selection");

        if action.needs_node() {
            let Some(node) = menu.node else {
                return Ok(None);
            };
            return self.run_node_action(node, action, menu.anchor).map(|_| None);
        }

        let location = self.diagram.view().view_to_node(menu.anchor);
        match action {
            MenuAction::NewNode => {
                self.menu = self.template_picker(menu.anchor);
                Ok(None)
            }
            MenuAction::NewTemplateNode => self.diagram.new_template_node(location).map(Some),
            MenuAction::SetTemplate(name) => self.diagram.create_node(name, location).map(Some),
            _ => Ok(None),
        }
    }

    fn run_node_action(&mut self, node: NodeId, action: &MenuAction, at: Point) -> Result<bool, GraphError> {
        match action {
            MenuAction::Delete => {
                self.diagram.delete_node(node)?;
                if self.selected == Some(node) {
                    self.selected = None;
                }
                Ok(true)
            }
            MenuAction::AddTerminal => self.edit_terminal_at(node, at, SlotOp::Add),
            MenuAction::RemoveTerminal => self.edit_terminal_at(node, at, SlotOp::Remove),
            MenuAction::AddParameter => self.edit_parameter_at(node, at, SlotOp::Add),
            MenuAction::RemoveParameter => self.edit_parameter_at(node, at, SlotOp::Remove),
            _ => Ok(false),
        }
    }

    /// Picker with one `Set Template` entry per registered template. Nothing to
    /// show without templates.
    fn template_picker(&self, at: Point) -> Option<ContextMenu> {
        let items: Vec<MenuAction> = self
            .diagram
            .templates()
            .names()
            .into_iter()
            .map(MenuAction::SetTemplate)
            .collect();
        if items.is_empty() {
            return None;
        }
        Some(ContextMenu::new(at, None, items))
    }

    /// View point relative to a node's top-left corner in node space, plus the
    /// node's width.
    fn local_point(&self, node: NodeId, at: Point) -> Result<(Point, f64), GraphError> {
        let flow_node = self.diagram.node(node).ok_or(GraphError::NodeNotFound(node))?;
        let width = self
            .diagram
            .template_of(node)
            .ok_or_else(|| GraphError::UnknownTemplate(flow_node.template_name().to_string()))?
            .width();
        let position = flow_node.position();
        let p = self.diagram.view().view_to_node(at);
        Ok((Point::new(p.x - position.x, p.y - position.y), width))
    }

    fn edit_terminal_at(&mut self, node: NodeId, at: Point, op: SlotOp) -> Result<bool, GraphError> {
        let (local, width) = self.local_point(node, at)?;
        let side = if local.x < width / 2.0 {
            Side::Input
        } else {
            Side::Output
        };
        let index = self.diagram.layout().index_from_offset(local.y);
        self.diagram.add_remove_terminal(node, side, index, op)
    }

    fn edit_parameter_at(&mut self, node: NodeId, at: Point, op: SlotOp) -> Result<bool, GraphError> {
        let (local, _) = self.local_point(node, at)?;
        let index = self.diagram.layout().index_from_offset(local.y);
        self.diagram.add_remove_parameter(node, index, op)
    }
}
