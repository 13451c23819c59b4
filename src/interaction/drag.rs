use crate::graph::{Diagram, DiagramEvent, EdgeId, NodeId, Side, TerminalRef};
use crate::transform::{EdgePath, Point};
use tracing::debug;

/// A connection being drawn from one terminal towards the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeDraft {
    /// Terminal the drag started on. May be either polarity.
    pub anchor: TerminalRef,
    /// Current pointer position in view space.
    pub pointer: Point,
}

impl EdgeDraft {
    pub fn new(anchor: TerminalRef, pointer: Point) -> Self {
        Self { anchor, pointer }
    }

    /// View-space curve between the pointer and the anchor terminal. The control
    /// offset flips for output anchors so the curve always leaves an output to
    /// the right and enters an input from the left.
    pub fn path(&self, diagram: &Diagram) -> Option<EdgePath> {
        let anchor = diagram.terminal_view_position(self.anchor)?;
        let control = match self.anchor.side {
            Side::Input => diagram.edge_control_offset(),
            Side::Output => -diagram.edge_control_offset(),
        };
        Some(EdgePath::between(self.pointer, anchor, control))
    }

    /// The edge this draft would form when released over `hovered`, as
    /// `(output, input)`. Only an opposite-polarity terminal on another node
    /// qualifies; type compatibility is checked on link.
    pub fn resolve(&self, hovered: TerminalRef) -> Option<(TerminalRef, TerminalRef)> {
        if hovered.node == self.anchor.node || hovered.side == self.anchor.side {
            return None;
        }
        match self.anchor.side {
            Side::Input => Some((hovered, self.anchor)),
            Side::Output => Some((self.anchor, hovered)),
        }
    }
}

/// What a finished drag did to the diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    Panned,
    Moved(NodeId),
    Linked(EdgeId),
    DraftDiscarded,
}

/// The thing being dragged. `shift` runs on every pointer move with a view-space
/// delta; `complete` consumes the target, so nothing can be shifted after it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragTarget {
    Pan,
    MoveNode(NodeId),
    EdgeDraft(EdgeDraft),
}

impl DragTarget {
    pub fn shift(&mut self, diagram: &mut Diagram, dx: f64, dy: f64) {
        match self {
            DragTarget::Pan => diagram.shift_pan(dx, dy),
            DragTarget::MoveNode(node) => {
                let (ndx, ndy) = diagram.view().view_delta_to_node(dx, dy);
                // The node may have been removed under us; the drag then does nothing.
                let _ = diagram.translate_node(*node, ndx, ndy);
            }
            DragTarget::EdgeDraft(draft) => {
                draft.pointer = draft.pointer.offset(dx, dy);
            }
        }
    }

    pub fn complete(self, diagram: &mut Diagram, hovered: Option<TerminalRef>) -> DragOutcome {
        match self {
            DragTarget::Pan => {
                diagram.commit_pan();
                DragOutcome::Panned
            }
            DragTarget::MoveNode(node) => DragOutcome::Moved(node),
            DragTarget::EdgeDraft(draft) => {
                diagram.emit(DiagramEvent::DraftCleared);
                let Some((output, input)) = hovered.and_then(|h| draft.resolve(h)) else {
                    return DragOutcome::DraftDiscarded;
                };
                match diagram.link_nodes(output.node, output.index, input.node, input.index) {
                    Ok(edge) => DragOutcome::Linked(edge),
                    Err(e) => {
                        debug!(error = %e, "discarded edge draft");
                        DragOutcome::DraftDiscarded
                    }
                }
            }
        }
    }
}

/// An open drag: the target plus the last pointer position it was shifted to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    target: DragTarget,
    last: Point,
}

impl DragSession {
    pub fn begin(target: DragTarget, at: Point) -> Self {
        Self { target, last: at }
    }

    pub fn target(&self) -> &DragTarget {
        &self.target
    }

    pub fn pointer(&self) -> Point {
        self.last
    }

    /// Shifts the target by the delta from the previous pointer position.
    pub fn update(&mut self, diagram: &mut Diagram, at: Point) {
        let (dx, dy) = (at.x - self.last.x, at.y - self.last.y);
        self.last = at;
        self.target.shift(diagram, dx, dy);
    }

    pub fn finish(self, diagram: &mut Diagram, hovered: Option<TerminalRef>) -> DragOutcome {
        self.target.complete(diagram, hovered)
    }
}
