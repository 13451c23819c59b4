use super::{Edge, NodeId};

/// Which part of the canvas needs repainting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedrawScope {
    All,
    Nodes(Vec<NodeId>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeChange {
    Added,
    Removed,
}

/// Commands for the rendering collaborator, queued synchronously by every
/// mutating operation and drained with [`Diagram::drain_events`](super::Diagram::drain_events).
#[derive(Debug, Clone, PartialEq)]
pub enum DiagramEvent {
    Redraw(RedrawScope),
    NodeMoved(NodeId),
    EdgeChanged { edge: Edge, change: EdgeChange },
    TemplateChanged(String),
    /// A rejected user operation that should be surfaced to the user.
    Notice(String),
    /// The in-flight edge draft must be erased.
    DraftCleared,
}
