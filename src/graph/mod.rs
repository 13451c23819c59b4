//! The graph data model: nodes, their terminals and the edges between them.
//!
//! Edges live in a single arena owned by the [`Diagram`]. A node's input slot
//! holds at most one edge id and each output slot holds the ids of every edge
//! leaving it, so both directions of a connection always resolve to the same
//! [`Edge`] record.

mod diagram;
mod event;
mod integrity;
mod node;

pub use diagram::{Diagram, DiagramBuilder};
pub use event::{DiagramEvent, EdgeChange, RedrawScope};
pub use node::{FlowNode, NodeState};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a node within one diagram. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub(crate) u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Stable identity of an edge within one diagram. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub(crate) u32);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Polarity of a terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Input,
    Output,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Input => Side::Output,
            Side::Output => Side::Input,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Input => write!(f, "input"),
            Side::Output => write!(f, "output"),
        }
    }
}

/// One terminal of one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TerminalRef {
    pub node: NodeId,
    pub side: Side,
    pub index: usize,
}

impl TerminalRef {
    pub fn input(node: NodeId, index: usize) -> Self {
        Self {
            node,
            side: Side::Input,
            index,
        }
    }

    pub fn output(node: NodeId, index: usize) -> Self {
        Self {
            node,
            side: Side::Output,
            index,
        }
    }
}

/// A directed connection from an output slot to an input slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    pub source: NodeId,
    pub source_output: usize,
    pub target: NodeId,
    pub target_input: usize,
}

impl Edge {
    pub fn source_terminal(&self) -> TerminalRef {
        TerminalRef::output(self.source, self.source_output)
    }

    pub fn target_terminal(&self) -> TerminalRef {
        TerminalRef::input(self.target, self.target_input)
    }

    pub fn touches(&self, node: NodeId) -> bool {
        self.source == node || self.target == node
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] -> {}[{}]",
            self.source, self.source_output, self.target, self.target_input
        )
    }
}

/// How a template-editing gesture treats the addressed slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotOp {
    /// Fill the slot if it is empty.
    Add,
    /// Empty the slot if it is filled.
    Remove,
    /// Fill an empty slot, empty a filled one.
    Toggle,
}
