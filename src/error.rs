use crate::graph::{EdgeId, NodeId, Side};
use thiserror::Error;

/// Errors raised by mutating or querying a [`Diagram`](crate::graph::Diagram).
///
/// An operation that returns one of these leaves the diagram untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Node '{0}' does not exist in this diagram")]
    NodeNotFound(NodeId),

    #[error("Template '{0}' is not registered")]
    UnknownTemplate(String),

    #[error("A template named '{0}' already exists")]
    TemplateNameTaken(String),

    #[error("Node '{0}' is not a template node")]
    NotATemplateNode(NodeId),

    #[error("Node '{node}' has no {side} terminal at slot {index}")]
    TerminalNotFound {
        node: NodeId,
        side: Side,
        index: usize,
    },

    #[error("Node '{node}' has no parameter at slot {index}")]
    ParameterNotFound { node: NodeId, index: usize },

    #[error(
        "An output of type '{source_type}' cannot feed an input of type '{destination_type}'"
    )]
    IncompatibleTypes {
        source_type: String,
        destination_type: String,
    },

    #[error("User-defined templates are disabled for this diagram")]
    UserTemplatesDisabled,
}

/// Errors that can occur while reading or writing a diagram document.
///
/// Malformed nodes and edges inside an otherwise valid document are not errors;
/// they are skipped and counted in a [`LoadReport`](crate::codec::LoadReport).
#[derive(Error, Debug, Clone)]
pub enum CodecError {
    #[error("Failed to parse diagram JSON: {0}")]
    JsonParseError(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Invalid compatibility table: {0}")]
    InvalidCompatibilityTable(String),
}

/// A broken mirror between an input slot and an output entry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IntegrityError {
    #[error("Edge '{edge}' references node '{node}', which is not in the diagram")]
    DanglingEdge { edge: EdgeId, node: NodeId },

    #[error("Edge '{edge}' is missing from the {side} slot {index} of node '{node}'")]
    MissingMirror {
        edge: EdgeId,
        node: NodeId,
        side: Side,
        index: usize,
    },

    #[error("Node '{node}' {side} slot {index} references unknown edge '{edge}'")]
    UnknownEdge {
        node: NodeId,
        side: Side,
        index: usize,
        edge: EdgeId,
    },

    #[error("Node '{node}' is listed in the node order but not stored (or vice versa)")]
    OrderMismatch { node: NodeId },
}

/// Errors that can occur while loading an [`EditorConfig`](crate::config::EditorConfig).
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("Could not read config file '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),
}
