//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types from the nodeflow crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use nodeflow::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let mut diagram = Diagram::new();
//! codec::load_file(&mut diagram, "path/to/diagram.json", true)?;
//! println!("{} nodes, {} edges", diagram.node_count(), diagram.edge_count());
//! # Ok(())
//! # }
//! ```

// Model
pub use crate::graph::{
    Diagram, DiagramBuilder, DiagramEvent, Edge, EdgeChange, EdgeId, FlowNode, NodeId,
    RedrawScope, Side, SlotOp, TerminalRef,
};
pub use crate::template::{Parameter, ParameterKind, Slots, Template, TemplateRegistry, Terminal};
pub use crate::compat::CompatibilityTable;
pub use crate::config::EditorConfig;

// Geometry
pub use crate::transform::{EdgePath, PanBox, Point, TerminalLayout, ViewTransform};

// Interaction
pub use crate::interaction::{
    ContextMenu, DragOutcome, Editor, MenuAction, PointerButton, PointerTarget,
};

// Persistence
pub use crate::codec::{self, LoadReport};

// Error types
pub use crate::error::{CodecError, ConfigError, GraphError, IntegrityError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
