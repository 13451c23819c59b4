//! # Nodeflow - Node-Flow Diagram Editor Core
//!
//! **Nodeflow** is the headless core of an embeddable node-graph editor: typed nodes
//! with input and output terminals, directed edges between them, per-node
//! parameters, all inside a pannable and zoomable canvas. Rendering and raw pointer
//! capture stay with the host; Nodeflow keeps the model consistent and tells the
//! host what to redraw.
//!
//! ## Core Workflow
//!
//! 1.  **Describe Your Node Types**: Build [`Template`](template::Template)s with
//!     their terminals and parameters, and optionally a
//!     [`CompatibilityTable`](compat::CompatibilityTable) saying which output types
//!     may feed which input types.
//! 2.  **Build a Diagram**: Use `Diagram::builder()` to register the templates and
//!     the table, then place and link nodes through the `Diagram` methods. Every
//!     edge is recorded once and referenced from both of its endpoints.
//! 3.  **Drive It From Pointer Events**: Wrap the diagram in an
//!     [`Editor`](interaction::Editor) and feed it pointer-down/move/up, wheel and
//!     double-click events in view-space coordinates.
//! 4.  **Render and Persist**: Drain [`DiagramEvent`](graph::DiagramEvent)s to
//!     repaint, query `edge_path` for connection curves, and save or load the whole
//!     diagram through the [`codec`] module.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nodeflow::prelude::*;
//!
//! fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     // 1. Two node types: a number source and a sink that also accepts integers.
//!     let compatibility = CompatibilityTable::new().allow("number", ["number", "integer"]);
//!
//!     // 2. Build the diagram.
//!     let mut diagram = Diagram::builder()
//!         .with_template("Source", Template::new(160.0, 80.0).with_output("val", "number"))
//!         .with_template("Sink", Template::new(160.0, 80.0).with_input("val", "number"))
//!         .with_compatibility(compatibility)
//!         .build();
//!
//!     let source = diagram.create_node("Source", Point::new(0.0, 0.0))?;
//!     let sink = diagram.create_node("Sink", Point::new(300.0, 40.0))?;
//!     let edge = diagram.link_nodes(source, 0, sink, 0)?;
//!
//!     // 3. The host repaints from the queued events and edge curves.
//!     for event in diagram.drain_events() {
//!         println!("{:?}", event);
//!     }
//!     if let Some(path) = diagram.edge_path(edge) {
//!         println!("<path d=\"{}\"/>", path.to_svg());
//!     }
//!
//!     // 4. Persist.
//!     let json = diagram.to_json()?;
//!     let (restored, report) = Diagram::from_json(&json)?;
//!     println!("{} ({} nodes)", report, restored.node_count());
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod compat;
pub mod config;
pub mod error;
pub mod graph;
pub mod interaction;
pub mod prelude;
pub mod template;
pub mod transform;
