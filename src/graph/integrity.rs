use super::{Diagram, Side};
use crate::error::IntegrityError;

impl Diagram {
    /// Checks that every edge is mirrored on both of its endpoints and that every
    /// edge id held by a node resolves to an edge ending at that node and slot.
    pub fn verify_integrity(&self) -> Result<(), IntegrityError> {
        for id in &self.order {
            if !self.nodes.contains_key(id) {
                return Err(IntegrityError::OrderMismatch { node: *id });
            }
        }
        if self.order.len() != self.nodes.len() {
            let missing = self
                .nodes
                .keys()
                .find(|id| !self.order.contains(*id))
                .copied();
            if let Some(node) = missing {
                return Err(IntegrityError::OrderMismatch { node });
            }
        }

        for (edge_id, edge) in &self.edges {
            let target = self
                .nodes
                .get(&edge.target)
                .ok_or(IntegrityError::DanglingEdge {
                    edge: *edge_id,
                    node: edge.target,
                })?;
            let source = self
                .nodes
                .get(&edge.source)
                .ok_or(IntegrityError::DanglingEdge {
                    edge: *edge_id,
                    node: edge.source,
                })?;

            if target.input_edge(edge.target_input) != Some(*edge_id) {
                return Err(IntegrityError::MissingMirror {
                    edge: *edge_id,
                    node: edge.target,
                    side: Side::Input,
                    index: edge.target_input,
                });
            }
            let fan_out = source.output_edges(edge.source_output);
            if fan_out.iter().filter(|e| *e == edge_id).count() != 1 {
                return Err(IntegrityError::MissingMirror {
                    edge: *edge_id,
                    node: edge.source,
                    side: Side::Output,
                    index: edge.source_output,
                });
            }
        }

        for node in self.nodes.values() {
            for (index, slot) in node.state.inputs.iter().enumerate() {
                if let Some(edge_id) = slot {
                    let matches = self
                        .edges
                        .get(edge_id)
                        .is_some_and(|e| e.target == node.id && e.target_input == index);
                    if !matches {
                        return Err(IntegrityError::UnknownEdge {
                            node: node.id,
                            side: Side::Input,
                            index,
                            edge: *edge_id,
                        });
                    }
                }
            }
            for (index, fan_out) in node.state.outputs.iter().enumerate() {
                for edge_id in fan_out {
                    let matches = self
                        .edges
                        .get(edge_id)
                        .is_some_and(|e| e.source == node.id && e.source_output == index);
                    if !matches {
                        return Err(IntegrityError::UnknownEdge {
                            node: node.id,
                            side: Side::Output,
                            index,
                            edge: *edge_id,
                        });
                    }
                }
            }
        }

        Ok(())
    }

    /// Invariant check run after every structural mutation in debug builds.
    #[inline]
    pub(crate) fn debug_check(&self) {
        if cfg!(debug_assertions) {
            if let Err(e) = self.verify_integrity() {
                panic!("diagram invariant violated: {}", e);
            }
        }
    }
}
