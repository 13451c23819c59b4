use serde::{Deserialize, Serialize};

/// Vertical placement of terminal and parameter rows inside a node.
///
/// Row `i` sits at `base_offset + i * increment` below the node's top edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalLayout {
    pub base_offset: f64,
    pub increment: f64,
    pub radius: f64,
}

impl Default for TerminalLayout {
    fn default() -> Self {
        Self {
            base_offset: 35.0,
            increment: 20.0,
            radius: 5.0,
        }
    }
}

impl TerminalLayout {
    pub fn offset(&self, index: usize) -> f64 {
        self.base_offset + index as f64 * self.increment
    }

    /// Nearest slot index for a y-offset (node space, relative to the node's top).
    /// Never negative.
    pub fn index_from_offset(&self, y: f64) -> usize {
        let slot = ((y - self.base_offset + self.radius) / self.increment).round();
        if slot.is_finite() && slot > 0.0 {
            slot as usize
        } else {
            0
        }
    }
}
