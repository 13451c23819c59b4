use crate::template::Template;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// The persisted form of a diagram.
///
/// Nodes reference each other by their position in `nodes`, so indices only
/// mean something within one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagramDocument {
    #[serde(default)]
    pub templates: BTreeMap<String, Template>,
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub coordinates: [f64; 2],
    pub template: String,
    /// `0` or `1`.
    pub is_template: u8,
    pub state: StateRecord,
}

/// A node's state with edge ids replaced by `[node index, slot]` pairs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateRecord {
    #[serde(default)]
    pub parameters: Vec<Option<Value>>,
    #[serde(default)]
    pub inputs: Vec<Option<(usize, usize)>>,
    /// `None` for output slots without a declared terminal.
    #[serde(default)]
    pub outputs: Vec<Option<Vec<(usize, usize)>>>,
}

impl DiagramDocument {
    pub fn edge_count(&self) -> usize {
        self.nodes
            .iter()
            .map(|n| n.state.inputs.iter().flatten().count())
            .sum()
    }
}
