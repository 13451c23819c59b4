//! Node templates: the named type definitions that nodes instantiate.

mod parameter;
mod slots;

pub use parameter::{Parameter, ParameterKind, Terminal};
pub use slots::Slots;

use crate::error::GraphError;
use crate::graph::Side;
use ahash::AHashMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Dimensions given to templates that do not declare any.
pub const DEFAULT_DIMENSIONS: (f64, f64) = (160.0, 100.0);

fn default_dimensions() -> (f64, f64) {
    DEFAULT_DIMENSIONS
}

/// Shape, terminals and parameters shared by every node of one type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    #[serde(default = "default_dimensions")]
    pub dimensions: (f64, f64),
    #[serde(default)]
    pub parameters: Slots<Parameter>,
    #[serde(default)]
    pub inputs: Slots<Terminal>,
    #[serde(default)]
    pub outputs: Slots<Terminal>,
}

impl Default for Template {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSIONS.0, DEFAULT_DIMENSIONS.1)
    }
}

impl Template {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            dimensions: (width, height),
            parameters: Slots::new(),
            inputs: Slots::new(),
            outputs: Slots::new(),
        }
    }

    /// Appends an input terminal after the last slot.
    pub fn with_input(mut self, label: &str, data_type: &str) -> Self {
        let index = self.inputs.len();
        self.inputs.set(index, Terminal::new(label, data_type));
        self
    }

    /// Appends an output terminal after the last slot.
    pub fn with_output(mut self, label: &str, data_type: &str) -> Self {
        let index = self.outputs.len();
        self.outputs.set(index, Terminal::new(label, data_type));
        self
    }

    /// Appends a parameter after the last slot.
    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        let index = self.parameters.len();
        self.parameters.set(index, parameter);
        self
    }

    pub fn width(&self) -> f64 {
        self.dimensions.0
    }

    pub fn height(&self) -> f64 {
        self.dimensions.1
    }

    pub fn terminals(&self, side: Side) -> &Slots<Terminal> {
        match side {
            Side::Input => &self.inputs,
            Side::Output => &self.outputs,
        }
    }

    pub fn terminals_mut(&mut self, side: Side) -> &mut Slots<Terminal> {
        match side {
            Side::Input => &mut self.inputs,
            Side::Output => &mut self.outputs,
        }
    }

    pub fn terminal(&self, side: Side, index: usize) -> Option<&Terminal> {
        self.terminals(side).get(index)
    }

    /// Slot of the last input carrying `label`.
    pub fn input_index_by_label(&self, label: &str) -> Option<usize> {
        Self::last_with_label(&self.inputs, label)
    }

    /// Slot of the last output carrying `label`.
    pub fn output_index_by_label(&self, label: &str) -> Option<usize> {
        Self::last_with_label(&self.outputs, label)
    }

    fn last_with_label(slots: &Slots<Terminal>, label: &str) -> Option<usize> {
        slots
            .iter()
            .filter(|(_, t)| t.label == label)
            .map(|(i, _)| i)
            .last()
    }
}

/// Name-keyed store of templates owned by a diagram.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateRegistry {
    templates: AHashMap<String, Template>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Template> {
        self.templates.get_mut(name)
    }

    /// Inserts or replaces a template, returning the previous definition.
    pub fn insert(&mut self, name: impl Into<String>, template: Template) -> Option<Template> {
        self.templates.insert(name.into(), template)
    }

    pub(crate) fn remove(&mut self, name: &str) -> Option<Template> {
        self.templates.remove(name)
    }

    /// Renames `old` to `new` in place. Fails if `old` is unknown or `new` is taken.
    pub(crate) fn rename(&mut self, old: &str, new: &str) -> Result<(), GraphError> {
        if old == new {
            return Ok(());
        }
        if self.templates.contains_key(new) {
            return Err(GraphError::TemplateNameTaken(new.to_string()));
        }
        let template = self
            .templates
            .remove(old)
            .ok_or_else(|| GraphError::UnknownTemplate(old.to_string()))?;
        self.templates.insert(new.to_string(), template);
        Ok(())
    }

    /// Template names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.templates.keys().cloned().sorted().collect()
    }

    /// Templates in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Template)> + '_ {
        self.templates.iter().sorted_by(|a, b| a.0.cmp(b.0))
    }

    /// First of `base`, `base_0`, `base_1`, ... that is not registered.
    pub fn unused_name(&self, base: &str) -> String {
        if !self.contains(base) {
            return base.to_string();
        }
        (0..)
            .map(|i| format!("{}_{}", base, i))
            .find(|candidate| !self.contains(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    /// Shallow union; entries of `other` win on name clashes.
    pub(crate) fn merge(&mut self, other: TemplateRegistry) {
        self.templates.extend(other.templates);
    }
}

impl FromIterator<(String, Template)> for TemplateRegistry {
    fn from_iter<I: IntoIterator<Item = (String, Template)>>(iter: I) -> Self {
        Self {
            templates: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_object_is_a_valid_template() {
        let template: Template = serde_json::from_value(json!({})).unwrap();
        assert_eq!(template, Template::default());
    }

    #[test]
    fn sparse_terminals_keep_their_slots() {
        let template: Template = serde_json::from_value(json!({
            "dimensions": [200, 80],
            "inputs": [["a", "number"], null, ["c", "string"]],
        }))
        .unwrap();
        assert_eq!(template.dimensions, (200.0, 80.0));
        assert_eq!(template.inputs.len(), 3);
        assert!(template.terminal(Side::Input, 1).is_none());
        assert_eq!(template.terminal(Side::Input, 2).unwrap().data_type, "string");
    }

    #[test]
    fn label_lookup_prefers_last_slot() {
        let template = Template::default()
            .with_output("out", "number")
            .with_output("out", "string");
        assert_eq!(template.output_index_by_label("out"), Some(1));
        assert_eq!(template.input_index_by_label("out"), None);
    }

    #[test]
    fn unused_name_counts_from_zero() {
        let mut registry = TemplateRegistry::new();
        assert_eq!(registry.unused_name("Template"), "Template");
        registry.insert("Template", Template::default());
        registry.insert("Template_0", Template::default());
        assert_eq!(registry.unused_name("Template"), "Template_1");
    }

    #[test]
    fn rename_rejects_taken_names() {
        let mut registry = TemplateRegistry::new();
        registry.insert("A", Template::default());
        registry.insert("B", Template::default());
        assert_eq!(
            registry.rename("A", "B"),
            Err(GraphError::TemplateNameTaken("B".to_string()))
        );
        registry.rename("A", "C").unwrap();
        assert_eq!(registry.names(), vec!["B", "C"]);
    }
}
