//! Type compatibility between output and input terminals.

use crate::error::CodecError;
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;
use serde_json::Value;

/// Directed lookup table: destination (input) type -> accepted source (output) types.
///
/// A destination without an entry only accepts its own type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompatibilityTable {
    entries: AHashMap<String, AHashSet<String>>,
}

impl CompatibilityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an output of type `source` may feed an input of type `destination`.
    pub fn are_compatible(&self, source: &str, destination: &str) -> bool {
        match self.entries.get(destination) {
            Some(sources) => sources.contains(source),
            None => source == destination,
        }
    }

    /// Adds accepted source types for `destination`, creating the entry if needed.
    pub fn allow<I, S>(mut self, destination: &str, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries
            .entry(destination.to_string())
            .or_default()
            .extend(sources.into_iter().map(Into::into));
        self
    }

    /// Replaces the entry of `destination`. An empty list rejects every source,
    /// including `destination` itself.
    pub fn set_entry<I, S>(&mut self, destination: &str, sources: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries.insert(
            destination.to_string(),
            sources.into_iter().map(Into::into).collect(),
        );
    }

    /// Removes the entry of `destination`, restoring identity compatibility for it.
    pub fn remove_entry(&mut self, destination: &str) -> bool {
        self.entries.remove(destination).is_some()
    }

    /// Independent copy of the table as `destination -> sorted sources`.
    pub fn entries(&self) -> AHashMap<String, Vec<String>> {
        self.entries
            .iter()
            .map(|(dest, sources)| (dest.clone(), sources.iter().cloned().sorted().collect()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reads a table from a JSON object of the form `{"dest": ["src", ...], ...}`.
    ///
    /// Non-string sources and non-array entries are dropped silently; only a
    /// top-level value that is not an object is rejected.
    pub fn from_json_value(value: &Value) -> Result<Self, CodecError> {
        let object = value.as_object().ok_or_else(|| {
            CodecError::InvalidCompatibilityTable("table is not an object".to_string())
        })?;

        let entries = object
            .iter()
            .filter_map(|(dest, sources)| {
                let sources = sources.as_array()?;
                let accepted = sources
                    .iter()
                    .filter_map(|src| src.as_str().map(str::to_string))
                    .collect::<AHashSet<_>>();
                Some((dest.clone(), accepted))
            })
            .collect();

        Ok(Self { entries })
    }

    pub fn from_json(json: &str) -> Result<Self, CodecError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| CodecError::JsonParseError(e.to_string()))?;
        Self::from_json_value(&value)
    }

    /// JSON object form, with keys and sources sorted.
    pub fn to_json_value(&self) -> Value {
        let object = self
            .entries()
            .into_iter()
            .sorted_by(|a, b| a.0.cmp(&b.0))
            .map(|(dest, sources)| (dest, Value::from(sources)))
            .collect::<serde_json::Map<_, _>>();
        Value::Object(object)
    }
}
