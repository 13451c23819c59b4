use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A named, typed connection point declared by a template.
///
/// Serialized as a two-element array `[label, type]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct Terminal {
    pub label: String,
    pub data_type: String,
}

impl Terminal {
    pub fn new(label: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            data_type: data_type.into(),
        }
    }
}

impl From<(String, String)> for Terminal {
    fn from((label, data_type): (String, String)) -> Self {
        Self { label, data_type }
    }
}

impl From<Terminal> for (String, String) {
    fn from(terminal: Terminal) -> Self {
        (terminal.label, terminal.data_type)
    }
}

/// A user-editable value declared by a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub kind: ParameterKind,
    #[serde(default)]
    pub tooltip: String,
}

/// The editing widget of a parameter and its type-specific settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParameterKind {
    Boolean {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<bool>,
    },
    Dropdown {
        #[serde(default)]
        options: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<String>,
    },
    StringField {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<String>,
    },
    NumField {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        step: Option<f64>,
    },
}

impl Parameter {
    pub fn new(name: impl Into<String>, kind: ParameterKind) -> Self {
        Self {
            name: name.into(),
            kind,
            tooltip: String::new(),
        }
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = tooltip.into();
        self
    }

    /// The parameter a template-editing gesture drops into an empty slot.
    pub fn placeholder() -> Self {
        Self::new(
            "Param",
            ParameterKind::StringField {
                default: Some(String::new()),
            },
        )
        .with_tooltip("Tooltip")
    }

    /// Initial node value: the declared default, or a dropdown's first option.
    pub fn default_value(&self) -> Option<Value> {
        match &self.kind {
            ParameterKind::Boolean { default } => default.map(Value::Bool),
            ParameterKind::Dropdown { options, default } => default
                .as_ref()
                .or_else(|| options.first())
                .map(|s| Value::String(s.clone())),
            ParameterKind::StringField { default } => default.clone().map(Value::String),
            ParameterKind::NumField { default, .. } => default.map(Value::from),
        }
    }

    /// Name of the widget kind, as written in the `type` field.
    pub fn type_name(&self) -> &'static str {
        match self.kind {
            ParameterKind::Boolean { .. } => "boolean",
            ParameterKind::Dropdown { .. } => "dropdown",
            ParameterKind::StringField { .. } => "string_field",
            ParameterKind::NumField { .. } => "num_field",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn terminal_is_a_pair() {
        let terminal: Terminal = serde_json::from_value(json!(["val", "number"])).unwrap();
        assert_eq!(terminal, Terminal::new("val", "number"));
        assert_eq!(serde_json::to_value(&terminal).unwrap(), json!(["val", "number"]));
    }

    #[test]
    fn num_field_reads_optional_bounds() {
        let param: Parameter = serde_json::from_value(json!({
            "name": "Gain", "type": "num_field", "default": 0.5, "min": 0, "tooltip": "dB"
        }))
        .unwrap();
        assert_eq!(param.type_name(), "num_field");
        assert_eq!(param.default_value(), Some(json!(0.5)));
        assert_eq!(param.tooltip, "dB");
    }

    #[test]
    fn dropdown_defaults_to_first_option() {
        let param = Parameter::new(
            "Mode",
            ParameterKind::Dropdown {
                options: vec!["fast".into(), "slow".into()],
                default: None,
            },
        );
        assert_eq!(param.default_value(), Some(json!("fast")));
    }

    #[test]
    fn placeholder_serializes_like_a_string_field() {
        assert_eq!(
            serde_json::to_value(Parameter::placeholder()).unwrap(),
            json!({"name": "Param", "type": "string_field", "default": "", "tooltip": "Tooltip"})
        );
    }
}
