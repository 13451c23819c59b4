use crate::error::ConfigError;
use crate::template::DEFAULT_DIMENSIONS;
use crate::transform::TerminalLayout;
use serde::{Deserialize, Serialize};
use std::fs;

/// Tunables of a diagram instance. Every field is optional in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Whether users may spawn template nodes and define their own templates.
    pub allow_user_templates: bool,
    /// Zoom exponent change per unit of wheel delta.
    pub scale_speed: f64,
    pub terminal_layout: TerminalLayout,
    /// Horizontal bezier control offset of a connection at zoom factor 1.
    pub edge_control_distance: f64,
    /// Dimensions of a freshly created template.
    pub default_dimensions: (f64, f64),
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            allow_user_templates: true,
            scale_speed: 0.001,
            terminal_layout: TerminalLayout::default(),
            edge_control_distance: 100.0,
            default_dimensions: DEFAULT_DIMENSIONS,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load a config from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = EditorConfig::from_json(r#"{"allow_user_templates": false}"#).unwrap();
        assert!(!config.allow_user_templates);
        assert_eq!(config.scale_speed, 0.001);
        assert_eq!(config.terminal_layout.increment, 20.0);
    }

    #[test]
    fn nested_layout_is_partial_too() {
        let config = EditorConfig::from_json(r#"{"terminal_layout": {"base_offset": 40}}"#).unwrap();
        assert_eq!(config.terminal_layout.base_offset, 40.0);
        assert_eq!(config.terminal_layout.radius, 5.0);
    }
}
