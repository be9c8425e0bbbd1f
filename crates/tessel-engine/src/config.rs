//! Engine Configuration

use serde::{Deserialize, Serialize};
use tessel_layout::Viewport;

use crate::EngineResult;

/// Engine configuration options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Viewport width in px
    pub viewport_width: f32,

    /// Viewport height in px
    pub viewport_height: f32,

    /// Directory external stylesheets and scripts are resolved against
    pub base_path: String,

    /// Layout deltas at or below this are not reported
    pub layout_epsilon: f32,

    /// Run `<script>` elements on load
    pub enable_scripts: bool,

    /// User agent string
    pub user_agent: String,
}

impl Config {
    /// Load from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.viewport_width, self.viewport_height)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            viewport_width: 800.0,
            viewport_height: 600.0,
            base_path: ".".to_string(),
            layout_epsilon: 0.01,
            enable_scripts: true,
            user_agent: format!("Tessel/{}", crate::VERSION),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = Config::from_json(r#"{ "viewport_width": 1024, "enable_scripts": false }"#).unwrap();
        assert_eq!(config.viewport(), Viewport::new(1024.0, 600.0));
        assert!(!config.enable_scripts);
        assert_eq!(config.base_path, ".");
        assert_eq!(config.layout_epsilon, 0.01);
        assert!(config.user_agent.starts_with("Tessel/"));
    }

    #[test]
    fn test_bad_json() {
        assert!(Config::from_json("{ viewport_width: }").is_err());
    }
}
