//! Configuration: overlay settings (serde) and demo host settings (env).

use std::env;
use std::str::FromStr;

use serde::Deserialize;

use crate::overlay::draw::{Rect, TextStyle};
use crate::overlay::input::Key;
use crate::overlay::types::DataMode;

/// In-memory overlay settings. Every field has a default, so partial JSON
/// such as `{"toggle_key":"T"}` is valid.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub toggle_key: Key,
    pub show: bool,
    pub gizmos: bool,
    pub data_mode: DataMode,
    pub style: TextStyle,
    /// Used when `style.font` is unset at activation.
    pub default_font: Option<String>,
    pub panel: PanelLayout,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            toggle_key: Key::Y,
            show: true,
            gizmos: false,
            data_mode: DataMode::TireSlipAndForce,
            style: TextStyle::default(),
            default_font: None,
            panel: PanelLayout::default(),
        }
    }
}

impl OverlayConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Fixed screen placement of the text panel.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PanelLayout {
    pub frame: Rect,
    pub text: Rect,
    pub title: String,
}

impl Default for PanelLayout {
    fn default() -> Self {
        Self {
            frame: Rect::new(8.0, 8.0, 545.0, 180.0),
            text: Rect::new(16.0, 28.0, 400.0, 270.0),
            title: "Telemetry".to_string(),
        }
    }
}

/// Demo host settings loaded from environment variables.
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// Fixed simulation rate
    pub tick_hz: u32,
    /// How long the demo runs before exiting
    pub duration_secs: u32,
    /// Ticks between panel dumps to the log
    pub report_every: u32,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    pub overlay: OverlayConfig,
}

impl HostConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let overlay = match env::var("TELEMETRY_OVERLAY") {
            Ok(json) => OverlayConfig::from_json(&json)?,
            Err(_) => OverlayConfig::default(),
        };

        Ok(Self {
            tick_hz: parse_var("TELEMETRY_TICK_HZ", 60)?,
            duration_secs: parse_var("TELEMETRY_DURATION_SECS", 10)?,
            report_every: parse_var("TELEMETRY_REPORT_EVERY", 60)?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            overlay,
        })
    }
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("Invalid overlay settings: {0}")]
    Overlay(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::draw::Color;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = OverlayConfig::from_json(r#"{"toggle_key":"T"}"#).unwrap();
        assert_eq!(cfg.toggle_key, Key::T);
        assert!(cfg.show);
        assert!(!cfg.gizmos);
        assert_eq!(cfg.data_mode, DataMode::TireSlipAndForce);
        assert_eq!(cfg.panel, PanelLayout::default());
        assert_eq!(cfg.style.color, Color::WHITE);
    }

    #[test]
    fn full_json() {
        let cfg = OverlayConfig::from_json(
            r#"{
                "toggle_key": "F2",
                "show": false,
                "gizmos": true,
                "data_mode": "GroundMaterial",
                "style": { "font": "mono", "color": { "r": 1.0, "g": 1.0, "b": 0.0 } },
                "panel": { "title": "Car" }
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.toggle_key, Key::F2);
        assert!(!cfg.show);
        assert!(cfg.gizmos);
        assert_eq!(cfg.data_mode, DataMode::GroundMaterial);
        assert_eq!(cfg.style.color, Color::YELLOW);
        assert_eq!(cfg.panel.title, "Car");
        assert_eq!(cfg.panel.frame, Rect::new(8.0, 8.0, 545.0, 180.0));
    }

    #[test]
    fn bad_json_is_an_error() {
        let err = OverlayConfig::from_json(r#"{"toggle_key":"Banana"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Overlay(_)));
        assert!(err.to_string().starts_with("Invalid overlay settings"));
    }

    #[test]
    fn parse_var_falls_back_to_default() {
        let v: u32 = parse_var("TELEMETRY_TEST_SURELY_UNSET_VAR", 42).unwrap();
        assert_eq!(v, 42);
    }
}
