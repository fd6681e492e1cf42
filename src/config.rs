use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::geometry::{PlacementParams, SnapParams};

pub const GENERATION_TOKEN_ENV: &str = "HOLIDAY_LIGHTS_GENERATION_TOKEN";
pub const MAPS_KEY_ENV: &str = "HOLIDAY_LIGHTS_MAPS_KEY";

/// Startup configuration, loaded once in `main` and handed to the app
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // a partial file only overrides what it names
pub struct AppConfig {
    /// Distance between bulbs along a line, in container pixels
    pub spacing_px: f32,
    /// Douglas–Peucker tolerance for drawn lines, in percent of the container
    pub simplify_tolerance: f32,
    pub max_lights_per_stroke: usize,
    pub edge_snap: EdgeSnapConfig,
    pub mapping_api_key: Option<String>,
    pub generation: GenerationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeSnapConfig {
    /// Whether snapping starts switched on; the user can toggle it
    pub enabled: bool,
    #[serde(flatten)]
    pub params: SnapParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub api_token: Option<String>,
    pub endpoint: String,
    pub model_version: Option<String>,
    pub prompt: String,
    pub poll_interval_ms: u64,
    pub max_polls: u32,
    pub mask_stroke_width_px: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        let placement = PlacementParams::default();
        Self {
            spacing_px: placement.spacing_px,
            simplify_tolerance: crate::geometry::simplify::DEFAULT_TOLERANCE,
            max_lights_per_stroke: placement.max_per_stroke,
            edge_snap: EdgeSnapConfig::default(),
            mapping_api_key: None,
            generation: GenerationConfig::default(),
        }
    }
}

impl Default for EdgeSnapConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            params: SnapParams::default(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            endpoint: "https://api.replicate.com/v1".to_owned(),
            model_version: None,
            prompt: "Photorealistic night photo of this house decorated with glowing \
                     string lights along the masked lines"
                .to_owned(),
            poll_interval_ms: 1000,
            max_polls: 120,
            mask_stroke_width_px: 8.0,
        }
    }
}

impl AppConfig {
    /// Defaults, overridden by the optional JSON file, overridden by the environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                log::info!("Reading config from {}", path.display());
                Self::from_json(&std::fs::read_to_string(path)?)?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Apply environment overrides; `lookup` abstracts `std::env::var` for tests
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(token) = lookup(GENERATION_TOKEN_ENV).filter(|v| !v.is_empty()) {
            self.generation.api_token = Some(token);
        }
        if let Some(key) = lookup(MAPS_KEY_ENV).filter(|v| !v.is_empty()) {
            self.mapping_api_key = Some(key);
        }
    }

    pub fn placement(&self) -> PlacementParams {
        PlacementParams {
            spacing_px: self.spacing_px,
            max_per_stroke: self.max_lights_per_stroke,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.spacing_px, 20.0);
        assert_eq!(config.simplify_tolerance, 1.5);
        assert_eq!(config.max_lights_per_stroke, 1000);
        assert!(!config.edge_snap.enabled);
        assert_eq!(config.edge_snap.params.threshold, 50.0);
        assert_eq!(config.generation.poll_interval_ms, 1000);
        assert!(config.generation.api_token.is_none());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = AppConfig::from_json(
            r#"{ "spacing_px": 30, "edge_snap": { "enabled": true, "threshold": 80 } }"#,
        )
        .unwrap();
        assert_eq!(config.spacing_px, 30.0);
        assert!(config.edge_snap.enabled);
        assert_eq!(config.edge_snap.params.threshold, 80.0);
        assert_eq!(config.edge_snap.params.min_radius_px, 5);
        assert_eq!(config.simplify_tolerance, 1.5);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            AppConfig::from_json("{ spacing_px: }"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config =
            AppConfig::from_json(r#"{ "generation": { "api_token": "from-file" } }"#).unwrap();
        config.apply_env(|key| match key {
            GENERATION_TOKEN_ENV => Some("from-env".to_owned()),
            MAPS_KEY_ENV => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.generation.api_token.as_deref(), Some("from-env"));
        assert!(config.mapping_api_key.is_none());
    }
}
