//! Match settings
//!
//! Loaded from an optional JSON file; missing keys fall back to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::Field;

/// Match configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Field ===
    pub field_width: f32,
    pub field_height: f32,
    /// Actors below this height crash
    pub ground_level: f32,

    // === Spawn slots ===
    /// Horizontal distance of each plane from its edge
    pub spawn_inset: f32,
    pub spawn_height: f32,
    /// Initial climb angle (degrees, mirrored for the right plane)
    pub spawn_angle: f32,

    // === Controls ===
    /// Degrees per frame while a turn is held
    pub turn_step: f32,

    // === Scenery ===
    pub clouds_min: u32,
    pub clouds_max: u32,

    /// RNG seed for scenery placement
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            ground_level: GROUND_LEVEL,

            spawn_inset: 50.0,
            spawn_height: 200.0,
            spawn_angle: 20.0,

            turn_step: TURN_STEP,

            clouds_min: 4,
            clouds_max: 10,

            seed: 0x5eed,
        }
    }
}

impl Settings {
    pub fn field(&self) -> Field {
        Field::new(self.field_width, self.field_height)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Invalid settings in {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let s = Settings::default();
        assert_eq!(s.field(), Field::new(1200.0, 700.0));
        assert_eq!(s.ground_level, 150.0);
        assert!(s.clouds_min <= s.clouds_max);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let s = Settings::from_json(r#"{ "ground_level": 90.0, "seed": 7 }"#).unwrap();
        assert_eq!(s.ground_level, 90.0);
        assert_eq!(s.seed, 7);
        assert_eq!(s.field_width, FIELD_WIDTH);
        assert_eq!(s.turn_step, TURN_STEP);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut s = Settings::default();
        s.spawn_angle = 35.0;
        let back = Settings::from_json(&s.to_json().unwrap()).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(Settings::from_json("{ not json").is_err());
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let s = Settings::load("/nonexistent/sky-duel/settings.json");
        assert_eq!(s, Settings::default());
    }
}
