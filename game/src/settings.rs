//! Runtime tuning loaded from `assets/settings.ron`.
//!
//! A missing or malformed file is not an error; defaults apply and a
//! warning says why. Values themselves are never validated.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use sim::ControllerConfig;

/// Location of the settings file, anchored to this crate so it resolves
/// the same way the asset folder does under `cargo run`.
pub const SETTINGS_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/settings.ron");

/// Mouse look and procedural lean tuning.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Horizontal mouse sensitivity (radians per pixel of motion).
    pub sens_x: f32,
    /// Vertical mouse sensitivity.
    pub sens_y: f32,
    /// Maximum roll while strafing, in degrees.
    pub lean_angle: f32,
    /// Exponential smoothing rate toward the lean target.
    pub lean_speed: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            sens_x: 0.003,
            sens_y: 0.003,
            lean_angle: 15.0,
            lean_speed: 5.0,
        }
    }
}

/// Output volume per category; the final volume of a sound is its own
/// volume times its category times master.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    pub master_volume: f32,
    pub sfx_volume: f32,
    pub music_volume: f32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            sfx_volume: 0.8,
            music_volume: 0.5,
        }
    }
}

/// Everything tunable in one place.
#[derive(Resource, Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub controller: ControllerConfig,
    pub camera: CameraSettings,
    pub audio: AudioSettings,
}

impl Settings {
    /// Read settings from `path`, falling back to defaults on any failure.
    pub fn load_or_default(path: &str) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                warn!("Could not read {path} ({err}), using default settings");
                return Self::default();
            }
        };

        match ron::from_str(&text) {
            Ok(settings) => {
                info!("Loaded settings from {path}");
                settings
            }
            Err(err) => {
                warn!("Could not parse {path} ({err}), using default settings");
                Self::default()
            }
        }
    }
}

/// Insert the [`Settings`] resource before anything else reads it.
pub fn load_settings(mut commands: Commands) {
    commands.insert_resource(Settings::load_or_default(SETTINGS_PATH));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let settings = Settings::load_or_default("does/not/exist.ron");
        assert_eq!(settings.camera.lean_angle, 15.0);
        assert_eq!(settings.controller.walk_speed, 7.0);
    }

    #[test]
    fn test_partial_file_keeps_defaults_for_omitted_fields() {
        let settings: Settings =
            ron::from_str("(camera: (lean_angle: 10.0))").expect("valid partial settings");
        assert_eq!(settings.camera.lean_angle, 10.0);
        assert_eq!(settings.camera.lean_speed, 5.0);
        assert_eq!(settings.audio.master_volume, 1.0);
    }
}
