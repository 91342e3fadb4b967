//! Runtime-tunable simulation settings
//!
//! Read every tick by the stepper and on every bounce by the pitch mapper.
//! Persisted separately from the scene (which is never saved) in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::PitchMode;

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Physics ===
    /// Added to every ball's vy each tick
    pub gravity: f32,
    /// Slack for the distance-sum contact test
    pub collision_threshold: f32,
    /// Ticks between spawns
    pub drop_cadence_ticks: u64,
    /// Tick timer rate (ticks per second)
    pub frame_rate: u32,

    // === Notes ===
    pub pitch_mode: PitchMode,
    /// Speed mapped to the top of the range in exponential mode
    pub max_velocity: f32,
    /// Seconds each note rings
    pub note_duration: f32,

    // === Viewport ===
    pub width: f32,
    pub height: f32,
    /// Ball draw half-size
    pub ball_radius: f32,
    /// Edit-mode pick distance
    pub pick_radius: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            collision_threshold: COLLISION_THRESHOLD,
            drop_cadence_ticks: DROP_CADENCE_TICKS,
            frame_rate: FRAME_RATE,

            pitch_mode: PitchMode::default(),
            max_velocity: MAX_VELOCITY,
            note_duration: NOTE_DURATION,

            width: WIDTH,
            height: HEIGHT,
            ball_radius: BALL_RADIUS,
            pick_radius: PICK_RADIUS,
        }
    }
}

impl Settings {
    /// Milliseconds between ticks
    pub fn frame_interval_ms(&self) -> u32 {
        (1000 / self.frame_rate.max(1)).max(1)
    }

    /// Copy with every value the simulation can't run on replaced
    ///
    /// Zero cadence/frame rate, non-finite numbers and empty viewports fall
    /// back to defaults; a negative threshold becomes 0.
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let finite_or = |v: f32, fallback: f32| if v.is_finite() { v } else { fallback };
        let positive_or = |v: f32, fallback: f32| {
            if v.is_finite() && v > 0.0 { v } else { fallback }
        };

        Self {
            gravity: finite_or(self.gravity, defaults.gravity),
            collision_threshold: finite_or(self.collision_threshold, defaults.collision_threshold)
                .max(0.0),
            drop_cadence_ticks: if self.drop_cadence_ticks == 0 {
                defaults.drop_cadence_ticks
            } else {
                self.drop_cadence_ticks
            },
            frame_rate: if self.frame_rate == 0 {
                defaults.frame_rate
            } else {
                self.frame_rate
            },
            pitch_mode: self.pitch_mode,
            max_velocity: positive_or(self.max_velocity, defaults.max_velocity),
            note_duration: positive_or(self.note_duration, defaults.note_duration),
            width: positive_or(self.width, defaults.width),
            height: positive_or(self.height, defaults.height),
            ball_radius: positive_or(self.ball_radius, defaults.ball_radius),
            pick_radius: finite_or(self.pick_radius, defaults.pick_radius).max(0.0),
        }
    }

    /// Parse from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let settings: Self = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "soundbars_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {e}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.width, 600.0);
        assert_eq!(s.height, 300.0);
        assert_eq!(s.drop_cadence_ticks, 500);
        assert_eq!(s.pitch_mode, PitchMode::Logarithmic);
        assert_eq!(s.frame_interval_ms(), 10);
    }

    #[test]
    fn test_sanitize_bad_values() {
        let bad = Settings {
            gravity: f32::NAN,
            collision_threshold: -1.0,
            drop_cadence_ticks: 0,
            frame_rate: 0,
            max_velocity: 0.0,
            width: -5.0,
            height: f32::INFINITY,
            ..Settings::default()
        };
        let s = bad.sanitized();
        let d = Settings::default();
        assert_eq!(s.gravity, d.gravity);
        assert_eq!(s.collision_threshold, 0.0);
        assert_eq!(s.drop_cadence_ticks, d.drop_cadence_ticks);
        assert_eq!(s.frame_rate, d.frame_rate);
        assert_eq!(s.max_velocity, d.max_velocity);
        assert_eq!(s.width, d.width);
        assert_eq!(s.height, d.height);
    }

    #[test]
    fn test_sanitize_keeps_valid_values() {
        let s = Settings {
            gravity: -0.01,
            frame_rate: 30,
            ..Settings::default()
        };
        assert_eq!(s.sanitized(), s);
    }

    #[test]
    fn test_json_partial_and_mode_names() {
        let s = Settings::from_json(r#"{"gravity": 0.02, "pitch_mode": "line-length"}"#).unwrap();
        assert_eq!(s.gravity, 0.02);
        assert_eq!(s.pitch_mode, PitchMode::LineLength);
        assert_eq!(s.drop_cadence_ticks, DROP_CADENCE_TICKS);

        let back = Settings::from_json(&s.to_json().unwrap()).unwrap();
        assert_eq!(back, s);

        assert!(Settings::from_json("{not json").is_err());
        assert!(Settings::from_json(r#"{"pitch_mode": "sine"}"#).is_err());
    }

    #[test]
    fn test_frame_interval() {
        let s = Settings {
            frame_rate: 2000,
            ..Settings::default()
        };
        assert_eq!(s.frame_interval_ms(), 1);
        let s = Settings {
            frame_rate: 60,
            ..Settings::default()
        };
        assert_eq!(s.frame_interval_ms(), 16);
    }
}
