//! Game settings and tuning
//!
//! Loaded from an optional JSON file. Missing fields take their defaults, and a
//! missing or broken file falls back to defaults entirely.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Runtime tuning for the scene and simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Screen ===
    pub width: f32,
    pub height: f32,
    /// Target frame rate of the host loop
    pub fps: u32,

    // === Physics ===
    /// Downward acceleration in pixels/frame²
    pub gravity: f32,
    /// Fraction of penetration corrected per contact (0.2 - 0.8 is sensible)
    pub correction_percent: f32,

    // === Controller ===
    pub move_delta: f32,
    pub max_walk_speed: f32,
    pub jump_velocity: f32,

    // === Level ===
    /// Grid that mouse-placed walls snap to
    pub grid_size: f32,
    pub bullet_speed: f32,
    pub bullet_radius: f32,
    /// Goals to collect before advancing to the next level
    pub goals_to_win: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
            fps: FPS,

            gravity: GRAVITY,
            correction_percent: CORRECTION_PERCENT,

            move_delta: MOVE_DELTA,
            max_walk_speed: MAX_WALK_SPEED,
            jump_velocity: JUMP_VELOCITY,

            grid_size: GRID_SIZE,
            bullet_speed: BULLET_SPEED,
            bullet_radius: BULLET_RADIUS,
            goals_to_win: GOALS_TO_WIN,
        }
    }
}

impl Settings {
    /// Parse settings, filling missing fields with defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    pub fn to_json(&self) -> String {
        // Plain data with no maps or non-string keys, so this cannot fail
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Load settings from a JSON file, falling back to defaults on any error
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not read settings {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::debug!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Invalid settings {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        std::fs::write(path, self.to_json())
    }

    /// Clamp values that would break the simulation
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.correction_percent > 0.0 && self.correction_percent <= 1.0) {
            log::warn!(
                "correction_percent {} out of range, using {}",
                self.correction_percent,
                defaults.correction_percent
            );
            self.correction_percent = defaults.correction_percent;
        }
        if !(self.grid_size > 0.0) {
            log::warn!("grid_size must be positive, using {}", defaults.grid_size);
            self.grid_size = defaults.grid_size;
        }
        if self.fps == 0 {
            self.fps = defaults.fps;
        }
        self.max_walk_speed = self.max_walk_speed.abs();
        self
    }
}
