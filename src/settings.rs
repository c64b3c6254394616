//! Session settings and motion tuning
//!
//! Read from a JSON document: LocalStorage on web, a file path natively.
//! Nothing is ever written back.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::MotionParams;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Kinematic tuning
    pub motion: MotionParams,
    /// Obstacle hit distance
    pub collision_radius: f64,

    // === Obstacles ===
    pub obstacle_count: usize,
    /// Max per-axis offset from the start point
    pub obstacle_spread: f64,

    /// Start point as `[x, y]` (longitude, latitude on the reference map)
    pub start: DVec2,
    /// Obstacle layout seed; the web build uses the clock when unset
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            motion: MotionParams::default(),
            collision_radius: COLLISION_RADIUS,
            obstacle_count: OBSTACLE_COUNT,
            obstacle_spread: OBSTACLE_SPREAD,
            // Midtown Manhattan
            start: DVec2::new(-73.9857, 40.7484),
            seed: None,
        }
    }
}

impl Settings {
    /// Parse and validate a JSON settings document.
    ///
    /// Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject tuning the integrator can't honour
    pub fn validate(&self) -> Result<(), SettingsError> {
        let m = &self.motion;

        let all_finite = [
            m.acceleration,
            m.deceleration,
            m.max_speed,
            m.stop_threshold,
            self.collision_radius,
            self.obstacle_spread,
            self.start.x,
            self.start.y,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !all_finite {
            return invalid("settings", "values must be finite");
        }

        if m.acceleration <= 0.0 {
            return invalid("motion.acceleration", "must be positive");
        }
        if !(0.0..1.0).contains(&m.deceleration) {
            return invalid("motion.deceleration", "must be in [0, 1)");
        }
        if m.max_speed <= 0.0 {
            return invalid("motion.max_speed", "must be positive");
        }
        if m.stop_threshold < 0.0 || m.stop_threshold >= m.max_speed {
            return invalid("motion.stop_threshold", "must be in [0, max_speed)");
        }
        // A single tick of input from rest must clear the snap-to-rest threshold
        if m.acceleration < m.stop_threshold {
            return invalid("motion.acceleration", "must be at least stop_threshold");
        }
        if self.collision_radius < 0.0 {
            return invalid("collision_radius", "must not be negative");
        }
        if self.obstacle_spread < 0.0 {
            return invalid("obstacle_spread", "must not be negative");
        }
        Ok(())
    }

    /// Distance from the start point obstacles must keep
    pub fn start_clearance(&self) -> f64 {
        self.collision_radius * 2.0
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "map_dodge_settings";

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
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    /// Read a JSON settings file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Settings file if given and readable, defaults otherwise
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_or_default(path: Option<&str>) -> Self {
        let Some(path) = path else {
            return Self::load();
        };
        match Self::from_file(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path);
                settings
            }
            Err(e) => {
                log::warn!("Ignoring settings file {}: {}", path, e);
                Self::default()
            }
        }
    }
}

fn invalid(field: &'static str, reason: &'static str) -> Result<(), SettingsError> {
    Err(SettingsError::Invalid { field, reason })
}
