//! # Settings
//!
//! Every tunable of the player core. Values are per tick: speeds are blocks per tick and
//! gravity terms are blocks per tick per tick.
//!
//! Settings are read from JSON. Missing keys keep their defaults, so a file only needs
//! to list what it changes:
//!
//! ```
//! use voxel_player::engine_state::config::Settings;
//!
//! let settings = Settings::from_json_str(r#"{ "god_mode": true }"#).unwrap();
//! assert!(settings.god_mode);
//! assert_eq!(settings.walking_speed, Settings::default().walking_speed);
//! ```

use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use super::error::{EngineError, EngineResult};

/// Tunables of the player core.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Maximum dominant-axis speed while walking.
    pub walking_speed: f32,
    /// Multiplier applied to the walking speed while running on the ground.
    pub running_factor: f32,
    /// Fraction of the acceleration lost every tick.
    pub friction: f32,
    /// Gravity accumulated per tick in air.
    pub gravity: f32,
    /// Terminal falling speed in air.
    pub max_gravity: f32,
    /// Gravity accumulated per tick in water.
    pub gravity_swimming: f32,
    /// Terminal sinking speed in water.
    pub max_gravity_swimming: f32,
    /// Upward speed given by a jump.
    pub jump_intensity: f32,
    /// Degrees of rotation per unit of mouse movement.
    pub mouse_sensitivity: f32,
    /// Disables gravity and collisions; movement follows the pitch.
    pub god_mode: bool,
    /// Scripted flight over the terrain. Only active together with `god_mode`.
    pub demo_flight: bool,
    /// Rolls the camera slightly while walking.
    pub bobbing: bool,
    /// Maximum bobbing roll in degrees.
    pub bobbing_angle: f32,
    /// Outlines the targeted block.
    pub placing_box: bool,
    /// Outlines the player box and the blocks considered for collisions.
    pub debug_collision: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            walking_speed: 0.025,
            running_factor: 1.8,
            friction: 0.1,
            gravity: 0.0075,
            max_gravity: 0.7,
            gravity_swimming: 0.000375,
            max_gravity_swimming: 0.01,
            jump_intensity: 0.125,
            mouse_sensitivity: 0.075,
            god_mode: false,
            demo_flight: false,
            bobbing: true,
            bobbing_angle: 2.0,
            placing_box: true,
            debug_collision: false,
        }
    }
}

impl Settings {
    /// Parses settings from a JSON document.
    pub fn from_json_str(json: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads settings from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| EngineError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json_str(&json)?;
        info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// True when the scripted demo flight replaces the physics.
    pub fn is_demo_flight(&self) -> bool {
        self.demo_flight && self.god_mode
    }
}
