#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Player
//!
//! The kinematic and collision core of a first-person player in a world of unit-cube
//! voxels.
//!
//! ## Key Modules
//!
//! * `engine_state` - The world, the player, physics and camera
//! * `application_state` - A headless scripted session driving the engine
//!
//! ## Architecture
//!
//! The player reads and edits the world only through the
//! [`BlockAccess`](engine_state::voxels::world::BlockAccess) trait, so any grid can host it:
//! * Physics primitives (boxes, the 27-voxel neighborhood, ray/face intersection)
//! * Collision resolution (vertical snapping, horizontal sliding)
//! * The per-tick motion integrator with friction, speed clamping, gravity and jumps
//! * Block targeting with placement and removal
//!
//! ## Usage
//!
//! ```rust
//! use voxel_player::engine_state::{config::Settings, voxels::world::World, EngineState};
//!
//! let mut engine_state = EngineState::new(World::flat(1, 10), Settings::default());
//! engine_state.spawn_player_at(0, 0);
//! engine_state.update();
//! ```

use log::{info, warn};

use application_state::{run_demo, DEFAULT_DEMO_TICKS};
use engine_state::{config::Settings, voxels::world::World};

pub mod application_state;
pub mod engine_state;

/// Environment variable naming a JSON settings file.
pub const CONFIG_ENV_VAR: &str = "VOXEL_PLAYER_CONFIG";
/// Radius, in chunks, of the world generated by [`run`].
pub const DEMO_WORLD_RADIUS: i32 = 4;
/// Seed of the world generated by [`run`].
pub const DEMO_WORLD_SEED: u32 = 1337;

/// Reads settings from the file named by [`CONFIG_ENV_VAR`], falling back to defaults.
pub fn load_settings() -> Settings {
    let Ok(path) = std::env::var(CONFIG_ENV_VAR) else {
        info!("{} not set, using default settings", CONFIG_ENV_VAR);
        return Settings::default();
    };

    match Settings::load(&path) {
        Ok(settings) => settings,
        Err(err) => {
            warn!("{}, using default settings", err);
            Settings::default()
        }
    }
}

/// Initializes logging, generates a world and runs the scripted demo session.
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let settings = load_settings();
    let world = World::terrain(DEMO_WORLD_RADIUS, DEMO_WORLD_SEED);
    run_demo(world, settings, DEFAULT_DEMO_TICKS);
}
