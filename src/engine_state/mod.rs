//! # Engine State Module
//!
//! The core engine module that owns the simulation: the voxel world, the player moving
//! through it and the camera following the player.
//!
//! ## Key Components
//!
//! * `EngineState` - The main state container for the engine
//! * `camera_state` - View and projection derived from the player
//! * `config` - Tunables of the player core
//! * `error` - Errors raised at the edges of the engine
//! * `physics` - Boxes, collision resolution, submersion and block selection
//! * `player` - The first-person player and its input bindings
//! * `voxels` - Blocks, chunks and the world
//!
//! ## Architecture
//!
//! The world is owned here and lent to the player for each call: immutably for ticks and
//! queries, mutably for the place/remove actions. Chunks edited by the player are
//! collected once per update so a renderer can rebuild them.

use std::collections::HashSet;

use camera_state::CameraState;
use cgmath::{Matrix4, Point3};
use log::{debug, info};
use winit::{event::MouseButton, keyboard::KeyCode};

use config::Settings;
use physics::aabb::Aabb;
use player::Player;
use voxels::world::{BlockAccess, World};

pub mod camera_state;
pub mod config;
pub mod error;
pub mod physics;
pub mod player;
pub mod voxels;

/// Default viewport used until a renderer reports its real size.
pub const DEFAULT_VIEWPORT: (u32, u32) = (1280, 720);
/// How high above the ground the player spawns.
pub const SPAWN_HEIGHT_ABOVE_GROUND: f32 = 2.0;
/// Ticks between periodic player state dumps at debug level.
const PLAYER_LOG_INTERVAL: u64 = 600;

/// An input event addressed to the player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerEvent {
    /// A key went down or up
    Key {
        key: KeyCode,
        pressed: bool,
        is_repeat: bool,
    },
    /// A mouse button went down or up
    MouseButton { button: MouseButton, pressed: bool },
    /// Raw mouse movement; positive `dy` looks up
    MouseMotion { dx: f64, dy: f64 },
}

/// The main state container for the engine
///
/// # Examples
///
/// ```
/// use voxel_player::engine_state::{config::Settings, voxels::world::World, EngineState};
///
/// let mut engine_state = EngineState::new(World::flat(2, 10), Settings::default());
/// engine_state.spawn_player_at(0, 0);
///
/// for _ in 0..60 {
///     engine_state.update();
/// }
/// assert!(engine_state.player.is_touching_ground());
/// ```
pub struct EngineState {
    /// The voxel world containing all chunk data
    pub world: World,
    /// The player moving through the world
    pub player: Player,
    /// Camera following the player
    pub camera_state: CameraState,
    /// Chunks edited since the renderer last collected them
    chunks_to_rebuild: HashSet<Point3<i32>>,
    ticks: u64,
}

impl EngineState {
    /// Creates an engine state around an existing world.
    ///
    /// The player starts at the origin; use [`EngineState::spawn_player_at`] to put it on
    /// the ground.
    pub fn new(world: World, settings: Settings) -> Self {
        let (width, height) = DEFAULT_VIEWPORT;
        Self {
            world,
            player: Player::new(settings, Point3::new(0.0, 0.0, 0.0)),
            camera_state: CameraState::new(width, height),
            chunks_to_rebuild: HashSet::new(),
            ticks: 0,
        }
    }

    /// Places the player above the highest solid block of the given column and resets
    /// its motion.
    pub fn spawn_player_at(&mut self, x: i32, z: i32) {
        let ground = self.world.max_terrain_height_at(x, z);
        let position = Point3::new(x as f32, ground as f32 + SPAWN_HEIGHT_ABOVE_GROUND, z as f32);
        self.player.set_position(position);
        self.player.reset();
        info!("Player spawned at {:?}", position);
    }

    /// Forwards an input event to the player.
    ///
    /// # Arguments
    ///
    /// * `event` - The event to process
    pub fn process_input(&mut self, event: PlayerEvent) {
        match event {
            PlayerEvent::Key {
                key,
                pressed,
                is_repeat,
            } => self.player.on_key(&mut self.world, key, pressed, is_repeat),
            PlayerEvent::MouseButton { button, pressed } => {
                self.player.on_mouse_button(&mut self.world, button, pressed)
            }
            PlayerEvent::MouseMotion { dx, dy } => self.player.on_mouse_move(dx, dy),
        }
    }

    /// Runs one simulation tick and refreshes the camera.
    pub fn update(&mut self) {
        self.player.tick(&self.world);

        if let Some(chunk_position) = self.camera_state.update(&self.player) {
            debug!("Eye entered chunk {:?}", chunk_position);
        }

        let dirty = self.world.take_dirty_chunks();
        if !dirty.is_empty() {
            debug!("{} chunks need rebuilding", dirty.len());
            self.chunks_to_rebuild.extend(dirty);
        }

        self.ticks += 1;
        if self.ticks % PLAYER_LOG_INTERVAL == 0 {
            debug!("{}", self.player);
        }
    }

    /// Returns and clears the chunks edited since the last call.
    pub fn take_chunks_to_rebuild(&mut self) -> HashSet<Point3<i32>> {
        std::mem::take(&mut self.chunks_to_rebuild)
    }

    /// Outline boxes for the current frame.
    pub fn debug_bounding_boxes(&mut self) -> Vec<Aabb> {
        self.player.debug_bounding_boxes(&self.world)
    }

    /// Describes the block the player is aiming at.
    pub fn selected_block_information(&mut self) -> Option<String> {
        self.player.selected_block_information(&self.world)
    }

    /// The combined view-projection matrix as of the last update.
    pub fn view_projection(&self) -> Matrix4<f32> {
        self.camera_state.view_projection()
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera_state.resize(width, height);
    }

    /// Number of ticks simulated so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
