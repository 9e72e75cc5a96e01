//! # Player
//!
//! The first-person player: kinematic state, the per-tick simulation step, block
//! targeting and the place/remove actions.
//!
//! ## Tick
//!
//! Each call to [`Player::tick`] runs, in order:
//! 1. mouse look (yaw/pitch from the accumulated mouse delta)
//! 2. submersion update
//! 3. movement intent from the held keys
//! 4. integration with vertical then horizontal collision resolution
//! 5. viewing direction recompute
//!
//! The player never stores the world. Ticks and queries borrow it immutably; the
//! place/remove actions borrow it mutably for a single-cell write.

use std::fmt;

use cgmath::{Deg, Point3, Vector3};
use log::debug;

use super::config::Settings;
use super::physics::aabb::Aabb;
use super::physics::neighborhood::{gather_adjacent_block_positions, voxel_containing};
use super::physics::ray_intersection::{Intersection, RayBlockSelector};
use super::physics::submersion::detect_submersion;
use super::voxels::block::{
    aabb_for_block_at,
    block_type::{BlockType, BLOCK_COUNT},
    Block, BlockTypeSize,
};
use super::voxels::world::BlockAccess;

pub mod input;
pub mod movement;

use input::PlayerInput;

/// Half extents of the player's box.
pub const PLAYER_DIMENSIONS: Vector3<f32> = Vector3::new(0.3, 0.7, 0.3);
/// Distance from the top of the player's box down to the eye.
pub const EYE_OFFSET: f32 = 0.2;
/// Yaw of a freshly created player, in degrees.
pub const INITIAL_YAW: f32 = 135.0;

/// The player's kinematic state and targeting.
pub struct Player {
    settings: Settings,
    position: Point3<f32>,
    yaw: Deg<f32>,
    pitch: Deg<f32>,
    viewing_direction: Vector3<f32>,
    /// Movement intent accumulated during the current tick.
    movement: Vector3<f32>,
    acc: Vector3<f32>,
    /// Vertical speed from gravity and jumps, kept apart from `acc`.
    gravity: f32,
    walking_speed: f32,
    touching_ground: bool,
    jump: bool,
    swimming: bool,
    head_under_water: bool,
    selected_block_type: BlockTypeSize,
    input: PlayerInput,
    selector: RayBlockSelector,
}

impl Player {
    /// Creates a player at `position` using the given settings.
    pub fn new(settings: Settings, position: Point3<f32>) -> Self {
        let walking_speed = settings.walking_speed;
        let mut player = Self {
            settings,
            position,
            yaw: Deg(INITIAL_YAW),
            pitch: Deg(0.0),
            viewing_direction: Vector3::new(0.0, 0.0, -1.0),
            movement: Vector3::new(0.0, 0.0, 0.0),
            acc: Vector3::new(0.0, 0.0, 0.0),
            gravity: 0.0,
            walking_speed,
            touching_ground: false,
            jump: false,
            swimming: false,
            head_under_water: false,
            selected_block_type: BlockType::GRASS.id(),
            input: PlayerInput::new(),
            selector: RayBlockSelector::new(),
        };
        player.update_viewing_direction();
        player
    }

    /// Returns the player to a neutral state: no acceleration, no pending movement and no
    /// vertical speed. Used on (re)spawn.
    pub fn reset(&mut self) {
        self.acc = Vector3::new(0.0, 0.0, 0.0);
        self.movement = Vector3::new(0.0, 0.0, 0.0);
        self.gravity = 0.0;
        self.jump = false;
        self.input.reset();
    }

    /// Advances the simulation by one step.
    pub fn tick<W: BlockAccess>(&mut self, world: &W) {
        let (dx, dy) = self.input.take_mouse_delta();
        self.rotate_yaw(dx * self.settings.mouse_sensitivity);
        self.rotate_pitch(dy * self.settings.mouse_sensitivity);

        self.update_swim_status(world);
        self.process_movement();
        self.update_player_position(world);
        self.update_viewing_direction();

        self.movement = Vector3::new(0.0, 0.0, 0.0);
        self.input.advance();
    }

    /// Recomputes the swimming and head-under-water flags.
    pub fn update_swim_status<W: BlockAccess>(&mut self, world: &W) {
        let state = detect_submersion(
            world,
            self.position,
            PLAYER_DIMENSIONS,
            self.calc_eye_position(),
            self.viewing_direction,
        );
        self.swimming = state.swimming;
        self.head_under_water = state.head_under_water;
    }

    /// Returns the block the player is aiming at, if any.
    pub fn select_target_block<W: BlockAccess>(&mut self, world: &W) -> Option<Intersection> {
        let eye = self.calc_eye_position();
        self.selector.select(
            world,
            voxel_containing(self.position),
            eye,
            self.viewing_direction,
        )
    }

    /// Describes the targeted block and its type, or `None` when nothing is targeted.
    pub fn selected_block_information<W: BlockAccess>(&mut self, world: &W) -> Option<String> {
        let intersection = self.select_target_block(world)?;
        let block_type = world.block_type_at(intersection.block_position);
        Some(format!(
            "{} ({:?}, t: {})",
            intersection,
            BlockType::get_block_type_from_int(block_type),
            block_type
        ))
    }

    /// Places a block of the given type against the targeted block.
    ///
    /// Nothing happens when no block is targeted, when the targeted block does not accept
    /// attachments, or when the new block would overlap the player. Returns true if the
    /// block was written.
    pub fn place_block<W: BlockAccess>(&mut self, world: &mut W, block_type: BlockTypeSize) -> bool {
        let Some(intersection) = self.select_target_block(&*world) else {
            debug!("No block targeted, nothing to place against");
            return false;
        };

        let center_type = world.block_type_at(intersection.block_position);
        if !Block::get_properties_from_int(center_type).player_can_attach_blocks {
            debug!(
                "Block at {:?} does not accept attachments",
                intersection.block_position
            );
            return false;
        }

        let block_position = intersection.calc_adjacent_block_pos();
        if aabb_for_block_at(block_position).overlaps(&self.aabb()) {
            debug!("Refusing to place a block inside the player at {:?}", block_position);
            return false;
        }

        world.set_block_at(block_position, block_type, true, false);
        true
    }

    /// Removes the targeted block. Returns true if a block was targeted.
    pub fn remove_block<W: BlockAccess>(&mut self, world: &mut W) -> bool {
        let Some(intersection) = self.select_target_block(&*world) else {
            debug!("No block targeted, nothing to remove");
            return false;
        };
        world.set_block_at(intersection.block_position, BlockType::AIR.id(), true, true);
        true
    }

    /// Steps the selected block type up or down, wrapping around the valid range.
    pub fn cycle_block_types(&mut self, up_down: i32) {
        let count = BLOCK_COUNT as i32;
        let next = self.selected_block_type as i32 + up_down;
        self.selected_block_type = if next >= count {
            0
        } else if next < 0 {
            (count - 1) as BlockTypeSize
        } else {
            next as BlockTypeSize
        };
    }

    /// Boxes worth outlining for the current frame: the targeted block when
    /// `placing_box` is set, and the player plus its collision neighborhood when
    /// `debug_collision` is set.
    pub fn debug_bounding_boxes<W: BlockAccess>(&mut self, world: &W) -> Vec<Aabb> {
        let mut boxes = Vec::new();

        if self.settings.placing_box {
            if let Some(intersection) = self.select_target_block(world) {
                let block_type = world.block_type_at(intersection.block_position);
                if Block::get_properties_from_int(block_type).should_render_bounding_box {
                    boxes.push(aabb_for_block_at(intersection.block_position));
                }
            }
        }

        if self.settings.debug_collision {
            boxes.push(self.aabb());
            boxes.extend(
                gather_adjacent_block_positions(self.position)
                    .iter()
                    .map(|p| aabb_for_block_at(p.position)),
            );
        }

        boxes
    }

    /// The player's box at its current position.
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.position, PLAYER_DIMENSIONS)
    }

    /// The eye sits [`EYE_OFFSET`] below the top of the player's box.
    pub fn calc_eye_position(&self) -> Point3<f32> {
        let aabb = self.aabb();
        Point3::new(
            aabb.position.x,
            aabb.position.y + aabb.dimensions.y - EYE_OFFSET,
            aabb.position.z,
        )
    }

    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    /// Teleports the player. Kinematic state is left untouched; call [`Player::reset`]
    /// for a respawn.
    pub fn set_position(&mut self, position: Point3<f32>) {
        self.position = position;
    }

    /// Unit vector the player is looking along.
    pub fn viewing_direction(&self) -> Vector3<f32> {
        self.viewing_direction
    }

    pub fn yaw(&self) -> Deg<f32> {
        self.yaw
    }

    pub fn pitch(&self) -> Deg<f32> {
        self.pitch
    }

    pub fn acceleration(&self) -> Vector3<f32> {
        self.acc
    }

    /// Current vertical speed from gravity and jumps.
    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    pub fn walking_speed(&self) -> f32 {
        self.walking_speed
    }

    pub fn is_touching_ground(&self) -> bool {
        self.touching_ground
    }

    /// True while a jump is requested but not yet performed.
    pub fn is_jump_requested(&self) -> bool {
        self.jump
    }

    pub fn is_swimming(&self) -> bool {
        self.swimming
    }

    pub fn is_head_under_water(&self) -> bool {
        self.head_under_water
    }

    pub fn selected_block_type(&self) -> BlockTypeSize {
        self.selected_block_type
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "player (x: {:.2}, y: {:.2}, z: {:.2} | x: {:.2}, y: {:.2}, z: {:.2} | b: {} | gravity: {:.2} | x: {:.2}, y: {:.2}, z: {:.2})",
            self.position.x,
            self.position.y,
            self.position.z,
            self.viewing_direction.x,
            self.viewing_direction.y,
            self.viewing_direction.z,
            self.selected_block_type,
            self.gravity,
            self.movement.x,
            self.movement.y,
            self.movement.z,
        )
    }
}
