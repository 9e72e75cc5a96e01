//! Mouse look, movement intent and the motion integrator.

use cgmath::{Angle, Deg, InnerSpace, Vector3};

use super::{Player, PLAYER_DIMENSIONS};
use crate::engine_state::physics::collision::{horizontal_hit_test, vertical_hit_test};
use crate::engine_state::voxels::world::BlockAccess;

/// Pitch never reaches straight up or down.
pub const MAX_PITCH: f32 = 89.0;

/// Height the demo flight keeps above the terrain.
pub const DEMO_FLIGHT_ALTITUDE: i32 = 16;
/// How far ahead (in z) the demo flight samples the terrain.
pub const DEMO_FLIGHT_LOOKAHEAD: i32 = 8;
/// Share of the altitude error corrected per tick.
pub const DEMO_FLIGHT_DAMPING: f32 = 128.0;
pub const DEMO_FLIGHT_MIN_Y: f32 = 40.0;
pub const DEMO_FLIGHT_MAX_Y: f32 = 128.0;

/// Scales `acc` down uniformly so that its dominant axis does not exceed `max_speed`.
///
/// A non-positive `max_speed` stops the player instead of dividing by zero.
pub fn clamp_to_walking_speed(acc: Vector3<f32>, max_speed: f32) -> Vector3<f32> {
    let max = acc.x.abs().max(acc.y.abs()).max(acc.z.abs());
    if max <= max_speed {
        return acc;
    }
    if max_speed <= f32::EPSILON {
        return Vector3::new(0.0, 0.0, 0.0);
    }
    acc / (max / max_speed)
}

/// Wraps a yaw angle into `[0, 360)`.
pub fn wrap_yaw(yaw: f32) -> f32 {
    // rem_euclid rounds tiny negative angles up to exactly 360.
    let wrapped = yaw.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

impl Player {
    /// Turns the player around the vertical axis.
    pub fn rotate_yaw(&mut self, diff: f32) {
        self.yaw = Deg(wrap_yaw(self.yaw.0 + diff));
    }

    /// Tilts the view. A positive `diff` looks up.
    pub fn rotate_pitch(&mut self, diff: f32) {
        self.pitch = Deg((self.pitch.0 - diff).clamp(-MAX_PITCH, MAX_PITCH));
    }

    /// Moves along the viewing direction. Pitch only matters while flying or swimming.
    pub fn walk_forward(&mut self) {
        let (yaw_sin, yaw_cos) = self.yaw.sin_cos();
        if self.settings.god_mode || self.swimming {
            let (pitch_sin, pitch_cos) = self.pitch.sin_cos();
            self.movement.x += self.walking_speed * yaw_sin * pitch_cos;
            self.movement.y -= self.walking_speed * pitch_sin;
            self.movement.z -= self.walking_speed * yaw_cos * pitch_cos;
        } else {
            self.movement.x += self.walking_speed * yaw_sin;
            self.movement.z -= self.walking_speed * yaw_cos;
        }
    }

    pub fn walk_backwards(&mut self) {
        let (yaw_sin, yaw_cos) = self.yaw.sin_cos();
        if self.settings.god_mode || self.swimming {
            let (pitch_sin, pitch_cos) = self.pitch.sin_cos();
            self.movement.x -= self.walking_speed * yaw_sin * pitch_cos;
            self.movement.y += self.walking_speed * pitch_sin;
            self.movement.z += self.walking_speed * yaw_cos * pitch_cos;
        } else {
            self.movement.x -= self.walking_speed * yaw_sin;
            self.movement.z += self.walking_speed * yaw_cos;
        }
    }

    pub fn strafe_left(&mut self) {
        self.strafe(self.yaw - Deg(90.0));
    }

    pub fn strafe_right(&mut self) {
        self.strafe(self.yaw + Deg(90.0));
    }

    fn strafe(&mut self, direction: Deg<f32>) {
        let (sin, cos) = direction.sin_cos();
        self.movement.x += self.walking_speed * sin;
        self.movement.z -= self.walking_speed * cos;
    }

    /// Requests a jump. Ignored unless the player stands on something.
    pub fn request_jump(&mut self) {
        if self.touching_ground {
            self.jump = true;
        }
    }

    /// Turns the held keys into movement intent for this tick.
    pub(super) fn process_movement(&mut self) {
        use winit::keyboard::KeyCode;

        self.walking_speed = if self.input.is_held(KeyCode::ShiftLeft) && self.touching_ground {
            self.settings.walking_speed * self.settings.running_factor
        } else {
            self.settings.walking_speed
        };

        if self.input.is_held(KeyCode::KeyW) {
            self.walk_forward();
        }
        if self.input.is_held(KeyCode::KeyS) {
            self.walk_backwards();
        }
        if self.input.is_held(KeyCode::KeyA) {
            self.strafe_left();
        }
        if self.input.is_held(KeyCode::KeyD) {
            self.strafe_right();
        }
    }

    /// Integrates one tick of motion and resolves collisions against the world.
    pub(super) fn update_player_position<W: BlockAccess>(&mut self, world: &W) {
        if self.settings.is_demo_flight() {
            self.demo_flight(world);
            return;
        }

        let friction = self.settings.friction;
        for axis in 0..3 {
            if self.acc[axis].abs() > 0.0 {
                self.acc[axis] -= self.acc[axis] * friction;
            }
        }

        self.acc = clamp_to_walking_speed(self.acc, self.walking_speed);
        self.acc += self.movement;

        self.apply_gravity();

        let origin = self.position;
        self.position.y += self.acc.y + self.gravity;

        if !self.settings.god_mode {
            if vertical_hit_test(world, origin, &mut self.position, PLAYER_DIMENSIONS) {
                self.gravity = 0.0;
                if self.jump {
                    self.jump = false;
                    self.gravity = self.settings.jump_intensity;
                    self.touching_ground = false;
                } else {
                    self.touching_ground = true;
                }
            } else {
                self.touching_ground = false;
            }
        }

        let origin = self.position;
        self.position.x += self.acc.x;
        self.position.z += self.acc.z;

        if !self.settings.god_mode {
            horizontal_hit_test(world, origin, &mut self.position, PLAYER_DIMENSIONS);
        }
    }

    fn apply_gravity(&mut self) {
        if self.settings.god_mode {
            self.gravity = 0.0;
            return;
        }

        let (gravity, max_gravity) = if self.swimming {
            (self.settings.gravity_swimming, self.settings.max_gravity_swimming)
        } else {
            (self.settings.gravity, self.settings.max_gravity)
        };

        if self.gravity > -max_gravity {
            self.gravity -= gravity;
        }
        if self.gravity < -max_gravity {
            self.gravity = -max_gravity;
        }
    }

    /// Scripted flight: constant speed along +z, easing towards a fixed altitude above
    /// the terrain ahead.
    fn demo_flight<W: BlockAccess>(&mut self, world: &W) {
        self.position.z += self.settings.walking_speed;

        let max_height = world.max_terrain_height_at(
            self.position.x.floor() as i32,
            self.position.z.floor() as i32 + DEMO_FLIGHT_LOOKAHEAD,
        ) + DEMO_FLIGHT_ALTITUDE;

        self.position.y += (max_height as f32 - self.position.y) / DEMO_FLIGHT_DAMPING;
        self.position.y = self.position.y.clamp(DEMO_FLIGHT_MIN_Y, DEMO_FLIGHT_MAX_Y);
    }

    /// Recomputes the unit viewing direction from yaw and pitch.
    pub(super) fn update_viewing_direction(&mut self) {
        let (yaw_sin, yaw_cos) = self.yaw.sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.sin_cos();
        let direction = Vector3::new(yaw_sin * pitch_cos, -pitch_sin, -pitch_cos * yaw_cos);

        if direction.magnitude2() > f32::EPSILON {
            self.viewing_direction = direction.normalize();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::config::Settings;
    use crate::engine_state::voxels::block::block_type::BlockType;
    use crate::engine_state::voxels::world::World;
    use cgmath::Point3;
    use winit::keyboard::KeyCode;

    fn settings() -> Settings {
        Settings::default()
    }

    #[test]
    fn yaw_wraps_to_the_positive_range() {
        let mut player = Player::new(settings(), Point3::new(0.0, 0.0, 0.0));
        player.rotate_yaw(-135.0 - 10.0);
        assert!((player.yaw().0 - 350.0).abs() < 1e-4);
        player.rotate_yaw(20.0);
        assert!((player.yaw().0 - 10.0).abs() < 1e-4);
    }

    #[test]
    fn tiny_negative_step_below_zero_stays_under_360() {
        let mut player = Player::new(settings(), Point3::new(0.0, 0.0, 0.0));
        player.rotate_yaw(-135.0);
        assert_eq!(player.yaw().0, 0.0);

        player.rotate_yaw(-1e-6);
        assert!(
            (0.0..360.0).contains(&player.yaw().0),
            "yaw left [0, 360): {}",
            player.yaw().0
        );
        assert!((0.0..360.0).contains(&wrap_yaw(-1e-6)));
        assert!((0.0..360.0).contains(&wrap_yaw(360.0)));
    }

    #[test]
    fn pitch_is_clamped() {
        let mut player = Player::new(settings(), Point3::new(0.0, 0.0, 0.0));
        player.rotate_pitch(1000.0);
        assert_eq!(player.pitch(), Deg(-MAX_PITCH));
        player.rotate_pitch(-1000.0);
        assert_eq!(player.pitch(), Deg(MAX_PITCH));
    }

    #[test]
    fn viewing_direction_stays_normalized() {
        let mut player = Player::new(settings(), Point3::new(0.0, 0.0, 0.0));
        for (yaw, pitch) in [(17.0, 30.0), (200.0, -70.0), (359.0, 89.0)] {
            player.rotate_yaw(yaw);
            player.rotate_pitch(pitch);
            player.update_viewing_direction();
            assert!((player.viewing_direction().magnitude() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn clamp_scales_the_dominant_axis_down() {
        let clamped = clamp_to_walking_speed(Vector3::new(0.1, 0.0, -0.05), 0.025);
        assert!((clamped.x - 0.025).abs() < 1e-6);
        assert!((clamped.z + 0.0125).abs() < 1e-6);

        let slow = Vector3::new(0.01, 0.0, 0.0);
        assert_eq!(clamp_to_walking_speed(slow, 0.025), slow);
        assert_eq!(
            clamp_to_walking_speed(slow, 0.0),
            Vector3::new(0.0, 0.0, 0.0)
        );
    }

    #[test]
    fn walking_ignores_pitch_on_the_ground() {
        let mut player = Player::new(settings(), Point3::new(0.0, 0.0, 0.0));
        player.rotate_pitch(-45.0);
        player.walk_forward();
        assert_eq!(player.movement.y, 0.0);
        let horizontal = Vector3::new(player.movement.x, 0.0, player.movement.z).magnitude();
        assert!((horizontal - player.walking_speed()).abs() < 1e-6);
    }

    #[test]
    fn flying_follows_the_pitch() {
        let settings = Settings {
            god_mode: true,
            ..Settings::default()
        };
        let mut player = Player::new(settings, Point3::new(0.0, 0.0, 0.0));
        player.rotate_pitch(45.0);
        player.walk_forward();
        assert!(player.movement.y > 0.0);
    }

    #[test]
    fn walking_speed_is_capped_over_many_ticks() {
        let world = World::flat(2, 9);
        let mut player = Player::new(settings(), Point3::new(0.0, 10.20001, 0.0));
        player.input.set_key(KeyCode::KeyW, true);
        player.input.set_key(KeyCode::KeyD, true);

        for _ in 0..100 {
            let before = player.position();
            player.tick(&world);
            let step = player.position() - before;
            // Clamped acceleration plus this tick's intent from two keys.
            let limit = player.walking_speed() * 3.0 + 1e-5;
            assert!(step.x.abs() <= limit && step.z.abs() <= limit);
        }
    }

    #[test]
    fn running_only_applies_on_the_ground() {
        let world = World::new();
        let mut player = Player::new(settings(), Point3::new(0.0, 50.0, 0.0));
        player.input.set_key(KeyCode::ShiftLeft, true);
        player.tick(&world);
        assert_eq!(player.walking_speed(), player.settings().walking_speed);
    }

    #[test]
    fn jump_is_performed_once() {
        let mut world = World::new();
        world.set_block_at(Point3::new(0, 9, 0), BlockType::STONE.id(), false, false);
        let mut player = Player::new(settings(), Point3::new(0.0, 10.2, 0.0));

        player.tick(&world);
        assert!(player.is_touching_ground());

        player.request_jump();
        assert!(player.is_jump_requested());
        player.tick(&world);
        assert_eq!(player.gravity(), player.settings().jump_intensity);
        assert!(!player.is_jump_requested());
        assert!(!player.is_touching_ground());

        let height = player.position().y;
        player.tick(&world);
        assert!(player.gravity() < player.settings().jump_intensity);
        assert!(player.position().y > height);
    }

    #[test]
    fn jump_requests_in_the_air_are_ignored() {
        let mut player = Player::new(settings(), Point3::new(0.0, 50.0, 0.0));
        player.request_jump();
        assert!(!player.is_jump_requested());
    }

    #[test]
    fn god_mode_ignores_gravity_and_blocks() {
        let world = World::flat(1, 9);
        let settings = Settings {
            god_mode: true,
            ..Settings::default()
        };
        let mut player = Player::new(settings, Point3::new(0.0, 9.0, 0.0));
        for _ in 0..10 {
            player.tick(&world);
        }
        assert_eq!(player.gravity(), 0.0);
        assert_eq!(player.position(), Point3::new(0.0, 9.0, 0.0));
    }

    #[test]
    fn demo_flight_moves_forward_and_stays_in_band() {
        let world = World::flat(1, 9);
        let settings = Settings {
            god_mode: true,
            demo_flight: true,
            ..Settings::default()
        };
        let mut player = Player::new(settings, Point3::new(0.0, 200.0, 0.0));
        player.tick(&world);
        assert!((player.position().z - player.settings().walking_speed).abs() < 1e-6);
        assert_eq!(player.position().y, DEMO_FLIGHT_MAX_Y);

        player.set_position(Point3::new(0.0, 0.0, 0.0));
        player.tick(&world);
        assert_eq!(player.position().y, DEMO_FLIGHT_MIN_Y);
    }
}
