//! # Camera Implementation
//!
//! This module derives the view from the player's state:
//! - The first-person view matrix, with an optional bobbing roll while walking
//! - The scripted view used by the demo flight
//! - A rotation-only view for sky rendering
//! - Projection matrix handling
//!
//! ## Key Components
//! - `PlayerCamera`: View matrices for a [`Player`]
//! - `Projection`: Manages perspective projection settings
//! - `CameraUniform`: Packed data structure for GPU shaders

use cgmath::*;
use noise::{NoiseFn, Perlin};

use crate::engine_state::player::Player;

/// Seed of the noise driving the bobbing roll.
pub const BOBBING_SEED: u32 = 42;
/// Frequency of the bobbing noise along the ground.
pub const BOBBING_FREQUENCY: f64 = 0.5;
/// Height the demo camera looks down towards.
pub const DEMO_TARGET_Y: f32 = 40.0;
/// How far ahead (in z) the demo camera looks.
pub const DEMO_TARGET_DISTANCE: f32 = 128.0;

/// First-person camera attached to the player's eye.
///
/// The camera owns no position of its own. Every matrix is computed from the player's
/// current state and settings.
#[derive(Debug)]
pub struct PlayerCamera {
    bobbing_noise: Perlin,
}

impl Default for PlayerCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerCamera {
    pub fn new() -> Self {
        Self {
            bobbing_noise: Perlin::new(BOBBING_SEED),
        }
    }

    /// Roll applied to the view at the given position.
    ///
    /// The noise is sampled along the ground, so the roll changes only while the player
    /// moves and stays put while standing still.
    pub fn bobbing_roll(&self, position: Point3<f32>, bobbing_angle: f32) -> Deg<f32> {
        let noise = self.bobbing_noise.get([
            position.x as f64 * BOBBING_FREQUENCY,
            0.0,
            position.z as f64 * BOBBING_FREQUENCY,
        ]);
        Deg(noise as f32 * bobbing_angle)
    }

    /// Calculates the view matrix for the player.
    ///
    /// # Arguments
    /// * `player` - The player whose eye the camera sits at
    ///
    /// # Returns
    /// A 4x4 view matrix. During the demo flight the camera looks ahead and down at the
    /// terrain instead of along the player's viewing direction.
    pub fn calc_matrix(&self, player: &Player) -> Matrix4<f32> {
        let settings = player.settings();

        if settings.is_demo_flight() {
            let position = player.position();
            let target = Point3::new(position.x, DEMO_TARGET_Y, position.z + DEMO_TARGET_DISTANCE);
            return Matrix4::look_at_rh(position, target, Vector3::unit_y());
        }

        let eye = player.calc_eye_position();

        let view = Matrix4::look_to_rh(eye, player.viewing_direction(), Vector3::unit_y());
        if settings.bobbing && !settings.god_mode {
            let roll = self.bobbing_roll(player.position(), settings.bobbing_angle);
            Matrix4::from_angle_z(roll) * view
        } else {
            view
        }
    }

    /// The view rotation without translation, for geometry drawn around the viewer.
    pub fn calc_normalized_matrix(&self, player: &Player) -> Matrix4<f32> {
        Matrix4::look_to_rh(
            Point3::origin(),
            player.viewing_direction(),
            Vector3::unit_y(),
        )
    }
}

/// Represents a camera's projection matrix and related parameters.
///
/// It manages the aspect ratio, field of view, and near/far clipping planes.
#[derive(Debug)]
pub struct Projection {
    /// Aspect ratio (width / height)
    aspect: f32,
    /// Vertical field of view in radians
    fovy: Rad<f32>,
    /// Near clipping plane distance
    znear: f32,
    /// Far clipping plane distance
    zfar: f32,
}

impl Projection {
    /// Creates a new projection with the given parameters.
    ///
    /// # Arguments
    /// * `width` - Viewport width in pixels
    /// * `height` - Viewport height in pixels
    /// * `fovy` - Vertical field of view (can be any type convertible to `Rad<f32>`)
    /// * `znear` - Near clipping plane distance
    /// * `zfar` - Far clipping plane distance
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    /// Updates the projection's aspect ratio for viewport resizing.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Calculates the perspective projection matrix.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// GPU-friendly representation of camera data for shaders.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    // cgmath types are not Pod, so matrices are stored as plain arrays
    view_proj: [[f32; 4]; 4],
    position: [f32; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraUniform {
    /// Creates a new camera uniform with an identity matrix and zero position.
    pub fn new() -> Self {
        Self {
            view_proj: Matrix4::identity().into(),
            position: [0.0, 0.0, 0.0, 0.0],
        }
    }

    /// Updates the view-projection matrix and eye position from the player.
    pub fn update_view_proj_and_pos(
        &mut self,
        camera: &PlayerCamera,
        projection: &Projection,
        player: &Player,
    ) {
        let view_proj = projection.calc_matrix() * camera.calc_matrix(player);
        self.view_proj = view_proj.into();
        let eye = player.calc_eye_position();
        self.position = [eye.x, eye.y, eye.z, 1.0];
    }

    pub fn view_proj(&self) -> Matrix4<f32> {
        self.view_proj.into()
    }

    /// Raw bytes as uploaded to a uniform buffer.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::config::Settings;

    fn player(settings: Settings) -> Player {
        Player::new(settings, Point3::new(3.0, 50.0, -7.0))
    }

    fn no_bobbing() -> Settings {
        Settings {
            bobbing: false,
            ..Settings::default()
        }
    }

    #[test]
    fn view_looks_along_the_viewing_direction() {
        let player = player(no_bobbing());
        let camera = PlayerCamera::new();
        let view = camera.calc_matrix(&player);

        let ahead = player.calc_eye_position() + player.viewing_direction() * 5.0;
        let in_view = view.transform_point(ahead);
        assert!(in_view.x.abs() < 1e-4 && in_view.y.abs() < 1e-4);
        assert!((in_view.z + 5.0).abs() < 1e-4);
    }

    #[test]
    fn bobbing_only_rolls_the_view() {
        let camera = PlayerCamera::new();
        let still = camera.calc_matrix(&player(no_bobbing()));
        let bobbing = camera.calc_matrix(&player(Settings::default()));

        let roll = camera.bobbing_roll(Point3::new(3.0, 50.0, -7.0), 2.0);
        let expected = Matrix4::from_angle_z(roll) * still;
        for (a, b) in [
            (bobbing.x, expected.x),
            (bobbing.y, expected.y),
            (bobbing.z, expected.z),
            (bobbing.w, expected.w),
        ] {
            assert!((a - b).magnitude() < 1e-5);
        }
    }

    #[test]
    fn demo_flight_looks_ahead_and_down() {
        let settings = Settings {
            god_mode: true,
            demo_flight: true,
            ..Settings::default()
        };
        let player = player(settings);
        let position = player.position();
        let view = PlayerCamera::new().calc_matrix(&player);

        let origin = view.transform_point(position);
        assert!(origin.x.abs() < 1e-3 && origin.y.abs() < 1e-3 && origin.z.abs() < 1e-3);

        let target = Point3::new(position.x, DEMO_TARGET_Y, position.z + DEMO_TARGET_DISTANCE);
        let in_view = view.transform_point(target);
        assert!(in_view.x.abs() < 1e-3 && in_view.y.abs() < 1e-3);
        assert!(in_view.z < 0.0);
    }

    #[test]
    fn normalized_view_ignores_the_position() {
        let camera = PlayerCamera::new();
        let view = camera.calc_normalized_matrix(&player(no_bobbing()));
        assert!(view.w.truncate().magnitude() < 1e-6);
    }

    #[test]
    fn uniform_carries_the_eye_position() {
        let player = player(no_bobbing());
        let mut uniform = CameraUniform::new();
        uniform.update_view_proj_and_pos(
            &PlayerCamera::new(),
            &Projection::new(800, 600, Deg(45.0), 0.1, 1000.0),
            &player,
        );
        assert_eq!(uniform.as_bytes().len(), 80);
        assert_eq!(uniform.position, [3.0, 50.5, -7.0, 1.0]);
    }
}
