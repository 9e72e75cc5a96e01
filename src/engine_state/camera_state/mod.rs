//! # Camera State Management
//!
//! This module turns the player's state into the matrices a renderer consumes:
//! - View matrix from the player's eye and viewing direction
//! - Projection matrix for the current viewport
//! - A packed uniform ready for upload
//!
//! ## Core Components
//! - `PlayerCamera`: View matrices derived from the player
//! - `Projection`: Manages the camera's projection matrix
//! - `CameraUniform`: GPU representation of camera data for shaders

use cgmath::{Deg, Matrix4, Point3};

use super::{player::Player, voxels::chunk::CHUNK_DIMENSION};

pub mod camera;

/// Default vertical field of view.
pub const FIELD_OF_VIEW: Deg<f32> = Deg(80.0);
/// Near plane distance. Matches the distance of the head-under-water probe.
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 1000.0;

/// Camera system: view, projection and the packed uniform.
pub struct CameraState {
    /// View matrices for the player
    pub camera: camera::PlayerCamera,
    /// Perspective projection for the current viewport
    pub projection: camera::Projection,
    /// GPU-optimized camera data for shaders
    pub camera_uniform: camera::CameraUniform,
    /// Chunk the eye was in at the last update
    current_chunk_position: Option<Point3<i32>>,
}

impl CameraState {
    /// Creates a camera state for a viewport of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            camera: camera::PlayerCamera::new(),
            projection: camera::Projection::new(width, height, FIELD_OF_VIEW, Z_NEAR, Z_FAR),
            camera_uniform: camera::CameraUniform::new(),
            current_chunk_position: None,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.projection.resize(width, height);
    }

    /// Refreshes the uniform from the player.
    ///
    /// # Returns
    /// - `Some(chunk_position)` if the eye moved into another chunk since the last update
    /// - `None` otherwise
    pub fn update(&mut self, player: &Player) -> Option<Point3<i32>> {
        self.camera_uniform
            .update_view_proj_and_pos(&self.camera, &self.projection, player);

        let eye = player.calc_eye_position();
        let chunk_position = Point3::new(
            (eye.x / CHUNK_DIMENSION as f32).floor() as i32,
            (eye.y / CHUNK_DIMENSION as f32).floor() as i32,
            (eye.z / CHUNK_DIMENSION as f32).floor() as i32,
        );

        if self.current_chunk_position == Some(chunk_position) {
            return None;
        }
        self.current_chunk_position = Some(chunk_position);
        Some(chunk_position)
    }

    /// The combined view-projection matrix as of the last update.
    pub fn view_projection(&self) -> Matrix4<f32> {
        self.camera_uniform.view_proj()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::config::Settings;

    #[test]
    fn chunk_changes_are_reported_once() {
        let mut state = CameraState::new(1280, 720);
        let mut player = Player::new(Settings::default(), Point3::new(1.0, 20.0, 1.0));

        assert_eq!(state.update(&player), Some(Point3::new(0, 1, 0)));
        assert_eq!(state.update(&player), None);

        player.set_position(Point3::new(-1.0, 20.0, 17.0));
        assert_eq!(state.update(&player), Some(Point3::new(-1, 1, 1)));
    }
}
