//! # Camera State Management
//!
//! This module handles all camera-related functionality including:
//! - Camera position and orientation tracking
//! - View and projection matrix calculations
//! - The [`CameraView`] interface the world reads every frame
//!
//! ## Core Components
//! - `Camera`: Represents the camera's position and orientation in 3D space
//! - `Projection`: Manages the camera's projection matrix
//! - `CameraState`: A camera paired with its projection

use cgmath::{Deg, Matrix4, Point3, Vector3};

pub mod camera;

/// What the world needs to know about the viewer.
pub trait CameraView {
    /// Eye position in world space.
    fn position(&self) -> Point3<f32>;

    /// Unit view direction.
    fn forward(&self) -> Vector3<f32>;

    /// The point `distance` units in front of the eye.
    fn project_point(&self, distance: f32) -> Point3<f32> {
        self.position() + self.forward() * distance
    }

    /// World to view space.
    fn view_matrix(&self) -> Matrix4<f32>;

    /// World to clip space.
    fn proj_view_matrix(&self) -> Matrix4<f32>;
}

/// A first-person camera with its projection.
///
/// # Fields
/// - `camera`: The current camera state (position, orientation)
/// - `projection`: Perspective settings
#[derive(Debug, Clone)]
pub struct CameraState {
    /// The current camera position and orientation
    pub camera: camera::Camera,
    /// Perspective settings
    pub projection: camera::Projection,
}

impl CameraState {
    /// Creates a camera at `position` looking along positive X.
    ///
    /// # Arguments
    /// * `position` - Eye position
    /// * `width` - Viewport width in pixels
    /// * `height` - Viewport height in pixels
    pub fn new(position: Point3<f32>, width: u32, height: u32) -> Self {
        Self {
            camera: camera::Camera::new(position, Deg(0.0), Deg(0.0)),
            projection: camera::Projection::new(width, height, Deg(45.0), 0.1, 1000.0),
        }
    }

    /// Moves the eye without turning.
    pub fn set_position(&mut self, position: Point3<f32>) {
        self.camera.position = position;
    }
}

impl CameraView for CameraState {
    fn position(&self) -> Point3<f32> {
        self.camera.position
    }

    fn forward(&self) -> Vector3<f32> {
        self.camera.get_view_vec()
    }

    fn view_matrix(&self) -> Matrix4<f32> {
        self.camera.calc_matrix()
    }

    fn proj_view_matrix(&self) -> Matrix4<f32> {
        self.projection.calc_matrix() * self.camera.calc_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_point_follows_forward() {
        let state = CameraState::new(Point3::new(1.0, 2.0, 3.0), 800, 600);
        let p = state.project_point(3.0);
        assert!((p.x - 4.0).abs() < 1e-5);
        assert!((p.y - 2.0).abs() < 1e-5);
        assert!((p.z - 3.0).abs() < 1e-5);
    }
}
