//! Uniform blocks shared with the render backend.
//!
//! A [`UniformBlock`] holds a fixed number of light and matrix slots. The slot counts come
//! from the [`UniformLayout`] passed at construction; writes past the end are dropped with
//! a warning.

use cgmath::{Matrix4, SquareMatrix, Vector4};
use log::warn;

use crate::config::UniformLayout;

/// Slot of the view-projection matrix.
pub const PROJ_VIEW_SLOT: usize = 0;
/// Slot of the view matrix.
pub const VIEW_SLOT: usize = 1;
/// Slot of the placemark translation.
pub const PLACEMARK_SLOT: usize = 2;
/// Slot of the camera transform.
pub const CAMERA_SLOT: usize = 3;

/// A point light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    /// RGBA color
    pub color: Vector4<f32>,
    /// Homogeneous world position
    pub position: Vector4<f32>,
    /// Ambient, diffuse, specular and alpha
    pub power: Vector4<f32>,
}

impl Light {
    /// The overhead light used for the terrain (`alpha` 1.0) and the preview (`alpha` 0.5).
    pub fn overhead(alpha: f32) -> Self {
        Light {
            color: Vector4::new(1.0, 1.0, 1.0, 1.0),
            position: Vector4::new(0.0, 100.0, 0.0, 1.0),
            power: Vector4::new(0.3, 0.7, 0.0, alpha),
        }
    }
}

/// Fixed-capacity light and matrix storage for one draw pass.
#[derive(Debug, Clone)]
pub struct UniformBlock {
    lights: Vec<Light>,
    light_capacity: usize,
    matrices: Vec<Matrix4<f32>>,
}

impl UniformBlock {
    /// Creates a block with every matrix slot set to identity and no lights.
    pub fn new(layout: UniformLayout) -> Self {
        UniformBlock {
            lights: Vec::with_capacity(layout.lights),
            light_capacity: layout.lights,
            matrices: vec![Matrix4::identity(); layout.matrices],
        }
    }

    /// Adds a light, returning its slot, or `None` when every light slot is taken.
    pub fn add_light(&mut self, light: Light) -> Option<usize> {
        if self.lights.len() >= self.light_capacity {
            warn!(
                "Uniform block full: dropping light ({} slots)",
                self.light_capacity
            );
            return None;
        }
        self.lights.push(light);
        Some(self.lights.len() - 1)
    }

    /// Writes a matrix slot. Out of range slots are ignored.
    pub fn set_matrix(&mut self, slot: usize, matrix: Matrix4<f32>) {
        match self.matrices.get_mut(slot) {
            Some(m) => *m = matrix,
            None => warn!(
                "Uniform block has {} matrix slots, ignoring write to slot {}",
                self.matrices.len(),
                slot
            ),
        }
    }

    /// Lights in slot order.
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Matrices in slot order.
    pub fn matrices(&self) -> &[Matrix4<f32>] {
        &self.matrices
    }

    /// Reads a matrix slot.
    pub fn matrix(&self, slot: usize) -> Option<&Matrix4<f32>> {
        self.matrices.get(slot)
    }
}
