//! Vertex data structures for voxel rendering.
//!
//! This module defines the vertex format produced by chunk meshing and handed to the
//! render backend.

use cgmath::{Point3, Vector3};

/// A vertex in the voxel rendering pipeline.
///
/// Represents a single point in 3D space with associated texture and lighting information.
///
/// # Memory Layout
/// - Position: 3x f32 (12 bytes)
/// - Texture Index: u32 (4 bytes)
/// - Texture Coordinates: [f32; 2] (8 bytes)
/// - Normal: 3x f32 (12 bytes)
///
/// Total size: 36 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position in world space
    position: [f32; 3],
    /// Index of the tile in the texture atlas
    texture_index: u32,
    /// Texture coordinates within the tile (0.0-1.0)
    tex_coords: [f32; 2],
    /// Outward normal of the face this vertex belongs to
    normal: [f32; 3],
}

impl Vertex {
    /// Creates a new vertex with the given parameters.
    ///
    /// # Arguments
    /// * `pos` - The 3D position of the vertex in world space
    /// * `texture_index` - Index of the tile in the texture atlas
    /// * `u` - U texture coordinate within the tile
    /// * `v` - V texture coordinate within the tile
    /// * `normal` - The face normal
    pub fn new(
        pos: Point3<f32>,
        texture_index: usize,
        u: f32,
        v: f32,
        normal: Vector3<f32>,
    ) -> Self {
        Vertex {
            position: pos.into(),
            texture_index: texture_index as u32,
            tex_coords: [u, v],
            normal: normal.into(),
        }
    }

    /// World space position.
    pub fn position(&self) -> Point3<f32> {
        self.position.into()
    }

    /// Atlas tile index.
    pub fn texture_index(&self) -> u32 {
        self.texture_index
    }

    /// Face normal.
    pub fn normal(&self) -> Vector3<f32> {
        self.normal.into()
    }
}
