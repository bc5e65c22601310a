//! # Rendering Module
//!
//! The boundary between the voxel world and whatever draws it.
//!
//! The world produces meshes and uniform blocks; a [`RenderBackend`] turns them into GPU
//! resources and draw calls. Shader compilation, texture upload and buffer formats are the
//! backend's business. [`HeadlessBackend`] records what it is given and is used by the demo
//! binary and the tests.
//!
//! ## Key Components
//!
//! * [`meshing`] - Conversion of voxels into vertex and index lists
//! * [`uniforms`] - Fixed-capacity light and matrix blocks
//! * [`Vertex`] - The vertex format shared with the backend

use cgmath::Point3;

pub mod meshing;
pub mod uniforms;
mod vertex;

pub use vertex::Vertex;

use meshing::Mesh;
use uniforms::UniformBlock;

/// Drawable slots owned by the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshSlot {
    /// Combined geometry of every chunk in the view window.
    Terrain,
    /// The placement preview.
    Preview,
}

/// A rendering collaborator.
pub trait RenderBackend {
    /// Replaces the geometry stored in `slot`.
    fn upload_mesh(&mut self, slot: MeshSlot, mesh: &Mesh);

    /// Replaces the uniform data used when drawing `slot`.
    fn upload_uniforms(&mut self, slot: MeshSlot, uniforms: &UniformBlock);

    /// Draws the geometry stored in `slot`.
    fn draw_mesh(&mut self, slot: MeshSlot);

    /// Draws a set of particles.
    fn draw_points(&mut self, points: &[Point3<f32>], dt: f32);
}

/// A render backend that draws nothing and remembers what it was asked to do.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    terrain: Mesh,
    preview: Mesh,
    /// Number of mesh uploads received.
    pub uploads: usize,
    /// Number of uniform uploads received.
    pub uniform_uploads: usize,
    /// Slots drawn, in order.
    pub draws: Vec<MeshSlot>,
    /// Particle count of the last point draw.
    pub last_point_count: usize,
}

impl HeadlessBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// The mesh most recently uploaded to `slot`.
    pub fn mesh(&self, slot: MeshSlot) -> &Mesh {
        match slot {
            MeshSlot::Terrain => &self.terrain,
            MeshSlot::Preview => &self.preview,
        }
    }
}

impl RenderBackend for HeadlessBackend {
    fn upload_mesh(&mut self, slot: MeshSlot, mesh: &Mesh) {
        match slot {
            MeshSlot::Terrain => self.terrain = mesh.clone(),
            MeshSlot::Preview => self.preview = mesh.clone(),
        }
        self.uploads += 1;
    }

    fn upload_uniforms(&mut self, _slot: MeshSlot, _uniforms: &UniformBlock) {
        self.uniform_uploads += 1;
    }

    fn draw_mesh(&mut self, slot: MeshSlot) {
        self.draws.push(slot);
    }

    fn draw_points(&mut self, points: &[Point3<f32>], _dt: f32) {
        self.last_point_count = points.len();
    }
}
