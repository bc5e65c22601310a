//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a fixed-size cubic region of the grid that
//! owns the renderable mesh for its voxels.
//!
//! Voxel data itself lives in the grid's flat cell array; a chunk only records where it
//! sits and the mesh most recently generated for it. Chunks are created once when the
//! grid is built and their meshes are rebuilt in place.

use cgmath::Point3;

use crate::engine_state::rendering::meshing::Mesh;

/// Index of a chunk: `cx + n * (cy + n * cz)` where `n` is the number of chunks per axis.
pub type ChunkKey = usize;

/// A cubic subdivision of the voxel grid.
#[derive(Debug)]
pub struct Chunk {
    /// Key of this chunk within the grid.
    pub key: ChunkKey,

    /// The position of this chunk in chunk coordinates (not cell coordinates).
    pub position: Point3<usize>,

    /// Mesh generated from this chunk's voxels.
    mesh: Mesh,
}

impl Chunk {
    /// Creates a chunk with an empty mesh.
    ///
    /// # Arguments
    /// * `key` - The chunk key
    /// * `position` - The chunk coordinates of the new chunk
    pub fn new(key: ChunkKey, position: Point3<usize>) -> Self {
        Chunk {
            key,
            position,
            mesh: Mesh::new(),
        }
    }

    /// The mesh from the last rebuild.
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Replaces the chunk's mesh.
    pub fn set_mesh(&mut self, mesh: Mesh) {
        self.mesh = mesh;
    }

    /// Grid-local index of this chunk's first cell along each axis.
    pub fn min_cell(&self, chunk_size: usize) -> Point3<usize> {
        Point3::new(
            self.position.x * chunk_size,
            self.position.y * chunk_size,
            self.position.z * chunk_size,
        )
    }
}
