//! Mesh generation for voxel rendering.
//!
//! This module converts voxel data into vertex and index lists. Each solid voxel emits
//! one quad per face that borders an empty cell or the edge of the grid.
//!
//! # Architecture
//! - [`Mesh`]: A complete mesh with vertices and indices
//! - [`Face`]: A single face of a voxel with its corners and material

mod face;
mod mesh;

pub use face::Face;
pub use mesh::Mesh;
