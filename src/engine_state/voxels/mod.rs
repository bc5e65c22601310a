//! # Voxel Storage
//!
//! This module holds the voxel data of the world and the queries made against it.
//!
//! ## Architecture
//!
//! * **Block**: Atlas ids, materials and block faces
//! * **Chunk**: Fixed-size cubic regions that own the renderable meshes
//! * **Grid**: The dense cell store, ray marching, streaming window and collision queries
//! * **Ray**: Rays and the cell-by-cell march used by every ray query
//! * **Terrain**: Starting geometry generated when the grid is created
//!
//! ## Data Flow
//!
//! 1. The grid receives a geometry edit
//! 2. Affected chunks (and face-sharing neighbours) are flagged stale
//! 3. Stale chunks inside the view window are remeshed on the next rebuild
//! 4. The world controller merges the window's meshes and uploads them

pub mod block;
pub mod chunk;
pub mod grid;
pub mod ray;
pub mod terrain;
