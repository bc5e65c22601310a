//! # World Errors
//!
//! Errors that can prevent a voxel world from being created.
//!
//! Only construction-time problems are represented here. Runtime queries (rays that leave
//! the grid, placements that clip the bounds, navigation steps that find no way forward)
//! resolve to safe defaults at the call site and never surface as a `WorldError`.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while configuring or constructing a world.
#[derive(Error, Debug)]
pub enum WorldError {
    /// The grid cannot be partitioned into whole chunks.
    #[error("grid_size {grid_size} must be an integer multiple of chunk_size {chunk_size}")]
    Configuration {
        /// Cells per grid axis.
        grid_size: usize,
        /// Cells per chunk axis.
        chunk_size: usize,
    },

    /// One of the grid dimensions was zero.
    #[error("grid_size, chunk_size and view_chunk_size must all be positive")]
    ZeroSize,

    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration text was not valid JSON for a `WorldConfig`.
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}
