//! # World Configuration
//!
//! Construction parameters for a voxel world, loadable from JSON.
//!
//! Every field has a default so a config file only needs to name the values it overrides:
//!
//! ```json
//! { "grid_size": 32, "chunk_size": 8, "terrain": { "kind": "flat", "height": 0 } }
//! ```

use std::path::Path;

use cgmath::{Point3, Vector3};
use log::info;
use serde::Deserialize;

use crate::error::WorldError;

/// Top level configuration for a world session.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Cells per grid axis.
    pub grid_size: usize,
    /// Cells per chunk axis. Must divide `grid_size`.
    pub chunk_size: usize,
    /// Streaming radius around the player's chunk, in chunks.
    pub view_chunk_size: usize,
    /// Gravity acceleration applied to every body.
    pub gravity: [f32; 3],
    /// Terrain generator used to fill the grid at construction.
    pub terrain: TerrainConfig,
    /// Uniform slot counts handed to the render backend.
    pub uniforms: UniformLayout,
    /// Point the AI-driven character walks towards.
    pub ai_destination: [f32; 3],
    /// Navigator tuning.
    pub navigation: NavigationConfig,
    /// Particle burst tuning.
    pub particles: ParticleConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            grid_size: 64,
            chunk_size: 8,
            view_chunk_size: 4,
            gravity: [0.0, -10.0, 0.0],
            terrain: TerrainConfig::default(),
            uniforms: UniformLayout::default(),
            ai_destination: [0.0, 2.0, 0.0],
            navigation: NavigationConfig::default(),
            particles: ParticleConfig::default(),
        }
    }
}

impl WorldConfig {
    /// Creates a config with the given grid dimensions and defaults for everything else.
    pub fn with_sizes(grid_size: usize, chunk_size: usize, view_chunk_size: usize) -> Self {
        Self {
            grid_size,
            chunk_size,
            view_chunk_size,
            ..Self::default()
        }
    }

    /// Parses a config from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, WorldError> {
        let config: WorldConfig = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Reads and parses a JSON config file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, WorldError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| WorldError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&text)?;
        info!("Loaded world config from {}", path.display());
        Ok(config)
    }

    /// Checks the grid dimensions.
    ///
    /// # Errors
    /// * [`WorldError::ZeroSize`] if any dimension is zero
    /// * [`WorldError::Configuration`] if `grid_size` is not a multiple of `chunk_size`
    pub fn validate(&self) -> Result<(), WorldError> {
        if self.grid_size == 0 || self.chunk_size == 0 || self.view_chunk_size == 0 {
            return Err(WorldError::ZeroSize);
        }
        if self.grid_size % self.chunk_size != 0 {
            return Err(WorldError::Configuration {
                grid_size: self.grid_size,
                chunk_size: self.chunk_size,
            });
        }
        Ok(())
    }

    /// Gravity as a vector.
    pub fn gravity(&self) -> Vector3<f32> {
        self.gravity.into()
    }

    /// AI destination as a point.
    pub fn ai_destination(&self) -> Point3<f32> {
        self.ai_destination.into()
    }
}

/// How the grid is filled when the world is created.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TerrainConfig {
    /// Nothing but air.
    Empty,
    /// A level floor: every cell below `height` is solid.
    Flat {
        /// World y of the floor surface.
        height: i32,
    },
    /// A rolling height map sampled from 2D Perlin noise.
    Perlin {
        /// Noise seed.
        seed: u32,
        /// Scale applied to world x/z before sampling.
        scale: f64,
        /// Peak deviation from `base_height`, in cells.
        amplitude: f64,
        /// Mean surface height.
        base_height: i32,
    },
}

impl Default for TerrainConfig {
    fn default() -> Self {
        TerrainConfig::Perlin {
            seed: 0,
            scale: 0.04,
            amplitude: 4.0,
            base_height: -2,
        }
    }
}

/// Number of slots preallocated in each uniform block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UniformLayout {
    /// Light slots.
    pub lights: usize,
    /// Matrix slots.
    pub matrices: usize,
}

impl Default for UniformLayout {
    fn default() -> Self {
        Self {
            lights: 1,
            matrices: 4,
        }
    }
}

/// Tuning for the single step navigator.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Longest distance a single step may cover.
    pub step_length: f32,
    /// Distance at which the destination counts as reached.
    pub arrive_radius: f32,
    /// Extra cost added to steps that climb.
    pub climb_penalty: f32,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            step_length: 1.0,
            arrive_radius: 0.5,
            climb_penalty: 0.25,
        }
    }
}

/// Tuning for explosion particle bursts.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Particles spawned per burst.
    pub count: usize,
    /// Seconds a particle lives.
    pub lifetime: f32,
    /// Random spread added to each particle's launch velocity.
    pub spread: f32,
    /// Seed for the jitter generator.
    pub seed: u64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 50,
            lifetime: 1.0,
            spread: 2.0,
            seed: 0x5eed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let json = r#"{ "grid_size": 32, "terrain": { "kind": "flat", "height": 3 } }"#;
        let config = WorldConfig::from_json_str(json).unwrap();
        assert_eq!(config.grid_size, 32);
        assert_eq!(config.chunk_size, 8);
        assert_eq!(config.uniforms, UniformLayout::default());
        assert!(matches!(config.terrain, TerrainConfig::Flat { height: 3 }));
    }

    #[test]
    fn validate_rejects_uneven_chunks() {
        assert!(WorldConfig::with_sizes(32, 8, 2).validate().is_ok());
        assert!(matches!(
            WorldConfig::with_sizes(32, 7, 2).validate(),
            Err(WorldError::Configuration { grid_size: 32, chunk_size: 7 })
        ));
        assert!(matches!(
            WorldConfig::with_sizes(32, 0, 2).validate(),
            Err(WorldError::ZeroSize)
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            WorldConfig::from_json_str("{ grid_size: }"),
            Err(WorldError::ConfigParse(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = WorldConfig::from_path("/nonexistent/voxel-world.json");
        assert!(matches!(result, Err(WorldError::ConfigIo { .. })));
    }
}
