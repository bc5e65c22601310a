//! # Terrain Module
//!
//! Fills a freshly built grid with its starting geometry.
//!
//! Generation is column based: each (x, z) column gets a surface height and every cell
//! below it becomes solid, layered grass, dirt then stone.
//!
//! Multiple terrain generation strategies are supported:
//! - Perlin noise for natural-looking rolling hills
//! - A flat floor for testing
//! - Empty (all cells air)

use noise::{NoiseFn, Perlin};

use crate::config::TerrainConfig;

/// A column height source built from a [`TerrainConfig`].
pub enum TerrainGenerator {
    /// No terrain
    Empty,
    /// A level floor at the given height
    Flat(i32),
    /// A Perlin height map
    Perlin {
        /// Noise source
        perlin: Perlin,
        /// Scaling factor applied to world coordinates when sampling
        scale: f64,
        /// Peak deviation from `base_height`
        amplitude: f64,
        /// Mean surface height
        base_height: i32,
    },
}

impl TerrainGenerator {
    /// Builds the generator described by `config`.
    pub fn new(config: &TerrainConfig) -> Self {
        match *config {
            TerrainConfig::Empty => TerrainGenerator::Empty,
            TerrainConfig::Flat { height } => TerrainGenerator::Flat(height),
            TerrainConfig::Perlin {
                seed,
                scale,
                amplitude,
                base_height,
            } => TerrainGenerator::Perlin {
                perlin: Perlin::new(seed),
                scale,
                amplitude,
                base_height,
            },
        }
    }

    /// World y of the surface for the column at (`x`, `z`).
    ///
    /// Every cell with y below the returned height is solid. `None` means the column is empty.
    pub fn surface_height(&self, x: i32, z: i32) -> Option<i32> {
        match self {
            TerrainGenerator::Empty => None,
            TerrainGenerator::Flat(height) => Some(*height),
            TerrainGenerator::Perlin {
                perlin,
                scale,
                amplitude,
                base_height,
            } => {
                let sample = perlin
                    .get([x as f64 * scale, z as f64 * scale])
                    .clamp(-1.0, 1.0);
                Some(*base_height + (sample * amplitude).round() as i32)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perlin_heights_stay_within_amplitude() {
        let generator = TerrainGenerator::new(&TerrainConfig::Perlin {
            seed: 7,
            scale: 0.05,
            amplitude: 3.0,
            base_height: 0,
        });
        for x in -20..20 {
            for z in -20..20 {
                let h = generator.surface_height(x, z).unwrap();
                assert!((-3..=3).contains(&h));
            }
        }
    }

    #[test]
    fn perlin_is_deterministic_per_seed() {
        let config = TerrainConfig::Perlin {
            seed: 3,
            scale: 0.1,
            amplitude: 5.0,
            base_height: 1,
        };
        let a = TerrainGenerator::new(&config);
        let b = TerrainGenerator::new(&config);
        assert_eq!(a.surface_height(11, -4), b.surface_height(11, -4));
    }
}
