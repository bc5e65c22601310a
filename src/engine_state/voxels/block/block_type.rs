//! # Block Type Module
//!
//! This module defines the named materials used by terrain generation.
//! Each material is a fixed atlas id; the grid itself stores raw [`AtlasId`] values so
//! players may place any atlas tile, named or not.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use super::AtlasId;

/// Enumerates the named materials of the voxel world.
///
/// The discriminant of each variant is its atlas id. The `FromPrimitive` derive allows
/// conversion back from the stored integer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// The surface layer of generated terrain.
    /// The top is green, sides have grass on dirt, and bottom is plain dirt.
    GRASS = 0,

    /// Soil beneath the grass layer.
    DIRT = 1,

    /// Bedrock below the soil.
    STONE = 2,

    /// Loose sand.
    SAND = 3,

    /// A wooden block with rings on the top and bottom.
    WOOD = 4,

    /// A plain white block, often used for testing.
    WHITE = 5,
}

impl BlockType {
    /// Converts an atlas id to a `BlockType`.
    ///
    /// # Returns
    /// `None` for [`super::EMPTY`] and for ids that do not name a material.
    pub fn from_atlas(atlas: AtlasId) -> Option<Self> {
        FromPrimitive::from_i8(atlas)
    }

    /// The atlas id stored in the grid for this material.
    pub fn atlas_id(self) -> AtlasId {
        self as AtlasId
    }

    /// Picks the layered terrain material for a cell `depth` cells below the surface.
    ///
    /// `depth` 0 is the top solid cell.
    pub fn for_depth(depth: i32) -> Self {
        match depth {
            0 => BlockType::GRASS,
            1..=3 => BlockType::DIRT,
            _ => BlockType::STONE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atlas_round_trip_for_named_materials() {
        assert_eq!(BlockType::from_atlas(2), Some(BlockType::STONE));
        assert_eq!(BlockType::from_atlas(-1), None);
        assert_eq!(BlockType::from_atlas(99), None);
    }

    #[test]
    fn layering_by_depth() {
        assert_eq!(BlockType::for_depth(0), BlockType::GRASS);
        assert_eq!(BlockType::for_depth(2), BlockType::DIRT);
        assert_eq!(BlockType::for_depth(10), BlockType::STONE);
    }
}
