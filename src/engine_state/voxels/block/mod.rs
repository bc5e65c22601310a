//! # Block Module
//!
//! This module provides the core block-related functionality for the voxel grid.
//! It includes the atlas id representation stored in the grid, material definitions,
//! and block face handling.

use block_side::BlockSide;
use block_type::BlockType;

pub mod block_side;
pub mod block_type;

/// The integer type stored per grid cell: an index into the texture atlas.
///
/// Non-negative values are materials, [`EMPTY`] marks air.
pub type AtlasId = i8;

/// Atlas id of an empty cell.
pub const EMPTY: AtlasId = -1;

/// Number of tiles along one row of the texture atlas.
pub const ATLAS_COLUMNS: usize = 8;

/// Maps each block type to its corresponding atlas tile for each face.
///
/// The outer array is indexed by `BlockType` as a `usize`.
/// The inner array contains 6 tile indices, one for each face in `BlockSide` order:
/// [Front, Back, Bottom, Top, Left, Right]
pub static BLOCK_TYPE_TO_TEXTURE_INDICES: [[usize; 6]; 6] = [
    [2, 2, 1, 3, 2, 2], // GRASS (top: 3, bottom: dirt, sides: 2)
    [1, 1, 1, 1, 1, 1], // DIRT
    [4, 4, 4, 4, 4, 4], // STONE
    [5, 5, 5, 5, 5, 5], // SAND
    [0, 0, 6, 6, 0, 0], // WOOD (rings on top and bottom)
    [7, 7, 7, 7, 7, 7], // WHITE
];

/// Returns true if the atlas id denotes a solid material.
#[inline]
pub fn is_solid(atlas: AtlasId) -> bool {
    atlas != EMPTY
}

/// Gets the atlas tile to draw on one face of a voxel with the given atlas id.
///
/// Ids that name a known [`BlockType`] use its per-face table entry. Any other
/// non-negative id maps straight onto the atlas tile of the same index.
pub fn texture_index(atlas: AtlasId, side: BlockSide) -> usize {
    match BlockType::from_atlas(atlas) {
        Some(block_type) => BLOCK_TYPE_TO_TEXTURE_INDICES[block_type as usize][side as usize],
        None => atlas.max(0) as usize,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grass_top_differs_from_sides() {
        let atlas = BlockType::GRASS.atlas_id();
        assert_ne!(
            texture_index(atlas, BlockSide::TOP),
            texture_index(atlas, BlockSide::FRONT)
        );
    }

    #[test]
    fn unknown_ids_use_their_own_tile() {
        assert_eq!(texture_index(42, BlockSide::LEFT), 42);
    }
}
