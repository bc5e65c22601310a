use cgmath::Point3;

use crate::engine_state::voxels::block::{block_side::BlockSide, AtlasId};

/// Represents a single quad face of a voxel in the mesh.
///
/// A face is defined by four corner points (lower-left, lower-right, upper-right, upper-left)
/// and contains information about the atlas id and which side of the block it represents.
/// Corners are wound counter-clockwise when seen from outside the voxel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// Lower-right corner of the face in world coordinates
    pub lr: Point3<f32>,
    /// Lower-left corner of the face in world coordinates
    pub ll: Point3<f32>,
    /// Upper-right corner of the face in world coordinates
    pub ur: Point3<f32>,
    /// Upper-left corner of the face in world coordinates
    pub ul: Point3<f32>,
    /// The atlas id of the voxel, used for texture mapping
    pub atlas: AtlasId,
    /// Which side of the block this face represents
    pub block_side: BlockSide,
}

impl Face {
    /// Creates a new face for a unit voxel whose minimum corner is `min`.
    ///
    /// # Arguments
    /// * `min` - The minimum corner of the voxel in world space
    /// * `atlas` - The atlas id of the voxel, used for texture mapping
    /// * `block_side` - Which side of the block this face represents
    pub fn new(min: Point3<f32>, atlas: AtlasId, block_side: BlockSide) -> Self {
        let (i, j, k) = (min.x, min.y, min.z);
        let (ll, lr, ul, ur) = match block_side {
            BlockSide::FRONT => (
                Point3::new(i, j, k + 1.0),
                Point3::new(i + 1.0, j, k + 1.0),
                Point3::new(i, j + 1.0, k + 1.0),
                Point3::new(i + 1.0, j + 1.0, k + 1.0),
            ),
            BlockSide::BACK => (
                Point3::new(i + 1.0, j, k),
                Point3::new(i, j, k),
                Point3::new(i + 1.0, j + 1.0, k),
                Point3::new(i, j + 1.0, k),
            ),
            BlockSide::BOTTOM => (
                Point3::new(i, j, k),
                Point3::new(i + 1.0, j, k),
                Point3::new(i, j, k + 1.0),
                Point3::new(i + 1.0, j, k + 1.0),
            ),
            BlockSide::TOP => (
                Point3::new(i, j + 1.0, k + 1.0),
                Point3::new(i + 1.0, j + 1.0, k + 1.0),
                Point3::new(i, j + 1.0, k),
                Point3::new(i + 1.0, j + 1.0, k),
            ),
            BlockSide::LEFT => (
                Point3::new(i, j, k),
                Point3::new(i, j, k + 1.0),
                Point3::new(i, j + 1.0, k),
                Point3::new(i, j + 1.0, k + 1.0),
            ),
            BlockSide::RIGHT => (
                Point3::new(i + 1.0, j, k + 1.0),
                Point3::new(i + 1.0, j, k),
                Point3::new(i + 1.0, j + 1.0, k + 1.0),
                Point3::new(i + 1.0, j + 1.0, k),
            ),
        };

        Face {
            ll,
            lr,
            ul,
            ur,
            atlas,
            block_side,
        }
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{EuclideanSpace, InnerSpace};

    use super::*;

    #[test]
    fn faces_wind_outward() {
        let min = Point3::new(2.0, -3.0, 5.0);
        let center = min + cgmath::Vector3::new(0.5, 0.5, 0.5);
        for side in BlockSide::all() {
            let face = Face::new(min, 0, side);
            let winding = (face.lr - face.ll).cross(face.ul - face.ll);
            assert!(winding.dot(side.normal()) > 0.0, "{:?} winds inward", side);

            let face_center = Point3::centroid(&[face.ll, face.lr, face.ul, face.ur]);
            assert!((face_center - center).dot(side.normal()) > 0.49);
        }
    }
}
