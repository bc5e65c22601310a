//! Mesh data structures and operations for voxel rendering.
//!
//! This module handles the conversion from voxel faces to the vertex and index lists
//! uploaded by the render backend.

use crate::engine_state::voxels::block::texture_index;

use super::face::Face;
use crate::engine_state::rendering::Vertex;

/// A triangle mesh: vertex data plus indices forming triangles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl Mesh {
    /// Creates a new, empty mesh.
    pub fn new() -> Self {
        Mesh {
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Vertex data.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Triangle indices into [`Mesh::vertices`].
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of indices.
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// True if the mesh has no geometry.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Removes all geometry, keeping the allocations.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    /// Appends one quad face.
    pub fn add_face(&mut self, face: &Face) {
        let num_faces_generated = (self.vertices.len() / 4) as u32;
        self.vertices.extend(Self::generate_face_vertices(face));
        self.indices
            .extend(Self::generate_face_indices(num_faces_generated));
    }

    /// Appends another mesh.
    ///
    /// The indices of `other` are adjusted to account for the existing vertices in this mesh.
    pub fn append(&mut self, other: &Mesh) {
        let current_vertices_len = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices
            .extend(other.indices.iter().map(|e| e + current_vertices_len));
    }

    /// Generates vertex data for a single face of a block.
    ///
    /// # Returns
    /// The four corners of the face ordered lower-left, lower-right, upper-left,
    /// upper-right, forming two triangles when combined with the indices from
    /// `generate_face_indices`.
    pub fn generate_face_vertices(face: &Face) -> [Vertex; 4] {
        let tile = texture_index(face.atlas, face.block_side);
        let normal = face.block_side.normal();

        [
            Vertex::new(face.ll, tile, 0.0, 1.0, normal),
            Vertex::new(face.lr, tile, 1.0, 1.0, normal),
            Vertex::new(face.ul, tile, 0.0, 0.0, normal),
            Vertex::new(face.ur, tile, 1.0, 0.0, normal),
        ]
    }

    /// Generates index data for a face, adjusted by the number of previously generated faces.
    ///
    /// # Returns
    /// Six indices forming two triangles for the face.
    pub fn generate_face_indices(num_faces_generated: u32) -> [u32; 6] {
        [
            (num_faces_generated * 4),
            1 + num_faces_generated * 4,
            3 + num_faces_generated * 4,
            (num_faces_generated * 4),
            3 + num_faces_generated * 4,
            2 + num_faces_generated * 4,
        ]
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Point3;

    use super::*;
    use crate::engine_state::voxels::block::block_side::BlockSide;

    #[test]
    fn append_offsets_indices() {
        let mut a = Mesh::new();
        a.add_face(&Face::new(Point3::new(0.0, 0.0, 0.0), 1, BlockSide::TOP));
        let mut b = Mesh::new();
        b.add_face(&Face::new(Point3::new(1.0, 0.0, 0.0), 1, BlockSide::TOP));

        a.append(&b);
        assert_eq!(a.vertex_count(), 8);
        assert_eq!(a.index_count(), 12);
        assert_eq!(&a.indices()[6..], &[4, 5, 7, 4, 7, 6]);
    }
}
