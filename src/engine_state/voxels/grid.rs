//! # Grid Module
//!
//! This module provides the `Grid` struct which owns every voxel in the world and the
//! chunks that partition them.
//!
//! ## Architecture
//!
//! Voxels are stored densely as one [`AtlasId`] per cell in a flat array. The grid has
//! `grid_size` cells per axis and is centred on the world origin. It is split into
//! `chunk_size`-wide cubic chunks, each holding the mesh generated from its cells.
//!
//! ## Mesh Invalidation
//!
//! Chunks whose cells change are flagged in a dirty bit set (neighbouring chunks too when
//! the change sits on a shared face) and queued for [`Grid::take_edited_chunks`], so the
//! owner can rebuild them straight after the edit wherever they lie.
//! [`Grid::rebuild_view_meshes`] only touches dirty chunks inside the view window.
//!
//! ## Safe Defaults
//!
//! Reads outside the grid see empty space, writes outside it are dropped, and rays that
//! leave it keep marching through air. Only construction can fail.

use bitvec::vec::BitVec;
use cgmath::{EuclideanSpace, Point3, Vector3};
use log::{debug, info};
use web_time::Instant;

use super::block::{block_side::BlockSide, block_type::BlockType, is_solid, AtlasId, EMPTY};
use super::chunk::{Chunk, ChunkKey};
use super::ray::{cell_center, cell_of, snap, Ray};
use super::terrain::TerrainGenerator;
use crate::config::WorldConfig;
use crate::engine_state::physics::Aabb;
use crate::engine_state::rendering::meshing::{Face, Mesh};
use crate::error::WorldError;

/// Voxel storage partitioned into chunks.
pub struct Grid {
    /// Cells per axis
    grid_size: usize,
    /// Cells per chunk axis
    chunk_size: usize,
    /// Chunks per axis
    chunks_per_axis: usize,
    /// Streaming radius in chunks
    view_chunk_size: usize,
    /// World coordinate of the first cell on every axis
    lower: i32,
    /// One atlas id per cell, x fastest, then y, then z
    cells: Vec<AtlasId>,
    /// Every chunk in the grid, indexed by key
    chunks: Vec<Chunk>,
    /// Chunks whose mesh no longer matches their cells
    dirty: BitVec,
    /// Chunk the view window is centred on
    recent_chunk: ChunkKey,
    /// Keys inside the view window
    view_chunks: Vec<ChunkKey>,
    /// Chunks flagged by edits since the last `take_edited_chunks`
    edited: Vec<ChunkKey>,
    /// Material used for placement
    atlas: AtlasId,
}

impl Grid {
    /// Creates a grid, fills it with the configured terrain and centres the view window on
    /// the world origin.
    ///
    /// # Errors
    /// Fails if the sizes are zero or `grid_size` is not a multiple of `chunk_size`.
    pub fn new(config: &WorldConfig) -> Result<Self, WorldError> {
        config.validate()?;

        let grid_size = config.grid_size;
        let chunk_size = config.chunk_size;
        let chunks_per_axis = grid_size / chunk_size;
        let lower = -((grid_size / 2) as i32);

        let mut chunks = Vec::with_capacity(chunks_per_axis.pow(3));
        for z in 0..chunks_per_axis {
            for y in 0..chunks_per_axis {
                for x in 0..chunks_per_axis {
                    let key = x + chunks_per_axis * (y + chunks_per_axis * z);
                    chunks.push(Chunk::new(key, Point3::new(x, y, z)));
                }
            }
        }

        let mut grid = Grid {
            grid_size,
            chunk_size,
            chunks_per_axis,
            view_chunk_size: config.view_chunk_size,
            lower,
            cells: vec![EMPTY; grid_size.pow(3)],
            dirty: BitVec::repeat(true, chunks.len()),
            chunks,
            recent_chunk: 0,
            view_chunks: Vec::new(),
            edited: Vec::new(),
            atlas: BlockType::GRASS.atlas_id(),
        };

        grid.generate_terrain(&TerrainGenerator::new(&config.terrain));
        grid.update(Point3::origin());

        info!(
            "Created grid: {}^3 cells, {}^3 chunks of {}^3, view radius {}",
            grid_size, chunks_per_axis, chunk_size, config.view_chunk_size
        );

        Ok(grid)
    }

    fn generate_terrain(&mut self, generator: &TerrainGenerator) {
        for z in 0..self.grid_size {
            for x in 0..self.grid_size {
                let wx = self.lower + x as i32;
                let wz = self.lower + z as i32;
                let Some(height) = generator.surface_height(wx, wz) else {
                    continue;
                };
                for y in 0..self.grid_size {
                    let wy = self.lower + y as i32;
                    if wy >= height {
                        break;
                    }
                    let index = self.cell_index(Point3::new(x, y, z));
                    self.cells[index] = BlockType::for_depth(height - 1 - wy).atlas_id();
                }
            }
        }
    }

    /// Cells per grid axis.
    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Cells per chunk axis.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Total number of chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// The box covered by the grid in world space.
    pub fn get_world(&self) -> Aabb {
        let lower = self.lower as f32;
        let upper = lower + self.grid_size as f32;
        Aabb::new(
            Point3::new(lower, lower, lower),
            Point3::new(upper, upper, upper),
        )
    }

    /// Converts a world cell to grid-local indices, or `None` outside the grid.
    fn local_cell(&self, cell: Point3<i32>) -> Option<Point3<usize>> {
        self.local_cell_wide(Point3::new(cell.x as i64, cell.y as i64, cell.z as i64))
    }

    /// `local_cell` for coordinates that may not fit an `i32`.
    fn local_cell_wide(&self, cell: Point3<i64>) -> Option<Point3<usize>> {
        let size = self.grid_size as i64;
        let lower = self.lower as i64;
        let x = cell.x - lower;
        let y = cell.y - lower;
        let z = cell.z - lower;
        if (0..size).contains(&x) && (0..size).contains(&y) && (0..size).contains(&z) {
            Some(Point3::new(x as usize, y as usize, z as usize))
        } else {
            None
        }
    }

    fn cell_index(&self, local: Point3<usize>) -> usize {
        local.x + self.grid_size * (local.y + self.grid_size * local.z)
    }

    fn key_of_chunk(&self, x: usize, y: usize, z: usize) -> ChunkKey {
        x + self.chunks_per_axis * (y + self.chunks_per_axis * z)
    }

    fn key_of_local(&self, local: Point3<usize>) -> ChunkKey {
        self.key_of_chunk(
            local.x / self.chunk_size,
            local.y / self.chunk_size,
            local.z / self.chunk_size,
        )
    }

    /// Atlas id of a world cell; [`EMPTY`] outside the grid.
    pub fn cell_value(&self, cell: Point3<i32>) -> AtlasId {
        match self.local_cell(cell) {
            Some(local) => self.cells[self.cell_index(local)],
            None => EMPTY,
        }
    }

    /// Atlas id of the cell containing `point`; [`EMPTY`] outside the grid.
    pub fn grid_value(&self, point: Point3<f32>) -> AtlasId {
        self.cell_value(cell_of(point))
    }

    /// True if `point` lies inside the grid.
    pub fn contains(&self, point: Point3<f32>) -> bool {
        self.local_cell(cell_of(point)).is_some()
    }

    /// True if `point` lies inside the grid in an empty cell.
    pub fn is_open(&self, point: Point3<f32>) -> bool {
        match self.local_cell(cell_of(point)) {
            Some(local) => !is_solid(self.cells[self.cell_index(local)]),
            None => false,
        }
    }

    /// Writes `atlas` into a box of cells.
    ///
    /// The box starts at the cell containing `point` and extends `scale` cells along each
    /// axis, stepping `offset` cells at a time (so a negative offset grows the box towards
    /// negative coordinates). Cells are visited x-major, then y, then z. Cells outside the
    /// grid are skipped.
    ///
    /// # Returns
    /// The number of cells that went from solid to empty.
    pub fn set_geometry(
        &mut self,
        point: Point3<f32>,
        scale: Vector3<u32>,
        offset: Vector3<i32>,
        atlas: AtlasId,
    ) -> u32 {
        let start = cell_of(point);
        let start = Point3::new(start.x as i64, start.y as i64, start.z as i64);
        let offset = Vector3::new(offset.x as i64, offset.y as i64, offset.z as i64);
        let mut removed = 0;

        for i in 0..scale.x as i64 {
            for j in 0..scale.y as i64 {
                for k in 0..scale.z as i64 {
                    let cell = Point3::new(
                        start.x + i * offset.x,
                        start.y + j * offset.y,
                        start.z + k * offset.z,
                    );
                    let Some(local) = self.local_cell_wide(cell) else {
                        continue;
                    };
                    let index = self.cell_index(local);
                    let old = self.cells[index];
                    if old == atlas {
                        continue;
                    }
                    if is_solid(old) && !is_solid(atlas) {
                        removed += 1;
                    }
                    self.cells[index] = atlas;
                    self.mark_dirty(local);
                }
            }
        }

        removed
    }

    /// Flags the chunk holding `local`, and any chunk sharing a face with that cell.
    fn mark_dirty(&mut self, local: Point3<usize>) {
        let key = self.key_of_local(local);
        self.flag(key);

        for axis in 0..3 {
            let c = local[axis];
            if c % self.chunk_size == 0 && c > 0 {
                let mut neighbour = local;
                neighbour[axis] -= 1;
                let key = self.key_of_local(neighbour);
                self.flag(key);
            }
            if c % self.chunk_size == self.chunk_size - 1 && c + 1 < self.grid_size {
                let mut neighbour = local;
                neighbour[axis] += 1;
                let key = self.key_of_local(neighbour);
                self.flag(key);
            }
        }
    }

    fn flag(&mut self, key: ChunkKey) {
        self.dirty.set(key, true);
        if !self.edited.contains(&key) {
            self.edited.push(key);
        }
    }

    /// Drains the keys of every chunk flagged by `set_geometry` since the last call,
    /// whether or not it lies in the view window.
    pub fn take_edited_chunks(&mut self) -> Vec<ChunkKey> {
        std::mem::take(&mut self.edited)
    }

    /// Marches `ray` and returns the center of the last empty cell before the first solid one.
    ///
    /// If the ray starts inside a solid cell that cell's center is returned. If nothing
    /// solid is met within `max_dist`, the snapped endpoint of the ray is returned.
    pub fn ray_trace_before(&self, ray: &Ray, max_dist: f32) -> Point3<f32> {
        let mut previous = None;
        for (cell, _) in ray.cells(max_dist) {
            if is_solid(self.cell_value(cell)) {
                return cell_center(previous.unwrap_or(cell));
            }
            previous = Some(cell);
        }

        snap(ray.point_at(max_dist))
    }

    /// Marches `ray` and returns the center of the first solid cell it enters.
    ///
    /// If nothing solid is met within `max_dist`, the snapped endpoint of the ray is returned.
    pub fn ray_trace_after(&self, ray: &Ray, max_dist: f32) -> Point3<f32> {
        ray.cells(max_dist)
            .find(|(cell, _)| is_solid(self.cell_value(*cell)))
            .map(|(cell, _)| cell_center(cell))
            .unwrap_or_else(|| snap(ray.point_at(max_dist)))
    }

    /// Key of the chunk containing `point`, or `None` outside the grid.
    pub fn chunk_key(&self, point: Point3<f32>) -> Option<ChunkKey> {
        self.local_cell(cell_of(point))
            .map(|local| self.key_of_local(local))
    }

    /// The chunk the view window is centred on.
    pub fn get_recent_chunk(&self) -> ChunkKey {
        self.recent_chunk
    }

    /// Keys of every chunk in the view window, x-major, then y, then z.
    pub fn get_view_chunks(&self) -> &[ChunkKey] {
        &self.view_chunks
    }

    /// Centres the view window on the chunk containing `position`.
    ///
    /// Positions outside the grid leave the window where it is.
    pub fn update(&mut self, position: Point3<f32>) {
        if let Some(key) = self.chunk_key(position) {
            self.update_chunk(key);
        }
    }

    /// Centres the view window on chunk `key`. Does not rebuild meshes.
    pub fn update_chunk(&mut self, key: ChunkKey) {
        let Some(chunk) = self.chunks.get(key) else {
            return;
        };
        let center = chunk.position;
        let radius = self.view_chunk_size;
        let last = self.chunks_per_axis - 1;

        let mut view_chunks = Vec::new();
        for x in center.x.saturating_sub(radius)..=(center.x + radius).min(last) {
            for y in center.y.saturating_sub(radius)..=(center.y + radius).min(last) {
                for z in center.z.saturating_sub(radius)..=(center.z + radius).min(last) {
                    view_chunks.push(self.key_of_chunk(x, y, z));
                }
            }
        }

        self.recent_chunk = key;
        self.view_chunks = view_chunks;
    }

    /// Unit boxes of the solid cells around `point`, for collision queries.
    ///
    /// Covers one cell either side on x and z and two cells either side on y.
    pub fn create_collision_cells(&self, point: Point3<f32>) -> Vec<Aabb> {
        let center = cell_of(point);
        let mut cells = Vec::new();
        for x in -1..=1 {
            for y in -2..=2 {
                for z in -1..=1 {
                    let cell = Point3::new(
                        center.x.saturating_add(x),
                        center.y.saturating_add(y),
                        center.z.saturating_add(z),
                    );
                    if is_solid(self.cell_value(cell)) {
                        cells.push(Aabb::cell(cell));
                    }
                }
            }
        }
        cells
    }

    /// Looks up a chunk by key.
    pub fn get_chunk(&self, key: ChunkKey) -> Option<&Chunk> {
        self.chunks.get(key)
    }

    /// True if the chunk's mesh is stale.
    pub fn is_dirty(&self, key: ChunkKey) -> bool {
        self.dirty.get(key).map(|bit| *bit).unwrap_or(false)
    }

    /// Regenerates the mesh of chunk `key` from its cells.
    pub fn rebuild_chunk_mesh(&mut self, key: ChunkKey) {
        let Some(chunk) = self.chunks.get(key) else {
            return;
        };
        let min = chunk.min_cell(self.chunk_size);

        let mut mesh = Mesh::new();
        for z in min.z..min.z + self.chunk_size {
            for y in min.y..min.y + self.chunk_size {
                for x in min.x..min.x + self.chunk_size {
                    let atlas = self.cells[self.cell_index(Point3::new(x, y, z))];
                    if !is_solid(atlas) {
                        continue;
                    }
                    let cell = Point3::new(
                        self.lower + x as i32,
                        self.lower + y as i32,
                        self.lower + z as i32,
                    );
                    let corner = Point3::new(cell.x as f32, cell.y as f32, cell.z as f32);
                    for side in BlockSide::all() {
                        if !is_solid(self.cell_value(cell + side.offset())) {
                            mesh.add_face(&Face::new(corner, atlas, side));
                        }
                    }
                }
            }
        }

        self.chunks[key].set_mesh(mesh);
        self.dirty.set(key, false);
    }

    /// Rebuilds every stale chunk inside the view window.
    ///
    /// # Returns
    /// The number of chunks rebuilt.
    pub fn rebuild_view_meshes(&mut self) -> usize {
        let start = Instant::now();
        let mut rebuilt = 0;
        for i in 0..self.view_chunks.len() {
            let key = self.view_chunks[i];
            if self.dirty[key] {
                self.rebuild_chunk_mesh(key);
                rebuilt += 1;
            }
        }
        if rebuilt > 0 {
            debug!("Rebuilt {} chunk meshes in {:?}", rebuilt, start.elapsed());
        }
        rebuilt
    }

    /// A unit box mesh centred on `center` in the current placement material.
    pub fn atlas_box(&self, center: Point3<f32>) -> Mesh {
        let min = center - Vector3::new(0.5, 0.5, 0.5);
        let mut mesh = Mesh::new();
        for side in BlockSide::all() {
            mesh.add_face(&Face::new(min, self.atlas, side));
        }
        mesh
    }

    /// The material used for placement.
    pub fn get_atlas(&self) -> AtlasId {
        self.atlas
    }

    /// Sets the material used for placement.
    pub fn set_atlas(&mut self, atlas: AtlasId) {
        self.atlas = atlas;
    }
}

#[cfg(test)]
mod tests {
    use cgmath::MetricSpace;

    use super::*;
    use crate::config::TerrainConfig;

    fn unit() -> Vector3<u32> {
        Vector3::new(1, 1, 1)
    }

    fn forward() -> Vector3<i32> {
        Vector3::new(1, 1, 1)
    }

    fn empty_grid(grid_size: usize, chunk_size: usize) -> Grid {
        let mut config = WorldConfig::with_sizes(grid_size, chunk_size, 1);
        config.terrain = TerrainConfig::Empty;
        Grid::new(&config).unwrap()
    }

    #[test]
    fn construction_requires_whole_chunks() {
        for grid_size in 1..=24usize {
            for chunk_size in 1..=8usize {
                let mut config = WorldConfig::with_sizes(grid_size, chunk_size, 1);
                config.terrain = TerrainConfig::Empty;
                let result = Grid::new(&config);
                assert_eq!(
                    result.is_ok(),
                    grid_size % chunk_size == 0,
                    "grid {} chunk {}",
                    grid_size,
                    chunk_size
                );
            }
        }
    }

    #[test]
    fn grid_is_centred_on_origin() {
        let grid = empty_grid(32, 8);
        let world = grid.get_world();
        assert_eq!(world.min, Point3::new(-16.0, -16.0, -16.0));
        assert_eq!(world.max, Point3::new(16.0, 16.0, 16.0));
        assert_eq!(grid.chunk_count(), 64);
    }

    #[test]
    fn removing_a_voxel_counts_it() {
        let mut grid = empty_grid(32, 8);
        let p = Point3::new(0.5, 0.5, 0.5);
        assert_eq!(grid.set_geometry(p, unit(), forward(), 3), 0);
        assert_eq!(grid.grid_value(p), 3);

        assert_eq!(grid.set_geometry(p, unit(), forward(), EMPTY), 1);
        assert_eq!(grid.grid_value(p), EMPTY);

        // Removing air again removes nothing
        assert_eq!(grid.set_geometry(p, unit(), forward(), EMPTY), 0);
    }

    #[test]
    fn negative_offset_grows_backwards() {
        let mut grid = empty_grid(32, 8);
        grid.set_geometry(
            Point3::new(0.5, 0.5, 0.5),
            Vector3::new(3, 1, 2),
            Vector3::new(-1, 1, -1),
            2,
        );
        assert_eq!(grid.cell_value(Point3::new(-2, 0, -1)), 2);
        assert_eq!(grid.cell_value(Point3::new(1, 0, 0)), EMPTY);

        let removed = grid.set_geometry(
            Point3::new(0.5, 0.5, 0.5),
            Vector3::new(3, 1, 2),
            Vector3::new(-1, 1, -1),
            EMPTY,
        );
        assert_eq!(removed, 6);
    }

    #[test]
    fn writes_outside_the_grid_are_clipped() {
        let mut grid = empty_grid(16, 8);
        let removed = grid.set_geometry(
            Point3::new(6.5, 0.5, 0.5),
            Vector3::new(5, 1, 1),
            forward(),
            4,
        );
        assert_eq!(removed, 0);
        assert_eq!(grid.cell_value(Point3::new(7, 0, 0)), 4);
        assert_eq!(grid.cell_value(Point3::new(8, 0, 0)), EMPTY);
        assert_eq!(grid.grid_value(Point3::new(100.0, 0.0, 0.0)), EMPTY);
    }

    #[test]
    fn ray_trace_brackets_a_single_voxel() {
        let mut grid = empty_grid(32, 8);
        grid.set_geometry(Point3::new(0.5, 0.5, 0.5), unit(), forward(), 1);

        let origin = Point3::new(0.5, 0.5, -3.5);
        let ray = Ray::from_direction(origin, Vector3::new(0.0, 0.0, 1.0));
        let before = grid.ray_trace_before(&ray, 10.0);
        let after = grid.ray_trace_after(&ray, 10.0);

        assert_eq!(before, Point3::new(0.5, 0.5, -0.5));
        assert_eq!(after, Point3::new(0.5, 0.5, 0.5));
        assert!(origin.distance(before) < origin.distance(after));
        assert_eq!(snap(before), before);
        assert_eq!(snap(after), after);
    }

    #[test]
    fn ray_trace_miss_returns_endpoint() {
        let grid = empty_grid(32, 8);
        let ray = Ray::from_direction(Point3::new(0.5, 0.5, 0.5), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(grid.ray_trace_before(&ray, 4.0), Point3::new(4.5, 0.5, 0.5));
        assert_eq!(grid.ray_trace_after(&ray, 4.0), Point3::new(4.5, 0.5, 0.5));

        // Rays leaving the grid keep going through air
        let far = grid.ray_trace_after(&ray, 100.0);
        assert_eq!(far, Point3::new(100.5, 0.5, 0.5));
    }

    #[test]
    fn chunk_key_is_none_outside() {
        let grid = empty_grid(32, 8);
        assert_eq!(grid.chunk_key(Point3::new(-16.0, -16.0, -16.0)), Some(0));
        assert_eq!(grid.chunk_key(Point3::new(15.9, 15.9, 15.9)), Some(63));
        assert_eq!(grid.chunk_key(Point3::new(16.0, 0.0, 0.0)), None);
    }

    #[test]
    fn view_window_is_clipped_and_ordered() {
        let grid = empty_grid(32, 8);
        // Origin sits in chunk (2, 2, 2) of a 4x4x4 grid with radius 1
        assert_eq!(grid.get_recent_chunk(), 2 + 4 * (2 + 4 * 2));
        assert_eq!(grid.get_view_chunks().len(), 27);

        let mut grid = grid;
        grid.update(Point3::new(-15.0, -15.0, -15.0));
        let keys = grid.get_view_chunks().to_vec();
        // x-major: z varies fastest in the listing
        assert_eq!(keys, vec![0, 16, 4, 20, 1, 17, 5, 21]);

        // Out of bounds positions keep the old window
        grid.update(Point3::new(99.0, 0.0, 0.0));
        assert_eq!(grid.get_recent_chunk(), 0);
    }

    #[test]
    fn collision_cells_cover_neighbourhood() {
        let mut config = WorldConfig::with_sizes(32, 8, 1);
        config.terrain = TerrainConfig::Flat { height: 0 };
        let grid = Grid::new(&config).unwrap();

        let boxes = grid.create_collision_cells(Point3::new(0.5, 1.5, 0.5));
        // Only the floor layer y = -1 is solid within y in [-1, 3]
        assert_eq!(boxes.len(), 9);
        assert!(boxes.iter().all(|b| b.max.y == 0.0));
    }

    #[test]
    fn flat_terrain_is_layered() {
        let mut config = WorldConfig::with_sizes(16, 8, 1);
        config.terrain = TerrainConfig::Flat { height: 0 };
        let grid = Grid::new(&config).unwrap();
        assert_eq!(grid.cell_value(Point3::new(0, -1, 0)), BlockType::GRASS.atlas_id());
        assert_eq!(grid.cell_value(Point3::new(0, -2, 0)), BlockType::DIRT.atlas_id());
        assert_eq!(grid.cell_value(Point3::new(0, -8, 0)), BlockType::STONE.atlas_id());
        assert_eq!(grid.cell_value(Point3::new(0, 0, 0)), EMPTY);
    }

    #[test]
    fn single_voxel_mesh_has_six_faces() {
        let mut grid = empty_grid(32, 8);
        grid.set_geometry(Point3::new(0.5, 0.5, 0.5), unit(), forward(), 1);
        let key = grid.chunk_key(Point3::new(0.5, 0.5, 0.5)).unwrap();
        grid.rebuild_chunk_mesh(key);
        let mesh = grid.get_chunk(key).unwrap().mesh();
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.index_count(), 36);
    }

    #[test]
    fn shared_faces_are_culled_across_chunks() {
        let mut grid = empty_grid(32, 8);
        // Cells -1 and 0 on x straddle a chunk boundary
        grid.set_geometry(
            Point3::new(-0.5, 0.5, 0.5),
            Vector3::new(2, 1, 1),
            forward(),
            1,
        );
        let left = grid.chunk_key(Point3::new(-0.5, 0.5, 0.5)).unwrap();
        let right = grid.chunk_key(Point3::new(0.5, 0.5, 0.5)).unwrap();
        assert_ne!(left, right);
        grid.rebuild_chunk_mesh(left);
        grid.rebuild_chunk_mesh(right);
        assert_eq!(grid.get_chunk(left).unwrap().mesh().vertex_count(), 20);
        assert_eq!(grid.get_chunk(right).unwrap().mesh().vertex_count(), 20);
    }

    #[test]
    fn boundary_edits_dirty_the_neighbour() {
        let mut grid = empty_grid(32, 8);
        grid.rebuild_view_meshes();
        let left = grid.chunk_key(Point3::new(-0.5, 0.5, 0.5)).unwrap();
        let right = grid.chunk_key(Point3::new(0.5, 0.5, 0.5)).unwrap();
        assert!(!grid.is_dirty(left));
        assert!(!grid.is_dirty(right));

        grid.set_geometry(Point3::new(0.5, 0.5, 0.5), unit(), forward(), 1);
        assert!(grid.is_dirty(right));
        assert!(grid.is_dirty(left));
    }

    #[test]
    fn rebuild_is_idempotent() {
        let mut config = WorldConfig::with_sizes(32, 8, 1);
        config.terrain = TerrainConfig::Perlin {
            seed: 1,
            scale: 0.1,
            amplitude: 3.0,
            base_height: 0,
        };
        let mut grid = Grid::new(&config).unwrap();
        let key = grid.get_recent_chunk();

        grid.rebuild_chunk_mesh(key);
        let first = grid.get_chunk(key).unwrap().mesh().clone();
        grid.rebuild_chunk_mesh(key);
        let second = grid.get_chunk(key).unwrap().mesh();

        assert_eq!(first.vertex_count(), second.vertex_count());
        assert_eq!(first.index_count(), second.index_count());
        assert_eq!(&first, second);
    }

    #[test]
    fn only_stale_chunks_are_rebuilt() {
        let mut grid = empty_grid(32, 8);
        assert_eq!(grid.rebuild_view_meshes(), 27);
        assert_eq!(grid.rebuild_view_meshes(), 0);

        grid.set_geometry(Point3::new(2.5, 2.5, 2.5), unit(), forward(), 1);
        assert_eq!(grid.rebuild_view_meshes(), 1);
    }

    #[test]
    fn atlas_box_uses_current_material() {
        let mut grid = empty_grid(16, 8);
        grid.set_atlas(5);
        let mesh = grid.atlas_box(Point3::new(0.0, 0.0, 0.0));
        assert_eq!(mesh.vertex_count(), 24);
        assert!(mesh
            .vertices()
            .iter()
            .all(|v| v.position().x.abs() == 0.5 && v.position().y.abs() == 0.5));
    }

    #[test]
    fn far_writes_are_clipped() {
        let mut grid = empty_grid(16, 8);
        for x in [3.0e9, -3.0e9] {
            for offset in [forward(), Vector3::new(-1, -1, -1)] {
                let p = Point3::new(x, x, 0.5);
                assert_eq!(grid.set_geometry(p, Vector3::new(5, 5, 5), offset, 2), 0);
                assert_eq!(grid.set_geometry(p, Vector3::new(5, 5, 5), offset, EMPTY), 0);
            }
            assert_eq!(grid.chunk_key(Point3::new(x, 0.5, 0.5)), None);
            assert!(grid.create_collision_cells(Point3::new(x, x, x)).is_empty());
        }
        assert!(grid.take_edited_chunks().is_empty());
    }

    #[test]
    fn edits_report_every_chunk_they_flag() {
        let mut grid = empty_grid(32, 8);
        // x = 0 sits on a chunk face, y and z do not
        let left = grid.chunk_key(Point3::new(-0.5, 3.5, 3.5)).unwrap();
        let right = grid.chunk_key(Point3::new(0.5, 3.5, 3.5)).unwrap();

        grid.set_geometry(Point3::new(0.5, 3.5, 3.5), unit(), forward(), 1);
        grid.set_geometry(Point3::new(1.5, 3.5, 3.5), unit(), forward(), 1);
        let mut edited = grid.take_edited_chunks();
        edited.sort_unstable();
        let mut expected = vec![left, right];
        expected.sort_unstable();
        assert_eq!(edited, expected);
        assert!(grid.take_edited_chunks().is_empty());
    }
}
