//! # Engine State Module
//!
//! The core module that owns a running voxel world and drives it frame by frame.
//!
//! ## Key Components
//!
//! * `WorldController` - The session state container and its frame loop
//! * `camera_state` - First-person camera and the [`CameraView`] interface
//! * `navigation` - Single-step pathing for the AI-driven character
//! * `particles` - Debris effects and the [`ParticleEmitter`] interface
//! * `physics` - Axis-aligned bodies integrated against the grid
//! * `placement` - Placement scale and preview offset state
//! * `rendering` - Meshing, uniforms and the [`RenderBackend`] interface
//! * `voxels` - Voxel storage, chunks, rays and terrain
//!
//! ## Architecture
//!
//! `WorldController` is the only owner of the grid, the physics world and the navigator;
//! none of those refer to each other. Rendering and particle effects are collaborators
//! passed in at construction, so the same controller drives a GPU renderer or the
//! [`HeadlessBackend`](rendering::HeadlessBackend).
//!
//! ## Frame Order
//!
//! Each `update` runs, in order: the AI step, the chunk-crossing check, ten physics
//! sub-steps (gather collision cells, apply friction, solve), the placemark and uniform
//! refresh, and the particle update.

use cgmath::{EuclideanSpace, InnerSpace, Matrix4, MetricSpace, Point3, Vector3};
use log::{debug, info};

use crate::config::WorldConfig;
use crate::error::WorldError;

use camera_state::CameraView;
use navigation::Navigator;
use particles::ParticleEmitter;
use physics::{Aabb, Body, BodyId, PhysicsWorld, DEFAULT_ELASTICITY};
use placement::{Axis, PlacementState, ScaleChange};
use rendering::meshing::Mesh;
use rendering::uniforms::{
    Light, UniformBlock, CAMERA_SLOT, PLACEMARK_SLOT, PROJ_VIEW_SLOT, VIEW_SLOT,
};
use rendering::{MeshSlot, RenderBackend};
use voxels::block::{AtlasId, EMPTY};
use voxels::grid::Grid;
use voxels::ray::{snap, Ray};

pub mod camera_state;
pub mod navigation;
pub mod particles;
pub mod physics;
pub mod placement;
pub mod rendering;
pub mod voxels;

/// Physics sub-steps per frame
const PHYSICS_SUBSTEPS: usize = 10;
/// Lateral friction coefficient
const FRICTION: f32 = 2.0;
/// Walking force per unit mass
const MOVE_FORCE: f32 = 100.0;
/// Jump force per unit mass
const JUMP_FORCE: f32 = 4000.0;
/// Vertical speed at or above which the character counts as airborne
const JUMP_SPEED_LIMIT: f32 = 1.0;
/// AI walking force per unit mass
const AI_FORCE: f32 = 200.0;
/// Grapple force per unit mass and unit distance
const GRAPPLE_FORCE: f32 = 1000.0;
/// Grapple ray length
const GRAPPLE_RANGE: f32 = 100.0;
/// Grapples longer than this are weakened
const GRAPPLE_BOOST_RANGE: f32 = 20.0;
/// Placement ray length
const PLACE_RANGE: f32 = 4.0;
/// Removal ray length
const REMOVE_RANGE: f32 = 5.0;
/// Distance in front of the camera the placemark ray aims at
const PLACEMARK_DISTANCE: f32 = 3.0;
/// Strength of removal debris bursts
const PARTICLE_STRENGTH: f32 = 5.0;
/// Mass of the character body
const CHARACTER_MASS: f32 = 10.0;
/// Edge length of the pocket carved around a fresh spawn
const SPAWN_POCKET: u32 = 3;

/// Half size of the character body.
pub fn character_half_extent() -> Vector3<f32> {
    Vector3::new(0.45, 0.95, 0.45)
}

/// Where and how a session starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnState {
    /// Centre of the character body.
    pub position: Point3<f32>,
    /// True when continuing a saved session; fresh sessions carve a pocket around the spawn.
    pub resumed: bool,
}

impl SpawnState {
    /// A fresh session starting at `position`.
    pub fn fresh(position: Point3<f32>) -> Self {
        SpawnState {
            position,
            resumed: false,
        }
    }

    /// A resumed session starting at `position`.
    pub fn resumed(position: Point3<f32>) -> Self {
        SpawnState {
            position,
            resumed: true,
        }
    }
}

/// A running voxel world: grid, character physics, placement tool and AI.
///
/// # Examples
///
/// ```
/// use cgmath::Point3;
/// use voxel_world::config::WorldConfig;
/// use voxel_world::engine_state::{SpawnState, WorldController};
/// use voxel_world::engine_state::camera_state::CameraState;
/// use voxel_world::engine_state::particles::ExplodeParticles;
/// use voxel_world::engine_state::rendering::HeadlessBackend;
///
/// let config = WorldConfig::with_sizes(32, 8, 1);
/// let particles = ExplodeParticles::new(config.particles, config.gravity());
/// let mut world = WorldController::new(
///     &config,
///     SpawnState::fresh(Point3::new(0.5, 1.0, 0.5)),
///     HeadlessBackend::new(),
///     particles,
/// )
/// .unwrap();
///
/// let camera = CameraState::new(world.character_position(), 800, 600);
/// world.update(&camera, 1.0 / 60.0);
/// world.draw(1.0 / 60.0);
/// ```
pub struct WorldController<R: RenderBackend, P: ParticleEmitter> {
    /// The voxel grid
    grid: Grid,
    /// Physics arena holding the character
    physics: PhysicsWorld,
    /// The character body
    character: BodyId,
    /// Pathing for AI mode
    navigator: Navigator,
    /// Where AI mode walks to
    ai_destination: Point3<f32>,
    /// Whether the navigator drives the character
    ai_mode: bool,
    /// Scale, offsets and edit mode
    placement: PlacementState,
    /// Snapped placement target from the last update
    placemark: Point3<f32>,
    /// Uniforms for the terrain pass
    terrain_uniforms: UniformBlock,
    /// Uniforms for the preview and particle pass
    preview_uniforms: UniformBlock,
    /// Rendering collaborator
    renderer: R,
    /// Particle collaborator
    particles: P,
}

impl<R: RenderBackend, P: ParticleEmitter> WorldController<R, P> {
    /// Creates a world and loads the character.
    ///
    /// # Arguments
    /// * `config` - Grid dimensions, terrain and tuning
    /// * `spawn` - Character start position and whether the session is resumed
    /// * `renderer` - Receives meshes, uniforms and draw calls
    /// * `particles` - Plays removal effects
    ///
    /// # Errors
    /// Fails if the grid dimensions are invalid.
    pub fn new(
        config: &WorldConfig,
        spawn: SpawnState,
        renderer: R,
        particles: P,
    ) -> Result<Self, WorldError> {
        let grid = Grid::new(config)?;

        let mut physics = PhysicsWorld::new(grid.get_world(), config.gravity());
        physics.set_elasticity(DEFAULT_ELASTICITY);
        let character = physics.add_body(
            Aabb::from_center(spawn.position, character_half_extent()),
            CHARACTER_MASS,
        );
        physics[character].set_rotation_locked(true);

        let mut terrain_uniforms = UniformBlock::new(config.uniforms);
        terrain_uniforms.add_light(Light::overhead(1.0));
        let mut preview_uniforms = UniformBlock::new(config.uniforms);
        preview_uniforms.add_light(Light::overhead(0.5));

        let mut world = WorldController {
            grid,
            physics,
            character,
            navigator: Navigator::new(&config.navigation),
            ai_destination: config.ai_destination(),
            ai_mode: false,
            placement: PlacementState::new(),
            placemark: snap(spawn.position),
            terrain_uniforms,
            preview_uniforms,
            renderer,
            particles,
        };

        world.generate_pb();
        world.character_load(spawn);

        info!(
            "World ready: character at {:?} ({})",
            spawn.position,
            if spawn.resumed { "resumed" } else { "fresh" }
        );

        Ok(world)
    }

    fn character_load(&mut self, spawn: SpawnState) {
        self.grid.update(spawn.position);
        self.generate_gb();

        if !spawn.resumed {
            self.placement
                .set_scale(Vector3::new(SPAWN_POCKET, SPAWN_POCKET, SPAWN_POCKET));
            self.remove_block(Point3::new(-1.0, 0.0, -1.0), spawn.position);
            self.reset_scale();
        }
    }

    /// Rebuilds stale chunks in the view window and uploads their combined mesh.
    fn generate_gb(&mut self) {
        self.grid.rebuild_view_meshes();

        let mut mesh = Mesh::new();
        for &key in self.grid.get_view_chunks() {
            if let Some(chunk) = self.grid.get_chunk(key) {
                if !chunk.mesh().is_empty() {
                    mesh.append(chunk.mesh());
                }
            }
        }

        self.renderer.upload_mesh(MeshSlot::Terrain, &mesh);
    }

    /// Builds the placement preview at the current scale and locks in the facing offset.
    fn generate_pb(&mut self) {
        self.placement.lock();
        let offset = self.placement.preview_offset();
        let scale = self.placement.scale();

        let mut mesh = Mesh::new();
        for i in 0..scale.x as i32 {
            for j in 0..scale.y as i32 {
                for k in 0..scale.z as i32 {
                    let p = Point3::new((i * offset.x) as f32, j as f32, (k * offset.z) as f32);
                    mesh.append(&self.grid.atlas_box(p));
                }
            }
        }

        self.renderer.upload_mesh(MeshSlot::Preview, &mesh);
    }

    fn update_uniform(&mut self, camera: &impl CameraView) {
        let target = camera.project_point(PLACEMARK_DISTANCE);
        let ray = Ray::new(camera.position(), target);
        self.placemark = self.grid.ray_trace_before(&ray, PLACE_RANGE);

        self.placement.face(camera.forward());

        let proj_view = camera.proj_view_matrix();
        let view = camera.view_matrix();
        let translate = Matrix4::from_translation(self.placemark.to_vec());

        self.terrain_uniforms.set_matrix(PROJ_VIEW_SLOT, proj_view);
        self.terrain_uniforms.set_matrix(VIEW_SLOT, view);
        self.terrain_uniforms.set_matrix(PLACEMARK_SLOT, translate);

        self.preview_uniforms.set_matrix(PROJ_VIEW_SLOT, proj_view);
        self.preview_uniforms.set_matrix(VIEW_SLOT, view);
        self.preview_uniforms.set_matrix(PLACEMARK_SLOT, translate);
        self.preview_uniforms.set_matrix(
            CAMERA_SLOT,
            Matrix4::from_translation(camera.position().to_vec()),
        );

        self.renderer
            .upload_uniforms(MeshSlot::Terrain, &self.terrain_uniforms);
        self.renderer
            .upload_uniforms(MeshSlot::Preview, &self.preview_uniforms);
    }

    fn character_ai(&mut self) {
        if !self.ai_mode {
            return;
        }

        let position = self.character_position();
        let remaining = position.distance(self.ai_destination);
        match self
            .navigator
            .step(&self.grid, position, self.ai_destination, remaining)
        {
            Some(step) => {
                let body = &mut self.physics[self.character];
                let mass = body.mass();
                body.add_force(step.direction * AI_FORCE * mass);
            }
            None => debug!(
                "No admissible step from {:?} towards {:?}",
                position, self.ai_destination
            ),
        }
    }

    /// Advances the world by one frame.
    ///
    /// # Arguments
    /// * `camera` - The viewer, used for the placemark and the uniform matrices
    /// * `dt` - Frame time in seconds
    pub fn update(&mut self, camera: &impl CameraView, dt: f32) {
        self.character_ai();

        let position = self.character_position();
        if let Some(current) = self.grid.chunk_key(position) {
            if current != self.grid.get_recent_chunk() {
                info!("Character entered chunk {}", current);
                self.grid.update_chunk(current);
                self.generate_gb();
            }
        }

        let step = dt / PHYSICS_SUBSTEPS as f32;
        for _ in 0..PHYSICS_SUBSTEPS {
            let body = &self.physics[self.character];
            let cells = self.grid.create_collision_cells(snap(body.position()));

            let velocity = body.linear_velocity();
            let lateral = Vector3::new(velocity.x, 0.0, velocity.z);
            let friction = lateral * body.mass() * -FRICTION;
            self.physics[self.character].add_force(friction);

            self.physics.solve_static(self.character, &cells, step);
        }

        self.update_uniform(camera);
        self.particles.update(dt);
    }

    /// Issues this frame's draw calls: terrain, the preview in edit mode, then particles.
    pub fn draw(&mut self, dt: f32) {
        self.renderer.draw_mesh(MeshSlot::Terrain);
        if self.placement.edit_mode() {
            self.renderer.draw_mesh(MeshSlot::Preview);
        }
        self.particles.draw(&mut self.renderer, dt);
    }

    /// Places the current material at the cell containing `center`.
    pub fn add_block(&mut self, center: Point3<f32>) {
        self.place_at(snap(center));
    }

    /// Places the current material in front of the first solid cell along `ray`.
    pub fn add_block_ray(&mut self, ray: &Ray) {
        let traced = self.grid.ray_trace_before(ray, PLACE_RANGE);
        self.place_at(traced);
    }

    fn place_at(&mut self, point: Point3<f32>) {
        self.grid.set_geometry(
            point,
            self.placement.scale(),
            self.placement.preview_offset(),
            self.grid.get_atlas(),
        );
        self.rebuild_edited();
        self.generate_gb();
    }

    /// Clears the cells at `point`, throwing debris towards `origin`.
    ///
    /// # Returns
    /// The number of voxels removed.
    pub fn remove_block(&mut self, point: Point3<f32>, origin: Point3<f32>) -> u32 {
        let removed = self.clear_at(snap(point));
        if removed > 0 {
            let away = origin - point;
            let direction = if away.magnitude2() > f32::EPSILON {
                away.normalize()
            } else {
                Vector3::unit_y()
            };
            self.particles.load(point, direction, PARTICLE_STRENGTH);
        }
        removed
    }

    /// Clears the first solid cell along `ray`, throwing debris back along the ray.
    ///
    /// # Returns
    /// The number of voxels removed.
    pub fn remove_block_ray(&mut self, ray: &Ray) -> u32 {
        let traced = self.grid.ray_trace_after(ray, REMOVE_RANGE);
        let removed = self.clear_at(traced);
        if removed > 0 {
            self.particles
                .load(traced, -ray.direction(), PARTICLE_STRENGTH);
        }
        removed
    }

    fn clear_at(&mut self, point: Point3<f32>) -> u32 {
        let removed = self.grid.set_geometry(
            point,
            self.placement.scale(),
            self.placement.preview_offset(),
            EMPTY,
        );
        self.rebuild_edited();
        if removed > 0 {
            self.generate_gb();
        }
        removed
    }

    /// Rebuilds every chunk the last edit touched, in or out of the view window.
    fn rebuild_edited(&mut self) {
        for key in self.grid.take_edited_chunks() {
            self.grid.rebuild_chunk_mesh(key);
        }
    }

    /// Pushes the character along the horizontal part of `vel`.
    pub fn character_move(&mut self, vel: Vector3<f32>) {
        let lateral = Vector3::new(vel.x, 0.0, vel.z);
        if lateral.magnitude2() <= f32::EPSILON {
            return;
        }
        let body = &mut self.physics[self.character];
        let mass = body.mass();
        body.add_force(lateral.normalize() * MOVE_FORCE * mass);
    }

    /// Launches the character along `vel` unless it is already rising or falling.
    pub fn character_jump(&mut self, vel: Vector3<f32>) {
        let body = &mut self.physics[self.character];
        if body.linear_velocity().y.abs() < JUMP_SPEED_LIMIT {
            let mass = body.mass();
            body.add_force(vel * JUMP_FORCE * mass);
        }
    }

    /// Pulls the character towards the first solid cell along `ray` and destroys it.
    ///
    /// # Returns
    /// True if the ray hit something.
    pub fn grappling(&mut self, ray: &Ray) -> bool {
        let traced = self.grid.ray_trace_after(ray, GRAPPLE_RANGE);
        if self.grid.grid_value(traced) == EMPTY {
            return false;
        }

        let pull = traced - ray.origin();
        let d_factor = if pull.magnitude() < GRAPPLE_BOOST_RANGE {
            1.0
        } else {
            0.5
        };
        let y_factor = if ray.direction().y < -0.5 { 0.25 } else { 1.0 };

        let body = &mut self.physics[self.character];
        let mass = body.mass();
        body.add_force(pull * GRAPPLE_FORCE * d_factor * y_factor * mass);

        self.reset_scale();
        self.remove_block(traced, ray.origin());
        true
    }

    /// Flips edit mode and returns the new value.
    pub fn toggle_edit_mode(&mut self) -> bool {
        self.placement.toggle_edit_mode()
    }

    /// Whether edit mode is on.
    pub fn get_edit_mode(&self) -> bool {
        self.placement.edit_mode()
    }

    /// Flips AI mode and returns the new value.
    pub fn toggle_ai_mode(&mut self) -> bool {
        self.ai_mode = !self.ai_mode;
        info!("AI mode {}", if self.ai_mode { "on" } else { "off" });
        self.ai_mode
    }

    /// Whether the navigator drives the character.
    pub fn get_ai_mode(&self) -> bool {
        self.ai_mode
    }

    /// Grows the placement along x. See [`PlacementState::adjust`].
    pub fn set_scale_x(&mut self, delta: i32) {
        self.set_scale(Axis::X, delta);
    }

    /// Grows the placement along y. See [`PlacementState::adjust`].
    pub fn set_scale_y(&mut self, delta: i32) {
        self.set_scale(Axis::Y, delta);
    }

    /// Grows the placement along z. See [`PlacementState::adjust`].
    pub fn set_scale_z(&mut self, delta: i32) {
        self.set_scale(Axis::Z, delta);
    }

    fn set_scale(&mut self, axis: Axis, delta: i32) {
        if self.placement.adjust(axis, delta) == ScaleChange::Regenerate {
            self.generate_pb();
        }
    }

    /// Restores unit scale and regenerates the preview.
    pub fn reset_scale(&mut self) {
        self.placement.reset_scale();
        self.generate_pb();
    }

    /// Changes the placement material and regenerates the preview.
    pub fn set_atlas_id(&mut self, id: AtlasId) {
        self.grid.set_atlas(id);
        self.generate_pb();
    }

    /// Centre of the character body.
    pub fn character_position(&self) -> Point3<f32> {
        self.physics[self.character].position()
    }

    /// The character body.
    pub fn character(&self) -> &Body {
        &self.physics[self.character]
    }

    /// Placement tool state.
    pub fn placement(&self) -> &PlacementState {
        &self.placement
    }

    /// Snapped placement target from the last update.
    pub fn placemark(&self) -> Point3<f32> {
        self.placemark
    }

    /// The voxel grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The render backend.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// The particle emitter.
    pub fn particles(&self) -> &P {
        &self.particles
    }

    /// Uniforms used for the terrain pass.
    pub fn terrain_uniforms(&self) -> &UniformBlock {
        &self.terrain_uniforms
    }

    /// Uniforms used for the preview and particle pass.
    pub fn preview_uniforms(&self) -> &UniformBlock {
        &self.preview_uniforms
    }
}
