#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel World
//!
//! An interactive voxel world: a chunked grid of textured voxels, a physically simulated
//! character that walks, jumps and grapples through it, a placement tool for building and
//! digging, and a single-step navigator that can drive the character on its own.
//!
//! ## Key Modules
//!
//! * `config` - World construction parameters, loadable from JSON
//! * `engine_state` - The world controller and every subsystem it drives
//! * `error` - Construction errors
//!
//! ## Architecture
//!
//! The crate does not talk to a GPU or a window. Rendering, the camera and particle effects
//! are reached through the `RenderBackend`, `CameraView` and `ParticleEmitter` traits; the
//! crate ships a headless backend, a first-person camera and a CPU particle system that
//! implement them.
//!
//! ## Usage
//!
//! ```no_run
//! // Native demo entry point
//! fn main() {
//!     if let Err(e) = voxel_world::run() {
//!         eprintln!("{e}");
//!     }
//! }
//! ```

use cgmath::{Point3, Vector3};
use log::info;
use web_time::Instant;

use config::WorldConfig;
use engine_state::camera_state::CameraState;
use engine_state::particles::ExplodeParticles;
use engine_state::rendering::HeadlessBackend;
use engine_state::voxels::ray::Ray;
use engine_state::{SpawnState, WorldController};
use error::WorldError;

pub mod config;
pub mod engine_state;
pub mod error;

/// Simulated frame rate of the demo session.
const DEMO_FPS: u32 = 60;
/// Length of the demo session in seconds.
const DEMO_SECONDS: u32 = 5;

/// Runs a short headless session and logs the character's trajectory.
///
/// The first command line argument, if present, is the path of a JSON [`WorldConfig`].
///
/// # Errors
/// Fails if the config cannot be read or describes an invalid grid.
pub fn run() -> Result<(), WorldError> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let config = match std::env::args().nth(1) {
        Some(path) => WorldConfig::from_path(path)?,
        None => {
            info!("No config path given, using defaults");
            WorldConfig::default()
        }
    };

    let start = Instant::now();
    let particles = ExplodeParticles::new(config.particles, config.gravity());
    let mut world = WorldController::new(
        &config,
        SpawnState::fresh(Point3::new(0.5, 1.0, 0.5)),
        HeadlessBackend::new(),
        particles,
    )?;
    info!("World initialization took {:?}", start.elapsed());

    let mut camera = CameraState::new(world.character_position(), 1280, 720);
    let dt = 1.0 / DEMO_FPS as f32;

    for frame in 0..DEMO_FPS * DEMO_SECONDS {
        camera.set_position(world.character_position());

        match frame {
            // Build a small tower in front of the character
            30 => {
                world.set_atlas_id(2);
                world.toggle_edit_mode();
                world.set_scale_y(2);
                let target = world.placemark();
                world.add_block(target);
                world.reset_scale();
                world.toggle_edit_mode();
            }
            // Dig it out again
            60 => {
                let ray = Ray::new(camera.camera.position, world.placemark());
                let removed = world.remove_block_ray(&ray);
                info!("Removed {} voxels", removed);
            }
            90 => {
                world.character_jump(Vector3::new(0.0, 1.0, 0.0));
            }
            120 => {
                world.toggle_ai_mode();
            }
            _ => world.character_move(camera.camera.get_view_vec()),
        }

        world.update(&camera, dt);
        world.draw(dt);

        if frame % DEMO_FPS == 0 {
            info!(
                "t = {:.1}s character at {:?}",
                frame as f32 * dt,
                world.character_position()
            );
        }
    }

    info!(
        "Session finished: {} terrain vertices, {} draw calls",
        world
            .renderer()
            .mesh(engine_state::rendering::MeshSlot::Terrain)
            .vertex_count(),
        world.renderer().draws.len()
    );

    Ok(())
}
