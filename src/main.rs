//! # Voxel World Demo Entry Point
//!
//! This is the main entry point for the headless demo session.
//! It simply calls into the library's `run()` function.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- world.json
//! ```

fn main() {
    if let Err(e) = voxel_world::run() {
        log::error!("{e}");
        eprintln!("{e}");
        std::process::exit(1);
    }
}
