//! # Particles Module
//!
//! Short-lived visual effects spawned by world edits.
//!
//! The world only knows the [`ParticleEmitter`] trait. [`ExplodeParticles`] is the CPU
//! implementation shipped with the crate: each burst spawns a fixed number of particles
//! launched along a direction with seeded random jitter, which then fall under gravity until
//! their lifetime runs out.

use cgmath::{Point3, Vector3};

use crate::config::ParticleConfig;

use super::rendering::RenderBackend;

/// A particle effect collaborator.
pub trait ParticleEmitter {
    /// Spawns a burst at `origin` travelling along `direction`.
    fn load(&mut self, origin: Point3<f32>, direction: Vector3<f32>, strength: f32);

    /// Advances every live particle by `dt` seconds.
    fn update(&mut self, dt: f32);

    /// Hands the live particles to the render backend.
    fn draw(&self, renderer: &mut dyn RenderBackend, dt: f32);
}

#[derive(Debug, Clone, Copy)]
struct Particle {
    position: Point3<f32>,
    velocity: Vector3<f32>,
    age: f32,
}

/// Debris bursts for removed voxels.
#[derive(Debug)]
pub struct ExplodeParticles {
    particles: Vec<Particle>,
    config: ParticleConfig,
    gravity: Vector3<f32>,
    rng: fastrand::Rng,
}

impl ExplodeParticles {
    /// Creates an emitter with no live particles.
    ///
    /// # Arguments
    /// * `config` - Burst size, lifetime, spread and seed
    /// * `gravity` - Acceleration applied to every particle
    pub fn new(config: ParticleConfig, gravity: Vector3<f32>) -> Self {
        ExplodeParticles {
            particles: Vec::new(),
            config,
            gravity,
            rng: fastrand::Rng::with_seed(config.seed),
        }
    }

    /// Number of live particles.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// True if no particle is alive.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Positions of the live particles.
    pub fn positions(&self) -> Vec<Point3<f32>> {
        self.particles.iter().map(|p| p.position).collect()
    }

    fn jitter(&mut self) -> f32 {
        (self.rng.f32() * 2.0 - 1.0) * self.config.spread
    }
}

impl ParticleEmitter for ExplodeParticles {
    fn load(&mut self, origin: Point3<f32>, direction: Vector3<f32>, strength: f32) {
        self.particles.reserve(self.config.count);
        for _ in 0..self.config.count {
            let jitter = Vector3::new(self.jitter(), self.jitter(), self.jitter());
            self.particles.push(Particle {
                position: origin,
                velocity: direction * strength + jitter,
                age: 0.0,
            });
        }
    }

    fn update(&mut self, dt: f32) {
        let gravity = self.gravity;
        let lifetime = self.config.lifetime;
        for particle in &mut self.particles {
            particle.age += dt;
            particle.velocity += gravity * dt;
            particle.position += particle.velocity * dt;
        }
        self.particles.retain(|p| p.age < lifetime);
    }

    fn draw(&self, renderer: &mut dyn RenderBackend, dt: f32) {
        renderer.draw_points(&self.positions(), dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::rendering::HeadlessBackend;

    fn emitter() -> ExplodeParticles {
        ExplodeParticles::new(ParticleConfig::default(), Vector3::new(0.0, -10.0, 0.0))
    }

    #[test]
    fn burst_spawns_configured_count() {
        let mut particles = emitter();
        particles.load(Point3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 1.0, 0.0), 5.0);
        assert_eq!(particles.len(), ParticleConfig::default().count);

        let mut backend = HeadlessBackend::new();
        particles.draw(&mut backend, 0.016);
        assert_eq!(backend.last_point_count, particles.len());
    }

    #[test]
    fn particles_expire_after_lifetime() {
        let mut particles = emitter();
        particles.load(Point3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0), 5.0);
        particles.update(0.5);
        assert!(!particles.is_empty());
        particles.update(0.6);
        assert!(particles.is_empty());
    }

    #[test]
    fn same_seed_same_burst() {
        let mut a = emitter();
        let mut b = emitter();
        for p in [&mut a, &mut b] {
            p.load(Point3::new(1.0, 2.0, 3.0), Vector3::new(0.0, 0.0, 1.0), 5.0);
            p.update(0.1);
        }
        assert_eq!(a.positions(), b.positions());
    }
}
