//! # Physics Module
//!
//! Axis-aligned rigid bodies integrated against the voxel grid.
//!
//! ## Integration
//!
//! [`PhysicsWorld::solve_static`] advances one body by one sub-step using explicit Euler
//! integration, then pushes it out of each static cell it overlaps along the axis of least
//! penetration. Velocity into a contact is reflected with the world's elasticity, and the
//! body is finally clamped inside the world box.
//!
//! Forces accumulate between solves and are cleared by the solve that applies them, so a
//! force added once per frame acts during the first sub-step only.
//!
//! Bodies live in an arena owned by the world and are addressed by [`BodyId`].

use std::ops::{Index, IndexMut};

use cgmath::{InnerSpace, Vector3};
use log::debug;

mod aabb;
mod body;

pub use aabb::Aabb;
pub use body::Body;

/// Restitution applied when a body hits a static cell.
pub const DEFAULT_ELASTICITY: f32 = 0.1;

/// Handle to a body stored in a [`PhysicsWorld`].
///
/// Handles are only minted by [`PhysicsWorld::add_body`] and bodies are never removed, so
/// indexing the world that issued a handle always succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(usize);

/// Owner of every dynamic body and the global simulation parameters.
#[derive(Debug)]
pub struct PhysicsWorld {
    bodies: Vec<Body>,
    world: Aabb,
    gravity: Vector3<f32>,
    elasticity: f32,
}

impl PhysicsWorld {
    /// Creates an empty world.
    ///
    /// # Arguments
    /// * `world` - Box every body is kept inside
    /// * `gravity` - Acceleration applied to every dynamic body
    pub fn new(world: Aabb, gravity: Vector3<f32>) -> Self {
        PhysicsWorld {
            bodies: Vec::new(),
            world,
            gravity,
            elasticity: DEFAULT_ELASTICITY,
        }
    }

    /// Sets the restitution used for static contacts.
    pub fn set_elasticity(&mut self, elasticity: f32) {
        self.elasticity = elasticity;
    }

    /// Restitution used for static contacts.
    pub fn elasticity(&self) -> f32 {
        self.elasticity
    }

    /// Acceleration applied to every dynamic body.
    pub fn gravity(&self) -> Vector3<f32> {
        self.gravity
    }

    /// The box bodies are confined to.
    pub fn world(&self) -> Aabb {
        self.world
    }

    /// Adds a body occupying `aabb` and returns its handle.
    pub fn add_body(&mut self, aabb: Aabb, mass: f32) -> BodyId {
        self.bodies.push(Body::new(aabb, mass));
        let id = BodyId(self.bodies.len() - 1);
        debug!("Added body {:?} at {:?} with mass {}", id, aabb.center(), mass);
        id
    }

    /// Looks up a body.
    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.0)
    }

    /// Looks up a body for modification.
    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(id.0)
    }

    /// Number of bodies in the world.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// True if no body was added yet.
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Advances body `id` by `dt` seconds against the static boxes in `cells`.
    ///
    /// Static bodies and unknown ids are left untouched.
    pub fn solve_static(&mut self, id: BodyId, cells: &[Aabb], dt: f32) {
        let gravity = self.gravity;
        let elasticity = self.elasticity;
        let world = self.world;
        let Some(body) = self.bodies.get_mut(id.0) else {
            return;
        };
        if body.inv_mass() == 0.0 {
            return;
        }

        let force = body.take_force();
        let mut velocity = body.linear_velocity() + (gravity + force * body.inv_mass()) * dt;
        let mut position = body.position() + velocity * dt;
        let half_extent = body.half_extent();

        for cell in cells {
            let aabb = Aabb::from_center(position, half_extent);
            let Some((normal, depth)) = aabb.penetration(cell) else {
                continue;
            };
            position += normal * depth;
            let approach = velocity.dot(normal);
            if approach < 0.0 {
                velocity -= normal * approach * (1.0 + elasticity);
            }
        }

        for axis in 0..3 {
            let lower = world.min[axis] + half_extent[axis];
            let upper = world.max[axis] - half_extent[axis];
            if position[axis] < lower {
                position[axis] = lower;
                velocity[axis] = velocity[axis].max(0.0);
            } else if position[axis] > upper {
                position[axis] = upper;
                velocity[axis] = velocity[axis].min(0.0);
            }
        }

        body.set_position(position);
        body.set_linear_velocity(velocity);
    }
}

impl Index<BodyId> for PhysicsWorld {
    type Output = Body;

    fn index(&self, id: BodyId) -> &Body {
        &self.bodies[id.0]
    }
}

impl IndexMut<BodyId> for PhysicsWorld {
    fn index_mut(&mut self, id: BodyId) -> &mut Body {
        &mut self.bodies[id.0]
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Point3;

    use super::*;

    fn world() -> PhysicsWorld {
        PhysicsWorld::new(
            Aabb::new(Point3::new(-16.0, -16.0, -16.0), Point3::new(16.0, 16.0, 16.0)),
            Vector3::new(0.0, -10.0, 0.0),
        )
    }

    fn character(physics: &mut PhysicsWorld, center: Point3<f32>) -> BodyId {
        physics.add_body(
            Aabb::from_center(center, Vector3::new(0.45, 0.95, 0.45)),
            10.0,
        )
    }

    #[test]
    fn free_fall_uses_explicit_euler() {
        let mut physics = world();
        let id = character(&mut physics, Point3::new(0.5, 5.0, 0.5));
        physics.solve_static(id, &[], 0.1);
        let body = physics.body(id).unwrap();
        assert!((body.linear_velocity().y + 1.0).abs() < 1e-5);
        assert!((body.position().y - 4.9).abs() < 1e-5);
    }

    #[test]
    fn forces_apply_once() {
        let mut physics = world();
        physics.set_elasticity(0.0);
        let id = character(&mut physics, Point3::new(0.5, 5.0, 0.5));
        physics
            .body_mut(id)
            .unwrap()
            .add_force(Vector3::new(100.0, 0.0, 0.0));
        physics.solve_static(id, &[], 0.1);
        physics.solve_static(id, &[], 0.1);

        let body = physics.body(id).unwrap();
        assert_eq!(body.force(), Vector3::new(0.0, 0.0, 0.0));
        assert!((body.linear_velocity().x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn floor_stops_and_bounces() {
        let mut physics = world();
        let id = character(&mut physics, Point3::new(0.5, 1.0, 0.5));
        physics
            .body_mut(id)
            .unwrap()
            .set_linear_velocity(Vector3::new(0.0, -5.0, 0.0));
        let floor = [Aabb::cell(Point3::new(0, -1, 0))];
        physics.solve_static(id, &floor, 0.02);

        let body = physics.body(id).unwrap();
        assert!((body.position().y - 0.95).abs() < 1e-4);
        // Reflected with 10% restitution
        assert!(body.linear_velocity().y > 0.0);
        assert!(body.linear_velocity().y < 1.0);
    }

    #[test]
    fn bodies_stay_inside_the_world() {
        let mut physics = world();
        let id = character(&mut physics, Point3::new(0.0, -14.0, 0.0));
        for _ in 0..200 {
            physics.solve_static(id, &[], 0.01);
        }
        let body = physics.body(id).unwrap();
        assert!((body.position().y - (-16.0 + 0.95)).abs() < 1e-4);
        assert!(body.linear_velocity().y <= 0.0 && body.linear_velocity().y > -0.2);
    }

    #[test]
    fn static_bodies_do_not_move() {
        let mut physics = world();
        let id = physics.add_body(Aabb::cell(Point3::new(0, 0, 0)), 0.0);
        physics.solve_static(id, &[], 1.0);
        assert_eq!(physics.body(id).unwrap().position(), Point3::new(0.5, 0.5, 0.5));
    }
}
