use cgmath::{Point3, Vector3, Zero};

use super::aabb::Aabb;

/// A dynamic axis-aligned body.
///
/// Bodies never rotate; `rotation_locked` is recorded for callers that mirror the body onto
/// an orientable model.
#[derive(Debug, Clone)]
pub struct Body {
    position: Point3<f32>,
    half_extent: Vector3<f32>,
    linear_velocity: Vector3<f32>,
    force: Vector3<f32>,
    mass: f32,
    inv_mass: f32,
    rotation_locked: bool,
}

impl Body {
    /// Creates a body occupying `aabb` at rest.
    ///
    /// A non-positive `mass` makes the body static.
    pub fn new(aabb: Aabb, mass: f32) -> Self {
        Body {
            position: aabb.center(),
            half_extent: (aabb.max - aabb.min) * 0.5,
            linear_velocity: Vector3::zero(),
            force: Vector3::zero(),
            mass: mass.max(0.0),
            inv_mass: if mass > 0.0 { 1.0 / mass } else { 0.0 },
            rotation_locked: false,
        }
    }

    /// Center of the body.
    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    /// Moves the body without touching its velocity.
    pub fn set_position(&mut self, position: Point3<f32>) {
        self.position = position;
    }

    /// Half the size of the body along each axis.
    pub fn half_extent(&self) -> Vector3<f32> {
        self.half_extent
    }

    /// The box the body currently occupies.
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.position, self.half_extent)
    }

    /// Current velocity.
    pub fn linear_velocity(&self) -> Vector3<f32> {
        self.linear_velocity
    }

    /// Overwrites the velocity.
    pub fn set_linear_velocity(&mut self, velocity: Vector3<f32>) {
        self.linear_velocity = velocity;
    }

    /// Accumulates a force, applied and cleared by the next solve.
    pub fn add_force(&mut self, force: Vector3<f32>) {
        self.force += force;
    }

    /// Force accumulated since the last solve.
    pub fn force(&self) -> Vector3<f32> {
        self.force
    }

    pub(super) fn take_force(&mut self) -> Vector3<f32> {
        std::mem::replace(&mut self.force, Vector3::zero())
    }

    /// Mass of the body.
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Zero for static bodies.
    pub fn inv_mass(&self) -> f32 {
        self.inv_mass
    }

    /// Marks the body as unrotatable.
    pub fn set_rotation_locked(&mut self, locked: bool) {
        self.rotation_locked = locked;
    }

    /// Whether the body is marked unrotatable.
    pub fn is_rotation_locked(&self) -> bool {
        self.rotation_locked
    }
}
