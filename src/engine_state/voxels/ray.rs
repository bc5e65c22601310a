//! # Ray Module
//!
//! Rays used for placement, removal and grapple queries, and the cell-by-cell march that
//! walks a ray through the voxel lattice.

use cgmath::{InnerSpace, Point3, Vector3};

/// A half-line with a normalized direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    origin: Point3<f32>,
    direction: Vector3<f32>,
}

impl Ray {
    /// Creates a ray starting at `origin` and pointing at `destination`.
    ///
    /// If the two points coincide the ray points down the negative z axis.
    pub fn new(origin: Point3<f32>, destination: Point3<f32>) -> Self {
        Self::from_direction(origin, destination - origin)
    }

    /// Creates a ray from an origin and a (not necessarily normalized) direction.
    pub fn from_direction(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        let direction = if direction.magnitude2() > f32::EPSILON {
            direction.normalize()
        } else {
            Vector3::new(0.0, 0.0, -1.0)
        };
        Self { origin, direction }
    }

    /// Where the ray starts.
    pub fn origin(&self) -> Point3<f32> {
        self.origin
    }

    /// Unit direction of the ray.
    pub fn direction(&self) -> Vector3<f32> {
        self.direction
    }

    /// The point `distance` units along the ray.
    pub fn point_at(&self, distance: f32) -> Point3<f32> {
        self.origin + self.direction * distance
    }

    /// Iterates the integer cells the ray passes through, nearest first, up to `max_dist`.
    pub fn cells(&self, max_dist: f32) -> CellMarch {
        CellMarch::new(self, max_dist)
    }
}

/// Snaps a point to the center of its containing unit cell.
#[inline]
pub fn snap(point: Point3<f32>) -> Point3<f32> {
    Point3::new(
        point.x.floor() + 0.5,
        point.y.floor() + 0.5,
        point.z.floor() + 0.5,
    )
}

/// Integer cell containing a point.
#[inline]
pub fn cell_of(point: Point3<f32>) -> Point3<i32> {
    Point3::new(
        point.x.floor() as i32,
        point.y.floor() as i32,
        point.z.floor() as i32,
    )
}

/// Center of an integer cell.
#[inline]
pub fn cell_center(cell: Point3<i32>) -> Point3<f32> {
    Point3::new(
        cell.x as f32 + 0.5,
        cell.y as f32 + 0.5,
        cell.z as f32 + 0.5,
    )
}

/// Cell traversal along a ray (Amanatides & Woo).
///
/// Each item is a cell together with the ray distance at which the ray enters it.
#[derive(Debug, Clone)]
pub struct CellMarch {
    cell: [i32; 3],
    step: [i32; 3],
    t_max: [f32; 3],
    t_delta: [f32; 3],
    t: f32,
    max_dist: f32,
}

impl CellMarch {
    fn new(ray: &Ray, max_dist: f32) -> Self {
        let origin = [ray.origin.x, ray.origin.y, ray.origin.z];
        let direction = [ray.direction.x, ray.direction.y, ray.direction.z];

        let mut cell = [0; 3];
        let mut step = [0; 3];
        let mut t_max = [f32::INFINITY; 3];
        let mut t_delta = [f32::INFINITY; 3];
        for axis in 0..3 {
            cell[axis] = origin[axis].floor() as i32;
            let d = direction[axis];
            if d > 0.0 {
                step[axis] = 1;
                t_delta[axis] = 1.0 / d;
                t_max[axis] = (cell[axis] as f32 + 1.0 - origin[axis]) / d;
            } else if d < 0.0 {
                step[axis] = -1;
                t_delta[axis] = -1.0 / d;
                t_max[axis] = (cell[axis] as f32 - origin[axis]) / d;
            }
        }

        Self {
            cell,
            step,
            t_max,
            t_delta,
            t: 0.0,
            max_dist,
        }
    }
}

impl Iterator for CellMarch {
    type Item = (Point3<i32>, f32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.t > self.max_dist {
            return None;
        }
        let current = (Point3::new(self.cell[0], self.cell[1], self.cell[2]), self.t);

        // Advance along the axis whose boundary is crossed first
        let mut axis = 0;
        if self.t_max[1] < self.t_max[axis] {
            axis = 1;
        }
        if self.t_max[2] < self.t_max[axis] {
            axis = 2;
        }
        self.t = self.t_max[axis];
        self.cell[axis] = self.cell[axis].saturating_add(self.step[axis]);
        self.t_max[axis] += self.t_delta[axis];

        Some(current)
    }
}
