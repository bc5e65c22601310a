//! # Navigation Module
//!
//! Single-step pathing for AI-driven bodies.
//!
//! The [`Navigator`] plans one move at a time: each frame it looks at the eight compass
//! directions around the body (each with a climbing variant), discards the ones that would
//! put the body's feet, centre or head inside a solid or out-of-bounds cell, and picks the
//! one that lands closest to the destination. No path is cached between frames, so edits to
//! the grid are honoured on the very next step.

use cgmath::{InnerSpace, MetricSpace, Point3, Vector3, Zero};

use crate::config::NavigationConfig;

use super::voxels::grid::Grid;

/// Vertical distance from the body centre to its feet and head probes.
const PROBE_HEIGHT: f32 = 0.9;

/// Horizontal candidate directions, starting at +x and turning towards +z.
const COMPASS: [(f32, f32); 8] = [
    (1.0, 0.0),
    (1.0, 1.0),
    (0.0, 1.0),
    (-1.0, 1.0),
    (-1.0, 0.0),
    (-1.0, -1.0),
    (0.0, -1.0),
    (1.0, -1.0),
];

/// One planned move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathStep {
    /// Where the body should be after the move.
    pub position: Point3<f32>,
    /// Unit direction of the move, zero once the destination is reached.
    pub direction: Vector3<f32>,
}

/// Plans moves across the voxel grid.
#[derive(Debug, Clone)]
pub struct Navigator {
    step_length: f32,
    arrive_radius: f32,
    climb_penalty: f32,
}

impl Navigator {
    /// Creates a navigator with the given tuning.
    pub fn new(config: &NavigationConfig) -> Self {
        Navigator {
            step_length: config.step_length,
            arrive_radius: config.arrive_radius,
            climb_penalty: config.climb_penalty,
        }
    }

    /// Plans one move from `current` towards `destination`.
    ///
    /// # Arguments
    /// * `grid` - The grid to avoid
    /// * `current` - Centre of the moving body
    /// * `destination` - Where the body is heading
    /// * `remaining_distance` - Upper bound on the length of this move
    ///
    /// # Returns
    /// The chosen step, or `None` when every candidate is blocked. Inside the arrival radius
    /// the step stays at `current` with a zero direction.
    pub fn step(
        &self,
        grid: &Grid,
        current: Point3<f32>,
        destination: Point3<f32>,
        remaining_distance: f32,
    ) -> Option<PathStep> {
        if current.distance(destination) <= self.arrive_radius {
            return Some(PathStep {
                position: current,
                direction: Vector3::zero(),
            });
        }

        let length = self.step_length.min(remaining_distance.max(0.0));
        let mut best: Option<(f32, PathStep)> = None;

        for (dx, dz) in COMPASS {
            for climb in [false, true] {
                let rise = if climb { 1.0 } else { 0.0 };
                let direction = Vector3::new(dx, rise, dz).normalize();
                let position = current + direction * length;
                if !Self::is_clear(grid, position) {
                    continue;
                }

                let mut score = position.distance(destination);
                if climb {
                    score += self.climb_penalty;
                }
                if best.map_or(true, |(best_score, _)| score < best_score) {
                    best = Some((score, PathStep { position, direction }));
                }
            }
        }

        best.map(|(_, step)| step)
    }

    /// True if a body centred on `position` has empty cells at its feet, centre and head.
    fn is_clear(grid: &Grid, position: Point3<f32>) -> bool {
        let probe = Vector3::new(0.0, PROBE_HEIGHT, 0.0);
        grid.is_open(position) && grid.is_open(position - probe) && grid.is_open(position + probe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{TerrainConfig, WorldConfig};
    use crate::engine_state::voxels::block::EMPTY;

    fn floor_grid() -> Grid {
        let mut config = WorldConfig::with_sizes(32, 8, 1);
        config.terrain = TerrainConfig::Flat { height: 0 };
        Grid::new(&config).unwrap()
    }

    fn navigator() -> Navigator {
        Navigator::new(&NavigationConfig::default())
    }

    #[test]
    fn walks_straight_across_open_floor() {
        let grid = floor_grid();
        let start = Point3::new(0.5, 0.95, 0.5);
        let goal = Point3::new(5.5, 0.95, 0.5);
        let step = navigator()
            .step(&grid, start, goal, start.distance(goal))
            .unwrap();
        assert_eq!(step.direction, Vector3::new(1.0, 0.0, 0.0));
        assert!((step.position.x - 1.5).abs() < 1e-5);
    }

    #[test]
    fn short_remaining_distance_shortens_the_step() {
        let grid = floor_grid();
        let start = Point3::new(0.5, 0.95, 0.5);
        let goal = Point3::new(5.5, 0.95, 0.5);
        let step = navigator().step(&grid, start, goal, 0.6).unwrap();
        assert!((step.position.x - 1.1).abs() < 1e-5);
    }

    #[test]
    fn routes_around_a_single_block() {
        let mut grid = floor_grid();
        grid.set_geometry(
            Point3::new(1.5, 0.5, 0.5),
            Vector3::new(1, 1, 1),
            Vector3::new(1, 1, 1),
            2,
        );
        let start = Point3::new(0.5, 0.95, 0.5);
        let goal = Point3::new(5.5, 0.95, 0.5);
        let step = navigator().step(&grid, start, goal, 5.0).unwrap();
        assert!(step.direction.x > 0.0);
        assert!(step.direction.z != 0.0);
        assert!(grid.is_open(step.position));
    }

    #[test]
    fn walled_in_body_fails() {
        let mut grid = floor_grid();
        grid.set_geometry(
            Point3::new(-0.5, 0.5, -0.5),
            Vector3::new(3, 4, 3),
            Vector3::new(1, 1, 1),
            2,
        );
        grid.set_geometry(
            Point3::new(0.5, 0.5, 0.5),
            Vector3::new(1, 4, 1),
            Vector3::new(1, 1, 1),
            EMPTY,
        );
        let start = Point3::new(0.5, 0.95, 0.5);
        let goal = Point3::new(10.5, 0.95, 0.5);
        assert_eq!(navigator().step(&grid, start, goal, 10.0), None);
    }

    #[test]
    fn arrival_returns_current_position() {
        let grid = floor_grid();
        let here = Point3::new(0.5, 0.95, 0.5);
        let step = navigator().step(&grid, here, here, 0.0).unwrap();
        assert_eq!(step.position, here);
        assert_eq!(step.direction, Vector3::zero());
    }
}
