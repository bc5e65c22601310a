use cgmath::{EuclideanSpace, Point3, Vector3};

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: Point3<f32>,
    /// Maximum corner
    pub max: Point3<f32>,
}

impl Aabb {
    /// Creates a box from its corners.
    pub fn new(min: Point3<f32>, max: Point3<f32>) -> Self {
        Aabb { min, max }
    }

    /// Creates a box from its center and half extent.
    pub fn from_center(center: Point3<f32>, half_extent: Vector3<f32>) -> Self {
        Aabb {
            min: center - half_extent,
            max: center + half_extent,
        }
    }

    /// The unit box covering an integer cell.
    pub fn cell(cell: Point3<i32>) -> Self {
        let min = Point3::new(cell.x as f32, cell.y as f32, cell.z as f32);
        Aabb {
            min,
            max: min + Vector3::new(1.0, 1.0, 1.0),
        }
    }

    /// Center of the box.
    pub fn center(&self) -> Point3<f32> {
        self.min.midpoint(self.max)
    }

    /// True if `point` lies inside the box (min inclusive, max exclusive).
    pub fn contains(&self, point: Point3<f32>) -> bool {
        point.x >= self.min.x
            && point.y >= self.min.y
            && point.z >= self.min.z
            && point.x < self.max.x
            && point.y < self.max.y
            && point.z < self.max.z
    }

    /// Minimum translation separating this box from `other`.
    ///
    /// # Returns
    /// `Some((normal, depth))` where moving this box by `normal * depth` resolves the overlap,
    /// or `None` when the boxes do not overlap. The normal points away from `other` along the
    /// axis of least penetration.
    pub fn penetration(&self, other: &Aabb) -> Option<(Vector3<f32>, f32)> {
        let overlap = [
            self.max.x.min(other.max.x) - self.min.x.max(other.min.x),
            self.max.y.min(other.max.y) - self.min.y.max(other.min.y),
            self.max.z.min(other.max.z) - self.min.z.max(other.min.z),
        ];
        if overlap.iter().any(|o| *o <= 0.0) {
            return None;
        }

        let mut axis = 0;
        if overlap[1] < overlap[axis] {
            axis = 1;
        }
        if overlap[2] < overlap[axis] {
            axis = 2;
        }

        let delta = self.center() - other.center();
        let mut normal = Vector3::new(0.0, 0.0, 0.0);
        normal[axis] = if delta[axis] >= 0.0 { 1.0 } else { -1.0 };
        Some((normal, overlap[axis]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn penetration_picks_shallow_axis() {
        let body = Aabb::from_center(Point3::new(0.5, 1.9, 0.5), Vector3::new(0.45, 0.95, 0.45));
        let floor = Aabb::cell(Point3::new(0, 0, 0));
        let (normal, depth) = body.penetration(&floor).unwrap();
        assert_eq!(normal, Vector3::new(0.0, 1.0, 0.0));
        assert!((depth - 0.05).abs() < 1e-5);
    }

    #[test]
    fn touching_boxes_do_not_overlap() {
        let a = Aabb::cell(Point3::new(0, 0, 0));
        let b = Aabb::cell(Point3::new(1, 0, 0));
        assert!(a.penetration(&b).is_none());
    }
}
