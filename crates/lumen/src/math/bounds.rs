use glam::Vec3;

use crate::ray::Ray;

use super::point::Point;

/// Axis aligned bounding box.
#[derive(Debug, Clone, Copy)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    /// The identity of [Bounds::union]: contains nothing.
    pub const EMPTY: Bounds = Bounds {
        min: Point(Vec3::INFINITY),
        max: Point(Vec3::NEG_INFINITY),
    };

    pub fn from_points(a: Point, b: Point) -> Self {
        Self {
            min: Point(a.vec().min(b.vec())),
            max: Point(a.vec().max(b.vec())),
        }
    }

    pub fn union(self, other: Bounds) -> Bounds {
        Bounds {
            min: Point(self.min.vec().min(other.min.vec())),
            max: Point(self.max.vec().max(other.max.vec())),
        }
    }

    pub fn grow(self, p: Point) -> Bounds {
        self.union(Bounds::from_points(p, p))
    }

    pub fn diag(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn centroid(&self) -> Point {
        self.min + 0.5 * self.diag()
    }

    pub fn is_empty(&self) -> bool {
        let d = self.diag();
        d.x < 0.0 || d.y < 0.0 || d.z < 0.0
    }

    /// Slab test against the ray's `[t_min, t_max]` window. Returns the entry
    /// and exit abscissae when the ray overlaps the box.
    pub fn ray_intersect(&self, ray: &Ray) -> Option<(f32, f32)> {
        let inv = ray.direction.recip();
        let t0 = (self.min - ray.origin) * inv;
        let t1 = (self.max - ray.origin) * inv;

        let t_enter = t0.min(t1).max_element().max(ray.bounds.0);
        let t_exit = t0.max(t1).min_element().min(ray.bounds.1);

        (t_enter <= t_exit).then_some((t_enter, t_exit))
    }
}
