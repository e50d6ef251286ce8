use std::ops::Range;

use glam::Vec3;

use crate::math::point::Point;

/// Half-open ray `origin + t * direction`, `t` in `[bounds.0, bounds.1)`.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Point,
    pub direction: Vec3,
    pub bounds: (f32, f32),
}

impl Ray {
    pub fn new(origin: Point, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
            bounds: (0.0, f32::INFINITY),
        }
    }

    pub fn new_with_range(origin: Point, direction: Vec3, range: Range<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
            bounds: (range.start, range.end),
        }
    }

    pub fn contains(&self, t: f32) -> bool {
        t > self.bounds.0 && t < self.bounds.1
    }

    pub fn at(&self, t: f32) -> Point {
        self.origin + t * self.direction
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use crate::math::point::Point;

    use super::Ray;

    #[test]
    fn ray() {
        let eps = 0.01;
        let ray = Ray::new(Point::new(1., 0., 0.), Vec3::new(-1., 1., 0.));

        assert!(ray.at(0.0).vec().distance_squared(ray.origin.vec()) < eps);
        assert!(
            ray.at(1.0)
                .vec()
                .distance_squared(ray.origin.vec() + ray.direction)
                < eps
        );
    }

    #[test]
    fn range_is_half_open() {
        let ray = Ray::new_with_range(Point::ORIGIN, Vec3::X, 0.1..2.0);
        assert!(!ray.contains(0.1));
        assert!(ray.contains(1.0));
        assert!(!ray.contains(2.0));
    }
}
