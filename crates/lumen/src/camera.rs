use glam::{Mat4, Vec3};

use crate::{math::point::Point, ray::Ray};

/// Pinhole camera. Primary rays go through pixel centers and carry unit
/// density, so regenerating them is only needed when the projection changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Point,
    right: Vec3,
    up: Vec3,
    forward: Vec3,
    vfov: f32,
    aspect: f32,
}

impl Camera {
    pub fn look_at(position: Point, target: Point, up: Vec3, vfov: f32, aspect: f32) -> Self {
        let forward = (target - position).normalize();
        let right = forward.cross(up).normalize();
        Self {
            position,
            right,
            up: right.cross(forward),
            forward,
            vfov,
            aspect,
        }
    }

    /// View-projection matrix. The renderer uses it only as a change-detection
    /// key for its cached primary rays.
    pub fn projection(&self) -> Mat4 {
        let view = Mat4::look_to_rh(self.position.vec(), self.forward, self.up);
        Mat4::perspective_rh(self.vfov, self.aspect, 0.1, 1000.0) * view
    }

    /// Ray through the center of pixel `(i, j)` of a `w x h` image, with the
    /// density it was generated at.
    pub fn sample(&self, i: u32, j: u32, w: u32, h: u32) -> (Ray, f32) {
        let ndc_x = 2.0 * ((i as f32 + 0.5) / w as f32) - 1.0;
        let ndc_y = 1.0 - 2.0 * ((j as f32 + 0.5) / h as f32);
        let half_height = f32::tan(self.vfov / 2.0);
        let dir = ndc_x * half_height * self.aspect * self.right
            + ndc_y * half_height * self.up
            + self.forward;
        (Ray::new(self.position, dir), 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::look_at(
            Point::new(0., 0., 3.),
            Point::ORIGIN,
            Vec3::Y,
            f32::to_radians(60.),
            800.0 / 600.0,
        )
    }

    #[test]
    fn center_pixel_looks_forward() {
        let cam = camera();
        let (ray, pdf) = cam.sample(400, 300, 800, 600);
        assert_eq!(pdf, 1.0);
        assert!(ray.direction.dot(Vec3::NEG_Z) > 0.999);
    }

    #[test]
    fn corners_diverge_symmetrically() {
        let cam = camera();
        let (top_left, _) = cam.sample(0, 0, 800, 600);
        let (bottom_right, _) = cam.sample(799, 599, 800, 600);
        assert!(top_left.direction.x < 0.0 && top_left.direction.y > 0.0);
        assert!(bottom_right.direction.x > 0.0 && bottom_right.direction.y < 0.0);
        assert!((top_left.direction.x + bottom_right.direction.x).abs() < 1e-2);
    }

    #[test]
    fn projection_changes_with_pose() {
        let a = camera().projection();
        let b = Camera::look_at(
            Point::new(0., 0., 4.),
            Point::ORIGIN,
            Vec3::Y,
            f32::to_radians(60.),
            800.0 / 600.0,
        )
        .projection();
        assert_ne!(a, b);
    }
}
