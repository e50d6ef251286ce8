use rand::{distributions::Uniform, prelude::Distribution};

use crate::{
    material::MaterialId,
    math::{bounds::Bounds, point::Point},
    ray::Ray,
    Rng,
};

use super::{Intersection, IntersectionResult, ObjId, Shape, SurfaceSample};

/// A single triangle with the geometric normal of its winding order
/// (counter-clockwise seen from the front).
pub struct Triangle {
    a: Point,
    edge_ab: glam::Vec3,
    edge_ac: glam::Vec3,
    normal: glam::Vec3,
    area: f32,
    pub obj: ObjId,
    pub material: MaterialId,
}

impl Triangle {
    pub fn new(a: Point, b: Point, c: Point, obj: ObjId, material: MaterialId) -> Self {
        let edge_ab = b - a;
        let edge_ac = c - a;
        let cross = edge_ab.cross(edge_ac);
        Self {
            a,
            edge_ab,
            edge_ac,
            normal: cross.normalize(),
            area: 0.5 * cross.length(),
            obj,
            material,
        }
    }
}

impl Shape for Triangle {
    /// Moller-Trumbore, no backface culling; the stored normal is returned
    /// regardless of the side being hit.
    fn intersect(&self, ray: Ray) -> IntersectionResult {
        let p = ray.direction.cross(self.edge_ac);
        let det = self.edge_ab.dot(p);
        if det.abs() < 1e-9 {
            return IntersectionResult::Miss;
        }

        let inv_det = 1.0 / det;
        let s = ray.origin - self.a;
        let u = s.dot(p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return IntersectionResult::Miss;
        }
        let q = s.cross(self.edge_ab);
        let v = ray.direction.dot(q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return IntersectionResult::Miss;
        }

        let t = self.edge_ac.dot(q) * inv_det;
        if !ray.contains(t) {
            return IntersectionResult::Miss;
        }

        IntersectionResult::Hit(Intersection {
            t,
            point: ray.at(t),
            normal: self.normal,
            uv: [u, v],
            obj: self.obj,
            material: self.material,
        })
    }

    fn bounding_box(&self) -> Bounds {
        Bounds::from_points(self.a, self.a + self.edge_ab).grow(self.a + self.edge_ac)
    }

    fn sample_surface(&self, rng: &mut Rng) -> SurfaceSample {
        let uniform = Uniform::new(0., 1.);
        let su = f32::sqrt(uniform.sample(rng));
        let u = 1.0 - su;
        let v = su * uniform.sample(rng);
        SurfaceSample {
            p: self.a + u * self.edge_ab + v * self.edge_ac,
            n: self.normal,
            area_dens: 1.0 / self.area,
        }
    }

    fn area(&self) -> f32 {
        self.area
    }

    fn obj_id(&self) -> ObjId {
        self.obj
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::Seed;

    fn triangle() -> Triangle {
        Triangle::new(
            Point::new(-1., -1., 0.),
            Point::new(1., -1., 0.),
            Point::new(-1., 1., 0.),
            ObjId(1),
            MaterialId(0),
        )
    }

    #[test]
    fn hit_inside() {
        let ray = Ray::new(Point::new(-0.5, -0.5, 3.), Vec3::NEG_Z);
        let hit = *triangle().intersect(ray).hit().expect("should hit");
        assert!((hit.t - 3.0).abs() < 1e-4);
        assert!(hit.normal.dot(Vec3::Z) > 0.99);
    }

    #[test]
    fn miss_outside() {
        let ray = Ray::new(Point::new(0.9, 0.9, 3.), Vec3::NEG_Z);
        assert!(!triangle().intersect(ray).is_hit());
    }

    #[test]
    fn parallel_ray_misses() {
        let ray = Ray::new(Point::new(-5., -0.5, 0.), Vec3::X);
        assert!(!triangle().intersect(ray).is_hit());
    }

    #[test]
    fn area_and_samples() {
        let tri = triangle();
        assert!((tri.area() - 2.0).abs() < 1e-5);

        let mut rng = Seed {
            seed: 0,
            x: 0,
            y: 0,
            pass: 0,
        }
        .into_rng(0);
        for _ in 0..64 {
            let s = tri.sample_surface(&mut rng);
            // In the triangle's plane and inside its barycentric range.
            assert!(s.p.vec().z.abs() < 1e-6);
            assert!(s.p.vec().x >= -1.0 - 1e-6 && s.p.vec().y >= -1.0 - 1e-6);
            assert!(s.p.vec().x + s.p.vec().y <= 0.0 + 1e-5);
        }
    }
}
