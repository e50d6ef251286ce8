use glam::Vec3;
use rand::{distributions::Uniform, prelude::Distribution};

use crate::{
    material::MaterialId,
    math::{bounds::Bounds, point::Point},
    ray::Ray,
    Rng,
};

use super::{Intersection, IntersectionResult, ObjId, Shape, SurfaceSample};

/// Planar parallelogram spanned by two edges from a corner. The walls and
/// lamps of box-like scenes are quads; uv is the position in edge space.
pub struct Quad {
    origin: Point,
    edge_u: Vec3,
    edge_v: Vec3,
    normal: Vec3,
    area: f32,
    pub obj: ObjId,
    pub material: MaterialId,
}

impl Quad {
    pub fn new(origin: Point, edge_u: Vec3, edge_v: Vec3, obj: ObjId, material: MaterialId) -> Self {
        let cross = edge_u.cross(edge_v);
        Self {
            origin,
            edge_u,
            edge_v,
            normal: cross.normalize(),
            area: cross.length(),
            obj,
            material,
        }
    }
}

impl Shape for Quad {
    fn intersect(&self, ray: Ray) -> IntersectionResult {
        let denom = self.normal.dot(ray.direction);
        if denom.abs() < 1e-9 {
            return IntersectionResult::Miss;
        }

        let t = self.normal.dot(self.origin - ray.origin) / denom;
        if !ray.contains(t) {
            return IntersectionResult::Miss;
        }

        // Decompose the hit into edge coordinates.
        let local = ray.at(t) - self.origin;
        let w = self.normal / self.normal.dot(self.edge_u.cross(self.edge_v));
        let u = w.dot(local.cross(self.edge_v));
        let v = w.dot(self.edge_u.cross(local));
        if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
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
        Bounds::from_points(self.origin, self.origin + self.edge_u)
            .grow(self.origin + self.edge_v)
            .grow(self.origin + self.edge_u + self.edge_v)
    }

    fn sample_surface(&self, rng: &mut Rng) -> SurfaceSample {
        let uniform = Uniform::new(0., 1.);
        let u = uniform.sample(rng);
        let v = uniform.sample(rng);
        SurfaceSample {
            p: self.origin + u * self.edge_u + v * self.edge_v,
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
