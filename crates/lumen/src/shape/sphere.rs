use rand::prelude::Distribution;

use crate::{
    material::MaterialId,
    math::{
        bounds::Bounds,
        distributions::{sphere_uv_from_direction, UniformSphere},
        point::Point,
    },
    ray::Ray,
    Rng,
};

use super::{Intersection, IntersectionResult, ObjId, Shape, SurfaceSample};

pub struct Sphere {
    pub center: Point,
    pub radius: f32,
    pub obj: ObjId,
    pub material: MaterialId,
}

impl Shape for Sphere {
    fn intersect(&self, ray: Ray) -> IntersectionResult {
        let oc = ray.origin - self.center;
        let b = oc.dot(ray.direction);
        let c = oc.length_squared() - self.radius * self.radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return IntersectionResult::Miss;
        }

        let sqrt_d = discriminant.sqrt();
        let t = [-b - sqrt_d, -b + sqrt_d]
            .into_iter()
            .find(|&t| ray.contains(t));
        let Some(t) = t else {
            return IntersectionResult::Miss;
        };

        let point = ray.at(t);
        let normal = (point - self.center) / self.radius;
        IntersectionResult::Hit(Intersection {
            t,
            point,
            normal,
            uv: sphere_uv_from_direction(normal),
            obj: self.obj,
            material: self.material,
        })
    }

    fn bounding_box(&self) -> Bounds {
        let r = glam::Vec3::splat(self.radius);
        Bounds::from_points(self.center - r, self.center + r)
    }

    fn sample_surface(&self, rng: &mut Rng) -> SurfaceSample {
        let n = UniformSphere.sample(rng);
        SurfaceSample {
            p: self.center + self.radius * n,
            n,
            area_dens: 1.0 / self.area(),
        }
    }

    fn area(&self) -> f32 {
        4.0 * std::f32::consts::PI * self.radius * self.radius
    }

    fn obj_id(&self) -> ObjId {
        self.obj
    }
}
