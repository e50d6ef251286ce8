use std::sync::Arc;

use crate::{
    math::bounds::Bounds,
    ray::Ray,
    shape::{IntersectionResult, Shape},
};

use super::PathSpace;

/// Linear scan over every shape. The reference layout: slow but obviously
/// correct, used to validate the BVH.
#[derive(Default)]
pub struct ShapeList(pub Vec<Arc<dyn Shape>>);

impl PathSpace for ShapeList {
    fn intersect(&self, ray: Ray) -> IntersectionResult {
        self.0
            .iter()
            .fold(IntersectionResult::Miss, |closest, shape| {
                closest.min(shape.intersect(ray))
            })
    }

    fn has_intersect(&self, ray: Ray, t_min: f32, t_max: f32) -> Option<f32> {
        let ray = Ray {
            bounds: (t_min, t_max),
            ..ray
        };
        self.0
            .iter()
            .find_map(|shape| shape.intersect(ray).hit().map(|hit| hit.t))
    }

    fn aabb(&self) -> Bounds {
        self.0
            .iter()
            .fold(Bounds::EMPTY, |b, shape| b.union(shape.bounding_box()))
    }
}
