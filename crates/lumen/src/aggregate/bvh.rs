use std::sync::Arc;

use glam::Vec3;

use crate::{
    math::bounds::Bounds,
    ray::Ray,
    shape::{IntersectionResult, Shape},
};

use super::PathSpace;

/// Top-down median-split bounding volume hierarchy.
pub struct Bvh {
    bounds: Bounds,
    root: Option<BvhNode>,
}

enum BvhNode {
    Node(Box<(Bounds, BvhNode)>, Box<(Bounds, BvhNode)>),
    Leaf(Arc<dyn Shape>),
}

impl Bvh {
    pub fn build(shapes: Vec<Arc<dyn Shape>>) -> Self {
        let bounds = shapes
            .iter()
            .fold(Bounds::EMPTY, |b, s| b.union(s.bounding_box()));
        if shapes.is_empty() {
            return Self { bounds, root: None };
        }
        Self {
            bounds,
            root: Some(Self::build_node(shapes)),
        }
    }

    fn build_node(mut shapes: Vec<Arc<dyn Shape>>) -> BvhNode {
        if shapes.len() == 1 {
            return BvhNode::Leaf(shapes.pop().unwrap());
        }

        // Split at the median along the widest axis of the centroids.
        let bounds = shapes
            .iter()
            .fold(Bounds::EMPTY, |b, s| b.union(s.bounding_box()));
        let Vec3 { x, y, z } = bounds.diag();
        let axis: fn(Vec3) -> f32 = if x >= y && x >= z {
            |v| v.x
        } else if y >= z {
            |v| v.y
        } else {
            |v| v.z
        };

        shapes.sort_by(|a, b| {
            let a = axis(a.bounding_box().centroid().vec());
            let b = axis(b.bounding_box().centroid().vec());
            a.total_cmp(&b)
        });

        let right = shapes.split_off(shapes.len() / 2);
        let left = shapes;

        let wrap = |shapes: Vec<Arc<dyn Shape>>| {
            let bounds = shapes
                .iter()
                .fold(Bounds::EMPTY, |b, s| b.union(s.bounding_box()));
            Box::new((bounds, Self::build_node(shapes)))
        };
        BvhNode::Node(wrap(left), wrap(right))
    }
}

fn intersect_node(node: &BvhNode, bounds: &Bounds, ray: Ray) -> IntersectionResult {
    if bounds.ray_intersect(&ray).is_none() {
        return IntersectionResult::Miss;
    }
    match node {
        BvhNode::Leaf(shape) => shape.intersect(ray),
        BvhNode::Node(a, b) => {
            let first = intersect_node(&a.1, &a.0, ray);
            // Narrow the window so the second child only reports closer hits.
            let ray = match first.hit() {
                Some(hit) => Ray {
                    bounds: (ray.bounds.0, hit.t),
                    ..ray
                },
                None => ray,
            };
            first.min(intersect_node(&b.1, &b.0, ray))
        }
    }
}

fn any_hit_node(node: &BvhNode, bounds: &Bounds, ray: Ray) -> Option<f32> {
    bounds.ray_intersect(&ray)?;
    match node {
        BvhNode::Leaf(shape) => shape.intersect(ray).hit().map(|hit| hit.t),
        BvhNode::Node(a, b) => {
            any_hit_node(&a.1, &a.0, ray).or_else(|| any_hit_node(&b.1, &b.0, ray))
        }
    }
}

impl PathSpace for Bvh {
    fn intersect(&self, ray: Ray) -> IntersectionResult {
        match &self.root {
            Some(root) => intersect_node(root, &self.bounds, ray),
            None => IntersectionResult::Miss,
        }
    }

    fn has_intersect(&self, ray: Ray, t_min: f32, t_max: f32) -> Option<f32> {
        let ray = Ray {
            bounds: (t_min, t_max),
            ..ray
        };
        any_hit_node(self.root.as_ref()?, &self.bounds, ray)
    }

    fn aabb(&self) -> Bounds {
        self.bounds
    }
}
