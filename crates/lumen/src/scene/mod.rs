//! Scene construction. The scene owns geometry, materials, and lights; a
//! render borrows them read-only through [crate::renderer::World].

pub mod examples;

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use glam::Vec3;

use crate::{
    aggregate::{Bvh, ShapeList},
    color::Rgb,
    light::{AreaLight, Light, LightDescriptor, LightSources, PointLight},
    material::{Material, MaterialContainer, MaterialDescriptor, MaterialId},
    math::point::Point,
    shape::{ObjId, Quad, Shape, Sphere, Triangle},
};

static OBJ_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Monotonic process-wide object id. Ids are handed out during scene
/// construction only, never on the render path.
pub fn next_obj_id() -> ObjId {
    ObjId(OBJ_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
}

#[derive(Default)]
pub struct Scene {
    objects: Vec<Arc<dyn Shape>>,
    pub materials: MaterialContainer,
    pub lights: LightSources,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_material<M: Material + 'static>(
        &mut self,
        label: Option<String>,
        material: M,
    ) -> MaterialId {
        self.materials.insert(MaterialDescriptor {
            label,
            material: Box::new(material),
        })
    }

    pub fn insert_sphere(&mut self, material: MaterialId, center: Point, radius: f32) -> ObjId {
        let obj = next_obj_id();
        self.objects.push(Arc::new(Sphere {
            center,
            radius,
            obj,
            material,
        }));
        obj
    }

    pub fn insert_quad(
        &mut self,
        material: MaterialId,
        origin: Point,
        edge_u: Vec3,
        edge_v: Vec3,
    ) -> ObjId {
        let obj = next_obj_id();
        self.objects
            .push(Arc::new(Quad::new(origin, edge_u, edge_v, obj, material)));
        obj
    }

    pub fn insert_triangle(&mut self, material: MaterialId, a: Point, b: Point, c: Point) -> ObjId {
        let obj = next_obj_id();
        self.objects
            .push(Arc::new(Triangle::new(a, b, c, obj, material)));
        obj
    }

    /// Attach an area light to previously inserted geometry. The light shares
    /// the shape, so implicit hits on it resolve through
    /// [LightSources::obj_light].
    pub fn make_emissive(&mut self, label: Option<String>, obj: ObjId, radiance: Rgb) {
        let geo = self
            .objects
            .iter()
            .find(|s| s.obj_id() == obj)
            .expect("emissive object must be inserted first")
            .clone();
        self.lights.insert(
            LightDescriptor {
                label,
                light: Arc::new(AreaLight { geo, radiance }),
            },
            Some(obj),
        );
    }

    pub fn insert_point_light(&mut self, label: Option<String>, position: Point, intensity: Rgb) {
        self.lights.insert(
            LightDescriptor {
                label,
                light: Arc::new(PointLight {
                    position,
                    intensity,
                }) as Arc<dyn Light>,
            },
            None,
        );
    }

    pub fn build_linear(&self) -> ShapeList {
        ShapeList(self.objects.clone())
    }

    pub fn build_bvh(&self) -> Bvh {
        Bvh::build(self.objects.clone())
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }
}
