mod area;
mod point;

pub use area::AreaLight;
pub use point::PointLight;

use std::{collections::HashMap, sync::Arc};

use glam::Vec3;
use rand::{distributions::Uniform, prelude::Distribution};

use crate::{color::Rgb, shape::ObjId, shape::SurfaceSample, Rng};

/// A surface point on a light plus an outgoing direction, with the density of
/// each stage of the draw.
#[derive(Debug, Clone, Copy)]
pub struct EmissionSample {
    pub surface: SurfaceSample,
    pub w: Vec3,
    pub solid_angle_dens: f32,
}

pub trait Light: Send + Sync {
    /// Emitted radiance along `w` (pointing away from the emitting surface)
    /// from a surface with normal `n`. Zero for backfacing `w`.
    fn radiance(&self, w: Vec3, n: Vec3) -> Rgb;

    /// `radiance * max(0, w . n)`.
    fn projected_radiance(&self, w: Vec3, n: Vec3) -> Rgb;

    /// Radiance transported from a point on this light to a receiver, with
    /// the full geometric join term folded in: both cosines and the
    /// inverse-square falloff. `l` points from the light point to the
    /// receiver (unnormalized); callers only multiply the receiver BRDF.
    fn eval(&self, l: Vec3, n_light: Vec3, n_target: Vec3) -> Rgb;

    /// Uniform point on the emitting surface with its area density.
    fn sample_emission_surface(&self, rng: &mut Rng) -> SurfaceSample;

    /// Surface point plus an outgoing direction with its solid-angle density.
    fn sample_emission(&self, rng: &mut Rng) -> EmissionSample;
}

pub struct LightDescriptor {
    pub label: Option<String>,
    pub light: Arc<dyn Light>,
}

impl std::fmt::Debug for LightDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LightDescriptor")
            .field("label", &self.label)
            .field("light", &"<light>")
            .finish()
    }
}

/// The set of all light sources in a scene. Geometry-backed lights are keyed
/// by their object id so direct hits on emitters can be recognized.
#[derive(Default)]
pub struct LightSources {
    lights: Vec<LightDescriptor>,
    by_obj: HashMap<ObjId, usize>,
}

impl LightSources {
    pub fn insert(&mut self, descriptor: LightDescriptor, obj: Option<ObjId>) {
        if let Some(obj) = obj {
            self.by_obj.insert(obj, self.lights.len());
        }
        self.lights.push(descriptor);
    }

    /// Discrete light selection with its probability mass. Callers fold the
    /// mass into the area density of any emission sample before use.
    pub fn sample_light(&self, rng: &mut Rng) -> Option<(&dyn Light, f32)> {
        if self.lights.is_empty() {
            return None;
        }
        let uniform = Uniform::new(0., 1.);
        let idx = ((uniform.sample(rng) * self.lights.len() as f32) as usize)
            .min(self.lights.len() - 1);
        Some((
            self.lights[idx].light.as_ref(),
            1.0 / self.lights.len() as f32,
        ))
    }

    /// The light attached to this geometry, if it is emissive.
    pub fn obj_light(&self, obj: ObjId) -> Option<&dyn Light> {
        self.by_obj
            .get(&obj)
            .map(|&idx| self.lights[idx].light.as_ref())
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }
}
