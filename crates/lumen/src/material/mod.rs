mod lambertian;
mod oren_nayar;

pub use lambertian::Lambertian;
pub use oren_nayar::OrenNayar;

use glam::Vec3;

use crate::{color::Rgb, Rng};

pub type Uv = [f32; 2];

/// A drawn scattering direction and the projected-solid-angle density it was
/// drawn at (solid-angle density divided by `cos θ_i`). A zero density means
/// the path must not be continued; every caller checks it.
#[derive(Debug, Clone, Copy)]
pub struct BrdfSample {
    pub i: Vec3,
    pub dens: f32,
}

impl BrdfSample {
    pub const ABSORBED: BrdfSample = BrdfSample {
        i: Vec3::ZERO,
        dens: 0.0,
    };
}

/// A BRDF. Directions are in world space; `o` points from the surface toward
/// the previous vertex, `i` toward the next one.
pub trait Material: Send + Sync {
    /// `f_r(o, i)`, componentwise non-negative. Estimators never assume
    /// symmetry even for reciprocal materials.
    fn eval(&self, uv: Uv, n: Vec3, o: Vec3, i: Vec3) -> Rgb;

    /// Draw `i` given `o` and report its projected-solid-angle density.
    fn sample(&self, rng: &mut Rng, uv: Uv, n: Vec3, o: Vec3) -> BrdfSample;
}

pub struct MaterialDescriptor {
    pub label: Option<String>,
    pub material: Box<dyn Material>,
}

impl std::fmt::Debug for MaterialDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaterialDescriptor")
            .field("label", &self.label)
            .field("material", &"<material>")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialId(pub usize);

/// Constant-time lookup from the material id carried on geometry.
#[derive(Default)]
pub struct MaterialContainer {
    materials: Vec<MaterialDescriptor>,
}

impl MaterialContainer {
    pub fn insert(&mut self, descriptor: MaterialDescriptor) -> MaterialId {
        self.materials.push(descriptor);
        MaterialId(self.materials.len() - 1)
    }

    pub fn find(&self, id: MaterialId) -> &dyn Material {
        self.materials[id.0].material.as_ref()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}
