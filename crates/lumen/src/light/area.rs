use std::sync::Arc;

use glam::Vec3;
use rand::prelude::Distribution;

use crate::{
    color::{linear::BLACK, Rgb},
    math::distributions::{from_local_frame, CosineHemisphere, DirectionalPdf},
    math::float::FloatAsExt,
    shape::{Shape, SurfaceSample},
    Rng,
};

use super::{EmissionSample, Light};

/// Uniform diffuse emitter over a shape shared with the scene geometry.
/// Emission directions are cosine-distributed about the surface normal.
pub struct AreaLight {
    pub geo: Arc<dyn Shape>,
    pub radiance: Rgb,
}

impl Light for AreaLight {
    fn radiance(&self, w: Vec3, n: Vec3) -> Rgb {
        if w.dot(n) <= 0.0 {
            return BLACK;
        }
        self.radiance
    }

    fn projected_radiance(&self, w: Vec3, n: Vec3) -> Rgb {
        f32::max(0.0, w.dot(n)) * self.radiance(w, n)
    }

    fn eval(&self, l: Vec3, n_light: Vec3, n_target: Vec3) -> Rgb {
        let Some(dist_sq) = l.length_squared().into_non_zero(1e-12) else {
            return BLACK;
        };
        let l_hat = l / dist_sq.sqrt();
        let cos_light = n_light.dot(l_hat);
        let cos_target = n_target.dot(-l_hat);
        if cos_light <= 0.0 || cos_target <= 0.0 {
            return BLACK;
        }
        (cos_light * cos_target / dist_sq) * self.radiance
    }

    fn sample_emission_surface(&self, rng: &mut Rng) -> SurfaceSample {
        self.geo.sample_surface(rng)
    }

    fn sample_emission(&self, rng: &mut Rng) -> EmissionSample {
        let surface = self.sample_emission_surface(rng);
        let local = CosineHemisphere.sample(rng);
        EmissionSample {
            surface,
            w: from_local_frame(surface.n, local),
            solid_angle_dens: CosineHemisphere.pdf(local.z),
        }
    }
}
