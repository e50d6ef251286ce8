use std::f32::consts::FRAC_1_PI;

use glam::Vec3;
use rand::prelude::Distribution;

use crate::{
    color::{linear::BLACK, Rgb},
    math::distributions::{from_local_frame, CosineHemisphere},
    Rng,
};

use super::{BrdfSample, Material, Uv};

/// Qualitative Oren-Nayar rough diffuse reflector. `sigma` is the surface
/// roughness in radians; `sigma = 0` degenerates to [super::Lambertian].
pub struct OrenNayar {
    albedo: Rgb,
    a: f32,
    b: f32,
}

impl OrenNayar {
    pub fn new(albedo: Rgb, sigma: f32) -> Self {
        let s2 = sigma * sigma;
        Self {
            albedo,
            a: 1.0 - 0.5 * s2 / (s2 + 0.33),
            b: 0.45 * s2 / (s2 + 0.09),
        }
    }
}

impl Material for OrenNayar {
    fn eval(&self, _uv: Uv, n: Vec3, o: Vec3, i: Vec3) -> Rgb {
        let cos_o = n.dot(o);
        let cos_i = n.dot(i);
        if cos_o <= 0.0 || cos_i <= 0.0 {
            return BLACK;
        }

        // Azimuth difference from the tangent-plane projections.
        let to = o - cos_o * n;
        let ti = i - cos_i * n;
        let denom = to.length() * ti.length();
        let cos_dphi = if denom > 1e-9 {
            f32::max(0.0, to.dot(ti) / denom)
        } else {
            0.0
        };

        let sin_o = f32::sqrt(f32::max(0.0, 1.0 - cos_o * cos_o));
        let sin_i = f32::sqrt(f32::max(0.0, 1.0 - cos_i * cos_i));
        // alpha is the larger incidence angle, beta the smaller.
        let (sin_alpha, tan_beta) = if cos_o < cos_i {
            (sin_o, sin_i / cos_i)
        } else {
            (sin_i, sin_o / cos_o)
        };

        (FRAC_1_PI * (self.a + self.b * cos_dphi * sin_alpha * tan_beta)) * self.albedo
    }

    fn sample(&self, rng: &mut Rng, _uv: Uv, n: Vec3, o: Vec3) -> BrdfSample {
        if n.dot(o) <= 0.0 {
            return BrdfSample::ABSORBED;
        }
        let i = from_local_frame(n, CosineHemisphere.sample(rng));
        BrdfSample {
            i,
            dens: FRAC_1_PI,
        }
    }
}
