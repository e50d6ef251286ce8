use std::f32::consts::PI;

use glam::Vec3;
use rand::prelude::Distribution;

use crate::{
    color::{linear::BLACK, Rgb},
    math::distributions::UniformSphere,
    math::float::FloatAsExt,
    math::point::Point,
    shape::SurfaceSample,
    Rng,
};

use super::{EmissionSample, Light};

/// Isotropic point emitter. It has no surface, so its emission sample is the
/// position itself with unit area density, and it can never be hit by a ray
/// (no geometry maps to it).
pub struct PointLight {
    pub position: Point,
    pub intensity: Rgb,
}

impl Light for PointLight {
    fn radiance(&self, _w: Vec3, _n: Vec3) -> Rgb {
        self.intensity
    }

    fn projected_radiance(&self, _w: Vec3, _n: Vec3) -> Rgb {
        self.intensity
    }

    fn eval(&self, l: Vec3, _n_light: Vec3, n_target: Vec3) -> Rgb {
        let Some(dist_sq) = l.length_squared().into_non_zero(1e-12) else {
            return BLACK;
        };
        let cos_target = n_target.dot(-l / dist_sq.sqrt());
        if cos_target <= 0.0 {
            return BLACK;
        }
        (cos_target / dist_sq) * self.intensity
    }

    fn sample_emission_surface(&self, _rng: &mut Rng) -> SurfaceSample {
        SurfaceSample {
            p: self.position,
            n: Vec3::Z,
            area_dens: 1.0,
        }
    }

    fn sample_emission(&self, rng: &mut Rng) -> EmissionSample {
        let w = UniformSphere.sample(rng);
        EmissionSample {
            surface: SurfaceSample {
                p: self.position,
                n: w,
                area_dens: 1.0,
            },
            w,
            solid_angle_dens: 1.0 / (4.0 * PI),
        }
    }
}
