use std::f32::consts::FRAC_1_PI;

use glam::Vec3;
use rand::prelude::Distribution;

use crate::{
    color::{linear::BLACK, Rgb},
    math::distributions::{from_local_frame, CosineHemisphere},
    Rng,
};

use super::{BrdfSample, Material, Uv};

/// Ideal diffuse reflector: `f_r = albedo / pi` over the upper hemisphere.
pub struct Lambertian {
    pub albedo: Rgb,
}

impl Material for Lambertian {
    fn eval(&self, _uv: Uv, n: Vec3, o: Vec3, i: Vec3) -> Rgb {
        if n.dot(o) <= 0.0 || n.dot(i) <= 0.0 {
            return BLACK;
        }
        FRAC_1_PI * self.albedo
    }

    fn sample(&self, rng: &mut Rng, _uv: Uv, n: Vec3, o: Vec3) -> BrdfSample {
        if n.dot(o) <= 0.0 {
            return BrdfSample::ABSORBED;
        }
        let i = from_local_frame(n, CosineHemisphere.sample(rng));
        // Solid-angle density cos/pi divided by cos.
        BrdfSample {
            i,
            dens: FRAC_1_PI,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{distributions::Uniform, prelude::Distribution};

    use super::*;
    use crate::{math::distributions::UniformSphere, Seed};

    fn rng() -> crate::Rng {
        Seed {
            seed: 0,
            x: 0,
            y: 0,
            pass: 0,
        }
        .into_rng(0)
    }

    #[test]
    fn reciprocal_and_non_negative() {
        let mat = Lambertian {
            albedo: Rgb([0.8, 0.5, 0.2]),
        };
        let mut rng = rng();
        for _ in 0..128 {
            let o = UniformSphere.sample(&mut rng);
            let i = UniformSphere.sample(&mut rng);
            let a = mat.eval([0., 0.], Vec3::Z, o, i);
            let b = mat.eval([0., 0.], Vec3::Z, i, o);
            assert_eq!(a, b);
            assert!(a.to_array().iter().all(|&c| c >= 0.0));
        }
    }

    #[test]
    fn backfacing_outgoing_is_absorbed() {
        let mat = Lambertian {
            albedo: Rgb([0.8, 0.8, 0.8]),
        };
        let sample = mat.sample(&mut rng(), [0., 0.], Vec3::Z, Vec3::NEG_Z);
        assert_eq!(sample.dens, 0.0);
    }

    #[test]
    fn sampled_directions_are_front_facing() {
        let mat = Lambertian {
            albedo: Rgb([0.8, 0.8, 0.8]),
        };
        let mut rng = rng();
        let n = Vec3::new(1., 2., -0.5).normalize();
        let o = n; // head-on
        for _ in 0..128 {
            let s = mat.sample(&mut rng, [0., 0.], n, o);
            assert!(s.dens > 0.0);
            assert!(n.dot(s.i) >= 0.0);
        }
    }

    /// The hemispherical reflectance of `albedo / pi` must come out at the
    /// albedo: estimate `int f_r cos dw` with cosine-weighted samples.
    #[test]
    fn energy_conservation() {
        let albedo = 0.7;
        let mat = Lambertian {
            albedo: Rgb::splat(albedo),
        };
        let mut rng = rng();
        let n = Vec3::Z;
        let o = Vec3::new(0.3, 0.1, 0.9).normalize();

        let count = 10_000;
        let mut sum = 0.0;
        for _ in 0..count {
            let s = mat.sample(&mut rng, [0., 0.], n, o);
            if s.dens == 0.0 {
                continue;
            }
            // Projected-solid-angle density: the cosine cancels.
            sum += mat.eval([0., 0.], n, o, s.i).to_array()[0] / s.dens;
        }
        let estimate = sum / count as f32;
        assert!(
            (estimate - albedo).abs() < 0.02 * albedo.max(1.0),
            "estimate = {estimate}"
        );
        assert!(estimate <= albedo + 0.02);
    }

    #[test]
    fn uniform_draw_never_reaches_one() {
        // Russian roulette compares a uniform draw against 0.5; the sampler
        // must stay within [0, 1).
        let mut rng = rng();
        let uniform = Uniform::new(0.0f32, 1.0);
        for _ in 0..1024 {
            let u = uniform.sample(&mut rng);
            assert!((0.0..1.0).contains(&u));
        }
    }
}
