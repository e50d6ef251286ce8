use core::f32;

use glam::Vec3;
use rand::{distributions::Uniform, prelude::Distribution, Rng};

use crate::material::Uv;

/// Density of a direction sampler over the unit hemisphere, as a function of
/// the cosine against the pole.
pub trait DirectionalPdf {
    fn pdf(&self, costheta: f32) -> f32;
}

/// Uniform point on the unit disk, polar method.
pub struct UniformUnitDisk;

impl Distribution<[f32; 2]> for UniformUnitDisk {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> [f32; 2] {
        let uniform = Uniform::new(0., 1.);
        let phi = f32::consts::TAU * uniform.sample(rng);
        let r = f32::sqrt(uniform.sample(rng));
        let (s, c) = f32::sin_cos(phi);
        [r * c, r * s]
    }
}

/// Uniform direction over the upper (+Z) hemisphere.
pub struct UniformHemisphere;

impl Distribution<Vec3> for UniformHemisphere {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        let uniform = Uniform::new(0., 1.);
        let z = uniform.sample(rng);
        let r = f32::sqrt(f32::max(0.0, 1.0 - z * z));
        let (s, c) = f32::sin_cos(f32::consts::TAU * uniform.sample(rng));
        Vec3 {
            x: r * c,
            y: r * s,
            z,
        }
    }
}

impl DirectionalPdf for UniformHemisphere {
    fn pdf(&self, _costheta: f32) -> f32 {
        0.5 * f32::consts::FRAC_1_PI
    }
}

/// Cosine-weighted direction over the upper (+Z) hemisphere, obtained by
/// lifting a uniform disk point.
pub struct CosineHemisphere;

impl Distribution<Vec3> for CosineHemisphere {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        let [x, y] = UniformUnitDisk.sample(rng);
        let z = f32::sqrt(f32::max(0.0, 1.0 - x * x - y * y));
        Vec3 { x, y, z }
    }
}

impl DirectionalPdf for CosineHemisphere {
    fn pdf(&self, costheta: f32) -> f32 {
        costheta * f32::consts::FRAC_1_PI
    }
}

/// Uniform direction over the full unit sphere.
pub struct UniformSphere;

impl Distribution<Vec3> for UniformSphere {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        let uniform = Uniform::new(0., 1.);
        let z = 1.0 - 2.0 * uniform.sample(rng);
        let r = f32::sqrt(f32::max(0.0, 1.0 - z * z));
        let (s, c) = f32::sin_cos(f32::consts::TAU * uniform.sample(rng));
        Vec3 {
            x: r * c,
            y: r * s,
            z,
        }
    }
}

pub fn sphere_uv_from_direction(direction: Vec3) -> Uv {
    let h = direction.dot(Vec3::Y).clamp(-1.0, 1.0);
    let u = 0.5 + f32::atan2(direction.x, direction.z) / f32::consts::TAU;
    let v = f32::acos(h) / f32::consts::PI;
    [u, v]
}

/// Right-handed tangent frame around `n`. `n` must be unit length.
pub fn orthonormal_basis(n: Vec3) -> (Vec3, Vec3) {
    let sign = f32::copysign(1.0, n.z);
    let a = -1.0 / (sign + n.z);
    let b = n.x * n.y * a;
    let t = Vec3::new(1.0 + sign * n.x * n.x * a, sign * b, -sign * n.x);
    let bt = Vec3::new(b, sign + n.y * n.y * a, -n.y);
    (t, bt)
}

/// Express a +Z-hemisphere sample in the frame whose pole is `n`.
pub fn from_local_frame(n: Vec3, local: Vec3) -> Vec3 {
    let (t, b) = orthonormal_basis(n);
    local.x * t + local.y * b + local.z * n
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Seed;
    use rand::prelude::Distribution;

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
    fn disk_samples_stay_inside() {
        let mut rng = rng();
        for _ in 0..256 {
            let [x, y] = UniformUnitDisk.sample(&mut rng);
            assert!(x * x + y * y <= 1.0 + 1e-6);
        }
    }

    #[test]
    fn cosine_hemisphere_is_upper_and_unit() {
        let mut rng = rng();
        for _ in 0..256 {
            let v = CosineHemisphere.sample(&mut rng);
            assert!(v.z >= 0.0);
            assert!((v.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn cosine_pdf_integrates_to_one() {
        // MC estimate of the pdf over uniform hemisphere directions.
        let mut rng = rng();
        let n = 20_000;
        let mut sum = 0.0;
        for _ in 0..n {
            let v = UniformHemisphere.sample(&mut rng);
            sum += CosineHemisphere.pdf(v.z) / UniformHemisphere.pdf(v.z);
        }
        let estimate = sum / n as f32;
        assert!((estimate - 1.0).abs() < 0.05, "estimate = {estimate}");
    }

    #[test]
    fn basis_is_orthonormal() {
        let mut rng = rng();
        for _ in 0..64 {
            let n = UniformSphere.sample(&mut rng);
            let (t, b) = orthonormal_basis(n);
            assert!(t.dot(b).abs() < 1e-5);
            assert!(t.dot(n).abs() < 1e-5);
            assert!(b.dot(n).abs() < 1e-5);
            assert!((t.length() - 1.0).abs() < 1e-5);
            assert!((b.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn sphere_uv_is_in_unit_square() {
        let mut rng = rng();
        for _ in 0..128 {
            let [u, v] = sphere_uv_from_direction(UniformSphere.sample(&mut rng));
            assert!((0.0..=1.0).contains(&u));
            assert!((0.0..=1.0).contains(&v));
        }
    }
}
