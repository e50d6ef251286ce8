use rand::{distributions::Uniform, prelude::Distribution};

use crate::{
    aggregate::PathSpace as _,
    color::{
        linear::{BLACK, WHITE},
        Rgb,
    },
    ray::Ray,
    renderer::World,
    Rng,
};

use super::{
    walk::{brdf, sample_brdf, transport_direct_illum},
    FirstHit, PathTracer,
};

const P_SURVIVE: f32 = 0.5;

/// Whether the walk survives Russian roulette at this depth, folding the
/// survival probability into `throughput` when it does.
fn roulette(rng: &mut Rng, depth: u32, mutate_depth: u32, throughput: &mut Rgb) -> bool {
    if depth < mutate_depth {
        return true;
    }
    let uniform = Uniform::new(0., 1.);
    if uniform.sample(rng) >= P_SURVIVE {
        return false;
    }
    *throughput = *throughput / P_SURVIVE;
    true
}

/// Purely implicit light transport: radiance is only picked up when a bounce
/// lands on an emitter. High variance, but every term is unbiased and simple.
///
/// The recursion of the textbook formulation is unrolled into a loop carrying
/// `throughput` and the accumulated radiance.
pub struct UnidirectPathTracer {
    pub max_path_len: u32,
}

impl UnidirectPathTracer {
    const MUTATE_DEPTH: u32 = 2;

    fn radiance(&self, rng: &mut Rng, ray: &Ray, hit: &FirstHit, world: &World) -> Rgb {
        let Some(&first) = hit.intersect.hit() else {
            return BLACK;
        };

        let mut rad = BLACK;
        let mut throughput = WHITE;
        let mut o = -ray.direction;
        let mut vert = first;

        for depth in 0..self.max_path_len {
            if !roulette(rng, depth, Self::MUTATE_DEPTH, &mut throughput) {
                break;
            }

            if let Some(light) = world.lights.obj_light(vert.obj) {
                rad += throughput * light.radiance(o, vert.normal);
            }

            let sampled = sample_brdf(rng, &vert, o, world.materials);
            if sampled.dens == 0.0 {
                break;
            }
            let Some(&next) = world
                .path_space
                .intersect(Ray::new(vert.point, sampled.i))
                .hit()
            else {
                break;
            };
            if next.normal.dot(-sampled.i) <= 0.0 {
                break;
            }

            let cos_w = vert.normal.dot(sampled.i);
            throughput *= brdf(&vert, o, sampled.i, world.materials) * cos_w / sampled.dens;
            o = -sampled.i;
            vert = next;
        }

        rad
    }
}

impl PathTracer for UnidirectPathTracer {
    fn sample<'a>(
        &self,
        rng: &mut Rng,
        rays: &[Ray],
        first_hits: &[FirstHit<'a>],
        world: &World<'a>,
    ) -> Vec<Rgb> {
        rays.iter()
            .zip(first_hits)
            .map(|(ray, hit)| self.radiance(rng, ray, hit, world))
            .collect()
    }
}

/// Next-event estimation variant: an explicit light connection at every
/// bounce. The emitted term is added only at the primary hit, so implicit
/// hits deeper in the walk are not double counted.
pub struct UnidirectLt1PathTracer {
    pub max_path_len: u32,
    pub multi_light_samps: u32,
}

impl UnidirectLt1PathTracer {
    const MUTATE_DEPTH: u32 = 2;

    fn radiance(&self, rng: &mut Rng, ray: &Ray, hit: &FirstHit, world: &World) -> Rgb {
        let Some(&first) = hit.intersect.hit() else {
            return BLACK;
        };

        if self.max_path_len == 0 {
            return BLACK;
        }
        let mut rad = match hit.light {
            Some(light) => light.radiance(-ray.direction, first.normal),
            None => BLACK,
        };

        let mut throughput = WHITE;
        let mut o = -ray.direction;
        let mut vert = first;

        for depth in 0..self.max_path_len {
            if !roulette(rng, depth, Self::MUTATE_DEPTH, &mut throughput) {
                break;
            }

            rad += throughput
                * transport_direct_illum(rng, o, &vert, world, self.multi_light_samps);

            let sampled = sample_brdf(rng, &vert, o, world.materials);
            if sampled.dens == 0.0 {
                break;
            }
            let Some(&next) = world
                .path_space
                .intersect(Ray::new(vert.point, sampled.i))
                .hit()
            else {
                break;
            };
            if next.normal.dot(-sampled.i) <= 0.0 {
                break;
            }

            let cos_w = vert.normal.dot(sampled.i);
            throughput *= brdf(&vert, o, sampled.i, world.materials) * cos_w / sampled.dens;
            o = -sampled.i;
            vert = next;
        }

        rad
    }
}

impl PathTracer for UnidirectLt1PathTracer {
    fn sample<'a>(
        &self,
        rng: &mut Rng,
        rays: &[Ray],
        first_hits: &[FirstHit<'a>],
        world: &World<'a>,
    ) -> Vec<Rgb> {
        rays.iter()
            .zip(first_hits)
            .map(|(ray, hit)| self.radiance(rng, ray, hit, world))
            .collect()
    }
}
