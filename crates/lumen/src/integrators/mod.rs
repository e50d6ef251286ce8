//! Radiance estimators. All of them answer the same question: given primary
//! rays and their precomputed first hits, what radiance arrives along each
//! ray? They differ in how they sample the path space.

mod bidirect;
mod debug;
mod direct;
mod unidirect;
pub(crate) mod walk;

pub use bidirect::{BidirectLt2PathTracer, BidirectMisPathTracer};
pub use debug::{NormalTracer, PositionTracer};
pub use direct::DirectPathTracer;
pub use unidirect::{UnidirectLt1PathTracer, UnidirectPathTracer};

use crate::{
    aggregate::PathSpace as _,
    color::Rgb,
    light::Light,
    ray::Ray,
    renderer::World,
    shape::IntersectionResult,
    utils::counter::counter,
    Rng,
};

/// The deterministic part of a camera path: where the primary ray lands, and
/// whether it lands on an emitter. Grazing and backfacing hits are demoted to
/// misses here so the estimators never see them.
pub struct FirstHit<'a> {
    pub intersect: IntersectionResult,
    pub light: Option<&'a dyn Light>,
}

pub struct FirstHits<'a> {
    pub hits: Vec<FirstHit<'a>>,
}

pub fn compute_first_hit<'a>(rays: &[Ray], world: &World<'a>) -> FirstHits<'a> {
    let hits = rays
        .iter()
        .map(|&ray| {
            counter!("Primary rays");
            let intersect = world.path_space.intersect(ray);
            if let Some(hit) = intersect.hit() {
                debug_assert!(hit.t > 0.0 && (hit.normal.length() - 1.0).abs() < 1e-3);
            }
            match intersect.hit() {
                Some(hit) if hit.normal.dot(-ray.direction) > 0.0 => FirstHit {
                    intersect,
                    light: world.lights.obj_light(hit.obj),
                },
                _ => FirstHit {
                    intersect: IntersectionResult::Miss,
                    light: None,
                },
            }
        })
        .collect();
    FirstHits { hits }
}

pub trait PathTracer: Send + Sync {
    /// One radiance estimate per ray. `rays` and `first_hits` run in
    /// lockstep; sampling failures contribute zero.
    fn sample<'a>(
        &self,
        rng: &mut Rng,
        rays: &[Ray],
        first_hits: &[FirstHit<'a>],
        world: &World<'a>,
    ) -> Vec<Rgb>;
}
