//! Random-walk machinery shared by the transport estimators: pathlet
//! sampling, prefix transports, and shadow-ray connections to lights.

use glam::Vec3;
use log::trace;

use crate::{
    aggregate::PathSpace as _,
    color::{linear::BLACK, Rgb},
    light::{Light, LightSources},
    material::{BrdfSample, MaterialContainer},
    math::float::FloatAsExt,
    math::point::Point,
    ray::Ray,
    renderer::World,
    shape::Intersection,
    utils::counter::counter,
    Rng,
};

use super::FirstHit;

/// Self-intersection epsilon at the start of a shadow ray.
pub(crate) const SHADOW_EPS_START: f32 = 1e-4;
/// Trailing epsilon subtracted from a shadow ray's target distance.
pub(crate) const SHADOW_EPS_END: f32 = 1e-3;

/// One step of a random walk. The vertex anchors the far end of the vector:
/// `v` points from this vertex back to the previous one, against the
/// direction of travel.
pub(crate) struct Pathlet<'a> {
    pub v: Vec3,
    /// Conditional projected-solid-angle density this pathlet's direction was
    /// drawn at, given the previous vertex.
    pub dens: f32,
    pub vert: Intersection,
    /// Set only on the first camera pathlet when it lands on an emitter.
    pub light: Option<&'a dyn Light>,
}

impl Pathlet<'_> {
    pub fn towards_prev(&self) -> Vec3 {
        self.v
    }

    pub fn towards(&self) -> Vec3 {
        -self.v
    }
}

pub(crate) fn brdf(vert: &Intersection, o: Vec3, i: Vec3, mats: &MaterialContainer) -> Rgb {
    mats.find(vert.material).eval(vert.uv, vert.normal, o, i)
}

pub(crate) fn sample_brdf(
    rng: &mut Rng,
    vert: &Intersection,
    o: Vec3,
    mats: &MaterialContainer,
) -> BrdfSample {
    let sample = mats.find(vert.material).sample(rng, vert.uv, vert.normal, o);
    debug_assert!(sample.dens >= 0.0);
    sample
}

/// BRDF at `current` between the segment toward the next vertex and the
/// segment toward the previous one, projected by the cosine toward the next
/// vertex. This is the radiance convention: the measured quantity flows
/// toward the camera.
fn projected_brdf(current: &Pathlet, next: &Pathlet, mats: &MaterialContainer) -> Rgb {
    let vert = &current.vert;
    let cos_w = vert.normal.dot(next.towards());
    cos_w
        * mats
            .find(vert.material)
            .eval(vert.uv, vert.normal, next.towards(), current.towards_prev())
}

/// Same join with swapped argument order: the adjoint convention used when
/// transporting importance along a light subpath.
fn projected_adjoint_brdf(current: &Pathlet, next: &Pathlet, mats: &MaterialContainer) -> Rgb {
    let vert = &current.vert;
    let cos_w = vert.normal.dot(next.towards());
    cos_w
        * mats
            .find(vert.material)
            .eval(vert.uv, vert.normal, current.towards_prev(), next.towards())
}

/// Extend `path` by repeated BRDF sampling until the depth limit, a zero
/// density, a miss, or a backfacing hit. Returns the resulting length.
fn extend_path<'a>(
    rng: &mut Rng,
    path: &mut Vec<Pathlet<'a>>,
    world: &World<'a>,
    max_depth: usize,
) -> usize {
    while path.len() < max_depth {
        let prev = path.last().expect("walks are seeded with one pathlet");
        let sampled = sample_brdf(rng, &prev.vert, prev.towards_prev(), world.materials);
        if sampled.dens == 0.0 {
            break;
        }

        let ray = Ray::new(prev.vert.point, sampled.i);
        let Some(&vert) = world.path_space.intersect(ray).hit() else {
            break;
        };
        if vert.normal.dot(-sampled.i) <= 0.0 {
            break;
        }

        path.push(Pathlet {
            v: -sampled.i,
            dens: sampled.dens,
            vert,
            light: None,
        });
    }
    trace!("walk stopped at length {}", path.len());
    path.len()
}

/// Sample a walk conditioned on the bootstrap ray `r0` drawn at density
/// `dens0`. Returns length zero when `r0` escapes or lands on a backface.
pub(crate) fn sample_path<'a>(
    rng: &mut Rng,
    path: &mut Vec<Pathlet<'a>>,
    r0: Ray,
    dens0: f32,
    world: &World<'a>,
    max_depth: usize,
) -> usize {
    path.clear();
    if max_depth == 0 {
        return 0;
    }
    let Some(&vert) = world.path_space.intersect(r0).hit() else {
        return 0;
    };
    if vert.normal.dot(-r0.direction) <= 0.0 {
        return 0;
    }
    path.push(Pathlet {
        v: -r0.direction,
        dens: dens0,
        vert,
        light: None,
    });
    extend_path(rng, path, world, max_depth)
}

/// Same walk, but bootstrapped from a precomputed first hit. This is the
/// camera entry: the primary density is accounted for separately, so the
/// seed pathlet carries unit density and the emitter link of the hit.
pub(crate) fn sample_path_from_hit<'a>(
    rng: &mut Rng,
    path: &mut Vec<Pathlet<'a>>,
    r0: Ray,
    hit: &FirstHit<'a>,
    world: &World<'a>,
    max_depth: usize,
) -> usize {
    path.clear();
    let Some(&vert) = hit.intersect.hit() else {
        return 0;
    };
    if max_depth == 0 {
        return 0;
    }
    path.push(Pathlet {
        v: -r0.direction,
        dens: 1.0,
        vert,
        light: hit.light,
    });
    extend_path(rng, path, world, max_depth)
}

/// Light transport over every prefix of a subpath, precomputed so lookups
/// during strategy enumeration are constant time. Conditional per-vertex area
/// densities are precomputed alongside.
pub(crate) struct PrefixTransport {
    prefix: Vec<Rgb>,
    // TODO: feed these into per-strategy balance-heuristic weights instead of
    // the uniform partition averaging in transport_all_connectible_subpaths.
    #[allow(dead_code)]
    cond_density: Vec<f32>,
}

impl PrefixTransport {
    /// Radiance convention, for camera subpaths.
    pub fn radiance(path: &[Pathlet], mats: &MaterialContainer) -> Self {
        Self::build(path, mats, projected_brdf)
    }

    /// Adjoint (importance) convention, for light subpaths.
    pub fn importance(path: &[Pathlet], mats: &MaterialContainer) -> Self {
        Self::build(path, mats, projected_adjoint_brdf)
    }

    fn build(
        path: &[Pathlet],
        mats: &MaterialContainer,
        joint: fn(&Pathlet, &Pathlet, &MaterialContainer) -> Rgb,
    ) -> Self {
        let mut prefix = Vec::with_capacity(path.len());
        let mut cond_density = Vec::with_capacity(path.len());
        if path.is_empty() {
            return Self {
                prefix,
                cond_density,
            };
        }

        let mut transport = crate::color::linear::WHITE;
        prefix.push(transport);
        for pair in path.windows(2) {
            let (current, next) = (&pair[0], &pair[1]);
            if let Some(dens) = next.dens.into_non_zero(0.0) {
                transport *= joint(current, next, mats) / dens;
            } else {
                transport = BLACK;
            }
            prefix.push(transport);
        }

        for pathlet in path {
            let cos = pathlet.vert.normal.dot(pathlet.towards_prev());
            cond_density.push(pathlet.dens * cos / (pathlet.vert.t * pathlet.vert.t));
        }

        Self {
            prefix,
            cond_density,
        }
    }

    /// Transport through the first `subpath_len + 1` vertices.
    pub fn transport(&self, subpath_len: usize) -> Rgb {
        self.prefix[subpath_len]
    }
}

/// Whether the open segment from `origin` toward `target_dist` along `dir` is
/// free of geometry, under the shared shadow-ray epsilon policy. Degenerate
/// joins shorter than twice the trailing epsilon count as occluded.
pub(crate) fn unoccluded(world: &World, origin: Point, dir: Vec3, target_dist: f32) -> bool {
    counter!("Shadow rays");
    if target_dist <= 2.0 * SHADOW_EPS_END {
        return false;
    }
    world
        .path_space
        .has_intersect(
            Ray::new(origin, dir),
            SHADOW_EPS_START,
            target_dist - SHADOW_EPS_END,
        )
        .is_none()
}

/// Connect a point on a light to a shading vertex and compute the transported
/// radiance. `target_o` is the outgoing direction at the shading vertex.
pub(crate) fn transport_illum_source(
    light: &dyn Light,
    p_illum: Point,
    n_illum: Vec3,
    target_vert: &Intersection,
    target_o: Vec3,
    world: &World,
) -> Rgb {
    let l = target_vert.point - p_illum;
    let illum = light.eval(l, n_illum, target_vert.normal);
    if illum.is_black() {
        return BLACK;
    }

    let distance = l.length();
    let i = -l / distance;
    if unoccluded(world, target_vert.point, i, distance) {
        illum * brdf(target_vert, target_o, i, world.materials)
    } else {
        BLACK
    }
}

/// A light selected from the scene set with an emission surface sample whose
/// area density already includes the selection probability mass.
pub(crate) struct LightSample<'a> {
    pub light: &'a dyn Light,
    pub surface: crate::shape::SurfaceSample,
}

pub(crate) fn sample_light_source<'a>(
    rng: &mut Rng,
    lights: &'a LightSources,
) -> Option<LightSample<'a>> {
    let (light, prob_mass) = lights.sample_light(rng)?;
    let mut surface = light.sample_emission_surface(rng);
    surface.area_dens *= prob_mass;
    Some(LightSample { light, surface })
}

/// Monte Carlo mean over `multi_light_samps` shadow-ray connections from the
/// shading vertex to sampled points on the scene's lights.
pub(crate) fn transport_direct_illum(
    rng: &mut Rng,
    target_o: Vec3,
    target_vert: &Intersection,
    world: &World,
    multi_light_samps: u32,
) -> Rgb {
    let multi_light_samps = multi_light_samps.max(1);
    let mut rad = BLACK;
    for _ in 0..multi_light_samps {
        let Some(sample) = sample_light_source(rng, world.lights) else {
            return BLACK;
        };
        let Some(area_dens) = sample.surface.area_dens.into_non_zero(0.0) else {
            continue;
        };
        rad += transport_illum_source(
            sample.light,
            sample.surface.p,
            sample.surface.n,
            target_vert,
            target_o,
            world,
        ) / area_dens;
    }
    rad / multi_light_samps as f32
}
