use glam::Vec3;
use rand::{distributions::Uniform, prelude::Distribution};

use crate::{
    aggregate::PathSpace as _,
    color::{
        linear::{BLACK, WHITE},
        Rgb,
    },
    light::{EmissionSample, Light},
    math::float::FloatAsExt,
    ray::Ray,
    renderer::World,
    shape::Intersection,
    Rng,
};

use super::{
    walk::{
        brdf, sample_brdf, sample_path, sample_path_from_hit, transport_direct_illum,
        transport_illum_source, unoccluded, Pathlet, PrefixTransport,
    },
    FirstHit, PathTracer,
};

const P_SURVIVE: f32 = 0.5;

/// A crude bidirectional variant: at every camera vertex, join with one
/// two-edge light subpath (sample a light, scatter once, connect) and
/// average it 50/50 against the plain light connection.
pub struct BidirectLt2PathTracer {
    pub max_path_len: u32,
}

impl BidirectLt2PathTracer {
    const MUTATE_DEPTH: u32 = 1;

    /// Both direct strategies at one camera vertex: the shadow-ray connection
    /// `p1` and the two-edge light join `p2`. At the root the emitted term is
    /// accounted separately, so only `p2` is halved there.
    fn join_with_light_paths(
        &self,
        rng: &mut Rng,
        o: Vec3,
        poi: &Intersection,
        world: &World,
        cam_path_len: u32,
    ) -> Rgb {
        let p1_direct = transport_direct_illum(rng, o, poi, world, 1);

        let Some((light, light_prob_mass)) = world.lights.sample_light(rng) else {
            return p1_direct;
        };
        let emission = light.sample_emission(rng);
        let Some(emission_dens) = (light_prob_mass
            * emission.surface.area_dens
            * emission.solid_angle_dens)
            .into_non_zero(1e-12)
        else {
            return p1_direct;
        };

        let light_ray = Ray::new(emission.surface.p, emission.w);
        let Some(&terminate) = world.path_space.intersect(light_ray).hit() else {
            return BLACK;
        };

        let light_illum = light.projected_radiance(emission.w, emission.surface.n) / emission_dens;
        let tray = -emission.w;

        let join_path = poi.point - terminate.point;
        let distance = join_path.length();
        if distance <= 1e-6 {
            return p1_direct;
        }
        let join_path = join_path / distance;

        let cos_w2 = terminate.normal.dot(tray);
        let cos_wo = terminate.normal.dot(join_path);
        let cos_wi = poi.normal.dot(-join_path);
        if cos_w2 > 0.0
            && cos_wo > 0.0
            && cos_wi > 0.0
            && unoccluded(world, terminate.point, join_path, distance)
        {
            let f2 = light_illum * brdf(&terminate, join_path, tray, world.materials) * cos_w2;
            let p2_direct = f2 * cos_wo / (distance * distance)
                * brdf(poi, o, -join_path, world.materials)
                * cos_wi;
            if cam_path_len == 0 {
                p1_direct + 0.5 * p2_direct
            } else {
                0.5 * (p1_direct + p2_direct)
            }
        } else {
            p1_direct
        }
    }

    fn radiance(&self, rng: &mut Rng, ray: &Ray, hit: &FirstHit, world: &World) -> Rgb {
        let Some(&first) = hit.intersect.hit() else {
            return BLACK;
        };
        if self.max_path_len == 0 {
            return BLACK;
        }

        let mut rad = match hit.light {
            Some(light) => light.projected_radiance(-ray.direction, first.normal),
            None => BLACK,
        };

        let mut throughput = WHITE;
        let mut o = -ray.direction;
        let mut vert = first;
        let uniform = Uniform::new(0., 1.);

        for depth in 0..self.max_path_len {
            if depth >= Self::MUTATE_DEPTH {
                if uniform.sample(rng) >= P_SURVIVE {
                    break;
                }
                throughput = throughput / P_SURVIVE;
            }

            rad += throughput * self.join_with_light_paths(rng, o, &vert, world, depth);

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

impl PathTracer for BidirectLt2PathTracer {
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

/// Full bidirectional estimator: a camera subpath and a light subpath are
/// joined under every possible partition, and partitions of equal total path
/// length are averaged with uniform weights.
pub struct BidirectMisPathTracer {
    pub max_path_len: u32,
}

impl BidirectMisPathTracer {
    fn sample_illum_source<'a>(
        &self,
        rng: &mut Rng,
        world: &World<'a>,
    ) -> Option<(&'a dyn Light, EmissionSample)> {
        let (light, light_prob_mass) = world.lights.sample_light(rng)?;
        let mut emission = light.sample_emission(rng);
        emission.surface.area_dens *= light_prob_mass;
        Some((light, emission))
    }
}

impl PathTracer for BidirectMisPathTracer {
    fn sample<'a>(
        &self,
        rng: &mut Rng,
        rays: &[Ray],
        first_hits: &[FirstHit<'a>],
        world: &World<'a>,
    ) -> Vec<Rgb> {
        // Scratch walks, reused across rays.
        let mut cam_path = Vec::with_capacity(self.max_path_len as usize);
        let mut light_path = Vec::with_capacity(self.max_path_len as usize);

        rays.iter()
            .zip(first_hits)
            .map(|(&ray, hit)| {
                let cam_len = sample_path_from_hit(
                    rng,
                    &mut cam_path,
                    ray,
                    hit,
                    world,
                    self.max_path_len as usize,
                );
                if cam_len == 0 {
                    return BLACK;
                }

                let Some((light, emission)) = self.sample_illum_source(rng, world) else {
                    // No lights: nothing can be transported.
                    return BLACK;
                };
                let light_ray = Ray::new(emission.surface.p, emission.w);
                sample_path(
                    rng,
                    &mut light_path,
                    light_ray,
                    emission.solid_angle_dens,
                    world,
                    self.max_path_len as usize,
                );

                transport_all_connectible_subpaths(
                    &cam_path,
                    &light_path,
                    &emission,
                    light,
                    world,
                )
            })
            .collect()
    }
}

/// Sweep every total path length and every (camera, light) partition of it,
/// connect the two subpaths with one explicit visibility edge, and average
/// the partitions of each length with uniform weights.
///
/// Two subpaths are connectible iff they join the camera and the light source
/// by adding exactly one connection pathlet; summing the transport over the
/// connected subpaths of every finite length gives a lower-bound sample of
/// the measurement function.
fn transport_all_connectible_subpaths(
    cam_path: &[Pathlet],
    light_path: &[Pathlet],
    emission: &EmissionSample,
    light: &dyn Light,
    world: &World,
) -> Rgb {
    if cam_path.is_empty() {
        // Nothing to sample.
        return BLACK;
    }

    let cam_transport = PrefixTransport::radiance(cam_path, world.materials);
    let light_transport = PrefixTransport::importance(light_path, world.materials);

    let Some(cam_dens0) = cam_path[0].dens.into_non_zero(1e-12) else {
        return BLACK;
    };
    let Some(area_dens) = emission.surface.area_dens.into_non_zero(1e-12) else {
        return BLACK;
    };

    let max_cam = cam_path.len();
    let max_light = light_path.len();
    let mut rad = BLACK;

    // Both path lengths are one-offset; plen counts the connection vertex too.
    for plen in 1..=(max_cam + max_light + 1) {
        let mut cam_plen = usize::min(plen - 1, max_cam) as isize;
        let mut light_plen = (plen - 1) as isize - cam_plen;

        let mut partition_rad_sum = BLACK;
        let mut partition_weight_sum = 0.0f32;
        let cur_path_weight = 1.0f32;

        while cam_plen >= 0 && light_plen <= max_light as isize {
            match (cam_plen as usize, light_plen as usize) {
                (0, 0) => {
                    // Implicit hit: the camera ray landed on an emitter.
                    if let Some(light) = cam_path[0].light {
                        let path_rad =
                            light.radiance(cam_path[0].towards_prev(), cam_path[0].vert.normal);
                        partition_rad_sum += cur_path_weight * path_rad;
                    }
                    partition_weight_sum += cur_path_weight;
                }
                (cam_plen, 0) => {
                    // Next-event estimation from the emission endpoint. Its
                    // direction was not chosen by a random process, so only
                    // the area density divides.
                    let cam_join_vert = &cam_path[cam_plen - 1];
                    let transported_importance = transport_illum_source(
                        light,
                        emission.surface.p,
                        emission.surface.n,
                        &cam_join_vert.vert,
                        cam_join_vert.towards_prev(),
                        world,
                    ) / area_dens;

                    let path_rad = transported_importance
                        * cam_transport.transport(cam_plen - 1)
                        / cam_dens0;
                    partition_rad_sum += cur_path_weight * path_rad;
                    partition_weight_sum += cur_path_weight;
                }
                (0, _) => {
                    // The chance of a light path hitting the pinhole is zero.
                }
                (cam_plen, light_plen) => {
                    let light_join_vert = &light_path[light_plen - 1];
                    let cam_join_vert = &cam_path[cam_plen - 1];

                    let join_path = cam_join_vert.vert.point - light_join_vert.vert.point;
                    let join_distance = join_path.length();
                    if join_distance > 1e-6 {
                        let join_path = join_path / join_distance;
                        let cos_wo = light_join_vert.vert.normal.dot(join_path);
                        let cos_wi = cam_join_vert.vert.normal.dot(-join_path);
                        if cos_wo > 0.0
                            && cos_wi > 0.0
                            && unoccluded(
                                world,
                                light_join_vert.vert.point,
                                join_path,
                                join_distance,
                            )
                        {
                            if let Some(light_dens0) =
                                light_path[0].dens.into_non_zero(1e-12)
                            {
                                let light_emission = light.projected_radiance(
                                    light_path[0].towards(),
                                    emission.surface.n,
                                ) / (light_dens0 * area_dens);
                                let light_subpath_importance = light_emission
                                    * light_transport.transport(light_plen - 1);

                                let to_area_differential =
                                    cos_wi * cos_wo / (join_distance * join_distance);
                                let light_join_weight = brdf(
                                    &light_join_vert.vert,
                                    join_path,
                                    light_join_vert.towards_prev(),
                                    world.materials,
                                );
                                let cam_join_weight = brdf(
                                    &cam_join_vert.vert,
                                    cam_join_vert.towards_prev(),
                                    -join_path,
                                    world.materials,
                                );
                                let transported_importance = light_subpath_importance
                                    * light_join_weight
                                    * cam_join_weight
                                    * to_area_differential;

                                let cam_subpath_radiance = transported_importance
                                    * cam_transport.transport(cam_plen - 1)
                                    / cam_dens0;
                                partition_rad_sum += cur_path_weight * cam_subpath_radiance;
                            }
                        }
                    }
                    partition_weight_sum += cur_path_weight;
                }
            }

            light_plen += 1;
            cam_plen -= 1;
        }

        if partition_weight_sum > 0.0 {
            rad += partition_rad_sum / partition_weight_sum;
        }
    }

    rad
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        color::Rgb,
        integrators::compute_first_hit,
        material::Lambertian,
        math::point::Point,
        scene::{examples::CornellBoxScene, Scene},
        Seed,
    };

    fn rng() -> Rng {
        Seed {
            seed: 0,
            x: 0,
            y: 0,
            pass: 0,
        }
        .into_rng(0)
    }

    /// A camera staring straight at an emissive quad with nothing else in the
    /// scene: only the implicit-hit strategy can contribute, and it must
    /// recover the emitter radiance exactly.
    #[test]
    fn implicit_hit_recovers_emitter_radiance() {
        let mut scene = Scene::new();
        let white = scene.insert_material(
            None,
            Lambertian {
                albedo: Rgb::splat(0.0),
            },
        );
        let lamp = scene.insert_quad(
            white,
            Point::new(-1., -1., 0.),
            2.0 * Vec3::X,
            2.0 * Vec3::Y,
        );
        scene.make_emissive(None, lamp, Rgb::splat(3.0));

        let space = scene.build_linear();
        let world = World {
            path_space: &space,
            materials: &scene.materials,
            lights: &scene.lights,
        };

        let ray = Ray::new(Point::new(0., 0., 2.), Vec3::NEG_Z);
        let hits = compute_first_hit(&[ray], &world);
        let tracer = BidirectMisPathTracer { max_path_len: 4 };

        let mut rng = rng();
        for _ in 0..8 {
            let rad = tracer.sample(&mut rng, &[ray], &hits.hits, &world);
            assert!(
                (rad[0].to_array()[0] - 3.0).abs() < 1e-4,
                "expected the emitter radiance, got {:?}",
                rad[0]
            );
        }
    }

    #[test]
    fn empty_scene_is_black() {
        let scene = Scene::new();
        let space = scene.build_linear();
        let world = World {
            path_space: &space,
            materials: &scene.materials,
            lights: &scene.lights,
        };
        let ray = Ray::new(Point::ORIGIN, Vec3::X);
        let hits = compute_first_hit(&[ray], &world);

        let mis = BidirectMisPathTracer { max_path_len: 4 };
        assert_eq!(mis.sample(&mut rng(), &[ray], &hits.hits, &world)[0], BLACK);

        let lt2 = BidirectLt2PathTracer { max_path_len: 4 };
        assert_eq!(lt2.sample(&mut rng(), &[ray], &hits.hits, &world)[0], BLACK);
    }

    #[test]
    fn zero_path_length_is_black() {
        let mut scene = Scene::new();
        CornellBoxScene::insert_into(&mut scene);
        let space = scene.build_linear();
        let world = World {
            path_space: &space,
            materials: &scene.materials,
            lights: &scene.lights,
        };
        let ray = Ray::new(Point::new(0., 0., 2.5), Vec3::NEG_Z);
        let hits = compute_first_hit(&[ray], &world);

        let mis = BidirectMisPathTracer { max_path_len: 0 };
        assert_eq!(mis.sample(&mut rng(), &[ray], &hits.hits, &world)[0], BLACK);

        let lt2 = BidirectLt2PathTracer { max_path_len: 0 };
        assert_eq!(lt2.sample(&mut rng(), &[ray], &hits.hits, &world)[0], BLACK);
    }

    #[test]
    fn cornell_estimates_are_finite_and_non_negative() {
        let mut scene = Scene::new();
        CornellBoxScene::insert_into(&mut scene);
        let space = scene.build_linear();
        let world = World {
            path_space: &space,
            materials: &scene.materials,
            lights: &scene.lights,
        };

        let rays = [
            Ray::new(Point::new(0., 0., 2.5), Vec3::NEG_Z),
            Ray::new(Point::new(0., 0., 0.), Vec3::Y),
            Ray::new(Point::new(0., 0., 0.), Vec3::new(0.3, -0.2, -1.0)),
        ];
        let hits = compute_first_hit(&rays, &world);

        let mut rng = rng();
        for tracer in [
            &BidirectMisPathTracer { max_path_len: 5 } as &dyn PathTracer,
            &BidirectLt2PathTracer { max_path_len: 5 },
        ] {
            for _ in 0..32 {
                let rad = tracer.sample(&mut rng, &rays, &hits.hits, &world);
                for pixel in &rad {
                    for c in pixel.to_array() {
                        assert!(c.is_finite() && c >= 0.0, "{rad:?}");
                    }
                }
            }
        }
    }
}
