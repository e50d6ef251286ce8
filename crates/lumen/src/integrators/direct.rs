use crate::{
    color::{linear::BLACK, Rgb},
    ray::Ray,
    renderer::World,
    Rng,
};

use super::{
    walk::transport_direct_illum,
    FirstHit, PathTracer,
};

/// Direct illumination only: one shadow-ray connection per light sample plus
/// the emitted term when the primary ray lands on a light. No recursion.
pub struct DirectPathTracer {
    pub multi_light_samps: u32,
}

impl Default for DirectPathTracer {
    fn default() -> Self {
        Self {
            multi_light_samps: 1,
        }
    }
}

impl PathTracer for DirectPathTracer {
    fn sample<'a>(
        &self,
        rng: &mut Rng,
        rays: &[Ray],
        first_hits: &[FirstHit<'a>],
        world: &World<'a>,
    ) -> Vec<Rgb> {
        rays.iter()
            .zip(first_hits)
            .map(|(ray, hit)| {
                let Some(vert) = hit.intersect.hit() else {
                    return BLACK;
                };
                let mut rad = transport_direct_illum(
                    rng,
                    -ray.direction,
                    vert,
                    world,
                    self.multi_light_samps,
                );
                if let Some(light) = hit.light {
                    rad += light.projected_radiance(-ray.direction, vert.normal);
                }
                rad
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::{
        integrators::compute_first_hit,
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
        let rad = DirectPathTracer::default().sample(&mut rng(), &[ray], &hits.hits, &world);
        assert_eq!(rad[0], BLACK);
    }

    #[test]
    fn lamp_seen_directly_is_bright() {
        let mut scene = Scene::new();
        CornellBoxScene::insert_into(&mut scene);
        let space = scene.build_linear();
        let world = World {
            path_space: &space,
            materials: &scene.materials,
            lights: &scene.lights,
        };

        let at_lamp = Ray::new(Point::new(0., 0., 0.), Vec3::Y);
        let hits = compute_first_hit(&[at_lamp], &world);
        let rad = DirectPathTracer::default().sample(&mut rng(), &[at_lamp], &hits.hits, &world);
        // Head-on view of a radiance-12 emitter.
        assert!(rad[0].to_array()[0] >= 12.0);
    }

    #[test]
    fn lit_wall_is_positive() {
        let mut scene = Scene::new();
        CornellBoxScene::insert_into(&mut scene);
        let space = scene.build_linear();
        let world = World {
            path_space: &space,
            materials: &scene.materials,
            lights: &scene.lights,
        };

        let at_wall = Ray::new(Point::new(0., 0., 2.5), Vec3::NEG_Z);
        let hits = compute_first_hit(&[at_wall], &world);
        let tracer = DirectPathTracer {
            multi_light_samps: 8,
        };
        let rad = tracer.sample(&mut rng(), &[at_wall], &hits.hits, &world);
        assert!(rad[0].to_array().iter().all(|&c| c > 0.0), "{:?}", rad[0]);
    }
}
