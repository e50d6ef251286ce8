use glam::Vec3;

use crate::{
    aggregate::PathSpace as _,
    color::{linear::BLACK, Rgb},
    ray::Ray,
    renderer::World,
    Rng,
};

use super::{FirstHit, PathTracer};

/// Visualizes hit positions normalized into the scene's world bound. Misses
/// are black. Useful to sanity-check the path-space oracle.
pub struct PositionTracer;

impl PathTracer for PositionTracer {
    fn sample<'a>(
        &self,
        _rng: &mut Rng,
        _rays: &[Ray],
        first_hits: &[FirstHit<'a>],
        world: &World<'a>,
    ) -> Vec<Rgb> {
        let aabb = world.path_space.aabb();
        let range = aabb.diag().max(Vec3::splat(1e-6));
        first_hits
            .iter()
            .map(|hit| match hit.intersect.hit() {
                Some(hit) => Rgb(((hit.point - aabb.min) / range).to_array()),
                None => BLACK,
            })
            .collect()
    }
}

/// Visualizes shading normals as `(n + 1) / 2`.
pub struct NormalTracer;

impl PathTracer for NormalTracer {
    fn sample<'a>(
        &self,
        _rng: &mut Rng,
        _rays: &[Ray],
        first_hits: &[FirstHit<'a>],
        _world: &World<'a>,
    ) -> Vec<Rgb> {
        first_hits
            .iter()
            .map(|hit| match hit.intersect.hit() {
                Some(hit) => Rgb(((hit.normal + Vec3::ONE) * 0.5).to_array()),
                None => BLACK,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        color::Rgb,
        integrators::compute_first_hit,
        material::Lambertian,
        math::point::Point,
        scene::Scene,
        Seed,
    };

    fn unit_cube_scene() -> Scene {
        let mut scene = Scene::new();
        let white = scene.insert_material(
            None,
            Lambertian {
                albedo: Rgb::splat(0.8),
            },
        );
        // Outward-facing faces of the cube [-0.5, 0.5]^3 seen from (2, 2, 2).
        scene.insert_quad(
            white,
            Point::new(-0.5, -0.5, 0.5),
            Vec3::X,
            Vec3::Y,
        ); // +Z
        scene.insert_quad(
            white,
            Point::new(-0.5, 0.5, -0.5),
            Vec3::Z,
            Vec3::X,
        ); // +Y
        scene.insert_quad(
            white,
            Point::new(0.5, -0.5, -0.5),
            Vec3::Y,
            Vec3::Z,
        ); // +X
        scene
    }

    #[test]
    fn position_encoding_is_bounded() {
        let scene = unit_cube_scene();
        let space = scene.build_linear();
        let world = World {
            path_space: &space,
            materials: &scene.materials,
            lights: &scene.lights,
        };

        let ray = Ray::new(Point::new(2., 2., 2.), Vec3::splat(-1.0));
        let hits = compute_first_hit(&[ray], &world);
        let mut rng = Seed {
            seed: 0,
            x: 0,
            y: 0,
            pass: 0,
        }
        .into_rng(0);
        let rad = PositionTracer.sample(&mut rng, &[ray], &hits.hits, &world);
        for c in rad[0].to_array() {
            assert!((0.0..=1.0).contains(&c), "{rad:?}");
        }
    }

    #[test]
    fn normal_encoding_separates_faces() {
        let scene = unit_cube_scene();
        let space = scene.build_linear();
        let world = World {
            path_space: &space,
            materials: &scene.materials,
            lights: &scene.lights,
        };
        let mut rng = Seed {
            seed: 0,
            x: 0,
            y: 0,
            pass: 0,
        }
        .into_rng(0);

        // One ray per visible face, straight on.
        let rays = [
            Ray::new(Point::new(0., 0., 2.), Vec3::NEG_Z),
            Ray::new(Point::new(0., 2., 0.), Vec3::NEG_Y),
            Ray::new(Point::new(2., 0., 0.), Vec3::NEG_X),
        ];
        let hits = compute_first_hit(&rays, &world);
        let rad = NormalTracer.sample(&mut rng, &rays, &hits.hits, &world);

        assert_eq!(rad[0], Rgb([0.5, 0.5, 1.0])); // +Z face
        assert_eq!(rad[1], Rgb([0.5, 1.0, 0.5])); // +Y face
        assert_eq!(rad[2], Rgb([1.0, 0.5, 0.5])); // +X face

        // Adjacent faces differ in exactly one channel by 0.5.
        let diff: Vec<f32> = rad[0]
            .to_array()
            .iter()
            .zip(rad[1].to_array())
            .map(|(a, b)| (a - b).abs())
            .collect();
        assert_eq!(diff.iter().filter(|&&d| d >= 0.4).count(), 2);
    }

    #[test]
    fn misses_are_black() {
        let scene = Scene::new();
        let space = scene.build_linear();
        let world = World {
            path_space: &space,
            materials: &scene.materials,
            lights: &scene.lights,
        };
        let ray = Ray::new(Point::ORIGIN, Vec3::X);
        let hits = compute_first_hit(&[ray], &world);
        let mut rng = Seed {
            seed: 0,
            x: 0,
            y: 0,
            pass: 0,
        }
        .into_rng(0);
        assert_eq!(
            PositionTracer.sample(&mut rng, &[ray], &hits.hits, &world)[0],
            BLACK
        );
        assert_eq!(
            NormalTracer.sample(&mut rng, &[ray], &hits.hits, &world)[0],
            BLACK
        );
    }
}
