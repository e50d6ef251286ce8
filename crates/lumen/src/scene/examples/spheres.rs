use crate::{color::Rgb, material::Lambertian, math::point::Point, scene::Scene};

/// A white diffuse sphere at the origin lit by a single point light above it.
/// Small enough that direct-illumination values can be checked by hand.
pub struct SphereLightScene;

impl SphereLightScene {
    pub fn insert_into(scene: &mut Scene) {
        let white = scene.insert_material(
            Some("white sphere".into()),
            Lambertian {
                albedo: Rgb::splat(1.0),
            },
        );
        scene.insert_sphere(white, Point::ORIGIN, 0.5);
        scene.insert_point_light(Some("key".into()), Point::new(0., 1., 0.), Rgb::splat(1.0));
    }
}
