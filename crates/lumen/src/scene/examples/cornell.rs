use glam::Vec3;

use crate::{
    color::Rgb,
    material::{Lambertian, OrenNayar},
    math::point::Point,
    scene::Scene,
};

/// The classic box: white floor, ceiling and back wall, red left wall, green
/// right wall, a ceiling lamp, and two spheres. The box spans `[-1, 1]^3`
/// with the open side facing +Z.
pub struct CornellBoxScene;

impl CornellBoxScene {
    pub fn insert_into(scene: &mut Scene) {
        let white = scene.insert_material(
            Some("white walls".into()),
            Lambertian {
                albedo: Rgb::splat(0.73),
            },
        );
        let red = scene.insert_material(
            Some("left wall".into()),
            Lambertian {
                albedo: Rgb([0.65, 0.05, 0.05]),
            },
        );
        let green = scene.insert_material(
            Some("right wall".into()),
            Lambertian {
                albedo: Rgb([0.12, 0.45, 0.15]),
            },
        );

        // Interior-facing walls.
        scene.insert_quad(
            white,
            Point::new(-1., -1., 1.),
            2.0 * Vec3::X,
            2.0 * Vec3::NEG_Z,
        ); // floor, +Y
        scene.insert_quad(
            white,
            Point::new(-1., 1., 1.),
            2.0 * Vec3::NEG_Z,
            2.0 * Vec3::X,
        ); // ceiling, -Y
        scene.insert_quad(
            white,
            Point::new(-1., -1., -1.),
            2.0 * Vec3::X,
            2.0 * Vec3::Y,
        ); // back wall, +Z
        scene.insert_quad(
            red,
            Point::new(-1., -1., -1.),
            2.0 * Vec3::Y,
            2.0 * Vec3::Z,
        ); // left wall, +X
        scene.insert_quad(
            green,
            Point::new(1., -1., -1.),
            2.0 * Vec3::Z,
            2.0 * Vec3::Y,
        ); // right wall, -X

        let rough = scene.insert_material(
            Some("rough sphere".into()),
            OrenNayar::new(Rgb::splat(0.65), 0.4),
        );
        scene.insert_sphere(white, Point::new(-0.45, -0.65, -0.35), 0.35);
        scene.insert_sphere(rough, Point::new(0.45, -0.7, 0.2), 0.3);

        // Lamp slightly below the ceiling, facing down.
        let lamp = scene.insert_quad(
            white,
            Point::new(-0.3, 0.99, -0.3),
            0.6 * Vec3::X,
            0.6 * Vec3::Z,
        );
        scene.make_emissive(Some("lamp".into()), lamp, Rgb::splat(12.0));
    }
}
