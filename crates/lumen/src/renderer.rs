use glam::Mat4;
use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

use crate::{
    aggregate::PathSpace,
    camera::Camera,
    color::{linear::BLACK, Rgb, Rgba},
    error::{Error, Result},
    integrators::{compute_first_hit, PathTracer},
    light::LightSources,
    material::MaterialContainer,
    ray::Ray,
    Seed,
};

/// Read-only view of a scene for the duration of a render.
pub struct World<'a> {
    pub path_space: &'a dyn PathSpace,
    pub materials: &'a MaterialContainer,
    pub lights: &'a LightSources,
}

/// Pixel sink the renderer writes into. Tone mapping and file formats live
/// behind this boundary.
pub trait Compositor {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn put(&mut self, x: u32, y: u32, value: Rgba);
}

#[derive(Debug, Clone, Copy)]
pub struct RenderStats {
    pub passes: u32,
    pub samples_per_pixel: u32,
}

/// Progressive per-pixel accumulator. Each call to [ImageRenderer::render]
/// adds one pass of `samples_per_pass` estimates to every pixel and writes
/// the running mean into the compositor. Changing the camera projection or
/// the compositor dimensions discards all accumulated samples.
pub struct ImageRenderer {
    tracer: Box<dyn PathTracer>,
    samples_per_pass: u32,
    seed: u64,
    projection: Mat4,
    width: u32,
    height: u32,
    rays: Vec<Ray>,
    rad: Vec<Rgb>,
    samps: u32,
    pass: u32,
}

impl ImageRenderer {
    pub const SAMPLES_PER_PASS: u32 = 5;

    pub fn new(tracer: Box<dyn PathTracer>, seed: u64) -> Self {
        Self {
            tracer,
            samples_per_pass: Self::SAMPLES_PER_PASS,
            seed,
            projection: Mat4::ZERO,
            width: 0,
            height: 0,
            rays: Vec::new(),
            rad: Vec::new(),
            samps: 0,
            pass: 0,
        }
    }

    pub fn samples_accumulated(&self) -> u32 {
        self.samps
    }

    pub fn render(&mut self, world: &World, camera: &Camera, compositor: &mut dyn Compositor) {
        let (w, h) = (compositor.width(), compositor.height());
        let projection = camera.projection();
        if projection != self.projection || w != self.width || h != self.height {
            self.projection = projection;
            self.width = w;
            self.height = h;
            self.samps = 0;
            self.pass = 0;
            self.rad = vec![BLACK; (w * h) as usize];
            self.rays = (0..h)
                .flat_map(|j| (0..w).map(move |i| (i, j)))
                .map(|(i, j)| camera.sample(i, j, w, h).0)
                .collect();
        }

        let first_hits = compute_first_hit(&self.rays, world);

        // One worker per pixel row; each row owns a seeded stream so the
        // result does not depend on how rayon schedules them.
        let Self {
            tracer,
            rays,
            rad,
            seed,
            pass,
            samples_per_pass,
            ..
        } = self;
        rad.par_chunks_mut(w as usize)
            .enumerate()
            .for_each(|(row, rad_row)| {
                let offset = row * w as usize;
                let rays_row = &rays[offset..offset + w as usize];
                let hits_row = &first_hits.hits[offset..offset + w as usize];

                let mut rng = Seed {
                    seed: *seed,
                    x: 0,
                    y: row as u32,
                    pass: *pass,
                }
                .into_rng(0);

                for _ in 0..*samples_per_pass {
                    let estimate = tracer.sample(&mut rng, rays_row, hits_row, world);
                    for (acc, e) in rad_row.iter_mut().zip(estimate) {
                        *acc += e;
                    }
                }
            });

        self.samps += self.samples_per_pass;
        self.pass += 1;

        let inv_samps = 1.0 / self.samps as f32;
        for j in 0..h {
            for i in 0..w {
                let value = inv_samps * self.rad[(i + j * w) as usize];
                compositor.put(i, j, value.with_alpha(1.0));
            }
        }
    }

    pub fn stats(&self) -> Result<RenderStats> {
        Err(Error::Unsupported("render statistics"))
    }
}
