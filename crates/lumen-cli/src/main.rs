mod output;

use std::{path::PathBuf, str::FromStr};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use glam::Vec3;
use lumen::{
    aggregate::PathSpace,
    camera::Camera,
    integrators::{
        BidirectLt2PathTracer, BidirectMisPathTracer, DirectPathTracer, NormalTracer, PathTracer,
        PositionTracer, UnidirectLt1PathTracer, UnidirectPathTracer,
    },
    math::point::Point,
    renderer::{ImageRenderer, World},
    scene::{
        examples::{CornellBoxScene, SphereLightScene},
        Scene,
    },
    utils::counter,
};
use output::Frame;

#[derive(Debug, Clone, Copy)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl FromStr for Dimensions {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once('x')
            .context("expected dimensions as `width`x`height`")?;
        Ok(Self {
            width: w.parse()?,
            height: h.parse()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
enum AvailableScene {
    #[default]
    Cornell,
    Spheres,
}

impl AvailableScene {
    fn build(self) -> Scene {
        let mut scene = Scene::new();
        match self {
            AvailableScene::Cornell => CornellBoxScene::insert_into(&mut scene),
            AvailableScene::Spheres => SphereLightScene::insert_into(&mut scene),
        }
        scene
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
enum AvailableTracer {
    Position,
    Normal,
    Direct,
    Unidirect,
    UnidirectLt1,
    #[default]
    BidirectLt2,
    BidirectMis,
}

impl AvailableTracer {
    fn build(self, max_path_len: u32, multi_light_samps: u32) -> Box<dyn PathTracer> {
        match self {
            AvailableTracer::Position => Box::new(PositionTracer),
            AvailableTracer::Normal => Box::new(NormalTracer),
            AvailableTracer::Direct => Box::new(DirectPathTracer { multi_light_samps }),
            AvailableTracer::Unidirect => Box::new(UnidirectPathTracer { max_path_len }),
            AvailableTracer::UnidirectLt1 => Box::new(UnidirectLt1PathTracer {
                max_path_len,
                multi_light_samps,
            }),
            AvailableTracer::BidirectLt2 => Box::new(BidirectLt2PathTracer { max_path_len }),
            AvailableTracer::BidirectMis => Box::new(BidirectMisPathTracer { max_path_len }),
        }
    }
}

#[derive(Parser, Debug)]
pub struct Args {
    /// Scene selector
    #[arg(long, value_enum, default_value_t)]
    scene: AvailableScene,

    /// Radiance estimator
    #[arg(short, long, value_enum, default_value_t)]
    tracer: AvailableTracer,

    /// Screen dimension in format `width`x`height`
    #[arg(short, long, default_value = "800x600")]
    dimensions: Dimensions,

    /// Number of progressive passes to accumulate
    #[arg(short, long, default_value_t = 8)]
    passes: u32,

    /// Longest camera or light subpath
    #[arg(long, default_value_t = 8)]
    max_path_len: u32,

    /// Shadow-ray connections per direct-lighting estimate
    #[arg(long, default_value_t = 1)]
    multi_light_samps: u32,

    /// Master seed for all RNG streams
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Output image
    #[arg(short, long, default_value = "render.png")]
    output: PathBuf,

    /// Use the linear path space instead of the BVH
    #[arg(long, default_value_t = false)]
    linear: bool,

    /// Work on only one thread
    #[arg(long, default_value_t = false)]
    no_threads: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if args.no_threads {
        log::warn!("Working on only one thread");
        rayon::ThreadPoolBuilder::new()
            .num_threads(1)
            .build_global()?;
    }

    let scene = args.scene.build();
    let linear;
    let bvh;
    let path_space: &dyn PathSpace = if args.linear {
        linear = scene.build_linear();
        &linear
    } else {
        bvh = scene.build_bvh();
        &bvh
    };
    let world = World {
        path_space,
        materials: &scene.materials,
        lights: &scene.lights,
    };

    let Dimensions { width, height } = args.dimensions;
    let camera = Camera::look_at(
        Point::new(0., 0., 3.),
        Point::ORIGIN,
        Vec3::Y,
        f32::to_radians(60.),
        width as f32 / height as f32,
    );

    let tracer = args.tracer.build(args.max_path_len, args.multi_light_samps);
    let mut renderer = ImageRenderer::new(tracer, args.seed);
    let mut frame = Frame::new(width, height);

    log::info!(
        "Rendering {:?} with {:?}, {} passes at {}x{}",
        args.scene,
        args.tracer,
        args.passes,
        width,
        height
    );
    for pass in 1..=args.passes {
        renderer.render(&world, &camera, &mut frame);
        log::info!(
            "pass {pass}/{} ({} samples per pixel)",
            args.passes,
            renderer.samples_accumulated()
        );
    }

    frame
        .save_png(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    log::info!("Wrote {}", args.output.display());

    counter::report_counters();
    Ok(())
}
