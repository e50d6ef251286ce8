pub mod aggregate;
pub mod camera;
pub mod color;
pub mod error;
pub mod integrators;
pub mod light;
pub mod material;
pub mod math;
pub mod ray;
pub mod renderer;
pub mod scene;
pub mod shape;
pub mod utils;

pub use rand_xoshiro::Xoshiro256StarStar as Rng;

/// Identifies one RNG stream out of the master seed. Every (pixel row, pass)
/// pair gets its own stream so the image does not depend on scheduling order.
#[derive(Debug, Copy, Clone, Hash)]
pub struct Seed {
    pub seed: u64,
    pub x: u32,
    pub y: u32,
    pub pass: u32,
}

impl Seed {
    pub fn into_rng(self, local_seed: u32) -> Rng {
        let mut hasher = std::hash::DefaultHasher::new();
        std::hash::Hash::hash(&self, &mut hasher);
        std::hash::Hash::hash(&local_seed, &mut hasher);
        <Rng as rand::SeedableRng>::seed_from_u64(std::hash::Hasher::finish(&hasher))
    }
}
