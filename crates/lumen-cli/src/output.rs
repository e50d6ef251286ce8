use std::path::Path;

use lumen::{
    color::{Rgb, Rgba},
    renderer::Compositor,
};

/// Errors from pushing a finished frame out to disk.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("resource i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("resource i/o: {0}")]
    Image(#[from] image::ImageError),
}

/// In-memory frame the renderer composites into; linear values, converted to
/// sRGB only on export.
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Frame {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba([0.0; 4]); (width * height) as usize],
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        self.pixels[(x + y * self.width) as usize].rgb()
    }

    pub fn save_png(&self, path: &Path) -> Result<(), OutputError> {
        let mut img = image::RgbImage::new(self.width, self.height);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = image::Rgb(self.pixel(x, y).to_srgb8());
        }
        img.save(path)?;
        Ok(())
    }
}

impl Compositor for Frame {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn put(&mut self, x: u32, y: u32, value: Rgba) {
        self.pixels[(x + y * self.width) as usize] = value;
    }
}
