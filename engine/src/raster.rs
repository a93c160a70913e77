//! Heightmap Raster
//!
//! An immutable, single-channel luminance grid. Decoding happens once during
//! setup; the generator only ever reads from it.

use std::path::Path;

use image::DynamicImage;

use crate::error::LoadError;

/// Grayscale raster, row 0 at the top of the image.
#[derive(Clone, Debug, PartialEq)]
pub struct Raster {
    width: u32,
    height: u32,
    luma: Vec<u8>,
}

impl Raster {
    /// Wrap an already-decoded row-major luminance buffer.
    pub fn from_luma(width: u32, height: u32, luma: Vec<u8>) -> Result<Self, LoadError> {
        if width == 0 || height == 0 {
            return Err(LoadError::Empty { width, height });
        }
        let expected = width as usize * height as usize;
        if luma.len() != expected {
            return Err(LoadError::SizeMismatch {
                expected,
                actual: luma.len(),
            });
        }
        Ok(Self { width, height, luma })
    }

    /// Convert a decoded image. Heightmaps are grayscale, so any channel would
    /// do; the luma conversion also handles the odd colour heightmap.
    pub fn from_image(img: &DynamicImage) -> Result<Self, LoadError> {
        let gray = img.to_luma8();
        let (width, height) = (gray.width(), gray.height());
        Self::from_luma(width, height, gray.into_raw())
    }

    /// Decode PNG or JPEG bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, LoadError> {
        let img = image::load_from_memory(bytes)?;
        Self::from_image(&img)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Luminance at pixel `(x, y)`, with both indices clamped into the raster.
    #[inline]
    pub fn luminance(&self, x: u32, y: u32) -> u8 {
        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        self.luma[y * self.width as usize + x]
    }
}

/// Read and decode a heightmap from disk.
///
/// This is the one suspension point of scene setup: await it before building
/// any tile. A failure here aborts setup.
pub async fn load_raster(path: impl AsRef<Path>) -> Result<Raster, LoadError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let raster = Raster::decode(&bytes)?;
    log::info!(
        "[Raster] loaded {}x{} heightmap from {}",
        raster.width(),
        raster.height(),
        path.display()
    );
    Ok(raster)
}
