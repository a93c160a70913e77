//! Height Sampler
//!
//! Nearest-pixel lookup of raster luminance at normalized tile coordinates.

use crate::config::VConvention;
use crate::raster::Raster;

/// Reads heights out of a raster. Pure: the same `(u, v)` always yields the
/// same height.
#[derive(Clone, Copy, Debug)]
pub struct HeightSampler<'a> {
    raster: &'a Raster,
    displacement_scale: f32,
    convention: VConvention,
}

impl<'a> HeightSampler<'a> {
    pub fn new(raster: &'a Raster, displacement_scale: f32, convention: VConvention) -> Self {
        Self {
            raster,
            displacement_scale,
            convention,
        }
    }

    pub fn convention(&self) -> VConvention {
        self.convention
    }

    /// Pixel addressed by `(u, v)`.
    ///
    /// `x = round(u * (w - 1))`, `y = round(f(v) * (h - 1))`. Coordinates
    /// outside [0, 1] clamp to the nearest edge pixel.
    pub fn pixel(&self, u: f32, v: f32) -> (u32, u32) {
        let x = to_index(u, self.raster.width());
        let y = to_index(self.convention.row_coordinate(v), self.raster.height());
        (x, y)
    }

    /// Height at `(u, v)`: `luminance / 255 * displacement_scale`.
    pub fn sample(&self, u: f32, v: f32) -> f32 {
        let (x, y) = self.pixel(u, v);
        self.raster.luminance(x, y) as f32 / 255.0 * self.displacement_scale
    }
}

#[inline]
fn to_index(t: f32, dimension: u32) -> u32 {
    let max = (dimension - 1) as f32;
    // NaN lands on 0 through the saturating cast
    (t * max).round().clamp(0.0, max) as u32
}
