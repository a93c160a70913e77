//! Rhombus Tile Tessellator
//!
//! Builds one tile of the terrain strip from a heightmap. The plane is covered
//! with rhombuses (diamonds) rather than a square grid: every grid cell holds
//! two rhombuses, each made of a mirrored triangle pair.
//!
//! ```text
//!   cell (0, 0), r = radius, origin top-left, Y negative going down the tile
//!
//!   rhombus A: top (r,0)   left (0,-r)   right (2r,-r)  bottom (r,-2r)
//!   rhombus B: top (2r,-r) left (r,-2r)  right (3r,-2r) bottom (2r,-3r)
//!
//!   triangle 1 = left half of A, 2 = right half of A
//!   triangle 3 = left half of B, 4 = right half of B
//!   cell (x, y) shifts everything by (2r*x, -2r*y)
//! ```
//!
//! The tile's bottom strip samples its heights from the top of the raster
//! instead of the bottom (see [`TileMetrics::seam_threshold`]), so that when
//! copies of the tile are laid back-to-back, one effective step apart, the
//! rows that meet carry identical heights.

use std::f32::consts::FRAC_1_SQRT_2;

use glam::{Vec2, Vec3};

use super::sampler::HeightSampler;
use super::tile::{Tile, Vertex};
use crate::config::{TerrainConfig, TessellationMode};
use crate::error::ConfigError;
use crate::raster::Raster;

/// Distance from a rhombus centre to its vertices: `1 / (2 cos 45°)`.
pub const RHOMBUS_RADIUS: f32 = FRAC_1_SQRT_2;

/// Margin below which vertices count as part of the bottom strip. Smaller than
/// one radius, so it only absorbs rounding.
pub const SEAM_EPSILON: f32 = 0.1;

// ============================================================================
// TILE METRICS
// ============================================================================

/// Derived extents of a `grid_width x grid_height` rhombus tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileMetrics {
    pub grid_width: u32,
    pub grid_height: u32,
    pub radius: f32,
    /// `(grid_width + 0.5) * 2r`; the half cell is the rhombus overhang.
    pub max_width: f32,
    /// `(grid_height + 0.5) * 2r`
    pub max_height: f32,
}

impl TileMetrics {
    pub fn new(grid_width: u32, grid_height: u32) -> Result<Self, ConfigError> {
        if grid_width == 0 {
            return Err(ConfigError::ZeroCount { field: "grid_width" });
        }
        if grid_height == 0 {
            return Err(ConfigError::ZeroCount { field: "grid_height" });
        }
        let radius = RHOMBUS_RADIUS;
        Ok(Self {
            grid_width,
            grid_height,
            radius,
            max_width: (grid_width as f32 + 0.5) * 2.0 * radius,
            max_height: (grid_height as f32 + 0.5) * 2.0 * radius,
        })
    }

    pub fn from_config(config: &TerrainConfig) -> Result<Self, ConfigError> {
        Self::new(config.grid_width, config.grid_height)
    }

    /// Local Y below which a vertex belongs to the bottom strip and takes the
    /// wrapped height.
    pub fn seam_threshold(&self) -> f32 {
        -2.0 * self.radius * self.grid_height as f32 + SEAM_EPSILON
    }

    /// Distance between consecutive instances along the scroll axis. Tiles
    /// overlap by one radius, the depth of the rhombus overhang.
    pub fn effective_step(&self) -> f32 {
        self.max_height - self.radius
    }

    /// Scroll-axis offset of the first instance.
    pub fn base_offset(&self) -> f32 {
        self.max_height / 2.0
    }

    /// Lateral offset that centres the strip on the scroll axis.
    pub fn lateral_offset(&self) -> f32 {
        -self.radius * self.grid_width as f32
    }

    /// `u = x / max_width`, `v = 1 + y / max_height` (v is 1 at the top edge).
    #[inline]
    pub fn uv(&self, local: Vec2) -> Vec2 {
        Vec2::new(local.x / self.max_width, 1.0 + local.y / self.max_height)
    }

    /// Row coordinate used for sampling. Bottom-strip vertices shift by
    /// `1 - r / max_height`, which lands them on the `v` the next tile's
    /// top rows sample.
    #[inline]
    pub fn sample_v(&self, local_y: f32, v: f32) -> f32 {
        if local_y < self.seam_threshold() {
            v + 1.0 - self.radius / self.max_height
        } else {
            v
        }
    }
}

// ============================================================================
// RHOMBUS TRIANGLES
// ============================================================================

/// The four triangles of one grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RhombusTriangle {
    /// Left half of the first rhombus
    First,
    /// Right half of the first rhombus
    Second,
    /// Left half of the second rhombus
    Third,
    /// Right half of the second rhombus
    Fourth,
}

impl RhombusTriangle {
    pub const ALL: [RhombusTriangle; 4] = [
        RhombusTriangle::First,
        RhombusTriangle::Second,
        RhombusTriangle::Third,
        RhombusTriangle::Fourth,
    ];

    /// Tile-local corners of this triangle in cell `(x, y)`.
    pub fn corners(self, x: u32, y: u32, r: f32) -> [Vec2; 3] {
        let offset = match self {
            RhombusTriangle::First | RhombusTriangle::Second => 0.0,
            RhombusTriangle::Third | RhombusTriangle::Fourth => r,
        };
        let cx = x as f32 * 2.0 * r + offset;
        let cy = -(y as f32) * 2.0 * r - offset;
        let corner = |dx: f32, dy: f32| Vec2::new(dx + cx, dy + cy);

        match self {
            RhombusTriangle::First | RhombusTriangle::Third => [
                corner(0.0, -r),
                corner(r, -2.0 * r),
                corner(r, 0.0),
            ],
            RhombusTriangle::Second | RhombusTriangle::Fourth => [
                corner(r, 0.0),
                corner(r, -2.0 * r),
                corner(2.0 * r, -r),
            ],
        }
    }
}

// ============================================================================
// TESSELLATOR
// ============================================================================

/// Turns a raster into rhombus tiles.
#[derive(Clone, Copy, Debug)]
pub struct TileTessellator<'a> {
    metrics: TileMetrics,
    sampler: HeightSampler<'a>,
}

impl<'a> TileTessellator<'a> {
    pub fn new(metrics: TileMetrics, sampler: HeightSampler<'a>) -> Self {
        Self { metrics, sampler }
    }

    /// Tessellator for `config`, reading heights from `raster`.
    pub fn from_config(config: &TerrainConfig, raster: &'a Raster) -> Result<Self, ConfigError> {
        config.validate()?;
        let metrics = TileMetrics::from_config(config)?;
        let sampler = HeightSampler::new(raster, config.displacement_scale, config.v_convention);
        Ok(Self::new(metrics, sampler))
    }

    pub fn metrics(&self) -> &TileMetrics {
        &self.metrics
    }

    /// Vertex at a tile-local planar position, height included.
    pub fn vertex_at(&self, local: Vec2) -> Vertex {
        let uv = self.metrics.uv(local);
        let z = self
            .sampler
            .sample(uv.x, self.metrics.sample_v(local.y, uv.y));
        Vertex {
            position: Vec3::new(local.x, local.y, z),
            uv,
        }
    }

    fn push_cell(&self, x: u32, y: u32, out: &mut Vec<Vertex>) {
        for triangle in RhombusTriangle::ALL {
            for corner in triangle.corners(x, y, self.metrics.radius) {
                out.push(self.vertex_at(corner));
            }
        }
    }

    /// Build a tile in the given emission order.
    pub fn build(&self, mode: TessellationMode) -> Tile {
        let m = &self.metrics;
        let mut vertices = Vec::with_capacity(m.grid_width as usize * m.grid_height as usize * 12);

        match mode {
            TessellationMode::TriangleList => {
                for y in 0..m.grid_height {
                    for x in 0..m.grid_width {
                        self.push_cell(x, y, &mut vertices);
                    }
                }
            }
            TessellationMode::Polyline => {
                // Odd rows are the exact reverse of a forward row: columns
                // right to left, triangles 4..1, corners reversed.
                let mut row = Vec::with_capacity(m.grid_width as usize * 12);
                for y in 0..m.grid_height {
                    row.clear();
                    for x in 0..m.grid_width {
                        self.push_cell(x, y, &mut row);
                    }
                    if y % 2 == 1 {
                        row.reverse();
                    }
                    vertices.extend_from_slice(&row);
                }
            }
        }

        let tile = Tile::new(vertices, mode, m.max_height);
        let (lo, hi) = tile.height_range();
        log::debug!(
            "[Terrain] tessellated {}x{} {:?} tile: {} vertices, heights {:.2}..{:.2}",
            m.grid_width,
            m.grid_height,
            mode,
            tile.vertex_count(),
            lo,
            hi
        );
        tile
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VConvention;

    #[test]
    fn test_radius_is_inverse_two_cos_45() {
        let expected = 1.0 / (2.0 * std::f32::consts::FRAC_PI_4.cos());
        assert!((RHOMBUS_RADIUS - expected).abs() < 1e-6);
    }

    #[test]
    fn test_first_triangle_corners() {
        let r = RHOMBUS_RADIUS;
        let c = RhombusTriangle::First.corners(0, 0, r);
        assert_eq!(c, [Vec2::new(0.0, -r), Vec2::new(r, -2.0 * r), Vec2::new(r, 0.0)]);
    }

    #[test]
    fn test_fourth_triangle_is_second_shifted() {
        let r = RHOMBUS_RADIUS;
        let second = RhombusTriangle::Second.corners(2, 3, r);
        let fourth = RhombusTriangle::Fourth.corners(2, 3, r);
        for (a, b) in second.iter().zip(fourth.iter()) {
            assert!((*b - *a - Vec2::new(r, -r)).length() < 1e-5);
        }
    }

    #[test]
    fn test_bottom_strip_wraps_to_top_of_uv() {
        let m = TileMetrics::new(4, 4).unwrap();
        // Deepest vertex row sits at v = 0 and samples just below v = 1
        let bottom = -2.0 * m.radius * 4.0 - m.radius;
        let v = m.uv(Vec2::new(0.0, bottom)).y;
        assert!(v.abs() < 1e-5);
        assert!((m.sample_v(bottom, v) - (1.0 - m.radius / m.max_height)).abs() < 1e-5);
        // Top row is untouched
        assert_eq!(m.sample_v(0.0, 1.0), 1.0);
    }

    #[test]
    fn test_vertex_height_uses_sampler() {
        let raster = Raster::from_luma(1, 1, vec![255]).unwrap();
        let sampler = HeightSampler::new(&raster, 5.0, VConvention::Inverted);
        let tess = TileTessellator::new(TileMetrics::new(1, 1).unwrap(), sampler);
        let vertex = tess.vertex_at(Vec2::new(0.3, -0.4));
        assert_eq!(vertex.position.z, 5.0);
    }
}
