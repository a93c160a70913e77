//! Seam Stitcher (rectangular-grid variant)
//!
//! The alternative generation path: a plain subdivided plane whose vertex
//! heights come straight from the raster. Two such grids (A and B) alternate
//! along the corridor, and their shared edge rows are reconciled after
//! sampling instead of being wrapped during tessellation.

use glam::{Mat3, Vec2, Vec3};

use super::sampler::HeightSampler;
use super::tile::{Tile, Vertex};
use crate::config::{SeamBlend, TessellationMode};
use crate::error::ConfigError;

/// Dimensions of a subdivided plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridSpec {
    pub width: f32,
    pub depth: f32,
    pub segments_x: u32,
    pub segments_y: u32,
}

impl GridSpec {
    pub fn new(width: f32, depth: f32, segments_x: u32, segments_y: u32) -> Result<Self, ConfigError> {
        if segments_x == 0 {
            return Err(ConfigError::ZeroCount { field: "segments_x" });
        }
        if segments_y == 0 {
            return Err(ConfigError::ZeroCount { field: "segments_y" });
        }
        for (field, value) in [("width", width), ("depth", depth)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }
        Ok(Self {
            width,
            depth,
            segments_x,
            segments_y,
        })
    }

    pub fn columns(&self) -> usize {
        self.segments_x as usize + 1
    }

    pub fn rows(&self) -> usize {
        self.segments_y as usize + 1
    }
}

/// Row-major height grid, row 0 at the top edge (`v = 1`).
#[derive(Clone, Debug)]
pub struct HeightGrid {
    spec: GridSpec,
    vertices: Vec<Vertex>,
}

impl HeightGrid {
    /// Sample a plane centred on the origin, `width x depth`, the top edge at
    /// `+depth/2`. With `mirror` the raster is read right-to-left.
    pub fn sample(spec: GridSpec, sampler: &HeightSampler<'_>, mirror: bool) -> Self {
        let (cols, rows) = (spec.columns(), spec.rows());
        let mut vertices = Vec::with_capacity(cols * rows);

        for iy in 0..rows {
            let v = 1.0 - iy as f32 / spec.segments_y as f32;
            let y = spec.depth / 2.0 - iy as f32 / spec.segments_y as f32 * spec.depth;
            for ix in 0..cols {
                let u = ix as f32 / spec.segments_x as f32;
                let x = u * spec.width - spec.width / 2.0;
                let su = if mirror { 1.0 - u } else { u };
                vertices.push(Vertex {
                    position: Vec3::new(x, y, sampler.sample(su, v)),
                    uv: Vec2::new(u, v),
                });
            }
        }

        Self { spec, vertices }
    }

    pub fn spec(&self) -> &GridSpec {
        &self.spec
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        row * self.spec.columns() + col
    }

    pub fn height(&self, row: usize, col: usize) -> f32 {
        self.vertices[self.index(row, col)].position.z
    }

    fn set_height(&mut self, row: usize, col: usize, z: f32) {
        let i = self.index(row, col);
        self.vertices[i].position.z = z;
    }

    pub fn top_row(&self) -> Vec<f32> {
        (0..self.spec.columns()).map(|c| self.height(0, c)).collect()
    }

    pub fn bottom_row(&self) -> Vec<f32> {
        let last = self.spec.rows() - 1;
        (0..self.spec.columns()).map(|c| self.height(last, c)).collect()
    }

    /// Skew X in proportion to height: `x += factor * z`. Forced-perspective
    /// tunnel look; heights are untouched.
    pub fn apply_shear(&mut self, factor: f32) {
        let shear = Mat3::from_cols(Vec3::X, Vec3::Y, Vec3::new(factor, 0.0, 1.0));
        for v in &mut self.vertices {
            v.position = shear * v.position;
        }
    }

    /// Two triangles per quad, unindexed.
    pub fn to_tile(&self) -> Tile {
        let cols = self.spec.columns();
        let mut out = Vec::with_capacity(self.spec.segments_x as usize * self.spec.segments_y as usize * 6);
        for row in 0..self.spec.segments_y as usize {
            for col in 0..self.spec.segments_x as usize {
                let a = row * cols + col;
                let b = a + 1;
                let c = a + cols;
                let d = c + 1;
                for i in [a, c, b, b, c, d] {
                    out.push(self.vertices[i]);
                }
            }
        }
        Tile::new(out, TessellationMode::TriangleList, self.spec.depth)
    }

    /// Vertex index of the `n`th point of the zig-zag walk: even rows left to
    /// right, odd rows right to left.
    pub fn zigzag_index(&self, n: usize) -> usize {
        let cols = self.spec.columns();
        let (row, k) = (n / cols, n % cols);
        let col = if row % 2 == 0 { k } else { cols - 1 - k };
        self.index(row, col)
    }

    /// Flat `x, y, z` line strip over every grid vertex in zig-zag order.
    pub fn line_strip(&self) -> Vec<f32> {
        (0..self.vertices.len())
            .flat_map(|n| self.vertices[self.zigzag_index(n)].position.to_array())
            .collect()
    }
}

/// Reconcile the edges of an alternating A/B pair so `A, B, A, B, ...` has no
/// step at any boundary.
///
/// `Overwrite` discards the sampled bottom rows: `A.bottom = B.top` and
/// `B.bottom = A.top`. `Average` moves both rows of each seam to their mean.
pub struct SeamStitcher {
    pub blend: SeamBlend,
}

impl SeamStitcher {
    pub fn new(blend: SeamBlend) -> Self {
        Self { blend }
    }

    /// Fails without touching either grid if their specs differ.
    pub fn stitch(&self, a: &mut HeightGrid, b: &mut HeightGrid) -> Result<(), ConfigError> {
        if a.spec != b.spec {
            return Err(ConfigError::GridMismatch { a: a.spec, b: b.spec });
        }
        let (a_last, b_last) = (a.spec.rows() - 1, b.spec.rows() - 1);

        for col in 0..a.spec.columns() {
            let (a_top, b_top) = (a.height(0, col), b.height(0, col));
            match self.blend {
                SeamBlend::Overwrite => {
                    a.set_height(a_last, col, b_top);
                    b.set_height(b_last, col, a_top);
                }
                SeamBlend::Average => {
                    // A.bottom meets B.top, B.bottom meets A.top
                    let ab = (a.height(a_last, col) + b_top) / 2.0;
                    let ba = (b.height(b_last, col) + a_top) / 2.0;
                    a.set_height(a_last, col, ab);
                    b.set_height(0, col, ab);
                    b.set_height(b_last, col, ba);
                    a.set_height(0, col, ba);
                }
            }
        }
        Ok(())
    }

    /// Stitch a single grid repeated against itself (`A, A, A, ...`).
    pub fn stitch_self(&self, grid: &mut HeightGrid) {
        let last = grid.spec.rows() - 1;
        for col in 0..grid.spec.columns() {
            match self.blend {
                SeamBlend::Overwrite => {
                    let top = grid.height(0, col);
                    grid.set_height(last, col, top);
                }
                SeamBlend::Average => {
                    let mean = (grid.height(0, col) + grid.height(last, col)) / 2.0;
                    grid.set_height(0, col, mean);
                    grid.set_height(last, col, mean);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VConvention;
    use crate::raster::Raster;

    fn gradient() -> Raster {
        // 3x3, brighter towards the bottom-right
        Raster::from_luma(3, 3, vec![0, 10, 20, 30, 40, 50, 60, 70, 80]).unwrap()
    }

    #[test]
    fn test_grid_corners_follow_plane_layout() {
        let raster = gradient();
        let sampler = HeightSampler::new(&raster, 255.0, VConvention::Inverted);
        let grid = HeightGrid::sample(GridSpec::new(4.0, 2.0, 2, 2).unwrap(), &sampler, false);
        let first = grid.vertices()[0].position;
        assert_eq!(first, Vec3::new(-2.0, 1.0, 0.0));
        let last = grid.vertices()[8].position;
        assert!((last - Vec3::new(2.0, -1.0, 80.0)).length() < 1e-4);
    }

    #[test]
    fn test_mirror_reverses_columns() {
        let raster = gradient();
        let sampler = HeightSampler::new(&raster, 255.0, VConvention::Inverted);
        let spec = GridSpec::new(1.0, 1.0, 2, 2).unwrap();
        let plain = HeightGrid::sample(spec, &sampler, false);
        let mirrored = HeightGrid::sample(spec, &sampler, true);
        let mut top = plain.top_row();
        top.reverse();
        assert_eq!(mirrored.top_row(), top);
    }

    #[test]
    fn test_zigzag_index() {
        let raster = gradient();
        let sampler = HeightSampler::new(&raster, 1.0, VConvention::Inverted);
        let grid = HeightGrid::sample(GridSpec::new(1.0, 1.0, 2, 2).unwrap(), &sampler, false);
        let order: Vec<usize> = (0..9).map(|n| grid.zigzag_index(n)).collect();
        assert_eq!(order, vec![0, 1, 2, 5, 4, 3, 6, 7, 8]);
    }

    #[test]
    fn test_shear_moves_x_only() {
        let raster = Raster::from_luma(1, 1, vec![255]).unwrap();
        let sampler = HeightSampler::new(&raster, 2.0, VConvention::Inverted);
        let mut grid = HeightGrid::sample(GridSpec::new(2.0, 2.0, 1, 1).unwrap(), &sampler, false);
        let before = grid.vertices()[0].position;
        grid.apply_shear(0.5);
        let after = grid.vertices()[0].position;
        assert!((after.x - (before.x + 1.0)).abs() < 1e-6);
        assert_eq!(after.y, before.y);
        assert_eq!(after.z, before.z);
    }

    #[test]
    fn test_stitch_rejects_mismatched_grids() {
        let raster = gradient();
        let sampler = HeightSampler::new(&raster, 1.0, VConvention::Inverted);
        let mut a = HeightGrid::sample(GridSpec::new(1.0, 1.0, 2, 2).unwrap(), &sampler, false);
        let mut b = HeightGrid::sample(GridSpec::new(1.0, 1.0, 2, 3).unwrap(), &sampler, false);
        let before = a.bottom_row();

        let result = SeamStitcher::new(SeamBlend::Overwrite).stitch(&mut a, &mut b);

        assert!(matches!(result, Err(ConfigError::GridMismatch { .. })));
        assert_eq!(a.bottom_row(), before);
    }

    #[test]
    fn test_grid_tile_triangle_count() {
        let raster = gradient();
        let sampler = HeightSampler::new(&raster, 1.0, VConvention::Inverted);
        let grid = HeightGrid::sample(GridSpec::new(1.0, 1.0, 3, 2).unwrap(), &sampler, false);
        assert_eq!(grid.to_tile().triangle_count(), 3 * 2 * 2);
    }
}
