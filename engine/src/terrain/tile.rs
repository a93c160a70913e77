//! Tile Geometry
//!
//! A generated, immutable terrain tile plus the flat buffers a renderer
//! consumes. Tiles are unindexed: every triangle owns its three vertices.

use std::collections::HashSet;

use glam::{Vec2, Vec3};

use crate::config::TessellationMode;
use crate::gpu::TerrainGpuVertex;

/// One tile-local vertex. `position.z` is the sampled height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub uv: Vec2,
}

/// Generated terrain tile.
#[derive(Clone, Debug)]
pub struct Tile {
    vertices: Vec<Vertex>,
    mode: TessellationMode,
    /// Tile extent along the scroll axis, in tile units
    depth: f32,
}

impl Tile {
    pub(crate) fn new(vertices: Vec<Vertex>, mode: TessellationMode, depth: f32) -> Self {
        Self {
            vertices,
            mode,
            depth,
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn mode(&self) -> TessellationMode {
        self.mode
    }

    pub fn depth(&self) -> f32 {
        self.depth
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Both modes emit whole triangles, so this holds for polylines too.
    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Flat `x, y, z` stream in emission order.
    pub fn positions(&self) -> Vec<f32> {
        self.vertices
            .iter()
            .flat_map(|v| v.position.to_array())
            .collect()
    }

    /// Flat `u, v` stream in emission order.
    pub fn uvs(&self) -> Vec<f32> {
        self.vertices.iter().flat_map(|v| v.uv.to_array()).collect()
    }

    /// The vertex sequence as one continuous line strip. Only polyline tiles
    /// are ordered for this; triangle lists would draw jumps across the tile.
    pub fn line_strip(&self) -> Option<Vec<f32>> {
        match self.mode {
            TessellationMode::Polyline => Some(self.positions()),
            TessellationMode::TriangleList => None,
        }
    }

    /// Flat face normal for every vertex, oriented towards +Z (up out of the
    /// terrain) regardless of triangle winding.
    pub fn normals(&self) -> Vec<Vec3> {
        let mut normals = Vec::with_capacity(self.vertices.len());
        for tri in self.vertices.chunks_exact(3) {
            let e1 = tri[1].position - tri[0].position;
            let e2 = tri[2].position - tri[0].position;
            let mut n = e1.cross(e2).normalize_or_zero();
            if n.z < 0.0 {
                n = -n;
            }
            normals.extend([n; 3]);
        }
        normals
    }

    /// Unique triangle edges as segment endpoints, for a wireframe overlay.
    pub fn wireframe_segments(&self) -> Vec<[Vec3; 2]> {
        let mut seen = HashSet::new();
        let mut segments = Vec::new();
        for tri in self.vertices.chunks_exact(3) {
            for (a, b) in [(0, 1), (1, 2), (2, 0)] {
                let (pa, pb) = (tri[a].position, tri[b].position);
                let (ka, kb) = (quantize(pa), quantize(pb));
                let key = if ka <= kb { (ka, kb) } else { (kb, ka) };
                if seen.insert(key) {
                    segments.push([pa, pb]);
                }
            }
        }
        segments
    }

    /// Lowest and highest sampled height.
    pub fn height_range(&self) -> (f32, f32) {
        self.vertices
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v.position.z), hi.max(v.position.z))
            })
    }

    /// Interleaved GPU records (position, normal, uv).
    pub fn gpu_vertices(&self) -> Vec<TerrainGpuVertex> {
        self.vertices
            .iter()
            .zip(self.normals())
            .map(|(v, n)| TerrainGpuVertex {
                position: v.position.to_array(),
                normal: n.to_array(),
                uv: v.uv.to_array(),
            })
            .collect()
    }
}

/// Edge dedup key. Shared vertices of neighbouring triangles are computed
/// through different sums and can differ by an ulp.
fn quantize(p: Vec3) -> [i64; 3] {
    const SCALE: f32 = 1.0e4;
    [
        (p.x * SCALE).round() as i64,
        (p.y * SCALE).round() as i64,
        (p.z * SCALE).round() as i64,
    ]
}
