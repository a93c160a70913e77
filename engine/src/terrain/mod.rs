//! Terrain Module
//!
//! Heightmap sampling, rhombus tile tessellation, and seam stitching.

pub mod sampler;
pub mod seam;
pub mod tessellator;
pub mod tile;

pub use sampler::HeightSampler;
pub use seam::{GridSpec, HeightGrid, SeamStitcher};
pub use tessellator::{RHOMBUS_RADIUS, RhombusTriangle, SEAM_EPSILON, TileMetrics, TileTessellator};
pub use tile::{Tile, Vertex};
