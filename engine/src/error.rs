//! Error Types
//!
//! Setup-time failures for the terrain strip. Nothing in the per-frame path
//! returns an error: once a scene is built, placement cannot fail.

use thiserror::Error;

use crate::terrain::GridSpec;

// ============================================================================
// LOAD ERRORS
// ============================================================================

/// The heightmap raster could not be produced. Fatal to scene setup.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The heightmap file could not be read.
    #[error("failed to read heightmap: {0}")]
    Io(#[from] std::io::Error),
    /// The bytes were read but are not a decodable image.
    #[error("failed to decode heightmap: {0}")]
    Decode(#[from] image::ImageError),
    /// The raster has a zero dimension.
    #[error("heightmap is empty ({width}x{height})")]
    Empty { width: u32, height: u32 },
    /// Pixel buffer length does not match `width * height`.
    #[error("heightmap buffer holds {actual} samples, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },
}

// ============================================================================
// CONFIG ERRORS
// ============================================================================

/// Configuration that would produce degenerate geometry or placement.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A grid dimension or instance count of zero.
    #[error("{field} must be at least 1")]
    ZeroCount { field: &'static str },
    /// A scalar that is NaN, infinite, or outside its allowed range.
    #[error("{field} is out of range: {value}")]
    OutOfRange { field: &'static str, value: f32 },
    /// Alternating A/B tiles need an even pool, or recycling breaks the pattern.
    #[error("instance_count must be even to alternate two tiles, got {0}")]
    OddPairCount(u32),
    /// Stitched grids must share width, depth and segment counts.
    #[error("cannot stitch grids of different shape: {a:?} vs {b:?}")]
    GridMismatch { a: GridSpec, b: GridSpec },
    /// The config file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// The config JSON is malformed.
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// GPU ERRORS
// ============================================================================

/// Upload that does not fit the buffer it targets.
#[derive(Debug, Error)]
pub enum GpuError {
    #[error("instance buffer holds {capacity} bytes, {needed} needed")]
    InstanceOverflow { capacity: u64, needed: u64 },
}

// ============================================================================
// CRATE ERROR
// ============================================================================

/// Any failure during scene setup.
#[derive(Debug, Error)]
pub enum TerrainError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
