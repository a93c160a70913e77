//! Terrain Strip Configuration
//!
//! One snapshot of every option the generator and the loop placer recognise.
//! Loaded from JSON (all fields optional, missing ones fall back to
//! [`TerrainConfig::default`]) and validated before anything is built.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Which way a tile's `v` coordinate maps onto raster rows.
///
/// `Direct` reads row `v * (h - 1)`, so the top of the tile (`v = 1`) samples
/// the bottom row of the image. `Inverted` reads row `(1 - v) * (h - 1)`, so
/// the image appears upright on the tile. Swapping the two mirrors the terrain
/// front-to-back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VConvention {
    Direct,
    #[default]
    Inverted,
}

impl VConvention {
    /// Map a tile `v` to the normalized raster row coordinate.
    #[inline]
    pub fn row_coordinate(self, v: f32) -> f32 {
        match self {
            VConvention::Direct => v,
            VConvention::Inverted => 1.0 - v,
        }
    }
}

/// Vertex emission order for a rhombus tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TessellationMode {
    /// Row-major cells, triangles 1..=4. Rendered as an unindexed triangle list.
    #[default]
    TriangleList,
    /// Boustrophedon order so the vertex sequence is one continuous line strip.
    Polyline,
}

/// How the loop placer recycles instances that scroll past the camera.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecyclePolicy {
    /// Stateless: positions are a pure function of elapsed time.
    #[default]
    PeriodicModulo,
    /// Stateful: advance by `interval * speed`, jump back once past the threshold.
    IncrementalReset,
}

/// How the rectangular-grid stitcher reconciles the shared edge rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeamBlend {
    /// Bottom rows take the neighbour's top row verbatim. Lossy.
    #[default]
    Overwrite,
    /// Both rows take the mean of the two sampled rows.
    Average,
}

/// Terrain strip configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Rhombus cells across the tile
    pub grid_width: u32,
    /// Rhombus cells along the scroll axis
    pub grid_height: u32,
    /// Height of a full-white pixel, in tile units
    pub displacement_scale: f32,
    /// Raster row convention for `v`
    pub v_convention: VConvention,
    /// Vertex order of the generated tile
    pub tessellation_mode: TessellationMode,
    /// Number of tile instances in the corridor
    pub instance_count: u32,
    /// Scroll speed in tile units per second
    pub scroll_speed: f32,
    pub recycle_policy: RecyclePolicy,
    /// Period of the modulo policy. `None` uses one effective tile step.
    pub repeat_length: Option<f32>,
    /// Vertical placement of every instance
    pub vertical_offset: f32,
    /// Rectangular-grid variant: seam reconciliation
    pub seam_blend: SeamBlend,
    /// Rectangular-grid variant: mirror tile B horizontally
    pub mirror_alternate: bool,
    /// Rectangular-grid variant: X skew per unit of height (0 disables)
    pub shear: f32,
}

impl Default for TerrainConfig {
    /// Synthwave corridor: 20x20 cells, five instances,
    /// scrolling at 4 units/s.
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 20,
            displacement_scale: 3.2,
            v_convention: VConvention::default(),
            tessellation_mode: TessellationMode::default(),
            instance_count: 5,
            scroll_speed: 4.0,
            recycle_policy: RecyclePolicy::default(),
            repeat_length: None,
            vertical_offset: -1.0,
            seam_blend: SeamBlend::default(),
            mirror_alternate: true,
            shear: 0.0,
        }
    }
}

impl TerrainConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: TerrainConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Reject configurations that would build an empty or broken strip.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width == 0 {
            return Err(ConfigError::ZeroCount { field: "grid_width" });
        }
        if self.grid_height == 0 {
            return Err(ConfigError::ZeroCount { field: "grid_height" });
        }
        if self.instance_count == 0 {
            return Err(ConfigError::ZeroCount { field: "instance_count" });
        }
        check_non_negative("displacement_scale", self.displacement_scale)?;
        check_non_negative("scroll_speed", self.scroll_speed)?;
        if let Some(repeat) = self.repeat_length {
            if !repeat.is_finite() || repeat <= 0.0 {
                return Err(ConfigError::OutOfRange { field: "repeat_length", value: repeat });
            }
        }
        if !self.vertical_offset.is_finite() {
            return Err(ConfigError::OutOfRange {
                field: "vertical_offset",
                value: self.vertical_offset,
            });
        }
        if !self.shear.is_finite() {
            return Err(ConfigError::OutOfRange { field: "shear", value: self.shear });
        }
        Ok(())
    }
}

pub(crate) fn check_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value })
    }
}
