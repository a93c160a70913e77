//! Terrain Strip Engine
//!
//! Generates an endlessly scrolling 3D terrain corridor from a grayscale
//! heightmap. A raster is tessellated into a rhombus-patterned tile whose
//! bottom strip is wrap-corrected to match its own top, so copies laid
//! back-to-back form a seamless strip; a fixed pool of instances then scrolls
//! towards the camera and is recycled every frame.
//!
//! # Modules
//!
//! - [`raster`] - Heightmap raster and its async load
//! - [`terrain`] - Height sampling, rhombus tessellation, seam stitching
//! - [`placement`] - Tile instances, the loop placer, live scroll settings
//! - [`scene`] - One struct bundling tiles, instances and the placer
//! - [`gpu`] - wgpu vertex/instance buffers for a host renderer
//! - [`config`] / [`error`] - Configuration snapshot and setup errors
//!
//! # Example
//!
//! ```ignore
//! use terrain_strip_engine::{TerrainConfig, TerrainScene, FrameTime, ScrollSettings, load_raster};
//!
//! let config = TerrainConfig::default();
//! let raster = pollster::block_on(load_raster("heightmap.jpg"))?;
//! let mut scene = TerrainScene::build(&config, &raster)?;
//! let settings = ScrollSettings::from_config(&config);
//!
//! // Once per frame
//! scene.update(FrameTime::new(dt, elapsed), &settings);
//! for instance in scene.instances() {
//!     let model = instance.model_matrix();
//!     // draw instance.tile() with `model`
//! }
//! ```

pub mod config;
pub mod error;
pub mod gpu;
pub mod placement;
pub mod raster;
pub mod scene;
pub mod terrain;

pub use config::{RecyclePolicy, SeamBlend, TerrainConfig, TessellationMode, VConvention};
pub use error::{ConfigError, GpuError, LoadError, TerrainError};
pub use placement::{
    FrameTime, LoopLayout, LoopPlacer, ScrollSettings, SettingsSender, SettingsWatcher,
    TerrainInstance, settings_channel,
};
pub use raster::{Raster, load_raster};
pub use scene::TerrainScene;
pub use terrain::{HeightSampler, Tile, TileMetrics, TileTessellator, Vertex};
