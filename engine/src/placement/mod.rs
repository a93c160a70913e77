//! Placement Module
//!
//! Instancing of shared tiles and the per-frame loop that scrolls them.

pub mod instance;
pub mod loop_placer;
pub mod settings;

pub use instance::TerrainInstance;
pub use loop_placer::{FrameTime, LoopLayout, LoopPlacer, LoopState, periodic_position};
pub use settings::{ScrollSettings, SettingsSender, SettingsWatcher, settings_channel};
