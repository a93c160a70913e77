//! Terrain Scene
//!
//! Everything the strip needs between frames, in one struct: the generated
//! tiles, their instances, and the loop placer. Built once after the raster
//! has loaded, then updated by reference once per frame.

use std::sync::Arc;

use glam::Vec3;

use crate::config::TerrainConfig;
use crate::error::{ConfigError, TerrainError};
use crate::placement::{FrameTime, LoopLayout, LoopPlacer, ScrollSettings, TerrainInstance};
use crate::raster::Raster;
use crate::terrain::{GridSpec, HeightGrid, HeightSampler, SeamStitcher, Tile, TileMetrics, TileTessellator};

pub struct TerrainScene {
    config: TerrainConfig,
    metrics: TileMetrics,
    tiles: Vec<Arc<Tile>>,
    instances: Vec<TerrainInstance>,
    placer: LoopPlacer,
    /// Instance position when its placer z is 0. `anchor.z` is the offset
    /// from the span start (far edge) to the tile origin.
    anchor: Vec3,
}

impl TerrainScene {
    /// Rhombus corridor: one wrap-corrected tile shared by every instance.
    pub fn build(config: &TerrainConfig, raster: &Raster) -> Result<Self, TerrainError> {
        let tessellator = TileTessellator::from_config(config, raster)?;
        let metrics = *tessellator.metrics();
        let tile = Arc::new(tessellator.build(config.tessellation_mode));
        let layout = LoopLayout::for_rhombus_tiles(config, &metrics)?;

        log::info!(
            "[Terrain] built {}x{} rhombus tile ({} vertices), {} instances, step {:.3}",
            metrics.grid_width,
            metrics.grid_height,
            tile.vertex_count(),
            layout.instance_count,
            layout.step
        );

        // Rhombus tiles start at local x = 0, so shift them back by half a strip
        let anchor = Vec3::new(metrics.lateral_offset(), config.vertical_offset, 0.0);
        Ok(Self::assemble(config, metrics, vec![tile], layout, anchor))
    }

    /// Rectangular-grid corridor: tiles A and B alternate, their edge rows
    /// stitched so every A|B and B|A boundary matches.
    pub fn build_grid_pair(config: &TerrainConfig, raster: &Raster) -> Result<Self, TerrainError> {
        config.validate()?;
        if config.instance_count % 2 != 0 {
            return Err(ConfigError::OddPairCount(config.instance_count).into());
        }
        let metrics = TileMetrics::from_config(config)?;
        let spec = GridSpec::new(
            metrics.max_width,
            metrics.max_height,
            config.grid_width,
            config.grid_height,
        )?;
        let sampler = HeightSampler::new(raster, config.displacement_scale, config.v_convention);

        let mut a = HeightGrid::sample(spec, &sampler, false);
        let mut b = HeightGrid::sample(spec, &sampler, config.mirror_alternate);
        SeamStitcher::new(config.seam_blend).stitch(&mut a, &mut b)?;
        if config.shear != 0.0 {
            a.apply_shear(config.shear);
            b.apply_shear(config.shear);
        }

        // Grid rows coincide at the boundary, so there is no overhang. The
        // period spans an A/B pair so recycling never puts two A's together.
        let step = spec.depth;
        let layout = LoopLayout::new(
            config.instance_count,
            step,
            spec.depth / 2.0,
            config.repeat_length.unwrap_or(2.0 * step),
        )?;

        log::info!(
            "[Terrain] built {}x{} grid pair ({:?} seams), {} instances",
            spec.segments_x,
            spec.segments_y,
            config.seam_blend,
            layout.instance_count
        );

        let tiles = vec![Arc::new(a.to_tile()), Arc::new(b.to_tile())];
        // Grid tiles are centred on their origin in both x and y
        let anchor = Vec3::new(0.0, config.vertical_offset, spec.depth / 2.0);
        Ok(Self::assemble(config, metrics, tiles, layout, anchor))
    }

    fn assemble(
        config: &TerrainConfig,
        metrics: TileMetrics,
        tiles: Vec<Arc<Tile>>,
        layout: LoopLayout,
        anchor: Vec3,
    ) -> Self {
        let placer = LoopPlacer::new(config.recycle_policy, layout);
        let instances = placer
            .states()
            .iter()
            .enumerate()
            .map(|(i, state)| {
                let tile = Arc::clone(&tiles[i % tiles.len()]);
                TerrainInstance::lying_flat(tile, anchor + Vec3::Z * state.z)
            })
            .collect();

        Self {
            config: config.clone(),
            metrics,
            tiles,
            instances,
            placer,
            anchor,
        }
    }

    /// Per-frame placement. Never blocks.
    pub fn update(&mut self, frame: FrameTime, settings: &ScrollSettings) {
        self.placer.update(frame, settings);
        for (instance, state) in self.instances.iter_mut().zip(self.placer.states()) {
            instance.position.z = state.z + self.anchor.z;
        }
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    pub fn metrics(&self) -> &TileMetrics {
        &self.metrics
    }

    pub fn tiles(&self) -> &[Arc<Tile>] {
        &self.tiles
    }

    pub fn instances(&self) -> &[TerrainInstance] {
        &self.instances
    }

    pub fn placer(&self) -> &LoopPlacer {
        &self.placer
    }
}
