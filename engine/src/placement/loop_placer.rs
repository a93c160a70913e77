//! Loop Placer
//!
//! Keeps a fixed pool of tile instances scrolling towards the camera along
//! world Z. Instance `i` starts at `-base_offset - i * step`; once the front
//! instance has moved one full step, it is recycled to the far end. Because
//! every instance shows the same (seam-matched) tile, the recycle is
//! invisible.
//!
//! Each instance's visible span is `[z, z + step)`: the remaining `radius` of
//! tile depth is the rhombus overhang, hidden under the next instance's
//! bottom strip.

use crate::config::{RecyclePolicy, TerrainConfig};
use crate::error::ConfigError;
use crate::terrain::TileMetrics;

use super::settings::ScrollSettings;

/// Timing of one animation frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameTime {
    /// Seconds since the previous frame
    pub interval: f32,
    /// Seconds since the animation started
    pub elapsed: f64,
}

impl FrameTime {
    pub fn new(interval: f32, elapsed: f64) -> Self {
        Self { interval, elapsed }
    }
}

/// Geometry of the corridor along the scroll axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoopLayout {
    pub instance_count: u32,
    /// Distance between consecutive instances
    pub step: f32,
    /// Z of instance 0 at time 0, negated
    pub base_offset: f32,
    /// Period of the modulo policy
    pub repeat_length: f32,
}

impl LoopLayout {
    pub fn new(
        instance_count: u32,
        step: f32,
        base_offset: f32,
        repeat_length: f32,
    ) -> Result<Self, ConfigError> {
        if instance_count == 0 {
            return Err(ConfigError::ZeroCount { field: "instance_count" });
        }
        for (field, value) in [("step", step), ("repeat_length", repeat_length)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }
        if !base_offset.is_finite() {
            return Err(ConfigError::OutOfRange { field: "base_offset", value: base_offset });
        }
        Ok(Self {
            instance_count,
            step,
            base_offset,
            repeat_length,
        })
    }

    /// Rhombus-tile corridor: step is the tile depth minus the overhang.
    pub fn for_rhombus_tiles(config: &TerrainConfig, metrics: &TileMetrics) -> Result<Self, ConfigError> {
        let step = metrics.effective_step();
        Self::new(
            config.instance_count,
            step,
            metrics.base_offset(),
            config.repeat_length.unwrap_or(step),
        )
    }

    /// Z of instance `i` before any scrolling.
    pub fn rest_position(&self, i: u32) -> f32 {
        -self.base_offset - i as f32 * self.step
    }

    /// Z at which the incremental policy recycles an instance.
    pub fn reset_threshold(&self) -> f32 {
        -self.base_offset + self.step
    }

    /// Distance an instance jumps back when recycled.
    pub fn loop_span(&self) -> f32 {
        self.instance_count as f32 * self.step
    }
}

/// Per-instance scroll state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoopState {
    pub z: f32,
}

pub struct LoopPlacer {
    policy: RecyclePolicy,
    layout: LoopLayout,
    states: Vec<LoopState>,
}

impl LoopPlacer {
    pub fn new(policy: RecyclePolicy, layout: LoopLayout) -> Self {
        let states = (0..layout.instance_count)
            .map(|i| LoopState { z: layout.rest_position(i) })
            .collect();
        Self {
            policy,
            layout,
            states,
        }
    }

    pub fn policy(&self) -> RecyclePolicy {
        self.policy
    }

    pub fn layout(&self) -> &LoopLayout {
        &self.layout
    }

    pub fn states(&self) -> &[LoopState] {
        &self.states
    }

    /// Z of every instance, in instance order.
    pub fn positions(&self) -> Vec<f32> {
        self.states.iter().map(|s| s.z).collect()
    }

    /// Advance one frame. Must run exactly once per frame tick.
    pub fn update(&mut self, frame: FrameTime, settings: &ScrollSettings) {
        match self.policy {
            RecyclePolicy::PeriodicModulo => {
                for (i, state) in self.states.iter_mut().enumerate() {
                    state.z = periodic_position(&self.layout, i as u32, frame.elapsed, settings.speed);
                }
            }
            RecyclePolicy::IncrementalReset => {
                let advance = frame.interval * settings.speed;
                let threshold = self.layout.reset_threshold();
                let span = self.layout.loop_span();
                for state in &mut self.states {
                    state.z += advance;
                    // A single subtraction unless a frame skips more than a whole loop
                    while state.z >= threshold {
                        state.z -= span;
                    }
                }
            }
        }
    }

    /// Visible `[start, end)` span of every instance, sorted far to near.
    pub fn visible_spans(&self) -> Vec<(f32, f32)> {
        let mut spans: Vec<(f32, f32)> = self
            .states
            .iter()
            .map(|s| (s.z, s.z + self.layout.step))
            .collect();
        spans.sort_by(|a, b| a.0.total_cmp(&b.0));
        spans
    }
}

/// `((elapsed * speed) mod repeat_length) - base_offset - i * step`.
///
/// Stateless, so it can resume from any elapsed time. Computed in f64 so long
/// sessions do not lose the fractional part of the scroll.
pub fn periodic_position(layout: &LoopLayout, i: u32, elapsed: f64, speed: f32) -> f32 {
    let scroll = (elapsed * speed as f64).rem_euclid(layout.repeat_length as f64);
    (scroll - layout.base_offset as f64 - i as f64 * layout.step as f64) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> LoopLayout {
        LoopLayout::new(3, 2.0, 1.0, 2.0).unwrap()
    }

    #[test]
    fn test_rest_positions() {
        let placer = LoopPlacer::new(RecyclePolicy::IncrementalReset, layout());
        assert_eq!(placer.positions(), vec![-1.0, -3.0, -5.0]);
    }

    #[test]
    fn test_incremental_recycles_front_instance() {
        let mut placer = LoopPlacer::new(RecyclePolicy::IncrementalReset, layout());
        let speed = ScrollSettings { speed: 1.0 };
        // threshold = 1.0: instance 0 moves from -1.0 to 1.5, wraps by 6
        placer.update(FrameTime::new(2.5, 2.5), &speed);
        assert_eq!(placer.positions(), vec![-4.5, -0.5, -2.5]);
    }

    #[test]
    fn test_periodic_matches_formula() {
        let mut placer = LoopPlacer::new(RecyclePolicy::PeriodicModulo, layout());
        placer.update(FrameTime::new(0.0, 2.5), &ScrollSettings { speed: 1.0 });
        // 2.5 mod 2.0 = 0.5
        assert_eq!(placer.positions(), vec![-0.5, -2.5, -4.5]);
    }

    #[test]
    fn test_zero_step_rejected() {
        assert!(LoopLayout::new(3, 0.0, 1.0, 1.0).is_err());
    }
}
