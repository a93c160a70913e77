//! Live Scroll Settings
//!
//! Per-frame parameters that a UI may change while the strip animates. The
//! frame loop owns a [`ScrollSettings`] snapshot and folds in published
//! changes once per frame; nothing reads global mutable state.

use std::sync::mpsc::{self, Receiver, Sender};

use crate::config::{TerrainConfig, check_non_negative};
use crate::error::ConfigError;

/// Snapshot handed to every placement update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollSettings {
    /// Scroll speed in tile units per second
    pub speed: f32,
}

impl ScrollSettings {
    pub fn new(speed: f32) -> Result<Self, ConfigError> {
        check_non_negative("scroll_speed", speed)?;
        Ok(Self { speed })
    }

    pub fn from_config(config: &TerrainConfig) -> Self {
        Self {
            speed: config.scroll_speed,
        }
    }
}

/// Publishing half of the settings channel. Cloneable, one per UI control.
#[derive(Clone, Debug)]
pub struct SettingsSender {
    tx: Sender<ScrollSettings>,
}

impl SettingsSender {
    /// Publish a new snapshot. Invalid values are rejected here so the frame
    /// loop never sees them. Returns `false` if the watcher is gone.
    pub fn publish(&self, settings: ScrollSettings) -> Result<bool, ConfigError> {
        check_non_negative("scroll_speed", settings.speed)?;
        if self.tx.send(settings).is_err() {
            log::warn!("[Settings] watcher dropped, change to {settings:?} ignored");
            return Ok(false);
        }
        Ok(true)
    }
}

/// Receiving half, polled by the frame loop.
#[derive(Debug)]
pub struct SettingsWatcher {
    rx: Receiver<ScrollSettings>,
}

impl SettingsWatcher {
    /// Apply the most recent pending snapshot to `current`, discarding older
    /// ones. Never blocks. Returns whether anything changed.
    pub fn latest(&self, current: &mut ScrollSettings) -> bool {
        match self.rx.try_iter().last() {
            Some(next) if next != *current => {
                log::debug!("[Settings] scroll speed {} -> {}", current.speed, next.speed);
                *current = next;
                true
            }
            _ => false,
        }
    }
}

pub fn settings_channel() -> (SettingsSender, SettingsWatcher) {
    let (tx, rx) = mpsc::channel();
    (SettingsSender { tx }, SettingsWatcher { rx })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_takes_last_published() {
        let (tx, watcher) = settings_channel();
        let mut current = ScrollSettings::new(4.0).unwrap();

        assert!(!watcher.latest(&mut current));

        tx.publish(ScrollSettings { speed: 2.0 }).unwrap();
        tx.publish(ScrollSettings { speed: 7.5 }).unwrap();
        assert!(watcher.latest(&mut current));
        assert_eq!(current.speed, 7.5);
    }

    #[test]
    fn test_publish_rejects_nan() {
        let (tx, _watcher) = settings_channel();
        assert!(tx.publish(ScrollSettings { speed: f32::NAN }).is_err());
    }

    #[test]
    fn test_publish_after_watcher_dropped() {
        let (tx, watcher) = settings_channel();
        drop(watcher);
        assert!(!tx.publish(ScrollSettings { speed: 1.0 }).unwrap());
    }
}
