//! Player configuration
//!
//! Stored as YAML in the user's config directory.
//! Default location: ~/.config/lissgen/config.yaml

use std::path::PathBuf;

use lissgen_core::audio::AudioConfig;
use lissgen_core::config::default_library_path;
use lissgen_core::render::{clamp_target_fps, RenderSettings, DEFAULT_TARGET_FPS};
use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Output device, sample rate, buffer size
    pub audio: AudioConfig,
    /// Scope settings
    pub display: DisplayConfig,
    /// Folder for `.lsj` and `.lsjp` files
    /// Default: ~/Music/lissgen
    pub library_path: PathBuf,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            audio: AudioConfig::default(),
            display: DisplayConfig::default(),
            library_path: default_library_path(),
        }
    }
}

/// Display configuration section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Scope redraw rate, 60..=480
    pub target_fps: u32,
    /// Share of the trace drawn, 1..=100
    pub trail_percent: u8,
    /// Draw start/end markers
    pub show_endpoints: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            target_fps: DEFAULT_TARGET_FPS,
            trail_percent: 100,
            show_endpoints: true,
        }
    }
}

impl DisplayConfig {
    /// Render settings with out-of-range values clamped
    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings::new(self.trail_percent, self.show_endpoints)
    }

    pub fn clamped_target_fps(&self) -> u32 {
        clamp_target_fps(self.target_fps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lissgen_core::config::{load_config, save_config};
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = PlayerConfig::default();
        assert_eq!(config.display.target_fps, 240);
        assert_eq!(config.display.trail_percent, 100);
        assert!(config.display.show_endpoints);
        assert!(config.library_path.ends_with("lissgen"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "display:\n  trail_percent: 40\n";
        let config: PlayerConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.display.trail_percent, 40);
        assert_eq!(config.display.target_fps, DEFAULT_TARGET_FPS);
        assert_eq!(config.audio, AudioConfig::default());
    }

    #[test]
    fn test_out_of_range_values_clamped_on_use() {
        let display = DisplayConfig {
            target_fps: 1000,
            trail_percent: 0,
            show_endpoints: false,
        };
        assert_eq!(display.clamped_target_fps(), 480);
        assert_eq!(display.render_settings().trail_percent, 1);
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let config = PlayerConfig {
            audio: AudioConfig::default().with_buffer_frames(512),
            display: DisplayConfig {
                target_fps: 120,
                trail_percent: 25,
                show_endpoints: false,
            },
            library_path: PathBuf::from("/tmp/lissgen-test"),
        };
        save_config(&config, &path).unwrap();
        let loaded: PlayerConfig = load_config(&path);
        assert_eq!(loaded, config);
    }
}
