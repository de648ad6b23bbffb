//! Audio backend configuration
//!
//! Device selection, sample rate and buffer size for the synth output
//! stream. Serialized as part of the player configuration.

use serde::{Deserialize, Serialize};

use crate::types::{DEFAULT_BUFFER_FRAMES, SAMPLE_RATE};

pub use crate::engine::MAX_BUFFER_SIZE;

/// Smallest fixed buffer requested from the device (frames)
pub const MIN_BUFFER_SIZE: u32 = 64;

/// Preferred buffer size for the output stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BufferSize {
    /// Let the system choose the default buffer size
    Default,
    /// Request a specific buffer size in frames (may be adjusted by the system)
    Fixed(u32),
}

impl Default for BufferSize {
    fn default() -> Self {
        Self::Fixed(DEFAULT_BUFFER_FRAMES)
    }
}

impl BufferSize {
    /// Get the buffer size in frames, or None for system default
    pub fn as_frames(&self) -> Option<u32> {
        match self {
            BufferSize::Default => None,
            BufferSize::Fixed(frames) => Some(*frames),
        }
    }

    /// Calculate latency in milliseconds for a given sample rate
    pub fn latency_ms(&self, sample_rate: u32) -> Option<f32> {
        self.as_frames()
            .map(|frames| (frames as f32 / sample_rate as f32) * 1000.0)
    }
}

/// Audio device identifier
///
/// Includes both the device name and the host backend (ALSA, CoreAudio,
/// WASAPI...), so a device can be picked from a non-default host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceId {
    /// Device name as reported by the system
    pub name: String,
    /// Audio host identifier; None = default host
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

impl DeviceId {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            host: None,
        }
    }

    pub fn with_host(name: &str, host: &str) -> Self {
        Self {
            name: name.to_string(),
            host: Some(host.to_string()),
        }
    }

    /// Display label including the host if known
    pub fn display_label(&self) -> String {
        match &self.host {
            Some(host) => format!("[{}] {}", host, self.name),
            None => self.name.clone(),
        }
    }
}

/// Configuration for the synth output stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Output device (None = system default)
    pub device: Option<DeviceId>,
    /// Requested sample rate; the device default is used if unsupported
    pub sample_rate: u32,
    /// Preferred buffer size
    pub buffer_size: BufferSize,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            device: None,
            sample_rate: SAMPLE_RATE,
            buffer_size: BufferSize::default(),
        }
    }
}

impl AudioConfig {
    pub fn with_device(mut self, device: DeviceId) -> Self {
        self.device = Some(device);
        self
    }

    pub fn with_buffer_frames(mut self, frames: u32) -> Self {
        self.buffer_size = BufferSize::Fixed(frames);
        self
    }

    pub fn with_sample_rate(mut self, rate: u32) -> Self {
        self.sample_rate = rate;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AudioConfig::default();
        assert_eq!(config.sample_rate, 44100);
        assert_eq!(config.buffer_size, BufferSize::Fixed(4096));
        assert!(config.device.is_none());
    }

    #[test]
    fn test_latency() {
        let latency = BufferSize::Fixed(441).latency_ms(44100).unwrap();
        assert!((latency - 10.0).abs() < 1e-4);
        assert!(BufferSize::Default.latency_ms(44100).is_none());
    }

    #[test]
    fn test_device_label() {
        assert_eq!(DeviceId::new("Speakers").display_label(), "Speakers");
        assert_eq!(
            DeviceId::with_host("Speakers", "ALSA").display_label(),
            "[ALSA] Speakers"
        );
    }

    #[test]
    fn test_yaml_roundtrip_with_missing_fields() {
        let config: AudioConfig = serde_yaml::from_str("sample_rate: 48000\n").unwrap();
        assert_eq!(config.sample_rate, 48000);
        assert_eq!(config.buffer_size, BufferSize::Fixed(4096));

        let config = AudioConfig::default()
            .with_device(DeviceId::new("Out"))
            .with_buffer_frames(512);
        let yaml = serde_yaml::to_string(&config).unwrap();
        let back: AudioConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, config);
    }
}
