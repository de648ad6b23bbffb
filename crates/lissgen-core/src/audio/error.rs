//! Output stream errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("No stereo output device available")]
    NoDevices,

    #[error("No default output device")]
    NoDefaultDevice,

    #[error("Output device '{0}' not found")]
    DeviceNotFound(String),

    /// Querying supported configurations failed
    #[error("Could not query output configuration: {0}")]
    DeviceConfig(String),

    #[error("Could not open output stream: {0}")]
    StreamBuild(String),

    #[error("Could not start output stream: {0}")]
    StreamPlay(String),

    /// The device offers no f32 configuration with two or more channels
    #[error("No usable output format: {0}")]
    UnsupportedFormat(String),
}

pub type AudioResult<T> = Result<T, AudioError>;
