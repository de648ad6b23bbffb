//! Audio output for the synthesizer
//!
//! The audio system is a single cpal output stream whose callback owns the
//! [`SynthEngine`](crate::engine::SynthEngine):
//!
//! - **UI Thread**: sends [`SynthCommand`](crate::engine::SynthCommand)s
//!   through a lock-free ringbuffer
//! - **Audio Thread**: drains commands between buffers, renders, feeds the
//!   trace buffer
//! - **Atomics**: UI reads engine state via relaxed atomics (no locks)
//!
//! ```ignore
//! use lissgen_core::audio::{start_audio_system, AudioConfig};
//! use lissgen_core::engine::SynthCommand;
//!
//! let mut audio = start_audio_system(&AudioConfig::default())?;
//! audio.command_sender.send(SynthCommand::load_wave(wave.snapshot()))?;
//! audio.command_sender.send(SynthCommand::Play)?;
//! let points = audio.trace.snapshot();
//! ```

mod config;
mod cpal_backend;
mod device;
mod error;

pub use config::{AudioConfig, BufferSize, DeviceId, MAX_BUFFER_SIZE, MIN_BUFFER_SIZE};
pub use cpal_backend::{start_audio_system, AudioHandle, AudioSystemResult};
pub use device::{available_output_devices, default_device, find_device, list_output_devices, OutputDevice};
pub use error::{AudioError, AudioResult};
