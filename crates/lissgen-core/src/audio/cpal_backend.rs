//! CPAL output stream
//!
//! ```text
//! ┌──────────────────┐  SynthCommand   ┌─────────────────────┐
//! │     UI Thread    │───push()───────►│   Command Queue     │
//! │   (frame loop)   │                 │  (lock-free SPSC)   │
//! └──────────────────┘                 └──────────┬──────────┘
//!    ▲          ▲                                 │ pop()
//!    │ atomics  │ snapshot()                      ▼
//! ┌──┴───────┐ ┌┴─────────────┐  push_slice ┌─────────────────────┐
//! │ Synth-   │ │ TraceBuffer  │◄────────────│  CPAL Audio Thread  │
//! │ Atomics  │ │ (mutex FIFO) │             │  (owns SynthEngine) │
//! └──────────┘ └──────────────┘             └─────────────────────┘
//! ```
//!
//! The stream runs from start-up until the [`AudioHandle`] is dropped.
//! Play and Stop are engine commands, so the device is never paused.

use std::sync::Arc;

use cpal::traits::{DeviceTrait, StreamTrait};
use cpal::{SampleFormat, Stream, StreamConfig};

use super::config::{AudioConfig, BufferSize, MIN_BUFFER_SIZE};
use super::device::{default_device, find_device};
use super::error::{AudioError, AudioResult};
use crate::engine::{
    command_channel, CommandSender, SynthAtomics, SynthCommand, SynthEngine, MAX_BUFFER_SIZE,
};
use crate::trace::TraceBuffer;
use crate::types::StereoBuffer;

/// Keeps the output stream alive; drop to close it
pub struct AudioHandle {
    _stream: Stream,
    device_name: String,
    sample_rate: u32,
    buffer_size: u32,
}

impl AudioHandle {
    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Buffer size in frames as requested from the device
    pub fn buffer_size(&self) -> u32 {
        self.buffer_size
    }

    /// One-way output latency in milliseconds
    pub fn latency_ms(&self) -> f32 {
        (self.buffer_size as f32 / self.sample_rate as f32) * 1000.0
    }
}

/// Everything the UI needs from a started audio system
pub struct AudioSystemResult {
    /// Stream owner; keep alive for as long as audio should play
    pub handle: AudioHandle,
    /// Lock-free command queue into the engine
    pub command_sender: CommandSender,
    /// Lock-free engine state
    pub atomics: Arc<SynthAtomics>,
    /// Trace written by the engine, read by the renderer
    pub trace: Arc<TraceBuffer>,
    pub sample_rate: u32,
    pub buffer_size: u32,
    pub latency_ms: f32,
}

/// Open the configured device and start the synth stream
///
/// The engine starts stopped with empty channels; send a
/// [`SynthCommand::LoadWave`] and [`SynthCommand::Play`] to hear anything.
pub fn start_audio_system(config: &AudioConfig) -> AudioResult<AudioSystemResult> {
    let device = match &config.device {
        Some(id) => find_device(id)?,
        None => default_device()?,
    };
    let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());
    log::info!("Using audio device: {}", device_name);

    let (supported, buffer_size) = select_output_config(&device, config)?;
    let sample_rate = supported.sample_rate().0;
    let stream_config = StreamConfig {
        channels: supported.channels(),
        sample_rate: supported.sample_rate(),
        buffer_size: match buffer_size {
            Some(frames) => cpal::BufferSize::Fixed(frames),
            None => cpal::BufferSize::Default,
        },
    };

    // Device default buffer size is unknown until the first callback
    let buffer_frames = buffer_size.unwrap_or(crate::types::DEFAULT_BUFFER_FRAMES);
    let latency_ms = (buffer_frames as f32 / sample_rate as f32) * 1000.0;
    log::info!(
        "Audio config: {} channels, {}Hz, {} frames (~{:.1}ms latency)",
        stream_config.channels,
        sample_rate,
        buffer_frames,
        latency_ms
    );

    let trace = Arc::new(TraceBuffer::new());
    let engine = SynthEngine::new(sample_rate, Arc::clone(&trace));
    let atomics = engine.atomics();
    let (command_tx, command_rx) = command_channel();

    let state = CallbackState {
        engine,
        command_rx,
        buffer: StereoBuffer::silence(MAX_BUFFER_SIZE),
    };
    let stream = build_output_stream(&device, &stream_config, state)?;
    stream
        .play()
        .map_err(|e| AudioError::StreamPlay(e.to_string()))?;

    Ok(AudioSystemResult {
        handle: AudioHandle {
            _stream: stream,
            device_name,
            sample_rate,
            buffer_size: buffer_frames,
        },
        command_sender: CommandSender::new(command_tx),
        atomics,
        trace,
        sample_rate,
        buffer_size: buffer_frames,
        latency_ms,
    })
}

/// Audio thread state, moved into the stream callback
struct CallbackState {
    engine: SynthEngine,
    command_rx: rtrb::Consumer<SynthCommand>,
    /// Pre-allocated with MAX_BUFFER_SIZE frames
    buffer: StereoBuffer,
}

impl CallbackState {
    /// Fill an interleaved device buffer with `channels` channels
    ///
    /// Larger requests than the pre-allocated buffer are rendered in chunks.
    /// Channels beyond the first two are silent.
    fn fill(&mut self, data: &mut [f32], channels: usize) {
        self.engine.process_commands(&mut self.command_rx);

        for chunk in data.chunks_mut(MAX_BUFFER_SIZE * channels) {
            let n_frames = chunk.len() / channels;
            self.buffer.set_len_from_capacity(n_frames);
            self.engine.process(&mut self.buffer);

            if channels == 2 {
                chunk.copy_from_slice(self.buffer.as_interleaved());
                continue;
            }
            for (frame, sample) in chunk.chunks_mut(channels).zip(self.buffer.as_slice()) {
                frame[0] = sample.left;
                frame[1] = sample.right;
                for ch in frame.iter_mut().skip(2) {
                    *ch = 0.0;
                }
            }
        }
    }
}

fn build_output_stream(
    device: &cpal::Device,
    config: &StreamConfig,
    mut state: CallbackState,
) -> AudioResult<Stream> {
    let channels = config.channels as usize;

    device
        .build_output_stream(
            config,
            move |data: &mut [f32], _info: &cpal::OutputCallbackInfo| {
                state.fill(data, channels);
            },
            move |err| {
                log::error!("Audio stream error: {}", err);
            },
            None,
        )
        .map_err(|e| AudioError::StreamBuild(e.to_string()))
}

/// Pick an f32 stereo-or-wider config, preferring the requested sample rate
///
/// Returns the config and the fixed buffer size to request (None = device
/// default).
fn select_output_config(
    device: &cpal::Device,
    config: &AudioConfig,
) -> AudioResult<(cpal::SupportedStreamConfig, Option<u32>)> {
    let candidates: Vec<_> = device
        .supported_output_configs()
        .map_err(|e| AudioError::DeviceConfig(e.to_string()))?
        .filter(|c| c.channels() >= 2)
        .collect();

    if candidates.is_empty() {
        return Err(AudioError::DeviceConfig(
            "No stereo output configuration".to_string(),
        ));
    }

    let target = config.sample_rate;
    let supports_target = |c: &cpal::SupportedStreamConfigRange| {
        (c.min_sample_rate().0..=c.max_sample_rate().0).contains(&target)
    };

    let f32_configs: Vec<&cpal::SupportedStreamConfigRange> = candidates
        .iter()
        .filter(|c| c.sample_format() == SampleFormat::F32)
        .collect();
    let Some(best) = f32_configs
        .iter()
        .copied()
        .find(|c| supports_target(*c))
        .or_else(|| f32_configs.first().copied())
    else {
        return Err(AudioError::UnsupportedFormat(format!(
            "{:?}",
            candidates[0].sample_format()
        )));
    };

    let sample_rate = if supports_target(best) {
        cpal::SampleRate(target)
    } else {
        let fallback = best.max_sample_rate();
        log::warn!(
            "Audio device doesn't support {}Hz, falling back to {}Hz",
            target,
            fallback.0
        );
        fallback
    };

    let buffer_size = match config.buffer_size {
        BufferSize::Default => None,
        BufferSize::Fixed(frames) => Some(frames.clamp(MIN_BUFFER_SIZE, MAX_BUFFER_SIZE as u32)),
    };

    Ok((best.clone().with_sample_rate(sample_rate), buffer_size))
}
