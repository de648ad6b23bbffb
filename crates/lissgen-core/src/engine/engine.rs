//! Synth engine: the audio producer
//!
//! Owned by the audio callback. Per buffer it drains pending commands, then
//! for every frame mixes both channels, writes the scaled stereo frame and
//! records every second frame into the shared trace.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

use crate::synth::ChannelBank;
use crate::trace::TraceBuffer;
use crate::types::{Channel, StereoBuffer, StereoSample, TracePoint, OUTPUT_HEADROOM};

use super::command::SynthCommand;

/// Largest buffer processed in one call; the backend splits larger requests
pub const MAX_BUFFER_SIZE: usize = 8192;

/// Lock-free engine state for the UI thread
pub struct SynthAtomics {
    /// Frames produced while playing
    pub frames: AtomicU64,
    /// Buffers processed (playing or not)
    pub buffers: AtomicU64,
    /// Producing sound (Play received, no Stop since)
    pub running: AtomicBool,
    /// Device output zeroed
    pub audio_muted: AtomicBool,
    pub left_rows: AtomicU32,
    pub right_rows: AtomicU32,
}

impl SynthAtomics {
    pub fn new() -> Self {
        Self {
            frames: AtomicU64::new(0),
            buffers: AtomicU64::new(0),
            running: AtomicBool::new(false),
            audio_muted: AtomicBool::new(false),
            left_rows: AtomicU32::new(0),
            right_rows: AtomicU32::new(0),
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn is_audio_muted(&self) -> bool {
        self.audio_muted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn buffers(&self) -> u64 {
        self.buffers.load(Ordering::Relaxed)
    }

    /// Rows the engine is currently mixing for `channel`
    #[inline]
    pub fn row_count(&self, channel: Channel) -> u32 {
        match channel {
            Channel::Left => self.left_rows.load(Ordering::Relaxed),
            Channel::Right => self.right_rows.load(Ordering::Relaxed),
        }
    }
}

impl Default for SynthAtomics {
    fn default() -> Self {
        Self::new()
    }
}

pub struct SynthEngine {
    sample_rate: f64,
    left: ChannelBank,
    right: ChannelBank,
    running: bool,
    audio_muted: bool,
    trace: Arc<TraceBuffer>,
    /// Points of the current buffer, flushed to `trace` under one lock
    trace_scratch: Vec<TracePoint>,
    atomics: Arc<SynthAtomics>,
}

impl SynthEngine {
    /// Engine with empty channels, stopped
    pub fn new(sample_rate: u32, trace: Arc<TraceBuffer>) -> Self {
        Self {
            sample_rate: sample_rate as f64,
            left: ChannelBank::new(),
            right: ChannelBank::new(),
            running: false,
            audio_muted: false,
            trace,
            trace_scratch: Vec::with_capacity(MAX_BUFFER_SIZE / 2 + 1),
            atomics: Arc::new(SynthAtomics::new()),
        }
    }

    pub fn atomics(&self) -> Arc<SynthAtomics> {
        Arc::clone(&self.atomics)
    }

    pub fn trace(&self) -> Arc<TraceBuffer> {
        Arc::clone(&self.trace)
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn bank(&self, channel: Channel) -> &ChannelBank {
        match channel {
            Channel::Left => &self.left,
            Channel::Right => &self.right,
        }
    }

    /// Drain every pending command (call once per buffer, before `process`)
    pub fn process_commands(&mut self, rx: &mut rtrb::Consumer<SynthCommand>) {
        while let Ok(cmd) = rx.pop() {
            self.handle_command(cmd);
        }
    }

    pub fn handle_command(&mut self, cmd: SynthCommand) {
        match cmd {
            SynthCommand::LoadWave(snapshot) => {
                ChannelBank::adopt_pair(
                    &mut self.left,
                    &mut self.right,
                    &snapshot.left,
                    &snapshot.right,
                );
                self.atomics
                    .left_rows
                    .store(self.left.len() as u32, Ordering::Relaxed);
                self.atomics
                    .right_rows
                    .store(self.right.len() as u32, Ordering::Relaxed);
                // `snapshot` dropped here: queued for the collector thread
            }
            SynthCommand::Play => {
                self.left.reset_phases();
                self.right.reset_phases();
                self.running = true;
                self.atomics.running.store(true, Ordering::Relaxed);
            }
            SynthCommand::Stop => {
                self.running = false;
                self.atomics.running.store(false, Ordering::Relaxed);
            }
            SynthCommand::SetAudioMuted(muted) => {
                self.audio_muted = muted;
                self.atomics.audio_muted.store(muted, Ordering::Relaxed);
            }
        }
    }

    /// Fill `out` with the next `out.len()` frames
    ///
    /// `out.len()` must not exceed [`MAX_BUFFER_SIZE`]. Does not allocate;
    /// the only lock taken is one trace push per call.
    pub fn process(&mut self, out: &mut StereoBuffer) {
        self.atomics.buffers.fetch_add(1, Ordering::Relaxed);

        if !self.running {
            out.as_mut_slice().fill(StereoSample::silence());
            return;
        }

        let sample_rate = self.sample_rate;
        self.trace_scratch.clear();

        for (i, frame) in out.as_mut_slice().iter_mut().enumerate() {
            let left = self.left.mix(sample_rate);
            let right = self.right.mix(sample_rate);

            *frame = if self.audio_muted {
                StereoSample::silence()
            } else {
                StereoSample::new(left, right) * OUTPUT_HEADROOM
            };

            if i % 2 == 0 {
                self.trace_scratch.push(TracePoint::new(left, right));
            }
        }

        self.trace.push_slice(&self.trace_scratch);
        self.atomics
            .frames
            .fetch_add(out.len() as u64, Ordering::Relaxed);
    }
}
