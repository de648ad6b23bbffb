//! Common types for LissGen
//!
//! This module contains the fundamental audio types shared by the synth
//! engine, the trace buffer and the renderer: stereo frames, trace points
//! and the two channel identifiers.

use std::ops::{Index, IndexMut};

/// Default sample rate of the synthesizer (44.1kHz)
pub const SAMPLE_RATE: u32 = 44100;

/// Default number of frames per audio callback
pub const DEFAULT_BUFFER_FRAMES: u32 = 4096;

/// Number of (L, R) points kept in the shared trace history
pub const TRACE_CAPACITY: usize = 4096;

/// Headroom applied to the device output so that many oscillators summing
/// constructively do not clip. The trace keeps the unscaled mix.
pub const OUTPUT_HEADROOM: Sample = 0.3;

/// Audio sample type (32-bit float, matches the device stream format)
pub type Sample = f32;

/// Output channel of the synthesizer
///
/// Left drives the X axis of the Lissajous curve, Right drives the Y axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Left,
    Right,
}

impl Channel {
    /// Both channels in display/serialization order
    pub const ALL: [Channel; 2] = [Channel::Left, Channel::Right];

    /// Single-letter tag used by the text formats (`L` / `R`)
    pub fn tag(&self) -> char {
        match self {
            Channel::Left => 'L',
            Channel::Right => 'R',
        }
    }

    /// Display name including the axis it drives
    pub fn name(&self) -> &'static str {
        match self {
            Channel::Left => "Left Channel (X)",
            Channel::Right => "Right Channel (Y)",
        }
    }

    /// The other channel
    pub fn opposite(&self) -> Self {
        match self {
            Channel::Left => Channel::Right,
            Channel::Right => Channel::Left,
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// One output frame, laid out as `[left, right]`
///
/// `#[repr(C)]` + `Pod` let a `&[StereoSample]` be viewed as interleaved
/// `&[f32]`, which is what the device callback wants.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct StereoSample {
    pub left: Sample,
    pub right: Sample,
}

impl StereoSample {
    #[inline]
    pub fn new(left: Sample, right: Sample) -> Self {
        Self { left, right }
    }

    #[inline]
    pub fn silence() -> Self {
        Self::default()
    }
}

impl std::ops::Mul<Sample> for StereoSample {
    type Output = Self;

    #[inline]
    fn mul(self, gain: Sample) -> Self {
        Self::new(self.left * gain, self.right * gain)
    }
}

/// One point of the Lissajous trace
///
/// Raw mixer output for the left and right channel of a single frame,
/// before headroom scaling. The renderer normalizes these later.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TracePoint {
    pub left: Sample,
    pub right: Sample,
}

impl TracePoint {
    #[inline]
    pub fn new(left: Sample, right: Sample) -> Self {
        Self { left, right }
    }

    /// Largest absolute coordinate of this point
    #[inline]
    pub fn peak(&self) -> Sample {
        self.left.abs().max(self.right.abs())
    }
}

/// Reusable block of output frames
///
/// Allocated once at [`MAX_BUFFER_SIZE`](crate::engine::MAX_BUFFER_SIZE)
/// frames; the callback only shrinks and regrows it within that capacity.
#[derive(Debug, Clone, Default)]
pub struct StereoBuffer {
    frames: Vec<StereoSample>,
}

impl StereoBuffer {
    /// `len` silent frames
    pub fn silence(len: usize) -> Self {
        Self {
            frames: vec![StereoSample::silence(); len],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Resize to `len` frames without reallocating
    ///
    /// Frames exposed by growing are silent. `len` must stay within the
    /// capacity the buffer was created with.
    #[inline]
    pub fn set_len_from_capacity(&mut self, len: usize) {
        debug_assert!(len <= self.frames.capacity(), "StereoBuffer grown past capacity");
        self.frames.resize(len, StereoSample::silence());
    }

    #[inline]
    pub fn as_slice(&self) -> &[StereoSample] {
        &self.frames
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [StereoSample] {
        &mut self.frames
    }

    /// Interleaved `[L, R, L, R, ...]` view of the same memory
    #[inline]
    pub fn as_interleaved(&self) -> &[Sample] {
        bytemuck::cast_slice(&self.frames)
    }
}

impl Index<usize> for StereoBuffer {
    type Output = StereoSample;

    #[inline]
    fn index(&self, index: usize) -> &StereoSample {
        &self.frames[index]
    }
}

impl IndexMut<usize> for StereoBuffer {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut StereoSample {
        &mut self.frames[index]
    }
}
