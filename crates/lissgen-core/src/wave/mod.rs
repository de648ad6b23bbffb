//! Wave configuration: row lists for both channels
//!
//! Three shapes of the same data live here:
//!
//! - [`WaveState`]: the UI-owned authoritative store. Rows carry a stable
//!   [`RowId`] so the audio thread can keep each row's phase across edits.
//! - [`WaveSnapshot`]: an immutable copy of the store published to the audio
//!   thread after every edit.
//! - [`WavePreset`]: identity-free parameters of both channels, the unit
//!   stored in wave files and playlist items.

mod state;

pub use state::WaveState;

use crate::synth::OscillatorParams;
use crate::types::Channel;

/// Stable identity of an oscillator row
///
/// Allocated by [`WaveState`]; never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(pub u64);

/// One row of the store: identity plus editable parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Row {
    pub id: RowId,
    pub params: OscillatorParams,
}

/// Immutable copy of both channels handed to the audio thread
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaveSnapshot {
    pub left: Vec<Row>,
    pub right: Vec<Row>,
}

impl WaveSnapshot {
    pub fn channel(&self, channel: Channel) -> &[Row] {
        match channel {
            Channel::Left => &self.left,
            Channel::Right => &self.right,
        }
    }
}

/// Saved parameters of both channels
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WavePreset {
    pub left: Vec<OscillatorParams>,
    pub right: Vec<OscillatorParams>,
}

impl WavePreset {
    pub fn new(left: Vec<OscillatorParams>, right: Vec<OscillatorParams>) -> Self {
        Self { left, right }
    }

    pub fn channel(&self, channel: Channel) -> &[OscillatorParams] {
        match channel {
            Channel::Left => &self.left,
            Channel::Right => &self.right,
        }
    }

    pub fn channel_mut(&mut self, channel: Channel) -> &mut Vec<OscillatorParams> {
        match channel {
            Channel::Left => &mut self.left,
            Channel::Right => &mut self.right,
        }
    }

    /// Total number of rows over both channels
    pub fn row_count(&self) -> usize {
        self.left.len() + self.right.len()
    }
}

/// Increment used by the frequency +/- buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrequencyStep {
    /// 1 Hz
    #[default]
    Coarse,
    /// 0.1 Hz
    Fine,
    /// 0.01 Hz
    Finest,
}

impl FrequencyStep {
    pub const ALL: [FrequencyStep; 3] =
        [FrequencyStep::Coarse, FrequencyStep::Fine, FrequencyStep::Finest];

    pub fn hz(&self) -> f32 {
        match self {
            FrequencyStep::Coarse => 1.0,
            FrequencyStep::Fine => 0.1,
            FrequencyStep::Finest => 0.01,
        }
    }

    /// Step selected by held modifier keys (Shift = fine, Ctrl+Shift = finest)
    pub fn from_modifiers(shift: bool, ctrl: bool) -> Self {
        match (shift, ctrl) {
            (true, true) => FrequencyStep::Finest,
            (true, false) => FrequencyStep::Fine,
            _ => FrequencyStep::Coarse,
        }
    }
}

impl std::fmt::Display for FrequencyStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} Hz", self.hz())
    }
}
