//! Oscillator bank and channel mixer
//!
//! - [`Oscillator`]: one row's phase accumulator and waveform
//! - [`ChannelBank`]: the rows of one channel, mixed to a single sample

mod mixer;
mod oscillator;

pub use mixer::{mix_rows, ChannelBank, MAX_ROWS_PER_CHANNEL};
pub use oscillator::{
    phase_increment, wrap_phase, Oscillator, OscillatorParams, Waveform, DEFAULT_FREQUENCY,
};
