//! Phase-accumulating oscillators
//!
//! Each oscillator row owns a running phase in radians, `[0, 2π)`. One call
//! to [`Oscillator::tick`] produces the sample for the current phase and then
//! advances the phase by `2π·f/sample_rate`.

use std::f64::consts::{PI, TAU};

use crate::types::Sample;
use crate::wave::RowId;

/// Default oscillator frequency for new rows (A4)
pub const DEFAULT_FREQUENCY: f32 = 440.0;

/// Oscillator waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Sawtooth,
}

impl Waveform {
    /// All waveforms in UI order
    pub const ALL: [Waveform; 3] = [Waveform::Sine, Waveform::Square, Waveform::Sawtooth];

    /// Token prefix used by the text formats
    pub fn prefix(&self) -> char {
        match self {
            Waveform::Sine => 'S',
            Waveform::Square => 'Q',
            Waveform::Sawtooth => 'W',
        }
    }

    /// Parse a token prefix (`S`, `Q`, `W`)
    pub fn from_prefix(prefix: char) -> Option<Self> {
        match prefix {
            'S' => Some(Waveform::Sine),
            'Q' => Some(Waveform::Square),
            'W' => Some(Waveform::Sawtooth),
            _ => None,
        }
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Waveform::Sine => "Sine",
            Waveform::Square => "Square",
            Waveform::Sawtooth => "Sawtooth",
        }
    }

    /// Evaluate the waveform at `phase` (radians, expected in `[0, 2π)`)
    ///
    /// - Sine: `sin(phase)`, range [-1, 1]
    /// - Square: `+0.5` below π, `-0.5` from π on (half amplitude of sine)
    /// - Sawtooth: `phase/π - 1`, ramp over [-1, 1)
    #[inline]
    pub fn sample(&self, phase: f64) -> Sample {
        match self {
            Waveform::Sine => phase.sin() as Sample,
            Waveform::Square => {
                if phase < PI {
                    0.5
                } else {
                    -0.5
                }
            }
            Waveform::Sawtooth => (phase / PI - 1.0) as Sample,
        }
    }
}

impl std::fmt::Display for Waveform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// User-editable parameters of one oscillator row
///
/// Frequency is not clamped: zero holds the phase still and negative values
/// run the phase backwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscillatorParams {
    /// Frequency in Hz
    pub frequency: f32,
    /// Excluded from the channel mix (phase keeps running)
    pub muted: bool,
    pub waveform: Waveform,
}

impl OscillatorParams {
    /// Unmuted sine at `frequency`
    pub fn new(frequency: f32) -> Self {
        Self {
            frequency,
            muted: false,
            waveform: Waveform::Sine,
        }
    }

    pub fn with_waveform(mut self, waveform: Waveform) -> Self {
        self.waveform = waveform;
        self
    }

    pub fn with_muted(mut self, muted: bool) -> Self {
        self.muted = muted;
        self
    }
}

impl Default for OscillatorParams {
    fn default() -> Self {
        Self::new(DEFAULT_FREQUENCY)
    }
}

/// Phase increment in radians per frame
#[inline]
pub fn phase_increment(frequency: f32, sample_rate: f64) -> f64 {
    TAU * frequency as f64 / sample_rate
}

/// Bring a phase back into `[0, 2π)`
///
/// Handles phases that went negative (negative frequencies) as well as
/// phases past 2π. A non-finite phase restarts at 0.
#[inline]
pub fn wrap_phase(phase: f64) -> f64 {
    if (0.0..TAU).contains(&phase) {
        return phase;
    }
    if !phase.is_finite() {
        return 0.0;
    }
    let wrapped = phase.rem_euclid(TAU);
    // rem_euclid of a tiny negative value rounds up to exactly TAU
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// An oscillator row as owned by the audio thread
///
/// Carries the row identity so the phase can follow the row across
/// snapshot swaps.
#[derive(Debug, Clone, Copy)]
pub struct Oscillator {
    id: RowId,
    params: OscillatorParams,
    phase: f64,
}

impl Oscillator {
    /// New oscillator starting at phase 0
    pub fn new(id: RowId, params: OscillatorParams) -> Self {
        Self::with_phase(id, params, 0.0)
    }

    pub fn with_phase(id: RowId, params: OscillatorParams, phase: f64) -> Self {
        Self {
            id,
            params,
            phase: wrap_phase(phase),
        }
    }

    #[inline]
    pub fn id(&self) -> RowId {
        self.id
    }

    #[inline]
    pub fn params(&self) -> &OscillatorParams {
        &self.params
    }

    #[inline]
    pub fn is_muted(&self) -> bool {
        self.params.muted
    }

    /// Current phase in radians, always in `[0, 2π)`
    #[inline]
    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn reset_phase(&mut self) {
        self.phase = 0.0;
    }

    /// Produce the sample for the current phase, then advance one frame
    ///
    /// Advancing is unconditional; muting only affects whether the caller
    /// sums the returned sample.
    #[inline]
    pub fn tick(&mut self, sample_rate: f64) -> Sample {
        let sample = self.params.waveform.sample(self.phase);
        self.phase = wrap_phase(self.phase + phase_increment(self.params.frequency, sample_rate));
        sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f64 = 44100.0;

    #[test]
    fn test_square_is_exactly_half_amplitude() {
        let wave = Waveform::Square;
        assert_eq!(wave.sample(0.0), 0.5);
        assert_eq!(wave.sample(PI - 1e-9), 0.5);
        assert_eq!(wave.sample(PI), -0.5);
        assert_eq!(wave.sample(TAU - 1e-9), -0.5);
    }

    #[test]
    fn test_sawtooth_ramp() {
        let wave = Waveform::Sawtooth;
        assert_eq!(wave.sample(0.0), -1.0);
        assert!((wave.sample(PI)).abs() < 1e-6);
        assert!(wave.sample(TAU - 1e-9) < 1.0);
    }

    #[test]
    fn test_sine_quarter_phase() {
        assert!((Waveform::Sine.sample(PI / 2.0) - 1.0).abs() < 1e-6);
        assert_eq!(Waveform::Sine.sample(0.0), 0.0);
    }

    #[test]
    fn test_prefix_roundtrip() {
        for wave in Waveform::ALL {
            assert_eq!(Waveform::from_prefix(wave.prefix()), Some(wave));
        }
        assert_eq!(Waveform::from_prefix('X'), None);
    }

    #[test]
    fn test_phase_advances_one_increment_per_tick() {
        let mut osc = Oscillator::new(RowId(1), OscillatorParams::new(441.0));
        osc.tick(SR);
        assert!((osc.phase() - phase_increment(441.0, SR)).abs() < 1e-12);
    }

    #[test]
    fn test_phase_stays_in_range_for_high_frequency() {
        let mut osc = Oscillator::new(RowId(1), OscillatorParams::new(20000.0));
        for _ in 0..10_000 {
            osc.tick(SR);
            assert!(osc.phase() >= 0.0 && osc.phase() < TAU);
        }
    }

    #[test]
    fn test_negative_frequency_wraps_forward() {
        let mut osc = Oscillator::new(RowId(1), OscillatorParams::new(-440.0));
        osc.tick(SR);
        let expected = TAU - phase_increment(440.0, SR);
        assert!((osc.phase() - expected).abs() < 1e-9);
        for _ in 0..10_000 {
            osc.tick(SR);
            assert!(osc.phase() >= 0.0 && osc.phase() < TAU);
        }
    }

    #[test]
    fn test_muted_row_keeps_rotating() {
        let params = OscillatorParams::new(100.0).with_muted(true);
        let mut osc = Oscillator::new(RowId(7), params);
        let mut last = osc.phase();
        for _ in 0..100 {
            osc.tick(SR);
            assert!(osc.phase() > last);
            last = osc.phase();
        }
    }

    #[test]
    fn test_wrap_phase_edges() {
        assert_eq!(wrap_phase(0.0), 0.0);
        assert_eq!(wrap_phase(TAU), 0.0);
        assert!((wrap_phase(TAU + 1.0) - 1.0).abs() < 1e-12);
        assert!((wrap_phase(-1.0) - (TAU - 1.0)).abs() < 1e-12);
        assert_eq!(wrap_phase(-1e-300), 0.0);
        assert_eq!(wrap_phase(f64::NAN), 0.0);
        assert_eq!(wrap_phase(f64::INFINITY), 0.0);
        assert_eq!(wrap_phase(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_infinite_frequency_keeps_phase_in_range() {
        let mut osc = Oscillator::new(RowId(1), OscillatorParams::new(f32::INFINITY));
        for _ in 0..4 {
            osc.tick(SR);
            assert!((0.0..TAU).contains(&osc.phase()));
        }
    }
}
