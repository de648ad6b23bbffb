//! Channel mixer
//!
//! A channel's sample is the arithmetic mean of its unmuted rows. Every row
//! advances its phase on every frame whether it is muted or not, so toggling
//! mute never introduces a phase jump.

use crate::types::Sample;
use crate::wave::{Row, RowId};

use super::oscillator::Oscillator;

/// Rows pre-allocated per channel on the audio thread
///
/// Row lists are capped at this length on the UI side; a bank ignores any
/// rows past it so adoption never allocates.
pub const MAX_ROWS_PER_CHANNEL: usize = 256;

/// Mix one frame of a row list, advancing every row
///
/// Returns exactly 0.0 for an empty or fully muted list.
#[inline]
pub fn mix_rows(rows: &mut [Oscillator], sample_rate: f64) -> Sample {
    let mut sum: Sample = 0.0;
    let mut count: u32 = 0;
    for row in rows.iter_mut() {
        let sample = row.tick(sample_rate);
        if !row.is_muted() {
            sum += sample;
            count += 1;
        }
    }
    if count == 0 {
        0.0
    } else {
        sum / count as Sample
    }
}

/// The oscillator rows of one channel, owned by the audio thread
///
/// Holds a second pre-allocated vector so that adopting a new row list
/// from the UI does not allocate.
pub struct ChannelBank {
    rows: Vec<Oscillator>,
    scratch: Vec<Oscillator>,
}

impl ChannelBank {
    pub fn new() -> Self {
        Self {
            rows: Vec::with_capacity(MAX_ROWS_PER_CHANNEL),
            scratch: Vec::with_capacity(MAX_ROWS_PER_CHANNEL),
        }
    }

    /// Mix one frame of this channel
    #[inline]
    pub fn mix(&mut self, sample_rate: f64) -> Sample {
        mix_rows(&mut self.rows, sample_rate)
    }

    /// Replace the row list with `rows`
    ///
    /// A row whose id already exists in the bank keeps its running phase;
    /// rows with unknown ids start at phase 0.
    pub fn adopt(&mut self, rows: &[Row]) {
        self.stage(rows, None);
        self.commit();
    }

    /// Replace the row lists of both channels at once
    ///
    /// Phases are looked up in both banks before either changes, so rows
    /// that moved to the other channel (swap) keep rotating where they were.
    pub fn adopt_pair(left: &mut Self, right: &mut Self, left_rows: &[Row], right_rows: &[Row]) {
        left.stage(left_rows, Some(&*right));
        right.stage(right_rows, Some(&*left));
        left.commit();
        right.commit();
    }

    fn phase_of(&self, id: RowId) -> Option<f64> {
        self.rows.iter().find(|osc| osc.id() == id).map(|osc| osc.phase())
    }

    /// Build the next row list in `scratch`, leaving `rows` untouched
    fn stage(&mut self, rows: &[Row], other: Option<&Self>) {
        self.scratch.clear();
        let limit = self.scratch.capacity().min(MAX_ROWS_PER_CHANNEL);
        for row in rows.iter().take(limit) {
            let phase = self
                .phase_of(row.id)
                .or_else(|| other.and_then(|bank| bank.phase_of(row.id)))
                .unwrap_or(0.0);
            self.scratch.push(Oscillator::with_phase(row.id, row.params, phase));
        }
    }

    fn commit(&mut self) {
        std::mem::swap(&mut self.rows, &mut self.scratch);
    }

    /// Reset every row's phase to 0 (playback restart)
    pub fn reset_phases(&mut self) {
        for row in &mut self.rows {
            row.reset_phase();
        }
    }

    pub fn rows(&self) -> &[Oscillator] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Default for ChannelBank {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::{OscillatorParams, Waveform};

    const SR: f64 = 44100.0;

    fn row(id: u64, params: OscillatorParams) -> Row {
        Row { id: RowId(id), params }
    }

    #[test]
    fn test_empty_channel_is_silent() {
        let mut bank = ChannelBank::new();
        assert_eq!(bank.mix(SR), 0.0);
    }

    #[test]
    fn test_all_muted_channel_is_silent() {
        let mut bank = ChannelBank::new();
        bank.adopt(&[
            row(1, OscillatorParams::new(440.0).with_waveform(Waveform::Square).with_muted(true)),
            row(2, OscillatorParams::new(220.0).with_waveform(Waveform::Square).with_muted(true)),
        ]);
        for _ in 0..64 {
            assert_eq!(bank.mix(SR), 0.0);
        }
    }

    #[test]
    fn test_mean_of_unmuted_rows() {
        // Two squares at phase 0 give +0.5 each, a muted sawtooth is ignored
        let mut bank = ChannelBank::new();
        bank.adopt(&[
            row(1, OscillatorParams::new(10.0).with_waveform(Waveform::Square)),
            row(2, OscillatorParams::new(20.0).with_waveform(Waveform::Square)),
            row(3, OscillatorParams::new(30.0).with_waveform(Waveform::Sawtooth).with_muted(true)),
        ]);
        assert_eq!(bank.mix(SR), 0.5);
    }

    #[test]
    fn test_muted_rows_still_advance() {
        let mut bank = ChannelBank::new();
        bank.adopt(&[
            row(1, OscillatorParams::new(100.0)),
            row(2, OscillatorParams::new(100.0).with_muted(true)),
        ]);
        for _ in 0..10 {
            bank.mix(SR);
        }
        let phases: Vec<f64> = bank.rows().iter().map(|r| r.phase()).collect();
        assert!(phases[0] > 0.0);
        assert_eq!(phases[0], phases[1]);
    }

    #[test]
    fn test_adopt_carries_phase_by_id() {
        let mut bank = ChannelBank::new();
        bank.adopt(&[row(1, OscillatorParams::new(100.0))]);
        for _ in 0..50 {
            bank.mix(SR);
        }
        let phase = bank.rows()[0].phase();

        // Toggle mute and insert a new row in front: row 1 keeps its phase
        bank.adopt(&[
            row(9, OscillatorParams::new(300.0)),
            row(1, OscillatorParams::new(100.0).with_muted(true)),
        ]);
        assert_eq!(bank.rows()[0].phase(), 0.0);
        assert_eq!(bank.rows()[1].phase(), phase);
        assert!(bank.rows()[1].is_muted());
    }

    #[test]
    fn test_adopt_pair_carries_phase_across_channels() {
        let mut left = ChannelBank::new();
        let mut right = ChannelBank::new();
        let l = [row(1, OscillatorParams::new(100.0))];
        let r = [row(2, OscillatorParams::new(250.0))];
        ChannelBank::adopt_pair(&mut left, &mut right, &l, &r);
        for _ in 0..37 {
            left.mix(SR);
            right.mix(SR);
        }
        let (phase_1, phase_2) = (left.rows()[0].phase(), right.rows()[0].phase());
        assert!(phase_1 > 0.0 && phase_2 > 0.0);

        ChannelBank::adopt_pair(&mut left, &mut right, &r, &l);
        assert_eq!(left.rows()[0].id(), RowId(2));
        assert_eq!(left.rows()[0].phase(), phase_2);
        assert_eq!(right.rows()[0].id(), RowId(1));
        assert_eq!(right.rows()[0].phase(), phase_1);
    }

    #[test]
    fn test_adopt_ignores_rows_past_capacity() {
        let mut bank = ChannelBank::new();
        let rows: Vec<Row> = (0..MAX_ROWS_PER_CHANNEL as u64 + 5)
            .map(|id| row(id, OscillatorParams::new(1.0)))
            .collect();
        bank.adopt(&rows);
        assert_eq!(bank.len(), MAX_ROWS_PER_CHANNEL);
        bank.adopt(&rows);
        assert_eq!(bank.len(), MAX_ROWS_PER_CHANNEL);
    }

    #[test]
    fn test_reset_phases() {
        let mut bank = ChannelBank::new();
        bank.adopt(&[row(1, OscillatorParams::new(100.0))]);
        bank.mix(SR);
        bank.reset_phases();
        assert_eq!(bank.rows()[0].phase(), 0.0);
    }
}
