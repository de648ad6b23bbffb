//! UI-owned row store
//!
//! All edits made from the control panel, the text editor, file loads and
//! the playlist go through [`WaveState`]. After an edit the caller publishes
//! [`WaveState::snapshot`] to the audio thread.
//!
//! Each channel holds at most [`MAX_ROWS_PER_CHANNEL`] rows, the size the
//! audio thread pre-allocates.

use crate::synth::{OscillatorParams, Waveform, DEFAULT_FREQUENCY, MAX_ROWS_PER_CHANNEL};
use crate::types::Channel;

use super::{Row, RowId, WavePreset, WaveSnapshot};

/// Authoritative row lists for both channels
#[derive(Debug, Clone)]
pub struct WaveState {
    left: Vec<Row>,
    right: Vec<Row>,
    next_id: u64,
}

impl WaveState {
    /// Start-up configuration: one 440 Hz sine per channel
    pub fn new() -> Self {
        let mut state = Self::empty();
        state.add_row(Channel::Left);
        state.add_row(Channel::Right);
        state
    }

    /// Both channels empty
    pub fn empty() -> Self {
        Self {
            left: Vec::new(),
            right: Vec::new(),
            next_id: 1,
        }
    }

    pub fn from_preset(preset: &WavePreset) -> Self {
        let mut state = Self::empty();
        state.load_preset(preset);
        state
    }

    /// Replace both channels wholesale
    ///
    /// Every loaded row gets a fresh id, so the audio thread starts it at
    /// phase 0. Rows past the per-channel limit are dropped.
    pub fn load_preset(&mut self, preset: &WavePreset) {
        for channel in Channel::ALL {
            let source = preset.channel(channel);
            if source.len() > MAX_ROWS_PER_CHANNEL {
                log::warn!(
                    "{}: keeping {} of {} rows",
                    channel.name(),
                    MAX_ROWS_PER_CHANNEL,
                    source.len()
                );
            }
            let rows: Vec<Row> = source
                .iter()
                .take(MAX_ROWS_PER_CHANNEL)
                .map(|params| Row {
                    id: self.next_row_id(),
                    params: *params,
                })
                .collect();
            *self.rows_mut(channel) = rows;
        }
    }

    /// Identity-free copy of both channels
    pub fn to_preset(&self) -> WavePreset {
        WavePreset {
            left: self.left.iter().map(|r| r.params).collect(),
            right: self.right.iter().map(|r| r.params).collect(),
        }
    }

    /// Copy for publication to the audio thread
    pub fn snapshot(&self) -> WaveSnapshot {
        WaveSnapshot {
            left: self.left.clone(),
            right: self.right.clone(),
        }
    }

    pub fn rows(&self, channel: Channel) -> &[Row] {
        match channel {
            Channel::Left => &self.left,
            Channel::Right => &self.right,
        }
    }

    pub fn row(&self, channel: Channel, index: usize) -> Option<&Row> {
        self.rows(channel).get(index)
    }

    fn rows_mut(&mut self, channel: Channel) -> &mut Vec<Row> {
        match channel {
            Channel::Left => &mut self.left,
            Channel::Right => &mut self.right,
        }
    }

    fn next_row_id(&mut self) -> RowId {
        let id = RowId(self.next_id);
        self.next_id += 1;
        id
    }

    fn is_full(&self, channel: Channel) -> bool {
        self.rows(channel).len() >= MAX_ROWS_PER_CHANNEL
    }

    /// Apply `edit` to one row's parameters
    ///
    /// False if the index is out of range or the edit produced a non-finite
    /// frequency, in which case the row is left unchanged.
    fn edit(
        &mut self,
        channel: Channel,
        index: usize,
        edit: impl FnOnce(&mut OscillatorParams),
    ) -> bool {
        let Some(row) = self.rows_mut(channel).get_mut(index) else {
            return false;
        };
        let mut params = row.params;
        edit(&mut params);
        if !params.frequency.is_finite() {
            return false;
        }
        row.params = params;
        true
    }

    // =========================================================================
    // Structural edits
    // =========================================================================

    /// Append a sine row at the last row's frequency (440 Hz if empty)
    ///
    /// `None` when the channel is full.
    pub fn add_row(&mut self, channel: Channel) -> Option<RowId> {
        if self.is_full(channel) {
            return None;
        }
        let frequency = self
            .rows(channel)
            .last()
            .map(|r| r.params.frequency)
            .unwrap_or(DEFAULT_FREQUENCY);
        let id = self.next_row_id();
        self.rows_mut(channel).push(Row {
            id,
            params: OscillatorParams::new(frequency),
        });
        Some(id)
    }

    /// Insert a copy of row `index` directly after it
    ///
    /// The copy keeps frequency and waveform but starts unmuted. `None` when
    /// the index is out of range or the channel is full.
    pub fn duplicate_row(&mut self, channel: Channel, index: usize) -> Option<RowId> {
        if self.is_full(channel) {
            return None;
        }
        let source = *self.rows(channel).get(index)?;
        let id = self.next_row_id();
        self.rows_mut(channel).insert(
            index + 1,
            Row {
                id,
                params: source.params.with_muted(false),
            },
        );
        Some(id)
    }

    pub fn remove_row(&mut self, channel: Channel, index: usize) -> Option<Row> {
        let rows = self.rows_mut(channel);
        if index < rows.len() {
            Some(rows.remove(index))
        } else {
            None
        }
    }

    /// Move a row to a new position within its channel
    pub fn move_row(&mut self, channel: Channel, from: usize, to: usize) -> bool {
        let rows = self.rows_mut(channel);
        if from >= rows.len() || to >= rows.len() {
            return false;
        }
        let row = rows.remove(from);
        rows.insert(to, row);
        true
    }

    /// Exchange the Left and Right row lists
    pub fn swap_channels(&mut self) {
        std::mem::swap(&mut self.left, &mut self.right);
    }

    // =========================================================================
    // Parameter edits
    // =========================================================================

    pub fn set_frequency(&mut self, channel: Channel, index: usize, frequency: f32) -> bool {
        self.edit(channel, index, |p| p.frequency = frequency)
    }

    /// Add `delta` Hz (negative to decrease)
    pub fn nudge_frequency(&mut self, channel: Channel, index: usize, delta: f32) -> bool {
        self.edit(channel, index, |p| p.frequency += delta)
    }

    /// Multiply the frequency (2.0 = one octave up, 0.5 = one octave down)
    pub fn scale_frequency(&mut self, channel: Channel, index: usize, factor: f32) -> bool {
        self.edit(channel, index, |p| p.frequency *= factor)
    }

    pub fn set_muted(&mut self, channel: Channel, index: usize, muted: bool) -> bool {
        self.edit(channel, index, |p| p.muted = muted)
    }

    pub fn toggle_muted(&mut self, channel: Channel, index: usize) -> bool {
        self.edit(channel, index, |p| p.muted = !p.muted)
    }

    pub fn set_waveform(&mut self, channel: Channel, index: usize, waveform: Waveform) -> bool {
        self.edit(channel, index, |p| p.waveform = waveform)
    }
}

impl Default for WaveState {
    fn default() -> Self {
        Self::new()
    }
}
