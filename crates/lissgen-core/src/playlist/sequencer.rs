//! Playlist sequencer
//!
//! ```text
//! Stopped ──start──▶ Playing(0, d0) ──remaining ≤ 0──▶ Playing(1, d1) ─ … ─▶ Stopped
//!                         ▲                                                 (loop: back to 0)
//! ```
//!
//! The sequencer only keeps time. Loading the preset of the new item is the
//! caller's job, driven by the returned [`SequencerEvent`].

use super::Playlist;

/// Sequencer state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SequencerState {
    #[default]
    Stopped,
    Playing {
        index: usize,
        /// Seconds left on the current item
        remaining: f32,
    },
}

/// Transition reported to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerEvent {
    /// Playback (re)started at this item; load its preset
    Started(usize),
    /// Moved on to this item; load its preset
    Advanced(usize),
    /// Ran past the last item of a non-looping playlist
    Finished,
}

#[derive(Debug, Clone, Default)]
pub struct Sequencer {
    state: SequencerState,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.state, SequencerState::Playing { .. })
    }

    /// Index of the playing item, `None` when stopped
    pub fn current_index(&self) -> Option<usize> {
        match self.state {
            SequencerState::Playing { index, .. } => Some(index),
            SequencerState::Stopped => None,
        }
    }

    /// Seconds left on the playing item
    pub fn remaining(&self) -> Option<f32> {
        match self.state {
            SequencerState::Playing { remaining, .. } => Some(remaining),
            SequencerState::Stopped => None,
        }
    }

    /// Start from the first item; `None` for an empty playlist
    pub fn start(&mut self, playlist: &Playlist) -> Option<SequencerEvent> {
        self.jump_to(playlist, 0)
    }

    /// Start playing the item at `index`
    pub fn jump_to(&mut self, playlist: &Playlist, index: usize) -> Option<SequencerEvent> {
        let item = playlist.get(index)?;
        self.state = SequencerState::Playing {
            index,
            remaining: item.duration,
        };
        Some(SequencerEvent::Started(index))
    }

    pub fn stop(&mut self) {
        self.state = SequencerState::Stopped;
    }

    /// Advance the clock by `dt` seconds
    ///
    /// No-op unless playing and `audio_running`. Moves at most one item per
    /// call; the new item's full duration starts on the tick that reaches it.
    pub fn tick(
        &mut self,
        playlist: &Playlist,
        dt: f32,
        audio_running: bool,
    ) -> Option<SequencerEvent> {
        let SequencerState::Playing { index, remaining } = self.state else {
            return None;
        };
        if !audio_running {
            return None;
        }

        let remaining = remaining - dt;
        if remaining > 0.0 {
            self.state = SequencerState::Playing { index, remaining };
            return None;
        }

        let mut next = index + 1;
        if next >= playlist.len() {
            if playlist.is_looping() && !playlist.is_empty() {
                next = 0;
            } else {
                self.state = SequencerState::Stopped;
                return Some(SequencerEvent::Finished);
            }
        }

        let duration = playlist.get(next).map(|item| item.duration).unwrap_or(0.0);
        self.state = SequencerState::Playing {
            index: next,
            remaining: duration,
        };
        Some(SequencerEvent::Advanced(next))
    }

    /// Keep the current index valid after `playlist` lost item `removed`
    ///
    /// Removing the playing item hands its slot to the next item, which keeps
    /// the remaining time. Stops when the playlist became empty.
    pub fn item_removed(&mut self, playlist: &Playlist, removed: usize) {
        let SequencerState::Playing { index, remaining } = self.state else {
            return;
        };
        if playlist.is_empty() {
            self.state = SequencerState::Stopped;
            return;
        }
        let index = if removed < index { index - 1 } else { index };
        self.state = SequencerState::Playing {
            index: index.min(playlist.len() - 1),
            remaining,
        };
    }

    /// Follow the playing item after a move from `from` to `to`
    pub fn item_moved(&mut self, from: usize, to: usize) {
        let SequencerState::Playing { index, remaining } = self.state else {
            return;
        };
        let index = if index == from {
            to
        } else if from < index && to >= index {
            index - 1
        } else if from > index && to <= index {
            index + 1
        } else {
            index
        };
        self.state = SequencerState::Playing { index, remaining };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wave::WavePreset;

    fn playlist(durations: &[f32], looping: bool) -> Playlist {
        let mut playlist = Playlist::new();
        for &d in durations {
            playlist.add_item(WavePreset::default(), d);
        }
        playlist.set_loop(looping);
        playlist
    }

    #[test]
    fn test_start_requires_items() {
        let mut seq = Sequencer::new();
        assert_eq!(seq.start(&Playlist::new()), None);
        assert!(!seq.is_playing());

        let list = playlist(&[2.0], false);
        assert_eq!(seq.start(&list), Some(SequencerEvent::Started(0)));
        assert_eq!(seq.current_index(), Some(0));
        assert_eq!(seq.remaining(), Some(2.0));
    }

    #[test]
    fn test_stops_after_sum_of_durations() {
        let list = playlist(&[1.0, 0.5, 2.25], false);
        let mut seq = Sequencer::new();
        seq.start(&list);

        let dt = 0.25;
        let mut elapsed = 0.0;
        let mut events = Vec::new();
        while seq.is_playing() {
            if let Some(event) = seq.tick(&list, dt, true) {
                events.push(event);
            }
            elapsed += dt;
            assert!(elapsed <= 10.0, "sequencer never stopped");
        }
        assert_eq!(elapsed, list.total_duration());
        assert_eq!(
            events,
            vec![
                SequencerEvent::Advanced(1),
                SequencerEvent::Advanced(2),
                SequencerEvent::Finished,
            ]
        );
        assert_eq!(seq.current_index(), None);
    }

    #[test]
    fn test_loop_wraps_to_first_item() {
        let list = playlist(&[0.5, 0.5], true);
        let mut seq = Sequencer::new();
        seq.start(&list);
        assert_eq!(seq.tick(&list, 0.5, true), Some(SequencerEvent::Advanced(1)));
        assert_eq!(seq.tick(&list, 0.5, true), Some(SequencerEvent::Advanced(0)));
        assert!(seq.is_playing());
    }

    #[test]
    fn test_no_tick_without_audio() {
        let list = playlist(&[0.5], false);
        let mut seq = Sequencer::new();
        seq.start(&list);
        assert_eq!(seq.tick(&list, 10.0, false), None);
        assert_eq!(seq.remaining(), Some(0.5));
    }

    #[test]
    fn test_tick_while_stopped_is_noop() {
        let list = playlist(&[0.5], false);
        let mut seq = Sequencer::new();
        assert_eq!(seq.tick(&list, 1.0, true), None);
        assert_eq!(seq.state(), SequencerState::Stopped);
    }

    #[test]
    fn test_one_advance_per_tick() {
        // A huge dt does not skip items
        let list = playlist(&[0.1, 0.1, 0.1], false);
        let mut seq = Sequencer::new();
        seq.start(&list);
        assert_eq!(seq.tick(&list, 5.0, true), Some(SequencerEvent::Advanced(1)));
        assert_eq!(seq.remaining(), Some(0.1));
    }

    #[test]
    fn test_jump_to() {
        let list = playlist(&[1.0, 3.0], false);
        let mut seq = Sequencer::new();
        assert_eq!(seq.jump_to(&list, 1), Some(SequencerEvent::Started(1)));
        assert_eq!(seq.remaining(), Some(3.0));
        assert_eq!(seq.jump_to(&list, 2), None);
        assert_eq!(seq.current_index(), Some(1));
        seq.stop();
        assert!(!seq.is_playing());
    }

    #[test]
    fn test_item_removed_keeps_index_valid() {
        let mut list = playlist(&[1.0, 1.0, 1.0], false);
        let mut seq = Sequencer::new();
        seq.jump_to(&list, 2);

        list.remove_item(0);
        seq.item_removed(&list, 0);
        assert_eq!(seq.current_index(), Some(1));

        list.remove_item(1);
        seq.item_removed(&list, 1);
        assert_eq!(seq.current_index(), Some(0));

        list.remove_item(0);
        seq.item_removed(&list, 0);
        assert!(!seq.is_playing());
    }

    #[test]
    fn test_item_moved_follows_playing_item() {
        let mut seq = Sequencer::new();
        let list = playlist(&[1.0, 1.0, 1.0, 1.0], false);
        seq.jump_to(&list, 1);

        seq.item_moved(1, 3);
        assert_eq!(seq.current_index(), Some(3));
        seq.item_moved(0, 3);
        assert_eq!(seq.current_index(), Some(2));
        seq.item_moved(3, 0);
        assert_eq!(seq.current_index(), Some(3));
    }
}
