//! Playlist of wave presets
//!
//! - [`Playlist`]: ordered items, each a preset shown for a number of seconds
//! - [`Sequencer`]: timer-driven state machine stepping through a playlist

mod sequencer;

pub use sequencer::{Sequencer, SequencerEvent, SequencerState};

use crate::wave::WavePreset;

/// Duration given to new items and to items with an unusable duration
pub const DEFAULT_ITEM_DURATION: f32 = 5.0;

/// One playlist entry
#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistItem {
    pub preset: WavePreset,
    /// Seconds, always > 0
    pub duration: f32,
}

impl PlaylistItem {
    pub fn new(preset: WavePreset, duration: f32) -> Self {
        Self { preset, duration }
    }
}

/// Ordered playlist plus the loop flag
#[derive(Debug, Clone, Default)]
pub struct Playlist {
    items: Vec<PlaylistItem>,
    looping: bool,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<PlaylistItem>) -> Self {
        Self {
            items,
            looping: false,
        }
    }

    pub fn items(&self) -> &[PlaylistItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&PlaylistItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn set_loop(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Total playback time of one pass in seconds
    pub fn total_duration(&self) -> f32 {
        self.items.iter().map(|item| item.duration).sum()
    }

    /// Append an item; unusable durations fall back to the default
    pub fn add_item(&mut self, preset: WavePreset, duration: f32) -> usize {
        let duration = if is_valid_duration(duration) {
            duration
        } else {
            DEFAULT_ITEM_DURATION
        };
        self.items.push(PlaylistItem::new(preset, duration));
        self.items.len() - 1
    }

    pub fn remove_item(&mut self, index: usize) -> Option<PlaylistItem> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        if from >= self.items.len() || to >= self.items.len() {
            return false;
        }
        let item = self.items.remove(from);
        self.items.insert(to, item);
        true
    }

    /// Change an item's duration; rejects non-positive and non-finite values
    pub fn set_duration(&mut self, index: usize, seconds: f32) -> bool {
        match self.items.get_mut(index) {
            Some(item) if is_valid_duration(seconds) => {
                item.duration = seconds;
                true
            }
            _ => false,
        }
    }

    /// Replace every item (playlist file load); the loop flag is kept
    pub fn replace_items(&mut self, items: Vec<PlaylistItem>) {
        self.items = items;
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

fn is_valid_duration(seconds: f32) -> bool {
    seconds.is_finite() && seconds > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_item_rejects_bad_duration() {
        let mut playlist = Playlist::new();
        assert_eq!(playlist.add_item(WavePreset::default(), 2.0), 0);
        assert_eq!(playlist.add_item(WavePreset::default(), 0.0), 1);
        assert_eq!(playlist.add_item(WavePreset::default(), f32::NAN), 2);
        assert_eq!(playlist.get(0).unwrap().duration, 2.0);
        assert_eq!(playlist.get(1).unwrap().duration, DEFAULT_ITEM_DURATION);
        assert_eq!(playlist.get(2).unwrap().duration, DEFAULT_ITEM_DURATION);
        assert_eq!(playlist.total_duration(), 12.0);
    }

    #[test]
    fn test_set_duration() {
        let mut playlist = Playlist::new();
        playlist.add_item(WavePreset::default(), 2.0);
        assert!(playlist.set_duration(0, 3.5));
        assert!(!playlist.set_duration(0, -1.0));
        assert!(!playlist.set_duration(0, f32::INFINITY));
        assert!(!playlist.set_duration(4, 1.0));
        assert_eq!(playlist.get(0).unwrap().duration, 3.5);
    }

    #[test]
    fn test_move_and_remove() {
        let mut playlist = Playlist::new();
        for d in [1.0, 2.0, 3.0] {
            playlist.add_item(WavePreset::default(), d);
        }
        assert!(playlist.move_item(2, 0));
        let durations: Vec<f32> = playlist.items().iter().map(|i| i.duration).collect();
        assert_eq!(durations, vec![3.0, 1.0, 2.0]);
        assert!(!playlist.move_item(0, 3));
        assert_eq!(playlist.remove_item(1).unwrap().duration, 1.0);
        assert!(playlist.remove_item(5).is_none());
        playlist.clear();
        assert!(playlist.is_empty());
    }

    #[test]
    fn test_replace_items_keeps_loop_flag() {
        let mut playlist = Playlist::new();
        playlist.set_loop(true);
        playlist.replace_items(vec![PlaylistItem::new(WavePreset::default(), 1.0)]);
        assert!(playlist.is_looping());
        assert_eq!(playlist.len(), 1);
    }
}
