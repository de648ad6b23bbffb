//! Wave (`.lsj`) and playlist (`.lsjp`) files
//!
//! Wave file:
//!
//! ```text
//! L:S440.000,Q220.000(M)
//! R:W110.000
//! ```
//!
//! Playlist file, one block per item:
//!
//! ```text
//! ITEM
//! DURATION: 5.000
//! L:S440.000
//! R:S660.000
//! ```
//!
//! Loading is lenient: malformed tokens are skipped, unknown lines ignored,
//! and a bad duration falls back to [`DEFAULT_ITEM_DURATION`].

use std::path::Path;

use crate::playlist::{PlaylistItem, DEFAULT_ITEM_DURATION};
use crate::types::Channel;
use crate::wave::WavePreset;

use super::error::{CodecError, CodecResult};
use super::token::{format_rows, parse_rows_lenient, split_channel_line};

/// Wave file extension
pub const WAVE_EXTENSION: &str = "lsj";
/// Playlist file extension
pub const PLAYLIST_EXTENSION: &str = "lsjp";

const ITEM_MARKER: &str = "ITEM";
const DURATION_KEY: &str = "DURATION:";

// ============================================================================
// Wave files
// ============================================================================

pub fn format_wave_file(preset: &WavePreset) -> String {
    format!(
        "L:{}\nR:{}\n",
        format_rows(&preset.left),
        format_rows(&preset.right)
    )
}

/// Parse wave file contents; a missing channel line yields an empty channel
pub fn parse_wave_file(text: &str) -> WavePreset {
    let mut preset = WavePreset::default();
    for line in text.lines() {
        if let Some((channel, body)) = split_channel_line(line) {
            *preset.channel_mut(channel) = parse_rows_lenient(body);
        }
    }
    preset
}

pub fn load_wave_file(path: &Path) -> CodecResult<WavePreset> {
    let text = std::fs::read_to_string(path).map_err(|e| CodecError::io(path, e))?;
    let preset = parse_wave_file(&text);
    log::info!(
        "Loaded wave {:?}: {} left rows, {} right rows",
        path,
        preset.left.len(),
        preset.right.len()
    );
    Ok(preset)
}

pub fn save_wave_file(path: &Path, preset: &WavePreset) -> CodecResult<()> {
    std::fs::write(path, format_wave_file(preset)).map_err(|e| CodecError::io(path, e))?;
    log::info!("Saved wave to {:?}", path);
    Ok(())
}

// ============================================================================
// Playlist files
// ============================================================================

pub fn format_playlist_file(items: &[PlaylistItem]) -> String {
    let mut out = String::new();
    for item in items {
        out.push_str(ITEM_MARKER);
        out.push('\n');
        out.push_str(&format!("{} {:.3}\n", DURATION_KEY, item.duration));
        out.push_str(&format_wave_file(&item.preset));
    }
    out
}

/// Parse playlist file contents
///
/// Lines before the first `ITEM` marker are ignored.
pub fn parse_playlist_file(text: &str) -> Vec<PlaylistItem> {
    let mut items = Vec::new();
    let mut current: Option<PlaylistItem> = None;

    for line in text.lines() {
        let line = line.trim();
        if line == ITEM_MARKER {
            if let Some(item) = current.take() {
                items.push(item);
            }
            current = Some(PlaylistItem::new(WavePreset::default(), DEFAULT_ITEM_DURATION));
            continue;
        }

        let Some(item) = current.as_mut() else {
            continue;
        };

        if let Some(value) = line.strip_prefix(DURATION_KEY) {
            item.duration = parse_duration(value);
        } else if let Some((channel, body)) = split_channel_line(line) {
            *item.preset.channel_mut(channel) = parse_rows_lenient(body);
        }
    }

    if let Some(item) = current {
        items.push(item);
    }
    items
}

fn parse_duration(value: &str) -> f32 {
    match value.trim().parse::<f32>() {
        Ok(seconds) if seconds.is_finite() && seconds > 0.0 => seconds,
        _ => {
            log::warn!(
                "Invalid playlist duration '{}', using {}s",
                value.trim(),
                DEFAULT_ITEM_DURATION
            );
            DEFAULT_ITEM_DURATION
        }
    }
}

pub fn load_playlist_file(path: &Path) -> CodecResult<Vec<PlaylistItem>> {
    let text = std::fs::read_to_string(path).map_err(|e| CodecError::io(path, e))?;
    let items = parse_playlist_file(&text);
    log::info!("Loaded playlist {:?}: {} items", path, items.len());
    Ok(items)
}

pub fn save_playlist_file(path: &Path, items: &[PlaylistItem]) -> CodecResult<()> {
    std::fs::write(path, format_playlist_file(items)).map_err(|e| CodecError::io(path, e))?;
    log::info!("Saved playlist ({} items) to {:?}", items.len(), path);
    Ok(())
}

/// Row count summary used in log and status lines, e.g. `2L/1R`
pub fn describe_preset(preset: &WavePreset) -> String {
    format!(
        "{}{}/{}{}",
        preset.channel(Channel::Left).len(),
        Channel::Left.tag(),
        preset.channel(Channel::Right).len(),
        Channel::Right.tag()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::{OscillatorParams, Waveform};
    use tempfile::TempDir;

    #[test]
    fn test_example_wave_file() {
        let preset = parse_wave_file("L:S440,Q220(M)\nR:W110\n");
        assert_eq!(
            preset.left,
            vec![
                OscillatorParams::new(440.0),
                OscillatorParams::new(220.0)
                    .with_waveform(Waveform::Square)
                    .with_muted(true),
            ]
        );
        assert_eq!(
            preset.right,
            vec![OscillatorParams::new(110.0).with_waveform(Waveform::Sawtooth)]
        );
    }

    #[test]
    fn test_wave_file_is_lenient() {
        let preset = parse_wave_file("# comment\r\nL:S440,broken,,Q1\r\n");
        assert_eq!(preset.left.len(), 2);
        assert!(preset.right.is_empty());
    }

    #[test]
    fn test_wave_file_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.lsj");
        let preset = WavePreset::new(
            vec![OscillatorParams::new(-3.5)],
            vec![
                OscillatorParams::new(0.0).with_waveform(Waveform::Square),
                OscillatorParams::new(1000.25).with_muted(true),
            ],
        );
        save_wave_file(&path, &preset).unwrap();
        assert_eq!(load_wave_file(&path).unwrap(), preset);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let result = load_wave_file(&dir.path().join("missing.lsj"));
        assert!(matches!(result, Err(CodecError::Io { .. })));
    }

    #[test]
    fn test_playlist_parse() {
        let text = "\
junk before first item
ITEM
DURATION: 2.5
L:S440
R:S660
ITEM
DURATION: nope
L:Q1,Q2
ITEM
DURATION: -1
";
        let items = parse_playlist_file(text);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].duration, 2.5);
        assert_eq!(items[0].preset.right, vec![OscillatorParams::new(660.0)]);
        assert_eq!(items[1].duration, DEFAULT_ITEM_DURATION);
        assert_eq!(items[1].preset.left.len(), 2);
        assert!(items[1].preset.right.is_empty());
        assert_eq!(items[2].duration, DEFAULT_ITEM_DURATION);
        assert_eq!(items[2].preset.row_count(), 0);
    }

    #[test]
    fn test_playlist_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("set.lsjp");
        let items = vec![
            PlaylistItem::new(
                WavePreset::new(vec![OscillatorParams::new(100.0)], vec![]),
                1.25,
            ),
            PlaylistItem::new(
                WavePreset::new(
                    vec![OscillatorParams::new(200.0).with_waveform(Waveform::Sawtooth)],
                    vec![OscillatorParams::new(300.0).with_muted(true)],
                ),
                10.0,
            ),
        ];
        save_playlist_file(&path, &items).unwrap();
        assert_eq!(load_playlist_file(&path).unwrap(), items);
    }

    #[test]
    fn test_format_playlist_file() {
        let items = vec![PlaylistItem::new(
            WavePreset::new(vec![OscillatorParams::new(1.0)], vec![]),
            5.0,
        )];
        assert_eq!(
            format_playlist_file(&items),
            "ITEM\nDURATION: 5.000\nL:S1.000\nR:\n"
        );
    }

    #[test]
    fn test_describe_preset() {
        let preset = parse_wave_file("L:S1,S2\nR:S3\n");
        assert_eq!(describe_preset(&preset), "2L/1R");
    }
}
