//! Live text editor buffer
//!
//! The buffer holds `L:{...}` and `R:{...}` lines and is applied only on an
//! explicit user action. Parsing is strict: one bad token rejects the whole
//! buffer so the caller can leave its rows untouched.

use crate::synth::OscillatorParams;
use crate::types::Channel;
use crate::wave::WavePreset;

use super::error::ParseError;
use super::token::{format_rows, parse_row, split_channel_line, tokens};

/// Maximum length of the editor buffer in characters
pub const TEXT_BUFFER_CAPACITY: usize = 2048;

/// Render both channels as `L:{...}\nR:{...}`
pub fn format_text_buffer(preset: &WavePreset) -> String {
    let text = format!(
        "L:{{{}}}\nR:{{{}}}",
        format_rows(&preset.left),
        format_rows(&preset.right)
    );
    clamp_text_buffer(text)
}

/// Truncate to [`TEXT_BUFFER_CAPACITY`] characters
pub fn clamp_text_buffer(mut text: String) -> String {
    if let Some((byte_index, _)) = text.char_indices().nth(TEXT_BUFFER_CAPACITY) {
        text.truncate(byte_index);
    }
    text
}

/// Parse the editor buffer into a preset
///
/// Both channel lines must be present. A later line for the same channel
/// replaces an earlier one; lines that are not channel lines are ignored.
pub fn parse_text_buffer(text: &str) -> Result<WavePreset, ParseError> {
    let mut left: Option<Vec<OscillatorParams>> = None;
    let mut right: Option<Vec<OscillatorParams>> = None;

    for line in text.lines() {
        let Some((channel, body)) = split_channel_line(line) else {
            continue;
        };
        let rows = parse_rows_strict(channel, body)?;
        match channel {
            Channel::Left => left = Some(rows),
            Channel::Right => right = Some(rows),
        }
    }

    Ok(WavePreset {
        left: left.ok_or(ParseError::MissingChannel(Channel::Left))?,
        right: right.ok_or(ParseError::MissingChannel(Channel::Right))?,
    })
}

fn parse_rows_strict(channel: Channel, body: &str) -> Result<Vec<OscillatorParams>, ParseError> {
    tokens(body)
        .map(|(item, token)| {
            parse_row(token).ok_or_else(|| ParseError::InvalidToken {
                channel,
                item,
                token: token.to_string(),
            })
        })
        .collect()
}
