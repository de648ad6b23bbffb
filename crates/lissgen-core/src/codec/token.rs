//! Row token and channel line grammar
//!
//! A row token is `[S|Q|W]<float>[(M)]`:
//!
//! - optional waveform letter (`S` sine, `Q` square, `W` sawtooth; any other
//!   letter falls back to sine)
//! - frequency in Hz, sign and decimals allowed
//! - optional `(M)` suffix marking the row muted
//!
//! A channel line is `L:` or `R:` followed by comma-separated tokens, with or
//! without surrounding braces.

use crate::synth::{OscillatorParams, Waveform};
use crate::types::Channel;

/// Suffix marking a muted row
pub const MUTED_SUFFIX: &str = "(M)";

/// Format one row, frequency printed with 3 decimals
pub fn format_row(params: &OscillatorParams) -> String {
    format!(
        "{}{:.3}{}",
        params.waveform.prefix(),
        params.frequency,
        if params.muted { MUTED_SUFFIX } else { "" }
    )
}

/// Comma-separated tokens of one channel
pub fn format_rows(rows: &[OscillatorParams]) -> String {
    rows.iter().map(format_row).collect::<Vec<_>>().join(",")
}

/// Parse one row token
///
/// Surrounding whitespace is ignored. Returns `None` for anything that does
/// not yield a finite frequency.
pub fn parse_row(token: &str) -> Option<OscillatorParams> {
    let token = token.trim();
    let (body, muted) = match token.strip_suffix(MUTED_SUFFIX) {
        Some(body) => (body.trim_end(), true),
        None => (token, false),
    };

    let first = body.chars().next()?;
    let (waveform, number) = if first.is_ascii_alphabetic() {
        let waveform =
            Waveform::from_prefix(first.to_ascii_uppercase()).unwrap_or(Waveform::Sine);
        (waveform, &body[first.len_utf8()..])
    } else {
        (Waveform::Sine, body)
    };

    let frequency: f32 = number.trim().parse().ok()?;
    if !frequency.is_finite() {
        return None;
    }

    Some(
        OscillatorParams::new(frequency)
            .with_waveform(waveform)
            .with_muted(muted),
    )
}

/// Non-empty tokens of a channel body with their 1-based positions
pub(crate) fn tokens(body: &str) -> impl Iterator<Item = (usize, &str)> {
    body.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .enumerate()
        .map(|(i, t)| (i + 1, t))
}

/// Parse a channel body, skipping malformed tokens
pub fn parse_rows_lenient(body: &str) -> Vec<OscillatorParams> {
    tokens(body)
        .filter_map(|(item, token)| {
            let row = parse_row(token);
            if row.is_none() {
                log::debug!("Skipping invalid row token {} '{}'", item, token);
            }
            row
        })
        .collect()
}

/// Split `L:...` / `R:...` into its channel and body
///
/// The body has surrounding whitespace and one pair of braces removed.
pub(crate) fn split_channel_line(line: &str) -> Option<(Channel, &str)> {
    let line = line.trim();
    let channel = Channel::ALL
        .into_iter()
        .find(|ch| line.starts_with(ch.tag()) && line[1..].starts_with(':'))?;
    let body = line[2..].trim();
    let body = body
        .strip_prefix('{')
        .and_then(|b| b.strip_suffix('}'))
        .unwrap_or(body);
    Some((channel, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prefixes() {
        let row = parse_row("Q220").unwrap();
        assert_eq!(row.waveform, Waveform::Square);
        assert_eq!(row.frequency, 220.0);
        assert!(!row.muted);

        assert_eq!(parse_row("W110").unwrap().waveform, Waveform::Sawtooth);
        assert_eq!(parse_row("S440").unwrap().waveform, Waveform::Sine);
        assert_eq!(parse_row("440").unwrap().waveform, Waveform::Sine);
        assert_eq!(parse_row("q5").unwrap().waveform, Waveform::Square);
        // Unknown letter selects sine
        assert_eq!(parse_row("X330").unwrap().waveform, Waveform::Sine);
    }

    #[test]
    fn test_parse_muted_and_sign() {
        let row = parse_row(" S-12.5(M) ").unwrap();
        assert_eq!(row.frequency, -12.5);
        assert!(row.muted);

        let row = parse_row("+3.25").unwrap();
        assert_eq!(row.frequency, 3.25);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_row("").is_none());
        assert!(parse_row("S").is_none());
        assert!(parse_row("(M)").is_none());
        assert!(parse_row("S44x").is_none());
        assert!(parse_row("Snan").is_none());
        assert!(parse_row("Sinf").is_none());
        assert!(parse_row("abc").is_none());
    }

    #[test]
    fn test_format_row() {
        let row = OscillatorParams::new(220.0)
            .with_waveform(Waveform::Square)
            .with_muted(true);
        assert_eq!(format_row(&row), "Q220.000(M)");
        assert_eq!(format_row(&OscillatorParams::new(0.12345)), "S0.123");
    }

    #[test]
    fn test_format_rounds_to_three_decimals() {
        let row = OscillatorParams::new(440.0004);
        let parsed = parse_row(&format_row(&row)).unwrap();
        assert_eq!(parsed.frequency, 440.0);
    }

    #[test]
    fn test_lenient_skips_bad_tokens() {
        let rows = parse_rows_lenient("S440, ,bogus,Q220(M),");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].waveform, Waveform::Square);
        assert!(rows[1].muted);
    }

    #[test]
    fn test_split_channel_line() {
        assert_eq!(split_channel_line("L:{S1,S2}"), Some((Channel::Left, "S1,S2")));
        assert_eq!(split_channel_line("  R: W3 "), Some((Channel::Right, "W3")));
        assert_eq!(split_channel_line("R:"), Some((Channel::Right, "")));
        assert_eq!(split_channel_line("X:S1"), None);
        assert_eq!(split_channel_line("L"), None);
        assert_eq!(split_channel_line("LS1"), None);
    }

    #[test]
    fn test_tokens_positions_skip_empties() {
        let positions: Vec<(usize, &str)> = tokens(" a,, b ,").collect();
        assert_eq!(positions, vec![(1, "a"), (2, "b")]);
    }
}
