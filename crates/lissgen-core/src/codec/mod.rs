//! Text and file serialization of row lists
//!
//! - [`token`]: the row token grammar shared by every format
//! - [`text`]: strict parser for the live editor buffer
//! - [`file`]: lenient `.lsj` wave and `.lsjp` playlist files
//!
//! Frequencies are written with 3 decimals, so values with more precision
//! come back rounded after a save and load.

mod error;
mod file;
mod text;
mod token;

pub use error::{CodecError, CodecResult, ParseError};
pub use file::{
    describe_preset, format_playlist_file, format_wave_file, load_playlist_file, load_wave_file,
    parse_playlist_file, parse_wave_file, save_playlist_file, save_wave_file, PLAYLIST_EXTENSION,
    WAVE_EXTENSION,
};
pub use text::{clamp_text_buffer, format_text_buffer, parse_text_buffer, TEXT_BUFFER_CAPACITY};
pub use token::{format_row, format_rows, parse_row, parse_rows_lenient, MUTED_SUFFIX};
