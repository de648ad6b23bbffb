//! Codec error types

use std::path::PathBuf;

use thiserror::Error;

use crate::types::Channel;

/// Failure of the strict (live editor) parser
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Malformed row token; `item` is the 1-based position within the channel
    #[error("Channel {channel}, item {item}: '{token}' is invalid.")]
    InvalidToken {
        channel: Channel,
        item: usize,
        token: String,
    },

    /// No `L:` or `R:` line in the buffer
    #[error("Channel {0} is missing.")]
    MissingChannel(Channel),
}

/// Errors from wave and playlist file operations
#[derive(Error, Debug)]
pub enum CodecError {
    /// File missing, unreadable or not writable
    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl CodecError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CodecError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;
