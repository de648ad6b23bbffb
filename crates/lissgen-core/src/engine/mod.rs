//! Synth engine and its UI-thread plumbing
//!
//! - [`SynthEngine`]: runs inside the audio callback, owns all phase state
//! - [`SynthCommand`] / [`CommandSender`]: lock-free UI → audio queue
//! - [`SynthAtomics`]: lock-free audio → UI state
//! - [`gc`]: deferred deallocation of snapshots dropped on the audio thread

mod command;
mod engine;
pub mod gc;

pub use command::{command_channel, CommandSender, SynthCommand, COMMAND_QUEUE_CAPACITY};
pub use engine::{SynthAtomics, SynthEngine, MAX_BUFFER_SIZE};
