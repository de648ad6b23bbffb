//! LissGen Core - Lissajous synthesizer engine
//!
//! Two channels of summed oscillators are played as stereo audio while the
//! (L, R) signal pair is traced for drawing as a Lissajous curve.
//!
//! - [`synth`]: oscillators and the channel mixer
//! - [`engine`]: the audio-thread producer and its command queue
//! - [`audio`]: cpal output stream
//! - [`trace`]: bounded history shared with the renderer
//! - [`render`]: trace-to-frame contract and frame pacing
//! - [`wave`]: UI-owned row store
//! - [`codec`]: text editor buffer and `.lsj` / `.lsjp` files
//! - [`playlist`]: preset playlist and its sequencer

pub mod audio;
pub mod codec;
pub mod config;
pub mod engine;
pub mod playlist;
pub mod render;
pub mod synth;
pub mod trace;
pub mod types;
pub mod wave;

pub use types::*;
