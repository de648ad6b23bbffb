//! UI module for the LissGen player
//!
//! Built with iced. The app only talks to the synth through the domain
//! layer, which forwards edits over the lock-free command queue.

pub mod app;
pub mod channel_view;
pub mod display_view;
pub mod message;
pub mod playlist_view;

pub use app::LissApp;
