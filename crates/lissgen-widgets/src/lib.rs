//! Shared UI widgets for LissGen
//!
//! ## Architecture (iced 0.14 patterns)
//!
//! - **Render data**: [`TraceFrame`](lissgen_core::render::TraceFrame) is built
//!   in the core crate; widgets only map it to pixels
//! - **View functions**: take data, return `Element<Message>`
//! - **Canvas Programs**: custom rendering
//!
//! ## View Functions
//!
//! - `lissajous_scope`: X/Y scope of the stereo trace

pub mod button_styles;
pub mod scope;
pub mod theme;

pub use scope::{lissajous_scope, trail_runs, ScopeCanvas, TrailRun};
pub use theme::{channel_color, CHANNEL_COLORS, TRACE_COLOR};
