//! Lissajous scope
//!
//! Draws a [`TraceFrame`](lissgen_core::render::TraceFrame) on an iced canvas:
//! grid cross, range circles, the trail fading in by recency and optional
//! start/end markers.

mod canvas;
mod view;

pub use canvas::{trail_runs, ScopeCanvas, TrailRun, ALPHA_BANDS, SCOPE_MARGIN};
pub use view::lissajous_scope;
