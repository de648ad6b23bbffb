//! Render contract between the trace buffer and the scope widget
//!
//! [`build_trace_frame`] turns a trace snapshot into normalized vertices with
//! a recency alpha; the widget only maps them to screen coordinates.
//! [`FrameClock`] paces the UI loop and measures the achieved frame rate.

use std::time::{Duration, Instant};

use crate::types::TracePoint;

/// Lowest selectable render rate
pub const MIN_TARGET_FPS: u32 = 60;
/// Highest selectable render rate
pub const MAX_TARGET_FPS: u32 = 480;
pub const DEFAULT_TARGET_FPS: u32 = 240;

/// Peak values below this are treated as this, so silence does not blow up
pub const MIN_NORMALIZATION_PEAK: f32 = 0.001;

/// Weight of the newest frame in the smoothed FPS readout
const FPS_SMOOTHING: f32 = 0.1;

/// User-facing display options
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    /// Share of the trace history drawn, 1..=100, newest points first
    pub trail_percent: u8,
    /// Draw the start (oldest) and end (newest) markers
    pub show_endpoints: bool,
}

impl RenderSettings {
    pub fn new(trail_percent: u8, show_endpoints: bool) -> Self {
        Self {
            trail_percent: trail_percent.clamp(1, 100),
            show_endpoints,
        }
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self::new(100, true)
    }
}

/// One point of the visible trail
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailVertex {
    /// Left channel, normalized to [-1, 1]
    pub x: f32,
    /// Right channel, normalized to [-1, 1]
    pub y: f32,
    /// `progress²`, 0 for the oldest visible point, 1 for the newest
    pub alpha: f32,
}

/// Everything the scope draws for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TraceFrame {
    /// Visible trail, oldest first
    pub vertices: Vec<TrailVertex>,
    pub show_endpoints: bool,
}

impl TraceFrame {
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Oldest visible point, if markers are enabled
    pub fn start_marker(&self) -> Option<(f32, f32)> {
        self.show_endpoints
            .then(|| self.vertices.first().map(|v| (v.x, v.y)))
            .flatten()
    }

    /// Newest visible point, if markers are enabled
    pub fn end_marker(&self) -> Option<(f32, f32)> {
        self.show_endpoints
            .then(|| self.vertices.last().map(|v| (v.x, v.y)))
            .flatten()
    }
}

/// Number of most recent points drawn for a given history length
pub fn visible_point_count(len: usize, trail_percent: u8) -> usize {
    let count = (len as f32 * trail_percent as f32 / 100.0) as usize;
    count.max(2).min(len)
}

/// Build the frame for a trace snapshot
///
/// Points are scaled by the peak absolute value of the whole snapshot (both
/// channels). Fewer than two points give an empty frame.
pub fn build_trace_frame(points: &[TracePoint], settings: &RenderSettings) -> TraceFrame {
    if points.len() < 2 {
        return TraceFrame {
            vertices: Vec::new(),
            show_endpoints: settings.show_endpoints,
        };
    }

    let peak = points
        .iter()
        .fold(MIN_NORMALIZATION_PEAK, |acc, p| acc.max(p.peak()));

    let count = visible_point_count(points.len(), settings.trail_percent);
    let visible = &points[points.len() - count..];
    let last = (count - 1) as f32;

    let vertices = visible
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let progress = i as f32 / last;
            TrailVertex {
                x: p.left / peak,
                y: p.right / peak,
                alpha: progress * progress,
            }
        })
        .collect();

    TraceFrame {
        vertices,
        show_endpoints: settings.show_endpoints,
    }
}

/// Cooperative frame pacing
///
/// The loop measures the time its frame took, sleeps [`FrameClock::remaining`]
/// and calls [`FrameClock::tick`] at the start of the next frame.
#[derive(Debug, Clone)]
pub struct FrameClock {
    target_fps: u32,
    last_tick: Option<Instant>,
    measured_fps: f32,
}

impl FrameClock {
    pub fn new(target_fps: u32) -> Self {
        Self {
            target_fps: clamp_target_fps(target_fps),
            last_tick: None,
            measured_fps: 0.0,
        }
    }

    pub fn target_fps(&self) -> u32 {
        self.target_fps
    }

    pub fn set_target_fps(&mut self, target_fps: u32) {
        self.target_fps = clamp_target_fps(target_fps);
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.target_fps as f64)
    }

    /// Time left to sleep after a frame that took `elapsed`
    pub fn remaining(&self, elapsed: Duration) -> Duration {
        self.frame_interval().saturating_sub(elapsed)
    }

    /// Mark the start of a frame; returns the time since the previous one
    ///
    /// The first call returns zero.
    pub fn tick(&mut self, now: Instant) -> Duration {
        let dt = match self.last_tick {
            Some(last) => now.saturating_duration_since(last),
            None => Duration::ZERO,
        };
        self.last_tick = Some(now);

        let secs = dt.as_secs_f32();
        if secs > 0.0 {
            let fps = 1.0 / secs;
            self.measured_fps = if self.measured_fps == 0.0 {
                fps
            } else {
                self.measured_fps + (fps - self.measured_fps) * FPS_SMOOTHING
            };
        }
        dt
    }

    /// Smoothed achieved frame rate, 0 before the second tick
    pub fn measured_fps(&self) -> f32 {
        self.measured_fps
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_FPS)
    }
}

pub fn clamp_target_fps(fps: u32) -> u32 {
    fps.clamp(MIN_TARGET_FPS, MAX_TARGET_FPS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize) -> Vec<TracePoint> {
        (0..n).map(|i| TracePoint::new(i as f32, -(i as f32) * 0.5)).collect()
    }

    #[test]
    fn test_too_few_points_is_empty() {
        let settings = RenderSettings::default();
        assert!(build_trace_frame(&[], &settings).is_empty());
        assert!(build_trace_frame(&ramp(1), &settings).is_empty());
        assert!(build_trace_frame(&ramp(1), &settings).start_marker().is_none());
    }

    #[test]
    fn test_normalized_by_global_peak() {
        let points = vec![
            TracePoint::new(0.5, -2.0),
            TracePoint::new(1.0, 0.25),
        ];
        let frame = build_trace_frame(&points, &RenderSettings::default());
        assert_eq!(frame.vertices[0].x, 0.25);
        assert_eq!(frame.vertices[0].y, -1.0);
        assert_eq!(frame.vertices[1].x, 0.5);
    }

    #[test]
    fn test_silence_uses_peak_floor() {
        let points = vec![TracePoint::new(0.0005, 0.0); 4];
        let frame = build_trace_frame(&points, &RenderSettings::default());
        assert!((frame.vertices[0].x - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_alpha_is_progress_squared() {
        let frame = build_trace_frame(&ramp(5), &RenderSettings::default());
        let alphas: Vec<f32> = frame.vertices.iter().map(|v| v.alpha).collect();
        assert_eq!(alphas, vec![0.0, 0.0625, 0.25, 0.5625, 1.0]);
    }

    #[test]
    fn test_trail_keeps_newest_points() {
        let points = ramp(100);
        let frame = build_trace_frame(&points, &RenderSettings::new(10, true));
        assert_eq!(frame.vertices.len(), 10);
        assert_eq!(frame.vertices.last().unwrap().x, 1.0);
        assert_eq!(frame.vertices[0].alpha, 0.0);

        // Never fewer than two points
        let frame = build_trace_frame(&points, &RenderSettings::new(1, true));
        assert_eq!(frame.vertices.len(), 2);
    }

    #[test]
    fn test_endpoint_markers() {
        let frame = build_trace_frame(&ramp(10), &RenderSettings::new(100, true));
        assert_eq!(frame.start_marker(), Some((0.0, 0.0)));
        assert_eq!(frame.end_marker(), Some((1.0, -0.5)));

        let frame = build_trace_frame(&ramp(10), &RenderSettings::new(100, false));
        assert!(frame.start_marker().is_none());
        assert!(frame.end_marker().is_none());
    }

    #[test]
    fn test_trail_percent_clamped() {
        assert_eq!(RenderSettings::new(0, false).trail_percent, 1);
        assert_eq!(RenderSettings::new(200, false).trail_percent, 100);
    }

    #[test]
    fn test_frame_clock_interval_and_remaining() {
        let clock = FrameClock::new(250);
        assert_eq!(clock.frame_interval(), Duration::from_millis(4));
        assert_eq!(clock.remaining(Duration::from_millis(1)), Duration::from_millis(3));
        assert_eq!(clock.remaining(Duration::from_millis(10)), Duration::ZERO);
    }

    #[test]
    fn test_frame_clock_clamps_target() {
        assert_eq!(FrameClock::new(10).target_fps(), MIN_TARGET_FPS);
        let mut clock = FrameClock::default();
        assert_eq!(clock.target_fps(), DEFAULT_TARGET_FPS);
        clock.set_target_fps(1000);
        assert_eq!(clock.target_fps(), MAX_TARGET_FPS);
    }

    #[test]
    fn test_frame_clock_measures_fps() {
        let mut clock = FrameClock::new(100);
        let start = Instant::now();
        assert_eq!(clock.tick(start), Duration::ZERO);
        assert_eq!(clock.measured_fps(), 0.0);
        let dt = clock.tick(start + Duration::from_millis(10));
        assert_eq!(dt, Duration::from_millis(10));
        assert!((clock.measured_fps() - 100.0).abs() < 0.5);
    }
}
