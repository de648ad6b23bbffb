//! Canvas program for the Lissajous scope

use std::ops::Range;

use iced::widget::canvas::{Frame, Geometry, Path, Program, Stroke};
use iced::{mouse, Color, Point, Rectangle, Theme};
use lissgen_core::render::TraceFrame;

use crate::theme::{
    END_MARKER_COLOR, SCOPE_BACKGROUND, SCOPE_CIRCLE_COLOR, SCOPE_GRID_COLOR, START_MARKER_COLOR,
    TRACE_COLOR,
};

/// Pixels kept free between the unit circle and the canvas edge
pub const SCOPE_MARGIN: f32 = 20.0;

/// Number of distinct alpha levels the trail is drawn with
///
/// Consecutive segments of one level are stroked as a single polyline.
pub const ALPHA_BANDS: usize = 32;

const TRACE_WIDTH: f32 = 2.0;
const START_MARKER_RADIUS: f32 = 4.0;
const END_MARKER_RADIUS: f32 = 5.0;
const CIRCLE_RINGS: usize = 4;

/// Contiguous vertices drawn with one alpha
#[derive(Debug, Clone, PartialEq)]
pub struct TrailRun {
    /// Vertex indices, at least two
    pub vertices: Range<usize>,
    pub alpha: f32,
}

fn band(alpha: f32) -> usize {
    ((alpha * ALPHA_BANDS as f32) as usize).min(ALPHA_BANDS - 1)
}

/// Split a trail into polylines of equal alpha band
///
/// A segment takes the alpha of its newer vertex. Adjacent runs share their
/// boundary vertex so the drawn line has no gaps.
pub fn trail_runs(frame: &TraceFrame) -> Vec<TrailRun> {
    let vertices = &frame.vertices;
    let mut runs = Vec::new();
    if vertices.len() < 2 {
        return runs;
    }

    let mut start = 0;
    let mut current = band(vertices[1].alpha);
    for end in 2..vertices.len() {
        let next = band(vertices[end].alpha);
        if next != current {
            runs.push(TrailRun {
                vertices: start..end,
                alpha: vertices[end - 1].alpha,
            });
            start = end - 1;
            current = next;
        }
    }
    runs.push(TrailRun {
        vertices: start..vertices.len(),
        alpha: vertices[vertices.len() - 1].alpha,
    });
    runs
}

/// Canvas program drawing one trace frame
pub struct ScopeCanvas<'a> {
    pub frame: &'a TraceFrame,
}

impl<'a> ScopeCanvas<'a> {
    fn to_screen(center: Point, scale: f32, x: f32, y: f32) -> Point {
        // Right channel drives Y, screen Y grows downwards
        Point::new(center.x + x * scale, center.y - y * scale)
    }
}

impl<'a, Message> Program<Message> for ScopeCanvas<'a> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &iced::Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let size = bounds.size();
        frame.fill_rectangle(Point::ORIGIN, size, SCOPE_BACKGROUND);

        let center = frame.center();
        let scale = (size.width.min(size.height) / 2.0 - SCOPE_MARGIN).max(1.0);

        // Grid cross
        let grid = Stroke::default().with_color(SCOPE_GRID_COLOR).with_width(1.0);
        frame.stroke(
            &Path::line(Point::new(0.0, center.y), Point::new(size.width, center.y)),
            grid,
        );
        frame.stroke(
            &Path::line(Point::new(center.x, 0.0), Point::new(center.x, size.height)),
            grid,
        );

        // Range circles at 1/4 .. 4/4 of full scale
        let ring = Stroke::default().with_color(SCOPE_CIRCLE_COLOR).with_width(1.0);
        for i in 1..=CIRCLE_RINGS {
            let radius = scale * i as f32 / CIRCLE_RINGS as f32;
            frame.stroke(&Path::circle(center, radius), ring);
        }

        if self.frame.is_empty() {
            return vec![frame.into_geometry()];
        }

        let vertices = &self.frame.vertices;
        for run in trail_runs(self.frame) {
            let path = Path::new(|builder| {
                let mut points = vertices[run.vertices.clone()]
                    .iter()
                    .map(|v| Self::to_screen(center, scale, v.x, v.y));
                if let Some(first) = points.next() {
                    builder.move_to(first);
                }
                for point in points {
                    builder.line_to(point);
                }
            });
            let color = Color {
                a: run.alpha,
                ..TRACE_COLOR
            };
            frame.stroke(
                &path,
                Stroke::default().with_color(color).with_width(TRACE_WIDTH),
            );
        }

        if let Some((x, y)) = self.frame.start_marker() {
            let point = Self::to_screen(center, scale, x, y);
            frame.fill(&Path::circle(point, START_MARKER_RADIUS), START_MARKER_COLOR);
        }
        if let Some((x, y)) = self.frame.end_marker() {
            let point = Self::to_screen(center, scale, x, y);
            frame.fill(&Path::circle(point, END_MARKER_RADIUS), END_MARKER_COLOR);
        }

        vec![frame.into_geometry()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lissgen_core::render::{build_trace_frame, RenderSettings};
    use lissgen_core::TracePoint;

    fn frame(n: usize) -> TraceFrame {
        let points: Vec<TracePoint> = (0..n)
            .map(|i| TracePoint::new(i as f32, 1.0))
            .collect();
        build_trace_frame(&points, &RenderSettings::default())
    }

    #[test]
    fn test_no_runs_for_empty_frame() {
        assert!(trail_runs(&TraceFrame::default()).is_empty());
    }

    #[test]
    fn test_two_points_one_run() {
        let runs = trail_runs(&frame(2));
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].vertices, 0..2);
        assert_eq!(runs[0].alpha, 1.0);
    }

    #[test]
    fn test_runs_cover_trail_without_gaps() {
        let frame = frame(500);
        let runs = trail_runs(&frame);
        assert!(runs.len() > 1 && runs.len() <= ALPHA_BANDS);
        assert_eq!(runs[0].vertices.start, 0);
        assert_eq!(runs.last().unwrap().vertices.end, 500);
        for pair in runs.windows(2) {
            assert_eq!(pair[0].vertices.end - 1, pair[1].vertices.start);
            assert!(pair[1].alpha >= pair[0].alpha);
        }
        for run in &runs {
            assert!(run.vertices.len() >= 2);
        }
    }
}
