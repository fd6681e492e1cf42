//! Douglas–Peucker straightening of freehand strokes.
//!
//! Runs in percentage space, so the tolerance is a fraction of the
//! container rather than a pixel count.

use geo::{LineString, Simplify};

use crate::stroke::Point;

/// Tolerance applied to a freshly drawn stroke
pub const DEFAULT_TOLERANCE: f32 = 1.5;

/// Reduce `points` to the vertices that deviate from their chord by more
/// than `epsilon`.
///
/// The result is a subsequence of the input with both endpoints kept
/// exactly. Fewer than 3 points come back unchanged.
pub fn simplify(points: &[Point], epsilon: f32) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let line: LineString<f32> = points.iter().map(|p| (p.x, p.y)).collect::<Vec<_>>().into();
    line.simplify(&epsilon)
        .into_inner()
        .into_iter()
        .map(|c| Point::new(c.x, c.y))
        .collect()
}

/// Distance from `p` to the segment `a`–`b`, clamping the projection to the segment.
pub fn perpendicular_distance(p: Point, a: Point, b: Point) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + t * dx, a.y + t * dy))
}
