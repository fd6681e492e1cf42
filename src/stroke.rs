use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::StrokeError;

/// A position in percentage-of-container space, both axes in `[0, 100]`.
///
/// Placements stay valid across container resizes because nothing here is
/// tied to pixels. Convert with [`Point::to_pixels`] when a pixel-accurate
/// distance is needed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Pixel position of this point inside a container of `size` pixels
    pub fn to_pixels(self, size: Vec2) -> Pos2 {
        Pos2::new(self.x / 100.0 * size.x, self.y / 100.0 * size.y)
    }

    /// Inverse of [`Point::to_pixels`]. Returns `None` for an unmeasured container.
    pub fn from_pixels(pos: Pos2, size: Vec2) -> Option<Self> {
        if size.x <= 0.0 || size.y <= 0.0 {
            return None;
        }
        Some(Self::new(pos.x / size.x * 100.0, pos.y / size.y * 100.0))
    }

    pub fn distance(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

// Immutable stroke for sharing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    points: Vec<Point>,
}

// Define a reference-counted type alias for Stroke
pub type StrokeRef = Arc<Stroke>;

impl Stroke {
    /// Create a committed stroke. Fewer than 2 points is never a valid line.
    pub fn new(points: Vec<Point>) -> Result<Self, StrokeError> {
        if points.len() < 2 {
            return Err(StrokeError::TooFewPoints(points.len()));
        }
        Ok(Self { points })
    }

    pub fn new_ref(points: Vec<Point>) -> Result<StrokeRef, StrokeError> {
        Self::new(points).map(Arc::new)
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn first(&self) -> Point {
        self.points[0]
    }

    pub fn last(&self) -> Point {
        self.points[self.points.len() - 1]
    }

    /// Vertices converted to pixel space for a container of `size` pixels
    pub fn pixel_points(&self, size: Vec2) -> Vec<Pos2> {
        self.points.iter().map(|p| p.to_pixels(size)).collect()
    }
}

/// Raw points of a gesture that is still being drawn
#[derive(Debug, Clone, Default)]
pub struct MutableStroke {
    points: Vec<Point>,
}

impl MutableStroke {
    pub fn new(start: Point) -> Self {
        Self {
            points: vec![start],
        }
    }

    /// Add a point, skipping exact repeats of the previous one
    pub fn add_point(&mut self, point: Point) {
        if self.points.last() != Some(&point) {
            self.points.push(point);
        }
    }

    // Get a reference to the points for preview
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stroke_requires_two_points() {
        assert_eq!(
            Stroke::new(vec![Point::new(1.0, 1.0)]),
            Err(StrokeError::TooFewPoints(1))
        );
        assert_eq!(Stroke::new(vec![]), Err(StrokeError::TooFewPoints(0)));
        assert!(Stroke::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]).is_ok());
    }

    #[test]
    fn test_pixel_round_trip() {
        let size = Vec2::new(1000.0, 500.0);
        let p = Point::new(10.0, 50.0);
        let px = p.to_pixels(size);
        assert!((px.x - 100.0).abs() < 1e-3);
        assert!((px.y - 250.0).abs() < 1e-3);

        let back = Point::from_pixels(px, size).unwrap();
        assert!(back.distance(p) < 1e-4);
    }

    #[test]
    fn test_from_pixels_unmeasured_container() {
        assert!(Point::from_pixels(Pos2::new(5.0, 5.0), Vec2::ZERO).is_none());
    }

    #[test]
    fn test_mutable_stroke_skips_repeats() {
        let mut stroke = MutableStroke::new(Point::new(1.0, 1.0));
        stroke.add_point(Point::new(1.0, 1.0));
        stroke.add_point(Point::new(2.0, 1.0));
        assert_eq!(stroke.len(), 2);
    }
}
