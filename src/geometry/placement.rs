//! Turns committed lines into individual bulbs.
//!
//! Bulbs are spaced by a fixed pixel distance along each line, so the
//! vertices are walked in pixel space and the results are converted back to
//! percentages for drawing.

use egui::{Color32, Pos2, Vec2};
use serde::{Deserialize, Serialize};

use crate::lights::LightStyle;
use crate::stroke::{Point, Stroke, StrokeRef};

/// Relative slack for float error when deciding whether the last step fits on the line
const RATIO_SLACK: f32 = 8.0 * f32::EPSILON;

/// A single rendered bulb
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightInstance {
    pub position: Point,
    pub color: Color32,
    pub glow: Color32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementParams {
    pub spacing_px: f32,
    pub max_per_stroke: usize,
}

impl Default for PlacementParams {
    fn default() -> Self {
        Self {
            spacing_px: 20.0,
            max_per_stroke: 1000,
        }
    }
}

struct Segment {
    start: Pos2,
    end: Pos2,
    /// Arc length at `start`
    offset: f32,
    length: f32,
}

/// Cumulative arc-length table; zero-length segments are dropped
fn arc_length_table(vertices: &[Pos2]) -> (Vec<Segment>, f32) {
    let mut segments = Vec::with_capacity(vertices.len().saturating_sub(1));
    let mut total = 0.0;
    for pair in vertices.windows(2) {
        let length = pair[0].distance(pair[1]);
        if length <= f32::EPSILON {
            continue;
        }
        segments.push(Segment {
            start: pair[0],
            end: pair[1],
            offset: total,
            length,
        });
        total += length;
    }
    (segments, total)
}

/// Bulbs for every line in drawing order
pub fn place_lights(
    strokes: &[StrokeRef],
    style: &LightStyle,
    container: Vec2,
    params: &PlacementParams,
) -> Vec<LightInstance> {
    strokes
        .iter()
        .flat_map(|stroke| place_along(stroke, style, container, params))
        .collect()
}

/// Bulbs for a single line.
///
/// Bulb `i` sits at arc length `i * spacing`, starting on the first vertex,
/// and takes palette entry `i`. At most `max_per_stroke` bulbs are emitted.
pub fn place_along(
    stroke: &Stroke,
    style: &LightStyle,
    container: Vec2,
    params: &PlacementParams,
) -> Vec<LightInstance> {
    if container.x <= 0.0 || container.y <= 0.0 {
        return Vec::new();
    }

    let vertices = stroke.pixel_points(container);
    let (segments, total) = arc_length_table(&vertices);
    let spacing = params.spacing_px;

    let wanted = if spacing > 0.0 && spacing.is_finite() {
        (((total / spacing) * (1.0 + RATIO_SLACK)).floor() as usize).saturating_add(1)
    } else {
        usize::MAX
    };
    let count = wanted.min(params.max_per_stroke);
    if count < wanted {
        log::warn!(
            "Light placement capped at {} bulbs for a {:.1}px line",
            count,
            total
        );
    }

    let mut lights = Vec::with_capacity(count);
    let mut current = 0;
    for index in 0..count {
        let distance = (index as f32 * spacing).min(total);
        while current + 1 < segments.len()
            && segments[current].offset + segments[current].length < distance
        {
            current += 1;
        }

        let position = match segments.get(current) {
            Some(segment) => {
                let t = ((distance - segment.offset) / segment.length).clamp(0.0, 1.0);
                segment.start.lerp(segment.end, t)
            }
            None => vertices[0],
        };

        let Some(position) = Point::from_pixels(position, container) else {
            break;
        };
        lights.push(LightInstance {
            position,
            color: style.color_at(index),
            glow: style.glow,
        });
    }

    lights
}
