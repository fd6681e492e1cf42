//! Pulls stroke vertices onto nearby strong edges of the source photo.
//!
//! Each vertex searches a square window around its pixel position for the
//! candidate with the largest Sobel gradient magnitude, discounted by how far
//! the candidate is from the original vertex. Candidates below the noise
//! threshold are never taken.

use serde::{Deserialize, Serialize};

use super::simplify::simplify;
use crate::error::PixelAccessError;
use crate::stroke::Point;

/// Read access to grayscale luminance of an image at natural resolution
pub trait PixelSource {
    /// Natural `(width, height)` in pixels
    fn dimensions(&self) -> (u32, u32);

    /// Luminance in `[0, 255]` at pixel `(x, y)`
    fn luminance(&self, x: u32, y: u32) -> Result<f32, PixelAccessError>;
}

/// Rec. 601 luma
pub fn luma(r: u8, g: u8, b: u8) -> f32 {
    0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32
}

impl PixelSource for image::RgbaImage {
    fn dimensions(&self) -> (u32, u32) {
        image::RgbaImage::dimensions(self)
    }

    fn luminance(&self, x: u32, y: u32) -> Result<f32, PixelAccessError> {
        let [r, g, b, _] = self
            .get_pixel_checked(x, y)
            .ok_or(PixelAccessError::OutOfBounds {
                x: x as i64,
                y: y as i64,
            })?
            .0;
        Ok(luma(r, g, b))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapParams {
    /// Search radius as a fraction of the shorter image side
    pub radius_fraction: f32,
    pub min_radius_px: u32,
    pub step_px: u32,
    /// Weighted gradient magnitude a candidate must exceed
    pub threshold: f32,
    /// Douglas–Peucker tolerance for the cleanup pass after snapping
    pub resimplify_tolerance: f32,
}

impl Default for SnapParams {
    fn default() -> Self {
        Self {
            radius_fraction: 0.02,
            min_radius_px: 5,
            step_px: 2,
            threshold: 50.0,
            resimplify_tolerance: 0.5,
        }
    }
}

impl SnapParams {
    pub fn search_radius(&self, width: u32, height: u32) -> u32 {
        let scaled = (width.min(height) as f32 * self.radius_fraction).round() as u32;
        scaled.max(self.min_radius_px)
    }
}

/// Snap every point to the strongest nearby edge, then re-simplify.
///
/// Any pixel read failure aborts the whole pass so the caller can fall back
/// to the unsnapped line.
pub fn snap_to_edges(
    points: &[Point],
    source: &dyn PixelSource,
    params: &SnapParams,
) -> Result<Vec<Point>, PixelAccessError> {
    let (width, height) = source.dimensions();
    if width < 3 || height < 3 {
        return Err(PixelAccessError::Unavailable);
    }

    let radius = params.search_radius(width, height) as i64;
    let step = params.step_px.max(1) as i64;

    let mut snapped = Vec::with_capacity(points.len());
    for point in points {
        let px = (point.x / 100.0 * width as f32).round() as i64;
        let py = (point.y / 100.0 * height as f32).round() as i64;

        let best = strongest_edge(source, px, py, radius, step, params.threshold)?;
        snapped.push(match best {
            Some((x, y)) => Point::new(
                x as f32 / width as f32 * 100.0,
                y as f32 / height as f32 * 100.0,
            ),
            None => *point,
        });
    }

    Ok(simplify(&snapped, params.resimplify_tolerance))
}

/// Snap `points`, or hand them back untouched if the pixels can't be read
pub fn snap_or_passthrough(
    points: &[Point],
    source: &dyn PixelSource,
    params: &SnapParams,
) -> Vec<Point> {
    match snap_to_edges(points, source, params) {
        Ok(snapped) if snapped.len() >= 2 => snapped,
        Ok(_) => points.to_vec(),
        Err(err) => {
            log::warn!("Edge snapping skipped: {}", err);
            points.to_vec()
        }
    }
}

fn strongest_edge(
    source: &dyn PixelSource,
    px: i64,
    py: i64,
    radius: i64,
    step: i64,
    threshold: f32,
) -> Result<Option<(i64, i64)>, PixelAccessError> {
    let (width, height) = source.dimensions();
    let (max_x, max_y) = (width as i64 - 2, height as i64 - 2);
    let reach = radius / step;

    let mut best: Option<(f32, i64, i64)> = None;
    for j in -reach..=reach {
        for i in -reach..=reach {
            let (dx, dy) = (i * step, j * step);
            let (cx, cy) = (px + dx, py + dy);
            // Sobel needs a full 3x3 neighbourhood
            if cx < 1 || cy < 1 || cx > max_x || cy > max_y {
                continue;
            }

            let magnitude = sobel_magnitude(source, cx as u32, cy as u32)?;
            let distance = ((dx * dx + dy * dy) as f32).sqrt();
            let weighted = magnitude / (1.0 + distance / radius as f32);

            if weighted > threshold && best.is_none_or(|(score, _, _)| weighted > score) {
                best = Some((weighted, cx, cy));
            }
        }
    }

    Ok(best.map(|(_, x, y)| (x, y)))
}

fn sobel_magnitude(source: &dyn PixelSource, x: u32, y: u32) -> Result<f32, PixelAccessError> {
    let mut l = [[0.0f32; 3]; 3];
    for (row, dy) in l.iter_mut().zip(0..3) {
        for (cell, dx) in row.iter_mut().zip(0..3) {
            *cell = source.luminance(x + dx - 1, y + dy - 1)?;
        }
    }

    let gx = (l[0][2] + 2.0 * l[1][2] + l[2][2]) - (l[0][0] + 2.0 * l[1][0] + l[2][0]);
    let gy = (l[2][0] + 2.0 * l[2][1] + l[2][2]) - (l[0][0] + 2.0 * l[0][1] + l[0][2]);
    Ok((gx * gx + gy * gy).sqrt())
}
