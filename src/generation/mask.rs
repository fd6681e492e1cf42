//! Black/white line mask handed to the generation service.

use egui::Vec2;
use image::{GrayImage, Luma};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};

use crate::stroke::StrokeRef;

const WHITE: Luma<u8> = Luma([255]);

/// White lines on black, rasterized at container pixel resolution.
///
/// Returns `None` for an unmeasured container.
pub fn rasterize_mask(strokes: &[StrokeRef], container: Vec2, stroke_width: f32) -> Option<GrayImage> {
    if container.x < 1.0 || container.y < 1.0 {
        return None;
    }
    let (width, height) = (container.x.round() as u32, container.y.round() as u32);
    let mut mask = GrayImage::new(width, height);
    let radius = (stroke_width / 2.0).round() as i32;

    for stroke in strokes {
        let vertices = stroke.pixel_points(container);
        for pair in vertices.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            draw_line_segment_mut(&mut mask, (a.x, a.y), (b.x, b.y), WHITE);
            if radius < 1 {
                continue;
            }
            // Stamp discs along the segment to give it width
            let steps = (a.distance(b) / radius as f32).ceil().max(1.0) as usize;
            for i in 0..=steps {
                let p = a.lerp(b, i as f32 / steps as f32);
                draw_filled_circle_mut(&mut mask, (p.x.round() as i32, p.y.round() as i32), radius, WHITE);
            }
        }
    }

    Some(mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::{Point, Stroke};

    #[test]
    fn test_mask_marks_line_pixels_only() {
        let strokes = vec![Stroke::new_ref(vec![Point::new(10.0, 50.0), Point::new(90.0, 50.0)]).unwrap()];
        let mask = rasterize_mask(&strokes, egui::vec2(200.0, 100.0), 8.0).unwrap();

        assert_eq!(mask.dimensions(), (200, 100));
        assert_eq!(mask.get_pixel(100, 50).0, [255]);
        assert_eq!(mask.get_pixel(100, 53).0, [255]);
        assert_eq!(mask.get_pixel(100, 10).0, [0]);
        assert_eq!(mask.get_pixel(5, 50).0, [0]);
    }

    #[test]
    fn test_mask_needs_measured_container() {
        assert!(rasterize_mask(&[], Vec2::ZERO, 8.0).is_none());
    }
}
