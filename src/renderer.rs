use eframe::egui::{self, Color32, Pos2, Rect, Shape, Stroke as EguiStroke, TextureHandle};
use std::sync::Arc;

use crate::geometry::LightInstance;
use crate::photo::SourceImageRef;
use crate::state::Session;
use crate::stroke::Point;

const LINE_COLOR: Color32 = Color32::from_rgb(0xfa, 0xcc, 0x15);
const LINE_WIDTH: f32 = 3.0;
const BULB_RADIUS: f32 = 4.0;
const GLOW_RADII: [f32; 2] = [8.0, 14.0];

/// GPU textures for the current photo, in normal and night variants
struct PhotoTextures {
    image: SourceImageRef,
    day: TextureHandle,
    night: TextureHandle,
}

#[derive(Default)]
pub struct Renderer {
    textures: Option<PhotoTextures>,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("has_textures", &self.textures.is_some())
            .finish()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self { textures: None }
    }

    /// Upload textures when the session's photo changes
    fn sync_textures(&mut self, ctx: &egui::Context, image: Option<&SourceImageRef>) {
        let Some(image) = image else {
            self.textures = None;
            return;
        };
        if self
            .textures
            .as_ref()
            .is_some_and(|t| Arc::ptr_eq(&t.image, image))
        {
            return;
        }

        log::debug!("Uploading textures for {:?}", image);
        let options = egui::TextureOptions::LINEAR;
        self.textures = Some(PhotoTextures {
            image: image.clone(),
            day: ctx.load_texture("source_photo", image.to_color_image(), options),
            night: ctx.load_texture("source_photo_night", image.to_night_color_image(), options),
        });
    }

    /// Paint the photo plus either the lines or the bulbs, depending on the mode
    pub fn render(&mut self, ctx: &egui::Context, painter: &egui::Painter, session: &Session) {
        self.sync_textures(ctx, session.image());
        let rect = session.canvas_rect();
        if !rect.is_positive() {
            return;
        }

        if let Some(textures) = &self.textures {
            let texture = if session.night_filter_active() {
                &textures.night
            } else {
                &textures.day
            };
            painter.image(
                texture.id(),
                rect,
                Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                Color32::WHITE,
            );
        }

        if session.is_previewing() {
            painter.extend(light_shapes(session.lights(), rect));
        } else {
            for stroke in session.document().strokes() {
                painter.add(line_shape(stroke.points(), rect));
            }
            let gesture = session.tool().preview_points();
            if gesture.len() >= 2 {
                painter.add(line_shape(gesture, rect));
            }
        }
    }
}

fn to_screen(point: Point, rect: Rect) -> Pos2 {
    rect.min + point.to_pixels(rect.size()).to_vec2()
}

pub fn line_shape(points: &[Point], rect: Rect) -> Shape {
    Shape::line(
        points.iter().map(|p| to_screen(*p, rect)).collect(),
        EguiStroke::new(LINE_WIDTH, LINE_COLOR),
    )
}

/// Glow halos first, then bulbs on top, so neighbouring halos never cover a bulb
pub fn light_shapes(lights: &[LightInstance], rect: Rect) -> Vec<Shape> {
    let mut shapes = Vec::with_capacity(lights.len() * (GLOW_RADII.len() + 1));
    for light in lights {
        let center = to_screen(light.position, rect);
        for radius in GLOW_RADII.iter().rev() {
            let fade = BULB_RADIUS / radius;
            shapes.push(Shape::circle_filled(center, *radius, light.glow.gamma_multiply(fade)));
        }
    }
    for light in lights {
        shapes.push(Shape::circle_filled(to_screen(light.position, rect), BULB_RADIUS, light.color));
    }
    shapes
}
