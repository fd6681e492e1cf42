use crate::HolidayLightsApp;

/// Largest size with the photo's aspect ratio that fits in `available`
pub fn canvas_size(available: egui::Vec2, aspect_ratio: f32) -> egui::Vec2 {
    if available.x <= 0.0 || available.y <= 0.0 || aspect_ratio <= 0.0 {
        return egui::Vec2::ZERO;
    }
    if available.x / available.y > aspect_ratio {
        egui::vec2(available.y * aspect_ratio, available.y)
    } else {
        egui::vec2(available.x, available.x / aspect_ratio)
    }
}

pub fn central_panel(app: &mut HolidayLightsApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let Some(aspect_ratio) = app.session.image().map(|image| image.aspect_ratio()) else {
            ui.centered_and_justified(|ui| {
                ui.label("No photo loaded");
            });
            return;
        };

        let available = ui.available_rect_before_wrap();
        let size = canvas_size(available.size(), aspect_ratio);
        let canvas_rect = egui::Rect::from_center_size(available.center(), size);
        let response = ui.allocate_rect(canvas_rect, egui::Sense::drag());

        app.session.set_canvas_rect(canvas_rect);
        app.input.set_canvas_rect(canvas_rect);
        for event in app.input.process_input(ctx, response.contains_pointer()) {
            app.session.handle_input(&event);
        }

        let painter = ui.painter_at(canvas_rect);
        app.renderer.render(ctx, &painter, &app.session);
    });

    if let Some(texture) = &app.generated {
        let mut open = true;
        egui::Window::new("Photorealistic render")
            .open(&mut open)
            .resizable(true)
            .default_width(480.0)
            .show(ctx, |ui| {
                ui.add(egui::Image::new(texture).shrink_to_fit());
            });
        if !open {
            app.generated = None;
        }
    }
}
