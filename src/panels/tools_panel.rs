use crate::HolidayLightsApp;
use crate::generation::JobProgress;
use crate::lights;
use crate::photo::ImageSource;
use crate::state::RenderMode;

pub fn tools_panel(app: &mut HolidayLightsApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(220.0)
        .show(ctx, |ui| {
            if app.session.image().is_none() {
                photo_picker(app, ui);
            } else {
                editor_controls(app, ui);
            }

            if let Some(status) = &app.status {
                ui.separator();
                ui.colored_label(ui.visuals().warn_fg_color, status);
            }
        });
}

fn photo_picker(app: &mut HolidayLightsApp, ui: &mut egui::Ui) {
    ui.heading("Choose a photo");
    ui.label("Drop a photo of your home onto the window, or look up an address.");
    ui.separator();

    ui.label("Address");
    let response = ui.text_edit_singleline(&mut app.address);
    let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
    let can_look_up = !app.is_loading_image() && app.config.mapping_api_key.is_some();
    if ui.add_enabled(can_look_up, egui::Button::new("Street view")).clicked() || (submitted && can_look_up) {
        app.load_address();
    }

    ui.separator();
    ui.label("Image file or URL");
    let mut location = ui.data_mut(|d| d.get_temp::<String>(egui::Id::new("photo_location")).unwrap_or_default());
    ui.text_edit_singleline(&mut location);
    if ui
        .add_enabled(!app.is_loading_image() && !location.trim().is_empty(), egui::Button::new("Open"))
        .clicked()
    {
        app.load_image(ImageSource::parse(location.trim()));
    }
    ui.data_mut(|d| d.insert_temp(egui::Id::new("photo_location"), location));

    if app.is_loading_image() {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Loading photo...");
        });
    }
}

fn editor_controls(app: &mut HolidayLightsApp, ui: &mut egui::Ui) {
    ui.heading("Lights");

    let current = app.session.style().map(|style| style.id);
    for style in lights::styles() {
        ui.horizontal(|ui| {
            let (rect, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
            ui.painter().circle_filled(rect.center(), 5.0, style.primary_color());
            if ui.selectable_label(current == Some(style.id), style.display_name).clicked() {
                app.session.select_style(style);
            }
        });
    }
    ui.separator();

    let session = &mut app.session;
    let has_lines = !session.document().is_empty();
    let label = match session.mode() {
        RenderMode::Editing => "Preview lights",
        RenderMode::Previewing => "Edit lines",
    };
    let can_toggle = session.is_previewing() || (has_lines && session.style().is_some());
    if ui.add_enabled(can_toggle, egui::Button::new(label)).clicked() {
        if let Err(err) = session.toggle_preview() {
            log::warn!("Preview toggle rejected: {}", err);
        }
    }

    let mut night = session.night_mode();
    if ui
        .add_enabled(session.is_previewing(), egui::Checkbox::new(&mut night, "Night mode"))
        .changed()
    {
        session.toggle_night_mode();
    }

    let mut edge_snap = session.settings().edge_snap;
    if ui.checkbox(&mut edge_snap, "Snap lines to edges").changed() {
        session.set_edge_snap(edge_snap);
    }

    ui.separator();
    ui.horizontal(|ui| {
        let can_undo = session.history().can_undo();
        let can_redo = session.history().can_redo();
        if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
            if let Err(err) = session.undo() {
                log::debug!("Undo: {}", err);
            }
        }
        if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
            if let Err(err) = session.redo() {
                log::debug!("Redo: {}", err);
            }
        }
    });
    if ui.add_enabled(has_lines, egui::Button::new("Clear lines")).clicked() {
        session.clear();
    }

    ui.label(format!("Lines: {}", session.document().len()));
    if session.is_previewing() {
        ui.label(format!("Bulbs: {}", session.lights().len()));
    }

    ui.separator();
    generation_controls(app, ui);

    ui.separator();
    if ui.button("New photo").clicked() {
        app.reset();
    }
}

fn generation_controls(app: &mut HolidayLightsApp, ui: &mut egui::Ui) {
    let has_lines = !app.session.document().is_empty();
    match &app.generation {
        Some(job) => {
            let text = match job.progress() {
                JobProgress::Submitting => "Submitting...".to_owned(),
                JobProgress::Waiting { polls, .. } => format!("Rendering ({polls})..."),
                JobProgress::Downloading => "Downloading...".to_owned(),
                JobProgress::Finished => "Done".to_owned(),
            };
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(text);
            });
            if ui.button("Cancel render").clicked() {
                app.cancel_generation();
                app.status = None;
            }
        }
        None => {
            let enabled = app.generation_available() && has_lines;
            let response = ui.add_enabled(enabled, egui::Button::new("Photorealistic render"));
            let response = if app.generation_available() {
                response
            } else {
                response.on_disabled_hover_text("No generation service token configured")
            };
            if response.clicked() {
                app.start_generation();
            }
        }
    }

    if app.generated.is_some() && ui.button("Discard render").clicked() {
        app.generated = None;
    }
}
