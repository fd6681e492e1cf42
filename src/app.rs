use futures::channel::oneshot;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::{GenerationError, ImageError};
use crate::file_handler::FileHandler;
use crate::generation::{self, GenerationJob, GenerationService, HttpGenerationService, PollSettings};
use crate::input::InputHandler;
use crate::lights;
use crate::panels::{central_panel, tools_panel};
use crate::photo::{ImageSource, SourceImage, street_view_url};
use crate::renderer::Renderer;
use crate::state::{Session, SessionSettings};

/// Preferences restored between runs. Drawn lines are never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct Preferences {
    pub style_id: String,
    pub edge_snap: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            style_id: lights::default_style().id.to_owned(),
            edge_snap: false,
        }
    }
}

pub struct HolidayLightsApp {
    pub(crate) config: AppConfig,
    pub(crate) session: Session,
    pub(crate) renderer: Renderer,
    pub(crate) input: InputHandler,
    pub(crate) file_handler: FileHandler,
    pub(crate) address: String,
    pub(crate) status: Option<String>,
    pending_image: Option<oneshot::Receiver<Result<SourceImage, ImageError>>>,
    generation_service: Option<Arc<dyn GenerationService>>,
    pub(crate) generation: Option<GenerationJob>,
    pub(crate) generated: Option<egui::TextureHandle>,
}

impl HolidayLightsApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig, initial: Option<ImageSource>) -> Self {
        let preferences: Preferences = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();

        let mut app = Self::with_config(config);
        app.apply_preferences(&preferences);
        if let Some(source) = initial {
            app.load_image(source);
        }
        app
    }

    pub fn with_config(config: AppConfig) -> Self {
        let generation_service = match HttpGenerationService::new(&config.generation) {
            Ok(service) => Some(Arc::new(service) as Arc<dyn GenerationService>),
            Err(err) => {
                log::info!("Photorealistic render disabled: {}", err);
                None
            }
        };
        let mut session = Session::new(SessionSettings::from(&config));
        session.select_style(lights::default_style());

        Self {
            config,
            session,
            renderer: Renderer::new(),
            input: InputHandler::new(egui::Rect::NOTHING),
            file_handler: FileHandler::new(),
            address: String::new(),
            status: None,
            pending_image: None,
            generation_service,
            generation: None,
            generated: None,
        }
    }

    fn apply_preferences(&mut self, preferences: &Preferences) {
        if let Some(style) = lights::find_style(&preferences.style_id) {
            self.session.select_style(style);
        }
        self.session.set_edge_snap(preferences.edge_snap);
    }

    fn preferences(&self) -> Preferences {
        Preferences {
            style_id: self
                .session
                .style()
                .unwrap_or(lights::default_style())
                .id
                .to_owned(),
            edge_snap: self.session.settings().edge_snap,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn generation_available(&self) -> bool {
        self.generation_service.is_some()
    }

    pub fn is_loading_image(&self) -> bool {
        self.pending_image.is_some()
    }

    /// Start loading a photo off the UI thread
    pub fn load_image(&mut self, source: ImageSource) {
        let (sender, receiver) = oneshot::channel();
        log::info!("Loading photo: {}", source.describe());
        std::thread::spawn(move || {
            let _ = sender.send(SourceImage::load(source));
        });
        self.pending_image = Some(receiver);
        self.status = None;
    }

    pub fn load_address(&mut self) {
        let address = self.address.trim().to_owned();
        if address.is_empty() {
            return;
        }
        match &self.config.mapping_api_key {
            Some(key) => self.load_image(ImageSource::Url(street_view_url(&address, key))),
            None => self.status = Some("No mapping service key configured".to_owned()),
        }
    }

    /// Install a new photo and start a fresh session for it
    pub fn set_image(&mut self, image: SourceImage) {
        self.pending_image = None;
        self.cancel_generation();
        self.generated = None;
        self.session.reset(Some(Arc::new(image)));
    }

    /// Back to photo selection
    pub fn reset(&mut self) {
        self.pending_image = None;
        self.cancel_generation();
        self.generated = None;
        self.status = None;
        self.session.reset(None);
    }

    pub fn start_generation(&mut self) {
        let Some(service) = self.generation_service.clone() else {
            self.status = Some(GenerationError::MissingToken.to_string());
            return;
        };
        match generation::build_request(&self.session, &self.config.generation) {
            Ok(request) => {
                self.cancel_generation();
                self.generation = Some(GenerationJob::spawn(
                    service,
                    request,
                    self.session.id(),
                    PollSettings::from(&self.config.generation),
                ));
                self.status = Some("Rendering photo...".to_owned());
            }
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    pub fn cancel_generation(&mut self) {
        if let Some(job) = self.generation.take() {
            job.cancel();
        }
    }

    fn poll_background_work(&mut self, ctx: &egui::Context) {
        if let Some(receiver) = &mut self.pending_image {
            match receiver.try_recv() {
                Ok(Some(Ok(image))) => {
                    self.pending_image = None;
                    self.set_image(image);
                }
                Ok(Some(Err(err))) => {
                    self.pending_image = None;
                    log::error!("Failed to load photo: {}", err);
                    self.status = Some(err.to_string());
                }
                Ok(None) => ctx.request_repaint(),
                Err(oneshot::Canceled) => self.pending_image = None,
            }
        }

        let session_id = self.session.id();
        if let Some(job) = &mut self.generation {
            match job.try_take(session_id) {
                Some(Ok(image)) => {
                    self.generated = Some(ctx.load_texture(
                        "generated_photo",
                        image.to_color_image(),
                        egui::TextureOptions::LINEAR,
                    ));
                    self.status = None;
                    self.generation = None;
                }
                Some(Err(GenerationError::Cancelled)) => self.generation = None,
                Some(Err(err)) => {
                    self.status = Some(err.to_string());
                    self.generation = None;
                }
                None => ctx.request_repaint_after(std::time::Duration::from_millis(250)),
            }
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let (undo, redo) = ctx.input(|i| {
            let command = i.modifiers.command;
            (
                command && !i.modifiers.shift && i.key_pressed(egui::Key::Z),
                command && i.modifiers.shift && i.key_pressed(egui::Key::Z),
            )
        });
        if undo {
            if let Err(err) = self.session.undo() {
                log::debug!("Undo: {}", err);
            }
        }
        if redo {
            if let Err(err) = self.session.redo() {
                log::debug!("Redo: {}", err);
            }
        }
    }
}

impl eframe::App for HolidayLightsApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.preferences());
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_background_work(ctx);

        if self.file_handler.check_for_dropped_files(ctx) {
            match self.file_handler.take_dropped_image() {
                Some(Ok(image)) => self.set_image(image),
                Some(Err(err)) => self.status = Some(err.to_string()),
                None => {}
            }
        }
        self.handle_shortcuts(ctx);

        tools_panel(self, ctx);
        central_panel(self, ctx);

        self.file_handler.preview_files_being_dropped(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferences_round_trip_through_json() {
        let preferences = Preferences {
            style_id: "festive".to_owned(),
            edge_snap: true,
        };
        let json = serde_json::to_string(&preferences).unwrap();
        assert_eq!(serde_json::from_str::<Preferences>(&json).unwrap(), preferences);
        assert_eq!(serde_json::from_str::<Preferences>("{}").unwrap(), Preferences::default());
    }

    #[test]
    fn test_app_without_token_has_no_generation() {
        let mut app = HolidayLightsApp::with_config(AppConfig::default());
        assert!(!app.generation_available());
        app.start_generation();
        assert!(app.generation.is_none());
        assert_eq!(app.status.as_deref(), Some("No generation service token configured"));
    }

    #[test]
    fn test_preferences_are_applied() {
        let mut app = HolidayLightsApp::with_config(AppConfig::default());
        app.apply_preferences(&Preferences {
            style_id: "icy-blue".to_owned(),
            edge_snap: true,
        });
        assert_eq!(app.session().style().map(|s| s.id), Some("icy-blue"));
        assert!(app.preferences().edge_snap);
    }

    fn tiny_photo() -> SourceImage {
        SourceImage::new(
            ImageSource::Path("dropped.png".into()),
            image::RgbaImage::from_pixel(4, 4, image::Rgba([200, 200, 200, 255])),
        )
        .unwrap()
    }

    #[test]
    fn test_new_photo_abandons_pending_load() {
        let mut app = HolidayLightsApp::with_config(AppConfig::default());
        let (sender, receiver) = oneshot::channel();
        app.pending_image = Some(receiver);

        app.set_image(tiny_photo());
        assert!(!app.is_loading_image());
        // The slow load finishing later has nowhere to land
        assert!(sender.send(Ok(tiny_photo())).is_err());
        assert_eq!(app.session().image().map(|i| i.origin().describe()), Some("dropped.png".to_owned()));
    }

    #[test]
    fn test_reset_abandons_pending_load() {
        let mut app = HolidayLightsApp::with_config(AppConfig::default());
        let (_sender, receiver) = oneshot::channel();
        app.pending_image = Some(receiver);

        app.reset();
        assert!(!app.is_loading_image());
        assert!(app.session().image().is_none());
    }
}
