use eframe::egui;
use std::path::Path;

use crate::error::ImageError;
use crate::photo::{ImageSource, SourceImage};

const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// Picks up photos dropped onto the window
#[derive(Debug, Default)]
pub struct FileHandler {
    dropped_files: Vec<egui::DroppedFile>,
}

impl FileHandler {
    pub fn new() -> Self {
        Self {
            dropped_files: Vec::new(),
        }
    }

    /// Collect newly dropped files from the UI context.
    /// Returns true if anything was dropped this frame.
    pub fn check_for_dropped_files(&mut self, ctx: &egui::Context) -> bool {
        let mut new_dropped_files = false;
        ctx.input(|i| {
            if !i.raw.dropped_files.is_empty() {
                self.dropped_files = i.raw.dropped_files.clone();
                new_dropped_files = true;
            }
        });
        new_dropped_files
    }

    /// Decode the first dropped image file. Non-image files are skipped with a warning.
    pub fn take_dropped_image(&mut self) -> Option<Result<SourceImage, ImageError>> {
        let files = std::mem::take(&mut self.dropped_files);
        for file in &files {
            let file_name = display_name(file);
            if !is_image_file(file) {
                log::warn!("Dropped file is not a supported type: {}", file_name);
                continue;
            }
            return Some(load_dropped(file, file_name));
        }
        None
    }

    /// Dim the window while files hover over it
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        use egui::{Align2, Color32, Id, LayerId, Order};

        if ctx.input(|i| i.raw.hovered_files.is_empty()) {
            return;
        }

        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            "Drop a photo of your home",
            egui::FontId::proportional(24.0),
            Color32::WHITE,
        );
    }
}

fn display_name(file: &egui::DroppedFile) -> String {
    if let Some(path) = &file.path {
        path.display().to_string()
    } else if !file.name.is_empty() {
        file.name.clone()
    } else {
        "unknown".to_owned()
    }
}

/// Check if a file is an image based on MIME type or extension
pub fn is_image_file(file: &egui::DroppedFile) -> bool {
    if !file.mime.is_empty() {
        return file.mime.starts_with("image/");
    }
    let name = file
        .path
        .as_deref()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| file.name.clone().into());
    name.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

fn load_dropped(file: &egui::DroppedFile, file_name: String) -> Result<SourceImage, ImageError> {
    if let Some(bytes) = &file.bytes {
        log::info!("Processing image from memory: {} ({} bytes)", file_name, bytes.len());
        return SourceImage::from_bytes(ImageSource::Path(file_name.into()), bytes);
    }
    match &file.path {
        Some(path) => SourceImage::load(ImageSource::Path(path.clone())),
        None => Err(ImageError::Fetch {
            url: file_name,
            reason: "dropped file has no accessible data".to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dropped(name: &str, mime: &str) -> egui::DroppedFile {
        egui::DroppedFile {
            name: name.to_owned(),
            mime: mime.to_owned(),
            ..Default::default()
        }
    }

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file(&dropped("house.JPG", "")));
        assert!(is_image_file(&dropped("blob", "image/webp")));
        assert!(!is_image_file(&dropped("notes.txt", "")));
        assert!(!is_image_file(&dropped("house.png", "text/plain")));
    }

    #[test]
    fn test_dropped_file_without_data() {
        let mut handler = FileHandler::new();
        handler.dropped_files = vec![dropped("notes.txt", ""), dropped("house.png", "")];
        assert!(matches!(handler.take_dropped_image(), Some(Err(ImageError::Fetch { .. }))));
        assert!(handler.take_dropped_image().is_none());
    }
}
