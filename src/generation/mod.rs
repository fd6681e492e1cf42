//! Optional, best-effort photorealistic render through an external service.
//!
//! Nothing in editing or previewing depends on this module; a failure here
//! only produces an error message for the user.

pub mod client;
pub mod job;
pub mod mask;

pub use client::{
    GenerationService, HttpGenerationService, Prediction, PredictionInput, PredictionRequest,
    PredictionStatus,
};
pub use job::{GenerationJob, JobProgress, PollSettings};
pub use mask::rasterize_mask;

use std::time::Duration;

use crate::config::GenerationConfig;
use crate::error::{GenerationError, GenerationResult};
use crate::photo::{encode_png, png_data_uri};
use crate::state::Session;

impl From<&GenerationConfig> for PollSettings {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            interval: Duration::from_millis(config.poll_interval_ms),
            max_polls: config.max_polls,
        }
    }
}

/// Build the service request for the session's photo and lines
pub fn build_request(session: &Session, config: &GenerationConfig) -> GenerationResult<PredictionRequest> {
    let image = session
        .image()
        .ok_or_else(|| GenerationError::Failed("no photo loaded".to_owned()))?;
    if session.document().is_empty() {
        return Err(GenerationError::NoLines);
    }

    let mask = rasterize_mask(
        session.document().strokes(),
        session.container_size(),
        config.mask_stroke_width_px,
    )
    .ok_or_else(|| GenerationError::Failed("canvas has not been measured yet".to_owned()))?;

    let image_png = image.to_png().map_err(|err| GenerationError::Encode(err.to_string()))?;
    let mask_png = encode_png(&image::DynamicImage::ImageLuma8(mask))
        .map_err(|err| GenerationError::Encode(err.to_string()))?;

    Ok(PredictionRequest {
        version: config.model_version.clone(),
        input: PredictionInput {
            image: png_data_uri(&image_png),
            mask: png_data_uri(&mask_png),
            prompt: config.prompt.clone(),
        },
    })
}
