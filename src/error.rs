use thiserror::Error;

/// Errors that can occur during render state transitions
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    /// Attempted to transition between incompatible states
    #[error("Cannot transition from {from}({state}) to {to}")]
    InvalidStateTransition {
        from: &'static str,
        to: &'static str,
        state: String,
    },
    /// Previewing needs at least one committed line
    #[error("Cannot preview without any drawn lines")]
    EmptyLineList,
    /// Previewing needs a light style to color the bulbs
    #[error("No light style selected")]
    NoStyleSelected,
}

/// Errors raised when building a committed stroke
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StrokeError {
    #[error("A stroke needs at least 2 points, got {0}")]
    TooFewPoints(usize),
}

/// Errors raised while reading source image pixels
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PixelAccessError {
    #[error("Pixel data is not readable for this image")]
    Unavailable,
    #[error("Pixel ({x}, {y}) is outside the image")]
    OutOfBounds { x: i64, y: i64 },
}

/// Errors raised while loading a source image
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Failed to read image file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to fetch image from {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Image has zero size")]
    Empty,
}

/// Errors raised while loading the startup configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors raised by the optional image generation service
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("No generation service token configured")]
    MissingToken,

    #[error("Nothing to generate: the line list is empty")]
    NoLines,

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed service response: {0}")]
    Malformed(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Generation failed: {0}")]
    Failed(String),

    #[error("Gave up after {0} polls")]
    Timeout(u32),

    #[error("Generation was cancelled")]
    Cancelled,
}

pub type GenerationResult<T> = Result<T, GenerationError>;
