use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::RgbaImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{ImageError, PixelAccessError};
use crate::geometry::PixelSource;

const STREET_VIEW_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/streetview";
const STREET_VIEW_SIZE: &str = "1024x768";

// Night mode: CSS-style brightness, then contrast, then saturation.
const NIGHT_BRIGHTNESS: f32 = 0.45;
const NIGHT_CONTRAST: f32 = 1.2;
const NIGHT_SATURATION: f32 = 0.8;

/// Where a source photo comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// `data:image/...;base64,...` from an upload
    DataUri(String),
    /// Local file
    Path(PathBuf),
    /// Remote `http(s)` URL, e.g. a street-view capture
    Url(String),
}

impl ImageSource {
    /// Interpret a command-line argument: URLs and data URIs by prefix, anything else is a path
    pub fn parse(arg: &str) -> Self {
        if arg.starts_with("http://") || arg.starts_with("https://") {
            Self::Url(arg.to_owned())
        } else if arg.starts_with("data:") {
            Self::DataUri(arg.to_owned())
        } else {
            Self::Path(PathBuf::from(arg))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::DataUri(uri) => format!("data URI ({} bytes)", uri.len()),
            Self::Path(path) => path.display().to_string(),
            Self::Url(url) => url.clone(),
        }
    }
}

/// A decoded photo at its natural resolution
#[derive(Clone)]
pub struct SourceImage {
    origin: ImageSource,
    pixels: RgbaImage,
}

pub type SourceImageRef = Arc<SourceImage>;

impl std::fmt::Debug for SourceImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceImage")
            .field("origin", &self.origin.describe())
            .field("size", &self.size())
            .finish()
    }
}

impl SourceImage {
    pub fn new(origin: ImageSource, pixels: RgbaImage) -> Result<Self, ImageError> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(ImageError::Empty);
        }
        Ok(Self { origin, pixels })
    }

    /// Load from any supported source. Remote URLs block while fetching.
    pub fn load(source: ImageSource) -> Result<Self, ImageError> {
        let bytes = match &source {
            ImageSource::DataUri(uri) => decode_data_uri(uri)?,
            ImageSource::Path(path) => read_file(path)?,
            ImageSource::Url(url) => fetch_url(url)?,
        };
        Self::from_bytes(source, &bytes)
    }

    pub fn from_bytes(origin: ImageSource, bytes: &[u8]) -> Result<Self, ImageError> {
        let decoded = image::load_from_memory(bytes)?;
        log::debug!(
            "Decoded image {}: {}x{}",
            origin.describe(),
            decoded.width(),
            decoded.height()
        );
        Self::new(origin, decoded.to_rgba8())
    }

    pub fn origin(&self) -> &ImageSource {
        &self.origin
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Natural `[width, height]` in pixels
    pub fn size(&self) -> [usize; 2] {
        [self.pixels.width() as usize, self.pixels.height() as usize]
    }

    /// Height over width, used to size the display container
    pub fn aspect_ratio(&self) -> f32 {
        self.pixels.height() as f32 / self.pixels.width() as f32
    }

    pub fn to_color_image(&self) -> egui::ColorImage {
        to_color_image(&self.pixels)
    }

    /// The photo with the night mode filter applied
    pub fn to_night_color_image(&self) -> egui::ColorImage {
        to_color_image(&night_filter(&self.pixels))
    }

    /// PNG encoding of the photo, for upload to external services
    pub fn to_png(&self) -> Result<Vec<u8>, image::ImageError> {
        encode_png(&image::DynamicImage::ImageRgba8(self.pixels.clone()))
    }
}

impl PixelSource for SourceImage {
    fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    fn luminance(&self, x: u32, y: u32) -> Result<f32, PixelAccessError> {
        self.pixels.luminance(x, y)
    }
}

pub fn to_color_image(pixels: &RgbaImage) -> egui::ColorImage {
    egui::ColorImage::from_rgba_unmultiplied(
        [pixels.width() as usize, pixels.height() as usize],
        pixels.as_raw(),
    )
}

pub fn encode_png(image: &image::DynamicImage) -> Result<Vec<u8>, image::ImageError> {
    let mut bytes = Vec::new();
    image.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)?;
    Ok(bytes)
}

pub fn png_data_uri(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}

/// Darken, add contrast and desaturate. Alpha and geometry are untouched.
pub fn night_filter(pixels: &RgbaImage) -> RgbaImage {
    let mut out = pixels.clone();
    for pixel in out.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        let mut rgb = [r, g, b].map(|c| c as f32 / 255.0 * NIGHT_BRIGHTNESS);
        for c in &mut rgb {
            *c = (*c - 0.5) * NIGHT_CONTRAST + 0.5;
        }
        let gray = 0.299 * rgb[0] + 0.587 * rgb[1] + 0.114 * rgb[2];
        let [r, g, b] = rgb.map(|c| {
            let saturated = gray + (c - gray) * NIGHT_SATURATION;
            (saturated.clamp(0.0, 1.0) * 255.0).round() as u8
        });
        pixel.0 = [r, g, b, a];
    }
    out
}

/// Street-level photo URL for a free-form address
pub fn street_view_url(location: &str, api_key: &str) -> String {
    format!(
        "{}?size={}&location={}&key={}",
        STREET_VIEW_ENDPOINT,
        STREET_VIEW_SIZE,
        encode_uri_component(location),
        encode_uri_component(api_key)
    )
}

/// Percent-encode everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`
fn encode_uri_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

fn decode_data_uri(uri: &str) -> Result<Vec<u8>, ImageError> {
    let invalid = |reason: &str| ImageError::Fetch {
        url: uri.chars().take(32).collect(),
        reason: reason.to_owned(),
    };
    let rest = uri.strip_prefix("data:").ok_or_else(|| invalid("not a data URI"))?;
    let (header, payload) = rest.split_once(',').ok_or_else(|| invalid("missing payload"))?;
    if !header.ends_with(";base64") {
        return Err(invalid("only base64 data URIs are supported"));
    }
    STANDARD
        .decode(payload.trim())
        .map_err(|err| invalid(&err.to_string()))
}

fn read_file(path: &Path) -> Result<Vec<u8>, ImageError> {
    log::info!("Loading image from path: {}", path.display());
    Ok(std::fs::read(path)?)
}

fn fetch_url(url: &str) -> Result<Vec<u8>, ImageError> {
    log::info!("Fetching image: {}", url);
    let response = ehttp::fetch_blocking(&ehttp::Request::get(url)).map_err(|reason| {
        ImageError::Fetch {
            url: url.to_owned(),
            reason,
        }
    })?;
    if !response.ok {
        return Err(ImageError::Fetch {
            url: url.to_owned(),
            reason: format!("{} {}", response.status, response.status_text),
        });
    }
    Ok(response.bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn tiny_png() -> Vec<u8> {
        let pixels = RgbaImage::from_pixel(4, 2, Rgba([200, 100, 50, 255]));
        encode_png(&image::DynamicImage::ImageRgba8(pixels)).unwrap()
    }

    #[test]
    fn test_parse_source() {
        assert_eq!(
            ImageSource::parse("https://example.com/house.jpg"),
            ImageSource::Url("https://example.com/house.jpg".to_owned())
        );
        assert_eq!(
            ImageSource::parse("photos/house.jpg"),
            ImageSource::Path(PathBuf::from("photos/house.jpg"))
        );
        assert!(matches!(ImageSource::parse("data:image/png;base64,AAAA"), ImageSource::DataUri(_)));
    }

    #[test]
    fn test_load_from_data_uri() {
        let uri = png_data_uri(&tiny_png());
        let image = SourceImage::load(ImageSource::DataUri(uri)).unwrap();
        assert_eq!(image.size(), [4, 2]);
        assert!((image.aspect_ratio() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_bad_data_uri() {
        let err = SourceImage::load(ImageSource::DataUri("data:text/plain,hello".to_owned()));
        assert!(matches!(err, Err(ImageError::Fetch { .. })));
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        let err = SourceImage::from_bytes(ImageSource::Path("x.png".into()), b"not an image");
        assert!(matches!(err, Err(ImageError::Decode(_))));
    }

    #[test]
    fn test_night_filter_darkens_and_keeps_alpha() {
        let pixels = RgbaImage::from_pixel(2, 2, Rgba([240, 220, 200, 128]));
        let night = night_filter(&pixels);
        assert_eq!(night.dimensions(), pixels.dimensions());
        let [r, g, b, a] = night.get_pixel(0, 0).0;
        assert!(r < 240 && g < 220 && b < 200);
        assert_eq!(a, 128);
    }

    #[test]
    fn test_street_view_url_encodes_address() {
        let url = street_view_url("1 Main St, Springfield", "k&y");
        assert_eq!(
            url,
            "https://maps.googleapis.com/maps/api/streetview?size=1024x768\
             &location=1%20Main%20St%2C%20Springfield&key=k%26y"
        );
    }
}
