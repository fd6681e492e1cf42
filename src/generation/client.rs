//! Request/poll JSON protocol of the image generation service.

use serde::{Deserialize, Serialize};

use crate::config::GenerationConfig;
use crate::error::{GenerationError, GenerationResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub input: PredictionInput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionInput {
    /// Source photo as a PNG data URI
    pub image: String,
    /// Line mask as a PNG data URI
    pub mask: String,
    pub prompt: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionStatus {
    Starting,
    Processing,
    Succeeded,
    Failed,
    Canceled,
}

impl PredictionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Canceled)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub id: String,
    pub status: PredictionStatus,
    #[serde(default)]
    pub output: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
}

impl Prediction {
    /// First image URL in `output`, which may be a string or a list of strings
    pub fn output_url(&self) -> Option<&str> {
        match self.output.as_ref()? {
            serde_json::Value::String(url) => Some(url),
            serde_json::Value::Array(items) => items.iter().find_map(|item| item.as_str()),
            _ => None,
        }
    }
}

/// Transport to the generation service
pub trait GenerationService: Send + Sync {
    fn submit(&self, request: &PredictionRequest) -> GenerationResult<Prediction>;

    fn poll(&self, id: &str) -> GenerationResult<Prediction>;

    /// Download a finished output image
    fn fetch_output(&self, url: &str) -> GenerationResult<Vec<u8>>;
}

/// Blocking HTTP client; run it off the UI thread
#[derive(Debug, Clone)]
pub struct HttpGenerationService {
    endpoint: String,
    token: String,
}

impl HttpGenerationService {
    pub fn new(config: &GenerationConfig) -> GenerationResult<Self> {
        let token = config
            .api_token
            .clone()
            .filter(|token| !token.is_empty())
            .ok_or(GenerationError::MissingToken)?;
        Ok(Self {
            endpoint: config.endpoint.trim_end_matches('/').to_owned(),
            token,
        })
    }

    fn authorized(&self, mut request: ehttp::Request) -> ehttp::Request {
        let auth = format!("Token {}", self.token);
        request.headers = ehttp::Headers::new(&[
            ("Accept", "application/json"),
            ("Content-Type", "application/json"),
            ("Authorization", auth.as_str()),
        ]);
        request
    }

    fn send(&self, request: ehttp::Request) -> GenerationResult<ehttp::Response> {
        let response = ehttp::fetch_blocking(&request).map_err(GenerationError::Transport)?;
        if !response.ok {
            return Err(GenerationError::Status {
                status: response.status,
                body: response.text().unwrap_or_default().to_owned(),
            });
        }
        Ok(response)
    }

    fn send_json(&self, request: ehttp::Request) -> GenerationResult<Prediction> {
        let response = self.send(self.authorized(request))?;
        serde_json::from_slice(&response.bytes).map_err(|err| GenerationError::Malformed(err.to_string()))
    }
}

impl GenerationService for HttpGenerationService {
    fn submit(&self, request: &PredictionRequest) -> GenerationResult<Prediction> {
        let body = serde_json::to_vec(request).map_err(|err| GenerationError::Encode(err.to_string()))?;
        let url = format!("{}/predictions", self.endpoint);
        self.send_json(ehttp::Request::post(url, body))
    }

    fn poll(&self, id: &str) -> GenerationResult<Prediction> {
        let url = format!("{}/predictions/{}", self.endpoint, id);
        self.send_json(ehttp::Request::get(url))
    }

    fn fetch_output(&self, url: &str) -> GenerationResult<Vec<u8>> {
        Ok(self.send(ehttp::Request::get(url))?.bytes)
    }
}
