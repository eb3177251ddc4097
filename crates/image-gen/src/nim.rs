//! NVIDIA NIM client for Stable Diffusion 3.5.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::ImageError;
use crate::generator::{ImageGenerator, ImageOutput, ImageRequest};

/// Default NIM endpoint for SD 3.5 Large.
pub const DEFAULT_NIM_URL: &str =
    "https://ai.api.nvidia.com/v1/genai/stabilityai/stable-diffusion-3-5-large";

/// Configuration for the NIM client.
#[derive(Debug, Clone)]
pub struct NimConfig {
    pub api_url: String,
    pub api_key: String,
    pub cfg_scale: f32,
    pub steps: u32,
    /// Per-request timeout. None leaves requests unbounded.
    pub timeout: Option<Duration>,
}

impl Default for NimConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_NIM_URL.to_string(),
            api_key: String::new(),
            cfg_scale: 5.0,
            steps: 50,
            timeout: None,
        }
    }
}

impl NimConfig {
    /// Create configuration from environment variables.
    ///
    /// Required:
    /// - `NVIDIA_API_KEY`
    ///
    /// Optional:
    /// - `NVIDIA_NIM_URL` - endpoint (default: SD 3.5 Large)
    /// - `NVIDIA_NIM_CFG_SCALE` - guidance scale (default: 5)
    /// - `NVIDIA_NIM_STEPS` - diffusion steps (default: 50)
    /// - `NVIDIA_NIM_TIMEOUT_SECS` - request timeout (default: none)
    pub fn from_env() -> Result<Self, ImageError> {
        let api_key = env::var("NVIDIA_API_KEY")
            .map_err(|_| ImageError::Configuration("NVIDIA_API_KEY not set".to_string()))?;

        let defaults = Self::default();

        Ok(Self {
            api_url: env::var("NVIDIA_NIM_URL").unwrap_or(defaults.api_url),
            api_key,
            cfg_scale: env::var("NVIDIA_NIM_CFG_SCALE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cfg_scale),
            steps: env::var("NVIDIA_NIM_STEPS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.steps),
            timeout: env::var("NVIDIA_NIM_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs),
        })
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[derive(Debug, Serialize)]
struct NimRequest<'a> {
    prompt: &'a str,
    aspect_ratio: &'static str,
    seed: u32,
    cfg_scale: f32,
    steps: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    negative_prompt: Option<&'a str>,
}

/// Generator that calls the NIM SD 3.5 endpoint.
pub struct NimClient {
    client: Client,
    config: NimConfig,
}

impl NimClient {
    pub fn new(config: NimConfig) -> Result<Self, ImageError> {
        if config.api_key.trim().is_empty() {
            return Err(ImageError::Configuration("NVIDIA API key is empty".to_string()));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ImageError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        info!("NimClient initialized: url={}", config.api_url);

        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self, ImageError> {
        Self::new(NimConfig::from_env()?)
    }

    pub fn config(&self) -> &NimConfig {
        &self.config
    }
}

/// Pull base64 image data out of a NIM response and wrap it as a data URL.
///
/// The payload is either `{"image": "..."}` or
/// `{"artifacts": [{"base64": "..."}]}`.
pub fn decode_image(payload: &Value) -> Result<String, ImageError> {
    let encoded = payload
        .get("image")
        .or_else(|| {
            payload
                .get("artifacts")
                .and_then(Value::as_array)
                .and_then(|rows| rows.first())
                .and_then(|row| row.get("base64"))
        })
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ImageError::InvalidResponse("response missing image data".to_string()))?;

    BASE64
        .decode(encoded.as_bytes())
        .map_err(|e| ImageError::InvalidResponse(format!("image is not valid base64: {}", e)))?;

    Ok(format!("data:image/jpeg;base64,{}", encoded))
}

#[async_trait]
impl ImageGenerator for NimClient {
    async fn generate(&self, request: &ImageRequest) -> Result<ImageOutput, ImageError> {
        let prompt = request.validated_prompt()?;
        let seed = request.seed_or_random();

        let body = NimRequest {
            prompt,
            aspect_ratio: request.aspect_ratio.as_str(),
            seed,
            cfg_scale: self.config.cfg_scale,
            steps: self.config.steps,
            negative_prompt: request.negative_prompt.as_deref(),
        };

        debug!(
            "Sending request to NIM: ratio={}, seed={}, steps={}",
            body.aspect_ratio, seed, body.steps
        );

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ImageError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ImageError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| ImageError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        Ok(ImageOutput {
            url: decode_image(&payload)?,
            provider: self.name().to_string(),
            seed,
        })
    }

    fn name(&self) -> &str {
        "nim"
    }
}
