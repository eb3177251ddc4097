//! Configuration for the OpenRouter chat client and its model tiers.

use std::env;
use std::path::Path;
use std::time::Duration;

use crate::error::ChatError;
use crate::fallback::ModelTier;

/// Default system prompt file name.
pub const DEFAULT_PROMPT_FILE: &str = "CHAT_PROMPT.md";

/// Default OpenRouter API base URL.
pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1";

const DEFAULT_PRIMARY_MODEL: &str = "google/gemini-2.0-flash-exp:free";
const DEFAULT_SECONDARY_MODEL: &str = "meta-llama/llama-3.2-11b-vision-instruct:free";
const DEFAULT_FALLBACK_MODEL: &str = "meta-llama/llama-3.3-70b-instruct:free";

/// Configuration for the chat client.
#[derive(Debug, Clone)]
pub struct ChatBrainConfig {
    /// OpenRouter API base URL.
    pub api_url: String,

    /// API key for authentication.
    pub api_key: String,

    /// Vision-capable model tried first.
    pub primary_model: String,

    /// Vision-capable backup model.
    pub secondary_model: String,

    /// Text-only last resort.
    pub fallback_model: String,

    /// Optional system prompt.
    pub system_prompt: Option<String>,

    /// Maximum tokens for response.
    pub max_tokens: Option<u32>,

    /// Temperature for generation (0.0 - 2.0).
    pub temperature: Option<f32>,

    /// Request SSE streaming responses.
    pub stream: bool,

    /// Per-request timeout. None leaves requests unbounded.
    pub timeout: Option<Duration>,

    /// `HTTP-Referer` attribution header.
    pub referer: Option<String>,

    /// `X-Title` attribution header.
    pub app_title: Option<String>,
}

impl Default for ChatBrainConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            primary_model: DEFAULT_PRIMARY_MODEL.to_string(),
            secondary_model: DEFAULT_SECONDARY_MODEL.to_string(),
            fallback_model: DEFAULT_FALLBACK_MODEL.to_string(),
            system_prompt: None,
            max_tokens: Some(1024),
            temperature: Some(0.7),
            stream: false,
            timeout: None,
            referer: None,
            app_title: Some("Aether Studio".to_string()),
        }
    }
}

impl ChatBrainConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `OPENROUTER_API_KEY` - API key for authentication
    ///
    /// Optional environment variables:
    /// - `OPENROUTER_API_URL` - API URL (default: https://openrouter.ai/api/v1)
    /// - `OPENROUTER_PRIMARY_MODEL` - First vision model
    /// - `OPENROUTER_SECONDARY_MODEL` - Backup vision model
    /// - `OPENROUTER_FALLBACK_MODEL` - Text-only last resort
    /// - `OPENROUTER_MAX_TOKENS` - Max tokens (default: 1024)
    /// - `OPENROUTER_TEMPERATURE` - Temperature (default: 0.7)
    /// - `OPENROUTER_STREAM` - Use streaming responses (default: false)
    /// - `OPENROUTER_TIMEOUT_SECS` - Request timeout (default: none)
    /// - `OPENROUTER_REFERER` - `HTTP-Referer` header
    /// - `OPENROUTER_APP_TITLE` - `X-Title` header (default: Aether Studio)
    /// - `STUDIO_CHAT_SYSTEM_PROMPT` - System prompt (overrides prompt file)
    /// - `STUDIO_CHAT_PROMPT_FILE` - Path to system prompt file (default: CHAT_PROMPT.md)
    pub fn from_env() -> Result<Self, ChatError> {
        let api_key = env::var("OPENROUTER_API_KEY")
            .map_err(|_| ChatError::Configuration("OPENROUTER_API_KEY not set".to_string()))?;

        let defaults = Self::default();

        let api_url = env::var("OPENROUTER_API_URL").unwrap_or(defaults.api_url);
        let primary_model = env::var("OPENROUTER_PRIMARY_MODEL").unwrap_or(defaults.primary_model);
        let secondary_model =
            env::var("OPENROUTER_SECONDARY_MODEL").unwrap_or(defaults.secondary_model);
        let fallback_model =
            env::var("OPENROUTER_FALLBACK_MODEL").unwrap_or(defaults.fallback_model);

        // System prompt: env var takes precedence, then try loading from file
        let system_prompt = if let Ok(prompt) = env::var("STUDIO_CHAT_SYSTEM_PROMPT") {
            Some(prompt)
        } else {
            let prompt_file = env::var("STUDIO_CHAT_PROMPT_FILE")
                .unwrap_or_else(|_| DEFAULT_PROMPT_FILE.to_string());
            load_prompt_file(&prompt_file)
        };

        let max_tokens = env::var("OPENROUTER_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(defaults.max_tokens);

        let temperature = env::var("OPENROUTER_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(defaults.temperature);

        let stream = env::var("OPENROUTER_STREAM")
            .ok()
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(false);

        let timeout = env::var("OPENROUTER_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs);

        let referer = env::var("OPENROUTER_REFERER").ok();
        let app_title = env::var("OPENROUTER_APP_TITLE").ok().or(defaults.app_title);

        Ok(Self {
            api_url,
            api_key,
            primary_model,
            secondary_model,
            fallback_model,
            system_prompt,
            max_tokens,
            temperature,
            stream,
            timeout,
            referer,
            app_title,
        })
    }

    /// Create a new config builder.
    pub fn builder() -> ChatBrainConfigBuilder {
        ChatBrainConfigBuilder::default()
    }

    /// The tiers in the order they are attempted.
    pub fn tiers(&self) -> Vec<ModelTier> {
        vec![
            ModelTier::primary(&self.primary_model),
            ModelTier::secondary(&self.secondary_model),
            ModelTier::fallback(&self.fallback_model),
        ]
    }

    /// Chat completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_url.trim_end_matches('/'))
    }
}

/// Builder for ChatBrainConfig.
#[derive(Debug, Default)]
pub struct ChatBrainConfigBuilder {
    config: ChatBrainConfig,
}

impl ChatBrainConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Set the API URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Set all three tier models.
    pub fn models(
        mut self,
        primary: impl Into<String>,
        secondary: impl Into<String>,
        fallback: impl Into<String>,
    ) -> Self {
        self.config.primary_model = primary.into();
        self.config.secondary_model = secondary.into();
        self.config.fallback_model = fallback.into();
        self
    }

    /// Set the system prompt.
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    /// Set the max tokens.
    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.config.max_tokens = Some(tokens);
        self
    }

    /// Set the temperature.
    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.temperature = Some(temp);
        self
    }

    /// Enable or disable streaming.
    pub fn stream(mut self, stream: bool) -> Self {
        self.config.stream = stream;
        self
    }

    /// Set a request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Load system prompt from a file, keeping the current one if the file is missing.
    pub fn prompt_file(mut self, path: impl AsRef<Path>) -> Self {
        if let Some(prompt) = load_prompt_file(path) {
            self.config.system_prompt = Some(prompt);
        }
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ChatBrainConfig {
        self.config
    }
}

/// Load a prompt from a file path.
///
/// Returns `Some(content)` if the file exists and is non-empty, `None` otherwise.
fn load_prompt_file(path: impl AsRef<Path>) -> Option<String> {
    match std::fs::read_to_string(path.as_ref()) {
        Ok(content) => {
            let trimmed = content.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Err(_) => None,
    }
}
