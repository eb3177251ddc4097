//! OpenRouter chat-completions client.

use futures::StreamExt;
use reqwest::{Client, Response};
use tracing::{debug, info};

use crate::api_types::{ApiError, ChatCompletionRequest, ChatCompletionResponse};
use crate::config::ChatBrainConfig;
use crate::error::ChatError;
use crate::model::{ChatModel, Completion, CompletionRequest};
use crate::stream::StreamCollector;
use async_trait::async_trait;

/// A [`ChatModel`] backed by the OpenRouter HTTP API.
pub struct OpenRouterClient {
    client: Client,
    config: ChatBrainConfig,
}

impl OpenRouterClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ChatBrainConfig) -> Result<Self, ChatError> {
        if config.api_key.trim().is_empty() {
            return Err(ChatError::Configuration("OpenRouter API key is empty".to_string()));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ChatError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            "OpenRouterClient initialized: primary={}, secondary={}, fallback={}, stream={}",
            config.primary_model, config.secondary_model, config.fallback_model, config.stream
        );

        Ok(Self { client, config })
    }

    /// Create a client from environment variables.
    ///
    /// See [`ChatBrainConfig::from_env`] for the variables read.
    pub fn from_env() -> Result<Self, ChatError> {
        Self::new(ChatBrainConfig::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &ChatBrainConfig {
        &self.config
    }

    async fn send(&self, request: &ChatCompletionRequest) -> Result<Response, ChatError> {
        let mut builder = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .header("Content-Type", "application/json");

        if let Some(ref referer) = self.config.referer {
            builder = builder.header("HTTP-Referer", referer);
        }
        if let Some(ref title) = self.config.app_title {
            builder = builder.header("X-Title", title);
        }

        let response = builder
            .json(request)
            .send()
            .await
            .map_err(|e| ChatError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ApiError>(&error_text) {
            Ok(api_error) => api_error.error.message,
            Err(_) => error_text,
        };

        Err(ChatError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn read_json(&self, response: Response) -> Result<String, ChatError> {
        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ChatError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        if let Some(error) = completion.error {
            return Err(match error.status() {
                Some(status) => ChatError::Status {
                    status,
                    message: error.message,
                },
                None => ChatError::InvalidResponse(error.message),
            });
        }

        if let Some(usage) = completion.usage {
            debug!(
                "Token usage - prompt: {}, completion: {}, total: {}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        Ok(completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default())
    }

    async fn read_stream(&self, response: Response) -> Result<String, ChatError> {
        let mut body = response.bytes_stream();
        let mut collector = StreamCollector::new();

        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| ChatError::Network(format!("Stream interrupted: {}", e)))?;
            if collector.push(&chunk)? {
                break;
            }
        }

        collector.finish()
    }
}

#[async_trait]
impl ChatModel for OpenRouterClient {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, ChatError> {
        let body = ChatCompletionRequest {
            model: request.model.clone(),
            messages: request.messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            stream: self.config.stream,
        };

        debug!(
            "Sending request to OpenRouter: model={}, messages={}",
            body.model,
            body.messages.len()
        );

        let response = self.send(&body).await?;
        let text = if self.config.stream {
            self.read_stream(response).await?
        } else {
            self.read_json(response).await?
        };

        if text.trim().is_empty() {
            return Err(ChatError::EmptyCompletion);
        }

        Ok(Completion {
            model: request.model,
            text,
        })
    }

    fn name(&self) -> &str {
        "OpenRouter"
    }
}
