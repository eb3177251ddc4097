//! Scripted chat model for tests.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::ChatError;
use crate::model::{ChatModel, Completion, CompletionRequest};

/// A canned outcome for one call.
#[derive(Debug, Clone)]
pub enum ScriptedResponse {
    Text(String),
    Status { status: u16, message: String },
    Network(String),
}

impl ScriptedResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }
}

/// A model that replays queued responses per model id and records every
/// request it receives.
///
/// A model with nothing queued fails with a network error.
#[derive(Debug, Default)]
pub struct ScriptedModel {
    script: Mutex<HashMap<String, VecDeque<ScriptedResponse>>>,
    calls: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for `model`.
    pub async fn push(&self, model: &str, response: ScriptedResponse) {
        self.script
            .lock()
            .await
            .entry(model.to_string())
            .or_default()
            .push_back(response);
    }

    /// Requests received so far, in order.
    pub async fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, ChatError> {
        self.calls.lock().await.push(request.clone());

        let next = self
            .script
            .lock()
            .await
            .get_mut(&request.model)
            .and_then(VecDeque::pop_front);

        match next {
            Some(ScriptedResponse::Text(text)) => Ok(Completion {
                model: request.model,
                text,
            }),
            Some(ScriptedResponse::Status { status, message }) => {
                Err(ChatError::Status { status, message })
            }
            Some(ScriptedResponse::Network(message)) => Err(ChatError::Network(message)),
            None => Err(ChatError::Network(format!(
                "no scripted response for {}",
                request.model
            ))),
        }
    }

    fn name(&self) -> &str {
        "ScriptedModel"
    }
}
