//! Ordered model tiers and the state machine that walks them.
//!
//! A chain tries each tier once, in order, and stops at the first success.
//! Vision tiers receive the image part; the text-only fallback does not, and
//! a reply from it carries [`FALLBACK_DISCLAIMER`].

use std::fmt;
use std::sync::Arc;

use tracing::{info, warn};

use crate::error::ChatError;
use crate::history::Conversation;
use crate::model::{ChatModel, CompletionRequest};

/// Appended to replies produced by the text-only tier.
pub const FALLBACK_DISCLAIMER: &str = "\n\n_Note: the vision models are unavailable right now, so this answer comes from a text-only model that could not see the image._";

/// Shown when the last failure was HTTP 402.
pub const QUOTA_MESSAGE: &str =
    "The chat service has run out of credits. Please try again later.";

/// Shown when the last failure was HTTP 429.
pub const RATE_LIMIT_MESSAGE: &str =
    "The chat service is rate limited right now. Please wait a moment and try again.";

/// Position of a tier in the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TierKind {
    Primary,
    Secondary,
    Fallback,
}

impl fmt::Display for TierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TierKind::Primary => "primary",
            TierKind::Secondary => "secondary",
            TierKind::Fallback => "fallback",
        };
        f.write_str(name)
    }
}

/// One candidate model in the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelTier {
    pub kind: TierKind,
    pub model: String,
    pub supports_vision: bool,
}

impl ModelTier {
    pub fn primary(model: impl Into<String>) -> Self {
        Self {
            kind: TierKind::Primary,
            model: model.into(),
            supports_vision: true,
        }
    }

    pub fn secondary(model: impl Into<String>) -> Self {
        Self {
            kind: TierKind::Secondary,
            model: model.into(),
            supports_vision: true,
        }
    }

    pub fn fallback(model: impl Into<String>) -> Self {
        Self {
            kind: TierKind::Fallback,
            model: model.into(),
            supports_vision: false,
        }
    }

    /// Whether a reply from this tier is degraded.
    pub fn is_degraded(&self) -> bool {
        self.kind == TierKind::Fallback
    }
}

/// A failed attempt at one tier.
#[derive(Debug)]
pub struct TierFailure {
    pub tier: ModelTier,
    pub error: ChatError,
}

/// Successful result of a chain run.
#[derive(Debug)]
pub struct ChainReply {
    /// Tier that answered.
    pub tier: ModelTier,
    /// Model reported by the provider.
    pub model: String,
    /// Raw completion text.
    pub text: String,
    /// Earlier tiers that failed.
    pub failures: Vec<TierFailure>,
}

impl ChainReply {
    /// Whether the text-only tier answered.
    pub fn degraded(&self) -> bool {
        self.tier.is_degraded()
    }

    /// Text to store and show, with the disclaimer when degraded.
    pub fn display_text(&self) -> String {
        if self.degraded() {
            format!("{}{}", self.text, FALLBACK_DISCLAIMER)
        } else {
            self.text.clone()
        }
    }
}

/// Every tier failed.
#[derive(Debug, Default)]
pub struct ChainExhausted {
    pub failures: Vec<TierFailure>,
}

impl ChainExhausted {
    /// The failure that ended the run.
    pub fn last_error(&self) -> Option<&ChatError> {
        self.failures.last().map(|f| &f.error)
    }

    /// Human-readable cause, classified on the last failure.
    pub fn user_message(&self) -> String {
        match self.last_error() {
            None => "No chat models are configured.".to_string(),
            Some(error) => match error.status() {
                Some(402) => QUOTA_MESSAGE.to_string(),
                Some(429) => RATE_LIMIT_MESSAGE.to_string(),
                _ => format!("All chat models failed. Last error: {}", error),
            },
        }
    }
}

impl fmt::Display for ChainExhausted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for ChainExhausted {}

enum Step {
    Attempting(usize),
    Success(ChainReply),
    NextTier(usize),
    Exhausted,
}

/// Walks a list of tiers against one backend.
#[derive(Clone)]
pub struct FallbackChain {
    model: Arc<dyn ChatModel>,
    tiers: Vec<ModelTier>,
}

impl FallbackChain {
    pub fn new(model: Arc<dyn ChatModel>, tiers: Vec<ModelTier>) -> Self {
        Self { model, tiers }
    }

    pub fn tiers(&self) -> &[ModelTier] {
        &self.tiers
    }

    /// Try each tier in order until one answers.
    pub async fn run(&self, conversation: &Conversation) -> Result<ChainReply, ChainExhausted> {
        let mut failures = Vec::new();
        let mut step = if self.tiers.is_empty() {
            Step::Exhausted
        } else {
            Step::Attempting(0)
        };

        loop {
            step = match step {
                Step::Attempting(index) => {
                    let tier = &self.tiers[index];
                    let attach_image = tier.supports_vision && conversation.has_image();
                    let request = CompletionRequest {
                        model: tier.model.clone(),
                        messages: conversation.messages(attach_image),
                    };

                    info!(
                        "Attempting {} tier via {}: model={}, image={}",
                        tier.kind,
                        self.model.name(),
                        tier.model,
                        attach_image
                    );

                    match self.model.complete(request).await {
                        Ok(completion) => Step::Success(ChainReply {
                            tier: tier.clone(),
                            model: completion.model,
                            text: completion.text,
                            failures: std::mem::take(&mut failures),
                        }),
                        Err(error) => {
                            warn!("{} tier ({}) failed: {}", tier.kind, tier.model, error);
                            failures.push(TierFailure {
                                tier: tier.clone(),
                                error,
                            });
                            Step::NextTier(index + 1)
                        }
                    }
                }
                Step::NextTier(index) if index < self.tiers.len() => Step::Attempting(index),
                Step::NextTier(_) => Step::Exhausted,
                Step::Success(reply) => {
                    if reply.degraded() {
                        info!("Answered by text-only fallback tier: {}", reply.tier.model);
                    }
                    return Ok(reply);
                }
                Step::Exhausted => {
                    warn!("All {} chat tiers failed", self.tiers.len());
                    return Err(ChainExhausted { failures });
                }
            };
        }
    }
}
