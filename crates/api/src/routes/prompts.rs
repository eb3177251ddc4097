//! Starter prompts and provider listing.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct Prompt {
    pub prompt: &'static str,
}

#[derive(Serialize)]
pub struct Providers {
    pub default: String,
    pub available: Vec<String>,
}

/// `GET /v1/prompts`
pub async fn list() -> Json<Vec<&'static str>> {
    Json(image_gen::POPULAR_PROMPTS.to_vec())
}

/// `GET /v1/prompts/random`
pub async fn random() -> Json<Prompt> {
    Json(Prompt {
        prompt: image_gen::random_prompt(),
    })
}

/// `GET /v1/providers`
pub async fn providers(State(state): State<AppState>) -> Json<Providers> {
    let providers = state.studio.image_providers();
    Json(Providers {
        default: providers.default_name().to_string(),
        available: providers.names(),
    })
}
