//! Image chat endpoints.

use axum::extract::{Path, State};
use axum::Json;
use database::ChatMessage;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SendMessage {
    pub text: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Cleared {
    pub deleted: u64,
}

/// `GET /v1/users/:user_id/chat`
pub async fn list(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<ChatMessage>>> {
    Ok(Json(state.studio.messages(&user_id).await?))
}

/// `POST /v1/users/:user_id/chat`
///
/// Returns the stored reply: role `bot` on success, `error` when every
/// model tier failed.
pub async fn send(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(payload): Json<SendMessage>,
) -> Result<Json<ChatMessage>> {
    let reply = state
        .studio
        .send_chat_message(&user_id, &payload.text, payload.image_url.as_deref())
        .await?;
    Ok(Json(reply))
}

/// `DELETE /v1/users/:user_id/chat`
pub async fn clear(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Cleared>> {
    let deleted = state.studio.clear_messages(&user_id).await?;
    Ok(Json(Cleared { deleted }))
}
