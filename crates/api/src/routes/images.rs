//! Gallery endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use database::GeneratedImage;
use studio::{GenerateImage, SavedImage};

use crate::error::Result;
use crate::state::AppState;

/// `GET /v1/users/:user_id/images`
pub async fn list(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<GeneratedImage>>> {
    Ok(Json(state.studio.list_images(&user_id).await?))
}

/// `POST /v1/users/:user_id/images`
pub async fn create(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(params): Json<GenerateImage>,
) -> Result<(StatusCode, Json<SavedImage>)> {
    let saved = state.studio.generate_image(&user_id, params).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// `DELETE /v1/users/:user_id/images/:image_id`
pub async fn delete(
    State(state): State<AppState>,
    Path((user_id, image_id)): Path<(String, i64)>,
) -> Result<StatusCode> {
    state.studio.delete_image(&user_id, image_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
