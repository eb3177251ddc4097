//! Route handlers for the studio API.

pub mod chat;
pub mod health;
pub mod images;
pub mod prompts;
pub mod users;

use axum::middleware;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::auth::require_token;
use crate::state::AppState;

/// Build the router with all routes.
pub fn router(state: AppState) -> Router {
    let v1 = Router::new()
        // Streak and profile
        .route("/users/:user_id/login", post(users::login))
        .route("/users/:user_id/profile", get(users::profile))
        .route("/users/:user_id/activity", get(users::activity))
        // Gallery
        .route(
            "/users/:user_id/images",
            get(images::list).post(images::create),
        )
        .route("/users/:user_id/images/:image_id", delete(images::delete))
        // Chat
        .route(
            "/users/:user_id/chat",
            get(chat::list).post(chat::send).delete(chat::clear),
        )
        // Discovery
        .route("/prompts", get(prompts::list))
        .route("/prompts/random", get(prompts::random))
        .route("/providers", get(prompts::providers))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_token));

    Router::new()
        .route("/health", get(health::health))
        .nest("/v1", v1)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
