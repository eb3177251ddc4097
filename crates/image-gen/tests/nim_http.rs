//! Exercises `NimClient` against a local axum server.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use image_gen::{AspectRatio, ImageError, ImageGenerator, ImageRequest, NimClient, NimConfig};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

type Seen = Arc<Mutex<Vec<(HeaderMap, Value)>>>;

async fn generate(State(seen): State<Seen>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    seen.lock().await.push((headers, body.clone()));

    match body["prompt"].as_str() {
        Some("forbidden") => (StatusCode::FORBIDDEN, "content filtered").into_response(),
        Some("artifacts") => Json(json!({"artifacts": [{"base64": "AAEC", "seed": 1}]})).into_response(),
        _ => Json(json!({"image": "aGVsbG8="})).into_response(),
    }
}

async fn spawn() -> (String, Seen) {
    let seen: Seen = Arc::default();
    let app = Router::new()
        .route("/v1/genai/sd35", post(generate))
        .with_state(seen.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}/v1/genai/sd35", addr), seen)
}

fn client(url: &str) -> NimClient {
    NimClient::new(NimConfig::default().with_api_key("nvapi-test").with_api_url(url)).unwrap()
}

#[tokio::test]
async fn test_generate_returns_data_url() {
    let (url, seen) = spawn().await;
    let request = ImageRequest::new("a red fox")
        .with_aspect_ratio(AspectRatio::Portrait)
        .with_seed(77)
        .with_negative_prompt("blurry");

    let output = client(&url).generate(&request).await.unwrap();
    assert_eq!(output.url, "data:image/jpeg;base64,aGVsbG8=");
    assert_eq!(output.provider, "nim");
    assert_eq!(output.seed, 77);

    let seen = seen.lock().await;
    let (headers, body) = &seen[0];
    assert_eq!(headers["authorization"], "Bearer nvapi-test");
    assert_eq!(headers["accept"], "application/json");
    assert_eq!(body["aspect_ratio"], "9:16");
    assert_eq!(body["seed"], 77);
    assert_eq!(body["negative_prompt"], "blurry");
}

#[tokio::test]
async fn test_artifacts_response() {
    let (url, _) = spawn().await;
    let output = client(&url)
        .generate(&ImageRequest::new("artifacts"))
        .await
        .unwrap();
    assert_eq!(output.url, "data:image/jpeg;base64,AAEC");
}

#[tokio::test]
async fn test_failure_status_carries_body() {
    let (url, _) = spawn().await;
    let err = client(&url)
        .generate(&ImageRequest::new("forbidden"))
        .await
        .unwrap_err();
    match err {
        ImageError::Status { status, message } => {
            assert_eq!(status, 403);
            assert_eq!(message, "content filtered");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_prompt_never_sent() {
    let (url, seen) = spawn().await;
    let err = client(&url).generate(&ImageRequest::new("  ")).await.unwrap_err();
    assert!(matches!(err, ImageError::EmptyPrompt));
    assert!(seen.lock().await.is_empty());
}
