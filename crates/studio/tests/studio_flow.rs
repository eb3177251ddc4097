//! End-to-end studio flows over in-memory SQLite, a scripted chat model,
//! and stub image generators.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chat_brain::mock::{ScriptedModel, ScriptedResponse};
use chat_brain::{FallbackChain, ModelTier, FALLBACK_DISCLAIMER, QUOTA_MESSAGE, RATE_LIMIT_MESSAGE};
use chrono::{DateTime, Utc};
use database::Database;
use image_gen::{
    async_trait, ImageError, ImageGenerator, ImageOutput, ImageProviders, ImageRequest,
    PollinationsGenerator,
};
use studio::{GenerateImage, Studio, StudioError};

/// Counts calls and fails with a provider error.
#[derive(Default)]
struct BrokenGenerator {
    calls: AtomicUsize,
}

#[async_trait]
impl ImageGenerator for BrokenGenerator {
    async fn generate(&self, _request: &ImageRequest) -> Result<ImageOutput, ImageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ImageError::Status {
            status: 503,
            message: "model warming up".to_string(),
        })
    }

    fn name(&self) -> &str {
        "broken"
    }
}

struct Harness {
    studio: Studio,
    model: Arc<ScriptedModel>,
    broken: Arc<BrokenGenerator>,
}

async fn harness() -> Harness {
    let db = Database::connect_with_pool_size("sqlite::memory:", 1)
        .await
        .unwrap();
    db.migrate().await.unwrap();

    let model = Arc::new(ScriptedModel::new());
    let chain = FallbackChain::new(
        model.clone(),
        vec![
            ModelTier::primary("vision-a"),
            ModelTier::secondary("vision-b"),
            ModelTier::fallback("text-c"),
        ],
    );

    let broken = Arc::new(BrokenGenerator::default());
    let mut providers = ImageProviders::new(Arc::new(PollinationsGenerator::default()));
    providers.register(broken.clone());

    Harness {
        studio: Studio::new(db, providers, chain),
        model,
        broken,
    }
}

fn at(date: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&format!("{}T10:00:00Z", date))
        .unwrap()
        .with_timezone(&Utc)
}

#[tokio::test]
async fn test_streak_scenario() {
    let h = harness().await;
    let studio = &h.studio;

    let first = studio.record_login_at("user_1", at("2024-01-01")).await.unwrap();
    assert_eq!((first.streak, first.is_new_day), (1, true));

    let repeat = studio.record_login_at("user_1", at("2024-01-01")).await.unwrap();
    assert_eq!((repeat.streak, repeat.is_new_day), (1, false));

    let next = studio.record_login_at("user_1", at("2024-01-02")).await.unwrap();
    assert_eq!((next.streak, next.is_new_day), (2, true));

    let gap = studio.record_login_at("user_1", at("2024-01-10")).await.unwrap();
    assert_eq!((gap.streak, gap.is_new_day), (1, true));

    let profile = studio.profile("user_1").await.unwrap().unwrap();
    assert_eq!(profile.current_streak, 1);
    assert_eq!(profile.longest_streak, 2);
    assert_eq!(profile.last_login_date, "2024-01-10");

    let activity = studio.activity("user_1", None).await.unwrap();
    assert_eq!(activity.len(), 3);
    assert_eq!(activity[0].login_date, "2024-01-10");
}

#[tokio::test]
async fn test_generate_saves_and_counts() {
    let h = harness().await;
    let studio = &h.studio;
    studio.record_login_at("user_1", at("2024-01-01")).await.unwrap();

    let mut params = GenerateImage::new("  a paper boat  ");
    params.aspect_ratio = Some("9:16".to_string());
    params.seed = Some(5);
    let saved = studio.generate_image("user_1", params).await.unwrap();

    assert!(saved.id.is_some());
    assert_eq!(saved.prompt, "a paper boat");
    assert_eq!(saved.aspect_ratio, "9:16");
    assert_eq!(
        saved.url,
        "https://gen.pollinations.ai/image/a%20paper%20boat?width=900&height=1600&seed=5&nologo=true"
    );

    let profile = studio.profile("user_1").await.unwrap().unwrap();
    assert_eq!(profile.total_images, 1);

    let gallery = studio.list_images("user_1").await.unwrap();
    assert_eq!(gallery.len(), 1);
    assert_eq!(Some(gallery[0].id), saved.id);
}

#[tokio::test]
async fn test_generate_without_profile_still_saves() {
    let h = harness().await;
    let saved = h
        .studio
        .generate_image("user_1", GenerateImage::new("fox"))
        .await
        .unwrap();
    assert!(saved.id.is_some());
    assert_eq!(saved.aspect_ratio, "16:9");
    assert!(h.studio.profile("user_1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_generate_validation_happens_before_provider() {
    let h = harness().await;

    let mut params = GenerateImage::new("   ");
    params.provider = Some("broken".to_string());
    let err = h.studio.generate_image("user_1", params).await.unwrap_err();
    assert!(matches!(err, StudioError::Validation(_)));

    let mut params = GenerateImage::new("fox");
    params.aspect_ratio = Some("4:3".to_string());
    params.provider = Some("broken".to_string());
    let err = h.studio.generate_image("user_1", params).await.unwrap_err();
    assert!(matches!(err, StudioError::Validation(_)));

    let mut params = GenerateImage::new("fox");
    params.provider = Some("midjourney".to_string());
    let err = h.studio.generate_image("user_1", params).await.unwrap_err();
    assert!(matches!(err, StudioError::Validation(_)));

    assert_eq!(h.broken.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_generate_failure_propagates_and_saves_nothing() {
    let h = harness().await;

    let mut params = GenerateImage::new("fox");
    params.provider = Some("broken".to_string());
    let err = h.studio.generate_image("user_1", params).await.unwrap_err();

    assert!(matches!(err, StudioError::Image(ImageError::Status { status: 503, .. })));
    assert_eq!(h.broken.calls.load(Ordering::SeqCst), 1);
    assert!(h.studio.list_images("user_1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_storage_failure_after_generation_is_swallowed() {
    let h = harness().await;
    h.studio.database().close().await;

    let saved = h
        .studio
        .generate_image("user_1", GenerateImage::new("fox"))
        .await
        .unwrap();
    assert!(saved.id.is_none());
    assert!(saved.url.starts_with("https://gen.pollinations.ai/image/fox?"));
}

#[tokio::test]
async fn test_delete_requires_ownership() {
    let h = harness().await;
    let saved = h
        .studio
        .generate_image("owner", GenerateImage::new("fox"))
        .await
        .unwrap();
    let id = saved.id.unwrap();

    let err = h.studio.delete_image("intruder", id).await.unwrap_err();
    assert!(matches!(err, StudioError::NotFound(_)));
    assert_eq!(h.studio.list_images("owner").await.unwrap().len(), 1);

    h.studio.delete_image("owner", id).await.unwrap();
    assert!(h.studio.list_images("owner").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_chat_falls_back_with_disclaimer() {
    let h = harness().await;
    h.model.push("vision-a", ScriptedResponse::status(500, "boom")).await;
    h.model.push("vision-b", ScriptedResponse::status(500, "boom")).await;
    h.model.push("text-c", ScriptedResponse::text("It looks calm.")).await;

    let reply = h
        .studio
        .send_chat_message("user_1", "How does it feel?", Some("https://img.example/1.png"))
        .await
        .unwrap();

    assert_eq!(reply.role, "bot");
    assert_eq!(reply.text, format!("It looks calm.{}", FALLBACK_DISCLAIMER));

    let calls = h.model.calls().await;
    assert_eq!(calls.len(), 3);
    assert!(calls[0].has_image());
    assert!(calls[1].has_image());
    assert!(!calls[2].has_image());

    let stored = h.studio.messages("user_1").await.unwrap();
    let roles: Vec<&str> = stored.iter().map(|m| m.role.as_str()).collect();
    assert_eq!(roles, vec!["user", "bot"]);
    assert_eq!(stored[0].text, "How does it feel?");
}

#[tokio::test]
async fn test_chat_rate_limited_stores_error() {
    let h = harness().await;
    h.model.push("vision-a", ScriptedResponse::status(500, "boom")).await;
    h.model.push("vision-b", ScriptedResponse::network("reset")).await;
    h.model.push("text-c", ScriptedResponse::status(429, "slow down")).await;

    let reply = h.studio.send_chat_message("user_1", "hi", None).await.unwrap();
    assert_eq!(reply.role, "error");
    assert_eq!(reply.text, RATE_LIMIT_MESSAGE);
}

#[tokio::test]
async fn test_chat_quota_exhausted_stores_error() {
    let h = harness().await;
    for model in ["vision-a", "vision-b", "text-c"] {
        h.model.push(model, ScriptedResponse::status(402, "credits")).await;
    }

    let reply = h.studio.send_chat_message("user_1", "hi", None).await.unwrap();
    assert_eq!(reply.role, "error");
    assert_eq!(reply.text, QUOTA_MESSAGE);
}

#[tokio::test]
async fn test_chat_history_skips_errors_and_new_message_is_last() {
    let h = harness().await;
    for model in ["vision-a", "vision-b", "text-c"] {
        h.model.push(model, ScriptedResponse::status(429, "slow")).await;
    }
    h.studio.send_chat_message("user_1", "first", None).await.unwrap();

    h.model.push("vision-a", ScriptedResponse::text("second answer")).await;
    let reply = h.studio.send_chat_message("user_1", "second", None).await.unwrap();
    assert_eq!(reply.role, "bot");

    let calls = h.model.calls().await;
    let last = calls.last().unwrap();
    // "first" is kept, its error reply is not, and "second" is not duplicated.
    assert_eq!(last.messages.len(), 2);
    assert_eq!(last.messages[0].role, "user");
    assert_eq!(last.messages[1].role, "user");

    let stored = h.studio.messages("user_1").await.unwrap();
    let roles: Vec<&str> = stored.iter().map(|m| m.role.as_str()).collect();
    assert_eq!(roles, vec!["user", "error", "user", "bot"]);

    assert_eq!(h.studio.clear_messages("user_1").await.unwrap(), 4);
    assert!(h.studio.messages("user_1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_blank_user_id_rejected() {
    let h = harness().await;
    assert!(matches!(
        h.studio.record_login(" ").await,
        Err(StudioError::Validation(_))
    ));
    assert!(matches!(
        h.studio.list_images("").await,
        Err(StudioError::Validation(_))
    ));
}
