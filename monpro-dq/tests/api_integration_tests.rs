//! Integration tests for the diagnostic submission endpoint

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::json;
use tower::util::ServiceExt;

use monpro_dq::services::{
    AlertBus, BattlecardGenerator, DeliveryFanout, MemoryCooldownStore,
};
use monpro_dq::AppState;

/// In-memory database pinned to one connection so every query sees the
/// same database
async fn memory_pool() -> sqlx::SqlitePool {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");

    monpro_dq::db::initialize_schema(&pool)
        .await
        .expect("Failed to initialize database schema");

    pool
}

/// Test helper: app with in-memory database, no LLM credential, no webhook
async fn create_test_app() -> (axum::Router, sqlx::SqlitePool) {
    let pool = memory_pool().await;

    let cooldown = Arc::new(MemoryCooldownStore::new());
    let generator = BattlecardGenerator::new(None);
    let delivery = DeliveryFanout::new(pool.clone(), None, AlertBus::new(100));

    // High request quota so the flood guard never interferes with the
    // cooldown assertions below
    let state = AppState::new(pool.clone(), cooldown, generator, delivery)
        .with_request_quota(10_000);

    (monpro_dq::build_router(state), pool)
}

fn valid_submission_body() -> serde_json::Value {
    json!({
        "region": "india",
        "path": "founder",
        "answers": {
            "product_stage": "prototype",
            "launch_worry": ["technical", "logistics"]
        },
        "firstName": "Anya",
        "lastName": "Rao",
        "brandName": "Bloom",
        "email": "anya@example.com",
        "timestamp": "2026-08-06T10:00:00Z"
    })
}

async fn post_diagnostic(app: axum::Router, body: String) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/diagnostic")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

async fn battlecard_count(pool: &sqlx::SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM battlecards")
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Wait for the detached background stage to persist its battlecard
async fn wait_for_battlecard(pool: &sqlx::SqlitePool) -> bool {
    for _ in 0..200 {
        if battlecard_count(pool).await > 0 {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _pool) = create_test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["module"], "monpro-dq");
}

#[tokio::test]
async fn test_valid_submission_is_accepted() {
    let (app, _pool) = create_test_app().await;

    let (status, json) =
        post_diagnostic(app, valid_submission_body().to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Assessment received");
}

#[tokio::test]
async fn test_resubmission_hits_the_cooldown() {
    let (app, _pool) = create_test_app().await;

    let (status, _) =
        post_diagnostic(app.clone(), valid_submission_body().to_string()).await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) =
        post_diagnostic(app, valid_submission_body().to_string()).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(json["success"], false);
    assert_eq!(json["cooldown"], true);
    assert_eq!(json["daysRemaining"], 7);
    assert!(json["message"].as_str().unwrap().contains("7 more day(s)"));
}

#[tokio::test]
async fn test_cooldown_key_is_the_normalized_email() {
    let (app, _pool) = create_test_app().await;

    let mut body = valid_submission_body();
    body["email"] = json!("Anya@Example.com");
    let (status, _) = post_diagnostic(app.clone(), body.to_string()).await;
    assert_eq!(status, StatusCode::OK);

    // Lowercased variant is the same identity
    let (status, json) =
        post_diagnostic(app, valid_submission_body().to_string()).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(json["cooldown"], true);
}

#[tokio::test]
async fn test_missing_fields_are_rejected() {
    let (app, _pool) = create_test_app().await;

    let mut body = valid_submission_body();
    body.as_object_mut().unwrap().remove("email");
    let (status, json) = post_diagnostic(app, body.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Invalid data");
}

#[tokio::test]
async fn test_invalid_region_and_path_are_rejected() {
    let (app, _pool) = create_test_app().await;

    let mut body = valid_submission_body();
    body["region"] = json!("mars");
    let (status, json) = post_diagnostic(app.clone(), body.to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Invalid region");

    let mut body = valid_submission_body();
    body["path"] = json!("astronaut");
    let (status, json) = post_diagnostic(app, body.to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Invalid path");
}

#[tokio::test]
async fn test_invalid_email_is_rejected_without_recording_cooldown() {
    let (app, pool) = create_test_app().await;

    let mut body = valid_submission_body();
    body["email"] = json!("not-an-email");
    let (status, json) = post_diagnostic(app.clone(), body.to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Invalid email format");

    // No background processing happened for the rejected attempt
    assert_eq!(battlecard_count(&pool).await, 0);

    // And no cooldown entry was written: a valid submission goes through
    let (status, _) = post_diagnostic(app, valid_submission_body().to_string()).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_short_names_are_rejected() {
    let (app, _pool) = create_test_app().await;

    let mut body = valid_submission_body();
    body["firstName"] = json!("A");
    let (status, json) = post_diagnostic(app, body.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Invalid name");
}

#[tokio::test]
async fn test_whatsapp_delivery_requires_phone() {
    let (app, _pool) = create_test_app().await;

    let mut body = valid_submission_body();
    body["deliveryMethod"] = json!("whatsapp");
    let (status, json) = post_diagnostic(app.clone(), body.to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);

    let mut body = valid_submission_body();
    body["deliveryMethod"] = json!("whatsapp");
    body["phone"] = json!("+91 98765 43210");
    let (status, json) = post_diagnostic(app, body.to_string()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
}

#[tokio::test]
async fn test_malformed_body_fails_open() {
    let (app, pool) = create_test_app().await;

    let (status, json) = post_diagnostic(app, "{not json at all".to_string()).await;

    // Lead capture is never blocked by a parsing issue
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Assessment received");

    // But nothing was processed either
    assert_eq!(battlecard_count(&pool).await, 0);
}

#[tokio::test]
async fn test_background_stage_persists_a_fallback_battlecard() {
    let (app, pool) = create_test_app().await;

    let (status, _) = post_diagnostic(app, valid_submission_body().to_string()).await;
    assert_eq!(status, StatusCode::OK);

    // The battlecard lands after the response, from the detached task
    assert!(wait_for_battlecard(&pool).await, "battlecard never persisted");

    let payload: String = sqlx::query_scalar("SELECT payload FROM battlecards LIMIT 1")
        .fetch_one(&pool)
        .await
        .unwrap();
    let card: serde_json::Value = serde_json::from_str(&payload).unwrap();

    // No LLM credential in tests: fallback battlecard shape
    assert_eq!(card["priorityScore"], 50);
    assert_eq!(card["estimatedRoi"]["monthlyImpact"], 0);
    assert_eq!(card["estimatedRoi"]["currency"], "INR");
    assert!(!card["revenueLeaks"].as_array().unwrap().is_empty());
    assert_eq!(card["email"], "anya@example.com");
    assert_eq!(card["rawData"]["firstName"], "Anya");
}

#[tokio::test]
async fn test_ip_flood_guard_rejects_without_cooldown_marker() {
    let pool = memory_pool().await;

    let state = AppState::new(
        pool.clone(),
        Arc::new(MemoryCooldownStore::new()),
        BattlecardGenerator::new(None),
        DeliveryFanout::new(pool.clone(), None, AlertBus::new(100)),
    )
    .with_request_quota(1);
    let app = monpro_dq::build_router(state);

    let (status, _) = post_diagnostic(app.clone(), "{}".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = post_diagnostic(app, "{}".to_string()).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    // Flood rejections never carry the cooldown marker
    assert!(json.get("cooldown").is_none());
}
