//! Health check endpoint

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

use crate::AppState;

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// GET /health
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "module": "monpro-dq",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
