//! monpro-dq library interface
//!
//! Exposes the application state, router construction, and the pipeline
//! services for integration testing.

pub mod api;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod validate;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::services::{BattlecardGenerator, CooldownStore, DeliveryFanout, IpRateLimiter};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Battlecard vault + durable cooldown database
    pub db: SqlitePool,
    /// Injected per-email cooldown store
    pub cooldown: Arc<dyn CooldownStore>,
    /// Coarse per-IP flood guard
    pub ip_limiter: Arc<IpRateLimiter>,
    /// Battlecard generator (LLM or fallback)
    pub generator: Arc<BattlecardGenerator>,
    /// Vault / webhook / admin-alert fan-out
    pub delivery: Arc<DeliveryFanout>,
}

impl AppState {
    pub fn new(
        db: SqlitePool,
        cooldown: Arc<dyn CooldownStore>,
        generator: BattlecardGenerator,
        delivery: DeliveryFanout,
    ) -> Self {
        Self {
            db,
            cooldown,
            ip_limiter: Arc::new(IpRateLimiter::default()),
            generator: Arc::new(generator),
            delivery: Arc::new(delivery),
        }
    }

    /// Override the per-IP request quota
    pub fn with_request_quota(mut self, per_minute: u32) -> Self {
        self.ip_limiter = Arc::new(IpRateLimiter::new(per_minute));
        self
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::diagnostic_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
