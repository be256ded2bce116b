//! Diagnostic submission endpoint
//!
//! `POST /api/diagnostic` — the one write endpoint of the service.
//!
//! The central invariant: the caller's response is fully decoupled from
//! battlecard generation. Validation, cooldown and the success response
//! all happen synchronously; generation and delivery run in a detached
//! task whose outcome never reaches the caller.

use axum::{
    extract::State,
    http::HeaderMap,
    routing::post,
    Json, Router,
};
use chrono::Utc;
use monpro_common::diagnostic::{DiagnosticResponse, DiagnosticSubmission};
use tracing::{error, info, warn};

use crate::error::{ApiError, ApiResult};
use crate::services::CooldownDecision;
use crate::validate::{validate_submission, RawSubmission};
use crate::AppState;

/// Diagnostic API routes
pub fn diagnostic_routes() -> Router<AppState> {
    Router::new().route("/api/diagnostic", post(submit_diagnostic))
}

/// Best-effort client IP from proxy headers
fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .or_else(|| headers.get("x-real-ip"))
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(',').next().unwrap_or(v).trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// POST /api/diagnostic
///
/// Responses:
/// - 200 on acceptance, and on any body-parse failure (fail-open: lead
///   capture is never blocked by a client-side or transient parsing
///   issue)
/// - 400 on validation failure, with a generic message
/// - 429 on the 7-day cooldown (with `daysRemaining`) or IP flood
pub async fn submit_diagnostic(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> ApiResult<Json<DiagnosticResponse>> {
    let ip = client_ip(&headers);

    if !state.ip_limiter.check(&ip) {
        warn!(ip = %ip, "Request rate limit exceeded");
        return Err(ApiError::TooManyRequests);
    }

    let raw: RawSubmission = match serde_json::from_str(&body) {
        Ok(raw) => raw,
        Err(e) => {
            // Fail-open: still acknowledge so the lead is not lost to a
            // malformed client payload
            error!(ip = %ip, error = %e, "Submission body parse failed; acknowledging anyway");
            return Ok(Json(DiagnosticResponse::received()));
        }
    };

    let submission = match validate_submission(raw) {
        Ok(submission) => submission,
        Err(reason) => {
            warn!(ip = %ip, reason = %reason, "Invalid submission rejected");
            return Err(ApiError::BadRequest(reason.public_message().to_string()));
        }
    };

    let now_ms = Utc::now().timestamp_millis();
    match state
        .cooldown
        .check_and_record(&submission.email, now_ms)
        .await
    {
        Ok(CooldownDecision::Allowed) => {}
        Ok(CooldownDecision::Throttled { days_remaining }) => {
            info!(email = %submission.email, days_remaining, "Submission throttled by cooldown");
            return Err(ApiError::Cooldown { days_remaining });
        }
        Err(e) => {
            // Store failure must not cost the lead; acknowledge and let
            // the battlecard flag the gap in the logs
            error!(error = %e, "Cooldown store unavailable; accepting submission");
        }
    }

    info!(
        email = %submission.email,
        path = submission.path.as_str(),
        region = submission.region.as_str(),
        "Diagnostic submission accepted"
    );

    // Detached background stage; spawned without being awaited so the
    // acknowledgment never waits on analysis
    let background_state = state.clone();
    let background_submission = submission.clone();
    tokio::spawn(async move {
        process_submission(background_state, background_submission).await;
    });

    Ok(Json(DiagnosticResponse::received()))
}

/// Background stage: battlecard generation followed by delivery fan-out
///
/// Both stages are total; anything that goes wrong ends in a log line
/// and never reaches the caller.
async fn process_submission(state: AppState, submission: DiagnosticSubmission) {
    let card = state.generator.generate(&submission).await;
    state.delivery.deliver(&card).await;
    info!(lead_id = %card.lead_id, "Lead processing complete");
}
