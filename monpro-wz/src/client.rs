//! Submission client
//!
//! Posts the frozen payload to the diagnostic endpoint and interprets
//! the response: a cooldown rejection surfaces the server's message
//! verbatim, every other failure collapses to a generic submission
//! error.

use monpro_common::diagnostic::{DiagnosticResponse, DiagnosticSubmission};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

use crate::session::{SessionStore, WizardSession};
use crate::state::WizardError;

/// Submission failure as surfaced to the user
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Client-side validation failed before any network call
    #[error("{0}")]
    Validation(WizardError),

    /// The 7-day cooldown; carries the server's wait message verbatim
    #[error("{message}")]
    Cooldown { message: String, days_remaining: i64 },

    /// Any other rejection or transport problem
    #[error("{0}")]
    Failed(String),
}

/// HTTP client for the diagnostic endpoint
pub struct DiagnosticClient {
    client: Client,
    base_url: String,
}

impl DiagnosticClient {
    /// Create a client for the service at `base_url`
    ///
    /// # Panics
    /// Panics if the HTTP client cannot be built (should not happen with
    /// valid defaults)
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// POST the submission and interpret the response
    pub async fn submit(
        &self,
        submission: &DiagnosticSubmission,
    ) -> Result<DiagnosticResponse, SubmitError> {
        let url = format!("{}/api/diagnostic", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(submission)
            .send()
            .await
            .map_err(|e| SubmitError::Failed(format!("Submission failed: {}", e)))?;

        let status = response.status().as_u16();
        let body: DiagnosticResponse = response
            .json()
            .await
            .map_err(|_| SubmitError::Failed("Submission failed".to_string()))?;

        interpret_response(status, body)
    }
}

/// Map an HTTP status + response body to the submit outcome
///
/// Pure so the cooldown/rejection handling is testable without a server.
pub fn interpret_response(
    status: u16,
    body: DiagnosticResponse,
) -> Result<DiagnosticResponse, SubmitError> {
    let ok = (200..300).contains(&status);

    if !ok {
        if status == 429 && body.cooldown == Some(true) {
            return Err(SubmitError::Cooldown {
                message: body.message,
                days_remaining: body.days_remaining.unwrap_or(0),
            });
        }
        return Err(SubmitError::Failed("Submission failed".to_string()));
    }

    if !body.success {
        let message = if body.message.is_empty() {
            "Submission failed".to_string()
        } else {
            body.message
        };
        return Err(SubmitError::Failed(message));
    }

    Ok(body)
}

impl<S: SessionStore> WizardSession<S> {
    /// Validate, freeze, and submit the wizard state
    ///
    /// On success the wizard is cleared and the confirmation marker set;
    /// on any failure the state is untouched so the user stays on the
    /// delivery step with the error message.
    pub async fn submit_via(
        &mut self,
        client: &DiagnosticClient,
        timestamp: String,
        now_ms: i64,
    ) -> Result<DiagnosticResponse, SubmitError> {
        let submission = self
            .state()
            .build_submission(timestamp)
            .map_err(SubmitError::Validation)?;

        let response = client.submit(&submission).await?;
        self.complete_submission(now_ms);
        Ok(response)
    }
}
