//! Battlecard delivery fan-out
//!
//! Three independent steps per battlecard: persist to the vault, forward
//! to the automation webhook, notify the admin channel. Each step logs
//! and swallows its own failure; one failing never stops the others.

use crate::models::Battlecard;
use crate::services::alerts::{AlertBus, LeadAlert};
use chrono::Utc;
use monpro_common::{Error, Result};
use reqwest::Client;
use sqlx::SqlitePool;
use std::time::Duration;
use tracing::{error, info, warn};

/// Outbound webhook client for downstream document generation/delivery
pub struct WebhookClient {
    client: Client,
    url: String,
}

impl WebhookClient {
    /// Create a webhook client for the configured URL
    ///
    /// # Panics
    /// Panics if the HTTP client cannot be built (should not happen with
    /// valid defaults)
    pub fn new(url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .expect("Failed to build HTTP client");

        Self { client, url }
    }

    /// Forward the full battlecard JSON plus a `processedAt` timestamp
    ///
    /// No retry: a non-2xx response or transport failure is an error for
    /// the caller to log. This is the extension point for bounded
    /// retry/backoff.
    pub async fn forward(&self, card: &Battlecard) -> Result<()> {
        let mut payload = serde_json::to_value(card)
            .map_err(|e| Error::Internal(format!("Serialize battlecard: {}", e)))?;
        payload["processedAt"] = serde_json::Value::String(Utc::now().to_rfc3339());

        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::Internal(format!("Webhook request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Internal(format!(
                "Webhook returned error status: {}",
                status
            )));
        }

        Ok(())
    }
}

/// The fan-out: vault, webhook, admin alert
pub struct DeliveryFanout {
    pool: SqlitePool,
    webhook: Option<WebhookClient>,
    alerts: AlertBus,
}

impl DeliveryFanout {
    pub fn new(pool: SqlitePool, webhook: Option<WebhookClient>, alerts: AlertBus) -> Self {
        Self {
            pool,
            webhook,
            alerts,
        }
    }

    /// Alert bus for admin-side subscribers
    pub fn alerts(&self) -> &AlertBus {
        &self.alerts
    }

    /// Run all delivery steps for a completed battlecard
    ///
    /// Infallible by contract: every sub-step failure terminates in a
    /// log line here.
    pub async fn deliver(&self, card: &Battlecard) {
        match crate::db::battlecards::save_battlecard(&self.pool, card).await {
            Ok(()) => info!(lead_id = %card.lead_id, "Battlecard persisted to vault"),
            Err(e) => error!(lead_id = %card.lead_id, error = %e, "Vault persistence failed"),
        }

        match &self.webhook {
            Some(webhook) => match webhook.forward(card).await {
                Ok(()) => info!(lead_id = %card.lead_id, "Battlecard forwarded to automation webhook"),
                Err(e) => error!(lead_id = %card.lead_id, error = %e, "Webhook delivery failed"),
            },
            None => warn!(lead_id = %card.lead_id, "Webhook URL not configured - skipping forward"),
        }

        self.notify_admin(card);
    }

    /// Admin notification: structured log line plus a broadcast alert
    fn notify_admin(&self, card: &Battlecard) {
        info!(
            lead_id = %card.lead_id,
            path = card.path.as_str(),
            region = card.region.as_str(),
            priority = card.priority_score,
            "New lead"
        );
        self.alerts.publish(LeadAlert {
            lead_id: card.lead_id.clone(),
            region: card.region,
            path: card.path,
            priority_score: card.priority_score,
            generated_at: card.generated_at,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monpro_common::diagnostic::{
        DiagnosticAnswers, DiagnosticSubmission, Region, UserPath,
    };
    use crate::models::EstimatedRoi;

    fn card() -> Battlecard {
        let submission = DiagnosticSubmission {
            region: Region::Europe,
            path: UserPath::Scaler,
            answers: DiagnosticAnswers::new(),
            first_name: "Mara".to_string(),
            last_name: "Keller".to_string(),
            brand_name: "Nordwind".to_string(),
            email: "mara@example.com".to_string(),
            delivery_method: None,
            phone: None,
            timestamp: "2026-08-06T10:00:00Z".to_string(),
        };
        Battlecard {
            lead_id: "LEAD_42_test".to_string(),
            region: submission.region,
            path: submission.path,
            answers: submission.answers.clone(),
            first_name: submission.first_name.clone(),
            last_name: submission.last_name.clone(),
            brand_name: submission.brand_name.clone(),
            email: submission.email.clone(),
            delivery_method: None,
            phone: None,
            revenue_leaks: vec!["Cart recovery gap".to_string()],
            manual_friction: vec!["Manual order updates".to_string()],
            recommended_automations: vec!["Abandoned Cart Recovery Flow".to_string()],
            estimated_roi: EstimatedRoi::zero_for_region(Region::Europe),
            priority_score: 64,
            generated_at: Utc::now(),
            raw_data: submission,
        }
    }

    async fn memory_pool() -> SqlitePool {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        crate::db::initialize_schema(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn delivery_persists_and_notifies_without_webhook() {
        let pool = memory_pool().await;

        let alerts = AlertBus::new(8);
        let mut receiver = alerts.subscribe();
        let fanout = DeliveryFanout::new(pool.clone(), None, alerts);

        fanout.deliver(&card()).await;

        let stored = crate::db::battlecards::load_battlecard(&pool, "LEAD_42_test")
            .await
            .unwrap()
            .expect("battlecard persisted");
        assert_eq!(stored.email, "mara@example.com");
        assert_eq!(stored.priority_score, 64);

        let alert = receiver.recv().await.unwrap();
        assert_eq!(alert.lead_id, "LEAD_42_test");
    }

    #[tokio::test]
    async fn webhook_failure_does_not_stop_other_steps() {
        let pool = memory_pool().await;

        // Closed port: forward fails, vault and notify still run
        let webhook = WebhookClient::new("http://127.0.0.1:9/hook".to_string());
        let alerts = AlertBus::new(8);
        let mut receiver = alerts.subscribe();
        let fanout = DeliveryFanout::new(pool.clone(), Some(webhook), alerts);

        fanout.deliver(&card()).await;

        assert!(crate::db::battlecards::load_battlecard(&pool, "LEAD_42_test")
            .await
            .unwrap()
            .is_some());
        assert!(receiver.recv().await.is_ok());
    }
}
