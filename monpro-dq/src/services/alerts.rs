//! Admin alert channel
//!
//! Broadcast bus for new-lead notifications. Subscribers (an admin
//! dashboard, a notification bridge) attach at will; publishing with no
//! subscribers is not an error.

use chrono::{DateTime, Utc};
use monpro_common::diagnostic::{Region, UserPath};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Notification emitted once per processed lead
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadAlert {
    pub lead_id: String,
    pub region: Region,
    pub path: UserPath,
    pub priority_score: u8,
    pub generated_at: DateTime<Utc>,
}

/// Clonable broadcast bus for lead alerts
#[derive(Clone)]
pub struct AlertBus {
    sender: broadcast::Sender<LeadAlert>,
}

impl AlertBus {
    /// Create a bus retaining up to `capacity` undelivered alerts
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an alert; lagging or absent subscribers are ignored
    pub fn publish(&self, alert: LeadAlert) {
        let _ = self.sender.send(alert);
    }

    /// Subscribe to future alerts
    pub fn subscribe(&self) -> broadcast::Receiver<LeadAlert> {
        self.sender.subscribe()
    }
}
