//! The internal sales battlecard
//!
//! Operator-facing analysis artifact produced once per accepted
//! submission. Immutable after creation; never shown to the lead.

use chrono::{DateTime, Utc};
use monpro_common::diagnostic::{
    DeliveryMethod, DiagnosticAnswers, DiagnosticSubmission, Region, UserPath,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// ROI estimate reduced to single representative numbers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimatedRoi {
    /// ISO code derived from region when the generator omits it
    pub currency: String,
    pub monthly_impact: i64,
    pub implementation_cost: i64,
}

impl EstimatedRoi {
    /// Zeroed estimate with the region's currency, used by the fallback
    pub fn zero_for_region(region: Region) -> Self {
        Self {
            currency: region.currency_code().to_string(),
            monthly_impact: 0,
            implementation_cost: 0,
        }
    }
}

/// The internal artifact produced from a submission
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Battlecard {
    pub lead_id: String,
    pub region: Region,
    pub path: UserPath,
    pub answers: DiagnosticAnswers,
    pub first_name: String,
    pub last_name: String,
    pub brand_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_method: Option<DeliveryMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Never empty; fallback text is substituted when generation yields none
    pub revenue_leaks: Vec<String>,
    /// Never empty; fallback text is substituted when generation yields none
    pub manual_friction: Vec<String>,
    /// Catalog names plus "name (confidence: c)" hypothesis strings
    pub recommended_automations: Vec<String>,
    pub estimated_roi: EstimatedRoi,
    /// 0–100; defaults to 50 when the generator omits it
    pub priority_score: u8,
    pub generated_at: DateTime<Utc>,
    /// Full original submission payload for audit
    pub raw_data: DiagnosticSubmission,
}

impl Battlecard {
    /// Generate a lead identifier
    ///
    /// Format: `LEAD_<epoch-ms>_<uuid-fragment>`, sortable by arrival and
    /// collision-safe.
    pub fn new_lead_id(now: DateTime<Utc>) -> String {
        let fragment = Uuid::new_v4().simple().to_string();
        format!("LEAD_{}_{}", now.timestamp_millis(), &fragment[..9])
    }
}
