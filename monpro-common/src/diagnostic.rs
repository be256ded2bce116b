//! Diagnostic domain types
//!
//! Shared between the wizard state machine (which builds submissions) and
//! the diagnostic service (which validates and processes them). The wire
//! format is camelCase JSON, matching the `POST /api/diagnostic` contract.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Supported market regions
///
/// Region only affects currency labeling in question text and the
/// currency code attached to battlecard ROI estimates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    India,
    Europe,
    Uk,
}

impl Region {
    /// Parse a lowercase region identifier; anything else is rejected
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "india" => Some(Region::India),
            "europe" => Some(Region::Europe),
            "uk" => Some(Region::Uk),
            _ => None,
        }
    }

    /// ISO currency code for ROI estimates
    pub fn currency_code(&self) -> &'static str {
        match self {
            Region::India => "INR",
            Region::Europe => "EUR",
            Region::Uk => "GBP",
        }
    }

    /// Currency symbol used when relabeling question text
    pub fn currency_symbol(&self) -> &'static str {
        match self {
            Region::India => "₹",
            Region::Europe => "€",
            Region::Uk => "£",
        }
    }

    /// Wire identifier (lowercase)
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::India => "india",
            Region::Europe => "europe",
            Region::Uk => "uk",
        }
    }
}

/// Persona bucket selecting which question set a user answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserPath {
    /// Active e-commerce with existing order volume
    Scaler,
    /// Pre-launch or early stage
    Founder,
    /// Service / agency / B2B operations
    Operator,
    /// Researching, no concrete project yet
    Explorer,
}

impl UserPath {
    /// Parse a lowercase path identifier; anything else is rejected
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "scaler" => Some(UserPath::Scaler),
            "founder" => Some(UserPath::Founder),
            "operator" => Some(UserPath::Operator),
            "explorer" => Some(UserPath::Explorer),
            _ => None,
        }
    }

    /// Wire identifier (lowercase)
    pub fn as_str(&self) -> &'static str {
        match self {
            UserPath::Scaler => "scaler",
            UserPath::Founder => "founder",
            UserPath::Operator => "operator",
            UserPath::Explorer => "explorer",
        }
    }
}

/// How the lead wants to receive their roadmap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod {
    Email,
    Whatsapp,
}

/// A recorded answer: one value for single-select questions, an ordered
/// set of values for multi-select questions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Single(String),
    Multi(Vec<String>),
}

impl AnswerValue {
    /// Whether this answer satisfies the question's select shape
    pub fn is_answered(&self, multi_select: bool) -> bool {
        match (self, multi_select) {
            (AnswerValue::Single(v), false) => !v.is_empty(),
            (AnswerValue::Multi(vs), true) => !vs.is_empty(),
            _ => false,
        }
    }
}

/// Answers keyed by question id
pub type DiagnosticAnswers = BTreeMap<String, AnswerValue>;

/// The payload a user sends once, at the end of the wizard
///
/// Frozen at submit time; validated and sanitized server-side, never
/// mutated after acceptance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticSubmission {
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
    /// RFC 3339 submit timestamp, set client-side when the payload freezes
    pub timestamp: String,
}

/// `POST /api/diagnostic` response body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticResponse {
    pub success: bool,
    pub message: String,
    /// Present (true) only on 7-day cooldown rejections
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooldown: Option<bool>,
    /// Days until the email may submit again, on cooldown rejections
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_remaining: Option<i64>,
}

impl DiagnosticResponse {
    /// The acceptance response, also used on fail-open parse paths
    pub fn received() -> Self {
        Self {
            success: true,
            message: "Assessment received".to_string(),
            cooldown: None,
            days_remaining: None,
        }
    }

    /// A rejection with a short, generic message
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            cooldown: None,
            days_remaining: None,
        }
    }

    /// A cooldown rejection carrying the user-facing countdown
    pub fn throttled(days_remaining: i64) -> Self {
        Self {
            success: false,
            message: format!(
                "Please wait {} more day(s) before submitting again. Your proposal is being prepared.",
                days_remaining
            ),
            cooldown: Some(true),
            days_remaining: Some(days_remaining),
        }
    }
}
