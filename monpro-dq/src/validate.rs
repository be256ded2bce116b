//! Submission validation and sanitization
//!
//! Pure functions: given a raw submission, produce a sanitized
//! `DiagnosticSubmission` or a short machine-safe rejection reason.
//! Never blocks on I/O. Sanitization is a defense-in-depth measure
//! against injection into downstream logs and prompts, not a full HTML
//! sanitizer.

use chrono::Utc;
use monpro_common::diagnostic::{
    DeliveryMethod, DiagnosticAnswers, DiagnosticSubmission, Region, UserPath,
};
use serde::Deserialize;
use thiserror::Error;

/// Length caps applied during sanitization
const MAX_NAME_LEN: usize = 50;
const MAX_BRAND_LEN: usize = 100;
const MAX_EMAIL_LEN: usize = 254;

/// Inbound request body before validation
///
/// Every field is defaulted so a missing field parses cleanly and is
/// rejected by the explicit checks below (a wholly unparseable body is
/// the endpoint's fail-open path instead).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSubmission {
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub answers: DiagnosticAnswers,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub brand_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub delivery_method: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Rejection reason; mapped to a generic client-visible message so the
/// endpoint never becomes a field-by-field validation oracle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required fields")]
    MissingFields,
    #[error("unknown region")]
    InvalidRegion,
    #[error("unknown path")]
    InvalidPath,
    #[error("email failed format check")]
    InvalidEmail,
    #[error("name below minimum length")]
    InvalidName,
    #[error("unknown delivery method")]
    InvalidDeliveryMethod,
    #[error("phone missing or malformed for whatsapp delivery")]
    InvalidPhone,
}

impl ValidationError {
    /// Client-visible message (coarse categories only)
    pub fn public_message(&self) -> &'static str {
        match self {
            ValidationError::MissingFields => "Invalid data",
            ValidationError::InvalidRegion => "Invalid region",
            ValidationError::InvalidPath => "Invalid path",
            ValidationError::InvalidEmail => "Invalid email format",
            ValidationError::InvalidName => "Invalid name",
            ValidationError::InvalidDeliveryMethod => "Invalid data",
            ValidationError::InvalidPhone => "Invalid phone number",
        }
    }
}

/// Sanitize one string field: trim, cap length, strip angle brackets,
/// and restrict to word characters, whitespace, `@`, `.`, `-`.
///
/// Idempotent: sanitizing an already-sanitized string returns it
/// unchanged.
pub fn sanitize_string(input: &str, max_len: usize) -> String {
    let capped: String = input.trim().chars().take(max_len).collect();
    let filtered: String = capped
        .chars()
        .filter(|c| {
            c.is_alphanumeric() || *c == '_' || c.is_whitespace() || matches!(c, '@' | '.' | '-')
        })
        .collect();
    filtered.trim().to_string()
}

/// Permissive `local@domain.tld` shape check with the RFC-derived 254
/// character bound; run after lowercasing and trimming
pub fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.len() > MAX_EMAIL_LEN {
        return false;
    }
    if email.chars().any(|c| c.is_whitespace()) {
        return false;
    }
    let Some(at) = email.find('@') else {
        return false;
    };
    let local = &email[..at];
    let domain = &email[at + 1..];
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    // A dot somewhere inside the domain, with content on both sides
    domain
        .match_indices('.')
        .any(|(p, _)| p > 0 && p + 1 < domain.len())
}

/// International number shape: `+` followed by at least 10 digits,
/// whitespace ignored
pub fn is_valid_phone(phone: &str) -> bool {
    let compact: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    let Some(digits) = compact.strip_prefix('+') else {
        return false;
    };
    digits.len() >= 10 && digits.chars().all(|c| c.is_ascii_digit())
}

/// Validate and sanitize a raw submission
///
/// Check order mirrors the endpoint contract: required fields, region,
/// path, then sanitized email / name / delivery checks.
pub fn validate_submission(raw: RawSubmission) -> Result<DiagnosticSubmission, ValidationError> {
    if raw.region.is_empty()
        || raw.path.is_empty()
        || raw.first_name.is_empty()
        || raw.last_name.is_empty()
        || raw.brand_name.is_empty()
        || raw.email.is_empty()
    {
        return Err(ValidationError::MissingFields);
    }

    let region = Region::parse(&raw.region).ok_or(ValidationError::InvalidRegion)?;
    let path = UserPath::parse(&raw.path).ok_or(ValidationError::InvalidPath)?;

    let first_name = sanitize_string(&raw.first_name, MAX_NAME_LEN);
    let last_name = sanitize_string(&raw.last_name, MAX_NAME_LEN);
    let brand_name = sanitize_string(&raw.brand_name, MAX_BRAND_LEN);
    let email = sanitize_string(&raw.email, MAX_EMAIL_LEN).to_lowercase();

    if !is_valid_email(&email) {
        return Err(ValidationError::InvalidEmail);
    }

    // Suspiciously short names are treated as spam
    if first_name.chars().count() < 2 || last_name.chars().count() < 2 {
        return Err(ValidationError::InvalidName);
    }

    if brand_name.is_empty() {
        return Err(ValidationError::MissingFields);
    }

    let delivery_method = match raw.delivery_method.as_deref() {
        None | Some("") => None,
        Some("email") => Some(DeliveryMethod::Email),
        Some("whatsapp") => Some(DeliveryMethod::Whatsapp),
        Some(_) => return Err(ValidationError::InvalidDeliveryMethod),
    };

    let phone = raw
        .phone
        .map(|p| p.chars().filter(|c| !c.is_whitespace()).collect::<String>())
        .filter(|p| !p.is_empty());

    if delivery_method == Some(DeliveryMethod::Whatsapp) {
        match &phone {
            Some(p) if is_valid_phone(p) => {}
            _ => return Err(ValidationError::InvalidPhone),
        }
    }

    let timestamp = raw
        .timestamp
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| Utc::now().to_rfc3339());

    Ok(DiagnosticSubmission {
        region,
        path,
        answers: raw.answers,
        first_name,
        last_name,
        brand_name,
        email,
        delivery_method,
        phone,
        timestamp,
    })
}
