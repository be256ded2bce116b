//! Wizard state and transition rules
//!
//! The state machine progresses through:
//! ChoosingRegion → ChoosingPath → Answering(step) → DeliveryDetails →
//! Submitted. Going back from the first question exits to path
//! selection; switching path discards prior answers.

use monpro_common::diagnostic::{
    AnswerValue, DeliveryMethod, DiagnosticAnswers, DiagnosticSubmission, Region, UserPath,
};
use monpro_common::question_bank::Question;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where the wizard currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStage {
    ChoosingRegion,
    ChoosingPath,
    Answering,
    DeliveryDetails,
    Submitted,
}

/// Transition or validation failure
///
/// The delivery-entry variants carry the inline messages surfaced to the
/// user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("No region selected")]
    RegionNotChosen,
    #[error("No path selected")]
    PathNotChosen,
    #[error("Answer the current question to continue")]
    QuestionUnanswered,
    #[error("Please fill in all required fields")]
    MissingIdentity,
    #[error("Please select a delivery method")]
    MissingDeliveryMethod,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Please enter a valid WhatsApp number with country code")]
    InvalidPhone,
}

/// The session-scoped wizard accumulator
///
/// Serialized to the session store after every mutation and rehydrated
/// on load, so a reload mid-wizard resumes at the same step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardState {
    pub stage: WizardStage,
    pub region: Option<Region>,
    pub path: Option<UserPath>,
    pub current_step: usize,
    pub answers: DiagnosticAnswers,
    pub first_name: String,
    pub last_name: String,
    pub brand_name: String,
    pub email: String,
    pub delivery_method: Option<DeliveryMethod>,
    pub phone: Option<String>,
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            stage: WizardStage::ChoosingRegion,
            region: None,
            path: None,
            current_step: 0,
            answers: DiagnosticAnswers::new(),
            first_name: String::new(),
            last_name: String::new(),
            brand_name: String::new(),
            email: String::new(),
            delivery_method: None,
            phone: None,
        }
    }
}

impl WizardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the region; advances out of ChoosingRegion on first choice
    pub fn set_region(&mut self, region: Region) {
        self.region = Some(region);
        if self.stage == WizardStage::ChoosingRegion {
            self.stage = WizardStage::ChoosingPath;
        }
    }

    /// Choose (or switch) the persona path
    ///
    /// Always resets the step index and clears answers: a different
    /// path's question set makes prior answers meaningless.
    pub fn choose_path(&mut self, path: UserPath) -> Result<(), WizardError> {
        if self.region.is_none() {
            return Err(WizardError::RegionNotChosen);
        }
        self.path = Some(path);
        self.current_step = 0;
        self.answers.clear();
        self.stage = WizardStage::Answering;
        Ok(())
    }

    /// Record an answer for `question` without changing the step
    ///
    /// Single-select replaces any prior value. Multi-select toggles:
    /// removing an already-selected value, otherwise adding it — an
    /// exclusive value clears all others first, a non-exclusive value
    /// clears any previously-selected exclusive values, and adding
    /// beyond `max_selections` is a no-op.
    pub fn record_answer(&mut self, question: &Question, value: &str) {
        if !question.multi_select {
            self.answers
                .insert(question.id.clone(), AnswerValue::Single(value.to_string()));
            return;
        }

        let mut current = match self.answers.get(&question.id) {
            Some(AnswerValue::Multi(values)) => values.clone(),
            _ => Vec::new(),
        };

        if let Some(pos) = current.iter().position(|v| v == value) {
            current.remove(pos);
        } else {
            let is_exclusive = question.exclusive_options.iter().any(|v| v == value);
            if is_exclusive {
                current = vec![value.to_string()];
            } else {
                current.retain(|v| !question.exclusive_options.contains(v));
                if let Some(max) = question.max_selections {
                    if current.len() + 1 > max {
                        return;
                    }
                }
                current.push(value.to_string());
            }
        }

        self.answers
            .insert(question.id.clone(), AnswerValue::Multi(current));
    }

    /// Whether the current question has an answer of the right shape
    pub fn is_answered(&self, question: &Question) -> bool {
        self.answers
            .get(&question.id)
            .map(|a| a.is_answered(question.multi_select))
            .unwrap_or(false)
    }

    /// Current question from the path's question set, if answering
    pub fn current_question<'q>(&self, questions: &'q [Question]) -> Option<&'q Question> {
        if self.stage != WizardStage::Answering {
            return None;
        }
        questions.get(self.current_step)
    }

    /// Whether the next/continue action is enabled
    pub fn can_advance(&self, questions: &[Question]) -> bool {
        self.current_question(questions)
            .map(|q| self.is_answered(q))
            .unwrap_or(false)
    }

    /// Move to the next step; from the last question, enter delivery
    /// details. Blocked while the current question is unanswered.
    pub fn advance(&mut self, questions: &[Question]) -> Result<(), WizardError> {
        if self.stage != WizardStage::Answering {
            return Err(WizardError::PathNotChosen);
        }
        let question = self
            .current_question(questions)
            .ok_or(WizardError::PathNotChosen)?;
        if !self.is_answered(question) {
            return Err(WizardError::QuestionUnanswered);
        }

        if self.current_step + 1 < questions.len() {
            self.current_step += 1;
        } else {
            self.stage = WizardStage::DeliveryDetails;
        }
        Ok(())
    }

    /// Step backwards
    ///
    /// From delivery details: back to the last question. From step 0:
    /// exit to path selection (an explicit user action; answers survive
    /// until a path is chosen again).
    pub fn go_back(&mut self) {
        match self.stage {
            WizardStage::DeliveryDetails => {
                self.stage = WizardStage::Answering;
            }
            WizardStage::Answering => {
                if self.current_step > 0 {
                    self.current_step -= 1;
                } else {
                    self.stage = WizardStage::ChoosingPath;
                }
            }
            _ => {}
        }
    }

    pub fn set_first_name(&mut self, value: impl Into<String>) {
        self.first_name = value.into();
    }

    pub fn set_last_name(&mut self, value: impl Into<String>) {
        self.last_name = value.into();
    }

    pub fn set_brand_name(&mut self, value: impl Into<String>) {
        self.brand_name = value.into();
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        self.email = value.into();
    }

    pub fn set_delivery_method(&mut self, method: DeliveryMethod) {
        self.delivery_method = Some(method);
    }

    pub fn set_phone(&mut self, value: impl Into<String>) {
        self.phone = Some(value.into());
    }

    /// Client-side pre-submit validation of identity and delivery fields
    pub fn validate_for_submit(&self) -> Result<(), WizardError> {
        if self.first_name.trim().is_empty()
            || self.last_name.trim().is_empty()
            || self.brand_name.trim().is_empty()
        {
            return Err(WizardError::MissingIdentity);
        }

        match self.delivery_method {
            None => Err(WizardError::MissingDeliveryMethod),
            Some(DeliveryMethod::Email) => {
                if email_shape_ok(self.email.trim()) {
                    Ok(())
                } else {
                    Err(WizardError::InvalidEmail)
                }
            }
            Some(DeliveryMethod::Whatsapp) => {
                let phone = self.phone.as_deref().unwrap_or("");
                if phone_shape_ok(phone) {
                    Ok(())
                } else {
                    Err(WizardError::InvalidPhone)
                }
            }
        }
    }

    /// Freeze the wizard state into the submission payload
    pub fn build_submission(&self, timestamp: String) -> Result<DiagnosticSubmission, WizardError> {
        let region = self.region.ok_or(WizardError::RegionNotChosen)?;
        let path = self.path.ok_or(WizardError::PathNotChosen)?;
        self.validate_for_submit()?;

        Ok(DiagnosticSubmission {
            region,
            path,
            answers: self.answers.clone(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            brand_name: self.brand_name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            delivery_method: self.delivery_method,
            phone: self.phone.clone(),
            timestamp,
        })
    }
}

/// Permissive `local@domain.tld` shape, matching the wizard's inline check
fn email_shape_ok(email: &str) -> bool {
    if email.is_empty() || email.chars().any(|c| c.is_whitespace()) {
        return false;
    }
    let Some(at) = email.find('@') else {
        return false;
    };
    let (local, domain) = (&email[..at], &email[at + 1..]);
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .match_indices('.')
        .any(|(p, _)| p > 0 && p + 1 < domain.len())
}

/// `+` followed by at least 10 digits, whitespace ignored
fn phone_shape_ok(phone: &str) -> bool {
    let compact: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    let Some(digits) = compact.strip_prefix('+') else {
        return false;
    };
    digits.len() >= 10 && digits.chars().all(|c| c.is_ascii_digit())
}
