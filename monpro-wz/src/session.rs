//! Session-scoped persistence for the wizard
//!
//! A string key-value [`SessionStore`] abstracts the browsing-session
//! storage. The wrapper persists the state after every mutation and
//! rehydrates it on construction, so a reload mid-wizard resumes at the
//! same step. It also manages the short-lived confirmation marker that
//! lets a thank-you view distinguish a legitimate post-submission visit
//! from direct navigation.

use monpro_common::diagnostic::{DeliveryMethod, Region, UserPath};
use monpro_common::question_bank::Question;
use std::collections::HashMap;
use tracing::warn;

use crate::state::{WizardError, WizardState};

/// Storage key for the serialized wizard state
pub const STORAGE_KEY: &str = "monpro_diagnostic_state";
/// Storage key for the post-submission confirmation marker
pub const SUBMISSION_MARKER_KEY: &str = "monpro_submission_success";
/// How long the confirmation marker stays valid
pub const MARKER_VALIDITY_MS: i64 = 30_000;

/// Session-scoped string key-value store
///
/// Implementations may live in memory, browser session storage, or a
/// server-side session; the wizard's transition rules do not change with
/// the medium.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// In-memory store for tests and non-browser hosts
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: HashMap<String, String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Wizard state bound to a session store
///
/// Every mutating call delegates to [`WizardState`] and then persists;
/// failed guard checks leave both state and store untouched.
pub struct WizardSession<S: SessionStore> {
    state: WizardState,
    store: S,
}

impl<S: SessionStore> WizardSession<S> {
    /// Rehydrate from the store, or start empty
    ///
    /// A corrupt stored state is discarded rather than wedging the
    /// wizard.
    pub fn new(store: S) -> Self {
        let state = store
            .get(STORAGE_KEY)
            .and_then(|raw| match serde_json::from_str(&raw) {
                Ok(state) => Some(state),
                Err(e) => {
                    warn!(error = %e, "Discarding unreadable stored wizard state");
                    None
                }
            })
            .unwrap_or_default();

        Self { state, store }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    fn persist(&mut self) {
        match serde_json::to_string(&self.state) {
            Ok(serialized) => self.store.set(STORAGE_KEY, &serialized),
            Err(e) => warn!(error = %e, "Failed to serialize wizard state"),
        }
    }

    pub fn set_region(&mut self, region: Region) {
        self.state.set_region(region);
        self.persist();
    }

    pub fn choose_path(&mut self, path: UserPath) -> Result<(), WizardError> {
        self.state.choose_path(path)?;
        self.persist();
        Ok(())
    }

    pub fn record_answer(&mut self, question: &Question, value: &str) {
        self.state.record_answer(question, value);
        self.persist();
    }

    pub fn advance(&mut self, questions: &[Question]) -> Result<(), WizardError> {
        self.state.advance(questions)?;
        self.persist();
        Ok(())
    }

    pub fn go_back(&mut self) {
        self.state.go_back();
        self.persist();
    }

    pub fn set_first_name(&mut self, value: impl Into<String>) {
        self.state.set_first_name(value);
        self.persist();
    }

    pub fn set_last_name(&mut self, value: impl Into<String>) {
        self.state.set_last_name(value);
        self.persist();
    }

    pub fn set_brand_name(&mut self, value: impl Into<String>) {
        self.state.set_brand_name(value);
        self.persist();
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        self.state.set_email(value);
        self.persist();
    }

    pub fn set_delivery_method(&mut self, method: DeliveryMethod) {
        self.state.set_delivery_method(method);
        self.persist();
    }

    pub fn set_phone(&mut self, value: impl Into<String>) {
        self.state.set_phone(value);
        self.persist();
    }

    /// Clear the wizard entirely (explicit abandonment)
    pub fn reset(&mut self) {
        self.state = WizardState::default();
        self.store.remove(STORAGE_KEY);
    }

    /// Record a successful submission: clear the wizard state and set
    /// the short-lived confirmation marker
    pub fn complete_submission(&mut self, now_ms: i64) {
        self.reset();
        self.store.set(SUBMISSION_MARKER_KEY, &now_ms.to_string());
    }

    /// Whether a confirmation view may be shown
    ///
    /// True only within [`MARKER_VALIDITY_MS`] of a successful
    /// submission; an expired marker is removed on the way out.
    pub fn confirmation_authorized(&mut self, now_ms: i64) -> bool {
        let Some(raw) = self.store.get(SUBMISSION_MARKER_KEY) else {
            return false;
        };
        let Ok(submitted_ms) = raw.parse::<i64>() else {
            self.store.remove(SUBMISSION_MARKER_KEY);
            return false;
        };

        if now_ms - submitted_ms > MARKER_VALIDITY_MS {
            self.store.remove(SUBMISSION_MARKER_KEY);
            return false;
        }
        true
    }

    /// Drop the confirmation marker (e.g. after the view has been shown)
    pub fn consume_marker(&mut self) {
        self.store.remove(SUBMISSION_MARKER_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::WizardStage;
    use monpro_common::question_bank::questions_for_path;

    #[test]
    fn state_persists_after_every_mutation() {
        let mut session = WizardSession::new(MemorySessionStore::new());
        session.set_region(Region::India);

        let stored = session.store.get(STORAGE_KEY).expect("state persisted");
        assert!(stored.contains("india"));
    }

    #[test]
    fn reload_resumes_at_the_same_step() {
        let mut store = MemorySessionStore::new();
        {
            let mut session = WizardSession::new(std::mem::take(&mut store));
            session.set_region(Region::Uk);
            session.choose_path(UserPath::Explorer).unwrap();
            let questions = questions_for_path(UserPath::Explorer);
            session.record_answer(&questions[0], "research");
            session.advance(&questions).unwrap();
            store = session.store;
        }

        let session = WizardSession::new(store);
        assert_eq!(session.state().stage, WizardStage::Answering);
        assert_eq!(session.state().current_step, 1);
        assert_eq!(session.state().region, Some(Region::Uk));
    }

    #[test]
    fn corrupt_stored_state_starts_fresh() {
        let mut store = MemorySessionStore::new();
        store.set(STORAGE_KEY, "{definitely not json");

        let session = WizardSession::new(store);
        assert_eq!(session.state().stage, WizardStage::ChoosingRegion);
    }

    #[test]
    fn completing_a_submission_clears_state_and_sets_the_marker() {
        let mut session = WizardSession::new(MemorySessionStore::new());
        session.set_region(Region::Europe);
        session.complete_submission(1_000);

        assert!(session.store.get(STORAGE_KEY).is_none());
        assert_eq!(session.state().stage, WizardStage::ChoosingRegion);
        assert!(session.confirmation_authorized(1_500));
    }

    #[test]
    fn marker_expires_after_the_validity_window() {
        let mut session = WizardSession::new(MemorySessionStore::new());
        session.complete_submission(1_000);

        assert!(session.confirmation_authorized(1_000 + MARKER_VALIDITY_MS));
        assert!(!session.confirmation_authorized(1_001 + MARKER_VALIDITY_MS));
        // Expired marker was removed, later checks stay unauthorized
        assert!(!session.confirmation_authorized(1_000));
    }

    #[test]
    fn direct_navigation_is_not_authorized() {
        let mut session = WizardSession::new(MemorySessionStore::new());
        assert!(!session.confirmation_authorized(5_000));
    }

    #[test]
    fn consume_marker_prevents_refresh_access() {
        let mut session = WizardSession::new(MemorySessionStore::new());
        session.complete_submission(1_000);
        session.consume_marker();
        assert!(!session.confirmation_authorized(1_100));
    }
}
