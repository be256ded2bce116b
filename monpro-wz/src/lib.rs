//! # MonPro Wizard State Machine
//!
//! The client-held, session-scoped accumulator behind the diagnostic
//! wizard: region and path selection, branching questionnaire answers
//! with multi-select rules, identity and delivery details, and the
//! submission call. The transition rules are the contract; the storage
//! medium behind [`SessionStore`] is not.

pub mod client;
pub mod session;
pub mod state;

pub use client::{DiagnosticClient, SubmitError};
pub use session::{MemorySessionStore, SessionStore, WizardSession};
pub use state::{WizardError, WizardStage, WizardState};
