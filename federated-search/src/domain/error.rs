//! Errors surfaced by search orchestration.
//!
//! Domain adapter failures never appear here; they are absorbed by the
//! degradation controller. Only faults in the orchestration itself surface.

use thiserror::Error;

/// Orchestration failure visible to callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// Session state could not be accessed (a holder panicked).
    #[error("search session state unavailable: {message}")]
    StateUnavailable {
        /// Description of the failure.
        message: String,
    },
}

impl SearchError {
    /// Build a [`SearchError::StateUnavailable`].
    pub fn state_unavailable(message: impl Into<String>) -> Self {
        Self::StateUnavailable {
            message: message.into(),
        }
    }
}
