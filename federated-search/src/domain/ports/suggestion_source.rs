//! Driven port for the dedicated type-ahead endpoint.

use async_trait::async_trait;

use super::SearchSourceError;
use crate::domain::Suggestion;

/// Port for the remote suggestion endpoint.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SuggestionSource: Send + Sync {
    /// Return suggestions for `text`.
    async fn suggest(&self, text: &str) -> Result<Vec<Suggestion>, SearchSourceError>;
}

/// Fixture source with no suggestions.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureSuggestionSource;

#[async_trait]
impl SuggestionSource for FixtureSuggestionSource {
    async fn suggest(&self, _text: &str) -> Result<Vec<Suggestion>, SearchSourceError> {
        Ok(Vec::new())
    }
}
