//! Search configuration loaded via OrthoConfig.
//!
//! The base URL carries a loader default; the remaining fields are optional
//! and accessors apply their defaults. Values come from `SEARCH_*`
//! environment variables or configuration files.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::domain::suggestions::{DEFAULT_MIN_CHARS, DEFAULT_SAMPLE_SIZE};
use crate::domain::{
    DEFAULT_LISTING_CAP, DEFAULT_PAGE_SIZE, DegradationController, DispatcherConfig,
    SuggestionConfig,
};

const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_SUGGESTION_DEBOUNCE_MS: u64 = 300;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// The configured base URL does not parse or cannot carry paths.
    #[error("invalid search base URL `{value}`: {message}")]
    InvalidBaseUrl {
        /// Raw configured value.
        value: String,
        /// Parser diagnostic.
        message: String,
    },
}

/// Configuration values for the remote search backend and the aggregator.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SEARCH")]
pub struct SearchSettings {
    /// Backend API root.
    #[ortho_config(default = "http://localhost:5000/api".to_owned())]
    pub base_url: String,
    /// Transport timeout per request, in milliseconds.
    pub request_timeout_ms: Option<u64>,
    /// Items requested per domain page.
    pub page_size: Option<u32>,
    /// Listing items fetched when a domain degrades.
    pub fallback_listing_cap: Option<u32>,
    /// Suggestion debounce window, in milliseconds.
    pub suggestion_debounce_ms: Option<u64>,
    /// Listing items sampled per domain for fallback suggestions.
    pub suggestion_sample_size: Option<u32>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            request_timeout_ms: None,
            page_size: None,
            fallback_listing_cap: None,
            suggestion_debounce_ms: None,
            suggestion_sample_size: None,
        }
    }
}

impl SearchSettings {
    /// Parsed backend base URL.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidBaseUrl`] when the value does not
    /// parse or names a scheme that cannot carry paths (e.g. `mailto:`).
    pub fn base_url(&self) -> Result<Url, SettingsError> {
        let raw = self.base_url.as_str();
        let invalid = |message: String| SettingsError::InvalidBaseUrl {
            value: raw.to_owned(),
            message,
        };
        let url = Url::parse(raw).map_err(|error| invalid(error.to_string()))?;
        if url.cannot_be_a_base() {
            return Err(invalid("URL cannot be a base".to_owned()));
        }
        Ok(url)
    }

    /// Transport timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(
            self.request_timeout_ms
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS),
        )
    }

    /// Items per domain page, never zero.
    pub fn page_size(&self) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1)
    }

    /// Listing cap for degraded searches, never zero.
    pub fn fallback_listing_cap(&self) -> u32 {
        self.fallback_listing_cap
            .unwrap_or(DEFAULT_LISTING_CAP)
            .max(1)
    }

    /// Dispatcher tuning derived from these settings.
    pub fn dispatcher_config(&self) -> DispatcherConfig {
        DispatcherConfig {
            page_size: self.page_size(),
            controller: DegradationController::new(self.fallback_listing_cap()),
        }
    }

    /// Suggestion engine tuning derived from these settings.
    pub fn suggestion_config(&self) -> SuggestionConfig {
        SuggestionConfig {
            debounce: Duration::from_millis(
                self.suggestion_debounce_ms
                    .unwrap_or(DEFAULT_SUGGESTION_DEBOUNCE_MS),
            ),
            min_chars: DEFAULT_MIN_CHARS,
            sample_size: self
                .suggestion_sample_size
                .unwrap_or(DEFAULT_SAMPLE_SIZE)
                .max(1),
        }
    }
}
