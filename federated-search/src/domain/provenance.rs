//! Where a domain's settled results came from.

use std::fmt;

use serde::Serialize;

/// Provenance tag stamped on every domain resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// No resolution has settled yet.
    #[default]
    Pending,
    /// The dedicated remote search endpoint answered.
    Backend,
    /// The primary call failed; results were computed from the listing.
    Fallback,
    /// Both paths failed; the envelope is empty.
    ErrorFallback,
}

impl Provenance {
    /// Stable label used in structured logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Backend => "backend",
            Self::Fallback => "fallback",
            Self::ErrorFallback => "error_fallback",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
