//! Federated search aggregation across accounts, catalog entries, posts, and
//! guides.
//!
//! The `domain` module holds the model, ports, and orchestration; `outbound`
//! implements the ports over HTTP; `config` loads `SEARCH_*` settings.

pub mod config;
pub mod domain;
pub mod outbound;
#[cfg(feature = "test-support")]
pub mod test_support;
