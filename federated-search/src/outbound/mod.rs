//! Outbound adapters.
//!
//! This module provides reqwest implementations of the search ports.

pub mod http;
