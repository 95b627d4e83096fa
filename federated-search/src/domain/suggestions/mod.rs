//! Debounced type-ahead suggestions.
//!
//! Per input the engine moves `Idle → Debouncing → Resolving → Resolved`.
//! Only the newest input survives its debounce window, and a resolution that
//! lands after a newer input has been armed is discarded. Failures never
//! escape: an empty list is a valid terminal state.

mod debounce;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

pub use debounce::{DebounceTicket, DebounceTimer};

use super::matching::SubstringMatcher;
use super::ports::{DomainListingRequest, DomainSearchSource, SuggestionSource};
use super::DomainItem;

/// Default debounce window.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);
/// Inputs shorter than this (in characters, after trimming) never query.
pub const DEFAULT_MIN_CHARS: usize = 2;
/// Default listing sample size per sampled domain in the fallback path.
pub const DEFAULT_SAMPLE_SIZE: u32 = 5;

const FALLBACK_CATALOG_LIMIT: usize = 3;
const FALLBACK_POST_LIMIT: usize = 2;
const GENERIC_LIMIT: usize = 5;
const GENERIC_PHRASES: [&str; 8] = [
    "best games 2024",
    "game reviews",
    "beginner guides",
    "speedrun strategies",
    "multiplayer tips",
    "upcoming releases",
    "hidden gems",
    "boss fight strategies",
];

/// What a suggestion points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    /// An account.
    User,
    /// A catalog entry.
    Game,
    /// A post.
    Post,
    /// A guide.
    Guide,
    /// A free-text phrase.
    Generic,
}

/// One type-ahead suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    /// Target kind.
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    /// Text to display and search for.
    pub text: String,
    /// Identifier of the target, when it is a concrete item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Secondary line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
}

impl Suggestion {
    /// Free-text suggestion.
    pub fn generic(text: impl Into<String>) -> Self {
        Self {
            kind: SuggestionKind::Generic,
            text: text.into(),
            id: None,
            subtitle: None,
        }
    }

    fn from_item(item: DomainItem) -> Self {
        match item {
            DomainItem::Account(account) => Self {
                kind: SuggestionKind::User,
                text: account.username,
                id: Some(account.id),
                subtitle: account.display_name,
            },
            DomainItem::Catalog(entry) => Self {
                kind: SuggestionKind::Game,
                text: entry.title,
                id: Some(entry.id),
                subtitle: entry.developer,
            },
            DomainItem::Post(post) => Self {
                kind: SuggestionKind::Post,
                text: post.title,
                id: Some(post.id),
                subtitle: post.author,
            },
            DomainItem::Guide(guide) => Self {
                kind: SuggestionKind::Guide,
                text: guide.title,
                id: Some(guide.id),
                subtitle: guide.category,
            },
        }
    }
}

/// Engine lifecycle for the current input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionPhase {
    /// No pending input.
    #[default]
    Idle,
    /// Waiting out the debounce window.
    Debouncing,
    /// Request in flight.
    Resolving,
    /// Suggestions available for the current input.
    Resolved,
}

/// Result of one [`SuggestionEngine::on_input`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionOutcome {
    /// Input too short; suggestions were cleared without a request.
    Cleared,
    /// A newer input replaced this one before it resolved.
    Superseded,
    /// Suggestions for this input.
    Resolved(Vec<Suggestion>),
}

/// Engine tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestionConfig {
    /// Debounce window.
    pub debounce: Duration,
    /// Minimum trimmed input length, in characters.
    pub min_chars: usize,
    /// Listing items sampled per domain in the fallback path.
    pub sample_size: u32,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            min_chars: DEFAULT_MIN_CHARS,
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }
}

#[derive(Debug, Default)]
struct SuggestionState {
    phase: SuggestionPhase,
    text: String,
    suggestions: Vec<Suggestion>,
}

/// Debounced suggestion engine with a sample-and-filter fallback.
pub struct SuggestionEngine {
    primary: Arc<dyn SuggestionSource>,
    catalog: Arc<dyn DomainSearchSource>,
    posts: Arc<dyn DomainSearchSource>,
    config: SuggestionConfig,
    timer: DebounceTimer,
    state: Mutex<SuggestionState>,
}

impl SuggestionEngine {
    /// Build an engine. `catalog` and `posts` back the fallback sample.
    pub fn new(
        primary: Arc<dyn SuggestionSource>,
        catalog: Arc<dyn DomainSearchSource>,
        posts: Arc<dyn DomainSearchSource>,
        config: SuggestionConfig,
    ) -> Self {
        Self {
            primary,
            catalog,
            posts,
            config,
            timer: DebounceTimer::default(),
            state: Mutex::new(SuggestionState::default()),
        }
    }

    /// Feed one input change.
    ///
    /// Cancels any pending debounce, waits the debounce window, and resolves
    /// suggestions unless a newer input arrives first.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// match engine.on_input("zel").await {
    ///     SuggestionOutcome::Resolved(suggestions) => render(suggestions),
    ///     SuggestionOutcome::Cleared | SuggestionOutcome::Superseded => {}
    /// }
    /// ```
    pub async fn on_input(&self, text: &str) -> SuggestionOutcome {
        let text = text.trim();
        let mut ticket = {
            let mut state = self.state();
            let ticket = self.timer.arm();
            state.text = text.to_owned();
            if text.chars().count() < self.config.min_chars {
                state.phase = SuggestionPhase::Idle;
                state.suggestions.clear();
                return SuggestionOutcome::Cleared;
            }
            state.phase = SuggestionPhase::Debouncing;
            ticket
        };

        if !ticket.expire(self.config.debounce).await {
            return SuggestionOutcome::Superseded;
        }
        {
            let mut state = self.state();
            if !ticket.is_current() {
                return SuggestionOutcome::Superseded;
            }
            state.phase = SuggestionPhase::Resolving;
        }

        let suggestions = self.resolve(text).await;

        let mut state = self.state();
        if !ticket.is_current() {
            debug!(text, "discarding superseded suggestions");
            return SuggestionOutcome::Superseded;
        }
        state.phase = SuggestionPhase::Resolved;
        state.suggestions.clone_from(&suggestions);
        SuggestionOutcome::Resolved(suggestions)
    }

    /// Cancel any pending input and clear suggestions.
    pub fn clear(&self) {
        let mut state = self.state();
        self.timer.cancel();
        *state = SuggestionState::default();
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SuggestionPhase {
        self.state().phase
    }

    /// Suggestions for the most recently resolved input.
    pub fn suggestions(&self) -> Vec<Suggestion> {
        self.state().suggestions.clone()
    }

    async fn resolve(&self, text: &str) -> Vec<Suggestion> {
        match self.primary.suggest(text).await {
            Ok(suggestions) => suggestions,
            Err(error) => {
                warn!(
                    error_kind = error.kind(),
                    error = %error,
                    "suggestion endpoint failed; sampling listings"
                );
                self.fallback(text).await
            }
        }
    }

    async fn fallback(&self, text: &str) -> Vec<Suggestion> {
        let listing = DomainListingRequest {
            text_hint: None,
            cap: self.config.sample_size,
        };
        let (catalog, posts) = tokio::join!(self.catalog.list(&listing), self.posts.list(&listing));
        let matcher = SubstringMatcher::new(text);
        let sample = usize::try_from(self.config.sample_size).unwrap_or(usize::MAX);

        let mut suggestions = Vec::new();
        for (domain_items, limit) in [(catalog, FALLBACK_CATALOG_LIMIT), (posts, FALLBACK_POST_LIMIT)] {
            let items = domain_items.unwrap_or_else(|error| {
                warn!(error_kind = error.kind(), error = %error, "suggestion sample failed");
                Vec::new()
            });
            suggestions.extend(
                items
                    .into_iter()
                    .take(sample)
                    .filter(|item| matcher.matches_item(item))
                    .take(limit)
                    .map(Suggestion::from_item),
            );
        }

        if suggestions.is_empty() {
            suggestions = GENERIC_PHRASES
                .into_iter()
                .filter(|phrase| matcher.matches_text(phrase))
                .take(GENERIC_LIMIT)
                .map(Suggestion::generic)
                .collect();
        }
        suggestions
    }

    fn state(&self) -> MutexGuard<'_, SuggestionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
