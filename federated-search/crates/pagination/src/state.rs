//! Per-domain pagination cursor.

use serde::Serialize;

use crate::PageEnvelope;

/// Cursor state tracked for one domain.
///
/// ## Invariants
/// - `page >= 1`, `total_pages >= 1`
/// - `has_more == (page < total_pages)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
    page: u32,
    total_pages: u32,
    total: u64,
    has_more: bool,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            page: 1,
            total_pages: 1,
            total: 0,
            has_more: false,
        }
    }
}

impl PaginationState {
    /// Rewind to the first page ahead of a fresh query.
    ///
    /// `has_more` stays false until the next [`Self::record_page`]; the last
    /// known `total` is retained so aggregate counts do not flicker while the
    /// fresh page is in flight.
    pub const fn reset(&mut self) {
        self.page = 1;
        self.total_pages = 1;
        self.has_more = false;
    }

    /// Fold a settled page into the cursor.
    pub fn record_page<T>(&mut self, envelope: &PageEnvelope<T>) {
        self.page = envelope.current_page();
        self.total_pages = envelope.total_pages();
        self.total = envelope.total();
        self.has_more = self.page < self.total_pages;
    }

    /// Page to request next, or `None` when the cursor is exhausted.
    #[must_use]
    pub const fn next_page_number(&self) -> Option<u32> {
        if self.has_more {
            Some(self.page.saturating_add(1))
        } else {
            None
        }
    }

    /// Most recently recorded page.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Total pages reported for the current query.
    #[must_use]
    pub const fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Total matches reported for the current query.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Whether another page can be requested.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.has_more
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 1, false)]
    #[case(1, 3, true)]
    #[case(3, 3, false)]
    fn record_page_derives_has_more(#[case] page: u32, #[case] pages: u32, #[case] more: bool) {
        let mut state = PaginationState::default();
        state.record_page(&PageEnvelope::new(vec![0_u8], 30, pages, page));
        assert_eq!(state.page(), page);
        assert_eq!(state.total_pages(), pages);
        assert_eq!(state.total(), 30);
        assert_eq!(state.has_more(), more);
    }

    #[test]
    fn next_page_is_none_when_exhausted() {
        let state = PaginationState::default();
        assert_eq!(state.next_page_number(), None);
    }

    #[test]
    fn reset_rewinds_and_clears_has_more() {
        let mut state = PaginationState::default();
        state.record_page(&PageEnvelope::new(vec![0_u8], 42, 5, 2));
        state.reset();
        assert_eq!(state.page(), 1);
        assert!(!state.has_more());
        assert_eq!(state.total(), 42);

        state.record_page(&PageEnvelope::new(vec![0_u8], 12, 2, 1));
        assert!(state.has_more());
        assert_eq!(state.next_page_number(), Some(2));
    }

    #[test]
    fn default_matches_cleared_state() {
        let state = PaginationState::default();
        assert_eq!(
            (state.page(), state.total_pages(), state.total(), state.has_more()),
            (1, 1, 0, false)
        );
    }
}
