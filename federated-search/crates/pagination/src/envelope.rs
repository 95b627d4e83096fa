//! Canonical page envelope.

use serde::Serialize;

use crate::PageRequest;

/// One page of results with the totals needed to drive further paging.
///
/// ## Invariants
/// - `total_pages >= 1`
/// - `1 <= current_page <= total_pages`
///
/// Constructors normalise out-of-range metadata rather than failing, because
/// remote backends routinely report `totalPages: 0` for empty result sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEnvelope<T> {
    items: Vec<T>,
    total: u64,
    total_pages: u32,
    current_page: u32,
}

impl<T> PageEnvelope<T> {
    /// Build an envelope from backend-reported metadata.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagination::PageEnvelope;
    ///
    /// let envelope = PageEnvelope::new(Vec::<u8>::new(), 0, 0, 0);
    /// assert_eq!((envelope.total_pages(), envelope.current_page()), (1, 1));
    /// ```
    #[must_use]
    pub fn new(items: Vec<T>, total: u64, total_pages: u32, current_page: u32) -> Self {
        let total_pages = total_pages.max(1);
        Self {
            items,
            total,
            total_pages,
            current_page: current_page.clamp(1, total_pages),
        }
    }

    /// Envelope with no items on a single empty page.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            total_pages: 1,
            current_page: 1,
        }
    }

    /// Slice a complete, ordered match set down to the requested page.
    ///
    /// `total` becomes the match count and `total_pages` is
    /// `ceil(total / limit)`, never less than one.
    #[must_use]
    pub fn paginate(matches: Vec<T>, request: PageRequest) -> Self {
        let total = u64::try_from(matches.len()).unwrap_or(u64::MAX);
        let total_pages = Self::pages_for(total, request.limit());
        let skip = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(request.limit()).unwrap_or(usize::MAX);
        let items = matches.into_iter().skip(skip).take(take).collect();
        Self::new(items, total, total_pages, request.page())
    }

    /// Number of pages needed for `total` items at `limit` per page.
    #[must_use]
    pub fn pages_for(total: u64, limit: u32) -> u32 {
        let pages = total.div_ceil(u64::from(limit.max(1)));
        u32::try_from(pages).unwrap_or(u32::MAX).max(1)
    }

    /// Items on this page, in source order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Total number of matches across every page.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Total number of pages.
    #[must_use]
    pub const fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// One-based number of this page.
    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Consume the envelope, returning its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Transform every item while keeping the paging metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageEnvelope<U> {
        PageEnvelope {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            total_pages: self.total_pages,
            current_page: self.current_page,
        }
    }
}

impl<T> Default for PageEnvelope<T> {
    fn default() -> Self {
        Self::empty()
    }
}
