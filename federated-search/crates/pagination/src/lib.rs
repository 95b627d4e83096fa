//! Page request, page envelope, and cursor-state primitives.
//!
//! Every searchable domain pages independently. Adapters hand back a
//! [`PageEnvelope`] for one [`PageRequest`]; the owning session folds each
//! envelope into that domain's [`PaginationState`].
//!
//! # Example
//!
//! ```
//! use pagination::{PageEnvelope, PageRequest, PaginationState};
//!
//! let request = PageRequest::new(1, 2).expect("valid request");
//! let envelope = PageEnvelope::paginate(vec!["a", "b", "c"], request);
//! assert_eq!(envelope.items(), &["a", "b"]);
//!
//! let mut state = PaginationState::default();
//! state.record_page(&envelope);
//! assert!(state.has_more());
//! assert_eq!(state.next_page_number(), Some(2));
//! ```

mod envelope;
mod request;
mod state;

pub use envelope::PageEnvelope;
pub use request::{PageRequest, PageRequestError};
pub use state::PaginationState;
