//! Relevance scoring and diverse daily topic selection.
//!
//! [`score_item`] turns a [`blogfeed_core::FeedItem`] into a
//! [`blogfeed_core::ScoredItem`] using keyword rules, recency, source trust
//! and engagement. [`select_diverse`] then picks a small set that does not
//! repeat a URL, a near-identical title, or lean too hard on one bucket or
//! source. [`build_selection`] runs the whole thing over an inbox snapshot.

pub mod candidates;
pub mod scorer;
pub mod selector;

pub use candidates::{build_selection, rank_candidates, CandidateFilter};
pub use scorer::{detect_bucket, match_count, score_item, title_key};
pub use selector::{select_diverse, SelectionPolicy};
