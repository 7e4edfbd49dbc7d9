//! The inbox: every collected item, keyed by canonical URL.
//!
//! [`merge`] is the only way records change. It is pure; [`read_inbox`] and
//! [`write_inbox`] move the result to and from `data/inbox.jsonl`.

pub mod error;
pub mod merge;
pub mod store;

pub use error::InboxError;
pub use merge::{merge, Inbox};
pub use store::{read_inbox, write_inbox};
