//! Source ingestion for the blogfeed pipeline.
//!
//! Fetches RSS/Atom feeds and community listings (Hacker News, Reddit) and
//! normalizes every entry into a [`blogfeed_core::FeedItem`] keyed by its
//! canonical URL. A failing source never affects the others: batch helpers
//! log the failure and carry on with whatever the remaining sources return.

pub mod client;
pub mod error;
pub mod normalize;
pub mod sources;

pub use client::IngestClient;
pub use error::FetchError;
pub use normalize::normalize_url;
pub use sources::{
    collect_community_items, collect_feed_items, community_seed_items, feed_seed_items,
    fetch_community, fetch_feed, parse_feed, CollectOutcome, CommunityOptions, CommunityPlatform,
};
