//! Source fetchers and the batch collectors that drive them.

mod feed;
mod feed_helpers;
mod hackernews;
mod reddit;
mod seed;

use std::str::FromStr;

pub use feed::{fetch_feed, parse_feed};
pub use seed::{community_seed_items, feed_seed_items};

use blogfeed_core::{CommunitySource, FeedItem, FeedSource};
use futures::stream::{self, StreamExt};
use serde_json::Value;

use crate::client::IngestClient;
use crate::error::FetchError;

/// Lower bound for the community age window.
pub const MIN_COMMUNITY_MAX_AGE_HOURS: u32 = 12;

/// Community platforms with a fetcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommunityPlatform {
    HackerNews,
    Reddit,
}

impl FromStr for CommunityPlatform {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hackernews" => Ok(Self::HackerNews),
            "reddit" => Ok(Self::Reddit),
            other => Err(FetchError::UnsupportedSource(other.to_string())),
        }
    }
}

/// Per-source limits for community fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommunityOptions {
    /// Maximum hits/posts requested from the platform.
    pub limit: usize,
    /// Items older than this are not requested (HN) or dropped (Reddit).
    pub max_age_hours: u32,
}

impl CommunityOptions {
    /// Build options, flooring `limit` at 1 and `max_age_hours` at
    /// [`MIN_COMMUNITY_MAX_AGE_HOURS`].
    #[must_use]
    pub fn new(limit: usize, max_age_hours: u32) -> Self {
        Self {
            limit: limit.max(1),
            max_age_hours: max_age_hours.max(MIN_COMMUNITY_MAX_AGE_HOURS),
        }
    }
}

impl Default for CommunityOptions {
    fn default() -> Self {
        Self::new(20, 96)
    }
}

/// Items gathered by a batch run plus per-source bookkeeping.
#[derive(Debug, Default)]
pub struct CollectOutcome {
    pub items: Vec<FeedItem>,
    pub succeeded: usize,
    pub failed: usize,
}

impl CollectOutcome {
    fn record(&mut self, source_id: &str, result: Result<Vec<FeedItem>, FetchError>) {
        match result {
            Ok(items) => {
                tracing::info!(source = %source_id, count = items.len(), "source fetched");
                self.succeeded += 1;
                self.items.extend(items);
            }
            Err(e) => {
                tracing::warn!(source = %source_id, error = %e, "source fetch failed");
                self.failed += 1;
            }
        }
    }
}

/// Fetch one community source, dispatching on its `type`.
///
/// # Errors
///
/// Returns [`FetchError::UnsupportedSource`] for an unknown type, otherwise
/// whatever the platform fetcher returns.
pub async fn fetch_community(
    client: &IngestClient,
    source: &CommunitySource,
    options: CommunityOptions,
) -> Result<Vec<FeedItem>, FetchError> {
    match source.kind.parse::<CommunityPlatform>()? {
        CommunityPlatform::HackerNews => hackernews::fetch_hackernews(client, source, options).await,
        CommunityPlatform::Reddit => reddit::fetch_reddit(client, source, options).await,
    }
}

/// Fetch every feed source, at most `concurrency` at a time.
///
/// Items come back grouped by source in configuration order. Failed sources
/// are logged and counted, never propagated.
pub async fn collect_feed_items(
    client: &IngestClient,
    sources: &[FeedSource],
    max_per_source: usize,
    concurrency: usize,
) -> CollectOutcome {
    let results: Vec<(&FeedSource, Result<Vec<FeedItem>, FetchError>)> = stream::iter(sources)
        .map(|source| async move { (source, fetch_feed(client, source, max_per_source).await) })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut outcome = CollectOutcome::default();
    for (source, result) in results {
        outcome.record(&source.id, result);
    }
    outcome
}

/// Fetch every community source, at most `concurrency` at a time.
///
/// Same contract as [`collect_feed_items`].
pub async fn collect_community_items(
    client: &IngestClient,
    sources: &[CommunitySource],
    options: CommunityOptions,
    concurrency: usize,
) -> CollectOutcome {
    let results: Vec<(&CommunitySource, Result<Vec<FeedItem>, FetchError>)> =
        stream::iter(sources)
            .map(|source| async move { (source, fetch_community(client, source, options).await) })
            .buffered(concurrency.max(1))
            .collect()
            .await;

    let mut outcome = CollectOutcome::default();
    for (source, result) in results {
        outcome.record(&source.id, result);
    }
    outcome
}

/// Read a platform count that may arrive as a number or a numeric string.
/// Anything else counts as zero.
fn number_or_zero(value: Option<&Value>) -> f64 {
    value
        .and_then(|v| {
            v.as_f64()
                .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
        })
        .filter(|n: &f64| n.is_finite())
        .unwrap_or(0.0)
}
