use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::item::FeedItem;
use crate::timestamp;

/// A [`FeedItem`] with its relevance score and the components behind it.
///
/// Computed fresh on every selection run. Serializes flat, with the item's
/// own fields alongside the score fields, which is the shape the drafting
/// layer reads from `selected-topics.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredItem {
    #[serde(flatten)]
    pub item: FeedItem,
    pub score: f64,
    pub include_hits: u32,
    pub boost_hits: u32,
    pub recency_score: f64,
    pub source_score: f64,
    pub engagement_score: f64,
    pub community_bonus: f64,
    pub bucket: String,
    /// Near-duplicate fingerprint of the title. Not for display.
    pub title_key: String,
}

/// Snapshot written once per selection run to `data/selected-topics.json`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionResult {
    #[serde(with = "timestamp::required")]
    pub selected_at: DateTime<Utc>,
    pub total_candidates: usize,
    pub count_requested: usize,
    pub items: Vec<ScoredItem>,
}
