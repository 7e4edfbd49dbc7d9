//! RSS/Atom feed fetcher.

use blogfeed_core::timestamp::parse_timestamp;
use blogfeed_core::{item_fingerprint, FeedItem, FeedSource};
use chrono::{DateTime, Utc};
use serde_json::Map;

use super::feed_helpers::{
    atom_link, clean_inline, detect_dialect, entry_blocks, tag_value, Dialect,
};
use crate::client::IngestClient;
use crate::error::FetchError;
use crate::normalize::normalize_url;

/// Fetch one feed and keep at most `max_items` entries, in document order.
///
/// # Errors
///
/// Returns [`FetchError::Http`] on network failure or timeout, or
/// [`FetchError::UnexpectedStatus`] on a non-2xx response. A body that is
/// not a feed at all is not an error; it simply yields no items.
pub async fn fetch_feed(
    client: &IngestClient,
    source: &FeedSource,
    max_items: usize,
) -> Result<Vec<FeedItem>, FetchError> {
    let xml = client.get_text(&source.feed).await?;
    let mut items = parse_feed(&xml, source, Utc::now());
    items.truncate(max_items);
    Ok(items)
}

/// Parse a feed document into items.
///
/// Entries are handled independently: one without a title or a usable link
/// is dropped and its siblings are kept. An unparseable entry date falls back
/// to `fetched_at`.
#[must_use]
pub fn parse_feed(xml: &str, source: &FeedSource, fetched_at: DateTime<Utc>) -> Vec<FeedItem> {
    let xml = xml.trim();
    let dialect = detect_dialect(xml);

    entry_blocks(xml, dialect)
        .into_iter()
        .filter_map(|block| {
            let item = entry_to_item(block, dialect, source, fetched_at);
            if item.is_none() {
                tracing::debug!(source = %source.id, "dropped feed entry without title or link");
            }
            item
        })
        .collect()
}

fn entry_to_item(
    block: &str,
    dialect: Dialect,
    source: &FeedSource,
    fetched_at: DateTime<Utc>,
) -> Option<FeedItem> {
    let (summary_tags, raw_link, date_tags): (&[&str], String, &[&str]) = match dialect {
        Dialect::Atom => (
            &["summary", "content"],
            atom_link(block),
            &["updated", "published"],
        ),
        Dialect::Rss => (
            &["description", "content"],
            tag_value(block, &["link", "guid"]),
            &["pubDate", "dc:date"],
        ),
    };

    let title = clean_inline(&tag_value(block, &["title"]));
    let url = normalize_url(&raw_link, source.homepage.as_deref());
    if title.is_empty() || url.is_empty() {
        return None;
    }

    let summary = clean_inline(&tag_value(block, summary_tags));
    let published_at = parse_timestamp(&tag_value(block, date_tags)).unwrap_or(fetched_at);

    Some(FeedItem {
        id: item_fingerprint(&source.id, &url),
        source_id: source.id.clone(),
        source_name: source.name.clone(),
        source_weight: source.weight,
        source_feed: source.feed.clone(),
        source_type: None,
        community_platform: None,
        community_query: None,
        title,
        summary,
        url,
        engagement: None,
        published_at: Some(published_at),
        fetched_at,
        first_seen_at: None,
        last_seen_at: None,
        extra: Map::new(),
    })
}

#[cfg(test)]
#[path = "feed_test.rs"]
mod tests;
