//! Pure merge of a fetched batch into the existing inbox.

use std::collections::HashMap;

use blogfeed_core::FeedItem;

/// Merge `incoming` into `existing` and return the new inbox contents.
///
/// Records are keyed by `url`; records with an empty url are ignored on both
/// sides. A new URL starts with `first_seen_at == last_seen_at ==
/// fetched_at`. A known URL takes the incoming fields (see
/// [`FeedItem::overlay`]) but keeps its original first-seen time. The result
/// is ordered newest first by `published_at`, falling back to `fetched_at`,
/// and cut to `capacity` records.
///
/// Merging the same batch twice yields the same records apart from
/// `last_seen_at`.
#[must_use]
pub fn merge(existing: Vec<FeedItem>, incoming: Vec<FeedItem>, capacity: usize) -> Vec<FeedItem> {
    let mut records: Vec<FeedItem> = Vec::with_capacity(existing.len() + incoming.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in existing {
        if record.url.is_empty() {
            continue;
        }
        match index.get(&record.url).copied() {
            Some(slot) => records[slot] = record,
            None => {
                index.insert(record.url.clone(), records.len());
                records.push(record);
            }
        }
    }

    for mut row in incoming {
        if row.url.is_empty() {
            continue;
        }
        match index.get(&row.url).copied() {
            Some(slot) => {
                let prev = records[slot].clone();
                let first_seen = prev.first_seen_at.unwrap_or(prev.fetched_at);
                let last_seen = row.fetched_at;
                let mut merged = prev.overlay(row);
                merged.first_seen_at = Some(first_seen);
                merged.last_seen_at = Some(last_seen);
                records[slot] = merged;
            }
            None => {
                row.first_seen_at = Some(row.fetched_at);
                row.last_seen_at = Some(row.fetched_at);
                index.insert(row.url.clone(), records.len());
                records.push(row);
            }
        }
    }

    // Stable: equal timestamps keep insertion order.
    records.sort_by_key(|r| std::cmp::Reverse(r.recency_timestamp().timestamp_millis()));
    records.truncate(capacity);
    records
}

/// The inbox contents together with the capacity they are held to.
#[derive(Debug, Clone, PartialEq)]
pub struct Inbox {
    records: Vec<FeedItem>,
    capacity: usize,
}

impl Inbox {
    #[must_use]
    pub fn new(records: Vec<FeedItem>, capacity: usize) -> Self {
        Self { records, capacity }
    }

    /// Merge a fetched batch, producing the next inbox state.
    #[must_use]
    pub fn apply(self, batch: Vec<FeedItem>) -> Self {
        let records = merge(self.records, batch, self.capacity);
        Self {
            records,
            capacity: self.capacity,
        }
    }

    #[must_use]
    pub fn records(&self) -> &[FeedItem] {
        &self.records
    }

    #[must_use]
    pub fn into_records(self) -> Vec<FeedItem> {
        self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
#[path = "merge_test.rs"]
mod tests;
