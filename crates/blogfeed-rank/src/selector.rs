//! Greedy diverse selection over score-ordered candidates.

use std::collections::{HashMap, HashSet};

use blogfeed_core::ScoredItem;

/// Diversity limits for [`select_diverse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionPolicy {
    /// Maximum picks sharing one bucket.
    pub bucket_cap: usize,
    /// Maximum picks from one feed source.
    pub feed_source_cap: usize,
    /// Maximum picks from one community source.
    pub community_source_cap: usize,
    /// Ignore the source caps when the pool is no larger than the limit.
    pub relax_source_caps_when_pool_fits: bool,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            bucket_cap: 2,
            feed_source_cap: 1,
            community_source_cap: 2,
            relax_source_caps_when_pool_fits: true,
        }
    }
}

impl SelectionPolicy {
    fn source_cap(&self, candidate: &ScoredItem) -> usize {
        if candidate.item.is_community() {
            self.community_source_cap
        } else {
            self.feed_source_cap
        }
    }
}

/// Pick up to `limit` items from `candidates`, which must already be sorted
/// by score descending.
///
/// The first pass walks the candidates in order and skips a repeated URL or
/// title key, a full bucket, or a full source. If that leaves slots open, a
/// second pass fills them from the same order, checking only the URL. Output
/// is in selection order.
#[must_use]
pub fn select_diverse(
    candidates: &[ScoredItem],
    limit: usize,
    policy: &SelectionPolicy,
) -> Vec<ScoredItem> {
    let mut selected: Vec<ScoredItem> = Vec::with_capacity(limit);
    let mut used_urls: HashSet<&str> = HashSet::new();
    let mut used_title_keys: HashSet<&str> = HashSet::new();
    let mut bucket_count: HashMap<&str, usize> = HashMap::new();
    let mut source_count: HashMap<&str, usize> = HashMap::new();

    let enforce_source_caps = !policy.relax_source_caps_when_pool_fits || candidates.len() > limit;

    for candidate in candidates {
        if selected.len() >= limit {
            break;
        }
        if used_urls.contains(candidate.item.url.as_str())
            || used_title_keys.contains(candidate.title_key.as_str())
        {
            continue;
        }

        let in_bucket = bucket_count.get(candidate.bucket.as_str()).copied().unwrap_or(0);
        if in_bucket >= policy.bucket_cap {
            continue;
        }
        let from_source = source_count
            .get(candidate.item.source_id.as_str())
            .copied()
            .unwrap_or(0);
        if enforce_source_caps && from_source >= policy.source_cap(candidate) {
            continue;
        }

        used_urls.insert(&candidate.item.url);
        used_title_keys.insert(&candidate.title_key);
        *bucket_count.entry(&candidate.bucket).or_default() += 1;
        *source_count.entry(&candidate.item.source_id).or_default() += 1;
        selected.push(candidate.clone());
    }

    if selected.len() < limit {
        tracing::debug!(
            picked = selected.len(),
            limit,
            "diversity pass came up short, backfilling"
        );
        for candidate in candidates {
            if selected.len() >= limit {
                break;
            }
            if used_urls.insert(&candidate.item.url) {
                selected.push(candidate.clone());
            }
        }
    }

    selected
}
