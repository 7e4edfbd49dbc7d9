//! From an inbox snapshot to the day's selection.

use blogfeed_core::{FeedItem, KeywordRules, ScoredItem, SelectionResult};
use chrono::{DateTime, Utc};

use crate::scorer::{age_hours, score_item};
use crate::selector::{select_diverse, SelectionPolicy};

/// Lower bound for the candidate age window.
pub const MIN_MAX_AGE_HOURS: u32 = 6;

/// Which scored items are eligible for selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateFilter {
    pub max_age_hours: u32,
    pub min_score: f64,
    pub include_seed: bool,
}

impl CandidateFilter {
    /// Build a filter, flooring `max_age_hours` at [`MIN_MAX_AGE_HOURS`].
    #[must_use]
    pub fn new(max_age_hours: u32, min_score: f64, include_seed: bool) -> Self {
        Self {
            max_age_hours: max_age_hours.max(MIN_MAX_AGE_HOURS),
            min_score,
            include_seed,
        }
    }
}

impl Default for CandidateFilter {
    fn default() -> Self {
        Self::new(72, 18.0, false)
    }
}

/// Score every inbox item and keep the eligible ones, best first.
///
/// Seed items are dropped unless the filter includes them. The sort is
/// stable, so equal scores keep inbox order.
#[must_use]
pub fn rank_candidates(
    inbox: Vec<FeedItem>,
    rules: &KeywordRules,
    filter: &CandidateFilter,
    now: DateTime<Utc>,
) -> Vec<ScoredItem> {
    let max_age = f64::from(filter.max_age_hours);
    let mut ranked: Vec<ScoredItem> = inbox
        .into_iter()
        .filter(|item| filter.include_seed || !item.is_seed())
        .map(|item| score_item(item, rules, now))
        .filter(|scored| scored.score >= filter.min_score)
        .filter(|scored| age_hours(scored.item.recency_timestamp(), now) <= max_age)
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}

/// Rank the inbox and pick `count` diverse topics (at least one).
#[must_use]
pub fn build_selection(
    inbox: Vec<FeedItem>,
    rules: &KeywordRules,
    filter: &CandidateFilter,
    count: usize,
    policy: &SelectionPolicy,
    now: DateTime<Utc>,
) -> SelectionResult {
    let count = count.max(1);
    let ranked = rank_candidates(inbox, rules, filter, now);
    let items = select_diverse(&ranked, count, policy);

    tracing::info!(
        candidates = ranked.len(),
        selected = items.len(),
        requested = count,
        "selection built"
    );

    SelectionResult {
        selected_at: now,
        total_candidates: ranked.len(),
        count_requested: count,
        items,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 15, 12, 0, 0).unwrap()
    }

    fn rules() -> KeywordRules {
        serde_json::from_str(
            r#"{
                "include": ["swift", "model", "cloud"],
                "bucketRules": { "iOS": ["swift"], "AI": ["model"], "IT": ["cloud"] }
            }"#,
        )
        .unwrap()
    }

    fn item(source_id: &str, url: &str, title: &str, hours_old: i64) -> FeedItem {
        serde_json::from_value(json!({
            "sourceId": source_id,
            "sourceWeight": 1.0,
            "url": url,
            "title": title,
            "publishedAt": (now() - Duration::hours(hours_old)).to_rfc3339(),
            "fetchedAt": now().to_rfc3339(),
        }))
        .unwrap()
    }

    #[test]
    fn filters_seed_low_score_and_stale_items() {
        let inbox = vec![
            item("blog", "https://a.example/fresh", "Swift macros deep dive", 2),
            item("seed", "https://a.example/seed", "Swift seed item", 1),
            item("blog", "https://a.example/stale", "Cloud costs explained", 100),
            item("blog", "https://a.example/dull", "Weekly notes", 1),
        ];
        let ranked = rank_candidates(inbox, &rules(), &CandidateFilter::default(), now());
        let urls: Vec<&str> = ranked.iter().map(|s| s.item.url.as_str()).collect();
        // fresh: include 6 + recency 25 + source 10 = 41
        // dull: recency 25 + source 10 = 35, still above 18
        assert_eq!(urls, vec!["https://a.example/fresh", "https://a.example/dull"]);
    }

    #[test]
    fn include_seed_keeps_seed_items() {
        let inbox = vec![item("seed", "https://a.example/seed", "Swift seed item", 1)];
        let filter = CandidateFilter::new(72, 18.0, true);
        assert_eq!(rank_candidates(inbox, &rules(), &filter, now()).len(), 1);
    }

    #[test]
    fn ranked_best_first() {
        let inbox = vec![
            item("a", "https://a.example/1", "Cloud", 30),
            item("b", "https://a.example/2", "Swift model cloud", 1),
            item("c", "https://a.example/3", "Model", 10),
        ];
        let ranked = rank_candidates(inbox, &rules(), &CandidateFilter::default(), now());
        let scores: Vec<f64> = ranked.iter().map(|s| s.score).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]), "{scores:?}");
        assert_eq!(ranked[0].item.url, "https://a.example/2");
    }

    #[test]
    fn age_window_is_floored() {
        assert_eq!(CandidateFilter::new(1, 18.0, false).max_age_hours, 6);
    }

    #[test]
    fn selection_result_reports_pool_and_request() {
        let inbox = vec![
            item("a", "https://a.example/1", "Swift 1", 1),
            item("b", "https://a.example/2", "Model 2", 2),
            item("c", "https://a.example/3", "Cloud 3", 3),
            item("d", "https://a.example/4", "Swift 4", 4),
        ];
        let result = build_selection(
            inbox,
            &rules(),
            &CandidateFilter::default(),
            0,
            &SelectionPolicy::default(),
            now(),
        );
        assert_eq!(result.count_requested, 1);
        assert_eq!(result.total_candidates, 4);
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.selected_at, now());
        assert_eq!(result.items[0].item.url, "https://a.example/1");
    }
}
