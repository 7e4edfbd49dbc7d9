use blogfeed_core::{item_fingerprint, Engagement, SourceType};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Map};

use super::*;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 15, 0, 0, 0).unwrap()
}

fn item(url: &str, published_hours_before_t0: i64, fetched_at: DateTime<Utc>) -> FeedItem {
    FeedItem {
        id: item_fingerprint("src", url),
        source_id: "src".to_string(),
        source_name: "Source".to_string(),
        source_weight: 1.0,
        source_feed: "https://example.com/feed.xml".to_string(),
        source_type: None,
        community_platform: None,
        community_query: None,
        title: format!("Title for {url}"),
        summary: String::new(),
        url: url.to_string(),
        engagement: None,
        published_at: Some(t0() - Duration::hours(published_hours_before_t0)),
        fetched_at,
        first_seen_at: None,
        last_seen_at: None,
        extra: Map::new(),
    }
}

#[test]
fn new_urls_get_seen_timestamps_from_fetch_time() {
    let merged = merge(vec![], vec![item("https://a.example/1", 1, t0())], 10);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].first_seen_at, Some(t0()));
    assert_eq!(merged[0].last_seen_at, Some(t0()));
}

#[test]
fn known_url_keeps_first_seen_and_takes_incoming_fields() {
    let first = merge(vec![], vec![item("https://a.example/1", 1, t0())], 10);

    let later = t0() + Duration::hours(6);
    let mut update = item("https://a.example/1", 1, later);
    update.title = "Updated title".to_string();
    let merged = merge(first, vec![update], 10);

    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].title, "Updated title");
    assert_eq!(merged[0].first_seen_at, Some(t0()));
    assert_eq!(merged[0].last_seen_at, Some(later));
}

#[test]
fn first_seen_falls_back_to_previous_fetch_time() {
    let legacy = item("https://a.example/legacy", 2, t0() - Duration::hours(30));
    let merged = merge(vec![legacy], vec![item("https://a.example/legacy", 2, t0())], 10);
    assert_eq!(merged[0].first_seen_at, Some(t0() - Duration::hours(30)));
    assert_eq!(merged[0].last_seen_at, Some(t0()));
}

#[test]
fn absent_optional_fields_keep_previous_values() {
    let mut prev = item("https://a.example/c", 1, t0());
    prev.source_type = Some(SourceType::Community);
    prev.engagement = Some(Engagement {
        score: 40.0,
        comments: 3.0,
    });
    prev.extra.insert("legacyTag".to_string(), json!("keep"));

    let mut incoming = item("https://a.example/c", 1, t0() + Duration::hours(1));
    incoming.extra.insert("newTag".to_string(), json!(1));

    let merged = merge(vec![prev], vec![incoming], 10);
    let record = &merged[0];
    assert_eq!(record.source_type, Some(SourceType::Community));
    assert_eq!(record.engagement.map(|e| e.score), Some(40.0));
    assert_eq!(record.extra.get("legacyTag"), Some(&json!("keep")));
    assert_eq!(record.extra.get("newTag"), Some(&json!(1)));
}

#[test]
fn urls_stay_unique_and_empty_urls_are_dropped() {
    let existing = vec![
        item("https://a.example/1", 5, t0()),
        item("", 1, t0()),
        item("https://a.example/1", 4, t0()),
    ];
    let incoming = vec![item("https://a.example/2", 3, t0()), item("", 0, t0())];
    let merged = merge(existing, incoming, 10);

    let urls: Vec<&str> = merged.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(urls, vec!["https://a.example/2", "https://a.example/1"]);
    // The later duplicate in `existing` wins.
    assert_eq!(merged[1].published_at, Some(t0() - Duration::hours(4)));
}

#[test]
fn sorted_newest_first_with_fetch_time_fallback() {
    let mut undated = item("https://a.example/undated", 0, t0() - Duration::hours(2));
    undated.published_at = None;
    let merged = merge(
        vec![],
        vec![
            item("https://a.example/old", 10, t0()),
            undated,
            item("https://a.example/new", 1, t0()),
        ],
        10,
    );
    let urls: Vec<&str> = merged.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "https://a.example/new",
            "https://a.example/undated",
            "https://a.example/old"
        ]
    );
}

#[test]
fn truncates_to_capacity_dropping_oldest() {
    let incoming: Vec<FeedItem> = (0..5)
        .map(|h| item(&format!("https://a.example/{h}"), h, t0()))
        .collect();
    let merged = merge(vec![], incoming, 3);
    let urls: Vec<&str> = merged.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(
        urls,
        vec!["https://a.example/0", "https://a.example/1", "https://a.example/2"]
    );
}

#[test]
fn merging_the_same_batch_twice_is_idempotent() {
    let batch = vec![
        item("https://a.example/1", 1, t0()),
        item("https://a.example/2", 2, t0()),
    ];
    let once = merge(vec![], batch.clone(), 10);
    let twice = merge(once.clone(), batch, 10);
    assert_eq!(once, twice);
}

#[test]
fn inbox_apply_respects_capacity() {
    let inbox = Inbox::new(vec![item("https://a.example/old", 48, t0())], 1)
        .apply(vec![item("https://a.example/new", 1, t0())]);
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox.records()[0].url, "https://a.example/new");
}
