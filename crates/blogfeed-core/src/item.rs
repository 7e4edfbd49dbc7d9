//! The [`FeedItem`] record that flows through the whole pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::timestamp;

/// Where an item came from. Items without an explicit type are feed items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Feed,
    Community,
}

/// Platform-reported popularity. Zero when the platform does not report it.
///
/// Counts are read leniently: `null`, numeric strings, and other junk in an
/// inbox line never make the line unreadable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Engagement {
    #[serde(default, deserialize_with = "lenient_count")]
    pub score: f64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub comments: f64,
}

/// A JSON number, or a string holding one.
fn number_from_value(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
        .filter(|n: &f64| n.is_finite())
}

fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value).unwrap_or(0.0))
}

fn lenient_weight<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(effective_weight(number_from_value(&value)))
}

/// One candidate article, keyed by its canonical `url`.
///
/// `first_seen_at` / `last_seen_at` are owned by the inbox merge and are never
/// set by fetchers. Fields this crate does not model are kept in `extra` so a
/// read/write cycle over `inbox.jsonl` loses nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub source_id: String,
    #[serde(default)]
    pub source_name: String,
    #[serde(default = "default_weight", deserialize_with = "lenient_weight")]
    pub source_weight: f64,
    #[serde(default)]
    pub source_feed: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<SourceType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community_platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community_query: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engagement: Option<Engagement>,
    #[serde(
        default,
        with = "timestamp::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default = "timestamp::epoch", with = "timestamp::required")]
    pub fetched_at: DateTime<Utc>,
    #[serde(
        default,
        with = "timestamp::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub first_seen_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        with = "timestamp::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_seen_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_weight() -> f64 {
    1.0
}

type NumericAccessor = fn(&FeedItem) -> Option<f64>;

/// Accessors tried in order when reading the engagement score. The first one
/// yielding a finite, non-zero number wins. The legacy keys cover inbox lines
/// written before `engagement` existed.
const SCORE_ACCESSORS: [NumericAccessor; 3] = [
    |item| item.engagement.map(|e| e.score),
    |item| item.extra_number("communityScore"),
    |item| item.extra_number("points"),
];

/// Same chain for the comment count.
const COMMENT_ACCESSORS: [NumericAccessor; 3] = [
    |item| item.engagement.map(|e| e.comments),
    |item| item.extra_number("numComments"),
    |item| item.extra_number("commentsCount"),
];

fn first_nonzero(item: &FeedItem, accessors: &[NumericAccessor]) -> f64 {
    accessors
        .iter()
        .filter_map(|read| read(item))
        .find(|v| v.is_finite() && *v != 0.0)
        .unwrap_or(0.0)
}

impl FeedItem {
    /// The timestamp used for recency ordering and scoring.
    #[must_use]
    pub fn recency_timestamp(&self) -> DateTime<Utc> {
        self.published_at.unwrap_or(self.fetched_at)
    }

    #[must_use]
    pub fn source_type(&self) -> SourceType {
        self.source_type.unwrap_or(SourceType::Feed)
    }

    #[must_use]
    pub fn is_community(&self) -> bool {
        self.source_type() == SourceType::Community
    }

    /// Local test items injected with `--seed` carry a `seed*` source id.
    #[must_use]
    pub fn is_seed(&self) -> bool {
        self.source_id.starts_with("seed")
    }

    /// Engagement score, resolved through [`SCORE_ACCESSORS`].
    #[must_use]
    pub fn engagement_score(&self) -> f64 {
        first_nonzero(self, &SCORE_ACCESSORS)
    }

    /// Comment count, resolved through [`COMMENT_ACCESSORS`].
    #[must_use]
    pub fn engagement_comments(&self) -> f64 {
        first_nonzero(self, &COMMENT_ACCESSORS)
    }

    fn extra_number(&self, key: &str) -> Option<f64> {
        self.extra.get(key).and_then(number_from_value)
    }

    /// Overlay `incoming` onto `self`, field by field.
    ///
    /// Required fields always take the incoming value. Optional fields only
    /// override when the incoming record carries them, and `extra` keys are
    /// merged with incoming keys winning. Seen-timestamps are left to the
    /// caller.
    #[must_use]
    pub fn overlay(self, incoming: FeedItem) -> FeedItem {
        let mut extra = self.extra;
        extra.extend(incoming.extra);

        FeedItem {
            id: incoming.id,
            source_id: incoming.source_id,
            source_name: incoming.source_name,
            source_weight: incoming.source_weight,
            source_feed: incoming.source_feed,
            source_type: incoming.source_type.or(self.source_type),
            community_platform: incoming.community_platform.or(self.community_platform),
            community_query: incoming.community_query.or(self.community_query),
            title: incoming.title,
            summary: incoming.summary,
            url: incoming.url,
            engagement: incoming.engagement.or(self.engagement),
            published_at: incoming.published_at.or(self.published_at),
            fetched_at: incoming.fetched_at,
            first_seen_at: incoming.first_seen_at.or(self.first_seen_at),
            last_seen_at: incoming.last_seen_at.or(self.last_seen_at),
            extra,
        }
    }
}

/// Deterministic item id: the first 12 hex chars of `sha256("{namespace}:{url}")`.
///
/// `namespace` is the source id for fetched items, so the same URL from the
/// same source always gets the same id across runs.
#[must_use]
pub fn item_fingerprint(namespace: &str, url: &str) -> String {
    let digest = Sha256::digest(format!("{namespace}:{url}").as_bytes());
    let hex = format!("{digest:x}");
    hex[..12].to_string()
}

/// Clamp a configured source weight: missing, non-finite, or non-positive
/// weights fall back to `1.0`.
#[must_use]
pub fn effective_weight(weight: Option<f64>) -> f64 {
    weight
        .filter(|w| w.is_finite() && *w > 0.0)
        .unwrap_or_else(default_weight)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn sample() -> FeedItem {
        FeedItem {
            id: item_fingerprint("hn-ai", "https://example.com/a"),
            source_id: "hn-ai".to_string(),
            source_name: "HN AI".to_string(),
            source_weight: 1.2,
            source_feed: "https://hn.algolia.com/api/v1/search".to_string(),
            source_type: Some(SourceType::Community),
            community_platform: Some("hackernews".to_string()),
            community_query: Some("AI".to_string()),
            title: "Model launch".to_string(),
            summary: String::new(),
            url: "https://example.com/a".to_string(),
            engagement: Some(Engagement {
                score: 120.0,
                comments: 40.0,
            }),
            published_at: Some(Utc.with_ymd_and_hms(2026, 10, 15, 1, 0, 0).unwrap()),
            fetched_at: Utc.with_ymd_and_hms(2026, 10, 15, 2, 0, 0).unwrap(),
            first_seen_at: None,
            last_seen_at: None,
            extra: Map::new(),
        }
    }

    #[test]
    fn fingerprint_is_stable_and_short() {
        let a = item_fingerprint("src", "https://example.com/a");
        let b = item_fingerprint("src", "https://example.com/a");
        let c = item_fingerprint("other", "https://example.com/a");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 12);
        assert!(a.chars().all(|ch| ch.is_ascii_hexdigit()));
    }

    #[test]
    fn serializes_camel_case_and_millis() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["sourceId"], "hn-ai");
        assert_eq!(value["sourceType"], "community");
        assert_eq!(value["publishedAt"], "2026-10-15T01:00:00.000Z");
        assert!(value.get("firstSeenAt").is_none());
    }

    #[test]
    fn round_trip_preserves_unknown_fields() {
        let line = json!({
            "id": "abc",
            "sourceId": "feed-a",
            "title": "Hello",
            "url": "https://example.com/x",
            "fetchedAt": "2026-10-15T02:00:00.000Z",
            "points": 42,
            "draftNote": "keep me"
        });
        let item: FeedItem = serde_json::from_value(line.clone()).unwrap();
        assert_eq!(item.extra["draftNote"], "keep me");
        assert!((item.source_weight - 1.0).abs() < f64::EPSILON);

        let back = serde_json::to_value(&item).unwrap();
        for (key, value) in line.as_object().unwrap() {
            assert_eq!(&back[key], value, "field {key} changed");
        }
    }

    #[test]
    fn unparseable_timestamp_reads_as_epoch() {
        let item: FeedItem = serde_json::from_value(json!({
            "url": "https://example.com/x",
            "publishedAt": "not a date",
            "fetchedAt": "2026-10-15T02:00:00.000Z"
        }))
        .unwrap();
        assert_eq!(item.recency_timestamp().timestamp_millis(), 0);
    }

    #[test]
    fn loose_engagement_counts_keep_the_line_readable() {
        let item: FeedItem = serde_json::from_str(
            r#"{
                "url": "https://example.com/x",
                "sourceWeight": "1.5",
                "engagement": {"score": "88", "comments": null},
                "fetchedAt": "2026-10-15T02:00:00.000Z"
            }"#,
        )
        .unwrap();
        assert_eq!(
            item.engagement,
            Some(Engagement {
                score: 88.0,
                comments: 0.0
            })
        );
        assert!((item.source_weight - 1.5).abs() < f64::EPSILON);

        let junk: FeedItem = serde_json::from_str(
            r#"{"url": "https://example.com/y", "sourceWeight": null, "engagement": {"score": "lots"}}"#,
        )
        .unwrap();
        assert!(junk.engagement_score().abs() < f64::EPSILON);
        assert!((junk.source_weight - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn engagement_falls_back_through_legacy_keys() {
        let mut item = sample();
        item.engagement = None;
        item.extra.insert("points".to_string(), json!(15));
        item.extra.insert("commentsCount".to_string(), json!("7"));
        assert!((item.engagement_score() - 15.0).abs() < f64::EPSILON);
        assert!((item.engagement_comments() - 7.0).abs() < f64::EPSILON);

        // A zero in an earlier slot does not shadow a later non-zero value.
        item.engagement = Some(Engagement::default());
        item.extra.insert("communityScore".to_string(), json!(3));
        assert!((item.engagement_score() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn overlay_keeps_previous_optionals_when_incoming_lacks_them() {
        let prev = sample();
        let mut incoming = sample();
        incoming.source_type = None;
        incoming.engagement = None;
        incoming.title = "Updated".to_string();

        let merged = prev.clone().overlay(incoming);
        assert_eq!(merged.title, "Updated");
        assert_eq!(merged.source_type, Some(SourceType::Community));
        assert_eq!(merged.engagement, prev.engagement);
    }

    #[test]
    fn effective_weight_defaults_non_positive() {
        assert!((effective_weight(None) - 1.0).abs() < f64::EPSILON);
        assert!((effective_weight(Some(0.0)) - 1.0).abs() < f64::EPSILON);
        assert!((effective_weight(Some(f64::NAN)) - 1.0).abs() < f64::EPSILON);
        assert!((effective_weight(Some(1.5)) - 1.5).abs() < f64::EPSILON);
    }
}
