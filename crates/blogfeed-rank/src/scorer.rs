//! Keyword and signal scorer for inbox items.

use blogfeed_core::item::effective_weight;
use blogfeed_core::{BucketRule, FeedItem, KeywordRules, ScoredItem};
use chrono::{DateTime, Utc};

/// Words that mark a story as time-sensitive. Each one present adds
/// [`HOT_SIGNAL_POINTS`].
pub(crate) const HOT_SIGNALS: &[&str] = &[
    "launch",
    "announced",
    "release",
    "preview",
    "beta",
    "benchmark",
    "security",
    "incident",
    "outage",
    "breaking",
];

const INCLUDE_POINTS: f64 = 6.0;
const BOOST_POINTS: f64 = 4.0;
const HOT_SIGNAL_POINTS: f64 = 2.0;
const SOURCE_SCORE_CAP: f64 = 20.0;
const ENGAGEMENT_CAP: f64 = 35.0;
const COMMUNITY_BONUS: f64 = 8.0;
const COMMUNITY_ENGAGEMENT_BONUS: f64 = 2.0;

/// `(max age in hours, points)`, checked in order.
const RECENCY_STEPS: [(f64, f64); 5] = [
    (6.0, 25.0),
    (12.0, 20.0),
    (24.0, 14.0),
    (48.0, 8.0),
    (72.0, 4.0),
];

/// Bucket assigned when no rule gets a single hit.
pub const DEFAULT_BUCKET: &str = "AI";
const TITLE_KEY_TOKENS: usize = 8;

/// Score one item against the keyword rules as of `now`.
///
/// Any exclude hit forces the total to `0.0`; the components are still
/// reported so the veto is visible in the output.
#[must_use]
pub fn score_item(item: FeedItem, rules: &KeywordRules, now: DateTime<Utc>) -> ScoredItem {
    let text = format!("{} {}", item.title, item.summary).to_lowercase();

    let include_hits = match_count(&text, &rules.include);
    let boost_hits = match_count(&text, &rules.boost);
    let exclude_hits = match_count(&text, &rules.exclude);

    let recency = recency_score(age_hours(item.recency_timestamp(), now));
    let source = source_score(item.source_weight);
    let hot = f64::from(match_count(&text, HOT_SIGNALS)) * HOT_SIGNAL_POINTS;
    let engagement = engagement_score(&item);
    let community_bonus = if item.is_community() {
        COMMUNITY_BONUS
    } else {
        0.0
    };

    let raw = f64::from(include_hits) * INCLUDE_POINTS
        + f64::from(boost_hits) * BOOST_POINTS
        + hot
        + recency
        + source
        + engagement
        + community_bonus;
    let score = if exclude_hits > 0 { 0.0 } else { raw };

    let bucket = detect_bucket(&text, &rules.bucket_rules);
    let title_key = title_key(&item.title);

    ScoredItem {
        item,
        score,
        include_hits,
        boost_hits,
        recency_score: recency,
        source_score: source,
        engagement_score: engagement,
        community_bonus,
        bucket,
        title_key,
    }
}

/// Number of distinct keywords contained in `text` (already lowercased).
///
/// Keywords are lowercased and trimmed; blank ones never match. Each keyword
/// counts at most once however often it occurs.
#[must_use]
pub fn match_count<S: AsRef<str>>(text: &str, keywords: &[S]) -> u32 {
    let hits = keywords
        .iter()
        .map(|k| k.as_ref().trim().to_lowercase())
        .filter(|k| !k.is_empty() && text.contains(k.as_str()))
        .count();
    u32::try_from(hits).unwrap_or(u32::MAX)
}

/// Hours between `published` and `now`, never negative.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn age_hours(published: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let millis = (now - published).num_milliseconds();
    (millis as f64 / 3_600_000.0).max(0.0)
}

pub(crate) fn recency_score(age_hours: f64) -> f64 {
    RECENCY_STEPS
        .iter()
        .find(|(max_age, _)| age_hours <= *max_age)
        .map_or(0.0, |(_, points)| *points)
}

fn source_score(weight: f64) -> f64 {
    (effective_weight(Some(weight)) * 10.0).min(SOURCE_SCORE_CAP)
}

/// Log-scaled popularity, capped so huge threads cannot dominate.
fn engagement_score(item: &FeedItem) -> f64 {
    let score = item.engagement_score().max(0.0);
    let comments = item.engagement_comments().max(0.0);
    if score <= 0.0 && comments <= 0.0 {
        return 0.0;
    }

    let bonus = if item.is_community() {
        COMMUNITY_ENGAGEMENT_BONUS
    } else {
        0.0
    };
    ((score + 1.0).log10() * 12.0 + (comments + 1.0).log10() * 10.0 + bonus).min(ENGAGEMENT_CAP)
}

/// Bucket whose keywords hit most often. Ties go to the rule listed first;
/// no hits at all gives [`DEFAULT_BUCKET`].
#[must_use]
pub fn detect_bucket(text: &str, rules: &[BucketRule]) -> String {
    let mut best: Option<(&str, u32)> = None;
    for rule in rules {
        let hits = match_count(text, &rule.keywords);
        if hits > best.map_or(0, |(_, h)| h) {
            best = Some((rule.name.as_str(), hits));
        }
    }
    best.map_or(DEFAULT_BUCKET, |(name, _)| name).to_string()
}

/// Near-duplicate key for a title: lowercase ASCII letters, digits and Hangul
/// syllables survive, everything else separates tokens. The first eight
/// tokens are joined with `-`.
#[must_use]
pub fn title_key(title: &str) -> String {
    let cleaned: String = title
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || is_hangul_syllable(c) {
                c
            } else {
                ' '
            }
        })
        .collect();
    cleaned
        .split_whitespace()
        .take(TITLE_KEY_TOKENS)
        .collect::<Vec<_>>()
        .join("-")
}

fn is_hangul_syllable(c: char) -> bool {
    ('\u{AC00}'..='\u{D7A3}').contains(&c)
}

#[cfg(test)]
#[path = "scorer_test.rs"]
mod tests;
