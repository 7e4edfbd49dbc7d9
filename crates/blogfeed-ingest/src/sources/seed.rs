//! Offline test items appended by `--seed`.
//!
//! Seed items carry a `seed*` source id so selection can tell them apart
//! from fetched items and skip them unless asked otherwise.

use blogfeed_core::{item_fingerprint, Engagement, FeedItem, SourceType};
use chrono::{DateTime, Utc};
use serde_json::Map;

struct FeedSeed {
    source_name: &'static str,
    title: &'static str,
    summary: &'static str,
    url: &'static str,
}

const FEED_SEEDS: [FeedSeed; 3] = [
    FeedSeed {
        source_name: "Seed: AI Daily",
        title: "Gemini 3.1 Pro practical performance notes",
        summary: "AI model update and benchmark discussion for developer workflows.",
        url: "https://blog.google/technology/ai/",
    },
    FeedSeed {
        source_name: "Seed: iOS Watch",
        title: "Xcode build speed tweaks for larger Swift projects",
        summary: "A short guide on iOS and Swift build setting adjustments with practical results.",
        url: "https://developer.apple.com/news/",
    },
    FeedSeed {
        source_name: "Seed: IT Brief",
        title: "Cloud outage postmortem checklist for engineering teams",
        summary: "Incident response and communication checklist for platform and backend teams.",
        url: "https://github.blog/changelog/",
    },
];

struct CommunitySeed {
    source_id: &'static str,
    source_name: &'static str,
    weight: f64,
    platform: &'static str,
    query: &'static str,
    title: &'static str,
    summary: &'static str,
    url: &'static str,
    score: f64,
    comments: f64,
}

const COMMUNITY_SEEDS: [CommunitySeed; 3] = [
    CommunitySeed {
        source_id: "seed-community-ai",
        source_name: "Seed Community AI",
        weight: 1.3,
        platform: "hackernews",
        query: "AI",
        title: "Gemini 3.1 Pro launch discussion is trending",
        summary: "Community reactions focus on model quality and inference speed.",
        url: "https://hn.algolia.com/?query=Gemini%203.1%20Pro",
        score: 420.0,
        comments: 188.0,
    },
    CommunitySeed {
        source_id: "seed-community-ios",
        source_name: "Seed Community iOS",
        weight: 1.2,
        platform: "reddit",
        query: "r/iOSProgramming",
        title: "Xcode build performance tips thread gains traction",
        summary: "Developers discuss practical build speed improvements on larger iOS apps.",
        url: "https://www.reddit.com/r/iOSProgramming/search/?q=xcode+build+speed&restrict_sr=1&sort=top&t=week",
        score: 260.0,
        comments: 94.0,
    },
    CommunitySeed {
        source_id: "seed-community-it",
        source_name: "Seed Community IT",
        weight: 1.1,
        platform: "reddit",
        query: "r/devops",
        title: "Cloud outage retrospective template shared by operators",
        summary: "Ops community highlights checklist patterns for postmortems and incident comms.",
        url: "https://www.reddit.com/r/devops/search/?q=outage+retrospective&restrict_sr=1&sort=top&t=week",
        score: 210.0,
        comments: 77.0,
    },
];

/// Three feed items stamped with `now`.
#[must_use]
pub fn feed_seed_items(now: DateTime<Utc>) -> Vec<FeedItem> {
    FEED_SEEDS
        .iter()
        .map(|seed| FeedItem {
            id: item_fingerprint("seed", seed.url),
            source_id: "seed".to_string(),
            source_name: seed.source_name.to_string(),
            source_weight: 0.8,
            source_feed: "seed://daily".to_string(),
            source_type: None,
            community_platform: None,
            community_query: None,
            title: seed.title.to_string(),
            summary: seed.summary.to_string(),
            url: seed.url.to_string(),
            engagement: None,
            published_at: Some(now),
            fetched_at: now,
            first_seen_at: None,
            last_seen_at: None,
            extra: Map::new(),
        })
        .collect()
}

/// Three community items with engagement, stamped with `now`.
#[must_use]
pub fn community_seed_items(now: DateTime<Utc>) -> Vec<FeedItem> {
    COMMUNITY_SEEDS
        .iter()
        .map(|seed| FeedItem {
            id: item_fingerprint("seed-community", &format!("{}:{}", seed.url, seed.title)),
            source_id: seed.source_id.to_string(),
            source_name: seed.source_name.to_string(),
            source_weight: seed.weight,
            source_feed: "seed://community".to_string(),
            source_type: Some(SourceType::Community),
            community_platform: Some(seed.platform.to_string()),
            community_query: Some(seed.query.to_string()),
            title: seed.title.to_string(),
            summary: seed.summary.to_string(),
            url: seed.url.to_string(),
            engagement: Some(Engagement {
                score: seed.score,
                comments: seed.comments,
            }),
            published_at: Some(now),
            fetched_at: now,
            first_seen_at: None,
            last_seen_at: None,
            extra: Map::new(),
        })
        .collect()
}
