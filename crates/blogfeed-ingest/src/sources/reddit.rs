//! Public Reddit subreddit listings (`/r/{sub}/{sort}.json`).

use blogfeed_core::timestamp::from_unix_seconds;
use blogfeed_core::{item_fingerprint, CommunitySource, Engagement, FeedItem, SourceType};
use chrono::{DateTime, Duration, Utc};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::Url;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::{number_or_zero, CommunityOptions};
use crate::client::IngestClient;
use crate::error::FetchError;
use crate::normalize::normalize_url;

/// Permalinks are site-relative; they always resolve against the public site,
/// even when the API base points elsewhere.
const REDDIT_HOMEPAGE: &str = "https://www.reddit.com";
const DEFAULT_SORT: &str = "top";
const DEFAULT_TIME: &str = "day";
const SUMMARY_MAX_CHARS: usize = 220;

/// Characters left alone by a URI component encoder.
const PATH_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Deserialize)]
struct PostData {
    title: Option<String>,
    url_overridden_by_dest: Option<String>,
    url: Option<String>,
    permalink: Option<String>,
    selftext: Option<String>,
    created_utc: Option<f64>,
    score: Option<Value>,
    num_comments: Option<Value>,
}

/// Fetch a subreddit listing and keep posts inside the age window.
///
/// A source without a subreddit yields no items and makes no request.
///
/// # Errors
///
/// Returns [`FetchError`] when the request fails, the status is not 2xx, or
/// the body is not JSON.
pub(super) async fn fetch_reddit(
    client: &IngestClient,
    source: &CommunitySource,
    options: CommunityOptions,
) -> Result<Vec<FeedItem>, FetchError> {
    let subreddit = source.subreddit.as_deref().map(str::trim).unwrap_or_default();
    if subreddit.is_empty() {
        return Ok(Vec::new());
    }
    let sort = source.sort.as_deref().unwrap_or(DEFAULT_SORT);
    let time = source.time.as_deref().unwrap_or(DEFAULT_TIME);

    let endpoint = listing_url(client.reddit_base_url(), subreddit, sort, time, options.limit)?;
    let listing: Value = client.get_json(&endpoint).await?;

    let now = Utc::now();
    let cutoff = now - Duration::hours(i64::from(options.max_age_hours));
    Ok(listing_to_items(
        &listing,
        source,
        subreddit,
        endpoint.as_str(),
        now,
        cutoff,
    ))
}

fn listing_url(
    base: &Url,
    subreddit: &str,
    sort: &str,
    time: &str,
    limit: usize,
) -> Result<Url, FetchError> {
    let path = format!(
        "r/{}/{}.json",
        utf8_percent_encode(subreddit, PATH_COMPONENT),
        utf8_percent_encode(sort, PATH_COMPONENT),
    );
    let mut url = base.join(&path).map_err(|e| FetchError::InvalidEndpoint {
        url: format!("{base}{path}"),
        reason: e.to_string(),
    })?;
    url.query_pairs_mut()
        .append_pair("t", time)
        .append_pair("limit", &limit.to_string());
    Ok(url)
}

fn listing_to_items(
    listing: &Value,
    source: &CommunitySource,
    subreddit: &str,
    endpoint: &str,
    fetched_at: DateTime<Utc>,
    cutoff: DateTime<Utc>,
) -> Vec<FeedItem> {
    let Some(children) = listing
        .pointer("/data/children")
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    children
        .iter()
        .filter_map(|child| child.get("data"))
        .filter_map(|data| match serde_json::from_value::<PostData>(data.clone()) {
            Ok(post) => Some(post),
            Err(e) => {
                tracing::debug!(source = %source.id, error = %e, "skipping malformed Reddit post");
                None
            }
        })
        .filter_map(|post| post_to_item(post, source, subreddit, endpoint, fetched_at, cutoff))
        .collect()
}

fn post_to_item(
    post: PostData,
    source: &CommunitySource,
    subreddit: &str,
    endpoint: &str,
    fetched_at: DateTime<Utc>,
    cutoff: DateTime<Utc>,
) -> Option<FeedItem> {
    let title = post.title.as_deref().map(str::trim).unwrap_or_default();
    let raw_url = [post.url_overridden_by_dest, post.url, post.permalink]
        .into_iter()
        .flatten()
        .find(|u| !u.is_empty())
        .unwrap_or_default();
    let url = normalize_url(&raw_url, Some(REDDIT_HOMEPAGE));
    if title.is_empty() || url.is_empty() {
        return None;
    }

    // Posts without a creation time count as brand new.
    let published_at = post
        .created_utc
        .filter(|secs| *secs > 0.0)
        .and_then(from_unix_seconds)
        .unwrap_or(fetched_at);
    if published_at < cutoff {
        return None;
    }

    Some(FeedItem {
        id: item_fingerprint(&source.id, &url),
        source_id: source.id.clone(),
        source_name: source.name.clone(),
        source_weight: source.weight,
        source_feed: endpoint.to_string(),
        source_type: Some(SourceType::Community),
        community_platform: Some("reddit".to_string()),
        community_query: Some(format!("r/{subreddit}")),
        title: title.to_string(),
        summary: summarize(post.selftext.as_deref().unwrap_or_default()),
        url,
        engagement: Some(Engagement {
            score: number_or_zero(post.score.as_ref()),
            comments: number_or_zero(post.num_comments.as_ref()),
        }),
        published_at: Some(published_at),
        fetched_at,
        first_seen_at: None,
        last_seen_at: None,
        extra: Map::new(),
    })
}

fn summarize(selftext: &str) -> String {
    selftext
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(SUMMARY_MAX_CHARS)
        .collect()
}
