//! Hacker News story search via the Algolia API.

use blogfeed_core::timestamp::parse_timestamp;
use blogfeed_core::{item_fingerprint, CommunitySource, Engagement, FeedItem, SourceType};
use chrono::{DateTime, Utc};
use reqwest::Url;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::{number_or_zero, CommunityOptions};
use crate::client::IngestClient;
use crate::error::FetchError;
use crate::normalize::normalize_url;

const SEARCH_PATH: &str = "api/v1/search";
const ITEM_URL_PREFIX: &str = "https://news.ycombinator.com/item?id=";

/// Top-level search response. `hits` stays raw so that one malformed hit
/// only loses itself.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Value,
}

#[derive(Debug, Deserialize)]
struct Hit {
    url: Option<String>,
    title: Option<String>,
    story_title: Option<String>,
    #[serde(rename = "objectID")]
    object_id: Option<Value>,
    points: Option<Value>,
    num_comments: Option<Value>,
    created_at: Option<String>,
}

/// Search stories matching the source query published within the age window.
///
/// A source without a query yields no items and makes no request.
///
/// # Errors
///
/// Returns [`FetchError`] when the request fails, the status is not 2xx, or
/// the body is not JSON.
pub(super) async fn fetch_hackernews(
    client: &IngestClient,
    source: &CommunitySource,
    options: CommunityOptions,
) -> Result<Vec<FeedItem>, FetchError> {
    let query = source.query.as_deref().map(str::trim).unwrap_or_default();
    if query.is_empty() {
        return Ok(Vec::new());
    }

    let now = Utc::now();
    let since = now.timestamp() - i64::from(options.max_age_hours) * 3600;
    let endpoint = search_url(client.hn_base_url(), query, options.limit, since)?;

    let response: SearchResponse = client.get_json(&endpoint).await?;
    Ok(hits_to_items(&response.hits, source, query, endpoint.as_str(), now))
}

fn search_url(base: &Url, query: &str, limit: usize, since: i64) -> Result<Url, FetchError> {
    let mut url = base
        .join(SEARCH_PATH)
        .map_err(|e| FetchError::InvalidEndpoint {
            url: base.to_string(),
            reason: e.to_string(),
        })?;
    url.query_pairs_mut()
        .append_pair("query", query)
        .append_pair("tags", "story")
        .append_pair("hitsPerPage", &limit.to_string())
        .append_pair("numericFilters", &format!("created_at_i>{since}"));
    Ok(url)
}

fn hits_to_items(
    hits: &Value,
    source: &CommunitySource,
    query: &str,
    endpoint: &str,
    fetched_at: DateTime<Utc>,
) -> Vec<FeedItem> {
    let Some(hits) = hits.as_array() else {
        return Vec::new();
    };

    hits.iter()
        .filter_map(|raw| {
            let hit = match serde_json::from_value::<Hit>(raw.clone()) {
                Ok(hit) => hit,
                Err(e) => {
                    tracing::debug!(source = %source.id, error = %e, "skipping malformed HN hit");
                    return None;
                }
            };
            hit_to_item(hit, source, query, endpoint, fetched_at)
        })
        .collect()
}

fn hit_to_item(
    hit: Hit,
    source: &CommunitySource,
    query: &str,
    endpoint: &str,
    fetched_at: DateTime<Utc>,
) -> Option<FeedItem> {
    let raw_url = match hit.url.filter(|u| !u.trim().is_empty()) {
        Some(url) => url,
        None => format!("{ITEM_URL_PREFIX}{}", object_id(hit.object_id.as_ref())?),
    };
    let url = normalize_url(&raw_url, None);
    let title = hit
        .title
        .filter(|t| !t.trim().is_empty())
        .or(hit.story_title)
        .map(|t| t.trim().to_string())
        .unwrap_or_default();
    if url.is_empty() || title.is_empty() {
        return None;
    }

    let published_at = hit
        .created_at
        .as_deref()
        .and_then(parse_timestamp)
        .unwrap_or(fetched_at);

    Some(FeedItem {
        id: item_fingerprint(&source.id, &url),
        source_id: source.id.clone(),
        source_name: source.name.clone(),
        source_weight: source.weight,
        source_feed: endpoint.to_string(),
        source_type: Some(SourceType::Community),
        community_platform: Some("hackernews".to_string()),
        community_query: Some(query.to_string()),
        title,
        summary: String::new(),
        url,
        engagement: Some(Engagement {
            score: number_or_zero(hit.points.as_ref()),
            comments: number_or_zero(hit.num_comments.as_ref()),
        }),
        published_at: Some(published_at),
        fetched_at,
        first_seen_at: None,
        last_seen_at: None,
        extra: Map::new(),
    })
}

fn object_id(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
