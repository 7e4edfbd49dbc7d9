//! Source descriptors from `config/sources.json` and
//! `config/community-sources.json`.
//!
//! Both files hold a JSON array. Entries missing their required fields (or
//! that are not objects at all) are skipped without error; only a file with
//! no usable entry is fatal.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::item::effective_weight;
use crate::ConfigError;

/// An RSS/Atom endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSource {
    pub id: String,
    pub name: String,
    pub feed: String,
    pub weight: f64,
    /// Base for resolving root-relative entry links.
    pub homepage: Option<String>,
}

/// A community platform query. `kind` is the raw `type` field; unknown kinds
/// are rejected at fetch time, not at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct CommunitySource {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub weight: f64,
    pub query: Option<String>,
    pub subreddit: Option<String>,
    pub sort: Option<String>,
    pub time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawFeedSource {
    id: Option<String>,
    feed: Option<String>,
    name: Option<String>,
    weight: Option<Value>,
    homepage: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCommunitySource {
    id: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    name: Option<String>,
    weight: Option<Value>,
    query: Option<String>,
    subreddit: Option<String>,
    sort: Option<String>,
    time: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_weight(value: Option<&Value>) -> f64 {
    let raw = value.and_then(|v| {
        v.as_f64()
            .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
    });
    effective_weight(raw)
}

impl RawFeedSource {
    fn into_source(self) -> Option<FeedSource> {
        let id = non_empty(self.id)?;
        let feed = non_empty(self.feed)?;
        Some(FeedSource {
            name: non_empty(self.name).unwrap_or_else(|| id.clone()),
            weight: parse_weight(self.weight.as_ref()),
            homepage: non_empty(self.homepage),
            id,
            feed,
        })
    }
}

impl RawCommunitySource {
    fn into_source(self) -> Option<CommunitySource> {
        let id = non_empty(self.id)?;
        let kind = non_empty(self.kind)?;
        Some(CommunitySource {
            name: non_empty(self.name).unwrap_or_else(|| id.clone()),
            weight: parse_weight(self.weight.as_ref()),
            query: self.query,
            subreddit: self.subreddit,
            sort: non_empty(self.sort),
            time: non_empty(self.time),
            id,
            kind,
        })
    }
}

fn read_array(path: &Path) -> Result<Vec<Value>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    let value: Value = serde_json::from_str(&content).map_err(|e| ConfigError::FileParse {
        path: path.display().to_string(),
        source: e,
    })?;
    match value {
        Value::Array(entries) => Ok(entries),
        _ => Err(ConfigError::NoSources(path.display().to_string())),
    }
}

fn load_sources<R, T>(path: &Path, convert: fn(R) -> Option<T>) -> Result<Vec<T>, ConfigError>
where
    R: DeserializeOwned,
{
    let sources: Vec<T> = read_array(path)?
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<R>(entry).ok())
        .filter_map(convert)
        .collect();

    if sources.is_empty() {
        return Err(ConfigError::NoSources(path.display().to_string()));
    }
    Ok(sources)
}

/// Load feed sources. Entries without `id` or `feed` are skipped.
///
/// # Errors
///
/// Returns `ConfigError` if the file is missing, unparseable, not an array,
/// or yields no usable source.
pub fn load_feed_sources(path: &Path) -> Result<Vec<FeedSource>, ConfigError> {
    load_sources(path, RawFeedSource::into_source)
}

/// Load community sources. Entries without `id` or `type` are skipped.
///
/// # Errors
///
/// Returns `ConfigError` if the file is missing, unparseable, not an array,
/// or yields no usable source.
pub fn load_community_sources(path: &Path) -> Result<Vec<CommunitySource>, ConfigError> {
    load_sources(path, RawCommunitySource::into_source)
}

#[cfg(test)]
#[path = "sources_test.rs"]
mod tests;
