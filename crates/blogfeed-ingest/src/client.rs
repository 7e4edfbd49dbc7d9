//! HTTP access for all source fetchers.
//!
//! Feed endpoints and community APIs are fetched with separate `reqwest`
//! clients so each declares its own user agent. Both share the per-request
//! timeout. Nothing is retried: a failed request fails the source for this
//! run.

use std::time::Duration;

use blogfeed_core::AppConfig;
use reqwest::header::ACCEPT;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::FetchError;

pub(crate) const DEFAULT_HN_BASE_URL: &str = "https://hn.algolia.com";
pub(crate) const DEFAULT_REDDIT_BASE_URL: &str = "https://www.reddit.com";

/// Shared HTTP client for feed and community fetches.
///
/// Use [`IngestClient::new`] for production or
/// [`IngestClient::with_base_urls`] to point the community APIs at a mock
/// server in tests.
#[derive(Debug, Clone)]
pub struct IngestClient {
    feed_http: Client,
    community_http: Client,
    hn_base_url: Url,
    reddit_base_url: Url,
}

impl IngestClient {
    /// Creates a client pointed at the public Hacker News and Reddit APIs.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if a `reqwest::Client` cannot be built.
    pub fn new(
        timeout_secs: u64,
        feed_user_agent: &str,
        community_user_agent: &str,
    ) -> Result<Self, FetchError> {
        Self::with_base_urls(
            timeout_secs,
            feed_user_agent,
            community_user_agent,
            DEFAULT_HN_BASE_URL,
            DEFAULT_REDDIT_BASE_URL,
        )
    }

    /// Creates a client from the application config.
    ///
    /// # Errors
    ///
    /// Same as [`IngestClient::with_base_urls`].
    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        Self::with_base_urls(
            config.http_timeout_secs,
            &config.feed_user_agent,
            &config.community_user_agent,
            &config.hn_base_url,
            &config.reddit_base_url,
        )
    }

    /// Creates a client with custom community API base URLs.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if a `reqwest::Client` cannot be built,
    /// or [`FetchError::InvalidEndpoint`] if a base URL does not parse.
    pub fn with_base_urls(
        timeout_secs: u64,
        feed_user_agent: &str,
        community_user_agent: &str,
        hn_base_url: &str,
        reddit_base_url: &str,
    ) -> Result<Self, FetchError> {
        let build = |user_agent: &str| {
            Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .connect_timeout(Duration::from_secs(10))
                .user_agent(user_agent)
                .build()
        };

        Ok(Self {
            feed_http: build(feed_user_agent)?,
            community_http: build(community_user_agent)?,
            hn_base_url: parse_base_url(hn_base_url)?,
            reddit_base_url: parse_base_url(reddit_base_url)?,
        })
    }

    pub(crate) fn hn_base_url(&self) -> &Url {
        &self.hn_base_url
    }

    pub(crate) fn reddit_base_url(&self) -> &Url {
        &self.reddit_base_url
    }

    /// GET a feed document as text.
    pub(crate) async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .feed_http
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response.text().await.map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })
    }

    /// GET a community API endpoint and decode the JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, FetchError> {
        let response = self
            .community_http
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await.map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })?;
        serde_json::from_str(&body).map_err(|source| FetchError::Deserialize {
            context: url.to_string(),
            source,
        })
    }
}

/// Normalise a base URL so it ends with exactly one slash; `Url::join` then
/// appends API paths instead of replacing the last segment.
fn parse_base_url(raw: &str) -> Result<Url, FetchError> {
    let normalised = format!("{}/", raw.trim().trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| FetchError::InvalidEndpoint {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}
