use std::path::PathBuf;

/// Runtime settings, loaded from `BLOGFEED_*` environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
    pub log_level: String,
    pub http_timeout_secs: u64,
    pub feed_user_agent: String,
    pub community_user_agent: String,
    pub max_concurrent_sources: usize,
    /// Inbox bound used by the feed collector.
    pub feed_inbox_capacity: usize,
    /// Inbox bound used by the community collector, which sees more churn.
    pub community_inbox_capacity: usize,
    pub hn_base_url: String,
    pub reddit_base_url: String,
}

impl AppConfig {
    #[must_use]
    pub fn sources_path(&self) -> PathBuf {
        self.config_dir.join("sources.json")
    }

    #[must_use]
    pub fn community_sources_path(&self) -> PathBuf {
        self.config_dir.join("community-sources.json")
    }

    #[must_use]
    pub fn keywords_path(&self) -> PathBuf {
        self.config_dir.join("keywords.json")
    }

    #[must_use]
    pub fn inbox_path(&self) -> PathBuf {
        self.data_dir.join("inbox.jsonl")
    }

    #[must_use]
    pub fn selected_topics_path(&self) -> PathBuf {
        self.data_dir.join("selected-topics.json")
    }
}
