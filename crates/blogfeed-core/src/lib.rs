//! Shared data model and configuration for the blogfeed topic pipeline.
//!
//! Every other crate in the workspace speaks in terms of [`FeedItem`]: the
//! fetchers produce them, the inbox persists them, and the ranker turns them
//! into [`ScoredItem`]s for the daily [`SelectionResult`].

pub mod app_config;
pub mod config;
pub mod error;
pub mod item;
pub mod keywords;
pub mod scored;
pub mod sources;
pub mod timestamp;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use item::{item_fingerprint, Engagement, FeedItem, SourceType};
pub use keywords::{load_keyword_rules, BucketRule, KeywordRules};
pub use scored::{ScoredItem, SelectionResult};
pub use sources::{load_community_sources, load_feed_sources, CommunitySource, FeedSource};
