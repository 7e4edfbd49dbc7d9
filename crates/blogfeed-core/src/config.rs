use std::path::PathBuf;
use std::str::FromStr;

use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a plain
/// `HashMap`. Every variable has a default.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| default.to_string())
    };

    let parse_positive = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        let value = u64::from_str(&raw).map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })?;
        if value == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(value)
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let value = parse_positive(var, default)?;
        usize::try_from(value).map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let config_dir = PathBuf::from(or_default("BLOGFEED_CONFIG_DIR", "./config"));
    let data_dir = PathBuf::from(or_default("BLOGFEED_DATA_DIR", "./data"));
    let log_level = or_default("BLOGFEED_LOG_LEVEL", "info");

    let http_timeout_secs = parse_positive("BLOGFEED_HTTP_TIMEOUT_SECS", "20")?;
    let feed_user_agent = or_default("BLOGFEED_FEED_USER_AGENT", "blog-feed-collector/1.0");
    let community_user_agent = or_default(
        "BLOGFEED_COMMUNITY_USER_AGENT",
        "blog-community-collector/1.0",
    );
    let max_concurrent_sources = parse_usize("BLOGFEED_MAX_CONCURRENT_SOURCES", "4")?;
    let feed_inbox_capacity = parse_usize("BLOGFEED_FEED_INBOX_CAPACITY", "2500")?;
    let community_inbox_capacity = parse_usize("BLOGFEED_COMMUNITY_INBOX_CAPACITY", "3500")?;

    let hn_base_url = or_default("BLOGFEED_HN_BASE_URL", "https://hn.algolia.com");
    let reddit_base_url = or_default("BLOGFEED_REDDIT_BASE_URL", "https://www.reddit.com");

    Ok(AppConfig {
        config_dir,
        data_dir,
        log_level,
        http_timeout_secs,
        feed_user_agent,
        community_user_agent,
        max_concurrent_sources,
        feed_inbox_capacity,
        community_inbox_capacity,
        hn_base_url,
        reddit_base_url,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
