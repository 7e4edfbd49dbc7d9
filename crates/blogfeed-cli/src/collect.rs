//! `collect-feeds` and `collect-community` handlers.
//!
//! Both follow the same shape: load sources, fetch them concurrently, append
//! seed items on request, then merge the batch into the inbox and write it
//! back. Per-source failures are logged by the collectors and never abort
//! the run; whatever was gathered is persisted.

use std::path::Path;

use anyhow::Context;
use blogfeed_core::{load_community_sources, load_feed_sources, AppConfig, FeedItem};
use blogfeed_inbox::{read_inbox, write_inbox, Inbox};
use blogfeed_ingest::{
    collect_community_items, collect_feed_items, community_seed_items, feed_seed_items,
    CommunityOptions, IngestClient,
};
use chrono::Utc;

/// Fetch all feed sources and merge the results into the inbox.
///
/// # Errors
///
/// Returns an error if the source config is unusable, the HTTP client cannot
/// be built, or the inbox cannot be read or written.
pub(crate) async fn run_collect_feeds(
    config: &AppConfig,
    seed: bool,
    max_per_source: usize,
) -> anyhow::Result<()> {
    let sources = load_feed_sources(&config.sources_path())?;
    let client = IngestClient::from_config(config)?;

    let mut outcome = collect_feed_items(
        &client,
        &sources,
        max_per_source.max(1),
        config.max_concurrent_sources,
    )
    .await;

    if outcome.failed > 0 {
        tracing::warn!(
            failed = outcome.failed,
            total = sources.len(),
            "some feed sources failed"
        );
    }

    if seed {
        let seeds = feed_seed_items(Utc::now());
        println!("[seed] appended {} local test items", seeds.len());
        outcome.items.extend(seeds);
    }

    let saved = persist_batch(&config.inbox_path(), outcome.items, config.feed_inbox_capacity)?;
    println!("Saved {saved} records -> {}", config.inbox_path().display());
    Ok(())
}

/// Fetch all community sources and merge the results into the inbox.
///
/// # Errors
///
/// Same as [`run_collect_feeds`].
pub(crate) async fn run_collect_community(
    config: &AppConfig,
    seed: bool,
    max_per_source: usize,
    max_age_hours: u32,
) -> anyhow::Result<()> {
    let sources = load_community_sources(&config.community_sources_path())?;
    let client = IngestClient::from_config(config)?;
    let options = CommunityOptions::new(max_per_source, max_age_hours);

    let mut outcome =
        collect_community_items(&client, &sources, options, config.max_concurrent_sources).await;

    if outcome.failed > 0 {
        tracing::warn!(
            failed = outcome.failed,
            total = sources.len(),
            "some community sources failed"
        );
    }

    if seed {
        let seeds = community_seed_items(Utc::now());
        println!("[seed] appended {} local community test items", seeds.len());
        outcome.items.extend(seeds);
    }

    let saved = persist_batch(
        &config.inbox_path(),
        outcome.items,
        config.community_inbox_capacity,
    )?;
    println!("Saved {saved} records -> {}", config.inbox_path().display());
    Ok(())
}

/// Read the inbox, merge `batch` into it, and write it back. Returns the
/// number of records saved.
pub(crate) fn persist_batch(
    path: &Path,
    batch: Vec<FeedItem>,
    capacity: usize,
) -> anyhow::Result<usize> {
    let existing = read_inbox(path)
        .with_context(|| format!("failed to load inbox {}", path.display()))?;
    let incoming = batch.len();

    let inbox = Inbox::new(existing, capacity).apply(batch);
    write_inbox(path, inbox.records())
        .with_context(|| format!("failed to save inbox {}", path.display()))?;

    tracing::info!(incoming, saved = inbox.len(), capacity, "inbox updated");
    Ok(inbox.len())
}
