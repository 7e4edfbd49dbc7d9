//! `select` handler: score the inbox and write `selected-topics.json`.

use std::fs;
use std::path::Path;

use anyhow::Context;
use blogfeed_core::{load_keyword_rules, AppConfig, SelectionResult};
use blogfeed_inbox::read_inbox;
use blogfeed_rank::{build_selection, CandidateFilter, SelectionPolicy};
use chrono::Utc;

/// Pick the day's topics from the inbox.
///
/// # Errors
///
/// Returns an error if the keyword rules are unusable, the inbox is empty or
/// unreadable, or the selection file cannot be written.
pub(crate) fn run_select(
    config: &AppConfig,
    count: usize,
    max_age_hours: u32,
    min_score: f64,
    include_seed: bool,
) -> anyhow::Result<()> {
    let rules = load_keyword_rules(&config.keywords_path())?;

    let inbox_path = config.inbox_path();
    let inbox = read_inbox(&inbox_path)?;
    if inbox.is_empty() {
        anyhow::bail!(
            "no inbox records found in {}; run collect-feeds or collect-community first",
            inbox_path.display()
        );
    }

    let filter = CandidateFilter::new(max_age_hours, min_score, include_seed);
    let result = build_selection(
        inbox,
        &rules,
        &filter,
        count,
        &SelectionPolicy::default(),
        Utc::now(),
    );

    let output = config.selected_topics_path();
    write_selection(&output, &result)?;

    println!(
        "Selected {} topics -> {}",
        result.items.len(),
        output.display()
    );
    for topic in &result.items {
        println!(
            "- [{}] (score {:.1}, engagement {:.1}) {}",
            topic.bucket, topic.score, topic.engagement_score, topic.item.title
        );
    }
    Ok(())
}

/// Write the selection as pretty-printed JSON with a trailing newline.
pub(crate) fn write_selection(path: &Path, result: &SelectionResult) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let mut body = serde_json::to_string_pretty(result)?;
    body.push('\n');
    fs::write(path, body).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
