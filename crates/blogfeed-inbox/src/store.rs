//! JSON Lines persistence for the inbox.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use blogfeed_core::FeedItem;

use crate::error::InboxError;

fn io_error(path: &Path, source: io::Error) -> InboxError {
    InboxError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Read `inbox.jsonl`.
///
/// A missing file is an empty inbox. Blank lines are ignored and lines that
/// do not parse as a record are logged and skipped.
///
/// # Errors
///
/// Returns [`InboxError::Io`] if the file exists but cannot be read.
pub fn read_inbox(path: &Path) -> Result<Vec<FeedItem>, InboxError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(io_error(path, e)),
    };

    let mut records = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<FeedItem>(line) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    line = line_no + 1,
                    error = %e,
                    "skipping unreadable inbox line"
                );
            }
        }
    }
    Ok(records)
}

/// Replace `inbox.jsonl` with `records`, one JSON object per line.
///
/// The file is written next to the target and renamed over it, so readers
/// never observe a partial inbox. The parent directory is created if needed.
///
/// # Errors
///
/// Returns [`InboxError::Serialize`] if a record cannot be encoded, or
/// [`InboxError::Io`] on any filesystem failure.
pub fn write_inbox(path: &Path, records: &[FeedItem]) -> Result<(), InboxError> {
    let mut body = String::new();
    for record in records {
        let line = serde_json::to_string(record).map_err(|source| InboxError::Serialize {
            url: record.url.clone(),
            source,
        })?;
        if !body.is_empty() {
            body.push('\n');
        }
        body.push_str(&line);
    }
    body.push('\n');

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }

    let tmp = path.with_extension("jsonl.tmp");
    let mut file = fs::File::create(&tmp).map_err(|e| io_error(&tmp, e))?;
    file.write_all(body.as_bytes())
        .and_then(|()| file.sync_all())
        .map_err(|e| io_error(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| io_error(path, e))?;

    tracing::debug!(path = %path.display(), records = records.len(), "inbox written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use blogfeed_core::item_fingerprint;
    use chrono::{TimeZone, Utc};
    use serde_json::{json, Map};

    use super::*;

    fn record(url: &str) -> FeedItem {
        let at = Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap();
        FeedItem {
            id: item_fingerprint("src", url),
            source_id: "src".to_string(),
            source_name: "Source".to_string(),
            source_weight: 1.0,
            source_feed: "https://example.com/feed.xml".to_string(),
            source_type: None,
            community_platform: None,
            community_query: None,
            title: "Title".to_string(),
            summary: "Summary".to_string(),
            url: url.to_string(),
            engagement: None,
            published_at: Some(at),
            fetched_at: at,
            first_seen_at: Some(at),
            last_seen_at: Some(at),
            extra: Map::new(),
        }
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let records = read_inbox(&dir.path().join("inbox.jsonl")).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn round_trip_preserves_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("inbox.jsonl");
        let mut with_extra = record("https://example.com/b");
        with_extra.extra.insert("points".to_string(), json!(12));
        let records = vec![record("https://example.com/a"), with_extra];

        write_inbox(&path, &records).unwrap();
        let read_back = read_inbox(&path).unwrap();
        assert_eq!(read_back, records);

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.ends_with('\n'));
        assert_eq!(raw.lines().count(), 2);
        assert!(raw.contains(r#""publishedAt":"2026-10-14T12:00:00.000Z""#));
        assert!(!path.with_extension("jsonl.tmp").exists());
    }

    #[test]
    fn empty_inbox_is_a_single_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inbox.jsonl");
        write_inbox(&path, &[]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "\n");
        assert!(read_inbox(&path).unwrap().is_empty());
    }

    #[test]
    fn bad_and_blank_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inbox.jsonl");
        let good = serde_json::to_string(&record("https://example.com/ok")).unwrap();
        fs::write(&path, format!("\n{good}\nnot json\n   \n[1,2]\n")).unwrap();

        let records = read_inbox(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].url, "https://example.com/ok");
    }

    #[test]
    fn lenient_timestamps_do_not_drop_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inbox.jsonl");
        fs::write(
            &path,
            r#"{"url":"https://example.com/x","title":"X","publishedAt":"yesterday","fetchedAt":"2026-10-14T12:00:00Z"}"#,
        )
        .unwrap();

        let records = read_inbox(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].published_at, Some(chrono::DateTime::<Utc>::UNIX_EPOCH));
    }

    #[test]
    fn loose_engagement_counts_do_not_drop_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inbox.jsonl");
        fs::write(
            &path,
            r#"{"url":"https://example.com/x","title":"X","engagement":{"score":"31","comments":null},"fetchedAt":"2026-10-14T12:00:00Z"}"#,
        )
        .unwrap();

        let records = read_inbox(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert!((records[0].engagement_score() - 31.0).abs() < f64::EPSILON);
        assert!(records[0].engagement_comments().abs() < f64::EPSILON);
    }
}
