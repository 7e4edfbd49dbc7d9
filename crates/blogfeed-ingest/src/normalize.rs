//! URL canonicalization shared by every fetcher.
//!
//! The canonical URL is the inbox dedup key, so two links to the same article
//! must normalize identically: fragments go, tracking parameters go,
//! everything else is left alone.

use reqwest::Url;

const TRACKING_PARAMS: [&str; 4] = ["gclid", "fbclid", "ref", "s"];

fn is_tracking_param(key: &str) -> bool {
    key.to_ascii_lowercase().starts_with("utm_") || TRACKING_PARAMS.contains(&key)
}

/// Canonicalize `raw`, resolving root-relative paths against `homepage`.
///
/// Returns an empty string when the input cannot be turned into an absolute
/// `http(s)` URL. Failures are not errors: callers only care whether they got
/// a usable key.
#[must_use]
pub fn normalize_url(raw: &str, homepage: Option<&str>) -> String {
    canonicalize(raw, homepage).unwrap_or_default()
}

fn canonicalize(raw: &str, homepage: Option<&str>) -> Option<String> {
    let cleaned = raw.trim();
    if cleaned.is_empty() {
        return None;
    }

    let homepage = homepage.map(str::trim).filter(|h| !h.is_empty());
    let mut url = match homepage {
        Some(base) if cleaned.starts_with('/') => Url::parse(base).ok()?.join(cleaned).ok()?,
        _ => Url::parse(cleaned).ok()?,
    };

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return None;
    }

    url.set_fragment(None);

    if url.query().is_some() {
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        let kept: Vec<&(String, String)> =
            pairs.iter().filter(|(k, _)| !is_tracking_param(k)).collect();

        if kept.is_empty() {
            url.set_query(None);
        } else if kept.len() != pairs.len() {
            url.query_pairs_mut()
                .clear()
                .extend_pairs(kept.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
    }

    Some(url.to_string())
}
