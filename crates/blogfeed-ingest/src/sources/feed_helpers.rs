//! Lenient tag extraction for RSS/Atom documents.
//!
//! Real-world feeds are frequently not well-formed XML (stray `&`, unclosed
//! inline HTML, mixed encodings), so entries are cut out with tolerant
//! patterns instead of a strict parser. Every helper returns an empty value
//! instead of failing.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

/// Tags looked up inside an entry block. Patterns are compiled once.
const ENTRY_TAGS: [&str; 10] = [
    "title",
    "summary",
    "content",
    "description",
    "link",
    "guid",
    "updated",
    "published",
    "pubDate",
    "dc:date",
];

static TAG_PATTERNS: LazyLock<HashMap<&'static str, Regex>> = LazyLock::new(|| {
    ENTRY_TAGS
        .iter()
        .map(|&tag| {
            let escaped = regex::escape(tag);
            let pattern = format!(r"(?is)<{escaped}(?:\s[^>]*)?>(.*?)</{escaped}>");
            (tag, Regex::new(&pattern).expect("valid entry tag regex"))
        })
        .collect()
});

static ATOM_ROOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<feed[\s>]").expect("valid atom root regex"));
static RSS_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<item\b.*?</item>").expect("valid rss item regex"));
static ATOM_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<entry\b.*?</entry>").expect("valid atom entry regex"));
static LINK_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<link\b([^>]*)>").expect("valid link tag regex"));
static MARKUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid markup regex"));
static HREF_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bhref\s*=\s*["']([^"']+)["']"#).expect("valid href attribute regex")
});
static REL_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\brel\s*=\s*["']([^"']+)["']"#).expect("valid rel attribute regex")
});

/// Feed dialect, decided by the presence of an Atom `<feed>` root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Dialect {
    Rss,
    Atom,
}

pub(super) fn detect_dialect(xml: &str) -> Dialect {
    if ATOM_ROOT.is_match(xml) {
        Dialect::Atom
    } else {
        Dialect::Rss
    }
}

/// Cut the document into raw entry blocks (`<item>` or `<entry>`).
pub(super) fn entry_blocks(xml: &str, dialect: Dialect) -> Vec<&str> {
    let pattern = match dialect {
        Dialect::Rss => &*RSS_ITEM,
        Dialect::Atom => &*ATOM_ENTRY,
    };
    pattern.find_iter(xml).map(|m| m.as_str()).collect()
}

/// Value of the first listed tag with non-blank content, CDATA unwrapped and
/// entities decoded.
pub(super) fn tag_value(block: &str, tags: &[&str]) -> String {
    for tag in tags {
        let Some(pattern) = TAG_PATTERNS.get(tag) else {
            continue;
        };
        let Some(inner) = pattern.captures(block).and_then(|c| c.get(1)) else {
            continue;
        };
        let raw = inner.as_str();
        if raw.trim().is_empty() {
            continue;
        }
        return decode_entities(strip_cdata(raw)).into_owned();
    }
    String::new()
}

/// `href` of the first Atom `<link>` whose `rel` is absent or `alternate`.
pub(super) fn atom_link(block: &str) -> String {
    for caps in LINK_TAG.captures_iter(block) {
        let attrs = caps.get(1).map_or("", |m| m.as_str());
        let href = attr_value(attrs, &HREF_ATTR);
        if href.is_empty() {
            continue;
        }
        let rel = attr_value(attrs, &REL_ATTR);
        if rel.is_empty() || rel == "alternate" {
            return decode_entities(&href).into_owned();
        }
    }
    String::new()
}

fn attr_value(attrs: &str, pattern: &Regex) -> String {
    pattern
        .captures(attrs)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

fn strip_cdata(raw: &str) -> &str {
    let trimmed = raw.trim();
    let inner = trimmed.strip_prefix("<![CDATA[").unwrap_or(trimmed);
    inner.strip_suffix("]]>").unwrap_or(inner)
}

/// Decode XML/HTML entities. Falls back to the five XML entities when the
/// text contains references `quick-xml` cannot resolve.
pub(super) fn decode_entities(raw: &str) -> Cow<'_, str> {
    if !raw.contains('&') {
        return Cow::Borrowed(raw);
    }
    quick_xml::escape::unescape_with(raw, resolve_entity).unwrap_or_else(|_| {
        Cow::Owned(
            raw.replace("&lt;", "<")
                .replace("&gt;", ">")
                .replace("&quot;", "\"")
                .replace("&#39;", "'")
                .replace("&apos;", "'")
                .replace("&amp;", "&"),
        )
    })
}

fn resolve_entity(name: &str) -> Option<&'static str> {
    Some(match name {
        "lt" => "<",
        "gt" => ">",
        "amp" => "&",
        "apos" => "'",
        "quot" => "\"",
        "nbsp" => " ",
        "hellip" => "\u{2026}",
        "mdash" => "\u{2014}",
        "ndash" => "\u{2013}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "ldquo" => "\u{201C}",
        "rdquo" => "\u{201D}",
        "middot" => "\u{00B7}",
        "copy" => "\u{00A9}",
        _ => return None,
    })
}

/// Decode, replace markup with spaces, and collapse whitespace.
pub(super) fn clean_inline(raw: &str) -> String {
    let decoded = decode_entities(raw);
    let stripped = MARKUP.replace_all(&decoded, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_atom_by_feed_root() {
        assert_eq!(detect_dialect(r#"<?xml version="1.0"?><feed xmlns="x">"#), Dialect::Atom);
        assert_eq!(detect_dialect("<FEED>"), Dialect::Atom);
        assert_eq!(detect_dialect("<rss><channel><feedburner:info/>"), Dialect::Rss);
    }

    #[test]
    fn tag_value_skips_blank_and_takes_fallback() {
        let block = "<item><description>  </description><content>Body</content></item>";
        assert_eq!(tag_value(block, &["description", "content"]), "Body");
    }

    #[test]
    fn tag_value_unwraps_cdata_and_decodes() {
        let block = "<item><title><![CDATA[Swift &amp; SwiftUI]]></title></item>";
        assert_eq!(tag_value(block, &["title"]), "Swift & SwiftUI");
    }

    #[test]
    fn tag_value_tolerates_attributes_and_case() {
        let block = r#"<entry><TITLE type="html">Mixed</TITLE></entry>"#;
        assert_eq!(tag_value(block, &["title"]), "Mixed");
    }

    #[test]
    fn content_does_not_match_content_encoded() {
        let block = "<item><content:encoded>Full</content:encoded></item>";
        assert_eq!(tag_value(block, &["content"]), "");
    }

    #[test]
    fn atom_link_prefers_alternate_over_other_rels() {
        let block = r#"<entry>
            <link rel="replies" href="https://example.com/a/comments"/>
            <link rel="alternate" type="text/html" href="https://example.com/a?x=1&amp;y=2"/>
        </entry>"#;
        assert_eq!(atom_link(block), "https://example.com/a?x=1&y=2");
    }

    #[test]
    fn atom_link_accepts_missing_rel() {
        let block = r"<entry><link href='https://example.com/b'/></entry>";
        assert_eq!(atom_link(block), "https://example.com/b");
    }

    #[test]
    fn atom_link_reads_attributes_in_any_case_and_order() {
        let block = r#"<entry>
            <LINK HREF="https://example.com/edit" REL="edit"/>
            <link href="https://example.com/c" rel="alternate"/>
        </entry>"#;
        assert_eq!(atom_link(block), "https://example.com/c");
    }

    #[test]
    fn clean_inline_strips_markup_and_collapses() {
        assert_eq!(
            clean_inline("<p>Hello,\n  <b>world</b></p>&lt;br&gt;done"),
            "Hello, world done"
        );
    }

    #[test]
    fn decode_handles_html_entities_and_unknown_fallback() {
        assert_eq!(decode_entities("a&nbsp;b&hellip;"), "a b\u{2026}");
        assert_eq!(decode_entities("Q&amp;A &bogus; &lt;x&gt;"), "Q&A &bogus; <x>");
    }
}
