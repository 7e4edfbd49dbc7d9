use std::fmt;
use std::path::Path;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::ConfigError;

/// One topic bucket and the keywords that vote for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketRule {
    pub name: String,
    pub keywords: Vec<String>,
}

/// Keyword rules from `config/keywords.json`.
///
/// `bucket_rules` keeps the order of the JSON object: bucket ties are broken
/// in favour of the rule that appears first in the file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordRules {
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub boost: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default, deserialize_with = "ordered_bucket_rules")]
    pub bucket_rules: Vec<BucketRule>,
}

impl KeywordRules {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.include.is_empty()
            && self.boost.is_empty()
            && self.exclude.is_empty()
            && self.bucket_rules.is_empty()
    }
}

/// Load keyword rules from a JSON file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read or parsed, or if it
/// defines no rules at all.
pub fn load_keyword_rules(path: &Path) -> Result<KeywordRules, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    let rules: KeywordRules =
        serde_json::from_str(&content).map_err(|e| ConfigError::FileParse {
            path: path.display().to_string(),
            source: e,
        })?;

    if rules.is_empty() {
        return Err(ConfigError::EmptyKeywords(path.display().to_string()));
    }
    Ok(rules)
}

fn ordered_bucket_rules<'de, D>(deserializer: D) -> Result<Vec<BucketRule>, D::Error>
where
    D: Deserializer<'de>,
{
    struct BucketRulesVisitor;

    impl<'de> Visitor<'de> for BucketRulesVisitor {
        type Value = Vec<BucketRule>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an object mapping bucket names to keyword lists")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut rules = Vec::new();
            while let Some((name, words)) = map.next_entry::<String, Value>()? {
                // A bucket whose value is not a list still participates, with no keywords.
                let keywords = words
                    .as_array()
                    .map(|list| {
                        list.iter()
                            .filter_map(|w| w.as_str().map(str::to_owned))
                            .collect()
                    })
                    .unwrap_or_default();
                rules.push(BucketRule { name, keywords });
            }
            Ok(rules)
        }
    }

    deserializer.deserialize_map(BucketRulesVisitor)
}
