//! Compiled, immutable boost rules.

use std::collections::HashMap;

use regex::Regex;
use sift_core::config::BoostTableConfig;
use sift_core::constants::metadata_keys;
use sift_core::errors::ConfigError;
use sift_core::models::{AppliedBoost, BoostCategory, Chunk};

#[derive(Debug, Clone)]
struct UrlRule {
    regex: Regex,
    factor: f64,
}

#[derive(Debug, Clone)]
struct KeywordRule {
    keyword: String,
    keyword_lower: String,
    factor: f64,
}

/// Boost rules ready for matching. Built once from `BoostTableConfig` and
/// shared read-only across requests.
#[derive(Debug, Clone, Default)]
pub struct BoostTable {
    page_type: HashMap<String, f64>,
    section: HashMap<String, f64>,
    platform: HashMap<String, f64>,
    url_patterns: Vec<UrlRule>,
    title_keywords: Vec<KeywordRule>,
    structural: Vec<(String, f64)>,
    thematic: HashMap<String, f64>,
}

impl BoostTable {
    /// Validate `config` and compile its URL patterns.
    pub fn compile(config: &BoostTableConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let url_patterns = config
            .url_patterns
            .iter()
            .enumerate()
            .map(|(i, rule)| {
                Regex::new(&rule.pattern)
                    .map(|regex| UrlRule {
                        regex,
                        factor: rule.factor,
                    })
                    .map_err(|e| {
                        ConfigError::invalid(format!("boost_table.url_patterns[{i}]"), e.to_string())
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let title_keywords = config
            .title_keywords
            .iter()
            .map(|rule| KeywordRule {
                keyword: rule.keyword.clone(),
                keyword_lower: rule.keyword.to_lowercase(),
                factor: rule.factor,
            })
            .collect();

        let to_map = |m: &std::collections::BTreeMap<String, f64>| {
            m.iter().map(|(k, v)| (k.clone(), *v)).collect::<HashMap<_, _>>()
        };

        Ok(Self {
            page_type: to_map(&config.page_type),
            section: to_map(&config.section),
            platform: to_map(&config.platform),
            url_patterns,
            title_keywords,
            structural: config.structural.iter().map(|(k, v)| (k.clone(), *v)).collect(),
            thematic: to_map(&config.thematic),
        })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Total number of rules across all categories.
    pub fn rule_count(&self) -> usize {
        self.page_type.len()
            + self.section.len()
            + self.platform.len()
            + self.url_patterns.len()
            + self.title_keywords.len()
            + self.structural.len()
            + self.thematic.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rule_count() == 0
    }

    /// Maximum boost configured for `theme`.
    pub fn thematic_max(&self, theme: &str) -> Option<f64> {
        self.thematic.get(theme).copied()
    }

    /// Non-thematic matches for `chunk`, in category order.
    pub(crate) fn static_matches(&self, chunk: &Chunk) -> Vec<AppliedBoost> {
        let mut applied = Vec::new();

        for (category, key, map) in [
            (BoostCategory::PageType, metadata_keys::PAGE_TYPE, &self.page_type),
            (BoostCategory::Section, metadata_keys::SECTION, &self.section),
            (BoostCategory::Platform, metadata_keys::PLATFORM, &self.platform),
        ] {
            if let Some(value) = chunk.metadata_str(key) {
                if let Some(&factor) = map.get(value) {
                    applied.push(AppliedBoost {
                        category,
                        matched: value.to_string(),
                        factor,
                    });
                }
            }
        }

        if let Some(rule) = self.url_patterns.iter().find(|r| r.regex.is_match(&chunk.url)) {
            applied.push(AppliedBoost {
                category: BoostCategory::UrlPattern,
                matched: rule.regex.as_str().to_string(),
                factor: rule.factor,
            });
        }

        let title = chunk.title.to_lowercase();
        if let Some(rule) = self
            .title_keywords
            .iter()
            .find(|r| title.contains(&r.keyword_lower))
        {
            applied.push(AppliedBoost {
                category: BoostCategory::TitleKeyword,
                matched: rule.keyword.clone(),
                factor: rule.factor,
            });
        }

        for (signal, factor) in &self.structural {
            if chunk.metadata.get(signal).is_some_and(is_truthy) {
                applied.push(AppliedBoost {
                    category: BoostCategory::Structural,
                    matched: signal.clone(),
                    factor: *factor,
                });
            }
        }

        applied
    }
}

/// `true`, a non-zero number, or a non-empty string.
fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        _ => false,
    }
}
