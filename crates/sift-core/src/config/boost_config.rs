use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Regex on the chunk URL → factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternRule {
    pub pattern: String,
    pub factor: f64,
}

/// Case-insensitive title substring → factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub keyword: String,
    pub factor: f64,
}

/// Raw metadata boost rules as loaded from TOML.
///
/// Every factor is multiplicative; a missing match is a factor of 1.0.
/// `thematic` maps a theme to its maximum boost; the applied factor scales
/// with the query's routing affinity for that theme.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostTableConfig {
    pub page_type: BTreeMap<String, f64>,
    pub section: BTreeMap<String, f64>,
    pub platform: BTreeMap<String, f64>,
    pub url_patterns: Vec<PatternRule>,
    pub title_keywords: Vec<KeywordRule>,
    pub structural: BTreeMap<String, f64>,
    pub thematic: BTreeMap<String, f64>,
}

impl BoostTableConfig {
    /// Load a standalone boost table (used for hot reload).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let table: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<boost_table>".to_string(),
            message: e.to_string(),
        })?;
        table.validate()?;
        Ok(table)
    }

    pub fn is_empty(&self) -> bool {
        self.page_type.is_empty()
            && self.section.is_empty()
            && self.platform.is_empty()
            && self.url_patterns.is_empty()
            && self.title_keywords.is_empty()
            && self.structural.is_empty()
            && self.thematic.is_empty()
    }

    /// Structural checks. Regex compilation is checked when the table is compiled.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, map) in [
            ("page_type", &self.page_type),
            ("section", &self.section),
            ("platform", &self.platform),
            ("structural", &self.structural),
            ("thematic", &self.thematic),
        ] {
            for (key, factor) in map {
                check_key(&format!("boost_table.{name}"), key)?;
                check_factor(&format!("boost_table.{name}.{key}"), *factor)?;
            }
        }
        for (i, rule) in self.url_patterns.iter().enumerate() {
            let field = format!("boost_table.url_patterns[{i}]");
            check_key(&field, &rule.pattern)?;
            check_factor(&field, rule.factor)?;
        }
        for (i, rule) in self.title_keywords.iter().enumerate() {
            let field = format!("boost_table.title_keywords[{i}]");
            check_key(&field, &rule.keyword)?;
            check_factor(&field, rule.factor)?;
        }
        Ok(())
    }
}

fn check_key(field: &str, key: &str) -> Result<(), ConfigError> {
    if key.trim().is_empty() {
        return Err(ConfigError::invalid(field, "rule key must not be empty"));
    }
    Ok(())
}

fn check_factor(field: &str, factor: f64) -> Result<(), ConfigError> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(ConfigError::invalid(
            field,
            format!("factor must be finite and > 0, got {factor}"),
        ));
    }
    Ok(())
}
