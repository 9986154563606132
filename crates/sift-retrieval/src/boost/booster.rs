//! Multiply fused scores by matching metadata rules, then re-sort.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sift_core::constants::metadata_keys;
use sift_core::models::{AppliedBoost, BoostCategory, SearchCandidate};

use super::BoostTable;
use crate::search::rrf_fusion::sort_by_score;

/// Per-query theme affinities from an upstream router, each in [0, 1].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThemeRouting {
    affinities: BTreeMap<String, f64>,
}

impl ThemeRouting {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the affinity for `theme`, clamped to [0, 1]. Non-finite values count as 0.
    pub fn with_affinity(mut self, theme: impl Into<String>, affinity: f64) -> Self {
        let a = if affinity.is_finite() {
            affinity.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.affinities.insert(theme.into(), a);
        self
    }

    pub fn affinity(&self, theme: &str) -> Option<f64> {
        self.affinities.get(theme).copied()
    }
}

impl FromIterator<(String, f64)> for ThemeRouting {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |r, (theme, a)| r.with_affinity(theme, a))
    }
}

/// Apply `table` with no theme routing.
pub fn boost(candidates: Vec<SearchCandidate>, table: &BoostTable) -> Vec<SearchCandidate> {
    boost_with_routing(candidates, table, None)
}

/// Apply `table`, scaling thematic boosts by `routing`.
///
/// `boosted_score = rrf_score × Π factors`; a candidate with no match keeps
/// `boosted_score == rrf_score`. Result is sorted by `boosted_score`
/// descending, ties broken by `chunk_id`.
pub fn boost_with_routing(
    mut candidates: Vec<SearchCandidate>,
    table: &BoostTable,
    routing: Option<&ThemeRouting>,
) -> Vec<SearchCandidate> {
    for candidate in &mut candidates {
        let mut applied = table.static_matches(&candidate.chunk);
        if let Some(boost) = thematic(candidate, table, routing) {
            applied.push(boost);
        }

        candidate.boosted_score = applied
            .iter()
            .fold(candidate.rrf_score, |score, b| score * b.factor);
        candidate.applied_boosts = applied;
    }

    sort_by_score(&mut candidates, |c| c.boosted_score);
    candidates
}

fn thematic(
    candidate: &SearchCandidate,
    table: &BoostTable,
    routing: Option<&ThemeRouting>,
) -> Option<AppliedBoost> {
    let theme = candidate.chunk.metadata_str(metadata_keys::THEME)?;
    let max_boost = table.thematic_max(theme)?;
    let affinity = routing?.affinity(theme)?;
    if affinity == 0.0 {
        return None;
    }
    Some(AppliedBoost {
        category: BoostCategory::Thematic,
        matched: theme.to_string(),
        factor: 1.0 + (max_boost - 1.0) * affinity,
    })
}
