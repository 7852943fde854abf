use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::input::{EnabledSet, RawValues};
use super::normalize::normalize;
use super::weights::{adjust_weights, AdjustedWeights};
use crate::catalog::MetricCatalog;

/// Reserved score key for the catalog-wide score.
pub const OVERALL_KEY: &str = "overall";

/// Per-category scores plus the overall score.
///
/// Serializes as one flat map: `{"awareness": 50.0, ..., "overall": 42.1}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreSet {
    #[serde(flatten)]
    pub categories: IndexMap<String, f64>,
    #[serde(default)]
    pub overall: f64,
}

impl ScoreSet {
    /// Look up a category score, or the overall score via `"overall"`.
    pub fn get(&self, key: &str) -> Option<f64> {
        if key == OVERALL_KEY {
            Some(self.overall)
        } else {
            self.categories.get(key).copied()
        }
    }

    /// True when every category score and the overall score is a finite number.
    pub fn is_finite(&self) -> bool {
        self.overall.is_finite() && self.categories.values().all(|s| s.is_finite())
    }

    /// Keys whose values differ by more than `tolerance`, including keys
    /// present on only one side.
    pub fn differences(&self, other: &ScoreSet, tolerance: f64) -> Vec<ScoreMismatch> {
        let mut mismatches = Vec::new();
        let keys = self
            .categories
            .keys()
            .chain(other.categories.keys().filter(|k| !self.categories.contains_key(*k)))
            .map(String::as_str)
            .chain(std::iter::once(OVERALL_KEY));

        for key in keys {
            let left = self.get(key);
            let right = other.get(key);
            let same = match (left, right) {
                (Some(a), Some(b)) => (a - b).abs() <= tolerance,
                _ => false,
            };
            if !same {
                mismatches.push(ScoreMismatch {
                    key: key.to_string(),
                    expected: left,
                    actual: right,
                });
            }
        }
        mismatches
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreMismatch {
    pub key: String,
    pub expected: Option<f64>,
    pub actual: Option<f64>,
}

/// How one metric fed into the scores.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricContribution {
    pub key: String,
    pub category: String,
    pub enabled: bool,
    pub normalized: f64,
    pub weight: f64,       // adjusted weight, 0 when disabled
    pub contribution: f64, // weight * normalized, its share of the overall score
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    pub scores: ScoreSet,
    /// Sum of adjusted weights per category; 0 when nothing in it is enabled.
    pub category_weights: IndexMap<String, f64>,
    pub breakdown: Vec<MetricContribution>,
}

/// Category and overall scores for a set of raw values.
pub fn aggregate(catalog: &MetricCatalog, raw: &RawValues, enabled: &EnabledSet) -> ScoreSet {
    aggregate_detailed(catalog, raw, enabled).scores
}

/// Like [`aggregate`], keeping the per-metric breakdown.
///
/// Each category score is `sum(w * n) / sum(w)` over its enabled metrics.
/// All adjusted weights share one global denominator, which cancels here, so
/// a category's score only depends on its own metrics. The overall score is
/// `sum(score[c] * weight[c])`, the same as the flat weighted average over
/// every enabled metric.
pub fn aggregate_detailed(
    catalog: &MetricCatalog,
    raw: &RawValues,
    enabled: &EnabledSet,
) -> ScoreResult {
    let weights = adjust_weights(catalog, enabled);
    let breakdown = contributions(catalog, raw, enabled, &weights);

    if weights.is_empty() {
        log::debug!("no metrics enabled, every score is 0");
        let zeros: IndexMap<String, f64> =
            catalog.category_names().map(|c| (c.to_string(), 0.0)).collect();
        return ScoreResult {
            scores: ScoreSet {
                categories: zeros.clone(),
                overall: 0.0,
            },
            category_weights: zeros,
            breakdown,
        };
    }

    let mut categories = IndexMap::new();
    let mut category_weights = IndexMap::new();
    let mut overall = 0.0;

    for category in catalog.categories() {
        let mut category_score = 0.0;
        let mut category_weight = 0.0;

        for item in breakdown
            .iter()
            .filter(|c| c.enabled && c.category == category.name)
        {
            category_score += item.contribution;
            category_weight += item.weight;
        }

        let score = if category_weight > 0.0 {
            category_score / category_weight
        } else {
            0.0
        };
        overall += score * category_weight;

        categories.insert(category.name.clone(), score);
        category_weights.insert(category.name.clone(), category_weight);
    }

    ScoreResult {
        scores: ScoreSet {
            categories,
            overall,
        },
        category_weights,
        breakdown,
    }
}

/// Overall score computed directly as one weighted average, skipping the
/// category step.
pub fn flat_overall(catalog: &MetricCatalog, raw: &RawValues, enabled: &EnabledSet) -> f64 {
    let weights = adjust_weights(catalog, enabled);
    weights
        .iter()
        .filter_map(|(key, weight)| {
            catalog
                .get(key)
                .map(|metric| weight * normalize(metric, raw.get(key), true))
        })
        .sum()
}

fn contributions(
    catalog: &MetricCatalog,
    raw: &RawValues,
    enabled: &EnabledSet,
    weights: &AdjustedWeights,
) -> Vec<MetricContribution> {
    catalog
        .metrics()
        .map(|metric| {
            let is_enabled = enabled.is_enabled(&metric.key);
            let normalized = normalize(metric, raw.get(&metric.key), is_enabled);
            let weight = weights.get(&metric.key);
            MetricContribution {
                key: metric.key.clone(),
                category: metric.category.clone(),
                enabled: is_enabled,
                normalized,
                weight,
                contribution: weight * normalized,
            }
        })
        .collect()
}
