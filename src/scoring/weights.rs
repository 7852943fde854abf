use indexmap::IndexMap;

use super::input::EnabledSet;
use crate::catalog::MetricCatalog;

/// Base weights renormalized over the enabled metrics.
///
/// Only enabled metrics have an entry; everything else reads as 0. Empty when
/// nothing is enabled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdjustedWeights {
    weights: IndexMap<String, f64>,
}

impl AdjustedWeights {
    pub fn get(&self, key: &str) -> f64 {
        self.weights.get(key).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.weights.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(k, w)| (k.as_str(), *w))
    }

    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// Renormalize base weights across every enabled metric in the catalog.
///
/// The denominator is global, not per category, so the ratio between any two
/// enabled metrics always equals the ratio of their base weights.
pub fn adjust_weights(catalog: &MetricCatalog, enabled: &EnabledSet) -> AdjustedWeights {
    let total_weight: f64 = catalog
        .metrics()
        .filter(|m| enabled.is_enabled(&m.key))
        .map(|m| m.base_weight)
        .sum();

    if total_weight <= 0.0 {
        return AdjustedWeights::default();
    }

    AdjustedWeights {
        weights: catalog
            .metrics()
            .filter(|m| enabled.is_enabled(&m.key))
            .map(|m| (m.key.clone(), m.base_weight / total_weight))
            .collect(),
    }
}
