use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::{EnabledSet, RawValues, ScoreSet};

pub const HISTORY_VERSION: u32 = 1;

/// One saved scoring run for a brand.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub brand_name: String,
    pub date: DateTime<Utc>,
    pub metrics: RawValues,
    pub scores: ScoreSet,
    /// Metrics that were switched off when the scores were computed
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disabled: Vec<String>,
}

/// Per-brand rollup for the overview listing.
#[derive(Debug, Clone, PartialEq)]
pub struct BrandSummary {
    pub name: String,
    pub count: usize,
    pub latest_date: DateTime<Utc>,
    pub latest_overall: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryStore {
    pub version: u32,
    #[serde(default)]
    pub entries: Vec<HistoryEntry>,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore {
    /// Create a new empty store with the current version
    pub fn new() -> Self {
        Self {
            version: HISTORY_VERSION,
            entries: Vec::new(),
        }
    }

    /// Append an entry for `brand_name` and return it.
    ///
    /// The name is trimmed and must not be empty, and every score must be
    /// finite. Ids come from the millisecond timestamp, with a numeric suffix
    /// if that id is taken.
    pub fn record(
        &mut self,
        brand_name: &str,
        metrics: RawValues,
        scores: ScoreSet,
        enabled: &EnabledSet,
        now: DateTime<Utc>,
    ) -> Result<&HistoryEntry> {
        let brand_name = brand_name.trim();
        if brand_name.is_empty() {
            bail!("Brand name must not be empty");
        }
        if !scores.is_finite() {
            bail!("Refusing to save non-finite scores for {}", brand_name);
        }

        let base_id = now.timestamp_millis().to_string();
        let mut id = base_id.clone();
        let mut suffix = 1;
        while self.get(&id).is_some() {
            id = format!("{}-{}", base_id, suffix);
            suffix += 1;
        }

        self.entries.push(HistoryEntry {
            id,
            brand_name: brand_name.to_string(),
            date: now,
            metrics,
            scores,
            disabled: enabled.disabled_keys().map(str::to_string).collect(),
        });
        let index = self.entries.len() - 1;
        Ok(&self.entries[index])
    }

    pub fn get(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Remove one entry, returning it if it existed
    pub fn remove(&mut self, id: &str) -> Option<HistoryEntry> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(index))
    }

    /// Remove every entry for a brand, returning how many were dropped
    pub fn remove_brand(&mut self, brand_name: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.brand_name != brand_name);
        before - self.entries.len()
    }

    pub fn entries_for_brand(&self, brand_name: &str) -> Vec<&HistoryEntry> {
        self.entries
            .iter()
            .filter(|e| e.brand_name == brand_name)
            .collect()
    }

    /// Distinct brand names in first-seen order
    pub fn brand_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !names.contains(&entry.brand_name.as_str()) {
                names.push(&entry.brand_name);
            }
        }
        names
    }

    /// Brand names containing `query`, ignoring case
    pub fn matching_brands(&self, query: &str) -> Vec<&str> {
        let query = query.to_lowercase();
        self.brand_names()
            .into_iter()
            .filter(|name| name.to_lowercase().contains(&query))
            .collect()
    }

    /// Entry count and most recent overall score per brand
    pub fn brand_summaries(&self) -> Vec<BrandSummary> {
        let mut summaries: Vec<BrandSummary> = Vec::new();
        for entry in &self.entries {
            match summaries.iter_mut().find(|s| s.name == entry.brand_name) {
                Some(summary) => {
                    summary.count += 1;
                    if entry.date >= summary.latest_date {
                        summary.latest_date = entry.date;
                        summary.latest_overall = entry.scores.overall;
                    }
                }
                None => summaries.push(BrandSummary {
                    name: entry.brand_name.clone(),
                    count: 1,
                    latest_date: entry.date,
                    latest_overall: entry.scores.overall,
                }),
            }
        }
        summaries
    }
}
