use super::types::HistoryEntry;
use crate::catalog::MetricCatalog;
use crate::error::CatalogError;
use crate::scoring::{aggregate, EnabledSet, ScoreMismatch, ScoreSet};

/// Allowed drift between stored and recomputed scores.
pub const SCORE_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone)]
pub struct Verification {
    pub recomputed: ScoreSet,
    pub mismatches: Vec<ScoreMismatch>,
}

impl Verification {
    pub fn is_consistent(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Recompute an entry's scores from its stored metrics and disabled list,
/// and compare them with the stored scores.
///
/// Fails only when the entry names metrics the catalog does not know.
pub fn verify_entry(
    catalog: &MetricCatalog,
    entry: &HistoryEntry,
) -> Result<Verification, CatalogError> {
    let enabled = EnabledSet::with_disabled(catalog, &entry.disabled)?;
    let recomputed = aggregate(catalog, &entry.metrics, &enabled);
    let mismatches = entry.scores.differences(&recomputed, SCORE_TOLERANCE);

    if !mismatches.is_empty() {
        log::warn!(
            "Entry {} ({}) has {} score mismatch(es)",
            entry.id,
            entry.brand_name,
            mismatches.len()
        );
    }

    Ok(Verification {
        recomputed,
        mismatches,
    })
}
