use super::types::{HistoryStore, HISTORY_VERSION};
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::File;
use std::path::Path;

/// Load the history store from a JSON file
///
/// If the file doesn't exist, returns a new empty store.
/// If the file exists but has an unsupported version, returns an error.
pub fn load_history(path: &Path) -> Result<HistoryStore> {
    if !path.exists() {
        log::debug!("No history at {}, starting empty", path.display());
        return Ok(HistoryStore::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open history file at {}", path.display()))?;

    let store: HistoryStore = serde_json::from_reader(file)
        .with_context(|| format!("Failed to load history from {}", path.display()))?;

    if store.version != HISTORY_VERSION {
        anyhow::bail!("Unsupported history version: {}", store.version);
    }

    log::debug!(
        "Loaded {} history entries from {}",
        store.entries.len(),
        path.display()
    );
    Ok(store)
}

/// Save the history store to a JSON file atomically
///
/// The file is never left half-written. Creates the parent directory if it
/// doesn't exist. Fails without touching the file when any entry holds a
/// non-finite score.
pub fn save_history(path: &Path, store: &HistoryStore) -> Result<()> {
    if let Some(entry) = store.entries.iter().find(|e| !e.scores.is_finite()) {
        anyhow::bail!(
            "Entry {} ({}) has non-finite scores",
            entry.id,
            entry.brand_name
        );
    }

    crate::config::ensure_parent_dir(path)?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, store).context("Failed to serialize history")?;

    file.commit().context("Failed to save history")?;

    log::debug!(
        "Saved {} history entries to {}",
        store.entries.len(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MetricCatalog;
    use crate::scoring::{aggregate, EnabledSet, RawValues};
    use chrono::Utc;

    #[test]
    fn test_load_missing_file_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = load_history(&dir.path().join("history.json")).unwrap();
        assert_eq!(store.version, 1);
        assert!(store.entries.is_empty());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("history.json");
        let catalog = MetricCatalog::builtin();

        let mut metrics = RawValues::blank(&catalog);
        metrics.set(&catalog, "npsScore", "45").unwrap();
        metrics.set(&catalog, "reachImpressions", "2.5").unwrap();
        let enabled = EnabledSet::with_disabled(&catalog, ["cac"]).unwrap();
        let scores = aggregate(&catalog, &metrics, &enabled);

        let mut store = HistoryStore::new();
        store
            .record("Acme", metrics.clone(), scores.clone(), &enabled, Utc::now())
            .unwrap();
        save_history(&path, &store).unwrap();

        let loaded = load_history(&path).unwrap();
        assert_eq!(loaded.entries.len(), 1);
        let entry = &loaded.entries[0];
        assert_eq!(entry.brand_name, "Acme");
        assert_eq!(entry.metrics, metrics);
        assert!(entry.scores.differences(&scores, 1e-9).is_empty());
        assert_eq!(entry.disabled, vec!["cac".to_string()]);
    }

    #[test]
    fn test_save_refuses_non_finite_scores() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        let catalog = MetricCatalog::builtin();
        let metrics = RawValues::blank(&catalog);
        let enabled = EnabledSet::all();

        let mut store = HistoryStore::new();
        store
            .record("Acme", metrics.clone(), aggregate(&catalog, &metrics, &enabled), &enabled, Utc::now())
            .unwrap();
        save_history(&path, &store).unwrap();

        store.entries[0].scores.overall = f64::NAN;
        let err = save_history(&path, &store).unwrap_err();
        assert!(err.to_string().contains("non-finite"));

        // The earlier good file is still readable
        let loaded = load_history(&path).unwrap();
        assert_eq!(loaded.entries.len(), 1);
        assert_eq!(loaded.entries[0].scores.overall, 0.0);
    }

    #[test]
    fn test_unsupported_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, r#"{"version": 7, "entries": []}"#).unwrap();
        let err = load_history(&path).unwrap_err();
        assert!(err.to_string().contains("Unsupported history version"));
    }

    #[test]
    fn test_reads_entries_without_disabled_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(
            &path,
            r#"{
  "version": 1,
  "entries": [{
    "id": "1709251200000",
    "brandName": "Acme",
    "date": "2024-03-01T00:00:00.000Z",
    "metrics": {"reachImpressions": "5", "brandRecall": ""},
    "scores": {"awareness": 50, "overall": 50}
  }]
}"#,
        )
        .unwrap();

        let store = load_history(&path).unwrap();
        let entry = &store.entries[0];
        assert!(entry.disabled.is_empty());
        assert_eq!(entry.metrics.get("reachImpressions"), "5");
        assert_eq!(entry.scores.get("awareness"), Some(50.0));
        assert_eq!(entry.scores.overall, 50.0);
    }
}
