//! End-to-end and property tests for the scoring pipeline.

use brand_score::catalog::MetricCatalog;
use brand_score::history::{load_history, save_history, verify_entry, HistoryStore};
use brand_score::scoring::{
    adjust_weights, aggregate, aggregate_detailed, classify, flat_overall, EnabledSet, RawValues,
    Tier,
};
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const EPS: f64 = 1e-9;

fn raw_from(catalog: &MetricCatalog, values: &[u32]) -> RawValues {
    let mut raw = RawValues::blank(catalog);
    for (metric, value) in catalog.metrics().zip(values) {
        raw.set(catalog, &metric.key, &value.to_string()).unwrap();
    }
    raw
}

fn enabled_from(catalog: &MetricCatalog, mask: &[bool]) -> EnabledSet {
    let mut enabled = EnabledSet::all();
    for (metric, on) in catalog.metrics().zip(mask) {
        enabled.set(catalog, &metric.key, *on).unwrap();
    }
    enabled
}

#[test]
fn every_metric_at_ceiling_scores_exceptional() {
    let catalog = MetricCatalog::builtin();
    let mut raw = RawValues::blank(&catalog);
    for metric in catalog.metrics() {
        let value = match metric.key.as_str() {
            "npsScore" => "100",
            "clv" | "aov" => "1000",
            "timeBetweenPurchases" | "cac" => "0",
            _ => "100",
        };
        raw.set(&catalog, &metric.key, value).unwrap();
    }

    let scores = aggregate(&catalog, &raw, &EnabledSet::all());
    for name in catalog.category_names() {
        assert!((scores.get(name).unwrap() - 100.0).abs() < EPS, "{name}");
    }
    assert!((scores.overall - 100.0).abs() < EPS);
    assert_eq!(classify(scores.overall), Tier::Exceptional);
}

#[test]
fn single_enabled_metric_drives_overall() {
    let catalog = MetricCatalog::builtin();
    let enabled = EnabledSet::only(&catalog, ["reachImpressions"]).unwrap();
    let mut raw = RawValues::blank(&catalog);
    raw.set(&catalog, "reachImpressions", "5").unwrap();
    raw.set(&catalog, "npsScore", "100").unwrap();

    let result = aggregate_detailed(&catalog, &raw, &enabled);
    assert!((result.scores.get("awareness").unwrap() - 50.0).abs() < EPS);
    assert_eq!(result.scores.get("loyalty"), Some(0.0));
    assert!((result.scores.overall - 50.0).abs() < EPS);
    assert_eq!(classify(result.scores.overall), Tier::NeedsImprovement);
}

#[test]
fn nothing_enabled_scores_zero() {
    let catalog = MetricCatalog::builtin();
    let raw = raw_from(&catalog, &[50; 28]);
    let scores = aggregate(&catalog, &raw, &EnabledSet::none(&catalog));

    assert!(catalog
        .category_names()
        .all(|name| scores.get(name) == Some(0.0)));
    assert_eq!(scores.overall, 0.0);
    assert_eq!(classify(scores.overall), Tier::Ineffective);
}

#[test]
fn saved_entries_survive_reload_and_verify() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("history.json");
    let catalog = MetricCatalog::builtin();

    let enabled = EnabledSet::with_disabled(&catalog, ["brandValue", "cac"]).unwrap();
    let raw = raw_from(&catalog, &[7, 40, 12, 3, 55, 80, 1, 64]);
    let scores = aggregate(&catalog, &raw, &enabled);

    let mut store = HistoryStore::new();
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
    let id = store
        .record("  Acme  ", raw, scores, &enabled, now)
        .unwrap()
        .id
        .clone();
    save_history(&path, &store).unwrap();

    let loaded = load_history(&path).unwrap();
    let entry = loaded.get(&id).unwrap();
    assert_eq!(entry.brand_name, "Acme");
    assert_eq!(entry.disabled, vec!["brandValue".to_string(), "cac".to_string()]);

    let verification = verify_entry(&catalog, entry).unwrap();
    assert!(verification.is_consistent(), "{:?}", verification.mismatches);
}

#[test]
fn tampered_entry_fails_verification() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.json");
    let catalog = MetricCatalog::builtin();

    let enabled = EnabledSet::all();
    let raw = raw_from(&catalog, &[5, 60]);
    let scores = aggregate(&catalog, &raw, &enabled);
    let mut store = HistoryStore::new();
    store
        .record("Acme", raw, scores, &enabled, Utc::now())
        .unwrap();
    store.entries[0].scores.overall += 1.0;
    save_history(&path, &store).unwrap();

    let loaded = load_history(&path).unwrap();
    let verification = verify_entry(&catalog, &loaded.entries[0]).unwrap();
    assert!(!verification.is_consistent());
    assert_eq!(verification.mismatches.len(), 1);
    assert_eq!(verification.mismatches[0].key, "overall");
}

proptest! {
    #[test]
    fn adjusted_weights_sum_to_one(mask in prop::collection::vec(any::<bool>(), 28)) {
        let catalog = MetricCatalog::builtin();
        let enabled = enabled_from(&catalog, &mask);
        let weights = adjust_weights(&catalog, &enabled);

        if mask.iter().any(|on| *on) {
            prop_assert!((weights.total() - 1.0).abs() < EPS);
            prop_assert!(weights.iter().all(|(_, w)| w > 0.0));
        } else {
            prop_assert!(weights.is_empty());
        }
    }

    #[test]
    fn overall_matches_flat_weighting(
        values in prop::collection::vec(0u32..2000, 28),
        mask in prop::collection::vec(any::<bool>(), 28),
    ) {
        let catalog = MetricCatalog::builtin();
        let raw = raw_from(&catalog, &values);
        let enabled = enabled_from(&catalog, &mask);

        let scores = aggregate(&catalog, &raw, &enabled);
        let flat = flat_overall(&catalog, &raw, &enabled);
        prop_assert!((scores.overall - flat).abs() < 1e-6);
    }

    #[test]
    fn category_scores_ignore_other_categories(
        values in prop::collection::vec(0u32..2000, 28),
        changed in 0u32..2000,
    ) {
        let catalog = MetricCatalog::builtin();
        let enabled = EnabledSet::all();
        let before = aggregate(&catalog, &raw_from(&catalog, &values), &enabled);

        // reachImpressions is awareness; nothing else may move
        let mut edited = values.clone();
        edited[0] = changed;
        let after = aggregate(&catalog, &raw_from(&catalog, &edited), &enabled);

        for name in catalog.category_names().filter(|n| *n != "awareness") {
            prop_assert_eq!(before.get(name), after.get(name));
        }
    }

    #[test]
    fn toggling_other_categories_keeps_category_score(
        values in prop::collection::vec(0u32..2000, 28),
        mask in prop::collection::vec(any::<bool>(), 28),
    ) {
        let catalog = MetricCatalog::builtin();
        let raw = raw_from(&catalog, &values);

        // keep loyalty as-is, toggle everything else
        let mut toggled = mask.clone();
        for (flag, metric) in toggled.iter_mut().zip(catalog.metrics()) {
            if metric.category == "loyalty" {
                *flag = true;
            }
        }

        let before = aggregate(&catalog, &raw, &EnabledSet::all());
        let after = aggregate(&catalog, &raw, &enabled_from(&catalog, &toggled));
        let (b, a) = (before.get("loyalty").unwrap(), after.get("loyalty").unwrap());
        prop_assert!((b - a).abs() < 1e-9, "loyalty {} vs {}", b, a);
    }

    #[test]
    fn scores_without_nps_stay_in_range(
        values in prop::collection::vec(0u32..100_000, 28),
        mask in prop::collection::vec(any::<bool>(), 28),
    ) {
        let catalog = MetricCatalog::builtin();
        let mut raw = raw_from(&catalog, &values);
        raw.set(&catalog, "npsScore", "").unwrap();
        let enabled = enabled_from(&catalog, &mask);

        let scores = aggregate(&catalog, &raw, &enabled);
        for name in catalog.category_names() {
            let score = scores.get(name).unwrap();
            prop_assert!((0.0..=100.0 + EPS).contains(&score), "{} = {}", name, score);
        }
        prop_assert!((0.0..=100.0 + EPS).contains(&scores.overall));
    }
}
