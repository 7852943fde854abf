//! Composite brand performance scoring.
//!
//! A [`catalog::MetricCatalog`] defines weighted metrics grouped into
//! categories. Raw metric values are normalized onto 0-100, base weights are
//! renormalized over the enabled metrics, and the results are combined into
//! per-category scores and one overall score.
//!
//! ```
//! use brand_score::catalog::MetricCatalog;
//! use brand_score::scoring::{aggregate, classify, EnabledSet, RawValues, Tier};
//!
//! let catalog = MetricCatalog::builtin();
//! let enabled = EnabledSet::only(&catalog, ["reachImpressions"]).unwrap();
//! let mut raw = RawValues::new();
//! raw.set(&catalog, "reachImpressions", "5").unwrap();
//!
//! let scores = aggregate(&catalog, &raw, &enabled);
//! assert!((scores.overall - 50.0).abs() < 1e-9);
//! assert_eq!(classify(scores.overall), Tier::NeedsImprovement);
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod history;
pub mod output;
pub mod scoring;
