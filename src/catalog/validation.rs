use std::collections::HashSet;

use super::schema::CatalogConfig;
use super::transform::Transform;
use crate::scoring::OVERALL_KEY;

/// Validate a configured catalog at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_catalog(config: &CatalogConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.categories.is_empty() {
        errors.push("catalog.categories: must define at least one category".to_string());
    }

    let mut category_names = HashSet::new();
    let mut metric_keys = HashSet::new();

    for (i, category) in config.categories.iter().enumerate() {
        if category.name.trim().is_empty() {
            errors.push(format!("catalog.categories[{}].name: must not be empty", i));
        } else if category.name == OVERALL_KEY {
            errors.push(format!(
                "catalog.categories[{}].name: '{}' is reserved",
                i, OVERALL_KEY
            ));
        } else if !category_names.insert(category.name.as_str()) {
            errors.push(format!(
                "catalog.categories[{}].name: duplicate category '{}'",
                i, category.name
            ));
        }

        if category.metrics.is_empty() {
            errors.push(format!(
                "catalog.categories[{}].metrics: category '{}' has no metrics",
                i, category.name
            ));
        }

        for (j, metric) in category.metrics.iter().enumerate() {
            let path = format!("catalog.categories[{}].metrics[{}]", i, j);

            if metric.key.trim().is_empty() {
                errors.push(format!("{}.key: must not be empty", path));
            } else if !metric_keys.insert(metric.key.as_str()) {
                errors.push(format!("{}.key: duplicate metric '{}'", path, metric.key));
            }

            if !(metric.weight.is_finite() && metric.weight > 0.0) {
                errors.push(format!(
                    "{}.weight: must be positive, got {}",
                    path, metric.weight
                ));
            }

            if let Some(ref transform) = metric.transform {
                if let Err(e) = Transform::parse(transform) {
                    errors.push(format!(
                        "{}.transform: invalid '{}' - {}",
                        path, transform, e
                    ));
                }
            }
        }
    }

    let total: f64 = config
        .categories
        .iter()
        .flat_map(|c| c.metrics.iter())
        .map(|m| m.weight)
        .filter(|w| w.is_finite() && *w > 0.0)
        .sum();
    if !total.is_finite() {
        errors.push(format!(
            "catalog.categories: metric weights sum to {}, must be finite",
            total
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
