use serde::{Deserialize, Serialize};

use super::definition::{CategoryDefinition, MetricCatalog, MetricDefinition};
use super::transform::Transform;
use crate::error::CatalogError;

/// Catalog as written in the config file.
///
/// Weights are relative; they are rescaled to sum to 1.0 when the catalog is
/// built. A missing transform means `clamp`.
///
/// Example YAML:
/// ```yaml
/// catalog:
///   categories:
///     - name: awareness
///       metrics:
///         - key: reachImpressions
///           label: "Reach (millions)"
///           weight: 0.04
///           transform: "x10"
///         - key: brandRecall
///           label: "Brand Recall (%)"
///           weight: 0.04
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    pub categories: Vec<CategoryConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CategoryConfig {
    pub name: String,
    pub metrics: Vec<MetricConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MetricConfig {
    pub key: String,
    pub label: String,
    pub weight: f64,

    #[serde(default)]
    pub placeholder: Option<String>,

    /// Normalization rule, e.g. "x10", "/10", "decay /3", "shift +100 /2", "clamp"
    #[serde(default)]
    pub transform: Option<String>,
}

impl CatalogConfig {
    /// Build the runtime catalog. Run `validate_catalog` first to get every
    /// problem at once; this stops at the first one.
    pub fn build(&self) -> Result<MetricCatalog, CatalogError> {
        let mut categories = Vec::with_capacity(self.categories.len());
        for category in &self.categories {
            let mut metrics = Vec::with_capacity(category.metrics.len());
            for m in &category.metrics {
                let transform = match m.transform.as_deref() {
                    Some(text) => {
                        Transform::parse(text).map_err(|e| CatalogError::InvalidTransform {
                            key: m.key.clone(),
                            transform: text.to_string(),
                            reason: e.to_string(),
                        })?
                    }
                    None => Transform::Clamp,
                };
                metrics.push(MetricDefinition {
                    key: m.key.clone(),
                    category: category.name.clone(),
                    label: m.label.clone(),
                    base_weight: m.weight,
                    placeholder: m.placeholder.clone().unwrap_or_default(),
                    transform,
                });
            }
            categories.push(CategoryDefinition {
                name: category.name.clone(),
                metrics,
            });
        }
        MetricCatalog::new(categories)
    }
}

impl From<&MetricCatalog> for CatalogConfig {
    fn from(catalog: &MetricCatalog) -> Self {
        Self {
            categories: catalog
                .categories()
                .iter()
                .map(|c| CategoryConfig {
                    name: c.name.clone(),
                    metrics: c
                        .metrics
                        .iter()
                        .map(|m| MetricConfig {
                            key: m.key.clone(),
                            label: m.label.clone(),
                            weight: m.base_weight,
                            placeholder: Some(m.placeholder.clone()),
                            transform: Some(m.transform.to_string()),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_catalog() {
        let yaml = r#"
categories:
  - name: awareness
    metrics:
      - key: reach
        label: "Reach (millions)"
        weight: 2
        transform: "x10"
      - key: recall
        label: "Brand Recall (%)"
        weight: 2
"#;
        let config: CatalogConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.categories.len(), 1);
        assert!(config.categories[0].metrics[1].transform.is_none());

        let catalog = config.build().unwrap();
        assert_eq!(catalog.get("reach").unwrap().transform, Transform::Multiply(10.0));
        assert_eq!(catalog.get("recall").unwrap().transform, Transform::Clamp);
        assert!((catalog.get("reach").unwrap().base_weight - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = r#"
categories:
  - name: awareness
    colour: red
    metrics: []
"#;
        assert!(serde_saphyr::from_str::<CatalogConfig>(yaml).is_err());
    }

    #[test]
    fn test_build_reports_bad_transform() {
        let config = CatalogConfig {
            categories: vec![CategoryConfig {
                name: "a".to_string(),
                metrics: vec![MetricConfig {
                    key: "m".to_string(),
                    label: "M".to_string(),
                    weight: 1.0,
                    placeholder: None,
                    transform: Some("x".to_string()),
                }],
            }],
        };
        assert!(matches!(
            config.build(),
            Err(CatalogError::InvalidTransform { .. })
        ));
    }

    #[test]
    fn test_builtin_survives_yaml_roundtrip() {
        let builtin = MetricCatalog::builtin();
        let config = CatalogConfig::from(&builtin);
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: CatalogConfig = serde_saphyr::from_str(&yaml).unwrap();
        let rebuilt = parsed.build().unwrap();

        assert_eq!(rebuilt.len(), builtin.len());
        for (a, b) in builtin.metrics().zip(rebuilt.metrics()) {
            assert_eq!(a.key, b.key);
            assert_eq!(a.category, b.category);
            assert_eq!(a.transform, b.transform);
            assert!((a.base_weight - b.base_weight).abs() < 1e-9);
        }
    }
}
