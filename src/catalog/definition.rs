use std::collections::HashSet;

use super::transform::Transform;
use crate::error::CatalogError;
use crate::scoring::OVERALL_KEY;

/// One measurable brand indicator.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricDefinition {
    pub key: String,
    pub category: String,
    pub label: String,
    /// Share of the full catalog. All base weights sum to 1.0.
    pub base_weight: f64,
    pub placeholder: String,
    pub transform: Transform,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryDefinition {
    pub name: String,
    pub metrics: Vec<MetricDefinition>,
}

/// Immutable set of metric definitions, grouped by category.
///
/// Built once at startup and passed by reference into every scoring call.
/// Iteration order is declaration order: categories first, then the metrics
/// within each category.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricCatalog {
    categories: Vec<CategoryDefinition>,
}

impl MetricCatalog {
    /// Build a catalog from declared (relative) weights.
    ///
    /// Weights are rescaled so the stored base weights sum to 1.0. Every
    /// metric's `category` field is overwritten with its owning category.
    pub fn new(categories: Vec<CategoryDefinition>) -> Result<Self, CatalogError> {
        if categories.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut category_names = HashSet::new();
        let mut metric_keys = HashSet::new();
        for category in &categories {
            if category.name == OVERALL_KEY {
                return Err(CatalogError::ReservedCategory(category.name.clone()));
            }
            if !category_names.insert(category.name.as_str()) {
                return Err(CatalogError::DuplicateCategory(category.name.clone()));
            }
            if category.metrics.is_empty() {
                return Err(CatalogError::EmptyCategory(category.name.clone()));
            }
            for metric in &category.metrics {
                if !metric_keys.insert(metric.key.as_str()) {
                    return Err(CatalogError::DuplicateMetric(metric.key.clone()));
                }
                if !(metric.base_weight.is_finite() && metric.base_weight > 0.0) {
                    return Err(CatalogError::InvalidWeight {
                        key: metric.key.clone(),
                        weight: metric.base_weight,
                    });
                }
            }
        }

        let total: f64 = categories
            .iter()
            .flat_map(|c| c.metrics.iter())
            .map(|m| m.base_weight)
            .sum();
        if !total.is_finite() {
            return Err(CatalogError::WeightTotalOverflow(total));
        }

        Ok(Self::rescaled(categories))
    }

    fn rescaled(mut categories: Vec<CategoryDefinition>) -> Self {
        let total: f64 = categories
            .iter()
            .flat_map(|c| c.metrics.iter())
            .map(|m| m.base_weight)
            .sum();

        for category in &mut categories {
            for metric in &mut category.metrics {
                metric.category = category.name.clone();
                metric.base_weight /= total;
            }
        }

        Self { categories }
    }

    /// The stock brand catalog: 28 metrics across six categories.
    #[rustfmt::skip]
    pub fn builtin() -> Self {
        use Transform::*;

        Self::rescaled(vec![
            category(
                "awareness",
                vec![
                    metric("reachImpressions", "Reach (millions)", 0.04, "Total impressions across channels", Multiply(10.0)),
                    metric("brandRecall", "Brand Recall (%)", 0.04, "Percentage who remember your brand", Clamp),
                    metric("engagementRate", "Engagement Rate (%)", 0.04, "Average engagement across channels", Clamp),
                    metric("directTraffic", "Direct Traffic (thousands)", 0.04, "Monthly direct website visitors", Multiply(10.0)),
                    metric("brandSearchVolume", "Brand Search Volume (thousands)", 0.04, "Monthly brand searches", Multiply(10.0)),
                ],
            ),
            category(
                "perception",
                vec![
                    metric("brandImageScore", "Brand Image Score", 0.05, "Overall brand perception (0-100)", Clamp),
                    metric("sentimentScore", "Sentiment Score", 0.05, "Positive sentiment percentage", Clamp),
                    metric("socialMediaGrowth", "Social Media Growth (%)", 0.05, "Follower growth rate", Clamp),
                    metric("purchaseIntent", "Purchase Intent Score", 0.05, "Purchase likelihood (0-100)", Clamp),
                    metric("socialProof", "Social Proof Score", 0.05, "Average review rating (0-100)", Clamp),
                ],
            ),
            category(
                "loyalty",
                vec![
                    metric("npsScore", "NPS", 0.05, "Net Promoter Score (-100 to 100)", Shift(100.0, 2.0)),
                    metric("repeatPurchaseRate", "Repeat Purchase Rate (%)", 0.05, "Percentage of repeat customers", Clamp),
                    metric("clv", "CLV (thousands)", 0.05, "Customer Lifetime Value", Divide(10.0)),
                    metric("aov", "AOV", 0.05, "Average Order Value", Divide(10.0)),
                    metric("timeBetweenPurchases", "Purchase Frequency (days)", 0.05, "Average days between purchases", Decay(3.0)),
                ],
            ),
            category(
                "performance",
                vec![
                    metric("marketShare", "Market Share (%)", 0.04, "Percentage of market share", Clamp),
                    metric("revenueGrowth", "Revenue Growth (%)", 0.04, "Year-over-year growth rate", Multiply(5.0)),
                    metric("profitMargins", "Profit Margins (%)", 0.04, "Net profit margin", Clamp),
                    metric("cac", "CAC", 0.04, "Customer Acquisition Cost", Decay(1000.0)),
                    metric("marketingROI", "Marketing ROI (%)", 0.04, "Return on Marketing Investment", Multiply(5.0)),
                ],
            ),
            category(
                "distribution",
                vec![
                    metric("distributionCoverage", "Distribution Coverage (%)", 0.04, "Market coverage percentage", Clamp),
                    metric("salesVelocity", "Sales Velocity", 0.04, "Units sold per period", Clamp),
                    metric("roas", "ROAS", 0.04, "Return on Ad Spend", Multiply(5.0)),
                ],
            ),
            category(
                "equity",
                vec![
                    metric("brandValue", "Brand Valuation (INR)", 0.03, "Overall brand worth in INR", Clamp),
                    metric("brandStrength", "Brand Strength", 0.03, "Overall brand strength (0-100)", Clamp),
                    metric("brandResonance", "Brand Resonance", 0.03, "Customer connection score (0-100)", Clamp),
                    metric("mediaCoverage", "Media Coverage Quality", 0.03, "Media sentiment score (0-100)", Clamp),
                    metric("influencerAffinity", "Influencer Brand Affinity", 0.03, "Influencer alignment score (0-100)", Clamp),
                ],
            ),
        ])
    }

    pub fn categories(&self) -> &[CategoryDefinition] {
        &self.categories
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    /// All metrics in catalog order.
    pub fn metrics(&self) -> impl Iterator<Item = &MetricDefinition> {
        self.categories.iter().flat_map(|c| c.metrics.iter())
    }

    pub fn get(&self, key: &str) -> Option<&MetricDefinition> {
        self.metrics().find(|m| m.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Resolve a key, failing for keys the catalog does not define.
    pub fn require(&self, key: &str) -> Result<&MetricDefinition, CatalogError> {
        self.get(key)
            .ok_or_else(|| CatalogError::UnknownMetric(key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.metrics().count()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Default for MetricCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Build a category; metrics get their `category` filled in by the catalog.
pub fn category(name: &str, metrics: Vec<MetricDefinition>) -> CategoryDefinition {
    CategoryDefinition {
        name: name.to_string(),
        metrics,
    }
}

pub fn metric(
    key: &str,
    label: &str,
    weight: f64,
    placeholder: &str,
    transform: Transform,
) -> MetricDefinition {
    MetricDefinition {
        key: key.to_string(),
        category: String::new(),
        label: label.to_string(),
        base_weight: weight,
        placeholder: placeholder.to_string(),
        transform,
    }
}
