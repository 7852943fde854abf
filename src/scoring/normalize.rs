use crate::catalog::MetricDefinition;

/// Map a metric's raw text onto the 0-100 scale using its transform.
///
/// Disabled metrics and empty values score 0. Text that does not parse as a
/// finite number is taken as 0 rather than failing. The NPS-style `shift`
/// transform is not clamped, so out-of-range input can land outside 0-100.
pub fn normalize(metric: &MetricDefinition, raw: &str, enabled: bool) -> f64 {
    if !enabled || raw.is_empty() {
        return 0.0;
    }
    metric.transform.apply(parse_raw(raw))
}

fn parse_raw(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MetricCatalog;

    fn norm(key: &str, raw: &str) -> f64 {
        let catalog = MetricCatalog::builtin();
        normalize(catalog.get(key).unwrap(), raw, true)
    }

    #[test]
    fn test_disabled_or_empty_is_zero() {
        let catalog = MetricCatalog::builtin();
        let reach = catalog.get("reachImpressions").unwrap();
        assert_eq!(normalize(reach, "5", false), 0.0);
        assert_eq!(normalize(reach, "", true), 0.0);
    }

    #[test]
    fn test_reach_clamp_boundaries() {
        assert_eq!(norm("reachImpressions", "5"), 50.0);
        assert_eq!(norm("reachImpressions", "10"), 100.0);
        assert_eq!(norm("reachImpressions", "10.5"), 100.0);
        assert_eq!(norm("directTraffic", "2"), 20.0);
        assert_eq!(norm("brandSearchVolume", "20"), 100.0);
    }

    #[test]
    fn test_nps_is_unclamped() {
        assert_eq!(norm("npsScore", "100"), 100.0);
        assert_eq!(norm("npsScore", "0"), 50.0);
        // Above the documented range the shift runs past 100.
        assert_eq!(norm("npsScore", "150"), 125.0);
    }

    #[test]
    fn test_nps_lower_bound() {
        let catalog = MetricCatalog::builtin();
        let nps = catalog.get("npsScore").unwrap();
        // Negative values never pass input validation but the transform still
        // maps -100 to 0.
        assert_eq!(nps.transform.apply(-100.0), 0.0);
        assert_eq!(nps.transform.apply(-150.0), -25.0);
    }

    #[test]
    fn test_value_scaled_down() {
        assert_eq!(norm("clv", "500"), 50.0);
        assert_eq!(norm("aov", "2000"), 100.0);
    }

    #[test]
    fn test_decay_metrics() {
        assert_eq!(norm("timeBetweenPurchases", "30"), 90.0);
        assert_eq!(norm("timeBetweenPurchases", "400"), 0.0);
        assert_eq!(norm("cac", "25000"), 75.0);
        assert_eq!(norm("cac", "250000"), 0.0);
    }

    #[test]
    fn test_growth_metrics() {
        assert_eq!(norm("revenueGrowth", "12"), 60.0);
        assert_eq!(norm("marketingROI", "30"), 100.0);
        assert_eq!(norm("roas", "4"), 20.0);
    }

    #[test]
    fn test_direct_clamp() {
        assert_eq!(norm("brandRecall", "42.5"), 42.5);
        assert_eq!(norm("brandRecall", "250"), 100.0);
        assert_eq!(norm("brandValue", "1000000"), 100.0);
    }

    #[test]
    fn test_unparsable_is_zero() {
        assert_eq!(norm("brandRecall", "."), 0.0);
        assert_eq!(norm("brandRecall", "abc"), 0.0);
        assert_eq!(norm("brandRecall", "inf"), 0.0);
        // Decay of a zero value is the full 100.
        assert_eq!(norm("cac", "garbage"), 100.0);
    }
}
