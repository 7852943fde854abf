use serde::{Deserialize, Serialize};
use std::fmt;

/// Qualitative effectiveness tier for a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    Exceptional,
    VeryEffective,
    Effective,
    ModeratelyEffective,
    NeedsImprovement,
    Ineffective,
}

impl Tier {
    pub fn label(&self) -> &'static str {
        match self {
            Tier::Exceptional => "Exceptional",
            Tier::VeryEffective => "Very Effective",
            Tier::Effective => "Effective",
            Tier::ModeratelyEffective => "Moderately Effective",
            Tier::NeedsImprovement => "Needs Improvement",
            Tier::Ineffective => "Ineffective",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Map a score to its tier, checking thresholds from the top down.
/// Anything below 50 (NaN included) is `Ineffective`.
pub fn classify(score: f64) -> Tier {
    if score >= 90.0 {
        Tier::Exceptional
    } else if score >= 80.0 {
        Tier::VeryEffective
    } else if score >= 70.0 {
        Tier::Effective
    } else if score >= 60.0 {
        Tier::ModeratelyEffective
    } else if score >= 50.0 {
        Tier::NeedsImprovement
    } else {
        Tier::Ineffective
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries() {
        assert_eq!(classify(90.0), Tier::Exceptional);
        assert_eq!(classify(89.999), Tier::VeryEffective);
        assert_eq!(classify(80.0), Tier::VeryEffective);
        assert_eq!(classify(70.0), Tier::Effective);
        assert_eq!(classify(60.0), Tier::ModeratelyEffective);
        assert_eq!(classify(50.0), Tier::NeedsImprovement);
        assert_eq!(classify(49.999), Tier::Ineffective);
    }

    #[test]
    fn test_out_of_range_scores() {
        assert_eq!(classify(125.0), Tier::Exceptional);
        assert_eq!(classify(-10.0), Tier::Ineffective);
        assert_eq!(classify(f64::NAN), Tier::Ineffective);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Tier::NeedsImprovement.to_string(), "Needs Improvement");
        assert_eq!(Tier::ModeratelyEffective.label(), "Moderately Effective");
    }
}
