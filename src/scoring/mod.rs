pub mod classify;
pub mod engine;
pub mod input;
pub mod normalize;
pub mod weights;

pub use classify::{classify, Tier};
pub use engine::{
    aggregate, aggregate_detailed, flat_overall, MetricContribution, ScoreMismatch, ScoreResult,
    ScoreSet, OVERALL_KEY,
};
pub use input::{is_decimal, EnabledSet, RawValues};
pub use normalize::normalize;
pub use weights::{adjust_weights, AdjustedWeights};
