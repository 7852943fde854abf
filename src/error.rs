use thiserror::Error;

/// Problems building a catalog or resolving keys against it.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("catalog has no categories")]
    Empty,

    #[error("category '{0}' has no metrics")]
    EmptyCategory(String),

    #[error("category name '{0}' is reserved")]
    ReservedCategory(String),

    #[error("duplicate category '{0}'")]
    DuplicateCategory(String),

    #[error("duplicate metric key '{0}'")]
    DuplicateMetric(String),

    #[error("metric '{key}' has invalid weight {weight} (must be positive)")]
    InvalidWeight { key: String, weight: f64 },

    #[error("metric weights sum to {0}, which is not a finite number")]
    WeightTotalOverflow(f64),

    #[error("metric '{key}' has invalid transform '{transform}': {reason}")]
    InvalidTransform {
        key: String,
        transform: String,
        reason: String,
    },

    #[error("unknown metric '{0}'")]
    UnknownMetric(String),
}

/// Raw input rejected at the boundary, before it reaches the engine.
#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("value '{value}' for '{key}' is not a non-negative decimal number")]
    InvalidValue { key: String, value: String },

    #[error("expected key=value, got '{0}'")]
    MalformedPair(String),
}
