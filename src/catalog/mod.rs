pub mod definition;
pub mod schema;
pub mod transform;
pub mod validation;

pub use definition::{CategoryDefinition, MetricCatalog, MetricDefinition};
pub use schema::{CatalogConfig, CategoryConfig, MetricConfig};
pub use transform::Transform;
pub use validation::validate_catalog;
