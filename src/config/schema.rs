use serde::{Deserialize, Serialize};

use crate::catalog::CatalogConfig;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Custom metric catalog; the built-in catalog is used when absent
    #[serde(default)]
    pub catalog: Option<CatalogConfig>,

    /// History file location (default: ~/.config/brand-score/history.json)
    #[serde(default)]
    pub history_path: Option<String>,

    /// Metric keys disabled unless re-enabled on the command line
    #[serde(default)]
    pub disabled: Option<Vec<String>>,
}
