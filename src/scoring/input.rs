use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::catalog::MetricCatalog;
use crate::error::{CatalogError, InputError};

/// Which metrics take part in scoring. Every metric is enabled unless listed
/// as disabled; keys are checked against the catalog on the way in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnabledSet {
    disabled: BTreeSet<String>,
}

impl EnabledSet {
    /// Everything enabled.
    pub fn all() -> Self {
        Self::default()
    }

    /// Nothing enabled.
    pub fn none(catalog: &MetricCatalog) -> Self {
        Self {
            disabled: catalog.metrics().map(|m| m.key.clone()).collect(),
        }
    }

    pub fn with_disabled<I, S>(catalog: &MetricCatalog, keys: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::all();
        for key in keys {
            set.set(catalog, key.as_ref(), false)?;
        }
        Ok(set)
    }

    /// Enable exactly the given keys.
    pub fn only<I, S>(catalog: &MetricCatalog, keys: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::none(catalog);
        for key in keys {
            set.set(catalog, key.as_ref(), true)?;
        }
        Ok(set)
    }

    /// Build from an explicit key -> enabled map. Keys not mentioned stay enabled.
    pub fn from_map(
        catalog: &MetricCatalog,
        map: &HashMap<String, bool>,
    ) -> Result<Self, CatalogError> {
        let mut set = Self::all();
        for (key, enabled) in map {
            set.set(catalog, key, *enabled)?;
        }
        Ok(set)
    }

    pub fn set(
        &mut self,
        catalog: &MetricCatalog,
        key: &str,
        enabled: bool,
    ) -> Result<(), CatalogError> {
        catalog.require(key)?;
        if enabled {
            self.disabled.remove(key);
        } else {
            self.disabled.insert(key.to_string());
        }
        Ok(())
    }

    /// Flip a metric, returning its new state.
    pub fn toggle(&mut self, catalog: &MetricCatalog, key: &str) -> Result<bool, CatalogError> {
        let enabled = !self.is_enabled(key);
        self.set(catalog, key, enabled)?;
        Ok(enabled)
    }

    pub fn is_enabled(&self, key: &str) -> bool {
        !self.disabled.contains(key)
    }

    /// Disabled keys in sorted order.
    pub fn disabled_keys(&self) -> impl Iterator<Item = &str> {
        self.disabled.iter().map(String::as_str)
    }
}

/// Raw textual metric values keyed by metric key.
///
/// Values set through [`RawValues::set`] are checked to be non-negative
/// decimals (`^\d*\.?\d*$`). Deserialized snapshots are taken as-is; the
/// engine treats anything unparsable as 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawValues {
    values: IndexMap<String, String>,
}

impl RawValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// One empty entry per catalog metric, in catalog order.
    pub fn blank(catalog: &MetricCatalog) -> Self {
        Self {
            values: catalog
                .metrics()
                .map(|m| (m.key.clone(), String::new()))
                .collect(),
        }
    }

    pub fn set(
        &mut self,
        catalog: &MetricCatalog,
        key: &str,
        value: &str,
    ) -> Result<(), InputError> {
        catalog.require(key)?;
        let value = value.trim();
        if !is_decimal(value) {
            return Err(InputError::InvalidValue {
                key: key.to_string(),
                value: value.to_string(),
            });
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// Parse and apply a `key=value` pair.
    pub fn set_pair(&mut self, catalog: &MetricCatalog, pair: &str) -> Result<(), InputError> {
        let Some((key, value)) = pair.split_once('=') else {
            return Err(InputError::MalformedPair(pair.to_string()));
        };
        self.set(catalog, key.trim(), value)
    }

    /// Validate every entry of a loosely typed map.
    pub fn from_map<I, K, V>(catalog: &MetricCatalog, entries: I) -> Result<Self, InputError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut values = Self::blank(catalog);
        for (key, value) in entries {
            values.set(catalog, key.as_ref(), value.as_ref())?;
        }
        Ok(values)
    }

    /// The raw value for a key; empty when unset.
    pub fn get(&self, key: &str) -> &str {
        self.values.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// `^\d*\.?\d*$`: optional digits, at most one `.`, no sign.
pub fn is_decimal(s: &str) -> bool {
    let mut seen_dot = false;
    s.chars().all(|c| match c {
        '0'..='9' => true,
        '.' if !seen_dot => {
            seen_dot = true;
            true
        }
        _ => false,
    })
}
