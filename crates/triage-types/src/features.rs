//! Named numeric features.

use std::collections::BTreeMap;

/// Flat mapping from feature name to numeric value.
///
/// Booleans are stored as `0.0`/`1.0`. Iteration order is by name, so two
/// feature sets with the same content always compare and print identically.
///
/// # Examples
///
/// ```
/// use triage_types::{well_known, FeatureSet};
///
/// let mut features = FeatureSet::new();
/// features.insert(well_known::SYSTOLIC, 120.0);
/// features.insert_flag(well_known::CHEST_PAIN, true);
///
/// assert_eq!(features.get(well_known::SYSTOLIC), Some(120.0));
/// assert_eq!(features.flag(well_known::CHEST_PAIN), Some(true));
/// assert_eq!(features.get(well_known::AGE), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct FeatureSet {
    values: BTreeMap<String, f64>,
}

impl FeatureSet {
    /// Creates an empty feature set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a feature.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    /// Inserts a boolean feature as `0.0`/`1.0`.
    pub fn insert_flag(&mut self, name: impl Into<String>, present: bool) {
        self.insert(name, if present { 1.0 } else { 0.0 });
    }

    /// Removes a feature, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<f64> {
        self.values.remove(name)
    }

    /// Returns a feature value.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Returns a feature read as a flag: any non-zero value is `true`.
    pub fn flag(&self, name: &str) -> Option<bool> {
        self.get(name).map(|v| v != 0.0)
    }

    /// Returns true if the feature is present.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if there are no features.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Iterates over feature names in name order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
