//! Filter state: a mapping from column key to filter value, with the
//! "no filter applied" sentinel rules.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The sentinel choice value meaning "no filter" for select-style filters.
pub const FILTER_ALL: &str = "all";

/// A single column's filter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterValue {
    /// Free-text input, matched by substring against the field value.
    Text(String),
    /// A selected option token; `"all"` means no filter.
    Choice(String),
}

impl FilterValue {
    /// Whether this value actually constrains rows.
    ///
    /// Blank-after-trim text and the `"all"` choice count as inactive,
    /// matching an absent entry.
    pub fn is_active(&self) -> bool {
        match self {
            FilterValue::Text(s) => !s.trim().is_empty(),
            FilterValue::Choice(s) => {
                let s = s.trim();
                !s.is_empty() && s != FILTER_ALL
            }
        }
    }

    /// The raw text of the value, for default substring matching.
    pub fn as_str(&self) -> &str {
        match self {
            FilterValue::Text(s) | FilterValue::Choice(s) => s,
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

/// Filter values keyed by column key.
///
/// Entries that are not [`FilterValue::is_active`] are treated exactly like
/// absent entries by the derivation pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    values: HashMap<String, FilterValue>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the filter value for a column key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<FilterValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Builder-style variant of [`set`](Self::set) for defaults.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Get the value stored for a column key, active or not.
    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.values.get(key)
    }

    /// Remove the filter value for a column key.
    pub fn clear(&mut self, key: &str) {
        self.values.remove(key);
    }

    /// Remove all filter values.
    pub fn clear_all(&mut self) {
        self.values.clear();
    }

    /// Whether the column currently has an active filter.
    pub fn is_active(&self, key: &str) -> bool {
        self.values.get(key).is_some_and(FilterValue::is_active)
    }

    /// Iterate over the active `(key, value)` entries.
    pub fn active_entries(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.values
            .iter()
            .filter(|(_, v)| v.is_active())
            .map(|(k, v)| (k.as_str(), v))
    }

    /// Whether any column has an active filter.
    pub fn has_active(&self) -> bool {
        self.values.values().any(FilterValue::is_active)
    }
}
