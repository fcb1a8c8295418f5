//! Sort state that can only ever express zero or one active column.
//!
//! The single-active-sort invariant is structural: the state holds an
//! `Option<(column key, direction)>`, so a second active column cannot be
//! represented, no matter how the state is constructed.

use serde::{Deserialize, Serialize};

use crate::types::SortDirection;

/// The table's sort state: at most one column with a direction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    active: Option<(String, SortDirection)>,
}

impl SortState {
    /// No active sort; rows keep filter-pass order.
    pub fn none() -> Self {
        Self::default()
    }

    /// Sort by a single column in the given direction.
    pub fn by(key: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            active: Some((key.into(), direction)),
        }
    }

    /// The active `(column key, direction)` pair, if any.
    pub fn active(&self) -> Option<(&str, SortDirection)> {
        self.active.as_ref().map(|(k, d)| (k.as_str(), *d))
    }

    /// The direction currently applied to the given column.
    pub fn direction_of(&self, key: &str) -> Option<SortDirection> {
        match &self.active {
            Some((k, d)) if k == key => Some(*d),
            _ => None,
        }
    }

    /// Whether any column is actively sorted.
    pub fn is_sorted(&self) -> bool {
        self.active.is_some()
    }

    /// Clear the active sort.
    pub fn clear(&mut self) {
        self.active = None;
    }

    /// Advance the sort cycle for a column: none -> asc -> desc -> none.
    ///
    /// Cycling a different column replaces the previously active one, so a
    /// header click always leaves at most one sorted column.
    pub fn cycle(&mut self, key: &str) {
        self.active = match self.direction_of(key) {
            None => Some((key.to_string(), SortDirection::Asc)),
            Some(SortDirection::Asc) => Some((key.to_string(), SortDirection::Desc)),
            Some(SortDirection::Desc) => None,
        };
    }
}
