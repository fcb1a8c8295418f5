//! Row selection keyed by row identity, independent of the active filter.

use std::collections::HashSet;

use crate::types::RowKey;

/// The set of selected row keys.
///
/// Selection tracks identities, not positions: a row stays selected while it
/// is filtered out and reappears selected when the filter releases it.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    selected: HashSet<RowKey>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the given key is selected.
    pub fn contains(&self, key: &RowKey) -> bool {
        self.selected.contains(key)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Iterate over the selected keys, in arbitrary order.
    pub fn keys(&self) -> impl Iterator<Item = &RowKey> {
        self.selected.iter()
    }

    /// Flip the selection state of a key. Returns `true` if the key is
    /// selected afterwards.
    pub fn toggle(&mut self, key: RowKey) -> bool {
        if self.selected.remove(&key) {
            false
        } else {
            self.selected.insert(key);
            true
        }
    }

    /// Mark a key as selected. Returns `true` if it was newly added.
    pub fn select(&mut self, key: RowKey) -> bool {
        self.selected.insert(key)
    }

    /// Remove a key from the selection. Returns `true` if it was present.
    pub fn deselect(&mut self, key: &RowKey) -> bool {
        self.selected.remove(key)
    }

    /// Select every key in the iterator. Returns the keys that were newly
    /// added.
    pub fn select_many(&mut self, keys: impl IntoIterator<Item = RowKey>) -> Vec<RowKey> {
        keys.into_iter()
            .filter(|k| self.selected.insert(k.clone()))
            .collect()
    }

    /// Clear the entire selection. Returns the keys that were selected.
    pub fn clear(&mut self) -> Vec<RowKey> {
        self.selected.drain().collect()
    }

    /// Whether every key in the iterator is selected. An empty iterator
    /// yields `false`: there is nothing to have selected.
    pub fn contains_all<'a>(&self, keys: impl IntoIterator<Item = &'a RowKey>) -> bool {
        let mut any = false;
        for key in keys {
            if !self.selected.contains(key) {
                return false;
            }
            any = true;
        }
        any
    }
}
