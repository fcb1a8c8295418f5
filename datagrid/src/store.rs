//! The table store: owns rows, filter/sort/selection state, and the cached
//! processed set, with stale-while-recomputing refresh semantics.

use crate::derive::process_rows;
use crate::filter::{FilterState, FilterValue};
use crate::schema::{Schema, SchemaError};
use crate::selection::Selection;
use crate::sort::SortState;
use crate::types::{RowKey, SortDirection};

pub type RowKeyFn<R> = Box<dyn Fn(&R) -> RowKey>;
pub type RowSelectableFn<R> = Box<dyn Fn(&R) -> bool>;

/// Checkbox-column configuration: row identity, selectability, and whether
/// clicking anywhere on a row toggles its checkbox.
pub struct CheckboxConfig<R> {
    pub(crate) column_key: String,
    pub(crate) row_key: RowKeyFn<R>,
    pub(crate) is_row_selectable: Option<RowSelectableFn<R>>,
    pub(crate) check_on_row_click: bool,
}

impl<R> CheckboxConfig<R> {
    /// Checkbox column bound to the given schema column, with a key selector
    /// giving each row its identity.
    pub fn new(column_key: impl Into<String>, row_key: impl Fn(&R) -> RowKey + 'static) -> Self {
        Self {
            column_key: column_key.into(),
            row_key: Box::new(row_key),
            is_row_selectable: None,
            check_on_row_click: false,
        }
    }

    /// Restrict which rows can be selected. Unselectable rows are skipped by
    /// select-all and ignore toggle attempts.
    pub fn selectable_when(mut self, predicate: impl Fn(&R) -> bool + 'static) -> Self {
        self.is_row_selectable = Some(Box::new(predicate));
        self
    }

    /// Toggle the row's checkbox when the row itself is clicked.
    pub fn check_on_row_click(mut self) -> Self {
        self.check_on_row_click = true;
        self
    }
}

/// Outcome of a single-row selection change, for hosts that mirror selection
/// elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSelection {
    /// Position in the processed set at the time of the change, if the row
    /// was visible in it.
    pub row_index: Option<usize>,
    pub key: RowKey,
    pub selected: bool,
}

type FilterHook = Box<dyn FnMut(&FilterState)>;
type SortHook = Box<dyn FnMut(&SortState)>;
type RowSelectionHook<R> = Box<dyn FnMut(&R, &RowSelection)>;
type SelectAllHook = Box<dyn FnMut(bool, &[RowKey])>;

/// Host callbacks fired on state changes.
#[derive(Default)]
pub struct TableHooks<R> {
    pub(crate) on_filter_change: Option<FilterHook>,
    pub(crate) on_sort_change: Option<SortHook>,
    pub(crate) on_row_selection: Option<RowSelectionHook<R>>,
    pub(crate) on_select_all: Option<SelectAllHook>,
}

impl<R> TableHooks<R> {
    pub fn new() -> Self {
        Self {
            on_filter_change: None,
            on_sort_change: None,
            on_row_selection: None,
            on_select_all: None,
        }
    }

    pub fn on_filter_change(mut self, hook: impl FnMut(&FilterState) + 'static) -> Self {
        self.on_filter_change = Some(Box::new(hook));
        self
    }

    pub fn on_sort_change(mut self, hook: impl FnMut(&SortState) + 'static) -> Self {
        self.on_sort_change = Some(Box::new(hook));
        self
    }

    pub fn on_row_selection(mut self, hook: impl FnMut(&R, &RowSelection) + 'static) -> Self {
        self.on_row_selection = Some(Box::new(hook));
        self
    }

    pub fn on_select_all(mut self, hook: impl FnMut(bool, &[RowKey]) + 'static) -> Self {
        self.on_select_all = Some(Box::new(hook));
        self
    }
}

/// Owns the rows and every piece of table state, plus the cached processed
/// set derived from them.
///
/// Mutations mark the processed set dirty; the host calls [`refresh`]
/// (typically once per frame) to recompute. Between the mutation and the
/// refresh, readers observe the stale processed set and [`is_pending`]
/// reports `true`.
///
/// [`refresh`]: TableStore::refresh
/// [`is_pending`]: TableStore::is_pending
pub struct TableStore<R> {
    rows: Vec<R>,
    schema: Schema<R>,
    filter: FilterState,
    sort: SortState,
    selection: Selection,
    checkbox: Option<CheckboxConfig<R>>,
    hooks: TableHooks<R>,
    processed: Vec<usize>,
    generation: u64,
    dirty: bool,
}

impl<R> TableStore<R> {
    /// Build a store over the given rows and schema.
    ///
    /// Fails if the schema is invalid or the checkbox config names a column
    /// the schema does not contain.
    pub fn new(
        rows: Vec<R>,
        schema: Schema<R>,
        checkbox: Option<CheckboxConfig<R>>,
    ) -> Result<Self, SchemaError> {
        if let Some(config) = &checkbox
            && schema.column(&config.column_key).is_none()
        {
            return Err(SchemaError::UnknownColumn {
                key: config.column_key.clone(),
            });
        }
        let mut store = Self {
            rows,
            schema,
            filter: FilterState::new(),
            sort: SortState::none(),
            selection: Selection::new(),
            checkbox,
            hooks: TableHooks::new(),
            processed: Vec::new(),
            generation: 0,
            dirty: false,
        };
        store.processed = process_rows(&store.rows, &store.schema, &store.filter, &store.sort);
        Ok(store)
    }

    /// Install host callbacks.
    pub fn with_hooks(mut self, hooks: TableHooks<R>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Seed filter and sort state before the first derivation, without
    /// firing hooks.
    pub fn with_initial_state(mut self, filter: FilterState, sort: SortState) -> Self {
        self.filter = filter;
        self.sort = sort;
        self.processed = process_rows(&self.rows, &self.schema, &self.filter, &self.sort);
        self
    }

    // ---- state access ------------------------------------------------------

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn schema(&self) -> &Schema<R> {
        &self.schema
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn checkbox(&self) -> Option<&CheckboxConfig<R>> {
        self.checkbox.as_ref()
    }

    /// Indices into [`rows`](Self::rows) of the processed (filtered and
    /// sorted) set, possibly stale while [`is_pending`](Self::is_pending).
    pub fn processed_indices(&self) -> &[usize] {
        &self.processed
    }

    pub fn processed_len(&self) -> usize {
        self.processed.len()
    }

    /// Iterate over the processed rows in order.
    pub fn processed_rows(&self) -> impl Iterator<Item = &R> {
        self.processed.iter().map(|&i| &self.rows[i])
    }

    /// The row at a position in the processed set.
    pub fn row_at(&self, processed_index: usize) -> Option<&R> {
        self.processed
            .get(processed_index)
            .map(|&i| &self.rows[i])
    }

    /// Monotonic counter bumped every time the processed set is recomputed.
    /// Hosts use it to invalidate anything keyed to processed order.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a mutation has happened since the last [`refresh`]
    /// (the processed set is stale).
    ///
    /// [`refresh`]: TableStore::refresh
    pub fn is_pending(&self) -> bool {
        self.dirty
    }

    // ---- mutations ---------------------------------------------------------

    /// Replace the row set. Selection is kept; keys that no longer resolve
    /// to a row simply match nothing.
    pub fn set_rows(&mut self, rows: Vec<R>) {
        self.rows = rows;
        self.dirty = true;
    }

    /// Set one column's filter value and fire the filter hook.
    pub fn update_filter(&mut self, key: impl Into<String>, value: impl Into<FilterValue>) {
        self.filter.set(key, value);
        self.dirty = true;
        if let Some(hook) = &mut self.hooks.on_filter_change {
            hook(&self.filter);
        }
    }

    /// Replace the whole filter state and fire the filter hook.
    pub fn set_filter(&mut self, filter: FilterState) {
        if self.filter == filter {
            return;
        }
        self.filter = filter;
        self.dirty = true;
        if let Some(hook) = &mut self.hooks.on_filter_change {
            hook(&self.filter);
        }
    }

    /// Replace the sort state and fire the sort hook.
    pub fn set_sort(&mut self, sort: SortState) {
        if self.sort == sort {
            return;
        }
        self.sort = sort;
        self.dirty = true;
        if let Some(hook) = &mut self.hooks.on_sort_change {
            hook(&self.sort);
        }
    }

    /// Sort by a column in an explicit direction.
    pub fn sort_by(&mut self, key: impl Into<String>, direction: SortDirection) {
        let key = key.into();
        if self.schema.column(&key).is_none_or(|c| !c.is_sortable()) {
            log::debug!("[store] ignoring sort on non-sortable column `{key}`");
            return;
        }
        self.set_sort(SortState::by(key, direction));
    }

    /// Header-click behavior: advance the column through
    /// asc -> desc -> none. A click on a non-sortable column is a no-op.
    pub fn cycle_sort(&mut self, key: &str) {
        if self.schema.column(key).is_none_or(|c| !c.is_sortable()) {
            log::debug!("[store] ignoring sort on non-sortable column `{key}`");
            return;
        }
        let mut next = self.sort.clone();
        next.cycle(key);
        self.set_sort(next);
    }

    /// Recompute the processed set if any mutation happened since the last
    /// call. Returns `true` when a recompute ran (the generation advanced).
    pub fn refresh(&mut self) -> bool {
        if !self.dirty {
            return false;
        }
        self.processed = process_rows(&self.rows, &self.schema, &self.filter, &self.sort);
        self.generation = self.generation.wrapping_add(1);
        self.dirty = false;
        log::debug!(
            "[store] refreshed: generation {}, {} processed rows",
            self.generation,
            self.processed.len(),
        );
        true
    }

    // ---- selection ---------------------------------------------------------

    fn row_is_selectable(&self, row: &R) -> bool {
        match &self.checkbox {
            Some(config) => config
                .is_row_selectable
                .as_ref()
                .is_none_or(|selectable| selectable(row)),
            None => false,
        }
    }

    /// Whether the row at a processed position is selected.
    pub fn is_selected(&self, processed_index: usize) -> bool {
        let (Some(config), Some(row)) = (&self.checkbox, self.row_at(processed_index)) else {
            return false;
        };
        self.selection.contains(&(config.row_key)(row))
    }

    /// Keys of the currently selected rows, in arbitrary order.
    pub fn selected_keys(&self) -> Vec<RowKey> {
        self.selection.keys().cloned().collect()
    }

    /// How many processed rows are selectable.
    pub fn selectable_count(&self) -> usize {
        self.processed
            .iter()
            .filter(|&&i| self.row_is_selectable(&self.rows[i]))
            .count()
    }

    /// Whether any processed row can be selected at all.
    pub fn can_select_any(&self) -> bool {
        self.processed
            .iter()
            .any(|&i| self.row_is_selectable(&self.rows[i]))
    }

    /// Whether every selectable processed row is selected. `false` when no
    /// processed row is selectable.
    pub fn is_all_selected(&self) -> bool {
        let Some(config) = &self.checkbox else {
            return false;
        };
        let keys: Vec<RowKey> = self
            .processed
            .iter()
            .filter(|&&i| self.row_is_selectable(&self.rows[i]))
            .map(|&i| (config.row_key)(&self.rows[i]))
            .collect();
        !keys.is_empty() && self.selection.contains_all(keys.iter())
    }

    /// Toggle a row's selection by processed position. Returns the change,
    /// or `None` when the position is out of range, the row is not
    /// selectable, or no checkbox column is configured.
    pub fn toggle_row_selection(&mut self, processed_index: usize) -> Option<RowSelection> {
        let row_index = *self.processed.get(processed_index)?;
        self.toggle_selection_at(row_index, Some(processed_index))
    }

    /// Toggle a row's selection by key, regardless of whether the row is
    /// currently in the processed set.
    pub fn toggle_key_selection(&mut self, key: &RowKey) -> Option<RowSelection> {
        let config = self.checkbox.as_ref()?;
        let row_index = self
            .rows
            .iter()
            .position(|row| (config.row_key)(row) == *key)?;
        let processed_index = self.processed.iter().position(|&i| i == row_index);
        self.toggle_selection_at(row_index, processed_index)
    }

    fn toggle_selection_at(
        &mut self,
        row_index: usize,
        processed_index: Option<usize>,
    ) -> Option<RowSelection> {
        let config = self.checkbox.as_ref()?;
        let row = &self.rows[row_index];
        if !config
            .is_row_selectable
            .as_ref()
            .is_none_or(|selectable| selectable(row))
        {
            return None;
        }
        let key = (config.row_key)(row);
        let selected = self.selection.toggle(key.clone());
        let change = RowSelection {
            row_index: processed_index,
            key,
            selected,
        };
        log::debug!(
            "[store] row {} {}",
            change.key,
            if selected { "selected" } else { "deselected" },
        );
        if let Some(hook) = &mut self.hooks.on_row_selection {
            hook(&self.rows[row_index], &change);
        }
        Some(change)
    }

    /// Header-checkbox behavior. When not everything selectable is selected,
    /// select every selectable processed row; otherwise clear the whole
    /// selection, including keys outside the current processed set.
    ///
    /// Returns the affected keys and the resulting all-selected flag.
    pub fn toggle_select_all(&mut self) -> (bool, Vec<RowKey>) {
        let Some(config) = &self.checkbox else {
            return (false, Vec::new());
        };
        let affected;
        let selected;
        if self.is_all_selected() {
            affected = self.selection.clear();
            selected = false;
        } else {
            let keys: Vec<RowKey> = self
                .processed
                .iter()
                .map(|&i| &self.rows[i])
                .filter(|row| {
                    config
                        .is_row_selectable
                        .as_ref()
                        .is_none_or(|selectable| selectable(row))
                })
                .map(|row| (config.row_key)(row))
                .collect();
            affected = self.selection.select_many(keys);
            selected = true;
        }
        log::debug!(
            "[store] select-all {}: {} keys affected",
            if selected { "on" } else { "off" },
            affected.len(),
        );
        if let Some(hook) = &mut self.hooks.on_select_all {
            hook(selected, &affected);
        }
        (selected, affected)
    }

    /// Row-click behavior: toggles the clicked row's checkbox when the
    /// checkbox config opts in, otherwise does nothing.
    pub fn handle_row_click(&mut self, processed_index: usize) -> Option<RowSelection> {
        if !self
            .checkbox
            .as_ref()
            .is_some_and(|config| config.check_on_row_click)
        {
            return None;
        }
        self.toggle_row_selection(processed_index)
    }
}
