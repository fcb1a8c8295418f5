//! The filter -> sort derivation pipeline.
//!
//! Derivation produces indices into the caller's row slice instead of cloned
//! rows, so row identity survives the pipeline and nothing is copied.

use std::cmp::Ordering;

use crate::filter::{FilterState, FilterValue};
use crate::schema::{Column, Schema};
use crate::sort::SortState;

/// Compute the processed row set: indices of rows passing every active
/// filter, ordered by the active sort.
///
/// Filtering is conjunctive over active entries. Columns with a custom
/// predicate use it; otherwise a filterable column matches when the lowercased
/// field value contains the lowercased filter text. Active filters naming a
/// column the schema does not know, or a column that is not filterable,
/// exclude nothing.
///
/// Sorting is stable, so rows that compare equal keep filter-pass order, and
/// with no active sort the filter-pass order is returned as is.
pub fn process_rows<R>(
    rows: &[R],
    schema: &Schema<R>,
    filter: &FilterState,
    sort: &SortState,
) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..rows.len())
        .filter(|&i| row_passes(&rows[i], schema, filter))
        .collect();

    if let Some((key, direction)) = sort.active()
        && let Some(column) = schema.column(key)
        && column.is_sortable()
    {
        indices.sort_by(|&a, &b| compare_rows(&rows[a], &rows[b], column, direction));
    }

    log::debug!(
        "[derive] processed {} of {} rows (active filters: {}, sorted: {})",
        indices.len(),
        rows.len(),
        filter.active_entries().count(),
        sort.is_sorted(),
    );

    indices
}

fn row_passes<R>(row: &R, schema: &Schema<R>, filter: &FilterState) -> bool {
    filter.active_entries().all(|(key, value)| {
        let Some(column) = schema.column(key) else {
            return true;
        };
        if !column.is_filterable() {
            return true;
        }
        column_matches(row, column, value)
    })
}

fn column_matches<R>(row: &R, column: &Column<R>, value: &FilterValue) -> bool {
    if let Some(predicate) = &column.custom_filter {
        return predicate(row, value);
    }
    // Schema validation guarantees a field accessor when no predicate is set.
    let Some(field) = &column.field else {
        return true;
    };
    field(row)
        .to_string()
        .to_lowercase()
        .contains(&value.as_str().trim().to_lowercase())
}

fn compare_rows<R>(
    a: &R,
    b: &R,
    column: &Column<R>,
    direction: crate::types::SortDirection,
) -> Ordering {
    if let Some(compare) = &column.custom_sort {
        return compare(a, b, direction);
    }
    let Some(field) = &column.field else {
        return Ordering::Equal;
    };
    direction.apply(field(a).compare(&field(b)))
}
