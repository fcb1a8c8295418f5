//! Declarative column schema: per-column rendering, sorting, and filtering
//! callbacks plus layout tracks, validated up front.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

use thiserror::Error;

use crate::filter::FilterState;
use crate::filter::FilterValue;
use crate::types::{FieldValue, SortDirection};

/// Schema validation failure. Raised at table construction, never during
/// derivation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Two columns share the same key.
    #[error("duplicate column key `{key}`")]
    DuplicateKey { key: String },

    /// A sortable or filterable column has neither a custom callback nor a
    /// field accessor to fall back on.
    #[error("column `{key}` is {capability} but has no field accessor or custom callback")]
    MissingAccessor {
        key: String,
        capability: &'static str,
    },

    /// A referenced column key does not exist in the schema.
    #[error("unknown column key `{key}`")]
    UnknownColumn { key: String },
}

/// A column's width contribution to the grid template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Track {
    /// Fixed pixel width.
    Px(u32),
    /// Passed through to the template verbatim (e.g. `"minmax(80px, 1fr)"`).
    Literal(String),
    /// Flexible fraction of the remaining space.
    Flex(u16),
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Track::Px(px) => write!(f, "{px}px"),
            Track::Literal(s) => write!(f, "{s}"),
            Track::Flex(n) => write!(f, "{n}fr"),
        }
    }
}

/// Which kind of filter input a column expects from the host UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterKind {
    #[default]
    Text,
    Select,
    Date,
    Custom,
}

/// Context handed to a cell render callback.
#[derive(Debug, Clone, Copy)]
pub struct CellContext {
    /// Index of the row within the processed (filtered + sorted) set.
    pub row_index: usize,
    /// Index of the column within the schema.
    pub column_index: usize,
}

/// Context handed to a custom header label callback.
pub struct HeaderContext<'a, R> {
    pub label: &'a str,
    pub filter: &'a FilterState,
    pub all_rows: &'a [R],
}

/// An option offered by a select-style filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    pub label: String,
    pub value: String,
}

pub type CellRenderFn<R> = Box<dyn Fn(&R, CellContext) -> String>;
pub type HeaderRenderFn<R> = Box<dyn Fn(HeaderContext<'_, R>) -> String>;
pub type SortFn<R> = Box<dyn Fn(&R, &R, SortDirection) -> Ordering>;
pub type FilterFn<R> = Box<dyn Fn(&R, &FilterValue) -> bool>;
pub type FieldFn<R> = Box<dyn Fn(&R) -> FieldValue>;

/// Declarative description of one column.
///
/// Built fluently:
///
/// ```ignore
/// Column::new("level", "Level", |log: &LogEntry, _| log.level.to_string())
///     .field(|log| FieldValue::from(log.level.as_str()))
///     .sortable()
///     .filterable(FilterKind::Select)
///     .width(Track::Px(100))
/// ```
pub struct Column<R> {
    pub(crate) key: String,
    pub(crate) label: String,
    pub(crate) width: Option<Track>,
    pub(crate) render_cell: CellRenderFn<R>,
    pub(crate) render_header_label: Option<HeaderRenderFn<R>>,
    pub(crate) sortable: bool,
    pub(crate) custom_sort: Option<SortFn<R>>,
    pub(crate) filterable: bool,
    pub(crate) filter_kind: FilterKind,
    pub(crate) filter_options: Vec<FilterOption>,
    pub(crate) filter_placeholder: Option<String>,
    pub(crate) custom_filter: Option<FilterFn<R>>,
    pub(crate) field: Option<FieldFn<R>>,
}

impl<R> fmt::Debug for Column<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("width", &self.width)
            .field("sortable", &self.sortable)
            .field("filterable", &self.filterable)
            .finish_non_exhaustive()
    }
}

impl<R> Column<R> {
    /// Create a column with its key, header label, and cell renderer.
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        render_cell: impl Fn(&R, CellContext) -> String + 'static,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            width: None,
            render_cell: Box::new(render_cell),
            render_header_label: None,
            sortable: false,
            custom_sort: None,
            filterable: false,
            filter_kind: FilterKind::default(),
            filter_options: Vec::new(),
            filter_placeholder: None,
            custom_filter: None,
            field: None,
        }
    }

    /// Set the column width. Columns without a width flex to `1fr`.
    pub fn width(mut self, track: Track) -> Self {
        self.width = Some(track);
        self
    }

    /// Attach the field accessor backing default sorting and filtering.
    pub fn field(mut self, accessor: impl Fn(&R) -> FieldValue + 'static) -> Self {
        self.field = Some(Box::new(accessor));
        self
    }

    /// Render the header label with a custom callback instead of the plain
    /// label text.
    pub fn header_label(
        mut self,
        render: impl Fn(HeaderContext<'_, R>) -> String + 'static,
    ) -> Self {
        self.render_header_label = Some(Box::new(render));
        self
    }

    /// Make the column sortable with the default field-value comparator.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Make the column sortable with a custom comparator.
    pub fn sortable_with(
        mut self,
        compare: impl Fn(&R, &R, SortDirection) -> Ordering + 'static,
    ) -> Self {
        self.sortable = true;
        self.custom_sort = Some(Box::new(compare));
        self
    }

    /// Make the column filterable with the default case-insensitive
    /// substring match on the field value.
    pub fn filterable(mut self, kind: FilterKind) -> Self {
        self.filterable = true;
        self.filter_kind = kind;
        self
    }

    /// Make the column filterable with a custom predicate.
    pub fn filterable_with(
        mut self,
        kind: FilterKind,
        predicate: impl Fn(&R, &FilterValue) -> bool + 'static,
    ) -> Self {
        self.filterable = true;
        self.filter_kind = kind;
        self.custom_filter = Some(Box::new(predicate));
        self
    }

    /// Options offered by a select-style filter input.
    pub fn filter_options(mut self, options: Vec<FilterOption>) -> Self {
        self.filter_options = options;
        self
    }

    /// Placeholder text for the column's filter input.
    pub fn filter_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.filter_placeholder = Some(placeholder.into());
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    pub fn is_filterable(&self) -> bool {
        self.filterable
    }

    pub fn filter_kind(&self) -> FilterKind {
        self.filter_kind
    }

    pub fn filter_options_list(&self) -> &[FilterOption] {
        &self.filter_options
    }

    pub fn filter_placeholder_text(&self) -> Option<&str> {
        self.filter_placeholder.as_deref()
    }

    /// The track this column contributes to the grid template.
    pub fn track(&self) -> Track {
        self.width.clone().unwrap_or(Track::Flex(1))
    }
}

/// Ordered set of column definitions.
#[derive(Debug)]
pub struct Schema<R> {
    columns: Vec<Column<R>>,
}

impl<R> Schema<R> {
    /// Build a schema from columns, failing fast on invalid definitions.
    ///
    /// Validation rules:
    /// - column keys must be unique;
    /// - a sortable column needs a custom comparator or a field accessor;
    /// - a filterable column needs a custom predicate or a field accessor.
    pub fn new(columns: Vec<Column<R>>) -> Result<Self, SchemaError> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.key.clone()) {
                return Err(SchemaError::DuplicateKey {
                    key: column.key.clone(),
                });
            }
            if column.sortable && column.custom_sort.is_none() && column.field.is_none() {
                return Err(SchemaError::MissingAccessor {
                    key: column.key.clone(),
                    capability: "sortable",
                });
            }
            if column.filterable && column.custom_filter.is_none() && column.field.is_none() {
                return Err(SchemaError::MissingAccessor {
                    key: column.key.clone(),
                    capability: "filterable",
                });
            }
        }
        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[Column<R>] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Look up a column by key.
    pub fn column(&self, key: &str) -> Option<&Column<R>> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Position of a column within the schema.
    pub fn column_index(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.key == key)
    }

    /// The per-column track sizes, in schema order.
    pub fn tracks(&self) -> Vec<Track> {
        self.columns.iter().map(Column::track).collect()
    }

    /// The grid template string: tracks joined by spaces
    /// (e.g. `"48px 1fr 150px"`).
    pub fn grid_template(&self) -> String {
        self.columns
            .iter()
            .map(|c| c.track().to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
