//! Headless windowed data-grid engine.
//!
//! The crate is a render-agnostic core for tables over in-memory rows:
//! a [`TableStore`] owns rows plus filter, sort, and selection state and
//! derives the processed row set from them; a [`Window`] maps scroll
//! position and measured row heights to the slice of rows worth rendering;
//! [`build_view`] assembles both into a plain data description of one frame.
//!
//! Nothing here draws. Hosts feed input events into the store and window,
//! call [`TableStore::refresh`] once per frame, and translate the returned
//! [`TableView`] into whatever they render with.

mod derive;
mod filter;
mod schema;
mod selection;
mod sort;
mod staging;
mod store;
mod types;
mod view;
mod window;

pub use derive::process_rows;
pub use filter::{FILTER_ALL, FilterState, FilterValue};
pub use schema::{
    CellContext, Column, FilterKind, FilterOption, HeaderContext, Schema, SchemaError, Track,
};
pub use selection::Selection;
pub use sort::SortState;
pub use staging::{DEFAULT_DEBOUNCE, FilterStaging};
pub use store::{CheckboxConfig, RowSelection, TableHooks, TableStore};
pub use types::{FieldValue, RenderMode, RowKey, SortDirection};
pub use view::{
    Body, CheckboxHeader, FetchStatus, FilterCell, GridView, HeaderCell, ModeSwitch, RowView,
    TableConfig, TableView, TransitionRecord, build_view,
};
pub use window::{DEFAULT_ESTIMATE, DEFAULT_OVERSCAN, Window, WindowSlice};
