//! Render-agnostic view assembly: turns store, window, and fetch status into
//! a plain data description of what the host should draw, plus the render
//! mode switch with supersede semantics.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::filter::FilterValue;
use crate::schema::{CellContext, FilterKind, FilterOption, HeaderContext};
use crate::staging::FilterStaging;
use crate::store::TableStore;
use crate::types::{RenderMode, RowKey, SortDirection};
use crate::window::{DEFAULT_ESTIMATE, DEFAULT_OVERSCAN, Window};

/// Table-level configuration the host passes to view assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    pub mode: RenderMode,
    /// Estimated row height handed to the window before rows are measured.
    pub row_estimate_height: u32,
    /// Extra rows rendered on each side of the viewport.
    pub overscan: usize,
    /// How many placeholder rows a skeleton body shows.
    pub fetching_row_count: usize,
    /// Message shown when the processed set is empty.
    pub empty_message: String,
    /// Promote filter edits immediately instead of debouncing.
    pub debounce_disabled: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            mode: RenderMode::default(),
            row_estimate_height: DEFAULT_ESTIMATE,
            overscan: DEFAULT_OVERSCAN,
            fetching_row_count: 10,
            empty_message: "No data to display.".to_string(),
            debounce_disabled: false,
        }
    }
}

impl TableConfig {
    /// Filter staging honoring the config's debounce switch.
    pub fn filter_staging(&self) -> FilterStaging {
        let staging = FilterStaging::default();
        if self.debounce_disabled {
            staging.disabled()
        } else {
            staging
        }
    }
}

/// Whether a data fetch is in flight, and whether the last one failed.
#[derive(Debug, Clone, Default)]
pub struct FetchStatus {
    pub is_fetching: bool,
    pub error: Option<String>,
}

impl FetchStatus {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn fetching() -> Self {
        Self {
            is_fetching: true,
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            is_fetching: false,
            error: Some(message.into()),
        }
    }
}

// ---- view model ------------------------------------------------------------

/// Filter input description for one header cell.
#[derive(Debug, Clone)]
pub struct FilterCell {
    pub kind: FilterKind,
    pub options: Vec<FilterOption>,
    pub placeholder: Option<String>,
    /// The value currently applied, if any.
    pub value: Option<FilterValue>,
}

/// One data column's header.
#[derive(Debug, Clone)]
pub struct HeaderCell {
    pub key: String,
    pub content: String,
    pub sortable: bool,
    /// The direction applied to this column, if it is the sorted one.
    pub sort: Option<SortDirection>,
    pub filter: Option<FilterCell>,
}

/// The select-all header checkbox.
#[derive(Debug, Clone)]
pub struct CheckboxHeader {
    pub all_selected: bool,
    pub can_select_any: bool,
}

/// One row the host should draw.
#[derive(Debug, Clone)]
pub struct RowView {
    /// Position in the processed set.
    pub index: usize,
    pub key: RowKey,
    pub selected: bool,
    pub selectable: bool,
    /// Absolute top offset within the scroll area. Virtualized mode only.
    pub offset: Option<u32>,
    /// Current height (measured or estimated). Virtualized mode only.
    pub height: Option<u32>,
    /// Rendered cell content for the data columns, in schema order.
    pub cells: Vec<String>,
}

/// The table body, in one of three mutually exclusive states.
#[derive(Debug, Clone)]
pub enum Body {
    /// A fetch is in flight and nothing useful can be shown yet.
    Skeleton { rows: usize },
    /// No row survived filtering. The message spans the full column count.
    Empty { message: String, col_span: usize },
    Rows(Vec<RowView>),
}

/// Everything the host needs to draw the grid.
#[derive(Debug, Clone)]
pub struct GridView {
    pub mode: RenderMode,
    /// Track sizes joined by spaces, checkbox column included.
    pub grid_template: String,
    pub checkbox_header: Option<CheckboxHeader>,
    pub header: Vec<HeaderCell>,
    pub body: Body,
    /// Total scroll height. Virtualized mode only.
    pub total_size: Option<u32>,
}

/// The assembled view.
#[derive(Debug, Clone)]
pub enum TableView {
    /// The data source failed; show the message instead of a grid.
    Unavailable { message: String },
    Grid(GridView),
}

/// Assemble the view for one frame.
///
/// The window is synced against the store's generation first, so a changed
/// processed set resets scroll and measurements before the visible range is
/// computed. The store itself is not refreshed here; the host does that
/// after applying mutations.
pub fn build_view<R>(
    store: &TableStore<R>,
    window: &mut Window,
    config: &TableConfig,
    status: &FetchStatus,
) -> TableView {
    if let Some(message) = &status.error {
        return TableView::Unavailable {
            message: message.clone(),
        };
    }

    window.sync(store.generation(), store.processed_len());

    let checkbox_key = store.checkbox().map(|c| c.column_key.clone());
    let header = build_header(store, checkbox_key.as_deref());
    let checkbox_header = checkbox_key.as_deref().map(|_| CheckboxHeader {
        all_selected: store.is_all_selected(),
        can_select_any: store.can_select_any(),
    });

    let data_columns = store
        .schema()
        .columns()
        .iter()
        .filter(|c| Some(c.key()) != checkbox_key.as_deref())
        .count();
    let col_span = data_columns + usize::from(checkbox_key.is_some());

    let body = build_body(store, window, config, status, checkbox_key.as_deref(), col_span);

    TableView::Grid(GridView {
        mode: config.mode,
        grid_template: store.schema().grid_template(),
        checkbox_header,
        header,
        body,
        total_size: match config.mode {
            RenderMode::Virtualized => Some(window.total_size()),
            RenderMode::Normal => None,
        },
    })
}

fn build_header<R>(store: &TableStore<R>, checkbox_key: Option<&str>) -> Vec<HeaderCell> {
    store
        .schema()
        .columns()
        .iter()
        .filter(|column| Some(column.key()) != checkbox_key)
        .map(|column| {
            let content = match &column.render_header_label {
                Some(render) => render(HeaderContext {
                    label: column.label(),
                    filter: store.filter(),
                    all_rows: store.rows(),
                }),
                None => column.label().to_string(),
            };
            let filter = column.is_filterable().then(|| FilterCell {
                kind: column.filter_kind(),
                options: column.filter_options_list().to_vec(),
                placeholder: column.filter_placeholder_text().map(str::to_string),
                value: store.filter().get(column.key()).cloned(),
            });
            HeaderCell {
                key: column.key().to_string(),
                content,
                sortable: column.is_sortable(),
                sort: store.sort().direction_of(column.key()),
                filter,
            }
        })
        .collect()
}

fn build_body<R>(
    store: &TableStore<R>,
    window: &Window,
    config: &TableConfig,
    status: &FetchStatus,
    checkbox_key: Option<&str>,
    col_span: usize,
) -> Body {
    let empty = store.processed_len() == 0;

    // Normal mode shows skeletons for every fetch; virtualized mode keeps
    // already-loaded rows on screen and only shows skeletons when it has
    // nothing else.
    let skeleton = match config.mode {
        RenderMode::Normal => status.is_fetching,
        RenderMode::Virtualized => status.is_fetching && empty,
    };
    if skeleton {
        return Body::Skeleton {
            rows: config.fetching_row_count,
        };
    }
    if empty {
        return Body::Empty {
            message: config.empty_message.clone(),
            col_span,
        };
    }

    let indices: Vec<usize> = match config.mode {
        RenderMode::Normal => (0..store.processed_len()).collect(),
        RenderMode::Virtualized => window.visible_range().range().collect(),
    };

    let rows = indices
        .into_iter()
        .map(|index| build_row(store, window, config, checkbox_key, index))
        .collect();
    Body::Rows(rows)
}

fn build_row<R>(
    store: &TableStore<R>,
    window: &Window,
    config: &TableConfig,
    checkbox_key: Option<&str>,
    index: usize,
) -> RowView {
    let original = store.processed_indices()[index];
    let row = &store.rows()[original];
    let key = match store.checkbox() {
        Some(c) => (c.row_key)(row),
        None => RowKey::Int(original as i64),
    };
    let selectable = store.checkbox().is_some_and(|c| {
        c.is_row_selectable
            .as_ref()
            .is_none_or(|selectable| selectable(row))
    });
    let cells = store
        .schema()
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, column)| Some(column.key()) != checkbox_key)
        .map(|(column_index, column)| {
            (column.render_cell)(
                row,
                CellContext {
                    row_index: index,
                    column_index,
                },
            )
        })
        .collect();
    let (offset, height) = match config.mode {
        RenderMode::Virtualized => (Some(window.row_offset(index)), Some(window.row_size(index))),
        RenderMode::Normal => (None, None),
    };
    RowView {
        index,
        key,
        selected: store.is_selected(index),
        selectable,
        offset,
        height,
        cells,
    }
}

// ---- mode switching --------------------------------------------------------

/// A completed mode transition, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionRecord {
    pub from: RenderMode,
    pub to: RenderMode,
    pub duration: Duration,
}

#[derive(Debug, Clone)]
struct Inflight {
    token: u64,
    from: RenderMode,
    to: RenderMode,
    started: Instant,
}

/// Render mode with asynchronous switch semantics.
///
/// A switch is begun, the host tears down and rebuilds its renderer, then
/// completes the switch with the token it was given. Beginning a new switch
/// supersedes the in-flight one; a completion carrying a superseded token is
/// dropped, so the last request always wins.
#[derive(Debug, Clone)]
pub struct ModeSwitch {
    mode: RenderMode,
    next_token: u64,
    inflight: Option<Inflight>,
    history: Vec<TransitionRecord>,
}

impl Default for ModeSwitch {
    fn default() -> Self {
        Self::new(RenderMode::default())
    }
}

impl ModeSwitch {
    pub fn new(mode: RenderMode) -> Self {
        Self {
            mode,
            next_token: 0,
            inflight: None,
            history: Vec::new(),
        }
    }

    /// The committed mode. In-flight switches do not show here until they
    /// complete.
    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn is_switching(&self) -> bool {
        self.inflight.is_some()
    }

    /// Completed transitions, oldest first.
    pub fn history(&self) -> &[TransitionRecord] {
        &self.history
    }

    /// Begin a switch to the given mode. Returns the token the eventual
    /// [`complete`](Self::complete) call must carry.
    pub fn begin(&mut self, to: RenderMode, now: Instant) -> u64 {
        if let Some(stale) = &self.inflight {
            log::debug!(
                "[mode] superseding in-flight switch to {:?} with switch to {to:?}",
                stale.to,
            );
        }
        let token = self.next_token;
        self.next_token += 1;
        self.inflight = Some(Inflight {
            token,
            from: self.mode,
            to,
            started: now,
        });
        token
    }

    /// Commit the switch identified by `token`. Returns the new mode, or
    /// `None` when the token was superseded by a later [`begin`](Self::begin).
    pub fn complete(&mut self, token: u64, now: Instant) -> Option<RenderMode> {
        match &self.inflight {
            Some(inflight) if inflight.token == token => {
                let inflight = self.inflight.take()?;
                self.mode = inflight.to;
                self.history.push(TransitionRecord {
                    from: inflight.from,
                    to: inflight.to,
                    duration: now.duration_since(inflight.started),
                });
                log::debug!("[mode] switched {:?} -> {:?}", inflight.from, inflight.to);
                Some(self.mode)
            }
            _ => {
                log::debug!("[mode] dropping stale completion for token {token}");
                None
            }
        }
    }
}
