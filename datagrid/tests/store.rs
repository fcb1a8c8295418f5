use std::cell::RefCell;
use std::rc::Rc;

use datagrid::{
    CheckboxConfig, Column, FieldValue, FilterKind, FilterState, FilterValue, RowKey, Schema,
    SortDirection, SortState, TableHooks, TableStore,
};

#[derive(Debug, Clone)]
struct Task {
    id: i64,
    name: &'static str,
    done: bool,
}

fn tasks() -> Vec<Task> {
    vec![
        Task { id: 1, name: "write report", done: false },
        Task { id: 2, name: "review patch", done: true },
        Task { id: 3, name: "update docs", done: false },
        Task { id: 4, name: "triage bugs", done: false },
    ]
}

fn schema() -> Schema<Task> {
    Schema::new(vec![
        Column::new("select", "", |_: &Task, _| String::new()),
        Column::new("name", "Name", |task: &Task, _| task.name.to_string())
            .field(|task| FieldValue::from(task.name))
            .sortable()
            .filterable(FilterKind::Text),
        Column::new("done", "Done", |task: &Task, _| task.done.to_string())
            .field(|task| FieldValue::from(task.done))
            .sortable(),
    ])
    .unwrap()
}

fn store() -> TableStore<Task> {
    TableStore::new(
        tasks(),
        schema(),
        Some(CheckboxConfig::new("select", |task: &Task| {
            RowKey::Int(task.id)
        })),
    )
    .unwrap()
}

// ============================================================================
// Refresh / staleness
// ============================================================================

#[test]
fn test_mutation_marks_pending_until_refresh() {
    let mut store = store();
    assert!(!store.is_pending());

    store.update_filter("name", "re");
    assert!(store.is_pending());
    assert_eq!(store.processed_len(), 4, "reads stay stale before refresh");

    assert!(store.refresh());
    assert!(!store.is_pending());
    assert_eq!(store.processed_len(), 2);
    assert!(!store.refresh(), "clean store does not recompute");
}

#[test]
fn test_refresh_bumps_generation_only_on_recompute() {
    let mut store = store();
    let start = store.generation();

    store.refresh();
    assert_eq!(store.generation(), start);

    store.cycle_sort("name");
    store.refresh();
    assert_eq!(store.generation(), start + 1);
}

#[test]
fn test_set_rows_replaces_data() {
    let mut store = store();
    store.set_rows(vec![Task { id: 9, name: "only one", done: false }]);
    store.refresh();
    assert_eq!(store.processed_len(), 1);
    assert_eq!(store.row_at(0).unwrap().id, 9);
}

// ============================================================================
// Sort cycling
// ============================================================================

#[test]
fn test_cycle_sort_asc_desc_none() {
    let mut store = store();

    store.cycle_sort("name");
    assert_eq!(store.sort().direction_of("name"), Some(SortDirection::Asc));

    store.cycle_sort("name");
    assert_eq!(store.sort().direction_of("name"), Some(SortDirection::Desc));

    store.cycle_sort("name");
    assert!(!store.sort().is_sorted());
}

#[test]
fn test_cycle_sort_replaces_other_column() {
    let mut store = store();
    store.cycle_sort("name");
    store.cycle_sort("done");

    assert_eq!(store.sort().direction_of("done"), Some(SortDirection::Asc));
    assert_eq!(store.sort().direction_of("name"), None);
}

#[test]
fn test_cycle_sort_on_non_sortable_column_is_noop() {
    let mut store = store();
    store.cycle_sort("select");
    assert!(!store.sort().is_sorted());
    assert!(!store.is_pending());
}

// ============================================================================
// Selection
// ============================================================================

#[test]
fn test_toggle_row_selection_by_processed_index() {
    let mut store = store();

    let change = store.toggle_row_selection(1).unwrap();
    assert_eq!(change.key, RowKey::Int(2));
    assert!(change.selected);
    assert!(store.is_selected(1));

    let change = store.toggle_row_selection(1).unwrap();
    assert!(!change.selected);
    assert!(!store.is_selected(1));
}

#[test]
fn test_selection_survives_filtering() {
    let mut store = store();
    store.toggle_row_selection(0).unwrap();

    store.update_filter("name", "docs");
    store.refresh();
    assert_eq!(store.processed_len(), 1);
    assert!(!store.is_selected(0), "visible row is a different task");

    store.set_filter(FilterState::new());
    store.refresh();
    assert!(store.is_selected(0), "task 1 is still selected");
}

#[test]
fn test_select_all_covers_only_processed_selectable_rows() {
    let mut store = TableStore::new(
        tasks(),
        schema(),
        Some(
            CheckboxConfig::new("select", |task: &Task| RowKey::Int(task.id))
                .selectable_when(|task| !task.done),
        ),
    )
    .unwrap();

    store.update_filter("name", "r");
    store.refresh();
    // "write report", "review patch", "triage bugs" pass; "review patch" is
    // done and therefore not selectable.
    let (selected, affected) = store.toggle_select_all();
    assert!(selected);
    assert_eq!(affected.len(), 2);
    assert!(store.is_all_selected());
    assert!(!store.selected_keys().contains(&RowKey::Int(2)));
}

#[test]
fn test_select_all_off_clears_hidden_selections_too() {
    let mut store = store();
    store.toggle_row_selection(3).unwrap(); // task 4

    store.update_filter("name", "re");
    store.refresh();
    store.toggle_select_all();
    assert!(store.is_all_selected());

    let (selected, _) = store.toggle_select_all();
    assert!(!selected);
    assert!(
        store.selected_keys().is_empty(),
        "deselect-all clears keys outside the current filter as well",
    );
}

#[test]
fn test_unselectable_row_ignores_toggle() {
    let mut store = TableStore::new(
        tasks(),
        schema(),
        Some(
            CheckboxConfig::new("select", |task: &Task| RowKey::Int(task.id))
                .selectable_when(|task| !task.done),
        ),
    )
    .unwrap();
    assert!(store.toggle_row_selection(1).is_none());
    assert!(store.selected_keys().is_empty());
}

#[test]
fn test_toggle_by_key_reaches_filtered_out_rows() {
    let mut store = store();
    store.update_filter("name", "docs");
    store.refresh();

    let change = store.toggle_key_selection(&RowKey::Int(1)).unwrap();
    assert!(change.selected);
    assert_eq!(change.row_index, None, "row is not in the processed set");
}

#[test]
fn test_row_click_toggles_only_when_opted_in() {
    let mut store = store();
    assert!(store.handle_row_click(0).is_none());

    let mut store = TableStore::new(
        tasks(),
        schema(),
        Some(
            CheckboxConfig::new("select", |task: &Task| RowKey::Int(task.id))
                .check_on_row_click(),
        ),
    )
    .unwrap();
    let change = store.handle_row_click(0).unwrap();
    assert!(change.selected);
}

// ============================================================================
// Hooks
// ============================================================================

#[test]
fn test_hooks_fire_on_state_changes() {
    let events: Rc<RefCell<Vec<String>>> = Rc::default();

    let filter_events = events.clone();
    let sort_events = events.clone();
    let row_events = events.clone();
    let all_events = events.clone();
    let hooks = TableHooks::new()
        .on_filter_change(move |_| filter_events.borrow_mut().push("filter".into()))
        .on_sort_change(move |_| sort_events.borrow_mut().push("sort".into()))
        .on_row_selection(move |task: &Task, change| {
            row_events
                .borrow_mut()
                .push(format!("row {} {}", task.id, change.selected))
        })
        .on_select_all(move |selected, keys| {
            all_events
                .borrow_mut()
                .push(format!("all {selected} {}", keys.len()))
        });

    let mut store = store().with_hooks(hooks);
    store.update_filter("name", "re");
    store.cycle_sort("name");
    store.refresh();
    store.toggle_row_selection(0).unwrap();
    store.toggle_select_all();

    let events = events.borrow();
    assert_eq!(
        *events,
        vec!["filter", "sort", "row 2 true", "all true 1"],
    );
}

#[test]
fn test_unchanged_filter_does_not_fire_hook() {
    let fired: Rc<RefCell<u32>> = Rc::default();
    let count = fired.clone();
    let hooks = TableHooks::new().on_filter_change(move |_| *count.borrow_mut() += 1);

    let mut store = store().with_hooks(hooks);
    store.set_filter(FilterState::new());
    assert_eq!(*fired.borrow(), 0);
}

#[test]
fn test_initial_state_applies_without_hooks() {
    let fired: Rc<RefCell<u32>> = Rc::default();
    let count = fired.clone();
    let hooks = TableHooks::new().on_sort_change(move |_| *count.borrow_mut() += 1);

    let store = store()
        .with_hooks(hooks)
        .with_initial_state(
            FilterState::new().with("done", FilterValue::Text("false".to_string())),
            SortState::by("name", SortDirection::Desc),
        );

    assert_eq!(*fired.borrow(), 0);
    assert!(!store.is_pending());
    assert_eq!(store.processed_len(), 3);
    assert_eq!(store.row_at(0).unwrap().name, "write report");
}

#[test]
fn test_unknown_checkbox_column_is_rejected() {
    let result = TableStore::new(
        tasks(),
        schema(),
        Some(CheckboxConfig::new("missing", |task: &Task| {
            RowKey::Int(task.id)
        })),
    );
    assert!(result.is_err());
}
