use datagrid::{
    Column, FieldValue, FilterKind, FilterState, FilterValue, Schema, SortDirection, SortState,
    process_rows,
};

#[derive(Debug, Clone)]
struct Log {
    level: &'static str,
    message: &'static str,
    count: i64,
}

fn logs() -> Vec<Log> {
    vec![
        Log { level: "info", message: "server started", count: 3 },
        Log { level: "error", message: "connection refused", count: 12 },
        Log { level: "warn", message: "slow query", count: 7 },
        Log { level: "info", message: "Connection pool resized", count: 1 },
        Log { level: "error", message: "disk full", count: 12 },
    ]
}

fn schema() -> Schema<Log> {
    Schema::new(vec![
        Column::new("level", "Level", |log: &Log, _| log.level.to_string())
            .field(|log| FieldValue::from(log.level))
            .sortable()
            .filterable(FilterKind::Select),
        Column::new("message", "Message", |log: &Log, _| log.message.to_string())
            .field(|log| FieldValue::from(log.message))
            .sortable()
            .filterable(FilterKind::Text),
        Column::new("count", "Count", |log: &Log, _| log.count.to_string())
            .field(|log| FieldValue::from(log.count))
            .sortable(),
    ])
    .unwrap()
}

// ============================================================================
// Filtering
// ============================================================================

#[test]
fn test_no_filter_no_sort_keeps_source_order() {
    let rows = logs();
    let out = process_rows(&rows, &schema(), &FilterState::new(), &SortState::none());
    assert_eq!(out, vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_substring_filter_is_case_insensitive() {
    let rows = logs();
    let filter = FilterState::new().with("message", "CONNECTION");
    let out = process_rows(&rows, &schema(), &filter, &SortState::none());
    assert_eq!(out, vec![1, 3]);
}

#[test]
fn test_filters_are_conjunctive() {
    let rows = logs();
    let filter = FilterState::new()
        .with("message", "connection")
        .with("level", FilterValue::Choice("error".to_string()));
    let out = process_rows(&rows, &schema(), &filter, &SortState::none());
    assert_eq!(out, vec![1]);
}

#[test]
fn test_all_sentinel_and_blank_text_exclude_nothing() {
    let rows = logs();
    let filter = FilterState::new()
        .with("level", FilterValue::Choice("all".to_string()))
        .with("message", "   ");
    let out = process_rows(&rows, &schema(), &filter, &SortState::none());
    assert_eq!(out.len(), rows.len());
}

#[test]
fn test_filter_on_unknown_column_excludes_nothing() {
    let rows = logs();
    let filter = FilterState::new().with("missing", "x");
    let out = process_rows(&rows, &schema(), &filter, &SortState::none());
    assert_eq!(out.len(), rows.len());
}

#[test]
fn test_custom_filter_predicate_wins_over_substring() {
    let rows = logs();
    let schema = Schema::new(vec![
        Column::new("count", "Count", |log: &Log, _| log.count.to_string())
            .filterable_with(FilterKind::Custom, |log: &Log, value| {
                value.as_str().parse::<i64>().is_ok_and(|min| log.count >= min)
            }),
    ])
    .unwrap();
    let filter = FilterState::new().with("count", "7");
    let out = process_rows(&rows, &schema, &filter, &SortState::none());
    assert_eq!(out, vec![1, 2, 4]);
}

// ============================================================================
// Sorting
// ============================================================================

#[test]
fn test_sort_ascending_and_descending() {
    let rows = logs();
    let asc = process_rows(
        &rows,
        &schema(),
        &FilterState::new(),
        &SortState::by("count", SortDirection::Asc),
    );
    assert_eq!(asc, vec![3, 0, 2, 1, 4]);

    let desc = process_rows(
        &rows,
        &schema(),
        &FilterState::new(),
        &SortState::by("count", SortDirection::Desc),
    );
    assert_eq!(desc, vec![1, 4, 2, 0, 3]);
}

#[test]
fn test_sort_is_stable_for_equal_keys() {
    let rows = logs();
    // Both "error" rows have count 12; source order must survive.
    let out = process_rows(
        &rows,
        &schema(),
        &FilterState::new(),
        &SortState::by("count", SortDirection::Desc),
    );
    let pos_1 = out.iter().position(|&i| i == 1).unwrap();
    let pos_4 = out.iter().position(|&i| i == 4).unwrap();
    assert!(pos_1 < pos_4, "equal keys keep source order");
}

#[test]
fn test_sort_applies_after_filter() {
    let rows = logs();
    let filter = FilterState::new().with("level", FilterValue::Choice("error".to_string()));
    let out = process_rows(
        &rows,
        &schema(),
        &filter,
        &SortState::by("message", SortDirection::Asc),
    );
    assert_eq!(out, vec![1, 4]);
}

#[test]
fn test_sort_on_non_sortable_column_is_ignored() {
    let rows = logs();
    let schema = Schema::new(vec![
        Column::new("message", "Message", |log: &Log, _| log.message.to_string())
            .field(|log| FieldValue::from(log.message)),
    ])
    .unwrap();
    let out = process_rows(
        &rows,
        &schema,
        &FilterState::new(),
        &SortState::by("message", SortDirection::Asc),
    );
    assert_eq!(out, vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_custom_comparator_receives_direction() {
    let rows = logs();
    // Comparator that ranks severity explicitly rather than alphabetically.
    let rank = |level: &str| match level {
        "error" => 2,
        "warn" => 1,
        _ => 0,
    };
    let schema = Schema::new(vec![
        Column::new("level", "Level", |log: &Log, _| log.level.to_string())
            .sortable_with(move |a: &Log, b: &Log, direction| {
                direction.apply(rank(a.level).cmp(&rank(b.level)))
            }),
    ])
    .unwrap();
    let out = process_rows(
        &rows,
        &schema,
        &FilterState::new(),
        &SortState::by("level", SortDirection::Desc),
    );
    assert_eq!(out[0], 1, "errors first under descending severity");
    assert_eq!(out[1], 4);
}

// ============================================================================
// Schema validation
// ============================================================================

#[test]
fn test_duplicate_column_key_is_rejected() {
    let result = Schema::new(vec![
        Column::new("level", "Level", |log: &Log, _| log.level.to_string()),
        Column::new("level", "Level again", |log: &Log, _| log.level.to_string()),
    ]);
    assert!(result.is_err());
}

#[test]
fn test_sortable_without_accessor_is_rejected() {
    let result = Schema::new(vec![
        Column::new("level", "Level", |log: &Log, _| log.level.to_string()).sortable(),
    ]);
    assert!(result.is_err());
}

#[test]
fn test_grid_template_joins_tracks() {
    use datagrid::Track;
    let schema = Schema::new(vec![
        Column::new("a", "A", |_: &Log, _| String::new()).width(Track::Px(48)),
        Column::new("b", "B", |_: &Log, _| String::new()),
        Column::new("c", "C", |_: &Log, _| String::new())
            .width(Track::Literal("minmax(80px, 2fr)".to_string())),
    ])
    .unwrap();
    assert_eq!(schema.grid_template(), "48px 1fr minmax(80px, 2fr)");
}
