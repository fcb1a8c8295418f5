use std::fs::File;
use std::time::Instant;

use datagrid::{
    Body, CheckboxConfig, Column, FetchStatus, FieldValue, FilterKind, FilterOption, FilterState,
    RowKey, Schema, SortDirection, SortState, TableConfig, TableStore, TableView, Track, Window,
    build_view,
};
use simplelog::{Config, LevelFilter, WriteLogger};

struct LogEntry {
    id: i64,
    timestamp: String,
    level: &'static str,
    service: &'static str,
    message: String,
}

const LEVELS: [&str; 4] = ["debug", "info", "warn", "error"];
const SERVICES: [&str; 5] = ["api", "auth", "billing", "ingest", "scheduler"];
const MESSAGES: [&str; 6] = [
    "request completed",
    "connection reset by peer",
    "cache miss",
    "retrying upstream call",
    "payload validation failed",
    "worker heartbeat",
];

fn generate_logs(count: usize) -> Vec<LogEntry> {
    (0..count)
        .map(|i| LogEntry {
            id: i as i64,
            timestamp: format!("2026-08-25T10:{:02}:{:02}Z", (i / 60) % 60, i % 60),
            level: LEVELS[i % LEVELS.len()],
            service: SERVICES[i % SERVICES.len()],
            message: format!("{} (seq {i})", MESSAGES[i % MESSAGES.len()]),
        })
        .collect()
}

fn schema() -> Result<Schema<LogEntry>, datagrid::SchemaError> {
    Schema::new(vec![
        Column::new("select", "", |_: &LogEntry, _| String::new()).width(Track::Px(4)),
        Column::new("timestamp", "Time", |log: &LogEntry, _| log.timestamp.clone())
            .field(|log| FieldValue::Text(log.timestamp.clone()))
            .sortable()
            .width(Track::Px(22)),
        Column::new("level", "Level", |log: &LogEntry, _| {
            log.level.to_uppercase()
        })
        .field(|log| FieldValue::from(log.level))
        .sortable()
        .filterable(FilterKind::Select)
        .filter_options(
            LEVELS
                .iter()
                .map(|level| FilterOption {
                    label: level.to_uppercase(),
                    value: level.to_string(),
                })
                .collect(),
        )
        .width(Track::Px(7)),
        Column::new("service", "Service", |log: &LogEntry, _| {
            log.service.to_string()
        })
        .field(|log| FieldValue::from(log.service))
        .sortable()
        .filterable(FilterKind::Select)
        .width(Track::Px(10)),
        Column::new("message", "Message", |log: &LogEntry, _| log.message.clone())
            .field(|log| FieldValue::Text(log.message.clone()))
            .filterable(FilterKind::Text)
            .filter_placeholder("Search messages"),
    ])
}

fn print_view(view: &TableView, window: &Window) {
    match view {
        TableView::Unavailable { message } => println!("table unavailable: {message}"),
        TableView::Grid(grid) => {
            let labels: Vec<&str> = grid.header.iter().map(|h| h.content.as_str()).collect();
            println!("| {} |", labels.join(" | "));
            match &grid.body {
                Body::Skeleton { rows } => println!("  ({rows} skeleton rows)"),
                Body::Empty { message, col_span } => {
                    println!("  [{message}] (spanning {col_span} columns)")
                }
                Body::Rows(rows) => {
                    for row in rows {
                        let mark = if row.selected { "x" } else { " " };
                        println!(
                            "  [{mark}] @{:>6}px  {}",
                            row.offset.unwrap_or(0),
                            row.cells.join(" | "),
                        );
                    }
                    println!(
                        "  ({} of {} rows rendered, scroll {}px of {}px)",
                        rows.len(),
                        window.len(),
                        window.scroll_offset(),
                        window.total_size(),
                    );
                }
            }
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let log_file = File::create("log_viewer.log")?;
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)?;

    let config = TableConfig::default();
    let mut store = TableStore::new(
        generate_logs(10_000),
        schema()?,
        Some(
            CheckboxConfig::new("select", |log: &LogEntry| RowKey::Int(log.id))
                .check_on_row_click(),
        ),
    )?
    .with_initial_state(
        FilterState::new(),
        SortState::by("timestamp", SortDirection::Desc),
    );
    let mut window = Window::new(config.row_estimate_height, config.overscan);
    window.set_viewport_height(640);

    println!("== initial frame ==");
    let view = build_view(&store, &mut window, &config, &FetchStatus::idle());
    print_view(&view, &window);

    println!("\n== scrolled to row 5000 ==");
    window.scroll_to_index(5_000);
    let view = build_view(&store, &mut window, &config, &FetchStatus::idle());
    print_view(&view, &window);

    // Type "error" into the level filter through the debounced draft.
    println!("\n== filtered to errors (debounced) ==");
    let mut staging = config.filter_staging();
    let t0 = Instant::now();
    staging.edit("level", "error", t0);
    std::thread::sleep(datagrid::DEFAULT_DEBOUNCE);
    if let Some(settled) = staging.take_settled(Instant::now()) {
        store.set_filter(settled);
    }
    store.refresh();
    let view = build_view(&store, &mut window, &config, &FetchStatus::idle());
    print_view(&view, &window);

    println!("\n== first three error rows selected ==");
    for i in 0..3 {
        store.handle_row_click(i);
    }
    let view = build_view(&store, &mut window, &config, &FetchStatus::idle());
    print_view(&view, &window);

    Ok(())
}
