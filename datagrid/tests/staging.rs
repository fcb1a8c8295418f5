use std::time::{Duration, Instant};

use datagrid::{DEFAULT_DEBOUNCE, FilterState, FilterStaging};

fn text(state: &FilterState, key: &str) -> String {
    state.get(key).map(|v| v.as_str().to_string()).unwrap_or_default()
}

// ============================================================================
// Debounce timing
// ============================================================================

#[test]
fn test_edit_is_held_until_quiet_period_elapses() {
    let mut staging = FilterStaging::new(Duration::from_millis(300));
    let t0 = Instant::now();

    staging.edit("name", "a", t0);
    assert_eq!(text(staging.local(), "name"), "a", "draft updates immediately");
    assert!(staging.is_pending());

    assert!(staging.take_settled(t0 + Duration::from_millis(100)).is_none());
    let settled = staging.take_settled(t0 + Duration::from_millis(300)).unwrap();
    assert_eq!(text(&settled, "name"), "a");
    assert!(!staging.is_pending());
}

#[test]
fn test_rapid_edits_settle_once_with_final_value() {
    let mut staging = FilterStaging::new(Duration::from_millis(300));
    let t0 = Instant::now();

    staging.edit("name", "a", t0);
    staging.edit("name", "ab", t0 + Duration::from_millis(200));
    staging.edit("name", "abc", t0 + Duration::from_millis(400));

    // 300ms after the first edit, but only 100ms after the last one.
    assert!(staging.take_settled(t0 + Duration::from_millis(500)).is_none());

    let settled = staging.take_settled(t0 + Duration::from_millis(700)).unwrap();
    assert_eq!(text(&settled, "name"), "abc");
    assert!(
        staging.take_settled(t0 + Duration::from_secs(10)).is_none(),
        "each promotion is delivered exactly once",
    );
}

#[test]
fn test_disabled_staging_settles_immediately() {
    let mut staging = FilterStaging::new(Duration::from_millis(300)).disabled();
    let t0 = Instant::now();

    staging.edit("name", "a", t0);
    let settled = staging.take_settled(t0).unwrap();
    assert_eq!(text(&settled, "name"), "a");
}

// ============================================================================
// External sync
// ============================================================================

#[test]
fn test_external_change_overwrites_draft_and_cancels_timer() {
    let mut staging = FilterStaging::default();
    let t0 = Instant::now();
    staging.edit("name", "draft", t0);

    let global = FilterState::new().with("name", "from outside");
    staging.sync_from(&global);

    assert_eq!(text(staging.local(), "name"), "from outside");
    assert!(!staging.is_pending());
    assert!(staging.take_settled(t0 + DEFAULT_DEBOUNCE).is_none());
}

#[test]
fn test_unchanged_global_leaves_draft_alone() {
    let mut staging = FilterStaging::default();
    let t0 = Instant::now();

    let global = FilterState::new().with("name", "stable");
    staging.sync_from(&global);
    staging.edit("name", "stable plus draft", t0);

    // The settled promotion made local == synced; re-syncing the same global
    // state must not clobber the new draft.
    staging.sync_from(&global);
    assert_eq!(text(staging.local(), "name"), "stable plus draft");
    assert!(staging.is_pending());
}

#[test]
fn test_settled_state_round_trips_through_sync() {
    let mut staging = FilterStaging::default();
    let t0 = Instant::now();

    staging.edit("name", "abc", t0);
    let settled = staging.take_settled(t0 + DEFAULT_DEBOUNCE).unwrap();

    // Host pushes `settled` into the store; the store echoes it back on the
    // next frame. The draft must survive that echo.
    staging.sync_from(&settled);
    assert_eq!(text(staging.local(), "name"), "abc");
    assert!(!staging.is_pending());
}
