//! Debounced staging for filter edits.
//!
//! Keystrokes land in a local draft immediately; the draft is promoted to the
//! shared filter state only after a quiet period. Time comes from the caller
//! as [`Instant`] values, so hosts drive the timer from their own tick and
//! tests never sleep.

use std::time::{Duration, Instant};

use crate::filter::{FilterState, FilterValue};

/// Default quiet period before a draft edit is promoted.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// A debounced draft of the filter state.
#[derive(Debug, Clone)]
pub struct FilterStaging {
    local: FilterState,
    synced: FilterState,
    debounce: Duration,
    disabled: bool,
    pending_since: Option<Instant>,
}

impl Default for FilterStaging {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl FilterStaging {
    pub fn new(debounce: Duration) -> Self {
        Self {
            local: FilterState::new(),
            synced: FilterState::new(),
            debounce,
            disabled: false,
            pending_since: None,
        }
    }

    /// Promote edits immediately instead of waiting out the quiet period.
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// The draft as the host should display it, including unpromoted edits.
    pub fn local(&self) -> &FilterState {
        &self.local
    }

    /// Whether an edit is waiting out its quiet period.
    pub fn is_pending(&self) -> bool {
        self.pending_since.is_some()
    }

    /// One-way sync from the shared filter state. An external change
    /// overwrites the draft and cancels any pending promotion; an unchanged
    /// state leaves the draft alone.
    pub fn sync_from(&mut self, global: &FilterState) {
        if *global == self.synced {
            return;
        }
        log::debug!("[staging] external filter change, dropping draft");
        self.synced = global.clone();
        self.local = global.clone();
        self.pending_since = None;
    }

    /// Record a keystroke in the draft and re-arm the quiet period.
    ///
    /// With debouncing disabled the edit is promoted by the next
    /// [`take_settled`](Self::take_settled) call regardless of timing.
    pub fn edit(&mut self, key: impl Into<String>, value: impl Into<FilterValue>, now: Instant) {
        self.local.set(key, value);
        self.pending_since = Some(now);
    }

    /// Promote the draft if its quiet period has elapsed.
    ///
    /// Returns the settled filter state exactly once per promotion; the host
    /// pushes it into the store. Subsequent calls return `None` until the
    /// next edit.
    pub fn take_settled(&mut self, now: Instant) -> Option<FilterState> {
        let since = self.pending_since?;
        if !self.disabled && now.duration_since(since) < self.debounce {
            return None;
        }
        self.pending_since = None;
        self.synced = self.local.clone();
        log::debug!("[staging] draft settled");
        Some(self.local.clone())
    }
}
