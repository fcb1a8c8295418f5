//! Viewport windowing over the processed row set.
//!
//! The window tracks scroll position, viewport height, and measured row
//! heights, and answers which slice of rows intersects the viewport. It is
//! keyed to the store's generation: when the processed set changes, the
//! window snaps back to the top and drops its measurements.
//!
//! All heights are integer pixels. Unmeasured rows use the estimate; a
//! measurement replaces the estimate and shifts everything below it.

use std::ops::Range;

/// Default estimated row height in pixels.
pub const DEFAULT_ESTIMATE: u32 = 64;

/// Default number of extra rows rendered on each side of the viewport.
pub const DEFAULT_OVERSCAN: usize = 5;

/// The slice of processed rows a virtualized body should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSlice {
    /// First processed index in the window (inclusive).
    pub start: usize,
    /// One past the last processed index in the window.
    pub end: usize,
}

impl WindowSlice {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Scroll and row-height state for a virtualized viewport.
#[derive(Debug, Clone)]
pub struct Window {
    len: usize,
    estimate: u32,
    overscan: usize,
    measured: Vec<Option<u32>>,
    // Prefix sums: offsets[i] is the top of row i, offsets[len] the total.
    offsets: Vec<u32>,
    viewport: u32,
    scroll: u32,
    generation: Option<u64>,
}

impl Default for Window {
    fn default() -> Self {
        Self::new(DEFAULT_ESTIMATE, DEFAULT_OVERSCAN)
    }
}

impl Window {
    pub fn new(estimate: u32, overscan: usize) -> Self {
        Self {
            len: 0,
            estimate,
            overscan,
            measured: Vec::new(),
            offsets: vec![0],
            viewport: 0,
            scroll: 0,
            generation: None,
        }
    }

    /// Align the window with the store's processed set.
    ///
    /// On a generation change the scroll position resets to the top and all
    /// measurements are dropped; stale heights must not leak across
    /// derivations. Call once per frame before reading the window.
    pub fn sync(&mut self, generation: u64, len: usize) {
        if self.generation == Some(generation) && self.len == len {
            return;
        }
        if self.generation.is_some() {
            log::debug!("[window] generation changed, resetting scroll and measurements");
        }
        self.generation = Some(generation);
        self.len = len;
        self.measured = vec![None; len];
        self.scroll = 0;
        self.rebuild_offsets(0);
    }

    // ---- geometry ----------------------------------------------------------

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn viewport_height(&self) -> u32 {
        self.viewport
    }

    pub fn scroll_offset(&self) -> u32 {
        self.scroll
    }

    /// Total height of all rows, measured heights where known and the
    /// estimate elsewhere.
    pub fn total_size(&self) -> u32 {
        self.offsets[self.len]
    }

    /// Top offset of a row.
    pub fn row_offset(&self, index: usize) -> u32 {
        self.offsets[index]
    }

    /// Current height of a row (measured, or the estimate).
    pub fn row_size(&self, index: usize) -> u32 {
        self.measured
            .get(index)
            .copied()
            .flatten()
            .unwrap_or(self.estimate)
    }

    // ---- scrolling ---------------------------------------------------------

    pub fn set_viewport_height(&mut self, height: u32) {
        self.viewport = height;
        self.clamp_scroll();
    }

    /// Set the scroll offset, clamped to the scrollable range.
    pub fn set_scroll_offset(&mut self, offset: u32) {
        self.scroll = offset;
        self.clamp_scroll();
    }

    /// Scroll by a signed delta, clamped at both ends.
    pub fn scroll_by(&mut self, delta: i32) {
        self.scroll = self.scroll.saturating_add_signed(delta);
        self.clamp_scroll();
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll = 0;
    }

    /// Scroll so the given row's top aligns with the viewport top, as far as
    /// the scrollable range allows.
    pub fn scroll_to_index(&mut self, index: usize) {
        if index >= self.len {
            return;
        }
        self.scroll = self.offsets[index];
        self.clamp_scroll();
    }

    fn clamp_scroll(&mut self) {
        let max = self.total_size().saturating_sub(self.viewport);
        self.scroll = self.scroll.min(max);
    }

    // ---- measurement -------------------------------------------------------

    /// Record a row's rendered height. Later rows shift by the difference;
    /// the measurement survives until the next generation change.
    pub fn measure(&mut self, index: usize, height: u32) {
        if index >= self.len || self.measured[index] == Some(height) {
            return;
        }
        self.measured[index] = Some(height);
        self.rebuild_offsets(index);
        self.clamp_scroll();
    }

    fn rebuild_offsets(&mut self, from: usize) {
        self.offsets.resize(self.len + 1, 0);
        for i in from..self.len {
            self.offsets[i + 1] = self.offsets[i] + self.row_size(i);
        }
    }

    // ---- windowing ---------------------------------------------------------

    /// The rows to render: every row intersecting the viewport, widened by
    /// the overscan on each side.
    ///
    /// The slice length never exceeds the number of rows that fit in the
    /// viewport plus one partial row at each edge and the overscan on each
    /// side, so render cost stays proportional to the viewport.
    pub fn visible_range(&self) -> WindowSlice {
        if self.len == 0 || self.viewport == 0 {
            return WindowSlice { start: 0, end: 0 };
        }
        let top = self.scroll;
        let bottom = self.scroll.saturating_add(self.viewport);
        // First row whose bottom edge is below the viewport top.
        let first = self.offsets[1..=self.len].partition_point(|&end| end <= top);
        // First row whose top edge is at or below the viewport bottom.
        let last = self.offsets[..self.len].partition_point(|&start| start < bottom);
        WindowSlice {
            start: first.saturating_sub(self.overscan),
            end: (last + self.overscan).min(self.len),
        }
    }
}
