//! Virtual row windowing: which slice of rows to render for a scroll position.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// Rows rendered beyond the visible range when no overscan is given.
pub const DEFAULT_OVERSCAN: u32 = 5;

/// Inclusive row index range to render, plus the pixel offset of its first row.
///
/// `end_index` is `-1` when there are no rows; `end_index < start_index`
/// means "render nothing".
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VisibleRange {
    pub start_index: i64,
    pub end_index: i64,
    pub offset_y: f64,
}

impl VisibleRange {
    pub fn is_empty(&self) -> bool {
        self.end_index < self.start_index
    }

    /// Number of rows in the window.
    pub fn len(&self) -> usize {
        let indices = self.indices();
        indices.end - indices.start
    }

    /// Half-open index range, empty when the window is.
    pub fn indices(&self) -> Range<usize> {
        if self.is_empty() || self.end_index < 0 {
            return 0..0;
        }
        let start = usize::try_from(self.start_index).unwrap_or(0);
        let end = usize::try_from(self.end_index)
            .unwrap_or(usize::MAX)
            .saturating_add(1);
        start..end
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices().contains(&index)
    }
}

/// Compute the window of rows to render.
///
/// ```text
/// start = max(0, floor(scroll_top / row_height) - overscan)
/// end   = min(total_rows - 1, start + ceil(container_height / row_height) + 2 * overscan)
/// ```
///
/// Overscan is subtracted once before the window and added twice after it,
/// biasing the buffer toward downward scrolling. With `total_rows == 0` the
/// result has `end_index == -1`. The arithmetic saturates, so extreme
/// scroll offsets or container heights clamp to the row count.
///
/// `row_height` must be positive; this function does not check it. Use
/// [`RowViewport`] for a validated entry point.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn visible_range(
    scroll_top: f64,
    container_height: f64,
    row_height: f64,
    total_rows: usize,
    overscan: u32,
) -> VisibleRange {
    let overscan = i64::from(overscan);
    let first_visible = (scroll_top / row_height).floor() as i64;
    let start_index = first_visible.saturating_sub(overscan).max(0);
    let visible_count = (container_height / row_height).ceil() as i64;
    let last_row = i64::try_from(total_rows).unwrap_or(i64::MAX) - 1;
    let window_end = start_index
        .saturating_add(visible_count)
        .saturating_add(overscan.saturating_mul(2));
    let end_index = last_row.min(window_end);
    let offset_y = start_index as f64 * row_height;

    VisibleRange {
        start_index,
        end_index,
        offset_y,
    }
}

/// Pixel height of `total_rows` uniform rows, for sizing the scroll spacer.
#[allow(clippy::cast_precision_loss)]
pub fn total_height(row_height: f64, total_rows: usize) -> f64 {
    total_rows as f64 * row_height
}

/// Row geometry of a scroll container, validated once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowViewport {
    container_height: f64,
    row_height: f64,
    overscan: u32,
}

impl RowViewport {
    /// # Errors
    /// Returns [`GridError::InvalidRowHeight`] when `row_height` is zero,
    /// negative, or not finite.
    pub fn new(container_height: f64, row_height: f64, overscan: u32) -> Result<Self> {
        if !row_height.is_finite() || row_height <= 0.0 {
            return Err(GridError::InvalidRowHeight(row_height));
        }
        Ok(Self {
            container_height: container_height.max(0.0),
            row_height,
            overscan,
        })
    }

    pub fn container_height(&self) -> f64 {
        self.container_height
    }

    pub fn row_height(&self) -> f64 {
        self.row_height
    }

    pub fn overscan(&self) -> u32 {
        self.overscan
    }

    /// Resize the container, keeping row geometry.
    pub fn resize(&mut self, container_height: f64) {
        self.container_height = container_height.max(0.0);
    }

    pub fn window(&self, scroll_top: f64, total_rows: usize) -> VisibleRange {
        visible_range(
            scroll_top.max(0.0),
            self.container_height,
            self.row_height,
            total_rows,
            self.overscan,
        )
    }

    pub fn total_height(&self, total_rows: usize) -> f64 {
        total_height(self.row_height, total_rows)
    }
}
