//! Layout computation for rows and columns.
//!
//! This module handles:
//! - Mapping scroll position and viewport height to a bounded row window
//! - Deriving column order and frozen panes from configuration
//! - Placing columns into left/scrollable/right panes with pixel offsets

mod columns;
mod window;

pub use columns::{ColumnLayout, ResolvedColumn, ResolvedLayout};
pub use window::{total_height, visible_range, RowViewport, VisibleRange, DEFAULT_OVERSCAN};
