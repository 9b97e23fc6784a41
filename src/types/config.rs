use serde::{Deserialize, Serialize};

use super::Column;
use crate::error::Result;
use crate::layout::{RowViewport, DEFAULT_OVERSCAN};
use crate::types::DEFAULT_PAGE_SIZE;

/// Color scheme of the grid.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Grid configuration.
///
/// Every field except `columns` has a default, so a JSON config only needs
/// to list what it changes.
///
/// The store reads `columns` and `page_size`; the viewport reads the row
/// geometry. The `enable_*`, `multi_select`, `show_checkboxes` and `theme`
/// fields are hints for the rendering layer: they are carried through
/// unchanged (see `GridView::config`) and the store never enforces them. A
/// renderer with `enable_sorting` off simply never dispatches `add_sort`.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct GridConfig {
    pub columns: Vec<Column>,
    /// Height of one row in pixels (~40px default)
    pub row_height: f64,
    /// Height of the column header strip in pixels (~48px default)
    pub header_height: f64,
    pub page_size: usize,
    /// Extra rows rendered around the visible window
    pub overscan: u32,
    pub enable_virtual_scroll: bool,
    pub enable_infinite_scroll: bool,
    pub multi_select: bool,
    pub show_checkboxes: bool,
    pub enable_column_reorder: bool,
    pub enable_column_resize: bool,
    pub enable_filtering: bool,
    pub enable_sorting: bool,
    pub enable_context_menu: bool,
    pub theme: Theme,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            row_height: 40.0,
            header_height: 48.0,
            page_size: DEFAULT_PAGE_SIZE,
            overscan: DEFAULT_OVERSCAN,
            enable_virtual_scroll: true,
            enable_infinite_scroll: false,
            multi_select: true,
            show_checkboxes: true,
            enable_column_reorder: true,
            enable_column_resize: true,
            enable_filtering: true,
            enable_sorting: true,
            enable_context_menu: false,
            theme: Theme::Light,
        }
    }
}

impl GridConfig {
    /// Parse a JSON config document.
    ///
    /// # Errors
    /// Returns an error if the document is not valid JSON or does not match
    /// the config shape.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Row viewport for a scroll container of `container_height` pixels,
    /// excluding the header strip.
    ///
    /// # Errors
    /// Returns [`GridError::InvalidRowHeight`](crate::GridError::InvalidRowHeight)
    /// if the configured row height is not positive.
    pub fn row_viewport(&self, container_height: f64) -> Result<RowViewport> {
        RowViewport::new(
            (container_height - self.header_height).max(0.0),
            self.row_height,
            self.overscan,
        )
    }
}
