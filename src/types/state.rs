use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{Column, FilterState, Row, RowId, SortState};
use crate::layout::ColumnLayout;

/// Rows requested per page. Fixed for the lifetime of a store.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// One immutable snapshot of the grid.
///
/// Heap-backed fields sit behind `Arc` so a transition that does not touch a
/// field hands the next snapshot the same allocation. Subscribers can compare
/// with [`Arc::ptr_eq`] to skip work for fields that did not change.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GridState {
    /// Display order. Not re-sorted locally; sorting happens at the data source.
    pub rows: Arc<Vec<Row>>,
    /// Independent of `rows` so selection survives page replacement
    pub selected_rows: Arc<BTreeSet<RowId>>,
    /// At most one entry per field, index 0 is the highest priority
    pub sort_state: Arc<Vec<SortState>>,
    /// At most one entry per field
    pub filter_state: Arc<Vec<FilterState>>,
    /// Caller-managed; never cleared automatically
    pub loading: bool,
    /// Server-reported total, independent of `rows.len()`
    pub total_rows: usize,
    pub current_page: usize,
    pub page_size: usize,
    pub scroll_top: f64,
    pub column_order: Arc<Vec<String>>,
    /// Only explicitly resized columns are present
    pub column_widths: Arc<BTreeMap<String, f64>>,
    pub frozen_left_columns: Arc<Vec<String>>,
    pub frozen_right_columns: Arc<Vec<String>>,
}

impl GridState {
    /// Initial snapshot for a column configuration: no rows, nothing selected,
    /// no criteria, page 0, column order and frozen panes taken from the
    /// configuration.
    pub fn new(columns: &[Column]) -> Self {
        let layout = ColumnLayout::from_columns(columns);
        Self {
            rows: Arc::default(),
            selected_rows: Arc::default(),
            sort_state: Arc::default(),
            filter_state: Arc::default(),
            loading: false,
            total_rows: 0,
            current_page: 0,
            page_size: DEFAULT_PAGE_SIZE,
            scroll_top: 0.0,
            column_order: Arc::new(layout.order),
            column_widths: Arc::default(),
            frozen_left_columns: Arc::new(layout.frozen_left),
            frozen_right_columns: Arc::new(layout.frozen_right),
        }
    }

    pub fn is_selected(&self, id: &RowId) -> bool {
        self.selected_rows.contains(id)
    }

    /// Rows of the loaded set whose id is selected, in display order.
    pub fn selected_loaded_rows(&self) -> Vec<&Row> {
        self.rows
            .iter()
            .filter(|row| self.selected_rows.contains(&row.id))
            .collect()
    }

    /// Direction and priority of the sort on `field`, if any.
    pub fn sort_for(&self, field: &str) -> Option<(usize, &SortState)> {
        self.sort_state
            .iter()
            .enumerate()
            .find(|(_, s)| s.field == field)
    }

    pub fn filter_for(&self, field: &str) -> Option<&FilterState> {
        self.filter_state.iter().find(|f| f.field == field)
    }
}
