use serde::{Deserialize, Serialize};

use super::{FilterState, GridState, Row, SortState};
use crate::layout::VisibleRange;

/// Request handed to a data source: an inclusive row range plus the current
/// declarative criteria.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceParams {
    pub start_row: usize,
    /// Inclusive
    pub end_row: usize,
    pub sort_model: Vec<SortState>,
    pub filter_model: Vec<FilterState>,
}

/// A page of rows plus the total the source reports.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceResult {
    pub rows: Vec<Row>,
    pub total_rows: usize,
}

impl DataSourceParams {
    /// Request covering a virtual window, merged with the snapshot's sort and
    /// filter criteria. Returns `None` for an empty window.
    pub fn from_window(state: &GridState, range: &VisibleRange) -> Option<Self> {
        let indices = range.indices();
        if indices.is_empty() {
            return None;
        }
        Some(Self {
            start_row: indices.start,
            end_row: indices.end - 1,
            sort_model: state.sort_state.to_vec(),
            filter_model: state.filter_state.to_vec(),
        })
    }

    /// Request for the snapshot's current page.
    pub fn for_page(state: &GridState) -> Self {
        let page_size = state.page_size.max(1);
        let start_row = state.current_page.saturating_mul(page_size);
        Self {
            start_row,
            end_row: start_row.saturating_add(page_size - 1),
            sort_model: state.sort_state.to_vec(),
            filter_model: state.filter_state.to_vec(),
        }
    }

    /// Number of rows requested.
    pub fn len(&self) -> usize {
        self.end_row.saturating_sub(self.start_row) + 1
    }

    pub fn is_empty(&self) -> bool {
        self.end_row < self.start_row
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Column, SortDirection};
    use std::sync::Arc;

    fn state() -> GridState {
        let mut state = GridState::new(&[Column::new("a", "a", "A")]);
        state.sort_state = Arc::new(vec![SortState::new("a", SortDirection::Desc)]);
        state
    }

    #[test]
    fn test_for_page_covers_page() {
        let mut s = state();
        s.current_page = 2;
        let params = DataSourceParams::for_page(&s);
        assert_eq!(params.start_row, 200);
        assert_eq!(params.end_row, 299);
        assert_eq!(params.len(), 100);
        assert_eq!(params.sort_model.len(), 1);
    }

    #[test]
    fn test_from_window_inclusive_end() {
        let range = VisibleRange {
            start_index: 15,
            end_index: 35,
            offset_y: 750.0,
        };
        let params = DataSourceParams::from_window(&state(), &range);
        assert_eq!(params.as_ref().map(|p| (p.start_row, p.end_row)), Some((15, 35)));
    }

    #[test]
    fn test_from_empty_window() {
        let range = VisibleRange {
            start_index: 0,
            end_index: -1,
            offset_y: 0.0,
        };
        assert!(DataSourceParams::from_window(&state(), &range).is_none());
    }
}
