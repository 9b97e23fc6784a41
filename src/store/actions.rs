//! Snapshot transitions.
//!
//! Each function takes the current snapshot and returns the next one. Fields
//! the transition does not target are carried over by `Arc` clone, so they
//! stay pointer-equal to the previous snapshot. None of these validate input.

use std::sync::Arc;

use crate::types::{FilterState, GridState, Row, RowId, SortDirection, SortState};

pub(crate) fn set_rows(state: &GridState, rows: Vec<Row>) -> GridState {
    GridState {
        rows: Arc::new(rows),
        ..state.clone()
    }
}

pub(crate) fn add_rows(state: &GridState, rows: Vec<Row>) -> GridState {
    let mut combined = Vec::with_capacity(state.rows.len() + rows.len());
    combined.extend(state.rows.iter().cloned());
    combined.extend(rows);
    GridState {
        rows: Arc::new(combined),
        ..state.clone()
    }
}

pub(crate) fn set_loading(state: &GridState, loading: bool) -> GridState {
    GridState {
        loading,
        ..state.clone()
    }
}

pub(crate) fn set_total_rows(state: &GridState, total_rows: usize) -> GridState {
    GridState {
        total_rows,
        ..state.clone()
    }
}

pub(crate) fn set_scroll_top(state: &GridState, scroll_top: f64) -> GridState {
    GridState {
        scroll_top,
        ..state.clone()
    }
}

pub(crate) fn set_column_order(state: &GridState, order: Vec<String>) -> GridState {
    GridState {
        column_order: Arc::new(order),
        ..state.clone()
    }
}

pub(crate) fn set_column_width(state: &GridState, column_id: String, width: f64) -> GridState {
    let mut widths = (*state.column_widths).clone();
    widths.insert(column_id, width);
    GridState {
        column_widths: Arc::new(widths),
        ..state.clone()
    }
}

pub(crate) fn toggle_row_selection(state: &GridState, id: RowId) -> GridState {
    let mut selected = (*state.selected_rows).clone();
    if !selected.remove(&id) {
        selected.insert(id);
    }
    GridState {
        selected_rows: Arc::new(selected),
        ..state.clone()
    }
}

pub(crate) fn select_all_rows(state: &GridState, ids: Vec<RowId>) -> GridState {
    GridState {
        selected_rows: Arc::new(ids.into_iter().collect()),
        ..state.clone()
    }
}

pub(crate) fn clear_selection(state: &GridState) -> GridState {
    GridState {
        selected_rows: Arc::default(),
        ..state.clone()
    }
}

/// Without `multi_sort` the previous criteria are dropped first. An existing
/// entry for `field` keeps its priority and only changes direction; a new
/// one goes last.
pub(crate) fn add_sort(
    state: &GridState,
    field: String,
    direction: SortDirection,
    multi_sort: bool,
) -> GridState {
    let mut sorts = if multi_sort {
        (*state.sort_state).clone()
    } else {
        Vec::new()
    };
    match sorts.iter_mut().find(|s| s.field == field) {
        Some(existing) => existing.direction = direction,
        None => sorts.push(SortState { field, direction }),
    }
    GridState {
        sort_state: Arc::new(sorts),
        ..state.clone()
    }
}

pub(crate) fn remove_sort(state: &GridState, field: &str) -> GridState {
    GridState {
        sort_state: Arc::new(
            state
                .sort_state
                .iter()
                .filter(|s| s.field != field)
                .cloned()
                .collect(),
        ),
        ..state.clone()
    }
}

pub(crate) fn clear_sort(state: &GridState) -> GridState {
    GridState {
        sort_state: Arc::default(),
        ..state.clone()
    }
}

/// Replaces any filter on the same field; the new one always ends up last.
pub(crate) fn add_filter(state: &GridState, filter: FilterState) -> GridState {
    let mut filters: Vec<FilterState> = state
        .filter_state
        .iter()
        .filter(|f| f.field != filter.field)
        .cloned()
        .collect();
    filters.push(filter);
    GridState {
        filter_state: Arc::new(filters),
        ..state.clone()
    }
}

pub(crate) fn remove_filter(state: &GridState, field: &str) -> GridState {
    GridState {
        filter_state: Arc::new(
            state
                .filter_state
                .iter()
                .filter(|f| f.field != field)
                .cloned()
                .collect(),
        ),
        ..state.clone()
    }
}

pub(crate) fn clear_filters(state: &GridState) -> GridState {
    GridState {
        filter_state: Arc::default(),
        ..state.clone()
    }
}

pub(crate) fn increment_page(state: &GridState) -> GridState {
    GridState {
        current_page: state.current_page.saturating_add(1),
        ..state.clone()
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::types::{Column, FilterOperator, FilterType};

    fn base() -> GridState {
        GridState::new(&[Column::new("a", "a", "A"), Column::new("b", "b", "B")])
    }

    #[test]
    fn test_add_rows_appends() {
        let s = set_rows(&base(), vec![Row::new(1)]);
        let s = add_rows(&s, vec![Row::new(2), Row::new(3)]);
        let ids: Vec<_> = s.rows.iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids, [RowId::from(1), RowId::from(2), RowId::from(3)]);
    }

    #[test]
    fn test_set_column_width_keeps_others() {
        let s = set_column_width(&base(), "a".into(), 200.0);
        let s = set_column_width(&s, "b".into(), 80.0);
        assert_eq!(s.column_widths.len(), 2);
        assert_eq!(s.column_widths.get("a").copied(), Some(200.0));
    }

    #[test]
    fn test_remove_sort_preserves_order() {
        let s = add_sort(&base(), "a".into(), SortDirection::Asc, true);
        let s = add_sort(&s, "b".into(), SortDirection::Desc, true);
        let s = add_sort(&s, "c".into(), SortDirection::Asc, true);
        let s = remove_sort(&s, "b");
        let fields: Vec<_> = s.sort_state.iter().map(|s| s.field.as_str()).collect();
        assert_eq!(fields, ["a", "c"]);
    }

    #[test]
    fn test_remove_filter_missing_field_is_noop() {
        let s = add_filter(
            &base(),
            FilterState::new("a", FilterType::Text, FilterOperator::Contains, "x"),
        );
        let s = remove_filter(&s, "zzz");
        assert_eq!(s.filter_state.len(), 1);
        assert_eq!(s.filter_state[0].field, "a");
    }

    #[test]
    fn test_select_all_replaces_selection() {
        let s = toggle_row_selection(&base(), RowId::from(9));
        let s = select_all_rows(&s, vec![RowId::from(1), RowId::from(2)]);
        assert!(!s.is_selected(&RowId::from(9)));
        assert_eq!(s.selected_rows.len(), 2);
    }
}
