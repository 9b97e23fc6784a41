//! Tests for the grid state engine
//!
//! Covers snapshot carry-over between actions, selection, sort and filter
//! semantics, and subscriber notification order.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use datagrid::{
    Column, ColumnType, FilterOperator, FilterState, FilterType, FrozenSide, GridConfig,
    GridState, GridStore, Row, RowId, SortDirection, DEFAULT_PAGE_SIZE,
};
use serde_json::json;

// ============================================================================
// Test Helpers
// ============================================================================

fn columns() -> Vec<Column> {
    vec![
        Column::new("id", "id", "ID")
            .with_type(ColumnType::Number)
            .frozen(FrozenSide::Left),
        Column::new("name", "name", "Name"),
        Column::new("age", "age", "Age").with_type(ColumnType::Number),
        Column::new("active", "active", "Active").with_type(ColumnType::Boolean),
    ]
}

fn people(ids: impl IntoIterator<Item = i64>) -> Vec<Row> {
    ids.into_iter()
        .map(|id| {
            Row::new(id)
                .with("name", format!("Person {id}"))
                .with("age", 20 + id)
        })
        .collect()
}

fn store() -> GridStore {
    GridStore::new(columns())
}

fn text_filter(field: &str, value: &str) -> FilterState {
    FilterState::new(field, FilterType::Text, FilterOperator::Contains, json!(value))
}

// ============================================================================
// Initial state
// ============================================================================

#[test]
fn test_initial_state() {
    let state = store().snapshot();
    assert!(state.rows.is_empty());
    assert!(state.selected_rows.is_empty());
    assert!(state.sort_state.is_empty());
    assert!(state.filter_state.is_empty());
    assert!(!state.loading);
    assert_eq!(state.total_rows, 0);
    assert_eq!(state.current_page, 0);
    assert_eq!(state.page_size, DEFAULT_PAGE_SIZE);
    assert_eq!(state.scroll_top, 0.0);
    assert_eq!(*state.column_order, ["id", "name", "age", "active"]);
    assert!(state.column_widths.is_empty());
    assert_eq!(*state.frozen_left_columns, ["id"]);
    assert!(state.frozen_right_columns.is_empty());
}

#[test]
fn test_from_config_sets_page_size() {
    let config = GridConfig::from_json(r#"{"columns": [], "pageSize": 25}"#).unwrap();
    let store = GridStore::from_config(&config);
    assert_eq!(store.snapshot().page_size, 25);
}

#[test]
fn test_feature_flags_are_renderer_hints() {
    let config = GridConfig::from_json(
        r#"{"columns": [], "enableSorting": false, "enableFiltering": false, "multiSelect": false}"#,
    )
    .unwrap();
    assert!(!config.enable_sorting);
    assert!(!config.multi_select);

    let store = GridStore::from_config(&config);
    store.add_sort("name", SortDirection::Asc, false);
    store.add_sort("age", SortDirection::Desc, true);
    store.add_filter(text_filter("name", "a"));
    store.select_all_rows(vec![RowId::from(1), RowId::from(2)]);

    let state = store.snapshot();
    assert_eq!(state.sort_state.len(), 2);
    assert_eq!(state.filter_state.len(), 1);
    assert_eq!(state.selected_rows.len(), 2);
}

// ============================================================================
// Snapshot carry-over
// ============================================================================

#[test]
fn test_unchanged_fields_are_shared() {
    let store = store();
    store.set_rows(people(1..=3));
    store.add_sort("name", SortDirection::Asc, false);
    let before = store.snapshot();

    store.toggle_row_selection(2);
    let after = store.snapshot();

    assert!(!Arc::ptr_eq(&before, &after));
    assert!(Arc::ptr_eq(&before.rows, &after.rows));
    assert!(Arc::ptr_eq(&before.sort_state, &after.sort_state));
    assert!(Arc::ptr_eq(&before.filter_state, &after.filter_state));
    assert!(Arc::ptr_eq(&before.column_order, &after.column_order));
    assert!(!Arc::ptr_eq(&before.selected_rows, &after.selected_rows));
}

/// Store with every field away from its default.
fn populated_store() -> GridStore {
    let store = store();
    store.set_rows(people(1..=3));
    store.toggle_row_selection(1);
    store.add_sort("name", SortDirection::Asc, false);
    store.add_sort("age", SortDirection::Desc, true);
    store.add_filter(text_filter("name", "P"));
    store.add_filter(text_filter("age", "2"));
    store.set_loading(true);
    store.set_total_rows(300);
    store.increment_page();
    store.set_scroll_top(42.0);
    store.set_column_width("name", 180.0);
    store
}

/// Every field not named in `targeted` is pointer-equal (heap fields) or
/// equal (scalars) across the transition; every targeted heap field is a new
/// allocation.
fn assert_carried_over(action: &str, before: &GridState, after: &GridState, targeted: &[&str]) {
    let arcs = [
        ("rows", Arc::ptr_eq(&before.rows, &after.rows)),
        ("selected_rows", Arc::ptr_eq(&before.selected_rows, &after.selected_rows)),
        ("sort_state", Arc::ptr_eq(&before.sort_state, &after.sort_state)),
        ("filter_state", Arc::ptr_eq(&before.filter_state, &after.filter_state)),
        ("column_order", Arc::ptr_eq(&before.column_order, &after.column_order)),
        ("column_widths", Arc::ptr_eq(&before.column_widths, &after.column_widths)),
        (
            "frozen_left_columns",
            Arc::ptr_eq(&before.frozen_left_columns, &after.frozen_left_columns),
        ),
        (
            "frozen_right_columns",
            Arc::ptr_eq(&before.frozen_right_columns, &after.frozen_right_columns),
        ),
    ];
    for (field, shared) in arcs {
        let expected = !targeted.contains(&field);
        assert_eq!(shared, expected, "{action}: {field} shared = {shared}");
    }

    let scalars = [
        ("loading", before.loading == after.loading),
        ("total_rows", before.total_rows == after.total_rows),
        ("current_page", before.current_page == after.current_page),
        ("page_size", before.page_size == after.page_size),
        ("scroll_top", before.scroll_top == after.scroll_top),
    ];
    for (field, equal) in scalars {
        if !targeted.contains(&field) {
            assert!(equal, "{action}: {field} changed");
        }
    }
}

#[test]
fn test_every_action_shares_untargeted_fields() {
    let actions: [(&str, fn(&GridStore), &[&str]); 17] = [
        ("set_rows", |s| s.set_rows(people(7..=8)), &["rows"]),
        ("add_rows", |s| s.add_rows(people(4..=5)), &["rows"]),
        ("set_loading", |s| s.set_loading(false), &["loading"]),
        ("set_total_rows", |s| s.set_total_rows(12), &["total_rows"]),
        ("set_scroll_top", |s| s.set_scroll_top(900.0), &["scroll_top"]),
        ("increment_page", GridStore::increment_page, &["current_page"]),
        (
            "set_column_order",
            |s| s.set_column_order(vec!["name".into(), "id".into()]),
            &["column_order"],
        ),
        (
            "set_column_width",
            |s| s.set_column_width("age", 90.0),
            &["column_widths"],
        ),
        (
            "toggle_row_selection",
            |s| s.toggle_row_selection(2),
            &["selected_rows"],
        ),
        (
            "select_all_rows",
            |s| s.select_all_rows(vec![RowId::from(1), RowId::from(2)]),
            &["selected_rows"],
        ),
        ("clear_selection", GridStore::clear_selection, &["selected_rows"]),
        (
            "add_sort",
            |s| s.add_sort("active", SortDirection::Asc, true),
            &["sort_state"],
        ),
        ("remove_sort", |s| s.remove_sort("name"), &["sort_state"]),
        ("clear_sort", GridStore::clear_sort, &["sort_state"]),
        (
            "add_filter",
            |s| s.add_filter(text_filter("active", "true")),
            &["filter_state"],
        ),
        ("remove_filter", |s| s.remove_filter("age"), &["filter_state"]),
        ("clear_filters", GridStore::clear_filters, &["filter_state"]),
    ];

    for (name, action, targeted) in actions {
        let store = populated_store();
        let before = store.snapshot();
        action(&store);
        let after = store.snapshot();
        assert!(!Arc::ptr_eq(&before, &after), "{name}: no new snapshot");
        assert_carried_over(name, &before, &after, targeted);
    }
}

#[test]
fn test_old_snapshot_is_untouched() {
    let store = store();
    store.set_rows(people(1..=2));
    let before = store.snapshot();
    store.add_rows(people(3..=4));
    assert_eq!(before.rows.len(), 2);
    assert_eq!(store.snapshot().rows.len(), 4);
}

#[test]
fn test_set_replaces_snapshot_wholesale() {
    let store = store();
    let mut replacement = GridState::new(&columns());
    replacement.total_rows = 99;
    replacement.loading = true;
    store.set(replacement);
    let state = store.snapshot();
    assert_eq!(state.total_rows, 99);
    assert!(state.loading);
}

#[test]
fn test_update_derives_from_current() {
    let store = store();
    store.set_total_rows(10);
    store.update(|s| GridState {
        total_rows: s.total_rows * 2,
        ..s.clone()
    });
    assert_eq!(store.snapshot().total_rows, 20);
}

// ============================================================================
// Rows
// ============================================================================

#[test]
fn test_add_rows_appends_in_order() {
    let store = store();
    store.set_rows(people([1, 2]));
    store.add_rows(people([3]));
    let ids: Vec<_> = store.snapshot().rows.iter().map(|r| r.id.clone()).collect();
    assert_eq!(ids, [RowId::from(1), RowId::from(2), RowId::from(3)]);
}

#[test]
fn test_selection_survives_row_replacement() {
    let store = store();
    store.set_rows(people(1..=3));
    store.toggle_row_selection(2);
    store.set_rows(people(10..=12));

    let state = store.snapshot();
    assert!(state.is_selected(&RowId::from(2)));
    assert!(state.selected_loaded_rows().is_empty());
}

#[test]
fn test_displayed_rows_are_loaded_rows() {
    let store = store();
    store.set_rows(people([3, 1, 2]));
    store.add_sort("id", SortDirection::Asc, false);
    store.add_filter(text_filter("name", "1"));
    let ids: Vec<_> = store.displayed_rows().iter().map(|r| r.id.clone()).collect();
    assert_eq!(ids, [RowId::from(3), RowId::from(1), RowId::from(2)]);
}

#[test]
fn test_scalar_setters_store_verbatim() {
    let store = store();
    store.set_loading(true);
    store.set_total_rows(500);
    store.set_scroll_top(1234.5);
    store.increment_page();
    store.increment_page();
    let state = store.snapshot();
    assert!(state.loading);
    assert_eq!(state.total_rows, 500);
    assert_eq!(state.scroll_top, 1234.5);
    assert_eq!(state.current_page, 2);
}

// ============================================================================
// Columns
// ============================================================================

#[test]
fn test_column_order_replaced_verbatim() {
    let store = store();
    store.set_column_order(vec!["age".into(), "ghost".into(), "age".into()]);
    assert_eq!(*store.snapshot().column_order, ["age", "ghost", "age"]);
}

#[test]
fn test_column_width_overwrites_single_entry() {
    let store = store();
    store.set_column_width("name", 200.0);
    store.set_column_width("age", -5.0);
    store.set_column_width("name", 250.0);
    let widths = store.snapshot().column_widths.clone();
    assert_eq!(widths.len(), 2);
    assert_eq!(widths["name"], 250.0);
    assert_eq!(widths["age"], -5.0);
}

// ============================================================================
// Selection
// ============================================================================

#[test]
fn test_toggle_is_involution() {
    let store = store();
    store.select_all_rows(vec![RowId::from(1), RowId::from("x")]);
    let before = store.snapshot().selected_rows.clone();
    store.toggle_row_selection("y");
    store.toggle_row_selection("y");
    assert_eq!(*store.snapshot().selected_rows, *before);
}

#[test]
fn test_select_all_replaces_and_dedups() {
    let store = store();
    store.toggle_row_selection(7);
    store.select_all_rows(vec![RowId::from(1), RowId::from(2), RowId::from(2)]);
    let state = store.snapshot();
    assert_eq!(state.selected_rows.len(), 2);
    assert!(!state.is_selected(&RowId::from(7)));
}

#[test]
fn test_select_all_empty_and_clear() {
    let store = store();
    store.toggle_row_selection(1);
    store.select_all_rows(Vec::new());
    assert!(store.snapshot().selected_rows.is_empty());

    store.toggle_row_selection(1);
    store.clear_selection();
    assert!(store.snapshot().selected_rows.is_empty());
}

#[test]
fn test_numeric_and_text_ids_are_distinct() {
    let store = store();
    store.toggle_row_selection(1);
    store.toggle_row_selection("1");
    assert_eq!(store.snapshot().selected_rows.len(), 2);
}

// ============================================================================
// Sorting
// ============================================================================

#[test]
fn test_single_sort_replaces_criteria() {
    let store = store();
    store.add_sort("name", SortDirection::Asc, false);
    store.add_sort("age", SortDirection::Desc, false);
    let sorts = store.snapshot().sort_state.clone();
    assert_eq!(sorts.len(), 1);
    assert_eq!(sorts[0].field, "age");
    assert_eq!(sorts[0].direction, SortDirection::Desc);
}

#[test]
fn test_multi_sort_keeps_position_of_existing_field() {
    let store = store();
    store.add_sort("name", SortDirection::Asc, false);
    store.add_sort("age", SortDirection::Desc, true);
    store.add_sort("name", SortDirection::Desc, true);
    let state = store.snapshot();
    let fields: Vec<_> = state.sort_state.iter().map(|s| s.field.as_str()).collect();
    assert_eq!(fields, ["name", "age"]);
    assert_eq!(state.sort_for("name").map(|(i, s)| (i, s.direction)), Some((0, SortDirection::Desc)));
}

#[test]
fn test_single_sort_on_existing_field_drops_others() {
    let store = store();
    store.add_sort("name", SortDirection::Asc, true);
    store.add_sort("age", SortDirection::Asc, true);
    store.add_sort("age", SortDirection::Desc, false);
    let sorts = store.snapshot().sort_state.clone();
    assert_eq!(sorts.len(), 1);
    assert_eq!(sorts[0].direction, SortDirection::Desc);
}

#[test]
fn test_remove_and_clear_sort() {
    let store = store();
    store.add_sort("name", SortDirection::Asc, true);
    store.add_sort("age", SortDirection::Asc, true);
    store.remove_sort("name");
    store.remove_sort("missing");
    let fields: Vec<_> = store
        .snapshot()
        .sort_state
        .iter()
        .map(|s| s.field.clone())
        .collect();
    assert_eq!(fields, ["age"]);
    store.clear_sort();
    assert!(store.snapshot().sort_state.is_empty());
}

// ============================================================================
// Filtering
// ============================================================================

#[test]
fn test_add_filter_moves_field_to_tail() {
    let store = store();
    store.add_filter(text_filter("name", "a"));
    store.add_filter(text_filter("age", "3"));
    store.add_filter(text_filter("name", "b"));

    let state = store.snapshot();
    let fields: Vec<_> = state.filter_state.iter().map(|f| f.field.as_str()).collect();
    assert_eq!(fields, ["age", "name"]);
    assert_eq!(state.filter_for("name").unwrap().value, json!("b"));
}

#[test]
fn test_remove_and_clear_filters() {
    let store = store();
    store.add_filter(text_filter("name", "a"));
    store.add_filter(text_filter("age", "3"));
    store.remove_filter("name");
    assert_eq!(store.snapshot().filter_state.len(), 1);
    store.clear_filters();
    assert!(store.snapshot().filter_state.is_empty());
}

// ============================================================================
// Subscribers
// ============================================================================

#[test]
fn test_every_action_notifies_once() {
    let store = store();
    let count = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&count);
    let _id = store.subscribe(move |_| *counter.borrow_mut() += 1);

    store.set_rows(people(1..=2));
    store.add_rows(people(3..=3));
    store.set_loading(true);
    store.set_total_rows(3);
    store.set_scroll_top(10.0);
    store.set_column_order(vec!["name".into()]);
    store.set_column_width("name", 10.0);
    store.toggle_row_selection(1);
    store.select_all_rows(vec![RowId::from(1)]);
    store.clear_selection();
    store.add_sort("name", SortDirection::Asc, false);
    store.remove_sort("name");
    store.clear_sort();
    store.add_filter(text_filter("name", "x"));
    store.remove_filter("name");
    store.clear_filters();
    store.increment_page();

    assert_eq!(*count.borrow(), 17);
}

#[test]
fn test_subscribers_receive_new_snapshot_in_order() {
    let store = store();
    let seen = Rc::new(RefCell::new(Vec::new()));
    for name in ["first", "second", "third"] {
        let seen = Rc::clone(&seen);
        let _ = store.subscribe(move |state| {
            seen.borrow_mut().push((name, state.total_rows));
        });
    }
    store.set_total_rows(5);
    assert_eq!(
        *seen.borrow(),
        [("first", 5), ("second", 5), ("third", 5)]
    );
}

#[test]
fn test_unsubscribe_stops_delivery() {
    let store = store();
    let count = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&count);
    let id = store.subscribe(move |_| *counter.borrow_mut() += 1);

    store.set_loading(true);
    assert!(store.unsubscribe(id));
    assert!(!store.unsubscribe(id));
    store.set_loading(false);
    assert_eq!(*count.borrow(), 1);
    assert_eq!(store.subscriber_count(), 0);
}

#[test]
fn test_same_callback_registered_twice_gets_two_ids() {
    let store = store();
    let count = Rc::new(RefCell::new(0));
    let callback = {
        let count = Rc::clone(&count);
        Rc::new(move |_: &Arc<GridState>| *count.borrow_mut() += 1)
    };
    let a = {
        let cb = Rc::clone(&callback);
        store.subscribe(move |s| cb(s))
    };
    let b = {
        let cb = Rc::clone(&callback);
        store.subscribe(move |s| cb(s))
    };
    assert_ne!(a, b);
    store.clear_sort();
    assert_eq!(*count.borrow(), 2);
}

#[test]
fn test_subscriber_can_dispatch_from_callback() {
    let store = store();
    let inner = store.clone();
    let _ = store.subscribe(move |state| {
        if state.loading && state.total_rows == 0 {
            inner.set_total_rows(1);
        }
    });
    store.set_loading(true);
    let state = store.snapshot();
    assert!(state.loading);
    assert_eq!(state.total_rows, 1);
}

#[test]
fn test_scoped_subscription_ends_on_drop() {
    let store = store();
    let count = Rc::new(RefCell::new(0));
    {
        let counter = Rc::clone(&count);
        let _subscription = store.subscribe_scoped(move |_| *counter.borrow_mut() += 1);
        store.clear_sort();
    }
    store.clear_sort();
    assert_eq!(*count.borrow(), 1);
}
