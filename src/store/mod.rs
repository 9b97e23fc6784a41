//! Grid state engine.
//!
//! [`GridStore`] owns the current [`GridState`] snapshot and a registry of
//! subscribers. Every action computes a new snapshot from the current one,
//! installs it, and synchronously hands it to every subscriber in
//! registration order. There is no batching: N actions produce N
//! notifications.
//!
//! The store is single-threaded (`Rc`/`RefCell`). A subscriber may call back
//! into the store; the nested action installs its snapshot and notifies
//! immediately, before the outer notification round finishes.
//!
//! Actions never fail and never validate: duplicate ids in a column order,
//! negative widths, or selecting ids that are not loaded are all stored as
//! given. Sort and filter criteria are only recorded; rows are never
//! reordered or dropped here.

mod actions;

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use crate::types::{
    Column, FilterState, GridConfig, GridState, Row, RowId, SortDirection,
};

type Callback = Rc<dyn Fn(&Arc<GridState>)>;

/// Handle returned by [`GridStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub fn get(self) -> u64 {
        self.0
    }

    /// Rebuild an id handed across the JS boundary.
    #[cfg(target_arch = "wasm32")]
    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

struct Inner {
    state: RefCell<Arc<GridState>>,
    columns: Rc<[Column]>,
    subscribers: RefCell<Vec<(SubscriptionId, Callback)>>,
    next_id: Cell<u64>,
}

/// Shared handle to the grid's state. Cloning is cheap and every clone sees
/// the same snapshot and subscribers.
#[derive(Clone)]
pub struct GridStore {
    inner: Rc<Inner>,
}

impl fmt::Debug for GridStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridStore")
            .field("state", &self.inner.state.borrow())
            .field("columns", &self.inner.columns.len())
            .field("subscribers", &self.inner.subscribers.borrow().len())
            .finish()
    }
}

impl GridStore {
    /// Create a store for a fixed column configuration.
    pub fn new(columns: Vec<Column>) -> Self {
        let state = GridState::new(&columns);
        Self::with_state(columns, state)
    }

    /// Create a store from a full config; its `page_size` is fixed for the
    /// store's lifetime.
    pub fn from_config(config: &GridConfig) -> Self {
        let mut state = GridState::new(&config.columns);
        state.page_size = config.page_size.max(1);
        Self::with_state(config.columns.clone(), state)
    }

    fn with_state(columns: Vec<Column>, state: GridState) -> Self {
        Self {
            inner: Rc::new(Inner {
                state: RefCell::new(Arc::new(state)),
                columns: columns.into(),
                subscribers: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<GridState> {
        Arc::clone(&self.inner.state.borrow())
    }

    /// The column configuration the store was built with.
    pub fn columns(&self) -> &[Column] {
        &self.inner.columns
    }

    /// Configured columns that are not hidden, in configuration order.
    pub fn visible_columns(&self) -> Vec<&Column> {
        self.inner.columns.iter().filter(|c| !c.hide).collect()
    }

    /// Rows as they should be displayed.
    ///
    /// Sorting and filtering happen at the data source, so this is the loaded
    /// rows unchanged.
    pub fn displayed_rows(&self) -> Arc<Vec<Row>> {
        Arc::clone(&self.snapshot().rows)
    }

    // ---- Subscription ---------------------------------------------------

    /// Register `callback` to receive every subsequent snapshot.
    ///
    /// The current snapshot is not delivered on registration; read it with
    /// [`snapshot`](Self::snapshot).
    pub fn subscribe(&self, callback: impl Fn(&Arc<GridState>) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        self.inner
            .subscribers
            .borrow_mut()
            .push((id, Rc::new(callback)));
        log::trace!("grid store: subscriber {} registered", id.0);
        id
    }

    /// Like [`subscribe`](Self::subscribe), but the registration is removed
    /// when the returned guard is dropped.
    pub fn subscribe_scoped(&self, callback: impl Fn(&Arc<GridState>) + 'static) -> Subscription {
        let id = self.subscribe(callback);
        Subscription {
            store: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Remove a subscriber. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        remove_subscriber(&self.inner, id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    fn dispatch(&self, action: &'static str, transition: impl FnOnce(&GridState) -> GridState) {
        let current = self.snapshot();
        let next = Arc::new(transition(&current));
        *self.inner.state.borrow_mut() = Arc::clone(&next);
        log::trace!("grid store: {action}");
        self.notify(&next);
    }

    fn notify(&self, snapshot: &Arc<GridState>) {
        // Collected first so callbacks can subscribe, unsubscribe or dispatch.
        let callbacks: Vec<Callback> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .map(|(_, cb)| Rc::clone(cb))
            .collect();
        for callback in callbacks {
            callback(snapshot);
        }
    }

    // ---- Generic ----------------------------------------------------------

    /// Replace the snapshot wholesale.
    pub fn set(&self, state: GridState) {
        self.dispatch("set", |_| state);
    }

    /// Derive the next snapshot from the current one.
    pub fn update(&self, f: impl FnOnce(&GridState) -> GridState) {
        self.dispatch("update", f);
    }

    // ---- Rows -------------------------------------------------------------

    /// Replace the loaded rows. Selection is left untouched.
    pub fn set_rows(&self, rows: Vec<Row>) {
        self.dispatch("set_rows", |s| actions::set_rows(s, rows));
    }

    /// Append rows after the loaded ones (incremental / infinite scroll).
    pub fn add_rows(&self, rows: Vec<Row>) {
        self.dispatch("add_rows", |s| actions::add_rows(s, rows));
    }

    /// Set the loading flag. Nothing clears it automatically; callers must
    /// reset it on both success and failure of a fetch.
    pub fn set_loading(&self, loading: bool) {
        self.dispatch("set_loading", |s| actions::set_loading(s, loading));
    }

    pub fn set_total_rows(&self, total_rows: usize) {
        self.dispatch("set_total_rows", |s| actions::set_total_rows(s, total_rows));
    }

    pub fn set_scroll_top(&self, scroll_top: f64) {
        self.dispatch("set_scroll_top", |s| actions::set_scroll_top(s, scroll_top));
    }

    /// Advance to the next page. No upper bound is enforced.
    pub fn increment_page(&self) {
        self.dispatch("increment_page", actions::increment_page);
    }

    // ---- Columns ----------------------------------------------------------

    /// Replace the column order. Not checked against the configured ids.
    pub fn set_column_order(&self, order: Vec<String>) {
        self.dispatch("set_column_order", |s| actions::set_column_order(s, order));
    }

    /// Record an explicit width for one column. Not checked for sign or
    /// against the column's min/max.
    pub fn set_column_width(&self, column_id: impl Into<String>, width: f64) {
        let column_id = column_id.into();
        self.dispatch("set_column_width", |s| {
            actions::set_column_width(s, column_id, width)
        });
    }

    // ---- Selection --------------------------------------------------------

    /// Select `id` if it is not selected, otherwise deselect it.
    pub fn toggle_row_selection(&self, id: impl Into<RowId>) {
        let id = id.into();
        self.dispatch("toggle_row_selection", |s| {
            actions::toggle_row_selection(s, id)
        });
    }

    /// Replace the selection with exactly `ids`.
    pub fn select_all_rows(&self, ids: Vec<RowId>) {
        self.dispatch("select_all_rows", |s| actions::select_all_rows(s, ids));
    }

    pub fn clear_selection(&self) {
        self.dispatch("clear_selection", actions::clear_selection);
    }

    // ---- Sort -------------------------------------------------------------

    /// Sort by `field`.
    ///
    /// Without `multi_sort` this becomes the only criterion. With it, an
    /// existing criterion for `field` changes direction in place and a new
    /// one is appended at the lowest priority.
    pub fn add_sort(&self, field: impl Into<String>, direction: SortDirection, multi_sort: bool) {
        let field = field.into();
        self.dispatch("add_sort", |s| {
            actions::add_sort(s, field, direction, multi_sort)
        });
    }

    pub fn remove_sort(&self, field: &str) {
        self.dispatch("remove_sort", |s| actions::remove_sort(s, field));
    }

    pub fn clear_sort(&self) {
        self.dispatch("clear_sort", actions::clear_sort);
    }

    // ---- Filter -----------------------------------------------------------

    /// Add a filter, replacing any existing filter on the same field. The new
    /// filter is always last.
    pub fn add_filter(&self, filter: FilterState) {
        self.dispatch("add_filter", |s| actions::add_filter(s, filter));
    }

    pub fn remove_filter(&self, field: &str) {
        self.dispatch("remove_filter", |s| actions::remove_filter(s, field));
    }

    pub fn clear_filters(&self) {
        self.dispatch("clear_filters", actions::clear_filters);
    }
}

fn remove_subscriber(inner: &Inner, id: SubscriptionId) -> bool {
    let mut subscribers = inner.subscribers.borrow_mut();
    let before = subscribers.len();
    subscribers.retain(|(sid, _)| *sid != id);
    let removed = subscribers.len() != before;
    if removed {
        log::trace!("grid store: subscriber {} removed", id.0);
    }
    removed
}

/// Subscription guard; unsubscribes on drop.
#[must_use = "dropping the guard unsubscribes immediately"]
pub struct Subscription {
    store: Weak<Inner>,
    id: SubscriptionId,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Subscription").field(&self.id).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.store.upgrade() {
            remove_subscriber(&inner, self.id);
        }
    }
}
