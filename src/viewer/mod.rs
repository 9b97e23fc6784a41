//! `GridView` - the JS-facing handle to a grid.
//!
//! This module provides the WASM-exported `GridView` struct that handles:
//! - Forwarding the store's actions and snapshots to JavaScript
//! - Throttled scroll tracking and virtual window computation
//! - Fetching pages through a JS data source function, dropping stale responses
//! - CSV/JSON export with a browser download
//!
//! `ClickOutside` is exported alongside for popup menus and filter panels.

mod click_outside;
mod data_source;
mod scroll;

pub use click_outside::ClickOutside;

use std::cell::RefCell;

use js_sys::{Function, Promise};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::export;
use crate::fetch::{FetchCoordinator, FetchOutcome};
use crate::layout::{ResolvedLayout, RowViewport, VisibleRange};
use crate::store::{GridStore, SubscriptionId};
use crate::types::{Column, FilterState, GridConfig, Row, RowId, SortDirection};

use data_source::JsDataSource;
use scroll::ScrollTracker;

/// Serialize to a plain JS value (objects, not `Map`s).
pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

pub(crate) fn from_js<T: serde::de::DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Deserialization error: {e}")))
}

fn outcome_name(outcome: Option<FetchOutcome>) -> &'static str {
    match outcome {
        Some(FetchOutcome::Applied) => "applied",
        Some(FetchOutcome::Deferred) => "deferred",
        Some(FetchOutcome::Stale) => "stale",
        None => "empty",
    }
}

/// The grid handle exported to JavaScript.
#[wasm_bindgen]
pub struct GridView {
    store: GridStore,
    fetcher: FetchCoordinator,
    config: GridConfig,
    viewport: RowViewport,
    scroll: RefCell<ScrollTracker>,
}

#[wasm_bindgen]
impl GridView {
    /// Create a grid from a config object (`{ columns, rowHeight, ... }`).
    ///
    /// # Errors
    /// Returns an error if the config does not deserialize or its row height
    /// is not positive.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue, container_height: f64) -> Result<GridView, JsValue> {
        console_error_panic_hook::set_once();
        let config: GridConfig = from_js(config)?;
        let viewport = config.row_viewport(container_height)?;
        let store = GridStore::from_config(&config);
        log::debug!(
            "grid view: {} columns, row height {}",
            config.columns.len(),
            config.row_height
        );
        Ok(GridView {
            fetcher: FetchCoordinator::new(store.clone()),
            store,
            config,
            viewport,
            scroll: RefCell::new(ScrollTracker::default()),
        })
    }

    /// Current snapshot as a plain object.
    #[wasm_bindgen]
    pub fn state(&self) -> Result<JsValue, JsValue> {
        to_js(&*self.store.snapshot())
    }

    /// The config the grid was created with, defaults filled in. Feature
    /// flags such as `enableSorting` are for the renderer to honor.
    #[wasm_bindgen]
    pub fn config(&self) -> Result<JsValue, JsValue> {
        to_js(&self.config)
    }

    /// Configured columns that are not hidden.
    #[wasm_bindgen(js_name = visibleColumns)]
    pub fn visible_columns(&self) -> Result<JsValue, JsValue> {
        to_js(&self.store.visible_columns())
    }

    /// Call `callback(state)` after every action. Returns an id for
    /// `unsubscribe`.
    #[wasm_bindgen]
    pub fn subscribe(&self, callback: Function) -> u32 {
        let id = self.store.subscribe(move |snapshot| {
            let Ok(value) = to_js(&**snapshot) else {
                return;
            };
            if let Err(e) = callback.call1(&JsValue::NULL, &value) {
                log::warn!("grid view: subscriber threw: {e:?}");
            }
        });
        u32::try_from(id.get()).unwrap_or(u32::MAX)
    }

    #[wasm_bindgen]
    pub fn unsubscribe(&self, id: u32) -> bool {
        self.store.unsubscribe(SubscriptionId::from_raw(u64::from(id)))
    }

    // ---- Actions ----------------------------------------------------------

    #[wasm_bindgen(js_name = setRows)]
    pub fn set_rows(&self, rows: JsValue) -> Result<(), JsValue> {
        let rows: Vec<Row> = from_js(rows)?;
        self.store.set_rows(rows);
        Ok(())
    }

    #[wasm_bindgen(js_name = addRows)]
    pub fn add_rows(&self, rows: JsValue) -> Result<(), JsValue> {
        let rows: Vec<Row> = from_js(rows)?;
        self.store.add_rows(rows);
        Ok(())
    }

    #[wasm_bindgen(js_name = setLoading)]
    pub fn set_loading(&self, loading: bool) {
        self.store.set_loading(loading);
    }

    #[wasm_bindgen(js_name = setTotalRows)]
    pub fn set_total_rows(&self, total_rows: usize) {
        self.store.set_total_rows(total_rows);
    }

    #[wasm_bindgen(js_name = setScrollTop)]
    pub fn set_scroll_top(&self, scroll_top: f64) {
        self.store.set_scroll_top(scroll_top);
    }

    #[wasm_bindgen(js_name = setColumnOrder)]
    pub fn set_column_order(&self, order: Vec<String>) {
        self.store.set_column_order(order);
    }

    #[wasm_bindgen(js_name = setColumnWidth)]
    pub fn set_column_width(&self, column_id: String, width: f64) {
        self.store.set_column_width(column_id, width);
    }

    #[wasm_bindgen(js_name = toggleRowSelection)]
    pub fn toggle_row_selection(&self, id: JsValue) -> Result<(), JsValue> {
        let id: RowId = from_js(id)?;
        self.store.toggle_row_selection(id);
        Ok(())
    }

    #[wasm_bindgen(js_name = selectAllRows)]
    pub fn select_all_rows(&self, ids: JsValue) -> Result<(), JsValue> {
        let ids: Vec<RowId> = from_js(ids)?;
        self.store.select_all_rows(ids);
        Ok(())
    }

    #[wasm_bindgen(js_name = clearSelection)]
    pub fn clear_selection(&self) {
        self.store.clear_selection();
    }

    /// `direction` is `"asc"` or `"desc"`. Applied even when the config
    /// disables sorting; that flag only tells the renderer to hide the
    /// controls.
    #[wasm_bindgen(js_name = addSort)]
    pub fn add_sort(&self, field: String, direction: &str, multi_sort: bool) -> Result<(), JsValue> {
        let direction: SortDirection = from_js(JsValue::from_str(direction))?;
        self.store.add_sort(field, direction, multi_sort);
        Ok(())
    }

    #[wasm_bindgen(js_name = removeSort)]
    pub fn remove_sort(&self, field: &str) {
        self.store.remove_sort(field);
    }

    #[wasm_bindgen(js_name = clearSort)]
    pub fn clear_sort(&self) {
        self.store.clear_sort();
    }

    #[wasm_bindgen(js_name = addFilter)]
    pub fn add_filter(&self, filter: JsValue) -> Result<(), JsValue> {
        let filter: FilterState = from_js(filter)?;
        self.store.add_filter(filter);
        Ok(())
    }

    #[wasm_bindgen(js_name = removeFilter)]
    pub fn remove_filter(&self, field: &str) {
        self.store.remove_filter(field);
    }

    #[wasm_bindgen(js_name = clearFilters)]
    pub fn clear_filters(&self) {
        self.store.clear_filters();
    }

    #[wasm_bindgen(js_name = incrementPage)]
    pub fn increment_page(&self) {
        self.store.increment_page();
    }

    // ---- Layout -----------------------------------------------------------

    /// Resize the scroll container (pixels, including the header strip).
    #[wasm_bindgen]
    pub fn resize(&mut self, container_height: f64) {
        self.viewport
            .resize((container_height - self.config.header_height).max(0.0));
    }

    /// Feed a scroll event. Returns `true` if the store was updated now;
    /// otherwise the position is held until `flushScroll`.
    #[wasm_bindgen(js_name = onScroll)]
    pub fn on_scroll(&self, scroll_top: f64, now_ms: f64) -> bool {
        self.scroll
            .borrow_mut()
            .on_scroll(&self.store, scroll_top, now_ms)
    }

    /// Apply a held scroll position once scrolling has settled.
    #[wasm_bindgen(js_name = flushScroll)]
    pub fn flush_scroll(&self, now_ms: f64) -> bool {
        self.scroll.borrow_mut().flush(&self.store, now_ms)
    }

    /// Rows to render for the stored scroll position and total.
    #[wasm_bindgen(js_name = visibleRange)]
    pub fn visible_range(&self) -> Result<JsValue, JsValue> {
        to_js(&self.current_window())
    }

    /// Pixel height of the scroll spacer.
    #[wasm_bindgen(js_name = totalHeight)]
    pub fn total_height(&self) -> f64 {
        self.viewport.total_height(self.store.snapshot().total_rows)
    }

    /// Column panes with widths and offsets.
    #[wasm_bindgen(js_name = columnLayout)]
    pub fn column_layout(&self) -> Result<JsValue, JsValue> {
        to_js(&ResolvedLayout::resolve(
            &self.store.snapshot(),
            self.store.columns(),
        ))
    }

    // ---- Fetch ------------------------------------------------------------

    /// Load rows for the current window through `source(params)`, which must
    /// return a promise of `{ rows, totalRows }`.
    ///
    /// Resolves to `"applied"`, `"deferred"` (held behind an earlier page),
    /// `"stale"` (a newer request superseded it), or `"empty"` (no rows to
    /// request). `loading` is not touched.
    #[wasm_bindgen(js_name = fetchWindow)]
    pub fn fetch_window(&self, source: Function) -> Promise {
        let fetcher = self.fetcher.clone();
        let range = self.current_window();
        future_to_promise(async move {
            let outcome = fetcher
                .fetch_window(&JsDataSource::new(source), &range)
                .await?;
            Ok(JsValue::from_str(outcome_name(outcome)))
        })
    }

    /// Load the current page through `source(params)`.
    #[wasm_bindgen(js_name = fetchPage)]
    pub fn fetch_page(&self, source: Function) -> Promise {
        let fetcher = self.fetcher.clone();
        future_to_promise(async move {
            let outcome = fetcher.fetch_page(&JsDataSource::new(source)).await?;
            Ok(JsValue::from_str(outcome_name(Some(outcome))))
        })
    }

    /// Advance the page and append its rows (infinite scroll).
    #[wasm_bindgen(js_name = fetchNextPage)]
    pub fn fetch_next_page(&self, source: Function) -> Promise {
        let fetcher = self.fetcher.clone();
        future_to_promise(async move {
            let outcome = fetcher.fetch_next_page(&JsDataSource::new(source)).await?;
            Ok(JsValue::from_str(outcome_name(Some(outcome))))
        })
    }

    // ---- Export -----------------------------------------------------------

    /// Loaded rows as CSV over the visible columns.
    #[wasm_bindgen(js_name = toCsv)]
    pub fn to_csv(&self) -> String {
        export::to_csv(&self.store.snapshot().rows, &self.export_columns())
    }

    #[wasm_bindgen(js_name = toJson)]
    pub fn to_json(&self) -> Result<String, JsValue> {
        Ok(export::to_json(&self.store.snapshot().rows)?)
    }

    #[wasm_bindgen(js_name = exportCsv)]
    pub fn export_csv(&self, filename: Option<String>) -> Result<(), JsValue> {
        let filename = filename.unwrap_or_else(|| export::DEFAULT_CSV_FILENAME.to_string());
        export::download(&filename, &self.to_csv(), export::CSV_MIME)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = exportJson)]
    pub fn export_json(&self, filename: Option<String>) -> Result<(), JsValue> {
        let filename = filename.unwrap_or_else(|| export::DEFAULT_JSON_FILENAME.to_string());
        let json = export::to_json(&self.store.snapshot().rows)?;
        export::download(&filename, &json, export::JSON_MIME)?;
        Ok(())
    }
}

impl GridView {
    /// The underlying store, for Rust-side integration.
    pub fn store(&self) -> &GridStore {
        &self.store
    }

    fn current_window(&self) -> VisibleRange {
        let snapshot = self.store.snapshot();
        self.viewport.window(snapshot.scroll_top, snapshot.total_rows)
    }

    fn export_columns(&self) -> Vec<Column> {
        self.store.visible_columns().into_iter().cloned().collect()
    }
}
