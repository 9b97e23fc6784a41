//! datagrid - state engine for virtualized data grids
//!
//! Holds the state of a sortable, filterable, selectable grid and computes
//! what to render, with a thin WebAssembly surface for the browser:
//! - Immutable snapshots with structural sharing and ordered subscribers
//! - Virtual row windows with overscan for 100k+ row grids
//! - Column layout with frozen left/right panes and per-column widths
//! - Page fetching through a user data source, dropping stale responses
//! - CSV/JSON export
//!
//! # Usage (Rust)
//!
//! ```
//! use datagrid::{Column, GridStore, Row, SortDirection};
//!
//! let store = GridStore::new(vec![Column::new("name", "name", "Name")]);
//! store.set_rows(vec![Row::new(1).with("name", "Ada")]);
//! store.add_sort("name", SortDirection::Asc, false);
//! assert_eq!(store.snapshot().sort_state.len(), 1);
//! ```
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { GridView } from 'datagrid';
//! await init();
//! const grid = new GridView({ columns, rowHeight: 40 }, container.clientHeight);
//! grid.subscribe((state) => render(state, grid.visibleRange()));
//! await grid.fetchWindow(params => api.rows(params));
//! ```

pub mod error;
pub mod export;
pub mod fetch;
pub mod layout;
pub mod store;
pub mod timing;
pub mod types;

#[cfg(target_arch = "wasm32")]
pub mod viewer;

use wasm_bindgen::prelude::*;

pub use error::{GridError, Result};
pub use layout::{ColumnLayout, ResolvedLayout, RowViewport, VisibleRange};
pub use store::{GridStore, Subscription, SubscriptionId};
pub use types::*;

#[cfg(target_arch = "wasm32")]
pub use viewer::{ClickOutside, GridView};

/// Compute the visible row window for a scroll position.
///
/// Returns `{ startIndex, endIndex, offsetY }`. `overscan` defaults to 5.
///
/// # Errors
/// Returns an error if `row_height` is not a positive number.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = calculateVisibleRange)]
pub fn calculate_visible_range(
    scroll_top: f64,
    container_height: f64,
    row_height: f64,
    total_rows: usize,
    overscan: Option<u32>,
) -> std::result::Result<JsValue, JsValue> {
    let viewport = RowViewport::new(
        container_height,
        row_height,
        overscan.unwrap_or(layout::DEFAULT_OVERSCAN),
    )?;
    viewer::to_js(&viewport.window(scroll_top, total_rows))
}

/// Get the version of the library
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
