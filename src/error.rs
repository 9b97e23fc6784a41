//! Structured error types for datagrid.
//!
//! The store's action API is total and never returns these. They surface from
//! the fallible edges: JSON I/O, export, viewport construction, and data
//! sources.

/// All errors that can occur outside the grid state engine.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// JSON (de)serialization error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Row height must be a positive, finite number of pixels.
    #[error("Invalid row height: {0} (must be > 0)")]
    InvalidRowHeight(f64),

    /// The data source failed to produce a page of rows.
    #[error("Data source: {0}")]
    DataSource(String),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

impl From<String> for GridError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for GridError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
