//! Export of loaded rows.
//!
//! Produces CSV and JSON text from the rows a grid holds. Writing the text
//! somewhere (a file, a browser download) is the caller's job; on wasm32
//! [`download`] triggers a browser download.

mod csv;
mod format;

pub use self::csv::to_csv;
pub use format::format_cell_value;

use crate::error::Result;
use crate::types::Row;

/// Default file name for CSV exports.
pub const DEFAULT_CSV_FILENAME: &str = "grid-export.csv";
/// Default file name for JSON exports.
pub const DEFAULT_JSON_FILENAME: &str = "grid-export.json";

pub const CSV_MIME: &str = "text/csv;charset=utf-8;";
pub const JSON_MIME: &str = "application/json;charset=utf-8;";

/// Render `rows` as a two-space indented JSON array.
///
/// # Errors
/// Returns an error if a row cannot be serialized.
pub fn to_json(rows: &[Row]) -> Result<String> {
    Ok(serde_json::to_string_pretty(rows)?)
}

/// Offer `content` to the user as a file download.
///
/// Creates an object URL for a blob of `content`, clicks a hidden anchor
/// pointing at it, then removes the anchor and revokes the URL.
///
/// # Errors
/// Returns an error if there is no document or a DOM call fails.
#[cfg(target_arch = "wasm32")]
pub fn download(filename: &str, content: &str, mime: &str) -> Result<()> {
    use wasm_bindgen::JsCast;
    use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

    let js_err = |e: wasm_bindgen::JsValue| {
        crate::error::GridError::Other(format!("download failed: {e:?}"))
    };

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("download failed: no document")?;
    let body = document.body().ok_or("download failed: no body")?;

    let parts = js_sys::Array::of1(&wasm_bindgen::JsValue::from_str(content));
    let options = BlobPropertyBag::new();
    options.set_type(mime);
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options).map_err(js_err)?;
    let url = Url::create_object_url_with_blob(&blob).map_err(js_err)?;

    let link = document
        .create_element("a")
        .map_err(js_err)?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|_| "download failed: not an anchor")?;
    link.set_href(&url);
    link.set_download(filename);
    let _ = link.style().set_property("visibility", "hidden");
    body.append_child(&link).map_err(js_err)?;
    link.click();
    let _ = body.remove_child(&link);
    let _ = Url::revoke_object_url(&url);
    log::debug!("download: {filename} ({} bytes)", content.len());
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_to_json_indented() {
        let rows = vec![Row::new(1).with("name", "Ada")];
        let json = to_json(&rows).unwrap();
        assert_eq!(json, "[\n  {\n    \"id\": 1,\n    \"name\": \"Ada\"\n  }\n]");
    }

    #[test]
    fn test_to_json_empty() {
        assert_eq!(to_json(&[]).unwrap(), "[]");
    }
}
