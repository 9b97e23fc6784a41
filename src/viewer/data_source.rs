//! Data source backed by a JS function returning a promise.

use std::future::Future;

use js_sys::{Function, Promise};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

use super::{from_js, to_js};
use crate::error::{GridError, Result};
use crate::fetch::DataSource;
use crate::types::{DataSourceParams, DataSourceResult};

/// Calls `source(params)` and awaits the `{ rows, totalRows }` it resolves to.
/// A plain (non-promise) return value is accepted too.
pub(crate) struct JsDataSource {
    function: Function,
}

impl JsDataSource {
    pub(crate) fn new(function: Function) -> Self {
        Self { function }
    }
}

fn js_error(e: &JsValue) -> GridError {
    GridError::DataSource(e.as_string().unwrap_or_else(|| format!("{e:?}")))
}

impl DataSource for JsDataSource {
    fn fetch(&self, params: DataSourceParams) -> impl Future<Output = Result<DataSourceResult>> {
        let function = self.function.clone();
        async move {
            let js_params = to_js(&params).map_err(|e| js_error(&e))?;
            let returned = function
                .call1(&JsValue::NULL, &js_params)
                .map_err(|e| js_error(&e))?;
            let resolved = JsFuture::from(Promise::resolve(&returned))
                .await
                .map_err(|e| js_error(&e))?;
            from_js(resolved).map_err(|e| js_error(&e))
        }
    }
}
