use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Value domain a filter compares in.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum FilterType {
    #[default]
    Text,
    Number,
    Date,
    Select,
}

/// Comparison requested by a filter.
///
/// `Contains`/`StartsWith`/`EndsWith` are string containment, prefix and
/// suffix checks for text; the ordering operators compare numbers and dates;
/// `In` is membership in an array value. The grid only stores these, the
/// data source applies them.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    #[default]
    Equals,
    Contains,
    StartsWith,
    EndsWith,
    Gt,
    Lt,
    Gte,
    Lte,
    In,
}

/// Filter criterion for one field.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub field: String,
    #[serde(rename = "type")]
    pub filter_type: FilterType,
    pub operator: FilterOperator,
    pub value: Value,
}

impl FilterState {
    pub fn new(
        field: impl Into<String>,
        filter_type: FilterType,
        operator: FilterOperator,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            field: field.into(),
            filter_type,
            operator,
            value: value.into(),
        }
    }
}
