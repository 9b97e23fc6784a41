//! Display strings for cell values.

use serde_json::{Number, Value};

use crate::types::{Column, ColumnType};

/// Display string of `value` in `column`.
///
/// Missing and null values are empty. A column's renderer hook wins over
/// type-based formatting. Number columns group thousands with up to three
/// fraction digits (`1234567.891` → `1,234,567.891`), boolean columns show
/// `Yes`/`No` by truthiness, everything else is the plain string form.
pub fn format_cell_value(value: Option<&Value>, column: &Column) -> String {
    let Some(value) = value.filter(|v| !v.is_null()) else {
        return String::new();
    };

    if let Some(renderer) = &column.cell_renderer {
        return renderer.render(value);
    }

    match column.column_type {
        ColumnType::Number => match value {
            Value::Number(n) => n.as_f64().map_or_else(|| n.to_string(), group_thousands),
            other => plain_string(other),
        },
        ColumnType::Boolean => {
            if is_truthy(value) {
                "Yes".to_string()
            } else {
                "No".to_string()
            }
        }
        ColumnType::Text | ColumnType::Date | ColumnType::Select => plain_string(value),
    }
}

/// String form of a JSON value: strings unquoted, integral floats without a
/// trailing `.0`, arrays comma-joined.
pub(crate) fn plain_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_string(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(plain_string)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn number_string(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => (f as i64).to_string(),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// `1234567.8915` → `1,234,567.892`
fn group_thousands(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let formatted = format!("{:.3}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 5);
    if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        grouped.push('-');
    }
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if !frac_part.is_empty() {
        grouped.push('.');
        grouped.push_str(frac_part);
    }
    grouped
}
