//! CSV serialization of loaded rows.

use super::format::format_cell_value;
use crate::types::{Column, Row};

/// Render `rows` as CSV with one column per entry of `columns`.
///
/// The first line holds the display names. Lines are joined with `\n` and
/// there is no trailing newline.
pub fn to_csv(rows: &[Row], columns: &[Column]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(
        columns
            .iter()
            .map(|c| escape_field(&c.header_name))
            .collect::<Vec<_>>()
            .join(","),
    );
    for row in rows {
        let line = columns
            .iter()
            .map(|col| {
                let value = row.get(&col.field);
                escape_field(&format_cell_value(value.as_ref(), col))
            })
            .collect::<Vec<_>>()
            .join(",");
        lines.push(line);
    }
    lines.join("\n")
}

/// Quote a field that contains a separator, a quote or a line break,
/// doubling embedded quotes.
pub(crate) fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
