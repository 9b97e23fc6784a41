//! Column layout: initial ordering and frozen panes, and the resolved
//! left/scrollable/right partition with pixel offsets.

use std::collections::HashMap;

use serde::Serialize;

use crate::types::{Column, FrozenSide, GridState};

/// Column layout derived from configuration.
///
/// Built once at construction. Frozen membership has no runtime mutator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnLayout {
    /// Column ids in configured order
    pub order: Vec<String>,
    pub frozen_left: Vec<String>,
    pub frozen_right: Vec<String>,
}

impl ColumnLayout {
    pub fn from_columns(columns: &[Column]) -> Self {
        let ids_where = |side: FrozenSide| -> Vec<String> {
            columns
                .iter()
                .filter(|c| c.frozen == side)
                .map(|c| c.id.clone())
                .collect()
        };
        Self {
            order: columns.iter().map(|c| c.id.clone()).collect(),
            frozen_left: ids_where(FrozenSide::Left),
            frozen_right: ids_where(FrozenSide::Right),
        }
    }
}

/// A column placed in one of the three panes.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedColumn {
    pub id: String,
    /// Index into the configured column list
    pub index: usize,
    pub width: f64,
    /// Left edge relative to the start of its pane
    pub offset: f64,
}

/// Render-ready column placement for one snapshot.
#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct ResolvedLayout {
    pub left: Vec<ResolvedColumn>,
    pub center: Vec<ResolvedColumn>,
    pub right: Vec<ResolvedColumn>,
}

impl ResolvedLayout {
    /// Place the configured columns for `state`.
    ///
    /// Follows `column_order`; hidden columns and ids that are not configured
    /// are skipped, and configured columns missing from `column_order` are not
    /// shown. Widths come from `column_widths`, then the column's own width.
    pub fn resolve(state: &GridState, columns: &[Column]) -> Self {
        let by_id: HashMap<&str, (usize, &Column)> = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id.as_str(), (i, c)))
            .collect();

        let mut layout = Self::default();
        for id in state.column_order.iter() {
            let Some(&(index, column)) = by_id.get(id.as_str()) else {
                continue;
            };
            if column.hide {
                continue;
            }
            let width = column.effective_width(state.column_widths.get(id).copied());
            let pane = if state.frozen_left_columns.contains(id) {
                &mut layout.left
            } else if state.frozen_right_columns.contains(id) {
                &mut layout.right
            } else {
                &mut layout.center
            };
            let offset = pane.last().map_or(0.0, |c| c.offset + c.width);
            pane.push(ResolvedColumn {
                id: id.clone(),
                index,
                width,
                offset,
            });
        }
        layout
    }

    pub fn frozen_left_width(&self) -> f64 {
        pane_width(&self.left)
    }

    pub fn frozen_right_width(&self) -> f64 {
        pane_width(&self.right)
    }

    pub fn scrollable_width(&self) -> f64 {
        pane_width(&self.center)
    }

    pub fn total_width(&self) -> f64 {
        self.frozen_left_width() + self.scrollable_width() + self.frozen_right_width()
    }

    /// All placed columns, left pane first.
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedColumn> {
        self.left.iter().chain(&self.center).chain(&self.right)
    }

    /// Index range into `center` of the scrollable columns intersecting a
    /// horizontal viewport of `width` pixels scrolled by `scroll_left`.
    pub fn visible_center(&self, scroll_left: f64, width: f64) -> std::ops::Range<usize> {
        let visible_width = (width - self.frozen_left_width() - self.frozen_right_width()).max(0.0);
        let left_edge = scroll_left.max(0.0);
        let right_edge = left_edge + visible_width;
        let start = self
            .center
            .partition_point(|c| c.offset + c.width <= left_edge);
        let end = self.center.partition_point(|c| c.offset < right_edge);
        start..end.max(start)
    }
}

fn pane_width(pane: &[ResolvedColumn]) -> f64 {
    pane.last().map_or(0.0, |c| c.offset + c.width)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::types::ColumnType;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("id", "id", "ID").with_type(ColumnType::Number).frozen(FrozenSide::Left),
            Column::new("name", "name", "Name"),
            Column::new("age", "age", "Age").with_type(ColumnType::Number),
            Column::new("notes", "notes", "Notes").hidden(),
            Column::new("actions", "actions", "").with_width(60.0).frozen(FrozenSide::Right),
        ]
    }

    #[test]
    fn test_from_columns() {
        let layout = ColumnLayout::from_columns(&columns());
        assert_eq!(layout.order, ["id", "name", "age", "notes", "actions"]);
        assert_eq!(layout.frozen_left, ["id"]);
        assert_eq!(layout.frozen_right, ["actions"]);
    }

    #[test]
    fn test_resolve_partitions_and_offsets() {
        let cols = columns();
        let state = GridState::new(&cols);
        let layout = ResolvedLayout::resolve(&state, &cols);

        assert_eq!(layout.left.len(), 1);
        assert_eq!(layout.right.len(), 1);
        let center: Vec<_> = layout.center.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(center, ["name", "age"]);
        assert_eq!(layout.center[1].offset, 150.0);
        assert_eq!(layout.frozen_left_width(), 120.0);
        assert_eq!(layout.frozen_right_width(), 60.0);
        assert_eq!(layout.total_width(), 120.0 + 270.0 + 60.0);
    }

    #[test]
    fn test_visible_center_range() {
        let cols = columns();
        let state = GridState::new(&cols);
        let layout = ResolvedLayout::resolve(&state, &cols);
        // 300px viewport minus 180px frozen leaves 120px of center
        assert_eq!(layout.visible_center(0.0, 300.0), 0..1);
        assert_eq!(layout.visible_center(100.0, 300.0), 0..2);
        assert_eq!(layout.visible_center(160.0, 300.0), 1..2);
    }
}
