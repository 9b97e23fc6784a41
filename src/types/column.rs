use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Value type of a column, used by formatting and default widths.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum ColumnType {
    #[default]
    Text,
    Number,
    Date,
    Boolean,
    Select,
}

/// Edge a column is pinned to, excluded from horizontal scroll.
///
/// Serialized as `"left"`, `"right"` or `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrozenSide {
    #[default]
    None,
    Left,
    Right,
}

impl Serialize for FrozenSide {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::None => serializer.serialize_bool(false),
            Self::Left => serializer.serialize_str("left"),
            Self::Right => serializer.serialize_str("right"),
        }
    }
}

impl<'de> Deserialize<'de> for FrozenSide {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Side(String),
        }

        match Option::<Raw>::deserialize(deserializer)? {
            None | Some(Raw::Flag(false)) => Ok(Self::None),
            Some(Raw::Side(side)) if side == "left" => Ok(Self::Left),
            Some(Raw::Side(side)) if side == "right" => Ok(Self::Right),
            Some(Raw::Side(side)) => Err(serde::de::Error::unknown_variant(
                &side,
                &["left", "right"],
            )),
            Some(Raw::Flag(true)) => Err(serde::de::Error::custom(
                "frozen must be \"left\", \"right\" or false",
            )),
        }
    }
}

/// Custom display hook for a column's cells, consulted by
/// [`format_cell_value`](crate::export::format_cell_value) before the
/// type-based formatting.
pub trait CellRenderer {
    fn render(&self, value: &serde_json::Value) -> String;
}

impl<F> CellRenderer for F
where
    F: Fn(&serde_json::Value) -> String,
{
    fn render(&self, value: &serde_json::Value) -> String {
        self(value)
    }
}

/// Column descriptor supplied once at construction.
///
/// Configuration is taken as-is: ids are not checked for uniqueness and
/// width bounds are not checked against each other.
#[derive(Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Unique key of the column
    pub id: String,
    /// Field of the row this column reads
    pub field: String,
    /// Display name (header label, CSV header)
    pub header_name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub min_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub max_width: Option<f64>,
    #[serde(default = "default_true")]
    pub resizable: bool,
    #[serde(default = "default_true")]
    pub sortable: bool,
    #[serde(default = "default_true")]
    pub filterable: bool,
    #[serde(rename = "type", default)]
    pub column_type: ColumnType,
    /// Choices for `Select` columns
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub frozen: FrozenSide,
    #[serde(default)]
    pub hide: bool,
    #[serde(default)]
    pub pinned: bool,
    #[serde(skip)]
    pub cell_renderer: Option<Arc<dyn CellRenderer>>,
}

fn default_true() -> bool {
    true
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("field", &self.field)
            .field("header_name", &self.header_name)
            .field("width", &self.width)
            .field("column_type", &self.column_type)
            .field("frozen", &self.frozen)
            .field("hide", &self.hide)
            .field("cell_renderer", &self.cell_renderer.is_some())
            .finish_non_exhaustive()
    }
}

impl Column {
    /// Create a text column with every flag at its default.
    pub fn new(id: impl Into<String>, field: impl Into<String>, header_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            field: field.into(),
            header_name: header_name.into(),
            width: None,
            min_width: None,
            max_width: None,
            resizable: true,
            sortable: true,
            filterable: true,
            column_type: ColumnType::Text,
            options: Vec::new(),
            frozen: FrozenSide::None,
            hide: false,
            pinned: false,
            cell_renderer: None,
        }
    }

    #[must_use]
    pub fn with_type(mut self, column_type: ColumnType) -> Self {
        self.column_type = column_type;
        self
    }

    #[must_use]
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    #[must_use]
    pub fn frozen(mut self, side: FrozenSide) -> Self {
        self.frozen = side;
        self
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.hide = true;
        self
    }

    #[must_use]
    pub fn with_renderer(mut self, renderer: impl CellRenderer + 'static) -> Self {
        self.cell_renderer = Some(Arc::new(renderer));
        self
    }

    pub fn is_resizable(&self) -> bool {
        self.resizable
    }

    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    pub fn is_filterable(&self) -> bool {
        self.filterable
    }

    /// Width to lay the column out at.
    ///
    /// An explicit `custom` width (from a user resize) wins, then the
    /// configured width, then a default by value type. Zero counts as unset.
    pub fn effective_width(&self, custom: Option<f64>) -> f64 {
        if let Some(w) = custom.filter(|w| *w != 0.0) {
            return w;
        }
        if let Some(w) = self.width.filter(|w| *w != 0.0) {
            return w;
        }
        match self.column_type {
            ColumnType::Boolean => 80.0,
            ColumnType::Number => 120.0,
            ColumnType::Date => 140.0,
            ColumnType::Text | ColumnType::Select => 150.0,
        }
    }
}
