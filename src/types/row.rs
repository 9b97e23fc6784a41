use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Row identifier, unique within the currently loaded set.
///
/// JSON numbers that are whole and fit in an `i64` become `Number`; any
/// other number (fractional, or beyond the `i64` range) becomes `Float`.
/// Floats compare by bit pattern, so the type stays totally ordered and
/// usable as a set key. Numeric ids sort by value, whole numbers before an
/// equal float, and all numeric ids sort before text ids.
#[derive(Debug, Serialize, Clone)]
#[serde(untagged)]
pub enum RowId {
    Number(i64),
    Float(f64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRowId {
    Number(i64),
    Float(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for RowId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawRowId::deserialize(deserializer)? {
            RawRowId::Number(n) => Self::Number(n),
            RawRowId::Float(x) => Self::from(x),
            RawRowId::Text(s) => Self::Text(s),
        })
    }
}

impl RowId {
    fn rank(&self) -> u8 {
        match self {
            Self::Number(_) => 0,
            Self::Float(_) => 1,
            Self::Text(_) => 2,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn numeric(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n as f64),
            Self::Float(x) => Some(*x),
            Self::Text(_) => None,
        }
    }
}

impl PartialEq for RowId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Text(a), Self::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for RowId {}

impl Hash for RowId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Self::Number(n) => n.hash(state),
            Self::Float(x) => x.to_bits().hash(state),
            Self::Text(s) => s.hash(state),
        }
    }
}

impl Ord for RowId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            _ => match (self.numeric(), other.numeric()) {
                (Some(a), Some(b)) => a
                    .total_cmp(&b)
                    .then_with(|| self.rank().cmp(&other.rank())),
                _ => self.rank().cmp(&other.rank()),
            },
        }
    }
}

impl PartialOrd for RowId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for RowId {
    #[allow(clippy::cast_possible_truncation)]
    fn from(x: f64) -> Self {
        // 2^63, the first whole float past i64::MAX
        const LIMIT: f64 = 9_223_372_036_854_775_808.0;
        if x.fract() == 0.0 && (-LIMIT..LIMIT).contains(&x) {
            Self::Number(x as i64)
        } else {
            Self::Float(x)
        }
    }
}

impl From<i64> for RowId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for RowId {
    fn from(n: i32) -> Self {
        Self::Number(i64::from(n))
    }
}

impl From<u32> for RowId {
    fn from(n: u32) -> Self {
        Self::Number(i64::from(n))
    }
}

impl From<usize> for RowId {
    fn from(n: usize) -> Self {
        Self::Number(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<&str> for RowId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for RowId {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// One record of the grid: an id plus an open map of field values.
///
/// Serialized flat, so `{"id": 1, "name": "Ada"}` round-trips.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Row {
    pub id: RowId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Row {
    pub fn new(id: impl Into<RowId>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    /// Builder-style field insert.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Value of `field`, or `None` when the row does not carry it.
    ///
    /// `"id"` resolves to the row id so an id column can be exported.
    pub fn get(&self, field: &str) -> Option<Value> {
        if let Some(v) = self.fields.get(field) {
            return Some(v.clone());
        }
        if field == "id" {
            return serde_json::to_value(&self.id).ok();
        }
        None
    }
}
