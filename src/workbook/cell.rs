//! Spreadsheet cell values.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single cell as read from a workbook.
///
/// Readers keep as much type information as the source format carries:
/// xlsx produces typed numbers and date-times, CSV produces text only, and
/// JSON produces whatever JSON scalar was sent. The normalizer decides how
/// each value is interpreted.
///
/// In JSON, `null` is [`CellValue::Empty`] and plain strings are
/// [`CellValue::Text`]. Typed date-times are written as
/// `{"datetime": "2024-01-10T07:30:00"}` so they read back as typed cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// A blank cell.
    Empty,
    /// A boolean cell.
    Bool(bool),
    /// A numeric cell.
    Number(f64),
    /// A text cell.
    Text(String),
    /// A typed date, time or date-time cell.
    DateTime(#[serde(with = "tagged_datetime")] NaiveDateTime),
}

mod tagged_datetime {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Tagged {
        datetime: NaiveDateTime,
    }

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        Tagged { datetime: *value }.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        Tagged::deserialize(deserializer).map(|tagged| tagged.datetime)
    }
}

impl CellValue {
    /// Builds a text cell, mapping blank text to [`CellValue::Empty`].
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value)
        }
    }

    /// Renders the cell as text the way a spreadsheet would display it.
    ///
    /// Returns `None` for blank cells.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Bool(b) => Some(b.to_string()),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                Some(format!("{}", *n as i64))
            }
            CellValue::Number(n) => Some(n.to_string()),
            CellValue::Text(s) if s.trim().is_empty() => None,
            CellValue::Text(s) => Some(s.clone()),
            CellValue::DateTime(dt) => Some(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(value: NaiveDateTime) -> Self {
        CellValue::DateTime(value)
    }
}
