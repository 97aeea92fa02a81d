use std::collections::BTreeMap;

/// One cell of a raw or derived record.
///
/// Dates travel as ISO-8601 text; the hosted API and the local CSV reader
/// both produce them that way.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Missing,
}

impl CellValue {
    /// Trimmed text content, `None` for missing or blank cells.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(value) => {
                let trimmed = value.trim();
                (!trimmed.is_empty()).then_some(trimmed)
            }
            _ => None,
        }
    }

    /// Numeric content; numeric-looking text parses too.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(value) => Some(*value),
            CellValue::Text(value) => value.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Number(value) if value.fract() == 0.0 => Some(*value as i64),
            CellValue::Text(value) => value.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Bool(value) => Some(*value),
            CellValue::Text(value) => match value.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" | "checked" => Some(true),
                "false" | "no" | "0" => Some(false),
                _ => None,
            },
            CellValue::Number(value) => match *value {
                v if v == 1.0 => Some(true),
                v if v == 0.0 => Some(false),
                _ => None,
            },
            CellValue::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Missing => true,
            CellValue::Text(value) => value.trim().is_empty(),
            _ => false,
        }
    }

    /// Render for CSV output. Whole numbers drop the trailing `.0`.
    pub fn render(&self) -> String {
        match self {
            CellValue::Text(value) => value.clone(),
            CellValue::Number(value) if value.fract() == 0.0 => {
                format!("{}", *value as i64)
            }
            CellValue::Number(value) => format!("{value}"),
            CellValue::Bool(value) => value.to_string(),
            CellValue::Missing => String::new(),
        }
    }
}

impl From<Option<String>> for CellValue {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(text) => CellValue::Text(text),
            None => CellValue::Missing,
        }
    }
}

/// A raw or derived row: field name to cell value.
///
/// Fields absent from the map read as [`CellValue::Missing`].
pub type Record = BTreeMap<String, CellValue>;

/// Trimmed text of a field, `None` when absent or blank.
pub fn field_text(record: &Record, field: &str) -> Option<String> {
    record
        .get(field)
        .and_then(CellValue::as_text)
        .map(str::to_string)
}

pub fn field_f64(record: &Record, field: &str) -> Option<f64> {
    record.get(field).and_then(CellValue::as_f64)
}

pub fn field_i64(record: &Record, field: &str) -> Option<i64> {
    record.get(field).and_then(CellValue::as_i64)
}

pub fn field_bool(record: &Record, field: &str) -> Option<bool> {
    record.get(field).and_then(CellValue::as_bool)
}

/// True when the field is absent, null, or blank text.
pub fn field_missing(record: &Record, field: &str) -> bool {
    record.get(field).is_none_or(CellValue::is_missing)
}
