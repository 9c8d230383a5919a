//! Spreadsheet ingestion.
//!
//! Raw rows come from a [`MetasSource`] as header → cell maps; the
//! resolver and normalizer turn each one into a canonical [`crate::models::Meta`].

pub mod headers;
pub mod normalizer;
pub mod resolver;
pub mod workbook;

pub use normalizer::{normalize_row, normalize_rows};
pub use workbook::WorkbookSource;

use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

/// A raw cell value as read from the sheet. Empty cells are absent from
/// the row rather than represented here.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl RawValue {
    /// Whether the value counts as "present" when walking a candidate list.
    ///
    /// Empty text, zero, NaN and `false` do not; the text `"0"` does.
    pub fn is_truthy(&self) -> bool {
        match self {
            RawValue::Text(s) => !s.is_empty(),
            RawValue::Number(n) => *n != 0.0 && !n.is_nan(),
            RawValue::Bool(b) => *b,
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Bool(b)
    }
}

/// One sheet row: column header → cell value.
pub type RawRow = HashMap<String, RawValue>;

/// Errors raised while reading the source spreadsheet.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("source file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to open workbook {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        source: calamine::Error,
    },

    #[error("workbook {} has no sheets", .0.display())]
    NoSheets(PathBuf),

    #[error("failed to read sheet '{sheet}': {source}")]
    Sheet {
        sheet: String,
        source: calamine::Error,
    },
}

/// Anything that can yield the raw rows of the first sheet.
pub trait MetasSource: Send + Sync {
    /// Name reported in snapshot metadata.
    fn name(&self) -> &str;

    /// Read every row. Called once per population attempt.
    fn load(&self) -> Result<Vec<RawRow>, IngestError>;
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Build a row from `(header, value)` pairs.
    pub fn row<V: Into<RawValue> + Clone>(cells: &[(&str, V)]) -> RawRow {
        cells
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone().into()))
            .collect()
    }
}
