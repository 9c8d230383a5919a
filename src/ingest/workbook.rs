//! Workbook reading via calamine.
//!
//! Only the first sheet is read, whatever its name. Its first non-blank
//! row holds the headers; every following non-blank row becomes a
//! [`RawRow`].

use super::headers;
use super::{IngestError, MetasSource, RawRow, RawValue};
use calamine::{open_workbook_auto, Data, Reader};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Placeholder name given to blank header cells.
const EMPTY_HEADER: &str = "__EMPTY";

/// A spreadsheet file on disk (xlsx, xls, xlsb or ods).
#[derive(Debug, Clone)]
pub struct WorkbookSource {
    path: PathBuf,
    name: String,
}

impl WorkbookSource {
    /// Create a source for the workbook at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name }
    }

    /// Path of the workbook.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MetasSource for WorkbookSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<Vec<RawRow>, IngestError> {
        info!("Reading workbook: {}", self.path.display());

        if !self.path.exists() {
            return Err(IngestError::NotFound(self.path.clone()));
        }

        let mut workbook = open_workbook_auto(&self.path).map_err(|source| IngestError::Open {
            path: self.path.clone(),
            source,
        })?;

        let sheet_names = workbook.sheet_names();
        debug!("Available sheets: {:?}", sheet_names);

        let sheet = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| IngestError::NoSheets(self.path.clone()))?;
        info!("Using sheet: {}", sheet);

        let range = workbook
            .worksheet_range(&sheet)
            .map_err(|source| IngestError::Sheet {
                sheet: sheet.clone(),
                source,
            })?;

        let rows = rows_from_grid(range.rows());
        info!("Rows found: {}", rows.len());

        Ok(rows)
    }
}

/// Convert a cell grid into header-keyed rows.
pub fn rows_from_grid<'a, I>(grid: I) -> Vec<RawRow>
where
    I: IntoIterator<Item = &'a [Data]>,
{
    let mut grid = grid.into_iter().skip_while(|cells| is_blank(cells));

    let header_cells = match grid.next() {
        Some(cells) => cells,
        None => return Vec::new(),
    };
    let header_names = unique_headers(header_cells);

    let preview: Vec<&str> = header_names.iter().take(10).map(String::as_str).collect();
    debug!("Columns detected: {}...", preview.join(", "));
    if !header_names.iter().any(|h| headers::is_recognized(h)) {
        warn!("No recognized columns in header row; every meta will use default values");
    }

    grid.filter(|cells| !is_blank(cells))
        .map(|cells| {
            header_names
                .iter()
                .zip(cells.iter())
                .filter_map(|(name, cell)| cell_value(cell).map(|v| (name.clone(), v)))
                .collect()
        })
        .collect()
}

/// Header names with blanks named `__EMPTY` and repeats suffixed `_1`, `_2`, …
fn unique_headers(cells: &[Data]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();

    cells
        .iter()
        .map(|cell| {
            let base = match cell {
                Data::Empty => EMPTY_HEADER.to_string(),
                other => match other.to_string() {
                    s if s.is_empty() => EMPTY_HEADER.to_string(),
                    s => s,
                },
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base
            } else {
                format!("{}_{}", base, count)
            };
            *count += 1;
            name
        })
        .collect()
}

fn cell_value(cell: &Data) -> Option<RawValue> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => Some(RawValue::Text(s.clone())),
        Data::Float(f) => Some(RawValue::Number(*f)),
        Data::Int(i) => Some(RawValue::Number(*i as f64)),
        Data::Bool(b) => Some(RawValue::Bool(*b)),
        other => Some(RawValue::Text(other.to_string())),
    }
}

fn is_blank(cells: &[Data]) -> bool {
    cells.iter().all(|c| matches!(c, Data::Empty))
}
