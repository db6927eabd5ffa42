//! Workbook input for the Attendance Audit Engine.
//!
//! A [`Workbook`] is an ordered set of named [`Sheet`]s, each a header row
//! plus data rows of [`CellValue`]s. Readers exist for `.xlsx` files (and
//! in-memory xlsx uploads), directories of per-sheet CSV files, and JSON
//! documents.
//!
//! # Example
//!
//! ```no_run
//! use attendance_audit::workbook::Workbook;
//!
//! let workbook = Workbook::open("./audit-january.xlsx").unwrap();
//! for name in workbook.sheet_names() {
//!     println!("{}", name);
//! }
//! ```

mod cell;
mod csv_dir;
mod xlsx;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AuditError, AuditResult};

pub use cell::CellValue;
pub use csv_dir::read_csv_dir;
pub use xlsx::{read_xlsx, read_xlsx_bytes};

static EMPTY_CELL: CellValue = CellValue::Empty;

/// A single named table: one header row and any number of data rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    /// The sheet name, matched exactly.
    pub name: String,
    /// Column headers in order.
    pub headers: Vec<String>,
    /// Data rows. Rows may be shorter than the header row; missing
    /// trailing cells read as [`CellValue::Empty`].
    #[serde(default)]
    pub rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    /// Creates a sheet from a name and header row.
    pub fn new(name: impl Into<String>, headers: &[&str]) -> Self {
        Self {
            name: name.into(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row and returns the sheet, for building fixtures.
    pub fn with_row(mut self, row: Vec<CellValue>) -> Self {
        self.rows.push(row);
        self
    }

    /// Returns the index of the column whose trimmed header equals `name`.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }

    /// Returns the cell at (`row`, `column`), or `Empty` when out of range.
    pub fn cell(&self, row: usize, column: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&EMPTY_CELL)
    }

    /// Returns the number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the sheet has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// An ordered collection of sheets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    /// The sheets, in workbook order.
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// Creates a workbook from sheets.
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    /// Opens a workbook from disk.
    ///
    /// - A directory is read as one CSV file per sheet.
    /// - A `.json` file is read as a serialized [`Workbook`].
    /// - Anything else is read as an `.xlsx` file.
    pub fn open<P: AsRef<Path>>(path: P) -> AuditResult<Self> {
        let path = path.as_ref();

        let workbook = if path.is_dir() {
            read_csv_dir(path)?
        } else if path.extension().is_some_and(|ext| ext == "json") {
            Self::read_json(path)?
        } else {
            read_xlsx(path)?
        };

        debug!(
            source = %path.display(),
            sheets = workbook.sheets.len(),
            "Opened workbook"
        );
        Ok(workbook)
    }

    fn read_json(path: &Path) -> AuditResult<Self> {
        let source_name = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|e| AuditError::WorkbookRead {
            source_name: source_name.clone(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| AuditError::WorkbookRead {
            source_name,
            message: e.to_string(),
        })
    }

    /// Looks a sheet up by exact name.
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Returns true if a sheet with this exact name exists.
    pub fn has_sheet(&self, name: &str) -> bool {
        self.sheet(name).is_some()
    }

    /// Returns the sheet names in workbook order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}
