//! CSV directory workbook reader.
//!
//! Each `<sheet name>.csv` file in a directory becomes one sheet; the file
//! stem is the sheet name, so `DATA ABSEN.csv` yields the `DATA ABSEN` sheet.

use std::fs;
use std::path::Path;

use crate::error::{AuditError, AuditResult};

use super::{CellValue, Sheet, Workbook};

/// Reads every `.csv` file in `dir` as a sheet.
///
/// Sheets are ordered by file name so repeated reads are deterministic.
/// All non-blank fields are read as text.
pub fn read_csv_dir<P: AsRef<Path>>(dir: P) -> AuditResult<Workbook> {
    let dir = dir.as_ref();
    let source_name = dir.display().to_string();
    let read_error = |message: String| AuditError::WorkbookRead {
        source_name: source_name.clone(),
        message,
    };

    let entries = fs::read_dir(dir).map_err(|e| read_error(e.to_string()))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| read_error(e.to_string()))?.path();
        if path.extension().is_some_and(|ext| ext == "csv") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut sheets = Vec::with_capacity(paths.len());
    for path in paths {
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&path)
            .map_err(|e| read_error(format!("{}: {}", path.display(), e)))?;

        let headers = reader
            .headers()
            .map_err(|e| read_error(format!("{}: {}", path.display(), e)))?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| read_error(format!("{}: {}", path.display(), e)))?;
            rows.push(record.iter().map(CellValue::text).collect());
        }

        sheets.push(Sheet {
            name,
            headers,
            rows,
        });
    }

    Ok(Workbook::new(sheets))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_one_sheet_per_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("DATA ABSEN.csv"),
            "Nama,Tanggal,IN,OUT\nJane Doe,2024-01-10,08:00:00,17:00:00\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("Report Return.csv"),
            "AuthName,TRXDATE,CreateTim\njane doe,2024-01-10,,\n",
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let workbook = read_csv_dir(dir.path()).unwrap();

        assert_eq!(workbook.sheet_names(), vec!["DATA ABSEN", "Report Return"]);

        let absen = workbook.sheet("DATA ABSEN").unwrap();
        assert_eq!(absen.headers, vec!["Nama", "Tanggal", "IN", "OUT"]);
        assert_eq!(absen.cell(0, 0), &CellValue::Text("Jane Doe".to_string()));

        let returns = workbook.sheet("Report Return").unwrap();
        assert_eq!(returns.cell(0, 2), &CellValue::Empty);
    }

    #[test]
    fn test_missing_directory_is_a_read_error() {
        let result = read_csv_dir("/nonexistent/workbook");
        assert!(matches!(result, Err(AuditError::WorkbookRead { .. })));
    }
}
