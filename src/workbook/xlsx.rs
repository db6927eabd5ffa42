//! `.xlsx` workbook reader backed by `calamine`.

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

use calamine::{Data, Range, Reader, Xlsx};

use crate::error::{AuditError, AuditResult};

use super::{CellValue, Sheet, Workbook};

/// Reads every sheet of an `.xlsx` file.
///
/// The first row of each sheet is taken as the header row.
pub fn read_xlsx<P: AsRef<Path>>(path: P) -> AuditResult<Workbook> {
    let path = path.as_ref();
    let source_name = path.display().to_string();

    let file = File::open(path).map_err(|e| AuditError::WorkbookRead {
        source_name: source_name.clone(),
        message: e.to_string(),
    })?;

    read_from(BufReader::new(file), &source_name)
}

/// Reads every sheet of an `.xlsx` document held in memory, e.g. an upload.
pub fn read_xlsx_bytes(bytes: &[u8]) -> AuditResult<Workbook> {
    read_from(Cursor::new(bytes), "upload")
}

fn read_from<RS: Read + Seek>(reader: RS, source_name: &str) -> AuditResult<Workbook> {
    let read_error = |message: String| AuditError::WorkbookRead {
        source_name: source_name.to_string(),
        message,
    };

    let mut xlsx: Xlsx<RS> = Xlsx::new(reader).map_err(|e| read_error(e.to_string()))?;

    let mut sheets = Vec::new();
    for name in xlsx.sheet_names() {
        let range = xlsx
            .worksheet_range(&name)
            .map_err(|e| read_error(format!("sheet '{}': {}", name, e)))?;
        sheets.push(sheet_from_range(name, &range));
    }

    Ok(Workbook::new(sheets))
}

fn sheet_from_range(name: String, range: &Range<Data>) -> Sheet {
    let mut rows = range.rows();

    let headers = rows
        .next()
        .map(|header| {
            header
                .iter()
                .map(|cell| convert_cell(cell).as_text().unwrap_or_default())
                .collect()
        })
        .unwrap_or_default();

    let rows = rows
        .map(|row| row.iter().map(convert_cell).collect())
        .collect();

    Sheet {
        name,
        headers,
        rows,
    }
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::text(s.as_str()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(CellValue::DateTime)
            .unwrap_or(CellValue::Number(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::text(s.as_str()),
        _ => CellValue::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{ExcelDateTime, ExcelDateTimeType};
    use chrono::{NaiveDate, NaiveTime};

    #[test]
    fn test_convert_scalar_cells() {
        assert_eq!(convert_cell(&Data::Int(7)), CellValue::Number(7.0));
        assert_eq!(convert_cell(&Data::Float(0.5)), CellValue::Number(0.5));
        assert_eq!(
            convert_cell(&Data::String("Jane Doe".to_string())),
            CellValue::Text("Jane Doe".to_string())
        );
        assert_eq!(convert_cell(&Data::String("  ".to_string())), CellValue::Empty);
        assert_eq!(convert_cell(&Data::Empty), CellValue::Empty);
    }

    #[test]
    fn test_typed_time_cell_keeps_time_of_day() {
        let cell = Data::DateTime(ExcelDateTime::new(0.3125, ExcelDateTimeType::DateTime, false));

        match convert_cell(&cell) {
            CellValue::DateTime(dt) => {
                assert_eq!(dt.time(), NaiveTime::from_hms_opt(7, 30, 0).unwrap());
            }
            other => panic!("Expected a typed cell, got {:?}", other),
        }
    }

    #[test]
    fn test_typed_date_cell_keeps_date() {
        let cell = Data::DateTime(ExcelDateTime::new(45301.0, ExcelDateTimeType::DateTime, false));

        match convert_cell(&cell) {
            CellValue::DateTime(dt) => {
                assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
            }
            other => panic!("Expected a typed cell, got {:?}", other),
        }
    }

    #[test]
    fn test_fixture_workbook_reads_typed_cells() {
        let workbook = read_xlsx("tests/fixtures/scenario.xlsx").unwrap();

        assert_eq!(
            workbook.sheet_names(),
            vec!["DATA ABSEN", "Report Item Correct"]
        );
        let attendance = workbook.sheet("DATA ABSEN").unwrap();
        assert_eq!(attendance.headers, vec!["Nama", "Tanggal", "IN", "OUT"]);
        assert!(matches!(attendance.cell(0, 0), CellValue::Text(name) if name.trim() == "Jane Doe"));
        assert!(matches!(attendance.cell(0, 1), CellValue::DateTime(_)));
        assert_eq!(attendance.cell(0, 2), &CellValue::Text("08:00:00".to_string()));
        assert!(matches!(attendance.cell(1, 2), CellValue::DateTime(_)));
    }

    #[test]
    fn test_iso_datetime_cells_stay_text() {
        assert_eq!(
            convert_cell(&Data::DateTimeIso("2024-01-10T07:30:00".to_string())),
            CellValue::Text("2024-01-10T07:30:00".to_string())
        );
    }

    #[test]
    fn test_garbage_bytes_are_a_read_error() {
        let result = read_xlsx_bytes(b"definitely not a zip archive");
        match result {
            Err(AuditError::WorkbookRead { source_name, .. }) => {
                assert_eq!(source_name, "upload");
            }
            _ => panic!("Expected WorkbookRead error"),
        }
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let result = read_xlsx("/nonexistent/audit.xlsx");
        assert!(matches!(result, Err(AuditError::WorkbookRead { .. })));
    }
}
