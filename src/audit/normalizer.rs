//! Input normalization.
//!
//! This module turns raw workbook rows into typed [`AttendanceRecord`]s and
//! [`ActivitySourceRecord`]s. Names are canonicalized so they join reliably;
//! dates and times are parsed into chrono values.
//!
//! The policy is permissive: a row with a blank name, an unparsable date or
//! an unparsable time is dropped silently. Nothing here returns an error.
//! Only aggregate kept/dropped counts are logged.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::{debug, warn};

use crate::config::{ActivityColumns, AttendanceColumns};
use crate::models::{ActivitySourceRecord, AttendanceRecord, SourceCategory};
use crate::workbook::{CellValue, Sheet};

/// Strict time-of-day format.
pub const TIME_FORMAT: &str = "%H:%M:%S";

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%b-%Y"];

const DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
];

/// Largest serial number Excel accepts (9999-12-31).
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

/// Canonicalizes a person's name into a join key.
///
/// Uppercases, trims, and collapses every run of internal whitespace into a
/// single space.
///
/// # Example
///
/// ```
/// use attendance_audit::audit::normalize_name;
///
/// assert_eq!(normalize_name("  Jane \t  Doe "), "JANE DOE");
/// ```
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Normalizes a name cell, returning `None` when it is blank.
pub fn parse_name(cell: &CellValue) -> Option<String> {
    let name = normalize_name(&cell.as_text()?);
    if name.is_empty() { None } else { Some(name) }
}

/// Parses a time-of-day cell.
///
/// Text must match `HH:MM:SS` exactly. Typed spreadsheet time cells
/// contribute their time of day. Anything else is missing; a bad value is
/// never coerced to midnight.
///
/// # Example
///
/// ```
/// use attendance_audit::audit::parse_time;
/// use attendance_audit::workbook::CellValue;
/// use chrono::NaiveTime;
///
/// assert_eq!(
///     parse_time(&CellValue::Text("07:30:00".to_string())),
///     NaiveTime::from_hms_opt(7, 30, 0)
/// );
/// assert_eq!(parse_time(&CellValue::Text("07:30".to_string())), None);
/// ```
pub fn parse_time(cell: &CellValue) -> Option<NaiveTime> {
    match cell {
        CellValue::Text(s) => NaiveTime::parse_from_str(s.trim(), TIME_FORMAT).ok(),
        CellValue::DateTime(dt) => Some(dt.time()),
        _ => None,
    }
}

/// Parses a date cell, best-effort.
///
/// Accepts typed date cells, Excel serial numbers, ISO and slash-separated
/// dates, month-first US dates, `10-Jan-2024` style dates, and date-times
/// whose time part is discarded.
pub fn parse_date(cell: &CellValue) -> Option<NaiveDate> {
    match cell {
        CellValue::DateTime(dt) => Some(dt.date()),
        CellValue::Number(n) => excel_serial_to_date(*n),
        CellValue::Text(s) => parse_date_text(s.trim()),
        _ => None,
    }
}

fn parse_date_text(s: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 || serial > MAX_EXCEL_SERIAL {
        return None;
    }
    let days = serial.floor() as i64;
    // Excel counts a nonexistent 1900-02-29 as serial 60, so serials after
    // it are one day ahead of a plain count from 1899-12-31.
    let epoch = match days {
        60 => return None,
        d if d < 60 => NaiveDate::from_ymd_opt(1899, 12, 31)?,
        _ => NaiveDate::from_ymd_opt(1899, 12, 30)?,
    };
    epoch.checked_add_signed(Duration::days(days))
}

fn require_columns<const N: usize>(sheet: &Sheet, names: [&str; N]) -> Option<[usize; N]> {
    let mut indices = [0usize; N];
    for (slot, name) in indices.iter_mut().zip(names) {
        match sheet.column(name) {
            Some(index) => *slot = index,
            None => {
                warn!(sheet = %sheet.name, column = name, "Required column missing; sheet contributes no rows");
                return None;
            }
        }
    }
    Some(indices)
}

/// Normalizes the attendance sheet.
///
/// Rows missing a name, date, IN or OUT value are dropped. When the same
/// (person, date) appears more than once, the first row wins.
pub fn normalize_attendance(sheet: &Sheet, columns: &AttendanceColumns) -> Vec<AttendanceRecord> {
    let Some([name_col, date_col, in_col, out_col]) = require_columns(
        sheet,
        [
            columns.name.as_str(),
            columns.date.as_str(),
            columns.shift_in.as_str(),
            columns.shift_out.as_str(),
        ],
    ) else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(sheet.len());
    let mut incomplete = 0usize;
    let mut duplicates = 0usize;

    for row in 0..sheet.len() {
        let parsed = (|| {
            Some(AttendanceRecord {
                person_id: parse_name(sheet.cell(row, name_col))?,
                date: parse_date(sheet.cell(row, date_col))?,
                shift_in: parse_time(sheet.cell(row, in_col))?,
                shift_out: parse_time(sheet.cell(row, out_col))?,
            })
        })();

        match parsed {
            Some(record) if seen.insert(record.key()) => records.push(record),
            Some(_) => duplicates += 1,
            None => incomplete += 1,
        }
    }

    debug!(
        sheet = %sheet.name,
        rows = sheet.len(),
        kept = records.len(),
        incomplete,
        duplicates,
        "Normalized attendance"
    );

    records
}

/// Normalizes one activity report sheet, tagging every row with `category`.
///
/// Rows missing a name, date or time are dropped.
pub fn normalize_activity(
    sheet: &Sheet,
    columns: &ActivityColumns,
    category: SourceCategory,
) -> Vec<ActivitySourceRecord> {
    let Some([name_col, date_col, time_col]) = require_columns(
        sheet,
        [
            columns.name.as_str(),
            columns.date.as_str(),
            columns.time.as_str(),
        ],
    ) else {
        return Vec::new();
    };

    let records: Vec<ActivitySourceRecord> = (0..sheet.len())
        .filter_map(|row| {
            Some(ActivitySourceRecord {
                person_id: parse_name(sheet.cell(row, name_col))?,
                date: parse_date(sheet.cell(row, date_col))?,
                activity_time: parse_time(sheet.cell(row, time_col))?,
                source_tag: category,
            })
        })
        .collect();

    debug!(
        sheet = %sheet.name,
        rows = sheet.len(),
        kept = records.len(),
        dropped = sheet.len() - records.len(),
        "Normalized activity"
    );

    records
}
