//! Error types for the Attendance Audit Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for the conditions that abort an audit run. Row-level data problems are
//! deliberately absent: malformed rows are filtered out by the normalizer
//! and never surface as errors.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the Attendance Audit Engine.
///
/// # Example
///
/// ```
/// use attendance_audit::error::AuditError;
///
/// let error = AuditError::MissingSheet {
///     sheet: "DATA ABSEN".to_string(),
/// };
/// assert_eq!(error.to_string(), "Required sheet not found: DATA ABSEN");
/// ```
#[derive(Debug, Error)]
pub enum AuditError {
    /// The attendance sheet is absent from the workbook.
    #[error("Required sheet not found: {sheet}")]
    MissingSheet {
        /// The name of the sheet that was expected.
        sheet: String,
    },

    /// The audit period starts after it ends.
    #[error("Invalid audit period: {start} is after {end}")]
    InvalidPeriod {
        /// The requested start date.
        start: NaiveDate,
        /// The requested end date.
        end: NaiveDate,
    },

    /// The workbook could not be read.
    #[error("Failed to read workbook '{source_name}': {message}")]
    WorkbookRead {
        /// The file, directory or upload the workbook came from.
        source_name: String,
        /// A description of the read failure.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Login failed or the request carried no valid session.
    #[error("Unauthorized: {reason}")]
    Unauthorized {
        /// Why the request was rejected.
        reason: String,
    },

    /// The run was cancelled before it completed.
    #[error("Audit run was cancelled")]
    Cancelled,

    /// A report export (PDF or CSV) failed.
    #[error("Report rendering failed: {message}")]
    ReportRender {
        /// A description of the rendering failure.
        message: String,
    },
}

/// A type alias for Results that return AuditError.
pub type AuditResult<T> = Result<T, AuditError>;
