//! Configuration types for attendance audits.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML configuration file. Every section has a
//! default matching the standard audit workbook, so a partial file (or no
//! file at all) is valid.

use serde::{Deserialize, Serialize};

/// Column names of the attendance sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttendanceColumns {
    /// Employee name column.
    pub name: String,
    /// Attendance date column.
    pub date: String,
    /// Clock-in time column.
    pub shift_in: String,
    /// Clock-out time column.
    pub shift_out: String,
}

impl Default for AttendanceColumns {
    fn default() -> Self {
        Self {
            name: "Nama".to_string(),
            date: "Tanggal".to_string(),
            shift_in: "IN".to_string(),
            shift_out: "OUT".to_string(),
        }
    }
}

/// Column names shared by every activity report sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityColumns {
    /// Name of the user who performed the action.
    pub name: String,
    /// Transaction date column.
    pub date: String,
    /// Creation time column.
    pub time: String,
}

impl Default for ActivityColumns {
    fn default() -> Self {
        Self {
            name: "AuthName".to_string(),
            date: "TRXDATE".to_string(),
            time: "CreateTim".to_string(),
        }
    }
}

/// Where the engine finds its input inside a workbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkbookLayout {
    /// Name of the required attendance sheet.
    pub attendance_sheet: String,
    /// Attendance sheet columns.
    pub attendance_columns: AttendanceColumns,
    /// Activity sheet columns.
    pub activity_columns: ActivityColumns,
}

impl Default for WorkbookLayout {
    fn default() -> Self {
        Self {
            attendance_sheet: "DATA ABSEN".to_string(),
            attendance_columns: AttendanceColumns::default(),
            activity_columns: ActivityColumns::default(),
        }
    }
}

/// Login credentials accepted by the HTTP service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// The accepted username.
    pub username: String,
    /// The accepted password.
    pub password: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: "useraudit".to_string(),
            password: "user123".to_string(),
        }
    }
}

/// Settings for the generated report document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Main title printed in the header band.
    pub title: String,
    /// Subtitle printed under the title.
    pub subtitle: String,
    /// Number of offenders listed in the ranking table.
    pub top_offenders: usize,
    /// Distance from the top edge, in millimetres, after which a detail
    /// row starts a new page.
    pub page_break_mm: f32,
    /// Height of one detail row in millimetres.
    pub row_height_mm: f32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: "OFFICIAL AUDIT REPORT".to_string(),
            subtitle: "LAPORAN ANALISIS AKTIVITAS DI LUAR JAM KERJA".to_string(),
            top_offenders: 5,
            page_break_mm: 180.0,
            row_height_mm: 8.0,
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the service binds to.
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

/// The complete audit configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Workbook layout.
    pub workbook: WorkbookLayout,
    /// Login credentials.
    pub auth: AuthConfig,
    /// Report settings.
    pub report: ReportConfig,
    /// Server settings.
    pub server: ServerConfig,
}
