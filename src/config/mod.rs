//! Configuration loading and management for the Attendance Audit Engine.
//!
//! This module loads the audit configuration from a YAML file: the workbook
//! layout (sheet and column names), login credentials, report settings and
//! server settings.
//!
//! # Example
//!
//! ```no_run
//! use attendance_audit::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/audit.yaml").unwrap();
//! println!("Top offenders shown: {}", config.config().report.top_offenders);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    ActivityColumns, AttendanceColumns, AuditConfig, AuthConfig, ReportConfig, ServerConfig,
    WorkbookLayout,
};
