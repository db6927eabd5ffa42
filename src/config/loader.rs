//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the audit
//! configuration from a YAML file.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{AuditError, AuditResult};

use super::types::AuditConfig;

/// Loads and provides access to the audit configuration.
///
/// # Example
///
/// ```no_run
/// use attendance_audit::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/audit.yaml").unwrap();
/// println!("Attendance sheet: {}", loader.config().workbook.attendance_sheet);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: AuditConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified YAML file.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - The file is missing (`ConfigNotFound`)
    /// - The file contains invalid YAML (`ConfigParseError`)
    pub fn load<P: AsRef<Path>>(path: P) -> AuditResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| AuditError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        let loader = Self::from_yaml_str(&content).map_err(|e| match e {
            AuditError::ConfigParseError { message, .. } => AuditError::ConfigParseError {
                path: path_str.clone(),
                message,
            },
            other => other,
        })?;

        debug!(path = %path_str, "Loaded audit configuration");
        Ok(loader)
    }

    /// Parses configuration from YAML text.
    ///
    /// Missing sections and fields fall back to their defaults.
    pub fn from_yaml_str(content: &str) -> AuditResult<Self> {
        // An empty document deserializes as unit, not as a mapping.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config =
            serde_yaml::from_str::<AuditConfig>(content).map_err(|e| {
                AuditError::ConfigParseError {
                    path: "<inline>".to_string(),
                    message: e.to_string(),
                }
            })?;

        Ok(Self { config })
    }

    /// Loads the file at `path` when given, otherwise returns the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> AuditResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: AuditConfig) -> Self {
        Self { config }
    }

    /// Returns the underlying audit configuration.
    pub fn config(&self) -> &AuditConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_path() -> &'static str {
        "./config/audit.yaml"
    }

    #[test]
    fn test_load_shipped_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        let config = loader.config();
        assert_eq!(config.workbook.attendance_sheet, "DATA ABSEN");
        assert_eq!(config.workbook.attendance_columns.name, "Nama");
        assert_eq!(config.workbook.activity_columns.time, "CreateTim");
        assert_eq!(config.report.top_offenders, 5);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
report:
  top_offenders: 10
server:
  bind: "0.0.0.0:9000"
"#;
        let loader = ConfigLoader::from_yaml_str(yaml).unwrap();
        let config = loader.config();

        assert_eq!(config.report.top_offenders, 10);
        assert_eq!(config.report.page_break_mm, 180.0);
        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert_eq!(config.auth.username, "useraudit");
        assert_eq!(config.workbook.activity_columns.date, "TRXDATE");
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let loader = ConfigLoader::from_yaml_str("   \n").unwrap();
        assert_eq!(loader.config(), &AuditConfig::default());
    }

    #[test]
    fn test_invalid_yaml_returns_parse_error() {
        let result = ConfigLoader::from_yaml_str("report: [unclosed");
        assert!(matches!(result, Err(AuditError::ConfigParseError { .. })));
    }

    #[test]
    fn test_load_missing_file_returns_error() {
        let result = ConfigLoader::load("/nonexistent/audit.yaml");

        match result {
            Err(AuditError::ConfigNotFound { path }) => {
                assert!(path.contains("audit.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }

    #[test]
    fn test_load_or_default_without_path() {
        let loader = ConfigLoader::load_or_default(None::<&str>).unwrap();
        assert_eq!(loader.config().server.bind, "127.0.0.1:8080");
    }
}
