//! Audit period model.
//!
//! This module contains the [`AuditPeriod`] type: the inclusive date range
//! that activity rows are filtered to before they are joined to attendance.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AuditError, AuditResult};

/// An inclusive range of transaction dates under audit.
///
/// # Example
///
/// ```
/// use attendance_audit::models::AuditPeriod;
/// use chrono::NaiveDate;
///
/// let period = AuditPeriod::new(
///     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
/// )
/// .unwrap();
///
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()));
/// assert_eq!(period.label(), "2024-01-01 s/d 2024-01-31");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditPeriod {
    /// The first audited date (inclusive).
    pub start_date: NaiveDate,
    /// The last audited date (inclusive).
    pub end_date: NaiveDate,
}

impl AuditPeriod {
    /// Creates a validated audit period.
    ///
    /// # Returns
    ///
    /// Returns `InvalidPeriod` if `start_date` is after `end_date`.
    /// A single-day period (start equal to end) is valid.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> AuditResult<Self> {
        let period = Self {
            start_date,
            end_date,
        };
        period.validate()?;
        Ok(period)
    }

    /// Checks that the period is not inverted.
    ///
    /// Periods built through deserialization skip [`AuditPeriod::new`], so
    /// the pipeline validates again before using one.
    pub fn validate(&self) -> AuditResult<()> {
        if self.start_date > self.end_date {
            return Err(AuditError::InvalidPeriod {
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }

    /// Checks if a given date falls within this period, inclusive of both ends.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Renders the period as printed in the report header.
    pub fn label(&self) -> String {
        format!("{} s/d {}", self.start_date, self.end_date)
    }
}
