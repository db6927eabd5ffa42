//! Attendance model.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// One person's clock-in and clock-out on one calendar day.
///
/// After normalization there is at most one record per
/// (`person_id`, `date`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Normalized employee name, used as the join key.
    pub person_id: String,
    /// The calendar day the shift starts on.
    pub date: NaiveDate,
    /// Clock-in time of day.
    pub shift_in: NaiveTime,
    /// Clock-out time of day. May be earlier than `shift_in` for
    /// overnight shifts.
    pub shift_out: NaiveTime,
}

impl AttendanceRecord {
    /// Returns the (person, date) key used to join activity to attendance.
    pub fn key(&self) -> (String, NaiveDate) {
        (self.person_id.clone(), self.date)
    }
}
