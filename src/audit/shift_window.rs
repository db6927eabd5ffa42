//! Shift window construction.
//!
//! A shift whose OUT time is not after its IN time is treated as overnight:
//! the window ends on the following calendar day. Equal IN and OUT times
//! therefore describe a full 24 hour window, not an empty one.

use chrono::Duration;

use crate::models::{AttendanceRecord, ShiftWindow};

/// Builds the concrete shift window for an attendance record.
///
/// # Example
///
/// ```
/// use attendance_audit::audit::build_shift_window;
/// use attendance_audit::models::AttendanceRecord;
/// use chrono::{NaiveDate, NaiveTime};
///
/// let record = AttendanceRecord {
///     person_id: "BUDI".to_string(),
///     date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
///     shift_in: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
///     shift_out: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
/// };
///
/// let window = build_shift_window(&record);
/// assert!(window.is_overnight());
/// assert_eq!(window.window_end.date(), NaiveDate::from_ymd_opt(2024, 1, 11).unwrap());
/// ```
pub fn build_shift_window(record: &AttendanceRecord) -> ShiftWindow {
    let window_start = record.date.and_time(record.shift_in);
    let mut window_end = record.date.and_time(record.shift_out);

    if record.shift_out <= record.shift_in {
        window_end += Duration::days(1);
    }

    ShiftWindow {
        person_id: record.person_id.clone(),
        date: record.date,
        window_start,
        window_end,
    }
}
