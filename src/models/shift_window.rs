//! Shift window model.
//!
//! A [`ShiftWindow`] is the concrete interval during which a person's
//! activity counts as compliant. Windows are derived from attendance records
//! at analysis time and never stored.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// The authorized working interval for one person on one date.
///
/// # Examples
///
/// ```
/// use attendance_audit::models::ShiftWindow;
/// use chrono::{NaiveDate, NaiveDateTime};
///
/// let window = ShiftWindow {
///     person_id: "JANE DOE".to_string(),
///     date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
///     window_start: NaiveDateTime::parse_from_str("2024-01-10 22:00:00", "%Y-%m-%d %H:%M:%S").unwrap(),
///     window_end: NaiveDateTime::parse_from_str("2024-01-11 06:00:00", "%Y-%m-%d %H:%M:%S").unwrap(),
/// };
/// assert!(window.is_overnight());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftWindow {
    /// Normalized employee name.
    pub person_id: String,
    /// The attendance date the window is anchored to.
    pub date: NaiveDate,
    /// Start of the window (clock-in).
    pub window_start: NaiveDateTime,
    /// End of the window (clock-out, possibly on the next day).
    pub window_end: NaiveDateTime,
}

impl ShiftWindow {
    /// Returns true if the window ends on a later calendar day than it starts.
    pub fn is_overnight(&self) -> bool {
        self.window_end.date() > self.window_start.date()
    }

    /// Returns true if `instant` lies inside the window.
    ///
    /// Both boundaries are inclusive: activity exactly at clock-in or
    /// clock-out is compliant.
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        instant >= self.window_start && instant <= self.window_end
    }

    /// Returns the length of the window in whole minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.window_end - self.window_start).num_minutes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_datetime(date_str: &str, time_str: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{} {}", date_str, time_str), "%Y-%m-%d %H:%M:%S")
            .unwrap()
    }

    fn make_window(start: (&str, &str), end: (&str, &str)) -> ShiftWindow {
        ShiftWindow {
            person_id: "JANE DOE".to_string(),
            date: NaiveDate::parse_from_str(start.0, "%Y-%m-%d").unwrap(),
            window_start: make_datetime(start.0, start.1),
            window_end: make_datetime(end.0, end.1),
        }
    }

    #[test]
    fn test_day_window_is_not_overnight() {
        let window = make_window(("2024-01-10", "08:00:00"), ("2024-01-10", "17:00:00"));
        assert!(!window.is_overnight());
        assert_eq!(window.duration_minutes(), 540);
    }

    #[test]
    fn test_overnight_window() {
        let window = make_window(("2024-01-10", "22:00:00"), ("2024-01-11", "06:00:00"));
        assert!(window.is_overnight());
        assert_eq!(window.duration_minutes(), 480);
    }

    #[test]
    fn test_contains_is_inclusive_at_both_ends() {
        let window = make_window(("2024-01-10", "08:00:00"), ("2024-01-10", "17:00:00"));

        assert!(window.contains(make_datetime("2024-01-10", "08:00:00")));
        assert!(window.contains(make_datetime("2024-01-10", "12:00:00")));
        assert!(window.contains(make_datetime("2024-01-10", "17:00:00")));
        assert!(!window.contains(make_datetime("2024-01-10", "07:59:59")));
        assert!(!window.contains(make_datetime("2024-01-10", "17:00:01")));
    }

    #[test]
    fn test_overnight_contains_early_morning_next_day() {
        let window = make_window(("2024-01-10", "22:00:00"), ("2024-01-11", "06:00:00"));
        assert!(window.contains(make_datetime("2024-01-11", "05:00:00")));
        assert!(!window.contains(make_datetime("2024-01-10", "05:00:00")));
    }

    #[test]
    fn test_window_serialization() {
        let window = make_window(("2024-01-10", "08:00:00"), ("2024-01-10", "17:00:00"));
        let json = serde_json::to_string(&window).unwrap();
        assert!(json.contains("\"window_start\":\"2024-01-10T08:00:00\""));
        let deserialized: ShiftWindow = serde_json::from_str(&json).unwrap();
        assert_eq!(window, deserialized);
    }
}
