//! Violation model.
//!
//! This module defines the [`ViolationRecord`] produced for every activity
//! that falls outside its shift window, and the [`DeltaDirection`] telling
//! which side of the window it fell on.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::SourceCategory;

/// Which side of the shift window an activity fell on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaDirection {
    /// The activity happened before clock-in.
    Before,
    /// The activity happened after clock-out.
    After,
}

impl DeltaDirection {
    /// Returns the sign prefix used when rendering a delta.
    pub fn sign(self) -> char {
        match self {
            DeltaDirection::Before => '-',
            DeltaDirection::After => '+',
        }
    }
}

/// An activity performed outside its matched shift window.
///
/// The magnitude is always non-negative; the sign lives in
/// [`delta_direction`](Self::delta_direction).
///
/// # Example
///
/// ```
/// use attendance_audit::models::{DeltaDirection, SourceCategory, ViolationRecord};
/// use chrono::{NaiveDate, NaiveTime};
///
/// let violation = ViolationRecord {
///     person_id: "JANE DOE".to_string(),
///     date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
///     shift_in: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
///     shift_out: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
///     activity_time: NaiveTime::from_hms_opt(7, 30, 0).unwrap(),
///     source_tag: SourceCategory::ItemCorrect,
///     delta_minutes: 30,
///     delta_direction: DeltaDirection::Before,
/// };
/// assert_eq!(violation.delta_label(), "-30 Min");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationRecord {
    /// Normalized employee name.
    pub person_id: String,
    /// The transaction date (also the attendance date).
    pub date: NaiveDate,
    /// Clock-in time of the matched attendance record.
    pub shift_in: NaiveTime,
    /// Clock-out time of the matched attendance record.
    pub shift_out: NaiveTime,
    /// Time of day of the offending action.
    pub activity_time: NaiveTime,
    /// The report the action came from.
    pub source_tag: SourceCategory,
    /// Whole minutes between the action and the nearest window edge.
    pub delta_minutes: u32,
    /// Whether the action came before clock-in or after clock-out.
    pub delta_direction: DeltaDirection,
}

impl ViolationRecord {
    /// Renders the signed delta, e.g. `"-30 Min"` or `"+125 Min"`.
    pub fn delta_label(&self) -> String {
        format!("{}{} Min", self.delta_direction.sign(), self.delta_minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_violation(minutes: u32, direction: DeltaDirection) -> ViolationRecord {
        ViolationRecord {
            person_id: "JANE DOE".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            shift_in: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            shift_out: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            activity_time: NaiveTime::from_hms_opt(19, 5, 0).unwrap(),
            source_tag: SourceCategory::Return,
            delta_minutes: minutes,
            delta_direction: direction,
        }
    }

    #[test]
    fn test_delta_label_before() {
        assert_eq!(make_violation(30, DeltaDirection::Before).delta_label(), "-30 Min");
    }

    #[test]
    fn test_delta_label_after() {
        assert_eq!(make_violation(125, DeltaDirection::After).delta_label(), "+125 Min");
    }

    #[test]
    fn test_delta_label_zero_minutes_keeps_sign() {
        // Sub-minute violations truncate to zero but are still violations.
        assert_eq!(make_violation(0, DeltaDirection::After).delta_label(), "+0 Min");
    }

    #[test]
    fn test_violation_serialization() {
        let violation = make_violation(125, DeltaDirection::After);
        let json = serde_json::to_string(&violation).unwrap();
        assert!(json.contains("\"delta_direction\":\"after\""));
        assert!(json.contains("\"source_tag\":\"return\""));
        assert!(json.contains("\"activity_time\":\"19:05:00\""));

        let deserialized: ViolationRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(violation, deserialized);
    }
}
