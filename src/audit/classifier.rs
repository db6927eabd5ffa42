//! Violation classification.
//!
//! Activities are joined to attendance on (person, date), an inner join:
//! activity without a matching attendance record is ignored, not flagged.
//! A joined activity is a violation when its instant lies strictly outside
//! the shift window.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::AuditResult;
use crate::models::{
    ActivitySourceRecord, AttendanceRecord, DeltaDirection, ShiftWindow, ViolationRecord,
};

use super::cancel::CancellationToken;
use super::shift_window::build_shift_window;

/// Rows classified between cancellation checks.
const CANCEL_CHECK_INTERVAL: usize = 256;

/// An attendance record with its shift window already built.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedShift {
    /// The attendance record.
    pub record: AttendanceRecord,
    /// The window derived from it.
    pub window: ShiftWindow,
}

/// Attendance lookup keyed by (person, date).
///
/// Each window is built once when the index is built.
#[derive(Debug, Clone, Default)]
pub struct ShiftIndex {
    shifts: HashMap<String, HashMap<NaiveDate, IndexedShift>>,
    len: usize,
}

impl ShiftIndex {
    /// Indexes attendance records. Records must already be deduplicated;
    /// if a key repeats anyway, the first record is kept.
    pub fn build(records: &[AttendanceRecord]) -> Self {
        let mut index = Self::default();
        for record in records {
            let by_date = index.shifts.entry(record.person_id.clone()).or_default();
            if !by_date.contains_key(&record.date) {
                by_date.insert(
                    record.date,
                    IndexedShift {
                        record: record.clone(),
                        window: build_shift_window(record),
                    },
                );
                index.len += 1;
            }
        }
        index
    }

    /// Looks up the shift for a person on a date.
    pub fn get(&self, person_id: &str, date: NaiveDate) -> Option<&IndexedShift> {
        self.shifts.get(person_id)?.get(&date)
    }

    /// Number of indexed shifts.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no shifts are indexed.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Result of classifying one source category.
#[derive(Debug, Clone, Default)]
pub struct ClassifiedSource {
    /// Violations, in input order.
    pub violations: Vec<ViolationRecord>,
    /// How many activities joined to an attendance record.
    pub matched: usize,
}

/// Signed minutes from `window` to `instant`, or `None` when inside.
fn outside_delta(instant: NaiveDateTime, window: &ShiftWindow) -> Option<(i64, DeltaDirection)> {
    if instant < window.window_start {
        Some(((window.window_start - instant).num_minutes(), DeltaDirection::Before))
    } else if instant > window.window_end {
        Some(((instant - window.window_end).num_minutes(), DeltaDirection::After))
    } else {
        None
    }
}

/// Classifies one activity against a joined attendance record.
///
/// Returns `None` when the activity lies within the shift window, both
/// boundaries included. The delta is the distance to the nearer violated
/// boundary, floored to whole minutes, so an activity 30 seconds early
/// yields a zero-minute violation.
pub fn classify(
    activity: &ActivitySourceRecord,
    attendance: &AttendanceRecord,
    window: &ShiftWindow,
) -> Option<ViolationRecord> {
    let (minutes, delta_direction) = outside_delta(activity.instant(), window)?;

    Some(ViolationRecord {
        person_id: activity.person_id.clone(),
        date: activity.date,
        shift_in: attendance.shift_in,
        shift_out: attendance.shift_out,
        activity_time: activity.activity_time,
        source_tag: activity.source_tag,
        delta_minutes: u32::try_from(minutes).unwrap_or(u32::MAX),
        delta_direction,
    })
}

/// Joins and classifies every activity of one source category.
///
/// Polls `cancel` periodically and returns `Err(Cancelled)` as soon as it
/// is set.
pub fn classify_source(
    activities: &[ActivitySourceRecord],
    index: &ShiftIndex,
    cancel: &CancellationToken,
) -> AuditResult<ClassifiedSource> {
    let mut result = ClassifiedSource::default();

    for (i, activity) in activities.iter().enumerate() {
        if i % CANCEL_CHECK_INTERVAL == 0 {
            cancel.check()?;
        }

        let Some(shift) = index.get(&activity.person_id, activity.date) else {
            continue;
        };
        result.matched += 1;

        if let Some(violation) = classify(activity, &shift.record, &shift.window) {
            result.violations.push(violation);
        }
    }

    Ok(result)
}
