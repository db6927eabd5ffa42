//! Activity model and related types.
//!
//! This module defines the [`SourceCategory`] enumeration of activity report
//! sheets and the [`ActivitySourceRecord`] struct for one logged action.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// The activity report an action was logged in.
///
/// The declaration order is significant: reports are processed in this
/// order, and it breaks ties when picking the most frequent category.
///
/// # Example
///
/// ```
/// use attendance_audit::models::SourceCategory;
///
/// assert_eq!(SourceCategory::ItemCorrect.sheet_name(), "Report Item Correct");
/// assert_eq!(
///     SourceCategory::from_sheet_name("Report Return"),
///     Some(SourceCategory::Return)
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceCategory {
    /// Item corrections after ringing up.
    ItemCorrect,
    /// Voided items and cancelled bills.
    VoidBillCancellation,
    /// Merchandise returns.
    Return,
    /// Duplicate receipt prints.
    PrintDuplicate,
}

impl SourceCategory {
    /// Every category, in processing order.
    pub const ALL: [SourceCategory; 4] = [
        SourceCategory::ItemCorrect,
        SourceCategory::VoidBillCancellation,
        SourceCategory::Return,
        SourceCategory::PrintDuplicate,
    ];

    /// Returns the exact workbook sheet name for this category.
    pub fn sheet_name(self) -> &'static str {
        match self {
            SourceCategory::ItemCorrect => "Report Item Correct",
            SourceCategory::VoidBillCancellation => "Report Void - Bill Cancellation",
            SourceCategory::Return => "Report Return",
            SourceCategory::PrintDuplicate => "Report Print Duplicate",
        }
    }

    /// Looks a category up by its exact sheet name.
    pub fn from_sheet_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.sheet_name() == name)
    }
}

impl std::fmt::Display for SourceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.sheet_name())
    }
}

/// A single logged action from one of the activity report sheets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivitySourceRecord {
    /// Normalized name of the person who performed the action.
    pub person_id: String,
    /// The transaction date.
    pub date: NaiveDate,
    /// The time of day the action was created.
    pub activity_time: NaiveTime,
    /// The report the action came from.
    pub source_tag: SourceCategory,
}

impl ActivitySourceRecord {
    /// Returns the absolute instant of the action.
    pub fn instant(&self) -> NaiveDateTime {
        self.date.and_time(self.activity_time)
    }
}
