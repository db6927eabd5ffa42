//! Audit report models.
//!
//! This module contains the [`AuditReport`] type and the aggregate
//! structures it carries: the headline summary, the offender ranking,
//! per-source counts and the hour-by-weekday heatmap. These are the plain
//! structures the report renderer and the HTTP API consume.

use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AuditPeriod, SourceCategory, ViolationRecord};

/// Overall outcome of an audit run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    /// No activity fell outside its shift window.
    Clean,
    /// At least one violation was found.
    ViolationsFound,
}

/// Headline figures for the executive summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditSummary {
    /// Number of violation records.
    pub total_violations: usize,
    /// Number of distinct people with at least one violation.
    pub distinct_persons: usize,
    /// The most frequent source category, if any violation exists.
    pub top_source: Option<SourceCategory>,
}

/// One row of the offender ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffenderRank {
    /// 1-based position in the ranking.
    pub rank: usize,
    /// Normalized employee name.
    pub person_id: String,
    /// Number of violations attributed to this person.
    pub total_violations: usize,
}

/// Violation count for one source category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCount {
    /// The source category.
    pub source: SourceCategory,
    /// Number of violations from this source.
    pub count: usize,
}

/// One non-empty cell of the heatmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapCell {
    /// Day of the week of the activity date.
    pub weekday: Weekday,
    /// Hour of day (0-23) of the activity time.
    pub hour: u32,
    /// Number of violations in this bucket.
    pub count: usize,
}

/// Violation frequency by weekday and hour of day.
///
/// Only non-empty buckets are stored, ordered Monday first, then by hour.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporalHeatmap {
    /// Non-empty buckets.
    pub cells: Vec<HeatmapCell>,
}

impl TemporalHeatmap {
    /// Returns the count for a bucket, zero when the bucket is empty.
    pub fn count(&self, weekday: Weekday, hour: u32) -> usize {
        self.cells
            .iter()
            .find(|c| c.weekday == weekday && c.hour == hour)
            .map(|c| c.count)
            .unwrap_or(0)
    }

    /// Returns the sum of all buckets.
    pub fn total(&self) -> usize {
        self.cells.iter().map(|c| c.count).sum()
    }
}

/// Bookkeeping for one run.
///
/// Row-level drops are only visible here, as totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Attendance records kept after normalization and deduplication.
    pub attendance_records: usize,
    /// Activity records inside the audit period, across all sources.
    pub activity_records: usize,
    /// Activity records that matched an attendance record.
    pub matched_activities: usize,
    /// Source categories whose sheet was absent.
    pub skipped_sources: Vec<SourceCategory>,
    /// Sheets that are neither the attendance sheet nor an activity report.
    #[serde(default)]
    pub ignored_sheets: Vec<String>,
    /// Wall-clock duration of the run in microseconds.
    pub duration_us: u64,
}

/// The complete output of an audit run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    /// Unique identifier for this run.
    pub audit_id: Uuid,
    /// When the run completed.
    pub generated_at: DateTime<Utc>,
    /// Crate version that produced the report.
    pub engine_version: String,
    /// The audited date range.
    pub period: AuditPeriod,
    /// Clean or violations found.
    pub status: AuditStatus,
    /// Executive summary.
    pub summary: AuditSummary,
    /// All offenders, highest count first.
    pub ranking: Vec<OffenderRank>,
    /// Violations per source category.
    pub by_source: Vec<SourceCount>,
    /// Violations per weekday and hour.
    pub heatmap: TemporalHeatmap,
    /// Every violation, sorted by date then activity time.
    pub violations: Vec<ViolationRecord>,
    /// Run bookkeeping.
    pub stats: RunStats,
}

impl AuditReport {
    /// Returns true if the run found no violations.
    pub fn is_clean(&self) -> bool {
        self.status == AuditStatus::Clean
    }

    /// Returns the first `n` entries of the ranking.
    pub fn top_offenders(&self, n: usize) -> &[OffenderRank] {
        &self.ranking[..n.min(self.ranking.len())]
    }
}
