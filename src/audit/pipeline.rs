//! End-to-end audit run.

use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::AuditConfig;
use crate::error::{AuditError, AuditResult};
use crate::models::{AuditPeriod, AuditReport, AuditStatus, RunStats, SourceCategory};
use crate::workbook::Workbook;

use super::aggregator::{count_by_source, rank_offenders, summarize, temporal_heatmap};
use super::cancel::CancellationToken;
use super::classifier::{ShiftIndex, classify_source};
use super::normalizer::{normalize_activity, normalize_attendance};

/// Runs a complete audit over a workbook.
///
/// The run is all-or-nothing: it returns a full [`AuditReport`] or an
/// error, never partial results. An empty result is a successful run with
/// [`AuditStatus::Clean`].
///
/// # Errors
///
/// - [`AuditError::InvalidPeriod`] if the period's start is after its end.
/// - [`AuditError::MissingSheet`] if the attendance sheet is absent.
///   Absent activity sheets are skipped instead.
/// - [`AuditError::Cancelled`] if `cancel` is set before the run finishes.
///
/// # Example
///
/// ```
/// use attendance_audit::audit::{CancellationToken, run_audit};
/// use attendance_audit::config::AuditConfig;
/// use attendance_audit::models::AuditPeriod;
/// use attendance_audit::workbook::{Sheet, Workbook};
/// use chrono::NaiveDate;
///
/// let workbook = Workbook::new(vec![
///     Sheet::new("DATA ABSEN", &["Nama", "Tanggal", "IN", "OUT"]).with_row(vec![
///         "Jane Doe ".into(),
///         "2024-01-10".into(),
///         "08:00:00".into(),
///         "17:00:00".into(),
///     ]),
///     Sheet::new("Report Return", &["AuthName", "TRXDATE", "CreateTim"]).with_row(vec![
///         "jane doe".into(),
///         "2024-01-10".into(),
///         "07:30:00".into(),
///     ]),
/// ]);
/// let day = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
/// let period = AuditPeriod::new(day, day).unwrap();
///
/// let report = run_audit(&workbook, &period, &AuditConfig::default(), &CancellationToken::new())
///     .unwrap();
/// assert_eq!(report.violations[0].delta_label(), "-30 Min");
/// ```
pub fn run_audit(
    workbook: &Workbook,
    period: &AuditPeriod,
    config: &AuditConfig,
    cancel: &CancellationToken,
) -> AuditResult<AuditReport> {
    let start_time = Instant::now();
    let layout = &config.workbook;

    period.validate()?;
    cancel.check()?;

    let attendance_sheet =
        workbook
            .sheet(&layout.attendance_sheet)
            .ok_or_else(|| AuditError::MissingSheet {
                sheet: layout.attendance_sheet.clone(),
            })?;

    let attendance = normalize_attendance(attendance_sheet, &layout.attendance_columns);
    let index = ShiftIndex::build(&attendance);
    cancel.check()?;

    let mut stats = RunStats {
        attendance_records: index.len(),
        ..RunStats::default()
    };
    let mut violations = Vec::new();

    for category in SourceCategory::ALL {
        cancel.check()?;

        let Some(sheet) = workbook.sheet(category.sheet_name()) else {
            debug!(source = %category, "Activity sheet absent; skipping");
            stats.skipped_sources.push(category);
            continue;
        };

        let activities: Vec<_> = normalize_activity(sheet, &layout.activity_columns, category)
            .into_iter()
            .filter(|a| period.contains_date(a.date))
            .collect();

        let classified = classify_source(&activities, &index, cancel)?;

        debug!(
            source = %category,
            activities = activities.len(),
            matched = classified.matched,
            violations = classified.violations.len(),
            "Classified activity source"
        );

        stats.activity_records += activities.len();
        stats.matched_activities += classified.matched;
        violations.extend(classified.violations);
    }

    stats.ignored_sheets = workbook
        .sheet_names()
        .into_iter()
        .filter(|name| *name != layout.attendance_sheet && SourceCategory::from_sheet_name(name).is_none())
        .map(str::to_string)
        .collect();
    if !stats.ignored_sheets.is_empty() {
        debug!(sheets = ?stats.ignored_sheets, "Ignored sheets with no audit role");
    }

    cancel.check()?;

    // Stable: equal keys keep category order.
    violations.sort_by_key(|v| (v.date, v.activity_time));

    let by_source = count_by_source(&violations);
    let summary = summarize(&violations, &by_source);
    let ranking = rank_offenders(&violations);
    let heatmap = temporal_heatmap(&violations);

    let status = if violations.is_empty() {
        AuditStatus::Clean
    } else {
        AuditStatus::ViolationsFound
    };

    stats.duration_us = start_time.elapsed().as_micros() as u64;

    let report = AuditReport {
        audit_id: Uuid::new_v4(),
        generated_at: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        period: *period,
        status,
        summary,
        ranking,
        by_source,
        heatmap,
        violations,
        stats,
    };

    info!(
        audit_id = %report.audit_id,
        period = %period.label(),
        violations = report.summary.total_violations,
        persons = report.summary.distinct_persons,
        duration_us = report.stats.duration_us,
        "Audit run completed"
    );

    Ok(report)
}
