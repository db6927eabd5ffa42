//! Aggregation of violations into report figures.
//!
//! Every function here is a pure fold over the violation list, so the same
//! violations always produce the same summary, ranking and heatmap.

use std::collections::{HashMap, HashSet};

use chrono::{Datelike, Timelike, Weekday};

use crate::models::{
    AuditSummary, HeatmapCell, OffenderRank, SourceCategory, SourceCount, TemporalHeatmap,
    ViolationRecord,
};

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Ranks people by violation count.
///
/// Ordered by count descending; equal counts are ordered by name ascending
/// so the ranking is deterministic. Ranks are 1-based and unique.
pub fn rank_offenders(violations: &[ViolationRecord]) -> Vec<OffenderRank> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for violation in violations {
        *counts.entry(violation.person_id.as_str()).or_insert(0) += 1;
    }

    let mut ordered: Vec<(&str, usize)> = counts.into_iter().collect();
    ordered.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    ordered
        .into_iter()
        .enumerate()
        .map(|(i, (person_id, total_violations))| OffenderRank {
            rank: i + 1,
            person_id: person_id.to_string(),
            total_violations,
        })
        .collect()
}

/// Counts violations per source category.
///
/// Categories are listed in their fixed order; categories with no
/// violations are omitted.
pub fn count_by_source(violations: &[ViolationRecord]) -> Vec<SourceCount> {
    SourceCategory::ALL
        .into_iter()
        .map(|source| SourceCount {
            source,
            count: violations.iter().filter(|v| v.source_tag == source).count(),
        })
        .filter(|c| c.count > 0)
        .collect()
}

/// Returns the most frequent source category.
///
/// Ties go to the category that comes first in the fixed order.
pub fn top_source(counts: &[SourceCount]) -> Option<SourceCategory> {
    counts
        .iter()
        .fold(None::<&SourceCount>, |best, c| match best {
            Some(b) if b.count >= c.count => Some(b),
            _ => Some(c),
        })
        .map(|c| c.source)
}

/// Builds the executive summary.
pub fn summarize(violations: &[ViolationRecord], by_source: &[SourceCount]) -> AuditSummary {
    let distinct_persons = violations
        .iter()
        .map(|v| v.person_id.as_str())
        .collect::<HashSet<_>>()
        .len();

    AuditSummary {
        total_violations: violations.len(),
        distinct_persons,
        top_source: top_source(by_source),
    }
}

/// Buckets violations by weekday of the activity date and hour of the
/// activity time.
pub fn temporal_heatmap(violations: &[ViolationRecord]) -> TemporalHeatmap {
    let mut grid = [[0usize; 24]; 7];
    for v in violations {
        let day = v.date.weekday().num_days_from_monday() as usize;
        grid[day][v.activity_time.hour() as usize] += 1;
    }

    let cells = WEEKDAYS
        .iter()
        .zip(grid.iter())
        .flat_map(|(&weekday, hours)| {
            hours
                .iter()
                .enumerate()
                .filter(|(_, count)| **count > 0)
                .map(move |(hour, &count)| HeatmapCell {
                    weekday,
                    hour: hour as u32,
                    count,
                })
        })
        .collect();

    TemporalHeatmap { cells }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DeltaDirection;
    use chrono::{NaiveDate, NaiveTime};

    fn violation(name: &str, day: u32, hour: u32, source: SourceCategory) -> ViolationRecord {
        ViolationRecord {
            person_id: name.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            shift_in: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            shift_out: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            activity_time: NaiveTime::from_hms_opt(hour, 15, 0).unwrap(),
            source_tag: source,
            delta_minutes: 10,
            delta_direction: DeltaDirection::After,
        }
    }

    fn sample() -> Vec<ViolationRecord> {
        use SourceCategory::*;
        vec![
            violation("BUDI", 8, 19, Return),
            violation("ANI", 8, 19, Return),
            violation("BUDI", 9, 6, ItemCorrect),
            violation("CITRA", 10, 19, Return),
            violation("ANI", 10, 20, PrintDuplicate),
        ]
    }

    #[test]
    fn test_ranking_orders_by_count_then_name() {
        let ranking = rank_offenders(&sample());
        let names: Vec<_> = ranking.iter().map(|r| r.person_id.as_str()).collect();

        assert_eq!(names, vec!["ANI", "BUDI", "CITRA"]);
        assert_eq!(ranking[0].rank, 1);
        assert_eq!(ranking[0].total_violations, 2);
        assert_eq!(ranking[2].rank, 3);
        assert_eq!(ranking[2].total_violations, 1);
    }

    #[test]
    fn test_ranking_total_matches_violation_count() {
        let violations = sample();
        let ranked: usize = rank_offenders(&violations)
            .iter()
            .map(|r| r.total_violations)
            .sum();
        assert_eq!(ranked, violations.len());
    }

    #[test]
    fn test_empty_input_produces_empty_aggregates() {
        assert!(rank_offenders(&[]).is_empty());
        assert!(count_by_source(&[]).is_empty());
        assert_eq!(top_source(&[]), None);
        assert_eq!(temporal_heatmap(&[]).total(), 0);

        let summary = summarize(&[], &[]);
        assert_eq!(summary.total_violations, 0);
        assert_eq!(summary.distinct_persons, 0);
        assert_eq!(summary.top_source, None);
    }

    #[test]
    fn test_count_by_source_uses_fixed_order_and_skips_zero() {
        let counts = count_by_source(&sample());
        assert_eq!(
            counts,
            vec![
                SourceCount { source: SourceCategory::ItemCorrect, count: 1 },
                SourceCount { source: SourceCategory::Return, count: 3 },
                SourceCount { source: SourceCategory::PrintDuplicate, count: 1 },
            ]
        );
        assert_eq!(top_source(&counts), Some(SourceCategory::Return));
    }

    #[test]
    fn test_top_source_tie_goes_to_earlier_category() {
        let counts = vec![
            SourceCount { source: SourceCategory::VoidBillCancellation, count: 2 },
            SourceCount { source: SourceCategory::Return, count: 2 },
        ];
        assert_eq!(top_source(&counts), Some(SourceCategory::VoidBillCancellation));
    }

    #[test]
    fn test_summary_counts_distinct_people() {
        let violations = sample();
        let summary = summarize(&violations, &count_by_source(&violations));

        assert_eq!(summary.total_violations, 5);
        assert_eq!(summary.distinct_persons, 3);
        assert_eq!(summary.top_source, Some(SourceCategory::Return));
    }

    #[test]
    fn test_heatmap_buckets_by_weekday_and_hour() {
        // 2024-01-08 is a Monday.
        let heatmap = temporal_heatmap(&sample());

        assert_eq!(heatmap.count(Weekday::Mon, 19), 2);
        assert_eq!(heatmap.count(Weekday::Tue, 6), 1);
        assert_eq!(heatmap.count(Weekday::Wed, 19), 1);
        assert_eq!(heatmap.count(Weekday::Wed, 20), 1);
        assert_eq!(heatmap.total(), 5);
        assert_eq!(heatmap.cells.first().map(|c| c.weekday), Some(Weekday::Mon));
    }
}
