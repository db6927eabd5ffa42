//! Tabular views of an audit report.
//!
//! The detail and ranking tables use the column names auditors know from
//! the source workbook, so an exported CSV lines up with the original
//! activity reports.

use serde::Serialize;

use crate::models::{OffenderRank, ViolationRecord};

/// Display format for times in every table.
pub const TIME_DISPLAY: &str = "%H:%M:%S";

/// Display format for dates in every table.
pub const DATE_DISPLAY: &str = "%Y-%m-%d";

/// Detail table header, in column order.
pub const DETAIL_HEADERS: [&str; 7] = [
    "TRXDATE",
    "AuthName",
    "IN",
    "OUT",
    "CreateTim",
    "Sumber Aktivitas",
    "Selisih_Waktu",
];

/// Ranking table header, in column order.
pub const RANKING_HEADERS: [&str; 2] = ["AuthName", "Total Pelanggaran"];

/// One rendered row of the detail table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailRow {
    /// Activity date.
    #[serde(rename = "TRXDATE")]
    pub trx_date: String,
    /// Normalized person name.
    #[serde(rename = "AuthName")]
    pub auth_name: String,
    /// Shift start.
    #[serde(rename = "IN")]
    pub shift_in: String,
    /// Shift end.
    #[serde(rename = "OUT")]
    pub shift_out: String,
    /// Activity time.
    #[serde(rename = "CreateTim")]
    pub create_tim: String,
    /// Source category label.
    #[serde(rename = "Sumber Aktivitas")]
    pub source: String,
    /// Signed delta label, e.g. `-30 Min`.
    #[serde(rename = "Selisih_Waktu")]
    pub delta: String,
}

impl DetailRow {
    /// Renders a violation as a detail row.
    pub fn from_violation(violation: &ViolationRecord) -> Self {
        Self {
            trx_date: violation.date.format(DATE_DISPLAY).to_string(),
            auth_name: violation.person_id.clone(),
            shift_in: violation.shift_in.format(TIME_DISPLAY).to_string(),
            shift_out: violation.shift_out.format(TIME_DISPLAY).to_string(),
            create_tim: violation.activity_time.format(TIME_DISPLAY).to_string(),
            source: violation.source_tag.to_string(),
            delta: violation.delta_label(),
        }
    }

    /// Returns the cells in [`DETAIL_HEADERS`] order.
    pub fn cells(&self) -> [&str; 7] {
        [
            self.trx_date.as_str(),
            self.auth_name.as_str(),
            self.shift_in.as_str(),
            self.shift_out.as_str(),
            self.create_tim.as_str(),
            self.source.as_str(),
            self.delta.as_str(),
        ]
    }
}

/// One rendered row of the ranking table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankingRow {
    /// Normalized person name.
    #[serde(rename = "AuthName")]
    pub auth_name: String,
    /// Violation count.
    #[serde(rename = "Total Pelanggaran")]
    pub total: usize,
}

impl From<&OffenderRank> for RankingRow {
    fn from(rank: &OffenderRank) -> Self {
        Self {
            auth_name: rank.person_id.clone(),
            total: rank.total_violations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DeltaDirection, SourceCategory};
    use chrono::{NaiveDate, NaiveTime};

    fn violation() -> ViolationRecord {
        ViolationRecord {
            person_id: "JANE DOE".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            shift_in: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            shift_out: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            activity_time: NaiveTime::from_hms_opt(7, 30, 0).unwrap(),
            source_tag: SourceCategory::VoidBillCancellation,
            delta_minutes: 30,
            delta_direction: DeltaDirection::Before,
        }
    }

    #[test]
    fn test_detail_row_formats_every_column() {
        let row = DetailRow::from_violation(&violation());

        assert_eq!(
            row.cells(),
            [
                "2024-01-10",
                "JANE DOE",
                "08:00:00",
                "17:00:00",
                "07:30:00",
                "Report Void - Bill Cancellation",
                "-30 Min",
            ]
        );
    }

    #[test]
    fn test_detail_row_serializes_with_column_names() {
        let json = serde_json::to_value(DetailRow::from_violation(&violation())).unwrap();

        for header in DETAIL_HEADERS {
            assert!(json.get(header).is_some(), "missing column {}", header);
        }
        assert_eq!(json["Selisih_Waktu"], "-30 Min");
    }

    #[test]
    fn test_ranking_row_from_rank() {
        let rank = OffenderRank {
            rank: 1,
            person_id: "BUDI".to_string(),
            total_violations: 4,
        };

        assert_eq!(
            RankingRow::from(&rank),
            RankingRow {
                auth_name: "BUDI".to_string(),
                total: 4,
            }
        );
    }
}
