//! CSV export of the report tables.

use std::io::Write;

use crate::error::{AuditError, AuditResult};
use crate::models::{OffenderRank, ViolationRecord};

use super::tables::{DETAIL_HEADERS, DetailRow, RANKING_HEADERS, RankingRow};

fn render_error(e: impl std::fmt::Display) -> AuditError {
    AuditError::ReportRender {
        message: e.to_string(),
    }
}

/// Writes the detail table as CSV.
///
/// The header row is always written, even when there are no violations.
pub fn write_detail_csv<W: Write>(writer: W, violations: &[ViolationRecord]) -> AuditResult<()> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv.write_record(DETAIL_HEADERS).map_err(render_error)?;
    for violation in violations {
        csv.write_record(DetailRow::from_violation(violation).cells())
            .map_err(render_error)?;
    }
    csv.flush().map_err(render_error)
}

/// Writes the ranking table as CSV.
pub fn write_ranking_csv<W: Write>(writer: W, ranking: &[OffenderRank]) -> AuditResult<()> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv.write_record(RANKING_HEADERS).map_err(render_error)?;
    for rank in ranking {
        let row = RankingRow::from(rank);
        csv.write_record([row.auth_name, row.total.to_string()])
            .map_err(render_error)?;
    }
    csv.flush().map_err(render_error)
}
