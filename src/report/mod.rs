//! Report rendering.
//!
//! The audit core hands over a finished [`AuditReport`]; nothing here feeds
//! back into it. Three outputs are available:
//!
//! - detail and ranking table rows ([`DetailRow`], [`RankingRow`]),
//! - CSV exports of those tables ([`write_detail_csv`], [`write_ranking_csv`]),
//! - a paginated A4 landscape PDF ([`render_report_pdf`]).
//!
//! # Example
//!
//! ```no_run
//! use attendance_audit::config::ReportConfig;
//! use attendance_audit::report::render_report_pdf;
//! # fn load() -> attendance_audit::models::AuditReport { unimplemented!() }
//!
//! let report = load();
//! let pdf = render_report_pdf(&report, &ReportConfig::default()).unwrap();
//! std::fs::write("audit.pdf", pdf).unwrap();
//! ```

mod export;
mod layout;
mod pdf;
mod tables;

use tracing::debug;

use crate::config::ReportConfig;
use crate::error::AuditResult;
use crate::models::AuditReport;

pub use export::{write_detail_csv, write_ranking_csv};
pub use layout::{
    AUTO_BREAK_MM, Align, Cell, CellStyle, Element, FontStyle, MARGIN_MM, PAGE_HEIGHT_MM,
    PAGE_WIDTH_MM, Page, ReportDocument, Tone,
};
pub use pdf::render_pdf;
pub use tables::{
    DATE_DISPLAY, DETAIL_HEADERS, DetailRow, RANKING_HEADERS, RankingRow, TIME_DISPLAY,
};

/// Lays out and renders a report as PDF bytes, stamped with the report's
/// generation time.
pub fn render_report_pdf(report: &AuditReport, config: &ReportConfig) -> AuditResult<Vec<u8>> {
    let document = ReportDocument::compose(report, config, report.generated_at);
    let bytes = render_pdf(&document)?;

    debug!(
        audit_id = %report.audit_id,
        pages = document.page_count(),
        bytes = bytes.len(),
        "Rendered PDF report"
    );

    Ok(bytes)
}
