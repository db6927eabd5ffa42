//! The audit engine.
//!
//! This module turns a [`Workbook`](crate::workbook::Workbook) into an
//! [`AuditReport`](crate::models::AuditReport) in five stages: name, date
//! and time normalization, shift window construction, the (person, date)
//! join with out-of-window classification, aggregation, and the pipeline
//! that sequences them under a [`CancellationToken`].

mod aggregator;
mod cancel;
mod classifier;
mod normalizer;
mod pipeline;
mod shift_window;

pub use aggregator::{count_by_source, rank_offenders, summarize, temporal_heatmap, top_source};
pub use cancel::CancellationToken;
pub use classifier::{ClassifiedSource, IndexedShift, ShiftIndex, classify, classify_source};
pub use normalizer::{
    TIME_FORMAT, normalize_activity, normalize_attendance, normalize_name, parse_date, parse_name,
    parse_time,
};
pub use pipeline::run_audit;
pub use shift_window::build_shift_window;
