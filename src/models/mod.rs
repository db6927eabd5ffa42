//! Core data models for the Attendance Audit Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod activity;
mod attendance;
mod audit_period;
mod audit_report;
mod shift_window;
mod violation;

pub use activity::{ActivitySourceRecord, SourceCategory};
pub use attendance::AttendanceRecord;
pub use audit_period::AuditPeriod;
pub use audit_report::{
    AuditReport, AuditStatus, AuditSummary, HeatmapCell, OffenderRank, RunStats, SourceCount,
    TemporalHeatmap,
};
pub use shift_window::ShiftWindow;
pub use violation::{DeltaDirection, ViolationRecord};
