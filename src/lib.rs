//! Attendance Audit Engine
//!
//! This crate audits employee attendance logs against point-of-sale activity
//! logs and flags every action performed outside the employee's authorized
//! shift window, including overnight shifts that wrap past midnight.
//!
//! The engine itself lives in [`audit`]; [`workbook`] feeds it, [`report`]
//! renders its output and [`api`] exposes it over HTTP.

#![warn(missing_docs)]

pub mod api;
pub mod audit;
pub mod config;
pub mod error;
pub mod models;
pub mod report;
pub mod workbook;
