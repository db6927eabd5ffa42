//! Request and response bodies for the audit API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::AuditPeriod;
use crate::workbook::Workbook;

/// Body of `POST /login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Account name.
    pub username: String,
    /// Account password.
    pub password: String,
}

/// Successful `POST /login` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests.
    pub token: Uuid,
    /// The logged-in account.
    pub username: String,
}

/// Body of `POST /audit` and `POST /audit/report.pdf`.
///
/// The workbook travels as JSON: a list of sheets, each with `name`,
/// `headers` and `rows`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRequest {
    /// The workbook to audit.
    pub workbook: Workbook,
    /// The inclusive date range to audit.
    pub period: AuditPeriod,
}

/// Query string of `POST /audit/xlsx`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PeriodQuery {
    /// First audited date.
    pub start_date: NaiveDate,
    /// Last audited date.
    pub end_date: NaiveDate,
}

impl From<PeriodQuery> for AuditPeriod {
    fn from(query: PeriodQuery) -> Self {
        AuditPeriod {
            start_date: query.start_date,
            end_date: query.end_date,
        }
    }
}
