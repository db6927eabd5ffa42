//! HTTP API for the Attendance Audit Engine.
//!
//! Clients log in with the configured credentials, receive a bearer token,
//! and submit workbooks for audit either as JSON or as raw `.xlsx` uploads.
//! Results come back as an [`AuditReport`](crate::models::AuditReport) JSON
//! document or as a rendered PDF.

mod handlers;
mod request;
mod response;
mod session;
mod state;

pub use handlers::create_router;
pub use request::{AuditRequest, LoginRequest, LoginResponse, PeriodQuery};
pub use response::{ApiError, ApiErrorResponse};
pub use session::{RunHandle, Session, SessionStore};
pub use state::AppState;
