//! HTTP request handlers for the audit API.

use std::time::Instant;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{
        DefaultBodyLimit, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::audit::{CancellationToken, run_audit};
use crate::config::AuditConfig;
use crate::error::{AuditError, AuditResult};
use crate::models::AuditPeriod;
use crate::report::render_report_pdf;
use crate::workbook::read_xlsx_bytes;

use super::request::{AuditRequest, LoginRequest, LoginResponse, PeriodQuery};
use super::response::{ApiError, ApiErrorResponse};
use super::session::Session;
use super::state::AppState;

/// Largest accepted request body.
const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

type HandlerResult = Result<Response, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/login", post(login_handler))
        .route("/logout", post(logout_handler))
        .route("/audit", post(audit_handler))
        .route("/audit/report.pdf", post(report_pdf_handler))
        .route("/audit/xlsx", post(xlsx_audit_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

fn unauthorized(reason: &str) -> AuditError {
    AuditError::Unauthorized {
        reason: reason.to_string(),
    }
}

fn bearer_token(headers: &HeaderMap) -> AuditResult<Uuid> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| unauthorized("missing Authorization header"))?;
    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| unauthorized("expected a Bearer token"))?;
    Uuid::parse_str(token.trim()).map_err(|_| unauthorized("malformed bearer token"))
}

fn authorize(state: &AppState, headers: &HeaderMap, correlation_id: Uuid) -> Result<Session, ApiErrorResponse> {
    bearer_token(headers)
        .and_then(|token| state.sessions().authenticate(token))
        .map_err(|err| {
            warn!(correlation_id = %correlation_id, error = %err, "Rejected request");
            err.into()
        })
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>, correlation_id: Uuid) -> Result<T, ApiErrorResponse> {
    let rejection = match payload {
        Ok(Json(body)) => return Ok(body),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(correlation_id = %correlation_id, error = %body_text, "JSON data error");
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "JSON syntax error");
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    Err(ApiErrorResponse::bad_request(error))
}

/// Runs `job` on the blocking pool as the session's active analysis.
///
/// Any analysis the session already had running is cancelled first.
async fn run_for_session<T, F>(
    state: &AppState,
    session: &Session,
    correlation_id: Uuid,
    job: F,
) -> Result<T, ApiErrorResponse>
where
    T: Send + 'static,
    F: FnOnce(&AuditConfig, &CancellationToken) -> AuditResult<T> + Send + 'static,
{
    let run = state.sessions().begin_run(session.id)?;
    let config = state.shared_config();
    let cancel = run.cancel.clone();

    let outcome = tokio::task::spawn_blocking(move || job(config.config(), &cancel)).await;
    state.sessions().finish_run(session.id, run.run_id);

    match outcome {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => {
            warn!(
                correlation_id = %correlation_id,
                run_id = %run.run_id,
                error = %err,
                "Audit run failed"
            );
            Err(err.into())
        }
        Err(join_error) => {
            warn!(
                correlation_id = %correlation_id,
                run_id = %run.run_id,
                error = %join_error,
                "Audit task aborted"
            );
            Err(ApiErrorResponse::internal("Audit task aborted"))
        }
    }
}

/// Handler for POST /login.
async fn login_handler(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let request = json_body(payload, correlation_id)?;

    let session = state
        .sessions()
        .login(&state.config().config().auth, &request.username, &request.password)
        .map_err(|err| {
            warn!(correlation_id = %correlation_id, username = %request.username, "Login failed");
            ApiErrorResponse::from(err)
        })?;

    Ok((
        StatusCode::OK,
        Json(LoginResponse {
            token: session.id,
            username: session.username,
        }),
    )
        .into_response())
}

/// Handler for POST /logout.
async fn logout_handler(State(state): State<AppState>, headers: HeaderMap) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing logout request");

    bearer_token(&headers)
        .and_then(|token| state.sessions().logout(token))
        .map_err(|err| {
            warn!(correlation_id = %correlation_id, error = %err, "Rejected logout");
            ApiErrorResponse::from(err)
        })?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Handler for POST /audit.
///
/// Audits a JSON workbook and returns the full report.
async fn audit_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<AuditRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing audit request");

    let session = authorize(&state, &headers, correlation_id)?;
    let request = json_body(payload, correlation_id)?;

    let start_time = Instant::now();
    let report = run_for_session(&state, &session, correlation_id, move |config, cancel| {
        run_audit(&request.workbook, &request.period, config, cancel)
    })
    .await?;

    info!(
        correlation_id = %correlation_id,
        audit_id = %report.audit_id,
        violations = report.summary.total_violations,
        duration_us = start_time.elapsed().as_micros(),
        "Audit completed successfully"
    );

    Ok((StatusCode::OK, Json(report)).into_response())
}

/// Handler for POST /audit/report.pdf.
///
/// Audits a JSON workbook and returns the rendered PDF report.
async fn report_pdf_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<AuditRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing PDF report request");

    let session = authorize(&state, &headers, correlation_id)?;
    let request = json_body(payload, correlation_id)?;
    let period = request.period;

    let pdf = run_for_session(&state, &session, correlation_id, move |config, cancel| {
        let report = run_audit(&request.workbook, &request.period, config, cancel)?;
        cancel.check()?;
        render_report_pdf(&report, &config.report)
    })
    .await?;

    info!(correlation_id = %correlation_id, bytes = pdf.len(), "PDF report rendered");

    let disposition = format!(
        "attachment; filename=\"Audit_Report_{}_{}.pdf\"",
        period.start_date, period.end_date
    );
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        pdf,
    )
        .into_response())
}

/// Handler for POST /audit/xlsx.
///
/// Audits a raw `.xlsx` upload; the period comes from the query string.
async fn xlsx_audit_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<PeriodQuery>, QueryRejection>,
    body: Bytes,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, bytes = body.len(), "Processing xlsx audit request");

    let session = authorize(&state, &headers, correlation_id)?;
    let period: AuditPeriod = match query {
        Ok(Query(query)) => query.into(),
        Err(rejection) => {
            warn!(correlation_id = %correlation_id, error = %rejection, "Bad period query");
            return Err(ApiErrorResponse::bad_request(ApiError::new(
                "VALIDATION_ERROR",
                rejection.body_text(),
            )));
        }
    };

    let report = run_for_session(&state, &session, correlation_id, move |config, cancel| {
        let workbook = read_xlsx_bytes(&body)?;
        run_audit(&workbook, &period, config, cancel)
    })
    .await?;

    info!(
        correlation_id = %correlation_id,
        audit_id = %report.audit_id,
        violations = report.summary.total_violations,
        "Audit completed successfully"
    );

    Ok((StatusCode::OK, Json(report)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[tokio::test]
    async fn test_logout_rejects_unknown_session() {
        let state = AppState::new(crate::config::ConfigLoader::default());
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", Uuid::new_v4())).unwrap(),
        );

        match logout_handler(State(state.clone()), headers).await {
            Err(err) => {
                assert_eq!(err.status, StatusCode::UNAUTHORIZED);
                assert_eq!(err.error.code, "UNAUTHORIZED");
            }
            Ok(_) => panic!("Expected unknown session to be rejected"),
        }

        assert!(logout_handler(State(state), HeaderMap::new()).await.is_err());
    }

    #[test]
    fn test_bearer_token_parsing() {
        let token = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
        assert_eq!(bearer_token(&headers).unwrap(), token);
    }

    #[test]
    fn test_bearer_token_rejects_missing_or_malformed() {
        assert!(bearer_token(&HeaderMap::new()).is_err());

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(bearer_token(&headers).is_err());

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer not-a-uuid"));
        assert!(matches!(
            bearer_token(&headers),
            Err(AuditError::Unauthorized { .. })
        ));
    }
}
