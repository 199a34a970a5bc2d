//! Report routes.
//!
//! - `GET /reports/export` streams a rendered PDF or XLSX artifact.
//! - `GET /reports/summary` returns aggregated totals as JSON.

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use almoner_core::reports::{ReportError, ReportRequest, request::parse_date};

use crate::AppState;

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/export", get(export_report))
        .route("/reports/summary", get(report_summary))
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Query parameters for report export.
#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    /// Record kind or `all` (defaults to `all`).
    #[serde(alias = "recordType")]
    pub kind: Option<String>,
    /// `document`/`pdf` or `spreadsheet`/`excel`/`xlsx` (defaults to PDF).
    #[serde(alias = "type")]
    pub format: Option<String>,
    /// Start date, `YYYY-MM-DD`.
    pub from: Option<String>,
    /// End date, `YYYY-MM-DD`.
    pub to: Option<String>,
}

/// Query parameters for the report summary.
#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    /// Record kind or `all` (defaults to `all`).
    #[serde(alias = "recordType")]
    pub kind: Option<String>,
    /// Start date, `YYYY-MM-DD`.
    pub from: Option<String>,
    /// End date, `YYYY-MM-DD`.
    pub to: Option<String>,
    /// Months on or after this date are marked open (defaults to today).
    pub as_of: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

async fn export_report(
    State(state): State<AppState>,
    query: Result<Query<ExportQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return query_rejection_response(&rejection),
    };
    let request = match ReportRequest::parse(
        query.kind.as_deref(),
        query.format.as_deref(),
        query.from.as_deref(),
        query.to.as_deref(),
    ) {
        Ok(request) => request,
        Err(e) => return report_error_response(&e),
    };

    match state.generate_report(&request).await {
        Ok(artifact) => {
            info!(filename = %artifact.filename, "Report exported");
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, artifact.mime_type.to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", artifact.filename),
                    ),
                ],
                artifact.bytes,
            )
                .into_response()
        }
        Err(e) => report_error_response(&e),
    }
}

async fn report_summary(
    State(state): State<AppState>,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return query_rejection_response(&rejection),
    };
    let request = match ReportRequest::parse(
        query.kind.as_deref(),
        None,
        query.from.as_deref(),
        query.to.as_deref(),
    ) {
        Ok(request) => request,
        Err(e) => return report_error_response(&e),
    };

    let as_of = match query.as_of.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => match parse_date(raw) {
            Ok(date) => date,
            Err(e) => return report_error_response(&e),
        },
        None => chrono::Utc::now().date_naive(),
    };

    match state.reports.summarize(&request, as_of).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => report_error_response(&e),
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Reports an unreadable query string with the same JSON error body.
fn query_rejection_response(rejection: &QueryRejection) -> Response {
    report_error_response(&ReportError::InvalidQuery(rejection.body_text()))
}

/// Maps a report error onto its status and JSON error body.
fn report_error_response(err: &ReportError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        error!(error = %err, "Report request failed");
    }

    let mut body = json!({
        "error": err.error_code(),
        "message": err.to_string(),
    });
    let failed = err.failed_kinds();
    if !failed.is_empty() {
        body["failed_kinds"] = json!(failed);
    }

    (status, Json(body)).into_response()
}
