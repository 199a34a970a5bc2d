//! Report error types.

use std::time::Duration;

use almoner_shared::AppError;
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use super::kind::RecordKind;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Invalid date range.
    #[error("Invalid date range: start {from} is after end {to}")]
    InvalidRange {
        /// Start date.
        from: NaiveDate,
        /// End date.
        to: NaiveDate,
    },

    /// Output format outside the supported artifacts.
    #[error("Unsupported report format: {0}")]
    UnsupportedFormat(String),

    /// Record kind selector not recognized.
    #[error("Unknown record kind: {0}")]
    UnknownKind(String),

    /// Date parameter not in `YYYY-MM-DD` form.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Query string could not be read into report parameters.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// The record store could not be reached for a kind.
    #[error("Records for {kind} are unavailable: {reason}")]
    SourceUnavailable {
        /// Kind that failed.
        kind: RecordKind,
        /// Underlying cause.
        reason: String,
    },

    /// One or more kinds failed while fetching every kind.
    #[error("Records unavailable for: {}", join_kinds(.failures))]
    PartialSourceFailure {
        /// Every kind that failed, with its cause.
        failures: Vec<KindFailure>,
    },

    /// Artifact serialization failed.
    #[error("Failed to render report: {0}")]
    RenderFailure(String),
}

impl ReportError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidRange { .. }
            | Self::UnsupportedFormat(_)
            | Self::UnknownKind(_)
            | Self::InvalidDate(_)
            | Self::InvalidQuery(_) => 400,
            Self::SourceUnavailable { .. }
            | Self::PartialSourceFailure { .. }
            | Self::RenderFailure(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRange { .. } => "invalid_range",
            Self::UnsupportedFormat(_) => "unsupported_format",
            Self::UnknownKind(_) => "unknown_kind",
            Self::InvalidDate(_) => "invalid_date",
            Self::InvalidQuery(_) => "invalid_query",
            Self::SourceUnavailable { .. } => "source_unavailable",
            Self::PartialSourceFailure { .. } => "partial_source_failure",
            Self::RenderFailure(_) => "render_failure",
        }
    }

    /// Kinds whose fetch failed, if this is a source error.
    #[must_use]
    pub fn failed_kinds(&self) -> Vec<RecordKind> {
        match self {
            Self::SourceUnavailable { kind, .. } => vec![*kind],
            Self::PartialSourceFailure { failures } => failures.iter().map(|f| f.kind).collect(),
            _ => Vec::new(),
        }
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::InvalidRange { .. }
            | ReportError::UnsupportedFormat(_)
            | ReportError::UnknownKind(_)
            | ReportError::InvalidDate(_)
            | ReportError::InvalidQuery(_) => Self::Validation(err.to_string()),
            ReportError::SourceUnavailable { .. } | ReportError::PartialSourceFailure { .. } => {
                Self::ExternalService(err.to_string())
            }
            ReportError::RenderFailure(_) => Self::Internal(err.to_string()),
        }
    }
}

/// A kind whose fetch failed, with the cause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KindFailure {
    /// Kind that failed.
    pub kind: RecordKind,
    /// Underlying cause.
    pub reason: String,
}

fn join_kinds(failures: &[KindFailure]) -> String {
    failures
        .iter()
        .map(|f| f.kind.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors raised by a record source.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    /// The store could not be reached or the query failed.
    #[error("record store unavailable: {0}")]
    Unavailable(String),

    /// The store did not answer in time.
    #[error("record store did not answer within {0:?}")]
    Timeout(Duration),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_400() {
        let day = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        for err in [
            ReportError::InvalidRange { from: day, to: day },
            ReportError::UnsupportedFormat("csv".into()),
            ReportError::UnknownKind("tithes".into()),
            ReportError::InvalidDate("01/02/2025".into()),
            ReportError::InvalidQuery("duplicate field `format`".into()),
        ] {
            assert_eq!(err.status_code(), 400);
            assert!(matches!(AppError::from(err), AppError::Validation(_)));
        }
    }

    #[test]
    fn test_source_and_render_errors_are_500() {
        let source = ReportError::SourceUnavailable {
            kind: RecordKind::Construction,
            reason: "connection refused".into(),
        };
        assert_eq!(source.status_code(), 500);
        assert_eq!(source.failed_kinds(), vec![RecordKind::Construction]);
        assert!(matches!(
            AppError::from(source),
            AppError::ExternalService(_)
        ));

        let render = ReportError::RenderFailure("out of memory".into());
        assert_eq!(render.status_code(), 500);
        assert!(matches!(AppError::from(render), AppError::Internal(_)));
    }

    #[test]
    fn test_partial_failure_names_every_kind() {
        let err = ReportError::PartialSourceFailure {
            failures: vec![
                KindFailure {
                    kind: RecordKind::Construction,
                    reason: "timeout".into(),
                },
                KindFailure {
                    kind: RecordKind::SundaySchool,
                    reason: "refused".into(),
                },
            ],
        };
        assert_eq!(
            err.to_string(),
            "Records unavailable for: construction, sunday-school"
        );
        assert_eq!(err.error_code(), "partial_source_failure");
        assert_eq!(
            err.failed_kinds(),
            vec![RecordKind::Construction, RecordKind::SundaySchool]
        );
    }
}
