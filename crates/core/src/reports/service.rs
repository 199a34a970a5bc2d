//! Report orchestration: fetch, normalize, aggregate, render.

use std::sync::Arc;
use std::time::Duration;

use almoner_shared::ReportsConfig;
use chrono::NaiveDate;
use futures::future::join_all;
use tracing::{info, warn};

use super::aggregate::{AggregateResult, Aggregator};
use super::error::{KindFailure, ReportError, SourceError};
use super::kind::{KindSelector, RecordKind};
use super::normalize::Normalizer;
use super::raw::RawRecord;
use super::render::{RenderContext, Renderer};
use super::request::ReportRequest;
use super::source::{DateRange, RecordSource};
use super::types::{ReportArtifact, ReportSection, ReportSummary};

/// Default upper bound on a single source fetch.
const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_secs(10);

/// Default document title.
const DEFAULT_TITLE: &str = "Finance Report";

/// Drives a report request end to end.
///
/// Holds no per-request state; one instance serves every request.
#[derive(Clone)]
pub struct ReportService {
    source: Arc<dyn RecordSource>,
    timeout: Duration,
    title: String,
}

impl ReportService {
    /// Creates a service reading from `source` with default settings.
    #[must_use]
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self {
            source,
            timeout: DEFAULT_SOURCE_TIMEOUT,
            title: DEFAULT_TITLE.to_string(),
        }
    }

    /// Creates a service configured from `config`.
    #[must_use]
    pub fn from_config(source: Arc<dyn RecordSource>, config: &ReportsConfig) -> Self {
        Self::new(source)
            .with_timeout(Duration::from_secs(config.source_timeout_secs))
            .with_title(config.title.clone())
    }

    /// Sets the per-kind fetch timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the document title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Generates the artifact for a validated request.
    ///
    /// # Errors
    ///
    /// Returns a source error if any requested kind cannot be fetched, or
    /// `RenderFailure` if the artifact cannot be serialized.
    pub async fn generate_report(
        &self,
        request: &ReportRequest,
    ) -> Result<ReportArtifact, ReportError> {
        let sections = self.sections(request.selector, &request.range).await?;
        let aggregate = Self::aggregate_sections(&sections, None);

        let context = RenderContext {
            title: &self.title,
            selector: request.selector,
            range: request.range,
        };
        let artifact = Renderer::render(&sections, &aggregate, request.format, &context)?;

        info!(
            kind = %request.selector,
            format = %request.format,
            entries = aggregate.grand_totals.record_count,
            bytes = artifact.bytes.len(),
            "Report generated"
        );

        Ok(artifact)
    }

    /// Aggregates a request without rendering, marking months on or after
    /// `as_of` as open.
    ///
    /// # Errors
    ///
    /// Returns a source error if any requested kind cannot be fetched.
    pub async fn summarize(
        &self,
        request: &ReportRequest,
        as_of: NaiveDate,
    ) -> Result<ReportSummary, ReportError> {
        let sections = self.sections(request.selector, &request.range).await?;
        let aggregate = Self::aggregate_sections(&sections, Some(as_of));

        info!(
            kind = %request.selector,
            entries = aggregate.grand_totals.record_count,
            months = aggregate.monthly.len(),
            "Report summary computed"
        );

        Ok(ReportSummary::new(request.selector, request.range, aggregate))
    }

    /// Fetches and normalizes one section per selected kind.
    ///
    /// Kinds are fetched concurrently, each bounded by the service timeout.
    /// Any failure aborts the whole request.
    ///
    /// # Errors
    ///
    /// Returns `SourceUnavailable` when a single requested kind fails, and
    /// `PartialSourceFailure` naming every failed kind otherwise.
    pub async fn sections(
        &self,
        selector: KindSelector,
        range: &DateRange,
    ) -> Result<Vec<ReportSection>, ReportError> {
        let kinds = selector.kinds();
        let results = join_all(kinds.iter().map(|kind| self.fetch_kind(*kind, range))).await;

        let mut sections = Vec::with_capacity(kinds.len());
        let mut failures = Vec::new();
        for (kind, result) in kinds.into_iter().zip(results) {
            match result {
                Ok(records) => {
                    sections.push(ReportSection::new(kind, Normalizer::normalize_all(&records)));
                }
                Err(err) => {
                    warn!(kind = %kind, error = %err, "Record fetch failed");
                    failures.push(KindFailure {
                        kind,
                        reason: err.to_string(),
                    });
                }
            }
        }

        if failures.is_empty() {
            return Ok(sections);
        }
        if let (KindSelector::Single(_), [failure]) = (selector, failures.as_slice()) {
            return Err(ReportError::SourceUnavailable {
                kind: failure.kind,
                reason: failure.reason.clone(),
            });
        }
        Err(ReportError::PartialSourceFailure { failures })
    }

    async fn fetch_kind(
        &self,
        kind: RecordKind,
        range: &DateRange,
    ) -> Result<Vec<RawRecord>, SourceError> {
        tokio::time::timeout(self.timeout, self.source.fetch(kind, range))
            .await
            .unwrap_or(Err(SourceError::Timeout(self.timeout)))
    }

    fn aggregate_sections(sections: &[ReportSection], as_of: Option<NaiveDate>) -> AggregateResult {
        let entries = sections.iter().flat_map(|section| &section.entries);
        match as_of {
            Some(as_of) => Aggregator::aggregate_as_of(entries, as_of),
            None => Aggregator::aggregate(entries),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::source::InMemorySource;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn source() -> InMemorySource {
        InMemorySource::new().with_records([
            RawRecord::from_dated_document(
                RecordKind::Offerings,
                day("2025-01-05"),
                &json!({"offerings": {"mainService": 10000}}),
            ),
            RawRecord::from_dated_document(
                RecordKind::Offerings,
                day("2025-01-26"),
                &json!({"offerings": {"mainService": 8000}, "closing": {"tithe": 800}}),
            ),
            RawRecord::from_dated_document(
                RecordKind::Offerings,
                day("2025-02-02"),
                &json!({"offerings": {"mainService": 12000}}),
            ),
            RawRecord::from_dated_document(
                RecordKind::SundaySchool,
                day("2025-01-12"),
                &json!({"year": 2025, "amount": 450}),
            ),
        ])
    }

    fn request(kind: &str, format: &str) -> ReportRequest {
        ReportRequest::parse(Some(kind), Some(format), Some("2025-01-01"), Some("2025-03-31"))
            .unwrap()
    }

    #[tokio::test]
    async fn test_generate_document() {
        let service = ReportService::new(Arc::new(source()));
        let artifact = service
            .generate_report(&request("offerings", "pdf"))
            .await
            .unwrap();

        assert!(artifact.bytes.starts_with(b"%PDF"));
        assert_eq!(artifact.mime_type, "application/pdf");
        assert_eq!(
            artifact.filename,
            "finance-report-offerings-2025-01-01-2025-03-31.pdf"
        );
    }

    #[tokio::test]
    async fn test_generate_spreadsheet_for_all_kinds() {
        let service = ReportService::new(Arc::new(source()));
        let artifact = service
            .generate_report(&request("all", "xlsx"))
            .await
            .unwrap();
        assert!(artifact.bytes.starts_with(b"PK"));
    }

    #[tokio::test]
    async fn test_sections_one_per_kind_in_order() {
        let service = ReportService::new(Arc::new(source()));
        let sections = service
            .sections(KindSelector::All, &DateRange::unbounded())
            .await
            .unwrap();

        let kinds: Vec<RecordKind> = sections.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, RecordKind::ALL.to_vec());
        assert_eq!(sections[0].entries.len(), 3);
        assert!(sections[1].is_empty());
        assert_eq!(sections[2].entries[0].inflow_total, dec!(450));
    }

    #[tokio::test]
    async fn test_summarize_combines_kinds() {
        let service = ReportService::new(Arc::new(source()));
        let summary = service
            .summarize(&request("all", "pdf"), day("2025-02-10"))
            .await
            .unwrap();

        assert!(summary.mixed_kinds);
        assert_eq!(summary.aggregate.grand_totals.inflow, dec!(30450));
        assert_eq!(summary.aggregate.grand_totals.record_count, 4);
        assert_eq!(summary.aggregate.closing_count, 1);
        let open: Vec<bool> = summary.aggregate.monthly.iter().map(|b| b.is_open).collect();
        assert_eq!(open, vec![false, true]);
    }

    #[tokio::test]
    async fn test_single_kind_failure_is_source_unavailable() {
        let service =
            ReportService::new(Arc::new(source().with_unavailable(RecordKind::Construction)));
        let err = service
            .generate_report(&request("construction", "pdf"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ReportError::SourceUnavailable {
                kind: RecordKind::Construction,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_all_kinds_with_failure_is_partial_failure() {
        let service =
            ReportService::new(Arc::new(source().with_unavailable(RecordKind::Construction)));
        let err = service
            .generate_report(&request("all", "pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, ReportError::PartialSourceFailure { .. }));
        assert_eq!(err.failed_kinds(), vec![RecordKind::Construction]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_source_times_out() {
        let slow = source().with_latency(RecordKind::Expenditure, Duration::from_secs(30));
        let service = ReportService::new(Arc::new(slow)).with_timeout(Duration::from_secs(1));
        let err = service
            .sections(KindSelector::All, &DateRange::unbounded())
            .await
            .unwrap_err();

        let ReportError::PartialSourceFailure { failures } = err else {
            panic!("expected partial failure, got {err:?}");
        };
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].kind, RecordKind::Expenditure);
        assert!(failures[0].reason.contains("did not answer"));
    }

    #[test]
    fn test_from_config() {
        let config = ReportsConfig {
            source_timeout_secs: 3,
            title: "Parish Accounts".to_string(),
            ..ReportsConfig::default()
        };
        let service = ReportService::from_config(Arc::new(InMemorySource::new()), &config);
        assert_eq!(service.timeout, Duration::from_secs(3));
        assert_eq!(service.title, "Parish Accounts");
    }
}
