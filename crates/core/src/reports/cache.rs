//! Rendered report caching using Moka.
//!
//! Wraps [`ReportService`] so that repeated exports of the same kind, range
//! and format reuse the artifact instead of fetching and rendering again.

use std::sync::Arc;
use std::time::Duration;

use almoner_shared::ReportsConfig;
use chrono::NaiveDate;
use moka::future::Cache;
use tracing::debug;

use super::error::ReportError;
use super::kind::KindSelector;
use super::render::ReportFormat;
use super::request::ReportRequest;
use super::service::ReportService;
use super::types::ReportArtifact;

/// Cache key identifying a report by everything that shapes its bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReportFingerprint {
    /// Kinds covered.
    pub selector: KindSelector,
    /// Lower date bound.
    pub from: Option<NaiveDate>,
    /// Upper date bound.
    pub to: Option<NaiveDate>,
    /// Artifact format.
    pub format: ReportFormat,
}

impl From<&ReportRequest> for ReportFingerprint {
    fn from(request: &ReportRequest) -> Self {
        Self {
            selector: request.selector,
            from: request.range.from(),
            to: request.range.to(),
            format: request.format,
        }
    }
}

/// Report service with an artifact cache in front of it.
///
/// Only successful renders are cached. Entries expire after the configured
/// TTL; call [`invalidate_all`](Self::invalidate_all) after records change.
#[derive(Clone)]
pub struct CachedReportService {
    inner: ReportService,
    cache: Cache<ReportFingerprint, Arc<ReportArtifact>>,
}

impl CachedReportService {
    /// Wraps `inner` with a cache of `max_capacity` artifacts, each living
    /// for `ttl_secs`.
    #[must_use]
    pub fn new(inner: ReportService, max_capacity: u64, ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { inner, cache }
    }

    /// Wraps `inner` using the cache settings in `config`.
    #[must_use]
    pub fn from_config(inner: ReportService, config: &ReportsConfig) -> Self {
        Self::new(inner, config.cache_capacity, config.cache_ttl_secs)
    }

    /// Generates a report, returning the cached artifact when one exists.
    ///
    /// # Errors
    ///
    /// Propagates errors from the wrapped service; failures are not cached.
    pub async fn generate_report(
        &self,
        request: &ReportRequest,
    ) -> Result<ReportArtifact, ReportError> {
        let key = ReportFingerprint::from(request);

        if let Some(cached) = self.cache.get(&key).await {
            debug!(kind = %request.selector, format = %request.format, "Report cache hit");
            return Ok((*cached).clone());
        }

        let artifact = self.inner.generate_report(request).await?;
        self.cache.insert(key, Arc::new(artifact.clone())).await;
        Ok(artifact)
    }

    /// Drops every cached artifact.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Number of cached artifacts. May lag behind recent inserts until
    /// pending maintenance runs.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Runs pending cache maintenance.
    pub async fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks().await;
    }
}
