//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - Report export and summary routes
//! - Health check
//! - Shared application state

pub mod routes;

use std::sync::Arc;

use almoner_core::reports::{
    CachedReportService, RecordSource, ReportArtifact, ReportError, ReportRequest, ReportService,
};
use almoner_shared::ReportsConfig;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Report engine.
    pub reports: Arc<ReportService>,
    /// Artifact cache in front of `reports`, when enabled.
    pub report_cache: Option<Arc<CachedReportService>>,
}

impl AppState {
    /// Builds the report engine over `source` as configured.
    #[must_use]
    pub fn new(source: Arc<dyn RecordSource>, config: &ReportsConfig) -> Self {
        let reports = ReportService::from_config(source, config);
        let report_cache = config
            .cache_enabled
            .then(|| Arc::new(CachedReportService::from_config(reports.clone(), config)));

        Self {
            reports: Arc::new(reports),
            report_cache,
        }
    }

    /// Generates a report artifact, through the cache when one is configured.
    ///
    /// # Errors
    ///
    /// Propagates report engine errors.
    pub async fn generate_report(
        &self,
        request: &ReportRequest,
    ) -> Result<ReportArtifact, ReportError> {
        match &self.report_cache {
            Some(cache) => cache.generate_report(request).await,
            None => self.reports.generate_report(request).await,
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
