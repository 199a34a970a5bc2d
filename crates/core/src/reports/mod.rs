//! Financial aggregation and reporting.
//!
//! Records flow strictly downward through the engine:
//! - [`source`] - fetches raw records of one kind within a date range
//! - [`normalize`] - converts each record kind into a [`LedgerEntry`]
//! - [`aggregate`] - folds entries into totals, month buckets and closing sums
//! - [`render`] - serializes sections into a PDF or XLSX artifact
//! - [`service`] - validates, fetches concurrently and drives the rest
//!
//! [`cache`] wraps the service with an artifact cache.

pub mod aggregate;
pub mod cache;
pub mod calendar;
pub mod entry;
pub mod error;
pub mod kind;
pub mod normalize;
pub mod raw;
pub mod render;
pub mod request;
pub mod service;
pub mod source;
pub mod types;

#[cfg(test)]
mod props;

pub use aggregate::{AggregateResult, Aggregator, GrandTotals, KindTotals, MonthBucket};
pub use cache::{CachedReportService, ReportFingerprint};
pub use entry::{Breakdown, ClosingFigures, Flow, LedgerEntry};
pub use error::{KindFailure, ReportError, SourceError};
pub use kind::{KindSelector, RecordKind};
pub use normalize::Normalizer;
pub use raw::RawRecord;
pub use render::{ReportFormat, Renderer};
pub use request::ReportRequest;
pub use service::ReportService;
pub use source::{DateRange, InMemorySource, RecordSource};
pub use types::{ReportArtifact, ReportSection, ReportSummary};
