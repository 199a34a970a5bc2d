//! Report data types.

use serde::Serialize;

use super::aggregate::{AggregateResult, KindTotals};
use super::entry::LedgerEntry;
use super::kind::{KindSelector, RecordKind};
use super::source::DateRange;

/// One kind's entries as presented in a rendered report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSection {
    /// Kind of every entry in the section.
    pub kind: RecordKind,
    /// Entries in source order.
    pub entries: Vec<LedgerEntry>,
}

impl ReportSection {
    /// Creates a section.
    #[must_use]
    pub const fn new(kind: RecordKind, entries: Vec<LedgerEntry>) -> Self {
        Self { kind, entries }
    }

    /// Section subtotal.
    #[must_use]
    pub fn totals(&self) -> KindTotals {
        let mut totals = KindTotals::default();
        for entry in &self.entries {
            totals.add(entry);
        }
        totals
    }

    /// Returns true if the section has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A rendered, downloadable report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifact {
    /// Complete file contents.
    pub bytes: Vec<u8>,
    /// MIME type of `bytes`.
    pub mime_type: &'static str,
    /// Suggested download filename.
    pub filename: String,
}

/// JSON summary of an aggregate, for dashboards.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    /// Kinds covered.
    pub kind: String,
    /// Date filter applied.
    pub range: DateRange,
    /// Whether grand totals mix kinds whose flows are not commensurate.
    pub mixed_kinds: bool,
    /// Aggregated figures.
    #[serde(flatten)]
    pub aggregate: AggregateResult,
}

impl ReportSummary {
    /// Wraps an aggregate for the given request scope.
    #[must_use]
    pub fn new(selector: KindSelector, range: DateRange, aggregate: AggregateResult) -> Self {
        Self {
            kind: selector.to_string(),
            range,
            mixed_kinds: selector == KindSelector::All,
            aggregate,
        }
    }
}
