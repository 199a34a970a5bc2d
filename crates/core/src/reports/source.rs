//! Record source seam: how the engine reads stored records.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;

use super::error::{ReportError, SourceError};
use super::kind::RecordKind;
use super::raw::RawRecord;

/// Inclusive calendar date filter. Either bound may be open.
///
/// Construction rejects `from > to`, so a source is never handed an
/// inverted range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

impl DateRange {
    /// Creates a range.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRange` if both bounds are set and `from > to`.
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Self, ReportError> {
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(ReportError::InvalidRange { from, to });
            }
        }
        Ok(Self { from, to })
    }

    /// A range with no bounds: every record matches.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            from: None,
            to: None,
        }
    }

    /// Lower bound, inclusive.
    #[must_use]
    pub const fn from(&self) -> Option<NaiveDate> {
        self.from
    }

    /// Upper bound, inclusive.
    #[must_use]
    pub const fn to(&self) -> Option<NaiveDate> {
        self.to
    }

    /// Returns true if neither bound is set.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Returns true if `date` lies within the range, bounds included.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }
}

/// A store of financial records, queried one kind at a time.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Returns every record of `kind` whose own date lies within `range`,
    /// ordered by date.
    async fn fetch(
        &self,
        kind: RecordKind,
        range: &DateRange,
    ) -> Result<Vec<RawRecord>, SourceError>;
}

/// Record source held entirely in memory.
///
/// Kinds can be marked unavailable or slow to exercise failure handling.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    records: HashMap<RecordKind, Vec<RawRecord>>,
    unavailable: HashSet<RecordKind>,
    latency: HashMap<RecordKind, Duration>,
}

impl InMemorySource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds records, each filed under its own kind.
    #[must_use]
    pub fn with_records(mut self, records: impl IntoIterator<Item = RawRecord>) -> Self {
        for record in records {
            self.push(record);
        }
        self
    }

    /// Adds one record.
    pub fn push(&mut self, record: RawRecord) {
        self.records.entry(record.kind()).or_default().push(record);
    }

    /// Makes every fetch of `kind` fail.
    #[must_use]
    pub fn with_unavailable(mut self, kind: RecordKind) -> Self {
        self.unavailable.insert(kind);
        self
    }

    /// Delays every fetch of `kind` by `delay`.
    #[must_use]
    pub fn with_latency(mut self, kind: RecordKind, delay: Duration) -> Self {
        self.latency.insert(kind, delay);
        self
    }
}

#[async_trait]
impl RecordSource for InMemorySource {
    async fn fetch(
        &self,
        kind: RecordKind,
        range: &DateRange,
    ) -> Result<Vec<RawRecord>, SourceError> {
        if let Some(delay) = self.latency.get(&kind) {
            tokio::time::sleep(*delay).await;
        }
        if self.unavailable.contains(&kind) {
            return Err(SourceError::Unavailable(format!(
                "{kind} collection is offline"
            )));
        }

        let mut matching: Vec<RawRecord> = self
            .records
            .get(&kind)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| range.contains(r.date()))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        matching.sort_by_key(RawRecord::date);
        Ok(matching)
    }
}
