//! Aggregation of ledger entries into totals, month buckets, and closing sums.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::calendar::PeriodKey;
use super::entry::{ClosingFigures, LedgerEntry};
use super::kind::RecordKind;

/// Inflow and outflow summed for one kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KindTotals {
    /// Total inflow.
    pub inflow: Decimal,
    /// Total outflow.
    pub outflow: Decimal,
    /// Number of entries folded in.
    pub count: u64,
}

impl KindTotals {
    /// Folds one entry in.
    pub fn add(&mut self, entry: &LedgerEntry) {
        self.inflow += entry.inflow_total;
        self.outflow += entry.outflow_total;
        self.count += 1;
    }
}

/// One calendar month of aggregated entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthBucket {
    /// Year and month; the sort key.
    pub period: PeriodKey,
    /// Display label derived from `period`, e.g. `Jan 2025`.
    pub label: String,
    /// Totals per kind within this month.
    pub per_kind: BTreeMap<RecordKind, KindTotals>,
    /// Whether the month is still open relative to the `as_of` date the
    /// aggregate was computed for. Always false without an `as_of` date.
    pub is_open: bool,
}

impl MonthBucket {
    fn new(period: PeriodKey) -> Self {
        Self {
            period,
            label: period.label(),
            per_kind: BTreeMap::new(),
            is_open: false,
        }
    }

    /// Inflow across all kinds in this month.
    #[must_use]
    pub fn inflow(&self) -> Decimal {
        self.per_kind.values().map(|t| t.inflow).sum()
    }

    /// Outflow across all kinds in this month.
    #[must_use]
    pub fn outflow(&self) -> Decimal {
        self.per_kind.values().map(|t| t.outflow).sum()
    }
}

/// Totals across the full filtered set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GrandTotals {
    /// Total inflow.
    pub inflow: Decimal,
    /// Total outflow.
    pub outflow: Decimal,
    /// Inflow minus outflow. May be negative.
    pub net: Decimal,
    /// Number of entries.
    pub record_count: u64,
}

/// Result of folding a set of ledger entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregateResult {
    /// Totals across everything.
    pub grand_totals: GrandTotals,
    /// Month buckets in ascending period order.
    pub monthly: Vec<MonthBucket>,
    /// Month-end figures summed over every closing record.
    pub closing_totals: ClosingFigures,
    /// Number of closing records.
    pub closing_count: u64,
}

impl AggregateResult {
    /// Distinct kinds that contributed at least one entry.
    #[must_use]
    pub fn kinds(&self) -> Vec<RecordKind> {
        let mut kinds: Vec<RecordKind> = self
            .monthly
            .iter()
            .flat_map(|bucket| bucket.per_kind.keys().copied())
            .collect();
        kinds.sort_unstable();
        kinds.dedup();
        kinds
    }
}

/// Folds ledger entries into an [`AggregateResult`].
pub struct Aggregator;

impl Aggregator {
    /// Aggregates entries in any order. Entries on the same day are all
    /// counted; uniqueness belongs to the record store.
    #[must_use]
    pub fn aggregate<'a, I>(entries: I) -> AggregateResult
    where
        I: IntoIterator<Item = &'a LedgerEntry>,
    {
        let mut inflow = Decimal::ZERO;
        let mut outflow = Decimal::ZERO;
        let mut record_count = 0u64;
        let mut buckets: BTreeMap<PeriodKey, MonthBucket> = BTreeMap::new();
        let mut closing_totals = ClosingFigures::default();
        let mut closing_count = 0u64;

        for entry in entries {
            inflow += entry.inflow_total;
            outflow += entry.outflow_total;
            record_count += 1;

            let period = PeriodKey::from_date(entry.date);
            buckets
                .entry(period)
                .or_insert_with(|| MonthBucket::new(period))
                .per_kind
                .entry(entry.kind)
                .or_default()
                .add(entry);

            if let Some(closing) = &entry.closing {
                closing_totals += closing;
                closing_count += 1;
            }
        }

        AggregateResult {
            grand_totals: GrandTotals {
                inflow,
                outflow,
                net: inflow - outflow,
                record_count,
            },
            // BTreeMap iteration is ascending by period key
            monthly: buckets.into_values().collect(),
            closing_totals,
            closing_count,
        }
    }

    /// Aggregates entries and marks every month on or after the month of
    /// `as_of` as still open.
    #[must_use]
    pub fn aggregate_as_of<'a, I>(entries: I, as_of: NaiveDate) -> AggregateResult
    where
        I: IntoIterator<Item = &'a LedgerEntry>,
    {
        let mut result = Self::aggregate(entries);
        let current = PeriodKey::from_date(as_of);
        for bucket in &mut result.monthly {
            bucket.is_open = bucket.period >= current;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::entry::Breakdown;
    use rust_decimal_macros::dec;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn offering(date: &str, inflow: Decimal) -> LedgerEntry {
        LedgerEntry::new(
            day(date),
            RecordKind::Offerings,
            Breakdown::new().inflow("main_service", "Main Service", inflow),
        )
    }

    fn construction(date: &str, outflow: Decimal) -> LedgerEntry {
        LedgerEntry::new(
            day(date),
            RecordKind::Construction,
            Breakdown::new().outflow("church_land", "Church Land", outflow),
        )
    }

    #[test]
    fn test_empty_input() {
        let result = Aggregator::aggregate(std::iter::empty::<&LedgerEntry>());
        assert_eq!(result.grand_totals, GrandTotals::default());
        assert!(result.monthly.is_empty());
        assert_eq!(result.closing_totals, ClosingFigures::default());
        assert_eq!(result.closing_count, 0);
    }

    #[test]
    fn test_three_offerings_scenario() {
        let entries = vec![
            offering("2025-01-05", dec!(10000)),
            offering("2025-01-26", dec!(8000)).with_closing(Some(ClosingFigures {
                tithe: dec!(800),
                ..ClosingFigures::default()
            })),
            offering("2025-02-02", dec!(12000)),
        ];

        let result = Aggregator::aggregate(&entries);

        assert_eq!(result.monthly.len(), 2);
        assert_eq!(result.monthly[0].period.value(), 202_501);
        assert_eq!(result.monthly[0].label, "Jan 2025");
        assert_eq!(
            result.monthly[0].per_kind[&RecordKind::Offerings].inflow,
            dec!(18000)
        );
        assert_eq!(result.monthly[1].period.value(), 202_502);
        assert_eq!(
            result.monthly[1].per_kind[&RecordKind::Offerings].inflow,
            dec!(12000)
        );
        assert_eq!(result.grand_totals.inflow, dec!(30000));
        assert_eq!(result.grand_totals.record_count, 3);
        assert_eq!(result.closing_totals.tithe, dec!(800));
        assert_eq!(result.closing_count, 1);
    }

    #[test]
    fn test_buckets_sorted_regardless_of_input_order() {
        let entries = vec![
            offering("2025-03-02", dec!(1)),
            offering("2024-12-01", dec!(1)),
            construction("2025-01-12", dec!(5)),
            offering("2025-01-05", dec!(1)),
        ];
        let result = Aggregator::aggregate(&entries);
        let labels: Vec<&str> = result.monthly.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Dec 2024", "Jan 2025", "Mar 2025"]);
    }

    #[test]
    fn test_same_day_entries_not_deduplicated() {
        let entries = vec![
            offering("2025-01-05", dec!(100)),
            offering("2025-01-05", dec!(100)),
        ];
        let result = Aggregator::aggregate(&entries);
        assert_eq!(result.grand_totals.inflow, dec!(200));
        assert_eq!(result.monthly[0].per_kind[&RecordKind::Offerings].count, 2);
    }

    #[test]
    fn test_net_may_be_negative() {
        let entries = vec![
            offering("2025-01-05", dec!(100)),
            construction("2025-01-12", dec!(450)),
        ];
        let result = Aggregator::aggregate(&entries);
        assert_eq!(result.grand_totals.net, dec!(-350));
        assert_eq!(
            result.kinds(),
            vec![RecordKind::Offerings, RecordKind::Construction]
        );
        assert_eq!(result.monthly[0].inflow(), dec!(100));
        assert_eq!(result.monthly[0].outflow(), dec!(450));
    }

    #[test]
    fn test_aggregate_as_of_marks_open_periods() {
        let entries = vec![
            offering("2025-01-05", dec!(1)),
            offering("2025-02-02", dec!(1)),
            offering("2025-03-02", dec!(1)),
        ];
        let result = Aggregator::aggregate_as_of(&entries, day("2025-02-15"));
        let open: Vec<bool> = result.monthly.iter().map(|b| b.is_open).collect();
        assert_eq!(open, vec![false, true, true]);

        let plain = Aggregator::aggregate(&entries);
        assert!(plain.monthly.iter().all(|b| !b.is_open));
    }
}
