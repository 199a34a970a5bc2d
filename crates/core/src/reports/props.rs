//! Property-based tests for normalization and aggregation.

use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;
use serde_json::{Value, json};

use super::aggregate::Aggregator;
use super::entry::Flow;
use super::kind::RecordKind;
use super::normalize::Normalizer;
use super::raw::RawRecord;
use super::source::{DateRange, InMemorySource, RecordSource};

/// Strategy to generate non-negative amounts (0.00 to 999,999.99).
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate dates across 2024-2026.
fn record_date() -> impl Strategy<Value = NaiveDate> {
    (0u64..1096).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|start| start.checked_add_days(Days::new(offset)))
            .unwrap_or_default()
    })
}

fn kind() -> impl Strategy<Value = RecordKind> {
    prop::sample::select(RecordKind::ALL.to_vec())
}

/// A document carrying every field any kind reads, amounts as strings.
fn document(a: &[Decimal]) -> Value {
    let s = |i: usize| Value::String(a[i].to_string());
    json!({
        "offerings": {
            "mainService": s(0),
            "hbc": {"jerusalem": s(1), "emmanuel": s(2), "ebenezer": s(3), "agape": s(4)},
            "sundaySchool": s(5),
            "total": "1"
        },
        "expenditure": {
            "tithe": s(6), "apostolic": s(7), "bricks": s(8),
            "banking": s(9), "pastorsUse": s(10), "sundaySchool": s(11)
        },
        "construction": {"churchLand": s(0), "projectBegan": s(1), "planDesign": s(2)},
        "approvals": {
            "publicHealth": s(3), "physicalPlanning": s(4),
            "urbanDevelopment": s(5), "titleDeed": s(6)
        },
        "amount": s(0),
        "tithe": s(6), "apostolic": s(7), "bricks": s(8),
        "banking": s(9), "pastorsUse": s(10), "sundaySchool": s(11)
    })
}

/// Inflow and outflow the document should normalize to for `kind`.
fn expected_totals(kind: RecordKind, a: &[Decimal]) -> (Decimal, Decimal) {
    let sum = |range: std::ops::Range<usize>| a[range].iter().copied().sum::<Decimal>();
    match kind {
        RecordKind::Offerings => (sum(0..6), sum(6..12)),
        RecordKind::Construction => (Decimal::ZERO, sum(0..7)),
        RecordKind::SundaySchool => (a[0], Decimal::ZERO),
        RecordKind::Expenditure => (Decimal::ZERO, sum(6..12)),
    }
}

fn generated() -> impl Strategy<Value = (RecordKind, NaiveDate, Vec<Decimal>)> {
    (kind(), record_date(), prop::collection::vec(amount(), 12))
}

fn raw_records() -> impl Strategy<Value = Vec<RawRecord>> {
    prop::collection::vec(generated(), 0..40).prop_map(|items| {
        items
            .into_iter()
            .map(|(kind, date, amounts)| {
                RawRecord::from_dated_document(kind, date, &document(&amounts))
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Entry totals always equal the sums of their breakdown, and equal the
    /// itemized amounts of the source document.
    #[test]
    fn prop_normalized_totals_follow_breakdown((kind, date, amounts) in generated()) {
        let record = RawRecord::from_dated_document(kind, date, &document(&amounts));
        let entry = Normalizer::normalize(&record);

        prop_assert_eq!(entry.inflow_total, entry.breakdown.total(Flow::Inflow));
        prop_assert_eq!(entry.outflow_total, entry.breakdown.total(Flow::Outflow));

        let (inflow, outflow) = expected_totals(kind, &amounts);
        prop_assert_eq!(entry.inflow_total, inflow);
        prop_assert_eq!(entry.outflow_total, outflow);
        prop_assert!(entry.breakdown.items().iter().all(|i| !i.amount.is_sign_negative()));
    }

    /// Normalizing the same record twice yields equal entries.
    #[test]
    fn prop_normalize_is_idempotent((kind, date, amounts) in generated()) {
        let record = RawRecord::from_dated_document(kind, date, &document(&amounts));
        prop_assert_eq!(Normalizer::normalize(&record), Normalizer::normalize(&record));
    }

    /// Month buckets come out strictly ascending whatever the input order.
    #[test]
    fn prop_buckets_strictly_ascending(records in raw_records()) {
        let entries = Normalizer::normalize_all(&records);
        let result = Aggregator::aggregate(&entries);

        for pair in result.monthly.windows(2) {
            prop_assert!(pair[0].period < pair[1].period);
        }
    }

    /// Grand totals equal the sum over every bucket and kind.
    #[test]
    fn prop_grand_totals_equal_bucket_sums(records in raw_records()) {
        let entries = Normalizer::normalize_all(&records);
        let result = Aggregator::aggregate(&entries);

        let inflow: Decimal = result.monthly.iter().map(|b| b.inflow()).sum();
        let outflow: Decimal = result.monthly.iter().map(|b| b.outflow()).sum();
        let count: u64 = result
            .monthly
            .iter()
            .flat_map(|b| b.per_kind.values())
            .map(|t| t.count)
            .sum();

        prop_assert_eq!(result.grand_totals.inflow, inflow);
        prop_assert_eq!(result.grand_totals.outflow, outflow);
        prop_assert_eq!(result.grand_totals.net, inflow - outflow);
        prop_assert_eq!(count, entries.len() as u64);
        prop_assert_eq!(
            result.closing_count,
            entries.iter().filter(|e| e.is_closing()).count() as u64
        );
    }

    /// Every fetched record lies within the requested range.
    #[test]
    fn prop_fetched_records_within_range(
        records in raw_records(),
        kind in kind(),
        a in record_date(),
        b in record_date(),
    ) {
        let range = DateRange::new(Some(a.min(b)), Some(a.max(b))).unwrap();
        let expected = records
            .iter()
            .filter(|r| r.kind() == kind && range.contains(r.date()))
            .count();
        let source = InMemorySource::new().with_records(records);

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let fetched = runtime.block_on(source.fetch(kind, &range)).unwrap();

        prop_assert_eq!(fetched.len(), expected);
        for record in &fetched {
            prop_assert_eq!(record.kind(), kind);
            prop_assert!(range.contains(record.date()));
        }
    }
}
