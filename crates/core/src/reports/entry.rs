//! Normalized ledger entry shared by every record kind.

use std::ops::AddAssign;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::kind::RecordKind;

/// Direction of money for a breakdown line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flow {
    /// Money received.
    Inflow,
    /// Money paid out.
    Outflow,
}

/// One categorized amount of a ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakdownItem {
    /// Stable category key, e.g. `main_service`.
    pub key: &'static str,
    /// Display label, e.g. `Main Service`.
    pub label: &'static str,
    /// Whether the amount counts towards inflow or outflow.
    pub flow: Flow,
    /// Amount, never negative.
    pub amount: Decimal,
}

/// Ordered category breakdown of a ledger entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Breakdown {
    items: Vec<BreakdownItem>,
}

impl Breakdown {
    /// Creates an empty breakdown.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Appends an inflow category.
    #[must_use]
    pub fn inflow(mut self, key: &'static str, label: &'static str, amount: Decimal) -> Self {
        self.items.push(BreakdownItem {
            key,
            label,
            flow: Flow::Inflow,
            amount,
        });
        self
    }

    /// Appends an outflow category.
    #[must_use]
    pub fn outflow(mut self, key: &'static str, label: &'static str, amount: Decimal) -> Self {
        self.items.push(BreakdownItem {
            key,
            label,
            flow: Flow::Outflow,
            amount,
        });
        self
    }

    /// Items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[BreakdownItem] {
        &self.items
    }

    /// Looks up a category amount by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Decimal> {
        self.items
            .iter()
            .find(|item| item.key == key)
            .map(|item| item.amount)
    }

    /// Category keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.items.iter().map(|item| item.key)
    }

    /// Sum of all categories flowing in `flow`'s direction.
    #[must_use]
    pub fn total(&self, flow: Flow) -> Decimal {
        self.items
            .iter()
            .filter(|item| item.flow == flow)
            .map(|item| item.amount)
            .sum()
    }
}

/// Month-end reconciliation figures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosingFigures {
    /// Tithe remitted at month end.
    pub tithe: Decimal,
    /// Apostolic levy remitted at month end.
    pub apostolic: Decimal,
    /// Transaction fee charged on the remittance.
    pub transaction_fee: Decimal,
}

impl ClosingFigures {
    /// Returns true if any figure is non-zero.
    #[must_use]
    pub fn has_any(&self) -> bool {
        !(self.tithe.is_zero() && self.apostolic.is_zero() && self.transaction_fee.is_zero())
    }

    /// Sum of all figures.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.tithe + self.apostolic + self.transaction_fee
    }
}

impl AddAssign<&ClosingFigures> for ClosingFigures {
    fn add_assign(&mut self, other: &ClosingFigures) {
        self.tithe += other.tithe;
        self.apostolic += other.apostolic;
        self.transaction_fee += other.transaction_fee;
    }
}

/// A record of any kind in the common shape used by aggregation and rendering.
///
/// `inflow_total` and `outflow_total` always equal the matching sums of
/// `breakdown`; construct entries through [`LedgerEntry::new`] to keep that so.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    /// Day the record pertains to.
    pub date: NaiveDate,
    /// Record kind.
    pub kind: RecordKind,
    /// Sum of inflow categories.
    pub inflow_total: Decimal,
    /// Sum of outflow categories.
    pub outflow_total: Decimal,
    /// Category amounts.
    pub breakdown: Breakdown,
    /// Month-end figures, present only for closing records.
    pub closing: Option<ClosingFigures>,
    /// Free-text notes carried for detail views.
    pub notes: Option<String>,
}

impl LedgerEntry {
    /// Builds an entry, deriving both totals from the breakdown.
    #[must_use]
    pub fn new(date: NaiveDate, kind: RecordKind, breakdown: Breakdown) -> Self {
        Self {
            date,
            kind,
            inflow_total: breakdown.total(Flow::Inflow),
            outflow_total: breakdown.total(Flow::Outflow),
            breakdown,
            closing: None,
            notes: None,
        }
    }

    /// Attaches month-end figures.
    #[must_use]
    pub fn with_closing(mut self, closing: Option<ClosingFigures>) -> Self {
        self.closing = closing;
        self
    }

    /// Attaches notes.
    #[must_use]
    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes;
        self
    }

    /// Returns true if this entry is a month-closing record.
    #[must_use]
    pub const fn is_closing(&self) -> bool {
        self.closing.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_entry_totals_follow_breakdown() {
        let breakdown = Breakdown::new()
            .inflow("main_service", "Main Service", dec!(5000))
            .inflow("sunday_school", "Sunday School", dec!(250.50))
            .outflow("tithe", "Tithe", dec!(500));
        let entry = LedgerEntry::new(
            NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
            RecordKind::Offerings,
            breakdown,
        );

        assert_eq!(entry.inflow_total, dec!(5250.50));
        assert_eq!(entry.outflow_total, dec!(500));
        assert!(!entry.is_closing());
    }

    #[test]
    fn test_breakdown_lookup_and_order() {
        let breakdown = Breakdown::new()
            .outflow("b", "B", dec!(2))
            .inflow("a", "A", dec!(1));
        assert_eq!(breakdown.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(breakdown.get("a"), Some(dec!(1)));
        assert_eq!(breakdown.get("missing"), None);
    }

    #[test]
    fn test_closing_figures() {
        let mut totals = ClosingFigures::default();
        assert!(!totals.has_any());

        totals += &ClosingFigures {
            tithe: dec!(800),
            apostolic: dec!(200),
            transaction_fee: dec!(33),
        };
        assert!(totals.has_any());
        assert_eq!(totals.total(), dec!(1033));
    }
}
