//! Normalization of raw records into [`LedgerEntry`] values.

use chrono::NaiveDate;
use serde_json::Value;

use super::calendar::is_last_sunday_of_month;
use super::entry::{Breakdown, ClosingFigures, LedgerEntry};
use super::kind::RecordKind;
use super::raw::{
    ConstructionRecord, ExpenditureRecord, OfferingsRecord, RawRecord, SundaySchoolRecord,
};

/// Converts raw records of every kind into the common ledger shape.
///
/// Totals are always recomputed from the itemized fields; totals stored on
/// the record are ignored.
pub struct Normalizer;

impl Normalizer {
    /// Normalizes a single raw record. Never fails.
    #[must_use]
    pub fn normalize(record: &RawRecord) -> LedgerEntry {
        let entry = match record {
            RawRecord::Offerings(r) => Self::offerings(r),
            RawRecord::Construction(r) => Self::construction(r),
            RawRecord::SundaySchool(r) => Self::sunday_school(r),
            RawRecord::Expenditure(r) => Self::expenditure(r),
        };
        entry.with_closing(Self::closing(record.date(), record.closing()))
    }

    /// Normalizes every record, preserving order.
    #[must_use]
    pub fn normalize_all(records: &[RawRecord]) -> Vec<LedgerEntry> {
        records.iter().map(Self::normalize).collect()
    }

    /// Normalizes an untyped stored document whose date is already known.
    #[must_use]
    pub fn normalize_document(kind: RecordKind, date: NaiveDate, doc: &Value) -> LedgerEntry {
        Self::normalize(&RawRecord::from_dated_document(kind, date, doc))
    }

    /// Month-end figures if the record is a closing record: dated on the last
    /// Sunday of its month, or carrying at least one non-zero closing figure.
    fn closing(date: NaiveDate, figures: &ClosingFigures) -> Option<ClosingFigures> {
        (is_last_sunday_of_month(date) || figures.has_any()).then_some(*figures)
    }

    fn offerings(r: &OfferingsRecord) -> LedgerEntry {
        let breakdown = Breakdown::new()
            .inflow("main_service", "Main Service", r.main_service)
            .inflow("hbc_jerusalem", "HBC Jerusalem", r.hbc.jerusalem)
            .inflow("hbc_emmanuel", "HBC Emmanuel", r.hbc.emmanuel)
            .inflow("hbc_ebenezer", "HBC Ebenezer", r.hbc.ebenezer)
            .inflow("hbc_agape", "HBC Agape", r.hbc.agape)
            .inflow("sunday_school", "Sunday School", r.sunday_school)
            .outflow("tithe", "Tithe", r.expenditure.tithe)
            .outflow("apostolic", "Apostolic Levy", r.expenditure.apostolic)
            .outflow("materials", "Materials", r.expenditure.bricks)
            .outflow("banking", "Banking Fees", r.expenditure.banking)
            .outflow("pastoral", "Pastoral Allowance", r.expenditure.pastors_use)
            .outflow(
                "sunday_school_allocation",
                "Sunday School Allocation",
                r.expenditure.sunday_school,
            );
        LedgerEntry::new(r.date, RecordKind::Offerings, breakdown)
    }

    fn construction(r: &ConstructionRecord) -> LedgerEntry {
        let breakdown = Breakdown::new()
            .outflow("church_land", "Church Land", r.costs.church_land)
            .outflow("project_began", "Project Began", r.costs.project_began)
            .outflow("plan_design", "Plan & Design", r.costs.plan_design)
            .outflow("public_health", "Public Health", r.approvals.public_health)
            .outflow(
                "physical_planning",
                "Physical Planning",
                r.approvals.physical_planning,
            )
            .outflow(
                "urban_development",
                "Urban Development",
                r.approvals.urban_development,
            )
            .outflow("title_deed", "Title Deed", r.approvals.title_deed);
        LedgerEntry::new(r.date, RecordKind::Construction, breakdown)
    }

    fn sunday_school(r: &SundaySchoolRecord) -> LedgerEntry {
        let breakdown = Breakdown::new().inflow("collection", "Collection", r.amount);
        LedgerEntry::new(r.date, RecordKind::SundaySchool, breakdown)
    }

    fn expenditure(r: &ExpenditureRecord) -> LedgerEntry {
        let breakdown = Breakdown::new()
            .outflow("tithe", "Tithe", r.items.tithe)
            .outflow("apostolic", "Apostolic Levy", r.items.apostolic)
            .outflow("materials", "Materials", r.items.bricks)
            .outflow("banking", "Banking Fees", r.items.banking)
            .outflow("pastoral", "Pastoral Allowance", r.items.pastors_use)
            .outflow(
                "sunday_school_allocation",
                "Sunday School Allocation",
                r.items.sunday_school,
            )
            .outflow("other", "Other", r.other);
        LedgerEntry::new(r.date, RecordKind::Expenditure, breakdown).with_notes(r.notes.clone())
    }
}
