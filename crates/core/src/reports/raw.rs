//! Raw stored records, one typed variant per record kind.
//!
//! Stored documents are operator-entered and loosely shaped. They are read
//! into these structs field by field: any amount that is missing or not a
//! usable number becomes zero, and unknown fields are ignored. The record
//! date comes from the store, never from the document.

use almoner_shared::types::parse_amount;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;

use super::entry::ClosingFigures;
use super::kind::RecordKind;

/// House-based-church group offerings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HbcOfferings {
    /// Jerusalem group.
    pub jerusalem: Decimal,
    /// Emmanuel group.
    pub emmanuel: Decimal,
    /// Ebenezer group.
    pub ebenezer: Decimal,
    /// Agape group.
    pub agape: Decimal,
}

/// Itemized church expenditure, shared by church accounts and the expenditure ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChurchExpenditure {
    /// Tithe.
    pub tithe: Decimal,
    /// Apostolic levy.
    pub apostolic: Decimal,
    /// Building materials (stored as `bricks`).
    pub bricks: Decimal,
    /// Banking fees.
    pub banking: Decimal,
    /// Pastoral allowance (stored as `pastorsUse`).
    pub pastors_use: Decimal,
    /// Sunday-school allocation.
    pub sunday_school: Decimal,
}

/// A church accounts record: service offerings and the church's expenditure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferingsRecord {
    /// Record date.
    pub date: NaiveDate,
    /// Main service offering.
    pub main_service: Decimal,
    /// Group offerings.
    pub hbc: HbcOfferings,
    /// Sunday-school share of the offering.
    pub sunday_school: Decimal,
    /// Total as stored by the operator. Display only; may be stale.
    pub stated_total: Decimal,
    /// Expenditure recorded alongside the offering.
    pub expenditure: ChurchExpenditure,
    /// Month-end figures, zero when absent.
    pub closing: ClosingFigures,
}

/// Construction project costs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConstructionCosts {
    /// Land purchase.
    pub church_land: Decimal,
    /// Project commencement.
    pub project_began: Decimal,
    /// Plan and design.
    pub plan_design: Decimal,
}

/// Statutory approval fees for the construction project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApprovalFees {
    /// Public health approval.
    pub public_health: Decimal,
    /// Physical planning approval.
    pub physical_planning: Decimal,
    /// Urban development approval.
    pub urban_development: Decimal,
    /// Title deed.
    pub title_deed: Decimal,
}

/// A construction ledger record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructionRecord {
    /// Record date.
    pub date: NaiveDate,
    /// Project costs.
    pub costs: ConstructionCosts,
    /// Approval fees.
    pub approvals: ApprovalFees,
    /// Month-end figures, zero when absent.
    pub closing: ClosingFigures,
}

/// A Sunday-school collection record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SundaySchoolRecord {
    /// Record date.
    pub date: NaiveDate,
    /// School year the collection is booked against.
    pub year: Option<i32>,
    /// Amount collected.
    pub amount: Decimal,
    /// Month-end figures, zero when absent.
    pub closing: ClosingFigures,
}

/// A generic expenditure ledger record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenditureRecord {
    /// Record date.
    pub date: NaiveDate,
    /// Itemized expenditure, including any single `category`/`amount` pair.
    pub items: ChurchExpenditure,
    /// Amounts whose category matched none of the itemized ones.
    pub other: Decimal,
    /// Operator notes.
    pub notes: Option<String>,
    /// Month-end figures, zero when absent.
    pub closing: ClosingFigures,
}

/// A stored record of any kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawRecord {
    /// Church accounts record.
    Offerings(OfferingsRecord),
    /// Construction record.
    Construction(ConstructionRecord),
    /// Sunday-school record.
    SundaySchool(SundaySchoolRecord),
    /// Expenditure record.
    Expenditure(ExpenditureRecord),
}

impl RawRecord {
    /// Reads a record of `kind` from a stored document whose date has
    /// already been validated by the store.
    #[must_use]
    pub fn from_dated_document(kind: RecordKind, date: NaiveDate, doc: &Value) -> Self {
        let closing = read_closing(doc);
        match kind {
            RecordKind::Offerings => Self::Offerings(OfferingsRecord {
                date,
                main_service: amount_at(doc, "/offerings/mainService"),
                hbc: HbcOfferings {
                    jerusalem: amount_at(doc, "/offerings/hbc/jerusalem"),
                    emmanuel: amount_at(doc, "/offerings/hbc/emmanuel"),
                    ebenezer: amount_at(doc, "/offerings/hbc/ebenezer"),
                    agape: amount_at(doc, "/offerings/hbc/agape"),
                },
                sunday_school: amount_at(doc, "/offerings/sundaySchool"),
                stated_total: amount_at(doc, "/offerings/total"),
                expenditure: read_expenditure(doc, "/expenditure"),
                closing,
            }),
            RecordKind::Construction => Self::Construction(ConstructionRecord {
                date,
                costs: ConstructionCosts {
                    church_land: amount_at(doc, "/construction/churchLand"),
                    project_began: amount_at(doc, "/construction/projectBegan"),
                    plan_design: amount_at(doc, "/construction/planDesign"),
                },
                approvals: ApprovalFees {
                    public_health: amount_at(doc, "/approvals/publicHealth"),
                    physical_planning: amount_at(doc, "/approvals/physicalPlanning"),
                    urban_development: amount_at(doc, "/approvals/urbanDevelopment"),
                    title_deed: amount_at(doc, "/approvals/titleDeed"),
                },
                closing,
            }),
            RecordKind::SundaySchool => Self::SundaySchool(SundaySchoolRecord {
                date,
                year: doc.get("year").and_then(read_year),
                amount: amount_at(doc, "/amount"),
                closing,
            }),
            RecordKind::Expenditure => {
                let mut items = read_expenditure(doc, "");
                let mut other = Decimal::ZERO;
                if let Some(category) = doc.get("category").and_then(Value::as_str) {
                    let amount = amount_at(doc, "/amount");
                    match ExpenditureCategory::parse(category) {
                        Some(slot) => *slot.field(&mut items) += amount,
                        None => other += amount,
                    }
                }
                Self::Expenditure(ExpenditureRecord {
                    date,
                    items,
                    other,
                    notes: read_notes(doc),
                    closing,
                })
            }
        }
    }

    /// Kind of this record.
    #[must_use]
    pub const fn kind(&self) -> RecordKind {
        match self {
            Self::Offerings(_) => RecordKind::Offerings,
            Self::Construction(_) => RecordKind::Construction,
            Self::SundaySchool(_) => RecordKind::SundaySchool,
            Self::Expenditure(_) => RecordKind::Expenditure,
        }
    }

    /// Date the record pertains to.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        match self {
            Self::Offerings(r) => r.date,
            Self::Construction(r) => r.date,
            Self::SundaySchool(r) => r.date,
            Self::Expenditure(r) => r.date,
        }
    }

    /// Month-end figures carried by the record (zero when absent).
    #[must_use]
    pub const fn closing(&self) -> &ClosingFigures {
        match self {
            Self::Offerings(r) => &r.closing,
            Self::Construction(r) => &r.closing,
            Self::SundaySchool(r) => &r.closing,
            Self::Expenditure(r) => &r.closing,
        }
    }
}

/// Itemized expenditure slot named by a free-text `category`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExpenditureCategory {
    Tithe,
    Apostolic,
    Materials,
    Banking,
    Pastoral,
    SundaySchool,
}

impl ExpenditureCategory {
    fn parse(category: &str) -> Option<Self> {
        let normalized: String = category
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "tithe" | "tithes" => Some(Self::Tithe),
            "apostolic" | "apostoliclevy" => Some(Self::Apostolic),
            "bricks" | "materials" | "buildingmaterials" => Some(Self::Materials),
            "banking" | "bankcharges" | "transactionfee" | "transactionfees" => {
                Some(Self::Banking)
            }
            "pastorsuse" | "pastoruse" | "pastoral" | "pastoralallowance" => Some(Self::Pastoral),
            "sundayschool" => Some(Self::SundaySchool),
            _ => None,
        }
    }

    fn field(self, items: &mut ChurchExpenditure) -> &mut Decimal {
        match self {
            Self::Tithe => &mut items.tithe,
            Self::Apostolic => &mut items.apostolic,
            Self::Materials => &mut items.bricks,
            Self::Banking => &mut items.banking,
            Self::Pastoral => &mut items.pastors_use,
            Self::SundaySchool => &mut items.sunday_school,
        }
    }
}

fn amount_at(doc: &Value, pointer: &str) -> Decimal {
    doc.pointer(pointer).map_or(Decimal::ZERO, parse_amount)
}

fn read_expenditure(doc: &Value, prefix: &str) -> ChurchExpenditure {
    ChurchExpenditure {
        tithe: amount_at(doc, &format!("{prefix}/tithe")),
        apostolic: amount_at(doc, &format!("{prefix}/apostolic")),
        bricks: amount_at(doc, &format!("{prefix}/bricks")),
        banking: amount_at(doc, &format!("{prefix}/banking")),
        pastors_use: amount_at(doc, &format!("{prefix}/pastorsUse")),
        sunday_school: amount_at(doc, &format!("{prefix}/sundaySchool")),
    }
}

fn read_closing(doc: &Value) -> ClosingFigures {
    ClosingFigures {
        tithe: amount_at(doc, "/closing/tithe"),
        apostolic: amount_at(doc, "/closing/apostolic"),
        transaction_fee: amount_at(doc, "/closing/transactionFee"),
    }
}

fn read_year(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|y| i32::try_from(y).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn read_notes(doc: &Value) -> Option<String> {
    ["notes", "description"]
        .iter()
        .filter_map(|key| doc.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(ToString::to_string)
}
