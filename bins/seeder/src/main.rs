//! Database seeder for Almoner development and testing.
//!
//! Seeds one quarter (January to March 2025) of demo records of every kind:
//! weekly church accounts and Sunday-school collections, construction
//! payments, and a monthly expenditure ledger. Last-Sunday records carry
//! month-end closing figures.
//!
//! Usage: cargo run --bin seeder

use chrono::{Datelike, Days, NaiveDate};
use serde_json::{Value, json};

use almoner_core::reports::RecordKind;
use almoner_core::reports::calendar::is_last_sunday_of_month;
use almoner_db::RecordRepository;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = almoner_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");
    let repo = RecordRepository::new(db);

    for kind in RecordKind::ALL {
        let existing = repo.count(kind).await.expect("Failed to count records");
        if existing > 0 {
            println!("  {kind} already has {existing} records, skipping...");
            continue;
        }

        println!("Seeding {kind} records...");
        let records = demo_records(kind);
        for (date, payload) in &records {
            repo.insert(kind, *date, payload.clone())
                .await
                .expect("Failed to insert record");
        }
        println!("  Inserted {} records", records.len());
    }

    println!("Seeding complete!");
}

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid seed date")
}

/// Every Sunday of the first quarter of 2025.
fn sundays() -> Vec<NaiveDate> {
    let end = day(2025, 3, 31);
    let mut dates = Vec::new();
    let mut current = day(2025, 1, 5);
    while current <= end {
        dates.push(current);
        current = current + Days::new(7);
    }
    dates
}

fn demo_records(kind: RecordKind) -> Vec<(NaiveDate, Value)> {
    match kind {
        RecordKind::Offerings => sundays()
            .into_iter()
            .enumerate()
            .map(|(week, date)| (date, offerings(week, date)))
            .collect(),
        RecordKind::Construction => vec![
            (
                day(2025, 1, 12),
                json!({"construction": {"churchLand": 150_000, "planDesign": "25,000"}}),
            ),
            (
                day(2025, 2, 9),
                json!({"approvals": {"publicHealth": 4500, "physicalPlanning": 6000}}),
            ),
            (
                day(2025, 3, 16),
                json!({
                    "construction": {"projectBegan": 80_000},
                    "approvals": {"urbanDevelopment": 3500, "titleDeed": "KES 12,000"}
                }),
            ),
        ],
        RecordKind::SundaySchool => sundays()
            .into_iter()
            .enumerate()
            .map(|(week, date)| {
                let amount = 400 + 25 * week;
                (date, json!({"year": date.year(), "amount": amount}))
            })
            .collect(),
        RecordKind::Expenditure => vec![
            (
                day(2025, 1, 31),
                json!({"tithe": 4200, "apostolic": 1050, "banking": 66, "notes": "January remittance"}),
            ),
            (
                day(2025, 2, 14),
                json!({"category": "Building materials", "amount": "18,500", "description": "Bricks and cement"}),
            ),
            (
                day(2025, 2, 28),
                json!({"tithe": 4380, "apostolic": 1095, "banking": 66, "notes": "February remittance"}),
            ),
            (
                day(2025, 3, 20),
                json!({"category": "Choir uniforms", "amount": 7200}),
            ),
        ],
    }
}

fn offerings(week: usize, date: NaiveDate) -> Value {
    let main_service = 9_500 + 250 * week;
    let mut doc = json!({
        "offerings": {
            "mainService": main_service,
            "hbc": {"jerusalem": 1200, "emmanuel": 950, "ebenezer": 800, "agape": 1100},
            "sundaySchool": 300,
            "total": main_service + 4350
        },
        "expenditure": {"bricks": 0, "banking": 33, "pastorsUse": 1500}
    });

    if is_last_sunday_of_month(date) {
        doc["closing"] = json!({"tithe": 4200, "apostolic": 1050, "transactionFee": 66});
        doc["expenditure"]["tithe"] = json!(4200);
        doc["expenditure"]["apostolic"] = json!(1050);
    }
    doc
}
