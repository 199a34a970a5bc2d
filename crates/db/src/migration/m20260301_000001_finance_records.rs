//! Finance records migration.
//!
//! Creates the single table holding every record kind as a JSON payload,
//! keyed by kind and the date the record pertains to.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(FINANCE_RECORDS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP TABLE IF EXISTS finance_records CASCADE;")
            .await?;
        Ok(())
    }
}

const FINANCE_RECORDS_SQL: &str = r"
-- One row per stored record of any kind
CREATE TABLE finance_records (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    kind TEXT NOT NULL,
    record_date DATE NOT NULL,
    payload JSONB NOT NULL DEFAULT '{}'::jsonb,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_finance_records_kind
        CHECK (kind IN ('offerings', 'construction', 'sunday-school', 'expenditure'))
);

-- Report fetches filter by kind and date range, ordered by date
CREATE INDEX idx_finance_records_kind_date
    ON finance_records(kind, record_date, created_at);
";
