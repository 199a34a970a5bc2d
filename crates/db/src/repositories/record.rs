//! Finance record repository: the database-backed record source.

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Select, Set,
};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use almoner_core::reports::{DateRange, RawRecord, RecordKind, RecordSource, SourceError};

use crate::entities::finance_records;

/// Repository over the `finance_records` table.
#[derive(Debug, Clone)]
pub struct RecordRepository {
    db: DatabaseConnection,
}

impl RecordRepository {
    /// Creates a new record repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stores a record document of `kind` dated `record_date`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn insert(
        &self,
        kind: RecordKind,
        record_date: NaiveDate,
        payload: Value,
    ) -> Result<finance_records::Model, DbErr> {
        let now = chrono::Utc::now().into();

        let record = finance_records::ActiveModel {
            id: Set(Uuid::new_v4()),
            kind: Set(kind.as_str().to_string()),
            record_date: Set(record_date),
            payload: Set(payload),
            created_at: Set(now),
            updated_at: Set(now),
        };

        record.insert(&self.db).await
    }

    /// Finds rows of `kind` dated within `range`, ordered by record date
    /// then insertion time.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_in_range(
        &self,
        kind: RecordKind,
        range: &DateRange,
    ) -> Result<Vec<finance_records::Model>, DbErr> {
        Self::select_in_range(kind, range).all(&self.db).await
    }

    /// Counts stored rows of `kind`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count(&self, kind: RecordKind) -> Result<u64, DbErr> {
        finance_records::Entity::find()
            .filter(finance_records::Column::Kind.eq(kind.as_str()))
            .count(&self.db)
            .await
    }

    /// Deletes a row by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, id: Uuid) -> Result<u64, DbErr> {
        let result = finance_records::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    /// Query for rows of `kind` within `range`. Open bounds add no filter.
    fn select_in_range(kind: RecordKind, range: &DateRange) -> Select<finance_records::Entity> {
        let mut query = finance_records::Entity::find()
            .filter(finance_records::Column::Kind.eq(kind.as_str()));
        if let Some(from) = range.from() {
            query = query.filter(finance_records::Column::RecordDate.gte(from));
        }
        if let Some(to) = range.to() {
            query = query.filter(finance_records::Column::RecordDate.lte(to));
        }
        query
            .order_by_asc(finance_records::Column::RecordDate)
            .order_by_asc(finance_records::Column::CreatedAt)
    }

    /// Reads a stored row as a raw record of `kind`.
    fn to_raw_record(kind: RecordKind, model: &finance_records::Model) -> RawRecord {
        RawRecord::from_dated_document(kind, model.record_date, &model.payload)
    }
}

#[async_trait]
impl RecordSource for RecordRepository {
    async fn fetch(
        &self,
        kind: RecordKind,
        range: &DateRange,
    ) -> Result<Vec<RawRecord>, SourceError> {
        let rows = self
            .find_in_range(kind, range)
            .await
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;

        debug!(kind = %kind, rows = rows.len(), "Fetched finance records");

        Ok(rows
            .iter()
            .map(|row| Self::to_raw_record(kind, row))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use sea_orm::{DbBackend, QueryTrait};
    use serde_json::json;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_select_filters_kind_range_and_orders() {
        let range = DateRange::new(Some(day("2025-01-01")), Some(day("2025-03-31"))).unwrap();
        let sql = RecordRepository::select_in_range(RecordKind::SundaySchool, &range)
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#""finance_records"."kind" = 'sunday-school'"#));
        assert!(sql.contains(r#""finance_records"."record_date" >= '2025-01-01'"#));
        assert!(sql.contains(r#""finance_records"."record_date" <= '2025-03-31'"#));
        assert!(sql.contains(
            r#"ORDER BY "finance_records"."record_date" ASC, "finance_records"."created_at" ASC"#
        ));
        assert!(!sql.contains("created_at\" >="));
    }

    #[test]
    fn test_select_unbounded_has_no_date_filter() {
        let sql = RecordRepository::select_in_range(RecordKind::Offerings, &DateRange::unbounded())
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#""finance_records"."kind" = 'offerings'"#));
        assert!(!sql.contains(r#""record_date" >="#));
        assert!(!sql.contains(r#""record_date" <="#));
    }

    #[test]
    fn test_row_becomes_raw_record_with_column_date() {
        let now = chrono::Utc::now().into();
        let model = finance_records::Model {
            id: Uuid::new_v4(),
            kind: "offerings".to_string(),
            record_date: day("2025-01-05"),
            payload: json!({"date": "1999-01-01", "offerings": {"mainService": "10,000"}}),
            created_at: now,
            updated_at: now,
        };

        let record = RecordRepository::to_raw_record(RecordKind::Offerings, &model);
        assert_eq!(record.date(), day("2025-01-05"));
        let RawRecord::Offerings(offerings) = record else {
            panic!("expected an offerings record");
        };
        assert_eq!(offerings.main_service, dec!(10000));
    }
}
