//! `SeaORM` entity definitions.

pub mod finance_records;
