//! Core business logic for Almoner.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Record kinds, normalization, aggregation, and report rendering live here;
//! storage is reached only through the [`reports::RecordSource`] trait.

pub mod reports;
