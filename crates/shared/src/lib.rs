//! Shared types, errors, and configuration for Almoner.
//!
//! This crate provides common types used across all other crates:
//! - Lenient amount parsing and display formatting with decimal precision
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, ReportsConfig};
pub use error::AppError;
