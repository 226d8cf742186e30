//! Core business logic for Comercio.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `catalog` - Catalog field permissions and search predicates
//! - `payroll` - Employee loan ledger (amortization and installment schedules)
//! - `document` - Stock-reconciling document engine (sales and purchases)
//! - `money` - Monetary rounding helpers

pub mod catalog;
pub mod document;
pub mod money;
pub mod payroll;
