//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - Database migrations
//!
//! Every multi-row operation (document header plus lines plus stock deltas,
//! loan header plus installments) runs inside one database transaction;
//! touched product rows are locked for the transaction's duration.

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{
    CatalogRepository, InvoiceRepository, LoanRepository, ProductRepository, PurchaseRepository,
};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
