//! `SeaORM` entity definitions for the Comercio schema.

pub mod brands;
pub mod categories;
pub mod customers;
pub mod employees;
pub mod invoice_lines;
pub mod invoices;
pub mod loan_installments;
pub mod loan_types;
pub mod loans;
pub mod product_categories;
pub mod products;
pub mod purchase_lines;
pub mod purchases;
pub mod sea_orm_active_enums;
pub mod suppliers;
pub mod users;
