//! Catalog policy helpers.
//!
//! The catalog itself (products, customers, suppliers, brands, categories)
//! is passive data owned by the persistence layer; this module holds the
//! pure policy pieces the repositories consult:
//! - Effective editable field sets per acting user
//! - Normalized substring search terms

pub mod fields;
pub mod search;

pub use fields::{editable_product_fields, FieldContext, ProductField};
pub use search::SearchTerm;
