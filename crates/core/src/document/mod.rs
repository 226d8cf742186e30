//! Stock-reconciling document engine.
//!
//! This module implements the generic "header plus line items" pattern
//! shared by sales invoices and purchases:
//! - Line resolution with server-side totals (client totals are never trusted)
//! - Stock delta computation for create, replace, and reversal flows
//! - Stock non-negativity validation before anything persists
//! - Error types for document operations

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::DocumentError;
pub use service::DocumentService;
pub use types::{
    DocumentTotals, LineItemInput, Polarity, PostedLine, ProductInfo, ResolvedDocument,
    ResolvedLine, StockDelta,
};
