//! Document domain types for line resolution and stock reconciliation.

use comercio_shared::types::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a document's stock effect.
///
/// A Sale decreases stock when created; a Purchase increases it. Reversal
/// flows (update, delete, void) mirror the original direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    /// Outbound: stock decreases on creation.
    Sale,
    /// Inbound: stock increases on creation.
    Purchase,
}

impl Polarity {
    /// Returns the signed stock change for a created line of `quantity`.
    #[must_use]
    pub fn signed(&self, quantity: Decimal) -> Decimal {
        match self {
            Self::Sale => -quantity,
            Self::Purchase => quantity,
        }
    }
}

/// One line item as submitted by the caller.
///
/// Only product, quantity, and unit price are accepted; subtotal and tax are
/// recomputed server-side. A payload row missing any field fails
/// deserialization, aborting the whole document.
#[derive(Debug, Clone, Deserialize)]
pub struct LineItemInput {
    /// The referenced product.
    pub product_id: ProductId,
    /// Quantity (must be positive).
    pub quantity: Decimal,
    /// Unit price for a sale, unit cost for a purchase (must not be negative).
    pub unit_price: Decimal,
}

/// A persisted line of an existing document, as needed for reversal.
#[derive(Debug, Clone)]
pub struct PostedLine {
    /// The referenced product.
    pub product_id: ProductId,
    /// Quantity originally applied to stock.
    pub quantity: Decimal,
}

/// Product facts the engine needs, supplied by a lookup closure.
#[derive(Debug, Clone)]
pub struct ProductInfo {
    /// The product ID.
    pub id: ProductId,
    /// Whether the product is active in the catalog.
    pub is_active: bool,
    /// Current stock on hand.
    pub stock: Decimal,
    /// Tax rate percent applied to this product's lines.
    pub tax_rate: Decimal,
    /// Current recorded cost, snapshotted onto sale lines.
    pub cost: Decimal,
}

/// A fully resolved line with server-side amounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLine {
    /// The referenced product.
    pub product_id: ProductId,
    /// Quantity.
    pub quantity: Decimal,
    /// Unit price as submitted.
    pub unit_price: Decimal,
    /// Product cost at resolution time.
    pub unit_cost: Decimal,
    /// `quantity * unit_price` at monetary precision.
    pub subtotal: Decimal,
    /// `subtotal * tax_rate / 100` at monetary precision.
    pub tax: Decimal,
}

/// Header totals recomputed from resolved lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentTotals {
    /// Sum of line subtotals.
    pub subtotal: Decimal,
    /// Sum of line taxes.
    pub tax: Decimal,
    /// `subtotal + tax`.
    pub total: Decimal,
}

impl DocumentTotals {
    /// Creates totals from a subtotal and tax sum.
    #[must_use]
    pub fn new(subtotal: Decimal, tax: Decimal) -> Self {
        Self {
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }
}

/// A net stock mutation for one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockDelta {
    /// The product whose stock changes.
    pub product_id: ProductId,
    /// Signed quantity change (never drives stock below zero).
    pub delta: Decimal,
}

/// Result of resolving a document: lines, totals, and stock deltas.
#[derive(Debug, Clone)]
pub struct ResolvedDocument {
    /// Resolved lines in submission order.
    pub lines: Vec<ResolvedLine>,
    /// Recomputed header totals.
    pub totals: DocumentTotals,
    /// Net stock deltas, one per touched product.
    pub deltas: Vec<StockDelta>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_polarity_signs() {
        assert_eq!(Polarity::Sale.signed(dec!(3)), dec!(-3));
        assert_eq!(Polarity::Purchase.signed(dec!(3)), dec!(3));
    }

    #[test]
    fn test_totals_sum() {
        let totals = DocumentTotals::new(dec!(100.00), dec!(15.00));
        assert_eq!(totals.total, dec!(115.00));
    }
}
