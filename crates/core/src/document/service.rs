//! Document service for line resolution and stock reconciliation.
//!
//! This service contains pure business logic with no database dependencies.
//! It resolves line items, recomputes header totals server-side, and derives
//! the net stock deltas for create, replace, and reversal flows. Product
//! facts reach it through a lookup closure; the repository locks the rows
//! and applies the deltas inside one transaction.

use std::collections::HashMap;

use comercio_shared::types::ProductId;
use rust_decimal::Decimal;

use super::error::DocumentError;
use super::types::{
    DocumentTotals, LineItemInput, Polarity, PostedLine, ProductInfo, ResolvedDocument,
    ResolvedLine, StockDelta,
};
use crate::money::round_money;

/// Document service for validation, totals, and stock delta computation.
pub struct DocumentService;

impl DocumentService {
    /// Resolves a new document: validates lines, recomputes totals, and
    /// derives the stock deltas for the given polarity.
    ///
    /// Validation performed:
    /// 1. At least one line
    /// 2. Positive quantity and non-negative unit price per line
    /// 3. Referenced products exist and are active
    /// 4. No product's stock may end below zero
    ///
    /// # Errors
    ///
    /// Returns `DocumentError` if validation fails; nothing may be persisted
    /// in that case.
    pub fn resolve_document<P>(
        lines: &[LineItemInput],
        polarity: Polarity,
        product_lookup: P,
    ) -> Result<ResolvedDocument, DocumentError>
    where
        P: Fn(ProductId) -> Result<ProductInfo, DocumentError>,
    {
        Self::resolve_replacement(&[], lines, polarity, product_lookup)
    }

    /// Resolves a document update: reverses the existing lines and applies
    /// the new set, producing **net** deltas so stock reflects only the new
    /// lines, never double-counted.
    ///
    /// The full new line set is validated before anything persists; if the
    /// restore-then-reapply would drive any product negative the whole
    /// update fails.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError` if validation fails.
    pub fn resolve_replacement<P>(
        existing: &[PostedLine],
        lines: &[LineItemInput],
        polarity: Polarity,
        product_lookup: P,
    ) -> Result<ResolvedDocument, DocumentError>
    where
        P: Fn(ProductId) -> Result<ProductInfo, DocumentError>,
    {
        if lines.is_empty() {
            return Err(DocumentError::EmptyLines);
        }

        let mut products: HashMap<ProductId, ProductInfo> = HashMap::new();
        let mut resolved = Vec::with_capacity(lines.len());

        for line in lines {
            if line.quantity <= Decimal::ZERO {
                return Err(DocumentError::NonPositiveQuantity {
                    product_id: line.product_id,
                });
            }
            if line.unit_price < Decimal::ZERO {
                return Err(DocumentError::NegativeUnitPrice {
                    product_id: line.product_id,
                });
            }

            let info = match products.get(&line.product_id) {
                Some(info) => info.clone(),
                None => {
                    let info = product_lookup(line.product_id)?;
                    products.insert(line.product_id, info.clone());
                    info
                }
            };
            // Inactive products are rejected on new lines only; reversals of
            // since-deactivated products must still restore stock.
            if !info.is_active {
                return Err(DocumentError::ProductInactive(line.product_id));
            }

            let subtotal = round_money(line.quantity * line.unit_price);
            let tax = round_money(subtotal * info.tax_rate / Decimal::ONE_HUNDRED);
            resolved.push(ResolvedLine {
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price: line.unit_price,
                unit_cost: info.cost,
                subtotal,
                tax,
            });
        }

        let old_qty = Self::quantities_of(existing);
        for product_id in old_qty.keys() {
            if !products.contains_key(product_id) {
                products.insert(*product_id, product_lookup(*product_id)?);
            }
        }

        let mut new_qty: HashMap<ProductId, Decimal> = HashMap::new();
        for line in lines {
            *new_qty.entry(line.product_id).or_default() += line.quantity;
        }

        let deltas = Self::net_deltas(&products, &old_qty, &new_qty, polarity)?;
        let totals = Self::totals_of(&resolved);

        Ok(ResolvedDocument {
            lines: resolved,
            totals,
            deltas,
        })
    }

    /// Derives the stock deltas that undo an existing document (delete and
    /// void flows share this reversal).
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::InsufficientStock` if undoing the document
    /// would drive a product's stock below zero (e.g. deleting a purchase
    /// whose goods were already sold).
    pub fn resolve_reversal<P>(
        existing: &[PostedLine],
        polarity: Polarity,
        product_lookup: P,
    ) -> Result<Vec<StockDelta>, DocumentError>
    where
        P: Fn(ProductId) -> Result<ProductInfo, DocumentError>,
    {
        let old_qty = Self::quantities_of(existing);
        let mut products = HashMap::new();
        for product_id in old_qty.keys() {
            products.insert(*product_id, product_lookup(*product_id)?);
        }
        Self::net_deltas(&products, &old_qty, &HashMap::new(), polarity)
    }

    /// Validates that a document can be voided.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::AlreadyVoided` for an inactive document.
    pub fn validate_can_void(is_active: bool) -> Result<(), DocumentError> {
        if is_active {
            Ok(())
        } else {
            Err(DocumentError::AlreadyVoided)
        }
    }

    /// Recomputes header totals from resolved lines.
    #[must_use]
    pub fn totals_of(lines: &[ResolvedLine]) -> DocumentTotals {
        let subtotal: Decimal = lines.iter().map(|l| l.subtotal).sum();
        let tax: Decimal = lines.iter().map(|l| l.tax).sum();
        DocumentTotals::new(subtotal, tax)
    }

    /// Aggregates posted line quantities per product.
    fn quantities_of(lines: &[PostedLine]) -> HashMap<ProductId, Decimal> {
        let mut quantities: HashMap<ProductId, Decimal> = HashMap::new();
        for line in lines {
            *quantities.entry(line.product_id).or_default() += line.quantity;
        }
        quantities
    }

    /// Computes net deltas (new minus old) and validates non-negative stock.
    fn net_deltas(
        products: &HashMap<ProductId, ProductInfo>,
        old_qty: &HashMap<ProductId, Decimal>,
        new_qty: &HashMap<ProductId, Decimal>,
        polarity: Polarity,
    ) -> Result<Vec<StockDelta>, DocumentError> {
        let mut deltas = Vec::new();
        for (product_id, info) in products {
            let old = old_qty.get(product_id).copied().unwrap_or_default();
            let new = new_qty.get(product_id).copied().unwrap_or_default();
            let delta = polarity.signed(new) - polarity.signed(old);
            if delta == Decimal::ZERO {
                continue;
            }
            if info.stock + delta < Decimal::ZERO {
                return Err(DocumentError::InsufficientStock {
                    product_id: *product_id,
                    requested: -delta,
                    available: info.stock,
                });
            }
            deltas.push(StockDelta {
                product_id: *product_id,
                delta,
            });
        }
        // Deterministic order keeps lock acquisition and assertions stable.
        deltas.sort_by_key(|d| d.product_id.into_inner());
        Ok(deltas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn info(id: ProductId, stock: Decimal) -> ProductInfo {
        ProductInfo {
            id,
            is_active: true,
            stock,
            tax_rate: dec!(15),
            cost: dec!(4.00),
        }
    }

    fn line(product_id: ProductId, quantity: Decimal, unit_price: Decimal) -> LineItemInput {
        LineItemInput {
            product_id,
            quantity,
            unit_price,
        }
    }

    fn lookup_one(
        expected: ProductId,
        stock: Decimal,
    ) -> impl Fn(ProductId) -> Result<ProductInfo, DocumentError> {
        move |id| {
            if id == expected {
                Ok(info(id, stock))
            } else {
                Err(DocumentError::ProductNotFound(id))
            }
        }
    }

    #[test]
    fn test_sale_resolution() {
        let product = ProductId::new();
        let lines = vec![line(product, dec!(2), dec!(10.00))];

        let doc =
            DocumentService::resolve_document(&lines, Polarity::Sale, lookup_one(product, dec!(10)))
                .unwrap();

        assert_eq!(doc.lines.len(), 1);
        assert_eq!(doc.lines[0].subtotal, dec!(20.00));
        assert_eq!(doc.lines[0].tax, dec!(3.00));
        assert_eq!(doc.lines[0].unit_cost, dec!(4.00));
        assert_eq!(doc.totals.subtotal, dec!(20.00));
        assert_eq!(doc.totals.tax, dec!(3.00));
        assert_eq!(doc.totals.total, dec!(23.00));
        assert_eq!(doc.deltas, vec![StockDelta {
            product_id: product,
            delta: dec!(-2),
        }]);
    }

    #[test]
    fn test_purchase_resolution_increments() {
        let product = ProductId::new();
        let lines = vec![line(product, dec!(5), dec!(3.50))];

        let doc = DocumentService::resolve_document(
            &lines,
            Polarity::Purchase,
            lookup_one(product, dec!(0)),
        )
        .unwrap();

        assert_eq!(doc.deltas[0].delta, dec!(5));
        assert_eq!(doc.totals.subtotal, dec!(17.50));
    }

    #[test]
    fn test_duplicate_product_lines_aggregate() {
        let product = ProductId::new();
        let lines = vec![
            line(product, dec!(3), dec!(10.00)),
            line(product, dec!(4), dec!(10.00)),
        ];

        // 7 in total against stock 7: allowed, single merged delta
        let doc =
            DocumentService::resolve_document(&lines, Polarity::Sale, lookup_one(product, dec!(7)))
                .unwrap();
        assert_eq!(doc.lines.len(), 2);
        assert_eq!(doc.deltas.len(), 1);
        assert_eq!(doc.deltas[0].delta, dec!(-7));

        // 7 in total against stock 6: overdraw even though each line fits
        let result =
            DocumentService::resolve_document(&lines, Polarity::Sale, lookup_one(product, dec!(6)));
        assert!(matches!(
            result,
            Err(DocumentError::InsufficientStock { .. })
        ));
    }

    #[test]
    fn test_sale_overdraw_fails() {
        let product = ProductId::new();
        let lines = vec![line(product, dec!(11), dec!(1.00))];

        let result =
            DocumentService::resolve_document(&lines, Polarity::Sale, lookup_one(product, dec!(10)));

        match result {
            Err(DocumentError::InsufficientStock {
                product_id,
                requested,
                available,
            }) => {
                assert_eq!(product_id, product);
                assert_eq!(requested, dec!(11));
                assert_eq!(available, dec!(10));
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_lines_rejected() {
        let result = DocumentService::resolve_document(&[], Polarity::Sale, |id| {
            Ok(info(id, dec!(10)))
        });
        assert!(matches!(result, Err(DocumentError::EmptyLines)));
    }

    #[test]
    fn test_non_positive_quantity_rejected() {
        let product = ProductId::new();
        let lines = vec![line(product, dec!(0), dec!(1.00))];
        let result =
            DocumentService::resolve_document(&lines, Polarity::Sale, lookup_one(product, dec!(10)));
        assert!(matches!(
            result,
            Err(DocumentError::NonPositiveQuantity { .. })
        ));
    }

    #[test]
    fn test_negative_unit_price_rejected() {
        let product = ProductId::new();
        let lines = vec![line(product, dec!(1), dec!(-1.00))];
        let result =
            DocumentService::resolve_document(&lines, Polarity::Sale, lookup_one(product, dec!(10)));
        assert!(matches!(
            result,
            Err(DocumentError::NegativeUnitPrice { .. })
        ));
    }

    #[test]
    fn test_unknown_product_rejected() {
        let known = ProductId::new();
        let unknown = ProductId::new();
        let lines = vec![line(unknown, dec!(1), dec!(1.00))];
        let result =
            DocumentService::resolve_document(&lines, Polarity::Sale, lookup_one(known, dec!(10)));
        assert!(matches!(result, Err(DocumentError::ProductNotFound(id)) if id == unknown));
    }

    #[test]
    fn test_inactive_product_rejected_on_new_lines() {
        let product = ProductId::new();
        let lines = vec![line(product, dec!(1), dec!(1.00))];
        let result = DocumentService::resolve_document(&lines, Polarity::Sale, |id| {
            Ok(ProductInfo {
                is_active: false,
                ..info(id, dec!(10))
            })
        });
        assert!(matches!(result, Err(DocumentError::ProductInactive(id)) if id == product));
    }

    #[test]
    fn test_replacement_nets_deltas() {
        // Purchase previously added 5; new set adds 8 -> net +3
        let product = ProductId::new();
        let existing = vec![PostedLine {
            product_id: product,
            quantity: dec!(5),
        }];
        let lines = vec![line(product, dec!(8), dec!(2.00))];

        let doc = DocumentService::resolve_replacement(
            &existing,
            &lines,
            Polarity::Purchase,
            lookup_one(product, dec!(5)),
        )
        .unwrap();

        assert_eq!(doc.deltas, vec![StockDelta {
            product_id: product,
            delta: dec!(3),
        }]);
    }

    #[test]
    fn test_replacement_unchanged_quantity_is_noop() {
        let product = ProductId::new();
        let existing = vec![PostedLine {
            product_id: product,
            quantity: dec!(4),
        }];
        let lines = vec![line(product, dec!(4), dec!(9.99))];

        let doc = DocumentService::resolve_replacement(
            &existing,
            &lines,
            Polarity::Sale,
            lookup_one(product, dec!(0)),
        )
        .unwrap();

        assert!(doc.deltas.is_empty());
    }

    #[test]
    fn test_replacement_restores_removed_product() {
        let removed = ProductId::new();
        let added = ProductId::new();
        let existing = vec![PostedLine {
            product_id: removed,
            quantity: dec!(2),
        }];
        let lines = vec![line(added, dec!(3), dec!(1.00))];

        let lookup = move |id: ProductId| {
            if id == removed {
                // Deactivated since the sale; reversal must still restore it
                Ok(ProductInfo {
                    is_active: false,
                    ..info(id, dec!(0))
                })
            } else if id == added {
                Ok(info(id, dec!(3)))
            } else {
                Err(DocumentError::ProductNotFound(id))
            }
        };

        let doc =
            DocumentService::resolve_replacement(&existing, &lines, Polarity::Sale, lookup)
                .unwrap();

        let mut deltas = doc.deltas.clone();
        deltas.sort_by_key(|d| d.delta);
        assert_eq!(deltas.len(), 2);
        assert!(deltas.iter().any(|d| d.product_id == removed && d.delta == dec!(2)));
        assert!(deltas.iter().any(|d| d.product_id == added && d.delta == dec!(-3)));
    }

    #[test]
    fn test_replacement_overdraw_aborts_before_any_mutation() {
        // Sale of 2 becomes sale of 13 with only 10 on hand (2 restored): fail
        let product = ProductId::new();
        let existing = vec![PostedLine {
            product_id: product,
            quantity: dec!(2),
        }];
        let lines = vec![line(product, dec!(13), dec!(1.00))];

        let result = DocumentService::resolve_replacement(
            &existing,
            &lines,
            Polarity::Sale,
            lookup_one(product, dec!(10)),
        );
        assert!(matches!(
            result,
            Err(DocumentError::InsufficientStock { .. })
        ));
    }

    #[test]
    fn test_reversal_of_sale_restores_stock() {
        let product = ProductId::new();
        let existing = vec![PostedLine {
            product_id: product,
            quantity: dec!(3),
        }];

        let deltas =
            DocumentService::resolve_reversal(&existing, Polarity::Sale, lookup_one(product, dec!(10)))
                .unwrap();

        assert_eq!(deltas, vec![StockDelta {
            product_id: product,
            delta: dec!(3),
        }]);
    }

    #[test]
    fn test_reversal_of_purchase_can_underflow() {
        // Purchase brought in 5, but 4 have since been sold (stock 3): undo fails
        let product = ProductId::new();
        let existing = vec![PostedLine {
            product_id: product,
            quantity: dec!(5),
        }];

        let result = DocumentService::resolve_reversal(
            &existing,
            Polarity::Purchase,
            lookup_one(product, dec!(3)),
        );
        assert!(matches!(
            result,
            Err(DocumentError::InsufficientStock { .. })
        ));
    }

    #[test]
    fn test_void_guard() {
        assert!(DocumentService::validate_can_void(true).is_ok());
        assert!(matches!(
            DocumentService::validate_can_void(false),
            Err(DocumentError::AlreadyVoided)
        ));
    }

    #[test]
    fn test_tax_rounding_per_line() {
        // 3 * 3.33 = 9.99; 15% of 9.99 = 1.4985 -> 1.50 (banker's)
        let product = ProductId::new();
        let lines = vec![line(product, dec!(3), dec!(3.33))];

        let doc =
            DocumentService::resolve_document(&lines, Polarity::Sale, lookup_one(product, dec!(10)))
                .unwrap();
        assert_eq!(doc.lines[0].subtotal, dec!(9.99));
        assert_eq!(doc.lines[0].tax, dec!(1.50));
        assert_eq!(doc.totals.total, dec!(11.49));
    }
}
