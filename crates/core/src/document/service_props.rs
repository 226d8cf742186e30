//! Property-based tests for the document engine.

use std::collections::HashMap;

use comercio_shared::types::ProductId;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::service::DocumentService;
use super::types::{LineItemInput, Polarity, PostedLine, ProductInfo};

const CATALOG_SIZE: usize = 5;

/// A fixed catalog of products with ample stock.
fn catalog() -> Vec<ProductInfo> {
    (0..CATALOG_SIZE)
        .map(|_| ProductInfo {
            id: ProductId::new(),
            is_active: true,
            stock: dec!(1000000),
            tax_rate: dec!(15),
            cost: dec!(1.00),
        })
        .collect()
}

fn lookup_in(
    catalog: Vec<ProductInfo>,
) -> impl Fn(ProductId) -> Result<ProductInfo, super::error::DocumentError> {
    move |id| {
        catalog
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(super::error::DocumentError::ProductNotFound(id))
    }
}

/// Strategy for raw line tuples: (product index, quantity, unit price).
fn raw_lines_strategy() -> impl Strategy<Value = Vec<(usize, Decimal, Decimal)>> {
    prop::collection::vec(
        (
            0..CATALOG_SIZE,
            (1i64..1000).prop_map(|n| Decimal::new(n, 0)),
            (0i64..100_000).prop_map(|n| Decimal::new(n, 2)),
        ),
        1..12,
    )
}

fn to_lines(raw: &[(usize, Decimal, Decimal)], catalog: &[ProductInfo]) -> Vec<LineItemInput> {
    raw.iter()
        .map(|&(idx, quantity, unit_price)| LineItemInput {
            product_id: catalog[idx].id,
            quantity,
            unit_price,
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Creating then reversing a document cancels out per product.
    #[test]
    fn prop_create_then_reverse_is_identity(
        raw in raw_lines_strategy(),
        sale in any::<bool>(),
    ) {
        let catalog = catalog();
        let polarity = if sale { Polarity::Sale } else { Polarity::Purchase };
        let lines = to_lines(&raw, &catalog);

        let doc = DocumentService::resolve_document(
            &lines, polarity, lookup_in(catalog.clone()),
        ).unwrap();

        let posted: Vec<PostedLine> = doc.lines.iter().map(|l| PostedLine {
            product_id: l.product_id,
            quantity: l.quantity,
        }).collect();
        let reversal = DocumentService::resolve_reversal(
            &posted, polarity, lookup_in(catalog),
        ).unwrap();

        let mut net: HashMap<ProductId, Decimal> = HashMap::new();
        for d in doc.deltas.iter().chain(reversal.iter()) {
            *net.entry(d.product_id).or_default() += d.delta;
        }
        for (_, delta) in net {
            prop_assert_eq!(delta, Decimal::ZERO);
        }
    }

    /// Header totals always equal the sum of the resolved lines.
    #[test]
    fn prop_totals_match_lines(raw in raw_lines_strategy()) {
        let catalog = catalog();
        let lines = to_lines(&raw, &catalog);

        let doc = DocumentService::resolve_document(
            &lines, Polarity::Sale, lookup_in(catalog),
        ).unwrap();

        let subtotal: Decimal = doc.lines.iter().map(|l| l.subtotal).sum();
        let tax: Decimal = doc.lines.iter().map(|l| l.tax).sum();
        prop_assert_eq!(doc.totals.subtotal, subtotal);
        prop_assert_eq!(doc.totals.tax, tax);
        prop_assert_eq!(doc.totals.total, subtotal + tax);
    }

    /// Sale deltas are all negative, purchase deltas all positive, and each
    /// product's delta equals its aggregated line quantity.
    #[test]
    fn prop_delta_direction_and_magnitude(
        raw in raw_lines_strategy(),
        sale in any::<bool>(),
    ) {
        let catalog = catalog();
        let polarity = if sale { Polarity::Sale } else { Polarity::Purchase };
        let lines = to_lines(&raw, &catalog);

        let doc = DocumentService::resolve_document(
            &lines, polarity, lookup_in(catalog),
        ).unwrap();

        let mut expected: HashMap<ProductId, Decimal> = HashMap::new();
        for line in &lines {
            *expected.entry(line.product_id).or_default() += line.quantity;
        }

        prop_assert_eq!(doc.deltas.len(), expected.len());
        for delta in &doc.deltas {
            let quantity = expected[&delta.product_id];
            prop_assert_eq!(delta.delta, polarity.signed(quantity));
        }
    }

    /// Replacement deltas equal the difference between the new and old sets.
    #[test]
    fn prop_replacement_nets_old_and_new(
        old_raw in raw_lines_strategy(),
        new_raw in raw_lines_strategy(),
        sale in any::<bool>(),
    ) {
        let catalog = catalog();
        let polarity = if sale { Polarity::Sale } else { Polarity::Purchase };
        let old_lines = to_lines(&old_raw, &catalog);
        let new_lines = to_lines(&new_raw, &catalog);

        let existing: Vec<PostedLine> = old_lines.iter().map(|l| PostedLine {
            product_id: l.product_id,
            quantity: l.quantity,
        }).collect();

        let doc = DocumentService::resolve_replacement(
            &existing, &new_lines, polarity, lookup_in(catalog),
        ).unwrap();

        let mut expected: HashMap<ProductId, Decimal> = HashMap::new();
        for line in &new_lines {
            *expected.entry(line.product_id).or_default() += polarity.signed(line.quantity);
        }
        for line in &old_lines {
            *expected.entry(line.product_id).or_default() -= polarity.signed(line.quantity);
        }

        for delta in &doc.deltas {
            prop_assert_eq!(delta.delta, expected[&delta.product_id]);
        }
        // Zero net changes are omitted from the delta list
        for (product_id, net) in expected {
            if net != Decimal::ZERO {
                prop_assert!(doc.deltas.iter().any(|d| d.product_id == product_id));
            }
        }
    }
}
