//! Shared stock reconciliation helpers for the document repositories.
//!
//! Both invoice and purchase repositories lock the touched product rows for
//! the duration of the transaction, hand the locked state to the core
//! document engine, and apply the returned deltas here.

use std::collections::HashMap;

use chrono::Utc;
use comercio_core::document::{DocumentError, ProductInfo, StockDelta};
use comercio_shared::types::ProductId;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, DbErr, EntityTrait, QueryFilter,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::entities::products;

/// Loads and row-locks (`SELECT ... FOR UPDATE`) the given products.
pub(crate) async fn lock_products(
    txn: &DatabaseTransaction,
    ids: &[Uuid],
) -> Result<HashMap<Uuid, products::Model>, DbErr> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = products::Entity::find()
        .filter(products::Column::Id.is_in(ids.iter().copied()))
        .lock_exclusive()
        .all(txn)
        .await?;
    Ok(rows.into_iter().map(|p| (p.id, p)).collect())
}

/// Builds the product lookup closure the core engine expects, backed by the
/// locked rows.
pub(crate) fn lookup_from(
    locked: &HashMap<Uuid, products::Model>,
) -> impl Fn(ProductId) -> Result<ProductInfo, DocumentError> + '_ {
    move |id: ProductId| {
        locked
            .get(&id.into_inner())
            .map(|p| ProductInfo {
                id,
                is_active: p.is_active,
                stock: p.stock,
                tax_rate: p.tax_rate,
                cost: p.cost,
            })
            .ok_or(DocumentError::ProductNotFound(id))
    }
}

/// Applies validated stock deltas to the locked product rows.
pub(crate) async fn apply_deltas(
    txn: &DatabaseTransaction,
    locked: &HashMap<Uuid, products::Model>,
    deltas: &[StockDelta],
) -> Result<(), DbErr> {
    let now = Utc::now().into();
    for delta in deltas {
        let uuid = delta.product_id.into_inner();
        let product = locked
            .get(&uuid)
            .ok_or_else(|| DbErr::RecordNotFound(format!("product {uuid}")))?;
        let update = products::ActiveModel {
            id: Set(uuid),
            stock: Set(product.stock + delta.delta),
            updated_at: Set(now),
            ..Default::default()
        };
        update.update(txn).await?;
        tracing::debug!(product = %uuid, delta = %delta.delta, "applied stock delta");
    }
    Ok(())
}

/// Collects the distinct product ids referenced by new and existing lines.
pub(crate) fn distinct_product_ids<I>(ids: I) -> Vec<Uuid>
where
    I: IntoIterator<Item = Uuid>,
{
    let mut distinct: Vec<Uuid> = Vec::new();
    for id in ids {
        if !distinct.contains(&id) {
            distinct.push(id);
        }
    }
    distinct
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_product_ids() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let ids = distinct_product_ids([a, b, a, a, b]);
        assert_eq!(ids, vec![a, b]);
    }
}
