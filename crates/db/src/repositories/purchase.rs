//! Purchase repository for inbound document operations.
//!
//! Purchases increment product stock on creation and decrement it on
//! update, delete, and void — the exact mirror of sales. Creation also
//! refreshes each product's recorded cost to the latest unit cost.

use chrono::Utc;
use comercio_core::document::{
    DocumentError, DocumentService, LineItemInput, Polarity, PostedLine, ResolvedLine,
};
use comercio_shared::error::AppError;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use std::collections::HashMap;
use uuid::Uuid;

use super::search::substring_condition;
use super::stock;
use crate::entities::{purchase_lines, purchases, suppliers};
use comercio_core::catalog::SearchTerm;

/// Error types for purchase operations.
#[derive(Debug, thiserror::Error)]
pub enum PurchaseError {
    /// Purchase not found.
    #[error("Purchase not found: {0}")]
    NotFound(Uuid),

    /// Supplier not found.
    #[error("Supplier not found: {0}")]
    SupplierNotFound(Uuid),

    /// Document engine rejected the operation.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<PurchaseError> for AppError {
    fn from(err: PurchaseError) -> Self {
        match err {
            PurchaseError::NotFound(_) | PurchaseError::SupplierNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            PurchaseError::Document(inner) => inner.into(),
            PurchaseError::Database(inner) => Self::Database(inner.to_string()),
        }
    }
}

/// Input for creating a purchase.
#[derive(Debug, Clone)]
pub struct CreatePurchaseInput {
    /// Supplier's document number, if any.
    pub reference_number: Option<String>,
    /// The supplier.
    pub supplier_id: Uuid,
    /// Issue timestamp.
    pub issue_date: sea_orm::prelude::DateTimeWithTimeZone,
    /// Line items; `unit_price` carries the unit cost.
    pub lines: Vec<LineItemInput>,
    /// The acting user.
    pub created_by: Uuid,
}

/// Input for updating a purchase; the line set fully replaces the old one.
#[derive(Debug, Clone)]
pub struct UpdatePurchaseInput {
    /// Supplier's document number, if any.
    pub reference_number: Option<String>,
    /// The supplier.
    pub supplier_id: Uuid,
    /// Issue timestamp.
    pub issue_date: sea_orm::prelude::DateTimeWithTimeZone,
    /// Replacement line items.
    pub lines: Vec<LineItemInput>,
}

/// Filter options for listing purchases.
#[derive(Debug, Clone, Default)]
pub struct PurchaseFilter {
    /// Include voided purchases.
    pub include_inactive: bool,
    /// Substring search over supplier name and document number.
    pub search: Option<SearchTerm>,
}

/// Purchase header with its lines.
#[derive(Debug, Clone)]
pub struct PurchaseWithLines {
    /// Purchase header.
    pub purchase: purchases::Model,
    /// Purchase lines.
    pub lines: Vec<purchase_lines::Model>,
}

/// Purchase repository for inbound CRUD plus void.
#[derive(Debug, Clone)]
pub struct PurchaseRepository {
    db: DatabaseConnection,
}

impl PurchaseRepository {
    /// Creates a new purchase repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a purchase with its lines, incrementing product stock and
    /// refreshing product costs.
    ///
    /// # Errors
    ///
    /// Returns an error if the supplier or a product is missing, a line is
    /// invalid, or the database fails. Nothing is persisted on failure.
    pub async fn create_purchase(
        &self,
        input: CreatePurchaseInput,
    ) -> Result<PurchaseWithLines, PurchaseError> {
        self.ensure_supplier(input.supplier_id).await?;

        let txn = self.db.begin().await?;

        let product_ids = stock::distinct_product_ids(
            input.lines.iter().map(|l| l.product_id.into_inner()),
        );
        let locked = stock::lock_products(&txn, &product_ids).await?;
        let resolved = DocumentService::resolve_document(
            &input.lines,
            Polarity::Purchase,
            stock::lookup_from(&locked),
        )?;

        let now = Utc::now().into();
        let purchase = purchases::ActiveModel {
            id: Set(Uuid::new_v4()),
            reference_number: Set(input.reference_number),
            supplier_id: Set(input.supplier_id),
            issue_date: Set(input.issue_date),
            subtotal: Set(resolved.totals.subtotal),
            tax: Set(resolved.totals.tax),
            total: Set(resolved.totals.total),
            user_id: Set(input.created_by),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let lines = Self::insert_lines(&txn, purchase.id, &resolved.lines).await?;
        stock::apply_deltas(&txn, &locked, &resolved.deltas).await?;
        Self::refresh_costs(&txn, &resolved.lines).await?;

        txn.commit().await?;
        tracing::info!(purchase = %purchase.id, total = %purchase.total, "purchase created");

        Ok(PurchaseWithLines { purchase, lines })
    }

    /// Replaces a purchase's header fields and line set.
    ///
    /// The original lines' stock effect is reversed and the new set applied
    /// as one net mutation; stock reflects only the new lines afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the purchase, supplier, or a product is missing,
    /// the new set is invalid, the reversal would underflow stock, or the
    /// database fails.
    pub async fn update_purchase(
        &self,
        id: Uuid,
        input: UpdatePurchaseInput,
    ) -> Result<PurchaseWithLines, PurchaseError> {
        let existing = self.require_purchase(id).await?;
        self.ensure_supplier(input.supplier_id).await?;

        let txn = self.db.begin().await?;

        let old_lines = Self::lines_of(&txn, existing.id).await?;
        let posted = Self::as_posted(&old_lines);
        let product_ids = stock::distinct_product_ids(
            old_lines
                .iter()
                .map(|l| l.product_id)
                .chain(input.lines.iter().map(|l| l.product_id.into_inner())),
        );
        let locked = stock::lock_products(&txn, &product_ids).await?;
        let resolved = DocumentService::resolve_replacement(
            &posted,
            &input.lines,
            Polarity::Purchase,
            stock::lookup_from(&locked),
        )?;

        purchase_lines::Entity::delete_many()
            .filter(purchase_lines::Column::PurchaseId.eq(existing.id))
            .exec(&txn)
            .await?;
        let lines = Self::insert_lines(&txn, existing.id, &resolved.lines).await?;

        let purchase = purchases::ActiveModel {
            id: Set(existing.id),
            reference_number: Set(input.reference_number),
            supplier_id: Set(input.supplier_id),
            issue_date: Set(input.issue_date),
            subtotal: Set(resolved.totals.subtotal),
            tax: Set(resolved.totals.tax),
            total: Set(resolved.totals.total),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .update(&txn)
        .await?;

        stock::apply_deltas(&txn, &locked, &resolved.deltas).await?;
        Self::refresh_costs(&txn, &resolved.lines).await?;

        txn.commit().await?;
        tracing::info!(purchase = %purchase.id, "purchase updated");

        Ok(PurchaseWithLines { purchase, lines })
    }

    /// Deletes a purchase and its lines, removing the received stock.
    ///
    /// # Errors
    ///
    /// Returns `PurchaseError::NotFound` if the purchase does not exist, or
    /// an insufficient-stock error if the received goods were already sold.
    pub async fn delete_purchase(&self, id: Uuid) -> Result<(), PurchaseError> {
        let existing = self.require_purchase(id).await?;

        let txn = self.db.begin().await?;

        let old_lines = Self::lines_of(&txn, existing.id).await?;
        let posted = Self::as_posted(&old_lines);
        let product_ids =
            stock::distinct_product_ids(old_lines.iter().map(|l| l.product_id));
        let locked = stock::lock_products(&txn, &product_ids).await?;
        let deltas = DocumentService::resolve_reversal(
            &posted,
            Polarity::Purchase,
            stock::lookup_from(&locked),
        )?;

        purchase_lines::Entity::delete_many()
            .filter(purchase_lines::Column::PurchaseId.eq(existing.id))
            .exec(&txn)
            .await?;
        purchases::Entity::delete_by_id(existing.id).exec(&txn).await?;
        stock::apply_deltas(&txn, &locked, &deltas).await?;

        txn.commit().await?;
        tracing::info!(purchase = %id, "purchase deleted");

        Ok(())
    }

    /// Voids a purchase: removes the received stock and flips the active
    /// flag, keeping header and lines for history.
    ///
    /// # Errors
    ///
    /// Returns `PurchaseError::NotFound` if the purchase does not exist, or
    /// a conflict if it is already void.
    pub async fn void_purchase(&self, id: Uuid) -> Result<purchases::Model, PurchaseError> {
        let existing = self.require_purchase(id).await?;
        DocumentService::validate_can_void(existing.is_active)?;

        let txn = self.db.begin().await?;

        let old_lines = Self::lines_of(&txn, existing.id).await?;
        let posted = Self::as_posted(&old_lines);
        let product_ids =
            stock::distinct_product_ids(old_lines.iter().map(|l| l.product_id));
        let locked = stock::lock_products(&txn, &product_ids).await?;
        let deltas = DocumentService::resolve_reversal(
            &posted,
            Polarity::Purchase,
            stock::lookup_from(&locked),
        )?;

        stock::apply_deltas(&txn, &locked, &deltas).await?;
        let purchase = purchases::ActiveModel {
            id: Set(existing.id),
            is_active: Set(false),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .update(&txn)
        .await?;

        txn.commit().await?;
        tracing::info!(purchase = %id, "purchase voided");

        Ok(purchase)
    }

    /// Fetches a purchase with its lines.
    ///
    /// # Errors
    ///
    /// Returns `PurchaseError::NotFound` if the purchase does not exist.
    pub async fn find_purchase(&self, id: Uuid) -> Result<PurchaseWithLines, PurchaseError> {
        let purchase = self.require_purchase(id).await?;
        let lines = purchase_lines::Entity::find()
            .filter(purchase_lines::Column::PurchaseId.eq(purchase.id))
            .order_by_asc(purchase_lines::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(PurchaseWithLines { purchase, lines })
    }

    /// Lists purchases, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database fails.
    pub async fn list_purchases(
        &self,
        filter: PurchaseFilter,
    ) -> Result<Vec<purchases::Model>, PurchaseError> {
        let mut query = purchases::Entity::find();
        if !filter.include_inactive {
            query = query.filter(purchases::Column::IsActive.eq(true));
        }
        if let Some(term) = &filter.search {
            query = query
                .join(JoinType::InnerJoin, purchases::Relation::Suppliers.def())
                .filter(
                    substring_condition(
                        &[(suppliers::Entity, suppliers::Column::Name)],
                        term,
                    )
                    .add(substring_condition(
                        &[(purchases::Entity, purchases::Column::ReferenceNumber)],
                        term,
                    )),
                );
        }
        let purchases = query
            .order_by_desc(purchases::Column::IssueDate)
            .all(&self.db)
            .await?;
        Ok(purchases)
    }

    /// Loads the purchase header or fails with `NotFound`.
    async fn require_purchase(&self, id: Uuid) -> Result<purchases::Model, PurchaseError> {
        purchases::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(PurchaseError::NotFound(id))
    }

    /// Verifies the supplier reference.
    async fn ensure_supplier(&self, id: Uuid) -> Result<(), PurchaseError> {
        suppliers::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(|_| ())
            .ok_or(PurchaseError::SupplierNotFound(id))
    }

    /// Loads the purchase's lines inside the transaction.
    async fn lines_of(
        txn: &DatabaseTransaction,
        purchase_id: Uuid,
    ) -> Result<Vec<purchase_lines::Model>, DbErr> {
        purchase_lines::Entity::find()
            .filter(purchase_lines::Column::PurchaseId.eq(purchase_id))
            .all(txn)
            .await
    }

    fn as_posted(lines: &[purchase_lines::Model]) -> Vec<PostedLine> {
        lines
            .iter()
            .map(|l| PostedLine {
                product_id: comercio_shared::types::ProductId::from_uuid(l.product_id),
                quantity: l.quantity,
            })
            .collect()
    }

    /// Inserts resolved lines for the purchase.
    async fn insert_lines(
        txn: &DatabaseTransaction,
        purchase_id: Uuid,
        resolved: &[ResolvedLine],
    ) -> Result<Vec<purchase_lines::Model>, DbErr> {
        let now = Utc::now().into();
        let mut lines = Vec::with_capacity(resolved.len());
        for line in resolved {
            let model = purchase_lines::ActiveModel {
                id: Set(Uuid::new_v4()),
                purchase_id: Set(purchase_id),
                product_id: Set(line.product_id.into_inner()),
                quantity: Set(line.quantity),
                unit_cost: Set(line.unit_price),
                subtotal: Set(line.subtotal),
                tax: Set(line.tax),
                created_at: Set(now),
            }
            .insert(txn)
            .await?;
            lines.push(model);
        }
        Ok(lines)
    }

    /// Updates each product's recorded cost to its latest purchase line
    /// unit cost (the last line wins for repeated products).
    async fn refresh_costs(
        txn: &DatabaseTransaction,
        resolved: &[ResolvedLine],
    ) -> Result<(), DbErr> {
        let mut latest: HashMap<Uuid, rust_decimal::Decimal> = HashMap::new();
        for line in resolved {
            latest.insert(line.product_id.into_inner(), line.unit_price);
        }
        let now = Utc::now().into();
        for (product_id, cost) in latest {
            let update = crate::entities::products::ActiveModel {
                id: Set(product_id),
                cost: Set(cost),
                updated_at: Set(now),
                ..Default::default()
            };
            update.update(txn).await?;
        }
        Ok(())
    }
}
