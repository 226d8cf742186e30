//! Invoice repository for sales document operations.
//!
//! Sales decrement product stock on creation and restore it on update,
//! delete, and void. Every operation runs header, lines, and stock deltas
//! inside one database transaction; the core document engine validates the
//! whole line set before anything is written.

use chrono::Utc;
use comercio_core::document::{
    DocumentError, DocumentService, LineItemInput, Polarity, PostedLine,
};
use comercio_shared::error::AppError;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use uuid::Uuid;

use super::search::substring_condition;
use super::stock;
use crate::entities::{
    customers, invoice_lines, invoices, sea_orm_active_enums::PaymentMethod,
};
use comercio_core::catalog::SearchTerm;

/// Error types for invoice operations.
#[derive(Debug, thiserror::Error)]
pub enum InvoiceError {
    /// Invoice not found.
    #[error("Invoice not found: {0}")]
    NotFound(Uuid),

    /// Customer not found.
    #[error("Customer not found: {0}")]
    CustomerNotFound(Uuid),

    /// Document engine rejected the operation.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<InvoiceError> for AppError {
    fn from(err: InvoiceError) -> Self {
        match err {
            InvoiceError::NotFound(_) | InvoiceError::CustomerNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            InvoiceError::Document(inner) => inner.into(),
            InvoiceError::Database(inner) => Self::Database(inner.to_string()),
        }
    }
}

/// Input for creating an invoice.
#[derive(Debug, Clone)]
pub struct CreateInvoiceInput {
    /// The billed customer.
    pub customer_id: Uuid,
    /// Payment method.
    pub payment_method: PaymentMethod,
    /// Issue timestamp.
    pub issue_date: sea_orm::prelude::DateTimeWithTimeZone,
    /// Amount tendered by the customer.
    pub payment: Decimal,
    /// Line items (subtotals and taxes are recomputed server-side).
    pub lines: Vec<LineItemInput>,
    /// The acting user.
    pub created_by: Uuid,
}

/// Input for updating an invoice; the line set fully replaces the old one.
#[derive(Debug, Clone)]
pub struct UpdateInvoiceInput {
    /// The billed customer.
    pub customer_id: Uuid,
    /// Payment method.
    pub payment_method: PaymentMethod,
    /// Issue timestamp.
    pub issue_date: sea_orm::prelude::DateTimeWithTimeZone,
    /// Amount tendered by the customer.
    pub payment: Decimal,
    /// Replacement line items.
    pub lines: Vec<LineItemInput>,
}

/// Filter options for listing invoices.
#[derive(Debug, Clone, Default)]
pub struct InvoiceFilter {
    /// Include voided invoices.
    pub include_inactive: bool,
    /// Substring search over the customer's names.
    pub search: Option<SearchTerm>,
}

/// Invoice header with its lines.
#[derive(Debug, Clone)]
pub struct InvoiceWithLines {
    /// Invoice header.
    pub invoice: invoices::Model,
    /// Invoice lines.
    pub lines: Vec<invoice_lines::Model>,
}

/// Invoice repository for sales CRUD plus void.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    db: DatabaseConnection,
}

impl InvoiceRepository {
    /// Creates a new invoice repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an invoice with its lines, decrementing product stock.
    ///
    /// # Errors
    ///
    /// Returns an error if the customer or a product is missing, a line is
    /// invalid, stock would be overdrawn, or the database fails. Nothing is
    /// persisted on failure.
    pub async fn create_invoice(
        &self,
        input: CreateInvoiceInput,
    ) -> Result<InvoiceWithLines, InvoiceError> {
        self.ensure_customer(input.customer_id).await?;

        let txn = self.db.begin().await?;

        let product_ids = stock::distinct_product_ids(
            input.lines.iter().map(|l| l.product_id.into_inner()),
        );
        let locked = stock::lock_products(&txn, &product_ids).await?;
        let resolved =
            DocumentService::resolve_document(&input.lines, Polarity::Sale, stock::lookup_from(&locked))?;

        let now = Utc::now().into();
        let change = (input.payment - resolved.totals.total).max(Decimal::ZERO);
        let invoice = invoices::ActiveModel {
            id: Set(Uuid::new_v4()),
            customer_id: Set(input.customer_id),
            payment_method: Set(input.payment_method),
            issue_date: Set(input.issue_date),
            subtotal: Set(resolved.totals.subtotal),
            tax: Set(resolved.totals.tax),
            total: Set(resolved.totals.total),
            payment: Set(input.payment),
            change: Set(change),
            user_id: Set(input.created_by),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let lines = Self::insert_lines(&txn, invoice.id, &resolved.lines).await?;
        stock::apply_deltas(&txn, &locked, &resolved.deltas).await?;

        txn.commit().await?;
        tracing::info!(invoice = %invoice.id, total = %invoice.total, "invoice created");

        Ok(InvoiceWithLines { invoice, lines })
    }

    /// Replaces an invoice's header fields and line set.
    ///
    /// The original lines' stock effect is reversed and the new set applied
    /// as one net mutation; stock reflects only the new lines afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the invoice, customer, or a product is missing,
    /// the new set is invalid, stock would be overdrawn, or the database
    /// fails.
    pub async fn update_invoice(
        &self,
        id: Uuid,
        input: UpdateInvoiceInput,
    ) -> Result<InvoiceWithLines, InvoiceError> {
        let existing = self.require_invoice(id).await?;
        self.ensure_customer(input.customer_id).await?;

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
            Polarity::Sale,
            stock::lookup_from(&locked),
        )?;

        invoice_lines::Entity::delete_many()
            .filter(invoice_lines::Column::InvoiceId.eq(existing.id))
            .exec(&txn)
            .await?;
        let lines = Self::insert_lines(&txn, existing.id, &resolved.lines).await?;

        let change = (input.payment - resolved.totals.total).max(Decimal::ZERO);
        let invoice = invoices::ActiveModel {
            id: Set(existing.id),
            customer_id: Set(input.customer_id),
            payment_method: Set(input.payment_method),
            issue_date: Set(input.issue_date),
            subtotal: Set(resolved.totals.subtotal),
            tax: Set(resolved.totals.tax),
            total: Set(resolved.totals.total),
            payment: Set(input.payment),
            change: Set(change),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .update(&txn)
        .await?;

        stock::apply_deltas(&txn, &locked, &resolved.deltas).await?;

        txn.commit().await?;
        tracing::info!(invoice = %invoice.id, "invoice updated");

        Ok(InvoiceWithLines { invoice, lines })
    }

    /// Deletes an invoice and its lines, restoring product stock.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceError::NotFound` if the invoice does not exist.
    pub async fn delete_invoice(&self, id: Uuid) -> Result<(), InvoiceError> {
        let existing = self.require_invoice(id).await?;

        let txn = self.db.begin().await?;

        let old_lines = Self::lines_of(&txn, existing.id).await?;
        let posted = Self::as_posted(&old_lines);
        let product_ids =
            stock::distinct_product_ids(old_lines.iter().map(|l| l.product_id));
        let locked = stock::lock_products(&txn, &product_ids).await?;
        let deltas =
            DocumentService::resolve_reversal(&posted, Polarity::Sale, stock::lookup_from(&locked))?;

        invoice_lines::Entity::delete_many()
            .filter(invoice_lines::Column::InvoiceId.eq(existing.id))
            .exec(&txn)
            .await?;
        invoices::Entity::delete_by_id(existing.id).exec(&txn).await?;
        stock::apply_deltas(&txn, &locked, &deltas).await?;

        txn.commit().await?;
        tracing::info!(invoice = %id, "invoice deleted");

        Ok(())
    }

    /// Voids an invoice: restores stock and flips the active flag, keeping
    /// header and lines for history.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceError::NotFound` if the invoice does not exist, or a
    /// conflict if it is already void.
    pub async fn void_invoice(&self, id: Uuid) -> Result<invoices::Model, InvoiceError> {
        let existing = self.require_invoice(id).await?;
        DocumentService::validate_can_void(existing.is_active)?;

        let txn = self.db.begin().await?;

        let old_lines = Self::lines_of(&txn, existing.id).await?;
        let posted = Self::as_posted(&old_lines);
        let product_ids =
            stock::distinct_product_ids(old_lines.iter().map(|l| l.product_id));
        let locked = stock::lock_products(&txn, &product_ids).await?;
        let deltas =
            DocumentService::resolve_reversal(&posted, Polarity::Sale, stock::lookup_from(&locked))?;

        stock::apply_deltas(&txn, &locked, &deltas).await?;
        let invoice = invoices::ActiveModel {
            id: Set(existing.id),
            is_active: Set(false),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .update(&txn)
        .await?;

        txn.commit().await?;
        tracing::info!(invoice = %id, "invoice voided");

        Ok(invoice)
    }

    /// Fetches an invoice with its lines.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceError::NotFound` if the invoice does not exist.
    pub async fn find_invoice(&self, id: Uuid) -> Result<InvoiceWithLines, InvoiceError> {
        let invoice = self.require_invoice(id).await?;
        let lines = invoice_lines::Entity::find()
            .filter(invoice_lines::Column::InvoiceId.eq(invoice.id))
            .order_by_asc(invoice_lines::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(InvoiceWithLines { invoice, lines })
    }

    /// Lists invoices, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database fails.
    pub async fn list_invoices(
        &self,
        filter: InvoiceFilter,
    ) -> Result<Vec<invoices::Model>, InvoiceError> {
        let mut query = invoices::Entity::find();
        if !filter.include_inactive {
            query = query.filter(invoices::Column::IsActive.eq(true));
        }
        if let Some(term) = &filter.search {
            query = query
                .join(JoinType::InnerJoin, invoices::Relation::Customers.def())
                .filter(substring_condition(
                    &[
                        (customers::Entity, customers::Column::LastName),
                        (customers::Entity, customers::Column::FirstName),
                    ],
                    term,
                ));
        }
        let invoices = query
            .order_by_desc(invoices::Column::IssueDate)
            .all(&self.db)
            .await?;
        Ok(invoices)
    }

    /// Loads the invoice header or fails with `NotFound`.
    async fn require_invoice(&self, id: Uuid) -> Result<invoices::Model, InvoiceError> {
        invoices::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(InvoiceError::NotFound(id))
    }

    /// Verifies the customer reference.
    async fn ensure_customer(&self, id: Uuid) -> Result<(), InvoiceError> {
        customers::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(|_| ())
            .ok_or(InvoiceError::CustomerNotFound(id))
    }

    /// Loads the invoice's lines inside the transaction.
    async fn lines_of(
        txn: &DatabaseTransaction,
        invoice_id: Uuid,
    ) -> Result<Vec<invoice_lines::Model>, DbErr> {
        invoice_lines::Entity::find()
            .filter(invoice_lines::Column::InvoiceId.eq(invoice_id))
            .all(txn)
            .await
    }

    fn as_posted(lines: &[invoice_lines::Model]) -> Vec<PostedLine> {
        lines
            .iter()
            .map(|l| PostedLine {
                product_id: comercio_shared::types::ProductId::from_uuid(l.product_id),
                quantity: l.quantity,
            })
            .collect()
    }

    /// Inserts resolved lines for the invoice.
    async fn insert_lines(
        txn: &DatabaseTransaction,
        invoice_id: Uuid,
        resolved: &[comercio_core::document::ResolvedLine],
    ) -> Result<Vec<invoice_lines::Model>, DbErr> {
        let now = Utc::now().into();
        let mut lines = Vec::with_capacity(resolved.len());
        for line in resolved {
            let model = invoice_lines::ActiveModel {
                id: Set(Uuid::new_v4()),
                invoice_id: Set(invoice_id),
                product_id: Set(line.product_id.into_inner()),
                quantity: Set(line.quantity),
                unit_price: Set(line.unit_price),
                unit_cost: Set(line.unit_cost),
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
}
