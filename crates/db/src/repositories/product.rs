//! Product repository.
//!
//! Products carry the mutable stock the document engines reconcile. Catalog
//! edits go through the effective field set computed by
//! `comercio_core::catalog::fields`; stock is never edited here.

use chrono::Utc;
use comercio_core::catalog::{editable_product_fields, FieldContext, ProductField, SearchTerm};
use comercio_shared::error::AppError;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use super::search::substring_condition;
use crate::entities::{product_categories, products};

/// Error types for product operations.
#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    /// Product not found.
    #[error("Product not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(_) => Self::NotFound(err.to_string()),
            ProductError::Database(inner) => Self::Database(inner.to_string()),
        }
    }
}

/// Input for creating or updating a product.
///
/// Fields outside the caller's effective field set are ignored.
#[derive(Debug, Clone)]
pub struct ProductInput {
    /// Product description.
    pub description: String,
    /// Purchase cost.
    pub cost: Decimal,
    /// Sale price.
    pub price: Decimal,
    /// Tax rate percent.
    pub tax_rate: Decimal,
    /// Brand reference.
    pub brand_id: Uuid,
    /// Supplier reference.
    pub supplier_id: Uuid,
    /// Category links.
    pub category_ids: Vec<Uuid>,
    /// Active flag (existing records, privileged users only).
    pub is_active: bool,
}

/// Filter options for listing products.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Include deactivated products.
    pub include_inactive: bool,
    /// Substring search over the description.
    pub search: Option<SearchTerm>,
}

/// Product repository for catalog CRUD.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    db: DatabaseConnection,
}

impl ProductRepository {
    /// Creates a new product repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a product with zero stock, owned by the acting user.
    ///
    /// The cost field is applied only when the context's field set allows
    /// it; unprivileged creators get a zero cost.
    ///
    /// # Errors
    ///
    /// Returns an error if the database fails.
    pub async fn create_product(
        &self,
        input: ProductInput,
        ctx: &FieldContext,
    ) -> Result<products::Model, ProductError> {
        let fields = editable_product_fields(ctx);
        let now = Utc::now().into();

        let txn = self.db.begin().await?;

        let product = products::ActiveModel {
            id: Set(Uuid::new_v4()),
            description: Set(input.description),
            cost: Set(if fields.contains(&ProductField::Cost) {
                input.cost
            } else {
                Decimal::ZERO
            }),
            price: Set(input.price),
            stock: Set(Decimal::ZERO),
            tax_rate: Set(input.tax_rate),
            brand_id: Set(input.brand_id),
            supplier_id: Set(input.supplier_id),
            user_id: Set(ctx.acting_user.into_inner()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        Self::replace_categories(&txn, product.id, &input.category_ids).await?;

        txn.commit().await?;
        Ok(product)
    }

    /// Updates a product, applying only the fields the context may edit.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::NotFound` if the product is missing.
    pub async fn update_product(
        &self,
        id: Uuid,
        input: ProductInput,
        ctx: &FieldContext,
    ) -> Result<products::Model, ProductError> {
        let existing = self.require_product(id).await?;
        let fields = editable_product_fields(ctx);

        let txn = self.db.begin().await?;

        let product = products::ActiveModel {
            id: Set(existing.id),
            description: Set(input.description),
            cost: if fields.contains(&ProductField::Cost) {
                Set(input.cost)
            } else {
                NotSet
            },
            price: Set(input.price),
            tax_rate: Set(input.tax_rate),
            brand_id: Set(input.brand_id),
            supplier_id: Set(input.supplier_id),
            is_active: if fields.contains(&ProductField::Active) {
                Set(input.is_active)
            } else {
                NotSet
            },
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .update(&txn)
        .await?;

        if fields.contains(&ProductField::Categories) {
            Self::replace_categories(&txn, product.id, &input.category_ids).await?;
        }

        txn.commit().await?;
        Ok(product)
    }

    /// Fetches a product.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::NotFound` if missing.
    pub async fn find_product(&self, id: Uuid) -> Result<products::Model, ProductError> {
        self.require_product(id).await
    }

    /// Lists products ordered by description.
    ///
    /// # Errors
    ///
    /// Returns an error if the database fails.
    pub async fn list_products(
        &self,
        filter: ProductFilter,
    ) -> Result<Vec<products::Model>, ProductError> {
        let mut query = products::Entity::find();
        if !filter.include_inactive {
            query = query.filter(products::Column::IsActive.eq(true));
        }
        if let Some(term) = &filter.search {
            query = query.filter(substring_condition(&[products::Column::Description], term));
        }
        Ok(query
            .order_by_asc(products::Column::Description)
            .all(&self.db)
            .await?)
    }

    async fn require_product(&self, id: Uuid) -> Result<products::Model, ProductError> {
        products::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// Replaces the product's category links.
    async fn replace_categories(
        txn: &sea_orm::DatabaseTransaction,
        product_id: Uuid,
        category_ids: &[Uuid],
    ) -> Result<(), DbErr> {
        product_categories::Entity::delete_many()
            .filter(product_categories::Column::ProductId.eq(product_id))
            .exec(txn)
            .await?;
        for category_id in category_ids {
            product_categories::ActiveModel {
                product_id: Set(product_id),
                category_id: Set(*category_id),
            }
            .insert(txn)
            .await?;
        }
        Ok(())
    }
}
