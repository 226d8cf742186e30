//! `SeaORM` Entity for the products table.
//!
//! The `stock` column is only ever mutated by the document engines inside a
//! row-locked transaction; the schema backs that up with `CHECK (stock >= 0)`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub cost: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub stock: Decimal,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub tax_rate: Decimal,
    pub brand_id: Uuid,
    pub supplier_id: Uuid,
    pub user_id: Uuid,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::brands::Entity",
        from = "Column::BrandId",
        to = "super::brands::Column::Id"
    )]
    Brands,
    #[sea_orm(
        belongs_to = "super::suppliers::Entity",
        from = "Column::SupplierId",
        to = "super::suppliers::Column::Id"
    )]
    Suppliers,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(has_many = "super::product_categories::Entity")]
    ProductCategories,
    #[sea_orm(has_many = "super::invoice_lines::Entity")]
    InvoiceLines,
    #[sea_orm(has_many = "super::purchase_lines::Entity")]
    PurchaseLines,
}

impl Related<super::brands::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Brands.def()
    }
}

impl Related<super::suppliers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Suppliers.def()
    }
}

impl Related<super::product_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductCategories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
