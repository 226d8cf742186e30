//! `SeaORM` Entity for the invoice lines table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "invoice_lines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub product_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub quantity: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub unit_price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub unit_cost: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub subtotal: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub tax: Decimal,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::invoices::Entity",
        from = "Column::InvoiceId",
        to = "super::invoices::Column::Id",
        on_delete = "Cascade"
    )]
    Invoices,
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id"
    )]
    Products,
}

impl Related<super::invoices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoices.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
