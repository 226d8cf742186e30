//! `SeaORM` Entity for the purchase lines table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_lines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub purchase_id: Uuid,
    pub product_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub quantity: Decimal,
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
        belongs_to = "super::purchases::Entity",
        from = "Column::PurchaseId",
        to = "super::purchases::Column::Id",
        on_delete = "Cascade"
    )]
    Purchases,
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id"
    )]
    Products,
}

impl Related<super::purchases::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Purchases.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
