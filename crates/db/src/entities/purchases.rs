//! `SeaORM` Entity for the purchases table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "purchases")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub reference_number: Option<String>,
    pub supplier_id: Uuid,
    pub issue_date: DateTimeWithTimeZone,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub subtotal: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub tax: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub total: Decimal,
    pub user_id: Uuid,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
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
    #[sea_orm(has_many = "super::purchase_lines::Entity")]
    PurchaseLines,
}

impl Related<super::suppliers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Suppliers.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::purchase_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
