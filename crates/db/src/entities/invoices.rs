//! `SeaORM` Entity for the invoices (sales) table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::PaymentMethod;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_id: Uuid,
    pub payment_method: PaymentMethod,
    pub issue_date: DateTimeWithTimeZone,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub subtotal: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub tax: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub total: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub payment: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub change: Decimal,
    pub user_id: Uuid,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::CustomerId",
        to = "super::customers::Column::Id"
    )]
    Customers,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(has_many = "super::invoice_lines::Entity")]
    InvoiceLines,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customers.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::invoice_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InvoiceLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
