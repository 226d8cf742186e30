//! `SeaORM` Entity for the loans table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::LoanStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "loans")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub employee_id: Uuid,
    pub loan_type_id: Uuid,
    pub request_date: Date,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub principal: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub interest: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub total_payable: Decimal,
    pub installment_count: i32,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub balance: Decimal,
    pub status: LoanStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employees::Entity",
        from = "Column::EmployeeId",
        to = "super::employees::Column::Id"
    )]
    Employees,
    #[sea_orm(
        belongs_to = "super::loan_types::Entity",
        from = "Column::LoanTypeId",
        to = "super::loan_types::Column::Id"
    )]
    LoanTypes,
    #[sea_orm(has_many = "super::loan_installments::Entity")]
    LoanInstallments,
}

impl Related<super::employees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employees.def()
    }
}

impl Related<super::loan_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LoanTypes.def()
    }
}

impl Related<super::loan_installments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LoanInstallments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
