//! Database enum types shared by the entities.

use comercio_core::payroll;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Loan repayment status (`loan_status` Postgres enum).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "loan_status")]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    /// Awaiting repayment.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Fully settled.
    #[sea_orm(string_value = "paid")]
    Paid,
    /// Annulled before repayment started.
    #[sea_orm(string_value = "annulled")]
    Annulled,
}

impl From<LoanStatus> for payroll::LoanStatus {
    fn from(status: LoanStatus) -> Self {
        match status {
            LoanStatus::Pending => Self::Pending,
            LoanStatus::Paid => Self::Paid,
            LoanStatus::Annulled => Self::Annulled,
        }
    }
}

impl From<payroll::LoanStatus> for LoanStatus {
    fn from(status: payroll::LoanStatus) -> Self {
        match status {
            payroll::LoanStatus::Pending => Self::Pending,
            payroll::LoanStatus::Paid => Self::Paid,
            payroll::LoanStatus::Annulled => Self::Annulled,
        }
    }
}

/// Invoice payment method (`payment_method` Postgres enum).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_method")]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Paid in cash at issue time.
    #[sea_orm(string_value = "cash")]
    Cash,
    /// Sold on customer credit.
    #[sea_orm(string_value = "credit")]
    Credit,
}
