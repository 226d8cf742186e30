//! Loan domain types for creation and schedule generation.

use chrono::NaiveDate;
use comercio_shared::types::{EmployeeId, LoanTypeId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Loan status in the repayment lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    /// Loan is awaiting repayment; schedule may still be replaced.
    Pending,
    /// All installments settled (set by the payment collector, not here).
    Paid,
    /// Loan was annulled before repayment started.
    Annulled,
}

impl LoanStatus {
    /// Returns true if the amortization schedule may be regenerated.
    #[must_use]
    pub fn schedule_editable(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns true if the loan is in a terminal state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Paid | Self::Annulled)
    }
}

/// Computed financial terms of a loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanTerms {
    /// Interest amount: `principal * rate / 100`.
    pub interest: Decimal,
    /// Total payable: `principal + interest`.
    pub total_payable: Decimal,
}

/// One row of a generated amortization schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledInstallment {
    /// Sequence number, 1..=count, contiguous per loan.
    pub sequence: u32,
    /// Due date: request date advanced by `sequence` calendar months.
    pub due_date: NaiveDate,
    /// Installment amount.
    pub amount: Decimal,
    /// Remaining balance on this installment (initially its full amount).
    pub balance: Decimal,
}

/// Input for creating a new loan.
///
/// The interest rate is NOT part of the input; it is read server-side from
/// the referenced loan type.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLoanInput {
    /// The employee receiving the advance.
    pub employee_id: EmployeeId,
    /// The loan type carrying the interest rate.
    pub loan_type_id: LoanTypeId,
    /// Date the loan was requested; schedule dates derive from it.
    pub request_date: NaiveDate,
    /// Principal amount (must be positive).
    pub principal: Decimal,
    /// Number of installments (must be positive).
    pub installment_count: u32,
}

/// Input for updating an existing loan.
///
/// While the loan is Pending the financial fields are recomputed and the
/// schedule regenerated; afterwards only the descriptive header fields
/// (employee, request date) are applied.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateLoanInput {
    /// The employee receiving the advance.
    pub employee_id: EmployeeId,
    /// The loan type carrying the interest rate.
    pub loan_type_id: LoanTypeId,
    /// Date the loan was requested.
    pub request_date: NaiveDate,
    /// Principal amount (must be positive).
    pub principal: Decimal,
    /// Number of installments (must be positive).
    pub installment_count: u32,
}

/// A fully computed loan ready to persist: terms plus schedule.
#[derive(Debug, Clone)]
pub struct PreparedLoan {
    /// Computed interest.
    pub interest: Decimal,
    /// Computed total payable.
    pub total_payable: Decimal,
    /// Opening balance (equals total payable).
    pub balance: Decimal,
    /// Generated amortization schedule.
    pub installments: Vec<ScheduledInstallment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_editable() {
        assert!(LoanStatus::Pending.schedule_editable());
        assert!(!LoanStatus::Paid.schedule_editable());
        assert!(!LoanStatus::Annulled.schedule_editable());
    }

    #[test]
    fn test_terminal_states() {
        assert!(!LoanStatus::Pending.is_terminal());
        assert!(LoanStatus::Paid.is_terminal());
        assert!(LoanStatus::Annulled.is_terminal());
    }
}
