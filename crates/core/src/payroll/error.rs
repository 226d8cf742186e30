//! Loan error types for validation and state errors.

use comercio_shared::error::AppError;
use comercio_shared::types::{EmployeeId, LoanId, LoanTypeId};
use rust_decimal::Decimal;
use thiserror::Error;

use super::types::LoanStatus;

/// Errors that can occur during loan operations.
#[derive(Debug, Error)]
pub enum LoanError {
    // ========== Validation Errors ==========
    /// Principal must be positive.
    #[error("Loan principal must be positive, got {principal}")]
    NonPositivePrincipal {
        /// The rejected principal amount.
        principal: Decimal,
    },

    /// Installment count must be positive.
    #[error("Loan must have at least one installment")]
    NoInstallments,

    /// Interest rate cannot be negative.
    #[error("Interest rate cannot be negative, got {rate}")]
    NegativeRate {
        /// The rejected rate percent.
        rate: Decimal,
    },

    /// A schedule due date would overflow the calendar.
    #[error("Due date for installment {sequence} is out of range")]
    DueDateOutOfRange {
        /// Sequence number of the offending installment.
        sequence: u32,
    },

    // ========== State Errors ==========
    /// Schedule can only be replaced while the loan is Pending.
    #[error("Installment schedule is frozen once repayment has started")]
    ScheduleFrozen,

    /// Loans under active repayment cannot be deleted.
    #[error("Cannot delete a loan under active payment")]
    DeleteUnderPayment,

    /// Only Pending loans can be annulled.
    #[error("Loan cannot be annulled in its current state ({0:?})")]
    CannotAnnul(LoanStatus),

    // ========== Reference Errors ==========
    /// Employee not found.
    #[error("Employee not found: {0}")]
    EmployeeNotFound(EmployeeId),

    /// Loan type not found.
    #[error("Loan type not found: {0}")]
    LoanTypeNotFound(LoanTypeId),

    /// Loan not found.
    #[error("Loan not found: {0}")]
    LoanNotFound(LoanId),
}

impl LoanError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositivePrincipal { .. } => "NON_POSITIVE_PRINCIPAL",
            Self::NoInstallments => "NO_INSTALLMENTS",
            Self::NegativeRate { .. } => "NEGATIVE_RATE",
            Self::DueDateOutOfRange { .. } => "DUE_DATE_OUT_OF_RANGE",
            Self::ScheduleFrozen => "SCHEDULE_FROZEN",
            Self::DeleteUnderPayment => "DELETE_UNDER_PAYMENT",
            Self::CannotAnnul(_) => "CANNOT_ANNUL",
            Self::EmployeeNotFound(_) => "EMPLOYEE_NOT_FOUND",
            Self::LoanTypeNotFound(_) => "LOAN_TYPE_NOT_FOUND",
            Self::LoanNotFound(_) => "LOAN_NOT_FOUND",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::NonPositivePrincipal { .. }
            | Self::NoInstallments
            | Self::NegativeRate { .. }
            | Self::DueDateOutOfRange { .. } => 400,

            // 404 Not Found
            Self::EmployeeNotFound(_) | Self::LoanTypeNotFound(_) | Self::LoanNotFound(_) => 404,

            // 409 Conflict - state errors
            Self::ScheduleFrozen | Self::DeleteUnderPayment | Self::CannotAnnul(_) => 409,
        }
    }
}

impl From<LoanError> for AppError {
    fn from(err: LoanError) -> Self {
        let message = err.to_string();
        match err {
            LoanError::NonPositivePrincipal { .. }
            | LoanError::NoInstallments
            | LoanError::NegativeRate { .. }
            | LoanError::DueDateOutOfRange { .. } => Self::Validation(message),
            LoanError::EmployeeNotFound(_)
            | LoanError::LoanTypeNotFound(_)
            | LoanError::LoanNotFound(_) => Self::NotFound(message),
            LoanError::ScheduleFrozen
            | LoanError::DeleteUnderPayment
            | LoanError::CannotAnnul(_) => Self::Conflict(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            LoanError::NonPositivePrincipal {
                principal: dec!(0)
            }
            .error_code(),
            "NON_POSITIVE_PRINCIPAL"
        );
        assert_eq!(LoanError::NoInstallments.error_code(), "NO_INSTALLMENTS");
        assert_eq!(
            LoanError::DeleteUnderPayment.error_code(),
            "DELETE_UNDER_PAYMENT"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(LoanError::NoInstallments.http_status_code(), 400);
        assert_eq!(
            LoanError::LoanNotFound(LoanId::new()).http_status_code(),
            404
        );
        assert_eq!(LoanError::ScheduleFrozen.http_status_code(), 409);
    }

    #[test]
    fn test_app_error_mapping() {
        let err: AppError = LoanError::NoInstallments.into();
        assert!(matches!(err, AppError::Validation(_)));

        let err: AppError = LoanError::LoanNotFound(LoanId::new()).into();
        assert!(matches!(err, AppError::NotFound(_)));

        let err: AppError = LoanError::CannotAnnul(LoanStatus::Paid).into();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn test_error_display() {
        let err = LoanError::NonPositivePrincipal {
            principal: dec!(-5),
        };
        assert_eq!(err.to_string(), "Loan principal must be positive, got -5");
        assert_eq!(
            LoanError::DeleteUnderPayment.to_string(),
            "Cannot delete a loan under active payment"
        );
    }
}
