//! Loan service for validation and schedule preparation.
//!
//! This service contains pure business logic with no database dependencies.
//! It validates loan inputs and state transitions, and prepares the full
//! loan (terms plus schedule) before persistence. The repository invokes
//! `prepare` explicitly and persists the result in one transaction; nothing
//! here runs implicitly on save.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::LoanError;
use super::schedule::{compute_terms, generate_schedule};
use super::types::{LoanStatus, PreparedLoan};

/// Loan service for input validation, term computation, and state guards.
pub struct LoanService;

impl LoanService {
    /// Validates the financial inputs of a new or replacement loan.
    ///
    /// # Errors
    ///
    /// Returns `LoanError` naming the offending field.
    pub fn validate_financials(
        principal: Decimal,
        rate_percent: Decimal,
        installment_count: u32,
    ) -> Result<(), LoanError> {
        if principal <= Decimal::ZERO {
            return Err(LoanError::NonPositivePrincipal { principal });
        }
        if installment_count == 0 {
            return Err(LoanError::NoInstallments);
        }
        if rate_percent < Decimal::ZERO {
            return Err(LoanError::NegativeRate { rate: rate_percent });
        }
        Ok(())
    }

    /// Validates inputs, computes terms, and generates the schedule.
    ///
    /// The schedule is always derived server-side from principal, rate, and
    /// count; externally supplied schedules are never accepted.
    ///
    /// # Errors
    ///
    /// Returns `LoanError` if validation or schedule generation fails.
    pub fn prepare(
        principal: Decimal,
        rate_percent: Decimal,
        installment_count: u32,
        start_date: NaiveDate,
    ) -> Result<PreparedLoan, LoanError> {
        Self::validate_financials(principal, rate_percent, installment_count)?;

        let terms = compute_terms(principal, rate_percent);
        let installments = generate_schedule(terms.total_payable, installment_count, start_date)?;

        Ok(PreparedLoan {
            interest: terms.interest,
            total_payable: terms.total_payable,
            balance: terms.total_payable,
            installments,
        })
    }

    /// Validates that the loan's schedule may be deleted and regenerated.
    ///
    /// # Errors
    ///
    /// Returns `LoanError::ScheduleFrozen` once repayment has started.
    pub fn validate_can_replace_schedule(status: LoanStatus) -> Result<(), LoanError> {
        if status.schedule_editable() {
            Ok(())
        } else {
            Err(LoanError::ScheduleFrozen)
        }
    }

    /// Validates that the loan may be deleted.
    ///
    /// # Errors
    ///
    /// Returns `LoanError::DeleteUnderPayment` unless the loan is Pending
    /// or Annulled.
    pub fn validate_can_delete(status: LoanStatus) -> Result<(), LoanError> {
        match status {
            LoanStatus::Pending | LoanStatus::Annulled => Ok(()),
            LoanStatus::Paid => Err(LoanError::DeleteUnderPayment),
        }
    }

    /// Validates that the loan may be annulled.
    ///
    /// # Errors
    ///
    /// Returns `LoanError::CannotAnnul` unless the loan is Pending.
    pub fn validate_can_annul(status: LoanStatus) -> Result<(), LoanError> {
        if status == LoanStatus::Pending {
            Ok(())
        } else {
            Err(LoanError::CannotAnnul(status))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn test_prepare_reference_loan() {
        let loan = LoanService::prepare(dec!(1000), dec!(10), 5, start()).unwrap();
        assert_eq!(loan.interest, dec!(100.00));
        assert_eq!(loan.total_payable, dec!(1100.00));
        assert_eq!(loan.balance, dec!(1100.00));
        assert_eq!(loan.installments.len(), 5);
    }

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(-100))]
    fn test_prepare_rejects_non_positive_principal(#[case] principal: Decimal) {
        let result = LoanService::prepare(principal, dec!(10), 5, start());
        assert!(matches!(
            result,
            Err(LoanError::NonPositivePrincipal { .. })
        ));
    }

    #[test]
    fn test_prepare_rejects_zero_installments() {
        let result = LoanService::prepare(dec!(1000), dec!(10), 0, start());
        assert!(matches!(result, Err(LoanError::NoInstallments)));
    }

    #[test]
    fn test_prepare_rejects_negative_rate() {
        let result = LoanService::prepare(dec!(1000), dec!(-1), 5, start());
        assert!(matches!(result, Err(LoanError::NegativeRate { .. })));
    }

    #[test]
    fn test_can_replace_schedule_only_pending() {
        assert!(LoanService::validate_can_replace_schedule(LoanStatus::Pending).is_ok());
        assert!(matches!(
            LoanService::validate_can_replace_schedule(LoanStatus::Paid),
            Err(LoanError::ScheduleFrozen)
        ));
        assert!(matches!(
            LoanService::validate_can_replace_schedule(LoanStatus::Annulled),
            Err(LoanError::ScheduleFrozen)
        ));
    }

    #[rstest]
    #[case(LoanStatus::Pending, true)]
    #[case(LoanStatus::Annulled, true)]
    #[case(LoanStatus::Paid, false)]
    fn test_can_delete(#[case] status: LoanStatus, #[case] allowed: bool) {
        assert_eq!(LoanService::validate_can_delete(status).is_ok(), allowed);
    }

    #[test]
    fn test_can_annul_only_pending() {
        assert!(LoanService::validate_can_annul(LoanStatus::Pending).is_ok());
        assert!(matches!(
            LoanService::validate_can_annul(LoanStatus::Paid),
            Err(LoanError::CannotAnnul(LoanStatus::Paid))
        ));
        assert!(matches!(
            LoanService::validate_can_annul(LoanStatus::Annulled),
            Err(LoanError::CannotAnnul(LoanStatus::Annulled))
        ));
    }
}
