//! Workflow tests for the payroll loan lifecycle.
//!
//! Exercises the status machine and schedule derivation the loan repository
//! runs, including the enum mapping between the database and the core.

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use comercio_core::payroll::{self, LoanService};
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::entities::sea_orm_active_enums::LoanStatus;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_reference_loan_lifecycle() {
        // Create: 1000 at 10% over 5 installments
        let prepared =
            LoanService::prepare(dec!(1000), dec!(10), 5, date(2024, 1, 1)).unwrap();
        assert_eq!(prepared.interest, dec!(100.00));
        assert_eq!(prepared.total_payable, dec!(1100.00));
        assert_eq!(prepared.balance, dec!(1100.00));
        assert_eq!(prepared.installments.len(), 5);
        assert!(prepared.installments.iter().all(|i| i.amount == dec!(220.00)));

        // Pending: schedule may be replaced, loan may be annulled or deleted
        let status: payroll::LoanStatus = LoanStatus::Pending.into();
        LoanService::validate_can_replace_schedule(status).unwrap();
        LoanService::validate_can_annul(status).unwrap();
        LoanService::validate_can_delete(status).unwrap();

        // Annulled: terminal, delete still allowed, annul and replace are not
        let status: payroll::LoanStatus = LoanStatus::Annulled.into();
        assert!(LoanService::validate_can_replace_schedule(status).is_err());
        assert!(LoanService::validate_can_annul(status).is_err());
        LoanService::validate_can_delete(status).unwrap();

        // Paid: fully frozen
        let status: payroll::LoanStatus = LoanStatus::Paid.into();
        assert!(matches!(
            LoanService::validate_can_replace_schedule(status),
            Err(payroll::LoanError::ScheduleFrozen)
        ));
        assert!(matches!(
            LoanService::validate_can_delete(status),
            Err(payroll::LoanError::DeleteUnderPayment)
        ));
    }

    #[test]
    fn test_update_derives_schedule_not_payload() {
        // The repository regenerates from principal/rate/count; preparing
        // the same inputs twice must be deterministic.
        let first = LoanService::prepare(dec!(750.50), dec!(12.5), 7, date(2025, 3, 15)).unwrap();
        let second = LoanService::prepare(dec!(750.50), dec!(12.5), 7, date(2025, 3, 15)).unwrap();
        assert_eq!(first.installments, second.installments);
        assert_eq!(first.total_payable, second.total_payable);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        /// The database enum and the core status map losslessly both ways.
        #[test]
        fn prop_status_mapping_round_trips(variant in 0u8..3) {
            let db_status = match variant {
                0 => LoanStatus::Pending,
                1 => LoanStatus::Paid,
                _ => LoanStatus::Annulled,
            };
            let core: payroll::LoanStatus = db_status.clone().into();
            let back: LoanStatus = core.into();
            prop_assert_eq!(back, db_status);
        }

        /// Whatever inputs a client submits, a prepared loan's balance opens
        /// at the total payable and its schedule sums to it.
        #[test]
        fn prop_prepared_loans_balance(
            principal_cents in 1i64..50_000_000,
            rate_cents in 0i64..5_000,
            count in 1u32..48,
        ) {
            let principal = Decimal::new(principal_cents, 2);
            let rate = Decimal::new(rate_cents, 2);
            let prepared = LoanService::prepare(
                principal, rate, count, date(2024, 6, 30),
            ).unwrap();

            prop_assert_eq!(prepared.balance, prepared.total_payable);
            let sum: Decimal = prepared.installments.iter().map(|i| i.amount).sum();
            prop_assert_eq!(sum, prepared.total_payable);
        }
    }
}
