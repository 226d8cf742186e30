//! Property-based tests for amortization schedule generation.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::schedule::{compute_terms, generate_schedule};

/// Strategy for generating positive principal amounts (cents).
fn principal_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for generating interest rates (percent, two decimals).
fn rate_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..10_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for generating installment counts.
fn count_strategy() -> impl Strategy<Value = u32> {
    1u32..=72
}

/// Strategy for generating start dates.
fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2100, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Installment amounts always sum exactly to the total payable.
    #[test]
    fn prop_schedule_sums_to_total(
        principal in principal_strategy(),
        rate in rate_strategy(),
        count in count_strategy(),
        start in date_strategy(),
    ) {
        let terms = compute_terms(principal, rate);
        let schedule = generate_schedule(terms.total_payable, count, start).unwrap();

        let sum: Decimal = schedule.iter().map(|i| i.amount).sum();
        prop_assert_eq!(sum, terms.total_payable);
    }

    /// Terms follow interest = P*R/100 and total = P + interest exactly.
    #[test]
    fn prop_terms_are_exact(
        principal in principal_strategy(),
        rate in rate_strategy(),
    ) {
        let terms = compute_terms(principal, rate);
        prop_assert_eq!(terms.total_payable, principal + terms.interest);
        // Interest never differs from the raw product by more than half a cent
        let raw = principal * rate / Decimal::ONE_HUNDRED;
        prop_assert!((terms.interest - raw).abs() <= Decimal::new(5, 3));
    }

    /// Sequence numbers are contiguous from 1 and due dates strictly advance.
    #[test]
    fn prop_schedule_shape(
        principal in principal_strategy(),
        rate in rate_strategy(),
        count in count_strategy(),
        start in date_strategy(),
    ) {
        let terms = compute_terms(principal, rate);
        let schedule = generate_schedule(terms.total_payable, count, start).unwrap();

        prop_assert_eq!(schedule.len(), count as usize);
        for (i, inst) in schedule.iter().enumerate() {
            prop_assert_eq!(inst.sequence as usize, i + 1);
            prop_assert_eq!(inst.balance, inst.amount);
            prop_assert!(inst.amount >= Decimal::ZERO);
            prop_assert!(inst.due_date > start);
            if i > 0 {
                prop_assert!(inst.due_date > schedule[i - 1].due_date);
            }
        }
    }

    /// All installments except the last share one amount.
    #[test]
    fn prop_equal_installments_except_last(
        principal in principal_strategy(),
        rate in rate_strategy(),
        count in count_strategy(),
        start in date_strategy(),
    ) {
        let terms = compute_terms(principal, rate);
        let schedule = generate_schedule(terms.total_payable, count, start).unwrap();

        if schedule.len() > 1 {
            let head = schedule[0].amount;
            for inst in &schedule[..schedule.len() - 1] {
                prop_assert_eq!(inst.amount, head);
            }
        }
    }
}
