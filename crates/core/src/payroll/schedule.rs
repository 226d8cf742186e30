//! Amortization schedule generation.
//!
//! A loan schedule is flat: the total payable is divided into equal
//! installments with no declining-balance interest. Division to monetary
//! precision can leave a residue; the final installment absorbs it so the
//! installment amounts always sum exactly to the total payable.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;

use super::error::LoanError;
use super::types::{LoanTerms, ScheduledInstallment};
use crate::money::round_money;

/// Computes the financial terms of a loan.
///
/// `interest = principal * rate / 100` at monetary precision;
/// `total_payable = principal + interest`.
#[must_use]
pub fn compute_terms(principal: Decimal, rate_percent: Decimal) -> LoanTerms {
    let interest = round_money(principal * rate_percent / Decimal::ONE_HUNDRED);
    LoanTerms {
        interest,
        total_payable: principal + interest,
    }
}

/// Generates the amortization schedule for a loan.
///
/// Installment `i` (1-based) is due `i` calendar months after `start_date`,
/// with the day-of-month clamped at month end (Jan 31 + 1 month = Feb 29 in
/// a leap year). Each installment opens with its full amount as balance.
///
/// # Errors
///
/// Returns `LoanError::NoInstallments` for a zero count, or
/// `LoanError::DueDateOutOfRange` if a due date overflows the calendar.
pub fn generate_schedule(
    total_payable: Decimal,
    installment_count: u32,
    start_date: NaiveDate,
) -> Result<Vec<ScheduledInstallment>, LoanError> {
    if installment_count == 0 {
        return Err(LoanError::NoInstallments);
    }

    let count = Decimal::from(installment_count);
    let amount = round_money(total_payable / count);
    // The last installment absorbs the rounding residue.
    let last_amount = total_payable - amount * (count - Decimal::ONE);

    let mut installments = Vec::with_capacity(installment_count as usize);
    for sequence in 1..=installment_count {
        let due_date = start_date
            .checked_add_months(Months::new(sequence))
            .ok_or(LoanError::DueDateOutOfRange { sequence })?;
        let amount = if sequence == installment_count {
            last_amount
        } else {
            amount
        };
        installments.push(ScheduledInstallment {
            sequence,
            due_date,
            amount,
            balance: amount,
        });
    }

    Ok(installments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_compute_terms() {
        let terms = compute_terms(dec!(1000), dec!(10));
        assert_eq!(terms.interest, dec!(100.00));
        assert_eq!(terms.total_payable, dec!(1100.00));
    }

    #[test]
    fn test_compute_terms_zero_rate() {
        let terms = compute_terms(dec!(500), dec!(0));
        assert_eq!(terms.interest, dec!(0.00));
        assert_eq!(terms.total_payable, dec!(500.00));
    }

    #[test]
    fn test_compute_terms_rounds_interest() {
        // 333.33 * 7% = 23.3331 -> 23.33
        let terms = compute_terms(dec!(333.33), dec!(7));
        assert_eq!(terms.interest, dec!(23.33));
        assert_eq!(terms.total_payable, dec!(356.66));
    }

    #[test]
    fn test_reference_schedule() {
        // 1000 at 10% over 5 installments from 2024-01-01
        let terms = compute_terms(dec!(1000), dec!(10));
        let schedule = generate_schedule(terms.total_payable, 5, date(2024, 1, 1)).unwrap();

        assert_eq!(schedule.len(), 5);
        for (i, inst) in schedule.iter().enumerate() {
            assert_eq!(inst.sequence, u32::try_from(i).unwrap() + 1);
            assert_eq!(inst.amount, dec!(220.00));
            assert_eq!(inst.balance, dec!(220.00));
        }
        assert_eq!(schedule[0].due_date, date(2024, 2, 1));
        assert_eq!(schedule[4].due_date, date(2024, 6, 1));
    }

    #[test]
    fn test_last_installment_absorbs_residue() {
        // 100 / 3 = 33.33, 33.33, 33.34
        let schedule = generate_schedule(dec!(100), 3, date(2024, 1, 1)).unwrap();
        assert_eq!(schedule[0].amount, dec!(33.33));
        assert_eq!(schedule[1].amount, dec!(33.33));
        assert_eq!(schedule[2].amount, dec!(33.34));

        let total: Decimal = schedule.iter().map(|i| i.amount).sum();
        assert_eq!(total, dec!(100.00));
    }

    #[test]
    fn test_due_dates_clamp_at_month_end() {
        // 2024-01-31 + 1 month = 2024-02-29 (leap year)
        let schedule = generate_schedule(dec!(300), 3, date(2024, 1, 31)).unwrap();
        assert_eq!(schedule[0].due_date, date(2024, 2, 29));
        assert_eq!(schedule[1].due_date, date(2024, 3, 31));
        assert_eq!(schedule[2].due_date, date(2024, 4, 30));
    }

    #[test]
    fn test_zero_count_rejected() {
        let result = generate_schedule(dec!(100), 0, date(2024, 1, 1));
        assert!(matches!(result, Err(LoanError::NoInstallments)));
    }

    #[test]
    fn test_single_installment() {
        let schedule = generate_schedule(dec!(250.55), 1, date(2024, 3, 15)).unwrap();
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[0].amount, dec!(250.55));
        assert_eq!(schedule[0].due_date, date(2024, 4, 15));
    }
}
