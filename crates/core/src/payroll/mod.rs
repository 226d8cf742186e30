//! Employee loan ledger.
//!
//! This module implements the payroll loan subsystem:
//! - Loan terms (interest and total payable) computation
//! - Amortization schedule generation with a fixed remainder policy
//! - Loan status state machine validation
//! - Error types for loan operations

pub mod error;
pub mod schedule;
pub mod service;
pub mod types;

#[cfg(test)]
mod schedule_props;

pub use error::LoanError;
pub use schedule::{compute_terms, generate_schedule};
pub use service::LoanService;
pub use types::{
    CreateLoanInput, LoanStatus, LoanTerms, PreparedLoan, ScheduledInstallment, UpdateLoanInput,
};
