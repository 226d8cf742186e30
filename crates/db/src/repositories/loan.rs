//! Loan repository for payroll loan operations.
//!
//! Terms and schedules are always derived server-side by the core payroll
//! engine from the loan type's rate; a client-supplied schedule is never
//! accepted. Header and installments persist inside one transaction.

use chrono::Utc;
use comercio_core::payroll::{self, LoanService, PreparedLoan};
use comercio_shared::error::AppError;
use comercio_shared::types::{EmployeeId, LoanId, LoanTypeId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{
    employees, loan_installments, loan_types, loans, sea_orm_active_enums::LoanStatus,
};

/// Error types for loan operations.
#[derive(Debug, thiserror::Error)]
pub enum LoanError {
    /// Payroll engine rejected the operation.
    #[error(transparent)]
    Payroll(#[from] payroll::LoanError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<LoanError> for AppError {
    fn from(err: LoanError) -> Self {
        match err {
            LoanError::Payroll(inner) => inner.into(),
            LoanError::Database(inner) => Self::Database(inner.to_string()),
        }
    }
}

/// Filter options for listing loans.
#[derive(Debug, Clone, Default)]
pub struct LoanFilter {
    /// Filter by employee.
    pub employee_id: Option<Uuid>,
    /// Filter by status.
    pub status: Option<LoanStatus>,
}

/// Loan header with its ordered installments.
#[derive(Debug, Clone)]
pub struct LoanWithInstallments {
    /// Loan header.
    pub loan: loans::Model,
    /// Installments ordered by sequence number.
    pub installments: Vec<loan_installments::Model>,
}

/// Loan repository for payroll loan CRUD plus annulment.
#[derive(Debug, Clone)]
pub struct LoanRepository {
    db: DatabaseConnection,
}

impl LoanRepository {
    /// Creates a new loan repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a loan: computes terms from the loan type's rate, persists
    /// the header, and bulk-inserts the generated schedule.
    ///
    /// # Errors
    ///
    /// Returns an error if the employee or loan type is missing, the
    /// financial inputs are invalid, or the database fails. Nothing is
    /// persisted on failure.
    pub async fn create_loan(
        &self,
        input: payroll::CreateLoanInput,
    ) -> Result<LoanWithInstallments, LoanError> {
        self.ensure_employee(input.employee_id).await?;
        let rate = self.loan_type_rate(input.loan_type_id).await?;

        let prepared = LoanService::prepare(
            input.principal,
            rate,
            input.installment_count,
            input.request_date,
        )?;

        let txn = self.db.begin().await?;

        let now = Utc::now().into();
        let loan = loans::ActiveModel {
            id: Set(Uuid::new_v4()),
            employee_id: Set(input.employee_id.into_inner()),
            loan_type_id: Set(input.loan_type_id.into_inner()),
            request_date: Set(input.request_date),
            principal: Set(input.principal),
            interest: Set(prepared.interest),
            total_payable: Set(prepared.total_payable),
            installment_count: Set(i32::try_from(input.installment_count).unwrap_or(i32::MAX)),
            balance: Set(prepared.balance),
            status: Set(LoanStatus::Pending),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let installments = Self::insert_schedule(&txn, loan.id, &prepared).await?;

        txn.commit().await?;
        tracing::info!(loan = %loan.id, total = %loan.total_payable, "loan created");

        Ok(LoanWithInstallments { loan, installments })
    }

    /// Updates a loan.
    ///
    /// While the loan is Pending the terms are recomputed and the schedule
    /// regenerated (delete-all plus bulk insert). Once repayment has started
    /// only the descriptive header fields (employee, request date) are
    /// applied; the financial fields and schedule stay frozen.
    ///
    /// # Errors
    ///
    /// Returns an error if the loan, employee, or loan type is missing, the
    /// financial inputs are invalid, or the database fails.
    pub async fn update_loan(
        &self,
        id: Uuid,
        input: payroll::UpdateLoanInput,
    ) -> Result<LoanWithInstallments, LoanError> {
        let existing = self.require_loan(id).await?;
        self.ensure_employee(input.employee_id).await?;

        let status: payroll::LoanStatus = existing.status.clone().into();
        if LoanService::validate_can_replace_schedule(status).is_ok() {
            let rate = self.loan_type_rate(input.loan_type_id).await?;
            let prepared = LoanService::prepare(
                input.principal,
                rate,
                input.installment_count,
                input.request_date,
            )?;

            let txn = self.db.begin().await?;

            let loan = loans::ActiveModel {
                id: Set(existing.id),
                employee_id: Set(input.employee_id.into_inner()),
                loan_type_id: Set(input.loan_type_id.into_inner()),
                request_date: Set(input.request_date),
                principal: Set(input.principal),
                interest: Set(prepared.interest),
                total_payable: Set(prepared.total_payable),
                installment_count: Set(i32::try_from(input.installment_count).unwrap_or(i32::MAX)),
                balance: Set(prepared.balance),
                updated_at: Set(Utc::now().into()),
                ..Default::default()
            }
            .update(&txn)
            .await?;

            loan_installments::Entity::delete_many()
                .filter(loan_installments::Column::LoanId.eq(existing.id))
                .exec(&txn)
                .await?;
            let installments = Self::insert_schedule(&txn, loan.id, &prepared).await?;

            txn.commit().await?;
            tracing::info!(loan = %id, "loan updated, schedule regenerated");

            Ok(LoanWithInstallments { loan, installments })
        } else {
            // Repayment has started: descriptive fields only, ledger frozen.
            let loan = loans::ActiveModel {
                id: Set(existing.id),
                employee_id: Set(input.employee_id.into_inner()),
                request_date: Set(input.request_date),
                updated_at: Set(Utc::now().into()),
                ..Default::default()
            }
            .update(&self.db)
            .await?;

            tracing::info!(loan = %id, "loan header updated, schedule untouched");

            let installments = self.installments_of(id).await?;
            Ok(LoanWithInstallments { loan, installments })
        }
    }

    /// Deletes a loan and its installments.
    ///
    /// # Errors
    ///
    /// Returns a conflict unless the loan is Pending or Annulled.
    pub async fn delete_loan(&self, id: Uuid) -> Result<(), LoanError> {
        let existing = self.require_loan(id).await?;
        LoanService::validate_can_delete(existing.status.clone().into())
            .map_err(LoanError::Payroll)?;

        let txn = self.db.begin().await?;
        loan_installments::Entity::delete_many()
            .filter(loan_installments::Column::LoanId.eq(existing.id))
            .exec(&txn)
            .await?;
        loans::Entity::delete_by_id(existing.id).exec(&txn).await?;
        txn.commit().await?;

        tracing::info!(loan = %id, "loan deleted");
        Ok(())
    }

    /// Annuls a Pending loan. No financial reversal occurs.
    ///
    /// # Errors
    ///
    /// Returns a conflict unless the loan is Pending.
    pub async fn annul_loan(&self, id: Uuid) -> Result<loans::Model, LoanError> {
        let existing = self.require_loan(id).await?;
        LoanService::validate_can_annul(existing.status.clone().into())
            .map_err(LoanError::Payroll)?;

        let loan = loans::ActiveModel {
            id: Set(existing.id),
            status: Set(LoanStatus::Annulled),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .update(&self.db)
        .await?;

        tracing::info!(loan = %id, "loan annulled");
        Ok(loan)
    }

    /// Fetches a loan with its installments.
    ///
    /// # Errors
    ///
    /// Returns `payroll::LoanError::LoanNotFound` if the loan is missing.
    pub async fn find_loan(&self, id: Uuid) -> Result<LoanWithInstallments, LoanError> {
        let loan = self.require_loan(id).await?;
        let installments = self.installments_of(id).await?;
        Ok(LoanWithInstallments { loan, installments })
    }

    /// Lists loans, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database fails.
    pub async fn list_loans(&self, filter: LoanFilter) -> Result<Vec<loans::Model>, LoanError> {
        let mut query = loans::Entity::find();
        if let Some(employee_id) = filter.employee_id {
            query = query.filter(loans::Column::EmployeeId.eq(employee_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(loans::Column::Status.eq(status));
        }
        let loans = query
            .order_by_desc(loans::Column::RequestDate)
            .all(&self.db)
            .await?;
        Ok(loans)
    }

    /// Loads the loan header or fails with `LoanNotFound`.
    async fn require_loan(&self, id: Uuid) -> Result<loans::Model, LoanError> {
        loans::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| payroll::LoanError::LoanNotFound(LoanId::from_uuid(id)).into())
    }

    /// Verifies the employee reference.
    async fn ensure_employee(&self, id: EmployeeId) -> Result<(), LoanError> {
        employees::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .map(|_| ())
            .ok_or_else(|| payroll::LoanError::EmployeeNotFound(id).into())
    }

    /// Reads the interest rate from the loan type.
    async fn loan_type_rate(&self, id: LoanTypeId) -> Result<rust_decimal::Decimal, LoanError> {
        let loan_type = loan_types::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(payroll::LoanError::LoanTypeNotFound(id))?;
        Ok(loan_type.rate)
    }

    async fn installments_of(
        &self,
        loan_id: Uuid,
    ) -> Result<Vec<loan_installments::Model>, LoanError> {
        let installments = loan_installments::Entity::find()
            .filter(loan_installments::Column::LoanId.eq(loan_id))
            .order_by_asc(loan_installments::Column::SequenceNo)
            .all(&self.db)
            .await?;
        Ok(installments)
    }

    /// Bulk-inserts a prepared schedule.
    ///
    /// Idempotent: if installments already exist for the loan, nothing is
    /// inserted and the existing rows are returned.
    async fn insert_schedule(
        txn: &DatabaseTransaction,
        loan_id: Uuid,
        prepared: &PreparedLoan,
    ) -> Result<Vec<loan_installments::Model>, LoanError> {
        let existing = loan_installments::Entity::find()
            .filter(loan_installments::Column::LoanId.eq(loan_id))
            .count(txn)
            .await?;
        if existing > 0 {
            tracing::debug!(loan = %loan_id, "schedule already present, skipping generation");
            let rows = loan_installments::Entity::find()
                .filter(loan_installments::Column::LoanId.eq(loan_id))
                .order_by_asc(loan_installments::Column::SequenceNo)
                .all(txn)
                .await?;
            return Ok(rows);
        }

        let now = Utc::now().into();
        let mut rows = Vec::with_capacity(prepared.installments.len());
        for installment in &prepared.installments {
            let model = loan_installments::ActiveModel {
                id: Set(Uuid::new_v4()),
                loan_id: Set(loan_id),
                sequence_no: Set(i32::try_from(installment.sequence).unwrap_or(i32::MAX)),
                due_date: Set(installment.due_date),
                amount: Set(installment.amount),
                balance: Set(installment.balance),
                created_at: Set(now),
            }
            .insert(txn)
            .await?;
            rows.push(model);
        }
        Ok(rows)
    }
}
