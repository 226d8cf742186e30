//! Catalog repository for passive reference data.
//!
//! Brands, categories, suppliers, customers, employees, and loan types are
//! plain rows referenced by the engines. Lists take an explicit
//! `include_inactive` flag; there is no hidden active-only default.

use chrono::Utc;
use comercio_core::catalog::SearchTerm;
use comercio_shared::error::AppError;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::search::substring_condition;
use crate::entities::{brands, categories, customers, employees, loan_types, suppliers};

/// Error types for catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Brand not found.
    #[error("Brand not found: {0}")]
    BrandNotFound(Uuid),

    /// Category not found.
    #[error("Category not found: {0}")]
    CategoryNotFound(Uuid),

    /// Supplier not found.
    #[error("Supplier not found: {0}")]
    SupplierNotFound(Uuid),

    /// Customer not found.
    #[error("Customer not found: {0}")]
    CustomerNotFound(Uuid),

    /// Employee not found.
    #[error("Employee not found: {0}")]
    EmployeeNotFound(Uuid),

    /// Loan type not found.
    #[error("Loan type not found: {0}")]
    LoanTypeNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::BrandNotFound(_)
            | CatalogError::CategoryNotFound(_)
            | CatalogError::SupplierNotFound(_)
            | CatalogError::CustomerNotFound(_)
            | CatalogError::EmployeeNotFound(_)
            | CatalogError::LoanTypeNotFound(_) => Self::NotFound(err.to_string()),
            CatalogError::Database(inner) => Self::Database(inner.to_string()),
        }
    }
}

/// Common list options for catalog entities.
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    /// Include deactivated rows.
    pub include_inactive: bool,
    /// Substring search over the entity's display fields.
    pub search: Option<SearchTerm>,
}

/// Input for creating a supplier.
#[derive(Debug, Clone)]
pub struct CreateSupplierInput {
    /// Supplier name.
    pub name: String,
    /// Tax identifier.
    pub tax_id: String,
    /// Street address.
    pub address: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// The acting user.
    pub created_by: Uuid,
}

/// Input for updating a supplier.
#[derive(Debug, Clone)]
pub struct UpdateSupplierInput {
    /// Supplier name.
    pub name: String,
    /// Tax identifier.
    pub tax_id: String,
    /// Street address.
    pub address: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
}

/// Input for creating a customer.
#[derive(Debug, Clone)]
pub struct CreateCustomerInput {
    /// National identifier, if known.
    pub national_id: Option<String>,
    /// Given names.
    pub first_name: String,
    /// Family names.
    pub last_name: String,
    /// Street address.
    pub address: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// The acting user.
    pub created_by: Uuid,
}

/// Input for updating a customer.
#[derive(Debug, Clone)]
pub struct UpdateCustomerInput {
    /// National identifier, if known.
    pub national_id: Option<String>,
    /// Given names.
    pub first_name: String,
    /// Family names.
    pub last_name: String,
    /// Street address.
    pub address: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Contact email.
    pub email: Option<String>,
}

/// Catalog repository for reference-data CRUD.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    db: DatabaseConnection,
}

impl CatalogRepository {
    /// Creates a new catalog repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    // ========== Brands ==========

    /// Creates a brand.
    ///
    /// # Errors
    ///
    /// Returns an error if the database fails.
    pub async fn create_brand(
        &self,
        name: String,
        created_by: Uuid,
    ) -> Result<brands::Model, CatalogError> {
        let now = Utc::now().into();
        let brand = brands::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            user_id: Set(created_by),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;
        Ok(brand)
    }

    /// Renames a brand.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::BrandNotFound` if missing.
    pub async fn update_brand(&self, id: Uuid, name: String) -> Result<brands::Model, CatalogError> {
        let existing = self.find_brand(id).await?;
        let brand = brands::ActiveModel {
            id: Set(existing.id),
            name: Set(name),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .update(&self.db)
        .await?;
        Ok(brand)
    }

    /// Deactivates a brand. Rows are never deleted.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::BrandNotFound` if missing.
    pub async fn deactivate_brand(&self, id: Uuid) -> Result<brands::Model, CatalogError> {
        let existing = self.find_brand(id).await?;
        let brand = brands::ActiveModel {
            id: Set(existing.id),
            is_active: Set(false),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .update(&self.db)
        .await?;
        Ok(brand)
    }

    /// Fetches a brand.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::BrandNotFound` if missing.
    pub async fn find_brand(&self, id: Uuid) -> Result<brands::Model, CatalogError> {
        brands::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CatalogError::BrandNotFound(id))
    }

    /// Lists brands ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database fails.
    pub async fn list_brands(
        &self,
        filter: CatalogFilter,
    ) -> Result<Vec<brands::Model>, CatalogError> {
        let mut query = brands::Entity::find();
        if !filter.include_inactive {
            query = query.filter(brands::Column::IsActive.eq(true));
        }
        if let Some(term) = &filter.search {
            query = query.filter(substring_condition(&[brands::Column::Name], term));
        }
        Ok(query.order_by_asc(brands::Column::Name).all(&self.db).await?)
    }

    // ========== Categories ==========

    /// Creates a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the database fails.
    pub async fn create_category(
        &self,
        name: String,
        created_by: Uuid,
    ) -> Result<categories::Model, CatalogError> {
        let now = Utc::now().into();
        let category = categories::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            user_id: Set(created_by),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;
        Ok(category)
    }

    /// Renames a category.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::CategoryNotFound` if missing.
    pub async fn update_category(
        &self,
        id: Uuid,
        name: String,
    ) -> Result<categories::Model, CatalogError> {
        let existing = self.find_category(id).await?;
        let category = categories::ActiveModel {
            id: Set(existing.id),
            name: Set(name),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .update(&self.db)
        .await?;
        Ok(category)
    }

    /// Deactivates a category. Rows are never deleted.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::CategoryNotFound` if missing.
    pub async fn deactivate_category(&self, id: Uuid) -> Result<categories::Model, CatalogError> {
        let existing = self.find_category(id).await?;
        let category = categories::ActiveModel {
            id: Set(existing.id),
            is_active: Set(false),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .update(&self.db)
        .await?;
        Ok(category)
    }

    /// Fetches a category.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::CategoryNotFound` if missing.
    pub async fn find_category(&self, id: Uuid) -> Result<categories::Model, CatalogError> {
        categories::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CatalogError::CategoryNotFound(id))
    }

    /// Lists categories ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database fails.
    pub async fn list_categories(
        &self,
        filter: CatalogFilter,
    ) -> Result<Vec<categories::Model>, CatalogError> {
        let mut query = categories::Entity::find();
        if !filter.include_inactive {
            query = query.filter(categories::Column::IsActive.eq(true));
        }
        if let Some(term) = &filter.search {
            query = query.filter(substring_condition(&[categories::Column::Name], term));
        }
        Ok(query
            .order_by_asc(categories::Column::Name)
            .all(&self.db)
            .await?)
    }

    // ========== Suppliers ==========

    /// Creates a supplier.
    ///
    /// # Errors
    ///
    /// Returns an error if the database fails.
    pub async fn create_supplier(
        &self,
        input: CreateSupplierInput,
    ) -> Result<suppliers::Model, CatalogError> {
        let now = Utc::now().into();
        let supplier = suppliers::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            tax_id: Set(input.tax_id),
            address: Set(input.address),
            phone: Set(input.phone),
            user_id: Set(input.created_by),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;
        Ok(supplier)
    }

    /// Fetches a supplier.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::SupplierNotFound` if missing.
    pub async fn find_supplier(&self, id: Uuid) -> Result<suppliers::Model, CatalogError> {
        suppliers::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CatalogError::SupplierNotFound(id))
    }

    /// Updates a supplier's contact fields.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::SupplierNotFound` if missing.
    pub async fn update_supplier(
        &self,
        id: Uuid,
        input: UpdateSupplierInput,
    ) -> Result<suppliers::Model, CatalogError> {
        let existing = self.find_supplier(id).await?;
        let supplier = suppliers::ActiveModel {
            id: Set(existing.id),
            name: Set(input.name),
            tax_id: Set(input.tax_id),
            address: Set(input.address),
            phone: Set(input.phone),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .update(&self.db)
        .await?;
        Ok(supplier)
    }

    /// Deactivates a supplier. Rows are never deleted.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::SupplierNotFound` if missing.
    pub async fn deactivate_supplier(&self, id: Uuid) -> Result<suppliers::Model, CatalogError> {
        let existing = self.find_supplier(id).await?;
        let supplier = suppliers::ActiveModel {
            id: Set(existing.id),
            is_active: Set(false),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .update(&self.db)
        .await?;
        Ok(supplier)
    }

    /// Lists suppliers ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database fails.
    pub async fn list_suppliers(
        &self,
        filter: CatalogFilter,
    ) -> Result<Vec<suppliers::Model>, CatalogError> {
        let mut query = suppliers::Entity::find();
        if !filter.include_inactive {
            query = query.filter(suppliers::Column::IsActive.eq(true));
        }
        if let Some(term) = &filter.search {
            query = query.filter(substring_condition(
                &[suppliers::Column::Name, suppliers::Column::TaxId],
                term,
            ));
        }
        Ok(query
            .order_by_asc(suppliers::Column::Name)
            .all(&self.db)
            .await?)
    }

    // ========== Customers ==========

    /// Creates a customer. Names are stored upper-cased.
    ///
    /// # Errors
    ///
    /// Returns an error if the database fails.
    pub async fn create_customer(
        &self,
        input: CreateCustomerInput,
    ) -> Result<customers::Model, CatalogError> {
        let now = Utc::now().into();
        let customer = customers::ActiveModel {
            id: Set(Uuid::new_v4()),
            national_id: Set(input.national_id),
            first_name: Set(input.first_name.to_uppercase()),
            last_name: Set(input.last_name.to_uppercase()),
            address: Set(input.address),
            phone: Set(input.phone),
            email: Set(input.email),
            user_id: Set(input.created_by),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;
        Ok(customer)
    }

    /// Fetches a customer.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::CustomerNotFound` if missing.
    pub async fn find_customer(&self, id: Uuid) -> Result<customers::Model, CatalogError> {
        customers::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CatalogError::CustomerNotFound(id))
    }

    /// Updates a customer. Names are stored upper-cased.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::CustomerNotFound` if missing.
    pub async fn update_customer(
        &self,
        id: Uuid,
        input: UpdateCustomerInput,
    ) -> Result<customers::Model, CatalogError> {
        let existing = self.find_customer(id).await?;
        let customer = customers::ActiveModel {
            id: Set(existing.id),
            national_id: Set(input.national_id),
            first_name: Set(input.first_name.to_uppercase()),
            last_name: Set(input.last_name.to_uppercase()),
            address: Set(input.address),
            phone: Set(input.phone),
            email: Set(input.email),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .update(&self.db)
        .await?;
        Ok(customer)
    }

    /// Deactivates a customer. Rows are never deleted.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::CustomerNotFound` if missing.
    pub async fn deactivate_customer(&self, id: Uuid) -> Result<customers::Model, CatalogError> {
        let existing = self.find_customer(id).await?;
        let customer = customers::ActiveModel {
            id: Set(existing.id),
            is_active: Set(false),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .update(&self.db)
        .await?;
        Ok(customer)
    }

    /// Lists customers ordered by last name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database fails.
    pub async fn list_customers(
        &self,
        filter: CatalogFilter,
    ) -> Result<Vec<customers::Model>, CatalogError> {
        let mut query = customers::Entity::find();
        if !filter.include_inactive {
            query = query.filter(customers::Column::IsActive.eq(true));
        }
        if let Some(term) = &filter.search {
            query = query.filter(substring_condition(
                &[
                    customers::Column::LastName,
                    customers::Column::FirstName,
                    customers::Column::NationalId,
                ],
                term,
            ));
        }
        Ok(query
            .order_by_asc(customers::Column::LastName)
            .all(&self.db)
            .await?)
    }

    // ========== Employees ==========

    /// Creates an employee.
    ///
    /// # Errors
    ///
    /// Returns an error if the database fails.
    pub async fn create_employee(
        &self,
        full_name: String,
        salary: rust_decimal::Decimal,
    ) -> Result<employees::Model, CatalogError> {
        let now = Utc::now().into();
        let employee = employees::ActiveModel {
            id: Set(Uuid::new_v4()),
            full_name: Set(full_name),
            salary: Set(salary),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;
        Ok(employee)
    }

    /// Updates an employee's name and salary.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::EmployeeNotFound` if missing.
    pub async fn update_employee(
        &self,
        id: Uuid,
        full_name: String,
        salary: rust_decimal::Decimal,
    ) -> Result<employees::Model, CatalogError> {
        let existing = self.find_employee(id).await?;
        let employee = employees::ActiveModel {
            id: Set(existing.id),
            full_name: Set(full_name),
            salary: Set(salary),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .update(&self.db)
        .await?;
        Ok(employee)
    }

    /// Deactivates an employee. Rows are never deleted.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::EmployeeNotFound` if missing.
    pub async fn deactivate_employee(&self, id: Uuid) -> Result<employees::Model, CatalogError> {
        let existing = self.find_employee(id).await?;
        let employee = employees::ActiveModel {
            id: Set(existing.id),
            is_active: Set(false),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .update(&self.db)
        .await?;
        Ok(employee)
    }

    /// Fetches an employee.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::EmployeeNotFound` if missing.
    pub async fn find_employee(&self, id: Uuid) -> Result<employees::Model, CatalogError> {
        employees::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CatalogError::EmployeeNotFound(id))
    }

    /// Lists employees ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database fails.
    pub async fn list_employees(
        &self,
        filter: CatalogFilter,
    ) -> Result<Vec<employees::Model>, CatalogError> {
        let mut query = employees::Entity::find();
        if !filter.include_inactive {
            query = query.filter(employees::Column::IsActive.eq(true));
        }
        if let Some(term) = &filter.search {
            query = query.filter(substring_condition(&[employees::Column::FullName], term));
        }
        Ok(query
            .order_by_asc(employees::Column::FullName)
            .all(&self.db)
            .await?)
    }

    // ========== Loan types ==========

    /// Creates a loan type.
    ///
    /// # Errors
    ///
    /// Returns an error if the database fails.
    pub async fn create_loan_type(
        &self,
        name: String,
        rate: rust_decimal::Decimal,
    ) -> Result<loan_types::Model, CatalogError> {
        let now = Utc::now().into();
        let loan_type = loan_types::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            rate: Set(rate),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;
        Ok(loan_type)
    }

    /// Updates a loan type's name and rate.
    ///
    /// Existing loans keep the terms they were created with; the new rate
    /// only applies to loans created afterwards.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::LoanTypeNotFound` if missing.
    pub async fn update_loan_type(
        &self,
        id: Uuid,
        name: String,
        rate: rust_decimal::Decimal,
    ) -> Result<loan_types::Model, CatalogError> {
        let existing = self.find_loan_type(id).await?;
        let loan_type = loan_types::ActiveModel {
            id: Set(existing.id),
            name: Set(name),
            rate: Set(rate),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .update(&self.db)
        .await?;
        Ok(loan_type)
    }

    /// Fetches a loan type.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::LoanTypeNotFound` if missing.
    pub async fn find_loan_type(&self, id: Uuid) -> Result<loan_types::Model, CatalogError> {
        loan_types::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CatalogError::LoanTypeNotFound(id))
    }

    /// Lists loan types ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database fails.
    pub async fn list_loan_types(&self) -> Result<Vec<loan_types::Model>, CatalogError> {
        Ok(loan_types::Entity::find()
            .order_by_asc(loan_types::Column::Name)
            .all(&self.db)
            .await?)
    }
}
