//! Initial database migration.
//!
//! Creates the catalog, payroll loan, and document tables with their enums,
//! constraints, and indexes.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: IDENTITY & CATALOG
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(BRANDS_SQL).await?;
        db.execute_unprepared(CATEGORIES_SQL).await?;
        db.execute_unprepared(SUPPLIERS_SQL).await?;
        db.execute_unprepared(CUSTOMERS_SQL).await?;
        db.execute_unprepared(PRODUCTS_SQL).await?;
        db.execute_unprepared(PRODUCT_CATEGORIES_SQL).await?;

        // ============================================================
        // PART 3: PAYROLL LOANS
        // ============================================================
        db.execute_unprepared(EMPLOYEES_SQL).await?;
        db.execute_unprepared(LOAN_TYPES_SQL).await?;
        db.execute_unprepared(LOANS_SQL).await?;
        db.execute_unprepared(LOAN_INSTALLMENTS_SQL).await?;

        // ============================================================
        // PART 4: DOCUMENTS
        // ============================================================
        db.execute_unprepared(INVOICES_SQL).await?;
        db.execute_unprepared(INVOICE_LINES_SQL).await?;
        db.execute_unprepared(PURCHASES_SQL).await?;
        db.execute_unprepared(PURCHASE_LINES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_SQL).await?;
        Ok(())
    }
}

const ENUMS_SQL: &str = r"
CREATE TYPE loan_status AS ENUM ('pending', 'paid', 'annulled');
CREATE TYPE payment_method AS ENUM ('cash', 'credit');
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    email VARCHAR(100) NOT NULL UNIQUE,
    full_name VARCHAR(200) NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const BRANDS_SQL: &str = r"
CREATE TABLE brands (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(100) NOT NULL,
    user_id UUID NOT NULL REFERENCES users(id),
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_brands_name ON brands(name);
";

const CATEGORIES_SQL: &str = r"
CREATE TABLE categories (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(100) NOT NULL,
    user_id UUID NOT NULL REFERENCES users(id),
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_categories_name ON categories(name);
";

const SUPPLIERS_SQL: &str = r"
CREATE TABLE suppliers (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(100) NOT NULL,
    tax_id VARCHAR(13) NOT NULL,
    address VARCHAR(200),
    phone VARCHAR(10),
    user_id UUID NOT NULL REFERENCES users(id),
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_suppliers_name ON suppliers(name);
";

const CUSTOMERS_SQL: &str = r"
CREATE TABLE customers (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    national_id VARCHAR(13) UNIQUE,
    first_name VARCHAR(50) NOT NULL,
    last_name VARCHAR(50) NOT NULL,
    address TEXT,
    phone VARCHAR(10),
    email VARCHAR(100),
    user_id UUID NOT NULL REFERENCES users(id),
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_customers_last_name ON customers(last_name);
";

const PRODUCTS_SQL: &str = r"
CREATE TABLE products (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    description VARCHAR(100) NOT NULL,
    cost NUMERIC(16,2) NOT NULL DEFAULT 0,
    price NUMERIC(16,2) NOT NULL DEFAULT 0,
    stock NUMERIC(12,2) NOT NULL DEFAULT 0,
    tax_rate NUMERIC(5,2) NOT NULL DEFAULT 0,
    brand_id UUID NOT NULL REFERENCES brands(id),
    supplier_id UUID NOT NULL REFERENCES suppliers(id),
    user_id UUID NOT NULL REFERENCES users(id),
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    -- Engines validate before writing; this is the schema-level backstop
    CONSTRAINT chk_products_stock_non_negative CHECK (stock >= 0)
);

CREATE INDEX idx_products_description ON products(description);
";

const PRODUCT_CATEGORIES_SQL: &str = r"
CREATE TABLE product_categories (
    product_id UUID NOT NULL REFERENCES products(id) ON DELETE CASCADE,
    category_id UUID NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
    PRIMARY KEY (product_id, category_id)
);
";

const EMPLOYEES_SQL: &str = r"
CREATE TABLE employees (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    full_name VARCHAR(100) NOT NULL,
    salary NUMERIC(10,2) NOT NULL DEFAULT 0,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const LOAN_TYPES_SQL: &str = r"
CREATE TABLE loan_types (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(100) NOT NULL,
    rate NUMERIC(5,2) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_loan_types_rate_non_negative CHECK (rate >= 0)
);
";

const LOANS_SQL: &str = r"
CREATE TABLE loans (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    employee_id UUID NOT NULL REFERENCES employees(id),
    loan_type_id UUID NOT NULL REFERENCES loan_types(id),
    request_date DATE NOT NULL,
    principal NUMERIC(16,2) NOT NULL,
    interest NUMERIC(16,2) NOT NULL,
    total_payable NUMERIC(16,2) NOT NULL,
    installment_count INTEGER NOT NULL,
    balance NUMERIC(16,2) NOT NULL,
    status loan_status NOT NULL DEFAULT 'pending',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_loans_principal_positive CHECK (principal > 0),
    CONSTRAINT chk_loans_installment_count_positive CHECK (installment_count > 0)
);

CREATE INDEX idx_loans_employee ON loans(employee_id);
CREATE INDEX idx_loans_status ON loans(status);
";

const LOAN_INSTALLMENTS_SQL: &str = r"
CREATE TABLE loan_installments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    loan_id UUID NOT NULL REFERENCES loans(id) ON DELETE CASCADE,
    sequence_no INTEGER NOT NULL,
    due_date DATE NOT NULL,
    amount NUMERIC(16,2) NOT NULL,
    balance NUMERIC(16,2) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_loan_installments_sequence UNIQUE (loan_id, sequence_no)
);

CREATE INDEX idx_loan_installments_loan ON loan_installments(loan_id, sequence_no);
";

const INVOICES_SQL: &str = r"
CREATE TABLE invoices (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    customer_id UUID NOT NULL REFERENCES customers(id),
    payment_method payment_method NOT NULL DEFAULT 'cash',
    issue_date TIMESTAMPTZ NOT NULL DEFAULT now(),
    subtotal NUMERIC(16,2) NOT NULL DEFAULT 0,
    tax NUMERIC(16,2) NOT NULL DEFAULT 0,
    total NUMERIC(16,2) NOT NULL DEFAULT 0,
    payment NUMERIC(16,2) NOT NULL DEFAULT 0,
    change NUMERIC(16,2) NOT NULL DEFAULT 0,
    user_id UUID NOT NULL REFERENCES users(id),
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_invoices_issue_date ON invoices(issue_date DESC);
CREATE INDEX idx_invoices_customer ON invoices(customer_id);
";

const INVOICE_LINES_SQL: &str = r"
CREATE TABLE invoice_lines (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    invoice_id UUID NOT NULL REFERENCES invoices(id) ON DELETE CASCADE,
    product_id UUID NOT NULL REFERENCES products(id),
    quantity NUMERIC(12,2) NOT NULL,
    unit_price NUMERIC(16,2) NOT NULL,
    unit_cost NUMERIC(16,2) NOT NULL DEFAULT 0,
    subtotal NUMERIC(16,2) NOT NULL,
    tax NUMERIC(16,2) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_invoice_lines_quantity_positive CHECK (quantity > 0)
);

CREATE INDEX idx_invoice_lines_invoice ON invoice_lines(invoice_id);
CREATE INDEX idx_invoice_lines_product ON invoice_lines(product_id);
";

const PURCHASES_SQL: &str = r"
CREATE TABLE purchases (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    reference_number VARCHAR(50),
    supplier_id UUID NOT NULL REFERENCES suppliers(id),
    issue_date TIMESTAMPTZ NOT NULL DEFAULT now(),
    subtotal NUMERIC(16,2) NOT NULL DEFAULT 0,
    tax NUMERIC(16,2) NOT NULL DEFAULT 0,
    total NUMERIC(16,2) NOT NULL DEFAULT 0,
    user_id UUID NOT NULL REFERENCES users(id),
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_purchases_issue_date ON purchases(issue_date DESC);
CREATE INDEX idx_purchases_supplier ON purchases(supplier_id);
";

const PURCHASE_LINES_SQL: &str = r"
CREATE TABLE purchase_lines (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    purchase_id UUID NOT NULL REFERENCES purchases(id) ON DELETE CASCADE,
    product_id UUID NOT NULL REFERENCES products(id),
    quantity NUMERIC(12,2) NOT NULL,
    unit_cost NUMERIC(16,2) NOT NULL,
    subtotal NUMERIC(16,2) NOT NULL,
    tax NUMERIC(16,2) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_purchase_lines_quantity_positive CHECK (quantity > 0)
);

CREATE INDEX idx_purchase_lines_purchase ON purchase_lines(purchase_id);
CREATE INDEX idx_purchase_lines_product ON purchase_lines(product_id);
";

const DROP_SQL: &str = r"
DROP TABLE IF EXISTS purchase_lines CASCADE;
DROP TABLE IF EXISTS purchases CASCADE;
DROP TABLE IF EXISTS invoice_lines CASCADE;
DROP TABLE IF EXISTS invoices CASCADE;
DROP TABLE IF EXISTS loan_installments CASCADE;
DROP TABLE IF EXISTS loans CASCADE;
DROP TABLE IF EXISTS loan_types CASCADE;
DROP TABLE IF EXISTS employees CASCADE;
DROP TABLE IF EXISTS product_categories CASCADE;
DROP TABLE IF EXISTS products CASCADE;
DROP TABLE IF EXISTS customers CASCADE;
DROP TABLE IF EXISTS suppliers CASCADE;
DROP TABLE IF EXISTS categories CASCADE;
DROP TABLE IF EXISTS brands CASCADE;
DROP TABLE IF EXISTS users CASCADE;
DROP TYPE IF EXISTS payment_method;
DROP TYPE IF EXISTS loan_status;
";
