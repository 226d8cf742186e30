//! Database seeder for Comercio development and testing.
//!
//! Seeds a test user, catalog rows (brand, category, supplier, customer,
//! products), an employee, and loan types for local development.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use comercio_shared::AppConfig;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use comercio_db::entities::{
    brands, categories, customers, employees, loan_types, products, suppliers, users,
};

/// Test user ID (consistent for all seeds)
const TEST_USER_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Test brand ID
const TEST_BRAND_ID: &str = "00000000-0000-0000-0000-000000000002";
/// Test category ID
const TEST_CATEGORY_ID: &str = "00000000-0000-0000-0000-000000000003";
/// Test supplier ID
const TEST_SUPPLIER_ID: &str = "00000000-0000-0000-0000-000000000004";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = AppConfig::load().expect("configuration must be loadable (COMERCIO__DATABASE__URL)");

    tracing::info!("connecting to database");
    let db = comercio_db::connect(&config.database.url)
        .await
        .expect("failed to connect to database");

    seed_test_user(&db).await;
    seed_catalog(&db).await;
    seed_payroll(&db).await;

    tracing::info!("seeding complete");
}

fn test_user_id() -> Uuid {
    Uuid::parse_str(TEST_USER_ID).unwrap()
}

/// Seeds a test user for development.
async fn seed_test_user(db: &DatabaseConnection) {
    if users::Entity::find_by_id(test_user_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        tracing::info!("test user already exists, skipping");
        return;
    }

    let user = users::ActiveModel {
        id: Set(test_user_id()),
        email: Set("test@comercio.dev".to_string()),
        full_name: Set("Test User".to_string()),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    };

    match user.insert(db).await {
        Ok(_) => tracing::info!("created test user: test@comercio.dev"),
        Err(e) => tracing::error!("failed to insert test user: {e}"),
    }
}

/// Seeds the catalog: brand, category, supplier, customer, products.
async fn seed_catalog(db: &DatabaseConnection) {
    let brand_id = Uuid::parse_str(TEST_BRAND_ID).unwrap();
    let category_id = Uuid::parse_str(TEST_CATEGORY_ID).unwrap();
    let supplier_id = Uuid::parse_str(TEST_SUPPLIER_ID).unwrap();
    let now = Utc::now();

    if brands::Entity::find_by_id(brand_id)
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        tracing::info!("catalog already seeded, skipping");
        return;
    }

    let brand = brands::ActiveModel {
        id: Set(brand_id),
        name: Set("Genérica".to_string()),
        user_id: Set(test_user_id()),
        is_active: Set(true),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };
    if let Err(e) = brand.insert(db).await {
        tracing::error!("failed to insert brand: {e}");
        return;
    }

    let category = categories::ActiveModel {
        id: Set(category_id),
        name: Set("Abarrotes".to_string()),
        user_id: Set(test_user_id()),
        is_active: Set(true),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };
    if let Err(e) = category.insert(db).await {
        tracing::error!("failed to insert category: {e}");
    }

    let supplier = suppliers::ActiveModel {
        id: Set(supplier_id),
        name: Set("Distribuidora Norte".to_string()),
        tax_id: Set("0991234567001".to_string()),
        address: Set(Some("Av. Principal 123".to_string())),
        phone: Set(Some("0991234567".to_string())),
        user_id: Set(test_user_id()),
        is_active: Set(true),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };
    if let Err(e) = supplier.insert(db).await {
        tracing::error!("failed to insert supplier: {e}");
        return;
    }

    let customer = customers::ActiveModel {
        id: Set(Uuid::new_v4()),
        national_id: Set(Some("0910000001".to_string())),
        first_name: Set("MARIA".to_string()),
        last_name: Set("PEREZ".to_string()),
        address: Set(None),
        phone: Set(Some("0990000001".to_string())),
        email: Set(None),
        user_id: Set(test_user_id()),
        is_active: Set(true),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };
    if let Err(e) = customer.insert(db).await {
        tracing::error!("failed to insert customer: {e}");
    }

    for (description, cost, price, stock) in [
        ("Arroz 1kg", "0.90", "1.20", "100"),
        ("Azúcar 1kg", "0.80", "1.10", "100"),
        ("Aceite 1L", "2.10", "2.75", "50"),
    ] {
        let product = products::ActiveModel {
            id: Set(Uuid::new_v4()),
            description: Set(description.to_string()),
            cost: Set(cost.parse::<Decimal>().unwrap()),
            price: Set(price.parse::<Decimal>().unwrap()),
            stock: Set(stock.parse::<Decimal>().unwrap()),
            tax_rate: Set(Decimal::new(15, 0)),
            brand_id: Set(brand_id),
            supplier_id: Set(supplier_id),
            user_id: Set(test_user_id()),
            is_active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        match product.insert(db).await {
            Ok(_) => tracing::info!("created product: {description}"),
            Err(e) => tracing::error!("failed to insert product {description}: {e}"),
        }
    }
}

/// Seeds an employee and the standard loan types.
async fn seed_payroll(db: &DatabaseConnection) {
    let now = Utc::now();

    let existing = loan_types::Entity::find().one(db).await.ok().flatten();
    if existing.is_some() {
        tracing::info!("payroll already seeded, skipping");
        return;
    }

    let employee = employees::ActiveModel {
        id: Set(Uuid::new_v4()),
        full_name: Set("Juan Andrade".to_string()),
        salary: Set(Decimal::new(80_000, 2)),
        is_active: Set(true),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };
    if let Err(e) = employee.insert(db).await {
        tracing::error!("failed to insert employee: {e}");
    }

    for (name, rate_cents) in [("Quirografario", 1_000i64), ("Emergente", 500)] {
        let loan_type = loan_types::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            rate: Set(Decimal::new(rate_cents, 2)),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        match loan_type.insert(db).await {
            Ok(_) => tracing::info!("created loan type: {name}"),
            Err(e) => tracing::error!("failed to insert loan type {name}: {e}"),
        }
    }
}
