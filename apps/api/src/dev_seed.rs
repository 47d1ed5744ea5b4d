//! Development-only seed data: two users, their roles, and a starter catalog.

use sqlx::PgPool;
use storekeep_core::{AppError, AppResult};
use tracing::info;
use uuid::Uuid;

const DEV_SEED_ADMIN_USER_ID: &str = "f0b9c9be-6de2-41ab-8c4e-cfb17ba54781";
const DEV_SEED_ADMIN_EMAIL: &str = "admin@storekeep.local";
const DEV_SEED_ADMIN_DISPLAY_NAME: &str = "Store Admin";

const DEV_SEED_CUSTOMER_USER_ID: &str = "3f1cb09e-9a43-44e5-93bc-5b30ab1f2b46";
const DEV_SEED_CUSTOMER_EMAIL: &str = "customer@storekeep.local";
const DEV_SEED_CUSTOMER_DISPLAY_NAME: &str = "Demo Customer";

pub async fn run(pool: &PgPool) -> AppResult<()> {
    let admin_id = parse_uuid_const(DEV_SEED_ADMIN_USER_ID, "DEV_SEED_ADMIN_USER_ID")?;
    let customer_id = parse_uuid_const(DEV_SEED_CUSTOMER_USER_ID, "DEV_SEED_CUSTOMER_USER_ID")?;

    ensure_user(pool, admin_id, DEV_SEED_ADMIN_EMAIL, DEV_SEED_ADMIN_DISPLAY_NAME).await?;
    ensure_user(
        pool,
        customer_id,
        DEV_SEED_CUSTOMER_EMAIL,
        DEV_SEED_CUSTOMER_DISPLAY_NAME,
    )
    .await?;

    ensure_role(pool, admin_id, "ADMIN").await?;
    ensure_role(pool, customer_id, "CUSTOMER").await?;

    seed_catalog_if_empty(pool).await?;

    info!(
        admin = DEV_SEED_ADMIN_EMAIL,
        customer = DEV_SEED_CUSTOMER_EMAIL,
        "dev seed applied"
    );
    Ok(())
}

fn parse_uuid_const(value: &str, name: &str) -> AppResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|error| AppError::Internal(format!("invalid {name} constant: {error}")))
}

async fn ensure_user(pool: &PgPool, user_id: Uuid, email: &str, display_name: &str) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO users (user_id, email, display_name, country)
        VALUES ($1, $2, $3, 'Bangladesh')
        ON CONFLICT (user_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(email)
    .bind(display_name)
    .execute(pool)
    .await
    .map_err(|error| AppError::Persistence(format!("failed to seed user {email}: {error}")))?;

    Ok(())
}

async fn ensure_role(pool: &PgPool, user_id: Uuid, role: &str) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO role_assignments (user_id, role)
        VALUES ($1, $2)
        ON CONFLICT (user_id, role) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(role)
    .execute(pool)
    .await
    .map_err(|error| AppError::Persistence(format!("failed to seed role {role}: {error}")))?;

    Ok(())
}

async fn seed_catalog_if_empty(pool: &PgPool) -> AppResult<()> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
        .fetch_one(pool)
        .await
        .map_err(|error| AppError::Persistence(format!("failed to count products: {error}")))?;

    if count > 0 {
        return Ok(());
    }

    let demo_products: &[(&str, &str, f64, f64)] = &[
        ("Basmati Rice", "kg", 3.2, 500.0),
        ("Red Lentils", "kg", 2.1, 300.0),
        ("Sunflower Oil", "litre", 4.8, 120.0),
        ("Whole Milk", "litre", 1.5, 80.0),
        ("Brown Bread", "piece", 2.5, 40.0),
        ("Free-range Eggs", "dozen", 3.9, 60.0),
        ("Green Tea", "box", 5.5, 25.0),
        ("Cane Sugar", "kg", 1.8, 200.0),
        ("Sea Salt", "kg", 0.9, 150.0),
        ("Black Pepper", "jar", 6.2, 35.0),
    ];

    for (name, unit, price, quantity) in demo_products {
        sqlx::query(
            r#"
            INSERT INTO products (name, unit, price, quantity)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(name)
        .bind(unit)
        .bind(price)
        .bind(quantity)
        .execute(pool)
        .await
        .map_err(|error| {
            AppError::Persistence(format!("failed to seed product {name}: {error}"))
        })?;
    }

    info!(count = demo_products.len(), "seeded demo catalog");
    Ok(())
}
