use chrono::{Duration, Utc};
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use storekeep_application::{AuditLogRepository, NewAuditEntry};
use storekeep_domain::{AuditAction, ProductId, UserId};

use super::PostgresAuditLogRepository;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for audit log tests: {error}");
    }

    Some(pool)
}

async fn ensure_user(pool: &PgPool, user_id: UserId) {
    let insert = sqlx::query(
        r#"
        INSERT INTO users (user_id, email, display_name)
        VALUES ($1, $2, 'Audit Tester')
        ON CONFLICT (user_id) DO NOTHING
        "#,
    )
    .bind(user_id.as_uuid())
    .bind(format!("audit-{}@example.com", user_id.as_uuid()))
    .execute(pool)
    .await;

    assert!(insert.is_ok());
}

fn entry(
    product_id: i64,
    name: &str,
    action: AuditAction,
    user_id: Option<UserId>,
    seconds_ago: i64,
) -> NewAuditEntry {
    NewAuditEntry {
        product_id: ProductId::new(product_id),
        product_name: name.to_owned(),
        action,
        details: format!("test entry for {name}"),
        user_id,
        action_date: Utc::now() - Duration::seconds(seconds_ago),
    }
}

#[tokio::test]
async fn entries_come_back_newest_first_with_the_actor_resolved() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresAuditLogRepository::new(pool.clone());
    let user_id = UserId::new();
    ensure_user(&pool, user_id).await;

    let product_id = 910_000 + i64::from(rand_marker());
    for (name, action, seconds_ago) in [
        ("Widget", AuditAction::Created, 60),
        ("Widget Pro", AuditAction::Updated, 0),
    ] {
        let appended = repository
            .append(entry(product_id, name, action, Some(user_id), seconds_ago))
            .await;
        assert!(appended.is_ok());
    }

    let records = repository.list_all().await;
    let Ok(records) = records else {
        panic!("listing failed");
    };
    let ours: Vec<_> = records
        .iter()
        .filter(|record| record.product_id == ProductId::new(product_id))
        .collect();

    assert_eq!(ours.len(), 2);
    assert_eq!(ours[0].product_name, "Widget Pro");
    assert_eq!(ours[0].action, AuditAction::Updated);
    assert_eq!(ours[1].product_name, "Widget");
    assert!(ours[0].action_date >= ours[1].action_date);
    assert!(ours[0].actor_email.is_some());
}

#[tokio::test]
async fn attribution_nulls_out_when_the_user_record_disappears() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresAuditLogRepository::new(pool.clone());
    let user_id = UserId::new();
    ensure_user(&pool, user_id).await;

    let product_id = 920_000 + i64::from(rand_marker());
    let appended = repository
        .append(entry(
            product_id,
            "Gadget",
            AuditAction::Deleted,
            Some(user_id),
            0,
        ))
        .await;
    assert!(appended.is_ok());

    let deleted = sqlx::query("DELETE FROM users WHERE user_id = $1")
        .bind(user_id.as_uuid())
        .execute(&pool)
        .await;
    assert!(deleted.is_ok());

    let records = repository.list_all().await;
    let Ok(records) = records else {
        panic!("listing failed");
    };
    let ours = records
        .iter()
        .find(|record| record.product_id == ProductId::new(product_id));

    let Some(ours) = ours else {
        panic!("entry vanished with its actor");
    };
    assert_eq!(ours.product_name, "Gadget");
    assert!(ours.user_id.is_none());
    assert!(ours.actor_email.is_none());
}

/// Small per-process marker to keep concurrent runs off each other's rows.
fn rand_marker() -> u16 {
    let uuid = uuid::Uuid::new_v4();
    (u16::from(uuid.as_bytes()[0]) << 8) | u16::from(uuid.as_bytes()[1])
}
