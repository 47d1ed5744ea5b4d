use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use storekeep_application::{AuditEntryRecord, AuditLogRepository, NewAuditEntry};
use storekeep_core::{AppError, AppResult};
use storekeep_domain::{AuditAction, ProductId, UserId};

/// PostgreSQL-backed repository for the product audit trail.
#[derive(Clone)]
pub struct PostgresAuditLogRepository {
    pool: PgPool,
}

impl PostgresAuditLogRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AuditLogRow {
    id: i64,
    product_id: i64,
    product_name: String,
    action: String,
    details: String,
    action_date: DateTime<Utc>,
    user_id: Option<uuid::Uuid>,
    actor_email: Option<String>,
}

#[async_trait]
impl AuditLogRepository for PostgresAuditLogRepository {
    async fn append(&self, entry: NewAuditEntry) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO product_audit_log
                (product_id, product_name, action, details, user_id, action_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(entry.product_id.as_i64())
        .bind(&entry.product_name)
        .bind(entry.action.as_str())
        .bind(&entry.details)
        .bind(entry.user_id.map(|user_id| user_id.as_uuid()))
        .bind(entry.action_date)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Persistence(format!("failed to append audit entry: {error}"))
        })?;

        Ok(())
    }

    async fn list_all(&self) -> AppResult<Vec<AuditEntryRecord>> {
        let rows = sqlx::query_as::<_, AuditLogRow>(
            r#"
            SELECT
                l.id,
                l.product_id,
                l.product_name,
                l.action,
                l.details,
                l.action_date,
                l.user_id,
                u.email AS actor_email
            FROM product_audit_log l
            LEFT JOIN users u ON u.user_id = l.user_id
            ORDER BY l.action_date DESC, l.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Persistence(format!("failed to list audit entries: {error}"))
        })?;

        rows.into_iter()
            .map(|row| {
                let action = row.action.parse::<AuditAction>().map_err(|_| {
                    AppError::Internal(format!(
                        "stored audit entry {} has unknown action '{}'",
                        row.id, row.action
                    ))
                })?;

                Ok(AuditEntryRecord {
                    id: row.id,
                    product_id: ProductId::new(row.product_id),
                    product_name: row.product_name,
                    action,
                    details: row.details,
                    action_date: row.action_date,
                    user_id: row.user_id.map(UserId::from_uuid),
                    actor_email: row.actor_email,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests;
