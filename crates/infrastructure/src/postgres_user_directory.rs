use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use storekeep_application::{ProfileUpdate, UserDirectory};
use storekeep_core::{AppError, AppResult};
use storekeep_domain::{UserId, UserProfile};

/// PostgreSQL-backed adapter over the identity store's user records.
#[derive(Clone)]
pub struct PostgresUserDirectory {
    pool: PgPool,
}

impl PostgresUserDirectory {
    /// Creates a directory with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    user_id: uuid::Uuid,
    email: String,
    display_name: String,
    cell_phone: Option<String>,
    country: Option<String>,
}

impl From<UserRow> for UserProfile {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::from_uuid(row.user_id),
            email: row.email,
            display_name: row.display_name,
            cell_phone: row.cell_phone,
            country: row.country,
        }
    }
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserProfile>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, email, display_name, cell_phone, country
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Persistence(format!("failed to load user: {error}")))?;

        Ok(row.map(UserProfile::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserProfile>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, email, display_name, cell_phone, country
            FROM users
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Persistence(format!("failed to load user: {error}")))?;

        Ok(row.map(UserProfile::from))
    }

    async fn update_profile(&self, user_id: UserId, update: &ProfileUpdate) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET display_name = $2, cell_phone = $3, country = $4
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(&update.display_name)
        .bind(&update.cell_phone)
        .bind(&update.country)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Persistence(format!("failed to update user profile: {error}"))
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("no user with id {user_id}")));
        }

        Ok(())
    }
}
