use std::str::FromStr;

use async_trait::async_trait;
use sqlx::PgPool;

use storekeep_application::AccessPolicy;
use storekeep_core::{AppError, AppResult};
use storekeep_domain::{Permission, Role, UserId};

/// Policy oracle backed by the role assignments table.
///
/// Roles map to permissions statically; the oracle answers from whatever the
/// role store currently grants. Assignments with role names this build does
/// not know are ignored.
#[derive(Clone)]
pub struct PostgresAccessPolicy {
    pool: PgPool,
}

impl PostgresAccessPolicy {
    /// Creates a policy oracle with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccessPolicy for PostgresAccessPolicy {
    async fn has_permission(&self, user_id: UserId, permission: Permission) -> AppResult<bool> {
        let roles: Vec<(String,)> =
            sqlx::query_as("SELECT role FROM role_assignments WHERE user_id = $1")
                .bind(user_id.as_uuid())
                .fetch_all(&self.pool)
                .await
                .map_err(|error| {
                    AppError::Persistence(format!("failed to load role assignments: {error}"))
                })?;

        Ok(roles
            .into_iter()
            .filter_map(|(role,)| Role::from_str(&role).ok())
            .any(|role| role.permissions().contains(&permission)))
    }
}
