//! Policy oracle port consumed as a yes/no gate at service boundaries.

use async_trait::async_trait;

use storekeep_core::{AppError, AppResult, UserIdentity};
use storekeep_domain::{Permission, UserId};

/// Port for the external role/permission oracle.
///
/// This system never decides authorization itself; it asks the oracle
/// whether the acting user holds a permission and treats the answer as
/// final.
#[async_trait]
pub trait AccessPolicy: Send + Sync {
    /// Returns whether the user currently holds the permission.
    async fn has_permission(&self, user_id: UserId, permission: Permission) -> AppResult<bool>;
}

/// Fails with [`AppError::Forbidden`] unless the oracle grants `permission`
/// to the acting user.
pub async fn require_permission(
    policy: &dyn AccessPolicy,
    actor: &UserIdentity,
    permission: Permission,
) -> AppResult<()> {
    let user_id = UserId::from_uuid(actor.user_id());
    if policy.has_permission(user_id, permission).await? {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "missing permission '{}'",
            permission.as_str()
        )))
    }
}
