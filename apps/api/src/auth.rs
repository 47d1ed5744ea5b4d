use storekeep_core::{AppError, AppResult, UserIdentity};
use tower_sessions::Session;

/// Session key holding the signed-in user's identity.
pub const SESSION_USER_KEY: &str = "identity";

/// Reads the identity stored in the session, if any.
pub async fn identity_from_session(session: &Session) -> AppResult<Option<UserIdentity>> {
    session
        .get::<UserIdentity>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))
}

/// Stores the identity in the session.
pub async fn store_identity(session: &Session, identity: &UserIdentity) -> AppResult<()> {
    session
        .insert(SESSION_USER_KEY, identity)
        .await
        .map_err(|error| AppError::Internal(format!("failed to store session identity: {error}")))
}

/// Drops the identity from the session.
pub async fn clear_identity(session: &Session) -> AppResult<()> {
    session
        .remove::<UserIdentity>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to clear session identity: {error}")))
        .map(|_| ())
}
