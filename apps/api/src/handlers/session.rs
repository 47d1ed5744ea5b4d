use axum::Json;
use axum::extract::{Extension, State};
use storekeep_core::{AppError, UserIdentity};
use tower_sessions::Session;

use crate::auth::{clear_identity, store_identity};
use crate::dto::{GenericMessageResponse, SignInRequest, UserIdentityResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// Resolves a directory user by email and binds it to the session.
///
/// Credential verification belongs to the external identity provider; this
/// endpoint only maps an already-trusted request onto an acting user id.
pub async fn sign_in_handler(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<SignInRequest>,
) -> ApiResult<Json<UserIdentityResponse>> {
    let profile = state
        .user_directory
        .find_by_email(request.email.trim())
        .await?
        .ok_or_else(|| AppError::Unauthorized("no account for that email".to_owned()))?;

    let identity = UserIdentity::new(
        profile.id.as_uuid(),
        profile.display_name,
        Some(profile.email),
    );

    session.cycle_id().await.map_err(|error| {
        AppError::Internal(format!("failed to rotate session id: {error}"))
    })?;
    store_identity(&session, &identity).await?;

    Ok(Json(UserIdentityResponse::from(identity)))
}

pub async fn sign_out_handler(session: Session) -> ApiResult<Json<GenericMessageResponse>> {
    clear_identity(&session).await?;

    Ok(Json(GenericMessageResponse {
        message: "signed out".to_owned(),
    }))
}

pub async fn current_user_handler(
    Extension(user): Extension<UserIdentity>,
) -> Json<UserIdentityResponse> {
    Json(UserIdentityResponse::from(user))
}
