use axum::Json;
use axum::extract::{Extension, State};
use storekeep_application::ProfileUpdate;
use storekeep_core::UserIdentity;
use storekeep_domain::UserId;

use crate::dto::{ProfileResponse, UpdateProfileRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn profile_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<ProfileResponse>> {
    let profile = state
        .profile_service
        .profile(UserId::from_uuid(user.user_id()))
        .await?;

    Ok(Json(ProfileResponse::from(profile)))
}

pub async fn update_profile_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(request): Json<UpdateProfileRequest>,
) -> ApiResult<Json<ProfileResponse>> {
    let update = ProfileUpdate::new(request.display_name, request.cell_phone, request.country)?;
    let profile = state
        .profile_service
        .update(UserId::from_uuid(user.user_id()), update)
        .await?;

    Ok(Json(ProfileResponse::from(profile)))
}
