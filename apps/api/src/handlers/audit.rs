use axum::Json;
use axum::extract::{Extension, State};
use storekeep_core::UserIdentity;

use crate::dto::AuditEntryResponse;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_audit_log_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<AuditEntryResponse>>> {
    let entries = state
        .audit_service
        .list_entries(&user)
        .await?
        .into_iter()
        .map(AuditEntryResponse::from)
        .collect();

    Ok(Json(entries))
}
