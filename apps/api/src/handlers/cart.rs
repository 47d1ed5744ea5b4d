use axum::Json;
use axum::extract::{Path, State};
use storekeep_domain::{ProductId, UserId};
use tower_sessions::Session;

use crate::auth::identity_from_session;
use crate::dto::{AddToCartRequest, CartFeedbackResponse, CartViewResponse};
use crate::error::ApiResult;
use crate::session_cart::SessionCartStore;
use crate::state::AppState;

pub async fn add_to_cart_handler(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<AddToCartRequest>,
) -> ApiResult<Json<CartFeedbackResponse>> {
    let store = SessionCartStore::new(session);
    let feedback = state
        .cart_service
        .add_item(&store, ProductId::new(request.product_id), request.quantity)
        .await?;

    Ok(Json(CartFeedbackResponse::from(feedback)))
}

/// Shows the cart together with the signed-in user's delivery details, when
/// there is a signed-in user to take them from.
pub async fn show_cart_handler(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<CartViewResponse>> {
    let identity = identity_from_session(&session).await?;
    let store = SessionCartStore::new(session);
    let cart = state.cart_service.show(&store).await?;

    let profile = match identity {
        Some(identity) => {
            state
                .user_directory
                .find_by_id(UserId::from_uuid(identity.user_id()))
                .await?
        }
        None => None,
    };

    Ok(Json(CartViewResponse::from_cart(&cart, profile.as_ref())))
}

pub async fn remove_from_cart_handler(
    State(state): State<AppState>,
    session: Session,
    Path(product_id): Path<i64>,
) -> ApiResult<Json<CartViewResponse>> {
    let store = SessionCartStore::new(session);
    let cart = state
        .cart_service
        .remove_item(&store, ProductId::new(product_id))
        .await?;

    Ok(Json(CartViewResponse::from_cart(&cart, None)))
}
