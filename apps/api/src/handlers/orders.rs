use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Path, State};
use storekeep_core::UserIdentity;
use storekeep_domain::{OrderId, OrderStatus, UserId};
use tower_sessions::Session;
use uuid::Uuid;

use crate::dto::{
    CheckoutResponse, CustomerOrdersResponse, GenericMessageResponse, OrderResponse,
    UpdateOrderStatusRequest,
};
use crate::error::ApiResult;
use crate::session_cart::SessionCartStore;
use crate::state::AppState;

pub async fn checkout_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    session: Session,
) -> ApiResult<Json<CheckoutResponse>> {
    let store = SessionCartStore::new(session);
    let order_id = state
        .order_service
        .checkout(&store, UserId::from_uuid(user.user_id()))
        .await?;

    Ok(Json(CheckoutResponse {
        order_id: order_id.as_i64(),
        message: "order placed successfully".to_owned(),
    }))
}

pub async fn my_orders_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<OrderResponse>>> {
    let orders = state
        .order_service
        .my_orders(&user)
        .await?
        .into_iter()
        .map(OrderResponse::from)
        .collect();

    Ok(Json(orders))
}

pub async fn customers_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<CustomerOrdersResponse>>> {
    let customers = state
        .order_service
        .customers(&user)
        .await?
        .into_iter()
        .map(CustomerOrdersResponse::from)
        .collect();

    Ok(Json(customers))
}

pub async fn customer_orders_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<Vec<OrderResponse>>> {
    let orders = state
        .order_service
        .orders_for_customer(&user, UserId::from_uuid(user_id))
        .await?
        .into_iter()
        .map(OrderResponse::from)
        .collect();

    Ok(Json(orders))
}

pub async fn update_order_status_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(order_id): Path<i64>,
    Json(request): Json<UpdateOrderStatusRequest>,
) -> ApiResult<Json<GenericMessageResponse>> {
    let status = OrderStatus::from_str(request.status.as_str())?;
    state
        .order_service
        .update_status(&user, OrderId::new(order_id), status)
        .await?;

    Ok(Json(GenericMessageResponse {
        message: "order status updated".to_owned(),
    }))
}
