use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{delete, get, post, put};
use storekeep_core::AppError;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::SessionManagerLayer;
use tower_sessions_sqlx_store::PostgresStore;

use crate::state::AppState;
use crate::{handlers, middleware};

pub fn build_router(
    app_state: AppState,
    frontend_url: &str,
    session_layer: SessionManagerLayer<PostgresStore>,
) -> Result<Router, AppError> {
    let public_routes = Router::new()
        .route("/api/health", get(handlers::health::health_handler))
        .route(
            "/api/storefront/products",
            get(handlers::storefront::list_products_handler),
        )
        .route("/api/session", post(handlers::session::sign_in_handler))
        .route(
            "/api/session/sign-out",
            post(handlers::session::sign_out_handler),
        )
        .route(
            "/api/cart",
            get(handlers::cart::show_cart_handler).post(handlers::cart::add_to_cart_handler),
        )
        .route(
            "/api/cart/{product_id}",
            delete(handlers::cart::remove_from_cart_handler),
        );

    let protected_routes = Router::new()
        .route(
            "/api/session/me",
            get(handlers::session::current_user_handler),
        )
        .route("/api/checkout", post(handlers::orders::checkout_handler))
        .route("/api/orders", get(handlers::orders::my_orders_handler))
        .route(
            "/api/profile",
            get(handlers::profile::profile_handler).put(handlers::profile::update_profile_handler),
        )
        .route(
            "/api/catalog/products",
            get(handlers::catalog::list_catalog_handler)
                .post(handlers::catalog::create_product_handler),
        )
        .route(
            "/api/catalog/products/{product_id}",
            get(handlers::catalog::get_product_handler)
                .put(handlers::catalog::update_product_handler)
                .delete(handlers::catalog::delete_product_handler),
        )
        .route(
            "/api/catalog/audit-log",
            get(handlers::audit::list_audit_log_handler),
        )
        .route(
            "/api/admin/customers",
            get(handlers::orders::customers_handler),
        )
        .route(
            "/api/admin/customers/{user_id}/orders",
            get(handlers::orders::customer_orders_handler),
        )
        .route(
            "/api/admin/orders/{order_id}/status",
            put(handlers::orders::update_order_status_handler),
        )
        .layer(from_fn(middleware::require_auth));

    let allowed_origin = frontend_url
        .parse::<HeaderValue>()
        .map_err(|error| AppError::Validation(format!("invalid FRONTEND_URL: {error}")))?;

    let cors = CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true);

    Ok(Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(session_layer)
        .with_state(app_state))
}
