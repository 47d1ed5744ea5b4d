//! Storekeep API composition root.

#![forbid(unsafe_code)]

mod api_router;
mod auth;
mod dev_seed;
mod dto;
mod error;
mod handlers;
mod middleware;
mod session_cart;
mod state;

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use storekeep_application::{
    AccessPolicy, AuditService, CartService, CatalogService, OrderService, ProfileService,
    UserDirectory,
};
use storekeep_core::AppError;
use storekeep_infrastructure::{
    PostgresAccessPolicy, PostgresAuditLogRepository, PostgresOrderRepository,
    PostgresProductRepository, PostgresUserDirectory,
};
use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;
use tracing::info;
use tracing_subscriber::EnvFilter;
use url::Url;

use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

    let database_url = required_env("DATABASE_URL")?;
    let frontend_url =
        env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());
    let frontend_origin = Url::parse(&frontend_url)
        .map_err(|error| AppError::Validation(format!("invalid FRONTEND_URL: {error}")))?
        .origin()
        .ascii_serialization();

    let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
    let api_port = env::var("API_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(3001);

    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .unwrap_or_else(|_| "false".to_owned())
        .eq_ignore_ascii_case("true");
    let run_dev_seed = env::var("DEV_SEED")
        .unwrap_or_else(|_| "false".to_owned())
        .eq_ignore_ascii_case("true");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    if migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    let session_store = PostgresStore::new(pool.clone())
        .with_table_name("tower_sessions")
        .map_err(|error| {
            AppError::Validation(format!("invalid session table name configuration: {error}"))
        })?;
    session_store.migrate().await.map_err(|error| {
        AppError::Internal(format!("failed to initialize session store: {error}"))
    })?;

    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(cookie_secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(Duration::minutes(30)));

    let product_repository = Arc::new(PostgresProductRepository::new(pool.clone()));
    let order_repository = Arc::new(PostgresOrderRepository::new(pool.clone()));
    let audit_log_repository = Arc::new(PostgresAuditLogRepository::new(pool.clone()));
    let user_directory: Arc<dyn UserDirectory> =
        Arc::new(PostgresUserDirectory::new(pool.clone()));
    let access_policy: Arc<dyn AccessPolicy> = Arc::new(PostgresAccessPolicy::new(pool.clone()));

    let audit_service = AuditService::new(audit_log_repository, Arc::clone(&access_policy));
    let catalog_service = CatalogService::new(
        product_repository.clone(),
        audit_service.clone(),
        Arc::clone(&access_policy),
    );
    let cart_service = CartService::new(product_repository);
    let order_service = OrderService::new(
        order_repository,
        Arc::clone(&user_directory),
        Arc::clone(&access_policy),
    );
    let profile_service = ProfileService::new(Arc::clone(&user_directory));

    if run_dev_seed {
        dev_seed::run(&pool).await?;
    }

    let app_state = AppState {
        catalog_service,
        cart_service,
        order_service,
        audit_service,
        profile_service,
        user_directory,
        frontend_url: frontend_origin.clone(),
    };

    let router = api_router::build_router(app_state, &frontend_origin, session_layer)?;

    let host = IpAddr::from_str(&api_host)
        .map_err(|error| AppError::Validation(format!("invalid API_HOST: {error}")))?;
    let address = SocketAddr::new(host, api_port);

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind {address}: {error}")))?;

    info!(%address, "storekeep api listening");

    axum::serve(listener, router)
        .await
        .map_err(|error| AppError::Internal(format!("server error: {error}")))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name)
        .map_err(|_| AppError::Validation(format!("environment variable {name} must be set")))
}
