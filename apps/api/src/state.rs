use std::sync::Arc;

use storekeep_application::{
    AuditService, CartService, CatalogService, OrderService, ProfileService, UserDirectory,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub catalog_service: CatalogService,
    pub cart_service: CartService,
    pub order_service: OrderService,
    pub audit_service: AuditService,
    pub profile_service: ProfileService,
    pub user_directory: Arc<dyn UserDirectory>,
    pub frontend_url: String,
}
