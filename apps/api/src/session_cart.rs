//! Cart storage bound to the caller's session.

use async_trait::async_trait;
use storekeep_application::CartStore;
use storekeep_core::{AppError, AppResult};
use storekeep_domain::Cart;
use tower_sessions::Session;

/// Session key holding the serialized cart.
pub const SESSION_CART_KEY: &str = "cart";

/// [`CartStore`] adapter over the request's session.
///
/// Each instance is scoped to one session, so the load-modify-save sequence
/// a service runs against it stays within a single request.
pub struct SessionCartStore {
    session: Session,
}

impl SessionCartStore {
    /// Wraps the request's session.
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self { session }
    }
}

#[async_trait]
impl CartStore for SessionCartStore {
    async fn load(&self) -> AppResult<Cart> {
        let cart = self
            .session
            .get::<Cart>(SESSION_CART_KEY)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to read session cart: {error}"))
            })?;

        Ok(cart.unwrap_or_default())
    }

    async fn save(&self, cart: &Cart) -> AppResult<()> {
        self.session
            .insert(SESSION_CART_KEY, cart)
            .await
            .map_err(|error| AppError::Internal(format!("failed to store session cart: {error}")))
    }

    async fn clear(&self) -> AppResult<()> {
        self.session
            .remove::<Cart>(SESSION_CART_KEY)
            .await
            .map_err(|error| AppError::Internal(format!("failed to clear session cart: {error}")))
            .map(|_| ())
    }
}
