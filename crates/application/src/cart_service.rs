//! Session-scoped cart operations.
//!
//! The cart lives in the caller's session store; every operation here is one
//! read-modify-write against that store, completed within the request.

use std::sync::Arc;

use async_trait::async_trait;

use storekeep_core::{AppError, AppResult};
use storekeep_domain::{Cart, CartAddOutcome, CartLine, ProductId};

use crate::catalog_service::ProductRepository;

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// Port over the session-scoped cart storage.
///
/// Implementations are bound to one session; a missing cart loads as empty.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Loads the session's cart, or an empty cart when none was stored yet.
    async fn load(&self) -> AppResult<Cart>;

    /// Replaces the session's cart.
    async fn save(&self, cart: &Cart) -> AppResult<()>;

    /// Drops the session's cart entirely.
    async fn clear(&self) -> AppResult<()>;
}

/// Feedback returned to the caller after an add.
#[derive(Debug, Clone, PartialEq)]
pub struct CartFeedback {
    /// What happened structurally.
    pub outcome: CartAddOutcome,
    /// User-facing message describing it.
    pub message: String,
    /// The cart after the operation.
    pub cart: Cart,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Application service for the session cart.
#[derive(Clone)]
pub struct CartService {
    products: Arc<dyn ProductRepository>,
}

impl CartService {
    /// Creates a new cart service.
    #[must_use]
    pub fn new(products: Arc<dyn ProductRepository>) -> Self {
        Self { products }
    }

    /// Adds a product to the session's cart, merging into an existing line
    /// when the product is already there.
    ///
    /// The quantity must be positive and the product must exist in the
    /// catalog; on either failure the stored cart is left untouched. The
    /// line snapshots the product's current name, unit, and price.
    pub async fn add_item(
        &self,
        cart_store: &dyn CartStore,
        product_id: ProductId,
        quantity: f64,
    ) -> AppResult<CartFeedback> {
        if !quantity.is_finite() || quantity <= 0.0 {
            return Err(AppError::Validation(
                "requested quantity must be greater than zero".to_owned(),
            ));
        }

        let product = self
            .products
            .find_by_id(product_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("no product with id {product_id}")))?;

        let line = CartLine::from_product(&product, quantity)?;

        let mut cart = cart_store.load().await?;
        let outcome = cart.add(line);
        cart_store.save(&cart).await?;

        let message = match outcome {
            CartAddOutcome::MergedIntoExistingLine => {
                "item already in cart, new quantity merged into the existing line"
            }
            CartAddOutcome::AddedAlongsideExistingLines => {
                "new item added alongside the existing items"
            }
            CartAddOutcome::AddedToEmptyCart => "new item added to an empty cart",
        };

        Ok(CartFeedback {
            outcome,
            message: message.to_owned(),
            cart,
        })
    }

    /// Removes a product's line from the session's cart.
    ///
    /// A missing cart or line reports `NotFound` and changes nothing.
    pub async fn remove_item(
        &self,
        cart_store: &dyn CartStore,
        product_id: ProductId,
    ) -> AppResult<Cart> {
        let mut cart = cart_store.load().await?;

        if !cart.remove(product_id) {
            return Err(AppError::NotFound(format!(
                "cart has no line for product {product_id}"
            )));
        }

        cart_store.save(&cart).await?;
        Ok(cart)
    }

    /// Returns the session's cart for display.
    pub async fn show(&self, cart_store: &dyn CartStore) -> AppResult<Cart> {
        cart_store.load().await
    }
}
