//! Checkout and order management.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use storekeep_core::{AppError, AppResult, UserIdentity};
use storekeep_domain::{NewOrder, OrderId, OrderStatus, Permission, ProductId, UserId};

use crate::cart_service::CartStore;
use crate::security_ports::{AccessPolicy, require_permission};
use crate::user_directory::UserDirectory;

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// One item of a stored order, with the product name resolved for display
/// when the product still exists.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItemRecord {
    /// Product the item refers to.
    pub product_id: ProductId,
    /// Current product name, if the product still exists.
    pub product_name: Option<String>,
    /// Quantity ordered.
    pub quantity: f64,
    /// Unit price captured at order time.
    pub price: f64,
}

/// A stored order with its items.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    /// Store-assigned identifier.
    pub id: OrderId,
    /// Owner of the order.
    pub user_id: UserId,
    /// Creation timestamp.
    pub order_date: DateTime<Utc>,
    /// Current lifecycle status.
    pub status: OrderStatus,
    /// Items in original cart order.
    pub items: Vec<OrderItemRecord>,
}

/// A customer who has placed at least one order.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerOrders {
    /// The customer.
    pub user_id: UserId,
    /// Customer email for display.
    pub email: String,
    /// Customer display name.
    pub display_name: String,
    /// Their most recent order.
    pub latest_order_id: OrderId,
}

/// Repository port for order persistence.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persists an order and all of its items atomically. Either the whole
    /// order appears or nothing does.
    async fn create(&self, order: &NewOrder) -> AppResult<OrderId>;

    /// Returns a user's orders, newest first, each with its items.
    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<OrderRecord>>;

    /// Updates an order's status. Fails with `NotFound` when the order does
    /// not exist.
    async fn update_status(&self, order_id: OrderId, status: OrderStatus) -> AppResult<()>;

    /// Returns customers that have orders, most recent order first.
    async fn customers_with_orders(&self) -> AppResult<Vec<CustomerOrders>>;
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Application service for checkout and order administration.
#[derive(Clone)]
pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    users: Arc<dyn UserDirectory>,
    policy: Arc<dyn AccessPolicy>,
}

impl OrderService {
    /// Creates a new order service.
    #[must_use]
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        users: Arc<dyn UserDirectory>,
        policy: Arc<dyn AccessPolicy>,
    ) -> Self {
        Self {
            orders,
            users,
            policy,
        }
    }

    /// Converts the session's cart into a persisted pending order.
    ///
    /// Fails with `EmptyCart` when there is nothing to order and with
    /// `Unauthorized` when the acting user is not a known identity; neither
    /// failure touches the cart. The order and its items are persisted in
    /// one transaction, and only after that succeeds is the cart cleared —
    /// a persistence failure leaves the cart exactly as it was.
    pub async fn checkout(&self, cart_store: &dyn CartStore, user_id: UserId) -> AppResult<OrderId> {
        let cart = cart_store.load().await?;
        if cart.is_empty() {
            return Err(AppError::EmptyCart);
        }

        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(AppError::Unauthorized(
                "acting user is not a known identity".to_owned(),
            ));
        }

        let order = NewOrder::from_cart(user_id, &cart, Utc::now())?;
        let order_id = self.orders.create(&order).await?;

        cart_store.clear().await?;
        Ok(order_id)
    }

    /// Returns the acting user's own orders, newest first.
    pub async fn my_orders(&self, actor: &UserIdentity) -> AppResult<Vec<OrderRecord>> {
        self.orders
            .list_for_user(UserId::from_uuid(actor.user_id()))
            .await
    }

    /// Returns another user's orders for the administrative view.
    pub async fn orders_for_customer(
        &self,
        actor: &UserIdentity,
        user_id: UserId,
    ) -> AppResult<Vec<OrderRecord>> {
        require_permission(self.policy.as_ref(), actor, Permission::ManageOrders).await?;

        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(AppError::NotFound(format!("no user with id {user_id}")));
        }

        self.orders.list_for_user(user_id).await
    }

    /// Returns all customers with orders, most recently ordering first.
    pub async fn customers(&self, actor: &UserIdentity) -> AppResult<Vec<CustomerOrders>> {
        require_permission(self.policy.as_ref(), actor, Permission::ManageOrders).await?;
        self.orders.customers_with_orders().await
    }

    /// Moves an order to a new lifecycle status.
    pub async fn update_status(
        &self,
        actor: &UserIdentity,
        order_id: OrderId,
        status: OrderStatus,
    ) -> AppResult<()> {
        require_permission(self.policy.as_ref(), actor, Permission::ManageOrders).await?;
        self.orders.update_status(order_id, status).await
    }
}
