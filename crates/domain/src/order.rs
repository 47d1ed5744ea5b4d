//! Orders produced by checkout and their lifecycle status.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storekeep_core::{AppError, AppResult};

use crate::cart::Cart;
use crate::product::ProductId;
use crate::user::UserId;

/// Unique identifier for a persisted order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(i64);

impl OrderId {
    /// Creates an order identifier from a store-assigned value.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the underlying integer value.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Lifecycle status of an order.
///
/// Checkout only ever produces [`OrderStatus::Pending`]; later transitions
/// are an administrative operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Freshly placed, not yet handled.
    Pending,
    /// Being prepared or shipped.
    Processing,
    /// Fulfilled.
    Completed,
    /// Cancelled by an administrator.
    Cancelled,
}

impl OrderStatus {
    /// Returns the storage string for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Pending" => Ok(Self::Pending),
            "Processing" => Ok(Self::Processing),
            "Completed" => Ok(Self::Completed),
            "Cancelled" => Ok(Self::Cancelled),
            _ => Err(AppError::Validation(format!(
                "unknown order status '{value}'"
            ))),
        }
    }
}

/// One item on an order: the product, the requested quantity, and the unit
/// price captured at order time. Immutable once the order is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Product the item refers to.
    pub product_id: ProductId,
    /// Quantity ordered.
    pub quantity: f64,
    /// Unit price snapshot at order time.
    pub price: f64,
}

/// An order ready to be persisted, built from a cart at checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    /// Owner of the order.
    pub user_id: UserId,
    /// Creation timestamp.
    pub order_date: DateTime<Utc>,
    /// Initial status, always [`OrderStatus::Pending`].
    pub status: OrderStatus,
    /// One item per cart line, in cart order.
    pub items: Vec<OrderItem>,
}

impl NewOrder {
    /// Converts a cart into a pending order owned by `user_id`.
    ///
    /// Each cart line becomes one item, copying the line's add-time price.
    /// An empty cart is rejected; orders are never created empty.
    pub fn from_cart(user_id: UserId, cart: &Cart, order_date: DateTime<Utc>) -> AppResult<Self> {
        if cart.is_empty() {
            return Err(AppError::EmptyCart);
        }

        let items = cart
            .lines()
            .iter()
            .map(|line| OrderItem {
                product_id: line.product_id,
                quantity: line.quantity,
                price: line.price,
            })
            .collect();

        Ok(Self {
            user_id,
            order_date,
            status: OrderStatus::Pending,
            items,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::Utc;

    use crate::cart::{Cart, CartLine};
    use crate::product::{Product, ProductId};
    use crate::user::UserId;

    use super::{NewOrder, OrderStatus};

    fn product(id: i64, price: f64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            unit: "piece".to_owned(),
            price,
            quantity: 50.0,
            photo: None,
        }
    }

    fn populated_cart() -> Cart {
        let mut cart = Cart::new();
        for (id, price, quantity) in [(5, 10.0, 2.0), (7, 4.5, 1.0)] {
            match CartLine::from_product(&product(id, price), quantity) {
                Ok(line) => cart.add(line),
                Err(error) => panic!("valid line rejected: {error}"),
            };
        }
        cart
    }

    #[test]
    fn status_round_trips_storage_value() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            let restored = OrderStatus::from_str(status.as_str());
            assert!(restored.is_ok_and(|value| value == status));
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(OrderStatus::from_str("Shipped").is_err());
    }

    #[test]
    fn empty_cart_cannot_become_an_order() {
        let result = NewOrder::from_cart(UserId::new(), &Cart::new(), Utc::now());
        assert!(result.is_err());
    }

    #[test]
    fn order_copies_every_line_with_its_snapshot_price() {
        let cart = populated_cart();
        let user_id = UserId::new();

        let order = match NewOrder::from_cart(user_id, &cart, Utc::now()) {
            Ok(order) => order,
            Err(error) => panic!("checkout conversion failed: {error}"),
        };

        assert_eq!(order.user_id, user_id);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].product_id, ProductId::new(5));
        assert_eq!(order.items[0].quantity, 2.0);
        assert_eq!(order.items[0].price, 10.0);
        assert_eq!(order.items[1].product_id, ProductId::new(7));
        assert_eq!(order.items[1].price, 4.5);
    }
}
