use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storekeep_application::{
    AuditEntryRecord, CartFeedback, CustomerOrders, OrderItemRecord, OrderRecord,
};
use storekeep_core::UserIdentity;
use storekeep_domain::{Cart, CartLine, Page, Product, UserProfile};

/// Health response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Generic message response.
#[derive(Debug, Serialize)]
pub struct GenericMessageResponse {
    pub message: String,
}

/// API representation of the signed-in user.
#[derive(Debug, Serialize)]
pub struct UserIdentityResponse {
    pub user_id: String,
    pub display_name: String,
    pub email: Option<String>,
}

impl From<UserIdentity> for UserIdentityResponse {
    fn from(identity: UserIdentity) -> Self {
        Self {
            user_id: identity.user_id().to_string(),
            display_name: identity.display_name().to_owned(),
            email: identity.email().map(ToOwned::to_owned),
        }
    }
}

/// Sign-in request resolving a directory user into the session.
#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
}

/// Query parameters for paged product listings.
#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    /// Free-text filter over name and unit.
    pub search: Option<String>,
    /// Call-site sort token; unknown tokens fall back to the listing default.
    pub sort: Option<String>,
    /// Requested 1-based page.
    pub page: Option<usize>,
}

/// API representation of a catalog product.
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub product_id: i64,
    pub name: String,
    pub unit: String,
    pub price: f64,
    pub quantity: f64,
    pub photo: Option<String>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            product_id: product.id.as_i64(),
            name: product.name,
            unit: product.unit,
            price: product.price,
            quantity: product.quantity,
            photo: product.photo,
        }
    }
}

/// One page of the product listing with its pagination counters.
#[derive(Debug, Serialize)]
pub struct ProductPageResponse {
    pub items: Vec<ProductResponse>,
    pub page_index: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub page_size: usize,
}

impl From<Page<Product>> for ProductPageResponse {
    fn from(page: Page<Product>) -> Self {
        let page = page.map(ProductResponse::from);
        Self {
            items: page.items,
            page_index: page.page_index,
            total_pages: page.total_pages,
            total_items: page.total_items,
            page_size: page.page_size,
        }
    }
}

/// Request body for creating or updating a product.
#[derive(Debug, Deserialize)]
pub struct SaveProductRequest {
    pub name: String,
    pub unit: String,
    pub price: f64,
    pub quantity: f64,
    pub photo: Option<String>,
}

/// Request body for adding a product to the cart.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: i64,
    pub quantity: f64,
}

/// One cart line.
#[derive(Debug, Serialize)]
pub struct CartLineResponse {
    pub product_id: i64,
    pub name: String,
    pub unit: String,
    pub price: f64,
    pub quantity: f64,
}

impl From<&CartLine> for CartLineResponse {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id.as_i64(),
            name: line.name.clone(),
            unit: line.unit.clone(),
            price: line.price,
            quantity: line.quantity,
        }
    }
}

/// The cart together with the delivery details shown next to it.
#[derive(Debug, Serialize)]
pub struct CartViewResponse {
    pub lines: Vec<CartLineResponse>,
    pub cell_phone: Option<String>,
    pub country: Option<String>,
}

impl CartViewResponse {
    pub fn from_cart(cart: &Cart, profile: Option<&UserProfile>) -> Self {
        Self {
            lines: cart.lines().iter().map(CartLineResponse::from).collect(),
            cell_phone: profile.and_then(|profile| profile.cell_phone.clone()),
            country: profile.and_then(|profile| profile.country.clone()),
        }
    }
}

/// Feedback after an add-to-cart operation.
#[derive(Debug, Serialize)]
pub struct CartFeedbackResponse {
    pub message: String,
    pub lines: Vec<CartLineResponse>,
}

impl From<CartFeedback> for CartFeedbackResponse {
    fn from(feedback: CartFeedback) -> Self {
        Self {
            lines: feedback.cart.lines().iter().map(CartLineResponse::from).collect(),
            message: feedback.message,
        }
    }
}

/// Response after a successful checkout.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub order_id: i64,
    pub message: String,
}

/// One item of a stored order.
#[derive(Debug, Serialize)]
pub struct OrderItemResponse {
    pub product_id: i64,
    pub product_name: Option<String>,
    pub quantity: f64,
    pub price: f64,
}

impl From<OrderItemRecord> for OrderItemResponse {
    fn from(item: OrderItemRecord) -> Self {
        Self {
            product_id: item.product_id.as_i64(),
            product_name: item.product_name,
            quantity: item.quantity,
            price: item.price,
        }
    }
}

/// A stored order with its items.
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub order_id: i64,
    pub user_id: String,
    pub order_date: DateTime<Utc>,
    pub status: String,
    pub items: Vec<OrderItemResponse>,
}

impl From<OrderRecord> for OrderResponse {
    fn from(record: OrderRecord) -> Self {
        Self {
            order_id: record.id.as_i64(),
            user_id: record.user_id.to_string(),
            order_date: record.order_date,
            status: record.status.as_str().to_owned(),
            items: record.items.into_iter().map(OrderItemResponse::from).collect(),
        }
    }
}

/// Request body for moving an order to a new status.
#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

/// A customer with at least one order.
#[derive(Debug, Serialize)]
pub struct CustomerOrdersResponse {
    pub user_id: String,
    pub email: String,
    pub display_name: String,
    pub latest_order_id: i64,
}

impl From<CustomerOrders> for CustomerOrdersResponse {
    fn from(customer: CustomerOrders) -> Self {
        Self {
            user_id: customer.user_id.to_string(),
            email: customer.email,
            display_name: customer.display_name,
            latest_order_id: customer.latest_order_id.as_i64(),
        }
    }
}

/// One audit trail entry.
#[derive(Debug, Serialize)]
pub struct AuditEntryResponse {
    pub id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub action: String,
    pub details: String,
    pub action_date: DateTime<Utc>,
    pub actor_email: Option<String>,
}

impl From<AuditEntryRecord> for AuditEntryResponse {
    fn from(record: AuditEntryRecord) -> Self {
        Self {
            id: record.id,
            product_id: record.product_id.as_i64(),
            product_name: record.product_name,
            action: record.action.as_str().to_owned(),
            details: record.details,
            action_date: record.action_date,
            actor_email: record.actor_email,
        }
    }
}

/// The signed-in user's delivery profile.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user_id: String,
    pub email: String,
    pub display_name: String,
    pub cell_phone: Option<String>,
    pub country: Option<String>,
}

impl From<UserProfile> for ProfileResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            user_id: profile.id.to_string(),
            email: profile.email,
            display_name: profile.display_name,
            cell_phone: profile.cell_phone,
            country: profile.country,
        }
    }
}

/// Request body for updating the delivery profile.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub display_name: String,
    pub cell_phone: Option<String>,
    pub country: Option<String>,
}
