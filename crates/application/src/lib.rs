//! Application services and ports.

#![forbid(unsafe_code)]

mod audit_service;
mod cart_service;
mod catalog_service;
mod order_service;
mod security_ports;
mod user_directory;

pub use audit_service::{AuditEntryRecord, AuditLogRepository, AuditService, NewAuditEntry};
pub use cart_service::{CartFeedback, CartService, CartStore};
pub use catalog_service::{CatalogPageQuery, CatalogService, ProductRepository};
pub use order_service::{
    CustomerOrders, OrderItemRecord, OrderRecord, OrderRepository, OrderService,
};
pub use security_ports::{AccessPolicy, require_permission};
pub use user_directory::{ProfileService, ProfileUpdate, UserDirectory};
