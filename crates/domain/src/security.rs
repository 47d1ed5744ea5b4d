//! Permissions consumed as yes/no gates and the roles that grant them.
//!
//! Authorization decisions themselves live in the external role store; this
//! module only fixes the vocabulary the policy oracle answers in.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use storekeep_core::AppError;

/// Permissions enforced by application policy checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Allows creating, updating, and deleting catalog products.
    ManageCatalog,
    /// Allows viewing all customers' orders and changing order status.
    ManageOrders,
    /// Allows reading the catalog audit log.
    ViewAuditLog,
}

impl Permission {
    /// Returns a stable storage value for this permission.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ManageCatalog => "catalog.manage",
            Self::ManageOrders => "orders.manage",
            Self::ViewAuditLog => "audit.view",
        }
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "catalog.manage" => Ok(Self::ManageCatalog),
            "orders.manage" => Ok(Self::ManageOrders),
            "audit.view" => Ok(Self::ViewAuditLog),
            _ => Err(AppError::Validation(format!(
                "unknown permission value '{value}'"
            ))),
        }
    }
}

/// Roles known to the role store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Full administrative access.
    Admin,
    /// Catalog and order management without audit access.
    Manager,
    /// Regular storefront customer.
    Customer,
}

impl Role {
    /// Returns the storage string for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Manager => "MANAGER",
            Self::Customer => "CUSTOMER",
        }
    }

    /// Returns the permissions this role grants.
    #[must_use]
    pub fn permissions(&self) -> &'static [Permission] {
        match self {
            Self::Admin => &[
                Permission::ManageCatalog,
                Permission::ManageOrders,
                Permission::ViewAuditLog,
            ],
            Self::Manager => &[Permission::ManageCatalog, Permission::ManageOrders],
            Self::Customer => &[],
        }
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "ADMIN" => Ok(Self::Admin),
            "MANAGER" => Ok(Self::Manager),
            "CUSTOMER" => Ok(Self::Customer),
            _ => Err(AppError::Validation(format!("unknown role '{value}'"))),
        }
    }
}
