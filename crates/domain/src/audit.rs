//! Audit vocabulary for catalog mutations.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use storekeep_core::AppError;

use crate::product::Product;

/// Placeholder recorded when neither snapshot can supply a product name.
pub const DELETED_PRODUCT_NAME: &str = "[Deleted]";

/// Kind of catalog mutation an audit entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditAction {
    /// A product was created.
    Created,
    /// A product was updated.
    Updated,
    /// A product was deleted.
    Deleted,
}

impl AuditAction {
    /// Returns the storage string for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::Updated => "Updated",
            Self::Deleted => "Deleted",
        }
    }
}

impl FromStr for AuditAction {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Created" => Ok(Self::Created),
            "Updated" => Ok(Self::Updated),
            "Deleted" => Ok(Self::Deleted),
            _ => Err(AppError::Validation(format!(
                "unknown audit action '{value}'"
            ))),
        }
    }
}

/// Resolves the product name to denormalize into an audit entry.
///
/// Sources are consulted in order: the post-mutation snapshot, then the
/// pre-mutation snapshot, then the [`DELETED_PRODUCT_NAME`] placeholder.
#[must_use]
pub fn audit_product_name(after: Option<&Product>, before: Option<&Product>) -> String {
    [after, before]
        .into_iter()
        .flatten()
        .map(|product| product.name.clone())
        .next()
        .unwrap_or_else(|| DELETED_PRODUCT_NAME.to_owned())
}

/// Builds the details text for an update from both snapshots.
///
/// All three tracked fields appear even when unchanged, and numbers render
/// with their shortest form (`10.0` prints as `10`), keeping the log
/// readable and deterministic.
#[must_use]
pub fn update_details(before: &Product, after: &Product) -> String {
    format!(
        "Old Name: {}, New Name: {} | Old Price: {}, New Price: {} | Old Quantity: {}, New Quantity: {}",
        before.name, after.name, before.price, after.price, before.quantity, after.quantity
    )
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use crate::product::{Product, ProductId};

    use super::{AuditAction, DELETED_PRODUCT_NAME, audit_product_name, update_details};

    fn product(name: &str, price: f64, quantity: f64) -> Product {
        Product {
            id: ProductId::new(5),
            name: name.to_owned(),
            unit: "piece".to_owned(),
            price,
            quantity,
            photo: None,
        }
    }

    #[test]
    fn action_round_trips_storage_value() {
        for action in [AuditAction::Created, AuditAction::Updated, AuditAction::Deleted] {
            let restored = AuditAction::from_str(action.as_str());
            assert!(restored.is_ok_and(|value| value == action));
        }
    }

    #[test]
    fn name_prefers_the_post_state() {
        let before = product("Widget", 10.0, 100.0);
        let after = product("Widget Pro", 12.0, 100.0);
        assert_eq!(audit_product_name(Some(&after), Some(&before)), "Widget Pro");
    }

    #[test]
    fn name_falls_back_to_the_pre_state() {
        let before = product("Gadget", 3.0, 7.0);
        assert_eq!(audit_product_name(None, Some(&before)), "Gadget");
    }

    #[test]
    fn name_falls_back_to_the_placeholder() {
        assert_eq!(audit_product_name(None, None), DELETED_PRODUCT_NAME);
    }

    #[test]
    fn update_details_lists_all_fields_even_when_unchanged() {
        let before = product("Widget", 10.0, 100.0);
        let after = product("Widget Pro", 12.0, 100.0);

        assert_eq!(
            update_details(&before, &after),
            "Old Name: Widget, New Name: Widget Pro | Old Price: 10, New Price: 12 | \
             Old Quantity: 100, New Quantity: 100"
        );
    }

    #[test]
    fn update_details_keeps_fractional_prices() {
        let before = product("Widget", 10.5, 1.0);
        let after = product("Widget", 12.25, 1.0);

        assert_eq!(
            update_details(&before, &after),
            "Old Name: Widget, New Name: Widget | Old Price: 10.5, New Price: 12.25 | \
             Old Quantity: 1, New Quantity: 1"
        );
    }
}
