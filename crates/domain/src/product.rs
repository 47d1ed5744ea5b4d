//! Product entity, validated mutation drafts, and the listing sort vocabulary.

use serde::{Deserialize, Serialize};
use storekeep_core::{AppError, AppResult, NonEmptyString};

/// Maximum length of a product name in characters.
pub const PRODUCT_NAME_MAX_LENGTH: usize = 50;

/// Unique identifier for a catalog product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(i64);

impl ProductId {
    /// Creates a product identifier from a store-assigned value.
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

impl std::fmt::Display for ProductId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// A catalog product as persisted by the product store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Store-assigned identifier.
    pub id: ProductId,
    /// Display name, non-empty and at most [`PRODUCT_NAME_MAX_LENGTH`] characters.
    pub name: String,
    /// Unit label shown next to quantities (e.g. "kg", "piece").
    pub unit: String,
    /// Unit price.
    pub price: f64,
    /// Quantity on hand in the catalog.
    pub quantity: f64,
    /// Optional photo reference.
    pub photo: Option<String>,
}

/// Validated input for creating or updating a product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    /// Display name.
    pub name: String,
    /// Unit label.
    pub unit: String,
    /// Unit price.
    pub price: f64,
    /// Quantity on hand.
    pub quantity: f64,
    /// Optional photo reference.
    pub photo: Option<String>,
}

impl ProductDraft {
    /// Creates a validated product draft.
    ///
    /// The name must be non-empty and at most [`PRODUCT_NAME_MAX_LENGTH`]
    /// characters; price and quantity must be finite and non-negative.
    pub fn new(
        name: impl Into<String>,
        unit: impl Into<String>,
        price: f64,
        quantity: f64,
        photo: Option<String>,
    ) -> AppResult<Self> {
        let name = NonEmptyString::new(name)?;
        if name.as_str().chars().count() > PRODUCT_NAME_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "product name must not exceed {PRODUCT_NAME_MAX_LENGTH} characters"
            )));
        }

        if !price.is_finite() || price < 0.0 {
            return Err(AppError::Validation(
                "product price must be a non-negative number".to_owned(),
            ));
        }

        if !quantity.is_finite() || quantity < 0.0 {
            return Err(AppError::Validation(
                "product quantity must be a non-negative number".to_owned(),
            ));
        }

        Ok(Self {
            name: name.into(),
            unit: unit.into(),
            price,
            quantity,
            photo,
        })
    }
}

/// Sort orders accepted by the product listing.
///
/// Each value maps to exactly one (field, direction) pair so that pagination
/// is reproducible across calls with unchanged data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    /// Stable catalog order by product id, ascending.
    #[default]
    Default,
    /// Name ascending.
    NameAsc,
    /// Name descending.
    NameDesc,
    /// Price ascending.
    PriceAsc,
    /// Price descending.
    PriceDesc,
}

impl ProductSort {
    /// Returns a stable token for this sort order.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::NameAsc => "name_asc",
            Self::NameDesc => "name_desc",
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{PRODUCT_NAME_MAX_LENGTH, ProductDraft};

    #[test]
    fn draft_accepts_reasonable_product() {
        let draft = ProductDraft::new("Widget", "piece", 10.0, 100.0, None);
        assert!(draft.is_ok());
    }

    #[test]
    fn draft_rejects_blank_name() {
        assert!(ProductDraft::new("   ", "piece", 10.0, 100.0, None).is_err());
    }

    #[test]
    fn draft_rejects_overlong_name() {
        let name = "x".repeat(PRODUCT_NAME_MAX_LENGTH + 1);
        assert!(ProductDraft::new(name, "piece", 10.0, 100.0, None).is_err());
    }

    #[test]
    fn draft_accepts_name_at_limit() {
        let name = "x".repeat(PRODUCT_NAME_MAX_LENGTH);
        assert!(ProductDraft::new(name, "piece", 10.0, 100.0, None).is_ok());
    }

    #[test]
    fn draft_rejects_negative_price() {
        assert!(ProductDraft::new("Widget", "piece", -1.0, 100.0, None).is_err());
    }

    #[test]
    fn draft_rejects_non_finite_quantity() {
        assert!(ProductDraft::new("Widget", "piece", 10.0, f64::NAN, None).is_err());
    }
}
