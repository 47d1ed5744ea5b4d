//! Session-held shopping cart with per-product line merging.

use serde::{Deserialize, Serialize};
use storekeep_core::{AppError, AppResult};

use crate::product::{Product, ProductId};

/// One cart line: a product snapshot taken at add time plus the requested
/// quantity.
///
/// The quantity here is what the customer asked for; it is independent of the
/// product's quantity-on-hand, which cart operations never touch. The price
/// is the price at the moment the line was added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product this line refers to.
    pub product_id: ProductId,
    /// Product name at add time.
    pub name: String,
    /// Unit label at add time.
    pub unit: String,
    /// Unit price at add time.
    pub price: f64,
    /// Requested quantity, always greater than zero.
    pub quantity: f64,
}

impl CartLine {
    /// Creates a line from a resolved product and a requested quantity.
    pub fn from_product(product: &Product, quantity: f64) -> AppResult<Self> {
        if !quantity.is_finite() || quantity <= 0.0 {
            return Err(AppError::Validation(
                "requested quantity must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            product_id: product.id,
            name: product.name.clone(),
            unit: product.unit.clone(),
            price: product.price,
            quantity,
        })
    }
}

/// Outcome of adding a line, reported back to the caller as feedback.
///
/// Purely observational; the merge behavior is the same either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartAddOutcome {
    /// A line for the product already existed; its quantity was increased.
    MergedIntoExistingLine,
    /// A new line joined other lines already in the cart.
    AddedAlongsideExistingLines,
    /// A new line started a previously empty cart.
    AddedToEmptyCart,
}

/// The cart itself: lines in insertion order, at most one per product id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a line, merging quantities when a line for the same product
    /// already exists. Insertion order of first adds is preserved.
    pub fn add(&mut self, line: CartLine) -> CartAddOutcome {
        if let Some(existing) = self
            .lines
            .iter_mut()
            .find(|candidate| candidate.product_id == line.product_id)
        {
            existing.quantity += line.quantity;
            return CartAddOutcome::MergedIntoExistingLine;
        }

        let was_empty = self.lines.is_empty();
        self.lines.push(line);

        if was_empty {
            CartAddOutcome::AddedToEmptyCart
        } else {
            CartAddOutcome::AddedAlongsideExistingLines
        }
    }

    /// Removes the line for a product. Returns whether a line was removed.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.product_id != product_id);
        self.lines.len() != before
    }

    /// Returns the lines in order of first add.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Returns whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns the number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Empties the cart. Used by checkout after the order is persisted.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
