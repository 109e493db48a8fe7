//! Cart
//!
//! Pure cart state: lines keyed by product id, insertion order preserved,
//! aggregates recomputed from scratch on every read so they can never
//! drift. Persistence and notifications live in [`crate::store`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::catalog::{CatalogEntry, EntryId};

/// Errors surfaced by cart mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// A quantity below 1 was requested; removal must be explicit.
    #[error("quantity {0} is below the minimum of 1")]
    QuantityBelowMinimum(u32),
}

/// Read-only copy of the catalog fields the cart keeps.
///
/// Taken at the moment of insertion; the cart never holds a live reference
/// to the catalog entry, so later catalog updates do not reprice lines.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSnapshot {
    /// Product identifier, the cart's primary key.
    pub id: EntryId,
    /// Display name.
    pub name: String,
    /// Base (undiscounted) unit price.
    pub price: Decimal,
    /// Image URLs, first is the primary image.
    pub images: SmallVec<[String; 4]>,
    /// Whether an offer applies to this product.
    pub discounted: bool,
    /// Offer percentage in `0..=100`; meaningful only when `discounted`.
    pub discount_percentage: Option<Decimal>,
}

impl From<&CatalogEntry> for ProductSnapshot {
    /// An entry with an `original_price` above its asking price is treated
    /// as on offer: the snapshot keeps the original price as the base and
    /// expresses the asking price as a percentage off, so the effective
    /// unit price works out to the asking price.
    fn from(entry: &CatalogEntry) -> Self {
        let offer = entry
            .original_price
            .filter(|original| *original > entry.price && !original.is_zero());

        let (price, discount_percentage) = match offer {
            Some(original) => {
                let percentage = (Decimal::ONE - entry.price / original) * Decimal::ONE_HUNDRED;
                (original, Some(percentage))
            }
            None => (entry.price, None),
        };

        Self {
            id: entry.id.clone(),
            name: entry.name.clone(),
            price,
            images: entry.images.clone(),
            discounted: discount_percentage.is_some(),
            discount_percentage,
        }
    }
}

/// One entry in the cart.
///
/// Serialized shape matches the persisted storage format, which uses
/// camelCase field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Product identifier, unique within the cart.
    pub id: EntryId,
    /// Display name at add time.
    pub name: String,
    /// Base unit price at add time.
    pub price: Decimal,
    /// Image URLs at add time.
    pub images: SmallVec<[String; 4]>,
    /// Number of units, always at least 1.
    pub quantity: u32,
    /// Whether an offer applied at add time.
    pub discounted: bool,
    /// Offer percentage at add time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<Decimal>,
}

impl CartLine {
    fn new(snapshot: ProductSnapshot) -> Self {
        Self {
            id: snapshot.id,
            name: snapshot.name,
            price: snapshot.price,
            images: snapshot.images,
            quantity: 1,
            discounted: snapshot.discounted,
            discount_percentage: snapshot.discount_percentage,
        }
    }

    /// Unit price with any offer applied.
    #[must_use]
    pub fn effective_unit_price(&self) -> Decimal {
        match (self.discounted, self.discount_percentage) {
            (true, Some(percentage)) => {
                self.price * (Decimal::ONE - percentage / Decimal::ONE_HUNDRED)
            }
            _ => self.price,
        }
    }

    /// Effective unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.effective_unit_price() * Decimal::from(self.quantity)
    }
}

/// Ordered cart contents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a cart from persisted lines, preserving their order.
    #[must_use]
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        Self { lines }
    }

    /// The lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Look up a line by product id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id == id)
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Sum of line totals, offers applied.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Add one unit of the product.
    ///
    /// A product already in the cart has its quantity incremented; its
    /// price and offer fields are deliberately not refreshed from the
    /// snapshot. A new product is appended with quantity 1.
    pub fn add(&mut self, snapshot: ProductSnapshot) {
        match self.lines.iter_mut().find(|line| line.id == snapshot.id) {
            Some(line) => line.quantity += 1,
            None => self.lines.push(CartLine::new(snapshot)),
        }
    }

    /// Remove the line for the given product id, returning it if present.
    pub fn remove(&mut self, id: &str) -> Option<CartLine> {
        let index = self.lines.iter().position(|line| line.id == id)?;

        Some(self.lines.remove(index))
    }

    /// Replace a line's quantity.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::QuantityBelowMinimum`] for a quantity of 0 and
    /// leaves the cart unchanged; dropping to zero must go through
    /// [`Cart::remove`]. An unknown id is a no-op, not an error.
    pub fn set_quantity(&mut self, id: &str, quantity: u32) -> Result<(), CartError> {
        if quantity < 1 {
            return Err(CartError::QuantityBelowMinimum(quantity));
        }

        if let Some(line) = self.lines.iter_mut().find(|line| line.id == id) {
            line.quantity = quantity;
        }

        Ok(())
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
pub(crate) fn test_snapshot(id: &str, price: Decimal) -> ProductSnapshot {
    ProductSnapshot {
        id: id.to_owned(),
        name: format!("Split Unit {id}"),
        price,
        images: SmallVec::new(),
        discounted: false,
        discount_percentage: None,
    }
}
