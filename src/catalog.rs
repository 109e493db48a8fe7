//! Catalog entries
//!
//! The record shape mirrors the remote service's `entries` table; field
//! names follow its column names.

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Stable product identifier, unique across the catalog.
pub type EntryId = String;

/// Which side of the marketplace an entry sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Unit offered for sale.
    ForSale,
    /// Unit the business wants to buy.
    Wanted,
}

/// Listing visibility state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Visible in the storefront listing.
    Active,
    /// Hidden from the listing without being deleted.
    Inactive,
}

/// One sellable or wanted unit as known to the remote data service.
///
/// The local listing is only ever a cache of these records; it is never
/// independently authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Unique entry identifier.
    pub id: EntryId,
    /// Display name.
    pub name: String,
    /// Manufacturer brand.
    pub brand: String,
    /// Current asking price.
    pub price: Decimal,
    /// Pre-discount price, when the entry is on offer.
    pub original_price: Option<Decimal>,
    /// Marketplace side.
    pub category: Category,
    /// Free-form condition description ("New", "Used - Good", ...).
    pub condition: String,
    /// Feature bullet points.
    pub features: Vec<String>,
    /// Image URLs, first is the primary image.
    pub images: SmallVec<[String; 4]>,
    /// Visibility state; only active entries are listed.
    pub status: EntryStatus,
    /// Whether the entry is pinned to the featured strip.
    pub featured: bool,
    /// Creation time, set by the remote service.
    pub created_at: Timestamp,
    /// Last modification time, set by the remote service.
    pub updated_at: Timestamp,
}

impl CatalogEntry {
    /// Whether this entry belongs in the visible listing.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.status == EntryStatus::Active
    }
}

/// Canonical active entry used across the crate's tests.
#[cfg(test)]
pub(crate) fn test_entry(id: &str) -> CatalogEntry {
    CatalogEntry {
        id: id.to_owned(),
        name: format!("Split Unit {id}"),
        brand: "Arctica".to_owned(),
        price: Decimal::new(1000_00, 2),
        original_price: None,
        category: Category::ForSale,
        condition: "New".to_owned(),
        features: vec!["12000 BTU".to_owned(), "Inverter".to_owned()],
        images: SmallVec::from_vec(vec![format!("https://img.example/{id}.jpg")]),
        status: EntryStatus::Active,
        featured: false,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn only_active_entries_are_visible() -> TestResult {
        let mut entry = test_entry("ac-1");

        assert!(entry.is_visible());

        entry.status = EntryStatus::Inactive;

        assert!(!entry.is_visible());

        Ok(())
    }

    #[test]
    fn category_serializes_to_kebab_case() -> TestResult {
        assert_eq!(serde_json::to_string(&Category::ForSale)?, r#""for-sale""#);
        assert_eq!(serde_json::to_string(&Category::Wanted)?, r#""wanted""#);

        Ok(())
    }

    #[test]
    fn entry_round_trips_through_json() -> TestResult {
        let entry = test_entry("ac-7");

        let json = serde_json::to_string(&entry)?;
        let back: CatalogEntry = serde_json::from_str(&json)?;

        assert_eq!(back, entry);

        Ok(())
    }
}
