//! Cart store
//!
//! Single source of truth for the in-progress order. Owns the [`Cart`],
//! rehydrates it from the injected storage backend on construction, and
//! writes it back after every mutation. One store per session; callers
//! pass it by reference to whatever needs it instead of reaching for a
//! global.

use crate::{
    cart::{Cart, CartError, CartLine, ProductSnapshot},
    config::StoreConfig,
    notify::{Notification, Notifier},
    storage::CartStorage,
};

/// Cart state plus its persistence and notification side effects.
#[derive(Debug)]
pub struct CartStore<S, N> {
    cart: Cart,
    storage: S,
    notifier: N,
    storage_key: String,
}

impl<S: CartStorage, N: Notifier> CartStore<S, N> {
    /// Open a store with default settings, rehydrating from storage.
    #[must_use]
    pub fn open(storage: S, notifier: N) -> Self {
        Self::with_config(StoreConfig::default(), storage, notifier)
    }

    /// Open a store with explicit settings, rehydrating from storage.
    ///
    /// Rehydration fails open: an unreadable backend or an unparseable
    /// persisted value is logged and treated as an empty cart, never
    /// surfaced to the user.
    #[must_use]
    pub fn with_config(config: StoreConfig, storage: S, notifier: N) -> Self {
        let cart = rehydrate(&storage, &config.storage_key);

        Self {
            cart,
            storage,
            notifier,
            storage_key: config.storage_key,
        }
    }

    /// The current cart contents.
    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.cart.count()
    }

    /// Sum of line totals, offers applied.
    #[must_use]
    pub fn total(&self) -> rust_decimal::Decimal {
        self.cart.total()
    }

    /// Add one unit of the product, merging with an existing line by id.
    pub fn add(&mut self, snapshot: ProductSnapshot) {
        self.cart.add(snapshot);
        self.persist();
    }

    /// Remove the line for the given product id.
    ///
    /// Removing an actually-present line emits a confirmation
    /// notification; an absent id is a silent no-op.
    pub fn remove(&mut self, id: &str) {
        let Some(removed) = self.cart.remove(id) else {
            return;
        };

        self.persist();
        self.notifier.notify(Notification::success(
            "Removed from cart",
            format!("{} was removed from your cart", removed.name),
        ));
    }

    /// Replace a line's quantity.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::QuantityBelowMinimum`] for a quantity of 0,
    /// leaving the cart (and storage) untouched. An unknown id is a
    /// non-error no-op.
    pub fn update_quantity(&mut self, id: &str, quantity: u32) -> Result<(), CartError> {
        self.cart.set_quantity(id, quantity)?;
        self.persist();

        Ok(())
    }

    /// Empty the cart unconditionally and confirm to the user.
    pub fn clear(&mut self) {
        self.cart.clear();
        self.persist();
        self.notifier
            .notify(Notification::success("Cart cleared", "Your cart is now empty"));
    }

    /// Serialize the full cart into its storage slot.
    ///
    /// A persist failure is logged and the in-memory mutation is kept; a
    /// storage hiccup must not undo a user action.
    fn persist(&self) {
        let serialized = match serde_json::to_string(self.cart.lines()) {
            Ok(serialized) => serialized,
            Err(error) => {
                tracing::error!("failed to serialize cart: {error}");
                return;
            }
        };

        if let Err(error) = self.storage.write(&self.storage_key, &serialized) {
            tracing::error!("failed to persist cart: {error}");
        }
    }
}

fn rehydrate(storage: &impl CartStorage, key: &str) -> Cart {
    let raw = match storage.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Cart::new(),
        Err(error) => {
            tracing::warn!("failed to read persisted cart, starting empty: {error}");
            return Cart::new();
        }
    };

    match serde_json::from_str::<Vec<CartLine>>(&raw) {
        Ok(lines) => Cart::from_lines(lines),
        Err(error) => {
            tracing::warn!("discarding unparseable persisted cart: {error}");
            Cart::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{
        cart::test_snapshot,
        notify::{RecordingNotifier, Severity},
        storage::{CART_STORAGE_KEY, MemoryStorage},
    };

    use super::*;

    #[test]
    fn adding_same_id_twice_yields_one_line_with_quantity_two() {
        let notifier = RecordingNotifier::new();
        let mut store = CartStore::open(MemoryStorage::new(), &notifier);

        store.add(test_snapshot("ac-1", Decimal::new(1000_00, 2)));
        store.add(test_snapshot("ac-1", Decimal::new(1000_00, 2)));

        assert_eq!(store.cart().len(), 1);
        assert_eq!(store.count(), 2);
        assert_eq!(store.total(), Decimal::new(2000_00, 2));
    }

    #[test]
    fn quantity_floor_leaves_cart_and_storage_unchanged() -> TestResult {
        let notifier = RecordingNotifier::new();
        let storage = MemoryStorage::new();
        let mut store = CartStore::open(&storage, &notifier);

        store.add(test_snapshot("ac-1", Decimal::new(1000_00, 2)));
        store.add(test_snapshot("ac-1", Decimal::new(1000_00, 2)));

        let persisted_before = storage.read(CART_STORAGE_KEY)?;
        let result = store.update_quantity("ac-1", 0);

        assert_eq!(result, Err(CartError::QuantityBelowMinimum(0)));
        assert_eq!(store.cart().get("ac-1").map(|line| line.quantity), Some(2));
        assert_eq!(storage.read(CART_STORAGE_KEY)?, persisted_before);

        Ok(())
    }

    #[test]
    fn full_scenario_matches_expected_aggregates() -> TestResult {
        let notifier = RecordingNotifier::new();
        let mut store = CartStore::open(MemoryStorage::new(), &notifier);

        store.add(test_snapshot("ac-1", Decimal::new(1000_00, 2)));

        assert_eq!(store.count(), 1);
        assert_eq!(store.total(), Decimal::new(1000_00, 2));

        store.add(test_snapshot("ac-1", Decimal::new(1000_00, 2)));

        assert_eq!(store.count(), 2);
        assert_eq!(store.total(), Decimal::new(2000_00, 2));

        let floor = store.update_quantity("ac-1", 0);

        assert!(floor.is_err(), "quantity 0 must be rejected");
        assert_eq!(store.count(), 2);

        store.remove("ac-1");

        assert!(store.cart().is_empty());
        assert_eq!(store.total(), Decimal::ZERO);

        let recorded = store_notifications(&notifier);

        assert_eq!(recorded, ["Removed from cart"]);

        Ok(())
    }

    #[test]
    fn removing_an_absent_id_emits_no_notification() {
        let notifier = RecordingNotifier::new();
        let mut store = CartStore::open(MemoryStorage::new(), &notifier);

        store.remove("ac-404");

        assert!(notifier.recorded().is_empty());
    }

    #[test]
    fn clear_notifies_with_success_severity() {
        let notifier = RecordingNotifier::new();
        let mut store = CartStore::open(MemoryStorage::new(), &notifier);

        store.add(test_snapshot("ac-1", Decimal::new(1000_00, 2)));
        store.clear();

        assert!(store.cart().is_empty());
        assert_eq!(
            notifier.recorded().first().map(|n| n.severity),
            Some(Severity::Success)
        );
    }

    #[test]
    fn cart_survives_a_restart() -> TestResult {
        let notifier = RecordingNotifier::new();
        let storage = MemoryStorage::new();

        {
            let mut store = CartStore::open(&storage, &notifier);

            store.add(test_snapshot("ac-1", Decimal::new(1000_00, 2)));
            store.add(test_snapshot("ac-2", Decimal::new(250_50, 2)));
            store.update_quantity("ac-2", 3)?;
        }

        let reopened = CartStore::open(&storage, &notifier);

        assert_eq!(reopened.cart().len(), 2);
        assert_eq!(reopened.count(), 4);
        assert_eq!(reopened.total(), Decimal::new(1751_50, 2));

        Ok(())
    }

    #[test]
    fn corrupt_persisted_cart_rehydrates_empty() {
        let notifier = RecordingNotifier::new();
        let storage = MemoryStorage::with_slot(CART_STORAGE_KEY, "{not json");

        let store = CartStore::open(&storage, &notifier);

        assert!(store.cart().is_empty());
        assert!(
            notifier.recorded().is_empty(),
            "rehydration failure must not surface to the user"
        );
    }

    #[test]
    fn custom_storage_key_is_honored() -> TestResult {
        let notifier = RecordingNotifier::new();
        let storage = MemoryStorage::new();
        let config = StoreConfig {
            storage_key: "cart-v2".to_owned(),
        };

        let mut store = CartStore::with_config(config, &storage, &notifier);

        store.add(test_snapshot("ac-1", Decimal::new(1000_00, 2)));

        assert!(storage.read("cart-v2")?.is_some());
        assert_eq!(storage.read(CART_STORAGE_KEY)?, None);

        Ok(())
    }

    fn store_notifications(notifier: &RecordingNotifier) -> Vec<String> {
        notifier.recorded().into_iter().map(|n| n.title).collect()
    }
}
