//! Core configuration
//!
//! Plain settings structs with serde and sensible defaults; the embedding
//! application decides where they are loaded from.

use serde::{Deserialize, Serialize};

use crate::storage::CART_STORAGE_KEY;

/// Cart store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Storage slot the serialized cart lives under.
    ///
    /// Rotating this key is the migration strategy for a persisted-format
    /// change; old slots are simply never read again.
    pub storage_key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: CART_STORAGE_KEY.to_owned(),
        }
    }
}

/// Live catalog sync settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Buffer size a source implementation should use for its
    /// subscription channel.
    pub event_capacity: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self { event_capacity: 32 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_the_fixed_cart_key() {
        assert_eq!(StoreConfig::default().storage_key, "cart");
    }

    #[test]
    fn sync_config_round_trips_through_json() {
        let config = SyncConfig { event_capacity: 8 };

        let json = serde_json::to_string(&config).expect("config serializes");
        let back: SyncConfig = serde_json::from_str(&json).expect("config deserializes");

        assert_eq!(back.event_capacity, 8);
    }
}
