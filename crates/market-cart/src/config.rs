//! Cart store configuration.

use serde::{Deserialize, Serialize};

/// Storage key the cart has always been persisted under.
pub const DEFAULT_STORAGE_KEY: &str = "cart.products";

/// Configuration for a [`crate::CartStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartStoreConfig {
    /// Key holding the serialized item list.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl CartStoreConfig {
    /// Use a different storage key.
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }
}

impl Default for CartStoreConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
        }
    }
}
