//! Persisted shopping-cart store for the market storefront.
//!
//! A [`CartStore`] owns the cart the user is building. Every change is
//! applied in memory first, where the view layer sees it immediately, and
//! then handed to a background writer that mirrors the cart into a
//! Key-Value store under a single key. On the next start,
//! [`CartStore::initialize`] loads it back.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use market_cart::prelude::*;
//!
//! let store = Arc::new(CartStore::builder(MemoryStore::new()).build());
//! store.initialize().await;
//!
//! let provider = CartProvider::new(Arc::clone(&store));
//! provider.scope(async {
//!     let cart = use_cart()?;
//!     cart.add_to_cart(Product::new("1", "Shirt", "https://img/shirt.png", 20.0));
//!     cart.increment("1");
//!     Ok::<_, CartError>(())
//! }).await?;
//!
//! store.flush().await?;
//! ```

mod config;
mod error;
mod persist;
mod provider;
mod store;

pub use config::{CartStoreConfig, DEFAULT_STORAGE_KEY};
pub use error::{CartError, PersistError};
pub use persist::{ErrorHandler, PersistStatus};
pub use provider::{use_cart, CartProvider};
pub use store::{CartStore, CartStoreBuilder, Hydration};

pub use market_commerce::{Cart, CartItem, Product, ProductId};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        use_cart, Cart, CartError, CartItem, CartProvider, CartStore, CartStoreConfig, Hydration,
        PersistError, PersistStatus, Product, ProductId,
    };
    pub use market_kv::{FileStore, KvStore, MemoryStore};
}
