//! Persistent Key-Value storage layer for the market cart.
//!
//! Provides a small async [`KvStore`] interface over string blobs, two
//! implementations of it, and a [`Cache`] wrapper with automatic JSON
//! serialization.
//!
//! # Example
//!
//! ```rust,ignore
//! use market_kv::{Cache, FileStore};
//!
//! let store = FileStore::open("/var/lib/market-cart").await?;
//! let cache = Cache::new(store);
//!
//! // Store a value
//! cache.set("cart.products", &items).await?;
//!
//! // Retrieve a value
//! let items: Option<Vec<CartItem>> = cache.get("cart.products").await?;
//! ```

mod error;
mod file;
mod kv;
mod memory;
mod store;

pub use error::KvError;
pub use file::FileStore;
pub use kv::Cache;
pub use memory::MemoryStore;
pub use store::KvStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, FileStore, KvError, KvStore, MemoryStore};
}
