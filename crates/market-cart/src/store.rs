//! The cart store: in-memory cart plus its persisted mirror.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use market_commerce::{Cart, CartItem, Decrement, Product};
use market_kv::{Cache, FileStore, KvStore};
use tokio::sync::{mpsc, oneshot, watch};

use crate::config::CartStoreConfig;
use crate::error::{CartError, PersistError};
use crate::persist::{ErrorHandler, PersistCommand, PersistStatus, Reporter, Snapshot, Writer};

/// Outcome of [`CartStore::initialize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hydration {
    /// A stored cart with this many line items was loaded.
    Restored(usize),
    /// Nothing was stored; the cart stays empty.
    Empty,
    /// The stored cart could not be read; the cart stays empty.
    Failed(PersistError),
}

struct State {
    cart: Cart,
    revision: u64,
}

/// Shopping-cart state mirrored to a Key-Value store.
///
/// Mutations update the in-memory cart synchronously and queue the new state
/// for a background writer; they never wait for storage. Share the store
/// with `Arc` (or through a [`crate::CartProvider`]).
///
/// # Example
///
/// ```rust,ignore
/// let store = CartStore::builder(FileStore::open(dir).await?).build();
/// store.initialize().await;
///
/// store.add_to_cart(Product::new("1", "Shirt", "https://img/shirt.png", 20.0));
/// store.increment("1");
/// store.flush().await?;
/// ```
pub struct CartStore {
    state: Mutex<State>,
    items_tx: watch::Sender<Vec<CartItem>>,
    cache: Cache<Arc<dyn KvStore>>,
    config: CartStoreConfig,
    reporter: Reporter,
    writer_tx: mpsc::UnboundedSender<PersistCommand>,
}

/// Builder for [`CartStore`].
pub struct CartStoreBuilder {
    store: Arc<dyn KvStore>,
    config: CartStoreConfig,
    on_error: Option<ErrorHandler>,
}

impl CartStoreBuilder {
    /// Set the store configuration.
    pub fn with_config(mut self, config: CartStoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Call `handler` whenever reading or writing the stored cart fails.
    pub fn with_error_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&PersistError) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(handler));
        self
    }

    /// Build the store and start its background writer.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn build(self) -> CartStore {
        let cache = Cache::new(self.store);
        let reporter = Reporter::new(self.on_error);
        let (writer_tx, writer_rx) = mpsc::unbounded_channel();

        let writer = Writer::new(
            cache.clone(),
            self.config.storage_key.clone(),
            reporter.clone(),
            writer_rx,
        );
        tokio::spawn(writer.run());

        let (items_tx, _) = watch::channel(Vec::new());
        CartStore {
            state: Mutex::new(State {
                cart: Cart::new(),
                revision: 0,
            }),
            items_tx,
            cache,
            config: self.config,
            reporter,
            writer_tx,
        }
    }
}

impl CartStore {
    /// Start building a store over `store`.
    pub fn builder(store: impl KvStore + 'static) -> CartStoreBuilder {
        CartStoreBuilder {
            store: Arc::new(store),
            config: CartStoreConfig::default(),
            on_error: None,
        }
    }

    /// Build a store persisted to files under `dir` and load its cart.
    pub async fn open_file(
        dir: impl Into<PathBuf>,
        config: CartStoreConfig,
    ) -> Result<Self, CartError> {
        let store = FileStore::open(dir).await?;
        let cart = Self::builder(store).with_config(config).build();
        cart.initialize().await;
        Ok(cart)
    }

    /// The store's configuration.
    pub fn config(&self) -> &CartStoreConfig {
        &self.config
    }

    /// Load the persisted cart, replacing the in-memory one.
    ///
    /// Call once at startup. A missing value leaves the cart empty; an
    /// unreadable one is logged and reported, and also leaves it empty.
    /// Single entries that do not decode are skipped and the rest kept.
    pub async fn initialize(&self) -> Hydration {
        let key = &self.config.storage_key;
        match self.cache.get::<Vec<serde_json::Value>>(key).await {
            Ok(Some(entries)) => {
                let cart = Cart::from_items(decode_items(key, entries));
                let count = cart.len();
                self.replace(cart);
                tracing::info!(key = %key, items = count, "restored cart");
                Hydration::Restored(count)
            }
            Ok(None) => {
                tracing::debug!(key = %key, "no stored cart");
                Hydration::Empty
            }
            Err(e) => {
                let error = PersistError::from_read(key, e);
                tracing::warn!(key = %key, error = %error, "ignoring stored cart");
                self.reporter.failed(0, error.clone());
                Hydration::Failed(error)
            }
        }
    }

    /// Put `product` in the cart with a quantity of one.
    ///
    /// A product already in the cart gets a second entry.
    pub fn add_to_cart(&self, product: Product) {
        tracing::debug!(id = %product.id, "add to cart");
        self.mutate(|cart| cart.add_item(product));
    }

    /// Increase the quantity of the item with `id` by one.
    ///
    /// Unknown ids leave the cart as it is.
    pub fn increment(&self, id: impl AsRef<str>) {
        let id = id.as_ref();
        self.mutate(|cart| {
            if !cart.increment(id) {
                tracing::debug!(id, "increment of item not in cart");
            }
        });
    }

    /// Decrease the quantity of the item with `id` by one, removing it when
    /// the quantity would reach zero.
    ///
    /// Unknown ids leave the cart as it is.
    pub fn decrement(&self, id: impl AsRef<str>) {
        let id = id.as_ref();
        self.mutate(|cart| match cart.decrement(id) {
            Decrement::NotFound => tracing::debug!(id, "decrement of item not in cart"),
            Decrement::Removed => tracing::debug!(id, "removed from cart"),
            Decrement::Decreased(quantity) => tracing::trace!(id, quantity, "decremented"),
        });
    }

    /// Current items, in cart order.
    pub fn items(&self) -> Vec<CartItem> {
        self.lock().cart.items().to_vec()
    }

    /// Snapshot of the current cart.
    pub fn cart(&self) -> Cart {
        self.lock().cart.clone()
    }

    /// Watch the item list; the receiver sees every mutation.
    pub fn subscribe(&self) -> watch::Receiver<Vec<CartItem>> {
        self.items_tx.subscribe()
    }

    /// Current persistence status.
    pub fn persist_status(&self) -> PersistStatus {
        self.reporter.current()
    }

    /// Watch persistence status changes.
    pub fn watch_persist_status(&self) -> watch::Receiver<PersistStatus> {
        self.reporter.subscribe()
    }

    /// Wait until every mutation made so far has been written.
    ///
    /// Returns the error of the last write if it failed. A failed startup
    /// read is not a write and does not make this fail.
    pub async fn flush(&self) -> Result<(), PersistError> {
        let (tx, rx) = oneshot::channel();
        self.writer_tx
            .send(PersistCommand::Flush(tx))
            .map_err(|_| PersistError::WriterClosed)?;
        rx.await.map_err(|_| PersistError::WriterClosed)?
    }

    /// Apply `f` to the cart, publish the result and queue it for storage.
    ///
    /// Every mutation queues a write, including no-ops.
    fn mutate<F>(&self, f: F)
    where
        F: FnOnce(&mut Cart),
    {
        let mut state = self.lock();
        f(&mut state.cart);
        state.revision += 1;

        let revision = state.revision;
        let cart = state.cart.clone();
        self.items_tx.send_replace(cart.items().to_vec());
        self.reporter.pending(revision);

        // Sent under the lock so queue order matches revision order.
        let queued = self
            .writer_tx
            .send(PersistCommand::Write(Snapshot { revision, cart }))
            .is_ok();
        drop(state);

        // The error handler may read the store, so it runs unlocked.
        if !queued {
            tracing::error!(revision, "cart writer is gone, change not persisted");
            self.reporter.failed(revision, PersistError::WriterClosed);
        }
    }

    fn replace(&self, cart: Cart) {
        let mut state = self.lock();
        self.items_tx.send_replace(cart.items().to_vec());
        state.cart = cart;
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn decode_items(key: &str, entries: Vec<serde_json::Value>) -> Vec<CartItem> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(key, index, error = %e, "skipping unreadable cart item");
                None
            }
        })
        .collect()
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("config", &self.config)
            .field("items", &self.lock().cart.len())
            .field("status", &self.reporter.current())
            .finish()
    }
}
