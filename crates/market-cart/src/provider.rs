//! Scoped access to a shared cart store.
//!
//! Views that cannot be handed the store directly look it up with
//! [`use_cart`], which only succeeds inside a [`CartProvider`] scope.

use std::future::Future;
use std::sync::Arc;

use crate::error::CartError;
use crate::store::CartStore;

tokio::task_local! {
    static CURRENT_CART: Arc<CartStore>;
}

/// Makes a [`CartStore`] reachable through [`use_cart`] for the duration of
/// a scope.
#[derive(Debug, Clone)]
pub struct CartProvider {
    store: Arc<CartStore>,
}

impl CartProvider {
    /// Wrap a shared store.
    pub fn new(store: Arc<CartStore>) -> Self {
        Self { store }
    }

    /// The provided store.
    pub fn store(&self) -> &Arc<CartStore> {
        &self.store
    }

    /// Run `fut` with the store in scope.
    pub async fn scope<F>(&self, fut: F) -> F::Output
    where
        F: Future,
    {
        CURRENT_CART.scope(Arc::clone(&self.store), fut).await
    }

    /// Run `f` synchronously with the store in scope.
    pub fn sync_scope<R>(&self, f: impl FnOnce() -> R) -> R {
        CURRENT_CART.sync_scope(Arc::clone(&self.store), f)
    }
}

/// Get the store of the enclosing [`CartProvider`] scope.
///
/// Fails with [`CartError::MissingProvider`] when called outside of one.
pub fn use_cart() -> Result<Arc<CartStore>, CartError> {
    CURRENT_CART
        .try_with(Arc::clone)
        .map_err(|_| CartError::MissingProvider)
}
