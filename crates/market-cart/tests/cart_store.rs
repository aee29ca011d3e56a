//! End-to-end behaviour of the cart store against real and scripted stores.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use market_cart::prelude::*;
use market_kv::KvError;

const KEY: &str = "cart.products";

fn shirt() -> Product {
    Product::new("1", "Shirt", "x", 20.0)
}

fn stored(store: &MemoryStore) -> Vec<CartItem> {
    serde_json::from_str(&store.peek(KEY).expect("cart was persisted")).unwrap()
}

/// A store whose writes take longer the earlier they are issued, so
/// unsynchronized writers would finish in reverse order.
#[derive(Default)]
struct SlowStore {
    inner: MemoryStore,
    calls: AtomicU64,
}

#[async_trait]
impl KvStore for SlowStore {
    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), KvError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = 20u64.saturating_sub(call * 5);
        tokio::time::sleep(Duration::from_millis(delay)).await;
        self.inner.set(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<(), KvError> {
        self.inner.delete(key).await
    }
}

#[tokio::test]
async fn test_shirt_scenario_in_memory_and_storage() {
    let store = Arc::new(MemoryStore::new());
    let cart = CartStore::builder(Arc::clone(&store)).build();
    assert_eq!(cart.initialize().await, Hydration::Empty);

    cart.add_to_cart(shirt());
    let items = cart.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id.as_str(), "1");
    assert_eq!(items[0].title, "Shirt");
    assert_eq!(items[0].quantity, 1);

    cart.increment("1");
    assert_eq!(cart.items()[0].quantity, 2);

    cart.decrement("1");
    assert_eq!(cart.items()[0].quantity, 1);

    cart.decrement("1");
    assert!(cart.items().is_empty());

    cart.flush().await.unwrap();
    assert!(stored(&store).is_empty());
}

#[tokio::test]
async fn test_unknown_ids_leave_cart_unchanged() {
    let cart = CartStore::builder(MemoryStore::new()).build();
    cart.add_to_cart(shirt());
    cart.add_to_cart(Product::new("2", "Hat", "y", 5.0));
    let before = cart.items();

    cart.increment("nope");
    assert_eq!(cart.items(), before);

    cart.decrement("nope");
    assert_eq!(cart.items(), before);
}

#[tokio::test]
async fn test_decrement_preserves_other_items_and_order() {
    let cart = CartStore::builder(MemoryStore::new()).build();
    for (id, title) in [("a", "A"), ("b", "B"), ("c", "C")] {
        cart.add_to_cart(Product::new(id, title, "u", 1.0));
    }
    cart.increment("b");
    cart.increment("b");

    cart.decrement("b");
    let view: Vec<_> = cart
        .items()
        .into_iter()
        .map(|i| (i.id.into_inner(), i.quantity))
        .collect();
    assert_eq!(
        view,
        vec![("a".to_string(), 1), ("b".to_string(), 2), ("c".to_string(), 1)]
    );

    cart.decrement("a");
    let ids: Vec<_> = cart.items().into_iter().map(|i| i.id.into_inner()).collect();
    assert_eq!(ids, vec!["b", "c"]);
}

#[tokio::test]
async fn test_quantities_stay_positive_across_operations() {
    let cart = CartStore::builder(MemoryStore::new()).build();
    let ids = ["a", "b", "c"];

    // Deterministic pseudo-random walk over the three operations.
    let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
    for _ in 0..500 {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        let id = ids[(seed % 3) as usize];
        match (seed >> 8) % 3 {
            0 => cart.add_to_cart(Product::new(id, "T", "u", 2.0)),
            1 => cart.increment(id),
            _ => cart.decrement(id),
        }
        assert!(cart.items().iter().all(|i| i.quantity >= 1));
    }
}

#[tokio::test]
async fn test_restart_restores_last_state() {
    let store = Arc::new(MemoryStore::new());
    {
        let cart = CartStore::builder(Arc::clone(&store)).build();
        cart.add_to_cart(shirt());
        cart.add_to_cart(Product::new("2", "Hat", "y", 12.5));
        cart.increment("2");
        cart.increment("2");
        cart.decrement("1");
        cart.flush().await.unwrap();
    }

    let restarted = CartStore::builder(Arc::clone(&store)).build();
    assert_eq!(restarted.initialize().await, Hydration::Restored(1));
    let items = restarted.items();
    assert_eq!(items[0].id.as_str(), "2");
    assert_eq!(items[0].price, 12.5);
    assert_eq!(items[0].quantity, 3);
}

#[tokio::test]
async fn test_last_mutation_wins_with_slow_writes() {
    let store = Arc::new(SlowStore::default());
    let cart = CartStore::builder(Arc::clone(&store)).build();

    cart.add_to_cart(shirt());
    for _ in 0..5 {
        cart.increment("1");
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    cart.add_to_cart(Product::new("2", "Hat", "y", 5.0));
    cart.decrement("1");

    cart.flush().await.unwrap();
    assert_eq!(stored(&store.inner), cart.items());
    assert_eq!(cart.items()[0].quantity, 5);
    assert!(store.inner.write_count() <= 8);
}

#[tokio::test]
async fn test_burst_is_coalesced() {
    let store = Arc::new(MemoryStore::new());
    let cart = CartStore::builder(Arc::clone(&store)).build();

    cart.add_to_cart(shirt());
    for _ in 0..100 {
        cart.increment("1");
    }
    cart.flush().await.unwrap();

    assert_eq!(stored(&store)[0].quantity, 101);
    assert!(store.write_count() < 101);
    assert!(matches!(cart.persist_status(), PersistStatus::Saved { revision: 101 }));
}

#[tokio::test]
async fn test_storage_outage_never_blocks_the_cart() {
    let store = Arc::new(MemoryStore::new());
    store.set_fail_writes(true);
    let cart = CartStore::builder(Arc::clone(&store)).build();
    let mut status = cart.watch_persist_status();

    cart.add_to_cart(shirt());
    cart.increment("1");
    assert_eq!(cart.items()[0].quantity, 2);

    status
        .wait_for(|s| matches!(s, PersistStatus::Failed { .. }))
        .await
        .unwrap();
    assert!(cart.flush().await.is_err());
    assert_eq!(cart.items()[0].quantity, 2);
}

#[tokio::test]
async fn test_provider_scope_drives_shared_store() {
    let store = Arc::new(CartStore::builder(MemoryStore::new()).build());
    let provider = CartProvider::new(Arc::clone(&store));

    assert!(matches!(use_cart(), Err(CartError::MissingProvider)));

    let count = provider
        .scope(async {
            let cart = use_cart()?;
            cart.add_to_cart(shirt());
            cart.increment("1");
            Ok::<_, CartError>(cart.cart().item_count())
        })
        .await
        .unwrap();

    assert_eq!(count, 2);
    assert_eq!(store.items()[0].quantity, 2);
}

#[tokio::test]
async fn test_file_store_survives_restart() {
    let tmp = tempfile::tempdir().unwrap();
    {
        let cart = CartStore::open_file(tmp.path(), CartStoreConfig::default())
            .await
            .unwrap();
        cart.add_to_cart(shirt());
        cart.increment("1");
        cart.flush().await.unwrap();
    }

    let store = FileStore::open(tmp.path()).await.unwrap();
    let cart = CartStore::builder(store).build();
    assert_eq!(cart.initialize().await, Hydration::Restored(1));
    assert_eq!(cart.items()[0].quantity, 2);
}
