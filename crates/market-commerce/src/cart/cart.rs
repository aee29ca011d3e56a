//! Cart and line item types.

use crate::ids::ProductId;
use serde::{Deserialize, Serialize};

/// A product as offered by the catalog, before it is put in a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Catalog identifier.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Product image location.
    pub image_url: String,
    /// Unit price.
    pub price: f64,
}

impl Product {
    /// Create a product descriptor.
    pub fn new(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price,
        }
    }
}

/// A line item in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    /// Product ID.
    pub id: ProductId,
    /// Product title (denormalized for display).
    pub title: String,
    /// Product image location.
    pub image_url: String,
    /// Unit price.
    pub price: f64,
    /// Quantity, at least 1 while the item is in a cart.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl CartItem {
    /// Create a line item for `product` with a quantity of one.
    pub fn from_product(product: Product) -> Self {
        Self {
            id: product.id,
            title: product.title,
            image_url: product.image_url,
            price: product.price,
            quantity: 1,
        }
    }
}

/// Outcome of [`Cart::decrement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decrement {
    /// No item had the requested id.
    NotFound,
    /// The first matching item now has this quantity.
    Decreased(u32),
    /// The item was at quantity 1 and has been removed.
    Removed,
}

/// A shopping cart: an ordered list of line items.
///
/// Every item in a cart has a quantity of at least 1. Items are kept in
/// insertion order and mutations never reorder the survivors.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from previously stored items.
    ///
    /// Items with a quantity of zero are dropped.
    pub fn from_items(items: impl IntoIterator<Item = CartItem>) -> Self {
        Self {
            items: items.into_iter().filter(|i| i.quantity >= 1).collect(),
        }
    }

    /// Append `product` with a quantity of one.
    ///
    /// No check is made against existing items: adding a product that is
    /// already in the cart creates a second entry with the same id.
    pub fn add_item(&mut self, product: Product) {
        self.items.push(CartItem::from_product(product));
    }

    /// Increase the quantity of every item with `id` by one.
    ///
    /// Returns `false` if no item matched, in which case the cart is untouched.
    pub fn increment(&mut self, id: &str) -> bool {
        let mut matched = false;
        for item in self.items.iter_mut().filter(|i| i.id == *id) {
            item.quantity = item.quantity.saturating_add(1);
            matched = true;
        }
        matched
    }

    /// Decrease the quantity of the first item with `id` by one.
    ///
    /// When that item is at quantity 1, every item with `id` is removed
    /// instead.
    pub fn decrement(&mut self, id: &str) -> Decrement {
        let Some(item) = self.items.iter_mut().find(|i| i.id == *id) else {
            return Decrement::NotFound;
        };

        if item.quantity <= 1 {
            self.items.retain(|i| i.id != *id);
            Decrement::Removed
        } else {
            item.quantity -= 1;
            Decrement::Decreased(item.quantity)
        }
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Consume the cart and return its items.
    pub fn into_items(self) -> Vec<CartItem> {
        self.items
    }

    /// Get the first item with `id`.
    pub fn get_item(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id == *id)
    }

    /// Get total item count (sum of quantities).
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Number of line items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
