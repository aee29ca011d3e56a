//! Cart domain types and logic for the market storefront.
//!
//! This crate holds the pure, synchronous part of the cart:
//!
//! - **Products**: catalog descriptors that can be put in a cart
//! - **Cart**: ordered line items with add / increment / decrement rules
//!
//! Persistence lives in `market-cart`; nothing here performs I/O.
//!
//! # Example
//!
//! ```rust
//! use market_commerce::{Cart, Product};
//!
//! let mut cart = Cart::new();
//! cart.add_item(Product::new("1", "Shirt", "https://img.example/shirt.png", 20.0));
//! cart.increment("1");
//! assert_eq!(cart.item_count(), 2);
//! ```

pub mod ids;

pub mod cart;

pub use cart::{Cart, CartItem, Decrement, Product};
pub use ids::ProductId;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::ids::ProductId;

    // Cart
    pub use crate::cart::{Cart, CartItem, Decrement, Product};
}
