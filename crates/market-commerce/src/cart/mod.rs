//! Shopping cart module.
//!
//! Contains the cart, its line items, and the product descriptor they are
//! created from.

mod cart;

pub use cart::{Cart, CartItem, Decrement, Product};
