//! Cart commands: list, add, inc, dec.

use anyhow::{bail, Context as _, Result};
use market_cart::{CartStore, Product};

use super::{AddArgs, ItemArgs};
use crate::context::Context;

/// Show the cart.
pub async fn list(ctx: &Context) -> Result<()> {
    let cart = ctx.open_cart().await?;
    ctx.output.header("Cart");
    ctx.output.cart(&cart.items());
    Ok(())
}

/// Put a product in the cart.
pub async fn add(args: AddArgs, ctx: &Context) -> Result<()> {
    if !args.price.is_finite() || args.price < 0.0 {
        bail!("Price must be a non-negative number, got {}", args.price);
    }

    let cart = ctx.open_cart().await?;
    let product = Product::new(args.id, args.title, args.image_url, args.price);
    let title = product.title.clone();
    cart.add_to_cart(product);

    save(&cart, ctx).await?;
    ctx.output.success(&format!("Added {} to the cart", title));
    ctx.output.cart(&cart.items());
    Ok(())
}

/// Increase an item's quantity.
pub async fn increment(args: ItemArgs, ctx: &Context) -> Result<()> {
    let cart = ctx.open_cart().await?;
    if cart.cart().get_item(&args.id).is_none() {
        ctx.output.warn(&format!("{} is not in the cart", args.id));
    }
    cart.increment(&args.id);

    save(&cart, ctx).await?;
    ctx.output.cart(&cart.items());
    Ok(())
}

/// Decrease an item's quantity, removing it at zero.
pub async fn decrement(args: ItemArgs, ctx: &Context) -> Result<()> {
    let cart = ctx.open_cart().await?;
    if cart.cart().get_item(&args.id).is_none() {
        ctx.output.warn(&format!("{} is not in the cart", args.id));
    }
    cart.decrement(&args.id);

    save(&cart, ctx).await?;
    ctx.output.cart(&cart.items());
    Ok(())
}

/// Wait for the change to reach storage before the process exits.
async fn save(cart: &CartStore, ctx: &Context) -> Result<()> {
    let spinner = ctx.output.spinner("Saving cart...");
    let result = cart.flush().await;
    spinner.finish_and_clear();
    result.context("Cart change was not saved")
}
