use anyhow::{Result, bail};
use log::debug;

use super::{Context, format_price, user_error};
use crate::api::{Order, Product};

fn print_product(product: &Product) {
    println!("#{:<5} {:<30} {}", product.id, product.name, format_price(product.price));
}

fn print_order(order: &Order) {
    println!("Order #{}  status: {}  total: {}", order.id, order.status, format_price(order.total));
    for item in &order.items {
        println!(
            "  product #{:<5} x{:<3} {}",
            item.product_id,
            item.qty,
            format_price(item.unit_price)
        );
    }
}

/// Lists published products.
#[tracing::instrument(skip(ctx))]
pub async fn products(ctx: &Context) -> Result<()> {
    let products = ctx
        .api
        .product()
        .list()
        .await
        .map_err(|e| user_error(e, "Failed to load products"))?;

    if products.is_empty() {
        println!("No products yet.");
        return Ok(());
    }
    for product in &products {
        print_product(product);
    }
    Ok(())
}

#[tracing::instrument(skip(ctx))]
pub async fn product(ctx: &Context, id: i64) -> Result<()> {
    let product = ctx
        .api
        .product()
        .get(id)
        .await
        .map_err(|e| user_error(e, "Failed to load product"))?;

    print_product(&product);
    if !product.description.is_empty() {
        println!("  {}", product.description);
    }
    Ok(())
}

/// Checks the product exists, then appends it to the local cart.
#[tracing::instrument(skip(ctx))]
pub async fn add_to_cart(ctx: &Context, id: i64) -> Result<()> {
    let product = ctx
        .api
        .product()
        .get(id)
        .await
        .map_err(|e| user_error(e, "Failed to load product"))?;

    let entries = ctx.cart.add(product.id)?;
    debug!("Cart now has {} entries", entries.len());

    println!("Added {} to cart.", product.name);
    Ok(())
}

pub fn show_cart(ctx: &Context) -> Result<()> {
    let entries = ctx.cart.entries()?;
    if entries.is_empty() {
        println!("Your cart is empty.");
        return Ok(());
    }

    for entry in &entries {
        println!("product #{:<5} x{}", entry.product_id, entry.qty);
    }
    println!("{} item(s)", ctx.cart.total_qty()?);
    Ok(())
}

pub fn clear_cart(ctx: &Context) -> Result<()> {
    ctx.cart.clear()?;
    println!("Cart cleared.");
    Ok(())
}

/// Places an order from the cart. The cart is cleared only on success.
#[tracing::instrument(skip(ctx))]
pub async fn checkout(ctx: &Context) -> Result<()> {
    let entries = ctx.cart.entries()?;
    if entries.is_empty() {
        bail!("Your cart is empty.");
    }

    let order = ctx
        .api
        .order()
        .create(&entries)
        .await
        .map_err(|e| user_error(e, "Checkout failed"))?;

    ctx.cart.clear()?;
    print_order(&order);
    println!("Pay with: storefront pay {}", order.id);
    Ok(())
}

#[tracing::instrument(skip(ctx))]
pub async fn order(ctx: &Context, id: i64) -> Result<()> {
    let order = ctx
        .api
        .order()
        .get(id)
        .await
        .map_err(|e| user_error(e, "Failed to load order"))?;

    print_order(&order);
    Ok(())
}

#[tracing::instrument(skip(ctx))]
pub async fn pay(ctx: &Context, id: i64) -> Result<()> {
    let result = ctx
        .api
        .order()
        .pay(id)
        .await
        .map_err(|e| user_error(e, "Payment failed"))?;

    println!("Order #{} is now {}", id, result.status);
    Ok(())
}
