use anyhow::Result;
use std::path::Path;

use super::{Context, format_price, user_error};
use crate::api::{ImageUpload, ProductCreate, ProductUpdate, resolve_image_url};
use crate::config::Service;
use crate::runtime::Runtime;

/// Every product including drafts, with image links resolved against the
/// product service.
#[tracing::instrument(skip(ctx))]
pub async fn admin_list(ctx: &Context) -> Result<()> {
    let products = ctx
        .api
        .product()
        .admin_list()
        .await
        .map_err(|e| user_error(e, "Admin load failed (login as admin?)"))?;

    if products.is_empty() {
        println!("No products yet.");
        return Ok(());
    }

    let base_url = ctx.api.client(Service::Product).current_base_url();
    for product in &products {
        let state = if product.published { "published" } else { "draft" };
        println!(
            "#{:<5} {:<30} {:<10} {}",
            product.id,
            product.name,
            format_price(product.price),
            state
        );
        if let Some(url) = resolve_image_url(product.image_url.as_deref(), base_url.as_deref()) {
            println!("       image: {}", url);
        }
    }
    Ok(())
}

#[tracing::instrument(skip(ctx, description))]
pub async fn admin_create(
    ctx: &Context,
    name: &str,
    description: &str,
    price: f64,
    draft: bool,
) -> Result<()> {
    let product = ProductCreate::new(name, description, price, !draft)
        .map_err(|e| user_error(e, "Create failed"))?;

    let created = ctx
        .api
        .product()
        .create(&product)
        .await
        .map_err(|e| user_error(e, "Create failed"))?;

    println!("Created product #{} {}", created.id, created.name);
    Ok(())
}

#[tracing::instrument(skip(ctx))]
pub async fn admin_set_published(ctx: &Context, id: i64, published: bool) -> Result<()> {
    let product = ctx
        .api
        .product()
        .update(id, &ProductUpdate::published(published))
        .await
        .map_err(|e| user_error(e, "Update failed"))?;

    let state = if product.published { "published" } else { "draft" };
    println!("Product #{} is now {}", product.id, state);
    Ok(())
}

#[tracing::instrument(skip(ctx))]
pub async fn admin_delete(ctx: &Context, id: i64) -> Result<()> {
    ctx.api
        .product()
        .delete(id)
        .await
        .map_err(|e| user_error(e, "Delete failed"))?;

    println!("Deleted product #{}", id);
    Ok(())
}

#[tracing::instrument(skip(ctx, runtime))]
pub async fn admin_upload_image<R: Runtime>(
    ctx: &Context,
    runtime: &R,
    id: i64,
    path: &Path,
) -> Result<()> {
    let image = ImageUpload::from_path(runtime, path)?;
    ctx.api
        .product()
        .upload_image(id, image)
        .await
        .map_err(|e| user_error(e, "Image upload failed"))?;

    println!("Uploaded image for product #{}", id);
    Ok(())
}
