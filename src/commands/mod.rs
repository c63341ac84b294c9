//! Command implementations behind the `storefront` binary.
//!
//! Each command maps a failed backend call to the backend's `detail` message
//! when there is one, and to a fixed per-command message otherwise.

use anyhow::anyhow;
use log::warn;

use crate::http::ApiError;

mod account;
mod admin;
mod context;
mod endpoints;
mod shop;

pub use account::{login, logout, register, verify, whoami};
pub use admin::{admin_create, admin_delete, admin_list, admin_set_published, admin_upload_image};
pub use context::Context;
pub use endpoints::endpoints;
pub use shop::{add_to_cart, checkout, clear_cart, order, pay, product, products, show_cart};

/// Turns a backend failure into the message shown to the user.
pub(crate) fn user_error(err: ApiError, fallback: &str) -> anyhow::Error {
    if err.detail().is_none() {
        warn!("{}", err);
    }
    anyhow!(err.user_message(fallback))
}

pub(crate) fn format_price(price: f64) -> String {
    format!("${:.2}", price)
}

/// A context whose three services all point at `url`, backed by memory storage.
#[cfg(test)]
pub(crate) fn test_context(
    url: &str,
) -> (Context, std::sync::Arc<crate::storage::MemoryStorage>) {
    use crate::config::BuildConfig;
    use crate::env::SharedEnv;
    use crate::storage::MemoryStorage;
    use std::sync::Arc;

    let env = SharedEnv::from_pairs(&[("AUTH_URL", url), ("PRODUCT_URL", url), ("ORDER_URL", url)]);
    let storage = Arc::new(MemoryStorage::new());
    let ctx = Context::from_parts(
        reqwest::Client::new(),
        Arc::new(env),
        BuildConfig::default(),
        storage.clone(),
    );
    (ctx, storage)
}
