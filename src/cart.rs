//! Client-side cart stored as a JSON array under the `cart` key.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::storage::{CART_KEY, Storage};

/// One line of the cart; also the wire shape of an order item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    pub product_id: i64,
    pub qty: u32,
}

#[derive(Clone)]
pub struct Cart {
    storage: Arc<dyn Storage>,
}

impl Cart {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Stored entries in insertion order. Corrupt contents are an error.
    pub fn entries(&self) -> Result<Vec<CartEntry>> {
        let raw = self
            .storage
            .get_item(CART_KEY)
            .context("Failed to read cart")?;

        match raw {
            None => Ok(Vec::new()),
            Some(raw) => serde_json::from_str(&raw).context("Cart contents are not valid JSON"),
        }
    }

    /// Appends `{product_id, qty: 1}`. Repeated adds are separate entries.
    #[tracing::instrument(skip(self))]
    pub fn add(&self, product_id: i64) -> Result<Vec<CartEntry>> {
        let mut entries = self.entries()?;
        entries.push(CartEntry { product_id, qty: 1 });
        self.save(&entries)?;
        Ok(entries)
    }

    pub fn clear(&self) -> Result<()> {
        self.storage
            .remove_item(CART_KEY)
            .context("Failed to clear cart")
    }

    pub fn total_qty(&self) -> Result<u64> {
        Ok(self.entries()?.iter().map(|e| u64::from(e.qty)).sum())
    }

    fn save(&self, entries: &[CartEntry]) -> Result<()> {
        let json = serde_json::to_string(entries)?;
        self.storage
            .set_item(CART_KEY, &json)
            .context("Failed to save cart")
    }
}
