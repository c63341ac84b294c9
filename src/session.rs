//! Session credential kept in persistent storage.
//!
//! The token is opaque. Nothing here tracks expiry; an expired token is sent
//! as-is and the backend answers 401.

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::storage::{Storage, TOKEN_KEY};

#[derive(Clone)]
pub struct Session {
    storage: Arc<dyn Storage>,
}

impl Session {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Current bearer token, if any. An empty stored value counts as absent.
    pub fn token(&self) -> Result<Option<String>> {
        let token = self
            .storage
            .get_item(TOKEN_KEY)
            .context("Failed to read session token")?;
        Ok(token.filter(|t| !t.is_empty()))
    }

    pub fn store_token(&self, token: &str) -> Result<()> {
        self.storage
            .set_item(TOKEN_KEY, token)
            .context("Failed to store session token")
    }

    pub fn clear(&self) -> Result<()> {
        self.storage
            .remove_item(TOKEN_KEY)
            .context("Failed to clear session token")
    }

    pub fn is_authenticated(&self) -> Result<bool> {
        Ok(self.token()?.is_some())
    }
}
