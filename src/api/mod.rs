//! One client per backend, plus typed wrappers for their endpoints.

mod auth;
mod order;
mod product;

use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::{BuildConfig, Service};
use crate::env::EnvProvider;
use crate::http::ServiceClient;
use crate::storage::Storage;

pub use auth::{AuthApi, MAX_PASSWORD_BYTES, Me, TokenOut, validate_password};
pub use order::{Order, OrderApi, OrderItem, PayResult};
pub use product::{
    ImageUpload, MAX_IMAGE_BYTES, Product, ProductApi, ProductCreate, ProductUpdate,
    resolve_image_url,
};

/// Generic `{"ok": true, ...}` acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Builds the shared reqwest client used by every service client.
pub fn build_http_client() -> Result<Client> {
    let client = Client::builder().user_agent("storefront-cli").build()?;
    Ok(client)
}

/// The three service clients, created once and kept for the process lifetime.
#[derive(Clone)]
pub struct ApiClients {
    auth: ServiceClient,
    product: ServiceClient,
    order: ServiceClient,
}

impl ApiClients {
    pub fn new(
        http: Client,
        env: Arc<dyn EnvProvider>,
        fallback: BuildConfig,
        storage: Arc<dyn Storage>,
    ) -> Self {
        let make = |service| {
            ServiceClient::new(
                service,
                http.clone(),
                env.clone(),
                fallback.clone(),
                storage.clone(),
            )
        };

        Self {
            auth: make(Service::Auth),
            product: make(Service::Product),
            order: make(Service::Order),
        }
    }

    pub fn client(&self, service: Service) -> &ServiceClient {
        match service {
            Service::Auth => &self.auth,
            Service::Product => &self.product,
            Service::Order => &self.order,
        }
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(&self.auth)
    }

    pub fn product(&self) -> ProductApi<'_> {
        ProductApi::new(&self.product)
    }

    pub fn order(&self) -> OrderApi<'_> {
        OrderApi::new(&self.order)
    }
}
