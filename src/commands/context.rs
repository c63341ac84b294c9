use anyhow::Result;
use reqwest::Client;
use std::sync::Arc;

use crate::{
    api::{ApiClients, build_http_client},
    cart::Cart,
    config::{BuildConfig, StorefrontPaths},
    env::{EnvProvider, FileEnv, LayeredEnv, ProcessEnv},
    runtime::Runtime,
    session::Session,
    storage::{FileStorage, Storage},
};

/// Everything a command needs: the service clients plus local state.
pub struct Context {
    pub api: ApiClients,
    pub session: Session,
    pub cart: Cart,
}

impl Context {
    /// Runtime snapshot comes from the env file first, then
    /// `STOREFRONT_RUNTIME_*` process variables. Both are re-read per request.
    pub fn new<R: Runtime + Clone + 'static>(
        runtime: R,
        paths: &StorefrontPaths,
        fallback: BuildConfig,
    ) -> Result<Self> {
        let env = LayeredEnv::new()
            .with_layer(Arc::new(FileEnv::new(runtime.clone(), &paths.env_file)))
            .with_layer(Arc::new(ProcessEnv::new(runtime.clone())));
        let storage: Arc<dyn Storage> = Arc::new(FileStorage::new(runtime, &paths.storage_file));

        Ok(Self::from_parts(
            build_http_client()?,
            Arc::new(env),
            fallback,
            storage,
        ))
    }

    pub fn from_parts(
        http: Client,
        env: Arc<dyn EnvProvider>,
        fallback: BuildConfig,
        storage: Arc<dyn Storage>,
    ) -> Self {
        Self {
            api: ApiClients::new(http, env, fallback, storage.clone()),
            session: Session::new(storage.clone()),
            cart: Cart::new(storage),
        }
    }
}
