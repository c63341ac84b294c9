//! Long-lived client for one logical service.

use log::{debug, warn};
use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use super::error::ApiError;
use super::interceptor::{BaseUrlInterceptor, BearerInterceptor, Interceptor, PendingRequest};
use crate::config::{BuildConfig, Service, resolve_base_url};
use crate::env::EnvProvider;
use crate::session::Session;
use crate::storage::Storage;

/// HTTP client bound to a service whose base URL may change between
/// construction and any given request.
///
/// Every request runs the interceptor chain right before dispatch: the base
/// URL is re-resolved against the current snapshot, then the stored session
/// token is attached.
#[derive(Clone)]
pub struct ServiceClient {
    service: Service,
    client: Client,
    env: Arc<dyn EnvProvider>,
    fallback: BuildConfig,
    initial_base_url: Option<String>,
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl ServiceClient {
    /// Never fails. Without a resolvable base URL a warning is logged and
    /// requests fail at the transport until the snapshot is populated.
    #[tracing::instrument(skip(client, env, fallback, storage))]
    pub fn new(
        service: Service,
        client: Client,
        env: Arc<dyn EnvProvider>,
        fallback: BuildConfig,
        storage: Arc<dyn Storage>,
    ) -> Self {
        let initial_base_url = resolve_base_url(&env.snapshot(), &fallback, service);
        match &initial_base_url {
            Some(base) => debug!("{} API base URL: {}", service, base),
            None => warn!(
                "{} API base URL is empty; set {} in the runtime env or rebuild with a fallback",
                service,
                service.env_key()
            ),
        }

        Self {
            service,
            client,
            env: env.clone(),
            fallback: fallback.clone(),
            initial_base_url,
            interceptors: vec![
                Arc::new(BaseUrlInterceptor::new(env, fallback)),
                Arc::new(BearerInterceptor::new(Session::new(storage))),
            ],
        }
    }

    pub fn service(&self) -> Service {
        self.service
    }

    /// Base URL resolved when the client was built.
    pub fn initial_base_url(&self) -> Option<&str> {
        self.initial_base_url.as_deref()
    }

    /// Base URL a request dispatched now would use. Does not touch the
    /// session, so it works without readable storage.
    pub fn current_base_url(&self) -> Option<String> {
        resolve_base_url(&self.env.snapshot(), &self.fallback, self.service)
            .or_else(|| self.initial_base_url.clone())
    }

    /// Builds the pending request and runs every interceptor on it.
    pub fn prepare(&self, method: Method, path: &str) -> Result<PendingRequest, ApiError> {
        let mut request =
            PendingRequest::new(self.service, method, path, self.initial_base_url.clone());
        for interceptor in &self.interceptors {
            interceptor
                .intercept(&mut request)
                .map_err(|e| ApiError::Prepare(format!("{:#}", e)))?;
        }
        Ok(request)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(Method::GET, path, |rb| rb).await?;
        read_json(response).await
    }

    #[tracing::instrument(skip(self, query))]
    pub async fn get_json_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let response = self.send(Method::GET, path, |rb| rb.query(query)).await?;
        read_json(response).await
    }

    #[tracing::instrument(skip(self, body))]
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(Method::POST, path, |rb| rb.json(body)).await?;
        read_json(response).await
    }

    #[tracing::instrument(skip(self, body))]
    pub async fn patch_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(Method::PATCH, path, |rb| rb.json(body)).await?;
        read_json(response).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(Method::DELETE, path, |rb| rb).await?;
        read_json(response).await
    }

    /// Multipart POST; reqwest sets the boundary content type.
    #[tracing::instrument(skip(self, form))]
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, ApiError> {
        let response = self
            .send(Method::POST, path, |rb| rb.multipart(form))
            .await?;
        read_json(response).await
    }

    async fn send<F>(&self, method: Method, path: &str, build: F) -> Result<Response, ApiError>
    where
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let request = self.prepare(method, path)?;
        let url = request.url();
        debug!("{} {} ({} API)", request.method, url, self.service);

        let builder = self
            .client
            .request(request.method, &url)
            .headers(request.headers);

        build(builder)
            .send()
            .await
            .map_err(|e| ApiError::Transport(format!("{} ({})", e, url)))
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let err = ApiError::from_status(status, &body);
        debug!("Request failed: {}", err);
        return Err(err);
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}
