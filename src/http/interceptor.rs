//! Pre-dispatch hooks applied to every outgoing request.

use anyhow::Result;
use log::debug;
use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use std::sync::Arc;

use crate::config::{BuildConfig, Service, resolve_base_url};
use crate::env::EnvProvider;
use crate::session::Session;

/// A request that has not been handed to the transport yet.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub service: Service,
    pub method: Method,
    pub path: String,
    pub base_url: Option<String>,
    pub headers: HeaderMap,
}

impl PendingRequest {
    pub fn new(service: Service, method: Method, path: &str, base_url: Option<String>) -> Self {
        Self {
            service,
            method,
            path: path.to_string(),
            base_url,
            headers: HeaderMap::new(),
        }
    }

    /// Target URL. Without a base URL the bare path is returned, which the
    /// transport rejects as relative.
    pub fn url(&self) -> String {
        match &self.base_url {
            Some(base) => format!("{}{}", base, self.path),
            None => self.path.clone(),
        }
    }

    pub fn authorization(&self) -> Option<&str> {
        self.headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
    }
}

pub trait Interceptor: Send + Sync {
    fn intercept(&self, request: &mut PendingRequest) -> Result<()>;
}

/// Re-resolves the base URL against the current snapshot.
///
/// Overrides only when something resolves, so a request keeps the value the
/// client was built with if the snapshot is still empty.
pub struct BaseUrlInterceptor {
    env: Arc<dyn EnvProvider>,
    fallback: BuildConfig,
}

impl BaseUrlInterceptor {
    pub fn new(env: Arc<dyn EnvProvider>, fallback: BuildConfig) -> Self {
        Self { env, fallback }
    }
}

impl Interceptor for BaseUrlInterceptor {
    fn intercept(&self, request: &mut PendingRequest) -> Result<()> {
        let snapshot = self.env.snapshot();
        if let Some(base) = resolve_base_url(&snapshot, &self.fallback, request.service) {
            request.base_url = Some(base);
        }
        Ok(())
    }
}

/// Attaches `Authorization: Bearer <token>` when a session token is stored.
pub struct BearerInterceptor {
    session: Session,
}

impl BearerInterceptor {
    pub fn new(session: Session) -> Self {
        Self { session }
    }
}

impl Interceptor for BearerInterceptor {
    fn intercept(&self, request: &mut PendingRequest) -> Result<()> {
        if let Some(token) = self.session.token()? {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))?;
            value.set_sensitive(true);
            request.headers.insert(AUTHORIZATION, value);
            debug!("Attached bearer token to {} request", request.service);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::SharedEnv;
    use crate::storage::{MemoryStorage, TOKEN_KEY};

    fn pending(service: Service, base_url: Option<&str>) -> PendingRequest {
        PendingRequest::new(service, Method::GET, "/products", base_url.map(String::from))
    }

    #[test]
    fn test_url_join() {
        assert_eq!(
            pending(Service::Product, Some("https://p.example.com")).url(),
            "https://p.example.com/products"
        );
        assert_eq!(pending(Service::Product, None).url(), "/products");
    }

    #[test]
    fn test_base_url_interceptor_overrides_with_snapshot() {
        let env = SharedEnv::from_pairs(&[("PRODUCT_URL", "https://p.example.com/")]);
        let interceptor = BaseUrlInterceptor::new(Arc::new(env), BuildConfig::default());

        let mut request = pending(Service::Product, Some("https://stale.example.com"));
        interceptor.intercept(&mut request).unwrap();

        assert_eq!(request.base_url.as_deref(), Some("https://p.example.com"));
    }

    #[test]
    fn test_base_url_interceptor_keeps_existing_when_nothing_resolves() {
        let interceptor =
            BaseUrlInterceptor::new(Arc::new(SharedEnv::new()), BuildConfig::default());

        let mut request = pending(Service::Order, Some("https://initial.example.com"));
        interceptor.intercept(&mut request).unwrap();
        assert_eq!(
            request.base_url.as_deref(),
            Some("https://initial.example.com")
        );

        let mut request = pending(Service::Order, None);
        interceptor.intercept(&mut request).unwrap();
        assert_eq!(request.base_url, None);
    }

    #[test]
    fn test_base_url_interceptor_sees_late_values() {
        let env = SharedEnv::new();
        let interceptor = BaseUrlInterceptor::new(Arc::new(env.clone()), BuildConfig::default());

        let mut first = pending(Service::Auth, None);
        interceptor.intercept(&mut first).unwrap();
        assert_eq!(first.base_url, None);

        env.set("AUTH_URL", " https://a.example.com/ ");

        let mut second = pending(Service::Auth, None);
        interceptor.intercept(&mut second).unwrap();
        assert_eq!(second.base_url.as_deref(), Some("https://a.example.com"));
    }

    #[test]
    fn test_bearer_interceptor_with_token() {
        let storage = Arc::new(MemoryStorage::with_item(TOKEN_KEY, "jwt-123"));
        let interceptor = BearerInterceptor::new(Session::new(storage));

        let mut request = pending(Service::Order, None);
        interceptor.intercept(&mut request).unwrap();

        assert_eq!(request.authorization(), Some("Bearer jwt-123"));
        assert!(request.headers.get(AUTHORIZATION).unwrap().is_sensitive());
    }

    #[test]
    fn test_bearer_interceptor_without_token() {
        let interceptor = BearerInterceptor::new(Session::new(Arc::new(MemoryStorage::new())));

        let mut request = pending(Service::Order, None);
        interceptor.intercept(&mut request).unwrap();

        assert_eq!(request.authorization(), None);
    }

    #[test]
    fn test_bearer_interceptor_reads_token_each_time() {
        let storage = Arc::new(MemoryStorage::new());
        let session = Session::new(storage.clone());
        let interceptor = BearerInterceptor::new(session.clone());

        let mut before = pending(Service::Auth, None);
        interceptor.intercept(&mut before).unwrap();
        assert_eq!(before.authorization(), None);

        session.store_token("fresh").unwrap();

        let mut after = pending(Service::Auth, None);
        interceptor.intercept(&mut after).unwrap();
        assert_eq!(after.authorization(), Some("Bearer fresh"));
    }

    #[test]
    fn test_bearer_interceptor_rejects_unencodable_token() {
        let storage = Arc::new(MemoryStorage::with_item(TOKEN_KEY, "bad\ntoken"));
        let interceptor = BearerInterceptor::new(Session::new(storage));

        let mut request = pending(Service::Auth, None);
        assert!(interceptor.intercept(&mut request).is_err());
    }
}
