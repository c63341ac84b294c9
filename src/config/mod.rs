//! Logical services, build-time fallback URLs and base URL resolution.
//!
//! Resolution is a pure function of the current runtime snapshot and the
//! build-time fallback. It is re-run before every request by
//! [`crate::http::BaseUrlInterceptor`], so nothing here caches.

mod paths;

use std::fmt;
use std::str::FromStr;

use anyhow::bail;

use crate::env::EnvSnapshot;

pub use paths::{StorefrontPaths, default_config_root};

/// One independently addressable backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    Auth,
    Product,
    Order,
}

impl Service {
    pub const ALL: [Service; 3] = [Service::Auth, Service::Product, Service::Order];

    /// Key under which the runtime snapshot carries this service's base URL.
    pub fn env_key(self) -> &'static str {
        match self {
            Service::Auth => "AUTH_URL",
            Service::Product => "PRODUCT_URL",
            Service::Order => "ORDER_URL",
        }
    }

    /// Key used by `env.js` files written for the web front-end. Honoured
    /// after [`Service::env_key`].
    pub fn web_env_key(self) -> &'static str {
        match self {
            Service::Auth => "VITE_AUTH_URL",
            Service::Product => "VITE_PRODUCT_URL",
            Service::Order => "VITE_ORDER_URL",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Service::Auth => "auth",
            Service::Product => "product",
            Service::Order => "order",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Service {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auth" => Ok(Service::Auth),
            "product" => Ok(Service::Product),
            "order" => Ok(Service::Order),
            _ => bail!("Unknown service '{}'. Expected auth, product or order.", s),
        }
    }
}

/// Base URLs frozen into the build artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildConfig {
    auth: Option<String>,
    product: Option<String>,
    order: Option<String>,
}

impl BuildConfig {
    pub fn new(auth: Option<&str>, product: Option<&str>, order: Option<&str>) -> Self {
        Self {
            auth: auth.map(str::to_string),
            product: product.map(str::to_string),
            order: order.map(str::to_string),
        }
    }

    /// Values injected at compile time through `STOREFRONT_*_URL`.
    pub fn from_build() -> Self {
        Self::new(
            option_env!("STOREFRONT_AUTH_URL"),
            option_env!("STOREFRONT_PRODUCT_URL"),
            option_env!("STOREFRONT_ORDER_URL"),
        )
    }

    pub fn get(&self, service: Service) -> Option<&str> {
        match service {
            Service::Auth => self.auth.as_deref(),
            Service::Product => self.product.as_deref(),
            Service::Order => self.order.as_deref(),
        }
    }
}

/// Trims surrounding whitespace and strips a single trailing slash.
///
/// Returns `None` when nothing is left. `"https://a//"` keeps one slash.
pub fn normalize_base_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let stripped = trimmed.strip_suffix('/').unwrap_or(trimmed);
    if stripped.is_empty() {
        None
    } else {
        Some(stripped.to_string())
    }
}

/// Runtime snapshot first, then the build-time fallback, then nothing.
///
/// Within the snapshot the plain key wins over its `VITE_` spelling. A blank
/// value counts as missing.
pub fn resolve_base_url(
    snapshot: &EnvSnapshot,
    fallback: &BuildConfig,
    service: Service,
) -> Option<String> {
    [service.env_key(), service.web_env_key()]
        .iter()
        .find_map(|key| snapshot.get(*key).and_then(|v| normalize_base_url(v)))
        .or_else(|| fallback.get(service).and_then(normalize_base_url))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(pairs: &[(&str, &str)]) -> EnvSnapshot {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_normalize_strips_single_trailing_slash() {
        assert_eq!(
            normalize_base_url("https://api.example.com/").as_deref(),
            Some("https://api.example.com")
        );
    }

    #[test]
    fn test_normalize_trims_whitespace() {
        assert_eq!(
            normalize_base_url("  https://api.example.com ").as_deref(),
            Some("https://api.example.com")
        );
        assert_eq!(
            normalize_base_url("\thttps://api.example.com/\n").as_deref(),
            Some("https://api.example.com")
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in [
            "https://api.example.com/",
            "  https://api.example.com ",
            "http://localhost:8001/api/",
        ] {
            let once = normalize_base_url(raw).unwrap();
            assert_eq!(normalize_base_url(&once).as_deref(), Some(once.as_str()));
        }
    }

    #[test]
    fn test_normalize_only_strips_one_slash() {
        assert_eq!(
            normalize_base_url("https://api.example.com//").as_deref(),
            Some("https://api.example.com/")
        );
    }

    #[test]
    fn test_normalize_does_not_infer_anything() {
        assert_eq!(
            normalize_base_url("api.example.com").as_deref(),
            Some("api.example.com")
        );
    }

    #[test]
    fn test_normalize_empty_values() {
        assert_eq!(normalize_base_url(""), None);
        assert_eq!(normalize_base_url("   "), None);
        assert_eq!(normalize_base_url("/"), None);
        assert_eq!(normalize_base_url(" / "), None);
    }

    #[test]
    fn test_resolve_prefers_snapshot_over_fallback() {
        let fallback = BuildConfig::new(
            Some("https://fa.example.com"),
            Some("https://fp.example.com"),
            Some("https://fo.example.com"),
        );
        let snap = snapshot(&[
            ("AUTH_URL", "https://a.example.com/"),
            ("PRODUCT_URL", " https://p.example.com"),
            ("ORDER_URL", "https://o.example.com"),
        ]);

        assert_eq!(
            resolve_base_url(&snap, &fallback, Service::Auth).as_deref(),
            Some("https://a.example.com")
        );
        assert_eq!(
            resolve_base_url(&snap, &fallback, Service::Product).as_deref(),
            Some("https://p.example.com")
        );
        assert_eq!(
            resolve_base_url(&snap, &fallback, Service::Order).as_deref(),
            Some("https://o.example.com")
        );
    }

    #[test]
    fn test_resolve_snapshot_without_fallback() {
        let snap = snapshot(&[("PRODUCT_URL", "https://p.example.com/")]);
        assert_eq!(
            resolve_base_url(&snap, &BuildConfig::default(), Service::Product).as_deref(),
            Some("https://p.example.com")
        );
    }

    #[test]
    fn test_resolve_falls_back_when_key_missing() {
        let fallback = BuildConfig::new(None, Some("https://fallback.example.com"), None);
        assert_eq!(
            resolve_base_url(&EnvSnapshot::new(), &fallback, Service::Product).as_deref(),
            Some("https://fallback.example.com")
        );
    }

    #[test]
    fn test_resolve_falls_back_when_snapshot_value_blank() {
        let fallback = BuildConfig::new(Some("https://fallback.example.com/"), None, None);
        let snap = snapshot(&[("AUTH_URL", "  ")]);
        assert_eq!(
            resolve_base_url(&snap, &fallback, Service::Auth).as_deref(),
            Some("https://fallback.example.com")
        );
    }

    #[test]
    fn test_resolve_nothing_configured() {
        for service in Service::ALL {
            assert_eq!(
                resolve_base_url(&EnvSnapshot::new(), &BuildConfig::default(), service),
                None
            );
        }
    }

    #[test]
    fn test_resolve_ignores_other_services_keys() {
        let snap = snapshot(&[("AUTH_URL", "https://a.example.com")]);
        assert_eq!(
            resolve_base_url(&snap, &BuildConfig::default(), Service::Order),
            None
        );
    }

    #[test]
    fn test_service_parsing_and_keys() {
        assert_eq!("auth".parse::<Service>().unwrap(), Service::Auth);
        assert_eq!("Product".parse::<Service>().unwrap(), Service::Product);
        assert_eq!("ORDER".parse::<Service>().unwrap(), Service::Order);
        assert!("payments".parse::<Service>().is_err());

        assert_eq!(Service::Auth.env_key(), "AUTH_URL");
        assert_eq!(Service::Product.env_key(), "PRODUCT_URL");
        assert_eq!(Service::Order.env_key(), "ORDER_URL");
        assert_eq!(Service::Order.to_string(), "order");
        assert_eq!(Service::Product.web_env_key(), "VITE_PRODUCT_URL");
    }

    #[test]
    fn test_resolve_accepts_web_key_spelling() {
        let snap = snapshot(&[("VITE_PRODUCT_URL", "https://p.example.com/")]);
        assert_eq!(
            resolve_base_url(&snap, &BuildConfig::default(), Service::Product).as_deref(),
            Some("https://p.example.com")
        );
    }

    #[test]
    fn test_resolve_plain_key_wins_over_web_key() {
        let snap = snapshot(&[
            ("AUTH_URL", "https://plain.example.com"),
            ("VITE_AUTH_URL", "https://web.example.com"),
        ]);
        assert_eq!(
            resolve_base_url(&snap, &BuildConfig::default(), Service::Auth).as_deref(),
            Some("https://plain.example.com")
        );

        let snap = snapshot(&[("AUTH_URL", " "), ("VITE_AUTH_URL", "https://web.example.com/")]);
        assert_eq!(
            resolve_base_url(&snap, &BuildConfig::default(), Service::Auth).as_deref(),
            Some("https://web.example.com")
        );
    }
}
