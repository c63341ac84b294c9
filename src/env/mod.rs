//! Runtime environment snapshot providers.
//!
//! A snapshot maps service keys (`AUTH_URL`, `PRODUCT_URL`, `ORDER_URL`) to
//! base URLs supplied after the binary was built. Providers are consulted on
//! every request, so a value that shows up late is still picked up.

mod file;
mod process;

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

pub use file::FileEnv;
pub use process::{PROCESS_ENV_PREFIX, ProcessEnv};

pub type EnvSnapshot = HashMap<String, String>;

/// Source of the current runtime snapshot.
///
/// Absence of the whole snapshot, or of any key, is valid and yields an empty
/// or partial map. Implementations must not cache across calls.
#[cfg_attr(test, mockall::automock)]
pub trait EnvProvider: Send + Sync {
    fn snapshot(&self) -> EnvSnapshot;
}

/// In-memory snapshot that can be populated after clients were built.
#[derive(Debug, Clone, Default)]
pub struct SharedEnv {
    inner: Arc<RwLock<EnvSnapshot>>,
}

impl SharedEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let env = Self::new();
        for (key, value) in pairs {
            env.set(key, value);
        }
        env
    }

    pub fn set(&self, key: &str, value: &str) {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        guard.insert(key.to_string(), value.to_string());
    }
}

impl EnvProvider for SharedEnv {
    fn snapshot(&self) -> EnvSnapshot {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

/// Ordered stack of providers. Earlier layers win per key; blank values
/// never shadow a later layer.
#[derive(Clone, Default)]
pub struct LayeredEnv {
    layers: Vec<Arc<dyn EnvProvider>>,
}

impl LayeredEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layer(mut self, layer: Arc<dyn EnvProvider>) -> Self {
        self.layers.push(layer);
        self
    }
}

impl EnvProvider for LayeredEnv {
    fn snapshot(&self) -> EnvSnapshot {
        let mut merged = EnvSnapshot::new();
        for layer in &self.layers {
            for (key, value) in layer.snapshot() {
                if value.trim().is_empty() {
                    continue;
                }
                merged.entry(key).or_insert(value);
            }
        }
        merged
    }
}
