use super::{EnvProvider, EnvSnapshot};
use crate::config::Service;
use crate::runtime::Runtime;

/// Process variables are named `STOREFRONT_RUNTIME_<KEY>`.
pub const PROCESS_ENV_PREFIX: &str = "STOREFRONT_RUNTIME_";

/// Snapshot read from process environment variables on every call.
pub struct ProcessEnv<R: Runtime> {
    runtime: R,
}

impl<R: Runtime> ProcessEnv<R> {
    pub fn new(runtime: R) -> Self {
        Self { runtime }
    }
}

impl<R: Runtime> EnvProvider for ProcessEnv<R> {
    fn snapshot(&self) -> EnvSnapshot {
        Service::ALL
            .iter()
            .filter_map(|service| {
                let key = service.env_key();
                self.runtime
                    .env_var(&format!("{}{}", PROCESS_ENV_PREFIX, key))
                    .ok()
                    .map(|value| (key.to_string(), value))
            })
            .collect()
    }
}
