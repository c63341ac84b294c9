use anyhow::{Context, Result};
use log::debug;
use std::path::PathBuf;

use crate::runtime::Runtime;

const APP_DIR: &str = "storefront";
const ENV_FILE: &str = "env.json";
const STORAGE_FILE: &str = "storage.json";

/// Locations of the runtime env file and the persistent storage file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontPaths {
    pub env_file: PathBuf,
    pub storage_file: PathBuf,
}

impl StorefrontPaths {
    /// Explicit paths win; anything left unset lands in the default config root.
    #[tracing::instrument(skip(runtime))]
    pub fn resolve<R: Runtime>(
        runtime: &R,
        env_file: Option<PathBuf>,
        storage_file: Option<PathBuf>,
    ) -> Result<Self> {
        let paths = match (env_file, storage_file) {
            (Some(env_file), Some(storage_file)) => Self {
                env_file,
                storage_file,
            },
            (env_file, storage_file) => {
                let root = default_config_root(runtime)?;
                Self {
                    env_file: env_file.unwrap_or_else(|| root.join(ENV_FILE)),
                    storage_file: storage_file.unwrap_or_else(|| root.join(STORAGE_FILE)),
                }
            }
        };

        debug!(
            "Using env file {} and storage file {}",
            paths.env_file.display(),
            paths.storage_file.display()
        );
        Ok(paths)
    }
}

/// `<config_dir>/storefront`
#[tracing::instrument(skip(runtime))]
pub fn default_config_root<R: Runtime>(runtime: &R) -> Result<PathBuf> {
    let config_dir = runtime
        .config_dir()
        .context("Could not find configuration directory")?;
    Ok(config_dir.join(APP_DIR))
}
