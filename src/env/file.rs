use log::debug;
use serde_json::Value;
use std::path::{Path, PathBuf};

use super::{EnvProvider, EnvSnapshot};
use crate::runtime::Runtime;

/// Assignment prefix used by deployments that ship the snapshot as `env.js`.
const SCRIPT_PREFIX: &str = "window.__ENV__";

/// Snapshot read from a file dropped next to the deployment.
///
/// The file is re-read on every call. Accepts a plain JSON object or the
/// `window.__ENV__ = { ... };` script form.
pub struct FileEnv<R: Runtime> {
    runtime: R,
    path: PathBuf,
}

impl<R: Runtime> FileEnv<R> {
    pub fn new(runtime: R, path: impl Into<PathBuf>) -> Self {
        Self {
            runtime,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<R: Runtime> EnvProvider for FileEnv<R> {
    #[tracing::instrument(skip(self))]
    fn snapshot(&self) -> EnvSnapshot {
        if !self.runtime.exists(&self.path) {
            return EnvSnapshot::new();
        }

        let text = match self.runtime.read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) => {
                debug!("Ignoring unreadable env file {}: {:#}", self.path.display(), e);
                return EnvSnapshot::new();
            }
        };

        parse_env_document(&text).unwrap_or_else(|| {
            debug!("Ignoring malformed env file {}", self.path.display());
            EnvSnapshot::new()
        })
    }
}

/// Parses the snapshot document. Non-string values are dropped.
pub(crate) fn parse_env_document(text: &str) -> Option<EnvSnapshot> {
    let mut body = text.trim();
    if let Some(rest) = body.strip_prefix(SCRIPT_PREFIX) {
        body = rest.trim_start().strip_prefix('=')?.trim();
        body = body.strip_suffix(';').unwrap_or(body).trim_end();
    }

    match serde_json::from_str::<Value>(body).ok()? {
        Value::Object(map) => Some(
            map.into_iter()
                .filter_map(|(k, v)| match v {
                    Value::String(s) => Some((k, s)),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    }
}
