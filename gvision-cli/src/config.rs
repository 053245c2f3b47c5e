use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use anyhow::{Result, anyhow};

/// Names the service account key file.
pub const CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";
/// Optional base URL override for the annotation API.
pub const ENDPOINT_ENV: &str = "VISION_API_ENDPOINT";

/// Process environment, read once at startup.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub credentials_path: Option<PathBuf>,
    pub endpoint: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var_os(name))
    }

    /// Builds a config from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        let var = |name: &str| lookup(name).filter(|value| !value.is_empty());
        Self {
            credentials_path: var(CREDENTIALS_ENV).map(PathBuf::from),
            endpoint: var(ENDPOINT_ENV).and_then(|value| value.into_string().ok()),
        }
    }

    pub fn credentials_path(&self) -> Result<&Path> {
        self.credentials_path
            .as_deref()
            .ok_or_else(|| anyhow!("Unable to get env variable: {CREDENTIALS_ENV}"))
    }
}
