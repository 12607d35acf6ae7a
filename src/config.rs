//! Client configuration

use crate::error::{ClientError, Result};
use crate::token_store::{TokenStore, DEFAULT_STORAGE_KEY};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_ROOT: &str = "http://127.0.0.1:8000/api/v1";

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root every request path is appended to (no trailing slash needed)
    pub api_root: String,

    /// Timeout applied to every HTTP call, in seconds
    /// Default: 30 seconds
    pub timeout_secs: u64,

    /// Directory for the persisted token pair. `None` keeps tokens in memory.
    pub token_dir: Option<PathBuf>,

    /// Storage key the token pair is kept under
    pub storage_key: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_root: DEFAULT_API_ROOT.to_string(),
            timeout_secs: 30,
            token_dir: None,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(api_root: impl Into<String>) -> Self {
        Self {
            api_root: api_root.into(),
            ..Self::default()
        }
    }

    /// Defaults overridden by `AAROGYA_API_ROOT`, `AAROGYA_TIMEOUT_SECS`
    /// and `AAROGYA_TOKEN_DIR`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(root) = lookup("AAROGYA_API_ROOT") {
            config.api_root = root;
        }
        if let Some(timeout) = lookup("AAROGYA_TIMEOUT_SECS") {
            config.timeout_secs = timeout.trim().parse().map_err(|e| {
                ClientError::Configuration(format!("AAROGYA_TIMEOUT_SECS must be a number of seconds: {e}"))
            })?;
        }
        if let Some(dir) = lookup("AAROGYA_TOKEN_DIR") {
            config.token_dir = Some(PathBuf::from(dir));
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let root = self.api_root.trim();
        if !(root.starts_with("http://") || root.starts_with("https://")) {
            return Err(ClientError::Configuration(format!(
                "API root must be an http(s) URL, got {root:?}"
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ClientError::Configuration("Timeout must be at least one second".to_string()));
        }
        if self.storage_key.trim().is_empty() {
            return Err(ClientError::Configuration("Storage key must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Absolute URL for an API path such as `/auth/login/`
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_root.trim().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Token store described by this configuration
    pub fn token_store(&self) -> Result<TokenStore> {
        match &self.token_dir {
            Some(dir) => Ok(TokenStore::new(
                crate::token_store::FileStorage::new(dir)?,
                self.storage_key.clone(),
            )),
            None => Ok(TokenStore::new(
                crate::token_store::MemoryStorage::new(),
                self.storage_key.clone(),
            )),
        }
    }
}
