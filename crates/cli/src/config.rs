//! Console configuration, loaded from TOML.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
use vitrine_client::{FileStorage, RejectionPolicy, VitrineClient};

/// Default backend origin.
pub const DEFAULT_BASE_URL: &str = "https://api.firstwin.top";

/// Top-level configuration file.
#[derive(Debug, Deserialize)]
pub struct VitrineConfig {
    /// Backend origin every call is made against.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Origin of the login endpoint, when it differs from `base_url`.
    pub auth_url: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Where the session is persisted between runs.
    pub session_file: Option<PathBuf>,
    /// Consecutive 401/403 answers before the session is dropped (0 disables).
    #[serde(default = "default_logout_after_rejections")]
    pub logout_after_rejections: u32,
}

impl Default for VitrineConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auth_url: None,
            timeout_secs: default_timeout_secs(),
            session_file: None,
            logout_after_rejections: default_logout_after_rejections(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_logout_after_rejections() -> u32 {
    RejectionPolicy::DEFAULT_THRESHOLD
}

impl VitrineConfig {
    /// Load the file at `path`, or the default location when `None`.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_config_path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse config at {}", path.display()))
    }

    pub fn parse(contents: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Apply overrides from the command line or environment. `None` keeps
    /// the file value.
    #[must_use]
    pub fn with_overrides(mut self, base_url: Option<String>, auth_url: Option<String>) -> Self {
        if let Some(base_url) = base_url {
            self.base_url = base_url;
        }
        if auth_url.is_some() {
            self.auth_url = auth_url;
        }
        self
    }

    pub fn session_path(&self) -> PathBuf {
        self.session_file.clone().unwrap_or_else(|| {
            dirs::config_dir()
                .map(|dir| dir.join("vitrine").join("session.json"))
                .unwrap_or_else(|| PathBuf::from(".vitrine-session.json"))
        })
    }

    pub fn rejection_policy(&self) -> RejectionPolicy {
        RejectionPolicy::after(self.logout_after_rejections)
    }

    /// Build a client with file-backed session storage and restore any
    /// persisted session.
    pub fn connect(&self) -> anyhow::Result<VitrineClient> {
        let mut builder = VitrineClient::builder(&self.base_url)
            .timeout(Duration::from_secs(self.timeout_secs))
            .storage(Arc::new(FileStorage::new(self.session_path())))
            .rejection_policy(self.rejection_policy());
        if let Some(auth_url) = &self.auth_url {
            builder = builder.auth_url(auth_url);
        }
        let client = builder.build()?;
        client.session().restore();
        Ok(client)
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("vitrine").join("config.toml"))
}
