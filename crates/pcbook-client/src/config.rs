// ABOUTME: Client configuration loaded from ~/.config/pcbook/client.toml
// ABOUTME: Server address, credentials, refresh timing, and the authenticated method table

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use pcbook_auth::AuthMethods;
use pcbook_proto::methods;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Default pcbook server address
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:8080";

/// Client configuration. Missing keys fall back to [`ClientConfig::default`].
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Server address (e.g., "http://localhost:8080")
    pub server: String,

    pub username: String,

    pub password: String,

    /// Seconds between token refreshes
    pub refresh_interval_secs: u64,

    /// Deadline applied to every RPC
    pub call_timeout_secs: u64,

    /// Fully-qualified method -> whether it needs a bearer token
    pub auth_methods: BTreeMap<String, bool>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            username: "admin1".to_string(),
            password: "secret".to_string(),
            refresh_interval_secs: 30,
            call_timeout_secs: 5,
            auth_methods: methods::AUTHENTICATED
                .iter()
                .map(|method| (method.to_string(), true))
                .collect(),
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("server", &self.server)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("refresh_interval_secs", &self.refresh_interval_secs)
            .field("call_timeout_secs", &self.call_timeout_secs)
            .field("auth_methods", &self.auth_methods)
            .finish()
    }
}

impl ClientConfig {
    /// Returns the config directory path (~/.config/pcbook)
    pub fn config_dir() -> Result<PathBuf, ClientError> {
        let home = dirs::home_dir()
            .ok_or_else(|| ClientError::Config("could not determine home directory".into()))?;
        Ok(home.join(".config").join("pcbook"))
    }

    /// Returns the path to the client config file
    pub fn config_path() -> Result<PathBuf, ClientError> {
        Ok(Self::config_dir()?.join("client.toml"))
    }

    /// Load from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ClientError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .map_err(|e| ClientError::Config(format!("failed to read {}: {}", path.display(), e)))?;
        Self::parse(&content)
    }

    /// Load from the default location.
    pub fn load_default() -> Result<Self, ClientError> {
        Self::load(&Self::config_path()?)
    }

    pub fn parse(content: &str) -> Result<Self, ClientError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ClientError::Config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ClientError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .map_err(|e| ClientError::Config(format!("failed to create config dir: {}", e)))?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| ClientError::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(path, content)
            .map_err(|e| ClientError::Config(format!("failed to write config: {}", e)))
    }

    fn validate(&self) -> Result<(), ClientError> {
        if self.refresh_interval_secs == 0 {
            return Err(ClientError::Config(
                "refresh_interval_secs must be greater than zero".into(),
            ));
        }
        if self.call_timeout_secs == 0 {
            return Err(ClientError::Config(
                "call_timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Apply command-line or environment overrides.
    pub fn with_overrides(
        mut self,
        server: Option<String>,
        username: Option<String>,
        password: Option<String>,
    ) -> Self {
        if let Some(server) = server {
            self.server = server;
        }
        if let Some(username) = username {
            self.username = username;
        }
        if let Some(password) = password {
            self.password = password;
        }
        self
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    /// Entries enabled for auth that name no pcbook method.
    pub fn unknown_auth_methods(&self) -> Vec<&str> {
        self.auth_methods
            .iter()
            .filter(|(method, required)| **required && !methods::is_known(method))
            .map(|(method, _)| method.as_str())
            .collect()
    }

    /// Build the authenticated method set. Unknown names are kept but logged,
    /// since they will never match a real call.
    pub fn auth_methods(&self) -> AuthMethods {
        for method in self.unknown_auth_methods() {
            tracing::warn!(method, "auth_methods entry does not name a pcbook method");
        }
        AuthMethods::from_config(
            self.auth_methods
                .iter()
                .map(|(method, required)| (method.clone(), *required)),
        )
    }
}
