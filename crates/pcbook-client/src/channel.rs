// ABOUTME: gRPC channel creation for the pcbook server connection.
// ABOUTME: Adds a scheme to bare host:port addresses and applies keep-alive and TLS settings.

use std::time::Duration;
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};

use crate::error::ClientError;

/// Configuration for gRPC channel keep-alive behavior.
#[derive(Debug, Clone)]
pub struct KeepAliveConfig {
    pub interval: Duration,
    pub timeout: Duration,
    pub while_idle: bool,
}

impl Default for KeepAliveConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            timeout: Duration::from_secs(20),
            while_idle: true,
        }
    }
}

/// Configuration for creating a gRPC channel.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Server address, e.g. "http://localhost:8080" or "0.0.0.0:8080".
    pub address: String,
    /// Keep-alive configuration. If None, keep-alive is disabled.
    pub keep_alive: Option<KeepAliveConfig>,
    pub connect_timeout: Option<Duration>,
    pub use_tls: bool,
}

impl ChannelConfig {
    /// Addresses without a scheme get `http://`; `https://` enables TLS.
    pub fn new(address: impl Into<String>) -> Self {
        let addr = Self::with_scheme(address.into().trim());
        let use_tls = addr.to_lowercase().starts_with("https://");
        Self {
            address: addr,
            keep_alive: Some(KeepAliveConfig::default()),
            connect_timeout: Some(Duration::from_secs(10)),
            use_tls,
        }
    }

    fn with_scheme(addr: &str) -> String {
        if addr.is_empty() || addr.contains("://") {
            addr.to_string()
        } else {
            format!("http://{}", addr)
        }
    }

    pub fn without_keep_alive(mut self) -> Self {
        self.keep_alive = None;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }
}

/// Connect to the pcbook server.
pub async fn create_channel(config: &ChannelConfig) -> Result<Channel, ClientError> {
    let mut endpoint = Endpoint::from_shared(config.address.clone())
        .map_err(|e| ClientError::InvalidAddress(e.to_string()))?;

    if config.use_tls {
        endpoint = endpoint
            .tls_config(ClientTlsConfig::new())
            .map_err(|e| ClientError::ConnectionFailed(format!("TLS config error: {}", e)))?;
    }

    if let Some(ka) = &config.keep_alive {
        endpoint = endpoint
            .http2_keep_alive_interval(ka.interval)
            .keep_alive_timeout(ka.timeout)
            .keep_alive_while_idle(ka.while_idle);
    }

    if let Some(timeout) = config.connect_timeout {
        endpoint = endpoint.connect_timeout(timeout);
    }

    let channel = endpoint.connect().await?;

    tracing::debug!(
        address = %config.address,
        use_tls = config.use_tls,
        "dialed server"
    );

    Ok(channel)
}
