// ABOUTME: Authenticated gRPC client for the pcbook laptop service.
// ABOUTME: Channel setup, login collaborator, laptop operations, config, and sample data.

pub mod auth_client;
pub mod channel;
pub mod config;
pub mod error;
pub mod laptop_client;
pub mod sample;

pub use auth_client::AuthClient;
pub use channel::{create_channel, ChannelConfig, KeepAliveConfig};
pub use config::ClientConfig;
pub use error::ClientError;
pub use laptop_client::LaptopClient;

use std::sync::Arc;

use pcbook_auth::AuthInterceptor;

/// Dial the server, log in, and build a laptop client with token refresh running.
///
/// The returned interceptor is shared with the laptop client; call
/// [`AuthInterceptor::shutdown`] on it when done.
pub async fn connect(config: &ClientConfig) -> Result<(LaptopClient, AuthInterceptor), ClientError> {
    let channel = create_channel(&ChannelConfig::new(&config.server)).await?;

    let login = AuthClient::new(channel.clone(), &config.username, &config.password)
        .with_timeout(config.call_timeout());
    let auth = AuthInterceptor::new(
        Arc::new(login),
        config.auth_methods(),
        config.refresh_interval(),
    )
    .await?;

    let laptops = LaptopClient::new(channel, auth.clone(), config.call_timeout());
    Ok((laptops, auth))
}
