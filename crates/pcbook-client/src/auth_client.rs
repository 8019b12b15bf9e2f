// ABOUTME: Login collaborator backed by the pcbook AuthService.
// ABOUTME: Exchanges the configured username and password for a fresh access token.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use pcbook_auth::{AuthError, Login};
use pcbook_proto::client::AuthServiceClient;
use pcbook_proto::LoginRequest;
use tonic::transport::Channel;
use tonic::Request;

/// Calls `/pcbook.AuthService/Login` with fixed credentials.
#[derive(Clone)]
pub struct AuthClient {
    service: AuthServiceClient<Channel>,
    username: String,
    password: String,
    timeout: Duration,
}

impl AuthClient {
    pub fn new(channel: Channel, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            service: AuthServiceClient::new(channel),
            username: username.into(),
            password: password.into(),
            timeout: Duration::from_secs(5),
        }
    }

    /// Deadline for each login call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Debug for AuthClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthClient")
            .field("username", &self.username)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Login for AuthClient {
    async fn login(&self) -> Result<String, AuthError> {
        let mut request = Request::new(LoginRequest {
            username: self.username.clone(),
            password: self.password.clone(),
        });
        request.set_timeout(self.timeout);

        let mut service = self.service.clone();
        let response = service.login(request).await?;
        tracing::debug!(username = %self.username, "logged in");
        Ok(response.into_inner().access_token)
    }
}
