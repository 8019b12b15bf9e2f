// ABOUTME: Error types for the pcbook-auth crate.
// ABOUTME: Covers login failures, unusable tokens, and bad construction parameters.

use thiserror::Error;

/// Errors produced while acquiring or validating a bearer token.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The auth server rejected the login call.
    #[error("login rejected: {0}")]
    Login(#[from] tonic::Status),

    /// The login collaborator failed for a reason other than an RPC status.
    #[error("login failed: {0}")]
    LoginFailed(String),

    /// The token cannot be sent as an `authorization` metadata value.
    #[error("access token is empty or not a valid metadata value")]
    InvalidToken,

    /// The nominal refresh interval was zero.
    #[error("refresh interval must be greater than zero")]
    ZeroInterval,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AuthError::LoginFailed("connection reset".to_string());
        assert_eq!(err.to_string(), "login failed: connection reset");

        let err = AuthError::InvalidToken;
        assert!(err.to_string().contains("not a valid metadata value"));

        let err = AuthError::ZeroInterval;
        assert_eq!(err.to_string(), "refresh interval must be greater than zero");
    }

    #[test]
    fn test_from_tonic_status() {
        let status = tonic::Status::not_found("user admin1 not found");
        let err: AuthError = status.into();
        assert!(matches!(err, AuthError::Login(ref s) if s.code() == tonic::Code::NotFound));
        assert!(err.to_string().starts_with("login rejected"));
    }
}
