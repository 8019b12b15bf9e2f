// ABOUTME: Error types for the pcbook-client crate.
// ABOUTME: Wraps transport, auth, config, and I/O failures seen by the laptop client.

use std::path::PathBuf;

use pcbook_auth::AuthError;
use thiserror::Error;

/// Errors that can occur in the pcbook client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Invalid server address format.
    #[error("invalid server address: {0}")]
    InvalidAddress(String),

    /// Failed to connect to the server.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Initial login or token validation failed.
    #[error("authentication setup failed: {0}")]
    Auth(#[from] AuthError),

    /// The server already stores a laptop with this id.
    #[error("laptop {0} already exists")]
    AlreadyExists(String),

    /// Any other RPC failure, passed through from the server.
    #[error("rpc failed: {0}")]
    Rpc(#[from] tonic::Status),

    /// Image file could not be read.
    #[error("cannot read image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file could not be read or parsed.
    #[error("config error: {0}")]
    Config(String),
}

impl From<tonic::transport::Error> for ClientError {
    fn from(err: tonic::transport::Error) -> Self {
        ClientError::ConnectionFailed(err.to_string())
    }
}
