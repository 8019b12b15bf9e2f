// ABOUTME: Re-exports generated protobuf types for the pcbook auth and laptop services.
// ABOUTME: Single source of truth for message layouts and fully-qualified method paths.

#![allow(clippy::derive_partial_eq_without_eq)]

/// Generated protobuf types for the pcbook protocol.
pub mod pcbook {
    tonic::include_proto!("pcbook");
}

// Re-export commonly used types at crate root for convenience
pub use pcbook::*;

// Re-export client types under a client module
pub mod client {
    pub use super::pcbook::auth_service_client::AuthServiceClient;
    pub use super::pcbook::laptop_service_client::LaptopServiceClient;
}

// Re-export server types under a server module
pub mod server {
    pub use super::pcbook::auth_service_server::{AuthService, AuthServiceServer};
    pub use super::pcbook::laptop_service_server::{LaptopService, LaptopServiceServer};
}

impl Memory {
    pub fn new(value: u64, unit: memory::Unit) -> Self {
        Self {
            value,
            unit: unit as i32,
        }
    }
}

/// Fully-qualified gRPC method paths, as seen by client interceptors.
pub mod methods {
    pub const LOGIN: &str = "/pcbook.AuthService/Login";
    pub const CREATE_LAPTOP: &str = "/pcbook.LaptopService/CreateLaptop";
    pub const SEARCH_LAPTOP: &str = "/pcbook.LaptopService/SearchLaptop";
    pub const UPLOAD_IMAGE: &str = "/pcbook.LaptopService/UploadImage";
    pub const RATE_LAPTOP: &str = "/pcbook.LaptopService/RateLaptop";

    /// Every method the pcbook services expose.
    pub const ALL: &[&str] = &[
        LOGIN,
        CREATE_LAPTOP,
        SEARCH_LAPTOP,
        UPLOAD_IMAGE,
        RATE_LAPTOP,
    ];

    /// Methods the laptop service only serves to logged-in users.
    pub const AUTHENTICATED: &[&str] = &[CREATE_LAPTOP, UPLOAD_IMAGE, RATE_LAPTOP];

    pub fn is_known(method: &str) -> bool {
        ALL.contains(&method)
    }
}
