// ABOUTME: Client-side credential attachment for pcbook gRPC calls.
// ABOUTME: Token store, self-renewing refresher, and the per-method auth interceptor.

pub mod error;
pub mod interceptor;
pub mod methods;
pub mod refresh;
pub mod store;

pub use error::AuthError;
pub use interceptor::{AuthInterceptor, AUTHORIZATION_HEADER};
pub use methods::AuthMethods;
pub use refresh::{
    Login, RefreshOutcome, RefreshSchedule, RefreshStatus, TokenRefresher, FAST_RETRY_INTERVAL,
};
pub use store::{AccessToken, TokenStore};
