// ABOUTME: Client interceptor that attaches the current bearer token to selected gRPC calls.
// ABOUTME: Wraps unary and streaming invocations; everything else is passed through untouched.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tonic::{Request, Response, Status};
use tracing::debug;

use crate::error::AuthError;
use crate::methods::AuthMethods;
use crate::refresh::{Login, RefreshStatus, TokenRefresher};
use crate::store::AccessToken;

/// Metadata key carrying the bearer token.
pub const AUTHORIZATION_HEADER: &str = "authorization";

/// Attaches `authorization` metadata to calls whose method is in [`AuthMethods`].
///
/// Cloning is cheap; all clones share one token store and one refresh task.
/// The task stops when [`AuthInterceptor::shutdown`] is called or the last
/// clone is dropped.
///
/// # Example
///
/// ```ignore
/// let auth = AuthInterceptor::new(login, methods, Duration::from_secs(30)).await?;
/// let response = auth
///     .unary(CREATE_LAPTOP, request, |req| async move { client.create_laptop(req).await })
///     .await?;
/// ```
#[derive(Clone, Debug)]
pub struct AuthInterceptor {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    methods: AuthMethods,
    refresher: TokenRefresher,
}

impl AuthInterceptor {
    /// Log in, then start refreshing the token every `refresh_interval`.
    ///
    /// Returns the login error if the first login fails; no background task
    /// is left running in that case.
    pub async fn new(
        login: Arc<dyn Login>,
        methods: AuthMethods,
        refresh_interval: Duration,
    ) -> Result<Self, AuthError> {
        let refresher = TokenRefresher::start(login, refresh_interval).await?;
        debug!(auth_methods = methods.len(), "auth interceptor ready");
        Ok(Self {
            inner: Arc::new(Inner { methods, refresher }),
        })
    }

    /// Intercept a unary call.
    pub async fn unary<Req, Resp, F, Fut>(
        &self,
        method: &str,
        request: Request<Req>,
        invoker: F,
    ) -> Result<Response<Resp>, Status>
    where
        F: FnOnce(Request<Req>) -> Fut,
        Fut: Future<Output = Result<Response<Resp>, Status>>,
    {
        debug!(method, "--> unary interceptor");
        invoker(self.authorize(method, request)).await
    }

    /// Intercept the opening of a streaming call.
    ///
    /// Only the initial request metadata is touched; messages exchanged on
    /// the open stream are left to the transport.
    pub async fn stream<Req, Resp, F, Fut>(
        &self,
        method: &str,
        request: Request<Req>,
        streamer: F,
    ) -> Result<Response<Resp>, Status>
    where
        F: FnOnce(Request<Req>) -> Fut,
        Fut: Future<Output = Result<Response<Resp>, Status>>,
    {
        debug!(method, "--> stream interceptor");
        streamer(self.authorize(method, request)).await
    }

    /// Attach the current token if `method` needs one.
    ///
    /// Any `authorization` value already on the request is replaced. The
    /// deadline and other metadata are kept.
    pub fn authorize<T>(&self, method: &str, mut request: Request<T>) -> Request<T> {
        if self.inner.methods.requires_auth(method) {
            let token = self.inner.refresher.store().get();
            request
                .metadata_mut()
                .insert(AUTHORIZATION_HEADER, token.header_value());
        }
        request
    }

    pub fn requires_auth(&self, method: &str) -> bool {
        self.inner.methods.requires_auth(method)
    }

    pub fn methods(&self) -> &AuthMethods {
        &self.inner.methods
    }

    /// Token that would be attached to a call made right now.
    pub fn current_token(&self) -> AccessToken {
        self.inner.refresher.store().get()
    }

    pub fn refresh_status(&self) -> RefreshStatus {
        self.inner.refresher.status()
    }

    pub fn subscribe(&self) -> watch::Receiver<RefreshStatus> {
        self.inner.refresher.subscribe()
    }

    /// Stop refreshing. Calls made afterwards keep using the last token.
    pub async fn shutdown(&self) {
        self.inner.refresher.shutdown().await;
    }
}
