// ABOUTME: Background token refresher with fast retry on failure and explicit shutdown.
// ABOUTME: Logs in once up front, then keeps the TokenStore fresh from a tokio task.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, info, warn};

use crate::error::AuthError;
use crate::store::{AccessToken, TokenStore};

/// Wait before retrying after a failed refresh.
pub const FAST_RETRY_INTERVAL: Duration = Duration::from_secs(1);

/// Source of fresh bearer tokens, usually a call to the auth service.
#[async_trait]
pub trait Login: Send + Sync {
    async fn login(&self) -> Result<String, AuthError>;
}

/// Chooses how long to sleep before the next refresh attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSchedule {
    nominal: Duration,
    fast_retry: Duration,
    current: Duration,
}

impl RefreshSchedule {
    /// The fast-retry wait never exceeds the nominal interval.
    pub fn new(nominal: Duration) -> Self {
        Self {
            nominal,
            fast_retry: FAST_RETRY_INTERVAL.min(nominal),
            current: nominal,
        }
    }

    pub fn nominal(&self) -> Duration {
        self.nominal
    }

    pub fn fast_retry(&self) -> Duration {
        self.fast_retry
    }

    /// Wait before the next attempt.
    pub fn current(&self) -> Duration {
        self.current
    }

    pub fn record_success(&mut self) -> Duration {
        self.current = self.nominal;
        self.current
    }

    pub fn record_failure(&mut self) -> Duration {
        self.current = self.fast_retry;
        self.current
    }
}

/// Result of the most recent login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Refreshed,
    Failed { error: String },
}

/// Observable state of the refresher, published after every attempt.
#[derive(Debug, Clone)]
pub struct RefreshStatus {
    pub outcome: RefreshOutcome,
    pub at: DateTime<Utc>,
    pub consecutive_failures: u32,
    pub next_wait: Duration,
}

impl RefreshStatus {
    fn new(outcome: RefreshOutcome, consecutive_failures: u32, next_wait: Duration) -> Self {
        Self {
            outcome,
            at: Utc::now(),
            consecutive_failures,
            next_wait,
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self.outcome, RefreshOutcome::Refreshed)
    }
}

/// Owns the token store and the task that keeps it fresh.
///
/// The task stops on [`TokenRefresher::shutdown`] or when the refresher is
/// dropped. A failed refresh leaves the previous token in place.
#[derive(Debug)]
pub struct TokenRefresher {
    store: Arc<TokenStore>,
    status: watch::Receiver<RefreshStatus>,
    cancel: CancellationToken,
    task: Mutex<Option<JoinHandle<()>>>,
    _cancel_on_drop: DropGuard,
}

impl TokenRefresher {
    /// Log in once and start the background refresh loop.
    ///
    /// Fails without spawning anything if the first login fails.
    pub async fn start(
        login: Arc<dyn Login>,
        refresh_interval: Duration,
    ) -> Result<Self, AuthError> {
        if refresh_interval.is_zero() {
            return Err(AuthError::ZeroInterval);
        }

        let token = fetch_token(login.as_ref()).await?;
        let store = Arc::new(TokenStore::new(token));
        let schedule = RefreshSchedule::new(refresh_interval);
        info!(
            refresh_interval_secs = refresh_interval.as_secs(),
            "initial access token acquired"
        );

        let (status_tx, status_rx) = watch::channel(RefreshStatus::new(
            RefreshOutcome::Refreshed,
            0,
            schedule.current(),
        ));
        let cancel = CancellationToken::new();
        let task = tokio::spawn(refresh_loop(
            login,
            store.clone(),
            schedule,
            status_tx,
            cancel.clone(),
        ));

        Ok(Self {
            store,
            status: status_rx,
            _cancel_on_drop: cancel.clone().drop_guard(),
            cancel,
            task: Mutex::new(Some(task)),
        })
    }

    pub fn store(&self) -> &Arc<TokenStore> {
        &self.store
    }

    /// Snapshot of the last refresh attempt.
    pub fn status(&self) -> RefreshStatus {
        self.status.borrow().clone()
    }

    /// Receiver that is notified after every refresh attempt.
    pub fn subscribe(&self) -> watch::Receiver<RefreshStatus> {
        self.status.clone()
    }

    /// False once shut down, or if the task has exited on its own (e.g. a
    /// panicking `Login`).
    pub fn is_running(&self) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }
        self.task
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Stop the refresh loop and wait for the task to exit.
    ///
    /// Concurrent callers all wait: one awaits the task handle, the rest wait
    /// for the loop to drop its status sender.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        let task = self
            .task
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        match task {
            Some(task) => {
                if let Err(e) = task.await {
                    warn!(error = %e, "token refresher task ended abnormally");
                }
            }
            None => {
                let mut status = self.status.clone();
                while status.changed().await.is_ok() {}
            }
        }
    }
}

async fn fetch_token(login: &dyn Login) -> Result<AccessToken, AuthError> {
    let raw = login.login().await?;
    AccessToken::parse(raw)
}

async fn refresh_loop(
    login: Arc<dyn Login>,
    store: Arc<TokenStore>,
    mut schedule: RefreshSchedule,
    status: watch::Sender<RefreshStatus>,
    cancel: CancellationToken,
) {
    let mut consecutive_failures: u32 = 0;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(schedule.current()) => {}
        }

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            result = fetch_token(login.as_ref()) => result,
        };

        let outcome = match result {
            Ok(token) => {
                store.set(token);
                consecutive_failures = 0;
                let next = schedule.record_success();
                info!(next_refresh_secs = next.as_secs(), "access token refreshed");
                RefreshOutcome::Refreshed
            }
            Err(e) => {
                consecutive_failures = consecutive_failures.saturating_add(1);
                let next = schedule.record_failure();
                warn!(
                    error = %e,
                    consecutive_failures,
                    retry_in_ms = next.as_millis() as u64,
                    "access token refresh failed, keeping previous token"
                );
                RefreshOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };

        status.send_replace(RefreshStatus::new(
            outcome,
            consecutive_failures,
            schedule.current(),
        ));
    }

    debug!("token refresher stopped");
}
