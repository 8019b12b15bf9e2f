// ABOUTME: Integration tests for the background token refresher.
// ABOUTME: Uses tokio's paused clock to check retry timing and shutdown behaviour.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{assert_close, ScriptedLogin, Step};
use pcbook_auth::{AuthError, RefreshOutcome, TokenRefresher};

const NOMINAL: Duration = Duration::from_secs(30);

#[tokio::test(start_paused = true)]
async fn failed_initial_login_returns_error_and_spawns_nothing() {
    let login = Arc::new(ScriptedLogin::new([Step::Fail("bad credentials")]));

    let result = TokenRefresher::start(login.clone(), NOMINAL).await;
    assert!(matches!(result, Err(AuthError::LoginFailed(ref msg)) if msg == "bad credentials"));

    tokio::time::sleep(Duration::from_secs(300)).await;
    assert_eq!(login.call_count(), 1, "no login attempts after failed construction");
}

#[tokio::test(start_paused = true)]
async fn invalid_initial_token_fails_construction() {
    let login = Arc::new(ScriptedLogin::new([Step::Token("")]));

    let result = TokenRefresher::start(login.clone(), NOMINAL).await;
    assert!(matches!(result, Err(AuthError::InvalidToken)));

    tokio::time::sleep(Duration::from_secs(300)).await;
    assert_eq!(login.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn zero_interval_is_rejected_before_login() {
    let login = Arc::new(ScriptedLogin::new([Step::Token("tok-1")]));

    let result = TokenRefresher::start(login.clone(), Duration::ZERO).await;
    assert!(matches!(result, Err(AuthError::ZeroInterval)));
    assert_eq!(login.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn initial_token_is_available_immediately() {
    let login = Arc::new(ScriptedLogin::new([Step::Token("tok-1")]));

    let refresher = TokenRefresher::start(login.clone(), NOMINAL).await.unwrap();
    assert_eq!(refresher.store().get().as_str(), "tok-1");
    assert!(refresher.status().is_healthy());
    assert_eq!(refresher.status().next_wait, NOMINAL);
    assert!(refresher.is_running());
}

#[tokio::test(start_paused = true)]
async fn failure_keeps_token_and_retries_fast_then_returns_to_nominal() {
    let login = Arc::new(ScriptedLogin::new([
        Step::Token("tok-1"),
        Step::Fail("unavailable"),
        Step::Token("tok-2"),
    ]));
    let refresher = TokenRefresher::start(login.clone(), NOMINAL).await.unwrap();
    let mut status = refresher.subscribe();

    status.changed().await.unwrap();
    let after_failure = status.borrow_and_update().clone();
    assert_eq!(
        after_failure.outcome,
        RefreshOutcome::Failed {
            error: "login failed: unavailable".to_string()
        }
    );
    assert_eq!(after_failure.consecutive_failures, 1);
    assert_eq!(after_failure.next_wait, Duration::from_secs(1));
    assert_eq!(refresher.store().get().as_str(), "tok-1");

    status.changed().await.unwrap();
    let after_success = status.borrow_and_update().clone();
    assert_eq!(after_success.outcome, RefreshOutcome::Refreshed);
    assert_eq!(after_success.consecutive_failures, 0);
    assert_eq!(after_success.next_wait, NOMINAL);
    assert_eq!(refresher.store().get().as_str(), "tok-2");

    // Initial login, then 30s to the failed attempt, then 1s to the retry.
    let waits = login.waits();
    assert_close(waits[0], NOMINAL);
    assert_close(waits[1], Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn wait_after_success_is_nominal() {
    let login = Arc::new(ScriptedLogin::new([
        Step::Token("tok-1"),
        Step::Fail("unavailable"),
        Step::Token("tok-2"),
        Step::Token("tok-3"),
    ]));
    let refresher = TokenRefresher::start(login.clone(), NOMINAL).await.unwrap();
    let mut status = refresher.subscribe();

    for _ in 0..3 {
        status.changed().await.unwrap();
    }

    let waits = login.waits();
    assert_close(waits[1], Duration::from_secs(1));
    assert_close(waits[2], NOMINAL);
    assert_eq!(refresher.store().get().as_str(), "tok-3");
}

#[tokio::test(start_paused = true)]
async fn repeated_failures_keep_fast_retry() {
    let login = Arc::new(ScriptedLogin::new([
        Step::Token("tok-1"),
        Step::Fail("unavailable"),
        Step::Fail("unavailable"),
        Step::Fail("unavailable"),
    ]));
    let refresher = TokenRefresher::start(login.clone(), NOMINAL).await.unwrap();
    let mut status = refresher.subscribe();

    for _ in 0..3 {
        status.changed().await.unwrap();
    }

    assert_eq!(refresher.status().consecutive_failures, 3);
    assert_eq!(refresher.store().get().as_str(), "tok-1");
    let waits = login.waits();
    assert_close(waits[1], Duration::from_secs(1));
    assert_close(waits[2], Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn unusable_refreshed_token_counts_as_failure() {
    let login = Arc::new(ScriptedLogin::new([Step::Token("tok-1"), Step::Token("bad\ntoken")]));
    let refresher = TokenRefresher::start(login.clone(), NOMINAL).await.unwrap();
    let mut status = refresher.subscribe();

    status.changed().await.unwrap();
    assert!(!status.borrow().is_healthy());
    assert_eq!(refresher.store().get().as_str(), "tok-1");
}

#[tokio::test(start_paused = true)]
async fn shutdown_stops_further_logins() {
    let login = Arc::new(ScriptedLogin::new([Step::Token("tok-1")]));
    let refresher = TokenRefresher::start(login.clone(), NOMINAL).await.unwrap();

    refresher.shutdown().await;
    assert!(!refresher.is_running());

    tokio::time::sleep(Duration::from_secs(300)).await;
    assert_eq!(login.call_count(), 1);
    assert_eq!(refresher.store().get().as_str(), "tok-1");
}

#[tokio::test(start_paused = true)]
async fn shutdown_interrupts_hanging_login() {
    let login = Arc::new(ScriptedLogin::new([Step::Token("tok-1"), Step::Hang]));
    let refresher = TokenRefresher::start(login.clone(), NOMINAL).await.unwrap();

    tokio::time::sleep(NOMINAL + Duration::from_secs(1)).await;
    assert_eq!(login.call_count(), 2);

    tokio::time::timeout(Duration::from_secs(5), refresher.shutdown())
        .await
        .expect("shutdown should not wait for a hanging login");
}

#[tokio::test(start_paused = true)]
async fn dropping_refresher_stops_loop() {
    let login = Arc::new(ScriptedLogin::new([Step::Token("tok-1")]));
    let refresher = TokenRefresher::start(login.clone(), NOMINAL).await.unwrap();
    let mut status = refresher.subscribe();
    drop(refresher);

    // the loop exits and drops its status sender
    assert!(status.changed().await.is_err());

    tokio::time::sleep(Duration::from_secs(300)).await;
    assert_eq!(login.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn shutdown_twice_is_harmless() {
    let login = Arc::new(ScriptedLogin::new([Step::Token("tok-1")]));
    let refresher = TokenRefresher::start(login, NOMINAL).await.unwrap();

    refresher.shutdown().await;
    refresher.shutdown().await;
    assert!(!refresher.is_running());
}

#[tokio::test(start_paused = true)]
async fn concurrent_shutdowns_both_wait_for_task_exit() {
    let login = Arc::new(ScriptedLogin::new([Step::Token("tok-1"), Step::Hang]));
    let refresher = TokenRefresher::start(login.clone(), NOMINAL).await.unwrap();
    tokio::time::sleep(NOMINAL + Duration::from_secs(1)).await;
    assert_eq!(login.call_count(), 2);

    let first = refresher.subscribe();
    let second = refresher.subscribe();
    tokio::join!(
        async {
            refresher.shutdown().await;
            assert!(first.has_changed().is_err(), "task still running");
        },
        async {
            refresher.shutdown().await;
            assert!(second.has_changed().is_err(), "task still running");
        },
    );
}

#[tokio::test(start_paused = true)]
async fn panicking_login_is_reported_as_not_running() {
    let login = Arc::new(ScriptedLogin::new([Step::Token("tok-1"), Step::Panic]));
    let refresher = TokenRefresher::start(login.clone(), NOMINAL).await.unwrap();
    assert!(refresher.is_running());

    tokio::time::sleep(NOMINAL + Duration::from_secs(1)).await;
    assert_eq!(login.call_count(), 2);
    assert!(!refresher.is_running());
    assert_eq!(refresher.store().get().as_str(), "tok-1");

    refresher.shutdown().await;
}
