// ABOUTME: Shared test doubles for pcbook-auth integration tests.
// ABOUTME: A scripted Login that records when it was called.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use pcbook_auth::{AuthError, Login};
use tokio::time::Instant;

/// What a single login call should do.
pub enum Step {
    Token(&'static str),
    Fail(&'static str),
    Hang,
    Panic,
}

/// Login collaborator that plays back a script, then keeps returning `fallback`.
pub struct ScriptedLogin {
    script: Mutex<VecDeque<Step>>,
    fallback: &'static str,
    calls: Mutex<Vec<Instant>>,
}

impl ScriptedLogin {
    pub fn new(script: impl IntoIterator<Item = Step>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            fallback: "tok-fallback",
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Time between consecutive login calls.
    pub fn waits(&self) -> Vec<Duration> {
        let calls = self.calls.lock().unwrap();
        calls.windows(2).map(|w| w[1] - w[0]).collect()
    }
}

#[async_trait]
impl Login for ScriptedLogin {
    async fn login(&self) -> Result<String, AuthError> {
        self.calls.lock().unwrap().push(Instant::now());
        let step = self.script.lock().unwrap().pop_front();
        match step {
            Some(Step::Token(token)) => Ok(token.to_string()),
            Some(Step::Fail(reason)) => Err(AuthError::LoginFailed(reason.to_string())),
            Some(Step::Hang) => std::future::pending().await,
            Some(Step::Panic) => panic!("login backend blew up"),
            None => Ok(self.fallback.to_string()),
        }
    }
}

/// Assert two durations match within a few milliseconds of timer slack.
pub fn assert_close(actual: Duration, expected: Duration) {
    let slack = Duration::from_millis(5);
    assert!(
        actual + slack >= expected && actual <= expected + slack,
        "expected ~{:?}, got {:?}",
        expected,
        actual
    );
}
