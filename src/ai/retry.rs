//! Retry with Exponential Backoff
//!
//! Runs an asynchronous operation with bounded attempts and exponential
//! backoff, modeled as an instance-owned executor with observable retry
//! events.
//!
//! ## Strategy
//!
//! 1. Attempt the operation
//! 2. On recoverable failure, emit a typed `RetryEvent`, sleep, double the delay
//! 3. Non-recoverable errors (config, validation, auth) fail fast
//! 4. The final attempt's error propagates verbatim; earlier errors are discarded
//!
//! Warnings are typed events on a broadcast channel rather than console
//! writes, so tests can assert the exact scheduled delays.

use std::future::Future;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::sleep;
use tracing::warn;

use crate::constants::retry as retry_constants;
use crate::types::Result;

/// Retry policy. Configured once, reused across calls.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum attempts (>= 1); the first attempt counts
    pub max_attempts: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Multiplier applied to the delay after each failed attempt (>= 1)
    pub backoff_factor: f64,
    /// Optional ceiling on the delay. None preserves uncapped growth.
    pub max_delay: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: retry_constants::DEFAULT_MAX_ATTEMPTS,
            initial_delay: Duration::from_millis(retry_constants::DEFAULT_INITIAL_DELAY_MS),
            backoff_factor: retry_constants::DEFAULT_BACKOFF_FACTOR,
            max_delay: None,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_delay: Duration, backoff_factor: f64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay,
            backoff_factor: backoff_factor.max(1.0),
            max_delay: None,
        }
    }

    /// Cap the backoff delay
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = Some(max_delay);
        self
    }

    fn next_delay(&self, current: Duration) -> Duration {
        let grown = current.mul_f64(self.backoff_factor);
        match self.max_delay {
            Some(cap) => grown.min(cap),
            None => grown,
        }
    }
}

/// Warning event emitted before each retry.
///
/// `delay` equals the actually scheduled sleep for that retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryEvent {
    /// Attempt number that just failed (1-based)
    pub attempt: u32,
    /// Delay before the next attempt
    pub delay: Duration,
}

/// Retry executor with an observable event channel.
///
/// Each call owns its own attempt counter; concurrent calls through the same
/// executor do not share mutable state.
pub struct RetryExecutor {
    policy: RetryPolicy,
    events: broadcast::Sender<RetryEvent>,
}

impl RetryExecutor {
    pub fn new(policy: RetryPolicy) -> Self {
        let (events, _) = broadcast::channel(32);
        Self { policy, events }
    }

    /// Subscribe to retry warning events
    pub fn subscribe(&self) -> broadcast::Receiver<RetryEvent> {
        self.events.subscribe()
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run an operation with bounded retries and exponential backoff.
    ///
    /// Either the operation eventually succeeds and its full result is
    /// returned, or the error from the final attempt is surfaced unchanged.
    /// Cancellation is cooperative: dropping the returned future during the
    /// backoff sleep or the operation itself releases everything held.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut delay = self.policy.initial_delay;
        let mut attempt = 1u32;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if attempt == max_attempts || !err.is_recoverable() {
                        return Err(err);
                    }

                    warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Attempt failed, retrying"
                    );
                    // No receivers is normal operation
                    let _ = self.events.send(RetryEvent { attempt, delay });

                    sleep(delay).await;
                    delay = self.policy.next_delay(delay);
                    attempt += 1;
                }
            }
        }
    }
}

/// Receive the next retry event from a subscription.
///
/// A slow receiver that lagged behind the channel skips the gap and keeps
/// receiving later events. Returns `None` once the executor is gone.
pub async fn next_retry_event(
    rx: &mut broadcast::Receiver<RetryEvent>,
) -> Option<RetryEvent> {
    loop {
        match rx.recv().await {
            Ok(event) => return Some(event),
            Err(broadcast::error::RecvError::Lagged(_)) => continue,
            Err(broadcast::error::RecvError::Closed) => return None,
        }
    }
}
