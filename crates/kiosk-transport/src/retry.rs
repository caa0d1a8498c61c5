//! Retry and rate-limit pacing for remote calls.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use sui_kiosk_types::RetryConfig;
use tracing::debug;

/// Run `op` up to `config.attempts` times.
///
/// After failed attempt `n` the task sleeps `config.base_delay * n` before
/// trying again. When every attempt fails, the last error is returned as-is
/// so callers can still downcast or match on it. Individual failed attempts
/// are only logged at `debug`.
pub async fn with_retry<T, E, F, Fut>(config: &RetryConfig, label: &str, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let attempts = config.attempts.max(1);
    let mut attempt = 1usize;

    loop {
        match op().await {
            Ok(v) => return Ok(v),
            Err(e) => {
                if attempt >= attempts {
                    return Err(e);
                }
                let wait = backoff(config.base_delay, attempt);
                debug!(
                    op = label,
                    attempt,
                    attempts,
                    wait_ms = wait.as_millis() as u64,
                    error = %e,
                    "remote call failed, retrying"
                );
                sleep_nonzero(wait).await;
                attempt += 1;
            }
        }
    }
}

/// Wait after failed attempt `attempt`, saturating instead of overflowing.
fn backoff(base: Duration, attempt: usize) -> Duration {
    base.saturating_mul(u32::try_from(attempt).unwrap_or(u32::MAX))
}

/// Enforces a minimum delay between successive calls of one sequential loop.
///
/// The first `tick` returns immediately; every later one sleeps for the
/// configured delay. Each loop owns its own pacer, so concurrent fan-out
/// branches are not throttled against each other.
#[derive(Debug)]
pub struct Pacer {
    delay: Duration,
    started: bool,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            started: false,
        }
    }

    pub async fn tick(&mut self) {
        if self.started {
            sleep_nonzero(self.delay).await;
        }
        self.started = true;
    }
}

async fn sleep_nonzero(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}
