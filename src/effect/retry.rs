//! Retrying fallible computations with backoff.
//!
//! `retry(n, backoff, factory)` performs up to `n + 1` attempts. After each
//! fault it waits for the current backoff delay, then grows the delay with
//! [`Backoff::next`]. A success is returned immediately; when attempts run
//! out, the last fault is returned.

use std::thread;
use std::time::Duration;

use crate::control::Exceptional;

use super::attempt::Try;

/// Delay policy between retry attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    delay: Duration,
    factor: u32,
    max_delay: Duration,
}

impl Backoff {
    /// Starts at `delay` and doubles after every failed attempt.
    #[must_use]
    pub const fn exponential(delay: Duration) -> Self {
        Self {
            delay,
            factor: 2,
            max_delay: Duration::MAX,
        }
    }

    /// Waits `delay` between every attempt.
    #[must_use]
    pub const fn fixed(delay: Duration) -> Self {
        Self {
            delay,
            factor: 1,
            max_delay: Duration::MAX,
        }
    }

    /// Retries immediately.
    #[must_use]
    pub const fn none() -> Self {
        Self::fixed(Duration::ZERO)
    }

    /// Caps the delay at `max_delay`.
    #[must_use]
    pub fn with_max_delay(self, max_delay: Duration) -> Self {
        Self {
            delay: self.delay.min(max_delay),
            max_delay,
            ..self
        }
    }

    /// The delay to wait before the next attempt.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// The policy for the attempt after this one.
    #[must_use]
    pub fn next(&self) -> Self {
        Self {
            delay: self.delay.saturating_mul(self.factor).min(self.max_delay),
            ..*self
        }
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::exponential(Duration::from_millis(100))
    }
}

/// Runs the computation built by `factory`, retrying faults up to
/// `retries` more times.
///
/// Blocks the current thread while waiting; use [`retry_async`] inside an
/// async runtime.
///
/// # Examples
///
/// ```rust
/// use std::cell::Cell;
/// use transfold::control::{Exceptional, Fault};
/// use transfold::effect::{Backoff, Try, retry};
///
/// let calls = Cell::new(0);
/// let result = retry(3, Backoff::none(), || {
///     calls.set(calls.get() + 1);
///     if calls.get() < 3 {
///         Try::fail(Fault::new("unavailable"))
///     } else {
///         Try::pure("done")
///     }
/// });
///
/// assert_eq!(result, Exceptional::Ok("done"));
/// assert_eq!(calls.get(), 3);
/// ```
pub fn retry<T, F>(retries: u32, backoff: Backoff, mut factory: F) -> Exceptional<T>
where
    T: Send + 'static,
    F: FnMut() -> Try<T>,
{
    let mut remaining = retries;
    let mut backoff = backoff;
    loop {
        match factory().run() {
            Exceptional::Ok(value) => return Exceptional::Ok(value),
            Exceptional::Fault(fault) if remaining == 0 => {
                tracing::warn!(%fault, retries, "giving up after final attempt");
                return Exceptional::Fault(fault);
            }
            Exceptional::Fault(fault) => {
                tracing::debug!(
                    %fault,
                    remaining,
                    delay_ms = backoff.delay().as_millis(),
                    "attempt failed, retrying"
                );
                thread::sleep(backoff.delay());
                backoff = backoff.next();
                remaining -= 1;
            }
        }
    }
}

/// Async counterpart of [`retry`] for futures yielding [`Exceptional`].
///
/// Waiting uses `tokio::time::sleep`, so it honours paused test time.
pub async fn retry_async<T, F, Fut>(retries: u32, backoff: Backoff, mut factory: F) -> Exceptional<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Exceptional<T>>,
{
    let mut remaining = retries;
    let mut backoff = backoff;
    loop {
        match factory().await {
            Exceptional::Ok(value) => return Exceptional::Ok(value),
            Exceptional::Fault(fault) if remaining == 0 => {
                tracing::warn!(%fault, retries, "giving up after final attempt");
                return Exceptional::Fault(fault);
            }
            Exceptional::Fault(fault) => {
                tracing::debug!(
                    %fault,
                    remaining,
                    delay_ms = backoff.delay().as_millis(),
                    "attempt failed, retrying"
                );
                tokio::time::sleep(backoff.delay()).await;
                backoff = backoff.next();
                remaining -= 1;
            }
        }
    }
}
