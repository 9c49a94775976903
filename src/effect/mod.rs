//! Deferred computations and retry.
//!
//! - [`Try`]: a suspended computation that may fail or panic; [`Try::run`]
//!   captures both into an [`Exceptional`](crate::control::Exceptional)
//! - [`retry`] / [`retry_async`]: repeat a faulting computation under a
//!   [`Backoff`] policy

mod attempt;
mod retry;

pub use attempt::Try;
pub use retry::{Backoff, retry, retry_async};
