//! Deferred fallible computations.
//!
//! A [`Try<T>`] describes a computation that may fail or panic, without
//! running it. Composition with [`Try::map`] and [`Try::bind`] builds a
//! larger description; nothing executes until [`Try::run`], which is the
//! one place where returned errors and panics are turned into an
//! [`Exceptional`] value.
//!
//! # Examples
//!
//! ```rust
//! use transfold::control::Exceptional;
//! use transfold::effect::Try;
//!
//! let parsed = Try::lift(|| "20".parse::<i32>())
//!     .map(|n| n + 1)
//!     .bind(|n| Try::pure(n * 2));
//!
//! assert_eq!(parsed.run(), Exceptional::Ok(42));
//!
//! let panicking: Try<i32> = Try::new(|| panic!("connection reset"));
//! assert!(panicking.run().is_fault());
//! ```

use std::error::Error as StdError;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::control::{Exceptional, Fault};

type Thunk<T> = Box<dyn FnOnce() -> Result<T, Fault> + Send>;

/// A suspended computation that yields `T` or a [`Fault`].
pub struct Try<T> {
    thunk: Thunk<T>,
}

impl<T: Send + 'static> Try<T> {
    /// Suspends a computation that reports failure as a [`Fault`].
    pub fn new<F>(computation: F) -> Self
    where
        F: FnOnce() -> Result<T, Fault> + Send + 'static,
    {
        Self {
            thunk: Box::new(computation),
        }
    }

    /// Suspends a computation returning any typed error.
    pub fn lift<F, E>(computation: F) -> Self
    where
        F: FnOnce() -> Result<T, E> + Send + 'static,
        E: StdError + Send + Sync + 'static,
    {
        Self::new(move || computation().map_err(Fault::from_error))
    }

    /// A computation that succeeds with `value`.
    pub fn pure(value: T) -> Self {
        Self::new(move || Ok(value))
    }

    /// A computation that fails with `fault`.
    pub fn fail(fault: Fault) -> Self {
        Self::new(move || Err(fault))
    }

    /// Transforms the eventual value without running anything.
    #[must_use]
    pub fn map<R, F>(self, function: F) -> Try<R>
    where
        R: Send + 'static,
        F: FnOnce(T) -> R + Send + 'static,
    {
        let thunk = self.thunk;
        Try::new(move || thunk().map(function))
    }

    /// Chains a dependent computation without running anything.
    ///
    /// If this computation faults, `function` is never called.
    #[must_use]
    pub fn bind<R, F>(self, function: F) -> Try<R>
    where
        R: Send + 'static,
        F: FnOnce(T) -> Try<R> + Send + 'static,
    {
        let thunk = self.thunk;
        Try::new(move || {
            let value = thunk()?;
            (function(value).thunk)()
        })
    }

    /// Runs the computation, capturing errors and panics as a fault.
    ///
    /// No panic raised inside the computation propagates past this call.
    pub fn run(self) -> Exceptional<T> {
        match catch_unwind(AssertUnwindSafe(self.thunk)) {
            Ok(Ok(value)) => Exceptional::Ok(value),
            Ok(Err(fault)) => Exceptional::Fault(fault),
            Err(payload) => Exceptional::Fault(Fault::from_panic(payload.as_ref())),
        }
    }
}

impl<T> fmt::Debug for Try<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("Try(<deferred>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[rstest]
    fn construction_does_not_run() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ran);
        let deferred = Try::new(move || {
            flag.store(true, Ordering::SeqCst);
            Ok(1)
        })
        .map(|n| n + 1);

        assert!(!ran.load(Ordering::SeqCst));
        assert_eq!(deferred.run(), Exceptional::Ok(2));
        assert!(ran.load(Ordering::SeqCst));
    }

    #[rstest]
    fn fault_short_circuits_later_steps() {
        let reached = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&reached);
        let result = Try::<i32>::fail(Fault::new("timeout"))
            .bind(move |n| {
                flag.store(true, Ordering::SeqCst);
                Try::pure(n)
            })
            .run();

        assert_eq!(result, Exceptional::Fault(Fault::new("timeout")));
        assert!(!reached.load(Ordering::SeqCst));
    }

    #[rstest]
    fn panic_in_bound_step_becomes_fault() {
        let result = Try::pure(1)
            .bind(|_| Try::<i32>::new(|| panic!("serializer exploded")))
            .run();

        assert_eq!(result, Exceptional::Fault(Fault::new("serializer exploded")));
    }

    #[rstest]
    fn lift_keeps_typed_error_message() {
        let result = Try::lift(|| "abc".parse::<u8>()).run();
        assert_eq!(
            result,
            Exceptional::Fault(Fault::new("invalid digit found in string"))
        );
    }
}
