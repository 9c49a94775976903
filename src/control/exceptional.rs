//! Exceptional type - a value or a captured fault.
//!
//! `Exceptional<T>` reifies unexpected, environmental failures (I/O,
//! serialization, a panicking third-party call) as data. Domain rule
//! violations belong in [`Validation`](super::Validation); a [`Fault`] is
//! what is left when something went wrong that no rule anticipated.
//!
//! Faults are produced at the point where a failure is caught, usually by
//! [`Try::run`](crate::effect::Try::run), and are then passed back up the
//! call chain like any other value.
//!
//! # Examples
//!
//! ```rust
//! use transfold::control::Exceptional;
//!
//! let parsed: Exceptional<i32> = "42".parse::<i32>().into();
//! assert_eq!(parsed.map(|n| n + 1), Exceptional::Ok(43));
//!
//! let broken: Exceptional<i32> = "x".parse::<i32>().into();
//! assert!(broken.is_fault());
//! ```

use std::any::Any;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// A captured, unexpected failure.
///
/// Carries a human-readable message and, when the fault came from a typed
/// error, that error as its source.
#[derive(Clone)]
pub struct Fault {
    message: String,
    source: Option<Arc<dyn StdError + Send + Sync>>,
}

impl Fault {
    /// Creates a fault from a message alone.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Captures a typed error, keeping it as the source.
    #[must_use]
    pub fn from_error<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            message: error.to_string(),
            source: Some(Arc::new(error)),
        }
    }

    /// Captures a panic payload as returned by `catch_unwind`.
    #[must_use]
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(message) = payload.downcast_ref::<&str>() {
            (*message).to_string()
        } else if let Some(message) = payload.downcast_ref::<String>() {
            message.clone()
        } else {
            "Unknown panic".to_string()
        };
        Self::new(message)
    }

    /// The fault's message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Debug for Fault {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Fault")
            .field("message", &self.message)
            .field("has_source", &self.source.is_some())
            .finish()
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.message)
    }
}

impl StdError for Fault {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|source| source as &(dyn StdError + 'static))
    }
}

/// Faults compare by message only.
impl PartialEq for Fault {
    fn eq(&self, other: &Self) -> bool {
        self.message == other.message
    }
}

impl Eq for Fault {}

/// A successful value or a captured [`Fault`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exceptional<T> {
    /// The computation succeeded.
    Ok(T),
    /// The computation failed unexpectedly.
    Fault(Fault),
}

impl<T> Exceptional<T> {
    /// Wraps a successful value.
    #[inline]
    pub const fn ok(value: T) -> Self {
        Self::Ok(value)
    }

    /// Wraps a fault.
    #[inline]
    pub const fn fault(fault: Fault) -> Self {
        Self::Fault(fault)
    }

    /// Returns `true` for a successful value.
    #[inline]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    /// Returns `true` for a captured fault.
    #[inline]
    pub const fn is_fault(&self) -> bool {
        matches!(self, Self::Fault(_))
    }

    /// Collapses both cases into a single value.
    #[inline]
    pub fn fold<R, FF, FO>(self, on_fault: FF, on_ok: FO) -> R
    where
        FF: FnOnce(Fault) -> R,
        FO: FnOnce(T) -> R,
    {
        match self {
            Self::Ok(value) => on_ok(value),
            Self::Fault(fault) => on_fault(fault),
        }
    }

    /// Transforms the successful value.
    #[inline]
    pub fn map<R, F>(self, function: F) -> Exceptional<R>
    where
        F: FnOnce(T) -> R,
    {
        self.fold(Exceptional::Fault, |value| Exceptional::Ok(function(value)))
    }

    /// Chains a fallible continuation; a fault short-circuits it.
    #[inline]
    pub fn bind<R, F>(self, function: F) -> Exceptional<R>
    where
        F: FnOnce(T) -> Exceptional<R>,
    {
        self.fold(Exceptional::Fault, function)
    }

    /// Returns the successful value, discarding a fault.
    #[inline]
    pub fn ok_value(self) -> Option<T> {
        self.fold(|_| None, Some)
    }

    /// Converts into a `Result`.
    ///
    /// # Errors
    ///
    /// Returns the captured fault.
    #[inline]
    pub fn into_result(self) -> Result<T, Fault> {
        self.fold(Err, Ok)
    }
}

impl<T, E> From<Result<T, E>> for Exceptional<T>
where
    E: StdError + Send + Sync + 'static,
{
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Ok(value),
            Err(error) => Self::Fault(Fault::from_error(error)),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Exceptional<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok(value) => write!(formatter, "Ok({value})"),
            Self::Fault(fault) => write!(formatter, "Fault({fault})"),
        }
    }
}
