//! Monad type class - sequencing dependent computations.
//!
//! `flat_map` feeds the value of one computation into a function that
//! produces the next computation. The first absent/left/invalid/faulted
//! step ends the chain: the continuation is never called.
//!
//! # Laws
//!
//! ```text
//! pure(a).flat_map(f) == f(a)                                  // left identity
//! m.flat_map(pure) == m                                        // right identity
//! m.flat_map(f).flat_map(g) == m.flat_map(|x| f(x).flat_map(g)) // associativity
//! ```
//!
//! # Examples
//!
//! ```rust
//! use transfold::typeclass::Monad;
//!
//! let parsed = Some("42").flat_map(|s| s.parse::<i32>().ok());
//! assert_eq!(parsed, Some(42));
//! ```

use super::applicative::Applicative;
use crate::control::{Either, Exceptional, Validation};

/// A type class for types that support sequential composition.
pub trait Monad: Applicative {
    /// Chains a computation that depends on the current value.
    fn flat_map<B, F>(self, function: F) -> Self::WithType<B>
    where
        F: FnOnce(Self::Inner) -> Self::WithType<B>;

    /// Alias for `flat_map`.
    #[inline]
    fn and_then<B, F>(self, function: F) -> Self::WithType<B>
    where
        Self: Sized,
        F: FnOnce(Self::Inner) -> Self::WithType<B>,
    {
        self.flat_map(function)
    }

    /// Sequences two computations, discarding the first value.
    #[inline]
    fn then<B>(self, next: Self::WithType<B>) -> Self::WithType<B>
    where
        Self: Sized,
    {
        self.flat_map(|_| next)
    }
}

impl<A> Monad for Option<A> {
    #[inline]
    fn flat_map<B, F>(self, function: F) -> Option<B>
    where
        F: FnOnce(A) -> Option<B>,
    {
        self.and_then(function)
    }
}

impl<L: Clone, R> Monad for Either<L, R> {
    #[inline]
    fn flat_map<B, F>(self, function: F) -> Either<L, B>
    where
        F: FnOnce(R) -> Either<L, B>,
    {
        self.bind(function)
    }
}

impl<A> Monad for Validation<A> {
    #[inline]
    fn flat_map<B, F>(self, function: F) -> Validation<B>
    where
        F: FnOnce(A) -> Validation<B>,
    {
        self.bind(function)
    }
}

impl<A> Monad for Exceptional<A> {
    #[inline]
    fn flat_map<B, F>(self, function: F) -> Exceptional<B>
    where
        F: FnOnce(A) -> Exceptional<B>,
    {
        self.bind(function)
    }
}
