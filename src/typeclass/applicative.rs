//! Applicative type class - combining independent computations.
//!
//! `Applicative` extends `Functor` with the ability to lift pure values
//! (`pure`) and to combine several independent values in the same context
//! (`map2`, `map3`, `product`, `apply`).
//!
//! The interesting instance is [`Validation`]: its `map2` evaluates both
//! sides and concatenates their errors, which is what makes error
//! harvesting possible. Its `Monad` instance, by contrast, fails fast.
//!
//! # Laws
//!
//! ```text
//! pure(|x| x).apply(v) == v                       // identity
//! pure(f).apply(pure(x)) == pure(f(x))            // homomorphism
//! u.apply(pure(y)) == pure(|f| f(y)).apply(u)     // interchange
//! ```
//!
//! # Examples
//!
//! ```rust
//! use transfold::control::{Error, Validation};
//! use transfold::typeclass::Applicative;
//!
//! let a: Validation<i32> = Validation::invalid(Error::new("first"));
//! let b: Validation<i32> = Validation::invalid(Error::new("second"));
//! let combined = a.map2(b, |x, y| x + y);
//! assert_eq!(combined.errors().map(|errors| errors.len()), Some(2));
//! ```

use super::functor::Functor;
use crate::control::{Either, Exceptional, Validation};

/// A type class for types that support lifting values and combining contexts.
pub trait Applicative: Functor {
    /// Lifts a pure value into the applicative context.
    fn pure<B>(value: B) -> Self::WithType<B>;

    /// Combines two applicative values using a binary function.
    fn map2<B, C, F>(self, other: Self::WithType<B>, function: F) -> Self::WithType<C>
    where
        F: FnOnce(Self::Inner, B) -> C;

    /// Combines three applicative values using a ternary function.
    fn map3<B, C, D, F>(
        self,
        second: Self::WithType<B>,
        third: Self::WithType<C>,
        function: F,
    ) -> Self::WithType<D>
    where
        F: FnOnce(Self::Inner, B, C) -> D;

    /// Pairs two applicative values.
    #[inline]
    fn product<B>(self, other: Self::WithType<B>) -> Self::WithType<(Self::Inner, B)>
    where
        Self: Sized,
    {
        self.map2(other, |a, b| (a, b))
    }

    /// Applies a function held in this context to a value held in another.
    fn apply<B, Output>(self, other: Self::WithType<B>) -> Self::WithType<Output>
    where
        Self: Sized,
        Self::Inner: FnOnce(B) -> Output,
    {
        self.map2(other, |function, value| function(value))
    }
}

// =============================================================================
// Option<A> Implementation
// =============================================================================

impl<A> Applicative for Option<A> {
    #[inline]
    fn pure<B>(value: B) -> Option<B> {
        Some(value)
    }

    #[inline]
    fn map2<B, C, F>(self, other: Option<B>, function: F) -> Option<C>
    where
        F: FnOnce(A, B) -> C,
    {
        match (self, other) {
            (Some(a), Some(b)) => Some(function(a, b)),
            _ => None,
        }
    }

    #[inline]
    fn map3<B, C, D, F>(self, second: Option<B>, third: Option<C>, function: F) -> Option<D>
    where
        F: FnOnce(A, B, C) -> D,
    {
        match (self, second, third) {
            (Some(a), Some(b), Some(c)) => Some(function(a, b, c)),
            _ => None,
        }
    }
}

// =============================================================================
// Either<L, R> Implementation
// =============================================================================

impl<L: Clone, R> Applicative for Either<L, R> {
    #[inline]
    fn pure<B>(value: B) -> Either<L, B> {
        Either::Right(value)
    }

    #[inline]
    fn map2<B, C, F>(self, other: Either<L, B>, function: F) -> Either<L, C>
    where
        F: FnOnce(R, B) -> C,
    {
        match (self, other) {
            (Self::Right(a), Either::Right(b)) => Either::Right(function(a, b)),
            (Self::Left(left), _) | (Self::Right(_), Either::Left(left)) => Either::Left(left),
        }
    }

    #[inline]
    fn map3<B, C, D, F>(
        self,
        second: Either<L, B>,
        third: Either<L, C>,
        function: F,
    ) -> Either<L, D>
    where
        F: FnOnce(R, B, C) -> D,
    {
        self.map2(second, |a, b| (a, b))
            .map2(third, |(a, b), c| function(a, b, c))
    }
}

// =============================================================================
// Validation<A> Implementation
// =============================================================================

impl<A> Applicative for Validation<A> {
    #[inline]
    fn pure<B>(value: B) -> Validation<B> {
        Validation::Valid(value)
    }

    #[inline]
    fn map2<B, C, F>(self, other: Validation<B>, function: F) -> Validation<C>
    where
        F: FnOnce(A, B) -> C,
    {
        Self::map2(self, other, function)
    }

    #[inline]
    fn map3<B, C, D, F>(
        self,
        second: Validation<B>,
        third: Validation<C>,
        function: F,
    ) -> Validation<D>
    where
        F: FnOnce(A, B, C) -> D,
    {
        Self::map3(self, second, third, function)
    }
}

// =============================================================================
// Exceptional<A> Implementation
// =============================================================================

impl<A> Applicative for Exceptional<A> {
    #[inline]
    fn pure<B>(value: B) -> Exceptional<B> {
        Exceptional::Ok(value)
    }

    #[inline]
    fn map2<B, C, F>(self, other: Exceptional<B>, function: F) -> Exceptional<C>
    where
        F: FnOnce(A, B) -> C,
    {
        match (self, other) {
            (Self::Ok(a), Exceptional::Ok(b)) => Exceptional::Ok(function(a, b)),
            (Self::Fault(fault), _) | (Self::Ok(_), Exceptional::Fault(fault)) => {
                Exceptional::Fault(fault)
            }
        }
    }

    #[inline]
    fn map3<B, C, D, F>(
        self,
        second: Exceptional<B>,
        third: Exceptional<C>,
        function: F,
    ) -> Exceptional<D>
    where
        F: FnOnce(A, B, C) -> D,
    {
        Applicative::map2(self, second, |a, b| (a, b))
            .map2(third, |(a, b), c| function(a, b, c))
    }
}
