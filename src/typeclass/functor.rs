//! Functor type class - mapping over values in a context.
//!
//! # Laws
//!
//! ## Identity Law
//!
//! ```text
//! fa.fmap(|x| x) == fa
//! ```
//!
//! ## Composition Law
//!
//! ```text
//! fa.fmap(f).fmap(g) == fa.fmap(|x| g(f(x)))
//! ```
//!
//! # Examples
//!
//! ```rust
//! use transfold::typeclass::Functor;
//! use transfold::control::Validation;
//!
//! let doubled = Validation::valid(21).fmap(|n| n * 2);
//! assert_eq!(doubled, Validation::valid(42));
//! ```

use super::higher::TypeConstructor;
use crate::control::{Either, Exceptional, Validation};

/// A type class for types that can be mapped over.
///
/// A missing, failed or faulted container is left untouched; only a
/// present/successful value is transformed.
pub trait Functor: TypeConstructor {
    /// Applies a function to the value inside the functor.
    fn fmap<B, F>(self, function: F) -> Self::WithType<B>
    where
        F: FnOnce(Self::Inner) -> B;

    /// Applies a function to a reference of the value inside the functor.
    fn fmap_ref<B, F>(&self, function: F) -> Self::WithType<B>
    where
        F: FnOnce(&Self::Inner) -> B;

    /// Replaces the value inside the functor with a constant value.
    #[inline]
    fn replace<B>(self, value: B) -> Self::WithType<B>
    where
        Self: Sized,
    {
        self.fmap(|_| value)
    }

    /// Discards the value inside the functor, replacing it with `()`.
    #[inline]
    fn void(self) -> Self::WithType<()>
    where
        Self: Sized,
    {
        self.replace(())
    }
}

// =============================================================================
// Option<A> Implementation
// =============================================================================

impl<A> Functor for Option<A> {
    #[inline]
    fn fmap<B, F>(self, function: F) -> Option<B>
    where
        F: FnOnce(A) -> B,
    {
        self.map(function)
    }

    #[inline]
    fn fmap_ref<B, F>(&self, function: F) -> Option<B>
    where
        F: FnOnce(&A) -> B,
    {
        self.as_ref().map(function)
    }
}

// =============================================================================
// Either<L, R> Implementation
// =============================================================================

impl<L: Clone, R> Functor for Either<L, R> {
    #[inline]
    fn fmap<B, F>(self, function: F) -> Either<L, B>
    where
        F: FnOnce(R) -> B,
    {
        self.map(function)
    }

    #[inline]
    fn fmap_ref<B, F>(&self, function: F) -> Either<L, B>
    where
        F: FnOnce(&R) -> B,
    {
        match self {
            Self::Left(value) => Either::Left(value.clone()),
            Self::Right(value) => Either::Right(function(value)),
        }
    }
}

// =============================================================================
// Validation<A> Implementation
// =============================================================================

impl<A> Functor for Validation<A> {
    #[inline]
    fn fmap<B, F>(self, function: F) -> Validation<B>
    where
        F: FnOnce(A) -> B,
    {
        self.map(function)
    }

    #[inline]
    fn fmap_ref<B, F>(&self, function: F) -> Validation<B>
    where
        F: FnOnce(&A) -> B,
    {
        match self {
            Self::Valid(value) => Validation::Valid(function(value)),
            Self::Invalid(errors) => Validation::Invalid(errors.clone()),
        }
    }
}

// =============================================================================
// Exceptional<A> Implementation
// =============================================================================

impl<A> Functor for Exceptional<A> {
    #[inline]
    fn fmap<B, F>(self, function: F) -> Exceptional<B>
    where
        F: FnOnce(A) -> B,
    {
        self.map(function)
    }

    #[inline]
    fn fmap_ref<B, F>(&self, function: F) -> Exceptional<B>
    where
        F: FnOnce(&A) -> B,
    {
        match self {
            Self::Ok(value) => Exceptional::Ok(function(value)),
            Self::Fault(fault) => Exceptional::Fault(fault.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::Error;
    use rstest::rstest;

    #[rstest]
    fn option_fmap_some() {
        assert_eq!(Some(5).fmap(|x| x * 2), Some(10));
    }

    #[rstest]
    fn option_fmap_none() {
        let value: Option<i32> = None;
        assert_eq!(value.fmap(|x| x * 2), None);
    }

    #[rstest]
    fn option_void_some() {
        assert_eq!(Some(5).void(), Some(()));
    }

    #[rstest]
    fn either_fmap_ref_keeps_left() {
        let value: Either<String, i32> = Either::Left("boom".to_string());
        assert_eq!(value.fmap_ref(|x| x + 1), Either::Left("boom".to_string()));
    }

    #[rstest]
    fn validation_fmap_ref_preserves_errors() {
        let value: Validation<i32> = Validation::invalid(Error::new("bad"));
        let mapped = value.fmap_ref(|x| x + 1);
        assert_eq!(mapped, value);
    }

    #[rstest]
    fn exceptional_replace_on_ok() {
        assert_eq!(Exceptional::Ok(1).replace("x"), Exceptional::Ok("x"));
    }
}
