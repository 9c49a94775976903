//! Semigroup type class - types with an associative binary operation.
//!
//! [`Errors`] is the semigroup that drives error harvesting: combining two
//! error lists concatenates them, left operand first.
//!
//! # Examples
//!
//! ```rust
//! use transfold::typeclass::Semigroup;
//!
//! let vec1 = vec![1, 2];
//! let vec2 = vec![3, 4];
//! assert_eq!(vec1.combine(vec2), vec![1, 2, 3, 4]);
//! ```

use crate::control::Errors;

/// A type class for types with an associative binary operation.
///
/// # Laws
///
/// ```text
/// (a.combine(b)).combine(c) == a.combine(b.combine(c))
/// ```
pub trait Semigroup {
    /// Combines two values into one.
    #[must_use]
    fn combine(self, other: Self) -> Self;

    /// Combines two values by reference, returning a new value.
    #[must_use]
    fn combine_ref(&self, other: &Self) -> Self
    where
        Self: Clone,
    {
        self.clone().combine(other.clone())
    }
}

impl Semigroup for String {
    #[inline]
    fn combine(mut self, other: Self) -> Self {
        self.push_str(&other);
        self
    }
}

impl<T> Semigroup for Vec<T> {
    #[inline]
    fn combine(mut self, mut other: Self) -> Self {
        self.append(&mut other);
        self
    }
}

impl Semigroup for Errors {
    #[inline]
    fn combine(self, other: Self) -> Self {
        self.concat(other)
    }
}

impl<A: Semigroup> Semigroup for Option<A> {
    fn combine(self, other: Self) -> Self {
        match (self, other) {
            (Some(left), Some(right)) => Some(left.combine(right)),
            (left, None) => left,
            (None, right) => right,
        }
    }
}
