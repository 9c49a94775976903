//! Either type - a value that can be one of two types.
//!
//! `Either<L, R>` is exactly one of `Left(L)` or `Right(R)`. The type is
//! symmetric; by convention `Left` carries a failure and `Right` a success,
//! and the mapping/chaining operations act on the right side.
//!
//! `fold` is the elimination form: every other operation can be written in
//! terms of it.
//!
//! # Examples
//!
//! ```rust
//! use transfold::control::Either;
//!
//! fn parse(input: &str) -> Either<String, i32> {
//!     input
//!         .parse()
//!         .map_or_else(|_| Either::Left(format!("'{input}' is not a number")), Either::Right)
//! }
//!
//! let doubled = parse("21").map(|n| n * 2);
//! assert_eq!(doubled, Either::Right(42));
//!
//! let message = parse("x").bind(|n| parse(&n.to_string())).fold(|left| left, |n| n.to_string());
//! assert_eq!(message, "'x' is not a number");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// A value that can be one of two types.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Either<L, R> {
    /// The left variant, conventionally representing failure.
    Left(L),
    /// The right variant, conventionally representing success.
    Right(R),
}

impl<L, R> Either<L, R> {
    // =========================================================================
    // Elimination
    // =========================================================================

    /// Collapses both cases into a single value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use transfold::control::Either;
    ///
    /// let right: Either<i32, &str> = Either::Right("hello");
    /// assert_eq!(right.fold(|n| n.to_string(), str::to_uppercase), "HELLO");
    /// ```
    #[inline]
    pub fn fold<T, FL, FR>(self, on_left: FL, on_right: FR) -> T
    where
        FL: FnOnce(L) -> T,
        FR: FnOnce(R) -> T,
    {
        match self {
            Self::Left(value) => on_left(value),
            Self::Right(value) => on_right(value),
        }
    }

    // =========================================================================
    // Type Checking
    // =========================================================================

    /// Returns `true` if this is a `Left` value.
    #[inline]
    pub const fn is_left(&self) -> bool {
        matches!(self, Self::Left(_))
    }

    /// Returns `true` if this is a `Right` value.
    #[inline]
    pub const fn is_right(&self) -> bool {
        matches!(self, Self::Right(_))
    }

    // =========================================================================
    // Value Extraction
    // =========================================================================

    /// Returns the left payload, discarding a right one.
    #[inline]
    pub fn left(self) -> Option<L> {
        self.fold(Some, |_| None)
    }

    /// Returns the right payload, discarding a left one.
    ///
    /// This is the lossy `Either -> Option` conversion.
    #[inline]
    pub fn right(self) -> Option<R> {
        self.fold(|_| None, Some)
    }

    /// Alias for [`right`](Self::right).
    #[inline]
    pub fn to_option(self) -> Option<R> {
        self.right()
    }

    /// Returns a reference to the left value if present.
    #[inline]
    pub const fn left_ref(&self) -> Option<&L> {
        match self {
            Self::Left(value) => Some(value),
            Self::Right(_) => None,
        }
    }

    /// Returns a reference to the right value if present.
    #[inline]
    pub const fn right_ref(&self) -> Option<&R> {
        match self {
            Self::Left(_) => None,
            Self::Right(value) => Some(value),
        }
    }

    /// Returns the right value, or `default` when this is a `Left`.
    #[inline]
    pub fn right_or(self, default: R) -> R {
        self.fold(|_| default, |value| value)
    }

    /// Returns the right value, or computes one from the left payload.
    #[inline]
    pub fn right_or_else<F>(self, function: F) -> R
    where
        F: FnOnce(L) -> R,
    {
        self.fold(function, |value| value)
    }

    // =========================================================================
    // Mapping and Chaining
    // =========================================================================

    /// Transforms the right value, leaving a left value untouched.
    #[inline]
    pub fn map<T, F>(self, function: F) -> Either<L, T>
    where
        F: FnOnce(R) -> T,
    {
        self.fold(Either::Left, |value| Either::Right(function(value)))
    }

    /// Transforms the left value, leaving a right value untouched.
    #[inline]
    pub fn map_left<T, F>(self, function: F) -> Either<T, R>
    where
        F: FnOnce(L) -> T,
    {
        self.fold(|value| Either::Left(function(value)), Either::Right)
    }

    /// Transforms whichever side is present.
    #[inline]
    pub fn bimap<T, U, FL, FR>(self, on_left: FL, on_right: FR) -> Either<T, U>
    where
        FL: FnOnce(L) -> T,
        FR: FnOnce(R) -> U,
    {
        self.fold(
            |value| Either::Left(on_left(value)),
            |value| Either::Right(on_right(value)),
        )
    }

    /// Chains a right-producing continuation.
    ///
    /// Once `Left`, the result stays `Left` with the original payload and
    /// the continuation is never called.
    #[inline]
    pub fn bind<T, F>(self, function: F) -> Either<L, T>
    where
        F: FnOnce(R) -> Either<L, T>,
    {
        self.fold(Either::Left, function)
    }

    /// Swaps the two sides.
    #[inline]
    pub fn swap(self) -> Either<R, L> {
        self.fold(Either::Right, Either::Left)
    }

    // =========================================================================
    // Conversions
    // =========================================================================

    /// Builds an `Either` from an `Option`, filling absence with a left value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use transfold::control::Either;
    ///
    /// let missing: Either<&str, i32> = Either::from_option(None, || "missing");
    /// assert_eq!(missing, Either::Left("missing"));
    /// ```
    #[inline]
    pub fn from_option<F>(option: Option<R>, left: F) -> Self
    where
        F: FnOnce() -> L,
    {
        option.map_or_else(|| Self::Left(left()), Self::Right)
    }

    /// Converts into a `Result`, mapping `Left` to `Err`.
    ///
    /// # Errors
    ///
    /// Returns `Err(left)` when this is a `Left`.
    #[inline]
    pub fn into_result(self) -> Result<R, L> {
        self.fold(Err, Ok)
    }
}

impl<L, R> From<Result<R, L>> for Either<L, R> {
    fn from(result: Result<R, L>) -> Self {
        match result {
            Ok(value) => Self::Right(value),
            Err(error) => Self::Left(error),
        }
    }
}

impl<L: fmt::Debug, R: fmt::Debug> fmt::Debug for Either<L, R> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left(value) => formatter.debug_tuple("Left").field(value).finish(),
            Self::Right(value) => formatter.debug_tuple("Right").field(value).finish(),
        }
    }
}

impl<L: fmt::Display, R: fmt::Display> fmt::Display for Either<L, R> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left(value) => write!(formatter, "Left({value})"),
            Self::Right(value) => write!(formatter, "Right({value})"),
        }
    }
}
