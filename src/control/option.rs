//! Combinators for `Option<T>` under the names the rest of the crate uses.
//!
//! `std::option::Option` already models absence structurally, so there is
//! no separate type. [`OptionExt`] adds the missing vocabulary (`bind`,
//! `where_`, `get_or_else`) and the lossy bridges to the richer containers.
//!
//! # Examples
//!
//! ```rust
//! use transfold::control::OptionExt;
//!
//! let age = Some(17).where_(|age| *age >= 18).get_or_else(0);
//! assert_eq!(age, 0);
//! ```

use super::either::Either;
use super::validation::{Error, Validation};

/// Extension methods for `Option<T>`.
///
/// None of these operations panic: absence is a silent, terminal outcome.
pub trait OptionExt<T>: Sized {
    /// Chains a function that itself returns an `Option`, flattening one level.
    fn bind<R, F>(self, function: F) -> Option<R>
    where
        F: FnOnce(T) -> Option<R>;

    /// Downgrades a present value to absent when the predicate fails.
    ///
    /// Named `where_` because `where` is a keyword.
    fn where_<P>(self, predicate: P) -> Option<T>
    where
        P: FnOnce(&T) -> bool;

    /// Extracts the value, substituting `default` on absence.
    fn get_or_else(self, default: T) -> T;

    /// Extracts the value, computing a fallback on absence.
    fn get_or_else_with<F>(self, fallback: F) -> T
    where
        F: FnOnce() -> T;

    /// Converts to an `Either`, filling absence with a left value.
    fn to_either<L, F>(self, left: F) -> Either<L, T>
    where
        F: FnOnce() -> L;

    /// Converts to a `Validation`, filling absence with an error.
    fn to_validation<F>(self, error: F) -> Validation<T>
    where
        F: FnOnce() -> Error;
}

impl<T> OptionExt<T> for Option<T> {
    #[inline]
    fn bind<R, F>(self, function: F) -> Option<R>
    where
        F: FnOnce(T) -> Option<R>,
    {
        self.and_then(function)
    }

    #[inline]
    fn where_<P>(self, predicate: P) -> Option<T>
    where
        P: FnOnce(&T) -> bool,
    {
        self.filter(predicate)
    }

    #[inline]
    fn get_or_else(self, default: T) -> T {
        self.unwrap_or(default)
    }

    #[inline]
    fn get_or_else_with<F>(self, fallback: F) -> T
    where
        F: FnOnce() -> T,
    {
        self.unwrap_or_else(fallback)
    }

    #[inline]
    fn to_either<L, F>(self, left: F) -> Either<L, T>
    where
        F: FnOnce() -> L,
    {
        Either::from_option(self, left)
    }

    #[inline]
    fn to_validation<F>(self, error: F) -> Validation<T>
    where
        F: FnOnce() -> Error,
    {
        self.map_or_else(|| Validation::invalid(error()), Validation::valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse_positive(input: &str) -> Option<u32> {
        input.parse().ok().where_(|value| *value > 0)
    }

    #[rstest]
    #[case("5", Some(5))]
    #[case("0", None)]
    #[case("five", None)]
    fn where_filters_present_values(#[case] input: &str, #[case] expected: Option<u32>) {
        assert_eq!(parse_positive(input), expected);
    }

    #[rstest]
    fn bind_chains_lookups() {
        let result = Some("7").bind(parse_positive).bind(|value| value.checked_sub(2));
        assert_eq!(result, Some(5));
    }

    #[rstest]
    fn get_or_else_with_is_lazy_when_present() {
        let mut called = false;
        let value = Some(1).get_or_else_with(|| {
            called = true;
            0
        });
        assert_eq!(value, 1);
        assert!(!called);
    }

    #[rstest]
    fn to_validation_carries_error_on_absence() {
        let validation = None::<i32>.to_validation(|| Error::new("no account"));
        assert_eq!(validation, Validation::invalid(Error::new("no account")));
    }
}
