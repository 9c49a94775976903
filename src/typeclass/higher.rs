//! Higher-Kinded Type emulation through Generic Associated Types.
//!
//! Rust cannot abstract over `Option<_>` or `Validation<_>` as type
//! constructors directly. `TypeConstructor` names the inner type and lets
//! a trait method talk about "the same container holding a `B`", which is
//! all `Functor`, `Applicative` and `Monad` need.
//!
//! # Example
//!
//! ```rust
//! use transfold::typeclass::TypeConstructor;
//!
//! fn rewrap<T: TypeConstructor>(_: T) -> T::WithType<String>
//! where
//!     T::WithType<String>: Default,
//! {
//!     Default::default()
//! }
//!
//! let none: Option<String> = rewrap(Some(42));
//! assert_eq!(none, None);
//! ```

use crate::control::{Either, Exceptional, Validation};

/// A type that is the application of a type constructor to an inner type.
pub trait TypeConstructor {
    /// The type currently held by the container.
    type Inner;

    /// The same container applied to a different inner type.
    type WithType<B>: TypeConstructor<Inner = B>;
}

impl<A> TypeConstructor for Option<A> {
    type Inner = A;
    type WithType<B> = Option<B>;
}

impl<L, R> TypeConstructor for Either<L, R> {
    type Inner = R;
    type WithType<B> = Either<L, B>;
}

impl<A> TypeConstructor for Validation<A> {
    type Inner = A;
    type WithType<B> = Validation<B>;
}

impl<A> TypeConstructor for Exceptional<A> {
    type Inner = A;
    type WithType<B> = Exceptional<B>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn same_constructor<T: TypeConstructor>(_: &T) -> Option<T::WithType<u8>> {
        None
    }

    #[test]
    fn either_is_right_biased() {
        let value: Either<String, i32> = Either::Right(1);
        let rewrapped: Option<Either<String, u8>> = same_constructor(&value);
        assert!(rewrapped.is_none());
    }

    #[test]
    fn validation_rewraps_inner_type() {
        let value = Validation::valid("x");
        let rewrapped: Option<Validation<u8>> = same_constructor(&value);
        assert!(rewrapped.is_none());
    }
}
