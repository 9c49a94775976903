//! Type classes shared by the result containers.
//!
//! - [`TypeConstructor`]: higher-kinded type emulation via GAT
//! - [`Functor`]: `fmap` over a present/successful value
//! - [`Applicative`]: `pure` and independent combination (`map2`, `apply`)
//! - [`Monad`]: dependent sequencing (`flat_map`)
//! - [`Semigroup`]: associative combination, used for error lists
//!
//! `Option`, [`Either`](crate::control::Either),
//! [`Validation`](crate::control::Validation) and
//! [`Exceptional`](crate::control::Exceptional) implement all of them.

mod applicative;
mod functor;
mod higher;
mod monad;
mod semigroup;

pub use applicative::Applicative;
pub use functor::Functor;
pub use higher::TypeConstructor;
pub use monad::Monad;
pub use semigroup::Semigroup;
