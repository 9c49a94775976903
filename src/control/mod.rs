//! Result-carrying containers.
//!
//! - [`OptionExt`]: extra combinators for `Option<T>` (absence)
//! - [`Either`]: a single definitive error or a success
//! - [`Validation`]: zero, one or many domain-rule violations
//! - [`Exceptional`]: a value or a captured, unexpected [`Fault`]
//!
//! # Examples
//!
//! ## Fail-fast vs harvesting
//!
//! ```rust
//! use transfold::control::{Error, Validation};
//!
//! let name: Validation<&str> = Validation::invalid(Error::new("name is empty"));
//! let age: Validation<u8> = Validation::invalid(Error::new("age is negative"));
//!
//! // Harvesting evaluates both sides.
//! let harvested = name.clone().map2(age.clone(), |name, age| (name, age));
//! assert_eq!(harvested.into_errors().len(), 2);
//!
//! // Fail-fast stops at the first invalid step.
//! let failed_fast = name.bind(|name| age.map(|age| (name, age)));
//! assert_eq!(failed_fast.into_errors().len(), 1);
//! ```

mod either;
mod exceptional;
mod option;
mod validation;

pub use either::Either;
pub use exceptional::{Exceptional, Fault};
pub use option::OptionExt;
pub use validation::{
    DEFAULT_ERROR_CODE, Error, Errors, Validation, Validator, traverse_fail_fast, traverse_harvest,
};
