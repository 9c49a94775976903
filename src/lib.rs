//! # transfold
//!
//! Result-carrying containers with explicit combination laws, a transition
//! engine that threads aggregate state through validated event-emitting
//! steps, and single-writer actors that serialize access to it.
//!
//! ## Overview
//!
//! - **Type Classes**: Functor, Applicative, Monad, Semigroup
//! - **Control**: `Either`, `Validation` with fail-fast and harvesting
//!   validators, `Exceptional` for captured faults, `Option` extensions
//! - **Effect**: deferred `Try` computations and `retry` with backoff
//! - **Transition**: `S -> Validation<(E, S)>` steps and aggregate
//!   rehydration
//! - **Actor**: tokio-backed single-writer actors and a keyed registry
//! - **Account**: a bank account aggregate built on all of the above, with
//!   the [`handler::AccountService`] command boundary
//!
//! ## Example
//!
//! ```rust
//! use transfold::prelude::*;
//!
//! let lower = Validator::predicate(
//!     |code: &String| code.chars().all(char::is_lowercase),
//!     |_| Error::new("should be lower case"),
//! );
//! let short = Validator::predicate(
//!     |code: &String| code.len() == 2,
//!     |_| Error::new("should be of length 2"),
//! );
//!
//! let result = Validator::harvest([lower, short]).check("USA".to_string());
//! assert_eq!(result.into_errors().len(), 2);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Note: Disabling redundant_closure_for_method_calls due to clippy 0.1.92 panic bug
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and traits.
///
/// # Usage
///
/// ```rust
/// use transfold::prelude::*;
/// ```
pub mod prelude {
    pub use crate::typeclass::*;

    pub use crate::control::*;

    pub use crate::effect::*;

    pub use crate::aggregate::{Aggregate, from_history, rehydrate};
    pub use crate::transition::{Transition, sequence};

    pub use crate::actor::{Actor, ActorConfig, ActorError, ActorRegistry, Mailbox};

    pub use crate::ports::*;
}

pub mod account;
pub mod actor;
pub mod aggregate;
pub mod config;
pub mod control;
pub mod effect;
pub mod error;
pub mod handler;
pub mod ports;
pub mod transition;
pub mod typeclass;
