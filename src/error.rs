//! Crate-level error type for failures outside the result algebra.
//!
//! Domain rule violations travel as [`Validation`](crate::control::Validation)
//! values and captured faults as [`Exceptional`](crate::control::Exceptional)
//! values. `TransfoldError` covers what is left: misconfiguration, an
//! unusable event history and actor delivery failures.

use thiserror::Error;

use crate::actor::ActorError;
use crate::aggregate::RehydrateError;
use crate::config::ConfigError;

/// Errors raised while setting up or driving the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransfoldError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An event history could not be folded into an aggregate.
    #[error(transparent)]
    Rehydrate(#[from] RehydrateError),

    /// A message could not be delivered or answered.
    #[error(transparent)]
    Actor(#[from] ActorError),
}

/// Result alias using [`TransfoldError`].
pub type Result<T> = std::result::Result<T, TransfoldError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn wraps_sources_transparently() {
        let error = TransfoldError::from(RehydrateError::EmptyHistory);
        assert_eq!(error.to_string(), "history is empty");
    }
}
