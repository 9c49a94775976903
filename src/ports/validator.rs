//! Pass/fail judgments over commands.

use crate::control::{Validation, Validator};

/// Decides whether a command may proceed.
///
/// On success the command is handed back unchanged.
pub trait CommandValidator<C>: Send + Sync {
    /// Checks `command`.
    fn check(&self, command: C) -> Validation<C>;

    /// Coarse form of [`check`](Self::check).
    fn is_valid(&self, command: &C) -> bool
    where
        C: Clone,
    {
        self.check(command.clone()).is_valid()
    }
}

impl<C: 'static> CommandValidator<C> for Validator<C> {
    fn check(&self, command: C) -> Validation<C> {
        Validator::check(self, command)
    }
}

impl<C, F> CommandValidator<C> for F
where
    F: Fn(C) -> Validation<C> + Send + Sync,
{
    fn check(&self, command: C) -> Validation<C> {
        self(command)
    }
}
