//! Validated state transitions.
//!
//! A [`Transition<S, E>`] is a reusable function from a state to either a
//! validation failure or an `(event, next_state)` pair. Transitions hold no
//! mutable state: each run owns the state value it is given, so running the
//! same transition concurrently on different states is always safe.
//!
//! Transitions compose fail-fast. If any step is invalid the whole
//! composition is invalid, and events computed by earlier steps are dropped
//! together with their intermediate states.
//!
//! # Examples
//!
//! ```rust
//! use transfold::control::{Error, Validation};
//! use transfold::transition::{Transition, sequence};
//!
//! fn add(amount: i64) -> Transition<i64, i64> {
//!     Transition::new(move |balance: i64| {
//!         let next = balance + amount;
//!         if next < 0 {
//!             Validation::invalid(Error::new("balance would be negative"))
//!         } else {
//!             Validation::valid((amount, next))
//!         }
//!     })
//! }
//!
//! let applied = sequence([add(10), add(-4)]).run(0);
//! assert_eq!(applied, Validation::valid((vec![10, -4], 6)));
//!
//! let rejected = sequence([add(10), add(-40), add(5)]).run(0);
//! assert!(rejected.is_invalid());
//! ```

use std::fmt;
use std::sync::Arc;

use crate::control::{Error, Validation};

type Step<S, E> = dyn Fn(S) -> Validation<(E, S)> + Send + Sync;

/// A function `S -> Validation<(E, S)>`.
pub struct Transition<S, E> {
    step: Arc<Step<S, E>>,
}

impl<S, E> Clone for Transition<S, E> {
    fn clone(&self) -> Self {
        Self {
            step: Arc::clone(&self.step),
        }
    }
}

impl<S, E> fmt::Debug for Transition<S, E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("Transition").finish_non_exhaustive()
    }
}

impl<S: 'static, E: 'static> Transition<S, E> {
    /// Wraps a step function.
    pub fn new<F>(step: F) -> Self
    where
        F: Fn(S) -> Validation<(E, S)> + Send + Sync + 'static,
    {
        Self {
            step: Arc::new(step),
        }
    }

    /// Runs the transition against `state`.
    pub fn run(&self, state: S) -> Validation<(E, S)> {
        (self.step)(state)
    }

    /// Emits `event` and leaves the state unchanged.
    pub fn pure(event: E) -> Self
    where
        E: Clone + Send + Sync,
    {
        Self::new(move |state| Validation::valid((event.clone(), state)))
    }

    /// Always rejects with `error`.
    pub fn reject(error: Error) -> Self {
        Self::new(move |_| Validation::invalid(error.clone()))
    }

    /// Transforms the emitted event; the state is untouched.
    #[must_use]
    pub fn map<R, F>(self, project: F) -> Transition<S, R>
    where
        R: 'static,
        F: Fn(E) -> R + Send + Sync + 'static,
    {
        Transition::new(move |state| {
            self.run(state)
                .map(|(event, next)| (project(event), next))
        })
    }

    /// Chooses the next transition from the emitted event and runs it on
    /// the resulting state. Only the second event is kept.
    #[must_use]
    pub fn flat_map<R, F>(self, bind: F) -> Transition<S, R>
    where
        R: 'static,
        F: Fn(E) -> Transition<S, R> + Send + Sync + 'static,
    {
        Transition::new(move |state| {
            self.run(state)
                .bind(|(event, next)| bind(event).run(next))
        })
    }

    /// Like [`flat_map`](Self::flat_map), then combines both events with
    /// `project`.
    #[must_use]
    pub fn and_then_with<R, RR, B, P>(self, bind: B, project: P) -> Transition<S, RR>
    where
        R: 'static,
        RR: 'static,
        B: Fn(&E) -> Transition<S, R> + Send + Sync + 'static,
        P: Fn(E, R) -> RR + Send + Sync + 'static,
    {
        Transition::new(move |state| {
            self.run(state).bind(|(first, next)| {
                bind(&first)
                    .run(next)
                    .map(|(second, last)| (project(first, second), last))
            })
        })
    }

    /// Runs `self` then `next`, keeping both events.
    #[must_use]
    pub fn then<R: 'static>(self, next: Transition<S, R>) -> Transition<S, (E, R)> {
        self.and_then_with(move |_| next.clone(), |first, second| (first, second))
    }
}

/// Runs `transitions` in order, threading the state through each.
///
/// On success yields every event in application order and the final state.
/// The first invalid step makes the whole run invalid with that step's
/// errors; later transitions are not run.
pub fn sequence<S, E, I>(transitions: I) -> Transition<S, Vec<E>>
where
    S: 'static,
    E: 'static,
    I: IntoIterator<Item = Transition<S, E>>,
{
    let transitions: Vec<Transition<S, E>> = transitions.into_iter().collect();
    Transition::new(move |seed| {
        let mut events = Vec::with_capacity(transitions.len());
        let mut state = seed;
        for transition in &transitions {
            match transition.run(state) {
                Validation::Valid((event, next)) => {
                    events.push(event);
                    state = next;
                }
                Validation::Invalid(errors) => return Validation::invalid_many(errors),
            }
        }
        Validation::valid((events, state))
    })
}
