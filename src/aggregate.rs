//! Rebuilding aggregate state from its event history.
//!
//! An aggregate is created by its first event and evolved by folding every
//! later event into it. A history that is empty, or that does not begin with
//! a creation event, does not describe an aggregate.

use thiserror::Error;

use crate::control::Validation;

/// State that can be derived by folding events.
pub trait Aggregate: Sized {
    /// The events this aggregate is built from.
    type Event;

    /// Builds the initial state from a creation event.
    ///
    /// Returns `None` for any event that cannot start a history.
    fn create(event: &Self::Event) -> Option<Self>;

    /// Applies a later event to the state.
    #[must_use]
    fn apply(self, event: &Self::Event) -> Self;
}

/// Why a history could not be folded into an aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RehydrateError {
    /// The history contained no events.
    #[error("history is empty")]
    EmptyHistory,
    /// The first event is not a creation event.
    #[error("history does not start with a creation event")]
    MissingCreationEvent,
}

/// Folds `history` into an aggregate.
///
/// # Errors
///
/// Returns [`RehydrateError::EmptyHistory`] for an empty history and
/// [`RehydrateError::MissingCreationEvent`] when the first event cannot
/// create the aggregate.
pub fn rehydrate<'a, A, I>(history: I) -> Result<A, RehydrateError>
where
    A: Aggregate,
    A::Event: 'a,
    I: IntoIterator<Item = &'a A::Event>,
{
    let mut events = history.into_iter();
    let first = events.next().ok_or(RehydrateError::EmptyHistory)?;
    let created = A::create(first).ok_or(RehydrateError::MissingCreationEvent)?;
    Ok(events.fold(created, A::apply))
}

/// Folds `history` into an aggregate, or `None` if it is not a valid
/// history.
pub fn from_history<'a, A, I>(history: I) -> Option<A>
where
    A: Aggregate,
    A::Event: 'a,
    I: IntoIterator<Item = &'a A::Event>,
{
    rehydrate(history).ok()
}

/// Applies `event` to `state` and pairs them as a transition result.
pub fn emit<A, E>(state: A, event: E) -> Validation<(E, A)>
where
    A: Aggregate<Event = E>,
{
    let next = state.apply(&event);
    Validation::valid((event, next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug, Clone, PartialEq)]
    enum CounterEvent {
        Opened(i32),
        Added(i32),
    }

    #[derive(Debug, PartialEq)]
    struct Counter(i32);

    impl Aggregate for Counter {
        type Event = CounterEvent;

        fn create(event: &CounterEvent) -> Option<Self> {
            match event {
                CounterEvent::Opened(start) => Some(Self(*start)),
                CounterEvent::Added(_) => None,
            }
        }

        fn apply(self, event: &CounterEvent) -> Self {
            match event {
                CounterEvent::Opened(_) => self,
                CounterEvent::Added(amount) => Self(self.0 + amount),
            }
        }
    }

    #[rstest]
    fn rehydrate_folds_in_order() {
        let history = [
            CounterEvent::Opened(1),
            CounterEvent::Added(2),
            CounterEvent::Added(3),
        ];
        assert_eq!(rehydrate::<Counter, _>(&history), Ok(Counter(6)));
    }

    #[rstest]
    #[case(vec![], RehydrateError::EmptyHistory)]
    #[case(vec![CounterEvent::Added(2)], RehydrateError::MissingCreationEvent)]
    fn rehydrate_rejects_invalid_histories(
        #[case] history: Vec<CounterEvent>,
        #[case] expected: RehydrateError,
    ) {
        assert_eq!(rehydrate::<Counter, _>(&history), Err(expected));
        assert_eq!(from_history::<Counter, _>(&history), None);
    }

    #[rstest]
    fn emit_applies_event() {
        let result = emit(Counter(1), CounterEvent::Added(4));
        assert_eq!(result, Validation::valid((CounterEvent::Added(4), Counter(5))));
    }
}
