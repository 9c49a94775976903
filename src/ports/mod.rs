//! Capabilities the engine consumes from its environment.
//!
//! - [`Clock`]: injected time source
//! - [`EventStore`]: durable append/load of event streams
//! - [`CommandValidator`]: pass/fail judgments over a command

mod clock;
mod event_store;
mod validator;

pub use clock::{Clock, FixedClock, SystemClock};
pub use event_store::{EventStore, EventStoreError, InMemoryEventStore};
pub use validator::CommandValidator;
