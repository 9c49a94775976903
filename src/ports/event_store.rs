//! Event persistence gateway.
//!
//! The transition engine only needs two operations from a store: append a
//! batch of events for one aggregate, and load an aggregate's history.
//! Appends report environmental failures as a captured
//! [`Fault`](crate::control::Fault) instead of raising them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::RwLock;
use thiserror::Error;
use uuid::Uuid;

use crate::control::{Exceptional, Fault};

/// Failures raised by a store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventStoreError {
    /// The backing storage could not be reached.
    #[error("event store unavailable: {0}")]
    Unavailable(String),
}

/// Append/load access to per-aggregate event streams.
pub trait EventStore<E>: Send + Sync {
    /// Appends `events` to the stream of `aggregate_id`.
    ///
    /// A batch is stored completely or not at all.
    fn append(&self, aggregate_id: Uuid, events: &[E]) -> Exceptional<()>;

    /// Loads the full stream of `aggregate_id` in append order.
    ///
    /// An unknown aggregate has an empty stream.
    fn load(&self, aggregate_id: Uuid) -> Vec<E>;
}

/// A thread-safe in-memory store.
///
/// Can be told to fail appends, for exercising retry and fault paths.
#[derive(Debug)]
pub struct InMemoryEventStore<E> {
    streams: RwLock<HashMap<Uuid, Vec<E>>>,
    unavailable: AtomicBool,
    failures_pending: AtomicUsize,
}

impl<E> Default for InMemoryEventStore<E> {
    fn default() -> Self {
        Self {
            streams: RwLock::new(HashMap::new()),
            unavailable: AtomicBool::new(false),
            failures_pending: AtomicUsize::new(0),
        }
    }
}

impl<E> InMemoryEventStore<E> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every append fail until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Makes the next `count` appends fail.
    pub fn fail_next(&self, count: usize) {
        self.failures_pending.store(count, Ordering::SeqCst);
    }

    /// Number of events stored for `aggregate_id`.
    #[must_use]
    pub fn stream_len(&self, aggregate_id: Uuid) -> usize {
        self.streams.read().get(&aggregate_id).map_or(0, Vec::len)
    }

    fn take_failure(&self) -> Option<EventStoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Some(EventStoreError::Unavailable("store switched off".to_string()));
        }
        self.failures_pending
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |pending| pending.checked_sub(1))
            .ok()
            .map(|_| EventStoreError::Unavailable("transient failure".to_string()))
    }
}

impl<E: Clone + Send + Sync> EventStore<E> for InMemoryEventStore<E> {
    fn append(&self, aggregate_id: Uuid, events: &[E]) -> Exceptional<()> {
        if let Some(error) = self.take_failure() {
            tracing::debug!(%aggregate_id, %error, "append rejected");
            return Exceptional::Fault(Fault::from_error(error));
        }
        self.streams
            .write()
            .entry(aggregate_id)
            .or_default()
            .extend_from_slice(events);
        Exceptional::Ok(())
    }

    fn load(&self, aggregate_id: Uuid) -> Vec<E> {
        self.streams
            .read()
            .get(&aggregate_id)
            .cloned()
            .unwrap_or_default()
    }
}
