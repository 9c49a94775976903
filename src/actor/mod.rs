//! Single-writer actors.
//!
//! An [`Actor<Msg>`] owns a piece of state inside one tokio task and applies
//! messages to it strictly one at a time, in the order they were enqueued.
//! The state never leaves that task; callers interact only by sending
//! messages, optionally carrying a `oneshot` reply channel (see
//! [`Actor::ask`]).
//!
//! While a processing future is suspended the mailbox keeps accepting
//! messages, but the next one is not started until the current new state
//! has been committed.
//!
//! A processing function that panics is not caught. The panic ends the
//! actor's loop, the mailbox closes, and the host can observe the outcome
//! through [`ActorMonitor::terminated`].
//!
//! # Examples
//!
//! ```rust
//! use transfold::actor::Actor;
//! use tokio::sync::oneshot;
//!
//! enum Counter {
//!     Add(u64),
//!     Get(oneshot::Sender<u64>),
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let counter = Actor::start(0_u64, |total, message| match message {
//!     Counter::Add(amount) => total + amount,
//!     Counter::Get(reply) => {
//!         let _ = reply.send(total);
//!         total
//!     }
//! });
//!
//! counter.tell(Counter::Add(2)).unwrap();
//! counter.tell(Counter::Add(3)).unwrap();
//! assert_eq!(counter.ask(Counter::Get).await.unwrap(), 5);
//! # }
//! ```

mod registry;

use std::fmt;
use std::future;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::Instrument;

use crate::control::Fault;

pub use registry::ActorRegistry;

// =============================================================================
// Configuration
// =============================================================================

/// Mailbox capacity policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mailbox {
    /// Never rejects a message.
    #[default]
    Unbounded,
    /// Holds at most this many pending messages (at least one).
    Bounded(usize),
}

impl Mailbox {
    /// `Bounded(capacity)`, or `Unbounded` when `capacity` is `None`.
    #[must_use]
    pub fn from_capacity(capacity: Option<usize>) -> Self {
        capacity.map_or(Self::Unbounded, Self::Bounded)
    }
}

/// Settings for a new actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorConfig {
    /// Name used in log records.
    pub name: String,
    /// Mailbox policy.
    pub mailbox: Mailbox,
}

impl ActorConfig {
    /// An unbounded actor called `name`.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mailbox: Mailbox::Unbounded,
        }
    }

    /// Replaces the mailbox policy.
    #[must_use]
    pub const fn with_mailbox(mut self, mailbox: Mailbox) -> Self {
        self.mailbox = mailbox;
        self
    }
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self::named("actor")
    }
}

// =============================================================================
// Errors and termination
// =============================================================================

/// Why a message could not be delivered or answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActorError {
    /// The actor's loop has ended.
    #[error("actor has stopped")]
    Stopped,
    /// A bounded mailbox is at capacity.
    #[error("actor mailbox is full")]
    MailboxFull,
    /// The actor dropped the reply channel without answering.
    #[error("actor dropped the reply channel")]
    NoReply,
}

/// How an actor's loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// Every handle was dropped and the mailbox drained.
    Completed,
    /// The processing function panicked with this message.
    Faulted(String),
}

/// Observes an actor's termination without keeping its mailbox open.
#[derive(Debug, Clone)]
pub struct ActorMonitor {
    termination: watch::Receiver<Option<Termination>>,
}

impl ActorMonitor {
    /// Waits until the actor's loop has ended.
    pub async fn terminated(mut self) -> Termination {
        match self.termination.wait_for(Option::is_some).await {
            Ok(termination) => termination.clone().unwrap_or(Termination::Completed),
            Err(_) => Termination::Faulted("actor supervisor vanished".to_string()),
        }
    }

    /// The termination, if the loop has already ended.
    #[must_use]
    pub fn try_terminated(&self) -> Option<Termination> {
        self.termination.borrow().clone()
    }
}

// =============================================================================
// Mailbox plumbing
// =============================================================================

enum MailboxSender<Msg> {
    Unbounded(mpsc::UnboundedSender<Msg>),
    Bounded(mpsc::Sender<Msg>),
}

impl<Msg> Clone for MailboxSender<Msg> {
    fn clone(&self) -> Self {
        match self {
            Self::Unbounded(sender) => Self::Unbounded(sender.clone()),
            Self::Bounded(sender) => Self::Bounded(sender.clone()),
        }
    }
}

enum MailboxReceiver<Msg> {
    Unbounded(mpsc::UnboundedReceiver<Msg>),
    Bounded(mpsc::Receiver<Msg>),
}

impl<Msg> MailboxReceiver<Msg> {
    async fn recv(&mut self) -> Option<Msg> {
        match self {
            Self::Unbounded(receiver) => receiver.recv().await,
            Self::Bounded(receiver) => receiver.recv().await,
        }
    }
}

fn mailbox<Msg>(policy: Mailbox) -> (MailboxSender<Msg>, MailboxReceiver<Msg>) {
    match policy {
        Mailbox::Unbounded => {
            let (sender, receiver) = mpsc::unbounded_channel();
            (
                MailboxSender::Unbounded(sender),
                MailboxReceiver::Unbounded(receiver),
            )
        }
        Mailbox::Bounded(capacity) => {
            let (sender, receiver) = mpsc::channel(capacity.max(1));
            (
                MailboxSender::Bounded(sender),
                MailboxReceiver::Bounded(receiver),
            )
        }
    }
}

// =============================================================================
// Actor
// =============================================================================

/// A cloneable handle to a single-writer actor.
///
/// The actor stops once every handle is dropped and its mailbox is drained.
pub struct Actor<Msg> {
    name: Arc<str>,
    sender: MailboxSender<Msg>,
    termination: watch::Receiver<Option<Termination>>,
}

impl<Msg> Clone for Actor<Msg> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            sender: self.sender.clone(),
            termination: self.termination.clone(),
        }
    }
}

impl<Msg> fmt::Debug for Actor<Msg> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Actor")
            .field("name", &self.name)
            .field("stopped", &self.is_stopped())
            .finish()
    }
}

static_assertions::assert_impl_all!(Actor<u32>: Send, Sync, Clone);

impl<Msg: Send + 'static> Actor<Msg> {
    /// Starts an actor with a synchronous processing function.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn start<S, F>(initial: S, process: F) -> Self
    where
        S: Send + 'static,
        F: FnMut(S, Msg) -> S + Send + 'static,
    {
        Self::start_with(ActorConfig::default(), initial, process)
    }

    /// [`start`](Self::start) with explicit settings.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn start_with<S, F>(config: ActorConfig, initial: S, mut process: F) -> Self
    where
        S: Send + 'static,
        F: FnMut(S, Msg) -> S + Send + 'static,
    {
        Self::start_async_with(config, initial, move |state, message| {
            future::ready(process(state, message))
        })
    }

    /// Starts an actor whose processing function completes asynchronously.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn start_async<S, F, Fut>(initial: S, process: F) -> Self
    where
        S: Send + 'static,
        F: FnMut(S, Msg) -> Fut + Send + 'static,
        Fut: Future<Output = S> + Send + 'static,
    {
        Self::start_async_with(ActorConfig::default(), initial, process)
    }

    /// [`start_async`](Self::start_async) with explicit settings.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn start_async_with<S, F, Fut>(config: ActorConfig, initial: S, mut process: F) -> Self
    where
        S: Send + 'static,
        F: FnMut(S, Msg) -> Fut + Send + 'static,
        Fut: Future<Output = S> + Send + 'static,
    {
        let (sender, mut receiver) = mailbox(config.mailbox);
        let (termination_sender, termination) = watch::channel(None);
        let name: Arc<str> = Arc::from(config.name);

        let loop_name = Arc::clone(&name);
        let worker = tokio::spawn(async move {
            let mut state = initial;
            let mut sequence: u64 = 0;
            while let Some(message) = receiver.recv().await {
                sequence += 1;
                let span = tracing::debug_span!("actor_message", actor = %loop_name, sequence);
                state = process(state, message).instrument(span).await;
            }
            tracing::debug!(actor = %loop_name, processed = sequence, "mailbox closed, actor stopping");
        });

        let supervisor_name = Arc::clone(&name);
        tokio::spawn(async move {
            let outcome = match worker.await {
                Ok(()) => Termination::Completed,
                Err(error) if error.is_panic() => {
                    let fault = Fault::from_panic(error.into_panic().as_ref());
                    tracing::error!(actor = %supervisor_name, %fault, "actor processing panicked");
                    Termination::Faulted(fault.message().to_string())
                }
                Err(_) => Termination::Faulted("actor task was cancelled".to_string()),
            };
            let _ = termination_sender.send(Some(outcome));
        });

        Self {
            name,
            sender,
            termination,
        }
    }

    /// Starts an actor without state that runs `action` for each message.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn stateless<F>(mut action: F) -> Self
    where
        F: FnMut(Msg) + Send + 'static,
    {
        Self::start((), move |(), message| action(message))
    }
}

impl<Msg> Actor<Msg> {
    /// The actor's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Enqueues `message` without waiting.
    ///
    /// # Errors
    ///
    /// [`ActorError::Stopped`] if the loop has ended, or
    /// [`ActorError::MailboxFull`] if a bounded mailbox is at capacity.
    pub fn tell(&self, message: Msg) -> Result<(), ActorError> {
        match &self.sender {
            MailboxSender::Unbounded(sender) => {
                sender.send(message).map_err(|_| ActorError::Stopped)
            }
            MailboxSender::Bounded(sender) => sender.try_send(message).map_err(|error| match error {
                mpsc::error::TrySendError::Full(_) => ActorError::MailboxFull,
                mpsc::error::TrySendError::Closed(_) => ActorError::Stopped,
            }),
        }
    }

    /// Enqueues `message`, waiting for room in a bounded mailbox.
    ///
    /// # Errors
    ///
    /// [`ActorError::Stopped`] if the loop has ended.
    pub async fn send(&self, message: Msg) -> Result<(), ActorError> {
        match &self.sender {
            MailboxSender::Unbounded(sender) => {
                sender.send(message).map_err(|_| ActorError::Stopped)
            }
            MailboxSender::Bounded(sender) => {
                sender.send(message).await.map_err(|_| ActorError::Stopped)
            }
        }
    }

    /// Sends a message carrying a reply channel and waits for the answer.
    ///
    /// # Errors
    ///
    /// [`ActorError::Stopped`] if the message could not be delivered, or
    /// [`ActorError::NoReply`] if the actor dropped the reply channel.
    pub async fn ask<R, F>(&self, make_message: F) -> Result<R, ActorError>
    where
        F: FnOnce(oneshot::Sender<R>) -> Msg,
    {
        let (reply, response) = oneshot::channel();
        self.send(make_message(reply)).await?;
        response.await.map_err(|_| ActorError::NoReply)
    }

    /// Returns `true` once the loop has ended.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        match &self.sender {
            MailboxSender::Unbounded(sender) => sender.is_closed(),
            MailboxSender::Bounded(sender) => sender.is_closed(),
        }
    }

    /// A monitor that does not keep the mailbox open.
    #[must_use]
    pub fn monitor(&self) -> ActorMonitor {
        ActorMonitor {
            termination: self.termination.clone(),
        }
    }

    /// Waits until the loop has ended.
    ///
    /// This handle keeps the mailbox open, so it only returns once the
    /// actor has faulted; use [`monitor`](Self::monitor) to wait for a
    /// normal shutdown.
    pub async fn terminated(&self) -> Termination {
        self.monitor().terminated().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, Mailbox::Unbounded)]
    #[case(Some(8), Mailbox::Bounded(8))]
    fn mailbox_from_capacity(#[case] capacity: Option<usize>, #[case] expected: Mailbox) {
        assert_eq!(Mailbox::from_capacity(capacity), expected);
    }

    #[tokio::test]
    async fn bounded_mailbox_reports_full() {
        let (gate_open, gate) = oneshot::channel::<()>();
        let mut gate = Some(gate);
        let config = ActorConfig::named("gated").with_mailbox(Mailbox::Bounded(1));
        let actor = Actor::start_async_with(config, (), move |(), (): ()| {
            let gate = gate.take();
            async move {
                if let Some(gate) = gate {
                    let _ = gate.await;
                }
            }
        });

        actor.tell(()).unwrap();
        // Wait for the first message to be dequeued and block on the gate.
        tokio::task::yield_now().await;
        while actor.tell(()).is_ok() {
            tokio::task::yield_now().await;
        }
        assert_eq!(actor.tell(()), Err(ActorError::MailboxFull));

        gate_open.send(()).unwrap();
    }

    #[tokio::test]
    async fn stopped_actor_rejects_messages() {
        let actor = Actor::stateless(|message: u8| {
            if message == 0 {
                panic!("zero is poison");
            }
        });

        actor.tell(0).unwrap();
        assert_eq!(
            actor.terminated().await,
            Termination::Faulted("zero is poison".to_string())
        );
        assert_eq!(actor.tell(1), Err(ActorError::Stopped));
        assert!(actor.is_stopped());
    }

    #[tokio::test]
    async fn monitor_sees_normal_completion() {
        let actor = Actor::stateless(|_: u8| {});
        let monitor = actor.monitor();
        drop(actor);

        assert_eq!(monitor.terminated().await, Termination::Completed);
    }

    #[tokio::test]
    async fn ask_without_reply_is_reported() {
        let actor = Actor::stateless(|reply: oneshot::Sender<u8>| drop(reply));
        assert_eq!(actor.ask(|reply| reply).await, Err(ActorError::NoReply));
    }
}
