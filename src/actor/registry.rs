//! One actor per key, created on first use.
//!
//! The key-to-actor map is itself the state of a routing actor, so it is
//! never shared between tasks. Lookups go through that actor's mailbox.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use tokio::sync::oneshot;

use super::{Actor, ActorConfig, ActorError};

enum RegistryMessage<K, Msg> {
    Lookup {
        key: K,
        reply: oneshot::Sender<Actor<Msg>>,
    },
    Remove {
        key: K,
        reply: oneshot::Sender<bool>,
    },
    Count {
        reply: oneshot::Sender<usize>,
    },
}

/// Routes messages to per-key child actors built by a factory.
pub struct ActorRegistry<K, Msg> {
    router: Actor<RegistryMessage<K, Msg>>,
}

impl<K, Msg> Clone for ActorRegistry<K, Msg> {
    fn clone(&self) -> Self {
        Self {
            router: self.router.clone(),
        }
    }
}

impl<K, Msg> fmt::Debug for ActorRegistry<K, Msg> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ActorRegistry")
            .field("router", &self.router)
            .finish()
    }
}

impl<K, Msg> ActorRegistry<K, Msg>
where
    K: Eq + Hash + Clone + fmt::Debug + Send + 'static,
    Msg: Send + 'static,
{
    /// Creates a registry whose children are built by `factory`.
    ///
    /// The factory runs inside the routing actor, once per key, and again
    /// if a key's child has stopped.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn new<F>(name: impl Into<String>, mut factory: F) -> Self
    where
        F: FnMut(&K) -> Actor<Msg> + Send + 'static,
    {
        let name = name.into();
        let log_name = name.clone();
        let router = Actor::start_with(
            ActorConfig::named(name),
            HashMap::<K, Actor<Msg>>::new(),
            move |mut children, message| {
                match message {
                    RegistryMessage::Lookup { key, reply } => {
                        let child = match children.get(&key) {
                            Some(child) if !child.is_stopped() => child.clone(),
                            stale => {
                                if stale.is_some() {
                                    tracing::warn!(registry = %log_name, ?key, "child stopped, starting a new one");
                                } else {
                                    tracing::debug!(registry = %log_name, ?key, "starting child");
                                }
                                let child = factory(&key);
                                children.insert(key, child.clone());
                                child
                            }
                        };
                        let _ = reply.send(child);
                    }
                    RegistryMessage::Remove { key, reply } => {
                        let _ = reply.send(children.remove(&key).is_some());
                    }
                    RegistryMessage::Count { reply } => {
                        let _ = reply.send(children.len());
                    }
                }
                children
            },
        );
        Self { router }
    }

    /// The child for `key`, started if needed.
    ///
    /// # Errors
    ///
    /// [`ActorError::Stopped`] if the routing actor has stopped.
    pub async fn get(&self, key: K) -> Result<Actor<Msg>, ActorError> {
        self.router
            .ask(|reply| RegistryMessage::Lookup { key, reply })
            .await
    }

    /// Enqueues `message` on the child for `key`.
    ///
    /// # Errors
    ///
    /// Any delivery error of the router or the child.
    pub async fn tell(&self, key: K, message: Msg) -> Result<(), ActorError> {
        self.get(key).await?.send(message).await
    }

    /// Asks the child for `key` and waits for the reply.
    ///
    /// # Errors
    ///
    /// Any delivery error of the router or the child, or
    /// [`ActorError::NoReply`].
    pub async fn ask<R, F>(&self, key: K, make_message: F) -> Result<R, ActorError>
    where
        F: FnOnce(oneshot::Sender<R>) -> Msg,
    {
        self.get(key).await?.ask(make_message).await
    }

    /// Forgets the child for `key`; it stops once other handles are dropped.
    ///
    /// # Errors
    ///
    /// [`ActorError::Stopped`] if the routing actor has stopped.
    pub async fn remove(&self, key: K) -> Result<bool, ActorError> {
        self.router
            .ask(|reply| RegistryMessage::Remove { key, reply })
            .await
    }

    /// Number of children currently registered.
    ///
    /// # Errors
    ///
    /// [`ActorError::Stopped`] if the routing actor has stopped.
    pub async fn len(&self) -> Result<usize, ActorError> {
        self.router
            .ask(|reply| RegistryMessage::Count { reply })
            .await
    }
}
