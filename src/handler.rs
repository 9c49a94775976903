//! Command handler boundary for bank accounts.
//!
//! [`AccountService`] keeps one actor per account id. Each actor owns the
//! account's current state and handles commands one at a time:
//!
//! 1. the command is checked by the [`CommandValidator`]
//! 2. creation commands must target a new account, all others an existing one
//! 3. the account transition runs against the current state
//! 4. the emitted events are appended to the [`EventStore`], retrying faults
//! 5. the new state is kept only if the append succeeded
//!
//! Rule violations come back as `Invalid`; a store that keeps failing comes
//! back as `Valid(Fault(..))`. [`Outcome`] flattens that nesting for callers
//! that only need to report a result. An account whose stored history does
//! not start with a creation event refuses every command with a fault.
//!
//! Actors stay registered until [`AccountService::evict`] drops them; the
//! next command for an evicted account rehydrates it from the store.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use chrono::Utc;
//! use transfold::account::{AccountCommand, AccountEvent, CreateAccount, CurrencyCode};
//! use transfold::config::EngineConfig;
//! use transfold::control::Validator;
//! use transfold::handler::{AccountService, Outcome};
//! use transfold::ports::InMemoryEventStore;
//! use uuid::Uuid;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let service = AccountService::new(
//!     Arc::new(InMemoryEventStore::<AccountEvent>::new()),
//!     Arc::new(Validator::<AccountCommand>::accept_all()),
//!     &EngineConfig::default(),
//! );
//!
//! let account_id = Uuid::new_v4();
//! let command = AccountCommand::Create(CreateAccount {
//!     account_id,
//!     currency: CurrencyCode::default(),
//!     timestamp: Utc::now(),
//! });
//!
//! let outcome = Outcome::from(service.execute(command).await);
//! assert!(outcome.is_accepted());
//! assert_eq!(service.history(account_id).len(), 1);
//! # }
//! ```

use std::fmt;
use std::future;
use std::sync::Arc;

use tokio::sync::oneshot;
use uuid::Uuid;

use crate::account::{
    AccountCommand, AccountEvent, AccountState, AccountStatement, DomainError, transitions,
};
use crate::actor::{Actor, ActorConfig, ActorError, ActorRegistry};
use crate::aggregate::{RehydrateError, rehydrate};
use crate::config::EngineConfig;
use crate::control::{Errors, Exceptional, Fault, Validation};
use crate::effect::retry_async;
use crate::ports::{CommandValidator, EventStore};

/// Message shown to callers in place of an environmental fault.
pub const GENERIC_FAILURE: &str = "something went wrong";

/// Result of executing a command: rule violations, or the new state or a
/// captured fault.
pub type CommandResult = Validation<Exceptional<AccountState>>;

/// Messages understood by an account actor.
#[derive(Debug)]
pub enum AccountMessage {
    /// Handle a command and reply with its result.
    Execute {
        /// The command to handle.
        command: AccountCommand,
        /// Where the result is sent.
        reply: oneshot::Sender<CommandResult>,
    },
    /// Reply with the current state, `None` for an unknown account.
    State {
        /// Where the state is sent.
        reply: oneshot::Sender<Option<AccountState>>,
    },
}

/// Executes account commands through per-account actors.
#[derive(Clone)]
pub struct AccountService {
    registry: ActorRegistry<Uuid, AccountMessage>,
    store: Arc<dyn EventStore<AccountEvent>>,
}

impl fmt::Debug for AccountService {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("AccountService")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl AccountService {
    /// Creates a service over `store`, gating commands with `validator`.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn new(
        store: Arc<dyn EventStore<AccountEvent>>,
        validator: Arc<dyn CommandValidator<AccountCommand>>,
        config: &EngineConfig,
    ) -> Self {
        let config = *config;
        let factory_store = Arc::clone(&store);
        let registry = ActorRegistry::new("accounts", move |account_id: &Uuid| {
            spawn_account(
                *account_id,
                Arc::clone(&factory_store),
                Arc::clone(&validator),
                config,
            )
        });
        Self { registry, store }
    }

    /// Executes `command` on the account it names.
    ///
    /// Delivery failures are reported as a fault.
    pub async fn execute(&self, command: AccountCommand) -> CommandResult {
        let account_id = command.account_id();
        let delivered = self
            .registry
            .ask(account_id, |reply| AccountMessage::Execute { command, reply })
            .await;
        match delivered {
            Ok(result) => result,
            Err(error) => {
                tracing::error!(%account_id, %error, "account actor unreachable");
                Validation::valid(Exceptional::Fault(Fault::from_error(error)))
            }
        }
    }

    /// Current state of an account, `None` if it was never created.
    ///
    /// # Errors
    ///
    /// Any [`ActorError`] raised while asking the account actor.
    pub async fn state(&self, account_id: Uuid) -> Result<Option<AccountState>, ActorError> {
        self.registry
            .ask(account_id, |reply| AccountMessage::State { reply })
            .await
    }

    /// Stops tracking the actor of an account, returning `true` if one was
    /// running.
    ///
    /// Commands already queued are still handled. The account's state lives
    /// in the store, so a later command starts a fresh actor from it.
    ///
    /// # Errors
    ///
    /// [`ActorError::Stopped`] if the registry has stopped.
    pub async fn evict(&self, account_id: Uuid) -> Result<bool, ActorError> {
        let evicted = self.registry.remove(account_id).await?;
        tracing::debug!(%account_id, evicted, "account actor evicted");
        Ok(evicted)
    }

    /// Stored events of an account, oldest first.
    #[must_use]
    pub fn history(&self, account_id: Uuid) -> Vec<AccountEvent> {
        self.store.load(account_id)
    }

    /// Monthly statement of an account; `None` for an invalid month.
    #[must_use]
    pub fn statement(&self, account_id: Uuid, month: u32, year: i32) -> Option<AccountStatement> {
        AccountStatement::create(month, year, &self.history(account_id))
    }
}

fn spawn_account(
    account_id: Uuid,
    store: Arc<dyn EventStore<AccountEvent>>,
    validator: Arc<dyn CommandValidator<AccountCommand>>,
    config: EngineConfig,
) -> Actor<AccountMessage> {
    let history = store.load(account_id);
    let (initial, corrupt) = match rehydrate::<AccountState, _>(&history) {
        Ok(state) => (Some(state), None),
        Err(RehydrateError::EmptyHistory) => (None, None),
        Err(error) => {
            tracing::error!(%account_id, %error, events = history.len(), "account history is corrupt");
            (None, Some(error))
        }
    };
    tracing::debug!(%account_id, events = history.len(), "account rehydrated");

    let actor_config = ActorConfig::named(format!("account-{account_id}")).with_mailbox(config.mailbox);
    Actor::start_async_with(actor_config, initial, move |state, message| {
        let store = Arc::clone(&store);
        let validator = Arc::clone(&validator);
        async move {
            match message {
                AccountMessage::State { reply } => {
                    let _ = reply.send(state.clone());
                    state
                }
                AccountMessage::Execute { command, reply } => {
                    let (result, state) = match corrupt {
                        Some(error) => (Validation::valid(Exceptional::Fault(Fault::from_error(error))), state),
                        None => {
                            handle(account_id, state, command, validator.as_ref(), store.as_ref(), config)
                                .await
                        }
                    };
                    if reply.send(result).is_err() {
                        tracing::debug!(%account_id, "caller went away before the reply");
                    }
                    state
                }
            }
        }
    })
}

async fn handle(
    account_id: Uuid,
    state: Option<AccountState>,
    command: AccountCommand,
    validator: &dyn CommandValidator<AccountCommand>,
    store: &dyn EventStore<AccountEvent>,
    config: EngineConfig,
) -> (CommandResult, Option<AccountState>) {
    let name = command.name();
    let planned = validator
        .check(command)
        .bind(|command| check_existence(state.as_ref(), command))
        .bind(|command| transitions::for_command(command).run(state.clone().unwrap_or_default()));

    let (events, next) = match planned {
        Validation::Valid(planned) => planned,
        Validation::Invalid(errors) => {
            tracing::info!(%account_id, command = name, %errors, "command rejected");
            return (Validation::Invalid(errors), state);
        }
    };

    let appended = retry_async(config.retry_attempts, config.backoff(), || {
        future::ready(store.append(account_id, &events))
    })
    .await;

    match appended {
        Exceptional::Ok(()) => {
            tracing::info!(%account_id, command = name, events = events.len(), "command accepted");
            (Validation::valid(Exceptional::Ok(next.clone())), Some(next))
        }
        Exceptional::Fault(fault) => {
            tracing::error!(%account_id, command = name, %fault, "events could not be stored");
            (Validation::valid(Exceptional::Fault(fault)), state)
        }
    }
}

fn check_existence(
    state: Option<&AccountState>,
    command: AccountCommand,
) -> Validation<AccountCommand> {
    match (state, command.is_creation()) {
        (Some(_), true) => DomainError::AccountAlreadyExists(command.account_id()).invalid(),
        (None, false) => DomainError::AccountNotFound(command.account_id()).invalid(),
        _ => Validation::valid(command),
    }
}

// =============================================================================
// Outcome
// =============================================================================

/// Caller-facing result of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T = AccountState> {
    /// The command was applied.
    Accepted(T),
    /// The command broke one or more rules.
    Rejected(Errors),
    /// The command could not be completed; the cause has been logged.
    Failed(String),
}

impl<T> Outcome<T> {
    /// Returns `true` for [`Outcome::Accepted`].
    #[inline]
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    /// Returns `true` for [`Outcome::Rejected`].
    #[inline]
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    /// Returns `true` for [`Outcome::Failed`].
    #[inline]
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl<T> From<Validation<Exceptional<T>>> for Outcome<T> {
    fn from(result: Validation<Exceptional<T>>) -> Self {
        result.fold(Self::Rejected, |executed| {
            executed.fold(
                |fault| {
                    tracing::error!(%fault, "command failed");
                    Self::Failed(GENERIC_FAILURE.to_string())
                },
                Self::Accepted,
            )
        })
    }
}
