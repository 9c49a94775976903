//! The bank account aggregate.
//!
//! Commands are checked by [`validation`], turned into events by
//! [`transitions`], and folded back into an [`AccountState`] through the
//! [`Aggregate`](crate::aggregate::Aggregate) impl. [`AccountStatement`] is
//! a read-side projection over the same history.

mod commands;
mod currency;
mod errors;
mod events;
mod state;
mod statement;
pub mod transitions;
pub mod validation;

pub use commands::{
    AccountCommand, AcknowledgeCashDeposit, CreateAccount, FreezeAccount, MakeTransfer,
    OpenAccount, SetOverdraft,
};
pub use currency::CurrencyCode;
pub use errors::DomainError;
pub use events::{
    AccountEvent, AlteredOverdraft, CreatedAccount, DebitedTransfer, DepositedCash, FrozeAccount,
};
pub use state::{AccountState, AccountStatus};
pub use statement::{AccountStatement, Transaction};
