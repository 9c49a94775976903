//! Command validators for the account aggregate.
//!
//! These are the checks made before a command reaches a transition: they
//! look at the command alone (plus the clock), never at account state.
//! Transfer checks harvest, so a caller sees every problem at once.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use rust_decimal::Decimal;

use super::commands::{AccountCommand, MakeTransfer};
use super::errors::DomainError;
use crate::control::{Validation, Validator};
use crate::ports::Clock;

static BIC_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new("^[A-Z]{6}[A-Z1-9]{5}$").ok());

/// Returns `true` if `bic` is an 11-character BIC.
#[must_use]
pub fn is_valid_bic(bic: &str) -> bool {
    BIC_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(bic))
}

/// The beneficiary BIC must be well formed.
#[must_use]
pub fn bic_is_valid() -> Validator<MakeTransfer> {
    Validator::predicate(
        |transfer: &MakeTransfer| is_valid_bic(&transfer.bic),
        |_| DomainError::InvalidBic.into(),
    )
}

/// The transfer date must not lie before today, according to `clock`.
#[must_use]
pub fn date_not_past(clock: Arc<dyn Clock>) -> Validator<MakeTransfer> {
    Validator::predicate(
        move |transfer: &MakeTransfer| transfer.date >= clock.today(),
        |_| DomainError::TransferDateIsPast.into(),
    )
}

fn positive(amount: Decimal) -> Validation<()> {
    if amount > Decimal::ZERO {
        Validation::valid(())
    } else {
        DomainError::NonPositiveAmount(amount).invalid()
    }
}

fn non_negative(amount: Decimal) -> Validation<()> {
    if amount >= Decimal::ZERO {
        Validation::valid(())
    } else {
        DomainError::NegativeAmount(amount).invalid()
    }
}

/// The transferred amount must be positive.
#[must_use]
pub fn amount_is_positive() -> Validator<MakeTransfer> {
    Validator::new(|transfer: &MakeTransfer| positive(transfer.amount))
}

/// Every transfer check, harvested.
#[must_use]
pub fn transfer(clock: Arc<dyn Clock>) -> Validator<MakeTransfer> {
    Validator::harvest([bic_is_valid(), date_not_past(clock), amount_is_positive()])
}

/// Validator for any account command.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use chrono::Utc;
/// use rust_decimal::Decimal;
/// use transfold::account::{AccountCommand, SetOverdraft, validation};
/// use transfold::ports::SystemClock;
/// use uuid::Uuid;
///
/// let validator = validation::command(Arc::new(SystemClock));
/// let command = AccountCommand::SetOverdraft(SetOverdraft {
///     account_id: Uuid::new_v4(),
///     amount: Decimal::NEGATIVE_ONE,
///     timestamp: Utc::now(),
/// });
///
/// assert!(validator.check(command).is_invalid());
/// ```
#[must_use]
pub fn command(clock: Arc<dyn Clock>) -> Validator<AccountCommand> {
    let transfer = transfer(clock);
    Validator::new(move |command: &AccountCommand| match command {
        AccountCommand::Create(_) | AccountCommand::Freeze(_) => Validation::valid(()),
        AccountCommand::Open(open) => positive(open.initial_deposit)
            .map2(non_negative(open.allowed_overdraft), |(), ()| ()),
        AccountCommand::Deposit(deposit) => positive(deposit.amount),
        AccountCommand::SetOverdraft(overdraft) => non_negative(overdraft.amount),
        AccountCommand::Transfer(command) => transfer.validate(command),
    })
}
