//! Events recorded against an account.
//!
//! Every event is addressed to one account (`entity_id`) and timestamped.
//! Events are facts: they are never modified once emitted.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::currency::CurrencyCode;

/// The account was created in `currency`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedAccount {
    /// Account id.
    pub entity_id: Uuid,
    /// When the event happened.
    pub timestamp: DateTime<Utc>,
    /// Currency of the account.
    pub currency: CurrencyCode,
}

/// Cash was deposited at a branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositedCash {
    /// Account id.
    pub entity_id: Uuid,
    /// When the event happened.
    pub timestamp: DateTime<Utc>,
    /// Amount credited.
    pub amount: Decimal,
    /// Branch that took the deposit.
    pub branch_id: Uuid,
}

/// A transfer was debited from the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebitedTransfer {
    /// Account id.
    pub entity_id: Uuid,
    /// When the event happened.
    pub timestamp: DateTime<Utc>,
    /// Name of the beneficiary.
    pub beneficiary: String,
    /// Beneficiary IBAN.
    pub iban: String,
    /// Beneficiary BIC.
    pub bic: String,
    /// Amount debited.
    pub debited_amount: Decimal,
    /// Payment reference.
    pub reference: String,
}

/// The allowed overdraft changed by `by`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlteredOverdraft {
    /// Account id.
    pub entity_id: Uuid,
    /// When the event happened.
    pub timestamp: DateTime<Utc>,
    /// Signed change of the allowed overdraft.
    pub by: Decimal,
}

/// The account was frozen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrozeAccount {
    /// Account id.
    pub entity_id: Uuid,
    /// When the event happened.
    pub timestamp: DateTime<Utc>,
}

/// Any event of the account aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AccountEvent {
    /// See [`CreatedAccount`].
    Created(CreatedAccount),
    /// See [`DepositedCash`].
    Deposited(DepositedCash),
    /// See [`DebitedTransfer`].
    Debited(DebitedTransfer),
    /// See [`AlteredOverdraft`].
    OverdraftAltered(AlteredOverdraft),
    /// See [`FrozeAccount`].
    Frozen(FrozeAccount),
}

impl AccountEvent {
    /// The account the event belongs to.
    #[must_use]
    pub const fn entity_id(&self) -> Uuid {
        match self {
            Self::Created(event) => event.entity_id,
            Self::Deposited(event) => event.entity_id,
            Self::Debited(event) => event.entity_id,
            Self::OverdraftAltered(event) => event.entity_id,
            Self::Frozen(event) => event.entity_id,
        }
    }

    /// When the event happened.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Created(event) => event.timestamp,
            Self::Deposited(event) => event.timestamp,
            Self::Debited(event) => event.timestamp,
            Self::OverdraftAltered(event) => event.timestamp,
            Self::Frozen(event) => event.timestamp,
        }
    }

    /// Event type name, as used in log records.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::Created(_) => "CreatedAccount",
            Self::Deposited(_) => "DepositedCash",
            Self::Debited(_) => "DebitedTransfer",
            Self::OverdraftAltered(_) => "AlteredOverdraft",
            Self::Frozen(_) => "FrozeAccount",
        }
    }
}

impl From<CreatedAccount> for AccountEvent {
    fn from(event: CreatedAccount) -> Self {
        Self::Created(event)
    }
}

impl From<DepositedCash> for AccountEvent {
    fn from(event: DepositedCash) -> Self {
        Self::Deposited(event)
    }
}

impl From<DebitedTransfer> for AccountEvent {
    fn from(event: DebitedTransfer) -> Self {
        Self::Debited(event)
    }
}

impl From<AlteredOverdraft> for AccountEvent {
    fn from(event: AlteredOverdraft) -> Self {
        Self::OverdraftAltered(event)
    }
}

impl From<FrozeAccount> for AccountEvent {
    fn from(event: FrozeAccount) -> Self {
        Self::Frozen(event)
    }
}
