//! Commands accepted by the account aggregate.
//!
//! A command is a request; the events it produces are facts. Each command
//! knows how to describe the event it would emit, but whether it is
//! allowed is decided by the transitions in
//! [`transitions`](super::transitions).

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::currency::CurrencyCode;
use super::events::{
    AlteredOverdraft, CreatedAccount, DebitedTransfer, DepositedCash, FrozeAccount,
};

/// Create a new account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAccount {
    /// Id of the new account.
    pub account_id: Uuid,
    /// Currency of the new account.
    pub currency: CurrencyCode,
    /// When the command was issued.
    pub timestamp: DateTime<Utc>,
}

impl CreateAccount {
    /// The event this command emits.
    #[must_use]
    pub fn to_event(&self) -> CreatedAccount {
        CreatedAccount {
            entity_id: self.account_id,
            timestamp: self.timestamp,
            currency: self.currency.clone(),
        }
    }
}

/// Record cash deposited at a branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcknowledgeCashDeposit {
    /// Target account.
    pub account_id: Uuid,
    /// Amount deposited.
    pub amount: Decimal,
    /// Branch taking the deposit.
    pub branch_id: Uuid,
    /// When the command was issued.
    pub timestamp: DateTime<Utc>,
}

impl AcknowledgeCashDeposit {
    /// The event this command emits.
    #[must_use]
    pub const fn to_event(&self) -> DepositedCash {
        DepositedCash {
            entity_id: self.account_id,
            timestamp: self.timestamp,
            amount: self.amount,
            branch_id: self.branch_id,
        }
    }
}

/// Set the allowed overdraft to an absolute amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetOverdraft {
    /// Target account.
    pub account_id: Uuid,
    /// New allowed overdraft.
    pub amount: Decimal,
    /// When the command was issued.
    pub timestamp: DateTime<Utc>,
}

impl SetOverdraft {
    /// The event this command emits, given the change `by`.
    #[must_use]
    pub const fn to_event(&self, by: Decimal) -> AlteredOverdraft {
        AlteredOverdraft {
            entity_id: self.account_id,
            timestamp: self.timestamp,
            by,
        }
    }
}

/// Debit a transfer to a beneficiary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MakeTransfer {
    /// Account to debit.
    pub debited_account_id: Uuid,
    /// Name of the beneficiary.
    pub beneficiary: String,
    /// Beneficiary IBAN.
    pub iban: String,
    /// Beneficiary BIC.
    pub bic: String,
    /// Requested execution date.
    pub date: NaiveDate,
    /// Amount to transfer.
    pub amount: Decimal,
    /// Payment reference.
    pub reference: String,
    /// When the command was issued.
    pub timestamp: DateTime<Utc>,
}

impl MakeTransfer {
    /// The event this command emits.
    #[must_use]
    pub fn to_event(&self) -> DebitedTransfer {
        DebitedTransfer {
            entity_id: self.debited_account_id,
            timestamp: self.timestamp,
            beneficiary: self.beneficiary.clone(),
            iban: self.iban.clone(),
            bic: self.bic.clone(),
            debited_amount: self.amount,
            reference: self.reference.clone(),
        }
    }
}

/// Freeze an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreezeAccount {
    /// Target account.
    pub account_id: Uuid,
    /// When the command was issued.
    pub timestamp: DateTime<Utc>,
}

impl FreezeAccount {
    /// The event this command emits.
    #[must_use]
    pub const fn to_event(&self) -> FrozeAccount {
        FrozeAccount {
            entity_id: self.account_id,
            timestamp: self.timestamp,
        }
    }
}

/// Create an account, deposit an initial amount and set its overdraft in
/// one step.
///
/// Either all three events are produced or none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenAccount {
    /// Id of the new account.
    pub account_id: Uuid,
    /// Currency of the new account.
    pub currency: CurrencyCode,
    /// Initial deposit.
    pub initial_deposit: Decimal,
    /// Branch taking the initial deposit.
    pub branch_id: Uuid,
    /// Allowed overdraft.
    pub allowed_overdraft: Decimal,
    /// When the command was issued.
    pub timestamp: DateTime<Utc>,
}

impl OpenAccount {
    /// The creation step.
    #[must_use]
    pub fn create(&self) -> CreateAccount {
        CreateAccount {
            account_id: self.account_id,
            currency: self.currency.clone(),
            timestamp: self.timestamp,
        }
    }

    /// The initial deposit step.
    #[must_use]
    pub const fn deposit(&self) -> AcknowledgeCashDeposit {
        AcknowledgeCashDeposit {
            account_id: self.account_id,
            amount: self.initial_deposit,
            branch_id: self.branch_id,
            timestamp: self.timestamp,
        }
    }

    /// The overdraft step.
    #[must_use]
    pub const fn set_overdraft(&self) -> SetOverdraft {
        SetOverdraft {
            account_id: self.account_id,
            amount: self.allowed_overdraft,
            timestamp: self.timestamp,
        }
    }
}

/// Any command of the account aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AccountCommand {
    /// See [`CreateAccount`].
    Create(CreateAccount),
    /// See [`OpenAccount`].
    Open(OpenAccount),
    /// See [`AcknowledgeCashDeposit`].
    Deposit(AcknowledgeCashDeposit),
    /// See [`SetOverdraft`].
    SetOverdraft(SetOverdraft),
    /// See [`MakeTransfer`].
    Transfer(MakeTransfer),
    /// See [`FreezeAccount`].
    Freeze(FreezeAccount),
}

impl AccountCommand {
    /// The account the command targets.
    #[must_use]
    pub const fn account_id(&self) -> Uuid {
        match self {
            Self::Create(command) => command.account_id,
            Self::Open(command) => command.account_id,
            Self::Deposit(command) => command.account_id,
            Self::SetOverdraft(command) => command.account_id,
            Self::Transfer(command) => command.debited_account_id,
            Self::Freeze(command) => command.account_id,
        }
    }

    /// Returns `true` for commands that bring an account into existence.
    #[must_use]
    pub const fn is_creation(&self) -> bool {
        matches!(self, Self::Create(_) | Self::Open(_))
    }

    /// Command name, as used in log records.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Create(_) => "CreateAccount",
            Self::Open(_) => "OpenAccount",
            Self::Deposit(_) => "AcknowledgeCashDeposit",
            Self::SetOverdraft(_) => "SetOverdraft",
            Self::Transfer(_) => "MakeTransfer",
            Self::Freeze(_) => "FreezeAccount",
        }
    }
}
