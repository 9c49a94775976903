//! Account aggregate state.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::currency::CurrencyCode;
use super::events::AccountEvent;
use crate::aggregate::Aggregate;

/// Lifecycle status of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AccountStatus {
    /// Not yet created.
    #[default]
    Requested,
    /// Open for business.
    Active,
    /// Temporarily blocked.
    Frozen,
    /// Inactive for a long period.
    Dormant,
    /// Permanently closed.
    Closed,
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Requested => "Requested",
            Self::Active => "Active",
            Self::Frozen => "Frozen",
            Self::Dormant => "Dormant",
            Self::Closed => "Closed",
        };
        formatter.write_str(name)
    }
}

/// Snapshot of an account, derived from its events.
///
/// The default value is the seed state of an account that does not exist
/// yet: status `Requested`, no currency, zero balance and overdraft.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccountState {
    /// Currency of the account.
    pub currency: CurrencyCode,
    /// Lifecycle status.
    pub status: AccountStatus,
    /// Current balance; negative while overdrawn.
    pub balance: Decimal,
    /// How far below zero the balance may go.
    pub allowed_overdraft: Decimal,
}

impl AccountState {
    /// A freshly created, active account.
    #[must_use]
    pub fn opened(currency: CurrencyCode) -> Self {
        Self {
            currency,
            status: AccountStatus::Active,
            ..Self::default()
        }
    }

    /// Returns `true` if the account accepts deposits and debits.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.status, AccountStatus::Active)
    }

    /// Balance plus allowed overdraft, saturating at the representable
    /// range.
    #[must_use]
    pub fn available_funds(&self) -> Decimal {
        self.balance.saturating_add(self.allowed_overdraft)
    }
}

impl Aggregate for AccountState {
    type Event = AccountEvent;

    fn create(event: &AccountEvent) -> Option<Self> {
        match event {
            AccountEvent::Created(created) => Some(Self::opened(created.currency.clone())),
            _ => None,
        }
    }

    // Transitions reject events that would overflow; stored histories are
    // folded saturating so replay never panics.
    fn apply(self, event: &AccountEvent) -> Self {
        match event {
            // A second creation event does not reset an existing account.
            AccountEvent::Created(_) => self,
            AccountEvent::Deposited(deposited) => Self {
                balance: self.balance.saturating_add(deposited.amount),
                ..self
            },
            AccountEvent::Debited(debited) => Self {
                balance: self.balance.saturating_sub(debited.debited_amount),
                ..self
            },
            AccountEvent::OverdraftAltered(altered) => Self {
                allowed_overdraft: self.allowed_overdraft.saturating_add(altered.by),
                ..self
            },
            AccountEvent::Frozen(_) => Self {
                status: AccountStatus::Frozen,
                ..self
            },
        }
    }
}
