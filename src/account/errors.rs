//! Domain rule violations for the account aggregate.
//!
//! Each violation carries a stable code and converts into a
//! [`control::Error`](crate::control::Error), so transitions and validators
//! can report it through a [`Validation`](crate::control::Validation).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::state::AccountStatus;
use crate::control::{self, Validation};

/// A rejected account operation.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum DomainError {
    /// The operation needs an active account.
    #[error("The account is not active ({0}); the requested operation cannot be completed")]
    AccountNotActive(AccountStatus),

    /// The debit would take the balance past the allowed overdraft.
    #[error("Insufficient funds: balance {balance}, requested {requested}, allowed overdraft {allowed_overdraft}")]
    InsufficientBalance {
        /// Balance before the debit.
        balance: Decimal,
        /// Amount requested.
        requested: Decimal,
        /// Overdraft allowed on the account.
        allowed_overdraft: Decimal,
    },

    /// An account with this id already exists.
    #[error("Account {0} already exists")]
    AccountAlreadyExists(Uuid),

    /// No account has this id.
    #[error("Account {0} was not found")]
    AccountNotFound(Uuid),

    /// The amount must be strictly positive.
    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// The amount must not be negative.
    #[error("Amount must not be negative, got {0}")]
    NegativeAmount(Decimal),

    /// The amount would take a balance or limit past what can be represented.
    #[error("Amount {0} is out of range for this account")]
    AmountOutOfRange(Decimal),

    /// The beneficiary's BIC is malformed.
    #[error("The beneficiary's BIC field is invalid")]
    InvalidBic,

    /// The transfer date lies before today.
    #[error("Transfer date cannot be in the past")]
    TransferDateIsPast,
}

impl DomainError {
    /// Stable, machine-readable code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::AccountNotActive(_) => "ACCOUNT_NOT_ACTIVE",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::AccountAlreadyExists(_) => "ACCOUNT_ALREADY_EXISTS",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::NonPositiveAmount(_)
            | Self::NegativeAmount(_)
            | Self::AmountOutOfRange(_) => "INVALID_AMOUNT",
            Self::InvalidBic => "INVALID_BIC",
            Self::TransferDateIsPast => "TRANSFER_DATE_IS_PAST",
        }
    }

    /// An invalid validation carrying this violation.
    #[must_use]
    pub fn invalid<T>(self) -> Validation<T> {
        Validation::invalid(self.into())
    }
}

impl From<DomainError> for control::Error {
    fn from(error: DomainError) -> Self {
        Self::with_code(error.code(), error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(DomainError::InvalidBic, "INVALID_BIC")]
    #[case(DomainError::TransferDateIsPast, "TRANSFER_DATE_IS_PAST")]
    #[case(DomainError::AccountNotActive(AccountStatus::Frozen), "ACCOUNT_NOT_ACTIVE")]
    #[case(DomainError::NegativeAmount(Decimal::NEGATIVE_ONE), "INVALID_AMOUNT")]
    #[case(DomainError::AmountOutOfRange(Decimal::MAX), "INVALID_AMOUNT")]
    fn converts_with_code(#[case] error: DomainError, #[case] code: &str) {
        let message = error.to_string();
        let converted = control::Error::from(error);

        assert_eq!(converted.code(), code);
        assert_eq!(converted.message(), message);
    }

    #[rstest]
    fn not_active_names_status() {
        let error = DomainError::AccountNotActive(AccountStatus::Frozen);
        assert!(error.to_string().contains("Frozen"));
    }
}
