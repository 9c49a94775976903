//! Account transitions: the rules deciding which events a command emits.
//!
//! Each function turns a command into a [`Transition`] over
//! [`AccountState`]. A transition either rejects the command with a
//! [`DomainError`] or yields the event together with the state that event
//! produces.
//!
//! # Examples
//!
//! ```rust
//! use chrono::Utc;
//! use rust_decimal::Decimal;
//! use transfold::account::{AccountState, CurrencyCode, OpenAccount, transitions};
//! use uuid::Uuid;
//!
//! let command = OpenAccount {
//!     account_id: Uuid::new_v4(),
//!     currency: CurrencyCode::parse("EUR").to_option().unwrap(),
//!     initial_deposit: Decimal::from(100),
//!     branch_id: Uuid::new_v4(),
//!     allowed_overdraft: Decimal::from(50),
//!     timestamp: Utc::now(),
//! };
//!
//! let (events, state) = transitions::open(command)
//!     .run(AccountState::default())
//!     .to_option()
//!     .unwrap();
//!
//! assert_eq!(events.len(), 3);
//! assert_eq!(state.available_funds(), Decimal::from(150));
//! ```

use super::commands::{
    AccountCommand, AcknowledgeCashDeposit, CreateAccount, FreezeAccount, MakeTransfer,
    OpenAccount, SetOverdraft,
};
use super::errors::DomainError;
use super::events::AccountEvent;
use super::state::{AccountState, AccountStatus};
use crate::aggregate::emit;
use crate::control::Validation;
use crate::transition::{Transition, sequence};

/// A transition of the account aggregate.
pub type AccountTransition<E = AccountEvent> = Transition<AccountState, E>;

fn require_active(state: &AccountState) -> Validation<()> {
    if state.is_active() {
        Validation::valid(())
    } else {
        DomainError::AccountNotActive(state.status).invalid()
    }
}

/// Creates the account. Rejected if the state already describes one.
pub fn create(command: CreateAccount) -> AccountTransition {
    Transition::new(move |state: AccountState| {
        if state.status != AccountStatus::Requested {
            return DomainError::AccountAlreadyExists(command.account_id).invalid();
        }
        let event = command.to_event();
        let opened = AccountState::opened(event.currency.clone());
        Validation::valid((event.into(), opened))
    })
}

/// Credits a deposit. The account must be active and the new balance
/// representable.
pub fn deposit(command: AcknowledgeCashDeposit) -> AccountTransition {
    Transition::new(move |state: AccountState| {
        require_active(&state).bind(|()| {
            if state.balance.checked_add(command.amount).is_none() {
                return DomainError::AmountOutOfRange(command.amount).invalid();
            }
            emit(state, command.to_event().into())
        })
    })
}

/// Sets the allowed overdraft; the event records the change from the
/// current value.
pub fn set_overdraft(command: SetOverdraft) -> AccountTransition {
    Transition::new(move |state: AccountState| {
        let Some(by) = command.amount.checked_sub(state.allowed_overdraft) else {
            return DomainError::AmountOutOfRange(command.amount).invalid();
        };
        emit(state, command.to_event(by).into())
    })
}

/// Debits a transfer.
///
/// The account must be active, and the balance after the debit must not
/// fall below minus the allowed overdraft. A rejected debit emits nothing.
pub fn debit(command: MakeTransfer) -> AccountTransition {
    Transition::new(move |state: AccountState| {
        require_active(&state).bind(|()| {
            // An unrepresentable balance lies past any overdraft.
            let covered = state
                .balance
                .checked_sub(command.amount)
                .is_some_and(|remaining| remaining >= -state.allowed_overdraft);
            if !covered {
                return DomainError::InsufficientBalance {
                    balance: state.balance,
                    requested: command.amount,
                    allowed_overdraft: state.allowed_overdraft,
                }
                .invalid();
            }
            emit(state, command.to_event().into())
        })
    })
}

/// Freezes an active account.
pub fn freeze(command: FreezeAccount) -> AccountTransition {
    Transition::new(move |state: AccountState| {
        require_active(&state).bind(|()| emit(state, command.to_event().into()))
    })
}

/// Create, deposit and set the overdraft, all or nothing.
pub fn open(command: OpenAccount) -> AccountTransition<Vec<AccountEvent>> {
    sequence([
        create(command.create()),
        deposit(command.deposit()),
        set_overdraft(command.set_overdraft()),
    ])
}

/// The transition for any account command.
pub fn for_command(command: AccountCommand) -> AccountTransition<Vec<AccountEvent>> {
    let single = match command {
        AccountCommand::Open(command) => return open(command),
        AccountCommand::Create(command) => create(command),
        AccountCommand::Deposit(command) => deposit(command),
        AccountCommand::SetOverdraft(command) => set_overdraft(command),
        AccountCommand::Transfer(command) => debit(command),
        AccountCommand::Freeze(command) => freeze(command),
    };
    single.map(|event| vec![event])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::currency::CurrencyCode;
    use chrono::{NaiveDate, Utc};
    use rstest::{fixture, rstest};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    #[fixture]
    fn active() -> AccountState {
        AccountState {
            balance: Decimal::from(100),
            allowed_overdraft: Decimal::from(50),
            ..AccountState::opened(CurrencyCode::default())
        }
    }

    fn transfer(amount: i64) -> MakeTransfer {
        MakeTransfer {
            debited_account_id: Uuid::new_v4(),
            beneficiary: "Jane Doe".to_string(),
            iban: "DE89370400440532013000".to_string(),
            bic: "COBADEFFXXX".to_string(),
            date: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
            amount: Decimal::from(amount),
            reference: "invoice 42".to_string(),
            timestamp: Utc::now(),
        }
    }

    fn codes<T>(validation: Validation<T>) -> Vec<String> {
        validation
            .into_errors()
            .into_iter()
            .map(|error| error.code().to_string())
            .collect()
    }

    #[rstest]
    #[case(100, 0)]
    #[case(150, -50)]
    fn debit_within_overdraft_is_accepted(active: AccountState, #[case] amount: i64, #[case] balance: i64) {
        let (event, state) = debit(transfer(amount)).run(active).to_option().unwrap();

        assert!(matches!(event, AccountEvent::Debited(_)));
        assert_eq!(state.balance, Decimal::from(balance));
    }

    #[rstest]
    fn debit_past_overdraft_is_rejected(active: AccountState) {
        let result = debit(transfer(151)).run(active);
        assert_eq!(codes(result), vec!["INSUFFICIENT_BALANCE"]);
    }

    #[rstest]
    fn debit_past_representable_balance_is_rejected() {
        let drained = AccountState {
            balance: -Decimal::MAX,
            allowed_overdraft: Decimal::MAX,
            ..AccountState::opened(CurrencyCode::default())
        };
        assert_eq!(codes(debit(transfer(1)).run(drained)), vec!["INSUFFICIENT_BALANCE"]);
    }

    #[rstest]
    #[case(Decimal::MAX, Decimal::ONE)]
    #[case(Decimal::ONE, Decimal::MAX)]
    fn deposit_past_representable_balance_is_rejected(
        active: AccountState,
        #[case] balance: Decimal,
        #[case] amount: Decimal,
    ) {
        let full = AccountState { balance, ..active };
        let command = AcknowledgeCashDeposit {
            account_id: Uuid::new_v4(),
            amount,
            branch_id: Uuid::new_v4(),
            timestamp: Utc::now(),
        };
        assert_eq!(codes(deposit(command).run(full)), vec!["INVALID_AMOUNT"]);
    }

    #[rstest]
    fn debit_requires_active_account(active: AccountState) {
        let frozen = AccountState {
            status: AccountStatus::Frozen,
            ..active
        };
        assert_eq!(codes(debit(transfer(1)).run(frozen)), vec!["ACCOUNT_NOT_ACTIVE"]);
    }

    #[rstest]
    fn deposit_requires_existing_account() {
        let command = AcknowledgeCashDeposit {
            account_id: Uuid::new_v4(),
            amount: Decimal::ONE,
            branch_id: Uuid::new_v4(),
            timestamp: Utc::now(),
        };
        let result = deposit(command).run(AccountState::default());
        assert_eq!(codes(result), vec!["ACCOUNT_NOT_ACTIVE"]);
    }

    #[rstest]
    #[case(80, 30)]
    #[case(20, -30)]
    fn set_overdraft_records_the_change(active: AccountState, #[case] amount: i64, #[case] by: i64) {
        let command = SetOverdraft {
            account_id: Uuid::new_v4(),
            amount: Decimal::from(amount),
            timestamp: Utc::now(),
        };

        let (event, state) = set_overdraft(command).run(active).to_option().unwrap();

        let AccountEvent::OverdraftAltered(altered) = event else {
            panic!("expected an overdraft event");
        };
        assert_eq!(altered.by, Decimal::from(by));
        assert_eq!(state.allowed_overdraft, Decimal::from(amount));
    }

    #[rstest]
    fn create_twice_is_rejected(active: AccountState) {
        let command = CreateAccount {
            account_id: Uuid::new_v4(),
            currency: CurrencyCode::default(),
            timestamp: Utc::now(),
        };
        assert_eq!(codes(create(command).run(active)), vec!["ACCOUNT_ALREADY_EXISTS"]);
    }

    #[rstest]
    fn freeze_blocks_later_deposits(active: AccountState) {
        let id = Uuid::new_v4();
        let freeze_then_deposit = sequence([
            freeze(FreezeAccount {
                account_id: id,
                timestamp: Utc::now(),
            }),
            deposit(AcknowledgeCashDeposit {
                account_id: id,
                amount: Decimal::ONE,
                branch_id: Uuid::new_v4(),
                timestamp: Utc::now(),
            }),
        ]);

        assert_eq!(codes(freeze_then_deposit.run(active)), vec!["ACCOUNT_NOT_ACTIVE"]);
    }

    #[rstest]
    fn for_command_wraps_single_events(active: AccountState) {
        let (events, _) = for_command(AccountCommand::Transfer(transfer(10)))
            .run(active)
            .to_option()
            .unwrap();
        assert_eq!(events.len(), 1);
    }
}
