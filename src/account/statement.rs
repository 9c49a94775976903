//! Monthly account statements projected from the event history.

use chrono::{DateTime, Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::events::AccountEvent;

/// A line on a statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Booking date.
    pub date: NaiveDate,
    /// Human-readable description.
    pub description: String,
    /// Amount taken from the account.
    pub debited_amount: Decimal,
    /// Amount added to the account.
    pub credited_amount: Decimal,
}

impl Transaction {
    /// The statement line for `event`, if it moves money.
    #[must_use]
    pub fn from_event(event: &AccountEvent) -> Option<Self> {
        match event {
            AccountEvent::Deposited(deposited) => Some(Self {
                date: deposited.timestamp.date_naive(),
                description: format!("Deposit at {}", deposited.branch_id),
                debited_amount: Decimal::ZERO,
                credited_amount: deposited.amount,
            }),
            AccountEvent::Debited(debited) => Some(Self {
                date: debited.timestamp.date_naive(),
                description: format!(
                    "Transfer to {}/{}; Ref: {}",
                    debited.bic, debited.iban, debited.reference
                ),
                debited_amount: debited.debited_amount,
                credited_amount: Decimal::ZERO,
            }),
            AccountEvent::Created(_)
            | AccountEvent::OverdraftAltered(_)
            | AccountEvent::Frozen(_) => None,
        }
    }
}

/// Balances and transactions of one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountStatement {
    /// Month, 1 to 12.
    pub month: u32,
    /// Year.
    pub year: i32,
    /// Balance at the start of the month.
    pub starting_balance: Decimal,
    /// Balance at the end of the month.
    pub end_balance: Decimal,
    /// Money movements during the month, in history order.
    pub transactions: Vec<Transaction>,
}

fn balance_reducer(balance: Decimal, event: &AccountEvent) -> Decimal {
    match event {
        AccountEvent::Deposited(deposited) => balance.saturating_add(deposited.amount),
        AccountEvent::Debited(debited) => balance.saturating_sub(debited.debited_amount),
        _ => balance,
    }
}

impl AccountStatement {
    /// Builds the statement for `month`/`year` from `history`.
    ///
    /// Events before the first instant of the month make up the starting
    /// balance; events from then until the first instant of the next month
    /// are the month's transactions. Later events are ignored.
    ///
    /// Returns `None` for a month outside 1 to 12 or an unrepresentable
    /// year.
    #[must_use]
    pub fn create(month: u32, year: i32, history: &[AccountEvent]) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let end = start.checked_add_months(Months::new(1))?;
        let start: DateTime<Utc> = start.and_hms_opt(0, 0, 0)?.and_utc();
        let end: DateTime<Utc> = end.and_hms_opt(0, 0, 0)?.and_utc();

        let (before, during): (Vec<&AccountEvent>, Vec<&AccountEvent>) = history
            .iter()
            .filter(|event| event.timestamp() < end)
            .partition(|event| event.timestamp() < start);

        let starting_balance = before.iter().copied().fold(Decimal::ZERO, balance_reducer);
        let end_balance = during.iter().copied().fold(starting_balance, balance_reducer);

        Some(Self {
            month,
            year,
            starting_balance,
            end_balance,
            transactions: during.into_iter().filter_map(Transaction::from_event).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::events::{CreatedAccount, DebitedTransfer, DepositedCash};
    use crate::account::CurrencyCode;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};
    use uuid::Uuid;

    fn at(month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, month, day, 10, 0, 0).unwrap()
    }

    fn deposit(timestamp: DateTime<Utc>, amount: i64) -> AccountEvent {
        DepositedCash {
            entity_id: Uuid::nil(),
            timestamp,
            amount: Decimal::from(amount),
            branch_id: Uuid::nil(),
        }
        .into()
    }

    fn debit(timestamp: DateTime<Utc>, amount: i64) -> AccountEvent {
        DebitedTransfer {
            entity_id: Uuid::nil(),
            timestamp,
            beneficiary: "Jane".to_string(),
            iban: "DE89370400440532013000".to_string(),
            bic: "COBADEFFXXX".to_string(),
            debited_amount: Decimal::from(amount),
            reference: "rent".to_string(),
        }
        .into()
    }

    #[fixture]
    fn history() -> Vec<AccountEvent> {
        vec![
            CreatedAccount {
                entity_id: Uuid::nil(),
                timestamp: at(1, 2),
                currency: CurrencyCode::default(),
            }
            .into(),
            deposit(at(1, 3), 500),
            deposit(at(2, 1), 100),
            debit(at(2, 20), 50),
            deposit(at(3, 1), 1000),
        ]
    }

    #[rstest]
    fn february_statement(history: Vec<AccountEvent>) {
        let statement = AccountStatement::create(2, 2024, &history).unwrap();

        assert_eq!(statement.starting_balance, Decimal::from(500));
        assert_eq!(statement.end_balance, Decimal::from(550));
        assert_eq!(statement.transactions.len(), 2);
        assert_eq!(statement.transactions[1].debited_amount, Decimal::from(50));
        assert_eq!(
            statement.transactions[1].description,
            "Transfer to COBADEFFXXX/DE89370400440532013000; Ref: rent"
        );
    }

    #[rstest]
    fn december_rolls_over_year() {
        let history = vec![deposit(Utc.with_ymd_and_hms(2024, 12, 31, 23, 0, 0).unwrap(), 10)];
        let statement = AccountStatement::create(12, 2024, &history).unwrap();
        assert_eq!(statement.end_balance, Decimal::from(10));
    }

    #[rstest]
    #[case(0)]
    #[case(13)]
    fn invalid_month_has_no_statement(history: Vec<AccountEvent>, #[case] month: u32) {
        assert!(AccountStatement::create(month, 2024, &history).is_none());
    }
}
