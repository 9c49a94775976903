//! End-to-end tests of the account command handler.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use futures::future::join_all;
use rstest::{fixture, rstest};
use rust_decimal::Decimal;
use transfold::account::{
    AccountCommand, AccountEvent, AccountState, AccountStatus, AcknowledgeCashDeposit,
    CreateAccount, CurrencyCode, DepositedCash, FreezeAccount, MakeTransfer, OpenAccount,
    validation,
};
use transfold::actor::Mailbox;
use transfold::config::EngineConfig;
use transfold::control::{Exceptional, Validation};
use transfold::handler::{AccountService, GENERIC_FAILURE, Outcome};
use transfold::ports::{EventStore, FixedClock, InMemoryEventStore};
use uuid::Uuid;

struct Harness {
    store: Arc<InMemoryEventStore<AccountEvent>>,
    service: AccountService,
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
}

#[fixture]
fn harness() -> Harness {
    let store: Arc<InMemoryEventStore<AccountEvent>> = Arc::new(InMemoryEventStore::new());
    let config = EngineConfig {
        mailbox: Mailbox::Bounded(16),
        retry_attempts: 2,
        retry_delay: Duration::from_millis(1),
    };
    let service = AccountService::new(
        store.clone(),
        Arc::new(validation::command(Arc::new(FixedClock::new(now())))),
        &config,
    );
    Harness { store, service }
}

fn open(account_id: Uuid) -> AccountCommand {
    AccountCommand::Open(OpenAccount {
        account_id,
        currency: CurrencyCode::parse("EUR").to_option().unwrap(),
        initial_deposit: Decimal::from(100),
        branch_id: Uuid::nil(),
        allowed_overdraft: Decimal::from(50),
        timestamp: now(),
    })
}

fn deposit(account_id: Uuid, amount: i64) -> AccountCommand {
    AccountCommand::Deposit(AcknowledgeCashDeposit {
        account_id,
        amount: Decimal::from(amount),
        branch_id: Uuid::nil(),
        timestamp: now(),
    })
}

fn transfer(account_id: Uuid, amount: i64, bic: &str, date: NaiveDate) -> AccountCommand {
    AccountCommand::Transfer(MakeTransfer {
        debited_account_id: account_id,
        beneficiary: "Jane Doe".to_string(),
        iban: "DE89370400440532013000".to_string(),
        bic: bic.to_string(),
        date,
        amount: Decimal::from(amount),
        reference: "rent".to_string(),
        timestamp: now(),
    })
}

fn tomorrow() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 2).unwrap()
}

fn codes(result: Validation<Exceptional<AccountState>>) -> Vec<String> {
    result
        .into_errors()
        .into_iter()
        .map(|error| error.code().to_string())
        .collect()
}

// =============================================================================
// Accepted commands
// =============================================================================

#[rstest]
#[tokio::test]
async fn open_account_is_accepted_and_stored(harness: Harness) {
    let account_id = Uuid::new_v4();

    let outcome = Outcome::from(harness.service.execute(open(account_id)).await);

    let Outcome::Accepted(state) = outcome else {
        panic!("expected the account to open");
    };
    assert_eq!(state.status, AccountStatus::Active);
    assert_eq!(state.balance, Decimal::from(100));
    assert_eq!(harness.store.stream_len(account_id), 3);
    assert_eq!(harness.service.state(account_id).await, Ok(Some(state)));
}

#[rstest]
#[tokio::test]
async fn transfer_within_overdraft_is_debited(harness: Harness) {
    let account_id = Uuid::new_v4();
    let _ = harness.service.execute(open(account_id)).await;

    let result = harness
        .service
        .execute(transfer(account_id, 150, "COBADEFFXXX", tomorrow()))
        .await;

    let state = result.to_option().and_then(Exceptional::ok_value).unwrap();
    assert_eq!(state.balance, Decimal::from(-50));
    assert_eq!(harness.service.history(account_id).len(), 4);
}

#[rstest]
#[tokio::test]
async fn concurrent_deposits_are_serialized(harness: Harness) {
    let account_id = Uuid::new_v4();
    let _ = harness.service.execute(open(account_id)).await;

    let deposits = (0..10).map(|_| harness.service.execute(deposit(account_id, 10)));
    let results = join_all(deposits).await;

    assert!(results.iter().all(Validation::is_valid));
    let state = harness.service.state(account_id).await.unwrap().unwrap();
    assert_eq!(state.balance, Decimal::from(200));
    assert_eq!(harness.store.stream_len(account_id), 13);
}

// =============================================================================
// Rejected commands
// =============================================================================

#[rstest]
#[tokio::test]
async fn invalid_transfer_reports_every_rule(harness: Harness) {
    let account_id = Uuid::new_v4();
    let _ = harness.service.execute(open(account_id)).await;
    let yesterday = NaiveDate::from_ymd_opt(2024, 4, 30).unwrap();

    let result = harness
        .service
        .execute(transfer(account_id, 10, "not-a-bic", yesterday))
        .await;

    assert_eq!(codes(result), vec!["INVALID_BIC", "TRANSFER_DATE_IS_PAST"]);
    assert_eq!(harness.store.stream_len(account_id), 3);
}

#[rstest]
#[tokio::test]
async fn breaching_transfer_changes_nothing(harness: Harness) {
    let account_id = Uuid::new_v4();
    let _ = harness.service.execute(open(account_id)).await;

    let result = harness
        .service
        .execute(transfer(account_id, 151, "COBADEFFXXX", tomorrow()))
        .await;

    assert_eq!(codes(result), vec!["INSUFFICIENT_BALANCE"]);
    let state = harness.service.state(account_id).await.unwrap().unwrap();
    assert_eq!(state.balance, Decimal::from(100));
    assert_eq!(harness.store.stream_len(account_id), 3);
}

#[rstest]
#[tokio::test]
async fn duplicate_creation_is_rejected(harness: Harness) {
    let account_id = Uuid::new_v4();
    let _ = harness.service.execute(open(account_id)).await;

    let again = AccountCommand::Create(CreateAccount {
        account_id,
        currency: CurrencyCode::default(),
        timestamp: now(),
    });

    assert_eq!(
        codes(harness.service.execute(again).await),
        vec!["ACCOUNT_ALREADY_EXISTS"]
    );
}

#[rstest]
#[tokio::test]
async fn commands_on_unknown_accounts_are_rejected(harness: Harness) {
    let account_id = Uuid::new_v4();

    let result = harness.service.execute(deposit(account_id, 10)).await;

    assert_eq!(codes(result), vec!["ACCOUNT_NOT_FOUND"]);
    assert_eq!(harness.service.state(account_id).await, Ok(None));
}

#[rstest]
#[tokio::test]
async fn frozen_account_refuses_deposits(harness: Harness) {
    let account_id = Uuid::new_v4();
    let _ = harness.service.execute(open(account_id)).await;
    let freeze = AccountCommand::Freeze(FreezeAccount {
        account_id,
        timestamp: now(),
    });
    assert!(harness.service.execute(freeze).await.is_valid());

    let outcome = Outcome::from(harness.service.execute(deposit(account_id, 10)).await);

    assert!(outcome.is_rejected());
}

#[rstest]
#[tokio::test]
async fn deposit_past_representable_balance_is_rejected(harness: Harness) {
    let account_id = Uuid::new_v4();
    let _ = harness.service.execute(open(account_id)).await;
    let huge = AccountCommand::Deposit(AcknowledgeCashDeposit {
        account_id,
        amount: Decimal::MAX,
        branch_id: Uuid::nil(),
        timestamp: now(),
    });

    let outcome = Outcome::from(harness.service.execute(huge).await);

    let Outcome::Rejected(errors) = outcome else {
        panic!("expected the deposit to be rejected");
    };
    assert_eq!(errors.first().code(), "INVALID_AMOUNT");
    let state = harness.service.state(account_id).await.unwrap().unwrap();
    assert_eq!(state.balance, Decimal::from(100));
    assert_eq!(harness.store.stream_len(account_id), 3);

    let next = harness.service.execute(deposit(account_id, 10)).await;
    assert!(matches!(next, Validation::Valid(Exceptional::Ok(_))));
}

// =============================================================================
// Store faults
// =============================================================================

#[rstest]
#[tokio::test]
async fn transient_store_failures_are_retried(harness: Harness) {
    let account_id = Uuid::new_v4();
    harness.store.fail_next(2);

    let result = harness.service.execute(open(account_id)).await;

    assert!(matches!(result, Validation::Valid(Exceptional::Ok(_))));
    assert_eq!(harness.store.stream_len(account_id), 3);
}

#[rstest]
#[tokio::test]
async fn unavailable_store_fails_without_changing_state(harness: Harness) {
    let account_id = Uuid::new_v4();
    let _ = harness.service.execute(open(account_id)).await;
    harness.store.set_unavailable(true);

    let outcome = Outcome::from(harness.service.execute(deposit(account_id, 10)).await);

    assert_eq!(outcome, Outcome::Failed(GENERIC_FAILURE.to_string()));
    let state = harness.service.state(account_id).await.unwrap().unwrap();
    assert_eq!(state.balance, Decimal::from(100));

    harness.store.set_unavailable(false);
    let retried = harness.service.execute(deposit(account_id, 10)).await;
    assert!(matches!(retried, Validation::Valid(Exceptional::Ok(_))));
}

#[rstest]
#[tokio::test]
async fn history_without_creation_makes_account_unusable(harness: Harness) {
    let account_id = Uuid::new_v4();
    let stray: AccountEvent = DepositedCash {
        entity_id: account_id,
        timestamp: now(),
        amount: Decimal::from(5),
        branch_id: Uuid::nil(),
    }
    .into();
    assert!(harness.store.append(account_id, &[stray]).is_ok());

    let create = AccountCommand::Create(CreateAccount {
        account_id,
        currency: CurrencyCode::default(),
        timestamp: now(),
    });
    let outcome = Outcome::from(harness.service.execute(create).await);

    assert_eq!(outcome, Outcome::Failed(GENERIC_FAILURE.to_string()));
    assert_eq!(harness.store.stream_len(account_id), 1);
}

#[rstest]
#[tokio::test]
async fn evicted_account_is_rehydrated_from_the_store(harness: Harness) {
    let account_id = Uuid::new_v4();
    let _ = harness.service.execute(open(account_id)).await;
    let _ = harness.service.execute(deposit(account_id, 25)).await;

    assert_eq!(harness.service.evict(account_id).await, Ok(true));
    assert_eq!(harness.service.evict(account_id).await, Ok(false));

    let state = harness.service.state(account_id).await.unwrap().unwrap();
    assert_eq!(state.balance, Decimal::from(125));
    assert_eq!(state.allowed_overdraft, Decimal::from(50));
}

// =============================================================================
// Read side
// =============================================================================

#[rstest]
#[tokio::test]
async fn statement_covers_the_month(harness: Harness) {
    let account_id = Uuid::new_v4();
    let _ = harness.service.execute(open(account_id)).await;
    let _ = harness
        .service
        .execute(transfer(account_id, 30, "COBADEFFXXX", tomorrow()))
        .await;

    let statement = harness.service.statement(account_id, 5, 2024).unwrap();

    assert_eq!(statement.starting_balance, Decimal::ZERO);
    assert_eq!(statement.end_balance, Decimal::from(70));
    assert_eq!(statement.transactions.len(), 2);
    assert_eq!(statement.transactions[0].description, "Deposit at 00000000-0000-0000-0000-000000000000");
}
