//! Bank account demo.
//!
//! Opens an account, runs a few commands through the handler (including
//! rejected ones and a store outage) and prints the monthly statement.
//!
//! ```text
//! RUST_LOG=debug cargo run --example bank_account
//! ```

use std::sync::Arc;

use chrono::{Datelike, Days, Utc};
use rust_decimal::Decimal;
use transfold::account::{
    AccountCommand, AccountEvent, AcknowledgeCashDeposit, CurrencyCode, MakeTransfer, OpenAccount,
    validation,
};
use transfold::config::EngineConfig;
use transfold::handler::{AccountService, Outcome};
use transfold::ports::{InMemoryEventStore, SystemClock};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

fn report(label: &str, outcome: &Outcome) {
    match outcome {
        Outcome::Accepted(state) => tracing::info!(
            "{label}: accepted, balance {} {}",
            state.balance,
            state.currency
        ),
        Outcome::Rejected(errors) => tracing::info!("{label}: rejected ({errors})"),
        Outcome::Failed(message) => tracing::info!("{label}: failed ({message})"),
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,transfold=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match EngineConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Failed to load configuration from environment: {e}");
            tracing::info!("Using default configuration");
            EngineConfig::default()
        }
    };

    let store: Arc<InMemoryEventStore<AccountEvent>> = Arc::new(InMemoryEventStore::new());
    let service = AccountService::new(
        store.clone(),
        Arc::new(validation::command(Arc::new(SystemClock))),
        &config,
    );

    let account_id = Uuid::new_v4();
    let branch_id = Uuid::new_v4();
    let now = Utc::now();
    let today = now.date_naive();
    let currency = CurrencyCode::parse("EUR").to_option().unwrap_or_default();

    let open = AccountCommand::Open(OpenAccount {
        account_id,
        currency,
        initial_deposit: Decimal::from(500),
        branch_id,
        allowed_overdraft: Decimal::from(200),
        timestamp: now,
    });
    report("open", &service.execute(open).await.into());

    let transfer = |amount: i64, bic: &str, days_ago: u64| {
        AccountCommand::Transfer(MakeTransfer {
            debited_account_id: account_id,
            beneficiary: "Jane Doe".to_string(),
            iban: "DE89370400440532013000".to_string(),
            bic: bic.to_string(),
            date: today.checked_sub_days(Days::new(days_ago)).unwrap_or(today),
            amount: Decimal::from(amount),
            reference: "rent".to_string(),
            timestamp: Utc::now(),
        })
    };

    report("rent", &service.execute(transfer(650, "COBADEFFXXX", 0)).await.into());
    report("too much", &service.execute(transfer(100, "COBADEFFXXX", 0)).await.into());
    report("malformed", &service.execute(transfer(10, "cobadeff", 3)).await.into());

    store.set_unavailable(true);
    let deposit = AccountCommand::Deposit(AcknowledgeCashDeposit {
        account_id,
        amount: Decimal::from(50),
        branch_id,
        timestamp: Utc::now(),
    });
    report("deposit during outage", &service.execute(deposit.clone()).await.into());
    store.set_unavailable(false);
    report("deposit", &service.execute(deposit).await.into());

    if let Some(statement) = service.statement(account_id, now.month(), now.year()) {
        tracing::info!(
            "statement {}/{}: {} -> {}",
            statement.month,
            statement.year,
            statement.starting_balance,
            statement.end_balance
        );
        for transaction in &statement.transactions {
            tracing::info!(
                "  {} {:<50} -{} +{}",
                transaction.date,
                transaction.description,
                transaction.debited_amount,
                transaction.credited_amount
            );
        }
    }
}
