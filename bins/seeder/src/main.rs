//! Database seeder for Tally development and testing.
//!
//! Runs pending migrations, records a month of household bookkeeping for a
//! demo owner and logs the resulting statements.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use sea_orm_migration::MigratorTrait;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tally_core::ledger::{AccountKind, AccountRecord, CreateEntryInput, NewLineInput, Side};
use tally_core::reports::{BalanceSheetParams, IncomeStatementParams, MovementParams};
use tally_db::migration::Migrator;
use tally_db::repositories::{
    AccountRepository, CreateAccountInput, CreateOwnerInput, EntryRepository, LineRepository,
    OwnerRepository, ReportRepository,
};
use tally_shared::types::OwnerId;
use tally_shared::{AppConfig, ErrorKind};

const DEMO_EMAIL: &str = "demo@tally.dev";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log.filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db = tally_db::connect_with(&config.database).await?;
    info!("Connected to database");

    Migrator::up(&db, None).await?;
    info!("Migrations applied");

    let owners = OwnerRepository::new(db.clone());
    let owner = match owners
        .create_owner(CreateOwnerInput {
            email: DEMO_EMAIL.to_string(),
            display_name: "Demo Owner".to_string(),
        })
        .await
    {
        Ok(owner) => owner,
        Err(err) if err.kind() == ErrorKind::Conflict => {
            warn!(email = DEMO_EMAIL, "Demo owner already exists, skipping");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let accounts = AccountRepository::new(db.clone());
    let open = |name: &str, kind: AccountKind, suffix: Option<&str>| CreateAccountInput {
        owner_id: owner.id,
        name: name.to_string(),
        kind,
        suffix: suffix.map(str::to_string),
    };
    let bank = accounts
        .create_account(open("Checking", AccountKind::Asset, Some("4821")))
        .await?;
    let card = accounts
        .create_account(open("Credit Card", AccountKind::Liability, Some("9012")))
        .await?;
    let opening = accounts
        .create_account(open("Opening Balance", AccountKind::Equity, None))
        .await?;
    let salary = accounts
        .create_account(open("Salary", AccountKind::Income, None))
        .await?;
    let groceries = accounts
        .create_account(open("Groceries", AccountKind::Expense, None))
        .await?;
    let rent = accounts
        .create_account(open("Rent", AccountKind::Expense, None))
        .await?;

    let entries = EntryRepository::new(db.clone());
    let journal = [
        (day(1), "Opening balance", &bank, &opening, cents(250_000)),
        (day(2), "March salary", &bank, &salary, cents(420_000)),
        (day(3), "Rent", &rent, &bank, cents(150_000)),
        (day(9), "Supermarket", &groceries, &card, cents(8_735)),
        (day(16), "Supermarket", &groceries, &card, cents(6_410)),
        (day(28), "Card payment", &card, &bank, cents(15_145)),
    ];
    let recorded = journal.len();
    for (occurred_at, description, debit_account, credit_account, amount) in journal {
        entries
            .create_balanced_entry(transfer(
                owner.id,
                occurred_at,
                description,
                debit_account,
                credit_account,
                amount,
            ))
            .await?;
    }
    info!(entries = recorded, "Demo journal recorded");

    let reports = ReportRepository::new(db.clone());

    let sheet = reports
        .get_balance_sheet(
            owner.id,
            &BalanceSheetParams::parse(Some("2024-03-31T23:59:59Z"), Utc::now())?,
        )
        .await?;
    info!(report = %serde_json::to_string_pretty(&sheet)?, "Balance sheet");

    let income = reports
        .get_income_statement(
            owner.id,
            &IncomeStatementParams::parse("2024-03-01", "2024-03-31T23:59:59Z")?,
        )
        .await?;
    info!(report = %serde_json::to_string_pretty(&income)?, "Income statement");

    let movements = reports
        .get_account_movements(bank.id, &MovementParams::default())
        .await?;
    info!(report = %serde_json::to_string_pretty(&movements)?, "Checking movements");

    let card_lines = LineRepository::new(db.clone())
        .with_policy(config.ledger.line_mutation)
        .list_account_lines(card.id)
        .await?;
    info!(
        lines = card_lines.len(),
        policy = ?config.ledger.line_mutation,
        "Credit card lines"
    );

    info!("Seeding complete!");
    Ok(())
}

fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, d, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

fn cents(minor: i64) -> Decimal {
    Decimal::new(minor, 2)
}

fn transfer(
    owner_id: OwnerId,
    occurred_at: DateTime<Utc>,
    description: &str,
    debit_account: &AccountRecord,
    credit_account: &AccountRecord,
    amount: Decimal,
) -> CreateEntryInput {
    CreateEntryInput {
        owner_id,
        occurred_at,
        description: Some(description.to_string()),
        lines: vec![
            NewLineInput {
                account_id: debit_account.id,
                amount,
                side: Side::Debit,
            },
            NewLineInput {
                account_id: credit_account.id,
                amount,
                side: Side::Credit,
            },
        ],
    }
}
