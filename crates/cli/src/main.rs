use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use tally_core::{Balance, Transaction};
use tally_import::ImportTransactions;
use tally_storage::SqliteGateway;
use tracing_subscriber::EnvFilter;

mod config;

use config::Config;

#[derive(Debug, Parser)]
#[command(name = "tally", version, about = "Import a transaction file into the ledger")]
struct Cli {
    /// CSV file with a header line and `title,type,value,category` rows.
    /// Deleted after a successful import.
    file: PathBuf,

    /// TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// SQLite database path (overrides the config file).
    #[arg(long, env = "TALLY_DATABASE")]
    database: Option<PathBuf>,

    /// Print the imported transactions and balance as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct Summary {
    transactions: Vec<Transaction>,
    balance: Balance,
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(database) = cli.database {
        config.database = database;
    }

    init_tracing(&config.log);

    if let Some(parent) = config.database.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    tracing::debug!(database = %config.database.display(), "opening ledger");
    let pool = tally_storage::create_db(&config.database)
        .await
        .with_context(|| format!("Failed to open database {}", config.database.display()))?;
    let gateway = SqliteGateway::new(pool);

    let transactions = ImportTransactions::new(&gateway)
        .execute(&cli.file)
        .await
        .with_context(|| format!("Failed to import {}", cli.file.display()))?;

    let balance = tally_storage::get_balance(gateway.pool())
        .await
        .context("Failed to compute balance")?;

    if cli.json {
        let summary = Summary { transactions, balance };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Imported {} transactions", transactions.len());
        println!(
            "Balance: income {} / outcome {} / total {}",
            balance.income, balance.outcome, balance.total
        );
    }

    Ok(())
}
