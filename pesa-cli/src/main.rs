use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pesa_core::{TransactionRecord, format_amount};
use pesa_finance::{ImportOutcome, JsonlLedger, LedgerStore, MemoryLedger};
use pesa_ingest::{load_statement, parse_statement};
use std::path::{Path, PathBuf};

mod config;
mod logging;
mod report_cmd;
mod state;

use report_cmd::{ReportCommand, TransactionsArgs};

#[derive(Parser, Debug)]
#[command(name = "pesa", version, about = "M-PESA statement ledger")]
struct Cli {
    /// Log filter (e.g. debug, pesa_ingest=trace); overrides RUST_LOG and config
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write ~/.pesa/config.toml with defaults
    Init,

    /// Parse a statement (.pdf or .csv) and add new transactions to the ledger
    Import {
        file: PathBuf,

        /// Report what would be imported without writing
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },

    /// Parse a statement and print the consolidated records
    Parse {
        file: PathBuf,

        /// Limit number of records printed (default: 20)
        #[arg(long, default_value_t = 20)]
        limit: usize,

        /// Print JSON instead of a table
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Filtered, paginated transaction listing (JSON)
    Transactions(TransactionsArgs),

    /// Analytics reports (JSON)
    Report {
        #[command(subcommand)]
        command: ReportCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;
    logging::init_logging(cli.log_level.as_deref(), &cfg.logging.level)?;

    match cli.command {
        Command::Init => config::init_config()?,

        Command::Import { file, dry_run } => {
            let records = parse_file(file.clone()).await?;
            let outcome = import(&cfg, records, dry_run)?;

            let verb = if dry_run { "would be imported" } else { "imported" };
            println!(
                "Successfully processed {}. {} new transactions {}, {} duplicates skipped.",
                file.display(),
                outcome.imported,
                verb,
                outcome.skipped
            );
        }

        Command::Parse { file, limit, json } => {
            let records = parse_file(file.clone()).await?;
            if json {
                let shown: Vec<&TransactionRecord> = records.iter().take(limit).collect();
                println!("{}", serde_json::to_string_pretty(&shown)?);
            } else {
                println!("Parsed {} transactions from {}\n", records.len(), file.display());
                for r in records.iter().take(limit) {
                    println!("{}", render_row(r));
                }
            }
        }

        Command::Transactions(args) => report_cmd::run_transactions(args, &cfg)?,

        Command::Report { command } => report_cmd::run_report(command, &cfg)?,
    }

    Ok(())
}

/// Load and parse on a blocking thread; PDF text extraction is CPU-bound.
async fn parse_file(file: PathBuf) -> Result<Vec<TransactionRecord>> {
    tokio::task::spawn_blocking(move || load_and_parse(&file))
        .await
        .context("statement parser task panicked")?
}

fn load_and_parse(file: &Path) -> Result<Vec<TransactionRecord>> {
    let text = load_statement(file)?;
    let records = parse_statement(&text);
    tracing::info!(file = %file.display(), records = records.len(), "parsed statement");
    Ok(records)
}

fn import(cfg: &config::Config, records: Vec<TransactionRecord>, dry_run: bool) -> Result<ImportOutcome> {
    let path = cfg.ledger_path(std::env::var(config::LEDGER_ENV).ok())?;
    let mut ledger =
        JsonlLedger::open(&path).with_context(|| format!("open ledger {}", path.display()))?;

    let outcome = if dry_run {
        let mut preview = MemoryLedger::new();
        preview.insert_batch(ledger.records().to_vec())?;
        preview.insert_batch(records)?
    } else {
        ledger.insert_batch(records)?
    };

    tracing::info!(
        ledger = %path.display(),
        imported = outcome.imported,
        skipped = outcome.skipped,
        dry_run,
        "import finished"
    );
    Ok(outcome)
}

fn render_row(r: &TransactionRecord) -> String {
    let when = r
        .timestamp
        .map(|ts| ts.to_string())
        .unwrap_or_else(|| "-".to_string());
    let mut row = format!(
        "{:<12} {:<19} {:<22} {:>12} {:>12}",
        r.transaction_code,
        when,
        r.category.as_str(),
        format_amount(r.amount),
        format_amount(r.balance)
    );
    if r.fuliza_used > 0.0 {
        row.push_str(&format!("  fuliza={}", format_amount(r.fuliza_used)));
    }
    row
}
