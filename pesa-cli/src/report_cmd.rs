use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use pesa_core::{Category, parse_query_bound};
use pesa_finance::{Analytics, JsonlLedger, LedgerStore, Pagination, TransactionFilter};
use serde::Serialize;

use crate::config::Config;

const MAX_TOP_LIMIT: usize = 50;
const MAX_PAGE_SIZE: usize = 100;

#[derive(Subcommand, Debug)]
pub enum ReportCommand {
    /// Inflow, outflow, net, Fuliza used/repaid, merchant spend
    Summary,

    /// Spending grouped by category
    Categories,

    /// Largest single expenditures
    Top {
        /// Number of rows, 1-50 (default from config.report.top_limit)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Fuliza usage with a daily timeline
    Fuliza,
}

#[derive(Args, Debug, Default)]
pub struct TransactionsArgs {
    /// Start date/time, inclusive (YYYY-MM-DD or ISO date-time)
    #[arg(long)]
    pub start: Option<String>,

    /// End date/time, inclusive
    #[arg(long)]
    pub end: Option<String>,

    /// Category name, e.g. "Merchant Payment"
    #[arg(long)]
    pub category: Option<String>,

    /// Search transaction code or category
    #[arg(long)]
    pub q: Option<String>,

    /// Minimum absolute amount
    #[arg(long)]
    pub min: Option<f64>,

    /// Maximum absolute amount
    #[arg(long)]
    pub max: Option<f64>,

    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page, 1-100 (default from config.report.page_size)
    #[arg(long)]
    pub page_size: Option<usize>,
}

impl TransactionsArgs {
    pub fn to_filter(&self) -> Result<TransactionFilter> {
        let start = self
            .start
            .as_deref()
            .map(parse_query_bound)
            .transpose()
            .context("--start")?;
        let end = self
            .end
            .as_deref()
            .map(parse_query_bound)
            .transpose()
            .context("--end")?;
        let category = self
            .category
            .as_deref()
            .map(str::parse::<Category>)
            .transpose()
            .context("--category")?;

        Ok(TransactionFilter {
            start,
            end,
            category,
            q: self.q.clone(),
            amount_min: self.min,
            amount_max: self.max,
        })
    }

    pub fn pagination(&self, default_page_size: usize) -> Pagination {
        let size = self
            .page_size
            .unwrap_or(default_page_size)
            .clamp(1, MAX_PAGE_SIZE);
        Pagination::new(self.page, size)
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value).context("serialize report")?;
    println!("{}", s);
    Ok(())
}

fn open_ledger(cfg: &Config) -> Result<JsonlLedger> {
    let path = cfg.ledger_path(std::env::var(crate::config::LEDGER_ENV).ok())?;
    JsonlLedger::open(&path).with_context(|| format!("open ledger {}", path.display()))
}

pub fn run_report(cmd: ReportCommand, cfg: &Config) -> Result<()> {
    let ledger = open_ledger(cfg)?;
    let analytics = Analytics::new(ledger.records());

    match cmd {
        ReportCommand::Summary => print_json(&analytics.summary()),
        ReportCommand::Categories => print_json(&analytics.spending_by_category()),
        ReportCommand::Top { limit } => {
            let limit = limit.unwrap_or(cfg.report.top_limit).clamp(1, MAX_TOP_LIMIT);
            print_json(&analytics.top_transactions(limit))
        }
        ReportCommand::Fuliza => print_json(&analytics.fuliza_usage()),
    }
}

pub fn run_transactions(args: TransactionsArgs, cfg: &Config) -> Result<()> {
    let filter = args.to_filter()?;
    let pagination = args.pagination(cfg.report.page_size);
    let ledger = open_ledger(cfg)?;
    print_json(&ledger.query(&filter, pagination))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_filter_parses_bounds_and_category() {
        let args = TransactionsArgs {
            start: Some("2024-01-01".into()),
            end: Some("2024-01-31T23:59:59".into()),
            category: Some("merchant payment".into()),
            min: Some(100.0),
            ..Default::default()
        };
        let filter = args.to_filter().unwrap();
        assert_eq!(filter.start.unwrap().to_string(), "2024-01-01 00:00:00");
        assert_eq!(filter.end.unwrap().to_string(), "2024-01-31 23:59:59");
        assert_eq!(filter.category, Some(Category::MerchantPayment));
        assert_eq!(filter.amount_min, Some(100.0));
        assert!(filter.amount_max.is_none());
    }

    #[test]
    fn test_to_filter_rejects_unknown_category() {
        let args = TransactionsArgs {
            category: Some("Groceries".into()),
            ..Default::default()
        };
        assert!(args.to_filter().is_err());
    }

    #[test]
    fn test_pagination_clamps_page_size() {
        let args = TransactionsArgs {
            page: 3,
            page_size: Some(500),
            ..Default::default()
        };
        let p = args.pagination(20);
        assert_eq!(p.page, 3);
        assert_eq!(p.page_size, 100);

        let args = TransactionsArgs::default();
        assert_eq!(args.pagination(20).page, 1);
        assert_eq!(args.pagination(20).page_size, 20);
    }
}
