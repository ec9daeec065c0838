//! pesa-finance: ledger persistence, filtered queries, and spending analytics

pub mod analytics;
pub mod ledger;
pub mod query;

pub use analytics::{Analytics, CategorySpend, FulizaUsage, Summary, TimelinePoint, TopTransaction};
pub use ledger::{ImportOutcome, JsonlLedger, LedgerStore, MemoryLedger};
pub use query::{Page, Pagination, TransactionFilter, query_records};
