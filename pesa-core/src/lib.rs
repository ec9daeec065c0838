//! pesa-core: ledger data model shared by the ingest pipeline and the analytics layer

pub mod money;
pub mod record;
pub mod time;

pub use money::{format_amount, parse_amount, round2, round4};
pub use record::{Category, TransactionRecord};
pub use time::{parse_query_bound, parse_statement_timestamp};
