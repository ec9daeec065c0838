//! pesa-ingest: statement loading and the M-PESA text parsing pipeline.
//!
//! `segment` → `extract` → `consolidate`, each a pure in-memory pass.

pub mod category_rules;
pub mod extract;
pub mod fuliza;
pub mod loader;
pub mod segment;
pub mod types;

pub use category_rules::{CATEGORY_RULES, CategoryRule, categorize};
pub use extract::extract;
pub use fuliza::consolidate;
pub use loader::{LoadError, load_statement};
pub use segment::segment;
pub use types::{RawSpan, StatementFormat};

use pesa_core::TransactionRecord;

/// Parse raw statement text into consolidated ledger records.
pub fn parse_statement(text: &str) -> Vec<TransactionRecord> {
    let spans = segment(text);
    let records: Vec<TransactionRecord> = spans.iter().map(extract).collect();
    let extracted = records.len();
    let consolidated = consolidate(records);

    tracing::debug!(
        spans = spans.len(),
        extracted,
        consolidated = consolidated.len(),
        "parsed statement"
    );
    consolidated
}
