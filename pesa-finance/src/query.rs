//! Filtered, paginated reads over ledger records.

use chrono::NaiveDateTime;
use pesa_core::{Category, TransactionRecord};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Record filters. Every field is optional; unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionFilter {
    /// Inclusive lower bound on timestamp
    pub start: Option<NaiveDateTime>,
    /// Inclusive upper bound on timestamp
    pub end: Option<NaiveDateTime>,
    pub category: Option<Category>,
    /// Case-insensitive search over transaction code and category name
    pub q: Option<String>,
    /// Bounds on the absolute amount
    pub amount_min: Option<f64>,
    pub amount_max: Option<f64>,
}

impl TransactionFilter {
    pub fn matches(&self, record: &TransactionRecord) -> bool {
        if self.start.is_some() || self.end.is_some() {
            let Some(ts) = record.timestamp else {
                return false;
            };
            if self.start.is_some_and(|start| ts < start) {
                return false;
            }
            if self.end.is_some_and(|end| ts > end) {
                return false;
            }
        }

        if self.category.is_some_and(|c| c != record.category) {
            return false;
        }

        if let Some(q) = self.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            let q = q.to_lowercase();
            let hit = record.transaction_code.to_lowercase().contains(&q)
                || record.category.as_str().to_lowercase().contains(&q);
            if !hit {
                return false;
            }
        }

        let abs = record.abs_amount();
        if self.amount_min.is_some_and(|min| abs < min) {
            return false;
        }
        if self.amount_max.is_some_and(|max| abs > max) {
            return false;
        }

        true
    }
}

/// 1-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: usize,
    pub page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
        }
    }
}

impl Pagination {
    pub fn new(page: usize, page_size: usize) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    fn offset(&self) -> usize {
        self.page.max(1).saturating_sub(1).saturating_mul(self.page_size)
    }
}

/// One page of query results. `total` counts every filtered record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub data: Vec<TransactionRecord>,
}

/// Newest first; undated records sort after dated ones.
fn newest_first(a: &TransactionRecord, b: &TransactionRecord) -> Ordering {
    match (a.timestamp, b.timestamp) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Filter, sort newest first, and slice one page out of `records`.
pub fn query_records(
    records: &[TransactionRecord],
    filter: &TransactionFilter,
    pagination: Pagination,
) -> Page {
    let mut matched: Vec<&TransactionRecord> =
        records.iter().filter(|r| filter.matches(r)).collect();
    matched.sort_by(|a, b| newest_first(a, b));

    let total = matched.len();
    let data = matched
        .into_iter()
        .skip(pagination.offset())
        .take(pagination.page_size)
        .cloned()
        .collect();

    Page {
        total,
        page: pagination.page,
        page_size: pagination.page_size,
        data,
    }
}
