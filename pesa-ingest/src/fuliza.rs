//! Fuliza consolidation.
//!
//! When an overdraft funds a payment, the statement prints two rows under the
//! same receipt code: the real spend and an "OverDraft of Credit Party"
//! draw-down with a positive amount. The draw-down is folded into the spend as
//! `fuliza_used` so the ledger holds exactly one record per code.

use pesa_core::TransactionRecord;
use std::collections::HashMap;

/// Merge overdraft draw-downs into the transactions they funded.
///
/// Groups by `transaction_code` in first-seen order. For each group:
/// - `fuliza_used` = sum of the group's "Amount Fulizad" amounts
/// - the first non-draw-down record is emitted with that value
/// - a group made only of draw-downs is dropped
///
/// Extra non-draw-down records in a group are discarded.
pub fn consolidate(records: Vec<TransactionRecord>) -> Vec<TransactionRecord> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Vec<TransactionRecord>> = Vec::new();

    for record in records {
        match index.get(&record.transaction_code) {
            Some(&i) => groups[i].push(record),
            None => {
                index.insert(record.transaction_code.clone(), groups.len());
                groups.push(vec![record]);
            }
        }
    }

    groups.into_iter().filter_map(fold_group).collect()
}

/// The representative is the first non-draw record, not the first row, so a
/// draw-down printed ahead of its spend still folds into that spend.
fn fold_group(group: Vec<TransactionRecord>) -> Option<TransactionRecord> {
    let fuliza_used = group
        .iter()
        .filter(|r| r.category.is_fuliza_draw())
        .fold(0.0, |acc, r| acc + r.amount);

    let mut representative = group.into_iter().find(|r| !r.category.is_fuliza_draw())?;
    representative.fuliza_used = fuliza_used;
    Some(representative)
}
