//! Read-only rollups over ledger records.
//!
//! An `Analytics` value borrows the records for the duration of one call
//! site; nothing is cached between calls.

use chrono::NaiveDate;
use pesa_core::{Category, TransactionRecord, round2, round4};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Dashboard KPIs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_inflow: f64,
    pub lifestyle_outflow: f64,
    pub net: f64,
    pub fuliza_used: f64,
    pub fuliza_repaid: f64,
    pub merchant_spend: f64,
}

/// Outflow totals for one category (`total` is negative)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpend {
    pub category: Category,
    pub total: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopTransaction {
    pub transaction_code: String,
    pub date: Option<String>,
    pub category: Category,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Overdraft reliance report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FulizaUsage {
    pub fuliza_used_total: f64,
    pub fuliza_used_count: usize,
    pub fuliza_repaid_total: f64,
    /// Overdraft used per unit of inflow
    pub fuliza_ratio: f64,
    pub timeline: Vec<TimelinePoint>,
}

pub struct Analytics<'a> {
    records: &'a [TransactionRecord],
}

fn sum(amounts: impl Iterator<Item = f64>) -> f64 {
    amounts.fold(0.0, |acc, x| acc + x)
}

impl<'a> Analytics<'a> {
    pub fn new(records: &'a [TransactionRecord]) -> Self {
        Self { records }
    }

    fn total_inflow(&self) -> f64 {
        sum(self.records.iter().filter(|r| r.is_income()).map(|r| r.amount))
    }

    fn total_outflow(&self) -> f64 {
        sum(self.records.iter().filter(|r| r.is_expense()).map(|r| r.amount))
    }

    fn fuliza_used(&self) -> f64 {
        sum(self
            .records
            .iter()
            .filter(|r| r.fuliza_used > 0.0)
            .map(|r| r.fuliza_used))
    }

    fn abs_total_for(&self, category: Category) -> f64 {
        sum(self
            .records
            .iter()
            .filter(|r| r.category == category)
            .map(|r| r.abs_amount()))
    }

    pub fn summary(&self) -> Summary {
        let inflow = self.total_inflow();
        let outflow = self.total_outflow();

        Summary {
            total_inflow: round2(inflow),
            lifestyle_outflow: round2(outflow.abs()),
            net: round2(inflow + outflow),
            fuliza_used: round2(self.fuliza_used()),
            fuliza_repaid: round2(self.abs_total_for(Category::FulizaRepayment)),
            merchant_spend: round2(self.abs_total_for(Category::MerchantPayment)),
        }
    }

    /// Outflows grouped by category, largest spend first.
    pub fn spending_by_category(&self) -> Vec<CategorySpend> {
        let mut groups: HashMap<Category, (f64, usize)> = HashMap::new();
        for r in self.records.iter().filter(|r| r.is_expense()) {
            let entry = groups.entry(r.category).or_insert((0.0, 0));
            entry.0 += r.amount;
            entry.1 += 1;
        }

        let mut out: Vec<CategorySpend> = groups
            .into_iter()
            .map(|(category, (total, count))| CategorySpend {
                category,
                total: round2(total),
                count,
            })
            .collect();
        out.sort_by(|a, b| a.total.total_cmp(&b.total).then(a.category.cmp(&b.category)));
        out
    }

    /// The `limit` largest single outflows.
    pub fn top_transactions(&self, limit: usize) -> Vec<TopTransaction> {
        let mut expenses: Vec<&TransactionRecord> =
            self.records.iter().filter(|r| r.is_expense()).collect();
        expenses.sort_by(|a, b| a.amount.total_cmp(&b.amount));

        expenses
            .into_iter()
            .take(limit)
            .map(|r| TopTransaction {
                transaction_code: r.transaction_code.clone(),
                date: r.timestamp.map(|ts| ts.to_string()),
                category: r.category,
                amount: r.amount,
            })
            .collect()
    }

    pub fn fuliza_usage(&self) -> FulizaUsage {
        let used_total = round2(self.fuliza_used());
        let used_count = self.records.iter().filter(|r| r.fuliza_used > 0.0).count();
        let repaid_total = round2(self.abs_total_for(Category::FulizaRepayment));

        let inflow = self.total_inflow();
        let denominator = if inflow == 0.0 { 1.0 } else { inflow };

        let mut daily: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for r in self.records.iter().filter(|r| r.fuliza_used > 0.0) {
            if let Some(day) = r.day() {
                *daily.entry(day).or_insert(0.0) += r.fuliza_used;
            }
        }

        FulizaUsage {
            fuliza_used_total: used_total,
            fuliza_used_count: used_count,
            fuliza_repaid_total: repaid_total,
            fuliza_ratio: round4(used_total / denominator),
            timeline: daily
                .into_iter()
                .map(|(date, value)| TimelinePoint {
                    date,
                    value: round2(value),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pesa_core::parse_statement_timestamp;

    fn rec(code: &str, ts: &str, category: Category, amount: f64, fuliza: f64) -> TransactionRecord {
        let mut r = TransactionRecord::new(code, parse_statement_timestamp(ts), category, amount, 0.0);
        r.fuliza_used = fuliza;
        r
    }

    fn sample() -> Vec<TransactionRecord> {
        vec![
            rec("UAAAAAAAA1", "2024-01-01 08:00:00", Category::Received, 1000.0, 0.0),
            rec("UAAAAAAAA2", "2024-01-02 09:00:00", Category::MerchantPayment, -400.0, 150.0),
            rec("UAAAAAAAA3", "2024-01-02 18:00:00", Category::MerchantPayment, -100.0, 50.0),
            rec("UAAAAAAAA4", "2024-01-03 10:00:00", Category::FulizaRepayment, -205.0, 0.0),
            rec("UAAAAAAAA5", "2024-01-04 10:00:00", Category::AirtimePurchase, -20.0, 0.0),
        ]
    }

    #[test]
    fn test_summary() {
        let records = sample();
        let s = Analytics::new(&records).summary();
        assert_eq!(s.total_inflow, 1000.0);
        assert_eq!(s.lifestyle_outflow, 725.0);
        assert_eq!(s.net, 275.0);
        assert_eq!(s.fuliza_used, 200.0);
        assert_eq!(s.fuliza_repaid, 205.0);
        assert_eq!(s.merchant_spend, 500.0);
    }

    #[test]
    fn test_summary_of_empty_ledger_is_zero() {
        let s = Analytics::new(&[]).summary();
        assert_eq!(s.total_inflow, 0.0);
        assert_eq!(s.net, 0.0);
        assert_eq!(Analytics::new(&[]).fuliza_usage().fuliza_ratio, 0.0);
    }

    #[test]
    fn test_spending_by_category_orders_largest_first() {
        let records = sample();
        let cats = Analytics::new(&records).spending_by_category();
        assert_eq!(cats.len(), 3);
        assert_eq!(cats[0].category, Category::MerchantPayment);
        assert_eq!(cats[0].total, -500.0);
        assert_eq!(cats[0].count, 2);
        assert_eq!(cats[2].category, Category::AirtimePurchase);
        assert!(cats.iter().all(|c| c.category != Category::Received));
    }

    #[test]
    fn test_top_transactions_respects_limit() {
        let records = sample();
        let top = Analytics::new(&records).top_transactions(2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].transaction_code, "UAAAAAAAA2");
        assert_eq!(top[1].transaction_code, "UAAAAAAAA4");
        assert_eq!(top[0].date.as_deref(), Some("2024-01-02 09:00:00"));
    }

    #[test]
    fn test_fuliza_usage_with_timeline() {
        let records = sample();
        let f = Analytics::new(&records).fuliza_usage();
        assert_eq!(f.fuliza_used_total, 200.0);
        assert_eq!(f.fuliza_used_count, 2);
        assert_eq!(f.fuliza_repaid_total, 205.0);
        assert_eq!(f.fuliza_ratio, 0.2);
        assert_eq!(f.timeline.len(), 1);
        assert_eq!(f.timeline[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(f.timeline[0].value, 200.0);
    }

    #[test]
    fn test_fuliza_ratio_without_inflow_divides_by_one() {
        let records = vec![rec("UAAAAAAAA2", "2024-01-02 09:00:00", Category::MerchantPayment, -400.0, 150.0)];
        let f = Analytics::new(&records).fuliza_usage();
        assert_eq!(f.fuliza_ratio, 150.0);
    }
}
