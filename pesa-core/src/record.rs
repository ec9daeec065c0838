//! Ledger record types for parsed mobile-money transactions

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One normalized statement transaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionRecord {
    /// Code issued per transaction (e.g. `UA1B2C3D4E`); also the dedup key
    pub transaction_code: String,
    /// Completion time as printed on the statement, if recoverable
    pub timestamp: Option<NaiveDateTime>,
    pub category: Category,
    /// Positive = inflow, negative = outflow (KES)
    pub amount: f64,
    /// Account balance after the transaction, 0.0 when unrecoverable
    pub balance: f64,
    /// Overdraft credit that funded this transaction
    #[serde(default)]
    pub fuliza_used: f64,
}

/// Transaction categories derived from statement keywords
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    #[serde(rename = "Received")]
    Received,
    #[serde(rename = "Merchant Payment")]
    MerchantPayment,
    #[serde(rename = "Fuliza Repayment")]
    FulizaRepayment,
    #[serde(rename = "Bundle Purchase")]
    BundlePurchase,
    #[serde(rename = "Ziidi Investment")]
    ZiidiInvestment,
    #[serde(rename = "Money Transfer")]
    MoneyTransfer,
    #[serde(rename = "Airtime Purchase")]
    AirtimePurchase,
    #[serde(rename = "Airtel Money Transfer")]
    AirtelMoneyTransfer,
    #[serde(rename = "Ziidi Withdrawal")]
    ZiidiWithdrawal,
    #[serde(rename = "Amount Fulizad")]
    AmountFulizad,
    #[serde(rename = "Withdrawal")]
    Withdrawal,
    #[serde(rename = "Withdrawal Charge")]
    WithdrawalCharge,
    #[serde(rename = "Other")]
    Other,
}

impl Category {
    pub const ALL: [Category; 13] = [
        Category::Received,
        Category::MerchantPayment,
        Category::FulizaRepayment,
        Category::BundlePurchase,
        Category::ZiidiInvestment,
        Category::MoneyTransfer,
        Category::AirtimePurchase,
        Category::AirtelMoneyTransfer,
        Category::ZiidiWithdrawal,
        Category::AmountFulizad,
        Category::Withdrawal,
        Category::WithdrawalCharge,
        Category::Other,
    ];

    /// Display name as stored in the ledger
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Received => "Received",
            Category::MerchantPayment => "Merchant Payment",
            Category::FulizaRepayment => "Fuliza Repayment",
            Category::BundlePurchase => "Bundle Purchase",
            Category::ZiidiInvestment => "Ziidi Investment",
            Category::MoneyTransfer => "Money Transfer",
            Category::AirtimePurchase => "Airtime Purchase",
            Category::AirtelMoneyTransfer => "Airtel Money Transfer",
            Category::ZiidiWithdrawal => "Ziidi Withdrawal",
            Category::AmountFulizad => "Amount Fulizad",
            Category::Withdrawal => "Withdrawal",
            Category::WithdrawalCharge => "Withdrawal Charge",
            Category::Other => "Other",
        }
    }

    /// The synthetic overdraft draw-down the statement emits alongside the real spend
    pub fn is_fuliza_draw(&self) -> bool {
        matches!(self, Category::AmountFulizad)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| anyhow::anyhow!("unknown category: {s}"))
    }
}

impl TransactionRecord {
    /// Create a record with no overdraft attached
    pub fn new(
        transaction_code: impl Into<String>,
        timestamp: Option<NaiveDateTime>,
        category: Category,
        amount: f64,
        balance: f64,
    ) -> Self {
        Self {
            transaction_code: transaction_code.into(),
            timestamp,
            category,
            amount,
            balance,
            fuliza_used: 0.0,
        }
    }

    /// Returns true if money left the account
    pub fn is_expense(&self) -> bool {
        self.amount < 0.0
    }

    /// Returns true if money came in
    pub fn is_income(&self) -> bool {
        self.amount > 0.0
    }

    pub fn abs_amount(&self) -> f64 {
        self.amount.abs()
    }

    /// Calendar day of the transaction, if dated
    pub fn day(&self) -> Option<NaiveDate> {
        self.timestamp.map(|ts| ts.date())
    }
}
