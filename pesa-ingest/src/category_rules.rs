//! Deterministic keyword rules mapping statement text to a ledger Category.
//!
//! The table is ordered and first match wins. Several keywords appear inside
//! contexts claimed by earlier rules, so reordering changes results; the
//! tests below pin the order.

use pesa_core::Category;

/// One keyword rule: any keyword contained in the body selects `category`.
#[derive(Debug, Clone, Copy)]
pub struct CategoryRule {
    pub keywords: &'static [&'static str],
    pub category: Category,
}

const fn rule(keywords: &'static [&'static str], category: Category) -> CategoryRule {
    CategoryRule { keywords, category }
}

/// Ordered rule table. Matching is case-sensitive substring containment.
pub const CATEGORY_RULES: &[CategoryRule] = &[
    rule(&["Funds received"], Category::Received),
    rule(&["Merchant Payment"], Category::MerchantPayment),
    rule(&["Loan Repayment", "OD Loan Repayment"], Category::FulizaRepayment),
    rule(&["Bundle Purchase"], Category::BundlePurchase),
    rule(&["Pay Bill"], Category::MerchantPayment),
    rule(&["Unit Trust Invest"], Category::ZiidiInvestment),
    rule(&["Customer Transfer"], Category::MoneyTransfer),
    rule(&["Airtime Purchase"], Category::AirtimePurchase),
    rule(&["C2B Transfer"], Category::AirtelMoneyTransfer),
    rule(&["Unit Trust Withdraw"], Category::ZiidiWithdrawal),
    rule(&["OverDraft of Credit Party"], Category::AmountFulizad),
    rule(&["Customer Withdrawal At Agent"], Category::Withdrawal),
    rule(&["Withdrawal Charge"], Category::WithdrawalCharge),
    rule(&["Business Payment from"], Category::Received),
    rule(&["Customer Payment to Small"], Category::MerchantPayment),
];

impl CategoryRule {
    pub fn matches(&self, body: &str) -> bool {
        self.keywords.iter().any(|k| body.contains(k))
    }
}

/// Categorize a span body. Falls back to `Category::Other`.
pub fn categorize(body: &str) -> Category {
    CATEGORY_RULES
        .iter()
        .find(|r| r.matches(body))
        .map(|r| r.category)
        .unwrap_or(Category::Other)
}
