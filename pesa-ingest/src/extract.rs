//! Field extractor: turn one span into one TransactionRecord.
//!
//! Every field degrades independently to a default. Layouts differ between
//! statement exports, so a span we cannot read fully still yields a record.

use pesa_core::{TransactionRecord, parse_amount, parse_statement_timestamp};
use regex::Regex;
use std::sync::LazyLock;

use crate::category_rules::categorize;
use crate::types::RawSpan;

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9]{4}-[0-9]{2}-[0-9]{2} [0-9]{2}:[0-9]{2}:[0-9]{2}")
        .expect("timestamp pattern")
});

static AMOUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?[0-9]{1,3}(?:,[0-9]{3})*\.[0-9]{2}").expect("amount pattern"));

/// Extract a record from a span. Never fails.
///
/// - timestamp: first `YYYY-MM-DD HH:MM:SS`, else None
/// - amount: first signed decimal, else 0.0
/// - balance: last signed decimal, else 0.0 (same match as amount when only one)
/// - category: first matching keyword rule, else Other
pub fn extract(span: &RawSpan<'_>) -> TransactionRecord {
    let body = span.body;

    let timestamp = DATE_RE
        .find(body)
        .and_then(|m| parse_statement_timestamp(m.as_str()));

    let amounts: Vec<f64> = AMOUNT_RE
        .find_iter(body)
        .map(|m| parse_amount(m.as_str()).unwrap_or(0.0))
        .collect();
    let amount = amounts.first().copied().unwrap_or(0.0);
    let balance = amounts.last().copied().unwrap_or(0.0);

    TransactionRecord::new(span.code, timestamp, categorize(body), amount, balance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pesa_core::Category;

    fn span<'a>(code: &'a str, body: &'a str) -> RawSpan<'a> {
        RawSpan { code, body }
    }

    #[test]
    fn test_extract_merchant_payment() {
        let rec = extract(&span(
            "U123456789",
            " 2024-01-05 10:00:00 Merchant Payment to Shop -500.00 4,500.00 ",
        ));
        assert_eq!(rec.transaction_code, "U123456789");
        assert_eq!(rec.timestamp.unwrap().to_string(), "2024-01-05 10:00:00");
        assert_eq!(rec.category, Category::MerchantPayment);
        assert_eq!(rec.amount, -500.0);
        assert_eq!(rec.balance, 4500.0);
        assert_eq!(rec.fuliza_used, 0.0);
    }

    #[test]
    fn test_empty_body_gets_defaults() {
        let rec = extract(&span("UABCDEFGHI", ""));
        assert_eq!(rec.transaction_code, "UABCDEFGHI");
        assert!(rec.timestamp.is_none());
        assert_eq!(rec.category, Category::Other);
        assert_eq!(rec.amount, 0.0);
        assert_eq!(rec.balance, 0.0);
    }

    #[test]
    fn test_single_amount_is_also_balance() {
        let rec = extract(&span("UABCDEFGHI", " Airtime Purchase -50.00"));
        assert_eq!(rec.amount, -50.0);
        assert_eq!(rec.balance, -50.0);
        assert_eq!(rec.category, Category::AirtimePurchase);
    }

    #[test]
    fn test_first_is_amount_last_is_balance() {
        let rec = extract(&span(
            "UABCDEFGHI",
            " 2024-02-01 08:15:00 Customer Transfer -1,234.56 fee -13.00 10,020.44",
        ));
        assert_eq!(rec.amount, -1234.56);
        assert_eq!(rec.balance, 10020.44);
    }

    #[test]
    fn test_sign_not_inferred_from_category() {
        // Withdrawals printed without a minus stay positive
        let rec = extract(&span("UABCDEFGHI", " Customer Withdrawal At Agent 1,000.00 200.00"));
        assert_eq!(rec.category, Category::Withdrawal);
        assert_eq!(rec.amount, 1000.0);
    }

    #[test]
    fn test_invalid_calendar_date_is_none() {
        let rec = extract(&span("UABCDEFGHI", " 2024-13-40 25:00:00 Funds received 10.00"));
        assert!(rec.timestamp.is_none());
        assert_eq!(rec.category, Category::Received);
        assert_eq!(rec.amount, 10.0);
    }

    #[test]
    fn test_non_ascii_digits_are_not_amounts() {
        let rec = extract(&span("UABCDEFGHI", " Funds received \u{661}\u{662}\u{663}.\u{664}\u{665} 500.00"));
        assert_eq!(rec.amount, 500.0);
        assert_eq!(rec.balance, 500.0);

        let rec = extract(&span("UABCDEFGHI", " \u{662}\u{660}\u{662}\u{664}-01-05 10:00:00 Airtime Purchase"));
        assert!(rec.timestamp.is_none());
    }

    #[test]
    fn test_first_date_wins() {
        let rec = extract(&span(
            "UABCDEFGHI",
            " 2024-03-01 09:00:00 Pay Bill 2024-03-02 09:00:00 -20.00 80.00",
        ));
        assert_eq!(rec.timestamp.unwrap().to_string(), "2024-03-01 09:00:00");
    }
}
