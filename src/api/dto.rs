use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::engine::serialize_money;

/// Body of `POST /deposit` and `POST /withdraw`.
///
/// Amounts are accepted as JSON strings or numbers. Numbers keep every digit
/// they were written with, so `0.0100001` fails the 2-dp check.
#[derive(Debug, Deserialize)]
pub struct AmountRequest {
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub amount: Decimal,
}

/// Body of `POST /transfer`.
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    pub recipient_username: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub amount: Decimal,
}

/// Body of `POST /register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
}

/// Success payload of every balance-changing route.
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub message: &'static str,
    #[serde(serialize_with = "serialize_money")]
    pub new_balance: Decimal,
}

impl BalanceResponse {
    pub fn new(message: &'static str, new_balance: Decimal) -> Self {
        Self {
            message,
            new_balance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_number_keeps_all_digits() {
        let body: AmountRequest =
            serde_json::from_str(r#"{"amount": 0.01000000000000000001}"#).unwrap();
        assert_eq!(body.amount, dec!(0.01000000000000000001));
        assert_eq!(body.amount.scale(), 20);
    }

    #[test]
    fn test_amount_string_and_number_agree() {
        let number: TransferRequest =
            serde_json::from_str(r#"{"recipient_username": "bob", "amount": 12.50}"#).unwrap();
        let string: TransferRequest =
            serde_json::from_str(r#"{"recipient_username": "bob", "amount": "12.50"}"#).unwrap();
        assert_eq!(number.amount, string.amount);
        assert_eq!(number.amount.scale(), 2);
    }

    #[test]
    fn test_malformed_amount_is_rejected() {
        assert!(serde_json::from_str::<AmountRequest>(r#"{"amount": "abc"}"#).is_err());
        assert!(serde_json::from_str::<AmountRequest>(r#"{"amount": true}"#).is_err());
    }
}
