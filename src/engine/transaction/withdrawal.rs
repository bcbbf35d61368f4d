use crate::engine::{
    account::AccountId, error::TransactionError, transaction::validate_amount, Decimal,
};

/// A validated withdrawal.
///
/// Withdrawals debit the caller's account and post one WITHDRAWAL entry.
/// The funds check happens later, inside the engine's atomic unit.
#[derive(Debug, Clone)]
pub struct Withdrawal {
    account_id: AccountId,
    amount: Decimal,
}

impl Withdrawal {
    pub fn new(account_id: AccountId, amount: Decimal) -> Result<Self, TransactionError> {
        Ok(Withdrawal {
            account_id,
            amount: validate_amount(amount)?,
        })
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_valid_withdrawal() {
        let withdrawal = Withdrawal::new(1, dec!(50.25)).unwrap();

        assert_eq!(withdrawal.account_id(), 1);
        assert_eq!(withdrawal.amount(), dec!(50.25));
    }

    #[test]
    fn test_rejects_more_than_2_decimals() {
        assert!(Withdrawal::new(1, dec!(1.005)).is_err());
    }

    #[test]
    fn test_rejects_negative_amount() {
        assert!(Withdrawal::new(1, dec!(-100)).is_err());
    }

    #[test]
    fn test_rejects_zero_amount() {
        assert!(Withdrawal::new(1, Decimal::ZERO).is_err());
    }
}
