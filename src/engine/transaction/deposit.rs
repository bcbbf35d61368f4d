use crate::engine::{
    account::AccountId, error::TransactionError, transaction::validate_amount, Decimal,
};

/// A validated deposit.
///
/// Deposits credit the caller's account and post one DEPOSIT entry.
#[derive(Debug, Clone)]
pub struct Deposit {
    account_id: AccountId,
    amount: Decimal,
}

impl Deposit {
    pub fn new(account_id: AccountId, amount: Decimal) -> Result<Self, TransactionError> {
        Ok(Deposit {
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
