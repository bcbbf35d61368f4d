use crate::engine::{
    account::{validate_username, AccountId},
    error::TransactionError,
    transaction::validate_amount,
    Decimal,
};

/// A validated transfer from the caller's account to another user.
///
/// Self-transfer and recipient existence are checked by the engine,
/// the sender's funds inside the atomic unit that moves the money.
#[derive(Debug, Clone)]
pub struct Transfer {
    sender_id: AccountId,
    recipient_username: String,
    amount: Decimal,
}

impl Transfer {
    pub fn new(
        sender_id: AccountId,
        recipient_username: &str,
        amount: Decimal,
    ) -> Result<Self, TransactionError> {
        let amount = validate_amount(amount)?;
        Ok(Transfer {
            sender_id,
            recipient_username: validate_username(recipient_username)?,
            amount,
        })
    }

    pub fn sender_id(&self) -> AccountId {
        self.sender_id
    }

    pub fn recipient_username(&self) -> &str {
        &self.recipient_username
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
    fn test_valid_transfer() {
        let transfer = Transfer::new(1, " bob ", dec!(100)).unwrap();

        assert_eq!(transfer.sender_id(), 1);
        assert_eq!(transfer.recipient_username(), "bob");
        assert_eq!(transfer.amount(), dec!(100));
    }

    #[test]
    fn test_amount_checked_before_recipient() {
        assert!(matches!(
            Transfer::new(1, "", dec!(-1)),
            Err(TransactionError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_rejects_blank_recipient() {
        assert!(matches!(
            Transfer::new(1, "  ", dec!(1)),
            Err(TransactionError::InvalidUsername { .. })
        ));
    }
}
