use super::error::TransactionError;
use super::money::{self, serialize_money};
use super::Decimal;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub type AccountId = u64;

/// Longest username the identity provider hands out.
pub const MAX_USERNAME_LEN: usize = 150;

/// A user's single balance-holding account.
///
/// Identity fields (`id`, `username`, `created_at`) never change after creation.
/// The balance only moves through [`Account::credit`] and [`Account::debit`],
/// which are reachable from the engine's atomic units of work.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Account {
    id: AccountId,
    username: String,
    #[serde(serialize_with = "serialize_money")]
    balance: Decimal,
    created_at: DateTime<Utc>,
}

impl Account {
    pub(super) fn new(id: AccountId, username: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            username: username.into(),
            balance: money::to_money(Decimal::ZERO),
            created_at,
        }
    }

    /// Returns the account ID
    pub fn id(&self) -> AccountId {
        self.id
    }

    /// Returns the owning user's name
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the current balance
    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Credit the account.
    /// Caller must ensure the result stays within the balance column.
    pub(super) fn credit(&mut self, amount: Decimal) {
        debug_assert!(amount > Decimal::ZERO, "credit of non-positive amount");
        self.balance = money::to_money(self.balance + amount);
        #[cfg(debug_assertions)]
        self.assert_invariant();
    }

    /// Debit the account.
    /// Caller must ensure sufficient funds.
    ///
    /// # Panics (debug only)
    /// Panics if the debit would take the balance below zero.
    pub(super) fn debit(&mut self, amount: Decimal) {
        debug_assert!(amount > Decimal::ZERO, "debit of non-positive amount");
        self.balance = money::to_money(self.balance - amount);
        #[cfg(debug_assertions)]
        self.assert_invariant();
    }

    #[cfg(debug_assertions)]
    fn assert_invariant(&self) {
        debug_assert!(
            self.balance >= Decimal::ZERO,
            "Invariant violated: account {} balance ({}) is negative",
            self.id,
            self.balance
        );
    }
}

impl std::fmt::Display for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}'s account - balance: {:.2}", self.username, self.balance)
    }
}

/// Trim and check a username coming from outside the engine.
pub(super) fn validate_username(username: &str) -> Result<String, TransactionError> {
    let trimmed = username.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_USERNAME_LEN {
        return Err(TransactionError::InvalidUsername {
            username: username.to_string(),
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn account() -> Account {
        Account::new(1, "alice", Utc::now())
    }

    #[test]
    fn test_new_account_has_zero_balance() {
        let account = account();
        assert_eq!(account.balance(), Decimal::ZERO);
        assert_eq!(account.balance().to_string(), "0.00");
        assert_eq!(account.username(), "alice");
    }

    #[test]
    fn test_credit_increases_balance() {
        let mut account = account();
        account.credit(dec!(100.5));
        assert_eq!(account.balance(), dec!(100.5));
        assert_eq!(account.balance().to_string(), "100.50");
    }

    #[test]
    fn test_debit_decreases_balance() {
        let mut account = account();
        account.credit(dec!(100));
        account.debit(dec!(40.25));
        assert_eq!(account.balance(), dec!(59.75));
    }

    #[test]
    fn test_debit_to_exactly_zero() {
        let mut account = account();
        account.credit(dec!(10));
        account.debit(dec!(10));
        assert_eq!(account.balance(), Decimal::ZERO);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "Invariant violated")]
    fn test_overdraw_panics_in_debug() {
        let mut account = account();
        account.credit(dec!(1));
        account.debit(dec!(2));
    }

    #[test]
    fn test_serializes_balance_with_two_places() {
        let mut account = account();
        account.credit(dec!(7));
        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["balance"], "7.00");
        assert_eq!(json["username"], "alice");
        assert_eq!(json["id"], 1);
    }

    #[test]
    fn test_validate_username() {
        assert_eq!(validate_username("  bob ").unwrap(), "bob");
        assert!(validate_username("   ").is_err());
        assert!(validate_username(&"x".repeat(MAX_USERNAME_LEN + 1)).is_err());
        assert!(validate_username(&"x".repeat(MAX_USERNAME_LEN)).is_ok());
    }
}
