mod deposit;
mod transfer;
mod withdrawal;

pub use deposit::Deposit;
pub use transfer::Transfer;
pub use withdrawal::Withdrawal;

use super::account::AccountId;
use super::error::TransactionError;
use super::money::{self, serialize_money, MONEY_SCALE};
use super::Decimal;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub type TransactionId = u64;

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    TransferIn,
    TransferOut,
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Deposit => write!(f, "DEPOSIT"),
            TransactionType::Withdrawal => write!(f, "WITHDRAWAL"),
            TransactionType::TransferIn => write!(f, "TRANSFER_IN"),
            TransactionType::TransferOut => write!(f, "TRANSFER_OUT"),
        }
    }
}

/// A posted, immutable ledger entry.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Transaction {
    id: TransactionId,
    #[serde(skip)]
    account_id: AccountId,
    transaction_type: TransactionType,
    #[serde(serialize_with = "serialize_money")]
    amount: Decimal,
    description: String,
    created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl std::fmt::Display for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {:.2} on {}",
            self.transaction_type,
            self.amount,
            self.created_at.format("%Y-%m-%d")
        )
    }
}

/// A ledger entry staged inside a unit of work.
/// The store assigns the id and timestamp when the unit commits.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    account_id: AccountId,
    transaction_type: TransactionType,
    amount: Decimal,
    description: String,
}

impl NewTransaction {
    pub fn new(
        account_id: AccountId,
        transaction_type: TransactionType,
        amount: Decimal,
        description: impl Into<String>,
    ) -> Self {
        Self {
            account_id,
            transaction_type,
            amount,
            description: description.into(),
        }
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub(super) fn post(self, id: TransactionId, created_at: DateTime<Utc>) -> Transaction {
        Transaction {
            id,
            account_id: self.account_id,
            transaction_type: self.transaction_type,
            amount: money::to_money(self.amount),
            description: self.description,
            created_at,
        }
    }
}

/// A validated balance-changing operation ready for the engine.
#[derive(Debug, Clone)]
pub enum Operation {
    Deposit(Deposit),
    Withdrawal(Withdrawal),
    Transfer(Transfer),
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Deposit(d) => {
                write!(f, "[deposit] account={} amount={}", d.account_id(), d.amount())
            }
            Operation::Withdrawal(w) => {
                write!(
                    f,
                    "[withdrawal] account={} amount={}",
                    w.account_id(),
                    w.amount()
                )
            }
            Operation::Transfer(t) => {
                write!(
                    f,
                    "[transfer] sender={} recipient={} amount={}",
                    t.sender_id(),
                    t.recipient_username(),
                    t.amount()
                )
            }
        }
    }
}

/// Amounts must be positive with at most two fractional digits and fit a
/// 12-digit column. Trailing zeros beyond two places are tolerated.
fn validate_amount(amount: Decimal) -> Result<Decimal, TransactionError> {
    let normalized = amount.normalize();
    if normalized > Decimal::ZERO
        && normalized.scale() <= MONEY_SCALE
        && normalized <= money::MAX_BALANCE
    {
        Ok(money::to_money(normalized))
    } else {
        Err(TransactionError::InvalidAmount { amount })
    }
}
