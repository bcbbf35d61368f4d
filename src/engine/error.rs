use crate::engine::account::AccountId;
use crate::engine::Decimal;

/// Top-level error type for the ledger engine.
#[derive(Debug, thiserror::Error)]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    #[error("Transaction error: {0}")]
    Transaction(#[from] TransactionError),
    #[error("Processing error: {0}")]
    Processing(#[from] ProcessingError),
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Errors while turning caller input into a validated operation.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    #[error("Invalid amount: {amount} (must be positive, at most 2 decimal places and 12 digits)")]
    InvalidAmount { amount: Decimal },

    #[error("Invalid username: {username:?}")]
    InvalidUsername { username: String },
}

/// Domain outcomes that reject an operation.
/// Every one of these leaves balances and the journal untouched.
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("Insufficient funds: account {account} has {available}, requested {requested}")]
    InsufficientFunds {
        account: AccountId,
        available: Decimal,
        requested: Decimal,
    },

    #[error("Cannot transfer to yourself ({username})")]
    SelfTransfer { username: String },

    #[error("Recipient {username} not found")]
    RecipientNotFound { username: String },

    #[error("No account for user {username}")]
    AccountNotFound { username: String },

    #[error("Username {username} is already taken")]
    UsernameTaken { username: String },

    #[error("Balance limit exceeded: account {account} has {balance}, credit of {amount} would overflow")]
    BalanceLimitExceeded {
        account: AccountId,
        balance: Decimal,
        amount: Decimal,
    },
}

/// Infrastructure failures from the ledger store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Ledger store is unavailable")]
    Unavailable,

    #[error("Timed out waiting for the lock on account {account}")]
    LockTimeout { account: AccountId },

    #[error("Account {account} not found")]
    AccountNotFound { account: AccountId },

    #[error("Account {account} was not locked by this unit of work")]
    NotLocked { account: AccountId },

    #[error("Constraint violated on account {account}: {detail}")]
    ConstraintViolation { account: AccountId, detail: String },

    #[error("Duplicate username {username}")]
    DuplicateUsername { username: String },
}

/// Machine-distinguishable error category, stable across message changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidAmount,
    InvalidUsername,
    InsufficientFunds,
    SelfTransfer,
    RecipientNotFound,
    AccountNotFound,
    UsernameTaken,
    BalanceLimitExceeded,
    StorageUnavailable,
    Internal,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidAmount => "invalid_amount",
            ErrorKind::InvalidUsername => "invalid_username",
            ErrorKind::InsufficientFunds => "insufficient_funds",
            ErrorKind::SelfTransfer => "self_transfer",
            ErrorKind::RecipientNotFound => "recipient_not_found",
            ErrorKind::AccountNotFound => "account_not_found",
            ErrorKind::UsernameTaken => "username_taken",
            ErrorKind::BalanceLimitExceeded => "balance_limit_exceeded",
            ErrorKind::StorageUnavailable => "storage_unavailable",
            ErrorKind::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Transaction(TransactionError::InvalidAmount { .. }) => ErrorKind::InvalidAmount,
            Error::Transaction(TransactionError::InvalidUsername { .. }) => {
                ErrorKind::InvalidUsername
            }
            Error::Processing(e) => match e {
                ProcessingError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
                ProcessingError::SelfTransfer { .. } => ErrorKind::SelfTransfer,
                ProcessingError::RecipientNotFound { .. } => ErrorKind::RecipientNotFound,
                ProcessingError::AccountNotFound { .. } => ErrorKind::AccountNotFound,
                ProcessingError::UsernameTaken { .. } => ErrorKind::UsernameTaken,
                ProcessingError::BalanceLimitExceeded { .. } => ErrorKind::BalanceLimitExceeded,
            },
            Error::Store(e) => match e {
                StoreError::Unavailable | StoreError::LockTimeout { .. } => {
                    ErrorKind::StorageUnavailable
                }
                StoreError::DuplicateUsername { .. } => ErrorKind::UsernameTaken,
                StoreError::AccountNotFound { .. }
                | StoreError::NotLocked { .. }
                | StoreError::ConstraintViolation { .. } => ErrorKind::Internal,
            },
        }
    }

    /// Transient failures may succeed if the caller retries; the engine never retries itself.
    pub fn is_transient(&self) -> bool {
        self.kind() == ErrorKind::StorageUnavailable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_of_store_errors() {
        assert_eq!(
            Error::from(StoreError::Unavailable).kind(),
            ErrorKind::StorageUnavailable
        );
        assert!(Error::from(StoreError::LockTimeout { account: 1 }).is_transient());
        assert_eq!(
            Error::from(StoreError::NotLocked { account: 1 }).kind(),
            ErrorKind::Internal
        );
    }

    #[test]
    fn test_domain_errors_are_not_transient() {
        let err = Error::from(ProcessingError::SelfTransfer {
            username: "alice".into(),
        });
        assert_eq!(err.kind(), ErrorKind::SelfTransfer);
        assert!(!err.is_transient());
    }
}
