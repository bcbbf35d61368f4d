//! Ledger engine module.
//!
//! This module contains the core balance-mutation logic including:
//! - `LedgerEngine` - Deposit, withdrawal, transfer and history operations
//! - `LedgerStore` - Account rows, the transaction journal and atomic units of work
//! - `Account` / `Transaction` - Plain data entities
//! - `Error` types - Validation, processing and storage errors

mod account;
mod error;
mod ledger_engine;
mod money;
mod store;
mod transaction;

pub(crate) use rust_decimal::Decimal;

pub use account::{Account, AccountId, MAX_USERNAME_LEN};
pub use error::{Error, ErrorKind, ProcessingError, StoreError, TransactionError};
pub use ledger_engine::LedgerEngine;
pub use money::MAX_BALANCE;
pub use store::{LedgerStore, StoreConfig, UnitOfWork};
pub use transaction::{
    Deposit, NewTransaction, Operation, Transaction, TransactionId, TransactionType, Transfer,
    Withdrawal,
};

pub(crate) use money::serialize_money;
