//! Personal banking ledger.
//!
//! Users hold a single account with a decimal balance and move money through
//! deposits, withdrawals and transfers. Each balance change is recorded as an
//! immutable transaction in the same atomic unit that applies it, and
//! concurrent operations on the same account are serialized by row locks.
//!
//! ```
//! use bank_ledger::{Deposit, LedgerEngine, Transfer};
//! use rust_decimal::Decimal;
//!
//! let engine = LedgerEngine::default();
//! let alice = engine.open_account("alice").unwrap().id();
//! engine.open_account("bob").unwrap();
//!
//! engine.deposit(Deposit::new(alice, Decimal::new(15000, 2)).unwrap()).unwrap();
//! let balance = engine
//!     .transfer(Transfer::new(alice, "bob", Decimal::new(10000, 2)).unwrap())
//!     .unwrap();
//! assert_eq!(balance, Decimal::new(5000, 2));
//! ```

pub mod api;
mod engine;

pub use engine::{
    Account, AccountId, Deposit, Error, ErrorKind, LedgerEngine, LedgerStore, NewTransaction,
    Operation, ProcessingError, StoreConfig, StoreError, Transaction, TransactionError,
    TransactionId, TransactionType, Transfer, UnitOfWork, Withdrawal, MAX_BALANCE,
    MAX_USERNAME_LEN,
};
