use std::sync::Arc;

use super::account::{validate_username, Account, AccountId};
use super::error::{Error, ProcessingError, StoreError};
use super::money;
use super::store::{LedgerStore, StoreConfig};
use super::transaction::{
    Deposit, NewTransaction, Operation, Transaction, TransactionType, Transfer, Withdrawal,
};
use super::Decimal;

/// The core ledger engine.
///
/// Applies deposits, withdrawals and transfers to accounts held in a shared
/// [`LedgerStore`]. Every balance change and its transaction record(s) are
/// written in one atomic unit; a rejected or failed operation changes nothing.
/// Cloning is cheap and clones share the same store, so one engine can serve
/// any number of concurrent callers.
#[derive(Debug, Clone)]
pub struct LedgerEngine {
    store: Arc<LedgerStore>,
}

impl Default for LedgerEngine {
    fn default() -> Self {
        Self::with_config(StoreConfig::default())
    }
}

impl LedgerEngine {
    pub fn new(store: Arc<LedgerStore>) -> Self {
        log::trace!("LedgerEngine initialized");
        Self { store }
    }

    /// Create an engine over a fresh, empty store
    pub fn with_config(config: StoreConfig) -> Self {
        Self::new(Arc::new(LedgerStore::new(config)))
    }

    pub fn store(&self) -> &Arc<LedgerStore> {
        &self.store
    }

    /// Open the single account of a newly registered user.
    pub fn open_account(&self, username: &str) -> Result<Account, Error> {
        let username = validate_username(username)?;
        match self.store.open_account(&username) {
            Ok(account) => {
                log::info!("Opened account {} for {}", account.id(), account.username());
                Ok(account)
            }
            Err(StoreError::DuplicateUsername { username }) => {
                Err(ProcessingError::UsernameTaken { username }.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Resolve an authenticated user to their account id.
    pub fn resolve_caller(&self, username: &str) -> Result<AccountId, Error> {
        self.store
            .find_account_id(username)?
            .ok_or_else(|| {
                ProcessingError::AccountNotFound {
                    username: username.to_string(),
                }
                .into()
            })
    }

    /// Committed state of an account.
    pub fn account(&self, account_id: AccountId) -> Result<Account, Error> {
        Ok(self.store.get_account(account_id)?)
    }

    /// Transactions of an account, newest first.
    pub fn history(&self, account_id: AccountId) -> Result<Vec<Transaction>, Error> {
        Ok(self.store.list_transactions(account_id)?)
    }

    pub fn deposit(&self, deposit: Deposit) -> Result<Decimal, Error> {
        self.process(Operation::Deposit(deposit))
    }

    pub fn withdraw(&self, withdrawal: Withdrawal) -> Result<Decimal, Error> {
        self.process(Operation::Withdrawal(withdrawal))
    }

    pub fn transfer(&self, transfer: Transfer) -> Result<Decimal, Error> {
        self.process(Operation::Transfer(transfer))
    }

    /// Apply one validated operation and return the caller's new balance.
    pub fn process(&self, operation: Operation) -> Result<Decimal, Error> {
        log::trace!("Processing operation: {operation}");
        let result = match operation {
            Operation::Deposit(deposit) => self.handle_deposit(deposit),
            Operation::Withdrawal(withdrawal) => self.handle_withdrawal(withdrawal),
            Operation::Transfer(transfer) => self.handle_transfer(transfer),
        };
        if let Err(e) = &result {
            if e.is_transient() {
                log::warn!("Operation failed: {e}");
            } else {
                log::debug!("Operation rejected: {e}");
            }
        }
        result
    }
}

// =============================================================================
// Operation Handlers
// =============================================================================

impl LedgerEngine {
    fn handle_deposit(&self, deposit: Deposit) -> Result<Decimal, Error> {
        let account_id = deposit.account_id();
        let amount = deposit.amount();

        let new_balance = self.store.run_atomic(&[account_id], |unit| {
            let mut account = unit.get_account_for_update(account_id)?;
            ensure_credit_fits(&account, amount)?;

            account.credit(amount);
            let new_balance = account.balance();
            unit.save_account(account)?;
            unit.create_transaction(NewTransaction::new(
                account_id,
                TransactionType::Deposit,
                amount,
                "Deposit to account",
            ))?;
            Ok::<_, Error>(new_balance)
        })?;

        log::trace!("[deposit] account={account_id} amount={amount} -> new_balance={new_balance}");
        Ok(new_balance)
    }

    fn handle_withdrawal(&self, withdrawal: Withdrawal) -> Result<Decimal, Error> {
        let account_id = withdrawal.account_id();
        let amount = withdrawal.amount();

        let new_balance = self.store.run_atomic(&[account_id], |unit| {
            let mut account = unit.get_account_for_update(account_id)?;
            ensure_funds(&account, amount)?;

            account.debit(amount);
            let new_balance = account.balance();
            unit.save_account(account)?;
            unit.create_transaction(NewTransaction::new(
                account_id,
                TransactionType::Withdrawal,
                amount,
                "Withdrawal from account",
            ))?;
            Ok::<_, Error>(new_balance)
        })?;

        log::trace!(
            "[withdrawal] account={account_id} amount={amount} -> new_balance={new_balance}"
        );
        Ok(new_balance)
    }

    fn handle_transfer(&self, transfer: Transfer) -> Result<Decimal, Error> {
        let sender_id = transfer.sender_id();
        let amount = transfer.amount();

        let sender = self.store.get_account(sender_id)?;
        if sender.username() == transfer.recipient_username() {
            return Err(ProcessingError::SelfTransfer {
                username: sender.username().to_string(),
            }
            .into());
        }

        let recipient_id = self
            .store
            .find_account_id(transfer.recipient_username())?
            .ok_or_else(|| ProcessingError::RecipientNotFound {
                username: transfer.recipient_username().to_string(),
            })?;

        let new_balance = self
            .store
            .run_atomic(&[sender_id, recipient_id], |unit| {
                let mut sender = unit.get_account_for_update(sender_id)?;
                let mut recipient = unit.get_account_for_update(recipient_id)?;
                ensure_funds(&sender, amount)?;
                ensure_credit_fits(&recipient, amount)?;

                sender.debit(amount);
                recipient.credit(amount);
                let new_balance = sender.balance();

                let outgoing = NewTransaction::new(
                    sender_id,
                    TransactionType::TransferOut,
                    amount,
                    format!("Transfer to {}", recipient.username()),
                );
                let incoming = NewTransaction::new(
                    recipient_id,
                    TransactionType::TransferIn,
                    amount,
                    format!("Transfer from {}", sender.username()),
                );

                unit.save_account(sender)?;
                unit.save_account(recipient)?;
                unit.create_transaction(outgoing)?;
                unit.create_transaction(incoming)?;
                Ok::<_, Error>(new_balance)
            })?;

        log::trace!(
            "[transfer] sender={sender_id} recipient={recipient_id} amount={amount} -> new_balance={new_balance}"
        );
        Ok(new_balance)
    }
}

fn ensure_funds(account: &Account, amount: Decimal) -> Result<(), ProcessingError> {
    if account.balance() < amount {
        return Err(ProcessingError::InsufficientFunds {
            account: account.id(),
            available: account.balance(),
            requested: amount,
        });
    }
    Ok(())
}

fn ensure_credit_fits(account: &Account, amount: Decimal) -> Result<(), ProcessingError> {
    if account.balance() + amount > money::MAX_BALANCE {
        return Err(ProcessingError::BalanceLimitExceeded {
            account: account.id(),
            balance: account.balance(),
            amount,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::error::ErrorKind;
    use rust_decimal_macros::dec;

    fn engine_with(usernames: &[&str]) -> (LedgerEngine, Vec<AccountId>) {
        let engine = LedgerEngine::default();
        let ids = usernames
            .iter()
            .map(|name| engine.open_account(name).unwrap().id())
            .collect();
        (engine, ids)
    }

    #[test]
    fn test_open_account_twice_is_username_taken() {
        let (engine, _) = engine_with(&["alice"]);
        let err = engine.open_account("alice").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UsernameTaken);
    }

    #[test]
    fn test_resolve_unknown_caller() {
        let (engine, _) = engine_with(&["alice"]);
        let err = engine.resolve_caller("mallory").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AccountNotFound);
    }

    #[test]
    fn test_deposit_returns_new_balance() {
        let (engine, ids) = engine_with(&["alice"]);
        let balance = engine
            .deposit(Deposit::new(ids[0], dec!(12.34)).unwrap())
            .unwrap();
        assert_eq!(balance, dec!(12.34));
        assert_eq!(engine.account(ids[0]).unwrap().balance(), dec!(12.34));
    }

    #[test]
    fn test_deposit_past_column_limit_is_rejected() {
        let (engine, ids) = engine_with(&["alice"]);
        engine
            .deposit(Deposit::new(ids[0], money::MAX_BALANCE).unwrap())
            .unwrap();

        let err = engine
            .deposit(Deposit::new(ids[0], dec!(0.01)).unwrap())
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::BalanceLimitExceeded);
        assert_eq!(engine.account(ids[0]).unwrap().balance(), money::MAX_BALANCE);
        assert_eq!(engine.history(ids[0]).unwrap().len(), 1);
    }

    #[test]
    fn test_withdraw_entire_balance() {
        let (engine, ids) = engine_with(&["alice"]);
        engine.deposit(Deposit::new(ids[0], dec!(10)).unwrap()).unwrap();
        let balance = engine
            .withdraw(Withdrawal::new(ids[0], dec!(10)).unwrap())
            .unwrap();
        assert_eq!(balance, Decimal::ZERO);
    }

    #[test]
    fn test_transfer_descriptions_name_the_counterparty() {
        let (engine, ids) = engine_with(&["alice", "bob"]);
        engine.deposit(Deposit::new(ids[0], dec!(5)).unwrap()).unwrap();
        engine
            .transfer(Transfer::new(ids[0], "bob", dec!(5)).unwrap())
            .unwrap();

        let sent = &engine.history(ids[0]).unwrap()[0];
        let received = &engine.history(ids[1]).unwrap()[0];
        assert_eq!(sent.description(), "Transfer to bob");
        assert_eq!(received.description(), "Transfer from alice");
    }

    #[test]
    fn test_transfer_to_full_recipient_changes_nothing() {
        let (engine, ids) = engine_with(&["alice", "bob"]);
        engine.deposit(Deposit::new(ids[0], dec!(5)).unwrap()).unwrap();
        engine
            .deposit(Deposit::new(ids[1], money::MAX_BALANCE).unwrap())
            .unwrap();

        let err = engine
            .transfer(Transfer::new(ids[0], "bob", dec!(5)).unwrap())
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::BalanceLimitExceeded);
        assert_eq!(engine.account(ids[0]).unwrap().balance(), dec!(5));
        assert_eq!(engine.store().transaction_count(), 2);
    }

    #[test]
    fn test_operations_on_closed_store_are_transient_failures() {
        let (engine, ids) = engine_with(&["alice"]);
        engine.store().close();

        let err = engine
            .deposit(Deposit::new(ids[0], dec!(1)).unwrap())
            .unwrap_err();

        assert!(err.is_transient());
        assert_eq!(err.kind(), ErrorKind::StorageUnavailable);
    }
}
