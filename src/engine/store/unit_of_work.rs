use std::collections::BTreeMap;

use parking_lot::MutexGuard;

use crate::engine::account::{Account, AccountId};
use crate::engine::error::StoreError;
use crate::engine::money;
use crate::engine::transaction::NewTransaction;
use crate::engine::Decimal;

/// Reads and staged writes of one atomic unit.
///
/// Holds the row locks of every account the unit was opened over. Nothing
/// staged here is visible to anyone else until the store commits the unit.
#[derive(Debug, Default)]
pub struct UnitOfWork<'a> {
    guards: BTreeMap<AccountId, MutexGuard<'a, Account>>,
    accounts: BTreeMap<AccountId, Account>,
    entries: Vec<NewTransaction>,
}

impl<'a> UnitOfWork<'a> {
    pub(super) fn lock(&mut self, id: AccountId, guard: MutexGuard<'a, Account>) {
        self.guards.insert(id, guard);
    }

    #[allow(clippy::type_complexity)]
    pub(super) fn into_parts(
        self,
    ) -> (
        BTreeMap<AccountId, MutexGuard<'a, Account>>,
        BTreeMap<AccountId, Account>,
        Vec<NewTransaction>,
    ) {
        (self.guards, self.accounts, self.entries)
    }

    /// Current state of a locked account, including this unit's own writes.
    pub fn get_account_for_update(&self, id: AccountId) -> Result<Account, StoreError> {
        if let Some(staged) = self.accounts.get(&id) {
            return Ok(staged.clone());
        }
        self.guards
            .get(&id)
            .map(|guard| Account::clone(guard))
            .ok_or(StoreError::NotLocked { account: id })
    }

    /// Stage a new version of a locked account.
    pub fn save_account(&mut self, account: Account) -> Result<(), StoreError> {
        let id = account.id();
        let Some(current) = self.guards.get(&id) else {
            return Err(StoreError::NotLocked { account: id });
        };
        if current.username() != account.username() || current.created_at() != account.created_at()
        {
            return Err(StoreError::ConstraintViolation {
                account: id,
                detail: "identity fields are immutable".to_string(),
            });
        }
        if !money::fits_column(account.balance()) {
            return Err(StoreError::ConstraintViolation {
                account: id,
                detail: format!("balance {} outside the balance column", account.balance()),
            });
        }
        self.accounts.insert(id, account);
        Ok(())
    }

    /// Stage a transaction on a locked account.
    pub fn create_transaction(&mut self, entry: NewTransaction) -> Result<(), StoreError> {
        let id = entry.account_id();
        if !self.guards.contains_key(&id) {
            return Err(StoreError::NotLocked { account: id });
        }
        if entry.amount() <= Decimal::ZERO || !money::fits_column(entry.amount()) {
            return Err(StoreError::ConstraintViolation {
                account: id,
                detail: format!("transaction amount {} must be positive", entry.amount()),
            });
        }
        self.entries.push(entry);
        Ok(())
    }
}
