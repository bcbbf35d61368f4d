mod unit_of_work;

pub use unit_of_work::UnitOfWork;

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::{Mutex, RwLock};

use super::account::{Account, AccountId};
use super::error::StoreError;
use super::transaction::{NewTransaction, Transaction, TransactionId};

/// Store tuning.
#[derive(Debug, Clone, Copy)]
pub struct StoreConfig {
    /// How long a unit of work waits for a row lock before giving up.
    pub lock_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            lock_timeout: Duration::from_secs(5),
        }
    }
}

type Row = Arc<Mutex<Account>>;

/// In-memory ledger storage with row-level locking.
///
/// Account rows each sit behind their own mutex. Balance mutations only
/// happen inside [`LedgerStore::run_atomic`], which locks every touched row
/// in ascending id order, stages writes in a [`UnitOfWork`] and publishes
/// them together. Transactions are append-only and live in the journal.
#[derive(Debug)]
pub struct LedgerStore {
    config: StoreConfig,
    open: AtomicBool,
    /// username -> account id (one account per user)
    directory: RwLock<Directory>,
    rows: RwLock<HashMap<AccountId, Row>>,
    journal: RwLock<Journal>,
}

#[derive(Debug, Default)]
struct Directory {
    next_id: AccountId,
    by_username: HashMap<String, AccountId>,
}

#[derive(Debug, Default)]
struct Journal {
    next_id: TransactionId,
    len: usize,
    by_account: HashMap<AccountId, Vec<Transaction>>,
}

impl Journal {
    fn append(&mut self, entry: NewTransaction, created_at: chrono::DateTime<Utc>) {
        self.next_id += 1;
        let posted = entry.post(self.next_id, created_at);
        self.by_account
            .entry(posted.account_id())
            .or_default()
            .push(posted);
        self.len += 1;
    }
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl LedgerStore {
    pub fn new(config: StoreConfig) -> Self {
        log::trace!("LedgerStore initialized (lock timeout {:?})", config.lock_timeout);
        Self {
            config,
            open: AtomicBool::new(true),
            directory: RwLock::new(Directory::default()),
            rows: RwLock::new(HashMap::new()),
            journal: RwLock::new(Journal::default()),
        }
    }

    pub fn config(&self) -> StoreConfig {
        self.config
    }

    /// Stop accepting work. Units that have not committed yet fail with
    /// [`StoreError::Unavailable`] and leave no trace.
    pub fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
        log::info!("Ledger store closed");
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.is_open() {
            Ok(())
        } else {
            Err(StoreError::Unavailable)
        }
    }

    /// Create the single account for `username`, balance `0.00`.
    pub fn open_account(&self, username: &str) -> Result<Account, StoreError> {
        self.ensure_open()?;

        let mut directory = self.directory.write();
        if directory.by_username.contains_key(username) {
            return Err(StoreError::DuplicateUsername {
                username: username.to_string(),
            });
        }

        directory.next_id += 1;
        let account = Account::new(directory.next_id, username, Utc::now());
        self.rows
            .write()
            .insert(account.id(), Arc::new(Mutex::new(account.clone())));
        directory
            .by_username
            .insert(username.to_string(), account.id());

        log::debug!("Opened account {} for {username}", account.id());
        Ok(account)
    }

    pub fn find_account_id(&self, username: &str) -> Result<Option<AccountId>, StoreError> {
        self.ensure_open()?;
        Ok(self.directory.read().by_username.get(username).copied())
    }

    /// Committed snapshot of one account, read under its row lock.
    pub fn get_account(&self, id: AccountId) -> Result<Account, StoreError> {
        self.ensure_open()?;
        let row = self.row(id)?;
        let guard = self.lock_row(id, &row)?;
        Ok(guard.clone())
    }

    /// Posted transactions for one account, newest first.
    pub fn list_transactions(&self, id: AccountId) -> Result<Vec<Transaction>, StoreError> {
        self.ensure_open()?;
        let journal = self.journal.read();
        Ok(journal
            .by_account
            .get(&id)
            .map(|entries| entries.iter().rev().cloned().collect())
            .unwrap_or_default())
    }

    /// Number of posted transactions across all accounts.
    pub fn transaction_count(&self) -> usize {
        self.journal.read().len
    }

    pub fn account_count(&self) -> usize {
        self.rows.read().len()
    }

    /// Run `work` as one atomic unit over the given accounts.
    ///
    /// Rows are locked in ascending id order (duplicates collapse), so two
    /// units over the same pair of accounts can never wait on each other in
    /// a cycle. Writes staged by `work` are published only when it returns
    /// `Ok`; on `Err` they are discarded and the error is returned as is.
    pub fn run_atomic<T, E, F>(&self, accounts: &[AccountId], work: F) -> Result<T, E>
    where
        F: FnOnce(&mut UnitOfWork<'_>) -> Result<T, E>,
        E: From<StoreError>,
    {
        self.ensure_open()?;

        let ids: BTreeSet<AccountId> = accounts.iter().copied().collect();
        let rows = ids
            .iter()
            .map(|&id| self.row(id).map(|row| (id, row)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut unit = UnitOfWork::default();
        for (id, row) in &rows {
            unit.lock(*id, self.lock_row(*id, row)?);
        }

        match work(&mut unit) {
            Ok(value) => {
                self.commit(unit)?;
                Ok(value)
            }
            Err(e) => {
                log::trace!("Rolled back unit of work over accounts {ids:?}");
                Err(e)
            }
        }
    }

    fn commit(&self, unit: UnitOfWork<'_>) -> Result<(), StoreError> {
        // Checked while all rows are still held: after this point nothing can fail.
        self.ensure_open()?;

        let (mut guards, accounts, entries) = unit.into_parts();
        let mut journal = self.journal.write();
        let created_at = Utc::now();

        let saved = accounts.len();
        for (id, account) in accounts {
            if let Some(guard) = guards.get_mut(&id) {
                **guard = account;
            }
        }
        let posted = entries.len();
        for entry in entries {
            journal.append(entry, created_at);
        }

        log::trace!("Committed unit of work: {saved} account(s), {posted} transaction(s)");
        Ok(())
    }

    fn row(&self, id: AccountId) -> Result<Row, StoreError> {
        self.rows
            .read()
            .get(&id)
            .cloned()
            .ok_or(StoreError::AccountNotFound { account: id })
    }

    fn lock_row<'a>(
        &self,
        id: AccountId,
        row: &'a Row,
    ) -> Result<parking_lot::MutexGuard<'a, Account>, StoreError> {
        row.try_lock_for(self.config.lock_timeout).ok_or_else(|| {
            log::warn!(
                "Lock on account {id} not acquired within {:?}",
                self.config.lock_timeout
            );
            StoreError::LockTimeout { account: id }
        })
    }
}
