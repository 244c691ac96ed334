//! Concurrent account registry.
//!
//! The ledger maps account identifiers to independently locked accounts. The
//! map lock is held only long enough to look up or insert an account handle;
//! all account work happens under that account's own mutex, so callers
//! touching different accounts never wait on each other.

use crate::account::{Account, AccountId, AccountSnapshot, LoanId};
use crate::config::{AmountPolicy, LedgerConfig};
use crate::error::{LedgerError, Result};
use crate::loan::{Loan, LoanRepayment};
use crate::money::Money;
use crate::transaction::LogEntry;
use log::debug;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard};

type AccountHandle = Arc<Mutex<Account>>;

/// The bank: owns every account and dispatches operations to them.
///
/// `Ledger` is `Send + Sync`; share it between threads behind an `Arc`.
///
/// # Example
///
/// ```
/// use bank_ledger::{Ledger, Money};
///
/// let ledger = Ledger::new();
/// ledger.create_account("A1", "Alice", Money::from(500)).unwrap();
/// ledger.withdraw("A1", Money::from(200)).unwrap();
/// assert_eq!(ledger.view_account("A1").unwrap().balance, Money::from(300));
/// ```
#[derive(Debug, Default)]
pub struct Ledger {
    accounts: RwLock<HashMap<AccountId, AccountHandle>>,
    config: LedgerConfig,
}

impl Ledger {
    /// Creates an empty ledger with the default configuration.
    pub fn new() -> Self {
        Self::with_config(LedgerConfig::default())
    }

    pub fn with_config(config: LedgerConfig) -> Self {
        Ledger {
            accounts: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Registers a new account.
    ///
    /// The existence check and the insert happen under one write lock, so of
    /// two concurrent calls with the same `id` exactly one succeeds.
    pub fn create_account(&self, id: &str, owner_name: &str, initial_deposit: Money) -> Result<()> {
        self.check_amount(initial_deposit)?;

        {
            let mut accounts = self.accounts.write().unwrap_or_else(PoisonError::into_inner);
            if accounts.contains_key(id) {
                return Err(LedgerError::AccountAlreadyExists { id: id.to_string() });
            }

            let account = Account::with_interest_rate(
                id,
                owner_name,
                initial_deposit,
                self.config.default_interest_rate,
            );
            accounts.insert(id.to_string(), Arc::new(Mutex::new(account)));
        }

        debug!("Opened account {} for {} with {}", id, owner_name, initial_deposit);
        Ok(())
    }

    pub fn deposit(&self, id: &str, amount: Money) -> Result<()> {
        self.check_amount(amount)?;
        self.with_account(id, |account| account.deposit(amount))??;
        debug!("Deposited {} to account {}", amount, id);
        Ok(())
    }

    /// Fails with [`LedgerError::InsufficientFunds`] if the balance is too low.
    pub fn withdraw(&self, id: &str, amount: Money) -> Result<()> {
        self.check_amount(amount)?;
        self.with_account(id, |account| account.withdraw(amount))??;
        debug!("Withdrew {} from account {}", amount, id);
        Ok(())
    }

    /// Opens a loan of `amount` at `rate` percent over `term_months`.
    pub fn apply_for_loan(
        &self,
        id: &str,
        amount: Money,
        rate: Decimal,
        term_months: u32,
    ) -> Result<LoanId> {
        self.check_amount(amount)?;
        let loan_id =
            self.with_account(id, |account| account.apply_for_loan(amount, rate, term_months))??;
        debug!("Opened loan {} of {} on account {}", loan_id, amount, id);
        Ok(loan_id)
    }

    pub fn repay_loan(&self, id: &str, loan_id: LoanId, payment: Money) -> Result<LoanRepayment> {
        self.check_amount(payment)?;
        let outcome = self.with_account(id, |account| account.repay_loan(loan_id, payment))??;
        debug!("Repayment of {} on loan {} of account {}: {:?}", payment, loan_id, id, outcome);
        Ok(outcome)
    }

    /// Credits interest at the account's rate and returns the amount credited.
    pub fn accumulate_interest(&self, id: &str) -> Result<Money> {
        let interest = self.with_account(id, Account::accumulate_interest)??;
        debug!("Credited {} interest to account {}", interest, id);
        Ok(interest)
    }

    pub fn search_transactions(&self, id: &str, keyword: &str) -> Result<Vec<LogEntry>> {
        self.with_account(id, |account| account.search_transactions(keyword))
    }

    pub fn view_account(&self, id: &str) -> Result<AccountSnapshot> {
        self.with_account(id, |account| account.snapshot())
    }

    /// Copies of the account's open loans, by ascending loan id.
    pub fn loans(&self, id: &str) -> Result<Vec<(LoanId, Loan)>> {
        self.with_account(id, |account| {
            account
                .loans()
                .map(|(loan_id, loan)| (loan_id, loan.clone()))
                .collect()
        })
    }

    /// All account identifiers, sorted.
    pub fn account_ids(&self) -> Vec<AccountId> {
        let mut ids: Vec<AccountId> = self.read_accounts().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.read_accounts().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runs `f` with exclusive access to one account.
    ///
    /// The map lock is released before the account lock is taken.
    fn with_account<T, F>(&self, id: &str, f: F) -> Result<T>
    where
        F: FnOnce(&mut Account) -> T,
    {
        let handle = self.handle(id)?;
        let mut account = lock(&handle);
        Ok(f(&mut *account))
    }

    fn handle(&self, id: &str) -> Result<AccountHandle> {
        self.read_accounts()
            .get(id)
            .cloned()
            .ok_or_else(|| LedgerError::AccountNotFound { id: id.to_string() })
    }

    fn read_accounts(&self) -> RwLockReadGuard<'_, HashMap<AccountId, AccountHandle>> {
        self.accounts.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_amount(&self, amount: Money) -> Result<()> {
        match self.config.amount_policy {
            AmountPolicy::RejectNegative if amount.is_negative() => {
                Err(LedgerError::InvalidAmount { amount })
            }
            _ => Ok(()),
        }
    }
}

/// Account mutations never leave partial state behind, so a poisoned lock is
/// still consistent.
fn lock(handle: &Mutex<Account>) -> MutexGuard<'_, Account> {
    handle.lock().unwrap_or_else(PoisonError::into_inner)
}
