//! Customer account model and operations.
//!
//! An account owns its balance, an append-only transaction log and the set of
//! loans taken against it. Nothing here is synchronized; the [`Ledger`]
//! wraps each account in its own lock.
//!
//! [`Ledger`]: crate::ledger::Ledger

use crate::error::{LedgerError, Result};
use crate::loan::{Loan, LoanRepayment};
use crate::money::Money;
use crate::transaction::LogEntry;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Caller-chosen account identifier.
pub type AccountId = String;

/// Per-account loan identifier, allocated from 1 upwards.
pub type LoanId = u32;

/// A customer's account.
///
/// # Invariants
///
/// - The transaction log only ever grows; entries are never edited or reordered
/// - A failed withdrawal leaves the balance and the log untouched
/// - A loan is removed as soon as a repayment brings its balance to zero or
///   below; a loan opened with a non-positive principal stays open until then
/// - Loan identifiers are never reused, even after a loan is repaid
/// - Any operation whose result would not fit in [`Money`] fails with
///   [`LedgerError::AmountOutOfRange`] and changes nothing
#[derive(Debug, Clone)]
pub struct Account {
    id: AccountId,
    owner_name: String,
    balance: Money,

    /// Fraction credited by [`Account::accumulate_interest`].
    interest_rate: Decimal,

    transactions: Vec<LogEntry>,
    loans: BTreeMap<LoanId, Loan>,
    next_loan_id: LoanId,
}

/// Read-only view of an account for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSnapshot {
    pub id: AccountId,
    pub owner_name: String,
    pub balance: Money,
    pub transactions: Vec<LogEntry>,
}

impl Account {
    /// Opens an account with the default 1% interest rate.
    pub fn open(id: impl Into<AccountId>, owner_name: impl Into<String>, initial_deposit: Money) -> Self {
        Self::with_interest_rate(id, owner_name, initial_deposit, Decimal::new(1, 2))
    }

    /// Opens an account that accrues interest at `interest_rate` (a fraction).
    pub fn with_interest_rate(
        id: impl Into<AccountId>,
        owner_name: impl Into<String>,
        initial_deposit: Money,
        interest_rate: Decimal,
    ) -> Self {
        let mut account = Account {
            id: id.into(),
            owner_name: owner_name.into(),
            balance: initial_deposit,
            interest_rate,
            transactions: Vec::new(),
            loans: BTreeMap::new(),
            next_loan_id: 1,
        };
        account.record(format!("Account opened with deposit of {}", initial_deposit));
        account
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn owner_name(&self) -> &str {
        &self.owner_name
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn interest_rate(&self) -> Decimal {
        self.interest_rate
    }

    /// The full transaction log, oldest first.
    pub fn transactions(&self) -> &[LogEntry] {
        &self.transactions
    }

    pub fn loan(&self, loan_id: LoanId) -> Option<&Loan> {
        self.loans.get(&loan_id)
    }

    /// Open loans in ascending identifier order.
    pub fn loans(&self) -> impl Iterator<Item = (LoanId, &Loan)> {
        self.loans.iter().map(|(id, loan)| (*id, loan))
    }

    pub fn open_loan_count(&self) -> usize {
        self.loans.len()
    }

    /// Credits `amount` to the balance.
    ///
    /// Only fails if the new balance is out of range.
    pub fn deposit(&mut self, amount: Money) -> Result<()> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::AmountOutOfRange { operation: "deposit" })?;
        self.record(format!("Deposited {}", amount));
        Ok(())
    }

    /// Debits `amount` from the balance.
    ///
    /// Fails with [`LedgerError::InsufficientFunds`] if `amount` exceeds the
    /// balance, in which case nothing changes.
    pub fn withdraw(&mut self, amount: Money) -> Result<()> {
        if amount > self.balance {
            return Err(LedgerError::InsufficientFunds {
                requested: amount,
                available: self.balance,
            });
        }

        self.balance = self
            .balance
            .checked_sub(amount)
            .ok_or(LedgerError::AmountOutOfRange { operation: "withdrawal" })?;
        self.record(format!("Withdrew {}", amount));
        Ok(())
    }

    /// Opens a loan and returns its identifier.
    ///
    /// `rate` is the annual rate in percent. The borrowed amount is not
    /// credited to the balance. Fails only once every identifier has been used.
    pub fn apply_for_loan(
        &mut self,
        amount: Money,
        rate: Decimal,
        term_months: u32,
    ) -> Result<LoanId> {
        let loan_id = self.next_loan_id;
        self.next_loan_id = loan_id
            .checked_add(1)
            .ok_or_else(|| LedgerError::LoanIdsExhausted { id: self.id.clone() })?;

        self.loans.insert(loan_id, Loan::new(amount, rate, term_months));
        self.record(format!(
            "Loan {} of {} applied with interest rate of {}% for {} months",
            loan_id, amount, rate, term_months
        ));
        Ok(loan_id)
    }

    /// Applies `payment` to an open loan.
    ///
    /// The loan is removed once its remaining balance reaches zero or below.
    pub fn repay_loan(&mut self, loan_id: LoanId, payment: Money) -> Result<LoanRepayment> {
        let loan = self
            .loans
            .get_mut(&loan_id)
            .ok_or(LedgerError::LoanNotFound { loan_id })?;

        if loan.apply_payment(payment)? {
            self.loans.remove(&loan_id);
            self.record(format!("Loan {} fully repaid", loan_id));
            Ok(LoanRepayment::FullyRepaid)
        } else {
            let remaining = loan.remaining_balance;
            self.record(format!("Repayment of {} made on loan {}", payment, loan_id));
            Ok(LoanRepayment::Outstanding(remaining))
        }
    }

    /// Credits one period of interest on the current balance and returns it.
    ///
    /// Each call compounds on the balance left by the previous one.
    pub fn accumulate_interest(&mut self) -> Result<Money> {
        let (interest, balance) = self
            .balance
            .apply_rate(self.interest_rate)
            .and_then(|interest| Some((interest, self.balance.checked_add(interest)?)))
            .ok_or(LedgerError::AmountOutOfRange { operation: "interest" })?;
        self.balance = balance;
        self.record(format!("Accumulated {} as interest", interest));
        Ok(interest)
    }

    /// Returns the log entries whose text contains `keyword`, ignoring case,
    /// in the order they were recorded.
    ///
    /// The searched text is the description followed by the entry's
    /// timestamp, so dates such as `2026-10` match too.
    pub fn search_transactions(&self, keyword: &str) -> Vec<LogEntry> {
        let needle = keyword.to_lowercase();
        self.transactions
            .iter()
            .filter(|entry| entry.matches_lowercase(&needle))
            .cloned()
            .collect()
    }

    pub fn snapshot(&self) -> AccountSnapshot {
        AccountSnapshot {
            id: self.id.clone(),
            owner_name: self.owner_name.clone(),
            balance: self.balance,
            transactions: self.transactions.clone(),
        }
    }

    fn record(&mut self, description: String) {
        self.transactions.push(LogEntry::now(description));
    }

    /// Verifies that every open loan was allocated from the counter.
    #[cfg(debug_assertions)]
    pub fn check_invariant(&self) -> bool {
        self.loans.keys().all(|id| *id < self.next_loan_id)
    }
}
