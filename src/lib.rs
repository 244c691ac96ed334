//! # Bank Ledger
//!
//! An in-memory account ledger that tracks customer balances, an append-only
//! transaction history and loans, safe to share between threads.
//!
//! ## Design Principles
//!
//! - **Fixed-point arithmetic**: every amount is a 4-decimal-place [`Money`]
//! - **Lock per account**: operations on different accounts never contend;
//!   operations on the same account are serialized
//! - **Typed outcomes**: every operation returns a [`Result`]; nothing is
//!   printed on failure
//! - **Audit trail**: each successful mutation appends to the account's log
//!
//! ## Example
//!
//! ```
//! use bank_ledger::{Ledger, LedgerError, Money};
//! use rust_decimal::Decimal;
//!
//! let ledger = Ledger::new();
//! ledger.create_account("A1", "Alice", Money::from(500)).unwrap();
//!
//! let loan_id = ledger
//!     .apply_for_loan("A1", Money::from(1000), Decimal::from(5), 12)
//!     .unwrap();
//! ledger.repay_loan("A1", loan_id, Money::from(1000)).unwrap();
//!
//! assert!(matches!(
//!     ledger.withdraw("A1", Money::from(900)),
//!     Err(LedgerError::InsufficientFunds { .. })
//! ));
//! ```

pub mod account;
pub mod command;
pub mod config;
pub mod error;
pub mod ledger;
pub mod loan;
pub mod money;
pub mod transaction;

pub use account::{Account, AccountId, AccountSnapshot, LoanId};
pub use command::{Command, CommandProcessor, CommandRecord, Outcome};
pub use config::{AmountPolicy, LedgerConfig};
pub use error::{LedgerError, Result};
pub use ledger::Ledger;
pub use loan::{Loan, LoanRepayment};
pub use money::Money;
pub use transaction::LogEntry;
