//! Error types for the ledger and its command-line front end.

use crate::account::LoanId;
use crate::money::Money;
use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors reported by ledger operations and the CLI.
///
/// The domain variants are expected, recoverable outcomes of ledger calls.
/// The rest only arise while reading input or configuration.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("account {id} already exists")]
    AccountAlreadyExists { id: String },

    #[error("account {id} not found")]
    AccountNotFound { id: String },

    /// Withdrawal larger than the current balance
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: Money, available: Money },

    #[error("loan {loan_id} not found")]
    LoanNotFound { loan_id: LoanId },

    /// Negative amount rejected by `AmountPolicy::RejectNegative`
    #[error("invalid amount {amount}: negative amounts are not accepted")]
    InvalidAmount { amount: Money },

    /// Result would not fit in a 4-decimal-place amount
    #[error("amount out of range: {operation} would overflow")]
    AmountOutOfRange { operation: &'static str },

    #[error("account {id} cannot take more loans: loan identifiers exhausted")]
    LoanIdsExhausted { id: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid value {value:?} for {key}")]
    InvalidConfig { key: &'static str, value: String },

    #[error("Missing input file argument. Usage: bank-ledger <commands.csv> [accounts.csv]")]
    MissingArgument,
}
