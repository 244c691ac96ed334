//! CSV command scripts: parsing, execution and reporting.
//!
//! This is the presentation layer over [`Ledger`]. It reads one command per
//! CSV row, converts the text fields into typed arguments, calls the ledger
//! and writes one outcome row per command. Ledger failures are reported in
//! the outcome, never fatal; only I/O and CSV framing errors abort a run.

use crate::account::LoanId;
use crate::error::Result;
use crate::ledger::Ledger;
use crate::loan::LoanRepayment;
use crate::money::Money;
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::str::FromStr;

/// Raw command row as read from CSV.
///
/// Header: `command,account,name,amount,rate,term,loan,keyword`. Fields a
/// command does not use may be empty or missing.
#[derive(Debug, Default, Deserialize)]
pub struct CommandRecord {
    pub command: String,

    #[serde(default)]
    pub account: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub amount: Option<String>,

    /// Loan interest rate in percent
    #[serde(default)]
    pub rate: Option<String>,

    /// Loan term in months
    #[serde(default)]
    pub term: Option<String>,

    #[serde(default)]
    pub loan: Option<String>,

    #[serde(default)]
    pub keyword: Option<String>,
}

/// A parsed ledger command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open {
        account: String,
        name: String,
        initial_deposit: Money,
    },
    Deposit {
        account: String,
        amount: Money,
    },
    Withdraw {
        account: String,
        amount: Money,
    },
    Loan {
        account: String,
        amount: Money,
        rate: Decimal,
        term_months: u32,
    },
    Repay {
        account: String,
        loan_id: LoanId,
        payment: Money,
    },
    Interest {
        account: String,
    },
    Search {
        account: String,
        keyword: String,
    },
    View {
        account: String,
    },
}

impl CommandRecord {
    /// Parses the raw record into a typed command.
    ///
    /// Returns `None` for unknown commands, a blank account, or missing or
    /// malformed arguments.
    pub fn parse(&self) -> Option<Command> {
        let account = self.account.trim().to_string();
        if account.is_empty() {
            return None;
        }

        let command = match self.command.trim().to_lowercase().as_str() {
            "open" => Command::Open {
                account,
                name: field(&self.name)?.to_string(),
                initial_deposit: parse_field(&self.amount)?,
            },
            "deposit" => Command::Deposit {
                account,
                amount: parse_field(&self.amount)?,
            },
            "withdraw" => Command::Withdraw {
                account,
                amount: parse_field(&self.amount)?,
            },
            "loan" => Command::Loan {
                account,
                amount: parse_field(&self.amount)?,
                rate: parse_field(&self.rate)?,
                term_months: parse_field(&self.term)?,
            },
            "repay" => Command::Repay {
                account,
                loan_id: parse_field(&self.loan)?,
                payment: parse_field(&self.amount)?,
            },
            "interest" => Command::Interest { account },
            "search" => Command::Search {
                account,
                keyword: self.keyword.as_deref().unwrap_or("").trim().to_string(),
            },
            "view" => Command::View { account },
            _ => return None,
        };

        Some(command)
    }
}

fn field(value: &Option<String>) -> Option<&str> {
    let trimmed = value.as_deref()?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn parse_field<T: FromStr>(value: &Option<String>) -> Option<T> {
    field(value)?.parse().ok()
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Open { .. } => "open",
            Command::Deposit { .. } => "deposit",
            Command::Withdraw { .. } => "withdraw",
            Command::Loan { .. } => "loan",
            Command::Repay { .. } => "repay",
            Command::Interest { .. } => "interest",
            Command::Search { .. } => "search",
            Command::View { .. } => "view",
        }
    }

    pub fn account(&self) -> &str {
        match self {
            Command::Open { account, .. }
            | Command::Deposit { account, .. }
            | Command::Withdraw { account, .. }
            | Command::Loan { account, .. }
            | Command::Repay { account, .. }
            | Command::Interest { account }
            | Command::Search { account, .. }
            | Command::View { account } => account,
        }
    }

    /// Runs the command against `ledger` and renders the result as the
    /// detail column of the outcome report.
    pub fn execute(&self, ledger: &Ledger) -> Result<String> {
        match self {
            Command::Open {
                account,
                name,
                initial_deposit,
            } => {
                ledger.create_account(account, name, *initial_deposit)?;
                Ok(String::new())
            }
            Command::Deposit { account, amount } => {
                ledger.deposit(account, *amount)?;
                Ok(String::new())
            }
            Command::Withdraw { account, amount } => {
                ledger.withdraw(account, *amount)?;
                Ok(String::new())
            }
            Command::Loan {
                account,
                amount,
                rate,
                term_months,
            } => {
                let loan_id = ledger.apply_for_loan(account, *amount, *rate, *term_months)?;
                Ok(format!("loan_id={}", loan_id))
            }
            Command::Repay {
                account,
                loan_id,
                payment,
            } => {
                match ledger.repay_loan(account, *loan_id, *payment)? {
                    LoanRepayment::FullyRepaid => Ok("fully repaid".to_string()),
                    LoanRepayment::Outstanding(remaining) => Ok(format!("remaining={}", remaining)),
                }
            }
            Command::Interest { account } => {
                let interest = ledger.accumulate_interest(account)?;
                Ok(format!("interest={}", interest))
            }
            Command::Search { account, keyword } => {
                let matches = ledger.search_transactions(account, keyword)?;
                Ok(matches
                    .iter()
                    .map(|entry| entry.description.as_str())
                    .collect::<Vec<_>>()
                    .join(" | "))
            }
            Command::View { account } => {
                let view = ledger.view_account(account)?;
                Ok(format!(
                    "name={};balance={};transactions={}",
                    view.owner_name,
                    view.balance,
                    view.transactions.len()
                ))
            }
        }
    }
}

/// One row of the outcome report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub row: usize,
    pub command: String,
    pub account: String,
    pub status: &'static str,
    pub detail: String,
}

impl Outcome {
    fn ok(row: usize, command: &Command, detail: String) -> Self {
        Outcome {
            row,
            command: command.name().to_string(),
            account: command.account().to_string(),
            status: "ok",
            detail,
        }
    }

    fn error(row: usize, command: &str, account: &str, detail: String) -> Self {
        Outcome {
            row,
            command: command.to_string(),
            account: account.to_string(),
            status: "error",
            detail,
        }
    }
}

/// Streams a command script through a ledger.
pub struct CommandProcessor<'a> {
    ledger: &'a Ledger,
}

impl<'a> CommandProcessor<'a> {
    pub fn new(ledger: &'a Ledger) -> Self {
        CommandProcessor { ledger }
    }

    /// Executes every command in `reader`, writing one outcome row per
    /// command to `writer`.
    ///
    /// Records are read one at a time. Rejected commands are logged at warn
    /// level and reported with status `error`.
    pub fn process_csv<R: Read, W: Write>(&self, reader: R, writer: W) -> Result<()> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);
        let mut csv_writer = csv::Writer::from_writer(writer);

        for (row_idx, result) in csv_reader.deserialize::<CommandRecord>().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row

            let outcome = match result {
                Ok(record) => self.process_record(&record, row_num),
                Err(e) => {
                    warn!("Row {}: CSV parse error: {}", row_num, e);
                    Outcome::error(row_num, "", "", "invalid command".to_string())
                }
            };
            csv_writer.serialize(&outcome)?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    fn process_record(&self, record: &CommandRecord, row: usize) -> Outcome {
        let command = match record.parse() {
            Some(command) => command,
            None => {
                warn!("Row {}: Failed to parse command record", row);
                return Outcome::error(
                    row,
                    record.command.trim(),
                    record.account.trim(),
                    "invalid command".to_string(),
                );
            }
        };

        match command.execute(self.ledger) {
            Ok(detail) => {
                debug!("Row {}: {} on {} succeeded", row, command.name(), command.account());
                Outcome::ok(row, &command, detail)
            }
            Err(e) => {
                warn!("Row {}: {}", row, e);
                Outcome::error(row, command.name(), command.account(), e.to_string())
            }
        }
    }

    /// Writes the final account states to CSV.
    ///
    /// Output is sorted by account id. Balances carry exactly 4 decimal places.
    pub fn write_accounts<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["account", "name", "balance", "open_loans", "transactions"])?;

        for id in self.ledger.account_ids() {
            let view = self.ledger.view_account(&id)?;
            let open_loans = self.ledger.loans(&id)?.len();
            csv_writer.write_record([
                view.id,
                view.owner_name,
                view.balance.to_string(),
                open_loans.to_string(),
                view.transactions.len().to_string(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}
