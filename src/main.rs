//! Bank Ledger CLI
//!
//! Runs a CSV script of ledger commands and reports the outcome of each one.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- commands.csv > outcomes.csv
//! cargo run -- commands.csv accounts.csv > outcomes.csv
//! ```
//!
//! The optional second argument receives the final account summary.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity
//! - `LEDGER_INTEREST_RATE`: default account interest rate, e.g. `0.01`
//! - `LEDGER_AMOUNT_POLICY`: `permissive` (default) or `reject-negative`

use bank_ledger::{CommandProcessor, Ledger, LedgerConfig, LedgerError, Result};
use log::info;
use std::env;
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(LedgerError::MissingArgument);
    }

    let config = LedgerConfig::from_env()?;
    info!("Starting with {:?}", config);
    let ledger = Ledger::with_config(config);
    let processor = CommandProcessor::new(&ledger);

    let input_path = &args[1];
    let file = File::open(input_path)?;
    let reader = BufReader::new(file);

    let stdout = io::stdout();
    let handle = stdout.lock();
    processor.process_csv(reader, handle)?;

    if let Some(summary_path) = args.get(2) {
        let file = File::create(summary_path)?;
        processor.write_accounts(BufWriter::new(file))?;
        info!("Wrote {} accounts to {}", ledger.len(), summary_path);
    }

    Ok(())
}
