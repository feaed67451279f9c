//! Ledger Validator CLI
//!
//! Validates a transaction batch and writes final balances and per-transaction
//! outcomes.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- users.csv transactions.csv bins.csv balances.csv events.csv
//! ```
//!
//! Output files are only created once the whole batch has been processed,
//! so a fatal error leaves none behind.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `info` or `debug` to control logging verbosity

use ledger_validator::{EngineError, LedgerEngine, Result};
use std::env;
use std::fs::File;
use std::io::{BufReader, BufWriter};
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
    if args.len() < 6 {
        return Err(EngineError::MissingArgument);
    }

    let users = BufReader::new(File::open(&args[1])?);
    let transactions = BufReader::new(File::open(&args[2])?);
    let mappings = BufReader::new(File::open(&args[3])?);

    let mut engine = LedgerEngine::from_csv(users, mappings)?;
    engine.process_csv(transactions)?;

    engine.write_balances(BufWriter::new(File::create(&args[4])?))?;
    engine.write_outcomes(BufWriter::new(File::create(&args[5])?))?;

    Ok(())
}
